use std::path::PathBuf;

use clap::Parser;

/// brascii — ASCII ↔ Braille ↔ Unicode converter.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Conversion : "braille", "ascii", "unicode", ou "dump".
    pub mode: String,

    /// Texte source (ou nom de table pour "dump").
    pub text: String,

    /// Fichier de configuration TOML. Défaut : config/tables.toml.
    #[arg(short, long, default_value = "config/tables.toml")]
    pub config: PathBuf,

    /// Niveau de log : error, warn, info, debug, trace.
    #[arg(long, default_value = "warn")]
    pub log_level: String,
}

/// Conversion selected by the first positional argument.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Mode {
    /// ASCII text → Braille bit stream.
    Braille,
    /// Braille bit stream → ASCII text.
    Ascii,
    /// ASCII text → Braille Unicode characters.
    Unicode,
    /// Write one table to stdout in `<bits>,<value>` format.
    Dump,
}

impl Mode {
    /// Case-insensitive mode name; `None` for anything else.
    #[must_use]
    pub fn from_arg(arg: &str) -> Option<Self> {
        match arg.to_lowercase().as_str() {
            "braille" => Some(Self::Braille),
            "ascii" => Some(Self::Ascii),
            "unicode" => Some(Self::Unicode),
            "dump" => Some(Self::Dump),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn two_positionals_are_required() {
        assert!(Cli::try_parse_from(["brascii", "braille"]).is_err());
        assert!(Cli::try_parse_from(["brascii", "braille", "a", "b"]).is_err());

        let cli = Cli::try_parse_from(["brascii", "ascii", "100000"]).unwrap();
        assert_eq!(cli.mode, "ascii");
        assert_eq!(cli.text, "100000");
        assert_eq!(cli.config, PathBuf::from("config/tables.toml"));
    }

    #[test]
    fn mode_is_case_insensitive() {
        assert_eq!(Mode::from_arg("UNICODE"), Some(Mode::Unicode));
        assert_eq!(Mode::from_arg("dump"), Some(Mode::Dump));
        assert_eq!(Mode::from_arg(""), None);
    }
}
