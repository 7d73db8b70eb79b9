use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

/// Fichier par défaut de la table ASCII → Braille.
pub const DEFAULT_ASCII_TO_BRAILLE: &str = "data/ASCIItoBraille.txt";
/// Fichier par défaut de la table Braille → ASCII.
pub const DEFAULT_BRAILLE_TO_ASCII: &str = "data/BrailletoASCII.txt";
/// Fichier par défaut de la table Braille → Unicode.
pub const DEFAULT_BRAILLE_TO_UNICODE: &str = "data/BrailletoUnicode.txt";

/// Emplacement des trois tables de conversion.
///
/// # Example
/// ```
/// use br_core::config::TablesConfig;
/// let config = TablesConfig::default();
/// assert!(config.braille_to_ascii.ends_with("BrailletoASCII.txt"));
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TablesConfig {
    /// Table 8 bits → cellule Braille.
    pub ascii_to_braille: PathBuf,
    /// Table cellule Braille → caractère ASCII.
    pub braille_to_ascii: PathBuf,
    /// Table cellule Braille → code point Unicode (hexadécimal).
    pub braille_to_unicode: PathBuf,
}

impl Default for TablesConfig {
    fn default() -> Self {
        Self {
            ascii_to_braille: PathBuf::from(DEFAULT_ASCII_TO_BRAILLE),
            braille_to_ascii: PathBuf::from(DEFAULT_BRAILLE_TO_ASCII),
            braille_to_unicode: PathBuf::from(DEFAULT_BRAILLE_TO_UNICODE),
        }
    }
}

/// Top-level TOML structure.
#[derive(Deserialize)]
struct ConfigFile {
    tables: Option<TablesSection>,
}

/// `[tables]` section, all fields optional.
#[derive(Deserialize)]
struct TablesSection {
    ascii_to_braille: Option<PathBuf>,
    braille_to_ascii: Option<PathBuf>,
    braille_to_unicode: Option<PathBuf>,
}

/// Charge un fichier TOML et fusionne avec les valeurs par défaut.
///
/// Relative table paths given in the file are resolved against the file's
/// directory. Defaults stay relative to the working directory.
///
/// # Errors
/// Returns an error if the file cannot be read or parsed.
///
/// # Example
/// ```no_run
/// use br_core::config::load_config;
/// use std::path::Path;
/// let config = load_config(Path::new("config/tables.toml")).unwrap();
/// ```
pub fn load_config(path: &Path) -> Result<TablesConfig> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Impossible de lire {}", path.display()))?;

    let file: ConfigFile = toml::from_str(&content)
        .with_context(|| format!("Erreur de parsing TOML dans {}", path.display()))?;

    let base = path.parent().unwrap_or_else(|| Path::new(""));
    let resolve = |p: PathBuf| if p.is_relative() { base.join(p) } else { p };

    let mut config = TablesConfig::default();
    if let Some(t) = file.tables {
        if let Some(v) = t.ascii_to_braille {
            config.ascii_to_braille = resolve(v);
        }
        if let Some(v) = t.braille_to_ascii {
            config.braille_to_ascii = resolve(v);
        }
        if let Some(v) = t.braille_to_unicode {
            config.braille_to_unicode = resolve(v);
        }
    }
    Ok(config)
}
