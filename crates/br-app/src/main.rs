use std::io::{self, Write};
use std::process::ExitCode;

use anyhow::{Context, Result};
use br_codec::{Codec, Conversion, Direction};
use br_core::config::{TablesConfig, load_config};
use clap::Parser;
use clap::error::ErrorKind;

pub mod cli;

use cli::Mode;

fn main() -> Result<ExitCode> {
    // 1. Parser CLI
    let cli = match cli::Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            e.exit()
        }
        Err(e) => {
            // Usage sur stderr, code de sortie 1.
            if let Err(io) = e.print() {
                eprintln!("Impossible d'afficher l'usage : {io}");
            }
            return Ok(ExitCode::FAILURE);
        }
    };

    // 2. Initialiser le logging
    env_logger::Builder::new()
        .filter_level(cli.log_level.parse().unwrap_or(log::LevelFilter::Warn))
        .init();

    // 3. Valider le mode
    let Some(mode) = Mode::from_arg(&cli.mode) else {
        println!("Instruction incorrecte. Utilisez 'braille', 'ascii', 'unicode' ou 'dump'.");
        return Ok(ExitCode::SUCCESS);
    };

    // 4. Charger la config puis les tables
    let config = resolve_config(&cli)?;
    let codec = Codec::load(&config)?;

    // 5. Convertir
    run(&codec, mode, &cli.text)?;
    Ok(ExitCode::SUCCESS)
}

/// Run one conversion and print its result on stdout.
fn run(codec: &Codec, mode: Mode, text: &str) -> Result<()> {
    let mut stdout = io::stdout().lock();
    match mode {
        Mode::Braille => print_conversion(&mut stdout, &codec.text_to_braille(text)),
        Mode::Ascii => print_conversion(&mut stdout, &codec.braille_to_text(text)),
        Mode::Unicode => print_conversion(&mut stdout, &codec.text_to_unicode(text)),
        Mode::Dump => {
            let direction = Direction::from_name(text).with_context(|| {
                format!(
                    "Table inconnue : {text}. Tables : ascii-braille, braille-ascii, braille-unicode"
                )
            })?;
            if !codec.status(direction).is_available() {
                log::warn!("Table {direction} indisponible, sortie vide.");
            }
            codec
                .table(direction)
                .write_to(&mut stdout)
                .context("Écriture de la table impossible")
        }
    }
}

fn print_conversion(out: &mut impl Write, conversion: &Conversion) -> Result<()> {
    if !conversion.is_complete() {
        log::warn!(
            "{} fragment(s) non converti(s), sortie partielle.",
            conversion.failures.len()
        );
    }
    writeln!(out, "{}", conversion.output).context("Écriture sur stdout impossible")
}

/// Resolve config: --config if present, defaults otherwise.
fn resolve_config(cli: &cli::Cli) -> Result<TablesConfig> {
    if cli.config.exists() {
        load_config(&cli.config)
    } else {
        log::warn!(
            "Config introuvable : {}. Utilisation des défauts.",
            cli.config.display()
        );
        Ok(TablesConfig::default())
    }
}
