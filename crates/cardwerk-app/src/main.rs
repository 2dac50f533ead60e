// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Cardwerk — ID card generator
//
// Entry point. Initialises logging, parses the command line, and runs one
// command against the card store. Every command prints a status line; the
// exit code is 1 when it failed.

mod services;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use cardwerk_core::human_errors::humanize_error;
use cardwerk_core::types::{CardFields, PortraitSource};
use cardwerk_core::CardwerkError;
use cardwerk_document::CardComposer;

use services::AppServices;

#[derive(Debug, Parser)]
#[command(name = "cardwerk", version, about = "Compose ID cards and tile them onto print sheets")]
struct Cli {
    /// JSON configuration file. Defaults are used when omitted.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Create a card from a photo.
    Create {
        /// Source photo.
        #[arg(long)]
        photo: PathBuf,
        /// Full name: first, optional middle, last.
        #[arg(long)]
        name: String,
        /// 10-digit phone number; spaces are ignored.
        #[arg(long)]
        phone: String,
        /// Job title.
        #[arg(long)]
        post: String,
        /// Fraction of the portrait the face should fill, in (0, 1].
        #[arg(long)]
        face_size: Option<f64>,
        /// Which face to use, counting from the left starting at 1.
        #[arg(long, default_value_t = 1)]
        face: usize,
        /// Skip face detection and take the centre square.
        #[arg(long)]
        force: bool,
    },
    /// List stored cards.
    List,
    /// Delete a stored card by its serial number from `list`.
    Delete { serial: usize },
    /// Save the portrait from a stored card as a PNG.
    Portrait {
        /// Serial number from `list`.
        serial: usize,
        /// Where to write the portrait.
        #[arg(long)]
        output: PathBuf,
    },
    /// Redraw every stored card with the current template.
    Regenerate {
        /// Worker threads. Defaults to the configured value or the CPU count.
        #[arg(long)]
        workers: Option<usize>,
    },
    /// Tile every stored card into a print PDF.
    Print {
        /// Output file. Defaults to the configured path.
        #[arg(long)]
        output: Option<PathBuf>,
    },
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    tracing::debug!(?cli, "Cardwerk starting");

    match run(cli) {
        Ok(code) => code,
        Err(err) => {
            let human = humanize_error(&err);
            tracing::error!(error = %err, "command failed");
            println!("{}", human.message);
            eprintln!("{}", human.suggestion);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<ExitCode, CardwerkError> {
    let svc = AppServices::init(cli.config.as_deref())?;

    match cli.command {
        Command::Create {
            photo,
            name,
            phone,
            post,
            face_size,
            face,
            force,
        } => {
            let source = if force {
                PortraitSource::Force
            } else {
                PortraitSource::Detect {
                    target_face_size: face_size.unwrap_or(svc.config().face.target_face_size),
                    face_index: face,
                }
            };
            let fields = CardFields::new(name, phone, post);
            let result = svc.create(&photo, source, &fields);
            if let Err(err) = &result {
                tracing::warn!(error = %err, "card not created");
            }

            // The status line is the whole report for create, success or not.
            let (path, message) = CardComposer::status(result);
            println!("{message}");
            match path {
                Some(path) => {
                    println!("{}", path.display());
                    Ok(ExitCode::SUCCESS)
                }
                None => Ok(ExitCode::FAILURE),
            }
        }

        Command::List => {
            let cards = svc.list()?;
            if cards.is_empty() {
                println!("No cards yet.");
            }
            for card in cards {
                println!(
                    "{:>3}. {} | {} | {}",
                    card.serial, card.record.name, card.record.phone, card.record.post
                );
            }
            Ok(ExitCode::SUCCESS)
        }

        Command::Delete { serial } => {
            let card = svc.delete(serial)?;
            println!("Deleted card {}: {}", serial, card.record.name);
            Ok(ExitCode::SUCCESS)
        }

        Command::Portrait { serial, output } => {
            let card = svc.portrait(serial, &output)?;
            println!("Portrait of {} saved to {}", card.record.name, output.display());
            Ok(ExitCode::SUCCESS)
        }

        Command::Regenerate { workers } => {
            let results = svc.regenerate(workers)?;
            let total = results.len();
            let mut failed = 0;
            for (position, result) in results.into_iter().enumerate() {
                if let Err(err) = result {
                    failed += 1;
                    println!("Card {}: {}", position + 1, humanize_error(&err).message);
                }
            }
            println!("Regenerated {} of {} cards.", total - failed, total);
            Ok(if failed > 0 {
                ExitCode::FAILURE
            } else {
                ExitCode::SUCCESS
            })
        }

        Command::Print { output } => {
            let (path, pages) = svc.print(output)?;
            println!("Wrote {} page(s) to {}", pages, path.display());
            Ok(ExitCode::SUCCESS)
        }
    }
}
