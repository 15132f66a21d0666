use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// `wishtheory` - turn a desire into affirmations, a vision card, and audio.
#[derive(Parser, Debug)]
#[command(name = "wishtheory")]
#[command(version = "0.1.0")]
#[command(about = "Manifestation coach: affirmations, vision cards, and spoken audio.", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Generate a manifestation plan and vision card for a desire
    Manifest {
        /// The desire to manifest (prompted interactively when omitted)
        desire: Option<String>,

        /// Where to write the card PNG (default: timestamped file in the workspace)
        #[arg(short, long)]
        out: Option<PathBuf>,

        /// Speak the chosen affirmation after generating
        #[arg(long)]
        speak: bool,
    },

    /// List past manifestations, newest first
    History,

    /// Render a vision card locally without calling the service
    Card {
        desire: String,
        affirmation: String,

        /// Where to write the card PNG
        #[arg(short, long)]
        out: Option<PathBuf>,
    },

    /// Generate and play spoken audio for a line of text
    Speak { text: String },
}
