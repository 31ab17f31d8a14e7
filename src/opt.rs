use std::path::PathBuf;

use clap::Parser;

#[derive(Debug, Parser)]
#[command(
    name = "jetspec",
    about = "Jet spectra and matching of reconstructed to generated jets"
)]
pub struct Opt {
    /// Verbosity level: 'off', 'error', 'warn', 'info', 'debug', 'trace'
    #[arg(short, long, default_value = "info")]
    pub loglevel: String,

    /// Configuration file in TOML format
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Output file for the histograms
    #[arg(short, long, default_value = "jetspec.json")]
    pub output: PathBuf,

    /// Event files in LHEF or HepMC2 format
    #[arg(required = true)]
    pub files: Vec<PathBuf>,
}
