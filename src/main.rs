//! Jet spectra and reconstructed-to-generated jet matching for Monte
//! Carlo collider events.
//!
//! # How to use
//!
//!     jetspec [-c CONFIG.toml] [-o OUTPUT.json] EVENTFILES...
//!
//! The event files should be in the LHEF or version 2 of the HepMC
//! format. Generated jets are clustered from the outgoing partons and
//! hadrons, reconstructed jets from the visible particles inside the
//! detector acceptance. Both can be changed in the configuration file.
mod opt;

use std::fs::File;
use std::io::{BufWriter, Write};

use crate::opt::Opt;

use anyhow::{Context, Result};
use clap::Parser;
use env_logger::Env;
use jetspec::{import::import, Config, JetSpectrum};
use log::{debug, info};

fn main() -> Result<()> {
    let opt = Opt::parse();

    let env = Env::default().filter_or("JETSPEC_LOG", opt.loglevel.as_str());
    env_logger::init_from_env(env);

    let config = match &opt.config {
        Some(path) => Config::from_file(path)
            .with_context(|| format!("Failed to load configuration {path:?}"))?,
        None => Config::default(),
    };
    debug!("settings: {:#?}", config);

    let mut spectrum = JetSpectrum::from_config(&config);
    for file in &opt.files {
        debug!("Importing events from {:?}", file);
        let nevents = import(file, |event| spectrum.process(&event))?;
        info!("Read {nevents} events from {file:?}");
    }

    let stats = spectrum.stats();
    info!(
        "Processed {} events, skipped {}, {} of {} reconstructed jets \
         have a generated partner",
        stats.processed, stats.skipped, stats.matched, stats.rec_jets
    );

    let out = File::create(&opt.output)
        .with_context(|| format!("Failed to open {:?}", opt.output))?;
    let mut out = BufWriter::new(out);
    spectrum
        .write_json(&mut out)
        .with_context(|| format!("Failed to write to {:?}", opt.output))?;
    out.flush()
        .with_context(|| format!("Failed to write to {:?}", opt.output))?;
    info!("Histograms written to {:?}", opt.output);
    Ok(())
}
