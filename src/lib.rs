//! Jet spectra of simulated collider events and the association of
//! reconstructed with generated jets.
//!
//! The core is [ClosestJets](matching::ClosestJets), which matches two
//! lists of jets by mutual closeness in the (η, φ) plane.
#![warn(clippy::all, rust_2018_idioms)]

pub mod clustering;
pub mod config;
pub mod event;
pub mod histogram;
pub mod import;
pub mod jet;
pub mod matching;
pub mod particle;
pub mod spectrum;

pub use config::Config;
pub use jet::{AngularDistance, Jet};
pub use matching::{ClosestJets, Consensus, JetMatching, MAX_JETS};
pub use spectrum::JetSpectrum;
