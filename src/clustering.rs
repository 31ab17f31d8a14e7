use std::str::FromStr;

use jetty::{anti_kt_f, cambridge_aachen_f, kt_f, Cluster, PseudoJet};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter};
use thiserror::Error;

use crate::event::Event;
use crate::jet::Jet;
use crate::particle::Particle;

#[derive(Debug, Clone, Eq, PartialEq, Error)]
#[error("Unknown jet algorithm: {0}")]
pub struct UnknownJetAlgorithm(String);

/// Jet clustering algorithms
#[derive(
    Display,
    EnumIter,
    Copy,
    Clone,
    Default,
    Eq,
    PartialEq,
    Ord,
    PartialOrd,
    Hash,
    Debug,
    Deserialize,
    Serialize,
)]
#[serde(try_from = "String", rename_all = "kebab-case")]
pub enum JetAlgorithm {
    /// The [anti-kt](https://arxiv.org/abs/0802.1189) algorithm
    #[default]
    #[strum(to_string = "anti-kt")]
    AntiKt,
    /// The [kt](https://arxiv.org/abs/hep-ph/9305266) algorithm
    #[strum(to_string = "kt")]
    Kt,
    /// The Cambridge/Aachen algorithm
    #[strum(to_string = "cambridge-aachen")]
    CambridgeAachen,
}

impl FromStr for JetAlgorithm {
    type Err = UnknownJetAlgorithm;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "anti_kt" | "antikt" | "anti-kt" => Ok(Self::AntiKt),
            "kt" => Ok(Self::Kt),
            "Cambridge/Aachen" | "Cambridge-Aachen" | "Cambridge_Aachen"
            | "cambridge/aachen" | "cambridge-aachen" | "cambridge_aachen" => {
                Ok(Self::CambridgeAachen)
            }
            _ => Err(UnknownJetAlgorithm(s.to_string())),
        }
    }
}

impl TryFrom<String> for JetAlgorithm {
    type Error = UnknownJetAlgorithm;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct JetDefinition {
    #[serde(default)]
    pub algorithm: JetAlgorithm,
    /// Jet radius parameter
    pub radius: f64,
    /// Minimum jet transverse momentum
    #[serde(default)]
    pub min_pt: f64,
}

impl Default for JetDefinition {
    fn default() -> Self {
        Self {
            algorithm: JetAlgorithm::AntiKt,
            radius: 0.4,
            min_pt: 5.,
        }
    }
}

pub fn cluster(
    particles: Vec<[f64; 4]>,
    jet_def: &JetDefinition,
) -> Vec<PseudoJet> {
    let r = jet_def.radius;
    let pt_cut = |p: PseudoJet| p.pt() > jet_def.min_pt;
    match jet_def.algorithm {
        JetAlgorithm::AntiKt => particles.cluster_if(anti_kt_f(r), pt_cut),
        JetAlgorithm::CambridgeAachen => {
            particles.cluster_if(cambridge_aachen_f(r), pt_cut)
        }
        JetAlgorithm::Kt => particles.cluster_if(kt_f(r), pt_cut),
    }
}

#[derive(
    Copy,
    Clone,
    Default,
    Eq,
    PartialEq,
    Ord,
    PartialOrd,
    Hash,
    Debug,
    Deserialize,
    Serialize,
)]
#[serde(rename_all = "snake_case")]
pub enum SelectionKind {
    /// Outgoing partons and hadrons
    #[default]
    PartonsAndHadrons,
    /// Everything except neutrinos
    Visible,
}

/// Which outgoing particles enter the jet clustering
#[derive(Copy, Clone, Default, Debug, PartialEq, Deserialize, Serialize)]
pub struct ParticleSelection {
    #[serde(default)]
    pub kind: SelectionKind,
    #[serde(default)]
    pub min_pt: f64,
    #[serde(default)]
    pub max_abs_eta: Option<f64>,
}

impl ParticleSelection {
    pub fn accepts(&self, p: &Particle) -> bool {
        let kind_ok = match self.kind {
            SelectionKind::PartonsAndHadrons => p.is_parton() || p.is_hadron(),
            SelectionKind::Visible => !p.is_neutrino(),
        };
        kind_ok
            && p.pt >= self.min_pt
            && self.max_abs_eta.map_or(true, |max| p.eta.abs() < max)
    }
}

/// Provides the jets of an event
pub trait JetSource {
    /// Jets ordered by decreasing transverse momentum
    fn jets(&self, event: &Event) -> Vec<Jet>;
}

/// Jets clustered from a selection of the outgoing particles
#[derive(Copy, Clone, Default, Debug, PartialEq, Deserialize, Serialize)]
pub struct ClusteredJets {
    #[serde(default)]
    pub jet_def: JetDefinition,
    #[serde(default)]
    pub selection: ParticleSelection,
}

impl JetSource for ClusteredJets {
    fn jets(&self, event: &Event) -> Vec<Jet> {
        let input = Vec::from_iter(event.out.iter().filter_map(|p| {
            if self.selection.accepts(p) {
                Some(p.p)
            } else {
                None
            }
        }));
        let mut jets = Vec::from_iter(
            cluster(input, &self.jet_def).into_iter().map(Jet::from),
        );
        jets.sort_by(|a, b| b.pt().total_cmp(&a.pt()));
        jets
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use particle_id::ParticleID;
    use std::f64::consts::PI;
    use strum::IntoEnumIterator;

    fn particle(id: i32, pt: f64, eta: f64, phi: f64) -> Particle {
        let jet = Jet::from_pt_eta_phi(pt, eta, phi);
        Particle::new(ParticleID::new(id), jet.p())
    }

    fn event() -> Event {
        Event::new(vec![
            particle(2, 30., -0.3, PI),
            particle(21, 50., 0.2, 0.),
            particle(12, 100., 0., PI / 2.),
            particle(211, 8., 3., PI / 2.),
        ])
    }

    #[test]
    fn parse_algorithm() {
        for algo in JetAlgorithm::iter() {
            assert_eq!(algo.to_string().parse::<JetAlgorithm>(), Ok(algo));
        }
        assert_eq!("antikt".parse::<JetAlgorithm>(), Ok(JetAlgorithm::AntiKt));
        assert_eq!(
            "Cambridge/Aachen".parse::<JetAlgorithm>(),
            Ok(JetAlgorithm::CambridgeAachen)
        );
        assert_eq!(
            "siscone".parse::<JetAlgorithm>(),
            Err(UnknownJetAlgorithm("siscone".to_string()))
        );
    }

    #[test]
    fn selection() {
        let ev = event();
        let all = ParticleSelection::default();
        assert_eq!(
            ev.out.iter().map(|p| all.accepts(p)).collect::<Vec<_>>(),
            [true, true, false, true]
        );
        let visible = ParticleSelection {
            kind: SelectionKind::Visible,
            min_pt: 0.15,
            max_abs_eta: Some(0.9),
        };
        assert_eq!(
            ev.out.iter().map(|p| visible.accepts(p)).collect::<Vec<_>>(),
            [true, true, false, false]
        );
    }

    #[test]
    fn clustered_jets_ordered_by_pt() {
        let source = ClusteredJets::default();
        let jets = source.jets(&event());
        assert_eq!(jets.len(), 3);
        assert_relative_eq!(jets[0].pt(), 50., epsilon = 1e-9);
        assert_relative_eq!(jets[0].eta(), 0.2, epsilon = 1e-9);
        assert_relative_eq!(jets[1].pt(), 30., epsilon = 1e-9);
        assert_relative_eq!(jets[1].phi(), PI, epsilon = 1e-9);
        assert_relative_eq!(jets[2].pt(), 8., epsilon = 1e-9);

        let source = ClusteredJets {
            jet_def: JetDefinition {
                min_pt: 10.,
                ..Default::default()
            },
            selection: ParticleSelection::default(),
        };
        assert_eq!(source.jets(&event()).len(), 2);
    }

    #[test]
    fn no_input_no_jets() {
        let source = ClusteredJets::default();
        assert!(source.jets(&Event::default()).is_empty());
    }
}
