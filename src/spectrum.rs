//! Jet spectra and the correlation between generated and reconstructed jets
use std::io::Write;

use log::{debug, trace, warn};
use serde::{Deserialize, Serialize};

use crate::clustering::{ClusteredJets, JetSource};
use crate::config::Config;
use crate::event::Event;
use crate::histogram::{Axis, Hist1, Hist2};
use crate::jet::AngularDistance;
use crate::matching::{ClosestJets, MAX_JETS};

const PT_AXIS: Axis = Axis::new(100, 0., 200.);
const ETA_AXIS: Axis = Axis::new(50, -5., 5.);
const PHI_AXIS: Axis = Axis::new(72, 0., std::f64::consts::TAU);
const N_JETS_AXIS: Axis = Axis::new(20, -0.5, 19.5);
const DELTA_R_AXIS: Axis = Axis::new(70, 0., 1.4);

/// Histograms for the jet at a fixed position in the pT-ordered list
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct SlotHistograms {
    pub e: Hist1,
    pub pt_rec_in: Hist1,
    pub pt_rec_out: Hist1,
    pub pt_gen_in: Hist1,
    pub pt_gen_out: Hist1,
    pub pt_rec_vs_gen: Hist2,
}

impl SlotHistograms {
    fn new(slot: usize) -> Self {
        Self {
            e: Hist1::new(format!("jet {slot}: energy"), PT_AXIS),
            pt_rec_in: Hist1::new(
                format!("jet {slot}: reconstructed p_T"),
                PT_AXIS,
            ),
            pt_rec_out: Hist1::new(
                format!("jet {slot}: matched reconstructed p_T"),
                PT_AXIS,
            ),
            pt_gen_in: Hist1::new(
                format!("jet {slot}: generated p_T"),
                PT_AXIS,
            ),
            pt_gen_out: Hist1::new(
                format!("jet {slot}: matched generated p_T"),
                PT_AXIS,
            ),
            pt_rec_vs_gen: Hist2::new(
                format!("jet {slot}: reconstructed vs. generated p_T"),
                PT_AXIS,
                PT_AXIS,
            ),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct SpectrumHistograms {
    pub pt_hard: Hist1,
    pub pt_hard_no_weight: Hist1,
    pub n_gen_jets: Hist1,
    pub n_rec_jets: Hist1,
    pub rec_eta_phi: Hist2,
    /// Reconstructed jets without generated partner
    pub rec_eta_phi_no_gen: Hist2,
    /// Generated jets without reconstructed partner
    pub gen_eta_phi_no_rec: Hist2,
    pub matched_delta_r: Hist1,
    /// Generated p_T vs. p_T hard for matched reconstructed jets
    pub pt_gen_vs_pt_hard: Hist2,
    pub slots: Vec<SlotHistograms>,
}

impl SpectrumHistograms {
    pub fn new(nslots: usize) -> Self {
        Self {
            pt_hard: Hist1::new("p_T hard", PT_AXIS),
            pt_hard_no_weight: Hist1::new("p_T hard, no weight", PT_AXIS),
            n_gen_jets: Hist1::new("number of generated jets", N_JETS_AXIS),
            n_rec_jets: Hist1::new("number of reconstructed jets", N_JETS_AXIS),
            rec_eta_phi: Hist2::new(
                "reconstructed jets: eta vs. phi",
                ETA_AXIS,
                PHI_AXIS,
            ),
            rec_eta_phi_no_gen: Hist2::new(
                "reconstructed jets without generated jet: eta vs. phi",
                ETA_AXIS,
                PHI_AXIS,
            ),
            gen_eta_phi_no_rec: Hist2::new(
                "generated jets without reconstructed jet: eta vs. phi",
                ETA_AXIS,
                PHI_AXIS,
            ),
            matched_delta_r: Hist1::new(
                "distance between matched jets",
                DELTA_R_AXIS,
            ),
            pt_gen_vs_pt_hard: Hist2::new(
                "matched jets: generated p_T vs. p_T hard",
                PT_AXIS,
                PT_AXIS,
            ),
            slots: (0..nslots).map(SlotHistograms::new).collect(),
        }
    }
}

#[derive(Copy, Clone, Default, Debug, Eq, PartialEq, Deserialize, Serialize)]
pub struct Stats {
    pub processed: u64,
    pub skipped: u64,
    pub gen_jets: u64,
    pub rec_jets: u64,
    /// Reconstructed jets with a generated partner
    pub matched: u64,
}

#[derive(Copy, Clone, Debug, PartialEq)]
enum Weighting {
    External(f64),
    Scaled(f64),
}

impl Weighting {
    fn weight(&self, event: &Event) -> f64 {
        match self {
            Weighting::External(w) => *w,
            Weighting::Scaled(w) => w * event.weight,
        }
    }
}

/// Per-event analysis of generated and reconstructed jets
pub struct JetSpectrum<G, R> {
    generated: G,
    reconstructed: R,
    matcher: ClosestJets,
    weighting: Weighting,
    histograms: SpectrumHistograms,
    stats: Stats,
}

impl JetSpectrum<ClusteredJets, ClusteredJets> {
    pub fn from_config(config: &Config) -> Self {
        Self::new(config.generated, config.reconstructed, config)
    }
}

impl<G: JetSource, R: JetSource> JetSpectrum<G, R> {
    pub fn new(generated: G, reconstructed: R, config: &Config) -> Self {
        let weighting = if config.use_external_weight_only {
            Weighting::External(config.external_weight)
        } else {
            Weighting::Scaled(config.external_weight)
        };
        Self {
            generated,
            reconstructed,
            matcher: config.matcher(),
            weighting,
            histograms: SpectrumHistograms::new(
                config.histogram_slots.min(MAX_JETS),
            ),
            stats: Stats::default(),
        }
    }

    /// Analyse one event
    ///
    /// Events without outgoing particles are skipped.
    pub fn process(&mut self, event: &Event) {
        if event.out.is_empty() {
            warn!("Skipping event without outgoing particles");
            self.stats.skipped += 1;
            return;
        }
        self.stats.processed += 1;
        let w = self.weighting.weight(event);
        let h = &mut self.histograms;

        h.pt_hard.fill(event.pt_hard, w);
        h.pt_hard_no_weight.fill(event.pt_hard, 1.);

        let mut gen_jets = self.generated.jets(event);
        let mut rec_jets = self.reconstructed.jets(event);
        h.n_gen_jets.fill(gen_jets.len() as f64, 1.);
        h.n_rec_jets.fill(rec_jets.len() as f64, 1.);
        debug!(
            "{} generated jets, {} reconstructed jets, weight {w}",
            gen_jets.len(),
            rec_jets.len()
        );
        gen_jets.truncate(MAX_JETS);
        rec_jets.truncate(MAX_JETS);
        self.stats.gen_jets += gen_jets.len() as u64;
        self.stats.rec_jets += rec_jets.len() as u64;

        let matching = self.matcher.match_jets(&gen_jets, &rec_jets);

        for (ir, rec) in rec_jets.iter().enumerate() {
            let (pt, eta, phi) = (rec.pt(), rec.eta(), rec.phi());
            h.rec_eta_phi.fill(eta, phi, w);
            let gen = matching.gen_of(ir).and_then(|ig| gen_jets.get(ig));
            match gen {
                Some(gen) => {
                    self.stats.matched += 1;
                    let dr = gen.delta_r(rec);
                    trace!("reconstructed jet {ir} matched at ΔR {dr:.3}");
                    h.matched_delta_r.fill(dr, w);
                    h.pt_gen_vs_pt_hard.fill(gen.pt(), event.pt_hard, w);
                }
                None => h.rec_eta_phi_no_gen.fill(eta, phi, w),
            }
            let Some(slot) = h.slots.get_mut(ir) else {
                continue;
            };
            slot.e.fill(rec.e(), w);
            slot.pt_rec_in.fill(pt, w);
            if let Some(gen) = gen {
                slot.pt_rec_out.fill(pt, w);
                slot.pt_rec_vs_gen.fill(pt, gen.pt(), w);
            }
        }

        for (ig, gen) in gen_jets.iter().enumerate() {
            let matched = matching.rec_of(ig).is_some();
            if !matched {
                h.gen_eta_phi_no_rec.fill(gen.eta(), gen.phi(), w);
            }
            let Some(slot) = h.slots.get_mut(ig) else {
                continue;
            };
            slot.pt_gen_in.fill(gen.pt(), w);
            if matched {
                slot.pt_gen_out.fill(gen.pt(), w);
            }
        }
    }

    pub fn histograms(&self) -> &SpectrumHistograms {
        &self.histograms
    }

    pub fn stats(&self) -> Stats {
        self.stats
    }

    /// Write statistics and histograms as JSON
    pub fn write_json<W: Write>(&self, out: W) -> serde_json::Result<()> {
        #[derive(Serialize)]
        struct Output<'a> {
            stats: &'a Stats,
            histograms: &'a SpectrumHistograms,
        }
        serde_json::to_writer(
            out,
            &Output {
                stats: &self.stats,
                histograms: &self.histograms,
            },
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::jet::Jet;
    use crate::matching::Consensus;
    use crate::particle::Particle;
    use approx::assert_relative_eq;
    use particle_id::ParticleID;

    struct FixedJets(Vec<Jet>);

    impl JetSource for FixedJets {
        fn jets(&self, _event: &Event) -> Vec<Jet> {
            self.0.clone()
        }
    }

    fn event(weight: f64) -> Event {
        Event {
            out: vec![Particle::new(ParticleID::new(21), [10., 10., 0., 0.])],
            weight,
            pt_hard: 25.,
        }
    }

    fn spectrum(config: &Config) -> JetSpectrum<FixedJets, FixedJets> {
        let gen = FixedJets(vec![
            Jet::from_pt_eta_phi(20., 0., 0.),
            Jet::from_pt_eta_phi(15., 0.5, 0.5),
        ]);
        let rec = FixedJets(vec![Jet::from_pt_eta_phi(19.5, 0.02, 0.01)]);
        JetSpectrum::new(gen, rec, config)
    }

    #[test]
    fn fill_matched_and_unmatched() {
        let config = Config {
            histogram_slots: 2,
            ..Default::default()
        };
        let mut spectrum = spectrum(&config);
        spectrum.process(&event(2.));

        let stats = spectrum.stats();
        assert_eq!(stats.processed, 1);
        assert_eq!(stats.gen_jets, 2);
        assert_eq!(stats.rec_jets, 1);
        assert_eq!(stats.matched, 1);

        let h = spectrum.histograms();
        assert_eq!(h.slots.len(), 2);
        assert_relative_eq!(h.pt_hard.integral(), 2.);
        assert_relative_eq!(h.pt_hard_no_weight.integral(), 1.);
        assert_relative_eq!(h.n_gen_jets.sum_w[N_JETS_AXIS.index(2.)], 1.);
        assert_relative_eq!(h.n_rec_jets.sum_w[N_JETS_AXIS.index(1.)], 1.);

        assert_relative_eq!(h.slots[0].pt_rec_in.integral(), 2.);
        assert_relative_eq!(h.slots[0].pt_rec_out.integral(), 2.);
        assert_relative_eq!(h.slots[0].pt_rec_vs_gen.get(19.5, 20.), 2.);
        assert_relative_eq!(h.slots[0].pt_gen_in.integral(), 2.);
        assert_relative_eq!(h.slots[0].pt_gen_out.integral(), 2.);
        assert_relative_eq!(h.slots[1].pt_gen_in.integral(), 2.);
        assert_relative_eq!(h.slots[1].pt_gen_out.integral(), 0.);
        assert_eq!(h.slots[1].pt_rec_in.entries, 0);

        assert_eq!(h.matched_delta_r.entries, 1);
        assert_relative_eq!(h.pt_gen_vs_pt_hard.get(20., 25.), 2.);
        assert_eq!(h.rec_eta_phi_no_gen.entries, 0);
        assert_eq!(h.gen_eta_phi_no_rec.entries, 1);
        assert_relative_eq!(h.gen_eta_phi_no_rec.get(0.5, 0.5), 2.);
    }

    #[test]
    fn matched_counts_reconstructed_side() {
        let config = Config {
            consensus: Consensus::LastCell,
            ..Default::default()
        };
        let mut spectrum = spectrum(&config);
        spectrum.process(&event(1.));
        assert_eq!(spectrum.stats().matched, 0);
        let h = spectrum.histograms();
        assert_eq!(h.matched_delta_r.entries, 0);
        assert_eq!(h.pt_gen_vs_pt_hard.entries, 0);
        assert_eq!(h.rec_eta_phi_no_gen.entries, 1);
    }

    #[test]
    fn skip_empty_event() {
        let mut spectrum = spectrum(&Config::default());
        spectrum.process(&Event::default());
        let stats = spectrum.stats();
        assert_eq!(stats.skipped, 1);
        assert_eq!(stats.processed, 0);
        assert_eq!(spectrum.histograms().pt_hard.entries, 0);
    }

    #[test]
    fn external_weight() {
        let config = Config {
            use_external_weight_only: true,
            external_weight: 0.5,
            ..Default::default()
        };
        let mut external = spectrum(&config);
        external.process(&event(100.));
        assert_relative_eq!(external.histograms().pt_hard.integral(), 0.5);

        let config = Config {
            external_weight: 0.5,
            ..Default::default()
        };
        let mut scaled = spectrum(&config);
        scaled.process(&event(100.));
        assert_relative_eq!(scaled.histograms().pt_hard.integral(), 50.);
    }

    #[test]
    fn clustered_from_config() {
        let mut spectrum = JetSpectrum::from_config(&Config::default());
        let jet = |pt, eta, phi| Jet::from_pt_eta_phi(pt, eta, phi).p();
        let event = Event::new(vec![
            Particle::new(ParticleID::new(21), jet(41., 0.1, 1.)),
            Particle::new(ParticleID::new(-2), jet(30., 2., 4.)),
            Particle::new(ParticleID::new(14), jet(60., 0., 2.5)),
        ]);
        spectrum.process(&event);
        let stats = spectrum.stats();
        assert_eq!(stats.gen_jets, 2);
        assert_eq!(stats.rec_jets, 1);
        assert_eq!(stats.matched, 1);
        let h = spectrum.histograms();
        assert_relative_eq!(h.slots[0].pt_rec_vs_gen.get(41., 41.), 1.);
        assert_eq!(h.gen_eta_phi_no_rec.entries, 1);
    }

    #[test]
    fn json_output() {
        let mut spectrum = spectrum(&Config::default());
        spectrum.process(&event(1.));
        let mut out = Vec::new();
        spectrum.write_json(&mut out).unwrap();
        let json: serde_json::Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(json["stats"]["matched"], 1);
        assert_eq!(
            json["histograms"]["slots"].as_array().map(Vec::len),
            Some(10)
        );
    }
}
