//! Association of reconstructed jets with generated jets
//!
//! The association has to be unique, so the closest jet is searched in
//! both directions: for each generated jet the closest reconstructed
//! jet, and for each reconstructed jet the closest generated jet. Each
//! search marks a cell in a flag matrix, `1` for the closest
//! reconstructed jet and `2` for the closest generated jet. For the
//! generated jets `a`-`e` and reconstructed jets `1`-`3` in
//!
//! ```text
//!   1     2
//!     a         b
//!
//!  d      c
//!        3     e
//! ```
//!
//! this gives
//!
//! ```text
//!     1   2   3
//!    ------------
//!  a| 3   2   0
//!  b| 0   1   0
//!  c| 0   0   3
//!  d| 0   0   1
//!  e| 0   0   1
//! ```
//!
//! Only pairs flagged `3` agree from both sides and are accepted. Close
//! soft or split jets can disturb this correlation; in that case the
//! jets stay unmatched rather than being matched wrongly.
use log::{log_enabled, trace, Level::Trace};
use serde::{Deserialize, Serialize};

use crate::jet::AngularDistance;

/// Maximum number of jets considered on either side
pub const MAX_JETS: usize = 50;

/// Default maximum angular distance for a match
pub const DEFAULT_MAX_DISTANCE: f64 = 1.4;

const FORWARD: u8 = 1;
const BACKWARD: u8 = 2;
const MUTUAL: u8 = FORWARD | BACKWARD;

/// How the flag matrix is turned into the final association
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
pub enum Consensus {
    /// Accept exactly the pairs that are each other's closest jet
    ///
    /// Every other slot is unmatched, so the association is always
    /// symmetric.
    #[default]
    Mutual,
    /// Scan the flag matrix row by row and let every cell overwrite the
    /// slots of its row and column
    ///
    /// For a jet touched by several cells only the verdict of the last
    /// cell survives. In particular, matches not involving the last
    /// generated or the last reconstructed jet are always dropped and the
    /// association can be asymmetric. This reproduces the output of older
    /// analyses.
    LastCell,
}

/// Association between generated and reconstructed jet slots
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub struct JetMatching {
    gen_of: [Option<usize>; MAX_JETS],
    rec_of: [Option<usize>; MAX_JETS],
}

impl Default for JetMatching {
    fn default() -> Self {
        Self {
            gen_of: [None; MAX_JETS],
            rec_of: [None; MAX_JETS],
        }
    }
}

impl JetMatching {
    /// Generated jet matched to the reconstructed jet in slot `rec`
    pub fn gen_of(&self, rec: usize) -> Option<usize> {
        self.gen_of.get(rec).copied().flatten()
    }

    /// Reconstructed jet matched to the generated jet in slot `gen`
    pub fn rec_of(&self, gen: usize) -> Option<usize> {
        self.rec_of.get(gen).copied().flatten()
    }

    /// Generated jet for each reconstructed slot
    pub fn gen_indices(&self) -> &[Option<usize>; MAX_JETS] {
        &self.gen_of
    }

    /// Reconstructed jet for each generated slot
    pub fn rec_indices(&self) -> &[Option<usize>; MAX_JETS] {
        &self.rec_of
    }

    /// Matched `(generated, reconstructed)` pairs seen from the generated side
    pub fn pairs(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.rec_of
            .iter()
            .enumerate()
            .filter_map(|(gen, rec)| rec.map(|rec| (gen, rec)))
    }

    fn set(&mut self, gen: usize, rec: usize, accepted: bool) {
        if accepted {
            self.gen_of[rec] = Some(gen);
            self.rec_of[gen] = Some(rec);
        } else {
            self.gen_of[rec] = None;
            self.rec_of[gen] = None;
        }
    }
}

/// Closest-jet matcher
#[derive(Copy, Clone, PartialEq, Debug, Deserialize, Serialize)]
pub struct ClosestJets {
    /// Jets at this distance or further apart are never matched
    pub max_distance: f64,
    pub consensus: Consensus,
}

impl Default for ClosestJets {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_DISTANCE)
    }
}

impl ClosestJets {
    pub fn new(max_distance: f64) -> Self {
        Self {
            max_distance,
            consensus: Consensus::default(),
        }
    }

    pub fn with_consensus(self, consensus: Consensus) -> Self {
        Self { consensus, ..self }
    }

    /// Relate generated and reconstructed jets
    ///
    /// Only the first [MAX_JETS] jets of each slice are considered. If
    /// either slice is empty, all slots are unmatched.
    pub fn match_jets<J: AngularDistance>(
        &self,
        generated: &[J],
        reconstructed: &[J],
    ) -> JetMatching {
        let mut res = JetMatching::default();
        let generated = &generated[..generated.len().min(MAX_JETS)];
        let reconstructed = &reconstructed[..reconstructed.len().min(MAX_JETS)];
        if generated.is_empty() || reconstructed.is_empty() {
            return res;
        }

        let mut flags = [[0u8; MAX_JETS]; MAX_JETS];
        for (ig, gen) in generated.iter().enumerate() {
            trace!(
                "Gen ({ig}) p_T {:.3} eta {:.3} phi {:.3}",
                gen.pt(),
                gen.eta(),
                gen.phi()
            );
            res.rec_of[ig] = self.closest(gen, reconstructed);
            if let Some(ir) = res.rec_of[ig] {
                flags[ig][ir] += FORWARD;
            }
        }
        for (ir, rec) in reconstructed.iter().enumerate() {
            trace!(
                "Rec ({ir}) p_T {:.3} eta {:.3} phi {:.3}",
                rec.pt(),
                rec.eta(),
                rec.phi()
            );
            res.gen_of[ir] = self.closest(rec, generated);
            if let Some(ig) = res.gen_of[ir] {
                flags[ig][ir] += BACKWARD;
            }
        }

        let (ngen, nrec) = (generated.len(), reconstructed.len());
        if log_enabled!(Trace) {
            trace!("Flag matrix:\n{}", format_flags(&flags, ngen, nrec));
        }

        match self.consensus {
            Consensus::Mutual => {
                res = JetMatching::default();
                for (ig, row) in flags[..ngen].iter().enumerate() {
                    for (ir, &flag) in row[..nrec].iter().enumerate() {
                        if flag == MUTUAL {
                            res.set(ig, ir, true);
                        }
                    }
                }
            }
            Consensus::LastCell => {
                for (ig, row) in flags[..ngen].iter().enumerate() {
                    for (ir, &flag) in row[..nrec].iter().enumerate() {
                        res.set(ig, ir, flag == MUTUAL);
                    }
                }
            }
        }
        res
    }

    /// Index of the closest candidate strictly within `max_distance`
    ///
    /// On equal distances the earlier candidate wins.
    fn closest<J: AngularDistance>(
        &self,
        jet: &J,
        candidates: &[J],
    ) -> Option<usize> {
        let mut dist = self.max_distance;
        let mut closest = None;
        for (i, candidate) in candidates.iter().enumerate() {
            let dr = jet.delta_r(candidate);
            trace!("Distance to ({i}) {dr:.3}");
            if dr < dist {
                closest = Some(i);
                dist = dr;
            }
        }
        closest
    }
}

fn format_flags(
    flags: &[[u8; MAX_JETS]; MAX_JETS],
    ngen: usize,
    nrec: usize,
) -> String {
    let mut res = String::new();
    for row in &flags[..ngen] {
        for flag in &row[..nrec] {
            res.push_str(&format!("{flag} "));
        }
        res.push('\n');
    }
    res
}
