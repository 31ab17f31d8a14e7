use std::f64::consts::{PI, TAU};

use jetty::PseudoJet;

use crate::particle::{eta, phi, pt, wrap_phi, y};

/// Kinematic quantities needed to compare two jets in the (η, φ) plane
pub trait AngularDistance {
    fn pt(&self) -> f64;
    fn eta(&self) -> f64;
    /// Azimuthal angle in `[0, 2π)`
    fn phi(&self) -> f64;

    /// Distance `√(Δη² + Δφ²)`
    ///
    /// The azimuthal difference is folded into `[0, π]`.
    fn delta_r(&self, other: &Self) -> f64 {
        let deta = self.eta() - other.eta();
        let mut dphi = (self.phi() - other.phi()).abs().rem_euclid(TAU);
        if dphi > PI {
            dphi = TAU - dphi;
        }
        deta.hypot(dphi)
    }
}

/// A jet four-momentum
#[derive(Copy, Clone, PartialEq, PartialOrd, Debug, Default)]
pub struct Jet {
    /// Four-momentum `[E, px, py, pz]`
    p: [f64; 4],
    pt: f64,
    eta: f64,
    phi: f64,
}

impl Jet {
    pub fn new(p: [f64; 4]) -> Self {
        Self {
            p,
            pt: pt(&p),
            eta: eta(&p),
            phi: phi(&p),
        }
    }

    /// Construct a massless jet
    ///
    /// The given pseudorapidity and azimuth are kept as they are (modulo
    /// wrapping φ), so distances between such jets are exact.
    pub fn from_pt_eta_phi(pt: f64, eta: f64, phi: f64) -> Self {
        let phi = wrap_phi(phi);
        let p = [
            pt * eta.cosh(),
            pt * phi.cos(),
            pt * phi.sin(),
            pt * eta.sinh(),
        ];
        Self { p, pt, eta, phi }
    }

    /// Four-momentum `[E, px, py, pz]`
    pub fn p(&self) -> [f64; 4] {
        self.p
    }

    pub fn e(&self) -> f64 {
        self.p[0]
    }

    pub fn pt(&self) -> f64 {
        self.pt
    }

    pub fn eta(&self) -> f64 {
        self.eta
    }

    pub fn phi(&self) -> f64 {
        self.phi
    }

    pub fn rap(&self) -> f64 {
        y(&self.p)
    }
}

impl AngularDistance for Jet {
    fn pt(&self) -> f64 {
        self.pt
    }

    fn eta(&self) -> f64 {
        self.eta
    }

    fn phi(&self) -> f64 {
        self.phi
    }
}

impl From<PseudoJet> for Jet {
    fn from(jet: PseudoJet) -> Self {
        let e: f64 = jet.e().into();
        let px: f64 = jet.px().into();
        let py: f64 = jet.py().into();
        let pz: f64 = jet.pz().into();
        Self::new([e, px, py, pz])
    }
}
