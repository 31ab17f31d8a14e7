use particle_id::hadrons::HADRONS;
use particle_id::sm_elementary_particles::{bottom, gluon};
use particle_id::ParticleID;

/// An outgoing particle with cached kinematics
#[derive(Copy, Clone, PartialEq, PartialOrd, Debug)]
pub struct Particle {
    pub id: ParticleID,
    /// Four-momentum `[E, px, py, pz]`
    pub p: [f64; 4],
    pub y: f64,
    pub eta: f64,
    pub phi: f64,
    pub pt: f64,
}

impl Particle {
    pub fn new(id: ParticleID, p: [f64; 4]) -> Self {
        Particle {
            id,
            p,
            y: y(&p),
            eta: eta(&p),
            phi: phi(&p),
            pt: pt(&p),
        }
    }

    pub fn is_parton(&self) -> bool {
        self.id == gluon || self.id.id().abs() <= bottom.id()
    }

    pub fn is_hadron(&self) -> bool {
        HADRONS.contains(&self.id)
    }

    pub fn is_neutrino(&self) -> bool {
        matches!(self.id.id().abs(), 12 | 14 | 16)
    }
}

pub(crate) fn y(p: &[f64; 4]) -> f64 {
    (p[3] / p[0]).atanh()
}

pub(crate) fn eta(p: &[f64; 4]) -> f64 {
    let pt = pt(p);
    if pt == 0. {
        return p[3].signum() * f64::INFINITY;
    }
    (p[3] / pt).asinh()
}

/// Azimuthal angle in `[0, 2π)`
pub(crate) fn phi(p: &[f64; 4]) -> f64 {
    wrap_phi(p[2].atan2(p[1]))
}

pub(crate) fn wrap_phi(phi: f64) -> f64 {
    use std::f64::consts::TAU;
    let phi = phi.rem_euclid(TAU);
    // rem_euclid can round up to exactly 2π for tiny negative input
    if phi >= TAU {
        0.
    } else {
        phi
    }
}

fn pt2(p: &[f64; 4]) -> f64 {
    p[1] * p[1] + p[2] * p[2]
}

pub(crate) fn pt(p: &[f64; 4]) -> f64 {
    pt2(p).sqrt()
}
