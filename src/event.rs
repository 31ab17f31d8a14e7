use std::convert::From;

use particle_id::ParticleID;

use crate::particle::Particle;

const OUTGOING_STATUS: i32 = 1;

#[derive(Clone, PartialEq, PartialOrd, Debug)]
pub struct Event {
    pub out: Vec<Particle>,
    pub weight: f64,
    /// Hard-scattering scale, zero if unknown
    pub pt_hard: f64,
}

impl Default for Event {
    fn default() -> Self {
        Self {
            out: Vec::new(),
            weight: 1.,
            pt_hard: 0.,
        }
    }
}

impl Event {
    pub fn new(out: Vec<Particle>) -> Self {
        Self {
            out,
            ..Default::default()
        }
    }
}

impl From<&hepmc2::event::Event> for Event {
    fn from(event: &hepmc2::event::Event) -> Self {
        let out = event
            .vertices
            .iter()
            .flat_map(|vx| {
                vx.particles_out
                    .iter()
                    .filter(|p| p.status == OUTGOING_STATUS)
            })
            .map(|out| Particle::new(ParticleID::new(out.id), out.p.0))
            .collect();
        Event {
            out,
            weight: event.weights.first().copied().unwrap_or(1.),
            pt_hard: event.scale.max(0.),
        }
    }
}

impl From<&lhef::HEPEUP> for Event {
    fn from(event: &lhef::HEPEUP) -> Self {
        let out = event
            .PUP
            .iter()
            .enumerate()
            .filter_map(|(n, p)| {
                if event.ISTUP[n] == OUTGOING_STATUS {
                    let p = [p[3], p[0], p[1], p[2]];
                    let id = ParticleID::new(event.IDUP[n]);
                    Some(Particle::new(id, p))
                } else {
                    None
                }
            })
            .collect();
        Event {
            out,
            weight: event.XWGTUP,
            pt_hard: event.SCALUP.max(0.),
        }
    }
}
