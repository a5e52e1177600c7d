use rand_chacha::{rand_core::SeedableRng, ChaCha8Rng};

use crate::{EmissionConfig, Particle, ParticlePool, Surface, Vector};

/// Emission phase of an [`Emitter`].
#[derive(PartialEq, Eq, Clone, Copy, Debug, Default)]
pub enum EmitterState {
    /// Not emitting and tracking nothing; [`Emitter::start`] arms it.
    #[default]
    Stopped,
    /// New particles may be claimed from the pool.
    Emitting,
    /// Not emitting, but particles are still in flight.
    Draining,
}

/// Claims particles from a shared [`ParticlePool`] and schedules their spawns.
///
/// The emitter never allocates particles. It tracks the pool indices it currently owns (its active set)
/// and hands them back by clearing that set once every tracked particle has gone idle.
#[derive(Debug, Clone)]
pub struct Emitter {
    active: Vec<usize>,
    emission_clock: f64,
    spawn_interval: f64,
    state: EmitterState,
    rng: ChaCha8Rng,
}

impl Emitter {
    /// Instantiates an idle [`Emitter`] whose randomness is seeded with `seed`.
    pub fn new(seed: u64) -> Emitter {
        Emitter {
            active: Vec::new(),
            emission_clock: 0.0,
            spawn_interval: 0.0,
            state: EmitterState::Stopped,
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    /// Arms the emitter, unless a previous emission is still being tracked.
    pub fn start(&mut self) {
        if self.active.is_empty() {
            self.state = EmitterState::Emitting;
        }
    }

    /// Stops future spawns. Particles in flight simulate until they expire.
    pub fn stop(&mut self) {
        self.state = if self.active.is_empty() {
            EmitterState::Stopped
        } else {
            EmitterState::Draining
        };
    }

    /// Advances every tracked particle, recycles or retires expired ones, then spawns according to the policy in `config`.
    pub fn update(
        &mut self,
        delta_time: f64,
        origin: Vector,
        config: &EmissionConfig,
        pool: &mut ParticlePool,
    ) {
        let reached_cap = self.active.len() == config.max_particles;
        let recycle = config.recycles() && self.is_emitting();

        for &index in &self.active {
            if let Some(particle) = pool.get_mut(index) {
                if particle.is_alive() {
                    particle.update(delta_time, &mut self.rng);
                } else if recycle {
                    particle.init(origin, config, &mut self.rng);
                }
            }
        }

        // Oneshot fills the active set once.
        if config.oneshot && reached_cap {
            self.stop();
        }

        if (!self.is_emitting() || reached_cap) && self.all_idle(pool) {
            self.active.clear();

            if !self.is_emitting() {
                self.state = EmitterState::Stopped;
            }
        }

        if !self.is_emitting() || config.max_particles == 0 {
            return;
        }

        self.spawn_interval = config.spawn_interval();
        self.emission_clock += delta_time;

        if config.explosive {
            for index in 0..pool.len() {
                if self.active.len() >= config.max_particles {
                    break;
                }

                self.claim(index, origin, config, pool);
            }
        } else if self.emission_clock >= self.spawn_interval
            && self.active.len() < config.max_particles
        {
            // O(pool size) scan for the first free slot.
            for index in 0..pool.len() {
                if self.claim(index, origin, config, pool) {
                    self.emission_clock = 0.0;
                    break;
                }
            }
        }
    }

    /// Draws every live particle in the active set.
    pub fn draw<S: Surface>(&self, pool: &ParticlePool, surface: &mut S) -> Result<(), S::Error> {
        for particle in self.particles(pool) {
            particle.draw(surface)?;
        }

        Ok(())
    }

    /// Initialises the pool slot at `index` and tracks it, provided it is idle and not already tracked.
    fn claim(
        &mut self,
        index: usize,
        origin: Vector,
        config: &EmissionConfig,
        pool: &mut ParticlePool,
    ) -> bool {
        if self.active.contains(&index) {
            return false;
        }

        match pool.get_mut(index) {
            Some(particle) if !particle.is_alive() => {
                particle.init(origin, config, &mut self.rng);
                self.active.push(index);
                true
            }
            _ => false,
        }
    }

    fn all_idle(&self, pool: &ParticlePool) -> bool {
        self.particles(pool).next().is_none()
    }

    /// Live particles in the active set, in activation order.
    pub fn particles<'a>(&'a self, pool: &'a ParticlePool) -> impl Iterator<Item = &'a Particle> {
        self.active
            .iter()
            .filter_map(move |&index| pool.get(index))
            .filter(|particle| particle.is_alive())
    }

    /// Pool indices currently tracked, in activation order.
    pub fn active_indices(&self) -> &[usize] {
        &self.active
    }

    pub fn state(&self) -> EmitterState {
        self.state
    }

    pub fn is_emitting(&self) -> bool {
        self.state == EmitterState::Emitting
    }

    /// Size of the active set.
    pub fn len(&self) -> usize {
        self.active.len()
    }

    pub fn is_empty(&self) -> bool {
        self.active.is_empty()
    }

    /// Interval computed on the last emitting tick.
    pub fn spawn_interval(&self) -> f64 {
        self.spawn_interval
    }
}
