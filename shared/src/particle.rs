use rand_chacha::rand_core::RngCore;

use crate::{
    lerp, random_int, random_unit, to_radians, EmissionConfig, SpriteFrame, SpriteSheet, Surface,
    Vector,
};

/// Half-range of the random horizontal acceleration applied every tick.
const WIND_JITTER: i32 = 10;

/// Whether a pool slot currently holds a live particle.
#[derive(PartialEq, Eq, Clone, Copy, Debug, Default)]
pub enum ParticleState {
    /// Free for reuse; never drawn.
    #[default]
    Idle,
    /// Simulated and drawn.
    Alive,
}

/// A single reusable sprite particle.
#[derive(Debug, Clone, Default)]
pub struct Particle {
    state: ParticleState,
    position: Vector,
    direction: Vector,
    velocity: Vector,
    gravity: f64,
    scale: f64,
    angle: f64,
    angular_velocity: f64,
    initial_lifetime: f64,
    lifetime: f64,
    sprite: SpriteSheet,
    current_frame: u32,
}

impl Particle {
    /// Instantiates an idle [`Particle`].
    pub fn new() -> Particle {
        Particle::default()
    }

    /// Rotates `direction` by a uniform random angle within the `spread` cone (in degrees).
    pub fn apply_spread(direction: Vector, spread: f64, rng: &mut impl RngCore) -> Vector {
        let theta = (random_unit(rng) - 0.5) * to_radians(spread);

        direction.rotate(theta)
    }

    /// Re-seeds the particle at `origin` from `config` and brings it to life.
    pub fn init(&mut self, origin: Vector, config: &EmissionConfig, rng: &mut impl RngCore) {
        let shape = config.emission_shape;

        self.position = Vector::new(
            origin.x + random_int(rng, shape.x.saturating_neg(), shape.x) as f64,
            origin.y + random_int(rng, shape.y.saturating_neg(), shape.y) as f64,
        );

        self.direction = Particle::apply_spread(config.direction, config.spread, rng);
        self.velocity = self.direction * config.velocity;
        self.gravity = config.gravity;

        self.scale = if config.random_scale {
            random_int(rng, 1, (config.scale.floor() as i32).max(1)) as f64
        } else {
            config.scale
        };

        self.angle = if config.random_angle {
            let half_range = config.angle.trunc() as i32;
            random_int(rng, -half_range, half_range) as f64
        } else {
            config.angle
        };
        self.angular_velocity = config.angular_velocity;

        self.initial_lifetime = config.lifetime;
        self.lifetime = config.lifetime;

        self.sprite = config.sprite.clone();
        self.current_frame = 0;

        self.state = ParticleState::Alive;
    }

    /// Advances the particle by `delta_time` seconds. Idle particles are left untouched.
    pub fn update(&mut self, delta_time: f64, rng: &mut impl RngCore) {
        if !self.is_alive() {
            return;
        }

        let delta_time = delta_time.max(0.0);

        self.lifetime -= delta_time;

        self.velocity.y += self.gravity * delta_time;
        self.velocity.x += random_int(rng, -WIND_JITTER, WIND_JITTER) as f64 * delta_time;
        self.position += self.velocity * delta_time;

        self.angle += self.angular_velocity * delta_time;

        self.current_frame = self.frame_for_progress(self.progress());

        if self.lifetime <= 0.0 {
            self.state = ParticleState::Idle;
            self.lifetime = self.initial_lifetime;
        }
    }

    /// Paints the current frame. Idle particles draw nothing.
    pub fn draw<S: Surface>(&self, surface: &mut S) -> Result<(), S::Error> {
        if !self.is_alive() {
            return Ok(());
        }

        surface.draw_sprite(
            &self.sprite.texture,
            self.frame(),
            self.position,
            self.scale,
            to_radians(self.angle),
        )
    }

    /// Seconds lived so far, saturating at one: the sheet plays once over the first second.
    fn progress(&self) -> f64 {
        (self.initial_lifetime - self.lifetime).clamp(0.0, 1.0)
    }

    fn frame_for_progress(&self, progress: f64) -> u32 {
        let max_frames = self.sprite.max_frames;

        if max_frames <= 1 {
            0
        } else {
            let frame = lerp(0.0, max_frames as f64, progress, self.sprite.easing).floor() as u32;
            frame.min(max_frames - 1)
        }
    }

    /// Source rectangle of the current animation frame.
    pub fn frame(&self) -> SpriteFrame {
        let width = self.sprite.frame_width as f64;

        SpriteFrame {
            x: self.current_frame as f64 * width,
            y: 0.0,
            width,
            height: self.sprite.frame_height as f64,
        }
    }

    pub fn state(&self) -> ParticleState {
        self.state
    }

    pub fn is_alive(&self) -> bool {
        self.state == ParticleState::Alive
    }

    pub fn position(&self) -> Vector {
        self.position
    }

    pub fn direction(&self) -> Vector {
        self.direction
    }

    pub fn velocity(&self) -> Vector {
        self.velocity
    }

    pub fn scale(&self) -> f64 {
        self.scale
    }

    /// Rotation in degrees.
    pub fn angle(&self) -> f64 {
        self.angle
    }

    pub fn lifetime(&self) -> f64 {
        self.lifetime
    }

    pub fn initial_lifetime(&self) -> f64 {
        self.initial_lifetime
    }

    pub fn current_frame(&self) -> u32 {
        self.current_frame
    }

    pub fn sprite(&self) -> &SpriteSheet {
        &self.sprite
    }
}

/// Fixed-size arena of [`Particle`] slots, addressed by index. Never grows.
#[derive(Debug, Clone)]
pub struct ParticlePool {
    particles: Vec<Particle>,
}

impl ParticlePool {
    /// Preallocates `size` idle particles.
    pub fn new(size: usize) -> ParticlePool {
        ParticlePool {
            particles: vec![Particle::new(); size],
        }
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Particle> {
        self.particles.get(index)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut Particle> {
        self.particles.get_mut(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Particle> {
        self.particles.iter()
    }

    /// Number of live particles across the whole pool.
    pub fn alive_count(&self) -> usize {
        self.particles.iter().filter(|particle| particle.is_alive()).count()
    }
}

#[cfg(test)]
mod tests {
    use rand_chacha::{rand_core::SeedableRng, ChaCha8Rng};

    use super::*;
    use crate::{surface::testing::RecordingSurface, Easing, EmissionShape};

    fn config() -> EmissionConfig {
        EmissionConfig {
            sprite: SpriteSheet {
                texture: "p2".to_string(),
                max_frames: 6,
                frame_width: 16,
                frame_height: 16,
                easing: Easing::Linear,
            },
            direction: Vector::new(0.0, -1.0),
            velocity: 40.0,
            gravity: 0.0,
            spread: 90.0,
            scale: 2.0,
            random_scale: true,
            angle: 90.0,
            random_angle: true,
            angular_velocity: 0.0,
            lifetime: 1.0,
            emission_shape: EmissionShape { x: 40, y: 20 },
            oneshot: false,
            explosive: false,
            max_particles: 20,
        }
    }

    #[test]
    fn init_brings_particle_to_life() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let mut particle = Particle::new();
        assert_eq!(particle.state(), ParticleState::Idle);

        particle.init(Vector::new(100.0, 50.0), &config(), &mut rng);

        assert!(particle.is_alive());
        assert_eq!(particle.lifetime(), 1.0);
        assert_eq!(particle.initial_lifetime(), 1.0);
        assert_eq!(particle.current_frame(), 0);
        assert_eq!(particle.sprite().texture, "p2");
    }

    #[test]
    fn init_respects_footprint_and_ranges() {
        let mut rng = ChaCha8Rng::seed_from_u64(2);
        let config = config();
        let mut particle = Particle::new();

        for _ in 0..200 {
            particle.init(Vector::new(100.0, 50.0), &config, &mut rng);

            let position = particle.position();
            assert!((60.0..=140.0).contains(&position.x));
            assert!((30.0..=70.0).contains(&position.y));
            assert_eq!(position.x.fract(), 0.0);

            assert!(particle.scale() == 1.0 || particle.scale() == 2.0);
            assert!((-90.0..=90.0).contains(&particle.angle()));
            assert!((particle.velocity().length() - 40.0).abs() < 1e-9);
        }
    }

    #[test]
    fn fixed_scale_and_angle_are_copied() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let mut config = config();
        config.random_scale = false;
        config.random_angle = false;
        config.scale = 0.8;
        config.angle = 45.0;

        let mut particle = Particle::new();
        particle.init(Vector::default(), &config, &mut rng);

        assert_eq!(particle.scale(), 0.8);
        assert_eq!(particle.angle(), 45.0);
    }

    #[test]
    fn random_scale_below_one_draws_one() {
        let mut rng = ChaCha8Rng::seed_from_u64(4);
        let mut config = config();
        config.scale = 0.8;

        let mut particle = Particle::new();
        particle.init(Vector::default(), &config, &mut rng);

        assert_eq!(particle.scale(), 1.0);
    }

    #[test]
    fn spread_stays_within_cone() {
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        let base = Vector::new(0.0, -1.0);

        for _ in 0..500 {
            let direction = Particle::apply_spread(base, 90.0, &mut rng);
            let cos = direction.x * base.x + direction.y * base.y;

            assert!(cos >= to_radians(45.0).cos() - 1e-12);
            assert!((direction.length() - 1.0).abs() < 1e-12);
        }

        assert_eq!(Particle::apply_spread(base, 0.0, &mut rng), base);
    }

    #[test]
    fn expires_after_lifetime_and_resets() {
        let mut rng = ChaCha8Rng::seed_from_u64(6);
        let mut particle = Particle::new();
        particle.init(Vector::default(), &config(), &mut rng);

        for _ in 0..3 {
            particle.update(0.25, &mut rng);
            assert!(particle.is_alive());
            assert!(particle.lifetime() <= particle.initial_lifetime());
        }

        particle.update(0.25, &mut rng);

        assert_eq!(particle.state(), ParticleState::Idle);
        assert_eq!(particle.lifetime(), particle.initial_lifetime());
    }

    #[test]
    fn idle_particle_ignores_updates() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let mut particle = Particle::new();

        particle.update(1.0, &mut rng);

        assert_eq!(particle.position(), Vector::default());
        assert!(!particle.is_alive());
    }

    #[test]
    fn gravity_accelerates_downwards() {
        let mut rng = ChaCha8Rng::seed_from_u64(8);
        let mut config = config();
        config.gravity = 100.0;
        config.velocity = 0.0;
        config.lifetime = 10.0;

        let mut particle = Particle::new();
        particle.init(Vector::default(), &config, &mut rng);
        let start = particle.position();

        particle.update(0.5, &mut rng);

        assert_eq!(particle.velocity().y, 50.0);
        assert_eq!(particle.position().y, start.y + 25.0);
        assert!(particle.velocity().x.abs() <= 5.0);
    }

    #[test]
    fn animation_frame_follows_lifetime() {
        let mut rng = ChaCha8Rng::seed_from_u64(9);
        let mut particle = Particle::new();
        particle.init(Vector::default(), &config(), &mut rng);

        let mut last = 0;
        let mut frames = Vec::new();

        while particle.is_alive() {
            particle.update(0.05, &mut rng);
            let frame = particle.current_frame();

            assert!(frame < 6);
            assert!(frame >= last);

            last = frame;
            frames.push(frame);
        }

        assert_eq!(frames.first(), Some(&0));
        assert_eq!(last, 5);
    }

    #[test]
    fn long_lived_sheet_finishes_after_one_second() {
        let mut rng = ChaCha8Rng::seed_from_u64(12);
        let mut config = config();
        config.lifetime = 2.0;

        let mut particle = Particle::new();
        particle.init(Vector::default(), &config, &mut rng);

        particle.update(0.5, &mut rng);
        assert_eq!(particle.current_frame(), 3);

        particle.update(0.5, &mut rng);
        assert_eq!(particle.current_frame(), 5);

        particle.update(0.5, &mut rng);
        assert!(particle.is_alive());
        assert_eq!(particle.current_frame(), 5);
    }

    #[test]
    fn eased_sheet_lags_linear_playback() {
        let mut rng = ChaCha8Rng::seed_from_u64(13);
        let mut config = config();
        config.sprite.easing = Easing::EaseInQuad;

        let mut particle = Particle::new();
        particle.init(Vector::default(), &config, &mut rng);

        // 6 * 0.5^2 = 1.5
        particle.update(0.5, &mut rng);
        assert_eq!(particle.current_frame(), 1);

        particle.update(0.25, &mut rng);
        assert_eq!(particle.current_frame(), 3);
    }

    #[test]
    fn negative_step_is_ignored() {
        let mut rng = ChaCha8Rng::seed_from_u64(14);
        let mut config = config();
        config.gravity = 100.0;

        let mut particle = Particle::new();
        particle.init(Vector::new(100.0, 50.0), &config, &mut rng);
        let position = particle.position();

        particle.update(-1.0, &mut rng);

        assert!(particle.is_alive());
        assert!(particle.lifetime() <= particle.initial_lifetime());
        assert_eq!(particle.position(), position);
        assert_eq!(particle.current_frame(), 0);
    }

    #[test]
    fn extreme_footprint_does_not_overflow() {
        let mut rng = ChaCha8Rng::seed_from_u64(15);
        let mut config = config();
        config.emission_shape = EmissionShape {
            x: i32::MIN,
            y: i32::MAX,
        };

        let mut particle = Particle::new();
        particle.init(Vector::default(), &config, &mut rng);

        assert!(particle.is_alive());
        assert!(particle.position().is_finite());
        assert!((i32::MIN as f64..=i32::MAX as f64).contains(&particle.position().x));
    }

    #[test]
    fn static_sprite_keeps_first_frame() {
        let mut rng = ChaCha8Rng::seed_from_u64(10);
        let mut config = config();
        config.sprite.max_frames = 1;

        let mut particle = Particle::new();
        particle.init(Vector::default(), &config, &mut rng);
        particle.update(0.9, &mut rng);

        assert_eq!(particle.current_frame(), 0);
    }

    #[test]
    fn draws_current_frame_only_when_alive() {
        let mut rng = ChaCha8Rng::seed_from_u64(11);
        let mut surface = RecordingSurface::default();
        let mut particle = Particle::new();

        particle.draw(&mut surface).unwrap();
        assert!(surface.calls.is_empty());

        particle.init(Vector::new(10.0, 20.0), &config(), &mut rng);
        particle.update(0.5, &mut rng);
        particle.draw(&mut surface).unwrap();

        let call = &surface.calls[0];
        assert_eq!(call.texture, "p2");
        assert_eq!(call.frame.x, 3.0 * 16.0);
        assert_eq!(call.frame.width, 16.0);
        assert_eq!(call.center, particle.position());
        assert_eq!(call.scale, particle.scale());
        assert_eq!(call.rotation, to_radians(particle.angle()));
    }

    #[test]
    fn pool_starts_idle() {
        let pool = ParticlePool::new(50);

        assert_eq!(pool.len(), 50);
        assert_eq!(pool.alive_count(), 0);
        assert!(pool.get(50).is_none());
    }
}
