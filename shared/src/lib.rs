mod config;
pub use config::*;

mod emitter;
pub use emitter::*;

mod math;
pub use math::*;

mod particle;
pub use particle::*;

mod surface;
pub use surface::*;
