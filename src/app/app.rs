use shared::{ConfigError, EmissionConfig, Emitter, EmitterState, ParticlePool, Surface, Vector};
use wasm_bindgen::JsValue;
use web_sys::{CanvasRenderingContext2d, DomRect, MouseEvent};

use super::Pointer;
use crate::{
    draw::{isolated, CanvasSurface},
    texture::TextureSystem,
    CANVAS_HEIGHT, CANVAS_SCALE, CANVAS_WIDTH, DRIZZLE_POOL_SIZE, ELEMENT_HEIGHT, ELEMENT_WIDTH,
    SPARKLE_POOL_SIZE,
};

/// Errors concerning the [`App`].
#[derive(Debug)]
pub struct AppError(String);

impl From<ConfigError> for AppError {
    fn from(config_error: ConfigError) -> Self {
        AppError(format!("ConfigError: {0}", config_error.0))
    }
}

impl From<serde_json::Error> for AppError {
    fn from(error: serde_json::Error) -> Self {
        AppError(format!("malformed manifest: {error}"))
    }
}

impl From<AppError> for JsValue {
    fn from(app_error: AppError) -> Self {
        JsValue::from_str(&app_error.0)
    }
}

/// Emitter presets shipped with the page.
pub struct Presets {
    pub drizzle: EmissionConfig,
    pub sparkle: EmissionConfig,
}

impl Presets {
    pub fn load() -> Result<Presets, AppError> {
        Ok(Presets {
            drizzle: EmissionConfig::from_json(include_str!("../../static/emitters/drizzle.json"))?,
            sparkle: EmissionConfig::from_json(include_str!("../../static/emitters/sparkle.json"))?,
        })
    }
}

/// An emitter together with the pool it draws from and where it spawns.
struct Effect {
    emitter: Emitter,
    pool: ParticlePool,
    config: EmissionConfig,
    origin: Vector,
}

impl Effect {
    fn new(config: EmissionConfig, pool_size: usize, origin: Vector) -> Effect {
        Effect {
            emitter: Emitter::new(random_seed()),
            pool: ParticlePool::new(pool_size),
            config,
            origin,
        }
    }

    fn tick(&mut self, delta_time: f64) {
        self.emitter
            .update(delta_time, self.origin, &self.config, &mut self.pool);
    }

    fn draw<S: Surface>(&self, surface: &mut S) -> Result<(), S::Error> {
        self.emitter.draw(&self.pool, surface)
    }
}

fn random_seed() -> u64 {
    (js_sys::Math::random() * u32::MAX as f64) as u64
}

pub struct App {
    pointer: Pointer,
    drizzle: Effect,
    sparkle: Effect,
}

impl App {
    pub fn new(presets: Presets) -> App {
        let mut drizzle = Effect::new(
            presets.drizzle,
            DRIZZLE_POOL_SIZE,
            Vector::new(CANVAS_WIDTH as f64, 0.0),
        );
        drizzle.emitter.start();

        App {
            pointer: Pointer::new(),
            drizzle,
            sparkle: Effect::new(presets.sparkle, SPARKLE_POOL_SIZE, Vector::default()),
        }
    }

    pub fn tick(&mut self, delta_time: f64) {
        if self.pointer.clicked() && self.sparkle.emitter.state() == EmitterState::Stopped {
            self.sparkle.origin = self.pointer.position();
            self.sparkle.emitter.start();
        }

        self.drizzle.tick(delta_time);
        self.sparkle.tick(delta_time);

        self.pointer.swap();
    }

    pub fn draw(
        &self,
        context: &CanvasRenderingContext2d,
        textures: &TextureSystem,
    ) -> Result<(), JsValue> {
        let mut surface = CanvasSurface::new(context, textures);

        isolated(context, || {
            context.scale(CANVAS_SCALE as f64, CANVAS_SCALE as f64)?;
            self.draw_effects(&mut surface)
        })
    }

    fn draw_effects<S: Surface>(&self, surface: &mut S) -> Result<(), S::Error> {
        surface.clear_rect(0.0, 0.0, CANVAS_WIDTH as f64, CANVAS_HEIGHT as f64)?;

        self.drizzle.draw(surface)?;
        self.sparkle.draw(surface)
    }

    pub fn on_mouse_down(&mut self, event: MouseEvent) {
        if event.button() == 0 {
            self.pointer.button = true;
        }
    }

    pub fn on_mouse_up(&mut self, event: MouseEvent) {
        if event.button() == 0 {
            self.pointer.button = false;
        }
    }

    pub fn on_mouse_move(&mut self, bound: &DomRect, event: MouseEvent) {
        let x = event.client_x() - bound.left() as i32;
        let y = event.client_y() - bound.top() as i32;
        let x = (x as f64 * (ELEMENT_WIDTH as f64 / bound.width())) as i32;
        let y = (y as f64 * (ELEMENT_HEIGHT as f64 / bound.height())) as i32;

        self.pointer.set_real((x, y));

        event.prevent_default();
    }
}
