mod app;
mod draw;
mod texture;

use std::{
    cell::{Cell, RefCell},
    rc::Rc,
};

use app::{App, Presets};
use texture::TextureSystem;
use wasm_bindgen::{prelude::*, JsCast};
use web_sys::console;

pub const CANVAS_WIDTH: u32 = 320;
pub const CANVAS_HEIGHT: u32 = 180;
pub const CANVAS_SCALE: u32 = 2;
pub const ELEMENT_WIDTH: u32 = CANVAS_WIDTH * CANVAS_SCALE;
pub const ELEMENT_HEIGHT: u32 = CANVAS_HEIGHT * CANVAS_SCALE;

pub const DRIZZLE_POOL_SIZE: usize = 50;
pub const SPARKLE_POOL_SIZE: usize = 16;

pub const RESOURCE_BASE_URL: &str = "./static";

/// Longest step simulated in one frame, in seconds.
const MAX_DELTA_TIME: f64 = 0.1;

fn window() -> web_sys::Window {
    web_sys::window().expect("no global `window` exists")
}

fn request_animation_frame(f: &Closure<dyn FnMut()>) {
    window()
        .request_animation_frame(f.as_ref().unchecked_ref())
        .expect("should register `requestAnimationFrame` OK");
}

fn document() -> web_sys::Document {
    window()
        .document()
        .expect("should have a document on window")
}

/// Milliseconds since page load.
fn now() -> f64 {
    window()
        .performance()
        .expect("should have a performance clock on window")
        .now()
}

#[wasm_bindgen(start)]
fn start() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();

    wasm_bindgen_futures::spawn_local(async {
        if let Err(err) = run().await {
            console::error_1(&err);
        }
    });

    Ok(())
}

async fn run() -> Result<(), JsValue> {
    let canvas = document()
        .create_element("canvas")?
        .dyn_into::<web_sys::HtmlCanvasElement>()?;

    let container_element = document()
        .query_selector("main")?
        .ok_or_else(|| JsValue::from_str("page has no <main> element"))?;
    container_element.append_child(&canvas)?;

    canvas.set_width(ELEMENT_WIDTH);
    canvas.set_height(ELEMENT_HEIGHT);

    let context = canvas
        .get_context("2d")?
        .ok_or_else(|| JsValue::from_str("canvas has no 2d context"))?
        .dyn_into::<web_sys::CanvasRenderingContext2d>()?;

    context.set_image_smoothing_enabled(false);

    let mut textures = TextureSystem::default();
    textures
        .populate(include_str!("../static/textures.json"))
        .await?;

    let presets = Presets::load()?;
    console::log_1(&"emitter presets loaded".into());

    let app = Rc::new(RefCell::new(App::new(presets)));

    let f = Rc::new(RefCell::new(None));
    let g = f.clone();

    {
        let app = app.clone();
        let previous = Cell::new(now());

        *g.borrow_mut() = Some(Closure::new(move || {
            let current = now();
            let delta_time =
                ((current - previous.replace(current)) / 1000.0).clamp(0.0, MAX_DELTA_TIME);

            let mut app = app.borrow_mut();

            app.tick(delta_time);

            if let Err(err) = app.draw(&context, &textures) {
                console::error_1(&err);
            }

            request_animation_frame(f.borrow().as_ref().unwrap());
        }));

        request_animation_frame(g.borrow().as_ref().unwrap());
    }

    {
        let app = app.clone();
        let closure = Closure::<dyn FnMut(_)>::new(move |event: web_sys::MouseEvent| {
            app.borrow_mut().on_mouse_down(event);
        });
        canvas.add_event_listener_with_callback("mousedown", closure.as_ref().unchecked_ref())?;
        closure.forget();
    }

    {
        let app = app.clone();
        let closure = Closure::<dyn FnMut(_)>::new(move |event: web_sys::MouseEvent| {
            app.borrow_mut().on_mouse_up(event);
        });
        document().add_event_listener_with_callback("mouseup", closure.as_ref().unchecked_ref())?;
        closure.forget();
    }

    let canvas = Rc::new(canvas);
    let bound: Rc<RefCell<web_sys::DomRect>> =
        Rc::new(RefCell::new(canvas.get_bounding_client_rect()));

    {
        let canvas = canvas.clone();
        let bound = bound.clone();
        let closure = Closure::<dyn FnMut(_)>::new(move |_: JsValue| {
            bound.replace(canvas.get_bounding_client_rect());
        });
        window().add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref())?;
        closure.forget();
    }

    {
        let app = app.clone();
        let bound = bound.clone();
        let closure = Closure::<dyn FnMut(_)>::new(move |event: web_sys::MouseEvent| {
            app.borrow_mut().on_mouse_move(&bound.borrow(), event);
        });
        document()
            .add_event_listener_with_callback("mousemove", closure.as_ref().unchecked_ref())?;
        closure.forget();
    }

    Ok(())
}
