use std::collections::HashMap;

use futures::future::try_join_all;
use serde::Deserialize;
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys::{console, HtmlImageElement};

use crate::{app::AppError, document, RESOURCE_BASE_URL};

/// One entry of the texture manifest.
#[derive(Debug, Deserialize)]
struct TextureEntry {
    key: String,
    path: String,
}

/// Decoded images, keyed by the names emitter presets refer to.
#[derive(Clone, Debug, Default)]
pub struct TextureSystem {
    textures: HashMap<String, HtmlImageElement>,
}

impl TextureSystem {
    /// Loads and decodes a single image.
    async fn load_texture(key: String, url: String) -> Result<(String, HtmlImageElement), JsValue> {
        let image = document()
            .create_element("img")?
            .dyn_into::<HtmlImageElement>()?;

        image.set_src(&url);

        JsFuture::from(image.decode()).await?;

        console::log_1(
            &format!(
                "texture `{key}` {}x{} from {url}",
                image.natural_width(),
                image.natural_height()
            )
            .into(),
        );

        Ok((key, image))
    }

    /// Preloads every texture listed in a JSON `manifest`. Resolves once all are decoded.
    pub async fn populate(&mut self, manifest: &str) -> Result<(), JsValue> {
        let entries: Vec<TextureEntry> = serde_json::from_str(manifest).map_err(AppError::from)?;

        let textures = try_join_all(entries.into_iter().map(|entry| {
            TextureSystem::load_texture(entry.key, format!("{RESOURCE_BASE_URL}{}", entry.path))
        }))
        .await?;

        self.textures.extend(textures);

        Ok(())
    }

    pub fn get(&self, key: &str) -> Option<&HtmlImageElement> {
        self.textures.get(key)
    }
}
