//! JavaScript bindings for the extension's background script.
//!
//! This module is only available with the `wasm` feature enabled:
//!
//! ```toml
//! [dependencies]
//! addr-badge = { version = "0.1", features = ["wasm"] }
//! ```
//!
//! # Example (JavaScript)
//!
//! ```javascript
//! import init, { IconRenderer } from 'addr-badge';
//!
//! await init();
//!
//! const fetchBytes = async (name) => {
//!   const response = await fetch(chrome.runtime.getURL(name));
//!   return new Uint8Array(await response.arrayBuffer());
//! };
//! const renderer = IconRenderer.fromPng(
//!   await fetchBytes('sprites16.png'),
//!   await fetchBytes('sprites32.png'),
//! );
//!
//! const pixels = renderer.buildIcon('46', 16, 'lightfg');
//! const imageData = new ImageData(new Uint8ClampedArray(pixels.buffer), 16, 16);
//! ```

use wasm_bindgen::prelude::*;

use crate::atlas::SpriteAtlas;
use crate::compositor::{ColorScheme, IconCompositor};
use crate::options::{OptionName, OptionsSnapshot};

/// An [`IconCompositor`] exposed to JavaScript.
#[wasm_bindgen]
pub struct IconRenderer {
    compositor: IconCompositor,
}

#[wasm_bindgen]
impl IconRenderer {
    /// Creates a renderer from the PNG bytes of both sprite sheets.
    #[wasm_bindgen(js_name = "fromPng")]
    pub fn from_png(png16: &[u8], png32: &[u8]) -> Result<IconRenderer, JsError> {
        let atlas = SpriteAtlas::from_png(png16, png32)?;
        Ok(Self {
            compositor: IconCompositor::with_atlas(atlas),
        })
    }

    /// Renders `pattern` and returns `size * size * 4` RGBA bytes.
    ///
    /// `color` is `"darkfg"` or `"lightfg"`.
    #[wasm_bindgen(js_name = "buildIcon")]
    pub fn build_icon(&mut self, pattern: &str, size: u32, color: &str) -> Result<Vec<u8>, JsError> {
        let scheme: ColorScheme = color.parse()?;
        let icon = self.compositor.build_icon(pattern, size, scheme)?;
        Ok(icon.into_raw())
    }
}

/// Default options as a JSON object, for seeding the options page.
#[wasm_bindgen(js_name = "defaultOptionsJson")]
pub fn default_options_json() -> Result<String, JsError> {
    Ok(OptionsSnapshot::default().to_json()?)
}

/// Storage keys of every recognized option.
#[wasm_bindgen(js_name = "optionKeys")]
pub fn option_keys() -> Vec<String> {
    OptionName::ALL.iter().map(|name| name.key().to_owned()).collect()
}
