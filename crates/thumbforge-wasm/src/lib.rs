//! Thumbforge WASM - browser bindings for the thumbnail form
//!
//! This crate mounts the `thumbforge-core` controller on a page and exposes
//! the pure parameter derivation to JavaScript/TypeScript.
//!
//! # Module Structure
//!
//! - `app` - `mount()` and the `ThumbnailApp` handle
//! - `config` - mount configuration (element ids, API endpoint, log level)
//! - `dom` - element lookup and the DOM-backed form view
//! - `dispatch` - fire-and-forget generation requests
//! - `logging` - console logger (installed by `mount()`) and panic hook
//! - `workflow` - settings/preset/graph conversion bindings
//!
//! # Usage
//!
//! ```typescript
//! import init, { mount } from '@thumbforge/wasm';
//!
//! await init();
//! const app = mount();           // default element ids, relay on :5000
//! app.apply_preset('extreme');
//! console.log(app.settings());   // { exaggeration: 100, colorIntensity: 90, ... }
//! ```

use wasm_bindgen::prelude::*;

mod app;
mod config;
mod dispatch;
mod dom;
mod logging;
mod workflow;

// Re-export public types
pub use app::{mount, ThumbnailApp};
pub use config::{ElementIds, MountConfig, SliderIds};
pub use dom::BindError;
pub use workflow::{build_workflow_graph, convert_settings_to_workflow, preset_settings};

/// Runs when the module is instantiated
#[wasm_bindgen(start)]
pub fn init() {
    logging::init_panic_hook();
}

/// Get the version of the WASM module
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
