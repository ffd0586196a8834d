//! The mounted thumbnail form.
//!
//! `mount()` binds the page elements, builds the controller and wires every
//! input, slider, preset button and the generate button to it. The returned
//! [`ThumbnailApp`] owns the listeners: dropping (or `free()`-ing) it detaches
//! the form again.

use std::cell::RefCell;
use std::rc::Rc;

use gloo::events::EventListener;
use js_sys::Function;
use serde::Serialize;
use thumbforge_core::{FormEvent, HttpGenerationApi, ThumbnailController};
use wasm_bindgen::prelude::*;
use web_sys::{EventTarget, HtmlInputElement, Window};

use crate::config::{ElementIds, MountConfig};
use crate::dispatch::{ResultCallback, SpawnDispatcher};
use crate::dom::{preset_name, BoundElements, DomView, WindowNotifier};
use crate::logging::init_logging;

type Controller = ThumbnailController<DomView, SpawnDispatcher>;
type SharedController = Rc<RefCell<Controller>>;

/// Run `f` on the controller unless it is already busy.
///
/// Events never nest in practice; a nested one is dropped rather than
/// panicking on the `RefCell`.
fn with_controller<R>(
    controller: &SharedController,
    f: impl FnOnce(&mut Controller) -> R,
) -> Option<R> {
    match controller.try_borrow_mut() {
        Ok(mut controller) => Some(f(&mut controller)),
        Err(_) => {
            tracing::warn!("controller busy, event dropped");
            None
        }
    }
}

/// Subscribe `target` to `event_type`, turning each event into a [`FormEvent`].
fn listen(
    controller: &SharedController,
    target: &EventTarget,
    event_type: &'static str,
    to_event: impl Fn() -> FormEvent + 'static,
) -> EventListener {
    let controller = Rc::clone(controller);
    EventListener::new(target, event_type, move |_| {
        with_controller(&controller, |c| c.handle_event(to_event()));
    })
}

/// Listener that reports an input's current value on every `input` event.
fn listen_input(
    controller: &SharedController,
    input: &HtmlInputElement,
    to_event: impl Fn(String) -> FormEvent + 'static,
) -> EventListener {
    let source = input.clone();
    listen(controller, input, "input", move || to_event(source.value()))
}

/// A thumbnail form bound to the page.
#[wasm_bindgen]
pub struct ThumbnailApp {
    controller: SharedController,
    on_result: ResultCallback,
    _listeners: Vec<EventListener>,
}

/// Bind the controller to the page.
///
/// # Arguments
/// * `config` - Optional [`MountConfig`] object; omitted fields use defaults
///
/// # Errors
/// Fails if the config is malformed or a required element is missing.
///
/// # Example (TypeScript)
/// ```typescript
/// import init, { mount } from '@thumbforge/wasm';
///
/// await init();
/// const app = mount({ api: { endpoint: 'http://localhost:5000' } });
/// app.on_result((result) => console.log(result.status));
/// ```
#[wasm_bindgen]
pub fn mount(config: JsValue) -> Result<ThumbnailApp, JsValue> {
    let config = MountConfig::from_js(config)?;
    init_logging(config.max_level());
    ThumbnailApp::mount_with(config).map_err(|e| JsValue::from_str(&e.to_string()))
}

impl ThumbnailApp {
    /// Read from the controller, failing instead of panicking mid-event.
    fn read<R>(&self, f: impl FnOnce(&Controller) -> R) -> Result<R, JsValue> {
        self.controller
            .try_borrow()
            .map(|controller| f(&controller))
            .map_err(|_| JsValue::from_str("thumbnail form is busy"))
    }

    fn mount_with(mut config: MountConfig) -> Result<Self, crate::dom::BindError> {
        let elements = BoundElements::bind(&config.elements)?;

        if config.api.client_id.is_none() {
            config.api.client_id = random_client_id(&elements.window);
        }
        tracing::info!(
            endpoint = %config.api.endpoint,
            api_target = ?config.api.target,
            "mounting thumbnail form"
        );

        let on_result: ResultCallback = Rc::new(RefCell::new(None));
        let dispatcher = SpawnDispatcher::new(
            HttpGenerationApi::new(config.api.clone()),
            WindowNotifier::new(elements.window.clone()),
            Rc::clone(&on_result),
        );
        let view = DomView::new(&elements, &config.elements);
        let controller = Rc::new(RefCell::new(ThumbnailController::new(view, dispatcher)));

        let listeners = wire_listeners(&controller, &elements, &config.elements);
        Ok(Self {
            controller,
            on_result,
            _listeners: listeners,
        })
    }
}

fn wire_listeners(
    controller: &SharedController,
    elements: &BoundElements,
    ids: &ElementIds,
) -> Vec<EventListener> {
    let mut listeners = vec![
        listen_input(controller, &elements.reference_input, FormEvent::ReferenceInput),
        listen_input(controller, &elements.prompt_input, FormEvent::PromptInput),
    ];

    for (field, slider) in &elements.sliders {
        let field = *field;
        listeners.push(listen_input(controller, slider, move |raw| {
            FormEvent::SliderInput(field, raw)
        }));
    }

    for button in &elements.preset_buttons {
        let source = button.clone();
        let attribute = ids.preset_attribute.clone();
        listeners.push(listen(controller, button, "click", move || {
            FormEvent::PresetClicked(preset_name(&source, &attribute))
        }));
    }

    listeners.push(listen(controller, &elements.generate_button, "click", || {
        FormEvent::GenerateClicked
    }));
    listeners
}

/// ComfyUI client id from `crypto.randomUUID()`, if available.
fn random_client_id(window: &Window) -> Option<String> {
    window.crypto().ok().map(|crypto| crypto.random_uuid())
}

#[wasm_bindgen]
impl ThumbnailApp {
    /// Current slider settings as a plain object
    pub fn settings(&self) -> Result<JsValue, JsValue> {
        let settings = self.read(|c| c.settings())?;
        settings
            .serialize(&serde_wasm_bindgen::Serializer::json_compatible())
            .map_err(|e| JsValue::from_str(&e.to_string()))
    }

    /// Name of the active preset (`custom` after a manual slider change)
    pub fn active_preset(&self) -> Result<String, JsValue> {
        self.read(|c| c.active_preset().to_string())
    }

    /// Apply a preset as if its button had been clicked
    pub fn apply_preset(&self, name: &str) {
        with_controller(&self.controller, |c| c.apply_preset(name));
    }

    /// Submit the form as if the generate button had been clicked.
    ///
    /// Returns `true` if the request was dispatched.
    pub fn generate(&self) -> bool {
        with_controller(&self.controller, |c| c.generate_thumbnail().is_ok()).unwrap_or(false)
    }

    /// Register a callback receiving `{status: "image", image}` or
    /// `{status: "queued", promptId}` after each successful request
    pub fn on_result(&self, callback: Function) {
        *self.on_result.borrow_mut() = Some(callback);
    }
}

#[cfg(all(test, target_arch = "wasm32"))]
mod wasm_tests {
    use super::*;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    const FORM: &str = r#"
        <input id="referenceUrl"><input id="userPrompt">
        <input id="exaggeration" type="range"><input id="colorIntensity" type="range">
        <input id="faceEmphasis" type="range"><input id="objectScaling" type="range">
        <input id="textSize" type="range">
        <button class="preset-btn" data-preset="subtle"></button>
        <button class="preset-btn" data-preset="extreme"></button>
        <button id="generateBtn"></button>
    "#;

    fn mounted() -> ThumbnailApp {
        let body = web_sys::window()
            .and_then(|w| w.document())
            .and_then(|d| d.body())
            .unwrap();
        body.set_inner_html(FORM);
        ThumbnailApp::mount_with(MountConfig::default()).unwrap()
    }

    #[wasm_bindgen_test]
    fn test_apply_preset_through_handle() {
        let app = mounted();
        app.apply_preset("extreme");
        assert_eq!(app.active_preset().unwrap(), "extreme");
    }

    #[wasm_bindgen_test]
    fn test_accessors_fail_while_controller_busy() {
        let app = mounted();
        let _busy = app.controller.borrow_mut();

        assert!(app.active_preset().is_err());
        assert!(app.settings().is_err());
    }
}
