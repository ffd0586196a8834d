//! DOM side of the controller: element lookup and the [`FormView`] impl.

use thiserror::Error;
use thumbforge_core::{FormView, Notifier, SettingField};
use wasm_bindgen::JsCast;
use web_sys::{Document, HtmlElement, HtmlInputElement, Window};

use crate::config::ElementIds;

/// A required page element could not be bound. Fatal for `mount()`.
#[derive(Debug, Error)]
pub enum BindError {
    #[error("No window or document available")]
    NoDocument,

    #[error("Missing required element: {0}")]
    MissingElement(String),

    #[error("Element #{0} is not an <input>")]
    NotAnInput(String),

    #[error("Element #{0} is not an HTML element")]
    NotHtml(String),

    #[error("Invalid selector: {0}")]
    InvalidSelector(String),
}

/// Every element the controller needs, looked up once at mount time.
pub struct BoundElements {
    pub window: Window,
    pub reference_input: HtmlInputElement,
    pub prompt_input: HtmlInputElement,
    pub sliders: Vec<(SettingField, HtmlInputElement)>,
    pub preset_buttons: Vec<HtmlElement>,
    pub generate_button: HtmlElement,
}

impl BoundElements {
    /// Look up all elements in the current document.
    pub fn bind(ids: &ElementIds) -> Result<Self, BindError> {
        let window = web_sys::window().ok_or(BindError::NoDocument)?;
        let document = window.document().ok_or(BindError::NoDocument)?;

        let sliders = SettingField::ALL
            .into_iter()
            .map(|field| Ok((field, input_by_id(&document, ids.sliders.id(field))?)))
            .collect::<Result<Vec<_>, BindError>>()?;

        Ok(Self {
            reference_input: input_by_id(&document, &ids.reference_url)?,
            prompt_input: input_by_id(&document, &ids.user_prompt)?,
            sliders,
            preset_buttons: elements_by_selector(&document, &ids.preset_selector)?,
            generate_button: html_by_id(&document, &ids.generate_button)?,
            window,
        })
    }
}

fn html_by_id(document: &Document, id: &str) -> Result<HtmlElement, BindError> {
    document
        .get_element_by_id(id)
        .ok_or_else(|| BindError::MissingElement(format!("#{id}")))?
        .dyn_into::<HtmlElement>()
        .map_err(|_| BindError::NotHtml(id.to_string()))
}

fn input_by_id(document: &Document, id: &str) -> Result<HtmlInputElement, BindError> {
    html_by_id(document, id)?
        .dyn_into::<HtmlInputElement>()
        .map_err(|_| BindError::NotAnInput(id.to_string()))
}

/// All HTML elements matching `selector`; at least one is required.
fn elements_by_selector(document: &Document, selector: &str) -> Result<Vec<HtmlElement>, BindError> {
    let nodes = document
        .query_selector_all(selector)
        .map_err(|_| BindError::InvalidSelector(selector.to_string()))?;
    let elements: Vec<HtmlElement> = (0..nodes.length())
        .filter_map(|i| nodes.item(i))
        .filter_map(|node| node.dyn_into::<HtmlElement>().ok())
        .collect();
    if elements.is_empty() {
        return Err(BindError::MissingElement(selector.to_string()));
    }
    Ok(elements)
}

/// Read a button's preset name from its `data-*` attribute.
pub fn preset_name(button: &HtmlElement, attribute: &str) -> String {
    button.dataset().get(attribute).unwrap_or_default()
}

/// Blocking notices through `window.alert`.
#[derive(Clone)]
pub struct WindowNotifier {
    window: Window,
}

impl WindowNotifier {
    pub fn new(window: Window) -> Self {
        Self { window }
    }
}

impl Notifier for WindowNotifier {
    fn alert(&self, message: &str) {
        if self.window.alert_with_message(message).is_err() {
            tracing::warn!(message, "alert could not be shown");
        }
    }
}

/// [`FormView`] over the bound sliders and preset buttons.
pub struct DomView {
    notifier: WindowNotifier,
    sliders: Vec<(SettingField, HtmlInputElement)>,
    preset_buttons: Vec<HtmlElement>,
    preset_attribute: String,
    active_class: String,
}

impl DomView {
    pub fn new(elements: &BoundElements, ids: &ElementIds) -> Self {
        Self {
            notifier: WindowNotifier::new(elements.window.clone()),
            sliders: elements.sliders.clone(),
            preset_buttons: elements.preset_buttons.clone(),
            preset_attribute: ids.preset_attribute.clone(),
            active_class: ids.active_class.clone(),
        }
    }
}

impl Notifier for DomView {
    fn alert(&self, message: &str) {
        self.notifier.alert(message);
    }
}

impl FormView for DomView {
    fn set_slider_value(&mut self, field: SettingField, value: u8) {
        if let Some((_, slider)) = self.sliders.iter().find(|(f, _)| *f == field) {
            slider.set_value(&value.to_string());
        }
    }

    fn highlight_preset(&mut self, name: &str) {
        for button in &self.preset_buttons {
            let active = preset_name(button, &self.preset_attribute) == name;
            if button
                .class_list()
                .toggle_with_force(&self.active_class, active)
                .is_err()
            {
                tracing::warn!(class = %self.active_class, "could not toggle preset class");
            }
        }
    }
}
