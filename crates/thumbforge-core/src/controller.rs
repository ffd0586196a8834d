//! The thumbnail form controller.
//!
//! Owns the form state (reference URL, prompt, slider settings, active
//! preset), applies UI events to it, and turns a valid form into a
//! [`Submission`] for the [`Dispatcher`].
//!
//! All methods run synchronously inside UI event callbacks.

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::preset::ActivePreset;
use crate::view::{Dispatcher, FormView};
use crate::workflow::{convert_settings_to_workflow, WorkflowParams};
use crate::{parse_slider_value, SettingField, Settings, SettingsPatch};

/// A UI event delivered to the controller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormEvent {
    /// The reference URL input changed
    ReferenceInput(String),
    /// The prompt input changed
    PromptInput(String),
    /// A slider moved; carries the raw input value
    SliderInput(SettingField, String),
    /// A preset control was clicked; carries its `data-preset` value
    PresetClicked(String),
    /// The generate control was clicked
    GenerateClicked,
}

/// What the user asked for, captured at submission time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationRecord {
    pub reference: String,
    pub prompt: String,
    pub settings: Settings,
    pub preset: ActivePreset,
}

/// A validated request, ready for the generation API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Submission {
    pub record: GenerationRecord,
    pub params: WorkflowParams,
}

/// Form controller, generic over its view and dispatcher.
pub struct ThumbnailController<V, D> {
    view: V,
    dispatcher: D,
    settings: Settings,
    reference_url: String,
    user_prompt: String,
    active_preset: ActivePreset,
}

impl<V: FormView, D: Dispatcher> ThumbnailController<V, D> {
    /// Create a controller with default state: every slider at 50, preset
    /// `balanced`, empty text fields.
    pub fn new(view: V, dispatcher: D) -> Self {
        Self {
            view,
            dispatcher,
            settings: Settings::default(),
            reference_url: String::new(),
            user_prompt: String::new(),
            active_preset: ActivePreset::default(),
        }
    }

    pub fn settings(&self) -> Settings {
        self.settings
    }

    pub fn active_preset(&self) -> &ActivePreset {
        &self.active_preset
    }

    pub fn reference_url(&self) -> &str {
        &self.reference_url
    }

    pub fn user_prompt(&self) -> &str {
        &self.user_prompt
    }

    pub fn view(&self) -> &V {
        &self.view
    }

    /// Route a UI event to the matching operation.
    pub fn handle_event(&mut self, event: FormEvent) {
        match event {
            FormEvent::ReferenceInput(value) => self.set_reference_url(value),
            FormEvent::PromptInput(value) => self.set_user_prompt(value),
            FormEvent::SliderInput(field, raw) => self.set_slider(field, &raw),
            FormEvent::PresetClicked(name) => self.apply_preset(&name),
            FormEvent::GenerateClicked => {
                // The notice has already been shown; nothing else to do here
                let _ = self.generate_thumbnail();
            }
        }
    }

    /// Store the raw reference URL.
    pub fn set_reference_url(&mut self, value: impl Into<String>) {
        self.reference_url = value.into();
    }

    /// Store the raw prompt text.
    pub fn set_user_prompt(&mut self, value: impl Into<String>) {
        self.user_prompt = value.into();
    }

    /// Apply a manual slider movement.
    ///
    /// Any parsed value marks the active preset `custom`, even one equal to
    /// the preset's own value.
    pub fn set_slider(&mut self, field: SettingField, raw: &str) {
        let Some(value) = parse_slider_value(raw) else {
            tracing::warn!(field = %field, raw, "ignoring non-numeric slider value");
            return;
        };
        self.settings.set(field, value);
        self.active_preset = ActivePreset::Custom;
        self.view.highlight_preset(ActivePreset::CUSTOM);
    }

    /// Apply a named preset.
    ///
    /// The name becomes the active identifier even when it matches no preset;
    /// in that case the settings are left untouched.
    pub fn apply_preset(&mut self, name: &str) {
        self.active_preset = ActivePreset::from_name(name);
        self.view.highlight_preset(name);

        match self.active_preset.preset() {
            Some(preset) => {
                tracing::debug!(preset = %preset, "applying preset");
                self.update_settings(&SettingsPatch::from(preset.settings()));
            }
            None => {
                tracing::warn!(preset = name, "unrecognized preset, settings unchanged");
            }
        }
    }

    /// Merge a partial update into the settings and move the touched sliders.
    pub fn update_settings(&mut self, patch: &SettingsPatch) {
        for field in self.settings.merge(patch) {
            self.view.set_slider_value(field, self.settings.get(field));
        }
    }

    /// Build the submission for the current form, or the first reason it is
    /// not ready.
    pub fn prepare_submission(&self) -> Result<Submission, ValidationError> {
        if self.reference_url.is_empty() {
            return Err(ValidationError::MissingReferenceUrl);
        }
        if self.user_prompt.is_empty() {
            return Err(ValidationError::MissingPrompt);
        }

        let record = GenerationRecord {
            reference: self.reference_url.clone(),
            prompt: self.user_prompt.clone(),
            settings: self.settings,
            preset: self.active_preset.clone(),
        };
        let params = convert_settings_to_workflow(&record.settings);
        Ok(Submission { record, params })
    }

    /// Validate the form and hand it to the dispatcher.
    ///
    /// On a validation failure the notice is shown through the view and the
    /// error is returned; nothing is dispatched. The dispatcher returns
    /// immediately, so this never waits on the network.
    pub fn generate_thumbnail(&self) -> Result<(), ValidationError> {
        let submission = match self.prepare_submission() {
            Ok(submission) => submission,
            Err(e) => {
                self.view.alert(&e.to_string());
                return Err(e);
            }
        };

        tracing::info!(
            reference = %submission.record.reference,
            prompt = %submission.record.prompt,
            settings = ?submission.record.settings,
            preset = %submission.record.preset,
            "generating thumbnail"
        );
        tracing::info!(params = ?submission.params, "workflow parameters");

        self.dispatcher.dispatch(submission);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::view::Notifier;
    use crate::Preset;
    use std::cell::RefCell;
    use std::collections::HashMap;
    use std::rc::Rc;

    /// Records everything the controller pushes to the page.
    #[derive(Default)]
    struct FakeView {
        sliders: HashMap<SettingField, u8>,
        highlighted: Option<String>,
        alerts: RefCell<Vec<String>>,
    }

    impl Notifier for FakeView {
        fn alert(&self, message: &str) {
            self.alerts.borrow_mut().push(message.to_string());
        }
    }

    impl FormView for FakeView {
        fn set_slider_value(&mut self, field: SettingField, value: u8) {
            self.sliders.insert(field, value);
        }

        fn highlight_preset(&mut self, name: &str) {
            self.highlighted = Some(name.to_string());
        }
    }

    #[derive(Default)]
    struct RecordingDispatcher {
        submissions: RefCell<Vec<Submission>>,
    }

    impl Dispatcher for RecordingDispatcher {
        fn dispatch(&self, submission: Submission) {
            self.submissions.borrow_mut().push(submission);
        }
    }

    type TestController = ThumbnailController<FakeView, Rc<RecordingDispatcher>>;

    fn controller() -> (TestController, Rc<RecordingDispatcher>) {
        let dispatcher = Rc::new(RecordingDispatcher::default());
        let controller = ThumbnailController::new(FakeView::default(), Rc::clone(&dispatcher));
        (controller, dispatcher)
    }

    #[test]
    fn test_initial_state() {
        let (controller, _) = controller();
        assert_eq!(controller.settings(), Settings::uniform(50));
        assert_eq!(controller.active_preset().as_str(), "balanced");
        assert_eq!(controller.reference_url(), "");
        assert_eq!(controller.user_prompt(), "");
    }

    #[test]
    fn test_each_preset_applies_table() {
        for preset in Preset::ALL {
            let (mut controller, _) = controller();
            controller.set_slider(SettingField::TextSize, "3");

            controller.apply_preset(preset.name());

            assert_eq!(controller.settings(), preset.settings());
            assert_eq!(controller.active_preset(), &ActivePreset::Named(preset));
            assert_eq!(controller.view().highlighted.as_deref(), Some(preset.name()));
            for (field, value) in preset.settings().iter() {
                assert_eq!(controller.view().sliders.get(&field), Some(&value));
            }
        }
    }

    #[test]
    fn test_unrecognized_preset_keeps_settings() {
        let (mut controller, _) = controller();
        controller.apply_preset("subtle");

        controller.apply_preset("psychedelic");

        assert_eq!(controller.settings(), Preset::Subtle.settings());
        assert_eq!(
            controller.active_preset(),
            &ActivePreset::Unrecognized("psychedelic".to_string())
        );
        assert_eq!(controller.view().highlighted.as_deref(), Some("psychedelic"));
    }

    #[test]
    fn test_slider_marks_custom_even_when_value_matches() {
        let (mut controller, _) = controller();
        controller.apply_preset("balanced");

        controller.set_slider(SettingField::ColorIntensity, "50");

        assert_eq!(controller.active_preset(), &ActivePreset::Custom);
        assert_eq!(controller.settings(), Settings::uniform(50));
        assert_eq!(controller.view().highlighted.as_deref(), Some("custom"));
    }

    #[test]
    fn test_slider_does_not_move_other_sliders() {
        let (mut controller, _) = controller();
        controller.set_slider(SettingField::FaceEmphasis, "12");
        assert!(controller.view().sliders.is_empty());
    }

    #[test]
    fn test_non_numeric_slider_is_ignored() {
        let (mut controller, _) = controller();
        controller.set_slider(SettingField::Exaggeration, "loud");
        assert_eq!(controller.settings(), Settings::default());
        assert_eq!(controller.active_preset().as_str(), "balanced");
    }

    #[test]
    fn test_text_fields_store_raw_values() {
        let (mut controller, _) = controller();
        controller.handle_event(FormEvent::ReferenceInput("  https://x/y.png ".into()));
        controller.handle_event(FormEvent::PromptInput("cat".into()));
        assert_eq!(controller.reference_url(), "  https://x/y.png ");
        assert_eq!(controller.user_prompt(), "cat");
    }

    #[test]
    fn test_missing_reference_blocks_submission() {
        let (mut controller, dispatcher) = controller();
        controller.set_user_prompt("a dog on a skateboard");

        let result = controller.generate_thumbnail();

        assert_eq!(result, Err(ValidationError::MissingReferenceUrl));
        assert_eq!(
            *controller.view().alerts.borrow(),
            vec!["Please enter a reference thumbnail URL".to_string()]
        );
        assert!(dispatcher.submissions.borrow().is_empty());
    }

    #[test]
    fn test_missing_prompt_blocks_submission() {
        let (mut controller, dispatcher) = controller();
        controller.set_reference_url("https://example.com/ref.jpg");

        let result = controller.generate_thumbnail();

        assert_eq!(result, Err(ValidationError::MissingPrompt));
        assert_eq!(
            *controller.view().alerts.borrow(),
            vec!["Please enter a prompt for your thumbnail".to_string()]
        );
        assert!(dispatcher.submissions.borrow().is_empty());
    }

    #[test]
    fn test_reference_checked_before_prompt() {
        let (controller, _) = controller();
        assert_eq!(
            controller.generate_thumbnail(),
            Err(ValidationError::MissingReferenceUrl)
        );
        assert_eq!(controller.view().alerts.borrow().len(), 1);
    }

    #[test]
    fn test_valid_submission_dispatches_once() {
        let (mut controller, dispatcher) = controller();
        controller.set_reference_url("https://example.com/ref.jpg");
        controller.set_user_prompt("mountain sunrise");
        controller.set_slider(SettingField::ColorIntensity, "80");

        controller.handle_event(FormEvent::GenerateClicked);

        let submissions = dispatcher.submissions.borrow();
        assert_eq!(submissions.len(), 1);
        let submission = &submissions[0];
        assert_eq!(
            submission.params,
            convert_settings_to_workflow(&controller.settings())
        );
        assert_eq!(submission.record.reference, "https://example.com/ref.jpg");
        assert_eq!(submission.record.prompt, "mountain sunrise");
        assert_eq!(submission.record.preset, ActivePreset::Custom);
        assert!(controller.view().alerts.borrow().is_empty());
    }

    #[test]
    fn test_submission_snapshot_is_independent() {
        let (mut controller, dispatcher) = controller();
        controller.set_reference_url("r");
        controller.set_user_prompt("p");
        controller.generate_thumbnail().unwrap();

        controller.apply_preset("extreme");

        let submissions = dispatcher.submissions.borrow();
        assert_eq!(submissions[0].record.settings, Settings::default());
        assert_eq!(submissions[0].record.preset.as_str(), "balanced");
    }

    #[test]
    fn test_end_to_end_extreme() {
        let (mut controller, dispatcher) = controller();

        controller.handle_event(FormEvent::PresetClicked("extreme".into()));

        assert_eq!(
            controller.settings(),
            Settings {
                exaggeration: 100,
                color_intensity: 90,
                face_emphasis: 95,
                object_scaling: 85,
                text_size: 90,
            }
        );

        controller.handle_event(FormEvent::ReferenceInput("https://a/b.png".into()));
        controller.handle_event(FormEvent::PromptInput("epic".into()));
        controller.handle_event(FormEvent::GenerateClicked);

        let submissions = dispatcher.submissions.borrow();
        let multiplier = submissions[0].params.text_params.size_multiplier;
        assert!((multiplier - 1.45).abs() < 1e-12);
        assert_eq!(submissions[0].record.preset.as_str(), "extreme");
    }

    #[test]
    fn test_update_settings_moves_only_patched_sliders() {
        let (mut controller, _) = controller();
        let patch = SettingsPatch::default().with(SettingField::ObjectScaling, 70);

        controller.update_settings(&patch);

        assert_eq!(controller.settings().object_scaling, 70);
        assert_eq!(controller.view().sliders.len(), 1);
        assert_eq!(
            controller.view().sliders.get(&SettingField::ObjectScaling),
            Some(&70)
        );
    }
}

// ============================================================================
// Property-Based Tests
// ============================================================================

#[cfg(test)]
mod proptests {
    use super::*;
    use crate::view::Notifier;
    use crate::Preset;
    use proptest::prelude::*;

    struct NullView;

    impl Notifier for NullView {
        fn alert(&self, _message: &str) {}
    }

    impl FormView for NullView {
        fn set_slider_value(&mut self, _field: SettingField, _value: u8) {}
        fn highlight_preset(&mut self, _name: &str) {}
    }

    struct NullDispatcher;

    impl Dispatcher for NullDispatcher {
        fn dispatch(&self, _submission: Submission) {}
    }

    fn field_strategy() -> impl Strategy<Value = SettingField> {
        prop::sample::select(SettingField::ALL.to_vec())
    }

    fn preset_strategy() -> impl Strategy<Value = Preset> {
        prop::sample::select(Preset::ALL.to_vec())
    }

    proptest! {
        /// Property: Moving one slider sets it, leaves the other four alone,
        /// and marks the preset custom.
        #[test]
        fn prop_slider_touches_only_its_field(
            preset in preset_strategy(),
            field in field_strategy(),
            value in 0u8..=100,
        ) {
            let mut controller = ThumbnailController::new(NullView, NullDispatcher);
            controller.apply_preset(preset.name());
            let before = controller.settings();

            controller.set_slider(field, &value.to_string());

            let after = controller.settings();
            prop_assert_eq!(after.get(field), value);
            for other in SettingField::ALL.into_iter().filter(|f| *f != field) {
                prop_assert_eq!(after.get(other), before.get(other));
            }
            prop_assert_eq!(controller.active_preset(), &ActivePreset::Custom);
        }
    }
}
