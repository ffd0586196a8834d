//! Fire-and-forget dispatch on the browser executor.

use std::cell::RefCell;
use std::rc::Rc;

use gloo::timers::future::TimeoutFuture;
use js_sys::Function;
use serde::Serialize;
use thumbforge_core::{
    dispatch_and_report, Dispatcher, GenerationApi, GenerationOutcome, HttpGenerationApi,
    Submission,
};
use wasm_bindgen::JsValue;
use wasm_bindgen_futures::spawn_local;

use crate::dom::WindowNotifier;

/// JavaScript callback slot for generation results.
pub type ResultCallback = Rc<RefCell<Option<Function>>>;

/// Spawns every submission onto the microtask queue and returns at once.
pub struct SpawnDispatcher<A = HttpGenerationApi> {
    api: Rc<A>,
    notifier: WindowNotifier,
    on_result: ResultCallback,
}

impl<A> SpawnDispatcher<A> {
    pub fn new(api: A, notifier: WindowNotifier, on_result: ResultCallback) -> Self {
        Self {
            api: Rc::new(api),
            notifier,
            on_result,
        }
    }
}

impl<A: GenerationApi + 'static> Dispatcher for SpawnDispatcher<A> {
    fn dispatch(&self, submission: Submission) {
        let api = Rc::clone(&self.api);
        let notifier = self.notifier.clone();
        let on_result = Rc::clone(&self.on_result);

        spawn_local(async move {
            let outcome =
                dispatch_and_report(api.as_ref(), &notifier, &submission, TimeoutFuture::new).await;
            if let Some(outcome) = outcome {
                notify_result(&on_result, &outcome);
            }
        });
    }
}

/// Hand the outcome to the page's `on_result` callback, if one is set.
fn notify_result(on_result: &ResultCallback, outcome: &GenerationOutcome) {
    let Some(callback) = on_result.borrow().clone() else {
        return;
    };
    let serializer = serde_wasm_bindgen::Serializer::json_compatible();
    let value = match outcome.serialize(&serializer) {
        Ok(value) => value,
        Err(e) => {
            tracing::error!(error = %e, "could not convert generation result");
            return;
        }
    };
    if let Err(e) = callback.call1(&JsValue::NULL, &value) {
        tracing::error!(error = ?e, "result callback threw");
    }
}
