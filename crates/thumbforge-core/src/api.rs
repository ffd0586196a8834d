//! Generation API client.
//!
//! Two backends are supported:
//!
//! - **Relay** (default): `POST {endpoint}/generate` with the generation
//!   record and its workflow parameters as JSON. The relay answers
//!   `{"success": true, "image": ...}` or `{"error": "..."}`.
//! - **ComfyUI**: the graph from [`crate::comfy`] is queued directly with
//!   `POST {endpoint}/prompt`; the generated image is looked up later through
//!   `GET {endpoint}/history/{prompt_id}`.
//!
//! No timeout and no retry are applied to either.

use std::future::Future;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::comfy::{build_workflow_graph, first_output_image, QueuePromptRequest, QueuePromptResponse};
use crate::controller::Submission;
use crate::error::{DispatchError, GENERATION_FAILED_NOTICE};
use crate::preset::ActivePreset;
use crate::view::Notifier;
use crate::workflow::WorkflowParams;
use crate::Settings;

/// Relay address used when none is configured.
pub const DEFAULT_ENDPOINT: &str = "http://127.0.0.1:5000";
/// Wait between queueing a ComfyUI prompt and reading its history.
pub const DEFAULT_HISTORY_DELAY_MS: u32 = 5000;
/// ComfyUI client id used when none is configured.
pub const DEFAULT_CLIENT_ID: &str = "thumbforge";

/// Which backend the endpoint speaks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ApiTarget {
    /// A relay that builds and runs the workflow itself.
    #[default]
    #[serde(rename = "relay")]
    Relay,
    /// A ComfyUI server addressed directly.
    #[serde(rename = "comfyui")]
    ComfyUi,
}

/// Where and how to send generation requests.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ApiConfig {
    /// Base URL, without a trailing path
    pub endpoint: String,
    pub target: ApiTarget,
    /// ComfyUI websocket client id; ignored by the relay
    pub client_id: Option<String>,
    /// ComfyUI only: delay before the single history lookup
    pub history_delay_ms: u32,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            target: ApiTarget::default(),
            client_id: None,
            history_delay_ms: DEFAULT_HISTORY_DELAY_MS,
        }
    }
}

impl ApiConfig {
    /// Join `path` onto the endpoint.
    pub fn url(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.endpoint.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }

    pub fn client_id(&self) -> &str {
        self.client_id.as_deref().unwrap_or(DEFAULT_CLIENT_ID)
    }
}

/// Result of a successful dispatch.
///
/// Serialized as `{"status": "image", "image": ...}` or
/// `{"status": "queued", "promptId": "..."}`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum GenerationOutcome {
    /// The backend returned an image descriptor.
    Image { image: Value },
    /// The prompt was queued; the image must be fetched later.
    Queued {
        #[serde(rename = "promptId")]
        prompt_id: String,
    },
}

/// Anything that can turn a submission into a generation outcome.
#[async_trait(?Send)]
pub trait GenerationApi {
    async fn generate(&self, submission: &Submission) -> Result<GenerationOutcome, DispatchError>;

    /// Look up the first generated image for a queued prompt.
    ///
    /// `Ok(None)` means the prompt has not produced an image yet.
    async fn fetch_history_image(&self, prompt_id: &str) -> Result<Option<Value>, DispatchError>;

    /// Wait before the history lookup of a queued prompt, in milliseconds.
    fn history_delay_ms(&self) -> u32 {
        DEFAULT_HISTORY_DELAY_MS
    }
}

/// Body of the relay's `POST /generate`.
#[derive(Debug, Serialize)]
struct RelayRequest<'a> {
    reference: &'a str,
    prompt: &'a str,
    settings: &'a Settings,
    preset: &'a ActivePreset,
    workflow: &'a WorkflowParams,
}

impl<'a> From<&'a Submission> for RelayRequest<'a> {
    fn from(submission: &'a Submission) -> Self {
        Self {
            reference: &submission.record.reference,
            prompt: &submission.record.prompt,
            settings: &submission.record.settings,
            preset: &submission.record.preset,
            workflow: &submission.params,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RelayResponse {
    success: Option<bool>,
    image: Option<Value>,
    error: Option<String>,
}

/// Pull a human-readable message out of an error body.
///
/// Accepts `{"error": "..."}`, `{"error": {"message": "..."}}` (ComfyUI) or
/// falls back to the raw text.
fn error_message(body: &str) -> String {
    let parsed: Option<Value> = serde_json::from_str(body).ok();
    let from_json = parsed.as_ref().and_then(|value| {
        let error = value.get("error")?;
        error
            .as_str()
            .or_else(|| error.get("message")?.as_str())
            .map(str::to_string)
    });
    match from_json {
        Some(message) => message,
        None if body.trim().is_empty() => "no details".to_string(),
        None => body.trim().to_string(),
    }
}

fn is_success(status: u16) -> bool {
    (200..300).contains(&status)
}

/// Classify a relay response.
pub fn parse_relay_response(status: u16, body: &str) -> Result<GenerationOutcome, DispatchError> {
    if !is_success(status) {
        return Err(DispatchError::Status {
            status,
            message: error_message(body),
        });
    }

    let response: RelayResponse = serde_json::from_str(body)?;
    if let Some(error) = response.error {
        return Err(DispatchError::Rejected(error));
    }
    if response.success == Some(false) {
        return Err(DispatchError::Rejected("relay reported failure".to_string()));
    }
    response
        .image
        .map(|image| GenerationOutcome::Image { image })
        .ok_or_else(|| DispatchError::InvalidResponse("missing image".to_string()))
}

/// Classify a ComfyUI `/prompt` response, returning the prompt id.
pub fn parse_queue_response(status: u16, body: &str) -> Result<String, DispatchError> {
    if !is_success(status) {
        return Err(DispatchError::Status {
            status,
            message: error_message(body),
        });
    }

    let response: QueuePromptResponse = serde_json::from_str(body)?;
    match response.prompt_id {
        Some(id) if !id.is_empty() => Ok(id),
        _ => Err(DispatchError::MissingPromptId),
    }
}

/// HTTP implementation of [`GenerationApi`] on top of `reqwest`.
///
/// On wasm32 `reqwest` goes through the browser's `fetch`.
#[derive(Clone)]
pub struct HttpGenerationApi {
    http: reqwest::Client,
    config: ApiConfig,
}

impl HttpGenerationApi {
    pub fn new(config: ApiConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            config,
        }
    }

    async fn generate_via_relay(
        &self,
        submission: &Submission,
    ) -> Result<GenerationOutcome, DispatchError> {
        let response = self
            .http
            .post(self.config.url("generate"))
            .json(&RelayRequest::from(submission))
            .send()
            .await?;
        let status = response.status().as_u16();
        let body = response.text().await?;
        parse_relay_response(status, &body)
    }

    /// Queue a prompt graph on ComfyUI and return its prompt id.
    pub async fn queue_prompt(&self, graph: &Value) -> Result<String, DispatchError> {
        let request = QueuePromptRequest {
            prompt: graph,
            client_id: self.config.client_id(),
        };
        let response = self
            .http
            .post(self.config.url("prompt"))
            .json(&request)
            .send()
            .await?;
        let status = response.status().as_u16();
        let body = response.text().await?;
        let prompt_id = parse_queue_response(status, &body)?;
        tracing::debug!(prompt_id = %prompt_id, "prompt queued");
        Ok(prompt_id)
    }
}

#[async_trait(?Send)]
impl GenerationApi for HttpGenerationApi {
    async fn generate(&self, submission: &Submission) -> Result<GenerationOutcome, DispatchError> {
        match self.config.target {
            ApiTarget::Relay => self.generate_via_relay(submission).await,
            ApiTarget::ComfyUi => {
                let graph =
                    build_workflow_graph(&submission.record.settings, &submission.record.prompt);
                let prompt_id = self.queue_prompt(&graph).await?;
                Ok(GenerationOutcome::Queued { prompt_id })
            }
        }
    }

    async fn fetch_history_image(&self, prompt_id: &str) -> Result<Option<Value>, DispatchError> {
        let response = self
            .http
            .get(self.config.url(&format!("history/{prompt_id}")))
            .send()
            .await?
            .error_for_status()?;
        let history: Value = response.json().await?;
        Ok(first_output_image(&history, prompt_id))
    }

    fn history_delay_ms(&self) -> u32 {
        self.config.history_delay_ms
    }
}

/// Send a submission and report a failure to the user.
///
/// A queued prompt is followed up once: `sleep` waits the API's history
/// delay, then the history is read. The result is an image, or the prompt
/// still queued if it has not finished. Errors stop here: they are logged and
/// shown with the generation-failed notice, and `None` is returned.
pub async fn dispatch_and_report<A, N, S, F>(
    api: &A,
    notifier: &N,
    submission: &Submission,
    sleep: S,
) -> Option<GenerationOutcome>
where
    A: GenerationApi + ?Sized,
    N: Notifier + ?Sized,
    S: FnOnce(u32) -> F,
    F: Future<Output = ()>,
{
    tracing::info!(params = ?submission.params, "calling generation API");
    let outcome = match api.generate(submission).await {
        Ok(outcome) => outcome,
        Err(e) => {
            tracing::error!(error = %e, "error generating thumbnail");
            notifier.alert(GENERATION_FAILED_NOTICE);
            return None;
        }
    };
    tracing::info!(outcome = ?outcome, "generation request accepted");

    match outcome {
        GenerationOutcome::Queued { prompt_id } => {
            sleep(api.history_delay_ms()).await;
            follow_up(api, notifier, prompt_id).await
        }
        image => Some(image),
    }
}

/// Single history lookup for a queued prompt.
async fn follow_up<A, N>(api: &A, notifier: &N, prompt_id: String) -> Option<GenerationOutcome>
where
    A: GenerationApi + ?Sized,
    N: Notifier + ?Sized,
{
    match api.fetch_history_image(&prompt_id).await {
        Ok(Some(image)) => {
            tracing::info!(prompt_id = %prompt_id, "thumbnail ready");
            Some(GenerationOutcome::Image { image })
        }
        Ok(None) => {
            tracing::info!(prompt_id = %prompt_id, "thumbnail not ready yet");
            Some(GenerationOutcome::Queued { prompt_id })
        }
        Err(e) => {
            tracing::error!(prompt_id = %prompt_id, error = %e, "error fetching thumbnail");
            notifier.alert(GENERATION_FAILED_NOTICE);
            None
        }
    }
}
