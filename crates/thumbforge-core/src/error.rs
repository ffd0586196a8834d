//! Error types for the thumbnail controller and the generation API.

use thiserror::Error;

use crate::SettingField;

/// Notice shown when a dispatch to the generation API fails.
pub const GENERATION_FAILED_NOTICE: &str = "Error generating thumbnail. Please try again.";

/// A submission was blocked before anything was dispatched.
///
/// The `Display` text is the notice shown to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// The reference thumbnail URL field is empty.
    #[error("Please enter a reference thumbnail URL")]
    MissingReferenceUrl,

    /// The prompt field is empty.
    #[error("Please enter a prompt for your thumbnail")]
    MissingPrompt,
}

/// Failure while calling the generation API.
#[derive(Debug, Error)]
pub enum DispatchError {
    /// The request never completed (network, CORS, body decoding).
    #[error("Request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The server answered with a non-success status.
    #[error("Server returned {status}: {message}")]
    Status { status: u16, message: String },

    /// The server answered but reported a failure in the body.
    #[error("Generation rejected: {0}")]
    Rejected(String),

    /// The response body did not match the expected shape.
    #[error("Malformed response: {0}")]
    InvalidResponse(String),

    /// ComfyUI accepted the request but did not return a prompt id.
    #[error("No prompt ID received")]
    MissingPromptId,
}

impl From<serde_json::Error> for DispatchError {
    fn from(e: serde_json::Error) -> Self {
        DispatchError::InvalidResponse(e.to_string())
    }
}

/// A setting value above the slider range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("{field} must be between 0 and 100, got {value}")]
pub struct OutOfRange {
    pub field: SettingField,
    pub value: u8,
}

/// A name that does not match any known preset or setting field.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UnknownName {
    #[error("Unknown preset: {0}")]
    Preset(String),

    #[error("Unknown setting: {0}")]
    SettingField(String),
}
