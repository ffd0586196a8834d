//! ComfyUI prompt graph construction and response parsing.
//!
//! Builds the API-format node graph submitted to ComfyUI's `/prompt`
//! endpoint and reads generated images back out of `/history/{id}`.
//!
//! ## Graph
//! ```text
//! 3 CheckpointLoaderSimple ─┬─> 4 CLIPTextEncode (prompt)   ─┐
//!                           ├─> 6 CLIPTextEncode (negative) ─┤
//! 8 EmptyLatentImage ───────┴──────────────────────────────> 5 KSampler
//! 5 KSampler ─> 10 VAEDecode ─> 11 ColorAdjustment
//! ```

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::Settings;

pub const CHECKPOINT_NAME: &str = "sd_xl_base_1.0.safetensors";
pub const NEGATIVE_PROMPT: &str = "ugly, blurry, low quality";
pub const SAMPLER_NAME: &str = "euler_ancestral";
pub const SCHEDULER: &str = "normal";
pub const SAMPLER_STEPS: u32 = 20;
pub const LATENT_WIDTH: u32 = 1024;
pub const LATENT_HEIGHT: u32 = 576;

/// Classifier-free guidance scale, `8` at exaggeration 0 up to `12` at 100.
pub fn sampler_cfg(exaggeration: u8) -> f64 {
    8.0 + exaggeration as f64 / 100.0 * 4.0
}

/// Build the ComfyUI prompt graph for a thumbnail.
pub fn build_workflow_graph(settings: &Settings, prompt: &str) -> Value {
    let color = settings.color_intensity as f64 / 100.0;

    json!({
        "3": {
            "inputs": {
                "ckpt_name": CHECKPOINT_NAME
            },
            "class_type": "CheckpointLoaderSimple"
        },
        "4": {
            "inputs": {
                "text": prompt,
                "clip": ["3", 1]
            },
            "class_type": "CLIPTextEncode"
        },
        "5": {
            "inputs": {
                "seed": 0,
                "steps": SAMPLER_STEPS,
                "cfg": sampler_cfg(settings.exaggeration),
                "sampler_name": SAMPLER_NAME,
                "scheduler": SCHEDULER,
                "denoise": 1,
                "model": ["3", 0],
                "positive": ["4", 0],
                "negative": ["6", 0],
                "latent_image": ["8", 0]
            },
            "class_type": "KSampler"
        },
        "6": {
            "inputs": {
                "text": NEGATIVE_PROMPT,
                "clip": ["3", 1]
            },
            "class_type": "CLIPTextEncode"
        },
        "8": {
            "inputs": {
                "width": LATENT_WIDTH,
                "height": LATENT_HEIGHT,
                "batch_size": 1
            },
            "class_type": "EmptyLatentImage"
        },
        "10": {
            "inputs": {
                "samples": ["5", 0],
                "vae": ["3", 2]
            },
            "class_type": "VAEDecode"
        },
        "11": {
            "inputs": {
                "image": ["10", 0],
                "saturation": 1.0 + color * 0.5,
                "contrast": 1.0 + color * 0.3,
                "brightness": 1.0 + color * 0.2
            },
            "class_type": "ColorAdjustment"
        }
    })
}

/// Body of `POST /prompt`.
#[derive(Debug, Serialize)]
pub struct QueuePromptRequest<'a> {
    pub prompt: &'a Value,
    pub client_id: &'a str,
}

/// Successful answer from `POST /prompt`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct QueuePromptResponse {
    pub prompt_id: Option<String>,
}

/// Find the first generated image for `prompt_id` in a `/history` response.
///
/// Looks for `outputs.images` first, then for the first output node that
/// carries an `images` list.
pub fn first_output_image(history: &Value, prompt_id: &str) -> Option<Value> {
    let outputs = history.get(prompt_id)?.get("outputs")?.as_object()?;

    if let Some(image) = outputs
        .get("images")
        .and_then(|images| images.as_array())
        .and_then(|images| images.first())
    {
        return Some(image.clone());
    }

    outputs
        .values()
        .filter_map(|node| node.get("images")?.as_array()?.first())
        .next()
        .cloned()
}
