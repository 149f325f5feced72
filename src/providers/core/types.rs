//! Core types shared by every provider

use bytes::Bytes;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Kind of generation requested by the caller
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Task {
    /// Generate an image from a prompt only
    TextToImage,
    /// Generate an image from a prompt and an input image
    ImageToImage,
}

impl Task {
    pub fn as_str(&self) -> &'static str {
        match self {
            Task::TextToImage => "text_to_image",
            Task::ImageToImage => "image_to_image",
        }
    }
}

impl fmt::Display for Task {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a task name is not recognised
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownTask(pub String);

impl FromStr for Task {
    type Err = UnknownTask;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "text_to_image" => Ok(Task::TextToImage),
            "image_to_image" => Ok(Task::ImageToImage),
            other => Err(UnknownTask(other.to_string())),
        }
    }
}

/// Optional tuning parameters forwarded to providers
///
/// Every field is optional; each provider forwards only the ones its API
/// understands and ignores the rest.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GenerationParams {
    /// Things the image should not contain
    #[serde(skip_serializing_if = "Option::is_none")]
    pub negative_prompt: Option<String>,
    /// Output width in pixels
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,
    /// Output height in pixels
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,
    /// Number of diffusion steps
    #[serde(skip_serializing_if = "Option::is_none")]
    pub num_steps: Option<u32>,
    /// Prompt adherence
    #[serde(skip_serializing_if = "Option::is_none")]
    pub guidance: Option<f32>,
    /// How far image-to-image may stray from the input (0.0-1.0)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub strength: Option<f32>,
    /// Random seed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
    /// Style preset, e.g. `<watercolor>` (DashScope)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub style: Option<String>,
    /// Size preset, e.g. `1024*1024` (DashScope)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<String>,
}

impl GenerationParams {
    /// Names of the form fields that map onto parameters
    pub const FIELD_NAMES: [&'static str; 9] = [
        "negative_prompt",
        "width",
        "height",
        "num_steps",
        "guidance",
        "strength",
        "seed",
        "style",
        "size",
    ];

    /// Set a parameter from its textual form field value
    ///
    /// Unknown names are ignored.
    pub fn set(&mut self, name: &str, value: &str) -> Result<(), InvalidParam> {
        fn invalid(name: &str, value: &str) -> InvalidParam {
            InvalidParam {
                name: name.to_string(),
                value: value.to_string(),
            }
        }

        fn parse<T: FromStr>(name: &str, value: &str) -> Result<Option<T>, InvalidParam> {
            value
                .trim()
                .parse()
                .map(Some)
                .map_err(|_| invalid(name, value))
        }

        // NaN and infinities would serialize as `null`
        fn parse_finite(name: &str, value: &str) -> Result<Option<f32>, InvalidParam> {
            match parse::<f32>(name, value)? {
                Some(number) if !number.is_finite() => Err(invalid(name, value)),
                number => Ok(number),
            }
        }

        match name {
            "negative_prompt" => self.negative_prompt = Some(value.to_string()),
            "width" => self.width = parse(name, value)?,
            "height" => self.height = parse(name, value)?,
            "num_steps" => self.num_steps = parse(name, value)?,
            "guidance" => self.guidance = parse_finite(name, value)?,
            "strength" => self.strength = parse_finite(name, value)?,
            "seed" => self.seed = parse(name, value)?,
            "style" => self.style = Some(value.to_string()),
            "size" => self.size = Some(value.to_string()),
            _ => {}
        }
        Ok(())
    }

    pub fn with_negative_prompt(mut self, negative_prompt: impl Into<String>) -> Self {
        self.negative_prompt = Some(negative_prompt.into());
        self
    }

    pub fn with_dimensions(mut self, width: u32, height: u32) -> Self {
        self.width = Some(width);
        self.height = Some(height);
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_style(mut self, style: impl Into<String>) -> Self {
        self.style = Some(style.into());
        self
    }
}

/// A form value that does not parse for its parameter's type
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Invalid value for '{name}': {value}")]
pub struct InvalidParam {
    pub name: String,
    pub value: String,
}

/// A single generation request as handed to a provider
#[derive(Debug, Clone)]
pub struct ImageRequest {
    pub task: Task,
    pub prompt: String,
    /// Raw bytes of the input image (image-to-image only)
    pub input_image: Option<Bytes>,
    pub params: GenerationParams,
}

impl ImageRequest {
    /// Create a text-to-image request
    pub fn text_to_image(prompt: impl Into<String>) -> Self {
        Self {
            task: Task::TextToImage,
            prompt: prompt.into(),
            input_image: None,
            params: GenerationParams::default(),
        }
    }

    /// Create an image-to-image request
    pub fn image_to_image(prompt: impl Into<String>, input_image: impl Into<Bytes>) -> Self {
        Self {
            task: Task::ImageToImage,
            prompt: prompt.into(),
            input_image: Some(input_image.into()),
            params: GenerationParams::default(),
        }
    }

    pub fn with_params(mut self, params: GenerationParams) -> Self {
        self.params = params;
        self
    }
}
