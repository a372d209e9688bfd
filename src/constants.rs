//! Shared constants for the recipe pipeline
//!

/// Anthropic messages endpoint for recipe text generation.
pub const ANTHROPIC_MESSAGES_URL: &str = "https://api.anthropic.com/v1/messages";

/// Anthropic API version header value.
pub const ANTHROPIC_VERSION: &str = "2023-06-01";

/// OpenAI image generation endpoint.
pub const OPENAI_IMAGES_URL: &str = "https://api.openai.com/v1/images/generations";

/// Max output tokens requested from the text model.
pub const TEXT_MAX_TOKENS: u32 = 4096;

/// Timeout for outbound provider calls. Generation is long-running by
/// nature (two generative services in series) so this is far above a
/// normal API budget.
pub const PROVIDER_TIMEOUT_SECS: u64 = 120;

/// Requested size for the synthesized source image.
pub const IMAGE_REQUEST_SIZE: &str = "1024x1024";

/// Edge length of the stored full-size variant.
pub const FULL_IMAGE_SIZE: u32 = 800;

/// JPEG quality for the full-size variant (~100-150KB output).
pub const FULL_IMAGE_QUALITY: u8 = 85;

/// Edge length of the stored thumbnail variant.
pub const THUMBNAIL_SIZE: u32 = 200;

/// JPEG quality for the thumbnail variant (~15-20KB output).
pub const THUMBNAIL_QUALITY: u8 = 75;

/// Filename suffix that keeps thumbnails namespace-siblings of their
/// full-size counterpart.
pub const THUMBNAIL_SUFFIX: &str = "_thumb";

/// URL prefix under which stored media is served.
pub const UPLOADS_URL_PREFIX: &str = "/uploads";
