//! Config handling

use std::path::PathBuf;

use tracing::log::LevelFilter;

/// Sets up logging based on the debug flag
pub fn setup_logging(debug: bool) -> Result<(), Box<std::io::Error>> {
    let level = if debug {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };

    let mut logger = simple_logger::SimpleLogger::new().with_level(level);
    if !debug {
        logger = logger
            .with_module_level("tracing", LevelFilter::Warn)
            .with_module_level("rustls", LevelFilter::Info)
            .with_module_level("hyper_util", LevelFilter::Info)
            .with_module_level("h2", LevelFilter::Info)
            .with_module_level("sqlx", LevelFilter::Warn);
    }
    logger.init().map_err(|err| {
        eprintln!("Failed to initialize logger: {}", err);
        Box::new(std::io::Error::other(err))
    })
}

/// Application configuration, read from the environment.
#[derive(Clone, Debug)]
pub struct AppConfig {
    /// API key for the text-generation provider.
    pub claude_api_key: String,
    /// Text model identifier, eg `claude-3-haiku-20240307`.
    pub claude_model: String,
    /// API key for the image-synthesis provider.
    pub openai_api_key: String,
    /// Image model identifier, eg `dall-e-3`.
    pub openai_model: String,
    /// Directory where optimized recipe images are stored.
    pub uploads_dir: PathBuf,
    /// Global recipe generation limit: `unlimited`, `0`, or a number like `10`.
    pub recipe_generation_limit: String,
}

impl AppConfig {
    /// Loads configuration from environment variables, with defaults
    /// suitable for local development.
    pub fn from_env() -> Self {
        Self {
            claude_api_key: get_env("CLAUDE_API_KEY", ""),
            claude_model: get_env("CLAUDE_MODEL", "claude-3-haiku-20240307"),
            openai_api_key: get_env("OPENAI_API_KEY", ""),
            openai_model: get_env("OPENAI_MODEL", "dall-e-3"),
            uploads_dir: PathBuf::from(get_env("IMAGE_STORAGE_PATH", "./data/uploads")),
            recipe_generation_limit: get_env("RECIPE_GENERATION_LIMIT", "unlimited"),
        }
    }
}

fn get_env(key: &str, default: &str) -> String {
    match std::env::var(key) {
        Ok(value) if !value.is_empty() => value,
        _ => default.to_string(),
    }
}
