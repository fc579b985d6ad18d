use std::env;

use anyhow::{Context, Result};

const DEFAULT_VISION_MODEL: &str = "google/gemini-flash-1.5";
const DEFAULT_NUTRITION_MODEL: &str = "gpt-4o-mini";

/// Credentials and model slugs for the two model collaborators, resolved
/// once at startup and handed to the clients by value.
#[derive(Debug, Clone)]
pub struct Config {
    pub vision_api_key: String,
    pub vision_model: String,
    pub nutrition_api_key: String,
    pub nutrition_model: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let vision_api_key = env::var("VISION_API_KEY")
            .context("VISION_API_KEY must be set in the environment or .env file")?;
        let nutrition_api_key = env::var("NUTRITION_API_KEY")
            .context("NUTRITION_API_KEY must be set in the environment or .env file")?;

        let vision_model =
            env::var("VISION_MODEL").unwrap_or_else(|_| DEFAULT_VISION_MODEL.to_string());
        let nutrition_model =
            env::var("NUTRITION_MODEL").unwrap_or_else(|_| DEFAULT_NUTRITION_MODEL.to_string());

        Ok(Self {
            vision_api_key,
            vision_model,
            nutrition_api_key,
            nutrition_model,
        })
    }
}
