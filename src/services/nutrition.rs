use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

const OPENAI_URL: &str = "https://api.openai.com/v1/chat/completions";

const SYSTEM_PROMPT: &str = "You are a nutritionist providing detailed nutritional information.";

#[derive(Debug, Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    max_tokens: u32,
}

#[derive(Debug, Serialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: MessageContent,
}

#[derive(Debug, Deserialize)]
struct MessageContent {
    content: String,
}

/// Text collaborator: estimates nutrition facts for a named meal and its
/// ingredient list, as free text.
#[async_trait]
pub trait NutritionModel: Send + Sync {
    async fn estimate(&self, meal_name: &str, ingredients: &[String]) -> Result<String>;
}

/// The fixed estimation prompt, requesting five labeled nutrient lines.
pub fn build_prompt(meal_name: &str, ingredients: &[String]) -> String {
    format!(
        "Provide nutritional information for the following meal:\n\
         Meal: {}\n\
         Ingredients:\n\
         {}\n\
         Format the response as follows:\n\
         - Calories (kcal)\n\
         - Carbohydrates (g)\n\
         - Protein (g)\n\
         - Fat (g)\n\
         - Fiber (g)",
        meal_name,
        ingredients.join("\n")
    )
}

pub struct OpenAiNutritionClient {
    api_key: String,
    model: String,
    client: reqwest::Client,
}

impl OpenAiNutritionClient {
    pub fn new(api_key: String, model: String) -> Self {
        Self {
            api_key,
            model,
            client: reqwest::Client::new(),
        }
    }
}

#[async_trait]
impl NutritionModel for OpenAiNutritionClient {
    async fn estimate(&self, meal_name: &str, ingredients: &[String]) -> Result<String> {
        let request = ChatRequest {
            model: self.model.clone(),
            messages: vec![
                ChatMessage {
                    role: "system".to_string(),
                    content: SYSTEM_PROMPT.to_string(),
                },
                ChatMessage {
                    role: "user".to_string(),
                    content: build_prompt(meal_name, ingredients),
                },
            ],
            // Response ceiling; a verbose model gets truncated, not retried.
            max_tokens: 200,
        };

        log::info!(
            "🤖 Requesting nutrition estimate for '{}' from {}",
            meal_name,
            self.model
        );

        let response = self
            .client
            .post(OPENAI_URL)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await
            .context("nutrition request failed")?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            bail!("nutrition API error ({}): {}", status, error_text);
        }

        let chat_response: ChatResponse = response
            .json()
            .await
            .context("could not decode nutrition response")?;

        let content = chat_response
            .choices
            .first()
            .map(|choice| choice.message.content.trim().to_string())
            .unwrap_or_default();
        if content.is_empty() {
            bail!("empty response from nutrition model");
        }

        log::debug!("💬 Nutrition model response:\n{}", content);
        Ok(content)
    }
}
