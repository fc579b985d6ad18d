use std::io::Cursor;
use std::time::Instant;

use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use base64::{engine::general_purpose, Engine};
use image::{DynamicImage, ImageFormat, ImageReader};
use serde::{Deserialize, Serialize};

/// Debug copy of the last submitted image. Overwritten on every photo
/// run, never cleaned up.
pub const DEBUG_IMAGE_PATH: &str = "temp_image.jpg";

const OPENROUTER_URL: &str = "https://openrouter.ai/api/v1/chat/completions";

const FOOD_PROMPT: &str = "Analyze this food image and provide:\n\
1. Food name and approximate serving size in grams\n\
2. List of ingredients with quantities\n\
Format:\n\
1. [Food Name] (XXX g)\n\
- ingredient: quantity\n\
- ingredient: quantity";

#[derive(Debug, Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    max_tokens: u32,
}

#[derive(Debug, Serialize)]
struct ChatMessage {
    role: String,
    content: Vec<ContentPart>,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
enum ContentPart {
    Text {
        #[serde(rename = "type")]
        content_type: String,
        text: String,
    },
    ImageUrl {
        #[serde(rename = "type")]
        content_type: String,
        image_url: ImageData,
    },
}

#[derive(Debug, Serialize)]
struct ImageData {
    url: String,
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

/// Vision collaborator: turns a JPEG plus the fixed instruction prompt
/// into a free-text food description.
#[async_trait]
pub trait VisionModel: Send + Sync {
    async fn describe_food(&self, image_jpeg: &[u8]) -> Result<String>;
}

/// Decode raw image bytes, flatten exotic pixel formats to RGB, and
/// return a JPEG re-encoding ready for submission.
///
/// Also writes the decoded image to [`DEBUG_IMAGE_PATH`]; a failed write
/// is logged and the request proceeds from memory.
pub fn prepare_image(data: &[u8]) -> Result<Vec<u8>> {
    if data.is_empty() {
        bail!("no image data provided");
    }

    let decoded = ImageReader::new(Cursor::new(data))
        .with_guessed_format()
        .context("could not read image data")?
        .decode()
        .context("could not decode image")?;

    // RGB and 8-bit grayscale go through as-is, everything else is flattened.
    let image = match decoded {
        DynamicImage::ImageRgb8(_) | DynamicImage::ImageLuma8(_) => decoded,
        other => DynamicImage::ImageRgb8(other.to_rgb8()),
    };

    match image.save(DEBUG_IMAGE_PATH) {
        Ok(()) => println!("Image saved temporarily as {}", DEBUG_IMAGE_PATH),
        Err(e) => log::warn!("⚠️ Could not write debug image to {}: {}", DEBUG_IMAGE_PATH, e),
    }

    let mut jpeg = Vec::new();
    image
        .write_to(&mut Cursor::new(&mut jpeg), ImageFormat::Jpeg)
        .context("could not encode image as JPEG")?;
    Ok(jpeg)
}

pub struct OpenRouterVisionClient {
    api_key: String,
    model: String,
    client: reqwest::Client,
}

impl OpenRouterVisionClient {
    pub fn new(api_key: String, model: String) -> Self {
        Self {
            api_key,
            model,
            client: reqwest::Client::new(),
        }
    }
}

#[async_trait]
impl VisionModel for OpenRouterVisionClient {
    async fn describe_food(&self, image_jpeg: &[u8]) -> Result<String> {
        let base64_image = general_purpose::STANDARD.encode(image_jpeg);
        let data_url = format!("data:image/jpeg;base64,{}", base64_image);
        log::debug!(
            "📊 Image payload: {} bytes raw, {} bytes base64",
            image_jpeg.len(),
            base64_image.len()
        );

        let request = ChatRequest {
            model: self.model.clone(),
            messages: vec![ChatMessage {
                role: "user".to_string(),
                content: vec![
                    ContentPart::Text {
                        content_type: "text".to_string(),
                        text: FOOD_PROMPT.to_string(),
                    },
                    ContentPart::ImageUrl {
                        content_type: "image_url".to_string(),
                        image_url: ImageData { url: data_url },
                    },
                ],
            }],
            max_tokens: 500,
        };

        log::info!("🤖 Sending image to vision model: {}", self.model);
        log::debug!(
            "📤 Request payload size: {} bytes",
            serde_json::to_string(&request).map(|s| s.len()).unwrap_or(0)
        );

        let started = Instant::now();
        let response = self
            .client
            .post(OPENROUTER_URL)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .header("HTTP-Referer", "https://github.com/mealscan/mealscan")
            .header("X-Title", "Mealscan")
            .json(&request)
            .send()
            .await
            .context("vision request failed")?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            bail!("vision API error ({}): {}", status, error_text);
        }

        let chat_response: ChatResponse = response
            .json()
            .await
            .context("could not decode vision response")?;
        log::info!(
            "📥 Vision response received in {:.2}s",
            started.elapsed().as_secs_f64()
        );

        let content = chat_response
            .choices
            .first()
            .map(|choice| choice.message.content.trim().to_string())
            .unwrap_or_default();
        if content.is_empty() {
            bail!("empty response from vision model");
        }

        Ok(content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prepare_image_rejects_empty_input() {
        assert!(prepare_image(&[]).is_err());
    }

    #[test]
    fn test_prepare_image_rejects_garbage() {
        assert!(prepare_image(b"not an image").is_err());
    }

    #[test]
    fn test_prepare_image_converts_rgba_to_jpeg() {
        let mut png = Vec::new();
        let rgba = DynamicImage::ImageRgba8(image::RgbaImage::new(4, 4));
        rgba.write_to(&mut Cursor::new(&mut png), ImageFormat::Png)
            .unwrap();

        let jpeg = prepare_image(&png).unwrap();
        // JPEG start-of-image marker
        assert_eq!(&jpeg[..2], &[0xFF, 0xD8]);
    }
}
