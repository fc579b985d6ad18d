mod config;
mod input;
mod models;
mod parser;
mod report;
mod services;

use std::io::{self, BufRead, Write};

use anyhow::Result;
use dotenv::dotenv;

use config::Config;
use input::InputMode;
use models::{MealRecord, NutritionOutcome};
use services::vision;
use services::{NutritionModel, OpenAiNutritionClient, OpenRouterVisionClient, VisionModel};

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();
    dotenv().ok();

    // Missing credentials abort here, before any pipeline work.
    let config = Config::from_env()?;
    log::info!(
        "✅ Configuration loaded (vision model: {}, nutrition model: {})",
        config.vision_model,
        config.nutrition_model
    );

    let vision_client = OpenRouterVisionClient::new(config.vision_api_key, config.vision_model);
    let nutrition_client =
        OpenAiNutritionClient::new(config.nutrition_api_key, config.nutrition_model);

    let stdin = io::stdin();
    let mut input = stdin.lock();
    let mut output = io::stdout();

    run(&vision_client, &nutrition_client, &mut input, &mut output).await
}

/// One full pipeline pass: choose a mode, collect the meal, estimate
/// nutrition, print the report.
async fn run(
    vision: &dyn VisionModel,
    nutrition: &dyn NutritionModel,
    input: &mut impl BufRead,
    output: &mut impl Write,
) -> Result<()> {
    match input::choose_mode(input, output)? {
        InputMode::Photo => run_photo_flow(vision, nutrition, input, output).await,
        InputMode::Manual => run_manual_flow(nutrition, input, output).await,
    }
}

async fn run_photo_flow(
    vision: &dyn VisionModel,
    nutrition: &dyn NutritionModel,
    input: &mut impl BufRead,
    output: &mut impl Write,
) -> Result<()> {
    writeln!(output, "Please provide the full path to your image file.")?;
    let image_bytes = match input::collect_image_bytes(input, output)? {
        Some(bytes) => bytes,
        None => return Ok(()),
    };

    writeln!(output, "Analyzing image...")?;
    let description = match describe_image(vision, &image_bytes).await {
        Some(text) => text,
        None => {
            writeln!(output, "Image analysis failed. Please try manual entry.")?;
            return Ok(());
        }
    };

    writeln!(output, "Formatting response...")?;
    let meal = parser::parse_food_description(&description);
    if meal.ingredients.is_empty() {
        writeln!(output, "No ingredients found. Please try manual entry.")?;
        return Ok(());
    }

    writeln!(output, "Getting nutritional data...")?;
    let outcome = estimate_nutrition(nutrition, &meal).await;
    report::render_report(&meal, &outcome, output)?;
    Ok(())
}

async fn run_manual_flow(
    nutrition: &dyn NutritionModel,
    input: &mut impl BufRead,
    output: &mut impl Write,
) -> Result<()> {
    let meal = input::manual_entry(input, output)?;
    let outcome = estimate_nutrition(nutrition, &meal).await;
    report::render_report(&meal, &outcome, output)?;
    Ok(())
}

/// Prepare the image and ask the vision model to describe it. Failures
/// are logged and collapse to `None`; the photo flow degrades from there.
async fn describe_image(vision: &dyn VisionModel, image_bytes: &[u8]) -> Option<String> {
    let jpeg = match vision::prepare_image(image_bytes) {
        Ok(jpeg) => jpeg,
        Err(e) => {
            log::error!("❌ Could not prepare image: {:#}", e);
            return None;
        }
    };

    match vision.describe_food(&jpeg).await {
        Ok(text) => Some(text),
        Err(e) => {
            log::error!("❌ Image analysis failed: {:#}", e);
            None
        }
    }
}

async fn estimate_nutrition(nutrition: &dyn NutritionModel, meal: &MealRecord) -> NutritionOutcome {
    match nutrition.estimate(&meal.name, &meal.ingredients).await {
        Ok(text) => NutritionOutcome::Estimate(text),
        Err(e) => {
            log::error!("❌ Nutrition estimate failed: {:#}", e);
            NutritionOutcome::Unavailable(format!("{:#}", e))
        }
    }
}
