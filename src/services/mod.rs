pub mod nutrition;
pub mod vision;

pub use nutrition::{NutritionModel, OpenAiNutritionClient};
pub use vision::{OpenRouterVisionClient, VisionModel};
