/// A meal as captured by either input path: manual entry or photo analysis.
///
/// `ingredients` entries keep the raw `"name: quantity"` form produced by
/// the collector or the description parser; they are only decomposed at
/// render time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MealRecord {
    pub name: String,
    pub serving_size_grams: String,
    pub ingredients: Vec<String>,
}

impl Default for MealRecord {
    fn default() -> Self {
        Self {
            name: "Unknown Food".to_string(),
            serving_size_grams: "100".to_string(),
            ingredients: Vec::new(),
        }
    }
}

/// Result of the nutrition-estimation stage.
///
/// A failed estimate carries its diagnostic instead of masquerading as
/// model output, so the renderer can report it explicitly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NutritionOutcome {
    /// Raw free-text nutrition facts from the model.
    Estimate(String),
    /// The estimate could not be retrieved; holds the failure diagnostic.
    Unavailable(String),
}
