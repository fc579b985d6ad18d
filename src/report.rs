use std::io::{self, Write};
use std::sync::LazyLock;

use regex::Regex;

use crate::models::{MealRecord, NutritionOutcome};

static CALORIE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d+)\s*kcal").expect("Invalid calorie regex"));
static GRAM_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d+(?:\.\d+)?)\s*g").expect("Invalid gram regex"));

/// Nutrient labels scanned for in the model output, with their printed
/// name and value pattern. First matching label claims a line.
static NUTRIENT_LABELS: &[(&str, &str, &LazyLock<Regex>, &str)] = &[
    ("Calories", "Calories", &CALORIE_RE, "kcal"),
    ("Carbohydrates", "Carbohydrate", &GRAM_RE, "g"),
    ("Protein", "Protein", &GRAM_RE, "g"),
    ("Fat", "Fat", &GRAM_RE, "g"),
    ("Fiber", "Fiber", &GRAM_RE, "g"),
];

/// Print the full meal report: header, ingredient table, nutrition facts.
///
/// Pure formatting; identical inputs produce byte-identical output.
pub fn render_report(
    meal: &MealRecord,
    nutrition: &NutritionOutcome,
    out: &mut impl Write,
) -> io::Result<()> {
    writeln!(out)?;
    writeln!(out, "Food Details")?;
    writeln!(out, "------------")?;
    writeln!(out, "Food: {}", meal.name)?;
    writeln!(out, "1 serving ({} g)", meal.serving_size_grams)?;

    writeln!(out)?;
    writeln!(out, "Ingredients")?;
    writeln!(out, "-----------")?;
    writeln!(out, "{:<20} {:<20}", "Ingredient", "Quantity")?;
    for entry in &meal.ingredients {
        match entry.split_once(':') {
            Some((name, quantity)) => {
                writeln!(out, "{:<20} {:<20}", name.trim(), quantity.trim())?;
            }
            None => {
                // Degraded parse can leave an entry without a quantity
                // separator; drop the row instead of failing the report.
                log::warn!("⚠️ Skipping malformed ingredient entry: {:?}", entry);
            }
        }
    }

    writeln!(out)?;
    writeln!(out, "Nutritional Information")?;
    writeln!(out, "----------------------")?;
    match nutrition {
        NutritionOutcome::Unavailable(reason) => {
            writeln!(out, "Nutrition estimate unavailable: {}", reason)?;
        }
        NutritionOutcome::Estimate(text) => {
            for line in text.lines() {
                for (substring, label, pattern, unit) in NUTRIENT_LABELS {
                    if line.contains(substring) {
                        if let Some(value) = pattern.captures(line) {
                            writeln!(out, "{:<15} {} {}", label, &value[1], unit)?;
                        }
                        break;
                    }
                }
            }
        }
    }

    Ok(())
}
