use std::sync::LazyLock;

use regex::Regex;

use crate::models::MealRecord;

static SERVING_SIZE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d+)\s*g").expect("Invalid serving size regex"));

/// Extract a [`MealRecord`] from the vision model's free-text description.
///
/// The expected shape is a `1. [Food Name] (XXX g)` header followed by
/// `- ingredient: quantity` lines. Anything else is skipped; degraded or
/// empty input falls back to the default record rather than failing.
pub fn parse_food_description(text: &str) -> MealRecord {
    let mut record = MealRecord::default();

    for line in text.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        if let Some(rest) = line.strip_prefix("1.") {
            let mut parts = rest.splitn(2, '(');
            if let Some(name) = parts.next() {
                record.name = name.trim().to_string();
            }
            if let Some(tail) = parts.next() {
                if let Some(size) = SERVING_SIZE_RE.captures(tail) {
                    record.serving_size_grams = size[1].to_string();
                }
            }
        } else if line.contains(':') && !line.starts_with("2.") {
            // Lines starting with "2." are assumed to be a second numbered
            // header, not an ingredient.
            record.ingredients.push(line.to_string());
        }
    }

    record
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_empty_text_yields_defaults() {
        let record = parse_food_description("");
        assert_eq!(record.name, "Unknown Food");
        assert_eq!(record.serving_size_grams, "100");
        assert!(record.ingredients.is_empty());
    }

    #[test]
    fn test_parse_full_description() {
        let text = "1. Grilled Chicken (250 g)\n- chicken breast: 200g\n- olive oil: 10ml";
        let record = parse_food_description(text);

        assert_eq!(record.name, "Grilled Chicken");
        assert_eq!(record.serving_size_grams, "250");
        assert_eq!(
            record.ingredients,
            vec!["- chicken breast: 200g", "- olive oil: 10ml"]
        );
    }

    #[test]
    fn test_parse_header_without_serving_size_keeps_default() {
        let record = parse_food_description("1. Tomato Soup\n- tomato: 300g");
        assert_eq!(record.name, "Tomato Soup");
        assert_eq!(record.serving_size_grams, "100");
        assert_eq!(record.ingredients, vec!["- tomato: 300g"]);
    }

    #[test]
    fn test_parse_header_with_unparseable_size_keeps_default() {
        let record = parse_food_description("1. Stew (a large bowl)");
        assert_eq!(record.name, "Stew");
        assert_eq!(record.serving_size_grams, "100");
    }

    #[test]
    fn test_parse_skips_second_numbered_header() {
        let text = "1. Omelette (150 g)\n2. Ingredients: listed below\n- egg: 2 pieces";
        let record = parse_food_description(text);

        assert_eq!(record.ingredients, vec!["- egg: 2 pieces"]);
    }

    #[test]
    fn test_parse_ignores_lines_without_colon() {
        let text = "1. Salad (120 g)\nSome commentary from the model\n- lettuce: 80g";
        let record = parse_food_description(text);

        assert_eq!(record.ingredients, vec!["- lettuce: 80g"]);
    }

    #[test]
    fn test_parse_handles_surrounding_blank_lines() {
        let text = "\n\n  1. Rice Bowl (300 g)  \n\n  - rice: 250g  \n\n";
        let record = parse_food_description(text);

        assert_eq!(record.name, "Rice Bowl");
        assert_eq!(record.serving_size_grams, "300");
        assert_eq!(record.ingredients, vec!["- rice: 250g"]);
    }
}
