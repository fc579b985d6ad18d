use std::fs;
use std::io::{BufRead, ErrorKind, Write};

use anyhow::{bail, Result};

use crate::models::MealRecord;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    Photo,
    Manual,
}

fn prompt_line(input: &mut impl BufRead, output: &mut impl Write, prompt: &str) -> Result<String> {
    write!(output, "{}", prompt)?;
    output.flush()?;

    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        bail!("input stream closed");
    }
    Ok(line.trim().to_string())
}

/// Top-level mode prompt. Re-prompts until the answer is exactly
/// "photo" or "manual", case-insensitive.
pub fn choose_mode(input: &mut impl BufRead, output: &mut impl Write) -> Result<InputMode> {
    loop {
        let choice = prompt_line(
            input,
            output,
            "Do you want to upload a photo or enter items manually? (photo/manual): ",
        )?
        .to_lowercase();

        match choice.as_str() {
            "photo" => return Ok(InputMode::Photo),
            "manual" => return Ok(InputMode::Manual),
            _ => writeln!(output, "Invalid choice. Please choose 'photo' or 'manual'.")?,
        }
    }
}

/// Collect a meal by hand: name, then ingredient/quantity pairs until the
/// "done" sentinel. Serving size is fixed at 100 g.
pub fn manual_entry(input: &mut impl BufRead, output: &mut impl Write) -> Result<MealRecord> {
    let meal_name = prompt_line(input, output, "Enter meal name: ")?;
    let mut ingredients = Vec::new();

    loop {
        let ingredient_name = prompt_line(
            input,
            output,
            "Enter ingredient name (or 'done' to finish): ",
        )?;
        if ingredient_name.eq_ignore_ascii_case("done") {
            break;
        }

        // Re-ask the quantity for this ingredient until it is non-empty.
        loop {
            let quantity = prompt_line(
                input,
                output,
                &format!("Enter quantity for {}: ", ingredient_name),
            )?;
            if quantity.is_empty() {
                writeln!(output, "Quantity cannot be empty. Please enter a quantity.")?;
                continue;
            }
            ingredients.push(format!("{}: {}", ingredient_name, quantity));
            break;
        }
    }

    writeln!(output, "Default serving size = 100 gm.")?;

    Ok(MealRecord {
        name: meal_name,
        serving_size_grams: "100".to_string(),
        ingredients,
    })
}

/// Ask for an image path and read it. Any failure prints a diagnostic and
/// yields `None`; the caller decides how to degrade.
pub fn collect_image_bytes(
    input: &mut impl BufRead,
    output: &mut impl Write,
) -> Result<Option<Vec<u8>>> {
    let file_path = prompt_line(input, output, "Enter the full path to your image file: ")?;
    if file_path.is_empty() {
        writeln!(output, "No file path provided. Please try again.")?;
        return Ok(None);
    }

    match fs::read(&file_path) {
        Ok(data) => {
            writeln!(output, "Image file {} read successfully.", file_path)?;
            Ok(Some(data))
        }
        Err(e) if e.kind() == ErrorKind::NotFound => {
            writeln!(output, "File not found: {}", file_path)?;
            Ok(None)
        }
        Err(e) => {
            writeln!(output, "Error reading file: {}", e)?;
            Ok(None)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn run_manual(script: &str) -> (MealRecord, String) {
        let mut input = Cursor::new(script.as_bytes().to_vec());
        let mut output = Vec::new();
        let record = manual_entry(&mut input, &mut output).unwrap();
        (record, String::from_utf8(output).unwrap())
    }

    #[test]
    fn test_choose_mode_accepts_mixed_case() {
        let mut input = Cursor::new(b"PHOTO\n".to_vec());
        let mut output = Vec::new();
        assert_eq!(
            choose_mode(&mut input, &mut output).unwrap(),
            InputMode::Photo
        );
    }

    #[test]
    fn test_choose_mode_reprompts_on_invalid_input() {
        let mut input = Cursor::new(b"camera\n\nManual\n".to_vec());
        let mut output = Vec::new();

        assert_eq!(
            choose_mode(&mut input, &mut output).unwrap(),
            InputMode::Manual
        );
        let printed = String::from_utf8(output).unwrap();
        assert_eq!(printed.matches("Invalid choice").count(), 2);
    }

    #[test]
    fn test_choose_mode_fails_on_closed_input() {
        let mut input = Cursor::new(b"".to_vec());
        let mut output = Vec::new();
        assert!(choose_mode(&mut input, &mut output).is_err());
    }

    #[test]
    fn test_manual_entry_single_ingredient() {
        let (record, output) = run_manual("Rice Bowl\nrice\n200g\ndone\n");

        assert_eq!(record.name, "Rice Bowl");
        assert_eq!(record.serving_size_grams, "100");
        assert_eq!(record.ingredients, vec!["rice: 200g"]);
        assert!(output.contains("Default serving size = 100 gm."));
    }

    #[test]
    fn test_manual_entry_sentinel_is_case_insensitive() {
        let (record, _) = run_manual("Snack\nDONE\n");
        assert!(record.ingredients.is_empty());
    }

    #[test]
    fn test_manual_entry_reprompts_on_blank_quantity() {
        let (record, output) = run_manual("Soup\nlentils\n   \n150g\ndone\n");

        // One entry, no duplicate; the name prompt was not repeated.
        assert_eq!(record.ingredients, vec!["lentils: 150g"]);
        assert!(output.contains("Quantity cannot be empty."));
        assert_eq!(output.matches("Enter quantity for lentils:").count(), 2);
        assert_eq!(output.matches("Enter ingredient name").count(), 2);
    }

    #[test]
    fn test_collect_image_bytes_rejects_empty_path() {
        let mut input = Cursor::new(b"\n".to_vec());
        let mut output = Vec::new();

        let result = collect_image_bytes(&mut input, &mut output).unwrap();
        assert!(result.is_none());
        assert!(String::from_utf8(output)
            .unwrap()
            .contains("No file path provided."));
    }

    #[test]
    fn test_collect_image_bytes_reports_missing_file() {
        let mut input = Cursor::new(b"/no/such/file.jpg\n".to_vec());
        let mut output = Vec::new();

        let result = collect_image_bytes(&mut input, &mut output).unwrap();
        assert!(result.is_none());
        assert!(String::from_utf8(output)
            .unwrap()
            .contains("File not found: /no/such/file.jpg"));
    }

    #[test]
    fn test_collect_image_bytes_reads_existing_file() {
        let path = std::env::temp_dir().join("mealscan_input_test.bin");
        fs::write(&path, b"fake image bytes").unwrap();

        let mut input = Cursor::new(format!("{}\n", path.display()).into_bytes());
        let mut output = Vec::new();

        let result = collect_image_bytes(&mut input, &mut output).unwrap();
        assert_eq!(result.unwrap(), b"fake image bytes");
        assert!(String::from_utf8(output)
            .unwrap()
            .contains("read successfully"));
    }
}
