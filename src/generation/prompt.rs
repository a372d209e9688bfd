//! Prompt compilation for the text model
//!
//! Pure and deterministic: the same request always compiles to the same
//! instruction block, which keeps it golden-file testable. Every populated
//! request field emits exactly one constraint line; an absent field emits
//! nothing rather than a default.

use std::fmt::Write;

use super::{GenerationRequest, Locale};

/// Example payload the model is told to imitate, byte for byte.
const EXAMPLE_PAYLOAD: &str = r#"{
  "title": "Recipe Name",
  "description": "Brief description",
  "serving_size": 4,
  "cooking_time": 45,
  "prep_time": 15,
  "difficulty": "medium",
  "ingredients": [
    {"name": "chicken breast", "quantity": "500", "unit": "g"},
    {"name": "pasta", "quantity": "400", "unit": "g"}
  ],
  "steps": [
    {"step_number": 1, "instruction": "detailed instruction", "timing": "5 minutes", "temperature": "180°C"},
    {"step_number": 2, "instruction": "next instruction", "timing": "10 minutes", "temperature": ""}
  ],
  "tips": ["tip 1", "tip 2"],
  "cuisine_type": "Italian",
  "meat_type": "Chicken"
}"#;

/// Compiles a generation request into the instruction block sent to the
/// text model.
pub fn compile(request: &GenerationRequest) -> String {
    let mut out = String::new();

    out.push_str(
        "You are a professional chef and recipe creator. Generate a detailed, high-quality recipe in JSON format.\n\n",
    );

    if request.language == Locale::Sk {
        out.push_str("IMPORTANT: Generate this recipe IN SLOVAK LANGUAGE (Slovenčina).\n");
        out.push_str("All text must be in Slovak:\n");
        out.push_str("- Recipe title in Slovak\n");
        out.push_str("- Description in Slovak\n");
        out.push_str("- Ingredient names in Slovak\n");
        out.push_str("- Instructions in Slovak\n");
        out.push_str("- Tips in Slovak\n\n");
    }

    out.push_str("Requirements:\n");

    match request.meat_type.as_deref() {
        Some(meat) if meat != "None (Vegetarian)" => {
            let _ = writeln!(out, "- Main protein: {meat}");
        }
        _ => out.push_str("- Vegetarian recipe (no meat)\n"),
    }

    if let Some(cuisine) = request.cuisine_type.as_deref() {
        let _ = writeln!(out, "- Cuisine style: {cuisine}");
    }

    if !request.side_ingredients.is_empty() {
        let _ = writeln!(
            out,
            "- Include these ingredients: {}",
            request.side_ingredients.join(", ")
        );
    }

    if !request.dietary_preferences.is_empty() {
        let _ = writeln!(
            out,
            "- Dietary requirements: {}",
            request.dietary_preferences.join(", ")
        );
    }

    if let Some(band) = request.cooking_time {
        let _ = writeln!(out, "- Total cooking time: {}", band.as_phrase());
    }

    if let Some(difficulty) = request.difficulty {
        let _ = writeln!(out, "- Difficulty level: {}", difficulty.as_str());
    }

    out.push_str("\nPlease provide a recipe with:\n");
    out.push_str("1. A creative and appetizing title\n");
    out.push_str("2. A brief description (2-3 sentences)\n");
    out.push_str("3. Precise ingredient list with measurements in METRIC/EUROPEAN units:\n");
    out.push_str("   - Use grams (g) or kilograms (kg) for solid ingredients\n");
    out.push_str("   - Use milliliters (ml) or liters (l) for liquids\n");
    out.push_str("   - Use pieces, cloves, pinches for items like garlic, spices\n");
    out.push_str("   - DO NOT use cups, teaspoons (tsp), tablespoons (tbsp), or ounces\n");
    out.push_str("   - Use Celsius (°C) for all temperatures\n");
    out.push_str("4. Detailed step-by-step cooking instructions\n");
    out.push_str("5. Each step should include timing and temperature where relevant\n");
    out.push_str("6. Professional cooking tips and techniques\n");
    out.push_str("7. Serving size (number of people)\n\n");

    out.push_str("IMPORTANT: Return ONLY valid JSON in this EXACT format:\n");
    out.push_str("- serving_size, cooking_time, prep_time, step_number must be NUMBERS (not strings)\n");
    out.push_str("- ingredient quantity must be a STRING (e.g., \"500\" not 500)\n");
    out.push_str("- timing and temperature in steps must be STRINGS\n\n");
    out.push_str(EXAMPLE_PAYLOAD);
    out.push_str("\n\nGenerate the recipe now:");

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generation::{CookingTimeBand, RequestedDifficulty};

    fn full_request() -> GenerationRequest {
        GenerationRequest {
            meat_type: Some("Chicken".to_string()),
            cuisine_type: Some("Italian".to_string()),
            side_ingredients: vec!["Pasta".to_string(), "Vegetables".to_string()],
            dietary_preferences: vec!["gluten-free".to_string()],
            cooking_time: Some(CookingTimeBand::Quick),
            difficulty: Some(RequestedDifficulty::Easy),
            language: Locale::En,
        }
    }

    #[test]
    fn emits_one_line_per_populated_field() {
        let compiled = compile(&full_request());
        assert!(compiled.contains("- Main protein: Chicken\n"));
        assert!(compiled.contains("- Cuisine style: Italian\n"));
        assert!(compiled.contains("- Include these ingredients: Pasta, Vegetables\n"));
        assert!(compiled.contains("- Dietary requirements: gluten-free\n"));
        assert!(compiled.contains("- Total cooking time: under 30 minutes\n"));
        assert!(compiled.contains("- Difficulty level: easy\n"));
    }

    #[test]
    fn absent_fields_emit_no_lines() {
        let compiled = compile(&GenerationRequest::default());
        assert!(!compiled.contains("- Cuisine style:"));
        assert!(!compiled.contains("- Include these ingredients:"));
        assert!(!compiled.contains("- Dietary requirements:"));
        assert!(!compiled.contains("- Total cooking time:"));
        assert!(!compiled.contains("- Difficulty level:"));
    }

    #[test]
    fn missing_or_sentinel_meat_asks_for_vegetarian() {
        let compiled = compile(&GenerationRequest::default());
        assert!(compiled.contains("- Vegetarian recipe (no meat)\n"));

        let request = GenerationRequest {
            meat_type: Some("None (Vegetarian)".to_string()),
            ..Default::default()
        };
        assert!(compile(&request).contains("- Vegetarian recipe (no meat)\n"));
    }

    #[test]
    fn slovak_locale_prepends_language_instructions() {
        let request = GenerationRequest {
            language: Locale::Sk,
            ..full_request()
        };
        let compiled = compile(&request);
        assert!(compiled.contains("IN SLOVAK LANGUAGE"));

        let english = compile(&full_request());
        assert!(!english.contains("IN SLOVAK LANGUAGE"));
    }

    #[test]
    fn formatting_rules_and_template_always_present() {
        let compiled = compile(&GenerationRequest::default());
        assert!(compiled.contains("DO NOT use cups, teaspoons (tsp), tablespoons (tbsp), or ounces"));
        assert!(compiled.contains("Use Celsius (°C) for all temperatures"));
        assert!(compiled.contains(EXAMPLE_PAYLOAD));
    }

    #[test]
    fn deterministic_for_identical_input() {
        assert_eq!(compile(&full_request()), compile(&full_request()));
    }
}
