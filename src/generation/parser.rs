//! Reply parsing for the text model
//!
//! The model's reply is free text believed to contain a JSON payload,
//! often with commentary around it. The payload is isolated by brace
//! positions, decoded against a permissive schema (quantities can arrive
//! as strings or numbers), and normalized so nothing past this module
//! ever sees the union type.

use serde::Deserialize;

use super::{CookingStep, GenerationRequest, Ingredient, RecipeDraft};
use crate::error::SaucierError;

/// A quantity as the model may emit it. Normalized to a string
/// immediately after decoding; never propagated further.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Quantity {
    Text(String),
    Number(f64),
}

impl Quantity {
    fn into_string(self) -> String {
        match self {
            Quantity::Text(text) => text,
            Quantity::Number(n) => {
                if n.fract() == 0.0 && n.abs() < 1e15 {
                    format!("{}", n as i64)
                } else {
                    format!("{n}")
                }
            }
        }
    }
}

#[derive(Debug, Deserialize)]
struct RawIngredient {
    name: String,
    quantity: Quantity,
    #[serde(default)]
    unit: String,
}

#[derive(Debug, Deserialize)]
struct RawStep {
    step_number: i32,
    instruction: String,
    #[serde(default)]
    timing: String,
    #[serde(default)]
    temperature: String,
}

#[derive(Debug, Deserialize)]
struct RawRecipe {
    title: String,
    description: String,
    serving_size: i32,
    cooking_time: i32,
    prep_time: i32,
    difficulty: String,
    ingredients: Vec<RawIngredient>,
    steps: Vec<RawStep>,
    #[serde(default)]
    tips: Vec<String>,
    cuisine_type: String,
    meat_type: String,
}

/// Parses the raw model reply into a recipe draft.
///
/// Dietary tags come from the original request: the model is not the
/// source of truth for constraints the user already specified.
pub fn parse(raw_text: &str, request: &GenerationRequest) -> Result<RecipeDraft, SaucierError> {
    let start = raw_text.find('{');
    let end = raw_text.rfind('}');
    let (start, end) = match (start, end) {
        (Some(start), Some(end)) if start < end => (start, end),
        _ => return Err(SaucierError::InvalidPayload),
    };

    let raw: RawRecipe = serde_json::from_str(&raw_text[start..=end])
        .map_err(|err| SaucierError::MalformedPayload(err.to_string()))?;

    if raw.ingredients.is_empty() {
        return Err(SaucierError::MalformedPayload(
            "recipe has no ingredients".to_string(),
        ));
    }
    if raw.steps.is_empty() {
        return Err(SaucierError::MalformedPayload(
            "recipe has no steps".to_string(),
        ));
    }

    let ingredients = raw
        .ingredients
        .into_iter()
        .map(|ingredient| Ingredient {
            name: ingredient.name,
            quantity: ingredient.quantity.into_string(),
            unit: ingredient.unit,
        })
        .collect();

    let steps = raw
        .steps
        .into_iter()
        .map(|step| CookingStep {
            step_number: step.step_number,
            instruction: step.instruction,
            timing: step.timing,
            temperature: step.temperature,
        })
        .collect();

    Ok(RecipeDraft {
        title: raw.title,
        description: raw.description,
        serving_size: raw.serving_size,
        prep_time_minutes: raw.prep_time,
        cook_time_minutes: raw.cooking_time,
        difficulty: raw.difficulty,
        ingredients,
        steps,
        tips: raw.tips,
        cuisine_type: raw.cuisine_type,
        meat_type: raw.meat_type,
        dietary_tags: request.dietary_preferences.clone(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payload(quantity: &str) -> String {
        format!(
            r#"{{
                "title": "Lemon Chicken",
                "description": "Bright and simple.",
                "serving_size": 4,
                "cooking_time": 25,
                "prep_time": 10,
                "difficulty": "easy",
                "ingredients": [
                    {{"name": "chicken breast", "quantity": {quantity}, "unit": "g"}}
                ],
                "steps": [
                    {{"step_number": 1, "instruction": "Sear the chicken.", "timing": "5 minutes", "temperature": "200°C"}}
                ],
                "tips": ["Rest the meat."],
                "cuisine_type": "Italian",
                "meat_type": "Chicken"
            }}"#
        )
    }

    #[test]
    fn numeric_and_string_quantities_normalize_identically() {
        let request = GenerationRequest::default();
        let from_number = parse(&payload("500"), &request).expect("parse numeric");
        let from_string = parse(&payload("\"500\""), &request).expect("parse string");
        assert_eq!(from_number.ingredients[0].quantity, "500");
        assert_eq!(from_number.ingredients[0], from_string.ingredients[0]);
    }

    #[test]
    fn fractional_quantities_keep_their_decimals() {
        let request = GenerationRequest::default();
        let draft = parse(&payload("2.5"), &request).expect("parse fractional");
        assert_eq!(draft.ingredients[0].quantity, "2.5");
    }

    #[test]
    fn surrounding_prose_is_tolerated() {
        let request = GenerationRequest::default();
        let wrapped = format!(
            "Sure! Here's a recipe you'll love:\n\n{}\n\nEnjoy your meal!",
            payload("\"500\"")
        );
        let draft = parse(&wrapped, &request).expect("parse wrapped");
        assert_eq!(draft.title, "Lemon Chicken");
    }

    #[test]
    fn missing_braces_is_invalid_payload() {
        let request = GenerationRequest::default();
        assert!(matches!(
            parse("I could not generate a recipe today.", &request),
            Err(SaucierError::InvalidPayload)
        ));
        assert!(matches!(
            parse("} backwards {", &request),
            Err(SaucierError::InvalidPayload)
        ));
    }

    #[test]
    fn missing_required_fields_is_malformed_payload() {
        let request = GenerationRequest::default();
        assert!(matches!(
            parse(r#"{"title": "Only a title"}"#, &request),
            Err(SaucierError::MalformedPayload(_))
        ));
    }

    #[test]
    fn empty_ingredients_or_steps_rejected() {
        let request = GenerationRequest::default();
        let no_ingredients = payload("\"500\"").replace(
            r#"{"name": "chicken breast", "quantity": "500", "unit": "g"}"#,
            "",
        );
        assert!(matches!(
            parse(&no_ingredients, &request),
            Err(SaucierError::MalformedPayload(_))
        ));
    }

    #[test]
    fn prep_and_cook_minutes_sum_into_total() {
        let request = GenerationRequest::default();
        let draft = parse(&payload("\"500\""), &request).expect("parse");
        assert_eq!(draft.prep_time_minutes, 10);
        assert_eq!(draft.cook_time_minutes, 25);
        assert_eq!(draft.total_minutes(), 35);
    }

    #[test]
    fn dietary_tags_copied_from_request_not_reply() {
        let request = GenerationRequest {
            dietary_preferences: vec!["dairy-free".to_string()],
            ..Default::default()
        };
        let draft = parse(&payload("\"500\""), &request).expect("parse");
        assert_eq!(draft.dietary_tags, vec!["dairy-free".to_string()]);
    }
}
