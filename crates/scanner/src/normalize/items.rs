//! Item list parsing.

use chopchop_core::{CandidateItem, PerishDays};
use serde_json::{Map, Value};

use super::NormalizeError;

const NAME_KEYS: &[&str] = &["item", "name", "item_name"];
const PERISH_KEYS: &[&str] = &["perish_in_days", "perishDays", "perish_days"];

/// Remove a surrounding markdown code fence, if any.
///
/// Handles an opening fence with an optional language tag (```` ```json ````)
/// and a closing fence. Text without fences is only trimmed.
#[must_use]
pub fn strip_code_fences(raw: &str) -> &str {
    let mut text = raw.trim();

    if let Some(rest) = text.strip_prefix("```") {
        // Language tag runs up to the first non-alphanumeric character
        text = rest.trim_start_matches(|c: char| c.is_ascii_alphanumeric());
    }
    if let Some(rest) = text.strip_suffix("```") {
        text = rest;
    }

    text.trim()
}

/// Parse a model reply into candidate items.
///
/// The whole reply is rejected if it is not a JSON array, or if any element
/// lacks a usable name or perish estimate. Partial lists are never returned.
///
/// # Errors
///
/// Returns [`NormalizeError`] with the reason and the fence-stripped text.
pub fn parse_items(raw: &str) -> Result<Vec<CandidateItem>, NormalizeError> {
    let text = strip_code_fences(raw);

    let value: Value = serde_json::from_str(text)
        .map_err(|e| NormalizeError::new(format!("invalid JSON: {e}"), text))?;

    let Value::Array(elements) = value else {
        return Err(NormalizeError::new("expected a JSON array", text));
    };

    elements
        .iter()
        .enumerate()
        .map(|(index, element)| {
            parse_element(element).map_err(|reason| NormalizeError::new(format!("item {index}: {reason}"), text))
        })
        .collect()
}

fn parse_element(element: &Value) -> Result<CandidateItem, String> {
    let Value::Object(fields) = element else {
        return Err("not an object".to_string());
    };

    let name = first_field(fields, NAME_KEYS)
        .ok_or("missing item name")?
        .as_str()
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .ok_or("item name must be a non-empty string")?;

    let perish = first_field(fields, PERISH_KEYS).ok_or("missing perish_in_days")?;
    let perish_days = perish_days(perish).ok_or_else(|| format!("unusable perish_in_days: {perish}"))?;

    Ok(CandidateItem::new(name, perish_days))
}

fn first_field<'a>(fields: &'a Map<String, Value>, keys: &[&str]) -> Option<&'a Value> {
    keys.iter().find_map(|key| fields.get(*key))
}

fn perish_days(value: &Value) -> Option<PerishDays> {
    match value {
        Value::Number(n) => n
            .as_i64()
            .map(PerishDays::clamped)
            .or_else(|| n.as_u64().map(|_| PerishDays::clamped(i64::MAX)))
            .or_else(|| n.as_f64().and_then(PerishDays::from_f64)),
        Value::String(s) => {
            let s = s.trim();
            s.parse::<i64>()
                .ok()
                .map(PerishDays::clamped)
                .or_else(|| s.parse::<f64>().ok().and_then(PerishDays::from_f64))
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(name: &str, days: i64) -> CandidateItem {
        CandidateItem::new(name, PerishDays::clamped(days))
    }

    #[test]
    fn test_strip_code_fences() {
        assert_eq!(strip_code_fences("```json\n[1]\n```"), "[1]");
        assert_eq!(strip_code_fences("```\n[1]\n```"), "[1]");
        assert_eq!(strip_code_fences("  [1]  "), "[1]");
        assert_eq!(strip_code_fences("```JSON [1]```"), "[1]");
        assert_eq!(strip_code_fences("[1]\n```"), "[1]");
    }

    #[test]
    fn test_fenced_and_plain_parse_identically() {
        let plain = r#"[{"item": "🍞 Bread", "perish_in_days": 5}]"#;
        let fenced = format!("```json\n{plain}\n```");
        assert_eq!(parse_items(plain).expect("plain"), parse_items(&fenced).expect("fenced"));
        assert_eq!(parse_items(plain).expect("plain"), vec![item("🍞 Bread", 5)]);
    }

    #[test]
    fn test_parses_receipt_example() {
        let raw = r#"[{"item":"🥛 Milk","perish_in_days":7},{"item":"🍞 Bread","perish_in_days":5}]"#;
        assert_eq!(
            parse_items(raw).expect("items"),
            vec![item("🥛 Milk", 7), item("🍞 Bread", 5)]
        );
    }

    #[test]
    fn test_empty_array_is_ok() {
        assert!(parse_items("[]").expect("empty").is_empty());
    }

    #[test]
    fn test_prose_is_malformed_with_text() {
        let err = parse_items("Sorry, I can't read that receipt.").expect_err("prose");
        assert!(err.reason.starts_with("invalid JSON"));
        assert_eq!(err.text, "Sorry, I can't read that receipt.");
    }

    #[test]
    fn test_object_instead_of_array() {
        let err = parse_items(r#"{"item": "Milk", "perish_in_days": 7}"#).expect_err("object");
        assert_eq!(err.reason, "expected a JSON array");
    }

    #[test]
    fn test_one_bad_element_rejects_all() {
        let raw = r#"[{"item": "Milk", "perish_in_days": 7}, {"item": "Eggs"}]"#;
        let err = parse_items(raw).expect_err("missing perish");
        assert!(err.reason.starts_with("item 1:"));

        let raw = r#"[{"item": "Milk", "perish_in_days": 7}, "Eggs"]"#;
        assert!(parse_items(raw).is_err());

        let raw = r#"[{"item": "   ", "perish_in_days": 7}]"#;
        assert!(parse_items(raw).is_err());

        let raw = r#"[{"item": "Milk", "perish_in_days": "soon"}]"#;
        assert!(parse_items(raw).is_err());
    }

    #[test]
    fn test_alternate_keys_and_numeric_forms() {
        let raw = r#"[
            {"name": "Apples", "perishDays": 10.6},
            {"item_name": " Rice ", "perish_days": "365"},
            {"item": "Yogurt", "perish_in_days": "4.5"}
        ]"#;
        assert_eq!(
            parse_items(raw).expect("items"),
            vec![item("Apples", 11), item("Rice", 365), item("Yogurt", 5)]
        );
    }

    #[test]
    fn test_perish_days_are_clamped() {
        let raw = r#"[{"item": "Salt", "perish_in_days": 99999}, {"item": "Fish", "perish_in_days": -2}]"#;
        assert_eq!(
            parse_items(raw).expect("items"),
            vec![item("Salt", i64::from(PerishDays::MAX)), item("Fish", 0)]
        );
    }
}
