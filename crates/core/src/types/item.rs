//! Candidate items extracted from a receipt.

use serde::{Deserialize, Serialize};

/// Estimated number of days until a grocery item perishes.
///
/// Always non-negative and capped at [`PerishDays::MAX`]; the constructors
/// clamp rather than reject because the estimate comes from a language model
/// and a wildly large guess is still a usable "keeps for a long time".
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PerishDays(u32);

impl PerishDays {
    /// Upper bound on an estimate (ten years).
    pub const MAX: u32 = 3650;

    /// Create from a day count, clamping to `0..=MAX`.
    #[must_use]
    pub fn clamped(days: i64) -> Self {
        let days = days.clamp(0, i64::from(Self::MAX));
        Self(u32::try_from(days).unwrap_or(Self::MAX))
    }

    /// Create from a fractional estimate, rounding half away from zero.
    ///
    /// Returns `None` for NaN or infinite input.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)] // clamped to u32 range below
    pub fn from_f64(days: f64) -> Option<Self> {
        if !days.is_finite() {
            return None;
        }
        let rounded = days.round().clamp(0.0, f64::from(Self::MAX));
        Some(Self(rounded as u32))
    }

    /// Number of days.
    #[must_use]
    pub const fn get(self) -> u32 {
        self.0
    }
}

impl std::fmt::Display for PerishDays {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A normalized `(name, perish days)` pair produced from a model response.
///
/// Serializes with the same field names the extraction prompt asks for, so
/// echoing the parsed list back to the user looks like what the model sent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CandidateItem {
    /// Item name, possibly led by an emoji marker (e.g. "🍞 Bread").
    #[serde(rename = "item")]
    pub name: String,
    /// Estimated days until the item perishes.
    #[serde(rename = "perish_in_days")]
    pub perish_days: PerishDays,
}

impl CandidateItem {
    /// Create a candidate item.
    #[must_use]
    pub fn new(name: impl Into<String>, perish_days: PerishDays) -> Self {
        Self {
            name: name.into(),
            perish_days,
        }
    }

    /// The leading presentation symbol, if the name starts with one.
    ///
    /// A symbol is a first whitespace-separated token containing no
    /// alphanumeric characters.
    #[must_use]
    pub fn symbol(&self) -> Option<&str> {
        let (first, rest) = self.name.split_once(char::is_whitespace)?;
        (!first.is_empty() && !rest.trim().is_empty() && !first.chars().any(char::is_alphanumeric))
            .then_some(first)
    }

    /// The name with any leading symbol removed.
    #[must_use]
    pub fn plain_name(&self) -> &str {
        self.symbol()
            .and_then(|symbol| self.name.strip_prefix(symbol))
            .map_or(self.name.as_str(), str::trim_start)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_perish_days_clamps() {
        assert_eq!(PerishDays::clamped(-4).get(), 0);
        assert_eq!(PerishDays::clamped(7).get(), 7);
        assert_eq!(PerishDays::clamped(1_000_000).get(), PerishDays::MAX);
    }

    #[test]
    fn test_perish_days_from_f64_rounds() {
        assert_eq!(PerishDays::from_f64(2.5).map(PerishDays::get), Some(3));
        assert_eq!(PerishDays::from_f64(2.4).map(PerishDays::get), Some(2));
        assert_eq!(PerishDays::from_f64(-1.0).map(PerishDays::get), Some(0));
        assert!(PerishDays::from_f64(f64::NAN).is_none());
        assert!(PerishDays::from_f64(f64::INFINITY).is_none());
    }

    #[test]
    fn test_symbol_and_plain_name() {
        let bread = CandidateItem::new("🍞 Bread", PerishDays::clamped(5));
        assert_eq!(bread.symbol(), Some("🍞"));
        assert_eq!(bread.plain_name(), "Bread");

        let milk = CandidateItem::new("Whole Milk", PerishDays::clamped(7));
        assert_eq!(milk.symbol(), None);
        assert_eq!(milk.plain_name(), "Whole Milk");
    }

    #[test]
    fn test_serializes_with_prompt_field_names() {
        let item = CandidateItem::new("🥚 Eggs", PerishDays::clamped(21));
        let json = serde_json::to_value(&item).expect("serialize");
        assert_eq!(json, serde_json::json!({"item": "🥚 Eggs", "perish_in_days": 21}));
    }
}
