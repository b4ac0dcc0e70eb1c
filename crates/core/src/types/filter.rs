//! Dietary filters offered when generating recipes.

use serde::{Deserialize, Serialize};

/// A dietary preference the recipe prompt should honour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DietaryFilter {
    Vegetarian,
    HighProtein,
    ChickenDishes,
    HighVeggie,
    LowCalorie,
}

impl DietaryFilter {
    /// Every filter, in display order.
    pub const ALL: [Self; 5] = [
        Self::Vegetarian,
        Self::HighProtein,
        Self::ChickenDishes,
        Self::HighVeggie,
        Self::LowCalorie,
    ];

    /// The label shown to users and embedded in the recipe prompt.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Vegetarian => "Vegetarian",
            Self::HighProtein => "High Protein",
            Self::ChickenDishes => "Chicken Dishes",
            Self::HighVeggie => "High Veggie",
            Self::LowCalorie => "Low Calorie",
        }
    }
}

impl std::fmt::Display for DietaryFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

impl std::str::FromStr for DietaryFilter {
    type Err = String;

    /// Accepts the display label or a kebab/snake-case form, ignoring case.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key: String = s
            .trim()
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .map(|c| c.to_ascii_lowercase())
            .collect();

        Self::ALL
            .into_iter()
            .find(|filter| {
                filter
                    .label()
                    .chars()
                    .filter(char::is_ascii_alphanumeric)
                    .map(|c| c.to_ascii_lowercase())
                    .eq(key.chars())
            })
            .ok_or_else(|| format!("unknown dietary filter: {s}"))
    }
}
