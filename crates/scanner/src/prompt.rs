//! Instruction text sent to the model.
//!
//! The requested output shapes are conventions only; the normalizers treat
//! every reply as untrusted input.

use chopchop_core::DietaryFilter;

/// Instruction asking for a deduplicated item list with perish estimates.
#[must_use]
pub fn receipt_items(ocr_text: &str) -> String {
    format!(
        "Extract a deduplicated list of generic grocery items from this receipt text. \
         For each item, estimate perish days. Add a relevant emoji before each item name. \
         Return as JSON like [{{\"item\": \"🍞 Bread\", \"perish_in_days\": 5}}].\n\n\
         Receipt:\n{ocr_text}"
    )
}

/// Instruction asking for three markdown recipes from fridge contents.
///
/// `ingredients` should already be ordered soonest-expiring first.
#[must_use]
pub fn recipes<S: AsRef<str>>(ingredients: &[S], filters: &[DietaryFilter]) -> String {
    let ingredient_list = ingredients
        .iter()
        .map(AsRef::as_ref)
        .collect::<Vec<_>>()
        .join(", ");

    let filter_text = if filters.is_empty() {
        "any".to_string()
    } else {
        filters
            .iter()
            .map(|filter| filter.label())
            .collect::<Vec<_>>()
            .join(", ")
    };

    format!(
        "Given the following ingredients from my fridge: {ingredient_list}.\n\n\
         I want 3 detailed recipe suggestions that:\n\
         - Prioritize ingredients that will expire soon.\n\
         - Fit these dietary filters: {filter_text}.\n\
         - Format the response in clean Markdown:\n  \
         - Use H2 headings (##) for each recipe title\n  \
         - Bold section titles like **Ingredients:** and **Instructions:**\n  \
         - Bullet lists for ingredients\n  \
         - Numbered steps for instructions\n\n\
         Please avoid extra text outside the recipes."
    )
}
