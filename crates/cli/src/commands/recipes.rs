//! Recipe suggestions.

use chopchop_core::DietaryFilter;
use chopchop_scanner::recipes::RecipeGenerator;

use crate::context::{Context, say};
use crate::error::CliError;

pub async fn recipes(ctx: &Context, filters: &[DietaryFilter]) -> Result<(), CliError> {
    let stored = ctx.restore().await?;
    let generator = RecipeGenerator::new(ctx.supabase.clone(), ctx.relay()?);

    say("Generating recipes...")?;
    let recipes = generator.generate(Some(&stored.session()), filters).await?;

    if recipes.is_empty() {
        return say("No recipes yet. Add some items to your fridge first.");
    }
    say(recipes.join("\n\n---\n\n"))
}
