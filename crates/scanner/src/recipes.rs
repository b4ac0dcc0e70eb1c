//! Recipe suggestions from fridge contents.

use std::sync::Arc;

use chopchop_core::DietaryFilter;
use tracing::instrument;

use crate::bridge::{self, CompletionBackend};
use crate::error::PipelineError;
use crate::normalize;
use crate::store::{InventoryStore, Session};

/// Asks the model for recipes built from the user's fridge.
#[derive(Clone)]
pub struct RecipeGenerator {
    store: Arc<dyn InventoryStore>,
    backend: Arc<dyn CompletionBackend>,
}

impl std::fmt::Debug for RecipeGenerator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RecipeGenerator").finish_non_exhaustive()
    }
}

impl RecipeGenerator {
    #[must_use]
    pub fn new(store: Arc<dyn InventoryStore>, backend: Arc<dyn CompletionBackend>) -> Self {
        Self { store, backend }
    }

    /// Generate markdown recipes, one string per `##` section.
    ///
    /// Ingredients are sent soonest-expiring first. An empty fridge yields
    /// no recipes without calling the model.
    ///
    /// # Errors
    ///
    /// Returns `NoAuthenticatedUser` without a session, `PersistenceFailure`
    /// if the fridge cannot be read, or the extraction errors of the model
    /// call.
    #[instrument(skip_all, fields(filters = filters.len()))]
    pub async fn generate(
        &self,
        session: Option<&Session>,
        filters: &[DietaryFilter],
    ) -> Result<Vec<String>, PipelineError> {
        let session = session.ok_or(PipelineError::NoAuthenticatedUser)?;

        let rows = self.store.list_rows(session).await.map_err(|e| {
            tracing::error!(error = %e, "Failed to read fridge for recipes");
            PipelineError::from(e)
        })?;

        if rows.is_empty() {
            tracing::info!("Fridge is empty; no recipes requested");
            return Ok(Vec::new());
        }

        let ingredients: Vec<&str> = rows.iter().map(|row| row.item_name.as_str()).collect();
        let reply = bridge::request_recipes(self.backend.as_ref(), &ingredients, filters)
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "Recipe generation failed");
                PipelineError::from(e)
            })?;

        let recipes = normalize::split_recipes(&reply);
        if recipes.is_empty() {
            tracing::warn!("Model reply contained no recipe headings");
        }
        Ok(recipes)
    }
}
