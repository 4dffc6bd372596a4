use std::collections::BTreeSet;

use async_trait::async_trait;
use mealdeck_shared::Result;
use mealdeck_shared::completion::{CompletionRecord, CompletionState};
use mealdeck_shared::mealplan::{Meal, MealPlanType, PlanDetail, PlanSummary};
use time::Date;
use uuid::Uuid;

/// Remote system of record for meal plans. The cache in front of it is a
/// performance optimization, never the source of truth for a
/// correctness-critical decision.
#[async_trait]
pub trait RemotePlanService: Send + Sync {
    async fn list_plans(&self, owner_id: &str) -> Result<Vec<PlanSummary>>;

    async fn get_detail(&self, plan_id: Uuid) -> Result<PlanDetail>;

    /// Removes the plan; the remote side cascades deletion of the plan's
    /// shopping list.
    async fn delete(&self, plan_id: Uuid) -> Result<()>;

    async fn replace_meal_in_plan(
        &self,
        date: Date,
        meal_type: MealPlanType,
        new_meal: &Meal,
    ) -> Result<()>;
}

#[async_trait]
pub trait ShoppingListService: Send + Sync {
    async fn add_items(&self, plan_id: Uuid, items: &BTreeSet<String>) -> Result<()>;

    async fn remove_items(&self, plan_id: Uuid, items: &BTreeSet<String>) -> Result<()>;
}

/// External completion tracker. State is queried fresh on every use so two
/// rapid toggles are arbitrated by the remote side, not by a local cache.
#[async_trait]
pub trait CompletionService: Send + Sync {
    async fn completions_for(&self, date: Date) -> Result<Vec<CompletionRecord>>;

    async fn mark_meal(
        &self,
        date: Date,
        meal_type: MealPlanType,
        state: CompletionState,
    ) -> Result<()>;
}
