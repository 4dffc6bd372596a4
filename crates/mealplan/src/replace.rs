use std::sync::Arc;

use mealdeck_shared::mealplan::{Meal, MealPlanType};
use mealdeck_shared::shopping::{IngredientDelta, replacement_delta};
use mealdeck_shared::{Result, date};
use time::Date;
use uuid::Uuid;

use crate::{ChangeFeed, PlanEvent, RemotePlanService, ShoppingListService, SharedPlanCache};

/// Swaps one meal for another inside an existing plan and reconciles the
/// plan's shopping list with the ingredient delta.
pub struct MealReplacementEngine {
    owner_id: String,
    remote: Arc<dyn RemotePlanService>,
    shopping: Arc<dyn ShoppingListService>,
    cache: SharedPlanCache,
    feed: ChangeFeed,
}

impl MealReplacementEngine {
    pub fn new(
        owner_id: impl Into<String>,
        remote: Arc<dyn RemotePlanService>,
        shopping: Arc<dyn ShoppingListService>,
        cache: SharedPlanCache,
        feed: ChangeFeed,
    ) -> Self {
        Self {
            owner_id: owner_id.into(),
            remote,
            shopping,
            cache,
            feed,
        }
    }

    /// Replaces `old_meal` with `new_meal` in the slot of `meal_type` on
    /// `date`.
    ///
    /// The remote write either fully applies or nothing changes locally.
    /// Once it has applied, the substitution stands: a shopping-list
    /// failure afterwards is logged and left for the user, not rolled
    /// back and not retried.
    pub async fn replace(
        &self,
        old_meal: &Meal,
        new_meal: Meal,
        meal_type: MealPlanType,
        date: Date,
    ) -> Result<()> {
        self.remote
            .replace_meal_in_plan(date, meal_type, &new_meal)
            .await?;

        let week = date::week_start(date);
        let plan_id = self.owning_plan(meal_type, week).await;

        if let Some(plan_id) = plan_id {
            self.apply_optimistic(plan_id, date::day_index(date, week), new_meal.clone());
        }
        self.feed.publish(PlanEvent::Updated {
            owner_id: self.owner_id.clone(),
        });

        let Some(plan_id) = plan_id else {
            tracing::warn!(
                %meal_type,
                "no active plan found after substitution, leaving shopping list untouched"
            );
            return Ok(());
        };

        let delta = replacement_delta(&old_meal.ingredients, &new_meal.ingredients);
        if let Err(err) = self.apply_delta(plan_id, &delta).await {
            tracing::warn!(%err, %plan_id, "shopping list reconciliation failed, keeping the substitution");
        }

        Ok(())
    }

    /// The active plan covering (`week`, `meal_type`), from cached
    /// summaries or a fresh listing on miss.
    async fn owning_plan(&self, meal_type: MealPlanType, week: Date) -> Option<Uuid> {
        let cached = self.cache.lock().summaries(&self.owner_id);
        let summaries = match cached {
            Some(summaries) => summaries,
            None => match self.remote.list_plans(&self.owner_id).await {
                Ok(fresh) => {
                    self.cache
                        .lock()
                        .put_summaries(self.owner_id.as_str(), fresh.clone());
                    fresh
                }
                Err(err) => {
                    tracing::warn!(%err, "listing plans after substitution failed");
                    return None;
                }
            },
        };

        summaries
            .iter()
            .find(|s| s.is_active && s.meal_plan_type == meal_type && s.starts_week(week))
            .map(|s| s.id)
    }

    /// Rewrites the cached detail with the slot swapped, replacing the
    /// entry wholesale. A detail that is not cached stays uncached; the
    /// next read fetches the already-persisted state.
    fn apply_optimistic(&self, plan_id: Uuid, day_index: usize, new_meal: Meal) {
        let mut cache = self.cache.lock();
        let Some(mut detail) = cache.detail(&plan_id) else {
            return;
        };

        if let Some(slot) = detail.day_meals.get_mut(day_index) {
            slot.meal = new_meal;
            cache.put_detail(detail);
        }
    }

    /// Removal is unconditional: an ingredient missing from the new meal
    /// comes off the list even if another meal this week still uses it.
    async fn apply_delta(&self, plan_id: Uuid, delta: &IngredientDelta) -> Result<()> {
        if !delta.to_remove.is_empty() {
            self.shopping.remove_items(plan_id, &delta.to_remove).await?;
        }
        if !delta.to_add.is_empty() {
            self.shopping.add_items(plan_id, &delta.to_add).await?;
        }

        Ok(())
    }
}
