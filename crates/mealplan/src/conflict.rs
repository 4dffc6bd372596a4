use std::sync::Arc;

use mealdeck_shared::mealplan::MealPlanType;
use mealdeck_shared::{Result, date};
use time::Date;
use uuid::Uuid;

use crate::{ChangeFeed, PlanEvent, RemotePlanService, SharedPlanCache};

/// What the plan creation flow should do next.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Decision {
    ProceedToCreate,
    Conflict { existing: Uuid, week_label: String },
}

/// Gatekeeper for plan creation: a week carries at most one active plan
/// per meal type, and replacing the existing one is the only way past a
/// conflict.
pub struct ConflictGuard {
    owner_id: String,
    remote: Arc<dyn RemotePlanService>,
    cache: SharedPlanCache,
    feed: ChangeFeed,
}

impl ConflictGuard {
    pub fn new(
        owner_id: impl Into<String>,
        remote: Arc<dyn RemotePlanService>,
        cache: SharedPlanCache,
        feed: ChangeFeed,
    ) -> Self {
        Self {
            owner_id: owner_id.into(),
            remote,
            cache,
            feed,
        }
    }

    /// Checks whether a plan of `meal_type` can be created for the week of
    /// `date`.
    ///
    /// Reads the summary list fresh from the remote service rather than
    /// trusting the cache: a stale read here could let a second active
    /// plan through. The fresh listing re-primes the cache on the way.
    pub async fn check(&self, meal_type: MealPlanType, date: Date) -> Result<Decision> {
        let week = date::week_start(date);
        let summaries = self.remote.list_plans(&self.owner_id).await?;
        self.cache
            .lock()
            .put_summaries(self.owner_id.as_str(), summaries.clone());

        match summaries
            .iter()
            .find(|s| s.is_active && s.meal_plan_type == meal_type && s.starts_week(week))
        {
            Some(existing) => Ok(Decision::Conflict {
                existing: existing.id,
                week_label: date::week_label(week),
            }),
            None => Ok(Decision::ProceedToCreate),
        }
    }

    /// Destructive half of the conflict prompt: deletes the old plan (the
    /// remote side cascades its shopping list), empties the cache and
    /// notifies other views. Choosing to keep the old plan is simply not
    /// calling this.
    pub async fn replace_existing(&self, plan_id: Uuid) -> Result<Decision> {
        self.remote.delete(plan_id).await?;
        self.cache.lock().invalidate_all();
        self.feed.publish(PlanEvent::Updated {
            owner_id: self.owner_id.clone(),
        });

        Ok(Decision::ProceedToCreate)
    }
}
