use std::sync::Arc;

use mealdeck_mealplan::{
    ChangeFeed, CompletionService, CompletionToggle, ConflictGuard, MealPlanResolver,
    MealReplacementEngine, PlanCache, RemotePlanService, Resolution, ShoppingListService,
};
use mealdeck_shared::mealplan::MealPlanType;
use time::Date;

use crate::config::Config;

/// All meal-plan state for one signed-in user.
///
/// The four components share one cache and one change feed, so a mutation
/// made through any of them reaches the others on their next read. The
/// services come in from outside; tests substitute in-memory fakes.
pub struct Session {
    pub resolver: MealPlanResolver,
    pub conflicts: ConflictGuard,
    pub replacements: MealReplacementEngine,
    pub completions: CompletionToggle,
    feed: ChangeFeed,
}

/// The three slots of one selected day.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DayResolution {
    pub breakfast: Resolution,
    pub lunch: Resolution,
    pub dinner: Resolution,
}

impl Session {
    pub fn new(
        owner_id: impl Into<String>,
        remote: Arc<dyn RemotePlanService>,
        shopping: Arc<dyn ShoppingListService>,
        completions: Arc<dyn CompletionService>,
        config: &Config,
    ) -> Self {
        let owner_id = owner_id.into();
        let cache = PlanCache::with_ttls(
            config.cache.summary_ttl(),
            config.cache.detail_ttl(),
        )
        .shared();
        let feed = ChangeFeed::default();

        Self {
            resolver: MealPlanResolver::new(
                owner_id.clone(),
                remote.clone(),
                cache.clone(),
                feed.subscribe(),
            ),
            conflicts: ConflictGuard::new(
                owner_id.clone(),
                remote.clone(),
                cache.clone(),
                feed.clone(),
            ),
            replacements: MealReplacementEngine::new(
                owner_id,
                remote,
                shopping,
                cache,
                feed.clone(),
            ),
            completions: CompletionToggle::new(completions),
            feed,
        }
    }

    /// Feed carrying "plan updated" notifications. Other views in the
    /// same process subscribe here to stay consistent after a mutation
    /// made by any one of them.
    pub fn change_feed(&self) -> &ChangeFeed {
        &self.feed
    }

    /// Loads all three slots of `date` at once, the way the plan screen
    /// shows a day. Starts a new selection first, so lookups still in
    /// flight for a previously shown day discard their results.
    pub async fn resolve_day(&self, date: Date) -> DayResolution {
        self.resolver.begin_selection();
        let (breakfast, lunch, dinner) = futures::join!(
            self.resolver.resolve(date, MealPlanType::Breakfast),
            self.resolver.resolve(date, MealPlanType::Lunch),
            self.resolver.resolve(date, MealPlanType::Dinner),
        );

        DayResolution {
            breakfast,
            lunch,
            dinner,
        }
    }
}
