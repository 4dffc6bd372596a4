use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use mealdeck_shared::mealplan::{DayMeal, MealPlanType, PlanDetail, PlanSummary};
use mealdeck_shared::{Error, date};
use parking_lot::Mutex;
use time::Date;
use tokio::sync::broadcast;
use uuid::Uuid;

use crate::{PlanEvent, RemotePlanService, SharedPlanCache};

/// Outcome of a slot lookup.
///
/// `NotFound` is a confirmed absence; `Unavailable` means a remote read
/// failed and the caller should degrade to the empty state; `Superseded`
/// means the user navigated away mid-fetch and the result was discarded
/// instead of committed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Resolution {
    Found(DayMeal),
    NotFound,
    Unavailable,
    Superseded,
}

impl Resolution {
    pub fn into_meal(self) -> Option<DayMeal> {
        match self {
            Resolution::Found(day_meal) => Some(day_meal),
            _ => None,
        }
    }
}

/// Answers "which meal applies to this date and slot" from the cache,
/// falling back to the remote service on a miss or stale entry.
pub struct MealPlanResolver {
    owner_id: String,
    remote: Arc<dyn RemotePlanService>,
    cache: SharedPlanCache,
    events: Mutex<broadcast::Receiver<PlanEvent>>,
    selection: AtomicU64,
}

impl MealPlanResolver {
    pub fn new(
        owner_id: impl Into<String>,
        remote: Arc<dyn RemotePlanService>,
        cache: SharedPlanCache,
        events: broadcast::Receiver<PlanEvent>,
    ) -> Self {
        Self {
            owner_id: owner_id.into(),
            remote,
            cache,
            events: Mutex::new(events),
            selection: AtomicU64::new(0),
        }
    }

    /// Marks the start of a new date/slot selection. Lookups still in
    /// flight for the previous selection will discard their results
    /// instead of committing them to the shared cache.
    pub fn begin_selection(&self) -> u64 {
        self.selection.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// Resolves the meal planned for `date`'s slot of `meal_type`.
    ///
    /// Read failures never surface as errors; they degrade to
    /// `Unavailable` and the underlying cause is logged. Two overlapping
    /// calls under the same selection may each fetch redundantly; both
    /// converge on the same cached value.
    pub async fn resolve(&self, date: Date, meal_type: MealPlanType) -> Resolution {
        self.drain_events();

        let selection = self.selection.load(Ordering::SeqCst);
        let week = date::week_start(date);

        let summaries = match self.summaries(selection).await {
            Ok(Some(summaries)) => summaries,
            Ok(None) => return Resolution::Superseded,
            Err(err) => {
                tracing::warn!(%err, owner_id = %self.owner_id, "listing plans failed, showing no planned meal");
                return Resolution::Unavailable;
            }
        };

        let Some(summary) = summaries
            .iter()
            .find(|s| s.is_active && s.meal_plan_type == meal_type && s.starts_week(week))
        else {
            return Resolution::NotFound;
        };

        let detail = match self.detail(summary.id, selection).await {
            Ok(Some(detail)) => detail,
            Ok(None) => return Resolution::Superseded,
            Err(Error::NotFound(plan_id)) => {
                // Deleted by another session; drop what we believed about
                // it so the next read starts from a clean fetch.
                tracing::info!(%plan_id, "plan vanished remotely, dropping cached state");
                let mut cache = self.cache.lock();
                cache.invalidate_summaries(&self.owner_id);
                cache.invalidate_detail(&plan_id);
                return Resolution::NotFound;
            }
            Err(err) => {
                tracing::warn!(%err, plan_id = %summary.id, "fetching plan detail failed, showing no planned meal");
                return Resolution::Unavailable;
            }
        };

        match detail.meal_for(date::day_index(date, week)) {
            Some(day_meal) => Resolution::Found(day_meal.clone()),
            None => Resolution::NotFound,
        }
    }

    /// Applies pending change notifications before reading. Pull-based:
    /// a mutation made elsewhere empties our cache here, the next read
    /// refetches.
    fn drain_events(&self) {
        let mut events = self.events.lock();
        loop {
            match events.try_recv() {
                Ok(PlanEvent::Updated { owner_id }) => {
                    if owner_id == self.owner_id {
                        self.cache.lock().invalidate_owner(&self.owner_id);
                    }
                }
                Err(broadcast::error::TryRecvError::Lagged(skipped)) => {
                    tracing::warn!(skipped, "change feed lagged, dropping all cached plans");
                    self.cache.lock().invalidate_all();
                }
                Err(_) => break,
            }
        }
    }

    fn selection_current(&self, selection: u64) -> bool {
        self.selection.load(Ordering::SeqCst) == selection
    }

    /// `Ok(None)` means the fetch finished after the selection moved on
    /// and its result was thrown away.
    async fn summaries(&self, selection: u64) -> mealdeck_shared::Result<Option<Vec<PlanSummary>>> {
        if let Some(cached) = self.cache.lock().summaries(&self.owner_id) {
            return Ok(Some(cached));
        }

        let fresh = self.remote.list_plans(&self.owner_id).await?;
        if !self.selection_current(selection) {
            return Ok(None);
        }

        self.cache
            .lock()
            .put_summaries(self.owner_id.as_str(), fresh.clone());
        Ok(Some(fresh))
    }

    async fn detail(
        &self,
        plan_id: Uuid,
        selection: u64,
    ) -> mealdeck_shared::Result<Option<PlanDetail>> {
        if let Some(cached) = self.cache.lock().detail(&plan_id) {
            return Ok(Some(cached));
        }

        let fresh = self.remote.get_detail(plan_id).await?;
        if !self.selection_current(selection) {
            return Ok(None);
        }

        self.cache.lock().put_detail(fresh.clone());
        Ok(Some(fresh))
    }
}
