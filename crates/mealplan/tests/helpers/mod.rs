#![allow(dead_code)]

use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;
use mealdeck_mealplan::{
    ChangeFeed, CompletionService, CompletionToggle, ConflictGuard, MealPlanResolver,
    MealReplacementEngine, PlanCache, RemotePlanService, SharedPlanCache, ShoppingListService,
};
use mealdeck_shared::completion::{CompletionRecord, CompletionState};
use mealdeck_shared::mealplan::{DayMeal, Macros, Meal, MealPlanType, PlanDetail, PlanSummary};
use mealdeck_shared::{Error, Result};
use parking_lot::Mutex;
use time::Date;
use tokio::sync::Semaphore;
use uuid::Uuid;

pub const OWNER: &str = "john";

pub fn meal(name: &str, ingredients: &[&str]) -> Meal {
    Meal {
        name: name.to_owned(),
        image_url: None,
        calories: 600,
        ingredients: ingredients.iter().map(|i| i.to_string()).collect(),
        macros: Macros::default(),
    }
}

/// Seven day meals named `<prefix> 0` through `<prefix> 6`.
pub fn week_meals(prefix: &str) -> Vec<DayMeal> {
    (0..7)
        .map(|day_index| DayMeal {
            day_index,
            meal: meal(&format!("{prefix} {day_index}"), &["salt", "pepper"]),
        })
        .collect()
}

pub fn active_plan(meal_type: MealPlanType, week_start: &str) -> (PlanSummary, PlanDetail) {
    let id = Uuid::new_v4();
    let summary = PlanSummary {
        id,
        owner_id: OWNER.to_owned(),
        meal_plan_type: meal_type,
        week_start: week_start.to_owned(),
        is_active: true,
    };
    let detail = PlanDetail {
        id,
        day_meals: week_meals(meal_type.as_ref()),
    };

    (summary, detail)
}

pub fn items(names: &[&str]) -> BTreeSet<String> {
    names.iter().map(|n| n.to_string()).collect()
}

#[derive(Default)]
pub struct FakeRemote {
    pub plans: Mutex<Vec<PlanSummary>>,
    pub details: Mutex<HashMap<Uuid, PlanDetail>>,
    pub deleted: Mutex<Vec<Uuid>>,
    pub replaced: Mutex<Vec<(Date, MealPlanType, Meal)>>,
    pub list_calls: AtomicUsize,
    pub detail_calls: AtomicUsize,
    pub fail_reads: AtomicBool,
    pub fail_writes: AtomicBool,
    gate: Mutex<Option<Arc<Semaphore>>>,
}

impl FakeRemote {
    pub fn seed_plan(&self, summary: PlanSummary, detail: PlanDetail) {
        self.plans.lock().push(summary);
        self.details.lock().insert(detail.id, detail);
    }

    pub fn seed_summary(&self, summary: PlanSummary) {
        self.plans.lock().push(summary);
    }

    /// Makes every read wait for one permit on `gate` before answering.
    pub fn hold_reads(&self, gate: Arc<Semaphore>) {
        *self.gate.lock() = Some(gate);
    }

    async fn pass_gate(&self) {
        let gate = self.gate.lock().clone();
        if let Some(gate) = gate {
            gate.acquire().await.expect("gate dropped").forget();
        }
    }
}

#[async_trait]
impl RemotePlanService for FakeRemote {
    async fn list_plans(&self, owner_id: &str) -> Result<Vec<PlanSummary>> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        self.pass_gate().await;

        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(Error::Network("connection reset".to_owned()));
        }

        Ok(self
            .plans
            .lock()
            .iter()
            .filter(|p| p.owner_id == owner_id)
            .cloned()
            .collect())
    }

    async fn get_detail(&self, plan_id: Uuid) -> Result<PlanDetail> {
        self.detail_calls.fetch_add(1, Ordering::SeqCst);
        self.pass_gate().await;

        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(Error::Network("connection reset".to_owned()));
        }

        self.details
            .lock()
            .get(&plan_id)
            .cloned()
            .ok_or(Error::NotFound(plan_id))
    }

    async fn delete(&self, plan_id: Uuid) -> Result<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(Error::Network("connection reset".to_owned()));
        }

        self.plans.lock().retain(|p| p.id != plan_id);
        self.details.lock().remove(&plan_id);
        self.deleted.lock().push(plan_id);
        Ok(())
    }

    async fn replace_meal_in_plan(
        &self,
        date: Date,
        meal_type: MealPlanType,
        new_meal: &Meal,
    ) -> Result<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(Error::Network("connection reset".to_owned()));
        }

        self.replaced.lock().push((date, meal_type, new_meal.clone()));
        Ok(())
    }
}

#[derive(Default)]
pub struct FakeShopping {
    pub added: Mutex<Vec<(Uuid, BTreeSet<String>)>>,
    pub removed: Mutex<Vec<(Uuid, BTreeSet<String>)>>,
    pub fail: AtomicBool,
}

#[async_trait]
impl ShoppingListService for FakeShopping {
    async fn add_items(&self, plan_id: Uuid, items: &BTreeSet<String>) -> Result<()> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(Error::Network("connection reset".to_owned()));
        }

        self.added.lock().push((plan_id, items.clone()));
        Ok(())
    }

    async fn remove_items(&self, plan_id: Uuid, items: &BTreeSet<String>) -> Result<()> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(Error::Network("connection reset".to_owned()));
        }

        self.removed.lock().push((plan_id, items.clone()));
        Ok(())
    }
}

#[derive(Default)]
pub struct FakeCompletions {
    pub states: Mutex<HashMap<(Date, MealPlanType), CompletionState>>,
    pub read_calls: AtomicUsize,
    pub fail: AtomicBool,
}

impl FakeCompletions {
    pub fn state_for(&self, date: Date, meal_type: MealPlanType) -> CompletionState {
        self.states
            .lock()
            .get(&(date, meal_type))
            .copied()
            .unwrap_or_default()
    }
}

#[async_trait]
impl CompletionService for FakeCompletions {
    async fn completions_for(&self, date: Date) -> Result<Vec<CompletionRecord>> {
        self.read_calls.fetch_add(1, Ordering::SeqCst);

        if self.fail.load(Ordering::SeqCst) {
            return Err(Error::Network("connection reset".to_owned()));
        }

        Ok(self
            .states
            .lock()
            .iter()
            .filter(|((d, _), _)| *d == date)
            .map(|((d, meal_type), state)| CompletionRecord {
                date: *d,
                meal_type: *meal_type,
                state: *state,
            })
            .collect())
    }

    async fn mark_meal(
        &self,
        date: Date,
        meal_type: MealPlanType,
        state: CompletionState,
    ) -> Result<()> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(Error::Network("connection reset".to_owned()));
        }

        let mut states = self.states.lock();
        if state.is_logged() {
            states.insert((date, meal_type), state);
        } else {
            states.remove(&(date, meal_type));
        }
        Ok(())
    }
}

/// One user's worth of wired-up components over fake services.
pub struct TestBed {
    pub remote: Arc<FakeRemote>,
    pub shopping: Arc<FakeShopping>,
    pub completions: Arc<FakeCompletions>,
    pub cache: SharedPlanCache,
    pub feed: ChangeFeed,
}

impl TestBed {
    pub fn new() -> Self {
        Self {
            remote: Arc::new(FakeRemote::default()),
            shopping: Arc::new(FakeShopping::default()),
            completions: Arc::new(FakeCompletions::default()),
            cache: PlanCache::new().shared(),
            feed: ChangeFeed::default(),
        }
    }

    pub fn resolver(&self) -> MealPlanResolver {
        MealPlanResolver::new(
            OWNER,
            self.remote.clone(),
            self.cache.clone(),
            self.feed.subscribe(),
        )
    }

    pub fn guard(&self) -> ConflictGuard {
        ConflictGuard::new(
            OWNER,
            self.remote.clone(),
            self.cache.clone(),
            self.feed.clone(),
        )
    }

    pub fn engine(&self) -> MealReplacementEngine {
        MealReplacementEngine::new(
            OWNER,
            self.remote.clone(),
            self.shopping.clone(),
            self.cache.clone(),
            self.feed.clone(),
        )
    }

    pub fn toggle(&self) -> CompletionToggle {
        CompletionToggle::new(self.completions.clone())
    }
}
