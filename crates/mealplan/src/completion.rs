use std::sync::Arc;

use mealdeck_shared::Result;
use mealdeck_shared::completion::CompletionState;
use mealdeck_shared::mealplan::MealPlanType;
use time::Date;

use crate::CompletionService;

/// Mark/unmark a meal as eaten. Toggling twice returns to the original
/// state; truly concurrent callers are arbitrated by the remote service.
pub struct CompletionToggle {
    service: Arc<dyn CompletionService>,
}

impl CompletionToggle {
    pub fn new(service: Arc<dyn CompletionService>) -> Self {
        Self { service }
    }

    /// Logs the meal if it is not logged, unlogs it otherwise, and
    /// returns the state that was written. Current state is read fresh
    /// from the tracker on every call.
    pub async fn toggle(&self, date: Date, meal_type: MealPlanType) -> Result<CompletionState> {
        let records = self.service.completions_for(date).await?;
        let logged = records
            .iter()
            .any(|r| r.meal_type == meal_type && r.state.is_logged());

        let next = if logged {
            CompletionState::None
        } else {
            CompletionState::AteExact
        };
        self.service.mark_meal(date, meal_type, next).await?;

        Ok(next)
    }
}
