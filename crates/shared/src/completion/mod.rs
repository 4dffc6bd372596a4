use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString};
use time::Date;

use crate::mealplan::MealPlanType;

/// How a planned meal was logged, as recorded by the completion tracker.
#[derive(
    EnumString,
    Display,
    AsRefStr,
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
)]
#[strum(serialize_all = "camelCase")]
#[serde(rename_all = "camelCase")]
pub enum CompletionState {
    #[default]
    None,
    AteExact,
    AteSimilar,
}

impl CompletionState {
    pub fn is_logged(self) -> bool {
        !matches!(self, CompletionState::None)
    }
}

/// One (date, meal type) completion row. Owned by the completion tracker
/// and always read fresh, never cached.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CompletionRecord {
    pub date: Date,
    pub meal_type: MealPlanType,
    pub state: CompletionState,
}
