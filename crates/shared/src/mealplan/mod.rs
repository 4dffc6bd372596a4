use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString, VariantArray};
use time::Date;
use uuid::Uuid;

/// Plans are tracked independently per meal type: a week can carry one
/// breakfast plan, one lunch plan and one dinner plan at the same time.
#[derive(
    EnumString,
    VariantArray,
    Display,
    AsRefStr,
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum MealPlanType {
    Breakfast,
    Lunch,
    Dinner,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Macros {
    pub protein_g: u32,
    pub carbs_g: u32,
    pub fat_g: u32,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Meal {
    pub name: String,
    pub image_url: Option<String>,
    pub calories: u32,
    pub ingredients: Vec<String>,
    pub macros: Macros,
}

/// The meal assigned to one weekday slot of a plan. `day_index` counts from
/// the plan's week start, 0 for Monday through 6 for Sunday.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayMeal {
    pub day_index: u8,
    pub meal: Meal,
}

/// Listing row returned by the remote plan query.
///
/// `week_start` is kept in the raw form the remote layer sends; it is
/// parsed on comparison so that one malformed row degrades to "matches no
/// week" instead of poisoning the whole listing.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanSummary {
    pub id: Uuid,
    pub owner_id: String,
    pub meal_plan_type: MealPlanType,
    pub week_start: String,
    pub is_active: bool,
}

impl PlanSummary {
    /// Whether this plan covers the week starting at `week`.
    pub fn starts_week(&self, week: Date) -> bool {
        match crate::date::parse_week_start(&self.week_start) {
            Ok(start) => start == week,
            Err(_) => {
                tracing::warn!(
                    plan_id = %self.id,
                    week_start = %self.week_start,
                    "plan week start cannot be normalized to a date, plan is unreachable by date lookup"
                );
                false
            }
        }
    }
}

/// Full plan body, fetched on demand. A well-formed plan carries exactly
/// seven day meals, one per weekday slot.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanDetail {
    pub id: Uuid,
    pub day_meals: Vec<DayMeal>,
}

impl PlanDetail {
    pub fn meal_for(&self, day_index: usize) -> Option<&DayMeal> {
        self.day_meals.get(day_index)
    }
}
