use serde::{Deserialize, Serialize};

use super::record::{is_blank, Record, RecordKind};

#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct Meal {
    /// Breakfast, Lunch, Dinner, Snack. Optional.
    pub meal_type: String,
    pub food_type: String,
    pub quantity_number: String,
    pub quantity_unit: String,
}

impl Meal {
    pub fn new(
        meal_type: impl Into<String>,
        food_type: impl Into<String>,
        quantity_number: impl Into<String>,
        quantity_unit: impl Into<String>,
    ) -> Self {
        Self {
            meal_type: meal_type.into(),
            food_type: food_type.into(),
            quantity_number: quantity_number.into(),
            quantity_unit: quantity_unit.into(),
        }
    }

    /// "50 g", as shown on a meal card.
    pub fn quantity(&self) -> String {
        format!("{} {}", self.quantity_number.trim(), self.quantity_unit.trim())
    }
}

impl RecordKind for Meal {
    const LABEL: &'static str = "meal";
    const TITLE: &'static str = "Meal";
    const FAN_OUT: bool = true;
    const REJECTS_FUTURE_DATES: bool = false;

    fn missing_fields(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if is_blank(&self.food_type) {
            missing.push("food_type");
        }
        if is_blank(&self.quantity_number) {
            missing.push("quantity_number");
        }
        if is_blank(&self.quantity_unit) {
            missing.push("quantity_unit");
        }
        missing
    }

    fn search_fields(&self) -> Vec<&str> {
        vec![&self.food_type, &self.meal_type]
    }
}

pub type MealRecord = Record<Meal>;
