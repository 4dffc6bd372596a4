use std::collections::BTreeSet;

/// Items to take off and put on the shopping list after a meal
/// substitution. Both sides are normalized to lowercase.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct IngredientDelta {
    pub to_remove: BTreeSet<String>,
    pub to_add: BTreeSet<String>,
}

impl IngredientDelta {
    pub fn is_empty(&self) -> bool {
        self.to_remove.is_empty() && self.to_add.is_empty()
    }
}

/// Case-insensitive set difference both ways: ingredients only the old
/// meal uses get removed, ingredients only the new meal uses get added.
/// Ingredients both meals share are left untouched.
pub fn replacement_delta(old: &[String], new: &[String]) -> IngredientDelta {
    let old = normalize(old);
    let new = normalize(new);

    IngredientDelta {
        to_remove: old.difference(&new).cloned().collect(),
        to_add: new.difference(&old).cloned().collect(),
    }
}

fn normalize(ingredients: &[String]) -> BTreeSet<String> {
    ingredients
        .iter()
        .map(|ingredient| ingredient.trim().to_lowercase())
        .filter(|ingredient| !ingredient.is_empty())
        .collect()
}
