//! Ingestion normalizer
//!
//! Splits raw recipes into the three relational row sets and assigns
//! surrogate ingredient IDs.

use std::collections::{HashMap, HashSet};

use crate::parser::RawRecipe;

use super::units::convert;

/// One row of the `drinks` table
#[derive(Debug, Clone, PartialEq)]
pub struct Drink {
    pub id: i64,
    pub name: Option<String>,
    pub tags: Option<String>,
    pub video_link: Option<String>,
    pub category: Option<String>,
    pub iba_category: Option<String>,
    pub is_alcoholic: Option<String>,
    pub glass: Option<String>,
    pub instructions: Option<String>,
    pub instructions_de: Option<String>,
    pub instructions_es: Option<String>,
    pub instructions_it: Option<String>,
    pub thumbnail_link: Option<String>,
    pub date_modified: Option<String>,
}

impl From<&RawRecipe> for Drink {
    fn from(recipe: &RawRecipe) -> Self {
        Self {
            id: recipe.id,
            name: recipe.name.clone(),
            tags: recipe.tags.clone(),
            video_link: recipe.video.clone(),
            category: recipe.category.clone(),
            iba_category: recipe.iba.clone(),
            is_alcoholic: recipe.alcoholic.clone(),
            glass: recipe.glass.clone(),
            instructions: recipe.instructions.clone(),
            instructions_de: recipe.instructions_de.clone(),
            instructions_es: recipe.instructions_es.clone(),
            instructions_it: recipe.instructions_it.clone(),
            thumbnail_link: recipe.thumbnail.clone(),
            date_modified: recipe.date_modified.clone(),
        }
    }
}

/// One row of the `ingredients` table
#[derive(Debug, Clone, PartialEq)]
pub struct Ingredient {
    pub id: i64,
    pub name: String,
}

/// One row of the `measurements` table; the key is assigned by SQLite
#[derive(Debug, Clone, PartialEq)]
pub struct Measurement {
    pub drink_id: i64,
    pub ingredient_id: i64,
    /// Gram equivalent, or the original text when it could not be converted
    pub measurement: Option<String>,
    pub original_measurement: Option<String>,
}

/// Rows produced by one call to [`Normalizer::normalize`]
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NormalizedBatch {
    pub drinks: Vec<Drink>,
    pub ingredients: Vec<Ingredient>,
    pub measurements: Vec<Measurement>,
}

impl NormalizedBatch {
    pub fn row_count(&self) -> usize {
        self.drinks.len() + self.ingredients.len() + self.measurements.len()
    }
}

/// Owns the ingredient name -> ID table and the set of drink IDs already
/// emitted.
///
/// Feeding several batches through the same instance keeps IDs stable across
/// them. A fresh instance starts again at 1; [`Normalizer::resume`] continues
/// from rows that are already stored.
#[derive(Debug)]
pub struct Normalizer {
    ingredient_ids: HashMap<String, i64>,
    next_ingredient_id: i64,
    seen_drinks: HashSet<i64>,
}

impl Normalizer {
    pub fn new() -> Self {
        Self {
            ingredient_ids: HashMap::new(),
            next_ingredient_id: 1,
            seen_drinks: HashSet::new(),
        }
    }

    /// Continue from stored state: known names keep their IDs, new names are
    /// numbered after the highest known ID, and known drinks are not emitted
    /// again.
    pub fn resume<N, D>(ingredients: N, drinks: D) -> Self
    where
        N: IntoIterator<Item = (String, i64)>,
        D: IntoIterator<Item = i64>,
    {
        let ingredient_ids: HashMap<String, i64> = ingredients.into_iter().collect();
        let next_ingredient_id = ingredient_ids.values().max().map_or(1, |max| max + 1);

        Self {
            ingredient_ids,
            next_ingredient_id,
            seen_drinks: drinks.into_iter().collect(),
        }
    }

    /// Normalize recipes in order. Recipes without German instructions are
    /// skipped, as are drink IDs this normalizer has already seen.
    pub fn normalize<'a, I>(&mut self, recipes: I) -> NormalizedBatch
    where
        I: IntoIterator<Item = &'a RawRecipe>,
    {
        let mut batch = NormalizedBatch::default();

        for recipe in recipes {
            if !has_german_instructions(recipe) {
                continue;
            }
            if !self.seen_drinks.insert(recipe.id) {
                tracing::debug!(drink_id = recipe.id, "Skipping duplicate drink");
                continue;
            }

            batch.drinks.push(Drink::from(recipe));

            // A gap ends the ingredient list
            let slots = recipe.ingredients.iter().map_while(|slot| {
                let name = slot.name.as_deref().filter(|n| !n.is_empty())?;
                Some((name, slot))
            });

            for (name, slot) in slots {
                let ingredient_id = self.resolve_ingredient(name, &mut batch.ingredients);
                batch.measurements.push(Measurement {
                    drink_id: recipe.id,
                    ingredient_id,
                    measurement: slot.measure.as_deref().map(convert),
                    original_measurement: slot.measure.clone(),
                });
            }
        }

        tracing::debug!(
            drinks = batch.drinks.len(),
            ingredients = batch.ingredients.len(),
            measurements = batch.measurements.len(),
            "Normalized batch"
        );

        batch
    }

    /// Number of distinct ingredient names known so far
    pub fn ingredient_count(&self) -> usize {
        self.ingredient_ids.len()
    }

    fn resolve_ingredient(&mut self, name: &str, new_rows: &mut Vec<Ingredient>) -> i64 {
        if let Some(id) = self.ingredient_ids.get(name) {
            return *id;
        }

        let id = self.next_ingredient_id;
        self.next_ingredient_id += 1;
        self.ingredient_ids.insert(name.to_string(), id);
        new_rows.push(Ingredient {
            id,
            name: name.to_string(),
        });
        id
    }
}

impl Default for Normalizer {
    fn default() -> Self {
        Self::new()
    }
}

/// Normalize a complete run with a fresh ID table
pub fn normalize<'a, I>(recipes: I) -> NormalizedBatch
where
    I: IntoIterator<Item = &'a RawRecipe>,
{
    Normalizer::new().normalize(recipes)
}

// Only recipes carrying German instructions are loaded. This mirrors the
// upstream dataset's usable subset rather than a general validity rule.
fn has_german_instructions(recipe: &RawRecipe) -> bool {
    recipe
        .instructions_de
        .as_deref()
        .is_some_and(|text| !text.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::IngredientSlot;

    fn recipe(id: i64, name: &str, slots: &[(&str, Option<&str>)]) -> RawRecipe {
        RawRecipe {
            id,
            name: Some(name.to_string()),
            instructions_de: Some("Alle Zutaten mischen.".to_string()),
            ingredients: slots
                .iter()
                .map(|(n, m)| IngredientSlot::new(*n, *m))
                .collect(),
            ..Default::default()
        }
    }

    #[test]
    fn test_ids_assigned_in_first_encounter_order() {
        let recipes = vec![
            recipe(1, "Whiskey Sour", &[("Whiskey", Some("2 oz")), ("Lemon", Some("1/2 oz"))]),
            recipe(2, "Gin Sour", &[("Gin", Some("2 oz")), ("Lemon", None)]),
        ];

        let batch = normalize(&recipes);

        let names: Vec<_> = batch
            .ingredients
            .iter()
            .map(|i| (i.id, i.name.as_str()))
            .collect();
        assert_eq!(names, vec![(1, "Whiskey"), (2, "Lemon"), (3, "Gin")]);

        let refs: Vec<_> = batch
            .measurements
            .iter()
            .map(|m| (m.drink_id, m.ingredient_id))
            .collect();
        assert_eq!(refs, vec![(1, 1), (1, 2), (2, 3), (2, 2)]);
    }

    #[test]
    fn test_measurements_converted_and_original_kept() {
        let margarita = recipe(
            7,
            "Margarita",
            &[("Tequila", Some("1 1/2 cl")), ("Salt", Some("Pinch"))],
        );
        let batch = normalize(&[margarita]);

        assert_eq!(batch.measurements[0].measurement.as_deref(), Some("15.00 g"));
        assert_eq!(batch.measurements[0].original_measurement.as_deref(), Some("1 1/2 cl"));
        assert_eq!(batch.measurements[1].measurement.as_deref(), Some("Pinch"));
    }

    #[test]
    fn test_missing_measure_stays_missing() {
        let batch = normalize(&[recipe(1, "Neat", &[("Rum", None)])]);
        assert_eq!(batch.measurements[0].measurement, None);
        assert_eq!(batch.measurements[0].original_measurement, None);
    }

    #[test]
    fn test_recipe_without_german_instructions_skipped() {
        let mut english_only = recipe(1, "English Only", &[("Vodka", Some("1 oz"))]);
        english_only.instructions_de = None;
        let mut blank = recipe(2, "Blank", &[("Rum", Some("1 oz"))]);
        blank.instructions_de = Some(String::new());

        let batch = normalize(&[english_only, blank]);
        assert_eq!(batch, NormalizedBatch::default());
    }

    #[test]
    fn test_scan_stops_at_first_gap() {
        let mut r = recipe(1, "Gappy", &[("A", Some("1 oz")), ("B", Some("1 oz"))]);
        r.ingredients.push(IngredientSlot::default());
        r.ingredients.push(IngredientSlot::new("D", Some("1 oz")));
        r.ingredients.push(IngredientSlot::new("", Some("1 oz")));

        let batch = normalize(&[r]);
        assert_eq!(batch.measurements.len(), 2);
        assert_eq!(batch.ingredients.len(), 2);
    }

    #[test]
    fn test_empty_name_ends_scan() {
        let r = recipe(1, "Empty", &[("A", None), ("", None), ("C", None)]);
        assert_eq!(normalize(&[r]).measurements.len(), 1);
    }

    #[test]
    fn test_repeated_ingredient_in_one_drink() {
        let r = recipe(1, "Double", &[("Rum", Some("1 oz")), ("Rum", Some("2 oz"))]);
        let batch = normalize(&[r]);

        assert_eq!(batch.ingredients.len(), 1);
        assert_eq!(batch.measurements.len(), 2);
        assert!(batch.measurements.iter().all(|m| m.ingredient_id == 1));
    }

    #[test]
    fn test_names_are_case_sensitive() {
        let r = recipe(1, "Cases", &[("Lemon", None), ("lemon", None)]);
        let batch = normalize(&[r]);
        assert_eq!(batch.ingredients.len(), 2);
    }

    #[test]
    fn test_ids_stable_across_batches() {
        let mut normalizer = Normalizer::new();
        let first = normalizer.normalize(&[recipe(1, "One", &[("Rum", None), ("Lime", None)])]);
        let second =
            normalizer.normalize(&[recipe(2, "Two", &[("Lime", None), ("Mint", None)])]);

        assert_eq!(first.ingredients.len(), 2);
        assert_eq!(second.ingredients, vec![Ingredient { id: 3, name: "Mint".into() }]);
        assert_eq!(second.measurements[0].ingredient_id, 2);
        assert_eq!(normalizer.ingredient_count(), 3);
    }

    #[test]
    fn test_resume_keeps_stored_ids() {
        let stored = vec![("Gin".to_string(), 1), ("Tonic".to_string(), 4)];
        let mut normalizer = Normalizer::resume(stored, [10]);

        let batch = normalizer.normalize(&[
            recipe(10, "Gin Tonic", &[("Gin", None), ("Tonic", None)]),
            recipe(11, "Flaming Shot", &[("Sambuca", Some("10 g")), ("Gin", None)]),
        ]);

        let drink_ids: Vec<_> = batch.drinks.iter().map(|d| d.id).collect();
        assert_eq!(drink_ids, vec![11]);
        assert_eq!(batch.ingredients, vec![Ingredient { id: 5, name: "Sambuca".into() }]);

        let refs: Vec<_> = batch.measurements.iter().map(|m| m.ingredient_id).collect();
        assert_eq!(refs, vec![5, 1]);
        assert_eq!(normalizer.ingredient_count(), 3);
    }

    #[test]
    fn test_resume_from_nothing_starts_at_one() {
        let mut normalizer = Normalizer::resume(Vec::new(), Vec::new());
        let batch = normalizer.normalize(&[recipe(1, "Neat", &[("Rum", None)])]);
        assert_eq!(batch.ingredients[0].id, 1);
    }

    #[test]
    fn test_duplicate_drink_emitted_once() {
        let recipes = vec![
            recipe(5, "Mojito", &[("Rum", None)]),
            recipe(5, "Mojito", &[("Rum", None)]),
        ];
        let batch = normalize(&recipes);
        assert_eq!(batch.drinks.len(), 1);
        assert_eq!(batch.measurements.len(), 1);
    }
}
