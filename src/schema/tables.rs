//! Table schema definitions for the cocktail database

use super::types::*;
use crate::normalize::{Drink, Ingredient, Measurement};

pub static DRINKS: TableSchema = TableSchema {
    name: "drinks",
    columns: &[
        Column::primary("drink_id"),
        Column::new("drink_name", ColumnType::Varchar),
        Column::new("tags", ColumnType::Varchar),
        Column::new("video_link", ColumnType::Varchar),
        Column::new("category", ColumnType::Varchar),
        Column::new("iba_category", ColumnType::Varchar),
        Column::new("is_alcoholic", ColumnType::Varchar),
        Column::new("glass", ColumnType::Varchar),
        Column::new("instructions", ColumnType::Varchar),
        Column::new("instructions_de", ColumnType::Varchar),
        Column::new("instructions_es", ColumnType::Varchar),
        Column::new("instructions_it", ColumnType::Varchar),
        Column::new("thumbnail_link", ColumnType::Varchar),
        Column::new("date_modified", ColumnType::DateTime),
    ],
    foreign_keys: &[],
};

pub static INGREDIENTS: TableSchema = TableSchema {
    name: "ingredients",
    columns: &[
        Column::primary("ingredient_id"),
        Column::new("ingredient_name", ColumnType::Varchar),
    ],
    foreign_keys: &[],
};

pub static MEASUREMENTS: TableSchema = TableSchema {
    name: "measurements",
    columns: &[
        Column::auto_increment("measurement_id"),
        Column::new("drink_id", ColumnType::Integer),
        Column::new("ingredient_id", ColumnType::Integer),
        Column::new("measurement", ColumnType::Text),
        Column::new("original_measurement", ColumnType::Text),
    ],
    foreign_keys: &[
        ForeignKey::new("drink_id", "drinks", "drink_id"),
        ForeignKey::new("ingredient_id", "ingredients", "ingredient_id"),
    ],
};

/// All table schemas, parents before children
pub static ALL_TABLES: &[&TableSchema] = &[&DRINKS, &INGREDIENTS, &MEASUREMENTS];

/// Get table schema by name
pub fn get_table(name: &str) -> Option<&'static TableSchema> {
    ALL_TABLES.iter().find(|t| t.name == name).copied()
}

/// Get all table names
pub fn table_names() -> Vec<&'static str> {
    ALL_TABLES.iter().map(|t| t.name).collect()
}

impl TableRow for Drink {
    fn schema() -> &'static TableSchema {
        &DRINKS
    }

    fn values(&self) -> Vec<SqlValue> {
        vec![
            self.id.into(),
            self.name.as_deref().into(),
            self.tags.as_deref().into(),
            self.video_link.as_deref().into(),
            self.category.as_deref().into(),
            self.iba_category.as_deref().into(),
            self.is_alcoholic.as_deref().into(),
            self.glass.as_deref().into(),
            self.instructions.as_deref().into(),
            self.instructions_de.as_deref().into(),
            self.instructions_es.as_deref().into(),
            self.instructions_it.as_deref().into(),
            self.thumbnail_link.as_deref().into(),
            self.date_modified.as_deref().into(),
        ]
    }
}

impl TableRow for Ingredient {
    fn schema() -> &'static TableSchema {
        &INGREDIENTS
    }

    fn values(&self) -> Vec<SqlValue> {
        vec![self.id.into(), self.name.as_str().into()]
    }
}

impl TableRow for Measurement {
    fn schema() -> &'static TableSchema {
        &MEASUREMENTS
    }

    fn values(&self) -> Vec<SqlValue> {
        vec![
            self.drink_id.into(),
            self.ingredient_id.into(),
            self.measurement.as_deref().into(),
            self.original_measurement.as_deref().into(),
        ]
    }
}
