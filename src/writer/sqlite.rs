use anyhow::{Context, Result};
use rusqlite::Connection;
use std::path::Path;

use super::schema_gen::{generate_create_table, generate_drop_table, generate_insert};
use crate::normalize::{NormalizedBatch, Normalizer};
use crate::parser::RawRecipe;
use crate::schema::{SqlValue, TableRow, TableSchema, ALL_TABLES};
use crate::ui::{Phase, Ui};

/// Rows written and rows rejected by SQLite
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct WriteSummary {
    pub inserted: u64,
    pub failed: u64,
}

impl WriteSummary {
    fn add(&mut self, other: WriteSummary) {
        self.inserted += other.inserted;
        self.failed += other.failed;
    }
}

pub struct SqliteWriter {
    conn: Connection,
}

impl SqliteWriter {
    /// Open (or create) the database file. Existing tables and rows are kept.
    pub fn open(db_path: &Path) -> Result<Self> {
        let conn = Connection::open(db_path)
            .with_context(|| format!("Failed to open database: {:?}", db_path))?;

        conn.execute_batch(
            "PRAGMA journal_mode = WAL;
             PRAGMA synchronous = NORMAL;
             PRAGMA cache_size = -64000;",
        )?;

        Ok(Self { conn })
    }

    pub fn from_connection(conn: Connection) -> Self {
        Self { conn }
    }

    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    /// Create any missing tables. Returns how many CREATE statements failed.
    pub fn create_tables(&self) -> usize {
        ALL_TABLES
            .iter()
            .filter(|schema| {
                execute_logged(&self.conn, &generate_create_table(schema)).is_none()
            })
            .count()
    }

    /// Drop every table if present, children first
    pub fn drop_tables(&self, ui: &mut impl Ui) -> usize {
        let mut failures = 0;
        for schema in ALL_TABLES.iter().rev() {
            ui.log(format!("Drop table: {}.", schema.name));
            if execute_logged(&self.conn, &generate_drop_table(schema)).is_none() {
                failures += 1;
            }
        }
        failures
    }

    /// A normalizer that continues from the rows already stored, so a load
    /// without `--fresh` reuses ingredient IDs and skips known drinks
    pub fn resume_normalizer(&self) -> Result<Normalizer> {
        let mut stmt = self
            .conn
            .prepare("SELECT ingredient_name, ingredient_id FROM ingredients")?;
        let ingredients = stmt
            .query_map([], |row| Ok((row.get::<_, String>(0)?, row.get::<_, i64>(1)?)))?
            .collect::<rusqlite::Result<Vec<_>>>()
            .context("Failed to read stored ingredients")?;

        let mut stmt = self.conn.prepare("SELECT drink_id FROM drinks")?;
        let drinks = stmt
            .query_map([], |row| row.get::<_, i64>(0))?
            .collect::<rusqlite::Result<Vec<_>>>()
            .context("Failed to read stored drinks")?;

        Ok(Normalizer::resume(ingredients, drinks))
    }

    /// Insert a normalized batch in one transaction. Individual rows that
    /// SQLite rejects are logged and skipped.
    pub fn write_batch(
        &mut self,
        batch: &NormalizedBatch,
        ui: &mut impl Ui,
    ) -> Result<WriteSummary> {
        let tx = self.conn.transaction()?;
        let mut summary = WriteSummary::default();

        summary.add(insert_rows(&tx, &batch.drinks, ui));
        summary.add(insert_rows(&tx, &batch.ingredients, ui));
        summary.add(insert_rows(&tx, &batch.measurements, ui));

        tx.commit().context("Failed to commit inserts")?;
        Ok(summary)
    }

    pub fn finalize(self) -> Result<()> {
        self.conn.execute_batch("PRAGMA optimize;")?;
        Ok(())
    }
}

/// Run a statement, logging and swallowing any SQLite error
pub fn execute_logged(conn: &Connection, sql: &str) -> Option<usize> {
    match conn.execute(sql, []) {
        Ok(changed) => Some(changed),
        Err(e) => {
            tracing::error!(query = sql, error = %e, "Error executing query");
            None
        }
    }
}

fn insert_rows<T: TableRow>(
    tx: &rusqlite::Transaction,
    rows: &[T],
    ui: &mut impl Ui,
) -> WriteSummary {
    let schema: &TableSchema = T::schema();
    let sql = generate_insert(schema);
    let mut summary = WriteSummary::default();
    let total = rows.len() as u64;

    let mut stmt = match tx.prepare_cached(&sql) {
        Ok(stmt) => stmt,
        Err(e) => {
            tracing::error!(query = %sql, error = %e, "Error preparing query");
            summary.failed = total;
            return summary;
        }
    };

    for (idx, row) in rows.iter().enumerate() {
        match bind_and_execute(&mut stmt, &row.values()) {
            Ok(_) => summary.inserted += 1,
            Err(e) => {
                tracing::error!(query = %sql, error = %e, "Error executing query");
                summary.failed += 1;
            }
        }
        ui.set_progress(idx as u64 + 1, total, schema.name);
    }

    ui.table_written(schema.name, summary);
    summary
}

fn bind_and_execute(
    stmt: &mut rusqlite::CachedStatement,
    values: &[SqlValue],
) -> rusqlite::Result<usize> {
    for (idx, value) in values.iter().enumerate() {
        value.bind_to(idx + 1, stmt)?;
    }
    stmt.raw_execute()
}

/// Normalize the recipes and write them into `output_db`.
///
/// With `fresh`, existing tables are dropped first. Otherwise the load
/// continues from what the database already holds: stored ingredients keep
/// their IDs and stored drinks are not inserted again.
pub fn write_to_sqlite(
    recipes: &[RawRecipe],
    output_db: &Path,
    fresh: bool,
    ui: &mut impl Ui,
) -> Result<(NormalizedBatch, WriteSummary)> {
    let mut writer = SqliteWriter::open(output_db)?;

    if fresh {
        writer.drop_tables(ui);
    }
    writer.create_tables();

    ui.set_phase(Phase::Normalizing);
    let mut normalizer = writer.resume_normalizer()?;
    if normalizer.ingredient_count() > 0 {
        ui.log(format!(
            "Continuing from {} stored ingredients",
            normalizer.ingredient_count()
        ));
    }
    let batch = normalizer.normalize(recipes);
    ui.log(format!(
        "Normalized {} drinks, {} ingredients, {} measurements",
        batch.drinks.len(),
        batch.ingredients.len(),
        batch.measurements.len()
    ));

    ui.set_phase(Phase::Writing);
    let summary = writer.write_batch(&batch, ui)?;
    ui.clear_progress();
    if summary.failed > 0 {
        tracing::warn!(failed = summary.failed, "Some rows were not written");
    }

    writer.finalize()?;

    Ok((batch, summary))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalize::{Drink, Ingredient, Measurement};
    use crate::ui::SilentUi;

    fn memory_writer() -> SqliteWriter {
        let writer = SqliteWriter::from_connection(Connection::open_in_memory().unwrap());
        assert_eq!(writer.create_tables(), 0);
        writer
    }

    fn table_count(conn: &Connection, table: &str) -> i64 {
        conn.query_row(&format!("SELECT count(1) FROM {}", table), [], |r| r.get(0))
            .unwrap()
    }

    fn batch() -> NormalizedBatch {
        NormalizedBatch {
            drinks: vec![Drink {
                id: 11000,
                name: Some("Mojito".into()),
                tags: Some("IBA".into()),
                video_link: None,
                category: Some("Cocktail".into()),
                iba_category: None,
                is_alcoholic: Some("Alcoholic".into()),
                glass: Some("Highball glass".into()),
                instructions: None,
                instructions_de: Some("Minze zerdrücken.".into()),
                instructions_es: None,
                instructions_it: None,
                thumbnail_link: None,
                date_modified: Some("2016-11-04 09:17:09".into()),
            }],
            ingredients: vec![
                Ingredient { id: 1, name: "Light rum".into() },
                Ingredient { id: 2, name: "Lime".into() },
            ],
            measurements: vec![
                Measurement {
                    drink_id: 11000,
                    ingredient_id: 1,
                    measurement: Some("56.60 g".into()),
                    original_measurement: Some("2 oz".into()),
                },
                Measurement {
                    drink_id: 11000,
                    ingredient_id: 2,
                    measurement: None,
                    original_measurement: None,
                },
            ],
        }
    }

    #[test]
    fn test_write_batch() {
        let mut writer = memory_writer();
        let summary = writer.write_batch(&batch(), &mut SilentUi::new()).unwrap();

        assert_eq!(summary, WriteSummary { inserted: 5, failed: 0 });
        let conn = writer.connection();
        assert_eq!(table_count(conn, "drinks"), 1);
        assert_eq!(table_count(conn, "ingredients"), 2);
        assert_eq!(table_count(conn, "measurements"), 2);

        let (measurement, original): (String, String) = conn
            .query_row(
                "SELECT measurement, original_measurement FROM measurements WHERE ingredient_id = 1",
                [],
                |r| Ok((r.get(0)?, r.get(1)?)),
            )
            .unwrap();
        assert_eq!(measurement, "56.60 g");
        assert_eq!(original, "2 oz");
    }

    #[test]
    fn test_rejected_rows_are_skipped() {
        let mut writer = memory_writer();
        let mut ui = SilentUi::new();
        writer.write_batch(&batch(), &mut ui).unwrap();

        // Same primary keys again: drinks and ingredients conflict, measurements
        // get fresh autoincrement keys
        let summary = writer.write_batch(&batch(), &mut ui).unwrap();
        assert_eq!(summary, WriteSummary { inserted: 2, failed: 3 });
        assert_eq!(table_count(writer.connection(), "measurements"), 4);
    }

    #[test]
    fn test_drop_tables_idempotent() {
        let writer = memory_writer();
        let mut ui = SilentUi::new();
        assert_eq!(writer.drop_tables(&mut ui), 0);
        assert_eq!(writer.drop_tables(&mut ui), 0);

        let remaining: i64 = writer
            .connection()
            .query_row(
                "SELECT count(1) FROM sqlite_master
                 WHERE type = 'table' AND name IN ('drinks', 'ingredients', 'measurements')",
                [],
                |r| r.get(0),
            )
            .unwrap();
        assert_eq!(remaining, 0);
    }

    #[test]
    fn test_resume_normalizer_reads_stored_rows() {
        let mut writer = memory_writer();
        writer.write_batch(&batch(), &mut SilentUi::new()).unwrap();

        let mut normalizer = writer.resume_normalizer().unwrap();
        assert_eq!(normalizer.ingredient_count(), 2);

        let mut mojito = RawRecipe {
            id: 11000,
            instructions_de: Some("Minze zerdrücken.".into()),
            ..Default::default()
        };
        mojito.ingredients.push(crate::parser::IngredientSlot::new("Lime", None));
        let mut daiquiri = mojito.clone();
        daiquiri.id = 11006;
        daiquiri.ingredients.push(crate::parser::IngredientSlot::new("Sugar", None));

        let next = normalizer.normalize(&[mojito, daiquiri]);
        assert_eq!(next.drinks.len(), 1);
        assert_eq!(next.ingredients, vec![Ingredient { id: 3, name: "Sugar".into() }]);
        let refs: Vec<_> = next.measurements.iter().map(|m| m.ingredient_id).collect();
        assert_eq!(refs, vec![2, 3]);
    }

    #[test]
    fn test_failed_statement_is_swallowed() {
        let writer = memory_writer();
        assert_eq!(execute_logged(writer.connection(), "INSERT INTO nowhere VALUES (1)"), None);
        assert_eq!(execute_logged(writer.connection(), "DELETE FROM drinks"), Some(0));
    }
}
