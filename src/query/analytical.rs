//! Fixed analytical queries over the normalized tables

use rusqlite::Connection;

/// A named read query returning one drink name per row
#[derive(Debug)]
pub struct AnalyticalQuery {
    /// Short name used with `--include` / `--exclude`
    pub name: &'static str,
    pub title: &'static str,
    pub sql: &'static str,
}

/// Drinks that contain both a lemon ingredient and a whisk(e)y ingredient.
///
/// The ingredient table is joined twice so each side can be filtered on its
/// own; LIKE copes with the dataset's inconsistent capitalization and the
/// whiskey/whisky spelling split.
pub static LEMON_AND_WHISKEY: AnalyticalQuery = AnalyticalQuery {
    name: "lemon-whiskey",
    title: "Which alcoholic drinks can be mixed with lemon and whiskey?",
    sql: "SELECT drinks.drink_name
FROM drinks
JOIN measurements ON drinks.drink_id = measurements.drink_id
JOIN ingredients AS lemon ON measurements.ingredient_id = lemon.ingredient_id
JOIN measurements AS whiskey_ingredient ON drinks.drink_id = whiskey_ingredient.drink_id
JOIN ingredients AS whiskey ON whiskey_ingredient.ingredient_id = whiskey.ingredient_id
WHERE lemon.ingredient_name LIKE '%lemon%' AND whiskey.ingredient_name LIKE '%whisk%'
GROUP BY drinks.drink_name
ORDER BY drinks.drink_name",
};

/// Drinks with at most 15 g of a sambuca ingredient. Only measurements that
/// ended up in grams qualify; the numeric part is everything before " g".
pub static SAMBUCA_15G: AnalyticalQuery = AnalyticalQuery {
    name: "sambuca-15g",
    title: "Which drink(s) can be mixed with just 15g of Sambuca?",
    sql: "SELECT d.drink_name
FROM drinks AS d
LEFT JOIN measurements AS m ON d.drink_id = m.drink_id
LEFT JOIN ingredients AS i ON m.ingredient_id = i.ingredient_id
WHERE i.ingredient_name LIKE '%sambuca%'
AND m.measurement LIKE '% g'
AND CAST(SUBSTR(m.measurement, 1, LENGTH(m.measurement) - 2) AS REAL) <= 15
GROUP BY d.drink_name
ORDER BY d.drink_name",
};

/// Every drink tied for the most measurement rows. RANK keeps all ties at 1.
pub static MOST_INGREDIENTS: AnalyticalQuery = AnalyticalQuery {
    name: "most-ingredients",
    title: "Which drink has the most ingredients?",
    sql: "SELECT drink_name
FROM (
    SELECT d.drink_name,
           RANK() OVER (ORDER BY COUNT(m.measurement_id) DESC) AS ingredients_rank
    FROM drinks AS d
    LEFT JOIN measurements AS m ON d.drink_id = m.drink_id
    GROUP BY d.drink_id
)
WHERE ingredients_rank = 1
ORDER BY drink_name",
};

pub static ALL_QUERIES: &[&AnalyticalQuery] = &[&LEMON_AND_WHISKEY, &SAMBUCA_15G, &MOST_INGREDIENTS];

pub fn get_query(name: &str) -> Option<&'static AnalyticalQuery> {
    ALL_QUERIES.iter().find(|q| q.name == name).copied()
}

pub fn query_names() -> Vec<&'static str> {
    ALL_QUERIES.iter().map(|q| q.name).collect()
}

impl AnalyticalQuery {
    /// Run the query. Failures are logged with the SQL and yield `None`.
    pub fn run(&self, conn: &Connection) -> Option<Vec<String>> {
        match collect_names(conn, self.sql) {
            Ok(names) => Some(names),
            Err(e) => {
                tracing::error!(query = self.sql, error = %e, "Error executing query");
                None
            }
        }
    }
}

fn collect_names(conn: &Connection, sql: &str) -> rusqlite::Result<Vec<String>> {
    let mut stmt = conn.prepare(sql)?;
    let rows = stmt.query_map([], |row| row.get::<_, Option<String>>(0))?;

    let mut names = Vec::new();
    for name in rows {
        // Drinks without a name still count as a row
        names.push(name?.unwrap_or_default());
    }
    Ok(names)
}

/// Row counts per table; `None` where the count query failed
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TableCounts {
    pub drinks: Option<i64>,
    pub ingredients: Option<i64>,
    pub measurements: Option<i64>,
}

pub fn count_rows(conn: &Connection) -> TableCounts {
    TableCounts {
        drinks: count_table(conn, "SELECT count(1) AS n_drinks FROM drinks"),
        ingredients: count_table(conn, "SELECT count(1) AS n_ingredients FROM ingredients"),
        measurements: count_table(conn, "SELECT count(1) AS n_measurements FROM measurements"),
    }
}

fn count_table(conn: &Connection, sql: &str) -> Option<i64> {
    match conn.query_row(sql, [], |row| row.get(0)) {
        Ok(n) => Some(n),
        Err(e) => {
            tracing::error!(query = sql, error = %e, "Error executing query");
            None
        }
    }
}
