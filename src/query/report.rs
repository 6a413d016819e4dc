use rusqlite::Connection;
use std::fmt;

use super::analytical::{count_rows, AnalyticalQuery, TableCounts};

/// Outcome of one analytical query; `rows` is `None` if it failed
pub struct QueryResult {
    pub query: &'static AnalyticalQuery,
    pub rows: Option<Vec<String>>,
}

/// Row counts plus the selected analytical queries, ready to print
pub struct Report {
    pub counts: TableCounts,
    pub results: Vec<QueryResult>,
}

pub fn run_report(conn: &Connection, queries: &[&'static AnalyticalQuery]) -> Report {
    let results = queries
        .iter()
        .map(|&query| QueryResult {
            query,
            rows: query.run(conn),
        })
        .collect();

    Report {
        counts: count_rows(conn),
        results,
    }
}

fn fmt_count(count: Option<i64>) -> String {
    count.map_or_else(|| "n/a".to_string(), |n| n.to_string())
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Number of drinks inserted: {}", fmt_count(self.counts.drinks))?;
        writeln!(f, "Number of ingredients inserted: {}", fmt_count(self.counts.ingredients))?;
        writeln!(f, "Number of measurements inserted: {}", fmt_count(self.counts.measurements))?;

        for result in &self.results {
            writeln!(f, "\n{}", result.query.title)?;
            match &result.rows {
                None => writeln!(f, "  (query failed)")?,
                Some(rows) if rows.is_empty() => writeln!(f, "  (no drinks)")?,
                Some(rows) => {
                    for name in rows {
                        writeln!(f, "  {}", name)?;
                    }
                }
            }
        }

        Ok(())
    }
}
