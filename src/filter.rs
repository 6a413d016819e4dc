use crate::query::{get_query, AnalyticalQuery, ALL_QUERIES};
use anyhow::{bail, Result};

/// Resolves which analytical queries to run based on include/exclude filters
pub fn resolve_queries(
    include: Option<Vec<String>>,
    exclude: Option<Vec<String>>,
) -> Result<Vec<&'static AnalyticalQuery>> {
    match (include, exclude) {
        (Some(_), Some(_)) => {
            bail!("Cannot use both --include and --exclude at the same time");
        }
        (Some(include_list), None) => {
            let mut queries = Vec::new();
            for name in &include_list {
                let query = lookup(name)?;
                if !queries.iter().any(|q: &&AnalyticalQuery| q.name == query.name) {
                    queries.push(query);
                }
            }
            tracing::debug!(?include_list, count = queries.len(), "Including queries");
            Ok(queries)
        }
        (None, Some(exclude_list)) => {
            for name in &exclude_list {
                lookup(name)?;
            }
            let queries = ALL_QUERIES
                .iter()
                .copied()
                .filter(|q| !exclude_list.iter().any(|name| name == q.name))
                .collect::<Vec<_>>();
            tracing::debug!(?exclude_list, count = queries.len(), "Excluding queries");
            Ok(queries)
        }
        (None, None) => Ok(ALL_QUERIES.to_vec()),
    }
}

fn lookup(name: &str) -> Result<&'static AnalyticalQuery> {
    match get_query(name) {
        Some(query) => Ok(query),
        None => bail!("Unknown query: {}", name),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(queries: &[&AnalyticalQuery]) -> Vec<&'static str> {
        queries.iter().map(|q| q.name).collect()
    }

    #[test]
    fn test_default_runs_everything() {
        let queries = resolve_queries(None, None).unwrap();
        assert_eq!(queries.len(), ALL_QUERIES.len());
    }

    #[test]
    fn test_include_keeps_order_given() {
        let queries = resolve_queries(
            Some(vec!["most-ingredients".into(), "lemon-whiskey".into(), "most-ingredients".into()]),
            None,
        )
        .unwrap();
        assert_eq!(names(&queries), vec!["most-ingredients", "lemon-whiskey"]);
    }

    #[test]
    fn test_exclude() {
        let queries = resolve_queries(None, Some(vec!["sambuca-15g".into()])).unwrap();
        assert_eq!(names(&queries), vec!["lemon-whiskey", "most-ingredients"]);
    }

    #[test]
    fn test_errors() {
        assert!(resolve_queries(Some(vec![]), Some(vec![])).is_err());
        assert!(resolve_queries(Some(vec!["gin".into()]), None).is_err());
        assert!(resolve_queries(None, Some(vec!["gin".into()])).is_err());
    }
}
