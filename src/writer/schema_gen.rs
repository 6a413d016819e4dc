use crate::schema::{KeyKind, TableSchema};

/// Generate CREATE TABLE SQL for a table schema
pub fn generate_create_table(schema: &TableSchema) -> String {
    let mut sql = format!("CREATE TABLE IF NOT EXISTS {} (\n", schema.name);
    let mut columns = Vec::new();

    for col in schema.columns {
        let key = match col.key {
            KeyKind::None => "",
            KeyKind::Primary => " PRIMARY KEY",
            KeyKind::AutoIncrement => " PRIMARY KEY AUTOINCREMENT",
        };
        columns.push(format!("    {} {}{}", col.name, col.col_type.sql_type(), key));
    }

    for fk in schema.foreign_keys {
        columns.push(format!(
            "    FOREIGN KEY ({}) REFERENCES {}({})",
            fk.column, fk.references_table, fk.references_column
        ));
    }

    sql.push_str(&columns.join(",\n"));
    sql.push_str("\n)");

    sql
}

/// Generate the parameterized INSERT for a table, skipping auto keys
pub fn generate_insert(schema: &TableSchema) -> String {
    let columns = schema.insert_columns();
    let placeholders: Vec<&str> = columns.iter().map(|_| "?").collect();
    format!(
        "INSERT INTO {} ({}) VALUES ({})",
        schema.name,
        columns.join(", "),
        placeholders.join(", ")
    )
}

pub fn generate_drop_table(schema: &TableSchema) -> String {
    format!("DROP TABLE IF EXISTS {}", schema.name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::tables::{DRINKS, MEASUREMENTS};

    #[test]
    fn test_generate_create_table() {
        let sql = generate_create_table(&MEASUREMENTS);
        assert!(sql.starts_with("CREATE TABLE IF NOT EXISTS measurements"));
        assert!(sql.contains("measurement_id INTEGER PRIMARY KEY AUTOINCREMENT"));
        assert!(sql.contains("original_measurement TEXT"));
        assert!(sql.contains("FOREIGN KEY (drink_id) REFERENCES drinks(drink_id)"));
        assert!(sql.contains("FOREIGN KEY (ingredient_id) REFERENCES ingredients(ingredient_id)"));

        let sql = generate_create_table(&DRINKS);
        assert!(sql.contains("drink_id INTEGER PRIMARY KEY,"));
        assert!(sql.contains("date_modified DATETIME"));
    }

    #[test]
    fn test_generate_insert() {
        assert_eq!(
            generate_insert(&MEASUREMENTS),
            "INSERT INTO measurements (drink_id, ingredient_id, measurement, original_measurement) VALUES (?, ?, ?, ?)"
        );
    }

    #[test]
    fn test_generate_drop_table() {
        assert_eq!(generate_drop_table(&DRINKS), "DROP TABLE IF EXISTS drinks");
    }
}
