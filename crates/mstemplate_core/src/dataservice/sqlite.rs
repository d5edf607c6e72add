//! SQLite-backed example data service.
//!
//! # Responsibility
//! - Provide the `ExampleDataService` contract over the `examples` table.
//! - Keep SQL details inside the persistence boundary.
//!
//! # Invariants
//! - Construction fails on connections that were not migrated.
//! - Timestamps are stored as Unix epoch milliseconds.
//! - Read paths reject invalid persisted state instead of masking it.

use super::{DataResult, DataServiceError, ExampleDataService, Transactional};
use crate::db::migrations::{current_user_version, latest_version};
use crate::model::example::{Example, ExampleId, ExamplePatch, ExampleProperty};
use chrono::{DateTime, Utc};
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, Row};

const EXAMPLE_TABLE: &str = "examples";
const EXAMPLE_COLUMNS: [&str; 5] = ["id", "name", "useful", "created_at", "deactivated_at"];

const EXAMPLE_SELECT_SQL: &str = "SELECT
    id,
    name,
    useful,
    created_at,
    deactivated_at
FROM examples";

/// SQLite-backed example data service.
#[derive(Debug, Clone, Copy)]
pub struct SqliteExampleDataService<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteExampleDataService<'conn> {
    /// Wraps a migrated connection.
    ///
    /// # Errors
    /// - `UninitializedConnection` when the schema version is not current.
    /// - `MissingRequiredTable` / `MissingRequiredColumn` when the schema
    ///   does not carry the `examples` shape.
    pub fn try_new(conn: &'conn Connection) -> DataResult<Self> {
        let expected_version = latest_version();
        let actual_version = current_user_version(conn)?;
        if actual_version != expected_version {
            return Err(DataServiceError::UninitializedConnection {
                expected_version,
                actual_version,
            });
        }

        let mut stmt = conn.prepare("SELECT name FROM pragma_table_info(?1);")?;
        let columns = stmt
            .query_map([EXAMPLE_TABLE], |row| row.get::<_, String>(0))?
            .collect::<Result<Vec<_>, _>>()?;
        if columns.is_empty() {
            return Err(DataServiceError::MissingRequiredTable(EXAMPLE_TABLE));
        }
        for column in EXAMPLE_COLUMNS {
            if !columns.iter().any(|existing| existing == column) {
                return Err(DataServiceError::MissingRequiredColumn {
                    table: EXAMPLE_TABLE,
                    column,
                });
            }
        }

        Ok(Self { conn })
    }

    fn query_examples(&self, sql: &str) -> DataResult<Vec<Example>> {
        let mut stmt = self.conn.prepare(sql)?;
        let mut rows = stmt.query([])?;
        let mut examples = Vec::new();

        while let Some(row) = rows.next()? {
            examples.push(parse_example_row(row)?);
        }

        Ok(examples)
    }

    fn query_example(&self, sql: &str, param: Value) -> DataResult<Option<Example>> {
        let mut stmt = self.conn.prepare(sql)?;
        let mut rows = stmt.query([param])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_example_row(row)?));
        }

        Ok(None)
    }

    fn require(&self, id: ExampleId) -> DataResult<Example> {
        self.find_by_id(id)?.ok_or(DataServiceError::NotFound(id))
    }
}

impl ExampleDataService for SqliteExampleDataService<'_> {
    fn create(&self, example: &Example) -> DataResult<Example> {
        example.validate()?;

        self.conn.execute(
            "INSERT INTO examples (
                name,
                useful,
                created_at,
                deactivated_at
            ) VALUES (?1, ?2, ?3, ?4);",
            params![
                example.name.as_str(),
                example.useful,
                example.created_at.timestamp_millis(),
                example.deactivated_at.map(|at| at.timestamp_millis()),
            ],
        )?;

        self.require(self.conn.last_insert_rowid())
    }

    fn update(&self, example: &Example) -> DataResult<Example> {
        example.validate()?;

        let changed = self.conn.execute(
            "UPDATE examples
             SET
                name = ?1,
                useful = ?2
             WHERE id = ?3;",
            params![example.name.as_str(), example.useful, example.id],
        )?;

        if changed == 0 {
            return Err(DataServiceError::NotFound(example.id));
        }

        self.require(example.id)
    }

    fn update_properties(&self, id: ExampleId, patch: &ExamplePatch) -> DataResult<()> {
        patch.validate()?;

        let mut assignments = Vec::new();
        let mut bind_values: Vec<Value> = Vec::new();
        if let Some(name) = &patch.name {
            assignments.push(format!("{} = ?", ExampleProperty::Name.key()));
            bind_values.push(Value::Text(name.clone()));
        }
        if let Some(useful) = patch.useful {
            assignments.push(format!("{} = ?", ExampleProperty::Useful.key()));
            bind_values.push(Value::Integer(i64::from(useful)));
        }

        if assignments.is_empty() {
            return self.require(id).map(|_| ());
        }

        bind_values.push(Value::Integer(id));
        let sql = format!(
            "UPDATE examples SET {} WHERE id = ?;",
            assignments.join(", ")
        );
        let changed = self.conn.execute(&sql, params_from_iter(bind_values))?;

        if changed == 0 {
            return Err(DataServiceError::NotFound(id));
        }

        Ok(())
    }

    fn delete(&self, id: ExampleId) -> DataResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM examples WHERE id = ?1;", [id])?;

        if changed == 0 {
            return Err(DataServiceError::NotFound(id));
        }

        Ok(())
    }

    fn find_all(&self) -> DataResult<Vec<Example>> {
        self.query_examples(&format!("{EXAMPLE_SELECT_SQL} ORDER BY id ASC;"))
    }

    fn find_actives(&self) -> DataResult<Vec<Example>> {
        self.query_examples(&format!(
            "{EXAMPLE_SELECT_SQL} WHERE deactivated_at IS NULL ORDER BY id ASC;"
        ))
    }

    fn find_by_id(&self, id: ExampleId) -> DataResult<Option<Example>> {
        self.query_example(
            &format!("{EXAMPLE_SELECT_SQL} WHERE id = ?1;"),
            Value::Integer(id),
        )
    }

    fn find_by_name(&self, name: &str) -> DataResult<Option<Example>> {
        self.query_example(
            &format!(
                "{EXAMPLE_SELECT_SQL}
                 WHERE name = ?1
                   AND deactivated_at IS NULL
                 ORDER BY id ASC
                 LIMIT 1;"
            ),
            Value::Text(name.to_string()),
        )
    }

    fn logical_deletion(&self, id: ExampleId, deactivated_at: DateTime<Utc>) -> DataResult<()> {
        let changed = self.conn.execute(
            "UPDATE examples SET deactivated_at = ?1 WHERE id = ?2;",
            params![deactivated_at.timestamp_millis(), id],
        )?;

        if changed == 0 {
            return Err(DataServiceError::NotFound(id));
        }

        Ok(())
    }
}

impl Transactional for SqliteExampleDataService<'_> {
    fn begin(&self) -> DataResult<()> {
        self.conn.execute_batch("BEGIN;")?;
        Ok(())
    }

    fn commit(&self) -> DataResult<()> {
        self.conn.execute_batch("COMMIT;")?;
        Ok(())
    }

    fn rollback(&self) -> DataResult<()> {
        self.conn.execute_batch("ROLLBACK;")?;
        Ok(())
    }
}

fn parse_example_row(row: &Row<'_>) -> DataResult<Example> {
    let useful = match row.get::<_, i64>("useful")? {
        0 => false,
        1 => true,
        other => {
            return Err(DataServiceError::InvalidData(format!(
                "invalid useful value `{other}` in examples.useful"
            )));
        }
    };

    let created_at = parse_millis(row.get("created_at")?, "created_at")?;
    let deactivated_at = row
        .get::<_, Option<i64>>("deactivated_at")?
        .map(|millis| parse_millis(millis, "deactivated_at"))
        .transpose()?;

    let example = Example {
        id: row.get("id")?,
        name: row.get("name")?,
        useful,
        created_at,
        deactivated_at,
    };
    example.validate()?;
    Ok(example)
}

fn parse_millis(millis: i64, column: &str) -> DataResult<DateTime<Utc>> {
    DateTime::<Utc>::from_timestamp_millis(millis).ok_or_else(|| {
        DataServiceError::InvalidData(format!(
            "timestamp `{millis}` out of range in examples.{column}"
        ))
    })
}

#[cfg(test)]
mod tests {
    use super::SqliteExampleDataService;
    use crate::dataservice::{DataServiceError, ExampleDataService};
    use crate::db::open_db_in_memory;

    #[test]
    fn invalid_persisted_flag_is_rejected_on_read() {
        let conn = open_db_in_memory().unwrap();
        conn.execute_batch("PRAGMA ignore_check_constraints = ON;")
            .unwrap();
        conn.execute(
            "INSERT INTO examples (name, useful, created_at) VALUES ('broken', 7, 0);",
            [],
        )
        .unwrap();

        let store = SqliteExampleDataService::try_new(&conn).unwrap();
        let err = store.find_all().unwrap_err();
        assert!(matches!(err, DataServiceError::InvalidData(message) if message.contains("useful")));
    }
}
