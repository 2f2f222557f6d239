//! SQLite-backed entity store.

use std::{collections::BTreeSet, fmt, path::Path};

use log::debug;
use rusqlite::{Connection, ErrorCode, OpenFlags, Row, Transaction, params_from_iter};

use super::{EntityStore, StoreError, breeds_in_arrival_order};
use crate::{Breed, BreedId, CommitSummary, Country, CountryId, Limit, PendingCountry};

/// SQLite limits bound parameters per statement to 999 by default. Name
/// lookups are chunked to remain below that ceiling.
const SQLITE_MAX_VARIABLE_NUMBER: usize = 999;

const SELECT_BREED: &str = "SELECT breeds.id, breeds.name, breeds.origin, breeds.coat, \
     breeds.pattern, countries.id, countries.name \
     FROM breeds JOIN countries ON countries.id = breeds.country_id";

/// Map a `rusqlite` failure onto the store taxonomy.
///
/// Constraint violations become [`StoreError::Rejected`]; everything else is
/// reported as the medium being unavailable.
fn sqlite_error(operation: &'static str) -> impl FnOnce(rusqlite::Error) -> StoreError {
    move |source| {
        let message = source.to_string();
        match source.sqlite_error_code() {
            Some(ErrorCode::ConstraintViolation) => StoreError::Rejected { operation, message },
            _ => StoreError::Unavailable { operation, message },
        }
    }
}

/// Country and breed tables in a SQLite database.
///
/// Names are unique per table and every breed row references its country
/// with `ON DELETE CASCADE`. Foreign keys are enforced on every connection
/// the store opens.
pub struct SqliteEntityStore {
    connection: Connection,
}

impl fmt::Debug for SqliteEntityStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SqliteEntityStore")
            .field("path", &self.connection.path())
            .finish_non_exhaustive()
    }
}

impl SqliteEntityStore {
    /// Open (creating if needed) the database at `path` and initialise the
    /// schema.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, StoreError> {
        let connection = Connection::open(path.as_ref()).map_err(sqlite_error("open database"))?;
        Self::from_connection(connection)
    }

    /// Open an existing database without write access.
    ///
    /// The file is never created and the schema is not initialised, so a
    /// missing database surfaces as [`StoreError::Unavailable`]. Commits on a
    /// read-only store fail the same way.
    pub fn open_read_only<P: AsRef<Path>>(path: P) -> Result<Self, StoreError> {
        let connection =
            Connection::open_with_flags(path.as_ref(), OpenFlags::SQLITE_OPEN_READ_ONLY)
                .map_err(sqlite_error("open database"))?;
        connection
            .pragma_update(None, "foreign_keys", true)
            .map_err(sqlite_error("enable foreign keys"))?;
        Ok(Self { connection })
    }

    /// Open a private in-memory database with the schema initialised.
    ///
    /// # Examples
    /// ```
    /// use breedbook_core::{EntityStore, SqliteEntityStore};
    ///
    /// let store = SqliteEntityStore::open_in_memory()?;
    /// assert_eq!(store.count_breeds("Canada")?, 0);
    /// # Ok::<(), breedbook_core::StoreError>(())
    /// ```
    pub fn open_in_memory() -> Result<Self, StoreError> {
        let connection = Connection::open_in_memory().map_err(sqlite_error("open database"))?;
        Self::from_connection(connection)
    }

    fn from_connection(mut connection: Connection) -> Result<Self, StoreError> {
        connection
            .pragma_update(None, "foreign_keys", true)
            .map_err(sqlite_error("enable foreign keys"))?;
        initialise_schema(&mut connection)?;
        Ok(Self { connection })
    }

    /// Delete the country called `name`; its breeds are removed by the
    /// cascading foreign key.
    ///
    /// Returns whether a country row was deleted.
    pub fn remove_country(&mut self, name: &str) -> Result<bool, StoreError> {
        let removed = self
            .connection
            .execute("DELETE FROM countries WHERE name = ?1", [name])
            .map_err(sqlite_error("delete country"))?;
        Ok(removed > 0)
    }

    fn query_names<T, F>(
        &self,
        sql_prefix: &str,
        names: &BTreeSet<&str>,
        operation: &'static str,
        map_row: F,
    ) -> Result<Vec<T>, StoreError>
    where
        F: Fn(&Row<'_>) -> rusqlite::Result<T>,
    {
        let ordered: Vec<&str> = names.iter().copied().collect();
        let mut found = Vec::new();
        for chunk in ordered.chunks(SQLITE_MAX_VARIABLE_NUMBER) {
            let placeholders = vec!["?"; chunk.len()].join(", ");
            let query = format!("{sql_prefix} IN ({placeholders})");
            let mut statement = self
                .connection
                .prepare(&query)
                .map_err(sqlite_error(operation))?;
            let rows = statement
                .query_map(params_from_iter(chunk.iter()), &map_row)
                .map_err(sqlite_error(operation))?;
            for row in rows {
                found.push(row.map_err(sqlite_error(operation))?);
            }
        }
        Ok(found)
    }
}

fn initialise_schema(connection: &mut Connection) -> Result<(), StoreError> {
    let transaction = connection
        .transaction()
        .map_err(sqlite_error("begin schema transaction"))?;
    run_migration_step(
        &transaction,
        "create countries",
        "CREATE TABLE IF NOT EXISTS countries (
            id INTEGER PRIMARY KEY,
            name TEXT NOT NULL UNIQUE
        )",
    )?;
    run_migration_step(
        &transaction,
        "create breeds",
        "CREATE TABLE IF NOT EXISTS breeds (
            id INTEGER PRIMARY KEY,
            name TEXT NOT NULL UNIQUE,
            origin TEXT NOT NULL,
            coat TEXT NOT NULL,
            pattern TEXT NOT NULL,
            country_id INTEGER NOT NULL
                REFERENCES countries(id) ON DELETE CASCADE
        )",
    )?;
    run_migration_step(
        &transaction,
        "index breeds by country",
        "CREATE INDEX IF NOT EXISTS idx_breeds_country ON breeds(country_id)",
    )?;
    transaction
        .commit()
        .map_err(sqlite_error("commit schema transaction"))
}

fn run_migration_step(
    transaction: &Transaction<'_>,
    step: &'static str,
    sql: &str,
) -> Result<(), StoreError> {
    transaction
        .execute(sql, [])
        .map(|_| ())
        .map_err(sqlite_error(step))
}

fn country_from_row(row: &Row<'_>) -> rusqlite::Result<Country> {
    Ok(Country {
        id: CountryId(row.get(0)?),
        name: row.get(1)?,
    })
}

fn breed_from_row(row: &Row<'_>) -> rusqlite::Result<Breed> {
    Ok(Breed {
        id: BreedId(row.get(0)?),
        name: row.get(1)?,
        origin: row.get(2)?,
        coat: row.get(3)?,
        pattern: row.get(4)?,
        country: Country {
            id: CountryId(row.get(5)?),
            name: row.get(6)?,
        },
    })
}

fn persist_countries(
    transaction: &Transaction<'_>,
    countries: &[PendingCountry],
) -> Result<CommitSummary, StoreError> {
    let mut insert_country = transaction
        .prepare_cached("INSERT INTO countries (name) VALUES (?1)")
        .map_err(sqlite_error("prepare insert country"))?;
    let mut insert_breed = transaction
        .prepare_cached(
            "INSERT INTO breeds (name, origin, coat, pattern, country_id)
                VALUES (?1, ?2, ?3, ?4, ?5)",
        )
        .map_err(sqlite_error("prepare insert breed"))?;

    let mut summary = CommitSummary::default();
    let mut country_ids = Vec::with_capacity(countries.len());
    for pending in countries {
        let country_id = match pending.id {
            Some(CountryId(id)) => id,
            None => {
                insert_country
                    .execute([pending.name.as_str()])
                    .map_err(sqlite_error("insert country"))?;
                summary.countries_created += 1;
                transaction.last_insert_rowid()
            }
        };
        country_ids.push(country_id);
    }

    for (country_id, breed) in breeds_in_arrival_order(countries, &country_ids) {
        insert_breed
            .execute((
                breed.name.as_str(),
                breed.origin.as_str(),
                breed.coat.as_str(),
                breed.pattern.as_str(),
                country_id,
            ))
            .map_err(sqlite_error("insert breed"))?;
        summary.breeds_created += 1;
    }
    debug!(
        "staged {} country(ies) and {} breed(s)",
        summary.countries_created, summary.breeds_created
    );
    Ok(summary)
}

impl EntityStore for SqliteEntityStore {
    fn find_countries_by_name(&self, names: &BTreeSet<&str>) -> Result<Vec<Country>, StoreError> {
        if names.is_empty() {
            return Ok(Vec::new());
        }
        self.query_names(
            "SELECT id, name FROM countries WHERE name",
            names,
            "find countries",
            country_from_row,
        )
    }

    fn find_breeds_by_name(&self, names: &BTreeSet<&str>) -> Result<Vec<Breed>, StoreError> {
        if names.is_empty() {
            return Ok(Vec::new());
        }
        let prefix = format!("{SELECT_BREED} WHERE breeds.name");
        self.query_names(&prefix, names, "find breeds", breed_from_row)
    }

    fn commit(&mut self, countries: &[PendingCountry]) -> Result<CommitSummary, StoreError> {
        if countries.is_empty() {
            return Ok(CommitSummary::default());
        }
        let transaction = self
            .connection
            .transaction()
            .map_err(sqlite_error("begin commit transaction"))?;
        // Dropping the transaction on an early return rolls it back.
        let summary = persist_countries(&transaction, countries)?;
        transaction
            .commit()
            .map_err(sqlite_error("commit transaction"))?;
        Ok(summary)
    }

    fn read_breeds(&self, limit: Limit) -> Result<Vec<Breed>, StoreError> {
        if limit.is_zero() {
            return Ok(Vec::new());
        }
        let bound = i64::try_from(limit.get()).unwrap_or(i64::MAX);
        let mut statement = self
            .connection
            .prepare_cached(&format!("{SELECT_BREED} ORDER BY breeds.id LIMIT ?1"))
            .map_err(sqlite_error("read breeds"))?;
        let rows = statement
            .query_map([bound], breed_from_row)
            .map_err(sqlite_error("read breeds"))?;
        rows.collect::<rusqlite::Result<Vec<_>>>()
            .map_err(sqlite_error("read breeds"))
    }

    fn count_breeds(&self, country: &str) -> Result<u64, StoreError> {
        let count: i64 = self
            .connection
            .query_row(
                "SELECT COUNT(breeds.id) FROM breeds
                    JOIN countries ON countries.id = breeds.country_id
                    WHERE countries.name = ?1",
                [country],
                |row| row.get(0),
            )
            .map_err(sqlite_error("count breeds"))?;
        u64::try_from(count).map_err(|_| StoreError::Unavailable {
            operation: "count breeds",
            message: format!("negative row count {count}"),
        })
    }

    fn breeds_in_country(&self, country: &str) -> Result<Vec<Breed>, StoreError> {
        let mut statement = self
            .connection
            .prepare_cached(&format!(
                "{SELECT_BREED} WHERE countries.name = ?1 ORDER BY breeds.id"
            ))
            .map_err(sqlite_error("read country breeds"))?;
        let rows = statement
            .query_map([country], breed_from_row)
            .map_err(sqlite_error("read country breeds"))?;
        rows.collect::<rusqlite::Result<Vec<_>>>()
            .map_err(sqlite_error("read country breeds"))
    }
}
