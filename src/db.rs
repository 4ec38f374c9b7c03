/*! Database setup and scoped access to the application's SQLite database. */

use std::path::{Path, PathBuf};

use rusqlite::{Connection, OpenFlags, Transaction, TransactionBehavior};

use crate::{Error, expense::create_expense_table};

/// Create the application's tables and indexes if they do not exist.
///
/// Safe to call on every start-up, an existing schema is left as is.
///
/// # Errors
/// Returns an error if there is an SQL error.
pub fn initialize(connection: &Connection) -> Result<(), Error> {
    let transaction =
        Transaction::new_unchecked(connection, TransactionBehavior::Exclusive)?;

    create_expense_table(&transaction)?;

    transaction.commit()?;

    Ok(())
}

/// A handle to the SQLite database file.
///
/// `Database` does not hold a connection. Each call to [Database::read] or
/// [Database::write] opens its own connection and transaction, runs a single
/// operation and releases both before returning, whether the operation
/// succeeded, failed or panicked.
#[derive(Debug, Clone, PartialEq)]
pub struct Database {
    path: PathBuf,
}

/// Diagnostic information about the database, see [Database::check].
#[derive(Debug, Clone, PartialEq)]
pub struct DatabaseInfo {
    /// The file path of the database.
    pub path: PathBuf,
    /// The version of the SQLite library.
    pub sqlite_version: String,
    /// The names of the tables in the database, sorted alphabetically.
    pub tables: Vec<String>,
}

impl Database {
    /// Open the database at `path`, creating the file and schema if needed.
    ///
    /// # Errors
    /// Returns an error if the file cannot be opened or the schema cannot be created.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, Error> {
        let database = Self { path: path.into() };

        let connection = database.connect()?;
        initialize(&connection).inspect_err(|error| {
            tracing::error!(
                "could not initialize database at {:?}: {error}",
                database.path
            )
        })?;

        Ok(database)
    }

    /// Open the existing database at `path` without creating the file or schema.
    ///
    /// # Errors
    /// Returns an error if there is no SQLite database at `path`.
    pub fn open_existing(path: impl Into<PathBuf>) -> Result<Self, Error> {
        let database = Self { path: path.into() };

        Connection::open_with_flags(
            &database.path,
            OpenFlags::SQLITE_OPEN_READ_WRITE | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )
        .inspect_err(|error| {
            tracing::error!("could not open database at {:?}: {error}", database.path)
        })?;

        Ok(database)
    }

    /// The file path of the database.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Run a read-only `operation` in its own connection scope.
    ///
    /// The transaction is rolled back when the operation finishes.
    ///
    /// # Errors
    /// Returns any error from opening the connection or from `operation`.
    pub fn read<T>(
        &self,
        operation: impl FnOnce(&Connection) -> Result<T, Error>,
    ) -> Result<T, Error> {
        self.scope(TransactionBehavior::Deferred, false, operation)
    }

    /// Run `operation` in its own connection scope and commit it if it succeeds.
    ///
    /// If `operation` fails the transaction is rolled back and the error is
    /// returned unchanged.
    ///
    /// # Errors
    /// Returns any error from opening the connection, from `operation`, or
    /// from committing.
    pub fn write<T>(
        &self,
        operation: impl FnOnce(&Connection) -> Result<T, Error>,
    ) -> Result<T, Error> {
        self.scope(TransactionBehavior::Immediate, true, operation)
    }

    /// Report the SQLite version and the tables in the database.
    ///
    /// # Errors
    /// Returns an error if the database cannot be opened or queried.
    pub fn check(&self) -> Result<DatabaseInfo, Error> {
        self.read(|connection| {
            let sqlite_version =
                connection.query_row("SELECT sqlite_version()", [], |row| row.get(0))?;

            let tables = connection
                .prepare(
                    "SELECT name FROM sqlite_master
                     WHERE type = 'table' AND name NOT LIKE 'sqlite_%'
                     ORDER BY name ASC",
                )?
                .query_map([], |row| row.get(0))?
                .collect::<Result<Vec<String>, _>>()?;

            Ok(DatabaseInfo {
                path: self.path.clone(),
                sqlite_version,
                tables,
            })
        })
    }

    fn connect(&self) -> Result<Connection, Error> {
        Connection::open(&self.path)
            .inspect_err(|error| {
                tracing::error!("could not open database at {:?}: {error}", self.path)
            })
            .map_err(Error::from)
    }

    fn scope<T>(
        &self,
        behavior: TransactionBehavior,
        commit: bool,
        operation: impl FnOnce(&Connection) -> Result<T, Error>,
    ) -> Result<T, Error> {
        let mut connection = self.connect()?;
        // Dropping the transaction rolls it back, so every early return and
        // unwind below releases it before the connection is closed.
        let transaction = connection
            .transaction_with_behavior(behavior)
            .inspect_err(|error| tracing::error!("could not begin transaction: {error}"))?;

        let result = operation(&transaction);

        match result {
            Ok(value) if commit => {
                transaction
                    .commit()
                    .inspect_err(|error| tracing::error!("could not commit transaction: {error}"))?;
                Ok(value)
            }
            Ok(value) => Ok(value),
            Err(error) => {
                tracing::error!("Database error: {error}");

                if let Err(rollback_error) = transaction.rollback() {
                    tracing::error!("could not roll back transaction: {rollback_error}");
                }

                Err(error)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::panic::{self, AssertUnwindSafe};

    use rusqlite::Connection;

    use crate::{
        Error,
        db::{Database, initialize},
        test_utils::get_test_database,
    };

    #[test]
    fn initialize_is_idempotent() {
        let connection = Connection::open_in_memory().unwrap();

        initialize(&connection).expect("first initialization failed");
        initialize(&connection).expect("second initialization failed");
    }

    #[test]
    fn open_creates_expenses_table() {
        let (_dir, database) = get_test_database();

        let info = database.check().expect("Could not check database");

        assert_eq!(info.tables, vec!["expenses".to_owned()]);
        assert!(!info.sqlite_version.is_empty());
        assert_eq!(info.path, database.path());
    }

    #[test]
    fn open_existing_database_keeps_data() {
        let (dir, database) = get_test_database();
        database
            .write(|connection| {
                connection.execute(
                    "INSERT INTO expenses (expense_date, amount, category) VALUES ('2024-09-30', 1.0, 'Food')",
                    (),
                )?;
                Ok(())
            })
            .unwrap();

        let reopened = Database::open(database.path()).unwrap();
        let count: u32 = reopened
            .read(|connection| {
                Ok(connection.query_row("SELECT COUNT(id) FROM expenses", [], |row| row.get(0))?)
            })
            .unwrap();

        assert_eq!(count, 1);
        drop(dir);
    }

    #[test]
    fn write_commits_on_success() {
        let (_dir, database) = get_test_database();

        database
            .write(|connection| {
                connection.execute(
                    "INSERT INTO expenses (expense_date, amount, category) VALUES ('2024-09-30', 1.0, 'Food')",
                    (),
                )?;
                Ok(())
            })
            .unwrap();

        assert_eq!(count_rows(&database), 1);
    }

    #[test]
    fn write_rolls_back_on_error() {
        let (_dir, database) = get_test_database();

        let result: Result<(), Error> = database.write(|connection| {
            connection.execute(
                "INSERT INTO expenses (expense_date, amount, category) VALUES ('2024-09-30', 1.0, 'Food')",
                (),
            )?;
            Err(Error::InvalidAmount("abc".to_owned()))
        });

        assert_eq!(result, Err(Error::InvalidAmount("abc".to_owned())));
        assert_eq!(count_rows(&database), 0);
    }

    #[test]
    fn read_does_not_commit() {
        let (_dir, database) = get_test_database();

        database
            .read(|connection| {
                connection.execute(
                    "INSERT INTO expenses (expense_date, amount, category) VALUES ('2024-09-30', 1.0, 'Food')",
                    (),
                )?;
                Ok(())
            })
            .unwrap();

        assert_eq!(count_rows(&database), 0);
    }

    #[test]
    fn write_rolls_back_on_panic() {
        let (_dir, database) = get_test_database();

        let result = panic::catch_unwind(AssertUnwindSafe(|| {
            database.write(|connection| -> Result<(), Error> {
                connection.execute(
                    "INSERT INTO expenses (expense_date, amount, category) VALUES ('2024-09-30', 1.0, 'Food')",
                    (),
                )?;
                panic!("operation failed part way through");
            })
        }));

        assert!(result.is_err());
        assert_eq!(count_rows(&database), 0);
        database
            .write(|connection| {
                connection.execute(
                    "INSERT INTO expenses (expense_date, amount, category) VALUES ('2024-09-30', 2.0, 'Food')",
                    (),
                )?;
                Ok(())
            })
            .expect("database should not stay locked after a panic");
        assert_eq!(count_rows(&database), 1);
    }

    #[test]
    fn open_existing_does_not_create_schema() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty.db");
        Connection::open(&path).unwrap();

        let info = Database::open_existing(&path).unwrap().check().unwrap();

        assert!(info.tables.is_empty(), "got tables {:?}", info.tables);
    }

    #[test]
    fn open_existing_fails_for_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing.db");

        let result = Database::open_existing(&path);

        assert!(
            matches!(result, Err(Error::SqlError(_))),
            "want SqlError, got {result:?}"
        );
        assert!(!path.exists());
    }

    #[test]
    fn open_fails_for_missing_directory() {
        let dir = tempfile::tempdir().unwrap();

        let result = Database::open(dir.path().join("missing").join("expenses.db"));

        assert!(
            matches!(result, Err(Error::SqlError(_))),
            "want SqlError, got {result:?}"
        );
    }

    fn count_rows(database: &Database) -> u32 {
        database
            .read(|connection| {
                Ok(connection.query_row("SELECT COUNT(id) FROM expenses", [], |row| row.get(0))?)
            })
            .expect("Could not count rows")
    }
}
