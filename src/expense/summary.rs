//! Aggregated totals of expenses by category and by calendar month.

use std::{fmt::Display, str::FromStr};

use rusqlite::{
    Connection,
    types::{FromSql, FromSqlError, FromSqlResult, ValueRef},
};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use time::{Date, Month};

use crate::{Error, db::Database};

/// The total spent in one category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategorySummary {
    /// The category the expenses were grouped by.
    pub category: String,
    /// The sum of the amounts in the category.
    pub total: f64,
    /// The number of expenses in the category.
    pub count: u32,
}

/// The total spent in one calendar month.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlySummary {
    /// The year and month the expenses were grouped by.
    pub month: YearMonth,
    /// The sum of the amounts in the month.
    pub total: f64,
    /// The number of expenses in the month.
    pub count: u32,
}

/// A calendar month in a specific year, e.g. September 2024.
///
/// Orders chronologically and is written as `YYYY-MM`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct YearMonth {
    /// The calendar year.
    pub year: i32,
    /// The month of the year.
    pub month: Month,
}

impl YearMonth {
    /// Create a new [YearMonth].
    pub fn new(year: i32, month: Month) -> Self {
        Self { year, month }
    }

    /// A human readable label, e.g. "September 2024".
    pub fn label(&self) -> String {
        format!("{} {}", self.month, self.year)
    }
}

impl From<Date> for YearMonth {
    fn from(date: Date) -> Self {
        Self::new(date.year(), date.month())
    }
}

impl Display for YearMonth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month as u8)
    }
}

impl FromStr for YearMonth {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (year, month) = s
            .split_once('-')
            .ok_or_else(|| format!("\"{s}\" is not in the format YYYY-MM"))?;

        let year = year
            .parse::<i32>()
            .map_err(|error| format!("invalid year in \"{s}\": {error}"))?;
        let month = month
            .parse::<u8>()
            .map_err(|error| format!("invalid month in \"{s}\": {error}"))?;
        let month =
            Month::try_from(month).map_err(|error| format!("invalid month in \"{s}\": {error}"))?;

        Ok(Self::new(year, month))
    }
}

impl FromSql for YearMonth {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        value
            .as_str()?
            .parse()
            .map_err(|error: String| FromSqlError::Other(error.into()))
    }
}

impl Serialize for YearMonth {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for YearMonth {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        text.parse().map_err(serde::de::Error::custom)
    }
}

/// Sum the expenses between `start_date` and `end_date` (inclusive) by category.
///
/// Categories are sorted alphabetically. If `start_date` is after
/// `end_date` the result is empty.
///
/// # Errors
/// This function will return a [Error::SqlError] if there is an SQL error.
pub fn select_category_summary(
    start_date: Date,
    end_date: Date,
    connection: &Connection,
) -> Result<Vec<CategorySummary>, Error> {
    connection
        .prepare(
            "SELECT category, SUM(amount) AS total, COUNT(id) AS count
             FROM expenses
             WHERE expense_date BETWEEN :start_date AND :end_date
             GROUP BY category
             ORDER BY category ASC",
        )?
        .query_map(
            &[(":start_date", &start_date), (":end_date", &end_date)],
            |row| {
                Ok(CategorySummary {
                    category: row.get(0)?,
                    total: row.get(1)?,
                    count: row.get(2)?,
                })
            },
        )?
        .map(|maybe_summary| maybe_summary.map_err(Error::from))
        .collect()
}

/// Sum all expenses by calendar month, oldest month first.
///
/// # Errors
/// This function will return a [Error::SqlError] if there is an SQL error.
pub fn select_monthly_summary(connection: &Connection) -> Result<Vec<MonthlySummary>, Error> {
    connection
        .prepare(
            "SELECT strftime('%Y-%m', expense_date) AS month, SUM(amount) AS total, COUNT(id) AS count
             FROM expenses
             GROUP BY month
             ORDER BY month ASC",
        )?
        .query_map([], |row| {
            Ok(MonthlySummary {
                month: row.get(0)?,
                total: row.get(1)?,
                count: row.get(2)?,
            })
        })?
        .map(|maybe_summary| maybe_summary.map_err(Error::from))
        .collect()
}

/// Sum the expenses between `start_date` and `end_date` (inclusive) by category.
///
/// # Errors
/// Returns an error if the database cannot be opened or queried.
pub fn fetch_expense_summary(
    start_date: Date,
    end_date: Date,
    database: &Database,
) -> Result<Vec<CategorySummary>, Error> {
    tracing::info!("fetch_expense_summary called with start: {start_date} end: {end_date}");

    database.read(|connection| select_category_summary(start_date, end_date, connection))
}

/// Sum all expenses by calendar month, oldest month first.
///
/// # Errors
/// Returns an error if the database cannot be opened or queried.
pub fn fetch_monthly_expense_summary(database: &Database) -> Result<Vec<MonthlySummary>, Error> {
    tracing::info!("fetch_monthly_expense_summary called");

    database.read(select_monthly_summary)
}

#[cfg(test)]
mod year_month_tests {
    use time::{Month, macros::date};

    use super::YearMonth;

    #[test]
    fn formats_with_zero_padding() {
        assert_eq!(YearMonth::new(2024, Month::March).to_string(), "2024-03");
    }

    #[test]
    fn parses_formatted_string() {
        assert_eq!(
            "2024-09".parse::<YearMonth>(),
            Ok(YearMonth::new(2024, Month::September))
        );
    }

    #[test]
    fn rejects_invalid_month() {
        assert!("2024-13".parse::<YearMonth>().is_err());
        assert!("2024".parse::<YearMonth>().is_err());
    }

    #[test]
    fn orders_by_year_then_month() {
        let mut months = vec![
            YearMonth::new(2024, Month::January),
            YearMonth::new(2023, Month::December),
            YearMonth::new(2024, Month::February),
        ];

        months.sort();

        assert_eq!(
            months,
            vec![
                YearMonth::new(2023, Month::December),
                YearMonth::new(2024, Month::January),
                YearMonth::new(2024, Month::February),
            ]
        );
    }

    #[test]
    fn label_uses_month_name() {
        assert_eq!(
            YearMonth::from(date!(2024 - 09 - 30)).label(),
            "September 2024"
        );
    }

    #[test]
    fn serializes_as_string() {
        let json = serde_json::to_string(&YearMonth::new(2024, Month::September)).unwrap();

        assert_eq!(json, "\"2024-09\"");
        assert_eq!(
            serde_json::from_str::<YearMonth>(&json).unwrap(),
            YearMonth::new(2024, Month::September)
        );
    }
}

#[cfg(test)]
mod summary_tests {
    use rusqlite::Connection;
    use time::{Month, macros::date};

    use crate::{
        db::initialize,
        expense::{
            CategorySummary, Expense, MonthlySummary, YearMonth, fetch_expense_summary,
            fetch_monthly_expense_summary, insert_expense,
            core::insert_expense_row,
            summary::{select_category_summary, select_monthly_summary},
        },
        test_utils::get_test_database,
    };

    fn get_test_connection() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        initialize(&conn).unwrap();
        conn
    }

    #[test]
    fn category_summary_matches_example() {
        let (_dir, database) = get_test_database();
        let date = date!(2024 - 09 - 30);
        insert_expense(
            &Expense::build(date, 15.50, "Food").notes(Some("Lunch")),
            &database,
        )
        .unwrap();
        insert_expense(
            &Expense::build(date, 45.00, "Transport").notes(Some("Pass")),
            &database,
        )
        .unwrap();

        let summary =
            fetch_expense_summary(date!(2024 - 09 - 01), date!(2024 - 09 - 30), &database)
                .unwrap();

        assert_eq!(
            summary,
            vec![
                CategorySummary {
                    category: "Food".to_owned(),
                    total: 15.50,
                    count: 1
                },
                CategorySummary {
                    category: "Transport".to_owned(),
                    total: 45.00,
                    count: 1
                },
            ]
        );
    }

    #[test]
    fn category_summary_sums_and_respects_inclusive_range() {
        let conn = get_test_connection();
        for (date, amount, category) in [
            (date!(2024 - 08 - 31), 100.0, "Food"),
            (date!(2024 - 09 - 01), 10.0, "Food"),
            (date!(2024 - 09 - 15), 2.5, "Food"),
            (date!(2024 - 09 - 30), 7.0, "Rent"),
            (date!(2024 - 10 - 01), 100.0, "Rent"),
        ] {
            insert_expense_row(&Expense::build(date, amount, category), &conn).unwrap();
        }

        let summary =
            select_category_summary(date!(2024 - 09 - 01), date!(2024 - 09 - 30), &conn).unwrap();

        assert_eq!(
            summary,
            vec![
                CategorySummary {
                    category: "Food".to_owned(),
                    total: 12.5,
                    count: 2
                },
                CategorySummary {
                    category: "Rent".to_owned(),
                    total: 7.0,
                    count: 1
                },
            ]
        );
    }

    #[test]
    fn category_summary_with_reversed_range_is_empty() {
        let conn = get_test_connection();
        insert_expense_row(&Expense::build(date!(2024 - 09 - 15), 1.0, "Food"), &conn).unwrap();

        let summary =
            select_category_summary(date!(2024 - 09 - 30), date!(2024 - 09 - 01), &conn).unwrap();

        assert!(summary.is_empty());
    }

    #[test]
    fn monthly_summary_groups_by_year_and_month() {
        let conn = get_test_connection();
        for (date, amount) in [
            (date!(2024 - 09 - 01), 1.0),
            (date!(2024 - 09 - 30), 2.0),
            (date!(2023 - 09 - 15), 4.0),
            (date!(2024 - 01 - 10), 8.0),
        ] {
            insert_expense_row(&Expense::build(date, amount, "Food"), &conn).unwrap();
        }

        let summary = select_monthly_summary(&conn).unwrap();

        assert_eq!(
            summary,
            vec![
                MonthlySummary {
                    month: YearMonth::new(2023, Month::September),
                    total: 4.0,
                    count: 1
                },
                MonthlySummary {
                    month: YearMonth::new(2024, Month::January),
                    total: 8.0,
                    count: 1
                },
                MonthlySummary {
                    month: YearMonth::new(2024, Month::September),
                    total: 3.0,
                    count: 2
                },
            ]
        );
    }

    #[test]
    fn monthly_summary_of_empty_table_is_empty() {
        let (_dir, database) = get_test_database();

        let summary = fetch_monthly_expense_summary(&database).unwrap();

        assert!(summary.is_empty());
    }
}
