#![allow(missing_docs)]

pub(crate) mod form;
pub(crate) mod html;
pub(crate) mod http;

use tempfile::TempDir;

use crate::db::Database;

pub(crate) use form::{assert_form_input, assert_hx_endpoint, must_get_form_by_id};
pub(crate) use html::{assert_valid_html, parse_html_document, parse_html_fragment};
pub(crate) use http::{assert_content_type, assert_hx_redirect, assert_status_ok, get_header};

/// Create an empty database in a new temporary directory.
///
/// Each data access opens its own connection, so tests need a database file
/// rather than an in-memory database. Keep the directory alive for as long
/// as the database is used, the files are deleted when it is dropped.
pub(crate) fn get_test_database() -> (TempDir, Database) {
    let dir = tempfile::tempdir().expect("Could not create temporary directory");
    let database =
        Database::open(dir.path().join("test.db")).expect("Could not open test database");

    (dir, database)
}
