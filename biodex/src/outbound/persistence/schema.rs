//! Diesel table definitions for the score database.
//!
//! Both tables predate the Rust port; `rowid` is SQLite's implicit row key
//! and records insertion order.

diesel::table! {
    scores (id) {
        rowid -> BigInt,
        id -> Text,
        name -> Text,
        score -> BigInt,
    }
}

diesel::table! {
    entries (rowid) {
        rowid -> BigInt,
        submitter -> Text,
        #[sql_name = "type"]
        species -> Text,
        points_awarded -> BigInt,
        time -> Timestamp,
    }
}
