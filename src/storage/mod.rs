// Storage module: CSV and SQLite sinks for canonical club records.

pub mod csv;
pub mod sqlite;

pub use csv::CsvStorage;
pub use sqlite::SqliteStorage;
