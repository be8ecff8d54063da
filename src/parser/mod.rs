// Parser module: club-performance dashboard HTML to raw club rows.

pub mod dashboard;

pub use dashboard::{DashboardParser, Parser};
