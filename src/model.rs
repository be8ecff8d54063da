// Core structs: ClubRecord, raw row shapes, error taxonomy
use std::fmt;

use thiserror::Error;

/// Coordinates identifying one dashboard page: one district for one month of
/// one program year. Supplied by the caller, never parsed out of the page.
#[derive(Debug, Clone)]
pub struct PageRequest {
    pub program_year: String,
    pub month: String,
    pub district: String,
}

/// Club operating status, derived during extraction. The suspension date is
/// kept as the literal matched string from the page, e.g. "03/15/2022".
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClubStatus {
    Active,
    Low,
    Ineligible,
    Suspended(String),
}

impl ClubStatus {
    /// A matched suspension marker wins over everything else; otherwise the
    /// status falls out of the current active member count.
    pub fn derive(suspended_date: Option<String>, active_members: u32) -> Self {
        match suspended_date {
            Some(date) => ClubStatus::Suspended(date),
            None if active_members == 0 => ClubStatus::Ineligible,
            None if active_members < 8 => ClubStatus::Low,
            None => ClubStatus::Active,
        }
    }
}

impl fmt::Display for ClubStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClubStatus::Active => write!(f, "Active"),
            ClubStatus::Low => write!(f, "Low"),
            ClubStatus::Ineligible => write!(f, "Ineligible"),
            ClubStatus::Suspended(date) => write!(f, "Suspended {}", date),
        }
    }
}

/// Education-goal block as it appears on the page: six goals during the
/// traditional-only and Pathways-only eras, twelve during the transitional
/// period when both programs counted. Any other width is rejected at
/// extraction time, never coerced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RawGoals {
    Six([u32; 6]),
    Twelve([u32; 12]),
}

/// One club row as extracted from a page, tagged with the division/area
/// context that preceded it, before schema-era normalization.
#[derive(Debug, Clone)]
pub struct RawClubRow {
    pub division: String,
    pub area: String,
    pub club_number: u32,
    pub club_name: String,
    pub status: ClubStatus,
    pub membership_base: u32,
    pub active_members: u32,
    pub goals_met: u32,
    pub goals: RawGoals,
    pub new_members: u32,
    pub additional_new_members: u32,
    pub officers_trained_round1: u32,
    pub officers_trained_round2: u32,
    pub dues_on_time: u32,
    pub officer_list_on_time: u32,
    pub distinguished_status: String,
}

/// Canonical wide record, one per club per district per month per program
/// year. `goals` always holds the twelve canonical slots: traditional goals
/// in 0..6, Pathways goals in 6..12, with the inapplicable half zero-filled
/// outside the transitional period. Never mutated after normalization.
#[derive(Debug, Clone, PartialEq)]
pub struct ClubRecord {
    pub district: String,
    pub division: String,
    pub area: String,
    pub club_number: u32,
    pub club_name: String,
    pub status: ClubStatus,
    pub membership_base: u32,
    pub active_members: u32,
    pub goals_met: u32,
    pub goals: [u32; 12],
    pub new_members: u32,
    pub additional_new_members: u32,
    pub officers_trained_round1: u32,
    pub officers_trained_round2: u32,
    pub dues_on_time: u32,
    pub officer_list_on_time: u32,
    pub distinguished_status: String,
    pub program_year: String,
    pub month: String,
}

/// Column names of the canonical flat record, in serialization order.
/// Usable verbatim as a sink schema header.
pub const CSV_COLUMNS: [&str; 30] = [
    "District",
    "Division",
    "Area",
    "Club Number",
    "Club Name",
    "Club Status",
    "Mem. Base",
    "Active Members",
    "Goals Met",
    "CCs",
    "Add. CCs",
    "ACs",
    "Add. ACs",
    "CL/AL/DTMs",
    "Add. CL/AL/DTMs",
    "Level 1s",
    "Level 2s",
    "Add. Level 2s",
    "Level 3s",
    "Level 4s",
    "Level 5s",
    "New Members",
    "Add. New Members",
    "Off. Trained Round 1",
    "Off. Trained Round 2",
    "Mem. dues on time Oct & Apr",
    "Off. List On Time",
    "Club Distinguished Status",
    "Program Year",
    "Month",
];

/// Result of parsing one page: every club row that extracted cleanly, plus
/// one entry per row that had to be skipped. Row failures never abort the
/// page; page failures never abort the batch.
#[derive(Debug)]
pub struct RawPage {
    pub rows: Vec<RawClubRow>,
    pub failures: Vec<RowFailure>,
}

/// A skipped club row, carrying the club number when it was recoverable so
/// the row can be identified for offline reprocessing.
#[derive(Debug)]
pub struct RowFailure {
    pub club_number: Option<u32>,
    pub error: RowError,
}

/// The page as a whole is unusable.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PageError {
    #[error("division/area grid table not found")]
    MissingContainer,
    #[error("expected one division/area grid table, found {0}")]
    AmbiguousContainer(usize),
}

/// One club row is unusable; its siblings are unaffected.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RowError {
    #[error("missing {0}")]
    MissingField(&'static str),
    #[error("unparsable {field}: {text:?}")]
    BadNumber { field: &'static str, text: String },
    #[error("unrecognized goal cell count: {0}")]
    UnknownSchemaWidth(usize),
}

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("http request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("dashboard returned HTTP {0}")]
    BadStatus(u16),
    #[error("district drop-down not found in page")]
    MissingDistrictList,
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
