use serde::Deserialize;
use std::fs;

/// Division code assigned to clubs not yet placed in a division.
pub const PENDING_ALIGNMENT_DIVISION: &str = "0D";
/// Area code assigned to clubs not yet placed in an area.
pub const PENDING_ALIGNMENT_AREA: &str = "0A";

/// First program year in which traditional and Pathways goals coexisted,
/// doubling the goal-cell count on the dashboard.
pub const TRANSITION_FIRST_YEAR: &str = "2018-2019";
/// Last program year of the dual-program transitional period.
pub const TRANSITION_LAST_YEAR: &str = "2019-2020";

/// Earliest program year the dashboard site has data for.
pub const FIRST_DASHBOARD_YEAR: &str = "2008-2009";

pub const DEFAULT_BASE_URL: &str = "http://dashboards.toastmasters.org";

#[derive(Debug, Deserialize)]
pub struct AppConfig {
    /// Program year to harvest, "YYYY-YYYY". Defaults to the current one.
    #[serde(default)]
    pub program_year: Option<String>,
    /// Months to harvest, program-year order. Defaults to all twelve.
    #[serde(default)]
    pub months: Option<Vec<String>>,
    /// Districts to harvest. Defaults to whatever the page drop-down lists.
    #[serde(default)]
    pub districts: Option<Vec<String>>,
    #[serde(default = "default_base_url")]
    pub base_url: String,
    pub csv_path: String,
    pub db_path: String,
    /// Upper bound of the randomized delay between district fetches.
    #[serde(default = "default_max_delay")]
    pub max_request_delay_secs: f64,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_max_delay() -> f64 {
    3.0
}

pub fn load_config(path: &str) -> Result<AppConfig, Box<dyn std::error::Error>> {
    let content = fs::read_to_string(path)?;
    let config: AppConfig = serde_json::from_str(&content)?;
    Ok(config)
}
