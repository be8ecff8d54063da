mod config;
mod model;
mod normalizer;
mod parser;
mod scraper;
mod storage;
mod utils;

use config::{load_config, AppConfig};
use model::{FetchError, PageRequest};
use normalizer::normalize_all;
use parser::{DashboardParser, Parser};
use scraper::{discover_districts, is_error_page, DashboardFetcher, Fetcher};
use storage::{CsvStorage, SqliteStorage};
use tokio::time::{sleep, Duration};
use tracing::{error, info, warn};

#[tokio::main]
async fn main() {
    // Initialize logging
    tracing_subscriber::fmt::init();

    let config_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "config.json".to_string());
    let config: AppConfig = match load_config(&config_path) {
        Ok(cfg) => cfg,
        Err(e) => {
            error!("Config load error: {}", e);
            return;
        }
    };

    let program_year = config
        .program_year
        .clone()
        .unwrap_or_else(utils::current_program_year);
    if !utils::is_valid_program_year(&program_year) {
        error!("Invalid program year: {}", program_year);
        return;
    }

    let months: Vec<String> = config.months.clone().unwrap_or_else(|| {
        utils::PROGRAM_YEAR_MONTHS
            .iter()
            .map(|m| m.to_string())
            .collect()
    });
    for month in &months {
        if !utils::PROGRAM_YEAR_MONTHS.contains(&month.as_str()) {
            error!("Invalid month value: {} (use 7-12 and 1-6)", month);
            return;
        }
    }

    let fetcher = match DashboardFetcher::new(&config.base_url) {
        Ok(f) => f,
        Err(e) => {
            error!("Failed to build http client: {}", e);
            return;
        }
    };
    let parser = DashboardParser::new();

    let mut csv = match CsvStorage::create(&config.csv_path) {
        Ok(c) => c,
        Err(e) => {
            error!("Failed to create {}: {}", config.csv_path, e);
            return;
        }
    };
    let mut store = match SqliteStorage::new(&config.db_path) {
        Ok(s) => s,
        Err(e) => {
            error!("Failed to initialize storage: {}", e);
            return;
        }
    };

    info!("Harvesting program year {} months {:?}", program_year, months);
    let mut total_records = 0usize;

    for month in &months {
        let districts = match district_list(&config, &fetcher, &program_year, month).await {
            Ok(districts) => districts,
            Err(e) => {
                error!("Skipping month {}: district discovery failed: {}", month, e);
                continue;
            }
        };
        info!("Month {}: {} districts to fetch", month, districts.len());

        for district in &districts {
            // stay polite: the dashboard is a shared public service
            let delay = rand::random::<f64>() * config.max_request_delay_secs;
            sleep(Duration::from_secs_f64(delay)).await;

            let request = PageRequest {
                program_year: program_year.clone(),
                month: month.clone(),
                district: district.clone(),
            };

            let html = match fetcher.fetch(&request).await {
                Ok(html) => html,
                Err(e) => {
                    warn!(
                        "Skipping page {} {} {}: {}",
                        program_year, month, district, e
                    );
                    continue;
                }
            };
            if is_error_page(&html) {
                warn!(
                    "Skipping page {} {} {}: dashboard error page",
                    program_year, month, district
                );
                continue;
            }

            let raw = match parser.parse(&html) {
                Ok(raw) => raw,
                Err(e) => {
                    warn!(
                        "Skipping page {} {} {}: {}",
                        program_year, month, district, e
                    );
                    continue;
                }
            };
            for failure in &raw.failures {
                warn!(
                    "Skipping row in {} {} {} (club {:?}): {}",
                    program_year, month, district, failure.club_number, failure.error
                );
            }
            if raw.rows.is_empty() {
                warn!(
                    "No club data in {} {} {}",
                    program_year, month, district
                );
                continue;
            }

            let records = normalize_all(raw.rows, &request);
            for record in &records {
                if let Err(e) = csv.append(record) {
                    warn!("CSV write failed for club {}: {}", record.club_number, e);
                }
            }
            if let Err(e) = store.save_all(&records) {
                warn!(
                    "Database write failed for {} {} {}: {}",
                    program_year, month, district, e
                );
            }

            total_records += records.len();
            info!("District {}: {} clubs", district, records.len());
        }
    }

    if let Err(e) = csv.flush() {
        warn!("CSV flush failed: {}", e);
    }
    info!(
        "Harvest complete: {} records for {}",
        total_records, program_year
    );
}

/// Districts for one month: the configured list if pinned, otherwise
/// whatever the seed page's drop-down offers. Founder's District ("F") has
/// existed every program year, so it serves as the seed.
async fn district_list(
    config: &AppConfig,
    fetcher: &DashboardFetcher,
    program_year: &str,
    month: &str,
) -> Result<Vec<String>, FetchError> {
    if let Some(districts) = &config.districts {
        return Ok(districts.clone());
    }

    let seed = PageRequest {
        program_year: program_year.to_string(),
        month: month.to_string(),
        district: "F".to_string(),
    };
    let html = fetcher.fetch(&seed).await?;
    discover_districts(&html)
}
