use once_cell::sync::Lazy;
use reqwest::Client;
use scraper::{Html, Selector};

use crate::model::{FetchError, PageRequest};
use crate::scraper::traits::Fetcher;

/// The dashboard's own error page body; note the site's spelling.
const ERROR_PAGE_MARKER: &str = "An error has occured";

const USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) dcp-harvest/0.1";

static DISTRICT_OPTION_SEL: Lazy<Selector> = Lazy::new(|| {
    Selector::parse("select#cpContent_TopControls1_ddlDistricts option").unwrap()
});

pub struct DashboardFetcher {
    client: Client,
    base_url: String,
}

impl DashboardFetcher {
    pub fn new(base_url: &str) -> Result<Self, FetchError> {
        let client = Client::builder().user_agent(USER_AGENT).build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn build_url(&self, req: &PageRequest) -> String {
        format!(
            "{}/{}/Club.aspx?month={}&id={}",
            self.base_url, req.program_year, req.month, req.district
        )
    }
}

#[async_trait::async_trait]
impl Fetcher for DashboardFetcher {
    async fn fetch(&self, req: &PageRequest) -> Result<String, FetchError> {
        let url = self.build_url(req);

        let response = self.client.get(&url).send().await?;
        if !response.status().is_success() {
            return Err(FetchError::BadStatus(response.status().as_u16()));
        }

        Ok(response.text().await?)
    }
}

/// True when the dashboard answered with its error page instead of data.
/// Such pages are logged and skipped, never parsed.
pub fn is_error_page(html: &str) -> bool {
    html.contains(ERROR_PAGE_MARKER)
}

/// District ids offered by the drop-down of any club-performance page, in
/// page order. Any page of the month can serve as the seed.
pub fn discover_districts(html: &str) -> Result<Vec<String>, FetchError> {
    let document = Html::parse_document(html);
    let districts: Vec<String> = document
        .select(&DISTRICT_OPTION_SEL)
        .filter_map(|option| option.value().attr("value"))
        .map(str::to_string)
        .collect();

    if districts.is_empty() {
        return Err(FetchError::MissingDistrictList);
    }
    Ok(districts)
}
