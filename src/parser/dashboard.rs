// Toastmasters club-performance dashboard HTML parsing
use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{ElementRef, Html, Selector};

use crate::config::{PENDING_ALIGNMENT_AREA, PENDING_ALIGNMENT_DIVISION};
use crate::model::{
    ClubStatus, PageError, RawClubRow, RawGoals, RawPage, RowError, RowFailure,
};

pub trait Parser {
    fn parse(&self, html: &str) -> Result<RawPage, PageError>;
}

/// Division subheaders use single-letter codes; the pending-alignment
/// placeholder gets its own sentinel. Area codes are district-defined and
/// may be multi-character, so the match is lazy up to the first space.
static DIVISION_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"Division (.)").unwrap());
static AREA_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"Area (.+?) ").unwrap());
static SUSP_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"Susp (\d+/\d+/\d+)").unwrap());

const DIVISION_PENDING: &str = "Division for Clubs Pending Alignment";
const AREA_PENDING: &str = "Area for Clubs Pending Alignment";

// The divisionArea_grid table encloses all division/area/club content.
static CONTAINER_SEL: Lazy<Selector> =
    Lazy::new(|| Selector::parse("table.divisionArea_grid").unwrap());
static CLUB_ROW_SEL: Lazy<Selector> = Lazy::new(|| Selector::parse("tr.club_gray").unwrap());
static CLUB_NUMBER_SEL: Lazy<Selector> = Lazy::new(|| Selector::parse("span.redFont").unwrap());
static CLUB_NAME_SEL: Lazy<Selector> =
    Lazy::new(|| Selector::parse("td.Grid_Title_top5").unwrap());
static ACTIVE_MEMBERS_SEL: Lazy<Selector> =
    Lazy::new(|| Selector::parse("td.Grid_Table.title_gray").unwrap());
static MEMBERSHIP_BASE_SEL: Lazy<Selector> =
    Lazy::new(|| Selector::parse("th.Grid_Table_yellow").unwrap());
static GOALS_MET_SEL: Lazy<Selector> =
    Lazy::new(|| Selector::parse("span.goalsMetBorder").unwrap());
static GOAL_CELL_SEL: Lazy<Selector> =
    Lazy::new(|| Selector::parse(r#"th[class*="Grid_Title_goal"]"#).unwrap());
static SPAN_SEL: Lazy<Selector> = Lazy::new(|| Selector::parse("span").unwrap());
static RECOG_SEL: Lazy<Selector> = Lazy::new(|| Selector::parse("img.recog_status").unwrap());

pub struct DashboardParser;

impl DashboardParser {
    pub fn new() -> Self {
        Self
    }
}

impl Parser for DashboardParser {
    /// Walks the single division/area grid of one page, resolving the
    /// running (division, area) context from subheaders and extracting every
    /// club row under it. Headings always precede the rows they govern;
    /// no lookahead is performed.
    fn parse(&self, html: &str) -> Result<RawPage, PageError> {
        let document = Html::parse_document(html);

        let containers: Vec<ElementRef> = document.select(&CONTAINER_SEL).collect();
        let container = match containers.len() {
            0 => return Err(PageError::MissingContainer),
            1 => containers[0],
            n => return Err(PageError::AmbiguousContainer(n)),
        };

        let mut division = String::new();
        let mut area = String::new();
        let mut rows = Vec::new();
        let mut failures = Vec::new();

        for element in element_sequence(container) {
            if is_club_row(element) {
                collect_row(element, &division, &area, &mut rows, &mut failures);
                continue;
            }

            let text = element.text().collect::<String>();

            if let Some(caps) = DIVISION_RE.captures(&text) {
                // each division numbers its own areas, so the area context
                // does not survive a division boundary
                area.clear();
                division = if text.contains(DIVISION_PENDING) {
                    PENDING_ALIGNMENT_DIVISION.to_string()
                } else {
                    caps[1].to_string()
                };
                continue;
            }

            if let Some(caps) = AREA_RE.captures(&text) {
                area = if text.contains(AREA_PENDING) {
                    PENDING_ALIGNMENT_AREA.to_string()
                } else {
                    caps[1].to_string()
                };
                continue;
            }

            for row in element.select(&CLUB_ROW_SEL) {
                collect_row(row, &division, &area, &mut rows, &mut failures);
            }
        }

        Ok(RawPage { rows, failures })
    }
}

/// Children of the grid container at heading/row-group granularity.
/// Non-element nodes (text, comments) are dropped by the `ElementRef::wrap`
/// capability check. html5ever moves bare `<tr>` runs into implicit table
/// sections, so `tbody`/`thead` wrappers are expanded inline, preserving
/// document order.
fn element_sequence(container: ElementRef<'_>) -> Vec<ElementRef<'_>> {
    let mut sequence = Vec::new();
    for node in container.children() {
        let Some(element) = ElementRef::wrap(node) else {
            continue;
        };
        match element.value().name() {
            "tbody" | "thead" => {
                sequence.extend(element.children().filter_map(ElementRef::wrap));
            }
            _ => sequence.push(element),
        }
    }
    sequence
}

fn is_club_row(element: ElementRef) -> bool {
    element.value().name() == "tr" && element.value().classes().any(|c| c == "club_gray")
}

fn collect_row(
    row: ElementRef,
    division: &str,
    area: &str,
    rows: &mut Vec<RawClubRow>,
    failures: &mut Vec<RowFailure>,
) {
    match extract_row(row, division, area) {
        Ok(extracted) => rows.push(extracted),
        Err(error) => failures.push(RowFailure {
            club_number: probe_club_number(row),
            error,
        }),
    }
}

/// Best-effort club number for identifying a failed row in skip logs.
fn probe_club_number(row: ElementRef) -> Option<u32> {
    let text = row.select(&CLUB_NUMBER_SEL).next()?.text().collect::<String>();
    text.trim().parse().ok()
}

/// Pulls every field of one club row from its fixed marker elements. Any
/// missing or unparsable field fails the row; siblings are unaffected.
fn extract_row(row: ElementRef, division: &str, area: &str) -> Result<RawClubRow, RowError> {
    let number_text = row
        .select(&CLUB_NUMBER_SEL)
        .next()
        .ok_or(RowError::MissingField("club number"))?
        .text()
        .collect::<String>();
    let club_number = parse_count(&number_text, "club number")?;

    // the full club name lives in the title attribute; the visible cell
    // text is truncated on the page
    let club_name = row
        .select(&CLUB_NAME_SEL)
        .next()
        .ok_or(RowError::MissingField("club name cell"))?
        .value()
        .attr("title")
        .ok_or(RowError::MissingField("club name title"))?
        .to_string();

    let active_members = field_count(row, &ACTIVE_MEMBERS_SEL, "active member count")?;
    let membership_base = field_count(row, &MEMBERSHIP_BASE_SEL, "membership base")?;
    let goals_met = field_count(row, &GOALS_MET_SEL, "goals met")?;

    // suspension is flagged by free text in any span of the row; scan them
    // all, last match wins
    let mut suspended_date = None;
    for span in row.select(&SPAN_SEL) {
        let text = span.text().collect::<String>();
        if let Some(caps) = SUSP_RE.captures(&text) {
            suspended_date = Some(caps[1].to_string());
        }
    }
    let status = ClubStatus::derive(suspended_date, active_members);

    // goal-marker cells in document order: the education goals, then the
    // six membership/training/administration counts
    let mut cells = Vec::new();
    for cell in row.select(&GOAL_CELL_SEL) {
        let text = cell.text().collect::<String>();
        cells.push(parse_count(&text, "goal cell")?);
    }
    let (goals, tail) = split_goal_run(&cells)?;

    let recog_src = row
        .select(&RECOG_SEL)
        .next()
        .ok_or(RowError::MissingField("recognition image"))?
        .value()
        .attr("src")
        .ok_or(RowError::MissingField("recognition image src"))?;

    Ok(RawClubRow {
        division: division.to_string(),
        area: area.to_string(),
        club_number,
        club_name,
        status,
        membership_base,
        active_members,
        goals_met,
        goals,
        new_members: tail[0],
        additional_new_members: tail[1],
        officers_trained_round1: tail[2],
        officers_trained_round2: tail[3],
        dues_on_time: tail[4],
        officer_list_on_time: tail[5],
        distinguished_status: distinguished_from_src(recog_src),
    })
}

/// Splits the ordered marker-cell run into the tagged education-goal block
/// and the six trailing counts. Runs of any other length indicate a page
/// variant this parser does not know, and must not be coerced.
fn split_goal_run(cells: &[u32]) -> Result<(RawGoals, [u32; 6]), RowError> {
    let goals = match cells.len() {
        12 => {
            let mut goals = [0u32; 6];
            goals.copy_from_slice(&cells[..6]);
            RawGoals::Six(goals)
        }
        18 => {
            let mut goals = [0u32; 12];
            goals.copy_from_slice(&cells[..12]);
            RawGoals::Twelve(goals)
        }
        n => return Err(RowError::UnknownSchemaWidth(n)),
    };
    let mut tail = [0u32; 6];
    tail.copy_from_slice(&cells[cells.len() - 6..]);
    Ok((goals, tail))
}

fn field_count(row: ElementRef, selector: &Selector, field: &'static str) -> Result<u32, RowError> {
    let element = row
        .select(selector)
        .next()
        .ok_or(RowError::MissingField(field))?;
    parse_count(&element.text().collect::<String>(), field)
}

fn parse_count(text: &str, field: &'static str) -> Result<u32, RowError> {
    let trimmed = text.trim();
    trimmed.parse().map_err(|_| RowError::BadNumber {
        field,
        text: trimmed.to_string(),
    })
}

/// Distinguished status comes from the recognition badge image path:
/// d.png, s.png or p.png (any case), anything else means not distinguished.
fn distinguished_from_src(src: &str) -> String {
    let path = src.to_lowercase();
    let file = path.rsplit('/').next().unwrap_or(path.as_str());
    match file {
        "d.png" => "D",
        "s.png" => "S",
        "p.png" => "P",
        _ => "",
    }
    .to_string()
}
