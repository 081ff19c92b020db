//! Schedule acquisition from the published prayer-times page.
//!
//! The published page carries one `table.ptTable` whose rows are
//! (prayer name, 12-hour clock time) pairs. Everything past this module
//! only ever sees normalized `PrayerEvent`s for the requested day.

use std::time::Duration;

use chrono::{NaiveDate, NaiveTime};
use log::debug;
use regex::Regex;
use scraper::{Html, Selector};

use super::model::{PrayerEvent, Schedule};

/// Errors while fetching or extracting a day's schedule. The polling loop
/// treats every variant identically: log, clear state, back off.
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    /// Transport failure or non-success status from the publisher.
    #[error("HTTP error: {0}")]
    Http(String),

    /// Page structure did not match expectations.
    #[error("parse error: {0}")]
    Parse(String),

    /// Page was readable but contained no usable schedule rows.
    #[error("no schedule rows found")]
    Empty,
}

/// Producer of one day's ordered (name, time) pairs.
pub trait ScheduleSource: Send + Sync {
    async fn fetch(&self, day: NaiveDate) -> Result<Schedule, SourceError>;
}

/// Scrapes the prayer schedule from a publisher page.
pub struct HtmlScheduleSource {
    client: reqwest::Client,
    url: String,
}

impl HtmlScheduleSource {
    pub fn new(url: impl Into<String>) -> Self {
        // Publisher pages are slow; allow a generous request window.
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(12))
            .build()
            .expect("static client options");
        Self {
            client,
            url: url.into(),
        }
    }
}

impl ScheduleSource for HtmlScheduleSource {
    async fn fetch(&self, day: NaiveDate) -> Result<Schedule, SourceError> {
        debug!("fetching schedule from {}", self.url);

        let response = self
            .client
            .get(&self.url)
            .header("Accept", "text/html,application/xhtml+xml")
            .send()
            .await
            .map_err(|e| SourceError::Http(format!("request failed: {e}")))?
            .error_for_status()
            .map_err(|e| SourceError::Http(format!("status error: {e}")))?;

        let html = response
            .text()
            .await
            .map_err(|e| SourceError::Http(format!("body read failed: {e}")))?;

        debug!(
            "schedule page received ({} bytes), extracting rows",
            html.len()
        );
        parse_schedule_html(&html, day)
    }
}

/// Parse the publisher page into an ascending schedule for `day`.
///
/// Extracted as a separate function for testability with mock HTML. Rows
/// whose time cell cannot be read are skipped, matching the tolerant
/// behavior of the page's other consumers.
pub fn parse_schedule_html(html: &str, day: NaiveDate) -> Result<Schedule, SourceError> {
    let document = Html::parse_document(html);

    let table_sel = Selector::parse("table.ptTable")
        .map_err(|e| SourceError::Parse(format!("invalid table selector: {e:?}")))?;
    let row_sel = Selector::parse("tr")
        .map_err(|e| SourceError::Parse(format!("invalid row selector: {e:?}")))?;
    let cell_sel = Selector::parse("td")
        .map_err(|e| SourceError::Parse(format!("invalid cell selector: {e:?}")))?;

    let table = document
        .select(&table_sel)
        .next()
        .ok_or_else(|| SourceError::Parse("schedule table not found".to_string()))?;

    let mut events = Vec::new();
    for row in table.select(&row_sel) {
        let cells: Vec<_> = row.select(&cell_sel).collect();
        if cells.len() < 2 {
            continue;
        }

        let name = cells[0].text().collect::<String>().trim().to_string();
        if name.is_empty() {
            continue;
        }

        let time_text = cells[1].text().collect::<String>();
        let Some(time) = parse_time_cell(&time_text) else {
            continue;
        };

        events.push(PrayerEvent {
            name,
            time: day.and_time(time),
        });
    }

    if events.is_empty() {
        return Err(SourceError::Empty);
    }

    events.sort_by_key(|event| event.time);
    Ok(events)
}

/// Read a clock time out of a table cell.
///
/// Cells carry values like "05:00 AM" but arrive with stray whitespace and
/// non-breaking spaces, so the digits are matched rather than the raw text.
/// A cell without an AM/PM marker is read as a 24-hour time.
fn parse_time_cell(text: &str) -> Option<NaiveTime> {
    let pattern = Regex::new(r"(?i)(\d{1,2}):(\d{2})\s*(AM|PM)?").expect("valid time pattern");
    let caps = pattern.captures(text)?;

    let hour: u32 = caps[1].parse().ok()?;
    let minute: u32 = caps[2].parse().ok()?;

    match caps.get(3) {
        Some(meridiem) => {
            if !(1..=12).contains(&hour) {
                return None;
            }
            let hour24 = match (hour % 12, meridiem.as_str().eq_ignore_ascii_case("pm")) {
                (h, true) => h + 12,
                (h, false) => h,
            };
            NaiveTime::from_hms_opt(hour24, minute, 0)
        }
        None => NaiveTime::from_hms_opt(hour, minute, 0),
    }
}
