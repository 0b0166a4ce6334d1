//! LiveSoccerTV page extraction
//!
//! Two page shapes are understood:
//!
//! - the daily schedule (`/schedules/YYYY-MM-DD/`), a table where competition
//!   header rows (`tr.sortable_comp`) are followed by match rows carrying a
//!   `span.timecell`;
//! - a match page, whose broadcaster table lists one country per row
//!   (`span.flag`) followed by channel links (`a.black` / `a.nou`).

use chrono::NaiveDate;
use chrono_tz::Tz;
use scraper::{ElementRef, Html, Selector};
use tracing::debug;

use crate::errors::{AppResult, SourceError};
use crate::models::{MatchRecord, RawChannelMention};
use crate::utils::datetime::{iso_date, kickoff_from_millis, kickoff_sort_key};
use crate::utils::join_url;

const UNKNOWN_LEAGUE: &str = "Unknown League";

fn selector(css: &str) -> AppResult<Selector> {
    Selector::parse(css)
        .map_err(|e| SourceError::parse(format!("Invalid selector '{css}': {e}")).into())
}

/// Concatenated text nodes, each trimmed
fn stripped_text(element: &ElementRef) -> String {
    element
        .text()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect()
}

fn has_class(element: &ElementRef, class: &str) -> bool {
    element.value().classes().any(|c| c == class)
}

/// Listing page for one day
pub fn schedule_url(base_url: &str, date: NaiveDate) -> String {
    join_url(base_url, &format!("/schedules/{}/", iso_date(date)))
}

/// Parse the daily schedule into match records, in page order
pub fn extract_matches(html: &str, base_url: &str, tz: &Tz) -> AppResult<Vec<MatchRecord>> {
    let document = Html::parse_document(html);

    let row_selector = selector("tr")?;
    let flag_selector = selector("span.flag")?;
    let comp_selector = selector("td.r_comprow")?;
    let timecell_selector = selector("span.timecell")?;
    let timestamp_selector = selector("span.ts")?;
    let match_cell_selector = selector("td#match")?;
    let link_selector = selector("a")?;
    let channels_selector = selector("div.mchannels")?;

    let mut matches = Vec::new();
    let mut current_league: Option<String> = None;

    for row in document.select(&row_selector) {
        if has_class(&row, "sortable_comp") {
            let league = row
                .select(&flag_selector)
                .next()
                .or_else(|| row.select(&comp_selector).next())
                .map(|el| stripped_text(&el))
                .unwrap_or_else(|| UNKNOWN_LEAGUE.to_string());
            current_league = Some(league);
            continue;
        }

        let Some(time_cell) = row.select(&timecell_selector).next() else {
            continue;
        };

        let time = time_cell
            .select(&timestamp_selector)
            .next()
            .and_then(|ts| ts.value().attr("dv"))
            .and_then(|dv| dv.trim().parse::<i64>().ok())
            .and_then(|millis| kickoff_from_millis(millis, tz))
            .unwrap_or_else(|| stripped_text(&time_cell));

        let mut title = String::new();
        let mut url = None;
        if let Some(cell) = row.select(&match_cell_selector).next() {
            match cell.select(&link_selector).next() {
                Some(link) => {
                    title = stripped_text(&link);
                    url = link.value().attr("href").map(|href| join_url(base_url, href));
                }
                None => title = stripped_text(&cell),
            }
        }

        let channels = row.select(&channels_selector).next().map(|div| {
            div.select(&link_selector)
                .map(|a| channel_label(&a))
                .collect::<Vec<_>>()
                .join(", ")
        });

        let league = current_league
            .clone()
            .unwrap_or_else(|| UNKNOWN_LEAGUE.to_string());
        let mut record = MatchRecord::new(league, time, title);
        record.url = url;
        record.channels = channels;
        matches.push(record);
    }

    debug!("Extracted {} matches from schedule page", matches.len());
    Ok(matches)
}

/// Flag-style links carry the channel in their title, e.g. `beIN Sports (MENA)`
fn channel_label(link: &ElementRef) -> String {
    let text = stripped_text(link);
    if !has_class(link, "flag") {
        return text;
    }
    match link.value().attr("title") {
        Some(title) => title.split('(').next().unwrap_or(title).trim().to_string(),
        None => text,
    }
}

/// Stable sort by kick-off time; `LIVE`, `TBA` and friends go last
pub fn sort_by_kickoff(records: &mut [MatchRecord]) {
    records.sort_by_key(|record| kickoff_sort_key(&record.time));
}

/// Lowercased `(channel, country)` pairs from a match page's broadcaster table
pub fn extract_channel_mentions(html: &str) -> AppResult<Vec<RawChannelMention>> {
    let document = Html::parse_document(html);

    let row_selector = selector("tr")?;
    let flag_selector = selector("span.flag")?;
    let channel_selector = selector("a.black, a.nou")?;

    let mut mentions = Vec::new();
    for row in document.select(&row_selector) {
        let country = row
            .select(&flag_selector)
            .next()
            .map(|span| span.text().collect::<String>().trim().to_lowercase())
            .filter(|country| !country.is_empty());

        for link in row.select(&channel_selector) {
            let name = link.text().collect::<String>().trim().to_lowercase();
            if name.is_empty() {
                continue;
            }
            mentions.push(RawChannelMention {
                name,
                country: country.clone(),
            });
        }
    }

    Ok(mentions)
}

#[cfg(test)]
mod tests {
    use super::*;

    const BASE: &str = "https://www.livesoccertv.com";

    fn jakarta() -> Tz {
        "Asia/Jakarta".parse().unwrap()
    }

    const SCHEDULE: &str = r#"
<html><body><table>
  <tr class="sortable_comp"><td><span class="flag eng">England - Premier League</span></td></tr>
  <tr class="matchrow">
    <td><span class="timecell"><span class="ts" dv="1743768000000">12:00</span></span></td>
    <td id="match"><a href="/match/1/arsenal-vs-chelsea/">Arsenal vs Chelsea</a></td>
    <td><div class="mchannels">
      <a href="/channels/a">Sky Sports Main Event</a>
      <a class="flag" title="beIN Sports 1 (MENA)" href="/channels/b">beIN</a>
    </div></td>
  </tr>
  <tr class="sortable_comp"><td class="r_comprow"> UEFA Champions League </td></tr>
  <tr class="matchrow">
    <td><span class="timecell">LIVE</span></td>
    <td id="match">Inter vs Bayern</td>
  </tr>
  <tr class="matchrow">
    <td><span class="timecell"><span class="ts" dv="1743753600000">08:00</span></span></td>
    <td id="match"><a href="/match/2/psg-vs-barca/">PSG vs Barcelona</a></td>
  </tr>
  <tr><td>advert row without a time cell</td></tr>
</table></body></html>
"#;

    #[test]
    fn test_schedule_url() {
        let date = NaiveDate::from_ymd_opt(2025, 4, 4).unwrap();
        assert_eq!(
            schedule_url(BASE, date),
            "https://www.livesoccertv.com/schedules/2025-04-04/"
        );
    }

    #[test]
    fn test_extract_matches() {
        let matches = extract_matches(SCHEDULE, BASE, &jakarta()).unwrap();

        assert_eq!(matches.len(), 3);

        let first = &matches[0];
        assert_eq!(first.league, "England - Premier League");
        assert_eq!(first.time, "19:00");
        assert_eq!(first.match_title, "Arsenal vs Chelsea");
        assert_eq!(
            first.url.as_deref(),
            Some("https://www.livesoccertv.com/match/1/arsenal-vs-chelsea/")
        );
        assert_eq!(
            first.channels.as_deref(),
            Some("Sky Sports Main Event, beIN Sports 1")
        );

        let live = &matches[1];
        assert_eq!(live.league, "UEFA Champions League");
        assert_eq!(live.time, "LIVE");
        assert_eq!(live.match_title, "Inter vs Bayern");
        assert_eq!(live.url, None);
        assert_eq!(live.channels, None);

        // 2025-04-04T08:00Z is 15:00 in Jakarta
        assert_eq!(matches[2].time, "15:00");
    }

    #[test]
    fn test_rows_before_any_header_use_unknown_league() {
        let html = r#"<table><tr><td><span class="timecell">20:00</span></td>
            <td id="match"><a href="/match/9/">A vs B</a></td></tr></table>"#;

        let matches = extract_matches(html, BASE, &jakarta()).unwrap();
        assert_eq!(matches[0].league, UNKNOWN_LEAGUE);
        assert_eq!(matches[0].time, "20:00");
    }

    #[test]
    fn test_sort_by_kickoff_is_stable_and_puts_non_times_last() {
        let mut records = vec![
            MatchRecord::new("L", "LIVE", "a"),
            MatchRecord::new("L", "19:00", "b"),
            MatchRecord::new("L", "08:30", "c"),
            MatchRecord::new("L", "19:00", "d"),
            MatchRecord::new("L", "23:59", "e"),
        ];

        sort_by_kickoff(&mut records);

        let order: Vec<_> = records.iter().map(|r| r.match_title.as_str()).collect();
        assert_eq!(order, ["c", "b", "d", "a", "e"]);
    }

    #[test]
    fn test_extract_channel_mentions() {
        let html = r##"
<table>
  <tr><td><span class="flag">Italy</span></td>
      <td><a class="black" href="#">Sky Sport 1</a> <a class="nou" href="#">NOW TV</a></td></tr>
  <tr><td><a class="black" href="#">ESPN</a></td></tr>
  <tr><td><span class="flag">Spain</span></td><td><a href="#">Ignored link</a></td></tr>
</table>"##;

        let mentions = extract_channel_mentions(html).unwrap();

        assert_eq!(
            mentions,
            vec![
                RawChannelMention::new("sky sport 1", Some("italy")),
                RawChannelMention::new("now tv", Some("italy")),
                RawChannelMention::new("espn", None),
            ]
        );
    }
}
