//! Publication date lookup shared by the article strategies.
//!
//! Sources are tried in order and the first parseable date wins:
//! 1. the strategy's own date selector (`datetime` attribute, then text)
//! 2. `meta[property="article:published_time"]`, `meta[name="date"]`
//! 3. `time[datetime]`
//! 4. JSON-LD `datePublished`, anywhere in the script's object graph

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use once_cell::sync::Lazy;
use scraper::{Html, Selector};
use serde_json::Value;

static META_DATES: Lazy<Selector> = Lazy::new(|| {
    Selector::parse(
        r#"meta[property="article:published_time"], meta[name="date"], meta[itemprop="datePublished"]"#,
    )
    .expect("valid meta selector")
});
static TIME_DATETIME: Lazy<Selector> =
    Lazy::new(|| Selector::parse("time[datetime]").expect("valid time selector"));
static JSON_LD: Lazy<Selector> = Lazy::new(|| {
    Selector::parse(r#"script[type="application/ld+json"]"#).expect("valid json-ld selector")
});

/// Parse an ISO-8601 date or datetime, ignoring surrounding whitespace.
pub fn parse_iso_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.date_naive());
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S") {
        return Some(dt.date());
    }
    raw.get(..10)
        .and_then(|head| NaiveDate::parse_from_str(head, "%Y-%m-%d").ok())
}

/// Best-effort publication date of `document`.
pub fn extract_date(document: &Html, date_selector: Option<&Selector>) -> Option<NaiveDate> {
    if let Some(selector) = date_selector {
        for element in document.select(selector) {
            let candidate = element
                .value()
                .attr("datetime")
                .or_else(|| element.value().attr("content"))
                .and_then(parse_iso_date)
                .or_else(|| parse_iso_date(&element.text().collect::<String>()));
            if candidate.is_some() {
                return candidate;
            }
        }
    }

    document
        .select(&META_DATES)
        .filter_map(|el| el.value().attr("content"))
        .chain(
            document
                .select(&TIME_DATETIME)
                .filter_map(|el| el.value().attr("datetime")),
        )
        .find_map(parse_iso_date)
        .or_else(|| json_ld_date(document))
}

fn json_ld_date(document: &Html) -> Option<NaiveDate> {
    document
        .select(&JSON_LD)
        .filter_map(|script| serde_json::from_str::<Value>(&script.text().collect::<String>()).ok())
        .find_map(|value| find_date_published(&value))
}

fn find_date_published(value: &Value) -> Option<NaiveDate> {
    match value {
        Value::Object(map) => map
            .get("datePublished")
            .and_then(Value::as_str)
            .and_then(parse_iso_date)
            .or_else(|| map.values().find_map(find_date_published)),
        Value::Array(items) => items.iter().find_map(find_date_published),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_parse_iso_date_variants() {
        assert_eq!(parse_iso_date("2025-05-06"), Some(ymd(2025, 5, 6)));
        assert_eq!(parse_iso_date(" 2025-05-06T14:30:00+02:00 "), Some(ymd(2025, 5, 6)));
        assert_eq!(parse_iso_date("2025-05-06T14:30:00"), Some(ymd(2025, 5, 6)));
        assert_eq!(parse_iso_date("2025-05-06T14:30:00.000Z"), Some(ymd(2025, 5, 6)));
        assert_eq!(parse_iso_date("mardi 6 mai"), None);
        assert_eq!(parse_iso_date("2025-13-40"), None);
    }

    #[test]
    fn test_meta_wins_over_json_ld() {
        let html = Html::parse_document(
            r#"<html><head>
            <meta property="article:published_time" content="2025-04-01T08:00:00Z">
            <script type="application/ld+json">{"datePublished": "2024-01-01"}</script>
            </head><body></body></html>"#,
        );
        assert_eq!(extract_date(&html, None), Some(ymd(2025, 4, 1)));
    }

    #[test]
    fn test_json_ld_graph() {
        let html = Html::parse_document(
            r#"<html><head>
            <script type="application/ld+json">
              {"@graph": [{"@type": "WebPage"}, {"@type": "NewsArticle", "datePublished": "2025-03-02T10:00:00+01:00"}]}
            </script>
            </head><body></body></html>"#,
        );
        assert_eq!(extract_date(&html, None), Some(ymd(2025, 3, 2)));
    }

    #[test]
    fn test_custom_selector_and_missing_date() {
        let html = Html::parse_document(
            r#"<html><body><span class="date">2025-02-14</span><time datetime="2020-01-01"></time></body></html>"#,
        );
        let selector = Selector::parse(".date").unwrap();
        assert_eq!(extract_date(&html, Some(&selector)), Some(ymd(2025, 2, 14)));

        let bare = Html::parse_document("<html><body><p>Pas de date</p></body></html>");
        assert_eq!(extract_date(&bare, None), None);
    }
}
