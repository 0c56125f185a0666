//! CNN Lite strategies.
//!
//! [CNN Lite](https://lite.cnn.com) is a text-only version of CNN designed
//! for low-bandwidth connections. Its HTML is minimal and consistent, so
//! the selectors are fixed here rather than configured.
//!
//! # URL Pattern
//!
//! Articles are linked from the homepage with relative URLs that are resolved
//! to absolute URLs like `https://lite.cnn.com/2025/05/06/article-slug`.

use super::{ArticleExtraction, LinkDiscovery, date, element_text, finalize_links, max_links};
use crate::config::Params;
use crate::error::StrategyError;
use crate::models::{ArticleRecord, Page};
use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{Html, Selector};
use tracing::{debug, instrument};
use url::Url;

const CNN_LITE_URL: &str = "https://lite.cnn.com";

static STORY: Lazy<Selector> =
    Lazy::new(|| Selector::parse(".card--lite a[href]").expect("valid story selector"));
static HEADLINE: Lazy<Selector> =
    Lazy::new(|| Selector::parse(".headline--lite").expect("valid headline selector"));
static PARAGRAPH: Lazy<Selector> =
    Lazy::new(|| Selector::parse(".article--lite p").expect("valid paragraph selector"));
static ARTICLE_BODY: Lazy<Selector> =
    Lazy::new(|| Selector::parse(".article--lite").expect("valid article selector"));
static TIMESTAMP: Lazy<Selector> =
    Lazy::new(|| Selector::parse(".timestamp--lite").expect("valid timestamp selector"));
/// "Updated: 10:02 AM EDT, Tue May 6, 2025" → "May 6, 2025"
static TIMESTAMP_DATE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"([A-Z][a-z]{2}) (\d{1,2}), (\d{4})").expect("valid timestamp regex"));

/// Index the CNN Lite homepage for article URLs.
#[derive(Debug)]
pub struct CnnLiteLinks {
    base: Url,
    max_links: usize,
}

impl CnnLiteLinks {
    pub fn from_params(params: &Params) -> Result<Box<dyn LinkDiscovery>, StrategyError> {
        let base = Url::parse(CNN_LITE_URL).map_err(|e| StrategyError::InvalidParam {
            strategy: "cnn_lite".to_string(),
            param: "base_url".to_string(),
            reason: e.to_string(),
        })?;
        Ok(Box::new(Self {
            base,
            max_links: max_links(params, "cnn_lite")?,
        }))
    }
}

impl LinkDiscovery for CnnLiteLinks {
    #[instrument(level = "debug", skip_all, fields(page = %page.identifier))]
    fn discover_links(&self, page: &Page) -> Vec<String> {
        let document = Html::parse_document(&page.body);
        let hrefs: Vec<String> = document
            .select(&STORY)
            .filter_map(|el| el.value().attr("href"))
            .map(str::to_string)
            .collect();

        let article_urls = finalize_links(Some(&self.base), hrefs, None, self.max_links);
        debug!(count = article_urls.len(), "Indexed CNN article URLs");
        article_urls
    }

    fn default_homepage(&self) -> Option<&str> {
        Some(CNN_LITE_URL)
    }
}

/// Read a CNN Lite article page.
#[derive(Debug)]
pub struct CnnLiteArticle;

impl CnnLiteArticle {
    pub fn from_params(_params: &Params) -> Result<Box<dyn ArticleExtraction>, StrategyError> {
        Ok(Box::new(Self))
    }
}

fn timestamp_date(document: &Html) -> Option<NaiveDate> {
    let text = document.select(&TIMESTAMP).next().map(element_text)?;
    let caps = TIMESTAMP_DATE.captures(&text)?;
    let joined = format!("{} {} {}", &caps[1], &caps[2], &caps[3]);
    NaiveDate::parse_from_str(&joined, "%b %d %Y").ok()
}

impl ArticleExtraction for CnnLiteArticle {
    fn extract_article(&self, page: &Page, date_scraped: NaiveDate) -> Option<ArticleRecord> {
        let document = Html::parse_document(&page.body);
        let title = document.select(&HEADLINE).next().map(element_text)?;

        let mut paragraphs: Vec<String> = document.select(&PARAGRAPH).map(element_text).collect();
        if paragraphs.is_empty() {
            paragraphs = document.select(&ARTICLE_BODY).map(element_text).collect();
        }

        let article_date = timestamp_date(&document).or_else(|| date::extract_date(&document, None));
        let article = ArticleRecord::build(&title, &paragraphs, article_date, date_scraped);
        debug!(url = %page.identifier, parsed = article.is_some(), "Parsed CNN article");
        article
    }
}
