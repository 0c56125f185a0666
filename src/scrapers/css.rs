//! Generic CSS-selector strategies, configured entirely from parameters.
//!
//! Link discovery parameters:
//!
//! | Key | Required | Meaning |
//! |-----|----------|---------|
//! | `link_selector` | yes | selects `a[href]` elements on the homepage |
//! | `base_url` | no | resolves relative hrefs (defaults to the page identifier) |
//! | `url_pattern` | no | regex a link must match to be kept |
//! | `max_links` | no | cap on returned links (default 30) |
//!
//! Article extraction parameters: `title_selector` and `body_selector`
//! (required; each body match is one paragraph), `date_selector` (optional).

use super::{
    ArticleExtraction, LinkDiscovery, date, element_text, finalize_links, max_links,
    parse_selector, parse_url, required,
};
use crate::config::Params;
use crate::error::StrategyError;
use crate::models::{ArticleRecord, Page};
use chrono::NaiveDate;
use regex::Regex;
use scraper::{Html, Selector};
use tracing::debug;
use url::Url;

const NAME: &str = "css";

#[derive(Debug)]
pub struct CssLinkDiscovery {
    link_selector: Selector,
    base_url: Option<Url>,
    url_pattern: Option<Regex>,
    max_links: usize,
}

impl CssLinkDiscovery {
    pub fn from_params(params: &Params) -> Result<Box<dyn LinkDiscovery>, StrategyError> {
        let link_selector = parse_selector(NAME, required(params, NAME, "link_selector")?)?;
        let base_url = params
            .get("base_url")
            .map(|raw| parse_url(NAME, "base_url", raw))
            .transpose()?;
        let url_pattern = params
            .get("url_pattern")
            .map(|raw| {
                Regex::new(raw).map_err(|e| StrategyError::InvalidParam {
                    strategy: NAME.to_string(),
                    param: "url_pattern".to_string(),
                    reason: e.to_string(),
                })
            })
            .transpose()?;
        Ok(Box::new(Self {
            link_selector,
            base_url,
            url_pattern,
            max_links: max_links(params, NAME)?,
        }))
    }
}

impl LinkDiscovery for CssLinkDiscovery {
    fn discover_links(&self, page: &Page) -> Vec<String> {
        let base = self
            .base_url
            .clone()
            .or_else(|| Url::parse(&page.identifier).ok());
        let document = Html::parse_document(&page.body);
        let hrefs: Vec<String> = document
            .select(&self.link_selector)
            .filter_map(|el| el.value().attr("href"))
            .map(str::to_string)
            .collect();

        let links = finalize_links(base.as_ref(), hrefs, self.url_pattern.as_ref(), self.max_links);
        debug!(page = %page.identifier, count = links.len(), "Discovered links");
        links
    }
}

#[derive(Debug)]
pub struct CssArticleExtraction {
    title_selector: Selector,
    body_selector: Selector,
    date_selector: Option<Selector>,
}

impl CssArticleExtraction {
    pub fn new(title: &str, body: &str, date: Option<&str>) -> Result<Self, StrategyError> {
        Ok(Self {
            title_selector: parse_selector(NAME, title)?,
            body_selector: parse_selector(NAME, body)?,
            date_selector: date.map(|raw| parse_selector(NAME, raw)).transpose()?,
        })
    }

    pub fn from_params(params: &Params) -> Result<Box<dyn ArticleExtraction>, StrategyError> {
        let extraction = Self::new(
            required(params, NAME, "title_selector")?,
            required(params, NAME, "body_selector")?,
            params.get("date_selector").map(String::as_str),
        )?;
        Ok(Box::new(extraction))
    }
}

impl ArticleExtraction for CssArticleExtraction {
    fn extract_article(&self, page: &Page, date_scraped: NaiveDate) -> Option<ArticleRecord> {
        let document = Html::parse_document(&page.body);
        let title = document
            .select(&self.title_selector)
            .map(element_text)
            .find(|t| !t.is_empty())?;
        let paragraphs: Vec<String> = document.select(&self.body_selector).map(element_text).collect();
        let article_date = date::extract_date(&document, self.date_selector.as_ref());

        ArticleRecord::build(&title, &paragraphs, article_date, date_scraped)
    }
}
