//! Source strategies: how to find article links and how to read an article.
//!
//! Each source pairs two strategies, named in its configuration:
//!
//! 1. **Link discovery**: candidate article URLs from a homepage or feed
//! 2. **Article extraction**: an [`ArticleRecord`] from an article page
//!
//! Both are pure functions of the page they are given and fail by
//! returning an empty list or `None`; the pipeline never retries them.
//!
//! # Built-in strategies
//!
//! | Name | Link discovery | Article extraction | Parameters |
//! |------|----------------|--------------------|------------|
//! | `css` | [`css::CssLinkDiscovery`] | [`css::CssArticleExtraction`] | selectors, see module |
//! | `cnn_lite` | [`cnn::CnnLiteLinks`] | [`cnn::CnnLiteArticle`] | none |
//! | `rss` | [`rss::RssLinkDiscovery`] | n/a | `max_links` |
//!
//! Strategies are looked up by name in a [`StrategyRegistry`] built once at
//! startup; an unknown name fails that source only.

pub mod cnn;
pub mod css;
pub mod date;
pub mod rss;

use crate::config::{Params, SourceConfig};
use crate::error::StrategyError;
use crate::models::{ArticleRecord, Page};
use chrono::NaiveDate;
use itertools::Itertools;
use regex::Regex;
use scraper::{ElementRef, Selector};
use std::collections::HashMap;
use std::fmt;
use url::Url;

pub const DEFAULT_MAX_LINKS: usize = 30;

/// Finds candidate article URLs on a homepage or feed.
pub trait LinkDiscovery: Send + Sync + fmt::Debug {
    fn discover_links(&self, page: &Page) -> Vec<String>;

    /// Homepage to use when the source config does not name one.
    fn default_homepage(&self) -> Option<&str> {
        None
    }
}

/// Reads one article page into a structured record.
pub trait ArticleExtraction: Send + Sync + fmt::Debug {
    fn extract_article(&self, page: &Page, date_scraped: NaiveDate) -> Option<ArticleRecord>;
}

type LinkCtor = fn(&Params) -> Result<Box<dyn LinkDiscovery>, StrategyError>;
type ArticleCtor = fn(&Params) -> Result<Box<dyn ArticleExtraction>, StrategyError>;

/// The strategies resolved for one source.
#[derive(Debug)]
pub struct SourceStrategies {
    pub links: Box<dyn LinkDiscovery>,
    pub article: Box<dyn ArticleExtraction>,
    /// Page handed to link discovery in live mode.
    pub homepage_url: Option<String>,
}

/// Name → constructor table for every known strategy.
#[derive(Clone)]
pub struct StrategyRegistry {
    links: HashMap<String, LinkCtor>,
    articles: HashMap<String, ArticleCtor>,
}

impl fmt::Debug for StrategyRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StrategyRegistry")
            .field("links", &self.links.keys().sorted().collect::<Vec<_>>())
            .field("articles", &self.articles.keys().sorted().collect::<Vec<_>>())
            .finish()
    }
}

impl StrategyRegistry {
    pub fn empty() -> Self {
        Self {
            links: HashMap::new(),
            articles: HashMap::new(),
        }
    }

    pub fn builtin() -> Self {
        let mut registry = Self::empty();
        registry.register_links("css", css::CssLinkDiscovery::from_params);
        registry.register_links("cnn_lite", cnn::CnnLiteLinks::from_params);
        registry.register_links("rss", rss::RssLinkDiscovery::from_params);
        registry.register_article("css", css::CssArticleExtraction::from_params);
        registry.register_article("cnn_lite", cnn::CnnLiteArticle::from_params);
        registry
    }

    pub fn register_links(&mut self, name: &str, ctor: LinkCtor) {
        self.links.insert(name.to_string(), ctor);
    }

    pub fn register_article(&mut self, name: &str, ctor: ArticleCtor) {
        self.articles.insert(name.to_string(), ctor);
    }

    /// Instantiate both strategies named by `config`.
    pub fn resolve(&self, config: &SourceConfig) -> Result<SourceStrategies, StrategyError> {
        let link_ctor = self
            .links
            .get(&config.link_strategy)
            .ok_or_else(|| StrategyError::Unknown {
                kind: "link discovery",
                name: config.link_strategy.clone(),
            })?;
        let article_ctor = self
            .articles
            .get(&config.article_strategy)
            .ok_or_else(|| StrategyError::Unknown {
                kind: "article extraction",
                name: config.article_strategy.clone(),
            })?;

        let links = link_ctor(&config.link_params)?;
        let article = article_ctor(&config.article_params)?;
        let homepage_url = config
            .link_params
            .get("homepage_url")
            .cloned()
            .or_else(|| links.default_homepage().map(str::to_string));

        Ok(SourceStrategies {
            links,
            article,
            homepage_url,
        })
    }
}

impl Default for StrategyRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

/// A required string parameter.
pub(crate) fn required<'a>(
    params: &'a Params,
    strategy: &str,
    key: &str,
) -> Result<&'a str, StrategyError> {
    params
        .get(key)
        .map(String::as_str)
        .filter(|v| !v.trim().is_empty())
        .ok_or_else(|| StrategyError::MissingParam {
            strategy: strategy.to_string(),
            param: key.to_string(),
        })
}

pub(crate) fn parse_selector(strategy: &str, raw: &str) -> Result<Selector, StrategyError> {
    Selector::parse(raw).map_err(|_| StrategyError::InvalidSelector {
        strategy: strategy.to_string(),
        selector: raw.to_string(),
    })
}

pub(crate) fn parse_url(strategy: &str, key: &str, raw: &str) -> Result<Url, StrategyError> {
    Url::parse(raw).map_err(|e| StrategyError::InvalidParam {
        strategy: strategy.to_string(),
        param: key.to_string(),
        reason: e.to_string(),
    })
}

pub(crate) fn max_links(params: &Params, strategy: &str) -> Result<usize, StrategyError> {
    match params.get("max_links") {
        None => Ok(DEFAULT_MAX_LINKS),
        Some(raw) => raw.trim().parse().map_err(|_| StrategyError::InvalidParam {
            strategy: strategy.to_string(),
            param: "max_links".to_string(),
            reason: format!("'{raw}' is not a positive integer"),
        }),
    }
}

/// Visible text of an element with whitespace collapsed.
pub(crate) fn element_text(element: ElementRef<'_>) -> String {
    element.text().collect::<Vec<_>>().join(" ").split_whitespace().join(" ")
}

/// Resolve hrefs against `base`, keep http(s) only, drop fragments,
/// apply the optional pattern, de-duplicate in order, and cap the count.
pub(crate) fn finalize_links<I>(
    base: Option<&Url>,
    hrefs: I,
    pattern: Option<&Regex>,
    max: usize,
) -> Vec<String>
where
    I: IntoIterator<Item = String>,
{
    hrefs
        .into_iter()
        .filter_map(|href| {
            let href = href.trim();
            match base {
                Some(base) => base.join(href).ok(),
                None => Url::parse(href).ok(),
            }
        })
        .filter(|url| matches!(url.scheme(), "http" | "https"))
        .map(|mut url| {
            url.set_fragment(None);
            url.to_string()
        })
        .filter(|url| pattern.is_none_or(|re| re.is_match(url)))
        .unique()
        .take(max)
        .collect()
}
