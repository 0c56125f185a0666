//! The orchestrator: sources in, vocabulary rows out.
//!
//! For each enabled source:
//! 1. **Resolve** its link-discovery and article-extraction strategies
//! 2. **Acquire** pages: saved fixtures (offline) or homepage → links →
//!    bounded concurrent fetch (live, see [`fetch_phase`])
//! 3. **Process** each page: extract → validate/analyze → write to the sink
//! 4. **Count** processed vs attempted pages
//!
//! Failures never cross their boundary: a bad strategy name costs one
//! source, a bad page costs one article, and [`Orchestrator::run_all`]
//! always returns metrics.

pub mod breaker;
pub mod fetch_phase;
#[cfg(test)]
pub mod testing;

use crate::analysis::TextAnalyzer;
use crate::config::{FetchSettings, SourceConfig};
use crate::fetch::PageFetcher;
use crate::fixtures::FixtureProvider;
use crate::models::{Page, RunMetrics};
use crate::outputs::{VocabularySink, WriteOutcome};
use crate::scrapers::{ArticleExtraction, SourceStrategies, StrategyRegistry};
use crate::utils::truncate_for_log;
use chrono::{Local, NaiveDate};
use fetch_phase::{FetchPhaseSettings, fetch_all};
use futures::stream::{self, StreamExt};
use std::sync::Arc;
use tracing::{debug, error, info, instrument, warn};

/// Where article pages come from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Live,
    Offline,
}

pub struct Orchestrator<F: PageFetcher> {
    registry: StrategyRegistry,
    analyzer: TextAnalyzer,
    sink: Arc<VocabularySink>,
    fetcher: Arc<F>,
    fixtures: Arc<dyn FixtureProvider>,
    mode: Mode,
    fetch: FetchPhaseSettings,
    source_concurrency: usize,
    date_scraped: NaiveDate,
}

impl<F: PageFetcher + 'static> Orchestrator<F> {
    pub fn new(
        registry: StrategyRegistry,
        analyzer: TextAnalyzer,
        sink: Arc<VocabularySink>,
        fetcher: Arc<F>,
        fixtures: Arc<dyn FixtureProvider>,
    ) -> Self {
        Self {
            registry,
            analyzer,
            sink,
            fetcher,
            fixtures,
            mode: Mode::Live,
            fetch: FetchPhaseSettings::default(),
            source_concurrency: 1,
            date_scraped: Local::now().date_naive(),
        }
    }

    pub fn mode(mut self, mode: Mode) -> Self {
        self.mode = mode;
        self
    }

    pub fn fetch_settings(mut self, settings: &FetchSettings) -> Self {
        self.fetch = FetchPhaseSettings {
            max_workers: settings.max_workers,
            base_delay: settings.base_delay(),
        };
        self
    }

    pub fn source_concurrency(mut self, n: usize) -> Self {
        self.source_concurrency = n.max(1);
        self
    }

    pub fn date_scraped(mut self, date: NaiveDate) -> Self {
        self.date_scraped = date;
        self
    }

    /// Run every enabled source; never fails.
    #[instrument(level = "info", skip_all, fields(sources = sources.len(), mode = ?self.mode))]
    pub async fn run_all(&self, sources: &[SourceConfig]) -> RunMetrics {
        let enabled: Vec<&SourceConfig> = sources
            .iter()
            .filter(|s| {
                if !s.enabled {
                    debug!(source = %s.name, "Source disabled; skipping");
                }
                s.enabled
            })
            .collect();

        let results: Vec<(String, (usize, usize))> = stream::iter(enabled)
            .map(|source| async move { (source.name.clone(), self.run_source(source).await) })
            .buffer_unordered(self.source_concurrency)
            .collect()
            .await;

        let mut metrics = RunMetrics::default();
        for (name, (processed, attempted)) in results {
            metrics.record(&name, processed, attempted);
        }
        info!(
            processed = metrics.total_processed(),
            attempted = metrics.total_attempted(),
            "All sources complete"
        );
        metrics
    }

    /// Run one source and return `(processed, attempted)`.
    #[instrument(level = "info", skip_all, fields(source = %config.name))]
    pub async fn run_source(&self, config: &SourceConfig) -> (usize, usize) {
        if !config.enabled {
            return (0, 0);
        }

        let strategies = match self.registry.resolve(config) {
            Ok(strategies) => strategies,
            Err(e) => {
                error!(error = %e, "Cannot resolve strategies; skipping source");
                return (0, 0);
            }
        };

        let pages = match self.mode {
            Mode::Offline => self.fixtures.list_fixture_documents(&config.name),
            Mode::Live => match strategies.homepage_url.as_deref() {
                Some(homepage) => self.acquire_live(homepage, &strategies).await,
                None => {
                    error!("No homepage_url configured for live mode; skipping source");
                    return (0, 0);
                }
            },
        };
        if pages.is_empty() {
            warn!("No pages acquired");
            return (0, 0);
        }

        let attempted = pages.len();
        let processed = pages
            .iter()
            .filter(|page| self.process_one(strategies.article.as_ref(), page))
            .count();
        info!(processed, attempted, "Source complete");
        (processed, attempted)
    }

    async fn acquire_live(&self, homepage: &str, strategies: &SourceStrategies) -> Vec<Page> {
        let body = match self.fetcher.fetch(homepage).await {
            Ok(body) => body,
            Err(e) => {
                warn!(%homepage, error = %e, "Homepage fetch failed");
                return Vec::new();
            }
        };
        let links = strategies.links.discover_links(&Page::new(homepage, body));
        info!(%homepage, count = links.len(), "Discovered candidate links");
        if links.is_empty() {
            return Vec::new();
        }
        fetch_all(Arc::clone(&self.fetcher), links, self.fetch).await.pages
    }

    /// Extract, analyze, and write one page. `false` on any failure.
    ///
    /// An article already present in the output counts as processed.
    pub fn process_one(&self, strategy: &dyn ArticleExtraction, page: &Page) -> bool {
        let Some(article) = strategy.extract_article(page, self.date_scraped) else {
            warn!(page = %page.identifier, "No article extracted");
            return false;
        };

        let analysis = match self.analyzer.analyze(&article.full_text) {
            Ok(analysis) => analysis,
            Err(reason) => {
                info!(
                    page = %page.identifier,
                    title = %truncate_for_log(&article.title, 80),
                    %reason,
                    "Article text rejected"
                );
                return false;
            }
        };

        let outcome =
            self.sink
                .write_article(&article, &page.identifier, &analysis.frequencies, &analysis.contexts);
        outcome.is_written() || outcome == WriteOutcome::Duplicate
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Params;
    use crate::fixtures::DirectoryFixtures;
    use crate::scrapers::css::CssArticleExtraction;
    use std::path::Path;
    use std::time::Duration;
    use testing::ScriptedFetcher;

    const HOMEPAGE: &str = r#"<html><body>
        <a class="teaser" href="/article/velo">Vélo</a>
        <a class="teaser" href="/article/marche">Marché</a>
        <a class="teaser" href="/article/vide">Vide</a>
        <a class="teaser" href="/article/absent">Absent</a>
    </body></html>"#;

    fn article_html(title: &str, body: &str) -> String {
        format!(
            r#"<html><head><meta name="date" content="2025-05-05"></head><body>
            <h1>{title}</h1><div class="texte"><p>{body}</p></div></body></html>"#
        )
    }

    fn velo() -> String {
        article_html(
            "La ville adopte le vélo",
            "Les cyclistes réclament des pistes sécurisées depuis longtemps. \
             La mairie promet cinquante kilomètres de pistes nouvelles. \
             Les commerçants craignent pourtant la disparition du stationnement.",
        )
    }

    fn marche() -> String {
        article_html(
            "Le marché couvert rouvre",
            "Après deux années de travaux, le marché couvert accueille de nouveau les habitants. \
             Les producteurs locaux proposent fromages, légumes et poissons frais chaque matin.",
        )
    }

    fn css_source(name: &str) -> SourceConfig {
        let link_params: Params = [
            ("homepage_url", "https://journal.example.fr"),
            ("link_selector", "a.teaser"),
        ]
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
        let article_params: Params = [("title_selector", "h1"), ("body_selector", ".texte p")]
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        SourceConfig {
            name: name.to_string(),
            enabled: true,
            link_strategy: "css".to_string(),
            article_strategy: "css".to_string(),
            link_params,
            article_params,
        }
    }

    fn live_fetcher() -> ScriptedFetcher {
        ScriptedFetcher::new([
            ("https://journal.example.fr".to_string(), HOMEPAGE.to_string()),
            ("https://journal.example.fr/article/velo".to_string(), velo()),
            ("https://journal.example.fr/article/marche".to_string(), marche()),
            (
                "https://journal.example.fr/article/vide".to_string(),
                article_html("Un article sans texte", "Court."),
            ),
        ])
    }

    fn orchestrator(dir: &Path, fetcher: ScriptedFetcher, mode: Mode) -> Orchestrator<ScriptedFetcher> {
        let day = NaiveDate::from_ymd_opt(2025, 5, 6).unwrap();
        let sink = Arc::new(VocabularySink::open(dir.join("out"), day).unwrap());
        Orchestrator::new(
            StrategyRegistry::builtin(),
            TextAnalyzer::default(),
            sink,
            Arc::new(fetcher),
            Arc::new(DirectoryFixtures::new(dir.join("fixtures"))),
        )
        .mode(mode)
        .fetch_settings(&FetchSettings {
            base_delay_ms: 0,
            ..FetchSettings::default()
        })
        .date_scraped(day)
    }

    fn rows(orchestrator: &Orchestrator<ScriptedFetcher>) -> Vec<String> {
        std::fs::read_to_string(orchestrator.sink.partition_path())
            .map(|raw| raw.lines().skip(1).map(str::to_string).collect())
            .unwrap_or_default()
    }

    #[tokio::test]
    async fn test_live_source_counts_processed_and_attempted() {
        let tmp = tempfile::tempdir().unwrap();
        let orch = orchestrator(tmp.path(), live_fetcher(), Mode::Live);

        let (processed, attempted) = orch.run_source(&css_source("journal")).await;

        // "absent" 404s during fetch, "vide" fails extraction
        assert_eq!((processed, attempted), (2, 3));
        let rows = rows(&orch);
        assert!(rows.iter().any(|r| r.starts_with("pistes,")));
        assert!(rows.iter().any(|r| r.contains("Le marché couvert rouvre")));
        assert!(rows.iter().all(|r| r.contains(",2025-05-05,2025-05-06,")));
    }

    #[tokio::test]
    async fn test_rerun_does_not_duplicate_rows() {
        let tmp = tempfile::tempdir().unwrap();
        let orch = orchestrator(tmp.path(), live_fetcher(), Mode::Live);

        orch.run_source(&css_source("journal")).await;
        let first = rows(&orch);
        let (processed, _) = orch.run_source(&css_source("journal")).await;

        assert_eq!(processed, 2);
        assert_eq!(rows(&orch), first);
    }

    #[tokio::test]
    async fn test_unresolvable_strategy_is_fatal_for_source_only() {
        let tmp = tempfile::tempdir().unwrap();
        let fetcher = live_fetcher();
        let orch = orchestrator(tmp.path(), fetcher, Mode::Live);
        let mut broken = css_source("broken");
        broken.article_strategy = "sites.lemonde.LeMondeExtractor".to_string();

        assert_eq!(orch.run_source(&broken).await, (0, 0));
        assert_eq!(orch.fetcher.calls(), 0);
        assert!(!orch.sink.partition_path().exists());

        let metrics = orch.run_all(&[broken, css_source("journal")]).await;
        assert_eq!(metrics.total_processed(), 2);
        assert_eq!(metrics.total_attempted(), 3);
        assert_eq!(metrics.sources.len(), 2);
    }

    #[tokio::test]
    async fn test_disabled_source_has_no_side_effects() {
        let tmp = tempfile::tempdir().unwrap();
        let orch = orchestrator(tmp.path(), live_fetcher(), Mode::Live);
        let mut source = css_source("journal");
        source.enabled = false;

        assert_eq!(orch.run_source(&source).await, (0, 0));
        let metrics = orch.run_all(&[source]).await;
        assert!(metrics.sources.is_empty());
        assert_eq!(orch.fetcher.calls(), 0);
    }

    #[tokio::test]
    async fn test_live_mode_without_homepage() {
        let tmp = tempfile::tempdir().unwrap();
        let orch = orchestrator(tmp.path(), live_fetcher(), Mode::Live);
        let mut source = css_source("journal");
        source.link_params.remove("homepage_url");

        assert_eq!(orch.run_source(&source).await, (0, 0));
    }

    #[tokio::test]
    async fn test_homepage_failure_yields_nothing() {
        let tmp = tempfile::tempdir().unwrap();
        let orch = orchestrator(tmp.path(), ScriptedFetcher::new(std::iter::empty()), Mode::Live);

        assert_eq!(orch.run_source(&css_source("journal")).await, (0, 0));
    }

    #[tokio::test]
    async fn test_offline_mode_replays_fixtures() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path().join("fixtures/journal");
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join("01.html"), velo()).unwrap();
        std::fs::write(dir.join("02.html"), "<html><body>rien</body></html>").unwrap();
        let orch = orchestrator(
            tmp.path(),
            ScriptedFetcher::new(std::iter::empty()).with_delay(Duration::from_secs(60)),
            Mode::Offline,
        );

        let (processed, attempted) = orch.run_source(&css_source("journal")).await;

        assert_eq!((processed, attempted), (1, 2));
        assert_eq!(orch.fetcher.calls(), 0);
        assert!(rows(&orch).iter().all(|r| r.contains("fixture://journal/01.html")));
    }

    #[tokio::test]
    async fn test_offline_mode_without_fixtures() {
        let tmp = tempfile::tempdir().unwrap();
        let orch = orchestrator(tmp.path(), ScriptedFetcher::new(std::iter::empty()), Mode::Offline);
        assert_eq!(orch.run_source(&css_source("journal")).await, (0, 0));
    }

    #[test]
    fn test_process_one_rejects_repetitive_text() {
        let tmp = tempfile::tempdir().unwrap();
        let orch = orchestrator(tmp.path(), ScriptedFetcher::new(std::iter::empty()), Mode::Offline);
        let strategy = CssArticleExtraction::new("h1", ".texte p", None).unwrap();
        let page = Page::new(
            "https://journal.example.fr/spam",
            article_html("Publicité envahissante", &"achetez maintenant ".repeat(30)),
        );

        assert!(!orch.process_one(&strategy, &page));
        assert!(!orch.sink.partition_path().exists());

        let good = Page::new("https://journal.example.fr/velo", velo());
        assert!(orch.process_one(&strategy, &good));
    }
}
