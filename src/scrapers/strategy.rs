//! Per-source extraction strategies.
//!
//! Every strategy runs the same skeleton over each listing item:
//!
//! 1. title text and link attribute; the link is resolved against `baseUrl`.
//!    An item missing either is skipped.
//! 2. image URL, via the strategy's own fallback chain
//! 3. description text, with trailing boilerplate stripped
//!
//! Only step 2 differs between strategies:
//!
//! | Strategy | Image fallback order |
//! |----------|----------------------|
//! | [`Strategy::CoverLazyLoad`] | `imageAttribute`, then `data-src` when the image selector is the card cover selector |
//! | [`Strategy::NoscriptFallback`] | `imageAttribute`, then `data-src`, then `src` of an `img` inside `<noscript>` |
//! | [`Strategy::PlaceholderAware`] | `data-src`, `imageAttribute`, `data-lazy-src`, skipping placeholders |
//!
//! Only `PlaceholderAware` consults the placeholder detector. The other two
//! accept whatever the first non-empty attribute holds.

use once_cell::sync::Lazy;
use scraper::{ElementRef, Html};
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::config::{SourceConfig, SourceSelectors};
use crate::models::ArticleRecord;
use crate::scrapers::placeholder::PlaceholderDetector;
use crate::scrapers::query::{SelectorChain, find_attribute, find_noscript_attribute, find_text};
use crate::scrapers::resolve::resolve;
use crate::scrapers::sanitize::BoilerplateFilter;

/// Image selector for which `CoverLazyLoad` also tries the lazy attribute.
pub const COVER_IMAGE_SELECTOR: &str = "picture.card__cover-picture img";

const LAZY_SRC: &str = "data-src";
const LAZY_SRC_SECONDARY: &str = "data-lazy-src";

static NOSCRIPT_IMG: Lazy<SelectorChain> = Lazy::new(|| SelectorChain::parse("img").unwrap());

/// The closed set of extraction rule sets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Strategy {
    /// Narrow lazy-load fallback, only for cover-picture cards.
    CoverLazyLoad,
    /// Three tiers ending in the `<noscript>` copy of the image.
    NoscriptFallback,
    /// Lazy attributes first, each candidate checked against placeholder markers.
    PlaceholderAware,
}

/// Everything a strategy reads while extracting one document.
#[derive(Debug, Clone, Copy)]
pub struct ExtractContext<'a> {
    pub config: &'a SourceConfig,
    pub selectors: &'a SourceSelectors,
    pub boilerplate: &'a BoilerplateFilter,
    pub placeholders: &'a PlaceholderDetector,
}

impl Strategy {
    /// Wiring for the sources that ship with the binary.
    pub fn builtin_for(source_id: &str) -> Option<Self> {
        match source_id {
            "rt" => Some(Strategy::CoverLazyLoad),
            "azattyk" => Some(Strategy::NoscriptFallback),
            "vesti" => Some(Strategy::PlaceholderAware),
            _ => None,
        }
    }

    /// Trailing phrases stripped from descriptions unless the source overrides them.
    pub fn default_phrases(self) -> &'static [&'static str] {
        match self {
            Strategy::CoverLazyLoad => &["Read more"],
            Strategy::NoscriptFallback => &["Подробнее", "Толугураак", "Read more", "Толук маалымат"],
            Strategy::PlaceholderAware => &["Подробнее", "Читать далее", "Read more"],
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Strategy::CoverLazyLoad => "cover-lazy-load",
            Strategy::NoscriptFallback => "noscript-fallback",
            Strategy::PlaceholderAware => "placeholder-aware",
        }
    }

    /// Parses `html` and extracts one record per usable item, in document order.
    ///
    /// Never fails: unparseable or empty markup yields an empty list.
    pub fn extract(self, html: &str, ctx: &ExtractContext<'_>) -> Vec<ArticleRecord> {
        let document = Html::parse_document(html);
        let items: Vec<ElementRef<'_>> = ctx.selectors.item.select_all(&document).collect();

        let records: Vec<ArticleRecord> = items
            .iter()
            .enumerate()
            .filter_map(|(index, item)| {
                let record = self.extract_item(*item, ctx);
                if record.is_none() {
                    debug!(index, "Skipping item without title or link");
                }
                record
            })
            .collect();
        let skipped = items.len() - records.len();

        debug!(
            strategy = self.name(),
            extracted = records.len(),
            skipped,
            "Extracted listing items"
        );
        records
    }

    fn extract_item(self, item: ElementRef<'_>, ctx: &ExtractContext<'_>) -> Option<ArticleRecord> {
        let ExtractContext {
            config, selectors, ..
        } = *ctx;

        let title = find_text(item, &selectors.title);
        let raw_link = find_attribute(item, &selectors.link, &config.link_attribute);
        let source_url = resolve(raw_link.as_deref(), &config.base_url)?;
        if title.is_empty() {
            return None;
        }

        let image_url = self.image_url(item, ctx);
        let description = ctx.boilerplate.apply(&find_text(item, &selectors.description));

        Some(ArticleRecord {
            title,
            image_url,
            description,
            source_url,
        })
    }

    fn image_url(self, item: ElementRef<'_>, ctx: &ExtractContext<'_>) -> Option<String> {
        let base_url = ctx.config.base_url.as_str();
        let image = &ctx.selectors.image;
        let attr = |name: &str| find_attribute(item, image, name);

        match self {
            Strategy::CoverLazyLoad => resolve(attr(ctx.config.image_attribute.as_str()).as_deref(), base_url)
                .or_else(|| {
                    if image.as_str() == COVER_IMAGE_SELECTOR {
                        resolve(attr(LAZY_SRC).as_deref(), base_url)
                    } else {
                        None
                    }
                }),
            Strategy::NoscriptFallback => resolve(attr(ctx.config.image_attribute.as_str()).as_deref(), base_url)
                .or_else(|| resolve(attr(LAZY_SRC).as_deref(), base_url))
                .or_else(|| {
                    let raw = find_noscript_attribute(item, &NOSCRIPT_IMG, "src");
                    resolve(raw.as_deref(), base_url)
                }),
            Strategy::PlaceholderAware => [LAZY_SRC, ctx.config.image_attribute.as_str(), LAZY_SRC_SECONDARY]
                .into_iter()
                .find_map(|name| {
                    let raw = attr(name);
                    if ctx.placeholders.is_placeholder(raw.as_deref()) {
                        if raw.is_some() {
                            trace!(attribute = name, "Rejected placeholder image");
                        }
                        return None;
                    }
                    resolve(raw.as_deref(), base_url)
                }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    struct Fixture {
        config: SourceConfig,
        selectors: SourceSelectors,
        boilerplate: BoilerplateFilter,
        placeholders: PlaceholderDetector,
    }

    impl Fixture {
        fn new(strategy: Strategy, image_selector: &str, image_attribute: &str) -> Self {
            let config = SourceConfig {
                list_url: "https://news.example/latest/".to_string(),
                base_url: "https://news.example/".to_string(),
                item_selector: "div.card".to_string(),
                title_selector: "h2 a, .title".to_string(),
                description_selector: "p.summary".to_string(),
                link_selector: "h2 a, .title".to_string(),
                link_attribute: "href".to_string(),
                image_selector: image_selector.to_string(),
                image_attribute: image_attribute.to_string(),
                ..Default::default()
            };
            let selectors = config.compile("test").unwrap();
            Self {
                config,
                selectors,
                boilerplate: BoilerplateFilter::new(strategy.default_phrases()),
                placeholders: PlaceholderDetector::default(),
            }
        }

        fn run(&self, strategy: Strategy, html: &str) -> Vec<ArticleRecord> {
            let ctx = ExtractContext {
                config: &self.config,
                selectors: &self.selectors,
                boilerplate: &self.boilerplate,
                placeholders: &self.placeholders,
            };
            strategy.extract(html, &ctx)
        }
    }

    fn card(img: &str) -> String {
        format!(
            r#"<div class="card"><h2><a href="/story/1">Story one</a></h2>{img}<p class="summary">Summary. Read more</p></div>"#
        )
    }

    fn image_of(strategy: Strategy, fixture: &Fixture, img: &str) -> Option<String> {
        let records = fixture.run(strategy, &card(img));
        assert_eq!(records.len(), 1);
        records[0].image_url.clone()
    }

    #[test]
    fn test_builtin_wiring() {
        assert_eq!(Strategy::builtin_for("rt"), Some(Strategy::CoverLazyLoad));
        assert_eq!(Strategy::builtin_for("azattyk"), Some(Strategy::NoscriptFallback));
        assert_eq!(Strategy::builtin_for("vesti"), Some(Strategy::PlaceholderAware));
        assert_eq!(Strategy::builtin_for("kloop"), None);
    }

    #[test]
    fn test_serde_names_match_name() {
        for strategy in [
            Strategy::CoverLazyLoad,
            Strategy::NoscriptFallback,
            Strategy::PlaceholderAware,
        ] {
            let json = serde_json::to_string(&strategy).unwrap();
            assert_eq!(json, format!("\"{}\"", strategy.name()));
        }
    }

    #[test]
    fn test_record_fields() {
        let strategy = Strategy::CoverLazyLoad;
        let fixture = Fixture::new(strategy, "img", "src");
        let records = fixture.run(strategy, &card(r#"<img src="//cdn.news.example/a.jpg">"#));
        assert_eq!(
            records,
            vec![ArticleRecord {
                title: "Story one".to_string(),
                image_url: Some("https://cdn.news.example/a.jpg".to_string()),
                description: "Summary.".to_string(),
                source_url: "https://news.example/story/1".to_string(),
            }]
        );
    }

    #[test]
    fn test_items_without_title_or_link_are_skipped() {
        let strategy = Strategy::PlaceholderAware;
        let fixture = Fixture::new(strategy, "img", "src");
        let html = r#"
            <div class="card"><h2><a href="/a">A</a></h2></div>
            <div class="card"><h2><a href="/b">  </a></h2></div>
            <div class="card"><h2><a>No link</a></h2></div>
            <div class="card"><h2><a href="   ">Blank link</a></h2></div>
            <div class="card"><span class="title" href="/e">E</span></div>
        "#;
        let records = fixture.run(strategy, html);
        let titles: Vec<&str> = records.iter().map(|r| r.title.as_str()).collect();
        assert_eq!(titles, vec!["A", "E"]);
        assert_eq!(records[1].source_url, "https://news.example/e");
    }

    #[test]
    fn test_empty_and_garbage_documents_yield_nothing() {
        let strategy = Strategy::NoscriptFallback;
        let fixture = Fixture::new(strategy, "img", "src");
        assert!(fixture.run(strategy, "").is_empty());
        assert!(fixture.run(strategy, "<<<div class=").is_empty());
        assert!(fixture.run(strategy, "just some text").is_empty());
    }

    #[test]
    fn test_missing_image_is_absent_not_empty() {
        let strategy = Strategy::NoscriptFallback;
        let fixture = Fixture::new(strategy, "img", "src");
        assert_eq!(image_of(strategy, &fixture, ""), None);
        assert_eq!(image_of(strategy, &fixture, r#"<img src="  ">"#), None);
    }

    #[test]
    fn test_cover_lazy_load_only_for_cover_selector() {
        let strategy = Strategy::CoverLazyLoad;
        let img = r#"<picture class="card__cover-picture"><img data-src="/lazy.jpg"></picture>"#;

        let cover = Fixture::new(strategy, COVER_IMAGE_SELECTOR, "src");
        assert_eq!(
            image_of(strategy, &cover, img).as_deref(),
            Some("https://news.example/lazy.jpg")
        );

        let other = Fixture::new(strategy, "picture img", "src");
        assert_eq!(image_of(strategy, &other, img), None);
    }

    #[test]
    fn test_cover_lazy_load_accepts_placeholders() {
        let strategy = Strategy::CoverLazyLoad;
        let fixture = Fixture::new(strategy, "img", "src");
        let img = r#"<img src="data:image/svg+xml;base64,AAAA">"#;
        assert_eq!(
            image_of(strategy, &fixture, img).as_deref(),
            Some("https://news.example/data:image/svg+xml;base64,AAAA")
        );
    }

    #[test]
    fn test_noscript_fallback_accepts_placeholders() {
        let strategy = Strategy::NoscriptFallback;
        let fixture = Fixture::new(strategy, "img", "src");
        let img = r#"<img src="/images/spacer.gif" data-src="/real.jpg">"#;
        assert_eq!(
            image_of(strategy, &fixture, img).as_deref(),
            Some("https://news.example/images/spacer.gif")
        );
    }

    #[test]
    fn test_noscript_fallback_order() {
        let strategy = Strategy::NoscriptFallback;
        let fixture = Fixture::new(strategy, ".img-wrap img", "src");

        let primary = r#"<div class="img-wrap"><img src="/p.jpg" data-src="/lazy.jpg"></div>"#;
        assert_eq!(
            image_of(strategy, &fixture, primary).as_deref(),
            Some("https://news.example/p.jpg")
        );

        let lazy = r#"<div class="img-wrap"><img src="" data-src="/lazy.jpg"></div>"#;
        assert_eq!(
            image_of(strategy, &fixture, lazy).as_deref(),
            Some("https://news.example/lazy.jpg")
        );

        let noscript = r#"<div class="img-wrap"><img src=""><noscript><img src="//gdb.example/n.jpg"></noscript></div>"#;
        assert_eq!(
            image_of(strategy, &fixture, noscript).as_deref(),
            Some("https://gdb.example/n.jpg")
        );
    }

    #[test]
    fn test_noscript_fallback_without_primary_element() {
        let strategy = Strategy::NoscriptFallback;
        let fixture = Fixture::new(strategy, ".img-wrap img", "src");
        let img = r#"<noscript><img src="/only-noscript.jpg"></noscript>"#;
        assert_eq!(
            image_of(strategy, &fixture, img).as_deref(),
            Some("https://news.example/only-noscript.jpg")
        );
    }

    #[test]
    fn test_placeholder_aware_prefers_lazy_attribute() {
        let strategy = Strategy::PlaceholderAware;
        let fixture = Fixture::new(strategy, "img.lazy", "src");
        let img = r#"<img class="lazy" src="/visible.jpg" data-src="/real.jpg">"#;
        assert_eq!(
            image_of(strategy, &fixture, img).as_deref(),
            Some("https://news.example/real.jpg")
        );
    }

    #[test]
    fn test_placeholder_aware_skips_placeholders() {
        let strategy = Strategy::PlaceholderAware;
        let fixture = Fixture::new(strategy, "img.lazy", "src");

        let src_wins = r#"<img class="lazy" data-src="data:image/svg+xml;utf8,&lt;svg/&gt;" src="/real.jpg">"#;
        assert_eq!(
            image_of(strategy, &fixture, src_wins).as_deref(),
            Some("https://news.example/real.jpg")
        );

        let secondary_wins = r#"<img class="lazy" src="/images/spacer.gif" data-lazy-src="https://cdn.example/r.jpg">"#;
        assert_eq!(
            image_of(strategy, &fixture, secondary_wins).as_deref(),
            Some("https://cdn.example/r.jpg")
        );

        let all_bad = r#"<img class="lazy" data-src="/placeholder.png" src="/blank.gif" data-lazy-src="/1x1.png">"#;
        assert_eq!(image_of(strategy, &fixture, all_bad), None);
    }

    #[test]
    fn test_description_uses_strategy_phrases() {
        let strategy = Strategy::NoscriptFallback;
        let fixture = Fixture::new(strategy, "img", "src");
        let html = r#"<div class="card"><h2><a href="/s">S</a></h2><p class="summary">Жаңылык текст. Толугураак</p></div>"#;
        let records = fixture.run(strategy, html);
        assert_eq!(records[0].description, "Жаңылык текст.");
    }

    #[test]
    fn test_document_order_is_preserved() {
        let strategy = Strategy::CoverLazyLoad;
        let fixture = Fixture::new(strategy, "img", "src");
        let html: String = (1..=5)
            .map(|i| format!(r#"<div class="card"><h2><a href="/s/{i}">Story {i}</a></h2></div>"#))
            .collect();
        let records = fixture.run(strategy, &html);
        let urls: Vec<&str> = records.iter().map(|r| r.source_url.as_str()).collect();
        assert_eq!(
            urls,
            vec![
                "https://news.example/s/1",
                "https://news.example/s/2",
                "https://news.example/s/3",
                "https://news.example/s/4",
                "https://news.example/s/5",
            ]
        );
    }
}
