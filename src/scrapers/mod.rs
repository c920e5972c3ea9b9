//! Selector-driven extraction of article cards from listing pages.
//!
//! Each listing page is a list of repeated item blocks. For every item a
//! strategy pulls out a title, link, image and teaser, resolving relative
//! URLs and cleaning up what real-world markup leaves behind.
//!
//! # Supported Sources
//!
//! | Source | Strategy | Notes |
//! |--------|----------|-------|
//! | RT | [`strategy::Strategy::CoverLazyLoad`] | English, `data-src` images |
//! | Azattyk | [`strategy::Strategy::NoscriptFallback`] | Russian/Kyrgyz, images duplicated in `<noscript>` |
//! | Vesti.kg | [`strategy::Strategy::PlaceholderAware`] | Russian, spacer images in `src` |
//!
//! # Layers
//!
//! - [`query`]: find nodes by selector, read text and attributes
//! - [`resolve`]: make links absolute against the source's base URL
//! - [`placeholder`]: recognize lazy-loading spacer images
//! - [`sanitize`]: strip "read more" boilerplate from teasers
//! - [`strategy`]: the per-source extraction rules
//! - [`registry`]: source id → configuration + strategy, and the `extract` entry point

pub mod placeholder;
pub mod query;
pub mod registry;
pub mod resolve;
pub mod sanitize;
pub mod strategy;
