use crate::config::EngineConfig;
use crate::dom::parser::parse_html;
use crate::engine::page::Page;
use crate::net::fetch::load_source;
use crate::render::layout::compute_layout;

/// Error during page loading
#[derive(Debug)]
pub struct PageError {
    pub message: String,
    pub phase: &'static str,
}

impl std::fmt::Display for PageError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.phase, self.message)
    }
}

impl std::error::Error for PageError {}

/// The page pipeline: Load → Parse → Layout → Start interaction layer
pub struct PageEngine {
    config: EngineConfig,
}

impl PageEngine {
    pub fn new(config: EngineConfig) -> Self {
        Self { config }
    }

    /// Load a path or URL through the full pipeline
    pub fn load_page(&self, source: &str) -> Result<Page, PageError> {
        let fetched = load_source(source).map_err(|e| PageError {
            message: e.message,
            phase: "fetch",
        })?;
        if !fetched.content_type.contains("html") {
            log::warn!("{} served as {}; parsing as HTML anyway", fetched.url, fetched.content_type);
        }
        Ok(self.process_html(&fetched.html, &fetched.url))
    }

    /// Process raw HTML through the pipeline
    pub fn process_html(&self, html: &str, url: &str) -> Page {
        // Phase 1: Parse
        let doc = parse_html(html, url);

        // Phase 2: Layout
        let geometry = compute_layout(&doc, self.config.viewport_width);
        log::debug!(
            "laid out {} nodes, document height {}",
            doc.len(),
            geometry.document_height()
        );

        // Phase 3: Page ready
        Page::start(doc, geometry, &self.config)
    }
}
