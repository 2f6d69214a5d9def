use scraper::{ElementRef, Html, Selector};
use taxon_core::error::AppError;
use taxon_core::traits::{ContentExtractor, TitleParser};

/// Extracts the `<title>` text from an HTML document.
#[derive(Debug, Clone, Copy, Default)]
pub struct DocTitleParser;

impl TitleParser for DocTitleParser {
    fn parse_title(&self, html: &str) -> Result<String, AppError> {
        let document = Html::parse_document(html);
        let selector = Selector::parse("title")
            .map_err(|e| AppError::ExtractionError(format!("title selector: {e:?}")))?;

        let title = document
            .select(&selector)
            .next()
            .map(|element| element.text().collect::<String>())
            .ok_or_else(|| {
                AppError::ExtractionError("document has no <title> element".to_string())
            })?;

        Ok(title.trim().to_string())
    }
}

/// Candidate containers for the main readable text, most specific first.
const CONTENT_SELECTORS: &[&str] = &[
    "article",
    "main",
    "[role='main']",
    ".post-content",
    ".article-content",
    ".article-body",
    ".entry-content",
    ".story-body",
    "#content",
    ".content",
];

/// Markup that never contributes readable prose.
const SKIP_TAGS: &[&str] = &[
    "script", "style", "nav", "header", "footer", "aside", "noscript", "iframe", "svg", "form",
    "button",
];

const DEFAULT_MIN_CONTENT_CHARS: usize = 200;

/// Isolates the main readable text of a page.
///
/// Walks a ladder of content-container selectors and accepts the first one
/// holding a substantial amount of text. Tuned for precision: tables and
/// comment sections are dropped, and there is no whole-`<body>` fallback
/// unless explicitly enabled, so sparse or navigation-only pages extract
/// nothing rather than noise.
#[derive(Debug, Clone)]
pub struct MainTextExtractor {
    min_content_chars: usize,
    body_fallback: bool,
    keep_tables: bool,
    keep_comments: bool,
}

impl MainTextExtractor {
    pub fn new() -> Self {
        Self {
            min_content_chars: DEFAULT_MIN_CONTENT_CHARS,
            body_fallback: false,
            keep_tables: false,
            keep_comments: false,
        }
    }

    /// Lower or raise the substantial-content threshold.
    pub fn with_min_content(mut self, chars: usize) -> Self {
        self.min_content_chars = chars;
        self
    }

    /// Fall back to the whole `<body>` text when no container matches.
    pub fn with_body_fallback(mut self) -> Self {
        self.body_fallback = true;
        self
    }

    /// Keep text inside `<table>` markup.
    pub fn with_tables(mut self) -> Self {
        self.keep_tables = true;
        self
    }

    /// Keep text inside comment-section containers.
    pub fn with_comments(mut self) -> Self {
        self.keep_comments = true;
        self
    }

    fn skips(&self, element: ElementRef<'_>) -> bool {
        let name = element.value().name();
        if SKIP_TAGS.contains(&name) {
            return true;
        }
        if !self.keep_tables && name == "table" {
            return true;
        }
        if !self.keep_comments && is_comment_container(element) {
            return true;
        }
        false
    }

    fn element_text(&self, element: ElementRef<'_>) -> String {
        let mut raw = String::new();
        self.push_text(element, &mut raw);
        raw.split_whitespace().collect::<Vec<_>>().join(" ")
    }

    fn push_text(&self, element: ElementRef<'_>, out: &mut String) {
        for child in element.children() {
            if let Some(el) = ElementRef::wrap(child) {
                if !self.skips(el) {
                    self.push_text(el, out);
                }
            } else if let Some(text) = child.value().as_text() {
                out.push_str(text);
                out.push(' ');
            }
        }
    }
}

impl Default for MainTextExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl ContentExtractor for MainTextExtractor {
    fn extract(&self, html: &str) -> Result<String, AppError> {
        let document = Html::parse_document(html);

        for selector_str in CONTENT_SELECTORS {
            let Ok(selector) = Selector::parse(selector_str) else {
                continue;
            };
            if let Some(element) = document.select(&selector).next() {
                let text = self.element_text(element);
                if text.chars().count() >= self.min_content_chars {
                    return Ok(text);
                }
            }
        }

        if self.body_fallback {
            if let Ok(selector) = Selector::parse("body") {
                if let Some(body) = document.select(&selector).next() {
                    let text = self.element_text(body);
                    if !text.is_empty() {
                        return Ok(text);
                    }
                }
            }
        }

        Err(AppError::ExtractionError(
            "no main content matched".to_string(),
        ))
    }
}

/// Containers whose id or class marks them as a comment section.
fn is_comment_container(element: ElementRef<'_>) -> bool {
    let marked = |attr: Option<&str>| {
        attr.is_some_and(|value| value.to_ascii_lowercase().contains("comment"))
    };
    marked(element.value().attr("id")) || marked(element.value().attr("class"))
}

#[cfg(test)]
mod tests {
    use super::*;

    const ARTICLE_PAGE: &str = r#"
        <!DOCTYPE html>
        <html>
        <head><title>  Transfer window roundup </title></head>
        <body>
            <nav>Home News Sport Weather</nav>
            <article>
                <h1>Transfer window roundup</h1>
                <p>The striker completed a club-record move on deadline day.</p>
                <p>Managers on both sides described the deal as transformative.</p>
            </article>
            <footer>Copyright notice</footer>
        </body>
        </html>
    "#;

    fn extractor() -> MainTextExtractor {
        // fixtures are short, so lower the substantial-content bar
        MainTextExtractor::new().with_min_content(40)
    }

    #[test]
    fn parses_and_trims_title() {
        let title = DocTitleParser.parse_title(ARTICLE_PAGE).unwrap();
        assert_eq!(title, "Transfer window roundup");
    }

    #[test]
    fn missing_title_is_an_error() {
        let err = DocTitleParser
            .parse_title("<html><body><p>no head</p></body></html>")
            .unwrap_err();
        assert!(matches!(err, AppError::ExtractionError(_)));
    }

    #[test]
    fn extracts_article_and_skips_chrome() {
        let text = extractor().extract(ARTICLE_PAGE).unwrap();
        assert!(text.contains("club-record move"));
        assert!(!text.contains("Weather"));
        assert!(!text.contains("Copyright"));
    }

    #[test]
    fn tables_are_excluded_by_default() {
        let html = r#"
            <main>
                <p>League report with plenty of surrounding prose for the threshold.</p>
                <table><tr><td>1</td><td>Arsenal</td></tr></table>
            </main>
        "#;
        let text = extractor().extract(html).unwrap();
        assert!(text.contains("League report"));
        assert!(!text.contains("Arsenal"));

        let kept = extractor().with_tables().extract(html).unwrap();
        assert!(kept.contains("Arsenal"));
    }

    #[test]
    fn comment_sections_are_excluded_by_default() {
        let html = r#"
            <article>
                <p>The council approved the budget after a lengthy public session.</p>
                <div class="comments-list"><p>First!!! great article</p></div>
            </article>
        "#;
        let text = extractor().extract(html).unwrap();
        assert!(text.contains("approved the budget"));
        assert!(!text.contains("First!!!"));
    }

    #[test]
    fn no_fallback_means_sparse_pages_fail() {
        let html = "<html><body><p>Just a stub page.</p></body></html>";
        assert!(matches!(
            extractor().extract(html),
            Err(AppError::ExtractionError(_))
        ));

        let text = extractor().with_body_fallback().extract(html).unwrap();
        assert_eq!(text, "Just a stub page.");
    }

    #[test]
    fn short_container_text_does_not_satisfy_precision_threshold() {
        let html = "<article><p>Too short.</p></article>";
        assert!(extractor().extract(html).is_err());
    }

    #[test]
    fn whitespace_is_normalized() {
        let html = "<article><p>Spread   across\n\n   lines with plenty of padding text here.</p></article>";
        let text = extractor().extract(html).unwrap();
        assert!(text.contains("Spread across lines"));
    }
}
