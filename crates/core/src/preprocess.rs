use regex::Regex;
use std::sync::LazyLock;

static COMMENT: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?s)<!--.*?-->").unwrap());

/// Which page chrome is stripped before structure extraction.
///
/// Navigation, headers, footers and sidebars would otherwise count as page
/// content: their links, headings and words all feed the gap rules.
#[derive(Debug, Clone)]
pub struct PreprocessConfig {
    pub remove_scripts: bool,
    pub remove_styles: bool,
    pub remove_nav: bool,
    pub remove_footers: bool,
    pub remove_headers: bool,
    pub remove_asides: bool,
    pub remove_iframes: bool,
    /// `<!-- ... -->` blocks, removed after the element pass
    pub remove_comments: bool,
}

impl Default for PreprocessConfig {
    fn default() -> Self {
        Self {
            remove_scripts: true,
            remove_styles: true,
            remove_nav: true,
            remove_footers: true,
            remove_headers: true,
            remove_asides: true,
            remove_iframes: true,
            remove_comments: true,
        }
    }
}

impl PreprocessConfig {
    /// Tag names selected for removal, in a fixed order
    pub fn stripped_tags(&self) -> Vec<&'static str> {
        [
            (self.remove_scripts, "script"),
            (self.remove_styles, "style"),
            (self.remove_nav, "nav"),
            (self.remove_footers, "footer"),
            (self.remove_headers, "header"),
            (self.remove_asides, "aside"),
            (self.remove_iframes, "iframe"),
        ]
        .into_iter()
        .filter_map(|(enabled, tag)| enabled.then_some(tag))
        .collect()
    }
}

/// Strip page chrome and comments from raw HTML.
pub fn preprocess_html(page: &str, config: &PreprocessConfig) -> String {
    let tags = config.stripped_tags();
    let stripped = if tags.is_empty() { page.to_string() } else { strip_elements(page, &tags) };

    if config.remove_comments { remove_comments(&stripped) } else { stripped }
}

/// Drop every element named in `tags` together with its subtree
fn strip_elements(page: &str, tags: &[&str]) -> String {
    let mut output = String::with_capacity(page.len());
    let mut rewriter = lol_html::HtmlRewriter::new(
        lol_html::Settings {
            element_content_handlers: tags
                .iter()
                .map(|tag| {
                    lol_html::element!(*tag, |el| {
                        el.remove();
                        Ok(())
                    })
                })
                .collect(),
            ..Default::default()
        },
        |chunk: &[u8]| output.push_str(&String::from_utf8_lossy(chunk)),
    );

    // a rewriter error leaves the input untouched
    if let Err(e) = rewriter.write(page.as_bytes()).and_then(|_| rewriter.end()) {
        tracing::warn!(error = %e, "Preprocessing failed, analyzing raw page");
        return page.to_string();
    }

    if output.is_empty() { page.to_string() } else { output }
}

fn remove_comments(page: &str) -> String {
    COMMENT.replace_all(page, "").into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    const EXCHANGE_PAGE: &str = r#"
        <html>
            <head><script>trackVisit('btc');</script><style>.price{color:green}</style></head>
            <body>
                <header><h1>CoinDesk Clone</h1></header>
                <nav><a href="/markets">Markets</a></nav>
                <aside>Trending: Solana</aside>
                <iframe src="https://widgets.example.com/ticker"></iframe>
                <h2>How exchanges match orders</h2>
                <p>An order book lists bids and asks.</p>
                <footer>Terms of service</footer>
            </body>
        </html>
    "#;

    #[test]
    fn test_strips_page_chrome() {
        let result = preprocess_html(EXCHANGE_PAGE, &PreprocessConfig::default());

        for gone in ["trackVisit", "color:green", "CoinDesk Clone", "Markets", "Trending", "widgets.example.com", "Terms"] {
            assert!(!result.contains(gone), "{gone} should be stripped");
        }
        assert!(result.contains("<h2>How exchanges match orders</h2>"));
        assert!(result.contains("<p>An order book lists bids and asks.</p>"));
    }

    #[test]
    fn test_disabled_tag_is_kept() {
        let config = PreprocessConfig { remove_headers: false, ..Default::default() };
        let result = preprocess_html(EXCHANGE_PAGE, &config);

        assert!(result.contains("<h1>CoinDesk Clone</h1>"));
        assert!(!result.contains("Markets"));
    }

    #[test]
    fn test_remove_comments() {
        let page = "<body><!-- ad slot --><p>Gas fees</p><!-- tracking\n pixel --></body>";
        let result = preprocess_html(page, &PreprocessConfig::default());

        assert_eq!(result, "<body><p>Gas fees</p></body>");
    }

    #[test]
    fn test_stripped_tags_order() {
        let config = PreprocessConfig { remove_nav: false, remove_iframes: false, ..Default::default() };
        assert_eq!(config.stripped_tags(), vec!["script", "style", "footer", "header", "aside"]);
    }

    #[test]
    fn test_nothing_to_strip_is_identity() {
        let page = "<nav>Menu</nav><!-- note --><p>Plain</p>";
        let config = PreprocessConfig {
            remove_scripts: false,
            remove_styles: false,
            remove_nav: false,
            remove_footers: false,
            remove_headers: false,
            remove_asides: false,
            remove_iframes: false,
            remove_comments: false,
        };
        assert_eq!(preprocess_html(page, &config), page);
    }
}
