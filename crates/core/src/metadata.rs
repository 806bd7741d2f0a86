use crate::Document;
use serde::Serialize;

/// Title used when a page has neither a `<title>` nor an `<h1>`
pub const UNTITLED_PAGE: &str = "Untitled Page";

/// Page-level metadata read from the unstripped document
#[derive(Debug, Clone, Default, Serialize, PartialEq)]
pub struct PageMetadata {
    pub title: String,
    pub description: Option<String>,
    pub language: Option<String>,
}

impl Document {
    /// Extract all page metadata
    pub fn extract_metadata(&self) -> PageMetadata {
        PageMetadata {
            title: self.extract_title(),
            description: self.extract_description(),
            language: self.extract_language(),
        }
    }

    /// Extract title with priority fallback:
    /// 1. `<title>` element
    /// 2. First `<h1>` element
    /// 3. [`UNTITLED_PAGE`]
    pub fn extract_title(&self) -> String {
        if let Some(title) = self.title() {
            return title;
        }

        if let Ok(elements) = self.select("h1")
            && let Some(first) = elements.first()
        {
            let text = first.text();
            let text = text.trim();
            if !text.is_empty() {
                return text.to_string();
            }
        }

        UNTITLED_PAGE.to_string()
    }

    /// Extract the meta description, falling back to `og:description`
    pub fn extract_description(&self) -> Option<String> {
        self.get_meta_content("description")
            .or_else(|| self.get_meta_content("og:description"))
    }

    /// Extract the document language from `<html lang>`
    pub fn extract_language(&self) -> Option<String> {
        let elements = self.select("html[lang]").ok()?;
        let lang = elements.first()?.attr("lang")?.trim();
        if lang.is_empty() { None } else { Some(lang.to_string()) }
    }

    /// Content of a `<meta>` tag matched by `name` or `property`
    fn get_meta_content(&self, key: &str) -> Option<String> {
        for attr in ["name", "property"] {
            let selector = format!("meta[{}=\"{}\"]", attr, key);
            if let Ok(elements) = self.select(&selector)
                && let Some(content) = elements.first().and_then(|el| el.attr("content"))
            {
                let content = content.trim();
                if !content.is_empty() {
                    return Some(content.to_string());
                }
            }
        }
        None
    }
}
