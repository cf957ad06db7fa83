//! Shared HTML and URL helpers for the extractors.

use scraper::ElementRef;
use url::Url;

use super::ExtractError;

/// File extensions treated as attachments.
pub const DOCUMENT_EXTENSIONS: &[&str] = &[".pdf", ".doc", ".docx", ".pptx", ".xlsx"];

/// Whether a link points at a downloadable document.
///
/// With `include_uploads`, anything under an `upload/files` path counts too.
pub fn is_document_link(href: &str, include_uploads: bool) -> bool {
    if include_uploads && href.contains("upload/files") {
        return true;
    }
    let lower = href.to_lowercase();
    DOCUMENT_EXTENSIONS.iter().any(|ext| lower.ends_with(ext))
}

/// Resolve a link against the origin (scheme and host) of `page_url`.
///
/// Absolute links are returned unchanged. Relative links, with or without a
/// leading slash, are rooted at the origin rather than the page directory.
pub fn resolve_against_origin(page_url: &str, href: &str) -> Result<String, ExtractError> {
    if href.starts_with("http://") || href.starts_with("https://") {
        return Ok(href.to_string());
    }
    let base = Url::parse(page_url).map_err(|_| ExtractError::InvalidUrl(page_url.to_string()))?;
    let origin = base.origin().ascii_serialization();
    Ok(format!("{}/{}", origin, href.trim_start_matches('/')))
}

/// Resolve a link relative to a site root such as `https://eee.example.edu`.
pub fn resolve_against_root(root: &str, href: &str) -> String {
    if href.starts_with("http://") || href.starts_with("https://") {
        href.to_string()
    } else {
        format!(
            "{}/{}",
            root.trim_end_matches('/'),
            href.trim_start_matches('/')
        )
    }
}

/// Non-empty trimmed text fragments of an element, in document order.
pub fn text_fragments(element: ElementRef<'_>) -> Vec<String> {
    element
        .text()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Element text with fragments joined by single spaces.
pub fn inline_text(element: ElementRef<'_>) -> String {
    text_fragments(element).join(" ")
}

/// Element text with one fragment per line.
pub fn block_text(element: ElementRef<'_>) -> String {
    text_fragments(element).join("\n")
}

/// Truncate to at most `max` characters, respecting char boundaries.
pub fn truncate_chars(s: &str, max: usize) -> String {
    match s.char_indices().nth(max) {
        Some((idx, _)) => s[..idx].to_string(),
        None => s.to_string(),
    }
}

/// Attachment display name: link text, or the last path segment.
pub fn attachment_name(link_text: &str, href: &str) -> String {
    let text = link_text.trim();
    if !text.is_empty() {
        return text.to_string();
    }
    href.rsplit('/').next().unwrap_or(href).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_document_link() {
        assert!(is_document_link("/upload/files/123", true));
        assert!(!is_document_link("/upload/files/123", false));
        assert!(is_document_link("files/Syllabus.PDF", false));
        assert!(is_document_link("grades.xlsx", false));
        assert!(!is_document_link("https://example.edu/page.php", true));
    }

    #[test]
    fn test_resolve_against_origin() {
        let page = "https://akbis.example.edu/detay/?A_ID=1";
        assert_eq!(
            resolve_against_origin(page, "/upload/files/a.pdf").unwrap(),
            "https://akbis.example.edu/upload/files/a.pdf"
        );
        assert_eq!(
            resolve_against_origin(page, "upload/files/a.pdf").unwrap(),
            "https://akbis.example.edu/upload/files/a.pdf"
        );
        assert_eq!(
            resolve_against_origin(page, "https://cdn.example.edu/a.pdf").unwrap(),
            "https://cdn.example.edu/a.pdf"
        );
        assert!(resolve_against_origin("not a url", "a.pdf").is_err());
    }

    #[test]
    fn test_resolve_against_root() {
        assert_eq!(
            resolve_against_root("https://eee.example.edu/", "duyuru.php?id=7"),
            "https://eee.example.edu/duyuru.php?id=7"
        );
    }

    #[test]
    fn test_truncate_chars_multibyte() {
        assert_eq!(truncate_chars("ğüşiöç", 3), "ğüş");
        assert_eq!(truncate_chars("abc", 10), "abc");
    }

    #[test]
    fn test_attachment_name_fallback() {
        assert_eq!(attachment_name("  ", "/upload/files/hw1.pdf"), "hw1.pdf");
        assert_eq!(attachment_name("Homework 1", "/x.pdf"), "Homework 1");
    }
}
