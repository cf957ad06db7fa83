//! Department announcement feed.
//!
//! The listing at `<root>/duyurular.php` links to `duyuru.php?id=<n>` detail
//! pages. Link text usually starts with a `<day> <month> <year>` date.

use std::sync::LazyLock;

use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use tracing::{debug, warn};

use super::extract::{
    attachment_name, block_text, inline_text, is_document_link, resolve_against_root,
    truncate_chars,
};
use super::http_client::HttpClient;
use super::ExtractError;
use crate::models::{Announcement, Attachment, SourceDescriptor};

/// Number of listing entries read per run.
pub const LISTING_LIMIT: usize = 20;

/// Maximum body length kept per announcement, in characters.
pub const DETAIL_BODY_CHARS: usize = 500;

static DETAIL_LINK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"duyuru\.php\?id=\d+").expect("valid regex"));
static LEADING_DATE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d{1,2}\s+\w+\s+\d{4})(.*)$").expect("valid regex"));
static DATE_CLASS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)date|tarih").expect("valid regex"));
static CONTENT_CLASS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)content|icerik|duyuru").expect("valid regex"));

/// One entry of the listing page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingItem {
    pub date: String,
    pub title: String,
    pub detail_url: String,
}

/// Body and attachments of a detail page.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DetailContent {
    pub body: String,
    pub attachments: Vec<Attachment>,
}

pub fn listing_url(root: &str) -> String {
    format!("{}/duyurular.php", root.trim_end_matches('/'))
}

/// Fetch the listing and each detail page.
///
/// A failed listing fetch fails the source. A failed detail fetch still
/// yields the entry, with an empty body and no attachments.
pub async fn extract(
    client: &HttpClient,
    source: &SourceDescriptor,
) -> Result<Vec<Announcement>, ExtractError> {
    let root = source.url.trim_end_matches('/');
    let html = client.get_text(&listing_url(root)).await?;
    let items = parse_listing(&html, root)?;
    debug!(source = %source.id, "Found {} listing entries", items.len());

    let mut announcements = Vec::with_capacity(items.len());
    for item in items {
        let detail = match client.get_text(&item.detail_url).await {
            Ok(page) => parse_detail(&page, root)?,
            Err(e) => {
                warn!(source = %source.id, "Detail page {} failed: {}", item.detail_url, e);
                DetailContent::default()
            }
        };

        announcements.push(
            Announcement::new(&source.id, &source.name, item.date, item.title, item.detail_url)
                .with_body(detail.body)
                .with_attachments(detail.attachments),
        );
    }

    Ok(announcements)
}

fn selector(css: &str) -> Result<Selector, ExtractError> {
    Selector::parse(css).map_err(|e| ExtractError::Parse(format!("{}: {}", css, e)))
}

/// Parse the listing page into at most [`LISTING_LIMIT`] entries, in page order.
pub fn parse_listing(html: &str, root: &str) -> Result<Vec<ListingItem>, ExtractError> {
    let document = Html::parse_document(html);
    let link_sel = selector("a[href]")?;

    let items = document
        .select(&link_sel)
        .filter_map(|link| {
            let href = link.value().attr("href")?;
            DETAIL_LINK.is_match(href).then_some((link, href))
        })
        .take(LISTING_LIMIT)
        .map(|(link, href)| {
            let text = inline_text(link);
            let (date, title) = match LEADING_DATE.captures(&text) {
                Some(caps) => (caps[1].trim().to_string(), caps[2].trim().to_string()),
                None => (sibling_date(link).unwrap_or_default(), text.clone()),
            };
            ListingItem {
                date,
                title,
                detail_url: resolve_against_root(root, href),
            }
        })
        .collect();

    Ok(items)
}

/// Date from an element near the link whose class mentions a date.
fn sibling_date(link: ElementRef<'_>) -> Option<String> {
    let parent = link.parent().and_then(ElementRef::wrap)?;
    parent
        .descendants()
        .filter_map(ElementRef::wrap)
        .find(|el| {
            el.value()
                .attr("class")
                .map(|c| DATE_CLASS.is_match(c))
                .unwrap_or(false)
        })
        .map(inline_text)
        .filter(|s| !s.is_empty())
}

/// Parse a detail page: the first content-like `div` and every document link.
pub fn parse_detail(html: &str, root: &str) -> Result<DetailContent, ExtractError> {
    let document = Html::parse_document(html);
    let div_sel = selector("div")?;
    let link_sel = selector("a[href]")?;

    let body = document
        .select(&div_sel)
        .find(|div| {
            div.value()
                .attr("class")
                .map(|c| CONTENT_CLASS.is_match(c))
                .unwrap_or(false)
        })
        .map(|div| truncate_chars(&block_text(div), DETAIL_BODY_CHARS))
        .unwrap_or_default();

    let attachments = document
        .select(&link_sel)
        .filter_map(|link| {
            let href = link.value().attr("href")?;
            is_document_link(href, false).then(|| {
                Attachment::new(
                    attachment_name(&inline_text(link), href),
                    resolve_against_root(root, href),
                )
            })
        })
        .collect();

    Ok(DetailContent { body, attachments })
}

#[cfg(test)]
mod tests {
    use super::*;

    const ROOT: &str = "https://eee.example.edu";

    #[test]
    fn test_listing_url() {
        assert_eq!(listing_url("https://eee.example.edu/"), "https://eee.example.edu/duyurular.php");
    }

    #[test]
    fn test_parse_listing_dates_and_titles() {
        let html = r#"
<ul>
  <li><a href="duyuru.php?id=41">12 Ocak 2026 Final exam schedule</a></li>
  <li><span class="tarih">10.01.2026</span><a href="/duyuru.php?id=40">Lab reports due</a></li>
  <li><a href="index.php">Home</a></li>
  <li><a href="https://eee.example.edu/duyuru.php?id=39">3 Şubat 2026 Seminar</a></li>
</ul>"#;
        let items = parse_listing(html, ROOT).unwrap();
        assert_eq!(
            items,
            vec![
                ListingItem {
                    date: "12 Ocak 2026".to_string(),
                    title: "Final exam schedule".to_string(),
                    detail_url: "https://eee.example.edu/duyuru.php?id=41".to_string(),
                },
                ListingItem {
                    date: "10.01.2026".to_string(),
                    title: "Lab reports due".to_string(),
                    detail_url: "https://eee.example.edu/duyuru.php?id=40".to_string(),
                },
                ListingItem {
                    date: "3 Şubat 2026".to_string(),
                    title: "Seminar".to_string(),
                    detail_url: "https://eee.example.edu/duyuru.php?id=39".to_string(),
                },
            ]
        );
    }

    #[test]
    fn test_parse_listing_caps_entries() {
        let html: String = (0..30)
            .map(|i| format!(r#"<p><a href="duyuru.php?id={}">1 Mart 2026 Item {}</a></p>"#, i, i))
            .collect();
        let items = parse_listing(&html, ROOT).unwrap();
        assert_eq!(items.len(), LISTING_LIMIT);
        assert_eq!(items[0].title, "Item 0");
    }

    #[test]
    fn test_parse_listing_without_date() {
        let html = r#"<p><a href="duyuru.php?id=5">Untitled notice</a></p>"#;
        let items = parse_listing(html, ROOT).unwrap();
        assert_eq!(items[0].date, "");
        assert_eq!(items[0].title, "Untitled notice");
    }

    #[test]
    fn test_parse_detail() {
        let html = r#"
<html><body>
<div class="menu"><a href="/doc/handbook.pdf">Handbook</a></div>
<div class="duyuru-icerik">
  <h3>Final exam schedule</h3>
  <p>Exams start on Monday.</p>
  <a href="files/schedule.xlsx">Schedule</a>
</div>
</body></html>"#;
        let detail = parse_detail(html, ROOT).unwrap();
        assert_eq!(detail.body, "Final exam schedule\nExams start on Monday.\nSchedule");
        assert_eq!(
            detail.attachments,
            vec![
                Attachment::new("Handbook", "https://eee.example.edu/doc/handbook.pdf"),
                Attachment::new("Schedule", "https://eee.example.edu/files/schedule.xlsx"),
            ]
        );
    }

    #[test]
    fn test_parse_detail_caps_body() {
        let html = format!(r#"<div class="content">{}</div>"#, "ş".repeat(800));
        let detail = parse_detail(&html, ROOT).unwrap();
        assert_eq!(detail.body.chars().count(), DETAIL_BODY_CHARS);
    }
}
