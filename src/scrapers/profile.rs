//! Staff profile pages.
//!
//! Each announcement is a collapsible card: a `button.btn-link.text-left`
//! header carrying the date in a `span.badge`, and a `data-target` pointing
//! at the collapse `div` whose `div.card-body` holds the text and links.

use scraper::{ElementRef, Html, Selector};
use tracing::debug;

use super::extract::{
    attachment_name, block_text, inline_text, is_document_link, resolve_against_origin,
    truncate_chars,
};
use super::http_client::HttpClient;
use super::ExtractError;
use crate::models::{Announcement, Attachment, SourceDescriptor};

/// Maximum body length kept per announcement, in characters.
pub const PROFILE_BODY_CHARS: usize = 1000;

pub async fn extract(
    client: &HttpClient,
    source: &SourceDescriptor,
) -> Result<Vec<Announcement>, ExtractError> {
    let html = client.get_text(&source.url).await?;
    let announcements = parse_profile_page(&html, source)?;
    debug!(source = %source.id, "Parsed {} profile announcements", announcements.len());
    Ok(announcements)
}

fn selector(css: &str) -> Result<Selector, ExtractError> {
    Selector::parse(css).map_err(|e| ExtractError::Parse(format!("{}: {}", css, e)))
}

/// Parse a profile page. Cards missing a date or a title are dropped.
pub fn parse_profile_page(
    html: &str,
    source: &SourceDescriptor,
) -> Result<Vec<Announcement>, ExtractError> {
    let document = Html::parse_document(html);
    let button_sel = selector("button.btn-link.text-left")?;
    let badge_sel = selector("span.badge")?;
    let body_sel = selector("div.card-body")?;
    let link_sel = selector("a[href]")?;

    let mut announcements = Vec::new();
    for button in document.select(&button_sel) {
        let date = button
            .select(&badge_sel)
            .next()
            .map(inline_text)
            .unwrap_or_default();
        let full_text = inline_text(button);
        let title = if date.is_empty() {
            full_text
        } else {
            full_text.replace(&date, "").trim().to_string()
        };

        if date.is_empty() || title.is_empty() {
            continue;
        }

        let mut body = String::new();
        let mut attachments = Vec::new();

        if let Some(card_body) = find_card_body(&document, button, &body_sel) {
            body = truncate_chars(&block_text(card_body), PROFILE_BODY_CHARS);

            for link in card_body.select(&link_sel) {
                let href = link.value().attr("href").unwrap_or_default();
                if href.is_empty() || !is_document_link(href, true) {
                    continue;
                }
                let url = resolve_against_origin(&source.url, href)?;
                attachments.push(Attachment::new(attachment_name(&inline_text(link), href), url));
            }
        }

        announcements.push(
            Announcement::new(&source.id, &source.name, date, title, &source.url)
                .with_body(body)
                .with_attachments(attachments),
        );
    }

    Ok(announcements)
}

fn find_card_body<'a>(
    document: &'a Html,
    button: ElementRef<'a>,
    body_sel: &Selector,
) -> Option<ElementRef<'a>> {
    let target = button.value().attr("data-target")?.trim_start_matches('#');
    if target.is_empty() {
        return None;
    }
    let target_sel = Selector::parse(&format!("div[id=\"{}\"]", target)).ok()?;
    let container = document.select(&target_sel).next()?;
    container.select(body_sel).next()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::SourceKind;

    const PAGE: &str = r##"
<html><body>
<div class="card">
  <div class="card-header">
    <button class="btn btn-link text-left" data-target="#collapse1">
      <span class="badge badge-info">05.01.2026</span> Midterm Results
    </button>
  </div>
  <div id="collapse1" class="collapse">
    <div class="card-body">
      <p>Results are posted.</p>
      <p>See the attached list.</p>
      <a href="/upload/files/results">Result list</a>
      <a href="notes/week1.PDF"></a>
      <a href="https://example.edu/page.php">Homepage</a>
    </div>
  </div>
</div>
<div class="card">
  <button class="btn btn-link text-left" data-target="#collapse2">
    <span class="badge">06.01.2026</span> Room change
  </button>
</div>
<div class="card">
  <button class="btn btn-link text-left" data-target="#collapse3">No date here</button>
</div>
<div class="card">
  <button class="btn btn-link text-left"><span class="badge">07.01.2026</span></button>
</div>
<button class="btn btn-primary">Unrelated</button>
</body></html>
"##;

    fn profile() -> SourceDescriptor {
        SourceDescriptor::new(
            "prof-a",
            "Prof. A",
            "https://akbis.example.edu/detay/?A_ID=1",
            SourceKind::Profile,
        )
    }

    #[test]
    fn test_parse_profile_cards() {
        let items = parse_profile_page(PAGE, &profile()).unwrap();
        assert_eq!(items.len(), 2);

        let first = &items[0];
        assert_eq!(first.published_date, "05.01.2026");
        assert_eq!(first.title, "Midterm Results");
        assert_eq!(first.source_id, "prof-a");
        assert_eq!(first.source_name, "Prof. A");
        assert!(first.body.contains("Results are posted."));
        assert!(first.body.contains('\n'));
        assert_eq!(
            first.attachments,
            vec![
                Attachment::new("Result list", "https://akbis.example.edu/upload/files/results"),
                Attachment::new("week1.PDF", "https://akbis.example.edu/notes/week1.PDF"),
            ]
        );

        let second = &items[1];
        assert_eq!(second.title, "Room change");
        assert!(second.body.is_empty());
        assert!(second.attachments.is_empty());
    }

    #[test]
    fn test_body_is_capped() {
        let long = "x".repeat(3000);
        let page = format!(
            r##"<button class="btn-link text-left" data-target="#c"><span class="badge">01.02.2026</span> Long</button>
            <div id="c"><div class="card-body">{}</div></div>"##,
            long
        );
        let items = parse_profile_page(&page, &profile()).unwrap();
        assert_eq!(items[0].body.chars().count(), PROFILE_BODY_CHARS);
    }

    #[test]
    fn test_page_without_cards() {
        let items = parse_profile_page("<html><body><p>Nothing</p></body></html>", &profile()).unwrap();
        assert!(items.is_empty());
    }
}
