//! WordPress XML export parser
//!
//! Streams over the export document and yields normalized post records plus
//! document-wide category/tag sets. A malformed individual `<item>` is
//! recorded as a parse error and skipped; only an ill-formed document fails
//! the parse outright.

use std::collections::{BTreeSet, HashMap};

use chrono::{NaiveDateTime, TimeZone, Utc};
use quick_xml::events::Event;
use quick_xml::Reader;
use thiserror::Error;

use frostline_core::UtcDateTime;

/// Error for documents that are not well-formed XML
#[derive(Error, Debug)]
pub enum ExportParseError {
    #[error("malformed export document: {0}")]
    Xml(#[from] quick_xml::Error),
}

/// A single normalized post record extracted from the export
#[derive(Debug, Clone, PartialEq)]
pub struct ImportedPost {
    pub title: String,
    /// May be empty; the import orchestrator generates a fallback slug
    pub slug: String,
    /// Raw HTML markup with entities decoded
    pub content: String,
    pub excerpt: Option<String>,
    pub author: Option<String>,
    pub featured_image_url: Option<String>,
    /// WordPress status verbatim; only `publish` counts as published
    pub status: String,
    pub published_at: Option<UtcDateTime>,
}

/// Result of parsing an export document
#[derive(Debug, Default)]
pub struct ParsedExport {
    pub posts: Vec<ImportedPost>,
    pub categories: BTreeSet<String>,
    pub tags: BTreeSet<String>,
    pub parse_errors: Vec<String>,
    /// Total `<item>` entries seen in the document
    pub item_count: usize,
}

/// Fields accumulated for the `<item>` currently being read
#[derive(Debug, Default)]
struct PartialItem {
    title: Option<String>,
    post_name: Option<String>,
    content: Option<String>,
    excerpt: Option<String>,
    creator: Option<String>,
    status: Option<String>,
    post_date: Option<String>,
    post_id: Option<String>,
    attachment_url: Option<String>,
    thumbnail_id: Option<String>,
    meta_key: Option<String>,
    meta_value: Option<String>,
}

/// Item fields plus the attachment bookkeeping needed for thumbnail resolution
#[derive(Debug)]
struct RawRecord {
    post: ImportedPost,
    thumbnail_id: Option<String>,
}

/// Element names whose text content maps onto a [`PartialItem`] field
fn is_field_tag(name: &[u8]) -> bool {
    matches!(
        name,
        b"title"
            | b"wp:post_name"
            | b"content:encoded"
            | b"excerpt:encoded"
            | b"dc:creator"
            | b"wp:status"
            | b"wp:post_date"
            | b"wp:post_id"
            | b"wp:attachment_url"
            | b"wp:meta_key"
            | b"wp:meta_value"
            | b"category"
    )
}

/// Parse a WordPress export document.
///
/// Markup-valued fields are expected CDATA-wrapped or entity-escaped, as
/// WordPress emits them. Literal inline child elements inside a field
/// contribute only their text content.
pub fn parse_wordpress_export(xml: &str) -> Result<ParsedExport, ExportParseError> {
    let mut reader = Reader::from_str(xml);

    let mut result = ParsedExport::default();
    let mut records: Vec<RawRecord> = Vec::new();
    // wp:post_id -> wp:attachment_url, used to resolve _thumbnail_id references
    let mut attachments: HashMap<String, String> = HashMap::new();

    let mut item: Option<PartialItem> = None;
    let mut text = String::new();
    // field element currently being accumulated; inline children of a field
    // (e.g. markup inside a title) must not reset or consume the buffer
    let mut current_field: Option<Vec<u8>> = None;
    let mut in_postmeta = false;
    // domain attribute of the <category> element currently open, if any
    let mut category_domain: Option<String> = None;

    loop {
        match reader.read_event()? {
            Event::Start(ref e) => {
                let name = e.name().as_ref().to_vec();
                if name == b"item" {
                    result.item_count += 1;
                    item = Some(PartialItem::default());
                    current_field = None;
                } else if item.is_some() && current_field.is_none() {
                    match name.as_slice() {
                        b"wp:postmeta" => {
                            in_postmeta = true;
                        }
                        field if is_field_tag(field) => {
                            if field == b"category" {
                                category_domain = e
                                    .try_get_attribute("domain")
                                    .map_err(quick_xml::Error::from)?
                                    .map(|attr| {
                                        attr.unescape_value()
                                            .map(|v| v.into_owned())
                                            .map_err(quick_xml::Error::from)
                                    })
                                    .transpose()?;
                            }
                            text.clear();
                            current_field = Some(name);
                        }
                        _ => {}
                    }
                }
            }
            Event::Text(ref t) => {
                if current_field.is_some() {
                    text.push_str(&t.unescape().map_err(quick_xml::Error::from)?);
                }
            }
            Event::CData(ref t) => {
                if current_field.is_some() {
                    text.push_str(&String::from_utf8_lossy(t));
                }
            }
            Event::End(ref e) => {
                let name = e.name().as_ref().to_vec();
                if name == b"item" {
                    if let Some(partial) = item.take() {
                        finish_item(partial, &mut result, &mut records, &mut attachments);
                    }
                    in_postmeta = false;
                    current_field = None;
                    text.clear();
                } else if let Some(partial) = item.as_mut() {
                    if current_field.as_deref() == Some(name.as_slice()) {
                        let value = std::mem::take(&mut text);
                        assign_field(
                            partial,
                            &name,
                            value,
                            in_postmeta,
                            &mut category_domain,
                            &mut result,
                        );
                        current_field = None;
                    } else if name == b"wp:postmeta" && current_field.is_none() {
                        assign_field(
                            partial,
                            &name,
                            String::new(),
                            in_postmeta,
                            &mut category_domain,
                            &mut result,
                        );
                        in_postmeta = false;
                    }
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    // Second phase: resolve featured images against the attachment map
    for record in records {
        let mut post = record.post;
        if post.featured_image_url.is_none() {
            post.featured_image_url = record
                .thumbnail_id
                .as_ref()
                .and_then(|id| attachments.get(id))
                .cloned();
        }
        result.posts.push(post);
    }

    Ok(result)
}

fn assign_field(
    partial: &mut PartialItem,
    name: &[u8],
    value: String,
    in_postmeta: bool,
    category_domain: &mut Option<String>,
    result: &mut ParsedExport,
) {
    let trimmed = value.trim();
    match name {
        b"title" => partial.title = Some(trimmed.to_string()),
        b"wp:post_name" => partial.post_name = Some(trimmed.to_string()),
        b"content:encoded" => partial.content = Some(value),
        b"excerpt:encoded" => partial.excerpt = Some(trimmed.to_string()),
        b"dc:creator" => partial.creator = Some(trimmed.to_string()),
        b"wp:status" => partial.status = Some(trimmed.to_string()),
        b"wp:post_date" => partial.post_date = Some(trimmed.to_string()),
        b"wp:post_id" => partial.post_id = Some(trimmed.to_string()),
        b"wp:attachment_url" => partial.attachment_url = Some(trimmed.to_string()),
        b"wp:meta_key" if in_postmeta => partial.meta_key = Some(trimmed.to_string()),
        b"wp:meta_value" if in_postmeta => partial.meta_value = Some(trimmed.to_string()),
        b"wp:postmeta" => {
            if partial.meta_key.as_deref() == Some("_thumbnail_id") {
                partial.thumbnail_id = partial.meta_value.take();
            }
            partial.meta_key = None;
            partial.meta_value = None;
        }
        b"category" => {
            if !trimmed.is_empty() {
                match category_domain.take().as_deref() {
                    Some("category") => {
                        result.categories.insert(trimmed.to_string());
                    }
                    Some("post_tag") => {
                        result.tags.insert(trimmed.to_string());
                    }
                    _ => {}
                }
            } else {
                category_domain.take();
            }
        }
        _ => {}
    }
}

fn finish_item(
    partial: PartialItem,
    result: &mut ParsedExport,
    records: &mut Vec<RawRecord>,
    attachments: &mut HashMap<String, String>,
) {
    if let (Some(id), Some(url)) = (partial.post_id.as_ref(), partial.attachment_url.as_ref()) {
        attachments.insert(id.clone(), url.clone());
    }

    let title = match partial.title {
        Some(ref t) if !t.is_empty() => t.clone(),
        _ => {
            result
                .parse_errors
                .push(format!("item {}: missing title", result.item_count));
            return;
        }
    };

    records.push(RawRecord {
        post: ImportedPost {
            title,
            slug: partial.post_name.unwrap_or_default(),
            content: partial.content.unwrap_or_default(),
            excerpt: partial.excerpt.filter(|e| !e.is_empty()),
            author: partial.creator.filter(|a| !a.is_empty()),
            featured_image_url: partial.attachment_url,
            status: partial.status.unwrap_or_default(),
            published_at: partial.post_date.as_deref().and_then(parse_post_date),
        },
        thumbnail_id: partial.thumbnail_id,
    });
}

/// Parse the WordPress post date format; invalid dates are omitted, not errors
fn parse_post_date(raw: &str) -> Option<UtcDateTime> {
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S")
        .ok()
        .map(|naive| Utc.from_utc_datetime(&naive))
}
