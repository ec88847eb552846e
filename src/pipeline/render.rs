//! Rendering: project a [`RedesignResult`] into a print-oriented document.
//!
//! Each render is a full, stateless projection — no caching, no diffing, no
//! incremental update. Section order and block order come out exactly as
//! they went in; the projection never re-sorts or deduplicates.
//!
//! ## Unknown block types
//!
//! The producing model is external and not schema-enforced at the transport
//! layer, so a foreign `type` tag can reach this stage. The match below is
//! exhaustive with the [`Block::Unknown`] carrier as its explicit else arm:
//! the offending block is skipped, a [`BlockError`] is recorded on the
//! document, and everything else still renders.

use crate::error::BlockError;
use crate::model::{Block, RedesignResult};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::warn;

/// The ordered visual structure handed to display, print, or export.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RedesignedDocument {
    pub header: DocumentHeader,
    /// Titled regions in document reading order.
    pub sections: Vec<RenderedSection>,
    /// Block-scoped problems encountered during projection. Non-fatal —
    /// the document around them is complete.
    pub issues: Vec<BlockError>,
}

/// Document-level header metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentHeader {
    pub title: String,
    pub subject_code: Option<String>,
    /// Styling hints only; textual content is never derived from these.
    pub primary_color: String,
    pub secondary_color: String,
}

/// One titled region with its projected elements in order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderedSection {
    pub title: String,
    pub elements: Vec<Element>,
}

/// One visual element. Each [`Block`] variant maps to exactly one of these.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Element {
    /// Flowing text, whitespace preserved.
    Paragraph(String),
    /// Bulleted items, one per source line.
    Bullets(Vec<String>),
    /// Rows of cells. Rows may be ragged — column counts are not validated
    /// here; malformed markup comes through as-is.
    Table(Vec<Vec<String>>),
    /// A lower-level heading nested under the section title.
    Subheading(String),
    /// A visually distinguished box with an optional short label tag.
    Callout {
        label: Option<String>,
        body: String,
    },
}

/// Project the redesign into its visual document.
///
/// Never fails: block-level problems are recorded on
/// [`RedesignedDocument::issues`] and the rest of the document renders.
pub fn render(result: &RedesignResult) -> RedesignedDocument {
    let mut issues = Vec::new();

    let sections = result
        .sections
        .iter()
        .enumerate()
        .map(|(section_idx, section)| {
            let mut elements = Vec::with_capacity(section.blocks.len());
            for (block_idx, block) in section.blocks.iter().enumerate() {
                match block {
                    Block::Paragraph { content } => {
                        elements.push(Element::Paragraph(content.clone()));
                    }
                    Block::List { content } => {
                        elements.push(Element::Bullets(split_items(content)));
                    }
                    Block::Table { content } => {
                        elements.push(Element::Table(split_table(content)));
                    }
                    Block::Subheading { content } => {
                        elements.push(Element::Subheading(content.clone()));
                    }
                    Block::Callout { content, label } => {
                        elements.push(Element::Callout {
                            // An empty label renders nothing, same as none.
                            label: label
                                .as_deref()
                                .map(str::trim)
                                .filter(|l| !l.is_empty())
                                .map(String::from),
                            body: content.clone(),
                        });
                    }
                    Block::Unknown { kind, .. } => {
                        let issue = BlockError::UnknownType {
                            section: section_idx,
                            block: block_idx,
                            kind: kind.clone(),
                        };
                        warn!("{issue}");
                        issues.push(issue);
                    }
                }
            }
            RenderedSection {
                title: section.title.clone(),
                elements,
            }
        })
        .collect();

    RedesignedDocument {
        header: DocumentHeader {
            title: result.title.clone(),
            subject_code: result.subject_code.clone(),
            primary_color: result.theme_colors.primary.clone(),
            secondary_color: result.theme_colors.secondary.clone(),
        },
        sections,
        issues,
    }
}

/// Split list content into items — line breaks only, no bullet-syntax
/// parsing. Leading `- `/`• ` markers are left untouched.
fn split_items(content: &str) -> Vec<String> {
    content
        .lines()
        .map(|line| line.to_string())
        .filter(|line| !line.trim().is_empty())
        .collect()
}

/// A row whose cells are all `---` / `:--:` style markers: layout markup,
/// not data.
static RE_SEPARATOR_CELL: Lazy<Regex> = Lazy::new(|| Regex::new(r"^:?-+:?$").unwrap());

/// Split pipe-delimited table markup into rows of cells.
///
/// Outer pipes are stripped, cells are trimmed, separator rows dropped.
/// Column counts are intentionally not reconciled across rows.
fn split_table(content: &str) -> Vec<Vec<String>> {
    content
        .lines()
        .filter(|line| !line.trim().is_empty())
        .map(|line| {
            line.trim()
                .trim_start_matches('|')
                .trim_end_matches('|')
                .split('|')
                .map(|cell| cell.trim().to_string())
                .collect::<Vec<String>>()
        })
        .filter(|cells| {
            !cells
                .iter()
                .all(|cell| RE_SEPARATOR_CELL.is_match(cell))
        })
        .collect()
}
