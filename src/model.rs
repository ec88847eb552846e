//! Transport data model: the source document and the structured redesign.
//!
//! These types mirror the wire contract with the document model exactly.
//! [`RedesignResult`] is created once per successful call, is immutable
//! thereafter, and flows unchanged through rendering and export — section
//! order and block order are never re-sorted or deduplicated.
//!
//! ## Block tags
//!
//! [`Block`] is a closed sum type over the five block kinds the design
//! prompt asks for. The producing model is external and not schema-enforced
//! at the transport layer, so a sixth carrier variant, [`Block::Unknown`],
//! preserves any foreign tag through parsing. The renderer's exhaustive
//! match turns that carrier into a block-scoped [`crate::error::BlockError`]
//! instead of failing the whole document. Serde goes through an explicit
//! wire representation ([`BlockRepr`]) so the `type`/`content`/`label` shape
//! round-trips field-for-field.

use serde::{Deserialize, Serialize};

/// The raw uploaded document: bytes, declared media type, display name.
///
/// Immutable once captured; owned solely by the request that consumes it
/// and discarded after the model call returns or fails.
#[derive(Debug, Clone)]
pub struct SourceFile {
    /// Raw file bytes as read from disk or downloaded.
    pub bytes: Vec<u8>,
    /// IANA media type, e.g. `application/pdf` or `image/png`.
    pub media_type: String,
    /// Display name (the file name component of the input).
    pub name: String,
}

impl SourceFile {
    pub fn new(bytes: Vec<u8>, media_type: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            bytes,
            media_type: media_type.into(),
            name: name.into(),
        }
    }
}

/// The structured output of one redesign request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RedesignResult {
    /// Non-empty display title. Wire field: `documentTitle`.
    #[serde(rename = "documentTitle")]
    pub title: String,

    /// Optional short course/subject identifier, e.g. `BCS304`.
    #[serde(rename = "subjectCode", skip_serializing_if = "Option::is_none")]
    pub subject_code: Option<String>,

    /// Presentation color tokens. Styling hints only — never alter content.
    #[serde(rename = "themeColors")]
    pub theme_colors: ThemeColors,

    /// Ordered sections in document reading order.
    pub sections: Vec<Section>,
}

/// A pair of color tokens used for presentation only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThemeColors {
    /// Main accent, typically a dark ink color (hex string).
    pub primary: String,
    /// Secondary accent for labels and rules (hex string).
    pub secondary: String,
}

/// One titled region of the redesigned document.
///
/// A section with zero blocks is legal and renders as a bare heading.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Section {
    pub title: String,
    pub blocks: Vec<Block>,
}

/// One typed unit of content within a section.
///
/// `content` is mandatory for every kind (empty is legal and renders as
/// blank). `label` is meaningful only for callouts and ignored elsewhere.
#[derive(Debug, Clone, PartialEq)]
#[derive(Serialize, Deserialize)]
#[serde(from = "BlockRepr", into = "BlockRepr")]
pub enum Block {
    /// Flowing explanatory text.
    Paragraph { content: String },
    /// Line-delimited bullet items; the renderer does not re-parse bullet
    /// syntax beyond honoring the embedded line breaks.
    List { content: String },
    /// Pipe-delimited tabular markup, e.g. `|Op|Complexity|`.
    Table { content: String },
    /// A lower-level heading nested under the section title.
    Subheading { content: String },
    /// A visually emphasized box, optionally tagged with a short label
    /// such as `EXAM TIP` or `KEY DEFINITION`.
    Callout {
        content: String,
        label: Option<String>,
    },
    /// A tag this renderer does not recognize, kept so the block can be
    /// reported (and skipped) at render time rather than failing the parse.
    Unknown { kind: String, content: String },
}

impl Block {
    /// The wire tag for this block.
    pub fn kind(&self) -> &str {
        match self {
            Block::Paragraph { .. } => "paragraph",
            Block::List { .. } => "list",
            Block::Table { .. } => "table",
            Block::Subheading { .. } => "subheading",
            Block::Callout { .. } => "callout",
            Block::Unknown { kind, .. } => kind,
        }
    }

    /// The block's content string.
    pub fn content(&self) -> &str {
        match self {
            Block::Paragraph { content }
            | Block::List { content }
            | Block::Table { content }
            | Block::Subheading { content }
            | Block::Callout { content, .. }
            | Block::Unknown { content, .. } => content,
        }
    }
}

/// Exact wire shape of a block: `{"type": ..., "content": ..., "label"?: ...}`.
///
/// `content` is required with no default — a block without it fails the
/// parse (and therefore the whole request). `label` is carried only for
/// callouts; on any other tag it is dropped during conversion.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BlockRepr {
    #[serde(rename = "type")]
    kind: String,
    content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    label: Option<String>,
}

impl From<BlockRepr> for Block {
    fn from(repr: BlockRepr) -> Self {
        let BlockRepr {
            kind,
            content,
            label,
        } = repr;
        match kind.as_str() {
            "paragraph" => Block::Paragraph { content },
            "list" => Block::List { content },
            "table" => Block::Table { content },
            "subheading" => Block::Subheading { content },
            "callout" => Block::Callout { content, label },
            _ => Block::Unknown { kind, content },
        }
    }
}

impl From<Block> for BlockRepr {
    fn from(block: Block) -> Self {
        match block {
            Block::Paragraph { content } => BlockRepr {
                kind: "paragraph".into(),
                content,
                label: None,
            },
            Block::List { content } => BlockRepr {
                kind: "list".into(),
                content,
                label: None,
            },
            Block::Table { content } => BlockRepr {
                kind: "table".into(),
                content,
                label: None,
            },
            Block::Subheading { content } => BlockRepr {
                kind: "subheading".into(),
                content,
                label: None,
            },
            Block::Callout { content, label } => BlockRepr {
                kind: "callout".into(),
                content,
                label,
            },
            Block::Unknown { kind, content } => BlockRepr {
                kind,
                content,
                label: None,
            },
        }
    }
}
