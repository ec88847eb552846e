//! Prompts and the response-schema declaration for the redesign request.
//!
//! Centralising every prompt here serves two purposes:
//!
//! 1. **Single source of truth** — changing the design rules (e.g. adding a
//!    block kind or adjusting table guidance) requires editing exactly one
//!    place, and the schema below must change in lockstep with
//!    [`crate::model::Block`].
//!
//! 2. **Testability** — unit tests can import and inspect prompts and schema
//!    directly without a live model call, making contract regressions easy
//!    to catch.
//!
//! Callers can override the system instruction via
//! [`crate::config::RedesignConfig::system_instruction`]; the constants here
//! are used only when no override is provided.

use serde_json::{json, Value};

/// Default system instruction for the document redesign request.
///
/// Used when `RedesignConfig::system_instruction` is `None`.
pub const SYSTEM_INSTRUCTION: &str = r#"You are a world-class academic document designer.
Your goal is to transform raw notes into a high-end, textbook-quality document.

STRICT DESIGN RULES:
1. NO DIAGRAMS: Do not generate Mermaid code or diagrams.
2. VISUAL HIERARCHY: Use 'callout' boxes for Key Definitions, Exam Tips, and Memory Tricks.
3. COMPARISON TABLES: Convert all comparisons, differences, or multi-attribute lists into professional Markdown tables.
4. VERBATIM CONTENT: Do not summarize or omit technical details. Ensure every concept from the source is included.
5. NO PLACEHOLDERS: Never output text like "[Insert Image Here]" or empty boxes.
6. STRUCTURE: Break the content into logical 'sections'. Each section should have clear 'blocks'.

BLOCK TYPES:
- 'paragraph': For standard explanations.
- 'list': For bulleted points, one item per line.
- 'table': Use for comparisons/lists with attributes. Format: Markdown | col | col |
- 'callout': For highlighted boxes. Labels: "KEY DEFINITION", "EXAM TIP", "MEMORY TRICK".
- 'subheading': For internal section titles.

OUTPUT: Valid JSON only. Do not include markdown code blocks."#;

/// The user turn accompanying the inline document payload.
pub const USER_PROMPT: &str = "Redesign this document into a professional, visual, and \
easy-to-read textbook layout. Use tables and callout boxes extensively. Do NOT use \
diagrams. Preserve all content verbatim.";

/// The response schema declared on the request.
///
/// Declares the redesign shape exactly: required `documentTitle`,
/// `themeColors` with both sub-fields, and `sections` whose entries require
/// `title` and `blocks`, each block requiring `type` and `content`. The
/// model is still external — the parser re-validates everything on the way
/// back in.
pub fn response_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "documentTitle": { "type": "STRING" },
            "subjectCode": { "type": "STRING" },
            "themeColors": {
                "type": "OBJECT",
                "properties": {
                    "primary": { "type": "STRING" },
                    "secondary": { "type": "STRING" }
                },
                "required": ["primary", "secondary"]
            },
            "sections": {
                "type": "ARRAY",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "title": { "type": "STRING" },
                        "blocks": {
                            "type": "ARRAY",
                            "items": {
                                "type": "OBJECT",
                                "properties": {
                                    "type": {
                                        "type": "STRING",
                                        "description": "paragraph, list, table, callout, or subheading"
                                    },
                                    "content": { "type": "STRING" },
                                    "label": {
                                        "type": "STRING",
                                        "description": "Only for callouts: e.g. EXAM TIP"
                                    }
                                },
                                "required": ["type", "content"]
                            }
                        }
                    },
                    "required": ["title", "blocks"]
                }
            }
        },
        "required": ["documentTitle", "themeColors", "sections"]
    })
}
