//! Export: hand a [`RedesignedDocument`] to the PDF layout facility.
//!
//! This stage owns nothing clever — it maps the already-projected elements
//! onto `genpdf` primitives with a fixed page setup (A4, 10 mm margins) and
//! writes the result atomically. Export runs strictly after rendering and
//! its failure never invalidates the rendered document; callers keep the
//! structured result and can fall back to `--json`.
//!
//! ## Theme colors
//!
//! The header's hex tokens are styling hints. A token that fails to parse
//! falls back to plain ink — a bad color is a cosmetic defect, not an
//! export failure.

use crate::config::RedesignConfig;
use crate::error::RedesignError;
use crate::pipeline::render::{Element, RedesignedDocument};
use genpdf::elements::{
    Break, FrameCellDecorator, LinearLayout, Paragraph, TableLayout, UnorderedList,
};
use genpdf::{style, Alignment, Element as _, Margins, PaperSize, SimplePageDecorator};
use std::path::Path;
use tracing::{debug, info};

/// Fixed page margins in millimetres.
const MARGIN_MM: i32 = 10;
/// Base body font size in points.
const BODY_SIZE: u8 = 11;
/// Fixed suffix appended to derived output filenames.
const FILENAME_SUFFIX: &str = "_Redesign.pdf";

/// Derive the output filename from the document title: whitespace runs
/// become underscores, then the fixed suffix is appended.
pub fn suggested_filename(title: &str) -> String {
    let stem: Vec<&str> = title.split_whitespace().collect();
    format!("{}{}", stem.join("_"), FILENAME_SUFFIX)
}

/// Parse a `#rgb` or `#rrggbb` hex token into a genpdf color.
fn parse_hex_color(token: &str) -> Option<style::Color> {
    let hex = token.trim().strip_prefix('#')?;
    if !hex.is_ascii() {
        return None;
    }
    let (r, g, b) = match hex.len() {
        3 => {
            let d = |i: usize| u8::from_str_radix(&hex[i..i + 1], 16).ok().map(|v| v * 17);
            (d(0)?, d(1)?, d(2)?)
        }
        6 => {
            let d = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
            (d(0)?, d(2)?, d(4)?)
        }
        _ => return None,
    };
    Some(style::Color::Rgb(r, g, b))
}

/// Resolved styling hints for one export run.
struct Theme {
    primary: style::Color,
    secondary: style::Color,
}

impl Theme {
    fn from_header(primary: &str, secondary: &str) -> Self {
        Self {
            primary: parse_hex_color(primary).unwrap_or(style::Color::Rgb(17, 24, 39)),
            secondary: parse_hex_color(secondary).unwrap_or(style::Color::Rgb(100, 100, 100)),
        }
    }
}

/// Assemble the PDF and return its bytes.
pub fn render_pdf_bytes(
    document: &RedesignedDocument,
    config: &RedesignConfig,
) -> Result<Vec<u8>, RedesignError> {
    let font_family = genpdf::fonts::from_files(&config.font_dir, &config.font_family, None)
        .map_err(|e| RedesignError::ExportFailed {
            detail: format!(
                "could not load font family '{}' from '{}': {e}",
                config.font_family, config.font_dir
            ),
        })?;

    let mut doc = genpdf::Document::new(font_family);
    doc.set_title(document.header.title.as_str());
    doc.set_paper_size(PaperSize::A4);
    doc.set_font_size(BODY_SIZE);

    let mut decorator = SimplePageDecorator::new();
    decorator.set_margins(MARGIN_MM);
    doc.set_page_decorator(decorator);

    let theme = Theme::from_header(
        &document.header.primary_color,
        &document.header.secondary_color,
    );

    // ── Document header ──────────────────────────────────────────────────
    doc.push(
        Paragraph::new(document.header.title.as_str())
            .aligned(Alignment::Center)
            .styled(style::Style::new().bold().with_font_size(22).with_color(theme.primary)),
    );
    if let Some(code) = &document.header.subject_code {
        doc.push(
            Paragraph::new(code.as_str())
                .aligned(Alignment::Center)
                .styled(style::Style::new().with_font_size(10).with_color(theme.secondary)),
        );
    }
    doc.push(Break::new(1.0));

    // ── Sections, in order ───────────────────────────────────────────────
    for section in &document.sections {
        doc.push(
            Paragraph::new(section.title.as_str())
                .styled(style::Style::new().bold().with_font_size(15).with_color(theme.primary)),
        );
        doc.push(Break::new(0.5));

        for element in &section.elements {
            push_element(&mut doc, element, &theme)?;
            doc.push(Break::new(0.5));
        }
        doc.push(Break::new(0.5));
    }

    let mut bytes = Vec::new();
    doc.render(&mut bytes)
        .map_err(|e| RedesignError::ExportFailed {
            detail: e.to_string(),
        })?;

    debug!("Assembled PDF: {} bytes", bytes.len());
    Ok(bytes)
}

/// Export to a file with an atomic write (temp + rename).
pub fn export_pdf(
    document: &RedesignedDocument,
    config: &RedesignConfig,
    output_path: &Path,
) -> Result<(), RedesignError> {
    let bytes = render_pdf_bytes(document, config)?;

    if let Some(parent) = output_path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent).map_err(|e| RedesignError::OutputWriteFailed {
                path: output_path.to_path_buf(),
                source: e,
            })?;
        }
    }

    let tmp_path = output_path.with_extension("pdf.tmp");
    std::fs::write(&tmp_path, &bytes).map_err(|e| RedesignError::OutputWriteFailed {
        path: output_path.to_path_buf(),
        source: e,
    })?;
    std::fs::rename(&tmp_path, output_path).map_err(|e| RedesignError::OutputWriteFailed {
        path: output_path.to_path_buf(),
        source: e,
    })?;

    info!("Exported PDF to {}", output_path.display());
    Ok(())
}

/// Map one projected element onto genpdf primitives.
fn push_element(
    doc: &mut genpdf::Document,
    element: &Element,
    theme: &Theme,
) -> Result<(), RedesignError> {
    match element {
        Element::Paragraph(text) => {
            // One genpdf paragraph per source line keeps the embedded
            // line structure; blank lines become vertical space.
            for line in text.split('\n') {
                if line.trim().is_empty() {
                    doc.push(Break::new(0.5));
                } else {
                    doc.push(Paragraph::new(line));
                }
            }
        }
        Element::Bullets(items) => {
            if items.is_empty() {
                return Ok(());
            }
            let mut list = UnorderedList::new();
            for item in items {
                list.push(Paragraph::new(item.as_str()));
            }
            doc.push(list);
        }
        Element::Table(rows) => {
            if rows.is_empty() {
                return Ok(());
            }
            // The layout engine needs rectangular input; the projection
            // keeps ragged rows, so pad here with empty cells.
            let columns = rows.iter().map(|r| r.len()).max().unwrap_or(1).max(1);
            let mut table = TableLayout::new(vec![1; columns]);
            table.set_cell_decorator(FrameCellDecorator::new(true, true, false));

            for cells in rows {
                let mut row = table.row();
                for col in 0..columns {
                    let cell = cells.get(col).map(String::as_str).unwrap_or("");
                    row.push_element(Paragraph::new(cell).padded(1));
                }
                row.push().map_err(|e| RedesignError::ExportFailed {
                    detail: format!("table row: {e}"),
                })?;
            }
            doc.push(table);
        }
        Element::Subheading(text) => {
            doc.push(
                Paragraph::new(text.as_str())
                    .styled(style::Style::new().bold().with_font_size(12)),
            );
        }
        Element::Callout { label, body } => {
            let mut layout = LinearLayout::vertical();
            if let Some(label) = label {
                layout.push(
                    Paragraph::new(label.as_str()).styled(
                        style::Style::new()
                            .bold()
                            .with_font_size(9)
                            .with_color(theme.secondary),
                    ),
                );
            }
            for line in body.split('\n') {
                if !line.trim().is_empty() {
                    layout.push(Paragraph::new(line));
                }
            }
            doc.push(layout.padded(Margins::trbl(2, 3, 2, 3)).framed());
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filename_replaces_whitespace_runs() {
        assert_eq!(
            suggested_filename("Data Structures Unit 3"),
            "Data_Structures_Unit_3_Redesign.pdf"
        );
        assert_eq!(
            suggested_filename("  Operating\tSystems \n Notes "),
            "Operating_Systems_Notes_Redesign.pdf"
        );
    }

    #[test]
    fn hex_colors_parse() {
        assert!(matches!(
            parse_hex_color("#111827"),
            Some(style::Color::Rgb(0x11, 0x18, 0x27))
        ));
        assert!(matches!(
            parse_hex_color("#f59e0b"),
            Some(style::Color::Rgb(0xf5, 0x9e, 0x0b))
        ));
        assert!(matches!(
            parse_hex_color("#fff"),
            Some(style::Color::Rgb(255, 255, 255))
        ));
    }

    #[test]
    fn bad_hex_colors_fall_back() {
        assert!(parse_hex_color("teal").is_none());
        assert!(parse_hex_color("#12").is_none());
        assert!(parse_hex_color("#zzzzzz").is_none());
        // Theme substitutes ink rather than failing.
        let theme = Theme::from_header("nonsense", "");
        assert!(matches!(theme.primary, style::Color::Rgb(17, 24, 39)));
    }
}
