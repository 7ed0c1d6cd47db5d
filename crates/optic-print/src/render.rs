//! PDF output: draws paginated lines with the builtin Helvetica font.

use std::io::BufWriter;

use optic_core::Receipt;
use printpdf::{BuiltinFont, IndirectFontRef, Mm, PdfDocument, PdfDocumentReference, Pt};
use tracing::debug;

use crate::error::{RenderError, RenderResult};
use crate::layout::{self, Placed, PAGE_HEIGHT, PAGE_WIDTH};
use crate::RenderOptions;

const LAYER_NAME: &str = "Layer 1";

/// Renders a receipt as a complete A4 PDF document.
///
/// The document is built in memory and returned whole. On any failure no
/// bytes are returned.
pub fn render_receipt(receipt: &Receipt, options: &RenderOptions) -> RenderResult<Vec<u8>> {
    let lines = layout::receipt_lines(receipt, options);
    let pages = layout::paginate(&lines);

    let doc = compose(&options.title, &pages)?;
    let bytes = finish(doc)?;

    debug!(
        pages = pages.len(),
        items = receipt.products.len(),
        bytes = bytes.len(),
        "Rendered receipt document"
    );
    Ok(bytes)
}

fn page_size() -> (Mm, Mm) {
    (Mm::from(Pt(PAGE_WIDTH)), Mm::from(Pt(PAGE_HEIGHT)))
}

fn compose(title: &str, pages: &[Vec<Placed>]) -> RenderResult<PdfDocumentReference> {
    let (width, height) = page_size();
    let (doc, first_page, first_layer) = PdfDocument::new(title, width, height, LAYER_NAME);

    let font = doc
        .add_builtin_font(BuiltinFont::Helvetica)
        .map_err(|e| RenderError::Content(e.to_string()))?;

    let mut targets = vec![(first_page, first_layer)];
    for _ in 1..pages.len() {
        targets.push(doc.add_page(width, height, LAYER_NAME));
    }

    for (placed, (page, layer)) in pages.iter().zip(targets) {
        let layer = doc.get_page(page).get_layer(layer);
        for item in placed {
            draw(&layer, &font, item)?;
        }
    }

    Ok(doc)
}

fn draw(layer: &printpdf::PdfLayerReference, font: &IndirectFontRef, item: &Placed) -> RenderResult<()> {
    if !(item.x.is_finite() && item.y.is_finite() && item.size > 0.0) {
        return Err(RenderError::Content(format!(
            "invalid placement for {:?}",
            item.text
        )));
    }
    layer.use_text(
        item.text.as_str(),
        item.size,
        Mm::from(Pt(item.x)),
        Mm::from(Pt(item.y)),
        font,
    );
    Ok(())
}

fn finish(doc: PdfDocumentReference) -> RenderResult<Vec<u8>> {
    let mut writer = BufWriter::new(Vec::<u8>::new());
    doc.save(&mut writer)
        .map_err(|e| RenderError::Stream(e.to_string()))?;
    writer
        .into_inner()
        .map_err(|e| RenderError::Stream(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use printpdf::lopdf::content::Content;
    use printpdf::lopdf::{Document, Object};
    use serde_json::json;

    /// Text operands of every page, bytes read as Latin-1.
    fn drawn_text(bytes: &[u8]) -> Vec<String> {
        let doc = Document::load_mem(bytes).unwrap();
        let mut texts = Vec::new();
        for page_id in doc.get_pages().into_values() {
            let content = Content::decode(&doc.get_page_content(page_id).unwrap()).unwrap();
            for op in content.operations {
                if op.operator != "Tj" && op.operator != "TJ" {
                    continue;
                }
                for operand in op.operands {
                    let strings = match operand {
                        Object::Array(items) => items,
                        other => vec![other],
                    };
                    for string in strings {
                        if let Object::String(raw, _) = string {
                            texts.push(raw.iter().map(|&b| b as char).collect());
                        }
                    }
                }
            }
        }
        texts
    }

    #[test]
    fn test_renders_pdf_bytes() {
        let receipt = Receipt::from_value(
            &json!({
                "client_name": "Karim",
                "products": [ {"name": "Frame", "price": 100, "quantity": 1} ],
                "discount": 10
            }),
            Utc::now(),
        );

        let bytes = render_receipt(&receipt, &RenderOptions::default()).unwrap();

        assert!(bytes.starts_with(b"%PDF"));
        assert!(bytes.len() > 500);
    }

    #[test]
    fn test_drawn_text_keeps_minus_and_marks_unencodable() {
        let receipt = Receipt::from_value(
            &json!({
                "client_name": "Karim كريم",
                "right_eye": {"sph": "\u{2212}1.25", "cyl": "", "axe": "90"},
                "products": [ {"name": "Frame", "price": 100} ]
            }),
            Utc::now(),
        );

        let bytes = render_receipt(&receipt, &RenderOptions::default()).unwrap();
        let texts = drawn_text(&bytes);

        assert!(texts.iter().any(|t| t == "SPH: -1.25 CYL: N/A AXE: 90"), "{texts:?}");
        assert!(texts.iter().any(|t| t == "Client: Karim ????"), "{texts:?}");
        assert!(texts.iter().any(|t| t == "Frame x1 @ $100.00 = $100.00"));
    }

    #[test]
    fn test_renders_receipt_without_prescriptions() {
        let receipt = Receipt::from_value(&json!({}), Utc::now());

        let bytes = render_receipt(&receipt, &RenderOptions::default()).unwrap();

        assert!(bytes.starts_with(b"%PDF"));
    }

    #[test]
    fn test_renders_multi_page_receipt() {
        let products: Vec<_> = (0..150)
            .map(|i| json!({ "name": format!("Contact Lens Box {i}"), "price": 25, "quantity": 2 }))
            .collect();
        let receipt = Receipt::from_value(&json!({ "products": products }), Utc::now());

        let bytes = render_receipt(&receipt, &RenderOptions::default()).unwrap();

        assert!(bytes.starts_with(b"%PDF"));
    }

    #[test]
    fn test_invalid_placement_is_a_content_error() {
        let (doc, page, layer) = PdfDocument::new("t", Mm(210.0), Mm(297.0), LAYER_NAME);
        let font = doc.add_builtin_font(BuiltinFont::Helvetica).unwrap();
        let layer = doc.get_page(page).get_layer(layer);

        let err = draw(
            &layer,
            &font,
            &Placed {
                text: "x".to_string(),
                size: 12.0,
                x: f32::NAN,
                y: 100.0,
            },
        )
        .unwrap_err();

        assert!(matches!(err, RenderError::Content(_)));
    }
}
