//! PDF fixtures built with lopdf.

#![allow(dead_code)]

use std::path::{Path, PathBuf};

use lopdf::{Document, Object, Stream, dictionary};

/// A ruled 2x2 table with two title lines above and five lines below.
///
/// Table grid spans x 100..300 and PDF y 660..700 (top 92, bottom 132 in
/// top-down page coordinates). Cells read `AB | CD` / `EF | GH`.
pub const CAPTIONED_TABLE: &[u8] = b"
    1 w
    100 700 m 300 700 l S
    100 680 m 300 680 l S
    100 660 m 300 660 l S
    100 700 m 100 660 l S
    200 700 m 200 660 l S
    300 700 m 300 660 l S
    BT /F1 10 Tf 110 685 Td (AB) Tj ET
    BT /F1 10 Tf 210 685 Td (CD) Tj ET
    BT /F1 10 Tf 110 665 Td (EF) Tj ET
    BT /F1 10 Tf 210 665 Td (GH) Tj ET
    BT /F1 10 Tf 100 745 Td (Alpha) Tj ET
    BT /F1 10 Tf 100 725 Td (Beta) Tj ET
    BT /F1 10 Tf 100 645 Td (L1) Tj ET
    BT /F1 10 Tf 100 633 Td (L2) Tj ET
    BT /F1 10 Tf 100 621 Td (L3) Tj ET
    BT /F1 10 Tf 100 609 Td (L4) Tj ET
    BT /F1 10 Tf 100 597 Td (L5) Tj ET
";

/// The same 2x2 table drawn as four stroked cell rectangles, no captions.
pub const BOXED_TABLE: &[u8] = b"
    1 w
    100 680 100 20 re S
    200 680 100 20 re S
    100 660 100 20 re S
    200 660 100 20 re S
    BT /F1 10 Tf 110 685 Td (AB) Tj ET
    BT /F1 10 Tf 210 685 Td (CD) Tj ET
    BT /F1 10 Tf 110 665 Td (EF) Tj ET
    BT /F1 10 Tf 210 665 Td (GH) Tj ET
";

/// Plain text, no table.
pub const TEXT_ONLY: &[u8] = b"BT /F1 12 Tf 72 720 Td (Hello World) Tj ET";

/// No content at all, like a scanned page without a text layer.
pub const BLANK: &[u8] = b"";

/// Build a PDF with one Letter-sized page per content stream.
pub fn pdf_with_pages(contents: &[&[u8]]) -> Vec<u8> {
    let mut doc = Document::with_version("1.5");

    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
    });
    let pages_id = doc.new_object_id();

    let mut kids = Vec::new();
    for content in contents {
        let content_id = doc.add_object(Stream::new(dictionary! {}, content.to_vec()));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => Object::Reference(pages_id),
            "MediaBox" => vec![
                Object::Integer(0),
                Object::Integer(0),
                Object::Integer(612),
                Object::Integer(792),
            ],
            "Contents" => Object::Reference(content_id),
            "Resources" => dictionary! {
                "Font" => dictionary! {
                    "F1" => Object::Reference(font_id),
                },
            },
        });
        kids.push(Object::Reference(page_id));
    }

    let count = kids.len() as i64;
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => Object::Integer(count),
        }),
    );

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => Object::Reference(pages_id),
    });
    doc.trailer.set("Root", Object::Reference(catalog_id));

    let mut buf = Vec::new();
    doc.save_to(&mut buf).unwrap();
    buf
}

/// Write a PDF into `dir` and return its path.
pub fn write_pdf(dir: &Path, name: &str, contents: &[&[u8]]) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, pdf_with_pages(contents)).unwrap();
    path
}
