#![allow(dead_code)]

use std::path::{Path, PathBuf};

use assert_cmd::Command;
use lopdf::{Document, Object, Stream, dictionary};

/// `jadval` with a clean environment.
pub fn cmd() -> Command {
    let mut cmd = Command::cargo_bin("jadval").unwrap();
    cmd.env_remove("RUST_LOG")
        .env_remove("JADVAL_CONFIG")
        .env_remove("JADVAL_OUTPUT_DIR");
    cmd
}

/// A ruled 2x2 table (`AB | CD` / `EF | GH`) with a title line above it and
/// five lines below it.
pub const TABLE_PAGE: &[u8] = b"
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
    BT /F1 10 Tf 100 725 Td (Title) Tj ET
    BT /F1 10 Tf 100 645 Td (L1) Tj ET
    BT /F1 10 Tf 100 633 Td (L2) Tj ET
    BT /F1 10 Tf 100 621 Td (L3) Tj ET
    BT /F1 10 Tf 100 609 Td (L4) Tj ET
    BT /F1 10 Tf 100 597 Td (L5) Tj ET
";

pub const TEXT_PAGE: &[u8] = b"BT /F1 12 Tf 72 720 Td (Hello World) Tj ET";

/// Write a PDF with one Letter-sized page per content stream.
pub fn write_pdf(dir: &Path, name: &str, contents: &[&[u8]]) -> PathBuf {
    let mut doc = Document::with_version("1.5");

    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
    });
    let pages_id = doc.new_object_id();

    let kids: Vec<Object> = contents
        .iter()
        .map(|content| {
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
                    "Font" => dictionary! { "F1" => Object::Reference(font_id) },
                },
            });
            Object::Reference(page_id)
        })
        .collect();

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

    let path = dir.join(name);
    doc.save(&path).unwrap();
    path
}
