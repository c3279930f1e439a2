//! Ruling lines read straight from page content streams.
//!
//! Lattice detection needs the lines and rectangles a page draws. When the
//! `pdfplumber` page reports no edges of its own, the page's content stream
//! is walked with `lopdf` and every axis-aligned stroke or fill becomes an
//! [`Edge`] that the table finder can use.

use std::cell::OnceCell;
use std::path::Path;

use lopdf::content::Operation;
use lopdf::{Document, Object, ObjectId};
use pdfplumber::{
    BBox, Ctm, Edge, EdgeSource, Orientation, Page, PageGeometry, Point, Table, TableFinder,
    TableSettings, WordOptions, extract_text_for_cells,
};

/// Parents walked when looking up an inherited page attribute.
const MAX_INHERIT_DEPTH: usize = 32;

/// Lazily opened `lopdf` view of a PDF, used to recover ruling lines.
///
/// The file is parsed on first use only, so documents whose pages already
/// carry edges never pay for a second parse.
pub struct RulingLines<'a> {
    path: &'a Path,
    doc: OnceCell<Option<Document>>,
}

impl<'a> RulingLines<'a> {
    pub fn new(path: &'a Path) -> Self {
        Self {
            path,
            doc: OnceCell::new(),
        }
    }

    /// Edges drawn on page `page_number` (1-based).
    ///
    /// An unreadable file or page yields no edges.
    pub fn page_edges(&self, page_number: usize, tolerance: f64) -> Vec<Edge> {
        let doc = self.doc.get_or_init(|| match Document::load(self.path) {
            Ok(doc) => Some(doc),
            Err(err) => {
                tracing::debug!(file = %self.path.display(), error = %err, "cannot read ruling lines");
                None
            }
        });
        match (doc, u32::try_from(page_number)) {
            (Some(doc), Ok(number)) => page_edges(doc, number, tolerance),
            _ => Vec::new(),
        }
    }
}

/// Edges drawn on page `page_number` (1-based) of `doc`.
// TODO: follow `Do` into form XObjects; tables drawn inside forms are missed.
pub fn page_edges(doc: &Document, page_number: u32, tolerance: f64) -> Vec<Edge> {
    let Some(&page_id) = doc.get_pages().get(&page_number) else {
        return Vec::new();
    };
    let Some(geometry) = page_geometry(doc, page_id) else {
        tracing::debug!(page = page_number, "page has no media box");
        return Vec::new();
    };
    match doc.get_and_decode_page_content(page_id) {
        Ok(content) => edges_from_operations(&content.operations, &geometry, tolerance),
        Err(err) => {
            tracing::debug!(page = page_number, error = %err, "cannot decode page content");
            Vec::new()
        }
    }
}

/// Display geometry of a page from its (possibly inherited) MediaBox,
/// CropBox and Rotate entries.
pub fn page_geometry(doc: &Document, page_id: ObjectId) -> Option<PageGeometry> {
    let media_box = inherited(doc, page_id, b"MediaBox").and_then(|obj| pdf_box(doc, obj))?;
    let crop_box = inherited(doc, page_id, b"CropBox").and_then(|obj| pdf_box(doc, obj));
    let rotation = inherited(doc, page_id, b"Rotate")
        .and_then(|obj| resolve(doc, obj).as_i64().ok())
        .and_then(|r| i32::try_from(r).ok())
        .unwrap_or(0);
    Some(PageGeometry::new(media_box, crop_box, rotation))
}

fn inherited<'a>(doc: &'a Document, page_id: ObjectId, key: &[u8]) -> Option<&'a Object> {
    let mut dict = doc.get_dictionary(page_id).ok()?;
    for _ in 0..MAX_INHERIT_DEPTH {
        if let Ok(value) = dict.get(key) {
            return Some(value);
        }
        let parent = dict.get(b"Parent").and_then(Object::as_reference).ok()?;
        dict = doc.get_dictionary(parent).ok()?;
    }
    None
}

fn resolve<'a>(doc: &'a Document, obj: &'a Object) -> &'a Object {
    doc.dereference(obj).map(|(_, target)| target).unwrap_or(obj)
}

/// A PDF rectangle array in the layout [`PageGeometry::new`] expects:
/// `top` holds the lower y and `bottom` the upper y.
fn pdf_box(doc: &Document, obj: &Object) -> Option<BBox> {
    let values: Vec<f64> = resolve(doc, obj)
        .as_array()
        .ok()?
        .iter()
        .filter_map(|v| resolve(doc, v).as_float().ok())
        .map(f64::from)
        .collect();
    let &[x0, y0, x1, y1] = values.as_slice() else {
        return None;
    };
    Some(BBox::new(x0.min(x1), y0.min(y1), x0.max(x1), y0.max(y1)))
}

/// Turn painted path segments into table edges in display coordinates.
///
/// Only segments within `tolerance` of horizontal or vertical and longer
/// than `tolerance` are kept. Curves end the current subpath; their end
/// point starts the next one.
pub fn edges_from_operations(
    ops: &[Operation],
    geometry: &PageGeometry,
    tolerance: f64,
) -> Vec<Edge> {
    let mut ctm = Ctm::identity();
    let mut saved: Vec<Ctm> = Vec::new();
    let mut path = PathState::default();
    let mut edges = Vec::new();

    for op in ops {
        let operands = &op.operands;
        match op.operator.as_str() {
            "q" => saved.push(ctm),
            "Q" => {
                if let Some(prev) = saved.pop() {
                    ctm = prev;
                }
            }
            "cm" => {
                if let Some([a, b, c, d, e, f]) = numbers::<6>(operands) {
                    ctm = Ctm::new(a, b, c, d, e, f).concat(&ctm);
                }
            }
            "m" => {
                if let Some([x, y]) = numbers::<2>(operands) {
                    path.move_to(ctm.transform_point(Point::new(x, y)));
                }
            }
            "l" => {
                if let Some([x, y]) = numbers::<2>(operands) {
                    path.line_to(ctm.transform_point(Point::new(x, y)));
                }
            }
            "c" => {
                if let Some([_, _, _, _, x, y]) = numbers::<6>(operands) {
                    path.move_to(ctm.transform_point(Point::new(x, y)));
                }
            }
            "v" | "y" => {
                if let Some([_, _, x, y]) = numbers::<4>(operands) {
                    path.move_to(ctm.transform_point(Point::new(x, y)));
                }
            }
            "re" => {
                if let Some([x, y, w, h]) = numbers::<4>(operands) {
                    let corners = [(x, y), (x + w, y), (x + w, y + h), (x, y + h)];
                    path.rectangle(corners.map(|(px, py)| ctm.transform_point(Point::new(px, py))));
                }
            }
            "h" => path.close(),
            "S" => path.paint(false, geometry, tolerance, &mut edges),
            "s" | "f" | "F" | "f*" | "B" | "B*" | "b" | "b*" => {
                path.paint(true, geometry, tolerance, &mut edges)
            }
            "n" => path.clear(),
            _ => {}
        }
    }
    edges
}

fn numbers<const N: usize>(operands: &[Object]) -> Option<[f64; N]> {
    if operands.len() < N {
        return None;
    }
    let mut out = [0.0; N];
    for (slot, obj) in out.iter_mut().zip(operands) {
        *slot = f64::from(obj.as_float().ok()?);
    }
    Some(out)
}

struct Subpath {
    points: Vec<Point>,
    closed: bool,
}

/// The path under construction, in user space already mapped through the CTM.
#[derive(Default)]
struct PathState {
    subpaths: Vec<Subpath>,
}

impl PathState {
    fn move_to(&mut self, p: Point) {
        self.subpaths.push(Subpath {
            points: vec![p],
            closed: false,
        });
    }

    fn line_to(&mut self, p: Point) {
        if let Some(sub) = self.subpaths.last_mut().filter(|s| !s.closed) {
            sub.points.push(p);
            return;
        }
        // After a close the current point is the start of the closed subpath.
        let start = self.subpaths.last().and_then(|s| s.points.first().copied());
        self.subpaths.push(Subpath {
            points: start.into_iter().chain([p]).collect(),
            closed: false,
        });
    }

    fn rectangle(&mut self, corners: [Point; 4]) {
        self.subpaths.push(Subpath {
            points: corners.to_vec(),
            closed: true,
        });
    }

    fn close(&mut self) {
        if let Some(sub) = self.subpaths.last_mut() {
            sub.closed = true;
        }
    }

    fn clear(&mut self) {
        self.subpaths.clear();
    }

    fn paint(
        &mut self,
        close_all: bool,
        geometry: &PageGeometry,
        tolerance: f64,
        edges: &mut Vec<Edge>,
    ) {
        for sub in &self.subpaths {
            let closing = (sub.closed || close_all)
                .then(|| sub.points.last().zip(sub.points.first()))
                .flatten();
            let segments = sub
                .points
                .windows(2)
                .map(|pair| (&pair[0], &pair[1]))
                .chain(closing);
            edges.extend(segments.filter_map(|(a, b)| edge_between(*a, *b, geometry, tolerance)));
        }
        self.clear();
    }
}

fn edge_between(a: Point, b: Point, geometry: &PageGeometry, tolerance: f64) -> Option<Edge> {
    let (ax, ay) = geometry.normalize_point(a.x, a.y);
    let (bx, by) = geometry.normalize_point(b.x, b.y);
    let (x0, x1) = (ax.min(bx), ax.max(bx));
    let (top, bottom) = (ay.min(by), ay.max(by));
    let (width, height) = (x1 - x0, bottom - top);

    if height <= tolerance && width > tolerance {
        let y = (top + bottom) / 2.0;
        Some(Edge {
            x0,
            top: y,
            x1,
            bottom: y,
            orientation: Orientation::Horizontal,
            source: EdgeSource::Line,
        })
    } else if width <= tolerance && height > tolerance {
        let x = (x0 + x1) / 2.0;
        Some(Edge {
            x0: x,
            top,
            x1: x,
            bottom,
            orientation: Orientation::Vertical,
            source: EdgeSource::Line,
        })
    } else {
        None
    }
}

/// Run the table finder over `edges` and fill cell text from the page's
/// characters, the way `Page::find_tables` does for its own edges.
pub fn find_tables_with_edges(page: &Page, edges: Vec<Edge>, settings: &TableSettings) -> Vec<Table> {
    let words = page.extract_words(&WordOptions::default());
    let mut tables = TableFinder::new_with_words(edges, words, settings.clone()).find_tables();
    for table in &mut tables {
        extract_text_for_cells(&mut table.cells, page.chars());
        for row in &mut table.rows {
            extract_text_for_cells(row, page.chars());
        }
    }
    if let Some(min_accuracy) = settings.min_accuracy {
        tables.retain(|t| t.accuracy() >= min_accuracy);
    }
    tables
}
