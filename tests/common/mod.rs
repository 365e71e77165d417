//! Shared in-memory PDF mock for the end-to-end tests.

use std::collections::HashMap;

use pdf_doctree::error::{Error, Result};
use pdf_doctree::geometry::BoundingBox;
use pdf_doctree::model::{HorizontalBox, HorizontalLine, TextChar, Word};
use pdf_doctree::object::{Dictionary, Object, ObjectRef};
use pdf_doctree::source::{LayoutObject, PageInfo, PdfSource, TableFinder, TableGrid};

/// Enable log output for a test run (`RUST_LOG=debug cargo test -- --nocapture`).
#[allow(dead_code)]
pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// An in-memory document: pages, objects, layout and annotations.
#[derive(Default)]
pub struct MockPdf {
    pub path: String,
    pub pages: Vec<PageInfo>,
    pub catalog: Dictionary,
    pub info: Option<Dictionary>,
    pub objects: HashMap<ObjectRef, Object>,
    pub page_refs: HashMap<ObjectRef, u32>,
    pub annotations: HashMap<u32, Vec<Object>>,
    pub layouts: HashMap<u32, Vec<LayoutObject>>,
}

impl MockPdf {
    pub fn new(page_count: u32) -> Self {
        let pages = (1..=page_count)
            .map(|number| PageInfo {
                number,
                width: 595.0,
                height: 842.0,
                media_top: 842.0,
            })
            .collect();
        Self {
            path: "/tmp/sample.pdf".to_string(),
            pages,
            ..Self::default()
        }
    }

    /// Register an object under `(id, 0)` and return the reference.
    pub fn add_object(&mut self, id: u32, object: Object) -> ObjectRef {
        let reference = ObjectRef::new(id, 0);
        self.objects.insert(reference, object);
        reference
    }

    /// Register a page object reference for destination resolution.
    pub fn add_page_ref(&mut self, id: u32, page: u32) -> ObjectRef {
        let reference = ObjectRef::new(id, 0);
        self.page_refs.insert(reference, page);
        self.objects.insert(
            reference,
            Object::Dictionary(Dictionary::from_iter([(
                "MediaBox".to_string(),
                Object::Array(vec![
                    Object::Integer(0),
                    Object::Integer(0),
                    Object::Integer(595),
                    Object::Integer(842),
                ]),
            )])),
        );
        reference
    }

    /// Install `/Outlines` pointing at `first`.
    pub fn set_outline(&mut self, first: ObjectRef) {
        let outlines = self.add_object(
            900,
            Object::Dictionary(Dictionary::from_iter([(
                "First".to_string(),
                Object::Reference(first),
            )])),
        );
        self.catalog
            .insert("Outlines".to_string(), Object::Reference(outlines));
    }

    /// Install a PDF 1.2 name tree with the given `(name, destination)`
    /// pairs.
    pub fn set_named_destinations(&mut self, entries: Vec<(String, Object)>) {
        let mut names = Vec::new();
        for (name, dest) in entries {
            names.push(Object::String(name.into_bytes()));
            names.push(dest);
        }
        let leaf = self.add_object(
            901,
            Object::Dictionary(Dictionary::from_iter([(
                "Names".to_string(),
                Object::Array(names),
            )])),
        );
        let names_dict = self.add_object(
            902,
            Object::Dictionary(Dictionary::from_iter([(
                "Dests".to_string(),
                Object::Reference(leaf),
            )])),
        );
        self.catalog
            .insert("Names".to_string(), Object::Reference(names_dict));
    }

    pub fn add_layout(&mut self, page: u32, object: LayoutObject) {
        self.layouts.entry(page).or_default().push(object);
    }

    pub fn add_text(&mut self, page: u32, textbox: HorizontalBox) {
        self.add_layout(page, LayoutObject::Text(textbox));
    }

    /// Add a Link annotation with a direct `/Dest`.
    pub fn add_link_annotation(&mut self, page: u32, rect: [f64; 4], dest: Object) {
        let dict = Object::Dictionary(Dictionary::from_iter([
            ("Subtype".to_string(), Object::Name("Link".to_string())),
            (
                "Rect".to_string(),
                Object::Array(rect.iter().map(|v| Object::Real(*v)).collect()),
            ),
            ("Dest".to_string(), dest),
        ]));
        self.annotations.entry(page).or_default().push(dict);
    }
}

impl PdfSource for MockPdf {
    fn path(&self) -> &str {
        &self.path
    }

    fn pages(&self) -> &[PageInfo] {
        &self.pages
    }

    fn catalog(&self) -> &Dictionary {
        &self.catalog
    }

    fn info(&self) -> Option<&Dictionary> {
        self.info.as_ref()
    }

    fn resolve(&self, reference: ObjectRef) -> Result<Object> {
        self.objects
            .get(&reference)
            .cloned()
            .ok_or_else(|| Error::MalformedCatalog(format!("unresolvable reference {}", reference)))
    }

    fn page_number_of(&self, reference: ObjectRef) -> Option<u32> {
        self.page_refs.get(&reference).copied()
    }

    fn page_annotations(&self, page: u32) -> Result<Vec<Object>> {
        Ok(self.annotations.get(&page).cloned().unwrap_or_default())
    }

    fn text_in_bbox(&self, page: u32, bbox: &BoundingBox) -> String {
        let mut out = String::new();
        if let Some(objects) = self.layouts.get(&page) {
            for object in objects {
                if let LayoutObject::Text(tb) = object {
                    for line in &tb.lines {
                        for word in &line.words {
                            for ch in &word.chars {
                                if bbox.encloses(&ch.bbox) {
                                    out.push(ch.text);
                                }
                            }
                        }
                    }
                }
            }
        }
        out
    }

    fn textbox_in_bbox(&self, page: u32, bbox: &BoundingBox) -> Option<HorizontalBox> {
        let grown = bbox.expand(0.1, 0.1);
        self.layouts.get(&page).and_then(|objects| {
            objects.iter().find_map(|object| match object {
                LayoutObject::Text(tb) if grown.encloses(&tb.bbox()) => Some(tb.clone()),
                _ => None,
            })
        })
    }

    fn layout(&self, page: u32) -> &[LayoutObject] {
        self.layouts.get(&page).map(Vec::as_slice).unwrap_or(&[])
    }
}

/// A finder returning preconfigured grids per page.
pub struct MockTables(pub Vec<(u32, TableGrid)>);

impl TableFinder for MockTables {
    fn find_tables(&self, page: u32) -> Vec<TableGrid> {
        self.0
            .iter()
            .filter(|(p, _)| *p == page)
            .map(|(_, grid)| grid.clone())
            .collect()
    }
}

/// A finder that never finds tables.
pub struct NoTables;

impl TableFinder for NoTables {
    fn find_tables(&self, _page: u32) -> Vec<TableGrid> {
        Vec::new()
    }
}

/// Build a one-line textbox whose glyphs are 10 pt wide.
///
/// Character `i` of the full text (spaces included) covers
/// `x0 + i*10 .. x0 + (i+1)*10`, which makes annotation rectangles easy to
/// aim at character ranges.
pub fn textbox(text: &str, x0: f64, y0: f64, y1: f64) -> HorizontalBox {
    let step = 10.0;
    let words = text
        .split(' ')
        .scan(0usize, |offset, word| {
            let start = *offset;
            *offset += word.chars().count() + 1;
            Some((start, word))
        })
        .map(|(start, word)| Word {
            chars: word
                .chars()
                .enumerate()
                .map(|(i, c)| TextChar {
                    text: c,
                    bbox: BoundingBox::new(
                        x0 + (start + i) as f64 * step,
                        y0,
                        x0 + (start + i + 1) as f64 * step,
                        y1,
                    ),
                    ncolor: None,
                    fontname: None,
                })
                .collect(),
        })
        .collect();
    HorizontalBox {
        lines: vec![HorizontalLine { words }],
    }
}

/// An outline node dictionary with a direct `/Dest`.
pub fn outline_node(
    title: &str,
    dest: Object,
    next: Option<ObjectRef>,
    first: Option<ObjectRef>,
) -> Object {
    let mut dict = Dictionary::from_iter([
        (
            "Title".to_string(),
            Object::String(title.as_bytes().to_vec()),
        ),
        ("Dest".to_string(), dest),
    ]);
    if let Some(next) = next {
        dict.insert("Next".to_string(), Object::Reference(next));
    }
    if let Some(first) = first {
        dict.insert("First".to_string(), Object::Reference(first));
    }
    Object::Dictionary(dict)
}

/// An explicit `/XYZ` destination array.
pub fn xyz(page_ref: ObjectRef, x: f64, y: f64) -> Object {
    Object::Array(vec![
        Object::Reference(page_ref),
        Object::Name("XYZ".to_string()),
        Object::Real(x),
        Object::Real(y),
        Object::Integer(0),
    ])
}
