//! The root of the extracted document tree.

use crate::model::chapter::Chapter;
use crate::model::element::Element;
use crate::model::figure::Figure;
use crate::model::file::File;
use crate::model::page::Page;
use crate::model::paragraph::Paragraph;
use crate::model::rect::Rect;
use crate::model::table::Table;

/// Main entry point to the extracted document model.
///
/// The root exclusively owns the file record, the pages, and the top-level
/// content list; chapters in turn own their nested content. The flattened
/// accessors walk the tree in document order.
#[derive(Debug, Clone, PartialEq)]
pub struct Root {
    /// The extracted file
    pub file: File,
    /// The extracted pages, in ascending page-number order
    pub pages: Vec<Page>,
    /// Top-level content: elements above the first chapter, then the
    /// outline-nested chapters
    pub content: Vec<Element>,
}

impl Root {
    /// Look up a page by its 1-based number.
    pub fn page(&self, number: u32) -> Option<&Page> {
        self.pages.iter().find(|p| p.number == number)
    }

    /// All elements of the tree in document order (pre-order walk).
    pub fn elements(&self) -> Vec<&Element> {
        let mut out = Vec::new();
        fn walk<'a>(elements: &'a [Element], out: &mut Vec<&'a Element>) {
            for element in elements {
                out.push(element);
                walk(element.content(), out);
            }
        }
        walk(&self.content, &mut out);
        out
    }

    /// All chapters of the tree, flattened in document order.
    pub fn chapters(&self) -> Vec<&Chapter> {
        self.elements()
            .into_iter()
            .filter_map(|e| match e {
                Element::Chapter(c) => Some(c),
                _ => None,
            })
            .collect()
    }

    /// All paragraphs of the tree, flattened in document order.
    pub fn paragraphs(&self) -> Vec<&Paragraph> {
        self.elements()
            .into_iter()
            .filter_map(|e| match e {
                Element::Paragraph(p) => Some(p),
                _ => None,
            })
            .collect()
    }

    /// All tables of the tree, flattened in document order.
    pub fn tables(&self) -> Vec<&Table> {
        self.elements()
            .into_iter()
            .filter_map(|e| match e {
                Element::Table(t) => Some(t),
                _ => None,
            })
            .collect()
    }

    /// All figures of the tree, flattened in document order.
    pub fn figures(&self) -> Vec<&Figure> {
        self.elements()
            .into_iter()
            .filter_map(|e| match e {
                Element::Figure(f) => Some(f),
                _ => None,
            })
            .collect()
    }

    /// All rects of the tree, flattened in document order.
    pub fn rects(&self) -> Vec<&Rect> {
        self.elements()
            .into_iter()
            .filter_map(|e| match e {
                Element::Rect(r) => Some(r),
                _ => None,
            })
            .collect()
    }
}
