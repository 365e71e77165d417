//! Text containers: characters grouped into words, lines and boxes.
//!
//! The layout analyzer delivers text as a three-level hierarchy. Each level
//! aggregates the bounding box of its children and carries the non-stroking
//! color and font name when they are uniform across all leaves.

use crate::geometry::BoundingBox;

/// Non-stroking color as RGB components in the range `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    /// Red component
    pub r: f64,
    /// Green component
    pub g: f64,
    /// Blue component
    pub b: f64,
}

impl Color {
    /// Create a new color.
    pub fn new(r: f64, g: f64, b: f64) -> Self {
        Self { r, g, b }
    }
}

/// A single positioned character.
#[derive(Debug, Clone, PartialEq)]
pub struct TextChar {
    /// The character itself
    pub text: char,
    /// Bounding box of the glyph
    pub bbox: BoundingBox,
    /// Non-stroking color of the glyph, if known
    pub ncolor: Option<Color>,
    /// Font name of the glyph, if known
    pub fontname: Option<String>,
}

/// A word: one or more characters without intervening whitespace.
#[derive(Debug, Clone, PartialEq)]
pub struct Word {
    /// The characters forming the word
    pub chars: Vec<TextChar>,
}

/// A horizontal line of words.
#[derive(Debug, Clone, PartialEq)]
pub struct HorizontalLine {
    /// The words on the line, left to right
    pub words: Vec<Word>,
}

/// A rectangular cluster of one or more text lines.
#[derive(Debug, Clone, PartialEq)]
pub struct HorizontalBox {
    /// The lines in the box, top to bottom
    pub lines: Vec<HorizontalLine>,
}

fn aggregate_bbox<'a, I: Iterator<Item = &'a BoundingBox>>(mut boxes: I) -> BoundingBox {
    let first = match boxes.next() {
        Some(b) => *b,
        None => return BoundingBox::new(0.0, 0.0, 0.0, 0.0),
    };
    boxes.fold(first, |acc, b| acc.union(b))
}

/// Propagate an attribute upwards: `Some(value)` only when all children
/// agree on the same non-null value.
fn uniform<T: PartialEq + Clone, I: Iterator<Item = Option<T>>>(mut values: I) -> Option<T> {
    let first = values.next()??;
    for value in values {
        if value.as_ref() != Some(&first) {
            return None;
        }
    }
    Some(first)
}

impl Word {
    /// Plain text of the word.
    pub fn text(&self) -> String {
        self.chars.iter().map(|c| c.text).collect()
    }

    /// Bounding box aggregated over the characters.
    pub fn bbox(&self) -> BoundingBox {
        let boxes: Vec<BoundingBox> = self.chars.iter().map(|c| c.bbox).collect();
        aggregate_bbox(boxes.iter())
    }

    /// Color of the word if uniform across all characters.
    pub fn ncolor(&self) -> Option<Color> {
        uniform(self.chars.iter().map(|c| c.ncolor))
    }

    /// Font name of the word if uniform across all characters.
    pub fn fontname(&self) -> Option<String> {
        uniform(self.chars.iter().map(|c| c.fontname.clone()))
    }
}

impl HorizontalLine {
    /// Plain text of the line; words joined by a single space.
    pub fn text(&self) -> String {
        self.words
            .iter()
            .map(|w| w.text())
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Bounding box aggregated over the words.
    pub fn bbox(&self) -> BoundingBox {
        let boxes: Vec<BoundingBox> = self.words.iter().map(|w| w.bbox()).collect();
        aggregate_bbox(boxes.iter())
    }

    /// Color of the line if uniform across all words.
    pub fn ncolor(&self) -> Option<Color> {
        uniform(self.words.iter().map(|w| w.ncolor()))
    }

    /// Font name of the line if uniform across all words.
    pub fn fontname(&self) -> Option<String> {
        uniform(self.words.iter().map(|w| w.fontname()))
    }
}

impl HorizontalBox {
    /// Plain text of the box; lines joined by `\n`.
    pub fn text(&self) -> String {
        self.lines
            .iter()
            .map(|l| l.text())
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Bounding box aggregated over the lines.
    pub fn bbox(&self) -> BoundingBox {
        let boxes: Vec<BoundingBox> = self.lines.iter().map(|l| l.bbox()).collect();
        aggregate_bbox(boxes.iter())
    }

    /// Color of the box if uniform across all lines.
    pub fn ncolor(&self) -> Option<Color> {
        uniform(self.lines.iter().map(|l| l.ncolor()))
    }

    /// Font name of the box if uniform across all lines.
    pub fn fontname(&self) -> Option<String> {
        uniform(self.lines.iter().map(|l| l.fontname()))
    }
}
