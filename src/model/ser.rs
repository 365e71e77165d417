//! Serialization of the document model.
//!
//! The structured output follows a fixed contract: every element starts with
//! its `id`, per-scope `idx` counters and parent links are internal and never
//! serialized, page references collapse to the page identifier, and textboxes
//! flatten to their plain `text`.

use serde::ser::{Serialize, SerializeSeq, SerializeStruct, Serializer};

use crate::model::chapter::Chapter;
use crate::model::element::Element;
use crate::model::figure::Figure;
use crate::model::file::{File, FileMeta};
use crate::model::link::{Link, PosTarget};
use crate::model::page::Page;
use crate::model::paragraph::Paragraph;
use crate::model::position::Position;
use crate::model::rect::Rect;
use crate::model::root::Root;
use crate::model::table::{Cell, Table};
use crate::model::textbox::Color;

impl Serialize for Position {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut s = serializer.serialize_struct("Position", 5)?;
        s.serialize_field("x0", &self.x0)?;
        s.serialize_field("y0", &self.y0)?;
        s.serialize_field("x1", &self.x1)?;
        s.serialize_field("y1", &self.y1)?;
        s.serialize_field("page", &format!("page.{}", self.page))?;
        s.end()
    }
}

impl Serialize for PosTarget {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut s = serializer.serialize_struct("PosTarget", 3)?;
        s.serialize_field("page", &self.page)?;
        s.serialize_field("x", &self.x)?;
        s.serialize_field("y", &self.y)?;
        s.end()
    }
}

impl Serialize for Link {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut s = serializer.serialize_struct("Link", 4)?;
        s.serialize_field("idx_start", &self.idx_start)?;
        s.serialize_field("idx_stop", &self.idx_stop)?;
        s.serialize_field("pos_target", &self.pos_target)?;
        s.serialize_field("target", &self.target)?;
        s.end()
    }
}

impl Serialize for Color {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut s = serializer.serialize_seq(Some(3))?;
        s.serialize_element(&self.r)?;
        s.serialize_element(&self.g)?;
        s.serialize_element(&self.b)?;
        s.end()
    }
}

impl Serialize for Page {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut s = serializer.serialize_struct("Page", 4)?;
        s.serialize_field("id", &self.id())?;
        s.serialize_field("number", &self.number)?;
        s.serialize_field("width", &self.width)?;
        s.serialize_field("height", &self.height)?;
        s.end()
    }
}

impl Serialize for FileMeta {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut s = serializer.serialize_struct("FileMeta", 9)?;
        s.serialize_field("author", &self.author)?;
        s.serialize_field("title", &self.title)?;
        s.serialize_field("subject", &self.subject)?;
        s.serialize_field("creator", &self.creator)?;
        s.serialize_field("producer", &self.producer)?;
        s.serialize_field("keywords", &self.keywords)?;
        s.serialize_field("creation_date", &self.creation_date.map(|d| d.to_rfc3339()))?;
        s.serialize_field("modified_date", &self.modified_date.map(|d| d.to_rfc3339()))?;
        s.serialize_field("trapped", &self.trapped)?;
        s.end()
    }
}

impl Serialize for File {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut s = serializer.serialize_struct("File", 8)?;
        s.serialize_field("id", &self.id())?;
        s.serialize_field("name", &self.name)?;
        s.serialize_field("path", &self.path)?;
        s.serialize_field("page_count", &self.page_count)?;
        s.serialize_field("crop_top", &self.crop_top)?;
        s.serialize_field("crop_bottom", &self.crop_bottom)?;
        s.serialize_field("crop_left", &self.crop_left)?;
        s.serialize_field("crop_right", &self.crop_right)?;
        s.serialize_field("file_meta", &self.file_meta)?;
        s.end()
    }
}

impl Serialize for Chapter {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut s = serializer.serialize_struct("Chapter", 7)?;
        s.serialize_field("id", &self.id())?;
        s.serialize_field("type", "chapter")?;
        s.serialize_field("position", &self.position)?;
        s.serialize_field("title", &self.title)?;
        s.serialize_field("number", &self.number)?;
        match &self.textbox {
            Some(tb) => s.serialize_field("text", &tb.text())?,
            None => s.skip_field("text")?,
        }
        s.serialize_field("content", &self.content)?;
        s.end()
    }
}

impl Serialize for Paragraph {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut s = serializer.serialize_struct("Paragraph", 5)?;
        s.serialize_field("id", &self.id())?;
        s.serialize_field("type", "paragraph")?;
        s.serialize_field("position", &self.position)?;
        s.serialize_field("text", &self.text())?;
        s.serialize_field("links", &self.links)?;
        s.end()
    }
}

impl Serialize for Cell {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut s = serializer.serialize_struct("Cell", 5)?;
        s.serialize_field("row", &self.row)?;
        s.serialize_field("col", &self.col)?;
        s.serialize_field("position", &self.position)?;
        s.serialize_field("text", &self.text())?;
        s.serialize_field("links", &self.links)?;
        s.end()
    }
}

impl Serialize for Table {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut s = serializer.serialize_struct("Table", 5)?;
        s.serialize_field("id", &self.id())?;
        s.serialize_field("type", "table")?;
        s.serialize_field("position", &self.position)?;
        s.serialize_field("caption", &self.caption)?;
        s.serialize_field("cells", &self.cells)?;
        s.end()
    }
}

impl Serialize for Figure {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut s = serializer.serialize_struct("Figure", 7)?;
        s.serialize_field("id", &self.id())?;
        s.serialize_field("type", "figure")?;
        s.serialize_field("position", &self.position)?;
        s.serialize_field("rel_path", &self.rel_path)?;
        s.serialize_field("caption", &self.caption)?;
        s.serialize_field("text", &self.text())?;
        s.serialize_field("links", &self.links)?;
        s.end()
    }
}

impl Serialize for Rect {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut s = serializer.serialize_struct("Rect", 6)?;
        s.serialize_field("id", &self.id())?;
        s.serialize_field("type", "rect")?;
        s.serialize_field("position", &self.position)?;
        s.serialize_field("non_stroking_color", &self.non_stroking_color)?;
        match &self.textbox {
            Some(tb) => s.serialize_field("text", &tb.text())?,
            None => s.skip_field("text")?,
        }
        s.serialize_field("links", &self.links)?;
        s.end()
    }
}

impl Serialize for Element {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Element::Chapter(c) => c.serialize(serializer),
            Element::Paragraph(p) => p.serialize(serializer),
            Element::Table(t) => t.serialize(serializer),
            Element::Figure(f) => f.serialize(serializer),
            Element::Rect(r) => r.serialize(serializer),
        }
    }
}

impl Serialize for Root {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut s = serializer.serialize_struct("Root", 3)?;
        s.serialize_field("file", &self.file)?;
        s.serialize_field("pages", &self.pages)?;
        s.serialize_field("content", &self.content)?;
        s.end()
    }
}
