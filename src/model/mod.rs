//! The typed document model.
//!
//! Ownership follows a strict tree: [`Root`](root::Root) owns the
//! [`File`](file::File), the [`Page`](page::Page) list and the top-level
//! content; [`Chapter`](chapter::Chapter) owns its nested content. Parent
//! links are not stored; identifier chains (`uid`) are assigned during
//! assembly, and page-position lookups go through an index built from a tree
//! walk.

pub mod chapter;
pub mod element;
pub mod figure;
pub mod file;
pub mod link;
pub mod page;
pub mod paragraph;
pub mod position;
pub mod rect;
pub mod root;
mod ser;
pub mod table;
pub mod textbox;

pub use chapter::Chapter;
pub use element::Element;
pub use figure::Figure;
pub use file::{File, FileMeta};
pub use link::{Link, PosTarget};
pub use page::Page;
pub use paragraph::Paragraph;
pub use position::{Position, Positioned};
pub use rect::Rect;
pub use root::Root;
pub use table::{Cell, Table};
pub use textbox::{Color, HorizontalBox, HorizontalLine, TextChar, Word};
