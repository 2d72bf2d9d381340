//! # Column Extractor
//!
//! Load an Excel (`.xlsx`) or CSV (`.csv`) file, pick the columns you need and
//! export them as a new workbook or CSV file named `filtered_<name>.<ext>`.
//!
//! ## Features
//!
//! - **Pure Rust readers**: the first worksheet of an xlsx package is parsed
//!   straight from its XML parts; CSV is read with the `csv` crate
//! - **Header-derived columns**: names come from the first row, with blank
//!   headers falling back to their column label (`A`, `B`, ...)
//! - **Ordered selection**: preview and export follow the order in which
//!   columns were picked
//! - **Two output formats**: a single-sheet workbook named `Filtered Data`, or
//!   UTF-8 comma-separated text
//!
//! ## Usage
//!
//! The free functions [`decode`], [`project`] and [`encode`] form the whole
//! pipeline. [`Session`] wraps them with the state of one interactive session
//! and the user-facing error messages.
mod error;
mod helpers;
mod spreadsheet;

pub mod dataset;
pub mod export;
pub mod session;

pub use crate::dataset::decode;
pub use crate::dataset::Dataset;
pub use crate::dataset::Preview;
pub use crate::dataset::Row;
pub use crate::dataset::Selection;
pub use crate::error::ExtractError;
pub use crate::error::SheetError;
pub use crate::export::encode;
pub use crate::export::project;
pub use crate::export::Export;
pub use crate::export::RowSequence;
pub use crate::session::FileInfo;
pub use crate::session::Session;
pub use crate::session::UploadTicket;
pub use crate::spreadsheet::CellValue;
pub use crate::spreadsheet::TabularFormat;
