//! Decoding sfnt font tables
//!
//! This crate decodes the binary container used by TrueType and OpenType
//! font files (the "sfnt" structure) into validated, owned representations
//! of its tables. Every read is bounds checked; malformed or truncated input
//! produces a [`DecodeError`] naming what failed, where, and in which table.
//!
//! The root [`tables`] module contains a submodule for each supported
//! [table][table-directory]. Each decoder is a pure function of the table
//! bytes and any cross-table context it needs (such as the glyph count from
//! `maxp`), which is always passed explicitly. The [`TableProvider`] trait
//! wires that context together for a whole font.
//!
//! # Example
//!
//! ```no_run
//! # let path_to_my_font_file = std::path::Path::new("");
//! use sfnt_read::{FontRef, TableProvider};
//! let font_bytes = std::fs::read(path_to_my_font_file).unwrap();
//! let font = FontRef::new(&font_bytes).expect("failed to read font data");
//! let head = font.head().expect("missing 'head' table");
//! let maxp = font.maxp().expect("missing 'maxp' table");
//!
//! println!("font version {} containing {} glyphs", head.font_revision, maxp.num_glyphs);
//! ```
//!
//! [table-directory]: https://learn.microsoft.com/en-us/typography/opentype/spec/otff#table-directory

#![cfg_attr(docsrs, feature(doc_auto_cfg))]
#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

mod font_data;
mod read;
mod table_directory;
mod table_provider;
pub mod tables;

use std::ops::Range;

pub use font_data::{Cursor, FontData};
pub use read::{DecodeError, ErrorKind, FontRead, FontReadWithArgs, ReadArgs, TopLevelTable};
pub use table_directory::{compute_checksum, TableDirectory, TableRecord};
pub use table_provider::TableProvider;

/// Public re-export of the sfnt-types crate.
pub extern crate sfnt_types as types;

use types::Tag;

/// Reference to an in-memory font.
///
/// This is a simple implementation of the [`TableProvider`] trait backed
/// by a borrowed slice containing font data. Construction validates the
/// table directory; every record is known to lie within the data.
#[derive(Clone)]
pub struct FontRef<'a> {
    data: FontData<'a>,
    pub table_directory: TableDirectory,
}

impl<'a> FontRef<'a> {
    /// Creates a new reference to an in-memory font backed by the given data.
    ///
    /// The data must begin with a [table directory].
    ///
    /// [table directory]: https://learn.microsoft.com/en-us/typography/opentype/spec/otff#table-directory
    pub fn new(data: &'a [u8]) -> Result<Self, DecodeError> {
        let data = FontData::new(data);
        let table_directory = TableDirectory::read(data)?;
        log::debug!(
            "read table directory: sfnt version {:#010x}, {} tables",
            table_directory.sfnt_version,
            table_directory.num_tables()
        );
        Ok(FontRef {
            data,
            table_directory,
        })
    }

    /// Returns the underlying font data.
    pub fn data(&self) -> FontData<'a> {
        self.data
    }

    /// Returns the associated table directory.
    pub fn table_directory(&self) -> &TableDirectory {
        &self.table_directory
    }

    /// Every table record, in file order.
    pub fn records(&self) -> &[TableRecord] {
        self.table_directory.records()
    }

    /// `true` if the font has a table with this tag.
    pub fn contains(&self, tag: Tag) -> bool {
        self.table_directory.contains(tag)
    }

    /// The byte range of the table with the specified tag, if present.
    pub fn table_range(&self, tag: Tag) -> Option<Range<usize>> {
        self.table_directory.get(tag).map(TableRecord::range)
    }

    /// The length in bytes of the table with the specified tag, if present.
    pub fn table_len(&self, tag: Tag) -> Option<usize> {
        self.table_directory
            .get(tag)
            .map(|record| record.length as usize)
    }

    /// Returns the data for the table with the specified tag, if present.
    pub fn table_data(&self, tag: Tag) -> Option<FontData<'a>> {
        self.table_range(tag).and_then(|range| self.data.slice(range))
    }

    /// Like [`table_range`](Self::table_range), with a missing table as an error.
    pub fn expect_table_range(&self, tag: Tag) -> Result<Range<usize>, DecodeError> {
        self.table_range(tag)
            .ok_or_else(|| DecodeError::table_not_found(tag))
    }

    /// Like [`table_len`](Self::table_len), with a missing table as an error.
    pub fn expect_table_len(&self, tag: Tag) -> Result<usize, DecodeError> {
        self.table_len(tag)
            .ok_or_else(|| DecodeError::table_not_found(tag))
    }

    /// Check every table checksum, returning the tags that do not match.
    ///
    /// Mismatches are logged, and are not treated as errors.
    pub fn checksum_mismatches(&self) -> Vec<Tag> {
        self.records()
            .iter()
            .filter(|record| !record.checksum_matches(self.data.as_bytes()))
            .inspect(|record| {
                log::warn!(
                    "checksum mismatch for '{}': stored {:#010x}, computed {:#010x}",
                    record.tag,
                    record.checksum,
                    self.data
                        .as_bytes()
                        .get(record.range())
                        .map(compute_checksum)
                        .unwrap_or_default()
                )
            })
            .map(|record| record.tag)
            .collect()
    }
}

impl<'a> TableProvider<'a> for FontRef<'a> {
    fn data_for_tag(&self, tag: Tag) -> Option<FontData<'a>> {
        self.table_data(tag)
    }
}
