//! Traits for interpreting font data

use types::Tag;

use crate::font_data::FontData;

/// A type that can be read from raw table data.
///
/// This trait is implemented for all font tables that are self-describing: that
/// is, tables that do not require any external state in order to interpret their
/// underlying bytes. (Tables that require external state implement
/// [`FontReadWithArgs`] instead)
pub trait FontRead<'a>: Sized {
    /// Read an instance of `Self` from the provided data, performing validation.
    ///
    /// In the case of a table, this method is responsible for ensuring the input
    /// data is consistent: this means ensuring that any versioned fields are
    /// present as required by the version, and that any array lengths are not
    /// out-of-bounds.
    fn read(data: FontData<'a>) -> Result<Self, DecodeError>;
}

/// A trait for a type that needs additional arguments to be read.
pub trait ReadArgs {
    type Args: Copy;
}

/// A trait for types that require external data in order to be constructed.
///
/// This is how cross-table context (such as the glyph count from `maxp`) is
/// threaded into a decoder: explicitly, as an argument.
pub trait FontReadWithArgs<'a>: Sized + ReadArgs {
    /// read an item, using the provided args.
    ///
    /// If a type requires multiple arguments, they will be passed as a tuple
    /// or a small struct.
    fn read_with_args(data: FontData<'a>, args: &Self::Args) -> Result<Self, DecodeError>;
}

/// A table that is referenced directly from the table directory.
pub trait TopLevelTable {
    /// The tag identifying this table in the table directory.
    const TAG: Tag;
}

/// The category of a [`DecodeError`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum ErrorKind {
    /// A read would exceed the available data.
    TruncatedInput,
    /// A header constant or table version did not match.
    InvalidMagicOrVersion,
    /// A format discriminator is not implemented or not recognized.
    UnsupportedFormat,
    /// A cross-field invariant was violated.
    InconsistentStructure,
    /// The requested tag is absent from the table directory.
    TableNotFound,
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            ErrorKind::TruncatedInput => "truncated input",
            ErrorKind::InvalidMagicOrVersion => "invalid magic number or version",
            ErrorKind::UnsupportedFormat => "unsupported format",
            ErrorKind::InconsistentStructure => "inconsistent structure",
            ErrorKind::TableNotFound => "table not found",
        })
    }
}

/// An error that occurs when decoding font data.
///
/// Every error records what went wrong, the absolute offset in the font data
/// where it was detected, and the table being decoded, when known.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("{kind} ({what}) at offset {offset}{}", table_suffix(.tag))]
pub struct DecodeError {
    kind: ErrorKind,
    what: &'static str,
    offset: usize,
    tag: Option<Tag>,
}

fn table_suffix(tag: &Option<Tag>) -> String {
    tag.map(|tag| format!(" in '{tag}' table"))
        .unwrap_or_default()
}

impl DecodeError {
    /// Create a new error of the given kind at an absolute offset.
    pub fn new(kind: ErrorKind, what: &'static str, offset: usize) -> Self {
        DecodeError {
            kind,
            what,
            offset,
            tag: None,
        }
    }

    pub(crate) fn truncated(what: &'static str, offset: usize) -> Self {
        Self::new(ErrorKind::TruncatedInput, what, offset)
    }

    /// The error returned when a table is absent from the directory.
    pub fn table_not_found(tag: Tag) -> Self {
        Self::new(ErrorKind::TableNotFound, "table directory", 0).with_tag(tag)
    }

    /// Attach the tag of the table being decoded.
    ///
    /// An existing tag is kept, so that errors from nested data keep the
    /// innermost table.
    pub fn with_tag(mut self, tag: Tag) -> Self {
        self.tag.get_or_insert(tag);
        self
    }

    /// The category of this error.
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// A short description of the field or structure that failed.
    pub fn what(&self) -> &'static str {
        self.what
    }

    /// The absolute offset in the font data at which the error was detected.
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// The table being decoded, if known.
    pub fn tag(&self) -> Option<Tag> {
        self.tag
    }
}
