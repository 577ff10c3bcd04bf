//! The [loca (Index to Location)][loca] table
//!
//! [loca]: https://docs.microsoft.com/en-us/typography/opentype/spec/loca

use std::ops::Range;

use types::{GlyphId, Tag};

use crate::{
    tables::head::LocFormat, DecodeError, ErrorKind, FontData, FontReadWithArgs, ReadArgs,
    TopLevelTable,
};

/// 'loca'
pub const TAG: Tag = Tag::new(b"loca");

/// The [loca] table.
///
/// Offsets are stored as byte offsets into `glyf`, already doubled for the
/// short format.
///
/// [loca]: https://docs.microsoft.com/en-us/typography/opentype/spec/loca
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Loca {
    pub format: LocFormat,
    offsets: Vec<u32>,
}

/// Context needed to decode `loca`, gathered from `maxp`, `head` and `glyf`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LocaArgs {
    pub num_glyphs: u16,
    /// `head.indexToLocFormat`.
    pub index_to_loc_format: i16,
    /// The length of the `glyf` table, which bounds the final offset.
    pub glyf_len: usize,
}

impl Loca {
    /// The number of glyphs with a location.
    pub fn num_glyphs(&self) -> usize {
        self.offsets.len().saturating_sub(1)
    }

    /// All `num_glyphs + 1` offsets, in bytes.
    pub fn offsets(&self) -> &[u32] {
        &self.offsets
    }

    /// The byte range of a glyph in the `glyf` table.
    ///
    /// An empty range is an empty glyph.
    pub fn glyph_range(&self, gid: GlyphId) -> Option<Range<usize>> {
        let idx = gid.to_u16() as usize;
        let start = *self.offsets.get(idx)? as usize;
        let end = *self.offsets.get(idx + 1)? as usize;
        Some(start..end)
    }
}

impl ReadArgs for Loca {
    type Args = LocaArgs;
}

impl TopLevelTable for Loca {
    const TAG: Tag = TAG;
}

impl<'a> FontReadWithArgs<'a> for Loca {
    fn read_with_args(data: FontData<'a>, args: &LocaArgs) -> Result<Self, DecodeError> {
        let mut cursor = data.cursor().in_table(TAG);
        let format = match args.index_to_loc_format {
            0 => LocFormat::Short,
            1 => LocFormat::Long,
            _ => {
                return Err(cursor.error_at(ErrorKind::UnsupportedFormat, "indexToLocFormat", 0))
            }
        };
        let count = args.num_glyphs as usize + 1;
        let offsets: Vec<u32> = match format {
            LocFormat::Short => cursor
                .read_array::<u16>(count)?
                .into_iter()
                .map(|offset| offset as u32 * 2)
                .collect(),
            LocFormat::Long => cursor.read_array(count)?,
        };
        let entry_len = match format {
            LocFormat::Short => 2,
            LocFormat::Long => 4,
        };

        if let Some(idx) = offsets.windows(2).position(|pair| pair[1] < pair[0]) {
            return Err(cursor.error_at(
                ErrorKind::InconsistentStructure,
                "offsets",
                (idx + 1) * entry_len,
            ));
        }
        let last = offsets.last().copied().unwrap_or_default() as usize;
        if last > args.glyf_len {
            return Err(cursor.error_at(
                ErrorKind::InconsistentStructure,
                "final offset",
                (count - 1) * entry_len,
            ));
        }
        if cursor.remaining_bytes() > 0 {
            log::debug!("'loca' has {} trailing bytes", cursor.remaining_bytes());
        }
        log::debug!("decoded 'loca': {:?} format, {} glyphs", format, count - 1);
        Ok(Loca { format, offsets })
    }
}
