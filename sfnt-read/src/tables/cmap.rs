//! The [cmap](https://docs.microsoft.com/en-us/typography/opentype/spec/cmap) table
//!
//! Every encoding record is decoded independently: a malformed subtable is
//! reported in [`Cmap::subtables`] without failing the whole table.

use std::{collections::BTreeMap, ops::Range};

use types::{GlyphId, Offset32, Offset, Tag, Uint24};

use crate::{
    Cursor, DecodeError, ErrorKind, FontData, FontReadWithArgs, ReadArgs, TopLevelTable,
};

/// 'cmap'
pub const TAG: Tag = Tag::new(b"cmap");

/// Result of mapping a codepoint with a variation selector.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum MapVariant {
    /// The variation selector should be ignored and the default mapping
    /// of the character should be used.
    UseDefault,
    /// The variant glyph mapped by a codepoint and associated variation
    /// selector.
    Variant(GlyphId),
}

/// [cmap](https://docs.microsoft.com/en-us/typography/opentype/spec/cmap#overview)
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Cmap {
    /// Table version number (0).
    pub version: u16,
    pub encoding_records: Vec<EncodingRecord>,
    /// The decoded subtable for each encoding record, in the same order.
    pub subtables: Vec<Result<CmapSubtable, DecodeError>>,
}

/// [Encoding Record](https://docs.microsoft.com/en-us/typography/opentype/spec/cmap#encoding-records-and-encodings)
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct EncodingRecord {
    /// Platform ID.
    pub platform_id: u16,
    /// Platform-specific encoding ID.
    pub encoding_id: u16,
    /// Byte offset from beginning of the cmap table to the subtable for this
    /// encoding.
    pub subtable_offset: Offset32,
}

/// A decoded character mapping subtable.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum CmapSubtable {
    Format0(Cmap0),
    Format2(Cmap2),
    Format4(Cmap4),
    Format6(Cmap6),
    Format8(Cmap8),
    Format10(Cmap10),
    Format12(Cmap12),
    Format13(Cmap13),
    Format14(Cmap14),
    /// A format this decoder does not know.
    Unrecognized { format: u16 },
}

/// [cmap Format 0](https://docs.microsoft.com/en-us/typography/opentype/spec/cmap#format-0-byte-encoding-table): Byte encoding table
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Cmap0 {
    pub language: u16,
    /// An array that maps character codes to glyph index values.
    pub glyph_id_array: Vec<u8>,
}

/// [cmap Format 2](https://docs.microsoft.com/en-us/typography/opentype/spec/cmap#format-2-high-byte-mapping-through-table): High-byte mapping through table
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Cmap2 {
    pub language: u16,
    /// Array that maps high bytes to subHeaders: value is subHeader index × 8.
    pub sub_header_keys: Vec<u16>,
    pub sub_headers: Vec<SubHeader>,
    pub glyph_id_array: Vec<u16>,
}

/// Part of [Cmap2]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct SubHeader {
    /// First valid low byte for this SubHeader.
    pub first_code: u16,
    /// Number of valid low bytes for this SubHeader.
    pub entry_count: u16,
    /// See text below.
    pub id_delta: i16,
    /// The raw `idRangeOffset`, relative to the field itself.
    pub id_range_offset: u16,
    /// The index in [`Cmap2::glyph_id_array`] of the entry for `first_code`.
    pub glyph_index: usize,
}

/// [cmap Format 4](https://docs.microsoft.com/en-us/typography/opentype/spec/cmap#format-4-segment-mapping-to-delta-values): Segment mapping to delta values
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Cmap4 {
    pub language: u16,
    pub search_range: u16,
    pub entry_selector: u16,
    pub range_shift: u16,
    /// End characterCode for each segment, last=0xFFFF.
    pub end_code: Vec<u16>,
    /// Start character code for each segment.
    pub start_code: Vec<u16>,
    /// Delta for all character codes in segment.
    pub id_delta: Vec<i16>,
    /// Offsets into glyphIdArray or 0
    pub id_range_offsets: Vec<u16>,
    /// Glyph index array (arbitrary length)
    pub glyph_id_array: Vec<u16>,
}

/// [cmap Format 6](https://docs.microsoft.com/en-us/typography/opentype/spec/cmap#format-6-trimmed-table-mapping): Trimmed table mapping
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Cmap6 {
    pub language: u16,
    /// First character code of subrange.
    pub first_code: u16,
    /// Array of glyph index values for character codes in the range.
    pub glyph_id_array: Vec<u16>,
}

/// [cmap Format 8](https://docs.microsoft.com/en-us/typography/opentype/spec/cmap#format-8-mixed-16-bit-and-32-bit-coverage): mixed 16-bit and 32-bit coverage
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Cmap8 {
    pub language: u32,
    /// Tightly packed array of bits (8K bytes total) indicating whether the
    /// particular 16-bit (index) value is the start of a 32-bit character code
    pub is32: Vec<u8>,
    pub groups: Vec<SequentialMapGroup>,
}

/// [cmap Format 10](https://docs.microsoft.com/en-us/typography/opentype/spec/cmap#format-10-trimmed-array): Timmed array
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Cmap10 {
    pub language: u32,
    /// First character code covered
    pub start_char_code: u32,
    /// Array of glyph indices for the character codes covered
    pub glyph_id_array: Vec<u16>,
}

/// [cmap Format 12](https://docs.microsoft.com/en-us/typography/opentype/spec/cmap#format-12-segmented-coverage): Segmented coverage
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Cmap12 {
    pub language: u32,
    pub groups: Vec<SequentialMapGroup>,
}

/// [cmap Format 13](https://docs.microsoft.com/en-us/typography/opentype/spec/cmap#format-13-many-to-one-range-mappings): Many-to-one range mappings
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Cmap13 {
    pub language: u32,
    pub groups: Vec<ConstantMapGroup>,
}

/// Part of [Cmap8] and [Cmap12]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct SequentialMapGroup {
    /// First character code in this group.
    pub start_char_code: u32,
    /// Last character code in this group.
    pub end_char_code: u32,
    /// Glyph index corresponding to the starting character code; subsequent
    /// characters are mapped to sequential glyphs
    pub start_glyph_id: u32,
}

/// Part of [Cmap13]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct ConstantMapGroup {
    /// First character code in this group.
    pub start_char_code: u32,
    /// Last character code in this group.
    pub end_char_code: u32,
    /// Glyph index to be used for all the characters in the group's range.
    pub glyph_id: u32,
}

/// [cmap Format 14](https://docs.microsoft.com/en-us/typography/opentype/spec/cmap#format-14-unicode-variation-sequences): Unicode Variation Sequences
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Cmap14 {
    pub var_selectors: Vec<VariationSelector>,
}

/// A variation selector record, with its UVS tables resolved.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct VariationSelector {
    /// Variation selector
    pub var_selector: u32,
    /// Ranges of base characters that use their default glyph with this selector.
    pub default_uvs: Option<Vec<UnicodeRange>>,
    /// Base characters with a specific glyph for this selector.
    pub non_default_uvs: Option<Vec<UvsMapping>>,
}

/// Part of [Cmap14]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct UnicodeRange {
    /// First value in this range
    pub start_unicode_value: u32,
    /// Number of additional values in this range
    pub additional_count: u8,
}

/// Part of [Cmap14]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct UvsMapping {
    /// Base Unicode value of the UVS
    pub unicode_value: u32,
    /// Glyph ID of the UVS
    pub glyph_id: GlyphId,
}

impl Cmap {
    /// Map a codepoint to a nominal glyph identifier
    ///
    /// This uses the first successfully decoded subtable, in record order,
    /// that provides a mapping.
    pub fn map_codepoint(&self, codepoint: impl Into<u32>) -> Option<GlyphId> {
        let codepoint = codepoint.into();
        self.subtables
            .iter()
            .filter_map(|subtable| subtable.as_ref().ok())
            .find_map(|subtable| subtable.map_codepoint(codepoint))
    }

    /// Maps a codepoint and variation selector using the first format 14 subtable.
    pub fn map_variant(
        &self,
        codepoint: impl Into<u32>,
        selector: impl Into<u32>,
    ) -> Option<MapVariant> {
        self.subtables
            .iter()
            .find_map(|subtable| match subtable {
                Ok(CmapSubtable::Format14(cmap14)) => Some(cmap14),
                _ => None,
            })?
            .map_variant(codepoint, selector)
    }

    /// The successfully decoded subtable for a platform and encoding, if any.
    pub fn subtable(&self, platform_id: u16, encoding_id: u16) -> Option<&CmapSubtable> {
        self.encoding_records
            .iter()
            .zip(&self.subtables)
            .find(|(record, _)| {
                record.platform_id == platform_id && record.encoding_id == encoding_id
            })
            .and_then(|(_, subtable)| subtable.as_ref().ok())
    }
}

impl CmapSubtable {
    /// The format number of this subtable.
    pub fn format(&self) -> u16 {
        match self {
            CmapSubtable::Format0(_) => 0,
            CmapSubtable::Format2(_) => 2,
            CmapSubtable::Format4(_) => 4,
            CmapSubtable::Format6(_) => 6,
            CmapSubtable::Format8(_) => 8,
            CmapSubtable::Format10(_) => 10,
            CmapSubtable::Format12(_) => 12,
            CmapSubtable::Format13(_) => 13,
            CmapSubtable::Format14(_) => 14,
            CmapSubtable::Unrecognized { format } => *format,
        }
    }

    /// Maps a codepoint to a nominal glyph identifier.
    ///
    /// Format 14 subtables and unrecognized formats map nothing.
    pub fn map_codepoint(&self, codepoint: impl Into<u32>) -> Option<GlyphId> {
        let codepoint = codepoint.into();
        match self {
            CmapSubtable::Format0(cmap0) => cmap0.map_codepoint(codepoint),
            CmapSubtable::Format2(cmap2) => cmap2.map_codepoint(codepoint),
            CmapSubtable::Format4(cmap4) => cmap4.map_codepoint(codepoint),
            CmapSubtable::Format6(cmap6) => cmap6.map_codepoint(codepoint),
            CmapSubtable::Format8(cmap8) => map_sequential(&cmap8.groups, codepoint),
            CmapSubtable::Format10(cmap10) => cmap10.map_codepoint(codepoint),
            CmapSubtable::Format12(cmap12) => cmap12.map_codepoint(codepoint),
            CmapSubtable::Format13(cmap13) => cmap13.map_codepoint(codepoint),
            CmapSubtable::Format14(_) | CmapSubtable::Unrecognized { .. } => None,
        }
    }
}

/// Glyph 0 means "missing" in every format.
fn non_notdef(gid: u16) -> Option<GlyphId> {
    (gid != 0).then_some(GlyphId::new(gid))
}

impl Cmap0 {
    /// Maps a codepoint to a nominal glyph identifier.
    pub fn map_codepoint(&self, codepoint: impl Into<u32>) -> Option<GlyphId> {
        let codepoint = codepoint.into();
        let gid = *self.glyph_id_array.get(usize::try_from(codepoint).ok()?)?;
        non_notdef(gid as u16)
    }
}

impl Cmap2 {
    /// Maps a codepoint to a nominal glyph identifier.
    ///
    /// Codes below 256 whose byte selects subheader 0 are single byte codes;
    /// anything else is a two byte code with the high byte first.
    pub fn map_codepoint(&self, codepoint: impl Into<u32>) -> Option<GlyphId> {
        let codepoint: u16 = codepoint.into().try_into().ok()?;
        let (sub_header, low) = if codepoint < 0x100 {
            // a byte that selects subheader 0 is a complete code
            if *self.sub_header_keys.get(codepoint as usize)? != 0 {
                return None;
            }
            (self.sub_headers.first()?, codepoint)
        } else {
            let key = *self.sub_header_keys.get(codepoint as usize >> 8)?;
            if key == 0 {
                return None;
            }
            (self.sub_headers.get(key as usize / 8)?, codepoint & 0xFF)
        };
        let idx = low.checked_sub(sub_header.first_code)?;
        if idx >= sub_header.entry_count {
            return None;
        }
        let gid = *self.glyph_id_array.get(sub_header.glyph_index + idx as usize)?;
        if gid == 0 {
            return None;
        }
        non_notdef((gid as i32 + sub_header.id_delta as i32) as u16)
    }
}

impl Cmap4 {
    /// Maps a codepoint to a nominal glyph identifier.
    pub fn map_codepoint(&self, codepoint: impl Into<u32>) -> Option<GlyphId> {
        let codepoint = codepoint.into();
        if codepoint > 0xFFFF {
            return None;
        }
        let codepoint = codepoint as u16;
        let mut lo = 0;
        let mut hi = self.end_code.len();
        while lo < hi {
            let i = (lo + hi) / 2;
            let start_code = *self.start_code.get(i)?;
            if codepoint < start_code {
                hi = i;
            } else if codepoint > *self.end_code.get(i)? {
                lo = i + 1;
            } else {
                return self.lookup_glyph_id(codepoint, i).and_then(non_notdef);
            }
        }
        None
    }

    /// Returns an iterator over all (codepoint, glyph identifier) pairs
    /// in the subtable.
    pub fn iter(&self) -> Cmap4Iter<'_> {
        Cmap4Iter::new(self)
    }

    /// The number of segments.
    pub fn seg_count(&self) -> usize {
        self.end_code.len()
    }

    /// Does the final phase of glyph id lookup.
    ///
    /// Returns `None` if the glyph array index is out of bounds; a
    /// value of 0 means the code is unmapped.
    fn lookup_glyph_id(&self, codepoint: u16, index: usize) -> Option<u16> {
        let start_code = *self.start_code.get(index)?;
        let delta = *self.id_delta.get(index)? as i32;
        let range_offset = *self.id_range_offsets.get(index)? as usize;
        if range_offset == 0 {
            return Some((codepoint as i32 + delta) as u16);
        }
        // idRangeOffset is relative to its own position in the idRangeOffset
        // array, which is followed directly by the glyph array
        let offset = (range_offset / 2 + (codepoint - start_code) as usize)
            .checked_sub(self.id_range_offsets.len() - index)?;
        let gid = *self.glyph_id_array.get(offset)?;
        Some(if gid == 0 {
            0
        } else {
            (gid as i32 + delta) as u16
        })
    }

    /// Returns the [start_code, end_code] range at the given index.
    fn code_range(&self, index: usize) -> Option<Range<u32>> {
        // Extend to u32 to ensure we don't overflow on the end + 1 bound
        // below.
        let start = *self.start_code.get(index)? as u32;
        let end = *self.end_code.get(index)? as u32;
        // Use end + 1 here because the range in the table is inclusive
        Some(start..end + 1)
    }
}

/// Iterator over all (codepoint, glyph identifier) pairs in
/// the subtable.
///
/// Each codepoint is produced at most once, even if segments overlap.
#[derive(Clone)]
pub struct Cmap4Iter<'a> {
    subtable: &'a Cmap4,
    cur_range: Range<u32>,
    cur_range_ix: usize,
    prev_codepoint: Option<u32>,
}

impl<'a> Cmap4Iter<'a> {
    fn new(subtable: &'a Cmap4) -> Self {
        let cur_range = subtable.code_range(0).unwrap_or_default();
        Self {
            subtable,
            cur_range,
            cur_range_ix: 0,
            prev_codepoint: None,
        }
    }
}

impl Iterator for Cmap4Iter<'_> {
    type Item = (u32, GlyphId);

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(codepoint) = self.cur_range.next() {
                if self.prev_codepoint.is_some_and(|prev| codepoint <= prev) {
                    continue;
                }
                self.prev_codepoint = Some(codepoint);
                let Some(glyph_id) = self
                    .subtable
                    .lookup_glyph_id(codepoint as u16, self.cur_range_ix)
                    .and_then(non_notdef)
                else {
                    // The table might explicitly map some codepoints to 0. Avoid
                    // returning those here.
                    continue;
                };
                return Some((codepoint, glyph_id));
            } else {
                self.cur_range_ix += 1;
                self.cur_range = self.subtable.code_range(self.cur_range_ix)?;
            }
        }
    }
}

impl Cmap6 {
    /// Maps a codepoint to a nominal glyph identifier.
    pub fn map_codepoint(&self, codepoint: impl Into<u32>) -> Option<GlyphId> {
        let idx = codepoint.into().checked_sub(self.first_code as u32)?;
        non_notdef(*self.glyph_id_array.get(idx as usize)?)
    }
}

impl Cmap10 {
    /// Maps a codepoint to a nominal glyph identifier.
    pub fn map_codepoint(&self, codepoint: impl Into<u32>) -> Option<GlyphId> {
        let idx = codepoint.into().checked_sub(self.start_char_code)?;
        non_notdef(*self.glyph_id_array.get(idx as usize)?)
    }
}

impl Cmap12 {
    /// Maps a codepoint to a nominal glyph identifier.
    pub fn map_codepoint(&self, codepoint: impl Into<u32>) -> Option<GlyphId> {
        map_sequential(&self.groups, codepoint.into())
    }
}

impl Cmap13 {
    /// Maps a codepoint to a nominal glyph identifier.
    pub fn map_codepoint(&self, codepoint: impl Into<u32>) -> Option<GlyphId> {
        let codepoint = codepoint.into();
        let idx = find_group(&self.groups, codepoint, |group| {
            (group.start_char_code, group.end_char_code)
        })?;
        non_notdef(self.groups.get(idx)?.glyph_id as u16)
    }
}

/// Binary search for the group containing `codepoint`; groups are sorted.
fn find_group<T>(
    groups: &[T],
    codepoint: u32,
    range: impl Fn(&T) -> (u32, u32),
) -> Option<usize> {
    use core::cmp::Ordering;
    groups
        .binary_search_by(|group| {
            let (start, end) = range(group);
            if codepoint < start {
                Ordering::Greater
            } else if codepoint > end {
                Ordering::Less
            } else {
                Ordering::Equal
            }
        })
        .ok()
}

fn map_sequential(groups: &[SequentialMapGroup], codepoint: u32) -> Option<GlyphId> {
    let idx = find_group(groups, codepoint, |group| {
        (group.start_char_code, group.end_char_code)
    })?;
    let group = groups.get(idx)?;
    let gid = group
        .start_glyph_id
        .checked_add(codepoint - group.start_char_code)?;
    non_notdef(u16::try_from(gid).ok()?)
}

impl Cmap14 {
    /// Maps a codepoint and variation selector to a nominal glyph identifier.
    pub fn map_variant(
        &self,
        codepoint: impl Into<u32>,
        selector: impl Into<u32>,
    ) -> Option<MapVariant> {
        let codepoint = codepoint.into();
        let selector = selector.into();
        // Variation selector records are sorted in order of var_selector. Binary search to find
        // the appropriate record.
        let selector_record = self
            .var_selectors
            .binary_search_by(|rec| rec.var_selector.cmp(&selector))
            .ok()
            .and_then(|idx| self.var_selectors.get(idx))?;
        // If found in a default UVS range, ignore the selector and return a value
        // indicating that the default cmap mapping should be used.
        if let Some(default_uvs) = &selector_record.default_uvs {
            let found = find_group(default_uvs, codepoint, |range| {
                let start = range.start_unicode_value;
                (start, start.saturating_add(range.additional_count as u32))
            });
            if found.is_some() {
                return Some(MapVariant::UseDefault);
            }
        }
        let mapping = selector_record.non_default_uvs.as_ref()?;
        let ix = mapping
            .binary_search_by(|map| map.unicode_value.cmp(&codepoint))
            .ok()?;
        Some(MapVariant::Variant(mapping.get(ix)?.glyph_id))
    }
}

impl ReadArgs for Cmap {
    /// The number of glyphs in the font, from `maxp`.
    type Args = u16;
}

impl TopLevelTable for Cmap {
    const TAG: Tag = TAG;
}

impl<'a> FontReadWithArgs<'a> for Cmap {
    fn read_with_args(data: FontData<'a>, num_glyphs: &u16) -> Result<Self, DecodeError> {
        let mut cursor = data.cursor().in_table(TAG);
        let version: u16 = cursor.read()?;
        if version != 0 {
            return Err(cursor.error_at(ErrorKind::InvalidMagicOrVersion, "version", 0));
        }
        let num_tables: u16 = cursor.read()?;
        let mut encoding_records = Vec::with_capacity(num_tables as usize);
        for _ in 0..num_tables {
            encoding_records.push(EncodingRecord {
                platform_id: cursor.read()?,
                encoding_id: cursor.read()?,
                subtable_offset: cursor.read()?,
            });
        }

        // records commonly share a subtable; decode each offset once
        let mut decoded = BTreeMap::new();
        let subtables = encoding_records
            .iter()
            .map(|record| {
                let offset = record.subtable_offset.to_usize();
                decoded
                    .entry(offset)
                    .or_insert_with(|| read_subtable(data, offset, *num_glyphs))
                    .clone()
                    .map_err(|e| e.with_tag(TAG))
                    .inspect_err(|e| {
                        log::warn!(
                            "failed to decode 'cmap' subtable ({}, {}): {e}",
                            record.platform_id,
                            record.encoding_id
                        )
                    })
            })
            .collect::<Vec<_>>();
        log::debug!(
            "decoded 'cmap': {} encoding records, {} valid subtables",
            encoding_records.len(),
            subtables.iter().filter(|s| s.is_ok()).count()
        );
        Ok(Cmap {
            version,
            encoding_records,
            subtables,
        })
    }
}

/// Locate a subtable, bound it by its declared length, and dispatch on format.
fn read_subtable(
    data: FontData,
    offset: usize,
    num_glyphs: u16,
) -> Result<CmapSubtable, DecodeError> {
    let format: u16 = data.read_at(offset)?;
    let length = match format {
        0 | 2 | 4 | 6 => data.read_at::<u16>(offset + 2)? as usize,
        8 | 10 | 12 | 13 => data.read_at::<u32>(offset + 4)? as usize,
        14 => data.read_at::<u32>(offset + 2)? as usize,
        _ => {
            log::debug!("unrecognized 'cmap' subtable format {format}");
            return Ok(CmapSubtable::Unrecognized { format });
        }
    };
    let data = offset
        .checked_add(length)
        .and_then(|end| data.slice(offset..end))
        .ok_or_else(|| data.truncated_at("subtable length", offset))?;
    log::trace!("'cmap' subtable format {format} at {offset}, length {length}");
    match format {
        0 => read_cmap0(data, num_glyphs).map(CmapSubtable::Format0),
        2 => read_cmap2(data, num_glyphs).map(CmapSubtable::Format2),
        4 => read_cmap4(data, num_glyphs).map(CmapSubtable::Format4),
        6 => read_cmap6(data, num_glyphs).map(CmapSubtable::Format6),
        8 => read_cmap8(data, num_glyphs).map(CmapSubtable::Format8),
        10 => read_cmap10(data, num_glyphs).map(CmapSubtable::Format10),
        12 => read_cmap12(data, num_glyphs).map(CmapSubtable::Format12),
        13 => read_cmap13(data, num_glyphs).map(CmapSubtable::Format13),
        _ => read_cmap14(data, num_glyphs).map(CmapSubtable::Format14),
    }
}

/// A resolved glyph must exist in the font.
fn check_glyph(
    cursor: &Cursor,
    gid: u32,
    num_glyphs: u16,
    what: &'static str,
    pos: usize,
) -> Result<(), DecodeError> {
    if gid >= num_glyphs as u32 {
        return Err(cursor.error_at(ErrorKind::InconsistentStructure, what, pos));
    }
    Ok(())
}

fn read_cmap0(data: FontData, num_glyphs: u16) -> Result<Cmap0, DecodeError> {
    let mut cursor = data.cursor().in_table(TAG);
    cursor.advance_by(4)?; // format, length
    let language = cursor.read()?;
    let glyph_id_array = cursor.read_bytes(256)?.to_vec();
    for (code, gid) in glyph_id_array.iter().enumerate() {
        check_glyph(&cursor, *gid as u32, num_glyphs, "glyphIdArray", 6 + code)?;
    }
    Ok(Cmap0 {
        language,
        glyph_id_array,
    })
}

fn read_cmap2(data: FontData, num_glyphs: u16) -> Result<Cmap2, DecodeError> {
    const SUB_HEADERS_START: usize = 6 + 512;
    const SUB_HEADER_LEN: usize = 8;

    let mut cursor = data.cursor().in_table(TAG);
    cursor.advance_by(4)?; // format, length
    let language = cursor.read()?;
    let sub_header_keys: Vec<u16> = cursor.read_array(256)?;
    let num_sub_headers = sub_header_keys
        .iter()
        .map(|key| *key as usize / 8)
        .max()
        .unwrap_or_default()
        + 1;
    let mut raw_headers = Vec::with_capacity(num_sub_headers);
    for _ in 0..num_sub_headers {
        let first_code: u16 = cursor.read()?;
        let entry_count: u16 = cursor.read()?;
        let id_delta: i16 = cursor.read()?;
        let id_range_offset: u16 = cursor.read()?;
        raw_headers.push((first_code, entry_count, id_delta, id_range_offset));
    }
    let glyph_array_start = cursor.position();
    let glyph_id_array: Vec<u16> = cursor.read_array(cursor.remaining_bytes() / 2)?;

    let mut sub_headers = Vec::with_capacity(num_sub_headers);
    for (i, (first_code, entry_count, id_delta, id_range_offset)) in
        raw_headers.into_iter().enumerate()
    {
        // idRangeOffset is relative to its own field
        let field_pos = SUB_HEADERS_START + i * SUB_HEADER_LEN + 6;
        let target = field_pos + id_range_offset as usize;
        let glyph_index = target
            .checked_sub(glyph_array_start)
            .filter(|delta| delta % 2 == 0)
            .map(|delta| delta / 2)
            .ok_or_else(|| {
                cursor.error_at(ErrorKind::InconsistentStructure, "idRangeOffset", field_pos)
            })?;
        let entries = glyph_id_array
            .get(glyph_index..glyph_index + entry_count as usize)
            .ok_or_else(|| cursor.error_at(ErrorKind::TruncatedInput, "glyphIdArray", target))?;
        for gid in entries.iter().filter(|gid| **gid != 0) {
            let gid = (*gid as i32 + id_delta as i32) as u16;
            check_glyph(&cursor, gid as u32, num_glyphs, "idDelta", field_pos - 2)?;
        }
        sub_headers.push(SubHeader {
            first_code,
            entry_count,
            id_delta,
            id_range_offset,
            glyph_index,
        });
    }
    Ok(Cmap2 {
        language,
        sub_header_keys,
        sub_headers,
        glyph_id_array,
    })
}

fn read_cmap4(data: FontData, num_glyphs: u16) -> Result<Cmap4, DecodeError> {
    let mut cursor = data.cursor().in_table(TAG);
    cursor.advance_by(4)?; // format, length
    let language = cursor.read()?;
    let seg_count_x2: u16 = cursor.read()?;
    if seg_count_x2 % 2 != 0 {
        return Err(cursor.error_at(ErrorKind::InconsistentStructure, "segCountX2", 6));
    }
    let seg_count = seg_count_x2 as usize / 2;
    let search_range = cursor.read()?;
    let entry_selector = cursor.read()?;
    let range_shift = cursor.read()?;
    let end_code: Vec<u16> = cursor.read_array(seg_count)?;
    let _reserved_pad: u16 = cursor.read()?;
    let start_code_pos = cursor.position();
    let start_code: Vec<u16> = cursor.read_array(seg_count)?;
    let id_delta_pos = cursor.position();
    let id_delta = cursor.read_array(seg_count)?;
    let id_range_offset_pos = cursor.position();
    let id_range_offsets = cursor.read_array(seg_count)?;
    let glyph_id_array = cursor.read_array(cursor.remaining_bytes() / 2)?;

    for i in 0..seg_count {
        if start_code[i] > end_code[i] {
            return Err(cursor.error_at(
                ErrorKind::InconsistentStructure,
                "startCode",
                start_code_pos + i * 2,
            ));
        }
        if i > 0 && end_code[i] < end_code[i - 1] {
            return Err(cursor.error_at(ErrorKind::InconsistentStructure, "endCode", 14 + i * 2));
        }
    }

    let cmap4 = Cmap4 {
        language,
        search_range,
        entry_selector,
        range_shift,
        end_code,
        start_code,
        id_delta,
        id_range_offsets,
        glyph_id_array,
    };
    for i in 0..seg_count {
        check_segment_glyphs(&cursor, &cmap4, i, num_glyphs, id_delta_pos, id_range_offset_pos)?;
    }
    log::trace!("'cmap' format 4 with {seg_count} segments");
    Ok(cmap4)
}

/// Check that every code point in segment `i` resolves to a glyph in the font.
///
/// Delta segments are checked as one range; range offset segments only
/// visit the glyph array entries they reference.
fn check_segment_glyphs(
    cursor: &Cursor,
    cmap4: &Cmap4,
    i: usize,
    num_glyphs: u16,
    id_delta_pos: usize,
    id_range_offset_pos: usize,
) -> Result<(), DecodeError> {
    let start = cmap4.start_code[i];
    let end = cmap4.end_code[i];
    let delta = cmap4.id_delta[i];
    let range_offset = cmap4.id_range_offsets[i];
    let span = (end - start) as usize;

    if range_offset == 0 {
        let pos = id_delta_pos + i * 2;
        // a range that wraps past 0xFFFF always contains 0xFFFF, which is
        // never a valid glyph
        let first = (start as u32 + delta as u16 as u32) % 0x10000;
        return check_glyph(cursor, first + span as u32, num_glyphs, "idDelta", pos);
    }

    let pos = id_range_offset_pos + i * 2;
    if range_offset % 2 != 0 {
        return Err(cursor.error_at(ErrorKind::InconsistentStructure, "idRangeOffset", pos));
    }
    let first = (range_offset as usize / 2 + i)
        .checked_sub(cmap4.seg_count())
        .ok_or_else(|| cursor.error_at(ErrorKind::InconsistentStructure, "idRangeOffset", pos))?;
    let entries = cmap4
        .glyph_id_array
        .get(first..=first + span)
        .ok_or_else(|| cursor.error_at(ErrorKind::InconsistentStructure, "idRangeOffset", pos))?;
    for gid in entries {
        let gid = if *gid == 0 {
            0
        } else {
            (*gid as i32 + delta as i32) as u16
        };
        check_glyph(cursor, gid as u32, num_glyphs, "idRangeOffset", pos)?;
    }
    Ok(())
}

fn read_cmap6(data: FontData, num_glyphs: u16) -> Result<Cmap6, DecodeError> {
    let mut cursor = data.cursor().in_table(TAG);
    cursor.advance_by(4)?; // format, length
    let language = cursor.read()?;
    let first_code = cursor.read()?;
    let entry_count: u16 = cursor.read()?;
    let glyph_id_array: Vec<u16> = cursor.read_array(entry_count as usize)?;
    for (i, gid) in glyph_id_array.iter().enumerate() {
        check_glyph(&cursor, *gid as u32, num_glyphs, "glyphIdArray", 10 + i * 2)?;
    }
    Ok(Cmap6 {
        language,
        first_code,
        glyph_id_array,
    })
}

/// The header shared by formats 8, 10, 12 and 13: format, reserved, length, language.
fn read_long_header(cursor: &mut Cursor) -> Result<u32, DecodeError> {
    cursor.advance_by(8)?;
    cursor.read()
}

fn read_sequential_groups(
    cursor: &mut Cursor,
    num_glyphs: u16,
) -> Result<Vec<SequentialMapGroup>, DecodeError> {
    let num_groups: u32 = cursor.read()?;
    let mut groups: Vec<SequentialMapGroup> = Vec::new();
    for _ in 0..num_groups {
        let pos = cursor.position();
        let group = SequentialMapGroup {
            start_char_code: cursor.read()?,
            end_char_code: cursor.read()?,
            start_glyph_id: cursor.read()?,
        };
        check_group_order(
            cursor,
            groups.last().map(|g| g.end_char_code),
            group.start_char_code,
            group.end_char_code,
            pos,
        )?;
        let last_gid = group
            .start_glyph_id
            .checked_add(group.end_char_code - group.start_char_code)
            .unwrap_or(u32::MAX);
        check_glyph(cursor, last_gid, num_glyphs, "startGlyphID", pos + 8)?;
        groups.push(group);
    }
    Ok(groups)
}

/// Groups must be non-empty ranges, in ascending order without overlap.
fn check_group_order(
    cursor: &Cursor,
    prev_end: Option<u32>,
    start: u32,
    end: u32,
    pos: usize,
) -> Result<(), DecodeError> {
    if start > end || prev_end.is_some_and(|prev_end| start <= prev_end) {
        return Err(cursor.error_at(ErrorKind::InconsistentStructure, "startCharCode", pos));
    }
    Ok(())
}

fn read_cmap8(data: FontData, num_glyphs: u16) -> Result<Cmap8, DecodeError> {
    let mut cursor = data.cursor().in_table(TAG);
    let language = read_long_header(&mut cursor)?;
    let is32 = cursor.read_bytes(8192)?.to_vec();
    let groups = read_sequential_groups(&mut cursor, num_glyphs)?;
    Ok(Cmap8 {
        language,
        is32,
        groups,
    })
}

fn read_cmap10(data: FontData, num_glyphs: u16) -> Result<Cmap10, DecodeError> {
    let mut cursor = data.cursor().in_table(TAG);
    let language = read_long_header(&mut cursor)?;
    let start_char_code = cursor.read()?;
    let num_chars: u32 = cursor.read()?;
    let glyphs_start = cursor.position();
    let glyph_id_array: Vec<u16> = cursor.read_array(num_chars as usize)?;
    for (i, gid) in glyph_id_array.iter().enumerate() {
        check_glyph(&cursor, *gid as u32, num_glyphs, "glyphIdArray", glyphs_start + i * 2)?;
    }
    Ok(Cmap10 {
        language,
        start_char_code,
        glyph_id_array,
    })
}

fn read_cmap12(data: FontData, num_glyphs: u16) -> Result<Cmap12, DecodeError> {
    let mut cursor = data.cursor().in_table(TAG);
    let language = read_long_header(&mut cursor)?;
    let groups = read_sequential_groups(&mut cursor, num_glyphs)?;
    Ok(Cmap12 { language, groups })
}

fn read_cmap13(data: FontData, num_glyphs: u16) -> Result<Cmap13, DecodeError> {
    let mut cursor = data.cursor().in_table(TAG);
    let language = read_long_header(&mut cursor)?;
    let num_groups: u32 = cursor.read()?;
    let mut groups: Vec<ConstantMapGroup> = Vec::new();
    for _ in 0..num_groups {
        let pos = cursor.position();
        let group = ConstantMapGroup {
            start_char_code: cursor.read()?,
            end_char_code: cursor.read()?,
            glyph_id: cursor.read()?,
        };
        check_group_order(
            &cursor,
            groups.last().map(|g| g.end_char_code),
            group.start_char_code,
            group.end_char_code,
            pos,
        )?;
        check_glyph(&cursor, group.glyph_id, num_glyphs, "glyphID", pos + 8)?;
        groups.push(group);
    }
    Ok(Cmap13 { language, groups })
}

fn read_cmap14(data: FontData, num_glyphs: u16) -> Result<Cmap14, DecodeError> {
    let mut cursor = data.cursor().in_table(TAG);
    cursor.advance_by(6)?; // format, length
    let num_records: u32 = cursor.read()?;
    let mut var_selectors: Vec<VariationSelector> = Vec::new();
    for _ in 0..num_records {
        let var_selector: Uint24 = cursor.read()?;
        let default_uvs_offset: Offset32 = cursor.read()?;
        let non_default_uvs_offset: Offset32 = cursor.read()?;

        // offsets are from the start of the subtable
        let default_uvs = default_uvs_offset
            .non_null()
            .map(|offset| read_default_uvs(data, offset))
            .transpose()?;
        let non_default_uvs = non_default_uvs_offset
            .non_null()
            .map(|offset| read_non_default_uvs(data, offset, num_glyphs))
            .transpose()?;
        let var_selector = var_selector.to_u32();
        if var_selectors
            .last()
            .is_some_and(|prev| prev.var_selector >= var_selector)
        {
            log::warn!("'cmap' format 14 variation selectors are not sorted");
        }
        var_selectors.push(VariationSelector {
            var_selector,
            default_uvs,
            non_default_uvs,
        });
    }
    Ok(Cmap14 { var_selectors })
}

fn read_default_uvs(data: FontData, offset: usize) -> Result<Vec<UnicodeRange>, DecodeError> {
    let mut cursor = data.cursor_at(offset).in_table(TAG);
    let num_ranges: u32 = cursor.read()?;
    let mut ranges = Vec::new();
    for _ in 0..num_ranges {
        ranges.push(UnicodeRange {
            start_unicode_value: cursor.read::<Uint24>()?.to_u32(),
            additional_count: cursor.read()?,
        });
    }
    Ok(ranges)
}

fn read_non_default_uvs(
    data: FontData,
    offset: usize,
    num_glyphs: u16,
) -> Result<Vec<UvsMapping>, DecodeError> {
    let mut cursor = data.cursor_at(offset).in_table(TAG);
    let num_mappings: u32 = cursor.read()?;
    let mut mappings = Vec::new();
    for _ in 0..num_mappings {
        let unicode_value = cursor.read::<Uint24>()?.to_u32();
        let pos = cursor.position();
        let glyph_id: GlyphId = cursor.read()?;
        check_glyph(&cursor, glyph_id.to_u32(), num_glyphs, "glyphID", pos)?;
        mappings.push(UvsMapping {
            unicode_value,
            glyph_id,
        });
    }
    Ok(mappings)
}
