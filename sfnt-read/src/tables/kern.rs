//! The [kern](https://docs.microsoft.com/en-us/typography/opentype/spec/kern) table

use types::{GlyphId, Tag};

use crate::{Cursor, DecodeError, ErrorKind, FontData, FontRead, TopLevelTable};

/// 'kern'
pub const TAG: Tag = Tag::new(b"kern");

/// The size of a format 0 subtable before its pairs.
const KERN0_HEADER_LEN: usize = 14;
const KERN_PAIR_LEN: usize = 6;

/// The [kern (Kerning)](https://docs.microsoft.com/en-us/typography/opentype/spec/kern) table,
/// in the OpenType (version 0) layout.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Kern {
    /// Table version number, set to 0.
    pub version: u16,
    pub subtables: Vec<KernSubtable>,
}

/// Flags in the low byte of a subtable's `coverage` field.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct KernCoverage(u8);

impl KernCoverage {
    /// The subtable has horizontal data.
    pub const HORIZONTAL: Self = Self(0x01);
    /// The subtable has minimum values, instead of kerning values.
    pub const MINIMUM: Self = Self(0x02);
    /// Kerning is perpendicular to the flow of the text.
    pub const CROSS_STREAM: Self = Self(0x04);
    /// The value in this subtable replaces the accumulated value.
    pub const OVERRIDE: Self = Self(0x08);

    pub const fn from_bits(bits: u8) -> Self {
        Self(bits)
    }

    pub const fn bits(self) -> u8 {
        self.0
    }

    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum KernSubtable {
    Format0(Kern0),
    /// A subtable in a format we don't decode; it is skipped using its length.
    Unsupported {
        format: u8,
        coverage: KernCoverage,
        length: u16,
    },
}

/// A format 0 subtable: an ordered list of kerning pairs.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Kern0 {
    pub coverage: KernCoverage,
    pub search_range: u16,
    pub entry_selector: u16,
    pub range_shift: u16,
    pub pairs: Vec<KernPair>,
    /// Pairs are required to be sorted by (left, right); fonts don't always comply.
    sorted: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct KernPair {
    pub left: GlyphId,
    pub right: GlyphId,
    /// The kerning value, in font units.
    pub value: i16,
}

impl Kern0 {
    /// The kerning value for this pair of glyphs, if one is present.
    pub fn kerning(&self, left: GlyphId, right: GlyphId) -> Option<i16> {
        let pair = if self.sorted {
            let idx = self
                .pairs
                .binary_search_by(|pair| (pair.left, pair.right).cmp(&(left, right)))
                .ok()?;
            self.pairs.get(idx)
        } else {
            self.pairs
                .iter()
                .find(|pair| pair.left == left && pair.right == right)
        };
        pair.map(|pair| pair.value)
    }
}

impl Kern {
    /// The accumulated horizontal kerning value for a pair of glyphs.
    ///
    /// Only format 0 subtables with horizontal kerning values contribute.
    /// Returns `None` if no subtable has an entry for the pair.
    pub fn kerning(&self, left: GlyphId, right: GlyphId) -> Option<i16> {
        let mut result = None;
        for subtable in &self.subtables {
            let KernSubtable::Format0(kern0) = subtable else {
                continue;
            };
            let coverage = kern0.coverage;
            if !coverage.contains(KernCoverage::HORIZONTAL)
                || coverage.contains(KernCoverage::MINIMUM)
                || coverage.contains(KernCoverage::CROSS_STREAM)
            {
                continue;
            }
            if let Some(value) = kern0.kerning(left, right) {
                result = Some(if coverage.contains(KernCoverage::OVERRIDE) {
                    value
                } else {
                    result.unwrap_or(0i16).saturating_add(value)
                });
            }
        }
        result
    }
}

impl TopLevelTable for Kern {
    const TAG: Tag = TAG;
}

impl<'a> FontRead<'a> for Kern {
    fn read(data: FontData<'a>) -> Result<Self, DecodeError> {
        let mut cursor = data.cursor().in_table(TAG);
        let version: u16 = cursor.read()?;
        if version != 0 {
            // version 1 is Apple's layout, with a 32-bit version and count
            return Err(cursor.error_at(ErrorKind::UnsupportedFormat, "version", 0));
        }
        let n_tables: u16 = cursor.read()?;
        let mut subtables = Vec::with_capacity(n_tables as usize);
        for _ in 0..n_tables {
            let start = cursor.position();
            let _subtable_version: u16 = cursor.read()?;
            let length: u16 = cursor.read()?;
            let format: u8 = cursor.read()?;
            let coverage = KernCoverage::from_bits(cursor.read()?);
            let subtable = match format {
                0 => KernSubtable::Format0(read_kern0(&mut cursor, coverage)?),
                _ => {
                    if (length as usize) < 6 {
                        return Err(cursor.error_at(
                            ErrorKind::InconsistentStructure,
                            "length",
                            start + 2,
                        ));
                    }
                    // the rest of the subtable, after the six byte header
                    cursor.advance_by(length as usize - 6)?;
                    log::trace!("skipping 'kern' subtable format {format}");
                    KernSubtable::Unsupported {
                        format,
                        coverage,
                        length,
                    }
                }
            };
            // format 0 lengths overflow u16 in large fonts; the pair count is used instead
            if let KernSubtable::Format0(kern0) = &subtable {
                let computed = KERN0_HEADER_LEN + kern0.pairs.len() * KERN_PAIR_LEN;
                if computed != length as usize {
                    log::debug!("'kern' format 0 length {length} does not match computed {computed}");
                }
            }
            subtables.push(subtable);
        }
        log::debug!("decoded 'kern': {} subtables", subtables.len());
        Ok(Kern { version, subtables })
    }
}

fn read_kern0(cursor: &mut Cursor, coverage: KernCoverage) -> Result<Kern0, DecodeError> {
    let n_pairs: u16 = cursor.read()?;
    let search_range = cursor.read()?;
    let entry_selector = cursor.read()?;
    let range_shift = cursor.read()?;
    let mut pairs = Vec::with_capacity(n_pairs as usize);
    for _ in 0..n_pairs {
        pairs.push(KernPair {
            left: cursor.read()?,
            right: cursor.read()?,
            value: cursor.read()?,
        });
    }
    let sorted = pairs
        .windows(2)
        .all(|w| (w[0].left, w[0].right) < (w[1].left, w[1].right));
    if !sorted {
        log::warn!("'kern' format 0 pairs are not sorted");
    }
    Ok(Kern0 {
        coverage,
        search_range,
        entry_selector,
        range_shift,
        pairs,
        sorted,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use sfnt_test_data::{be_buffer, kern as test_data};

    fn kern_pair(left: u16, right: u16, value: i16) -> KernPair {
        KernPair {
            left: left.into(),
            right: right.into(),
            value,
        }
    }

    fn format0(kern: &Kern, idx: usize) -> &Kern0 {
        match &kern.subtables[idx] {
            KernSubtable::Format0(kern0) => kern0,
            other => panic!("expected format 0, found {other:?}"),
        }
    }

    #[test]
    fn smoke_test() {
        let data = FontData::new(test_data::KERN_VER_0_FMT_0_DATA);
        let kern = Kern::read(data).unwrap();
        assert_eq!(kern.version, 0);
        assert_eq!(kern.subtables.len(), 1);

        let subtable = format0(&kern, 0);
        assert_eq!(subtable.coverage, KernCoverage::HORIZONTAL);
        assert_eq!(subtable.search_range, 12);
        assert_eq!(subtable.entry_selector, 1);
        assert_eq!(subtable.range_shift, 6);
        assert_eq!(
            subtable.pairs,
            [
                kern_pair(4, 12, -40),
                kern_pair(4, 28, 40),
                kern_pair(5, 40, -50),
            ]
        )
    }

    #[test]
    fn lookup() {
        let kern = Kern::read(FontData::new(test_data::KERN_VER_0_FMT_0_DATA)).unwrap();
        assert_eq!(kern.kerning(GlyphId::new(4), GlyphId::new(28)), Some(40));
        assert_eq!(kern.kerning(GlyphId::new(5), GlyphId::new(40)), Some(-50));
        assert_eq!(kern.kerning(GlyphId::new(28), GlyphId::new(4)), None);
    }

    #[test]
    fn unsorted_pairs() {
        let data = be_buffer! {
            0u16, 1u16,
            0u16, 26u16, 0x0001u16,
            2u16, 12u16, 1u16, 0u16,
            [5u16, 1], (-10i16),
            [4u16, 9], 20i16
        };
        let kern = Kern::read(FontData::new(&data)).unwrap();
        assert_eq!(kern.kerning(GlyphId::new(4), GlyphId::new(9)), Some(20));
        assert_eq!(kern.kerning(GlyphId::new(5), GlyphId::new(1)), Some(-10));
    }

    #[test]
    fn unsupported_subtable_is_skipped() {
        let kern = Kern::read(FontData::new(test_data::KERN_VER_0_MIXED_DATA)).unwrap();
        assert_eq!(kern.subtables.len(), 2);
        assert_eq!(format0(&kern, 0).pairs, [kern_pair(1, 2, -30)]);
        assert_eq!(
            kern.subtables[1],
            KernSubtable::Unsupported {
                format: 2,
                coverage: KernCoverage::HORIZONTAL,
                length: 10,
            }
        );
        assert_eq!(kern.kerning(GlyphId::new(1), GlyphId::new(2)), Some(-30));
    }

    #[test]
    fn apple_header_is_unsupported() {
        let err = Kern::read(FontData::new(test_data::KERN_VER_1_DATA)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnsupportedFormat);
        assert_eq!(err.tag(), Some(TAG));
    }

    #[test]
    fn truncated_pairs() {
        let data = test_data::KERN_VER_0_FMT_0_DATA;
        let err = Kern::read(FontData::new(&data[..data.len() - 1])).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::TruncatedInput);
        assert_eq!(err.offset(), 34);
    }

    #[test]
    fn short_subtable_length() {
        let data = be_buffer! {
            0u16, 1u16,
            0u16, 4u16, 0x0201u16
        };
        let err = Kern::read(FontData::new(&data)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InconsistentStructure);
        assert_eq!(err.offset(), 6);
    }

    #[test]
    fn accumulation() {
        // two horizontal subtables, and a cross-stream one that is ignored
        let data = be_buffer! {
            0u16, 3u16,
            0u16, 20u16, 0x0001u16, 1u16, 6u16, 0u16, 0u16, [1u16, 2], (-30i16),
            0u16, 20u16, 0x0001u16, 1u16, 6u16, 0u16, 0u16, [1u16, 2], 5i16,
            0u16, 20u16, 0x0005u16, 1u16, 6u16, 0u16, 0u16, [1u16, 2], 100i16
        };
        let kern = Kern::read(FontData::new(&data)).unwrap();
        assert_eq!(kern.kerning(GlyphId::new(1), GlyphId::new(2)), Some(-25));
    }
}
