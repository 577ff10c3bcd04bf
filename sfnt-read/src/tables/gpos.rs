//! the [GPOS] table
//!
//! [GPOS]: https://docs.microsoft.com/en-us/typography/opentype/spec/gpos

use types::{GlyphId, MajorMinor, Offset, Offset16, Offset32, Tag};

use crate::{DecodeError, ErrorKind, FontData, FontRead, TopLevelTable};

use super::layout::{CoverageTable, FeatureList, Lookup, LookupFlag, LookupList, ScriptList};
use super::value_record::{ValueFormat, ValueRecord};

/// 'GPOS'
pub const TAG: Tag = Tag::new(b"GPOS");

const SINGLE_ADJUSTMENT: u16 = 1;
const EXTENSION: u16 = 9;

/// [GPOS Version 1.0](https://docs.microsoft.com/en-us/typography/opentype/spec/gpos#gpos-header)
///
/// The header is decoded eagerly; the lists it points to are decoded on
/// request, since most callers only need some of them.
#[derive(Clone)]
pub struct Gpos<'a> {
    data: FontData<'a>,
    /// The major and minor version of the GPOS table, 1.0 or 1.1
    pub version: MajorMinor,
    /// Offset to ScriptList table, from beginning of GPOS table
    pub script_list_offset: Offset16,
    /// Offset to FeatureList table, from beginning of GPOS table
    pub feature_list_offset: Offset16,
    /// Offset to LookupList table, from beginning of GPOS table
    pub lookup_list_offset: Offset16,
    /// Offset to FeatureVariations table, present in version 1.1. Not followed.
    pub feature_variations_offset: Option<Offset32>,
}

impl TopLevelTable for Gpos<'_> {
    const TAG: Tag = TAG;
}

impl<'a> FontRead<'a> for Gpos<'a> {
    fn read(data: FontData<'a>) -> Result<Self, DecodeError> {
        let mut cursor = data.cursor().in_table(TAG);
        let version: MajorMinor = cursor.read()?;
        if version != MajorMinor::VERSION_1_0 && version != MajorMinor::VERSION_1_1 {
            return Err(cursor.error_at(ErrorKind::InvalidMagicOrVersion, "version", 0));
        }
        let script_list_offset = cursor.read()?;
        let feature_list_offset = cursor.read()?;
        let lookup_list_offset = cursor.read()?;
        let feature_variations_offset = version
            .compatible(MajorMinor::VERSION_1_1)
            .then(|| cursor.read())
            .transpose()?;
        log::debug!("decoded 'GPOS' header, version {}.{}", version.major, version.minor);
        Ok(Gpos {
            data,
            version,
            script_list_offset,
            feature_list_offset,
            lookup_list_offset,
            feature_variations_offset,
        })
    }
}

impl<'a> Gpos<'a> {
    pub fn offset_data(&self) -> FontData<'a> {
        self.data
    }

    pub fn script_list(&self) -> Result<ScriptList, DecodeError> {
        self.data
            .read_from(self.script_list_offset.to_usize())
            .map_err(|e| e.with_tag(TAG))
    }

    pub fn feature_list(&self) -> Result<FeatureList, DecodeError> {
        self.data
            .read_from(self.feature_list_offset.to_usize())
            .map_err(|e| e.with_tag(TAG))
    }

    pub fn lookup_list(&self) -> Result<LookupList, DecodeError> {
        self.data
            .read_from(self.lookup_list_offset.to_usize())
            .map_err(|e| e.with_tag(TAG))
    }

    /// Decode every lookup along with its subtables.
    ///
    /// Single adjustment subtables are decoded; other lookup types are
    /// returned as [`PositionSubtable::Other`]. Extension subtables are
    /// resolved to the subtable they wrap.
    pub fn lookups(&self) -> Result<Vec<PositionLookup>, DecodeError> {
        let list = self.lookup_list()?;
        let list_start = self.lookup_list_offset.to_usize();
        list.lookup_offsets
            .iter()
            .zip(list.lookups)
            .map(|(offset, lookup)| {
                self.resolve_lookup(list_start + offset.to_usize(), lookup)
            })
            .collect::<Result<_, _>>()
            .map_err(|e| e.with_tag(TAG))
    }

    fn resolve_lookup(
        &self,
        lookup_start: usize,
        lookup: Lookup,
    ) -> Result<PositionLookup, DecodeError> {
        let subtables = lookup
            .subtable_offsets
            .iter()
            .map(|offset| {
                self.resolve_subtable(lookup.lookup_type, lookup_start + offset.to_usize())
            })
            .collect::<Result<_, _>>()?;
        Ok(PositionLookup {
            lookup_type: lookup.lookup_type,
            lookup_flag: lookup.lookup_flag,
            mark_filtering_set: lookup.mark_filtering_set,
            subtables,
        })
    }

    fn resolve_subtable(
        &self,
        lookup_type: u16,
        offset: usize,
    ) -> Result<PositionSubtable, DecodeError> {
        match lookup_type {
            SINGLE_ADJUSTMENT => self.data.read_from(offset).map(PositionSubtable::Single),
            EXTENSION => {
                let ext = self.data.expect_split_off(offset, "extension subtable")?;
                let mut cursor = ext.cursor();
                let format: u16 = cursor.read()?;
                if format != 1 {
                    return Err(cursor.error_at(ErrorKind::UnsupportedFormat, "posFormat", 0));
                }
                let extension_lookup_type: u16 = cursor.read()?;
                if extension_lookup_type == EXTENSION {
                    return Err(cursor.error_at(
                        ErrorKind::InconsistentStructure,
                        "extensionLookupType",
                        2,
                    ));
                }
                let extension_offset: Offset32 = cursor.read()?;
                log::trace!(
                    "extension at {offset} wraps lookup type {extension_lookup_type}"
                );
                self.resolve_subtable(
                    extension_lookup_type,
                    offset + extension_offset.to_usize(),
                )
            }
            _ => Ok(PositionSubtable::Other {
                lookup_type,
                offset,
            }),
        }
    }
}

impl std::fmt::Debug for Gpos<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Gpos")
            .field("version", &self.version)
            .field("script_list_offset", &self.script_list_offset)
            .field("feature_list_offset", &self.feature_list_offset)
            .field("lookup_list_offset", &self.lookup_list_offset)
            .field("feature_variations_offset", &self.feature_variations_offset)
            .finish()
    }
}

/// A lookup with its subtables resolved.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct PositionLookup {
    /// The declared lookup type; 9 for extension lookups.
    pub lookup_type: u16,
    pub lookup_flag: LookupFlag,
    pub mark_filtering_set: Option<u16>,
    pub subtables: Vec<PositionSubtable>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum PositionSubtable {
    Single(SinglePos),
    /// A subtable of a lookup type that is not decoded.
    Other {
        lookup_type: u16,
        /// Offset from the start of the GPOS table.
        offset: usize,
    },
}

/// [Single Adjustment Positioning Subtable](https://docs.microsoft.com/en-us/typography/opentype/spec/gpos#single-adjustment-positioning-format-1-single-positioning-value)
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum SinglePos {
    /// One value record applied to every covered glyph
    Format1 {
        coverage: CoverageTable,
        value_format: ValueFormat,
        value_record: ValueRecord,
    },
    /// One value record per covered glyph, in coverage index order
    Format2 {
        coverage: CoverageTable,
        value_format: ValueFormat,
        value_records: Vec<ValueRecord>,
    },
}

impl SinglePos {
    pub fn format(&self) -> u16 {
        match self {
            SinglePos::Format1 { .. } => 1,
            SinglePos::Format2 { .. } => 2,
        }
    }

    pub fn coverage(&self) -> &CoverageTable {
        match self {
            SinglePos::Format1 { coverage, .. } | SinglePos::Format2 { coverage, .. } => coverage,
        }
    }

    /// The adjustment for a glyph, if it is covered.
    pub fn adjustment(&self, gid: impl Into<GlyphId>) -> Option<&ValueRecord> {
        let index = self.coverage().get(gid)?;
        match self {
            SinglePos::Format1 { value_record, .. } => Some(value_record),
            SinglePos::Format2 { value_records, .. } => value_records.get(index as usize),
        }
    }
}

impl<'a> FontRead<'a> for SinglePos {
    fn read(data: FontData<'a>) -> Result<Self, DecodeError> {
        let mut cursor = data.cursor();
        let format: u16 = cursor.read()?;
        if !matches!(format, 1 | 2) {
            return Err(cursor.error_at(ErrorKind::UnsupportedFormat, "posFormat", 0));
        }
        let coverage_offset: Offset16 = cursor.read()?;
        let value_format = ValueFormat::from_bits(cursor.read()?).ok_or_else(|| {
            cursor.error_at(ErrorKind::InconsistentStructure, "valueFormat", 4)
        })?;
        let coverage: CoverageTable = data.read_from(coverage_offset.to_usize())?;
        if format == 1 {
            let value_record = ValueRecord::read(&mut cursor, value_format)?;
            return Ok(SinglePos::Format1 {
                coverage,
                value_format,
                value_record,
            });
        }
        let value_count: u16 = cursor.read()?;
        if value_count as usize != coverage.glyph_count() {
            return Err(cursor.error_at(ErrorKind::InconsistentStructure, "valueCount", 6));
        }
        let value_records = (0..value_count)
            .map(|_| ValueRecord::read(&mut cursor, value_format))
            .collect::<Result<_, _>>()?;
        Ok(SinglePos::Format2 {
            coverage,
            value_format,
            value_records,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use sfnt_test_data::gpos as test_data;

    fn single(subtable: &PositionSubtable) -> &SinglePos {
        match subtable {
            PositionSubtable::Single(single) => single,
            other => panic!("expected single adjustment, found {other:?}"),
        }
    }

    #[test]
    fn singleposformat1() {
        let table = SinglePos::read(FontData::new(test_data::SINGLEPOSFORMAT1)).unwrap();
        assert_eq!(table.format(), 1);
        assert_eq!(table.coverage().glyph_count(), 10);
        let adjustment = table.adjustment(GlyphId::new(0xB4)).unwrap();
        assert_eq!(adjustment.y_placement, Some(-80));
        assert_eq!(adjustment.x_placement, None);
        assert!(table.adjustment(GlyphId::new(0xBC)).is_none());
    }

    #[test]
    fn singleposformat2() {
        let table = SinglePos::read(FontData::new(test_data::SINGLEPOSFORMAT2)).unwrap();
        let SinglePos::Format2 {
            value_format,
            value_records,
            ..
        } = &table
        else {
            panic!("expected format 2");
        };
        assert_eq!(value_format.record_byte_len(), 4);
        assert_eq!(value_records.len(), 3);
        let adjustment = table.adjustment(GlyphId::new(0x7D)).unwrap();
        assert_eq!(adjustment.x_placement, Some(25));
        assert_eq!(adjustment.x_advance, Some(25));
        assert_eq!(adjustment.y_advance, None);
    }

    #[test]
    fn value_count_must_match_coverage() {
        let mut data = test_data::SINGLEPOSFORMAT2.to_vec();
        data[7] = 2;
        let err = SinglePos::read(FontData::new(&data)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InconsistentStructure);
        assert_eq!(err.offset(), 6);
    }

    #[test]
    fn reserved_value_format_bits() {
        let mut data = test_data::SINGLEPOSFORMAT1.to_vec();
        data[4] = 0x01;
        let err = SinglePos::read(FontData::new(&data)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InconsistentStructure);
        assert_eq!(err.offset(), 4);
    }

    #[test]
    fn simple_gpos() {
        let data = test_data::simple_gpos();
        let gpos = Gpos::read(FontData::new(&data)).unwrap();
        assert_eq!(gpos.version, MajorMinor::VERSION_1_0);
        assert_eq!(gpos.feature_variations_offset, None);
        assert_eq!(gpos.script_list().unwrap().script_records.len(), 1);
        assert_eq!(gpos.feature_list().unwrap().feature_records.len(), 1);

        let lookups = gpos.lookups().unwrap();
        assert_eq!(lookups.len(), 1);
        assert_eq!(lookups[0].lookup_type, 1);
        assert_eq!(lookups[0].subtables.len(), 1);
        let table = single(&lookups[0].subtables[0]);
        let adjustment = table.adjustment(GlyphId::new(3)).unwrap();
        assert_eq!(adjustment.x_advance, Some(-10));
        assert!(table.adjustment(GlyphId::new(4)).is_none());
    }

    #[test]
    fn extension_and_undecoded_lookups() {
        let data = test_data::gpos_1_1();
        let gpos = Gpos::read(FontData::new(&data)).unwrap();
        assert_eq!(gpos.version, MajorMinor::VERSION_1_1);
        assert_eq!(gpos.feature_variations_offset, Some(Offset32::new(0)));

        let lookups = gpos.lookups().unwrap();
        assert_eq!(lookups.len(), 3);

        assert_eq!(lookups[0].mark_filtering_set, Some(5));
        let first = single(&lookups[0].subtables[0]);
        assert_eq!(first.format(), 2);
        let adjustment = first.adjustment(GlyphId::new(20)).unwrap();
        assert_eq!(
            (adjustment.x_placement, adjustment.x_advance),
            (Some(50), Some(25))
        );
        let adjustment = first.adjustment(GlyphId::new(21)).unwrap();
        assert_eq!(
            (adjustment.x_placement, adjustment.x_advance),
            (Some(10), Some(-5))
        );

        assert_eq!(lookups[1].lookup_type, 9);
        let wrapped = single(&lookups[1].subtables[0]);
        assert_eq!(wrapped.format(), 1);
        assert_eq!(
            wrapped.adjustment(GlyphId::new(31)).unwrap().y_placement,
            Some(-80)
        );

        assert_eq!(
            lookups[2].subtables,
            [PositionSubtable::Other {
                lookup_type: 2,
                offset: 162
            }]
        );
    }

    #[test]
    fn bad_version() {
        let mut data = test_data::simple_gpos().to_vec();
        data[3] = 2;
        let err = Gpos::read(FontData::new(&data)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidMagicOrVersion);
        assert_eq!(err.tag(), Some(TAG));
    }

    #[test]
    fn nested_errors_are_tagged() {
        let data = test_data::simple_gpos();
        let truncated = &data[..60];
        let gpos = Gpos::read(FontData::new(truncated)).unwrap();
        assert!(gpos.script_list().is_ok());
        let err = gpos.lookups().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::TruncatedInput);
        assert_eq!(err.tag(), Some(TAG));
    }
}
