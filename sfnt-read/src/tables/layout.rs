//! OpenType Layout common table formats
//!
//! Offsets inside these tables are relative to the start of the table that
//! contains them; callers resolve the list tables against their parent.

#[path = "./lookupflag.rs"]
mod lookupflag;

pub use lookupflag::LookupFlag;

use types::{GlyphId, Offset, Offset16, Tag};

use crate::{DecodeError, ErrorKind, FontData, FontRead};

/// The value of `requiredFeatureIndex` when there is no required feature.
const NO_REQUIRED_FEATURE: u16 = 0xFFFF;

/// [Script List Table](https://docs.microsoft.com/en-us/typography/opentype/spec/chapter2#script-list-table-and-script-record)
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct ScriptList {
    /// Array of ScriptRecords, listed alphabetically by script tag
    pub script_records: Vec<ScriptRecord>,
}

/// [Script Record](https://docs.microsoft.com/en-us/typography/opentype/spec/chapter2#script-list-table-and-script-record)
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct ScriptRecord {
    /// 4-byte script tag identifier
    pub script_tag: Tag,
    pub script: Script,
}

/// [Script Table](https://docs.microsoft.com/en-us/typography/opentype/spec/chapter2#script-table-and-language-system-record)
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Script {
    /// The default language system, if the offset is not null.
    pub default_lang_sys: Option<LangSys>,
    /// Array of LangSysRecords, listed alphabetically by LangSys tag
    pub lang_sys_records: Vec<LangSysRecord>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct LangSysRecord {
    /// 4-byte LangSysTag identifier
    pub lang_sys_tag: Tag,
    pub lang_sys: LangSys,
}

/// [Language System Table](https://docs.microsoft.com/en-us/typography/opentype/spec/chapter2#language-system-table)
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct LangSys {
    /// Index of a feature required for this language system; `None` if
    /// there is no required feature.
    pub required_feature_index: Option<u16>,
    /// Array of indices into the FeatureList, in arbitrary order
    pub feature_indices: Vec<u16>,
}

/// [Feature List Table](https://docs.microsoft.com/en-us/typography/opentype/spec/chapter2#feature-list-table)
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct FeatureList {
    /// Array of FeatureRecords; zero-based (first feature has
    /// FeatureIndex = 0), listed alphabetically by feature tag
    pub feature_records: Vec<FeatureRecord>,
}

/// Part of [FeatureList]
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct FeatureRecord {
    /// 4-byte feature identification tag
    pub feature_tag: Tag,
    pub feature: Feature,
}

/// [Feature Table](https://docs.microsoft.com/en-us/typography/opentype/spec/chapter2#feature-table)
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Feature {
    /// Offset from start of Feature table to FeatureParams table, if defined
    /// for the feature and present, else NULL. Not followed.
    pub feature_params_offset: Offset16,
    /// Array of indices into the LookupList; zero-based (first lookup is
    /// LookupListIndex = 0)
    pub lookup_list_indices: Vec<u16>,
}

/// [Lookup List Table](https://docs.microsoft.com/en-us/typography/opentype/spec/chapter2#lookup-list-table)
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct LookupList {
    /// Offsets to Lookup tables, from beginning of LookupList
    pub lookup_offsets: Vec<Offset16>,
    pub lookups: Vec<Lookup>,
}

/// [Lookup Table](https://docs.microsoft.com/en-us/typography/opentype/spec/chapter2#lookup-table)
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Lookup {
    /// Different enumerations for GSUB and GPOS
    pub lookup_type: u16,
    /// Lookup qualifiers
    pub lookup_flag: LookupFlag,
    /// Array of offsets to lookup subtables, from beginning of Lookup table
    pub subtable_offsets: Vec<Offset16>,
    /// Index (base 0) into GDEF mark glyph sets structure. Present only
    /// when the USE_MARK_FILTERING_SET lookup flag is set.
    pub mark_filtering_set: Option<u16>,
}

/// [Coverage Table](https://docs.microsoft.com/en-us/typography/opentype/spec/chapter2#coverage-table)
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum CoverageTable {
    /// Individual glyph indices, in numerical order.
    Format1 { glyph_array: Vec<GlyphId> },
    /// Ranges of consecutive glyph indices, in numerical order.
    Format2 { range_records: Vec<RangeRecord> },
}

/// Used in [CoverageTable] format 2
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct RangeRecord {
    /// First glyph ID in the range
    pub start_glyph_id: GlyphId,
    /// Last glyph ID in the range
    pub end_glyph_id: GlyphId,
    /// Coverage Index of first glyph ID in range
    pub start_coverage_index: u16,
}

impl ScriptList {
    /// The script with the given tag.
    pub fn get(&self, tag: Tag) -> Option<&Script> {
        self.script_records
            .iter()
            .find(|record| record.script_tag == tag)
            .map(|record| &record.script)
    }
}

impl Script {
    /// The language system with the given tag.
    pub fn lang_sys(&self, tag: Tag) -> Option<&LangSys> {
        self.lang_sys_records
            .iter()
            .find(|record| record.lang_sys_tag == tag)
            .map(|record| &record.lang_sys)
    }
}

impl FeatureList {
    /// The feature record at the given feature index.
    pub fn get(&self, index: u16) -> Option<&FeatureRecord> {
        self.feature_records.get(index as usize)
    }
}

impl CoverageTable {
    /// The number of glyphs covered.
    pub fn glyph_count(&self) -> usize {
        match self {
            CoverageTable::Format1 { glyph_array } => glyph_array.len(),
            CoverageTable::Format2 { range_records } => range_records
                .iter()
                .map(|range| {
                    (range.end_glyph_id.to_u16() - range.start_glyph_id.to_u16()) as usize + 1
                })
                .sum(),
        }
    }

    /// If this glyph is in the coverage table, returns its index
    pub fn get(&self, gid: impl Into<GlyphId>) -> Option<u16> {
        let gid = gid.into();
        match self {
            CoverageTable::Format1 { glyph_array } => glyph_array
                .binary_search(&gid)
                .ok()
                .and_then(|idx| u16::try_from(idx).ok()),
            CoverageTable::Format2 { range_records } => range_records
                .iter()
                .find(|range| range.start_glyph_id <= gid && gid <= range.end_glyph_id)
                .map(|range| {
                    range
                        .start_coverage_index
                        .wrapping_add(gid.to_u16() - range.start_glyph_id.to_u16())
                }),
        }
    }

    /// Iterate over the glyph ids in this table, in coverage index order.
    pub fn iter(&self) -> impl Iterator<Item = GlyphId> + '_ {
        let (glyphs, ranges) = match self {
            CoverageTable::Format1 { glyph_array } => (Some(glyph_array.iter().copied()), None),
            CoverageTable::Format2 { range_records } => (None, Some(range_records.iter())),
        };
        glyphs
            .into_iter()
            .flatten()
            .chain(ranges.into_iter().flatten().flat_map(|range| {
                (range.start_glyph_id.to_u16()..=range.end_glyph_id.to_u16()).map(GlyphId::new)
            }))
    }
}

impl<'a> FontRead<'a> for ScriptList {
    fn read(data: FontData<'a>) -> Result<Self, DecodeError> {
        let mut cursor = data.cursor();
        let script_count: u16 = cursor.read()?;
        let mut script_records = Vec::with_capacity(script_count as usize);
        for _ in 0..script_count {
            let script_tag = cursor.read()?;
            let script_offset: Offset16 = cursor.read()?;
            script_records.push(ScriptRecord {
                script_tag,
                script: data.read_from(script_offset.to_usize())?,
            });
        }
        Ok(ScriptList { script_records })
    }
}

impl<'a> FontRead<'a> for Script {
    fn read(data: FontData<'a>) -> Result<Self, DecodeError> {
        let mut cursor = data.cursor();
        let default_lang_sys_offset: Offset16 = cursor.read()?;
        let default_lang_sys = default_lang_sys_offset
            .non_null()
            .map(|offset| data.read_from(offset))
            .transpose()?;
        let lang_sys_count: u16 = cursor.read()?;
        let mut lang_sys_records = Vec::with_capacity(lang_sys_count as usize);
        for _ in 0..lang_sys_count {
            let lang_sys_tag = cursor.read()?;
            let lang_sys_offset: Offset16 = cursor.read()?;
            lang_sys_records.push(LangSysRecord {
                lang_sys_tag,
                lang_sys: data.read_from(lang_sys_offset.to_usize())?,
            });
        }
        Ok(Script {
            default_lang_sys,
            lang_sys_records,
        })
    }
}

impl<'a> FontRead<'a> for LangSys {
    fn read(data: FontData<'a>) -> Result<Self, DecodeError> {
        let mut cursor = data.cursor();
        let _lookup_order_offset: u16 = cursor.read()?;
        let required_feature_index: u16 = cursor.read()?;
        let feature_index_count: u16 = cursor.read()?;
        let feature_indices = cursor.read_array(feature_index_count as usize)?;
        Ok(LangSys {
            required_feature_index: (required_feature_index != NO_REQUIRED_FEATURE)
                .then_some(required_feature_index),
            feature_indices,
        })
    }
}

impl<'a> FontRead<'a> for FeatureList {
    fn read(data: FontData<'a>) -> Result<Self, DecodeError> {
        let mut cursor = data.cursor();
        let feature_count: u16 = cursor.read()?;
        let mut feature_records = Vec::with_capacity(feature_count as usize);
        for _ in 0..feature_count {
            let feature_tag = cursor.read()?;
            let feature_offset: Offset16 = cursor.read()?;
            feature_records.push(FeatureRecord {
                feature_tag,
                feature: data.read_from(feature_offset.to_usize())?,
            });
        }
        Ok(FeatureList { feature_records })
    }
}

impl<'a> FontRead<'a> for Feature {
    fn read(data: FontData<'a>) -> Result<Self, DecodeError> {
        let mut cursor = data.cursor();
        let feature_params_offset = cursor.read()?;
        let lookup_index_count: u16 = cursor.read()?;
        let lookup_list_indices = cursor.read_array(lookup_index_count as usize)?;
        Ok(Feature {
            feature_params_offset,
            lookup_list_indices,
        })
    }
}

impl<'a> FontRead<'a> for LookupList {
    fn read(data: FontData<'a>) -> Result<Self, DecodeError> {
        let mut cursor = data.cursor();
        let lookup_count: u16 = cursor.read()?;
        let lookup_offsets: Vec<Offset16> = cursor.read_array(lookup_count as usize)?;
        let lookups = lookup_offsets
            .iter()
            .map(|offset| data.read_from(offset.to_usize()))
            .collect::<Result<_, _>>()?;
        Ok(LookupList {
            lookup_offsets,
            lookups,
        })
    }
}

impl<'a> FontRead<'a> for Lookup {
    fn read(data: FontData<'a>) -> Result<Self, DecodeError> {
        let mut cursor = data.cursor();
        let lookup_type = cursor.read()?;
        let lookup_flag: LookupFlag = cursor.read()?;
        let sub_table_count: u16 = cursor.read()?;
        let subtable_offsets = cursor.read_array(sub_table_count as usize)?;
        let mark_filtering_set = lookup_flag
            .use_mark_filtering_set()
            .then(|| cursor.read())
            .transpose()?;
        Ok(Lookup {
            lookup_type,
            lookup_flag,
            subtable_offsets,
            mark_filtering_set,
        })
    }
}

impl<'a> FontRead<'a> for CoverageTable {
    fn read(data: FontData<'a>) -> Result<Self, DecodeError> {
        let mut cursor = data.cursor();
        let format: u16 = cursor.read()?;
        match format {
            1 => {
                let glyph_count: u16 = cursor.read()?;
                let glyph_array: Vec<GlyphId> = cursor.read_array(glyph_count as usize)?;
                if !glyph_array.windows(2).all(|pair| pair[0] < pair[1]) {
                    log::warn!("coverage format 1 glyphs are not sorted");
                }
                Ok(CoverageTable::Format1 { glyph_array })
            }
            2 => {
                let range_count: u16 = cursor.read()?;
                let mut range_records = Vec::with_capacity(range_count as usize);
                for _ in 0..range_count {
                    let pos = cursor.position();
                    let range = RangeRecord {
                        start_glyph_id: cursor.read()?,
                        end_glyph_id: cursor.read()?,
                        start_coverage_index: cursor.read()?,
                    };
                    if range.start_glyph_id > range.end_glyph_id {
                        return Err(cursor.error_at(
                            ErrorKind::InconsistentStructure,
                            "startGlyphID",
                            pos,
                        ));
                    }
                    range_records.push(range);
                }
                Ok(CoverageTable::Format2 { range_records })
            }
            _ => Err(cursor.error_at(ErrorKind::UnsupportedFormat, "coverageFormat", 0)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use sfnt_test_data::{be_buffer, gpos as test_data};

    fn gid(raw: u16) -> GlyphId {
        GlyphId::new(raw)
    }

    #[test]
    fn coverage_format_1() {
        let data = FontData::new(&test_data::SINGLEPOSFORMAT2[20..]);
        let coverage = CoverageTable::read(data).unwrap();
        assert_eq!(coverage.glyph_count(), 3);
        assert_eq!(coverage.get(gid(0x4F)), Some(0));
        assert_eq!(coverage.get(gid(0x7E)), Some(2));
        assert_eq!(coverage.get(gid(0x50)), None);
        assert_eq!(
            coverage.iter().collect::<Vec<_>>(),
            [gid(0x4F), gid(0x7D), gid(0x7E)]
        );
    }

    #[test]
    fn coverage_format_2() {
        let data = FontData::new(&test_data::SINGLEPOSFORMAT1[8..]);
        let coverage = CoverageTable::read(data).unwrap();
        assert_eq!(coverage.glyph_count(), 10);
        assert_eq!(coverage.get(gid(0xB2)), Some(0));
        assert_eq!(coverage.get(gid(0xB5)), Some(3));
        assert_eq!(coverage.get(gid(0xBB)), Some(9));
        assert_eq!(coverage.get(gid(0xBC)), None);
        assert_eq!(coverage.iter().count(), 10);
        assert_eq!(coverage.iter().last(), Some(gid(0xBB)));
    }

    #[test]
    fn coverage_bad_range() {
        let data = be_buffer! { 2u16, 2u16, [1u16, 4, 0], [9u16, 8, 4] };
        let err = CoverageTable::read(FontData::new(&data)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InconsistentStructure);
        assert_eq!(err.offset(), 10);
    }

    #[test]
    fn coverage_bad_format() {
        let data = be_buffer! { 3u16, 0u16 };
        let err = CoverageTable::read(FontData::new(&data)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnsupportedFormat);
    }

    #[test]
    fn script_and_feature_lists() {
        let data = test_data::simple_gpos();
        let data = FontData::new(&data);
        let scripts: ScriptList = data.read_from(10).unwrap();
        let latn = scripts.get(Tag::new(b"latn")).unwrap();
        assert_eq!(
            latn.default_lang_sys,
            Some(LangSys {
                required_feature_index: None,
                feature_indices: vec![0],
            })
        );
        assert!(latn.lang_sys_records.is_empty());
        assert_eq!(scripts.get(Tag::new(b"cyrl")), None);

        let features: FeatureList = data.read_from(30).unwrap();
        let kern = features.get(0).unwrap();
        assert_eq!(kern.feature_tag, Tag::new(b"kern"));
        assert_eq!(kern.feature.lookup_list_indices, [0]);
        assert!(kern.feature.feature_params_offset.is_null());
    }

    #[test]
    fn lang_sys_records() {
        let data = test_data::gpos_1_1();
        let scripts: ScriptList = FontData::new(&data).read_from(14).unwrap();
        let latn = scripts.get(Tag::new(b"latn")).unwrap();
        assert_eq!(latn.default_lang_sys.as_ref().unwrap().feature_indices, [0, 1]);
        let trk = latn.lang_sys(Tag::new(b"TRK ")).unwrap();
        assert_eq!(trk.required_feature_index, Some(1));
        assert_eq!(trk.feature_indices, [1]);
    }

    #[test]
    fn lookups() {
        let data = test_data::gpos_1_1();
        let lookups: LookupList = FontData::new(&data).read_from(78).unwrap();
        assert_eq!(lookups.lookups.len(), 3);
        let first = &lookups.lookups[0];
        assert_eq!(first.lookup_type, 1);
        assert!(first.lookup_flag.use_mark_filtering_set());
        assert_eq!(first.mark_filtering_set, Some(5));
        assert_eq!(first.subtable_offsets, [Offset16::new(26)]);
        assert_eq!(lookups.lookups[1].lookup_type, 9);
        assert_eq!(lookups.lookups[1].mark_filtering_set, None);
    }

    #[test]
    fn truncated_lookup_list() {
        let data = test_data::gpos_1_1();
        let err = FontData::new(&data[..100])
            .read_from::<LookupList>(78)
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::TruncatedInput);
    }
}
