//! The [os2](https://docs.microsoft.com/en-us/typography/opentype/spec/os2) table

use types::Tag;

use crate::{Cursor, DecodeError, FontData, FontRead, TopLevelTable};

/// 'OS/2'
pub const TAG: Tag = Tag::new(b"OS/2");

/// The size of the fields present in every version.
pub const VERSION_0_LEN: usize = 78;

/// The highest version with known fields.
pub const MAX_KNOWN_VERSION: u16 = 5;

/// Groups of fields appended to the table by later versions.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum FieldGroup {
    /// `ulCodePageRange1`, `ulCodePageRange2`
    CodePageRange,
    /// `sxHeight` through `usMaxContext`
    XHeightToMaxContext,
    /// `usLowerOpticalPointSize`, `usUpperOpticalPointSize`
    OpticalSize,
}

/// (first version, group, byte length), in table order.
///
/// Both decoding and [`Os2::expected_len`] walk this list.
const VERSION_GATES: [(u16, FieldGroup, usize); 3] = [
    (1, FieldGroup::CodePageRange, 8),
    (2, FieldGroup::XHeightToMaxContext, 10),
    (5, FieldGroup::OpticalSize, 4),
];

/// [`OS/2`](https://docs.microsoft.com/en-us/typography/opentype/spec/os2)
///
/// Fields introduced after the table's declared version are `None`, even if
/// the table has bytes where they would be.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Os2 {
    /// The version as declared in the table.
    pub version: u16,
    /// Average advance width of all non-zero width glyphs.
    pub x_avg_char_width: i16,
    /// Visual weight, from 1 to 1000.
    pub us_weight_class: u16,
    /// Relative change from the normal aspect ratio, from 1 to 9.
    pub us_width_class: u16,
    /// Font embedding licensing rights.
    pub fs_type: u16,
    pub y_subscript_x_size: i16,
    pub y_subscript_y_size: i16,
    pub y_subscript_x_offset: i16,
    pub y_subscript_y_offset: i16,
    pub y_superscript_x_size: i16,
    pub y_superscript_y_size: i16,
    pub y_superscript_x_offset: i16,
    pub y_superscript_y_offset: i16,
    pub y_strikeout_size: i16,
    pub y_strikeout_position: i16,
    /// Font-family class and subclass.
    pub s_family_class: i16,
    /// PANOSE classification number.
    pub panose_10: [u8; 10],
    /// Unicode character range bits 0-127.
    pub ul_unicode_range: [u32; 4],
    /// Font Vendor Identification.
    pub ach_vend_id: Tag,
    /// Font selection flags.
    pub fs_selection: u16,
    /// The minimum Unicode index (character code) in this font.
    pub us_first_char_index: u16,
    /// The maximum Unicode index (character code) in this font.
    pub us_last_char_index: u16,
    pub s_typo_ascender: i16,
    pub s_typo_descender: i16,
    pub s_typo_line_gap: i16,
    /// The “above baseline” part of the Windows clipping region.
    pub us_win_ascent: u16,
    /// The “below baseline” part of the Windows clipping region.
    pub us_win_descent: u16,
    /// Code page character range bits 0-63. Version 1 and later.
    pub ul_code_page_range: Option<[u32; 2]>,
    /// Version 2 and later.
    pub sx_height: Option<i16>,
    /// Version 2 and later.
    pub s_cap_height: Option<i16>,
    /// Version 2 and later.
    pub us_default_char: Option<u16>,
    /// Version 2 and later.
    pub us_break_char: Option<u16>,
    /// Version 2 and later.
    pub us_max_context: Option<u16>,
    /// Version 5 and later, in TWIPs.
    pub us_lower_optical_point_size: Option<u16>,
    /// Version 5 and later, in TWIPs.
    pub us_upper_optical_point_size: Option<u16>,
}

impl Os2 {
    /// The number of bytes read for a table declaring `version`.
    pub fn expected_len(version: u16) -> usize {
        let version = version.min(MAX_KNOWN_VERSION);
        VERSION_0_LEN
            + VERSION_GATES
                .iter()
                .filter(|(first, _, _)| version >= *first)
                .map(|(_, _, len)| len)
                .sum::<usize>()
    }

    fn read_group(&mut self, group: FieldGroup, cursor: &mut Cursor) -> Result<(), DecodeError> {
        match group {
            FieldGroup::CodePageRange => {
                self.ul_code_page_range = Some([cursor.read()?, cursor.read()?]);
            }
            FieldGroup::XHeightToMaxContext => {
                self.sx_height = Some(cursor.read()?);
                self.s_cap_height = Some(cursor.read()?);
                self.us_default_char = Some(cursor.read()?);
                self.us_break_char = Some(cursor.read()?);
                self.us_max_context = Some(cursor.read()?);
            }
            FieldGroup::OpticalSize => {
                self.us_lower_optical_point_size = Some(cursor.read()?);
                self.us_upper_optical_point_size = Some(cursor.read()?);
            }
        }
        Ok(())
    }
}

impl TopLevelTable for Os2 {
    const TAG: Tag = TAG;
}

impl<'a> FontRead<'a> for Os2 {
    fn read(data: FontData<'a>) -> Result<Self, DecodeError> {
        let mut cursor = data.cursor().in_table(TAG);
        let version: u16 = cursor.read()?;
        let mut os2 = Os2 {
            version,
            x_avg_char_width: cursor.read()?,
            us_weight_class: cursor.read()?,
            us_width_class: cursor.read()?,
            fs_type: cursor.read()?,
            y_subscript_x_size: cursor.read()?,
            y_subscript_y_size: cursor.read()?,
            y_subscript_x_offset: cursor.read()?,
            y_subscript_y_offset: cursor.read()?,
            y_superscript_x_size: cursor.read()?,
            y_superscript_y_size: cursor.read()?,
            y_superscript_x_offset: cursor.read()?,
            y_superscript_y_offset: cursor.read()?,
            y_strikeout_size: cursor.read()?,
            y_strikeout_position: cursor.read()?,
            s_family_class: cursor.read()?,
            panose_10: cursor.read_bytes(10)?.try_into().unwrap_or_default(),
            ul_unicode_range: [
                cursor.read()?,
                cursor.read()?,
                cursor.read()?,
                cursor.read()?,
            ],
            ach_vend_id: cursor.read()?,
            fs_selection: cursor.read()?,
            us_first_char_index: cursor.read()?,
            us_last_char_index: cursor.read()?,
            s_typo_ascender: cursor.read()?,
            s_typo_descender: cursor.read()?,
            s_typo_line_gap: cursor.read()?,
            us_win_ascent: cursor.read()?,
            us_win_descent: cursor.read()?,
            ..Default::default()
        };

        if version > MAX_KNOWN_VERSION {
            log::warn!("'OS/2' version {version} is newer than {MAX_KNOWN_VERSION}, reading as {MAX_KNOWN_VERSION}");
        }
        let effective_version = version.min(MAX_KNOWN_VERSION);
        for (first_version, group, len) in VERSION_GATES {
            if effective_version < first_version {
                break;
            }
            let start = cursor.position();
            os2.read_group(group, &mut cursor)?;
            debug_assert_eq!(cursor.position() - start, len);
        }
        debug_assert_eq!(cursor.position(), Os2::expected_len(version));
        log::debug!("decoded 'OS/2' version {version}");
        Ok(os2)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ErrorKind;
    use pretty_assertions::assert_eq;
    use sfnt_test_data::bebuffer::BeBuffer;

    // the tiny font's version 4 table, relabeled as `version`
    fn os2_with_version(version: u16) -> Vec<u8> {
        let mut data = sfnt_test_data::tiny::os2().into_inner();
        data[..2].copy_from_slice(&version.to_be_bytes());
        data
    }

    #[test]
    fn version_4() {
        let data = os2_with_version(4);
        assert_eq!(data.len(), 96);
        let os2 = Os2::read(FontData::new(&data)).unwrap();
        assert_eq!(os2.us_weight_class, 400);
        assert_eq!(os2.panose_10, [2, 0, 5, 3, 0, 0, 0, 0, 0, 0]);
        assert_eq!(os2.ach_vend_id, Tag::new(b"NONE"));
        assert_eq!(os2.s_typo_descender, -200);
        assert_eq!(os2.us_win_descent, 200);
        assert_eq!(os2.ul_code_page_range, Some([1, 0]));
        assert_eq!(os2.sx_height, Some(500));
        assert_eq!(os2.s_cap_height, Some(700));
        assert_eq!(os2.us_break_char, Some(0x20));
        assert_eq!(os2.us_max_context, Some(1));
        assert_eq!(os2.us_lower_optical_point_size, None);
    }

    #[test]
    fn version_0_ignores_trailing_bytes() {
        let data = os2_with_version(0);
        let os2 = Os2::read(FontData::new(&data)).unwrap();
        assert_eq!(os2.us_win_ascent, 900);
        assert_eq!(os2.ul_code_page_range, None);
        assert_eq!(os2.sx_height, None);
        assert_eq!(os2.us_max_context, None);

        // the same fields as a table that ends where version 0 ends
        let short = Os2::read(FontData::new(&data[..VERSION_0_LEN])).unwrap();
        assert_eq!(os2, short);
    }

    #[test]
    fn version_1() {
        let data = os2_with_version(1);
        let os2 = Os2::read(FontData::new(&data)).unwrap();
        assert_eq!(os2.ul_code_page_range, Some([1, 0]));
        assert_eq!(os2.sx_height, None);
    }

    #[test]
    fn version_5_and_newer() {
        let data = BeBuffer::new()
            .extend_bytes(&os2_with_version(5))
            .extend([72u16, 144]);
        let os2 = Os2::read(FontData::new(&data)).unwrap();
        assert_eq!(os2.us_lower_optical_point_size, Some(72));
        assert_eq!(os2.us_upper_optical_point_size, Some(144));

        let mut data = data.into_inner();
        data[1] = 9;
        let os2 = Os2::read(FontData::new(&data)).unwrap();
        assert_eq!(os2.version, 9);
        assert_eq!(os2.us_upper_optical_point_size, Some(144));
    }

    #[test]
    fn missing_versioned_fields() {
        let data = os2_with_version(5);
        let err = Os2::read(FontData::new(&data)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::TruncatedInput);
        assert_eq!(err.offset(), 96);

        let data = os2_with_version(2);
        let err = Os2::read(FontData::new(&data[..90])).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::TruncatedInput);
        assert_eq!(err.tag(), Some(TAG));
    }

    #[test]
    fn expected_len() {
        assert_eq!(Os2::expected_len(0), 78);
        assert_eq!(Os2::expected_len(1), 86);
        assert_eq!(Os2::expected_len(2), 96);
        assert_eq!(Os2::expected_len(4), 96);
        assert_eq!(Os2::expected_len(5), 100);
        assert_eq!(Os2::expected_len(200), 100);
    }
}
