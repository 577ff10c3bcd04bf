//! The [maxp](https://docs.microsoft.com/en-us/typography/opentype/spec/maxp) table

use types::{Tag, Version16Dot16};

use crate::{DecodeError, ErrorKind, FontData, FontRead, TopLevelTable};

/// 'maxp'
pub const TAG: Tag = Tag::new(b"maxp");

/// [`maxp`](https://docs.microsoft.com/en-us/typography/opentype/spec/maxp)
///
/// Only `num_glyphs` is present in version 0.5 tables, used by fonts with
/// CFF outlines.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Maxp {
    /// The version: 0x00005000 for version 0.5, 0x00010000 for version 1.0.
    pub version: Version16Dot16,
    /// The number of glyphs in the font.
    pub num_glyphs: u16,
    /// Fields only present in version 1.0.
    pub truetype: Option<MaxpTrueType>,
}

/// The version 1.0 fields of the `maxp` table.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct MaxpTrueType {
    /// Maximum points in a non-composite glyph.
    pub max_points: u16,
    /// Maximum contours in a non-composite glyph.
    pub max_contours: u16,
    /// Maximum points in a composite glyph.
    pub max_composite_points: u16,
    /// Maximum contours in a composite glyph.
    pub max_composite_contours: u16,
    /// 1 if instructions do not use the twilight zone (Z0), or 2 if
    /// instructions do use Z0; should be set to 2 in most cases.
    pub max_zones: u16,
    /// Maximum points used in Z0.
    pub max_twilight_points: u16,
    /// Number of Storage Area locations.
    pub max_storage: u16,
    /// Number of FDEFs, equal to the highest function number + 1.
    pub max_function_defs: u16,
    /// Number of IDEFs.
    pub max_instruction_defs: u16,
    /// Maximum stack depth across Font Program ('fpgm' table), CVT
    /// Program ('prep' table) and all glyph instructions (in the
    /// 'glyf' table).
    pub max_stack_elements: u16,
    /// Maximum byte count for glyph instructions.
    pub max_size_of_instructions: u16,
    /// Maximum number of components referenced at “top level” for
    /// any composite glyph.
    pub max_component_elements: u16,
    /// Maximum levels of recursion; 1 for simple components.
    pub max_component_depth: u16,
}

impl TopLevelTable for Maxp {
    const TAG: Tag = TAG;
}

impl<'a> FontRead<'a> for Maxp {
    fn read(data: FontData<'a>) -> Result<Self, DecodeError> {
        let mut cursor = data.cursor().in_table(TAG);
        let version: Version16Dot16 = cursor.read()?;
        let num_glyphs = cursor.read()?;
        let truetype = match version {
            Version16Dot16::VERSION_0_5 => None,
            Version16Dot16::VERSION_1_0 => Some(MaxpTrueType {
                max_points: cursor.read()?,
                max_contours: cursor.read()?,
                max_composite_points: cursor.read()?,
                max_composite_contours: cursor.read()?,
                max_zones: cursor.read()?,
                max_twilight_points: cursor.read()?,
                max_storage: cursor.read()?,
                max_function_defs: cursor.read()?,
                max_instruction_defs: cursor.read()?,
                max_stack_elements: cursor.read()?,
                max_size_of_instructions: cursor.read()?,
                max_component_elements: cursor.read()?,
                max_component_depth: cursor.read()?,
            }),
            _ => return Err(cursor.error_at(ErrorKind::InvalidMagicOrVersion, "version", 0)),
        };
        log::debug!("decoded 'maxp' {version}: {num_glyphs} glyphs");
        Ok(Maxp {
            version,
            num_glyphs,
            truetype,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sfnt_test_data::be_buffer;

    #[test]
    fn version_0_5() {
        let buf = be_buffer! { 0x00005000u32, 3u16 };
        let maxp = Maxp::read(FontData::new(&buf)).unwrap();
        assert_eq!(maxp.version, Version16Dot16::VERSION_0_5);
        assert_eq!(maxp.num_glyphs, 3);
        assert!(maxp.truetype.is_none());
    }

    #[test]
    fn version_1_0() {
        let buf = sfnt_test_data::tiny::maxp();
        let maxp = Maxp::read(FontData::new(&buf)).unwrap();
        assert_eq!(maxp.num_glyphs, 4);
        let truetype = maxp.truetype.unwrap();
        assert_eq!(truetype.max_points, 3);
        assert_eq!(truetype.max_zones, 2);
        assert_eq!(truetype.max_component_depth, 1);
    }

    #[test]
    fn version_1_0_truncated() {
        let buf = sfnt_test_data::tiny::maxp();
        let err = Maxp::read(FontData::new(&buf[..30])).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::TruncatedInput);
        assert_eq!(err.offset(), 30);
    }

    #[test]
    fn unknown_version() {
        let buf = be_buffer! { 0x00020000u32, 3u16 };
        let err = Maxp::read(FontData::new(&buf)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidMagicOrVersion);
        assert_eq!(err.tag(), Some(TAG));
    }
}
