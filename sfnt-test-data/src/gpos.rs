//! GPOS test data

use sfnt_types::Tag;

use crate::{be_buffer, bebuffer::BeBuffer};

// https://learn.microsoft.com/en-us/typography/opentype/spec/gpos#example-2-singleposformat1-subtable
#[rustfmt::skip]
pub static SINGLEPOSFORMAT1: &[u8] = &[
    0x00, 0x01, // posFormat
    0x00, 0x08, // coverageOffset
    0x00, 0x02, // valueFormat: Y_PLACEMENT
    0xFF, 0xB0, // yPlacement: -80
    // CoverageFormat2
    0x00, 0x02, 0x00, 0x01, 0x00, 0xB2, 0x00, 0xBB, 0x00, 0x00,
];

// https://learn.microsoft.com/en-us/typography/opentype/spec/gpos#example-3-singleposformat2-subtable
#[rustfmt::skip]
pub static SINGLEPOSFORMAT2: &[u8] = &[
    0x00, 0x02, // posFormat
    0x00, 0x14, // coverageOffset
    0x00, 0x05, // valueFormat: X_PLACEMENT | X_ADVANCE
    0x00, 0x03, // valueCount
    0x00, 0x32, 0x00, 0x32,
    0x00, 0x19, 0x00, 0x19,
    0x00, 0x0A, 0x00, 0x0A,
    // CoverageFormat1
    0x00, 0x01, 0x00, 0x03, 0x00, 0x4F, 0x00, 0x7D, 0x00, 0x7E,
];

/// Version 1.0 with one script, one feature and one single adjustment lookup.
///
/// Glyph 3 gets an x advance of -10.
pub fn simple_gpos() -> BeBuffer {
    be_buffer! {
        1u16, 0u16,                 // version 1.0
        10u16, 30u16, 44u16,        // script, feature and lookup lists
        // ScriptList @10
        1u16, (Tag::new(b"latn")), 8u16,
        // Script @18
        4u16, 0u16,
        // default LangSys @22
        0u16, 0xFFFFu16, 1u16, 0u16,
        // FeatureList @30
        1u16, (Tag::new(b"kern")), 8u16,
        // Feature @38
        0u16, 1u16, 0u16,
        // LookupList @44
        1u16, 4u16,
        // Lookup @48: type 1, one subtable at +8
        1u16, 0u16, 1u16, 8u16,
        // SinglePosFormat1 @56
        1u16, 8u16, 0x0004u16, (-10i16),
        // CoverageFormat1 @64
        1u16, 1u16, 3u16
    }
}

/// Version 1.1 exercising LangSys records, mark filtering sets, extension
/// lookups and lookups of other types.
pub fn gpos_1_1() -> BeBuffer {
    be_buffer! {
        1u16, 1u16,                 // version 1.1
        14u16, 50u16, 78u16,        // script, feature and lookup lists
        0u32,                       // featureVariationsOffset
        // ScriptList @14
        1u16, (Tag::new(b"latn")), 8u16,
        // Script @22: default LangSys at +10, one LangSys record at +20
        10u16, 1u16, (Tag::new(b"TRK ")), 20u16,
        // default LangSys @32
        0u16, 0xFFFFu16, 2u16, [0u16, 1],
        // TRK LangSys @42, required feature 1
        0u16, 1u16, 1u16, 1u16,
        // FeatureList @50
        2u16, (Tag::new(b"kern")), 14u16, (Tag::new(b"mark")), 20u16,
        // kern Feature @64
        0u16, 1u16, 0u16,
        // mark Feature @70
        0u16, 2u16, [1u16, 2],
        // LookupList @78
        3u16, [8u16, 18, 26],
        // Lookup 0 @86: single adjustment, USE_MARK_FILTERING_SET
        1u16, 0x0010u16, 1u16, 26u16, 5u16,
        // Lookup 1 @96: extension
        9u16, 0u16, 1u16, 42u16,
        // Lookup 2 @104: pair adjustment
        2u16, 0u16, 1u16, 58u16,
        // SinglePosFormat2 @112
        2u16, 16u16, 0x0005u16, 2u16,
        [50i16, 25], [10i16, (-5)],
        // CoverageFormat2 @128: glyphs 20..=21
        2u16, 1u16, [20u16, 21, 0],
        // Extension @138
        1u16, 1u16, 8u32,
        // SinglePosFormat1 @146
        1u16, 8u16, 0x0002u16, (-80i16),
        // CoverageFormat1 @154
        1u16, 2u16, [30u16, 31],
        // PairPos @162, not decoded
        1u16
    }
}
