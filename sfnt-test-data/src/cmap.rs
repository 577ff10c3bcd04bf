//! cmap test data for scenarios not readily produced with ttx

use crate::{be_buffer, bebuffer::BeBuffer};

/// Contains two codepoint ranges, both [6, 64]. Surely you don't duplicate them?
pub fn repetitive_cmap4() -> BeBuffer {
    // <https://learn.microsoft.com/en-us/typography/opentype/spec/cmap#format-4-segment-mapping-to-delta-values>
    be_buffer! {
      4_u16,                      // uint16	format
      32_u16,                     // uint16	length
      0_u16,                      // uint16	language, unused
      4_u16,                      // uint16	segCountX2, 2 * 2 segments
      0_u16,                      // uint16	searchRange, unused
      0_u16,                      // uint16	entrySelector, unused
      0_u16,                      // uint16	rangeShift, unused
      // segCount endCode entries
      64_u16,                    // uint16	endCode[0]
      64_u16,                    // uint16	endCode[1]

      0_u16,                      // uint16	reservedPad, unused

      // segCount startCode entries
      6_u16,                      // uint16	startCode[0]
      6_u16,                      // uint16	startCode[1]

      // segCount idDelta entries
      0_u16,                      // uint16	idDelta[0]
      0_u16,                      // uint16	idDelta[1]

      // segCount idRangeOffset entries
      0_u16,                      // uint16	idRangeOffset[0]
      0_u16                       // uint16	idRangeOffset[1]

      // no glyphIdArray entries
    }
}

/// Two segments: [0x41, 0x43] through the glyph array, and the final 0xFFFF.
///
/// Maps 'A' -> 5, 'B' -> missing, 'C' -> 7.
pub fn cmap4_range_offset() -> BeBuffer {
    be_buffer! {
        4u16,           // format
        38u16,          // length
        0u16,           // language
        4u16,           // segCountX2
        4u16,           // searchRange
        1u16,           // entrySelector
        0u16,           // rangeShift
        [0x43u16, 0xFFFF], // endCode
        0u16,           // reservedPad
        [0x41u16, 0xFFFF], // startCode
        [0i16, 1],      // idDelta
        // idRangeOffset[0] is at byte 28, the glyph array at byte 32
        [4u16, 0],      // idRangeOffset
        [5u16, 0, 7]    // glyphIdArray
    }
}

/// Maps 'a'..='c' to 10..=12 by delta, with wrapping for 0xFFF0 -> 0.
pub fn cmap4_delta() -> BeBuffer {
    be_buffer! {
        4u16,           // format
        40u16,          // length
        0u16,           // language
        6u16,           // segCountX2
        4u16,           // searchRange
        1u16,           // entrySelector
        2u16,           // rangeShift
        [0x63u16, 0xFFF0, 0xFFFF], // endCode
        0u16,
        [0x61u16, 0xFFF0, 0xFFFF], // startCode
        [(10i16 - 0x61), 0x10, 1], // idDelta
        [0u16, 0, 0]    // idRangeOffset
    }
}

/// Format 0: byte codes 0x20 and 0x41 map to 3 and 1.
pub fn cmap0() -> BeBuffer {
    let mut glyphs = [0u8; 256];
    glyphs[0x20] = 3;
    glyphs[0x41] = 1;
    let header = be_buffer! { 0u16, 262u16, 0u16 };
    header.extend(glyphs)
}

/// Format 2 with one two-byte lead byte (0x81) and ASCII passthrough.
///
/// Single bytes use subheader 0: codes 0x20..=0x22 -> 1..=3.
/// Lead byte 0x81 uses subheader 1: 0x8140..=0x8141 -> 4, 5 (delta 1 applied).
pub fn cmap2() -> BeBuffer {
    let mut keys = [0u16; 256];
    keys[0x81] = 8;
    // subheaders start at 6 + 512 = 518; the glyph array follows them at 534
    let header = be_buffer! { 2u16, 544u16, 0u16 };
    header
        .extend(keys)
        // subheader 0: firstCode, entryCount, idDelta, idRangeOffset
        // idRangeOffset field at 524, glyph array entry 0 at 534
        .extend([0x20u16, 3, 0, 10])
        // subheader 1: field at 532, glyph array entry 3 at 540
        .extend([0x40u16, 2, 1, 8])
        .extend([1u16, 2, 3, 3, 4])
}

/// Format 6: codes 0x30..0x33 -> [4, 0, 6].
pub fn cmap6() -> BeBuffer {
    be_buffer! { 6u16, 16u16, 0u16, 0x30u16, 3u16, [4u16, 0, 6] }
}

/// Format 10: codes 0x10000..0x10002 -> [2, 3].
pub fn cmap10() -> BeBuffer {
    be_buffer! { 10u16, 0u16, 24u32, 0u32, 0x10000u32, 2u32, [2u16, 3] }
}

/// Format 12 with three sequential groups.
pub fn cmap12() -> BeBuffer {
    be_buffer! {
        12u16, 0u16, 52u32, 0u32,
        3u32,               // numGroups
        [0x20u32, 0x20, 3],
        [0x41u32, 0x43, 1],
        [0x1F600u32, 0x1F601, 10]
    }
}

/// Format 13: every code in each group maps to one glyph.
pub fn cmap13() -> BeBuffer {
    be_buffer! {
        13u16, 0u16, 40u32, 0u32,
        2u32,
        [0x0u32, 0xFF, 1],
        [0x100u32, 0x10FFFF, 2]
    }
}

/// Format 8 with an empty is32 map and one group.
pub fn cmap8() -> BeBuffer {
    let header = be_buffer! { 8u16, 0u16, 8220u32, 0u32 };
    header
        .extend([0u8; 8192])
        .extend([1u32, 0x41, 0x43, 1])
}

/// Format 14 with two selectors.
///
/// VS1 (U+FE00): default for U+4E00..=U+4E02, U+82A6 -> 7.
/// VS2 (U+FE01): non-default only, U+4E00 -> 8.
pub fn cmap14() -> BeBuffer {
    // header 10 + 2 records * 11 = 32
    be_buffer! {
        14u16,
        58u32,              // length
        2u32,
        (sfnt_types::Uint24::new(0xFE00)), 32u32, 40u32,
        (sfnt_types::Uint24::new(0xFE01)), 0u32, 49u32,
        // default UVS at 32
        1u32, (sfnt_types::Uint24::new(0x4E00)), 2u8,
        // non-default UVS at 40
        1u32, (sfnt_types::Uint24::new(0x82A6)), 7u16,
        // non-default UVS at 49
        1u32, (sfnt_types::Uint24::new(0x4E00)), 8u16
    }
}
