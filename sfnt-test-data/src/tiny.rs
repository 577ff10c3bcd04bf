//! A complete four glyph TrueType font, assembled from table data.
//!
//! | gid | name       | char   | outline                       |
//! |-----|------------|--------|-------------------------------|
//! | 0   | .notdef    |        | empty                         |
//! | 1   | space      | U+0020 | empty                         |
//! | 2   | A          | U+0041 | triangle                      |
//! | 3   | Aring.comp | U+00C5 | composite of gid 2, dy = 200  |

use sfnt_types::Tag;

use crate::{be_buffer, bebuffer::BeBuffer, font_builder::FontBuilder};

pub const NUM_GLYPHS: u16 = 4;
pub const UNITS_PER_EM: u16 = 1000;

pub fn head() -> BeBuffer {
    be_buffer! {
        1u16, 0u16,                 // version
        0x00010000u32,              // fontRevision
        0u32,                       // checksumAdjustment
        0x5F0F3CF5u32,              // magicNumber
        0x0003u16,                  // flags
        UNITS_PER_EM,
        0i64, 0i64,                 // created, modified
        [0i16, 0, 500, 900],        // bbox
        0u16,                       // macStyle
        8u16,                       // lowestRecPPEM
        2i16,                       // fontDirectionHint
        0i16,                       // indexToLocFormat: short
        0i16                        // glyphDataFormat
    }
}

pub fn maxp() -> BeBuffer {
    be_buffer! {
        0x00010000u32,
        NUM_GLYPHS,
        3u16, 1u16,                 // maxPoints, maxContours
        3u16, 1u16,                 // maxCompositePoints, maxCompositeContours
        2u16, 0u16, 0u16, 0u16,     // maxZones .. maxFunctionDefs
        0u16, 0u16, 0u16,           // maxInstructionDefs .. maxSizeOfInstructions
        1u16, 1u16                  // maxComponentElements, maxComponentDepth
    }
}

pub fn hhea() -> BeBuffer {
    be_buffer! {
        1u16, 0u16,
        800i16, (-200i16), 0i16,    // ascender, descender, lineGap
        600u16,                     // advanceWidthMax
        0i16, 0i16, 500i16,         // minLSB, minRSB, xMaxExtent
        1i16, 0i16, 0i16,           // caret
        [0i16, 0, 0, 0],
        0i16,                       // metricDataFormat
        3u16                        // numberOfHMetrics
    }
}

pub fn hmtx() -> BeBuffer {
    be_buffer! {
        500u16, 0i16,
        250u16, 0i16,
        600u16, 50i16,
        // Aring.comp reuses the last advance
        50i16
    }
}

pub fn os2() -> BeBuffer {
    be_buffer! {
        4u16,                       // version
        450i16, 400u16, 5u16, 0u16, // xAvgCharWidth, weight, width, fsType
        [650i16, 600, 0, 75, 650, 600, 0, 350, 50, 250],
        0i16,                       // sFamilyClass
        [2u8, 0, 5, 3, 0, 0, 0, 0, 0, 0],
        [1u32, 0, 0, 0],            // ulUnicodeRange1-4
        (Tag::new(b"NONE")),
        0x0040u16,                  // fsSelection: REGULAR
        0x20u16, 0xC5u16,           // first and last char
        800i16, (-200i16), 0i16,    // typo metrics
        900u16, 200u16,             // win ascent and descent
        [1u32, 0],                  // code page ranges
        500i16, 700i16,             // xHeight, capHeight
        0u16, 0x20u16, 1u16         // default char, break char, max context
    }
}

pub fn post() -> BeBuffer {
    let header = be_buffer! {
        0x00020000u32,              // version 2.0
        0u32,                       // italicAngle
        (-100i16), 50i16,           // underline position and thickness
        0u32,                       // isFixedPitch
        [0u32, 0, 0, 0],            // memory usage
        NUM_GLYPHS,
        [0u16, 3, 36, 258]
    };
    header.push(10u8).extend_bytes(b"Aring.comp")
}

pub fn name() -> BeBuffer {
    let header = be_buffer! {
        0u16, 3u16, 42u16,          // format, count, storageOffset
        [1u16, 0, 0, 1, 4, 0],      // Macintosh family name
        [3u16, 1, 0x409, 1, 8, 4],  // Windows family name
        [3u16, 1, 0x409, 2, 14, 12] // Windows subfamily name
    };
    header
        .extend_bytes(b"Tiny")
        .extend("Tiny".encode_utf16())
        .extend("Regular".encode_utf16())
}

pub fn cmap() -> BeBuffer {
    be_buffer! {
        0u16, 2u16,                 // version, numTables
        [3u16, 1], 20u32,           // Windows BMP
        [3u16, 10], 68u32,          // Windows full repertoire
        // format 4 @20
        4u16, 48u16, 0u16,
        8u16, 8u16, 2u16, 0u16,
        [0x20u16, 0x41, 0xC5, 0xFFFF],
        0u16,
        [0x20u16, 0x41, 0xC5, 0xFFFF],
        [(-31i16), (-63), (-194), 1],
        [0u16, 0, 0, 0],
        // format 12 @68
        12u16, 0u16, 52u32, 0u32,
        3u32,
        [0x20u32, 0x20, 1],
        [0x41u32, 0x41, 2],
        [0xC5u32, 0xC5, 3]
    }
}

pub fn glyf() -> BeBuffer {
    let component = be_buffer! {
        (-1i16),
        [0i16, 200, 500, 900],
        0x0003u16,                  // ARG_1_AND_2_ARE_WORDS | ARGS_ARE_XY_VALUES
        2u16,
        [0i16, 200]
    };
    crate::glyf::simple_triangle()
        // pad to an even offset for the short loca
        .push(0u8)
        .extend_bytes(&component)
}

pub fn loca() -> BeBuffer {
    be_buffer! { [0u16, 0, 0, 12, 21] }
}

pub fn kern() -> BeBuffer {
    be_buffer! {
        0u16, 1u16,
        0u16, 20u16, 0x0001u16,
        1u16, 6u16, 0u16, 0u16,
        2u16, 3u16, (-30i16)
    }
}

/// Assemble the font, with every table present.
pub fn font() -> Vec<u8> {
    builder().build()
}

/// The font builder, so tests can drop or replace tables.
pub fn builder() -> FontBuilder {
    let mut builder = FontBuilder::new();
    builder
        .add_raw(Tag::new(b"head"), head().into_inner())
        .add_raw(Tag::new(b"maxp"), maxp().into_inner())
        .add_raw(Tag::new(b"hhea"), hhea().into_inner())
        .add_raw(Tag::new(b"hmtx"), hmtx().into_inner())
        .add_raw(Tag::new(b"OS/2"), os2().into_inner())
        .add_raw(Tag::new(b"post"), post().into_inner())
        .add_raw(Tag::new(b"name"), name().into_inner())
        .add_raw(Tag::new(b"cmap"), cmap().into_inner())
        .add_raw(Tag::new(b"glyf"), glyf().into_inner())
        .add_raw(Tag::new(b"loca"), loca().into_inner())
        .add_raw(Tag::new(b"kern"), kern().into_inner())
        .add_raw(Tag::new(b"GPOS"), crate::gpos::simple_gpos().into_inner());
    builder
}
