//! glyf and loca test data

use crate::{be_buffer, bebuffer::BeBuffer};

/// A triangle with points (0, 0), (250, 700) and (500, 0), all on curve.
///
/// Uses every coordinate encoding: same, short positive and word.
pub fn simple_triangle() -> BeBuffer {
    be_buffer! {
        1i16,                       // numberOfContours
        [0i16, 0, 500, 700],        // xMin, yMin, xMax, yMax
        2u16,                       // endPtsOfContours[0]
        0u16,                       // instructionLength
        // flags: [same x, same y], [short +x, word y] repeated once
        [0x31u8, 0x1B, 1],
        [250u8, 250],               // x
        [700i16, -700]              // y
    }
}

/// Two contours with an off-curve point, a short negative x and one
/// instruction byte.
pub fn simple_two_contours() -> BeBuffer {
    be_buffer! {
        2i16,
        [0i16, 0, 100, 100],
        [1u16, 2],                  // endPtsOfContours
        1u16,                       // instructionLength
        0xB0u8,                     // PUSHB[0]
        // point 0: on curve, x word, y word
        // point 1: off curve, short +x, same y
        // point 2: on curve, short -x, short +y
        [0x01u8, 0x32, 0x27],
        // x: word 100, short 20, short -50
        (100i16), [20u8, 50],
        // y: word 100, short 10
        (100i16), 10u8
    }
}

/// A composite with a single component: 2x2 transform and instructions.
pub fn composite_two_by_two() -> BeBuffer {
    be_buffer! {
        (-1i16),                    // numberOfContours
        [0i16, 0, 100, 100],        // bbox
        // ARG_1_AND_2_ARE_WORDS | ARGS_ARE_XY_VALUES | WE_HAVE_A_TWO_BY_TWO
        // | WE_HAVE_INSTRUCTIONS
        0x0183u16,
        1u16,                       // glyphIndex
        [10i16, (-20)],             // dx, dy
        // 2x2: 1.0, 0.5, -0.5, 1.0
        [0x4000i16, 0x2000, (-0x2000), 0x4000],
        3u16,                       // numInstructions
        [1u8, 2, 3]
    }
}

/// A composite with two components.
///
/// The first has byte offsets and a uniform scale, the second unsigned point
/// numbers and an x/y scale.
pub fn composite_two_components() -> BeBuffer {
    be_buffer! {
        (-1i16),
        [0i16, 0, 100, 100],
        // ARGS_ARE_XY_VALUES | WE_HAVE_A_SCALE | MORE_COMPONENTS
        0x002Au16,
        1u16,
        [5i8, (-3)],
        0x2000i16,                  // scale 0.5
        // X_AND_Y_SCALE
        0x0040u16,
        2u16,
        [3u8, 4],                   // point numbers
        [0x4000i16, 0x6000]         // 1.0, 1.5
    }
}
