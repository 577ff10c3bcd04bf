//! The [glyf (Glyph Data)](https://docs.microsoft.com/en-us/typography/opentype/spec/glyf) table

use types::{F2Dot14, GlyphId, Tag};

use crate::{
    tables::loca::Loca, Cursor, DecodeError, ErrorKind, FontData, FontRead, FontReadWithArgs,
    ReadArgs, TopLevelTable,
};

/// 'glyf'
pub const TAG: Tag = Tag::new(b"glyf");

/// The size of the header shared by simple and composite glyphs.
pub const GLYPH_HEADER_LEN: usize = 10;

/// The [glyf (Glyph Data)](https://docs.microsoft.com/en-us/typography/opentype/spec/glyf) table
///
/// Glyphs are decoded on request, using the offsets in [`Loca`].
#[derive(Clone)]
pub struct Glyf<'a> {
    data: FontData<'a>,
}

impl<'a> Glyf<'a> {
    /// The raw table data.
    pub fn offset_data(&self) -> FontData<'a> {
        self.data
    }

    /// Decode the glyph with the given identifier.
    ///
    /// Component references are checked against the glyph count of `loca`.
    pub fn glyph(&self, loca: &Loca, gid: GlyphId) -> Result<Glyph, DecodeError> {
        let range = loca.glyph_range(gid).ok_or_else(|| {
            DecodeError::new(
                ErrorKind::InconsistentStructure,
                "glyph id",
                self.data.position(),
            )
            .with_tag(TAG)
        })?;
        if range.is_empty() {
            return Ok(Glyph::Empty);
        }
        let start = range.start;
        let data = self
            .data
            .slice(range)
            .ok_or_else(|| self.data.truncated_at("glyph", start).with_tag(TAG))?;
        let num_glyphs = u16::try_from(loca.num_glyphs()).unwrap_or(u16::MAX);
        log::trace!("decoding glyph {gid} at {start}");
        Glyph::read_with_args(data, &num_glyphs)
    }
}

impl TopLevelTable for Glyf<'_> {
    const TAG: Tag = TAG;
}

impl<'a> FontRead<'a> for Glyf<'a> {
    fn read(data: FontData<'a>) -> Result<Self, DecodeError> {
        Ok(Glyf { data })
    }
}

/// The fields at the start of every non-empty glyph.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct GlyphHeader {
    /// If the number of contours is greater than or equal to zero,
    /// this is a simple glyph. If negative, this is a composite glyph;
    /// the value -1 should be used for composite glyphs.
    pub number_of_contours: i16,
    /// Minimum x for coordinate data.
    pub x_min: i16,
    /// Minimum y for coordinate data.
    pub y_min: i16,
    /// Maximum x for coordinate data.
    pub x_max: i16,
    /// Maximum y for coordinate data.
    pub y_max: i16,
}

/// A decoded glyph.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum Glyph {
    /// A glyph with no outline data, such as a space.
    Empty,
    Simple(SimpleGlyph),
    Composite(CompositeGlyph),
}

impl Glyph {
    /// The glyph header, if the glyph is not empty.
    pub fn header(&self) -> Option<&GlyphHeader> {
        match self {
            Glyph::Empty => None,
            Glyph::Simple(glyph) => Some(&glyph.header),
            Glyph::Composite(glyph) => Some(&glyph.header),
        }
    }

    /// The number of bytes read while decoding this glyph.
    ///
    /// Any padding after the glyph is not included.
    pub fn bytes_consumed(&self) -> usize {
        match self {
            Glyph::Empty => 0,
            Glyph::Simple(glyph) => glyph.bytes_consumed,
            Glyph::Composite(glyph) => glyph.bytes_consumed,
        }
    }
}

impl ReadArgs for Glyph {
    /// The number of glyphs in the font, bounding component references.
    type Args = u16;
}

impl<'a> FontReadWithArgs<'a> for Glyph {
    fn read_with_args(data: FontData<'a>, num_glyphs: &u16) -> Result<Self, DecodeError> {
        if data.is_empty() {
            return Ok(Glyph::Empty);
        }
        let mut cursor = data.cursor().in_table(TAG);
        let header = GlyphHeader {
            number_of_contours: cursor.read()?,
            x_min: cursor.read()?,
            y_min: cursor.read()?,
            x_max: cursor.read()?,
            y_max: cursor.read()?,
        };
        match header.number_of_contours {
            n if n > 0 => read_simple(cursor, header).map(Glyph::Simple),
            -1 => read_composite(cursor, header, *num_glyphs).map(Glyph::Composite),
            _ => Err(cursor.error_at(ErrorKind::InconsistentStructure, "numberOfContours", 0)),
        }
    }
}

/// Flags for a point in a simple glyph.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct SimpleGlyphFlags(u8);

impl SimpleGlyphFlags {
    /// Bit 0: If set, the point is on the curve; otherwise, it is off
    /// the curve.
    pub const ON_CURVE_POINT: Self = Self(0x01);
    /// Bit 1: If set, the corresponding x-coordinate is 1 byte long,
    /// and the sign is determined by the
    /// X_IS_SAME_OR_POSITIVE_X_SHORT_VECTOR flag.
    pub const X_SHORT_VECTOR: Self = Self(0x02);
    /// Bit 2: If set, the corresponding y-coordinate is 1 byte long,
    /// and the sign is determined by the
    /// Y_IS_SAME_OR_POSITIVE_Y_SHORT_VECTOR flag.
    pub const Y_SHORT_VECTOR: Self = Self(0x04);
    /// Bit 3: If set, the next byte (read as unsigned) specifies the
    /// number of additional times this flag byte is to be repeated in
    /// the logical flags array.
    pub const REPEAT_FLAG: Self = Self(0x08);
    /// Bit 4: With a short vector, the sign of the x-coordinate;
    /// otherwise, the x-coordinate repeats the previous one.
    pub const X_IS_SAME_OR_POSITIVE_X_SHORT_VECTOR: Self = Self(0x10);
    /// Bit 5: With a short vector, the sign of the y-coordinate;
    /// otherwise, the y-coordinate repeats the previous one.
    pub const Y_IS_SAME_OR_POSITIVE_Y_SHORT_VECTOR: Self = Self(0x20);
    /// Bit 6: If set, contours in the glyph description may overlap.
    pub const OVERLAP_SIMPLE: Self = Self(0x40);

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

/// Point with an associated on-curve flag in a simple glyph.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct CurvePoint {
    /// X coordinate.
    pub x: i16,
    /// Y coordinate.
    pub y: i16,
    /// True if this is an on-curve point.
    pub on_curve: bool,
}

impl CurvePoint {
    /// Construct a new `CurvePoint`
    pub fn new(x: i16, y: i16, on_curve: bool) -> Self {
        Self { x, y, on_curve }
    }

    /// Convenience method to construct an on-curve point
    pub fn on_curve(x: i16, y: i16) -> Self {
        Self::new(x, y, true)
    }

    /// Convenience method to construct an off-curve point
    pub fn off_curve(x: i16, y: i16) -> Self {
        Self::new(x, y, false)
    }
}

/// A glyph described by its own contours.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct SimpleGlyph {
    pub header: GlyphHeader,
    /// Array of point indices for the last point of each contour,
    /// in increasing numeric order.
    pub end_pts_of_contours: Vec<u16>,
    /// Array of instruction byte code for the glyph.
    pub instructions: Vec<u8>,
    /// The points, with absolute coordinates.
    pub points: Vec<CurvePoint>,
    pub bytes_consumed: usize,
}

impl SimpleGlyph {
    /// The number of points in the glyph.
    pub fn num_points(&self) -> usize {
        self.points.len()
    }

    /// The points of each contour.
    pub fn contours(&self) -> impl Iterator<Item = &[CurvePoint]> + '_ {
        let mut start = 0;
        self.end_pts_of_contours.iter().map(move |end| {
            let end = *end as usize + 1;
            let contour = self.points.get(start..end).unwrap_or_default();
            start = end;
            contour
        })
    }
}

fn read_simple(mut cursor: Cursor, header: GlyphHeader) -> Result<SimpleGlyph, DecodeError> {
    let end_pts_of_contours: Vec<u16> =
        cursor.read_array(header.number_of_contours as usize)?;
    if let Some(idx) = end_pts_of_contours
        .windows(2)
        .position(|pair| pair[1] < pair[0])
    {
        return Err(cursor.error_at(
            ErrorKind::InconsistentStructure,
            "endPtsOfContours",
            GLYPH_HEADER_LEN + (idx + 1) * 2,
        ));
    }
    let num_points = end_pts_of_contours
        .last()
        .map(|last| *last as usize + 1)
        .unwrap_or_default();
    let instruction_length: u16 = cursor.read()?;
    let instructions = cursor.read_bytes(instruction_length as usize)?.to_vec();

    let mut flags = Vec::with_capacity(num_points);
    while flags.len() < num_points {
        let flag_pos = cursor.position();
        let flag = SimpleGlyphFlags::from_bits(cursor.read()?);
        let repeats = if flag.contains(SimpleGlyphFlags::REPEAT_FLAG) {
            cursor.read::<u8>()? as usize
        } else {
            0
        };
        if flags.len() + repeats + 1 > num_points {
            return Err(cursor.error_at(ErrorKind::InconsistentStructure, "flags", flag_pos));
        }
        flags.extend(std::iter::repeat_n(flag, repeats + 1));
    }

    let xs = read_coordinates(
        &mut cursor,
        &flags,
        SimpleGlyphFlags::X_SHORT_VECTOR,
        SimpleGlyphFlags::X_IS_SAME_OR_POSITIVE_X_SHORT_VECTOR,
    )?;
    let ys = read_coordinates(
        &mut cursor,
        &flags,
        SimpleGlyphFlags::Y_SHORT_VECTOR,
        SimpleGlyphFlags::Y_IS_SAME_OR_POSITIVE_Y_SHORT_VECTOR,
    )?;
    let points = flags
        .iter()
        .zip(xs.into_iter().zip(ys))
        .map(|(flag, (x, y))| {
            CurvePoint::new(x, y, flag.contains(SimpleGlyphFlags::ON_CURVE_POINT))
        })
        .collect();
    Ok(SimpleGlyph {
        header,
        end_pts_of_contours,
        instructions,
        points,
        bytes_consumed: cursor.finish(),
    })
}

/// Read one axis of deltas, returning absolute coordinates.
fn read_coordinates(
    cursor: &mut Cursor,
    flags: &[SimpleGlyphFlags],
    short: SimpleGlyphFlags,
    same_or_positive: SimpleGlyphFlags,
) -> Result<Vec<i16>, DecodeError> {
    let mut value = 0i16;
    let mut coordinates = Vec::with_capacity(flags.len());
    for flag in flags {
        let delta = if flag.contains(short) {
            let delta = cursor.read::<u8>()? as i16;
            if flag.contains(same_or_positive) {
                delta
            } else {
                -delta
            }
        } else if flag.contains(same_or_positive) {
            0
        } else {
            cursor.read::<i16>()?
        };
        value = value.wrapping_add(delta);
        coordinates.push(value);
    }
    Ok(coordinates)
}

/// Flags used in composite glyph descriptions.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct CompositeGlyphFlags(u16);

impl CompositeGlyphFlags {
    /// Bit 0: If this is set, the arguments are 16-bit (uint16 or int16);
    /// otherwise, they are bytes (uint8 or int8).
    pub const ARG_1_AND_2_ARE_WORDS: Self = Self(0x0001);
    /// Bit 1: If this is set, the arguments are signed xy values;
    /// otherwise, they are unsigned point numbers.
    pub const ARGS_ARE_XY_VALUES: Self = Self(0x0002);
    /// Bit 2: If set and ARGS_ARE_XY_VALUES is also set, the xy values
    /// are rounded to the nearest grid line.
    pub const ROUND_XY_TO_GRID: Self = Self(0x0004);
    /// Bit 3: This indicates that there is a simple scale for the component.
    pub const WE_HAVE_A_SCALE: Self = Self(0x0008);
    /// Bit 5: Indicates at least one more glyph after this one.
    pub const MORE_COMPONENTS: Self = Self(0x0020);
    /// Bit 6: The x direction will use a different scale from the y direction.
    pub const WE_HAVE_AN_X_AND_Y_SCALE: Self = Self(0x0040);
    /// Bit 7: There is a 2 by 2 transformation that will be used to scale
    /// the component.
    pub const WE_HAVE_A_TWO_BY_TWO: Self = Self(0x0080);
    /// Bit 8: Following the last component are instructions for the
    /// composite glyph.
    pub const WE_HAVE_INSTRUCTIONS: Self = Self(0x0100);
    /// Bit 9: If set, this forces the aw and lsb (and rsb) for the
    /// composite to be equal to those from this component glyph.
    pub const USE_MY_METRICS: Self = Self(0x0200);
    /// Bit 10: If set, the components of the compound glyph overlap.
    pub const OVERLAP_COMPOUND: Self = Self(0x0400);
    /// Bit 11: The composite is designed to have the component offset scaled.
    pub const SCALED_COMPONENT_OFFSET: Self = Self(0x0800);
    /// Bit 12: The composite is designed not to have the component offset scaled.
    pub const UNSCALED_COMPONENT_OFFSET: Self = Self(0x1000);

    const TRANSFORM_BITS: u16 = 0x0008 | 0x0040 | 0x0080;

    pub const fn from_bits(bits: u16) -> Self {
        Self(bits)
    }

    pub const fn bits(self) -> u16 {
        self.0
    }

    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }
}

/// Anchor position for a composite component.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum Anchor {
    Offset { x: i16, y: i16 },
    Point { base: u16, component: u16 },
}

/// Transform for a composite component.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum Transform {
    #[default]
    None,
    Scale(F2Dot14),
    XyScale {
        x: F2Dot14,
        y: F2Dot14,
    },
    TwoByTwo {
        xx: F2Dot14,
        yx: F2Dot14,
        xy: F2Dot14,
        yy: F2Dot14,
    },
}

impl Transform {
    /// The transform as a 2x2 matrix, `[xx, yx, xy, yy]`.
    pub fn matrix(&self) -> [F2Dot14; 4] {
        match *self {
            Transform::None => [F2Dot14::ONE, F2Dot14::ZERO, F2Dot14::ZERO, F2Dot14::ONE],
            Transform::Scale(scale) => [scale, F2Dot14::ZERO, F2Dot14::ZERO, scale],
            Transform::XyScale { x, y } => [x, F2Dot14::ZERO, F2Dot14::ZERO, y],
            Transform::TwoByTwo { xx, yx, xy, yy } => [xx, yx, xy, yy],
        }
    }
}

/// A reference to another glyph. Part of [CompositeGlyph].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Component {
    /// Component flags.
    pub flags: CompositeGlyphFlags,
    /// Glyph identifier.
    pub glyph: GlyphId,
    /// Anchor for component placement.
    pub anchor: Anchor,
    /// Component transformation matrix.
    pub transform: Transform,
}

/// A glyph built from transformed references to other glyphs.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct CompositeGlyph {
    pub header: GlyphHeader,
    pub components: Vec<Component>,
    /// Instructions for the whole composite, present when the last
    /// component sets `WE_HAVE_INSTRUCTIONS`.
    pub instructions: Vec<u8>,
    pub bytes_consumed: usize,
}

fn read_composite(
    mut cursor: Cursor,
    header: GlyphHeader,
    num_glyphs: u16,
) -> Result<CompositeGlyph, DecodeError> {
    let mut components = Vec::new();
    let mut flags;
    loop {
        let flags_pos = cursor.position();
        flags = CompositeGlyphFlags::from_bits(cursor.read()?);
        let glyph_pos = cursor.position();
        let glyph: GlyphId = cursor.read()?;
        if glyph.to_u16() >= num_glyphs {
            return Err(cursor.error_at(
                ErrorKind::InconsistentStructure,
                "glyphIndex",
                glyph_pos,
            ));
        }
        let args_are_words = flags.contains(CompositeGlyphFlags::ARG_1_AND_2_ARE_WORDS);
        let args_are_xy_values = flags.contains(CompositeGlyphFlags::ARGS_ARE_XY_VALUES);
        let anchor = match (args_are_xy_values, args_are_words) {
            (true, true) => Anchor::Offset {
                x: cursor.read()?,
                y: cursor.read()?,
            },
            (true, false) => Anchor::Offset {
                x: cursor.read::<i8>()? as _,
                y: cursor.read::<i8>()? as _,
            },
            (false, true) => Anchor::Point {
                base: cursor.read()?,
                component: cursor.read()?,
            },
            (false, false) => Anchor::Point {
                base: cursor.read::<u8>()? as _,
                component: cursor.read::<u8>()? as _,
            },
        };
        let transform = match flags.bits() & CompositeGlyphFlags::TRANSFORM_BITS {
            0 => Transform::None,
            bits if bits == CompositeGlyphFlags::WE_HAVE_A_SCALE.bits() => {
                Transform::Scale(cursor.read()?)
            }
            bits if bits == CompositeGlyphFlags::WE_HAVE_AN_X_AND_Y_SCALE.bits() => {
                Transform::XyScale {
                    x: cursor.read()?,
                    y: cursor.read()?,
                }
            }
            bits if bits == CompositeGlyphFlags::WE_HAVE_A_TWO_BY_TWO.bits() => {
                Transform::TwoByTwo {
                    xx: cursor.read()?,
                    yx: cursor.read()?,
                    xy: cursor.read()?,
                    yy: cursor.read()?,
                }
            }
            // the three scale bits are mutually exclusive
            _ => {
                return Err(cursor.error_at(ErrorKind::InconsistentStructure, "flags", flags_pos))
            }
        };
        components.push(Component {
            flags,
            glyph,
            anchor,
            transform,
        });
        if !flags.contains(CompositeGlyphFlags::MORE_COMPONENTS) {
            break;
        }
    }
    let instructions = if flags.contains(CompositeGlyphFlags::WE_HAVE_INSTRUCTIONS) {
        let len: u16 = cursor.read()?;
        cursor.read_bytes(len as usize)?.to_vec()
    } else {
        Vec::new()
    };
    Ok(CompositeGlyph {
        header,
        components,
        instructions,
        bytes_consumed: cursor.finish(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tables::loca::LocaArgs;
    use pretty_assertions::assert_eq;
    use sfnt_test_data::{be_buffer, glyf as test_data};

    fn read(data: &[u8], num_glyphs: u16) -> Result<Glyph, DecodeError> {
        Glyph::read_with_args(FontData::new(data), &num_glyphs)
    }

    fn f2dot14(value: f32) -> F2Dot14 {
        F2Dot14::from_f32(value)
    }

    #[test]
    fn simple_glyph() {
        let data = test_data::simple_triangle();
        let Glyph::Simple(glyph) = read(&data, 1).unwrap() else {
            panic!("expected simple glyph");
        };
        assert_eq!(glyph.header.number_of_contours, 1);
        assert_eq!(glyph.header.x_max, 500);
        assert_eq!(glyph.end_pts_of_contours, [2]);
        assert!(glyph.instructions.is_empty());
        assert_eq!(
            glyph.points,
            [
                CurvePoint::on_curve(0, 0),
                CurvePoint::on_curve(250, 700),
                CurvePoint::on_curve(500, 0),
            ]
        );
        assert_eq!(glyph.bytes_consumed, data.len());
    }

    #[test]
    fn two_contours() {
        let data = test_data::simple_two_contours();
        let Glyph::Simple(glyph) = read(&data, 1).unwrap() else {
            panic!("expected simple glyph");
        };
        assert_eq!(glyph.instructions, [0xB0]);
        assert_eq!(
            glyph.points,
            [
                CurvePoint::on_curve(100, 100),
                CurvePoint::off_curve(120, 100),
                CurvePoint::on_curve(70, 110),
            ]
        );
        let contours: Vec<_> = glyph.contours().map(|contour| contour.len()).collect();
        assert_eq!(contours, [2, 1]);
        assert_eq!(glyph.bytes_consumed, 27);
    }

    #[test]
    fn truncated_coordinates() {
        let data = test_data::simple_triangle();
        let err = read(&data[..22], 1).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::TruncatedInput);
        assert_eq!(err.offset(), 21);
        assert_eq!(err.tag(), Some(TAG));
    }

    #[test]
    fn too_many_flags() {
        let mut data = test_data::simple_triangle().into_inner();
        data[16] = 2;
        let err = read(&data, 1).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InconsistentStructure);
        assert_eq!(err.what(), "flags");
        assert_eq!(err.offset(), 15);
    }

    #[test]
    fn decreasing_contour_ends() {
        let mut data = test_data::simple_two_contours().into_inner();
        // endPtsOfContours [1, 0]
        data[13] = 0;
        let err = read(&data, 1).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InconsistentStructure);
        assert_eq!(err.offset(), 12);
    }

    #[test]
    fn two_by_two_with_instructions() {
        let data = test_data::composite_two_by_two();
        let glyph = read(&data, 2).unwrap();
        assert_eq!(glyph.bytes_consumed(), 31);
        assert_eq!(glyph.bytes_consumed(), data.len());
        let Glyph::Composite(glyph) = glyph else {
            panic!("expected composite glyph");
        };
        assert_eq!(
            glyph.components,
            [Component {
                flags: CompositeGlyphFlags::from_bits(0x0183),
                glyph: GlyphId::new(1),
                anchor: Anchor::Offset { x: 10, y: -20 },
                transform: Transform::TwoByTwo {
                    xx: f2dot14(1.0),
                    yx: f2dot14(0.5),
                    xy: f2dot14(-0.5),
                    yy: f2dot14(1.0),
                },
            }]
        );
        assert_eq!(glyph.instructions, [1, 2, 3]);
    }

    #[test]
    fn two_components() {
        let data = test_data::composite_two_components();
        let Glyph::Composite(glyph) = read(&data, 3).unwrap() else {
            panic!("expected composite glyph");
        };
        assert_eq!(glyph.bytes_consumed, 28);
        assert_eq!(glyph.components.len(), 2);
        let first = &glyph.components[0];
        assert_eq!(first.anchor, Anchor::Offset { x: 5, y: -3 });
        assert_eq!(first.transform, Transform::Scale(f2dot14(0.5)));
        assert_eq!(
            first.transform.matrix(),
            [f2dot14(0.5), F2Dot14::ZERO, F2Dot14::ZERO, f2dot14(0.5)]
        );
        let second = &glyph.components[1];
        assert_eq!(second.glyph, GlyphId::new(2));
        assert_eq!(
            second.anchor,
            Anchor::Point {
                base: 3,
                component: 4
            }
        );
        assert_eq!(
            second.transform,
            Transform::XyScale {
                x: f2dot14(1.0),
                y: f2dot14(1.5)
            }
        );
        assert!(glyph.instructions.is_empty());
    }

    #[test]
    fn component_glyph_out_of_range() {
        let data = test_data::composite_two_components();
        let err = read(&data, 2).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InconsistentStructure);
        assert_eq!(err.what(), "glyphIndex");
        assert_eq!(err.offset(), 20);
    }

    #[test]
    fn conflicting_scale_flags() {
        let mut data = test_data::composite_two_by_two().into_inner();
        // add WE_HAVE_A_SCALE to the 2x2 flag
        data[11] |= 0x08;
        let err = read(&data, 2).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InconsistentStructure);
        assert_eq!(err.offset(), 10);
    }

    #[test]
    fn bad_contour_count() {
        for count in [0i16, -2, i16::MIN] {
            let data = be_buffer! { count, [0i16, 0, 10, 10] };
            let err = read(&data, 1).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::InconsistentStructure);
            assert_eq!(err.offset(), 0);
        }
    }

    #[test]
    fn glyphs_through_loca() {
        let loca_data = sfnt_test_data::tiny::loca();
        let glyf_data = sfnt_test_data::tiny::glyf();
        let args = LocaArgs {
            num_glyphs: sfnt_test_data::tiny::NUM_GLYPHS,
            index_to_loc_format: 0,
            glyf_len: glyf_data.len(),
        };
        let loca = Loca::read_with_args(FontData::new(&loca_data), &args).unwrap();
        let glyf = Glyf::read(FontData::new(&glyf_data)).unwrap();

        assert_eq!(glyf.glyph(&loca, GlyphId::new(0)).unwrap(), Glyph::Empty);
        assert_eq!(glyf.glyph(&loca, GlyphId::new(1)).unwrap(), Glyph::Empty);
        let triangle = glyf.glyph(&loca, GlyphId::new(2)).unwrap();
        // the padding byte is not consumed
        assert_eq!(triangle.bytes_consumed(), 23);
        let Glyph::Composite(composite) = glyf.glyph(&loca, GlyphId::new(3)).unwrap() else {
            panic!("expected composite glyph");
        };
        assert_eq!(composite.components[0].glyph, GlyphId::new(2));
        assert_eq!(
            composite.components[0].anchor,
            Anchor::Offset { x: 0, y: 200 }
        );

        let err = glyf.glyph(&loca, GlyphId::new(4)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InconsistentStructure);

        // a glyf table shorter than loca claims
        let short = Glyf::read(FontData::new(&glyf_data[..40])).unwrap();
        let err = short.glyph(&loca, GlyphId::new(3)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::TruncatedInput);
        assert_eq!(err.offset(), 24);
    }
}
