//! A GPOS ValueRecord

use types::{FixedSize, Offset16};

use crate::{Cursor, DecodeError};

/// [ValueFormat](https://learn.microsoft.com/en-us/typography/opentype/spec/gpos#valueRecord) flags
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct ValueFormat(u16);

impl ValueFormat {
    /// Includes horizontal adjustment for placement
    pub const X_PLACEMENT: Self = Self(0x0001);
    /// Includes vertical adjustment for placement
    pub const Y_PLACEMENT: Self = Self(0x0002);
    /// Includes horizontal adjustment for advance
    pub const X_ADVANCE: Self = Self(0x0004);
    /// Includes vertical adjustment for advance
    pub const Y_ADVANCE: Self = Self(0x0008);
    /// Includes Device table (non-variable font) / VariationIndex
    /// table (variable font) for horizontal placement
    pub const X_PLACEMENT_DEVICE: Self = Self(0x0010);
    /// Includes Device table (non-variable font) / VariationIndex
    /// table (variable font) for vertical placement
    pub const Y_PLACEMENT_DEVICE: Self = Self(0x0020);
    /// Includes Device table (non-variable font) / VariationIndex
    /// table (variable font) for horizontal advance
    pub const X_ADVANCE_DEVICE: Self = Self(0x0040);
    /// Includes Device table (non-variable font) / VariationIndex
    /// table (variable font) for vertical advance
    pub const Y_ADVANCE_DEVICE: Self = Self(0x0080);

    /// The bits that must be zero.
    pub const RESERVED: u16 = 0xFF00;

    /// Construct a format from raw bits, or `None` if a reserved bit is set.
    pub const fn from_bits(bits: u16) -> Option<Self> {
        if bits & Self::RESERVED != 0 {
            None
        } else {
            Some(Self(bits))
        }
    }

    pub const fn bits(self) -> u16 {
        self.0
    }

    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    /// Return the number of bytes required to store a [`ValueRecord`] in this format.
    pub fn record_byte_len(self) -> usize {
        FIELD_RULES
            .iter()
            .filter(|(flag, _)| self.contains(*flag))
            .count()
            * u16::RAW_BYTE_LEN
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum ValueField {
    XPlacement,
    YPlacement,
    XAdvance,
    YAdvance,
    XPlacementDevice,
    YPlacementDevice,
    XAdvanceDevice,
    YAdvanceDevice,
}

/// The fields of a value record in the order they are stored. Each present
/// field is a single 16-bit value.
///
/// Both reading and [`ValueFormat::record_byte_len`] walk this list.
const FIELD_RULES: [(ValueFormat, ValueField); 8] = [
    (ValueFormat::X_PLACEMENT, ValueField::XPlacement),
    (ValueFormat::Y_PLACEMENT, ValueField::YPlacement),
    (ValueFormat::X_ADVANCE, ValueField::XAdvance),
    (ValueFormat::Y_ADVANCE, ValueField::YAdvance),
    (ValueFormat::X_PLACEMENT_DEVICE, ValueField::XPlacementDevice),
    (ValueFormat::Y_PLACEMENT_DEVICE, ValueField::YPlacementDevice),
    (ValueFormat::X_ADVANCE_DEVICE, ValueField::XAdvanceDevice),
    (ValueFormat::Y_ADVANCE_DEVICE, ValueField::YAdvanceDevice),
];

/// A Positioning ValueRecord.
///
/// Fields not selected by the format are `None`. Device offsets are kept
/// but not followed.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct ValueRecord {
    pub x_placement: Option<i16>,
    pub y_placement: Option<i16>,
    pub x_advance: Option<i16>,
    pub y_advance: Option<i16>,
    pub x_placement_device: Option<Offset16>,
    pub y_placement_device: Option<Offset16>,
    pub x_advance_device: Option<Offset16>,
    pub y_advance_device: Option<Offset16>,
    pub format: ValueFormat,
}

impl ValueRecord {
    /// Read a record in the given format, advancing the cursor past it.
    pub fn read(cursor: &mut Cursor, format: ValueFormat) -> Result<Self, DecodeError> {
        let mut this = ValueRecord {
            format,
            ..Default::default()
        };
        let start = cursor.position();
        for (flag, field) in FIELD_RULES {
            if format.contains(flag) {
                this.set(field, cursor.read()?);
            }
        }
        debug_assert_eq!(cursor.position() - start, format.record_byte_len());
        Ok(this)
    }

    fn set(&mut self, field: ValueField, raw: u16) {
        let value = Some(raw as i16);
        let device = Some(Offset16::new(raw));
        match field {
            ValueField::XPlacement => self.x_placement = value,
            ValueField::YPlacement => self.y_placement = value,
            ValueField::XAdvance => self.x_advance = value,
            ValueField::YAdvance => self.y_advance = value,
            ValueField::XPlacementDevice => self.x_placement_device = device,
            ValueField::YPlacementDevice => self.y_placement_device = device,
            ValueField::XAdvanceDevice => self.x_advance_device = device,
            ValueField::YAdvanceDevice => self.y_advance_device = device,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ErrorKind, FontData};
    use sfnt_test_data::be_buffer;

    #[test]
    fn byte_len() {
        assert_eq!(ValueFormat::default().record_byte_len(), 0);
        assert_eq!(ValueFormat::Y_PLACEMENT.record_byte_len(), 2);
        let all = ValueFormat::from_bits(0x00FF).unwrap();
        assert_eq!(all.record_byte_len(), 16);
        assert_eq!(ValueFormat::from_bits(0x0100), None);
    }

    #[test]
    fn fields_in_bit_order() {
        let data = be_buffer! { [(-5i16), 12], 0x22u16 };
        let format = ValueFormat::from_bits(0x0049).unwrap();
        let mut cursor = FontData::new(&data).cursor();
        let record = ValueRecord::read(&mut cursor, format).unwrap();
        assert_eq!(cursor.position(), 6);
        assert_eq!(record.x_placement, Some(-5));
        assert_eq!(record.y_placement, None);
        assert_eq!(record.y_advance, Some(12));
        assert_eq!(record.x_advance_device, Some(Offset16::new(0x22)));
        assert_eq!(record.x_placement_device, None);
    }

    #[test]
    fn truncated_record() {
        let data = be_buffer! { 1u16 };
        let format = ValueFormat::from_bits(0x0005).unwrap();
        let mut cursor = FontData::new(&data).cursor();
        let err = ValueRecord::read(&mut cursor, format).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::TruncatedInput);
        assert_eq!(err.offset(), 2);
    }
}
