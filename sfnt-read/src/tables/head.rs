//! The [head](https://docs.microsoft.com/en-us/typography/opentype/spec/head) table

use types::{Fixed, LongDateTime, MajorMinor, Tag};

use crate::{DecodeError, ErrorKind, FontData, FontRead, TopLevelTable};

/// 'head'
pub const TAG: Tag = Tag::new(b"head");

/// The value of the `magicNumber` field.
pub const MAGIC_NUMBER: u32 = 0x5F0F3CF5;

/// The size of the table, in bytes.
pub const HEAD_LEN: usize = 54;

/// The format of the offsets in the `loca` table.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum LocFormat {
    /// Offsets are u16, storing the actual offset divided by two.
    Short,
    /// Offsets are u32.
    Long,
}

/// The [head](https://docs.microsoft.com/en-us/typography/opentype/spec/head)
/// (font header) table.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Head {
    /// Version number of the font header table, set to (1, 0)
    pub version: MajorMinor,
    /// Set by font manufacturer.
    pub font_revision: Fixed,
    /// Written after the table checksums are computed; see
    /// [`TableRecord::checksum_matches`](crate::TableRecord::checksum_matches).
    pub checksum_adjustment: u32,
    /// Set to 0x5F0F3CF5.
    pub magic_number: u32,
    pub flags: u16,
    /// Set to a value from 16 to 16384.
    pub units_per_em: u16,
    /// Number of seconds since 12:00 midnight that started January 1st
    /// 1904 in GMT/UTC time zone.
    pub created: LongDateTime,
    pub modified: LongDateTime,
    /// Minimum x coordinate across all glyph bounding boxes.
    pub x_min: i16,
    /// Minimum y coordinate across all glyph bounding boxes.
    pub y_min: i16,
    /// Maximum x coordinate across all glyph bounding boxes.
    pub x_max: i16,
    /// Maximum y coordinate across all glyph bounding boxes.
    pub y_max: i16,
    /// Bold, italic and other style bits.
    pub mac_style: u16,
    /// Smallest readable size in pixels.
    pub lowest_rec_ppem: u16,
    /// Deprecated (Set to 2).
    pub font_direction_hint: i16,
    /// 0 for short offsets (Offset16), 1 for long (Offset32).
    pub index_to_loc_format: i16,
    /// 0 for current format.
    pub glyph_data_format: i16,
}

impl Head {
    /// The format of the `loca` table, if `index_to_loc_format` is valid.
    pub fn loc_format(&self) -> Option<LocFormat> {
        match self.index_to_loc_format {
            0 => Some(LocFormat::Short),
            1 => Some(LocFormat::Long),
            _ => None,
        }
    }

    /// `true` if `loca` uses 32-bit offsets.
    pub fn is_long_loca(&self) -> bool {
        self.loc_format() == Some(LocFormat::Long)
    }
}

impl TopLevelTable for Head {
    const TAG: Tag = TAG;
}

impl<'a> FontRead<'a> for Head {
    fn read(data: FontData<'a>) -> Result<Self, DecodeError> {
        let mut cursor = data.cursor().in_table(TAG);
        let version: MajorMinor = cursor.read()?;
        if version != MajorMinor::VERSION_1_0 {
            return Err(cursor.error_at(ErrorKind::InvalidMagicOrVersion, "version", 0));
        }
        let font_revision = cursor.read()?;
        let checksum_adjustment = cursor.read()?;
        let magic_number = cursor.read()?;
        if magic_number != MAGIC_NUMBER {
            return Err(cursor.error_at(ErrorKind::InvalidMagicOrVersion, "magicNumber", 12));
        }
        let head = Head {
            version,
            font_revision,
            checksum_adjustment,
            magic_number,
            flags: cursor.read()?,
            units_per_em: cursor.read()?,
            created: cursor.read()?,
            modified: cursor.read()?,
            x_min: cursor.read()?,
            y_min: cursor.read()?,
            x_max: cursor.read()?,
            y_max: cursor.read()?,
            mac_style: cursor.read()?,
            lowest_rec_ppem: cursor.read()?,
            font_direction_hint: cursor.read()?,
            index_to_loc_format: cursor.read()?,
            glyph_data_format: cursor.read()?,
        };
        log::debug!(
            "decoded 'head': unitsPerEm {}, indexToLocFormat {}",
            head.units_per_em,
            head.index_to_loc_format
        );
        Ok(head)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::FontRef;
    use sfnt_test_data::{be_buffer, bebuffer::BeBuffer};
    use types::TT_SFNT_VERSION;

    fn head_data(magic: u32) -> BeBuffer {
        BeBuffer::new()
            .extend([1u16, 0u16])
            .push(Fixed::from_f64(2.8))
            .extend([42u32, magic])
            .extend([16u16, 4096]) // flags, upm
            .extend([LongDateTime::new(-500), LongDateTime::new(101)])
            .extend([-100i16, -50, 400, 711])
            .extend([0u16, 12]) // mac_style / ppem
            .extend([2i16, 1, 0])
    }

    #[test]
    fn smoke_text() {
        let buf = head_data(MAGIC_NUMBER);
        assert_eq!(buf.len(), HEAD_LEN);

        let head = Head::read(FontData::new(&buf)).unwrap();
        assert_eq!(head.version, MajorMinor::VERSION_1_0);
        assert_eq!(head.font_revision, Fixed::from_f64(2.8));
        assert_eq!(head.units_per_em, 4096);
        assert_eq!(head.created.as_secs(), -500);
        assert_eq!(head.y_min, -50);
        assert_eq!(head.loc_format(), Some(LocFormat::Long));
        assert!(head.is_long_loca());
    }

    #[test]
    fn bad_magic() {
        for magic in [0u32, 0xF53C0F5F, MAGIC_NUMBER + 1] {
            let buf = head_data(magic);
            let err = Head::read(FontData::new(&buf)).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::InvalidMagicOrVersion);
            assert_eq!(err.offset(), 12);
            assert_eq!(err.tag(), Some(TAG));
        }
    }

    #[test]
    fn bad_version() {
        let mut buf = head_data(MAGIC_NUMBER).into_inner();
        buf[1] = 2;
        let err = Head::read(FontData::new(&buf)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidMagicOrVersion);
        assert_eq!(err.what(), "version");
    }

    // a directory entry (head, offset 100, length 54) in a 154 byte buffer
    fn font_with_head_at_100(total_len: usize) -> Vec<u8> {
        let directory = be_buffer! {
            TT_SFNT_VERSION,
            1u16, 16u16, 0u16, 0u16,
            (Tag::new(b"head")), 0u32, 100u32, 54u32
        };
        let mut data = directory.into_inner();
        data.resize(100, 0);
        data.extend_from_slice(&head_data(MAGIC_NUMBER));
        data.truncate(total_len);
        data
    }

    #[test]
    fn head_at_offset_100() {
        let data = font_with_head_at_100(154);
        assert_eq!(data.len(), 154);
        assert_eq!(&data[112..116], &MAGIC_NUMBER.to_be_bytes());
        let font = FontRef::new(&data).unwrap();
        let head = Head::read(font.table_data(TAG).unwrap()).unwrap();
        assert_eq!(head.units_per_em, 4096);
    }

    #[test]
    fn head_at_offset_100_truncated() {
        let data = font_with_head_at_100(153);
        let err = FontRef::new(&data).err().unwrap();
        assert_eq!(err.kind(), ErrorKind::TruncatedInput);
        assert_eq!(err.tag(), Some(TAG));

        // decoding the remaining bytes directly fails the same way
        let table = FontData::new(&data).slice(100..).unwrap();
        let err = Head::read(table).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::TruncatedInput);
        assert_eq!(err.offset(), 152);
        assert_eq!(err.tag(), Some(TAG));
    }
}
