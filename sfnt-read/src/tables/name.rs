//! The [name (Naming)](https://docs.microsoft.com/en-us/typography/opentype/spec/name) table

use types::{NameId, Tag};

use crate::{Cursor, DecodeError, ErrorKind, FontData, FontRead, TopLevelTable};

/// 'name'
pub const TAG: Tag = Tag::new(b"name");

/// The size of a name record, in bytes.
pub const NAME_RECORD_LEN: usize = 12;

/// [Naming table version 0 or 1](https://docs.microsoft.com/en-us/typography/opentype/spec/name#naming-table-version-0)
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Name {
    /// Table version number (0 or 1)
    pub version: u16,
    /// Offset to the start of string storage, from the start of the table.
    pub storage_offset: u16,
    pub name_records: Vec<NameRecord>,
    /// Language-tag records; always empty for version 0.
    pub lang_tag_records: Vec<LangTagRecord>,
}

/// A record in the naming table, along with its string data.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct NameRecord {
    /// Platform ID.
    pub platform_id: u16,
    /// Platform-specific encoding ID.
    pub encoding_id: u16,
    /// Language ID.
    pub language_id: u16,
    /// Name ID.
    pub name_id: NameId,
    /// The undecoded string bytes.
    pub bytes: Vec<u8>,
    /// The decoded string, if the encoding is one we understand.
    pub string: Option<String>,
}

impl NameRecord {
    // reference from fonttools:
    // https://github.com/fonttools/fonttools/blob/c2119229cfb02cdb7c5a63374ef29d3d514259e8/Lib/fontTools/ttLib/tables/_n_a_m_e.py#L509
    pub fn is_unicode(&self) -> bool {
        self.platform_id == 0 || (self.platform_id == 3 && [0, 1, 10].contains(&self.encoding_id))
    }

    /// The encoding of this record's string.
    pub fn encoding(&self) -> Encoding {
        Encoding::new(self.platform_id, self.encoding_id)
    }
}

/// A language tag, for name records with a language id of 0x8000 or above.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct LangTagRecord {
    /// The tag, as a BCP 47 string.
    pub lang_tag: String,
}

impl Name {
    /// The first decoded string for this name id.
    ///
    /// Unicode records are preferred over Macintosh ones.
    pub fn find(&self, name_id: NameId) -> Option<&str> {
        let mut candidates = self
            .name_records
            .iter()
            .filter(|record| record.name_id == name_id && record.string.is_some());
        let first = candidates.clone().next()?;
        candidates
            .find(|record| record.is_unicode())
            .unwrap_or(first)
            .string
            .as_deref()
    }

    /// The language tag for a record's language id, in version 1 tables.
    pub fn lang_tag(&self, language_id: u16) -> Option<&str> {
        let idx = language_id.checked_sub(0x8000)?;
        self.lang_tag_records
            .get(idx as usize)
            .map(|record| record.lang_tag.as_str())
    }
}

impl TopLevelTable for Name {
    const TAG: Tag = TAG;
}

impl<'a> FontRead<'a> for Name {
    fn read(data: FontData<'a>) -> Result<Self, DecodeError> {
        let mut cursor = data.cursor().in_table(TAG);
        let version: u16 = cursor.read()?;
        if version > 1 {
            return Err(cursor.error_at(ErrorKind::UnsupportedFormat, "version", 0));
        }
        let count: u16 = cursor.read()?;
        let storage_offset: u16 = cursor.read()?;

        let mut name_records = Vec::with_capacity(count as usize);
        for _ in 0..count {
            let platform_id = cursor.read()?;
            let encoding_id = cursor.read()?;
            let language_id = cursor.read()?;
            let name_id = cursor.read()?;
            let bytes = read_string(&mut cursor, data, storage_offset)?;
            let string = Encoding::new(platform_id, encoding_id).decode(&bytes);
            name_records.push(NameRecord {
                platform_id,
                encoding_id,
                language_id,
                name_id,
                bytes,
                string,
            });
        }

        let mut lang_tag_records = Vec::new();
        if version == 1 {
            let lang_tag_count: u16 = cursor.read()?;
            for _ in 0..lang_tag_count {
                let bytes = read_string(&mut cursor, data, storage_offset)?;
                lang_tag_records.push(LangTagRecord {
                    lang_tag: decode_utf16_be(&bytes),
                });
            }
        }
        log::debug!(
            "decoded 'name' version {version}: {} records, {} language tags",
            name_records.len(),
            lang_tag_records.len()
        );
        Ok(Name {
            version,
            storage_offset,
            name_records,
            lang_tag_records,
        })
    }
}

/// Read a (length, offset) pair and copy out the string it points to.
fn read_string(
    cursor: &mut Cursor,
    data: FontData,
    storage_offset: u16,
) -> Result<Vec<u8>, DecodeError> {
    let length: u16 = cursor.read()?;
    let string_offset: u16 = cursor.read()?;
    let start = storage_offset as usize + string_offset as usize;
    let end = start + length as usize;
    data.as_bytes()
        .get(start..end)
        .map(<[u8]>::to_vec)
        .ok_or_else(|| cursor.error_at(ErrorKind::TruncatedInput, "string", start))
}

/// The encoding used by the name table.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Encoding {
    Utf16Be,
    MacRoman,
    Unknown,
}

impl Encoding {
    /// Determine the coding from the platform and encoding id.
    pub fn new(platform_id: u16, encoding_id: u16) -> Encoding {
        match (platform_id, encoding_id) {
            (0, _) => Encoding::Utf16Be,
            (1, 0) => Encoding::MacRoman,
            (3, 0) => Encoding::Utf16Be,
            (3, 1) => Encoding::Utf16Be,
            (3, 10) => Encoding::Utf16Be,
            _ => Encoding::Unknown,
        }
    }

    /// Decode `bytes`, or `None` for an unknown encoding.
    pub fn decode(self, bytes: &[u8]) -> Option<String> {
        match self {
            Encoding::Utf16Be => Some(decode_utf16_be(bytes)),
            Encoding::MacRoman => Some(bytes.iter().copied().map(decode_mac_roman).collect()),
            Encoding::Unknown => None,
        }
    }
}

/// Unpaired surrogates become U+FFFD; a trailing odd byte is ignored.
fn decode_utf16_be(bytes: &[u8]) -> String {
    let units = bytes
        .chunks_exact(2)
        .map(|pair| u16::from_be_bytes([pair[0], pair[1]]));
    char::decode_utf16(units)
        .map(|c| c.unwrap_or(char::REPLACEMENT_CHARACTER))
        .collect()
}

/// Convert from a mac-roman encoded byte to a `char`
pub(crate) fn decode_mac_roman(raw: u8) -> char {
    const START_REMAP: u8 = 128;
    if raw < START_REMAP {
        raw as char
    } else {
        let idx = (raw - START_REMAP) as usize;
        char::from_u32(MAC_ROMAN_DECODE[idx] as u32).unwrap_or(char::REPLACEMENT_CHARACTER)
    }
}

/// a lookup table for the Mac Moman encoding. this matches the values 128..=255
/// to specific unicode values.
#[rustfmt::skip]
static MAC_ROMAN_DECODE: [u16; 128] = [
    196, 197, 199, 201, 209, 214, 220, 225, 224, 226, 228, 227, 229, 231, 233,
    232, 234, 235, 237, 236, 238, 239, 241, 243, 242, 244, 246, 245, 250, 249,
    251, 252, 8224, 176, 162, 163, 167, 8226, 182, 223, 174, 169, 8482, 180,
    168, 8800, 198, 216, 8734, 177, 8804, 8805, 165, 181, 8706, 8721, 8719,
    960, 8747, 170, 186, 937, 230, 248, 191, 161, 172, 8730, 402, 8776, 8710,
    171, 187, 8230, 160, 192, 195, 213, 338, 339, 8211, 8212, 8220, 8221, 8216,
    8217, 247, 9674, 255, 376, 8260, 8364, 8249, 8250, 64257, 64258, 8225, 183,
    8218, 8222, 8240, 194, 202, 193, 203, 200, 205, 206, 207, 204, 211, 212,
    63743, 210, 218, 219, 217, 305, 710, 732, 175, 728, 729, 730, 184, 733,
    731, 711,
];

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use sfnt_test_data::be_buffer;

    #[test]
    fn tiny_names() {
        let data = sfnt_test_data::tiny::name();
        let name = Name::read(FontData::new(&data)).unwrap();
        assert_eq!(name.version, 0);
        assert_eq!(name.name_records.len(), 3);
        let mac = &name.name_records[0];
        assert_eq!(mac.encoding(), Encoding::MacRoman);
        assert!(!mac.is_unicode());
        assert_eq!(mac.string.as_deref(), Some("Tiny"));
        assert_eq!(mac.bytes, b"Tiny");
        assert_eq!(name.find(NameId::FAMILY_NAME), Some("Tiny"));
        assert_eq!(name.find(NameId::SUBFAMILY_NAME), Some("Regular"));
        assert_eq!(name.find(NameId::POSTSCRIPT_NAME), None);
        assert!(name.lang_tag_records.is_empty());
    }

    #[test]
    fn version_1_lang_tags() {
        let data = be_buffer! {
            1u16, 1u16, 24u16,
            [3u16, 1, 0x8000, 1, 4, 0],
            1u16,
            [10u16, 4]
        }
        .extend("Ab".encode_utf16())
        .extend("en-US".encode_utf16());
        let name = Name::read(FontData::new(&data)).unwrap();
        assert_eq!(name.find(NameId::FAMILY_NAME), Some("Ab"));
        assert_eq!(name.lang_tag_records.len(), 1);
        assert_eq!(name.lang_tag(0x8000), Some("en-US"));
        assert_eq!(name.lang_tag(0x409), None);
    }

    #[test]
    fn mac_roman() {
        let data = be_buffer! {
            0u16, 1u16, 18u16,
            [1u16, 0, 0, 1, 4, 0],
            [b'C', b'a', b'f', 0x8Eu8]
        };
        let name = Name::read(FontData::new(&data)).unwrap();
        assert_eq!(name.find(NameId::FAMILY_NAME), Some("Café"));
        assert_eq!(decode_mac_roman(0xA5), '•');
        assert_eq!(decode_mac_roman(0xFF), 'ˇ');
    }

    #[test]
    fn unknown_encoding_keeps_bytes() {
        let data = be_buffer! {
            0u16, 1u16, 18u16,
            [3u16, 2, 0, 1, 2, 0],
            [0x82u8, 0xA0]
        };
        let name = Name::read(FontData::new(&data)).unwrap();
        let record = &name.name_records[0];
        assert_eq!(record.encoding(), Encoding::Unknown);
        assert_eq!(record.string, None);
        assert_eq!(record.bytes, [0x82, 0xA0]);
        assert_eq!(name.find(NameId::FAMILY_NAME), None);
    }

    #[test]
    fn lone_surrogate_at_end() {
        // DEVANAGARI LETTER SHORT A (U+0904), unpaired high surrogate (0xD800)
        let decoded = decode_utf16_be(&[0x09, 0x04, 0xD8, 0x00]);
        assert_eq!(decoded, "ऄ\u{FFFD}");
        assert_eq!(decode_utf16_be(&[0xD8, 0x3D, 0xDE, 0x00, 0x00]), "😀");
    }

    #[test]
    fn string_out_of_bounds() {
        let data = be_buffer! {
            0u16, 1u16, 18u16,
            [3u16, 1, 0x409, 1, 8, 0],
            [0u16, 0x41, 0]
        };
        let err = Name::read(FontData::new(&data)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::TruncatedInput);
        assert_eq!(err.what(), "string");
        assert_eq!(err.offset(), 18);
        assert_eq!(err.tag(), Some(TAG));
    }

    #[test]
    fn unsupported_version() {
        let data = be_buffer! { 2u16, 0u16, 6u16 };
        let err = Name::read(FontData::new(&data)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnsupportedFormat);
    }
}
