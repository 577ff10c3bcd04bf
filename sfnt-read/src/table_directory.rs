//! The sfnt header and [table directory]
//!
//! [table directory]: https://learn.microsoft.com/en-us/typography/opentype/spec/otff#table-directory

use std::collections::BTreeMap;
use std::ops::Range;

use types::{Tag, CFF_SFNT_VERSION, TRUE_SFNT_VERSION, TT_SFNT_VERSION};

use crate::{DecodeError, ErrorKind, FontData, FontRead};

/// The size of the sfnt header preceding the table records.
pub const SFNT_HEADER_LEN: usize = 12;
/// The size of a single table record.
pub const TABLE_RECORD_LEN: usize = 16;

/// A single entry in the table directory.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct TableRecord {
    /// Table identifier.
    pub tag: Tag,
    /// Checksum for the table.
    pub checksum: u32,
    /// Offset from the beginning of the font data.
    pub offset: u32,
    /// Length of the table.
    pub length: u32,
}

impl TableRecord {
    /// The byte range of this table in the font data.
    pub fn range(&self) -> Range<usize> {
        let start = self.offset as usize;
        start..start + self.length as usize
    }

    /// Compare the stored checksum with one computed from `font_data`.
    ///
    /// The `checkSumAdjustment` field of the `head` table is treated as zero,
    /// since it is written after the table checksum is computed. Returns
    /// `false` if the table does not fit in the data.
    pub fn checksum_matches(&self, font_data: &[u8]) -> bool {
        let Some(bytes) = font_data.get(self.range()) else {
            return false;
        };
        let mut computed = compute_checksum(bytes);
        if self.tag == crate::tables::head::TAG {
            if let Some(adjustment) = bytes.get(8..12) {
                let adjustment = u32::from_be_bytes([
                    adjustment[0],
                    adjustment[1],
                    adjustment[2],
                    adjustment[3],
                ]);
                computed = computed.wrapping_sub(adjustment);
            }
        }
        computed == self.checksum
    }
}

/// The sfnt header and the records that follow it.
///
/// Tags are unique by convention, but a font that repeats a tag is not
/// rejected: the last record with a given tag is the one that lookups return.
#[derive(Clone, Debug, Default)]
pub struct TableDirectory {
    /// 0x00010000, `OTTO` or `true`.
    pub sfnt_version: u32,
    pub search_range: u16,
    pub entry_selector: u16,
    pub range_shift: u16,
    records: Vec<TableRecord>,
    // tag -> index into records; later records replace earlier ones
    by_tag: BTreeMap<Tag, usize>,
}

impl TableDirectory {
    /// Every record, in file order.
    pub fn records(&self) -> &[TableRecord] {
        &self.records
    }

    /// The number of records in the directory.
    pub fn num_tables(&self) -> usize {
        self.records.len()
    }

    /// Find the record for `tag`.
    pub fn get(&self, tag: Tag) -> Option<&TableRecord> {
        self.by_tag.get(&tag).and_then(|idx| self.records.get(*idx))
    }

    /// `true` if the directory has a record for `tag`.
    pub fn contains(&self, tag: Tag) -> bool {
        self.by_tag.contains_key(&tag)
    }
}

impl<'a> FontRead<'a> for TableDirectory {
    fn read(data: FontData<'a>) -> Result<Self, DecodeError> {
        if data.len() < SFNT_HEADER_LEN {
            return Err(DecodeError::new(
                ErrorKind::TruncatedInput,
                "sfnt header",
                data.position() + data.len(),
            ));
        }
        let mut cursor = data.cursor();
        let sfnt_version: u32 = cursor.read()?;
        if ![TT_SFNT_VERSION, CFF_SFNT_VERSION, TRUE_SFNT_VERSION].contains(&sfnt_version) {
            return Err(cursor.error_at(ErrorKind::InvalidMagicOrVersion, "sfntVersion", 0));
        }
        let num_tables: u16 = cursor.read()?;
        let search_range = cursor.read()?;
        let entry_selector = cursor.read()?;
        let range_shift = cursor.read()?;

        if SFNT_HEADER_LEN + num_tables as usize * TABLE_RECORD_LEN > data.len() {
            return Err(cursor.error_at(
                ErrorKind::TruncatedInput,
                "table records",
                SFNT_HEADER_LEN,
            ));
        }

        let mut records = Vec::with_capacity(num_tables as usize);
        let mut by_tag = BTreeMap::new();
        for idx in 0..num_tables as usize {
            let record_pos = SFNT_HEADER_LEN + idx * TABLE_RECORD_LEN;
            let record = TableRecord {
                tag: cursor.read()?,
                checksum: cursor.read()?,
                offset: cursor.read()?,
                length: cursor.read()?,
            };
            let end = (record.offset as u64) + (record.length as u64);
            if end > data.len() as u64 {
                return Err(cursor
                    .error_at(ErrorKind::TruncatedInput, "table record", record_pos)
                    .with_tag(record.tag));
            }
            if by_tag.insert(record.tag, idx).is_some() {
                log::warn!("duplicate table record for '{}'", record.tag);
            }
            log::trace!(
                "table '{}' at {}..{}",
                record.tag,
                record.offset,
                end
            );
            records.push(record);
        }
        if records.windows(2).any(|pair| pair[0].tag > pair[1].tag) {
            log::debug!("table directory is not sorted by tag");
        }
        Ok(TableDirectory {
            sfnt_version,
            search_range,
            entry_selector,
            range_shift,
            records,
            by_tag,
        })
    }
}

/// Calculate a font table checksum.
///
/// This is the sum of the table as big-endian u32 words, with the final
/// word padded with zeros.
pub fn compute_checksum(table: &[u8]) -> u32 {
    let mut chunks = table.chunks_exact(4);
    let mut sum = chunks.by_ref().fold(0u32, |acc, chunk| {
        acc.wrapping_add(u32::from_be_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]))
    });
    let rem = chunks.remainder();
    if !rem.is_empty() {
        let mut last = [0u8; 4];
        last[..rem.len()].copy_from_slice(rem);
        sum = sum.wrapping_add(u32::from_be_bytes(last));
    }
    sum
}

#[cfg(test)]
mod tests {
    use super::*;
    use sfnt_test_data::be_buffer;

    fn directory(records: &[(Tag, u32, u32)], total_len: usize) -> Vec<u8> {
        let mut buf = be_buffer! {
            TT_SFNT_VERSION,
            (records.len() as u16),
            0u16,
            0u16,
            0u16
        };
        for (tag, offset, length) in records {
            buf = buf.push(*tag).push(0u32).push(*offset).push(*length);
        }
        let mut data = buf.to_vec();
        data.resize(total_len, 0);
        data
    }

    #[test]
    fn reads_records() {
        let data = directory(
            &[(Tag::new(b"cmap"), 44, 4), (Tag::new(b"head"), 48, 8)],
            56,
        );
        let dir = TableDirectory::read(FontData::new(&data)).unwrap();
        assert_eq!(dir.num_tables(), 2);
        assert_eq!(dir.get(Tag::new(b"head")).unwrap().range(), 48..56);
        assert!(dir.contains(Tag::new(b"cmap")));
        assert!(!dir.contains(Tag::new(b"glyf")));
    }

    #[test]
    fn table_past_end_is_fatal() {
        let data = directory(&[(Tag::new(b"head"), 28, 54)], 81);
        let err = TableDirectory::read(FontData::new(&data)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::TruncatedInput);
        assert_eq!(err.tag(), Some(Tag::new(b"head")));
        assert_eq!(err.offset(), 12);
    }

    #[test]
    fn offset_overflow_is_fatal() {
        let data = directory(&[(Tag::new(b"glyf"), u32::MAX, 2)], 28);
        let err = TableDirectory::read(FontData::new(&data)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::TruncatedInput);
    }

    #[test]
    fn truncated_record() {
        let mut data = directory(&[(Tag::new(b"head"), 0, 0)], 28);
        data.truncate(20);
        let err = TableDirectory::read(FontData::new(&data)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::TruncatedInput);
        assert_eq!(err.what(), "table records");
        assert_eq!(err.offset(), SFNT_HEADER_LEN);
    }

    #[test]
    fn record_errors_use_record_stride() {
        let data = directory(
            &[
                (Tag::new(b"cmap"), 44, 4),
                (Tag::new(b"glyf"), 48, 4),
                (Tag::new(b"head"), 52, 54),
            ],
            60,
        );
        let err = TableDirectory::read(FontData::new(&data)).unwrap_err();
        assert_eq!(err.tag(), Some(Tag::new(b"head")));
        assert_eq!(err.offset(), SFNT_HEADER_LEN + 2 * TABLE_RECORD_LEN);
    }

    #[test]
    fn bad_sfnt_version() {
        let data = be_buffer! { 0x00020000u32, 0u16, 0u16, 0u16, 0u16 };
        let err = TableDirectory::read(FontData::new(&data)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidMagicOrVersion);
        let err = TableDirectory::read(FontData::new(&data[..6])).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::TruncatedInput);
    }

    #[test]
    fn duplicate_tags_last_wins() {
        let data = directory(
            &[(Tag::new(b"name"), 44, 2), (Tag::new(b"name"), 46, 6)],
            52,
        );
        let dir = TableDirectory::read(FontData::new(&data)).unwrap();
        assert_eq!(dir.num_tables(), 2);
        assert_eq!(dir.get(Tag::new(b"name")).unwrap().offset, 46);
    }

    #[test]
    fn checksums() {
        assert_eq!(compute_checksum(&[0, 0, 0, 1, 0, 0, 0, 2]), 3);
        assert_eq!(compute_checksum(&[0, 0, 0, 1, 1]), 0x0100_0001);
        let record = TableRecord {
            tag: Tag::new(b"test"),
            checksum: 3,
            offset: 0,
            length: 8,
        };
        assert!(record.checksum_matches(&[0, 0, 0, 1, 0, 0, 0, 2]));
        assert!(!record.checksum_matches(&[0, 0, 0, 1]));
    }
}
