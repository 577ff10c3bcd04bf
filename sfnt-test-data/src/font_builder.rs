//! Assemble table bytes into a complete sfnt file.

use std::collections::BTreeMap;

use sfnt_types::{Tag, TT_SFNT_VERSION};

const TABLE_RECORD_LEN: usize = 16;

/// Build a font file from raw table data.
///
/// Tables are written in tag order, each starting on a four byte boundary,
/// with checksums and binary search fields filled in.
#[derive(Debug, Clone, Default)]
pub struct FontBuilder {
    sfnt_version: Option<u32>,
    tables: BTreeMap<Tag, Vec<u8>>,
}

impl FontBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Override the sfnt version (0x00010000 by default).
    pub fn sfnt_version(&mut self, version: u32) -> &mut Self {
        self.sfnt_version = Some(version);
        self
    }

    pub fn add_raw(&mut self, tag: Tag, data: impl Into<Vec<u8>>) -> &mut Self {
        self.tables.insert(tag, data.into());
        self
    }

    pub fn contains(&self, tag: Tag) -> bool {
        self.tables.contains_key(&tag)
    }

    pub fn build(&self) -> Vec<u8> {
        let num_tables = self.tables.len();
        let header_len = 12 + num_tables * TABLE_RECORD_LEN;
        let search = SearchRange::compute(num_tables, TABLE_RECORD_LEN);

        let mut data = Vec::new();
        data.extend(self.sfnt_version.unwrap_or(TT_SFNT_VERSION).to_be_bytes());
        data.extend((num_tables as u16).to_be_bytes());
        data.extend(search.search_range.to_be_bytes());
        data.extend(search.entry_selector.to_be_bytes());
        data.extend(search.range_shift.to_be_bytes());

        let mut position = header_len;
        for (tag, table) in &self.tables {
            data.extend(tag.to_be_bytes());
            data.extend(checksum(table).to_be_bytes());
            data.extend((position as u32).to_be_bytes());
            data.extend((table.len() as u32).to_be_bytes());
            position += round4(table.len());
        }
        for table in self.tables.values() {
            data.extend_from_slice(table);
            data.resize(round4(data.len()), 0);
        }
        data
    }
}

struct SearchRange {
    search_range: u16,
    entry_selector: u16,
    range_shift: u16,
}

impl SearchRange {
    fn compute(n_items: usize, item_size: usize) -> Self {
        if n_items == 0 {
            return SearchRange {
                search_range: 0,
                entry_selector: 0,
                range_shift: 0,
            };
        }
        let entry_selector = (usize::BITS - 1 - n_items.leading_zeros()) as usize;
        let search_range = (1usize << entry_selector) * item_size;
        let range_shift = n_items * item_size - search_range;
        SearchRange {
            search_range: search_range as u16,
            entry_selector: entry_selector as u16,
            range_shift: range_shift as u16,
        }
    }
}

fn round4(sz: usize) -> usize {
    (sz + 3) & !3
}

/// The sum of the table as big-endian u32 words, zero padded.
pub fn checksum(table: &[u8]) -> u32 {
    table.chunks(4).fold(0u32, |sum, chunk| {
        let mut word = [0u8; 4];
        word[..chunk.len()].copy_from_slice(chunk);
        sum.wrapping_add(u32::from_be_bytes(word))
    })
}
