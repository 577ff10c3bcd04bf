//! small utilities used in tests

use std::collections::HashMap;

use sfnt_types::Scalar;

/// A convenience type for generating a buffer of big-endian bytes.
#[derive(Debug, Clone, Default)]
pub struct BeBuffer {
    data: Vec<u8>,
    tagged_locations: HashMap<String, usize>,
}

impl BeBuffer {
    pub fn new() -> Self {
        Default::default()
    }

    /// The current length of the buffer in bytes.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Returns `true` if the buffer contains zero bytes.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Return a reference to the contents of the buffer
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Write any scalar to this buffer.
    pub fn push(mut self, item: impl Scalar) -> Self {
        self.data.extend(item.to_raw().as_ref());
        self
    }

    /// Write a scalar, remembering its position under `tag`.
    pub fn push_with_tag(mut self, item: impl Scalar, tag: &str) -> Self {
        self.tagged_locations
            .insert(tag.to_string(), self.data.len());
        self.data.extend(item.to_raw().as_ref());
        self
    }

    /// Write multiple scalars into the buffer
    pub fn extend<T: Scalar>(mut self, iter: impl IntoIterator<Item = T>) -> Self {
        for item in iter {
            self.data.extend(item.to_raw().as_ref());
        }
        self
    }

    /// Append raw bytes.
    pub fn extend_bytes(mut self, bytes: &[u8]) -> Self {
        self.data.extend_from_slice(bytes);
        self
    }

    /// The position of the item written with `tag`.
    ///
    /// Panics if no item was written with this tag.
    pub fn offset_for(&self, tag: &str) -> usize {
        // panic on unrecognized tags
        self.tagged_locations.get(tag).copied().unwrap()
    }

    /// Overwrite the item written with `tag`.
    pub fn write_at(&mut self, tag: &str, item: impl Scalar) {
        let offset = self.offset_for(tag);
        let raw = item.to_raw();
        let new_data: &[u8] = raw.as_ref();
        let data = &mut self.data[offset..];
        if data.len() < new_data.len() {
            panic!("not enough room left in buffer for the requested write.");
        }
        data[..new_data.len()].copy_from_slice(new_data);
    }

    pub fn into_inner(self) -> Vec<u8> {
        self.data
    }
}

impl std::ops::Deref for BeBuffer {
    type Target = [u8];
    fn deref(&self) -> &Self::Target {
        &self.data
    }
}

/// Build a [`BeBuffer`] from a list of items.
///
/// Each item is one of:
/// - a literal or identifier: `1u16`, `SOME_CONST`
/// - a parenthesized expression: `(-40i16)`, `(items.len() as u16)`
/// - an array of scalars of one type: `[1u8, 2, 3]`
/// - a tagged scalar, for later use with [`BeBuffer::write_at`]: `{0u16: "len"}`
#[macro_export]
macro_rules! be_buffer {
    ( $( $item:tt ),* $(,)? ) => {{
        let builder = $crate::bebuffer::BeBuffer::new();
        $( let builder = $crate::be_buffer_add!(builder, $item); )*
        builder
    }};
}

#[macro_export]
#[doc(hidden)]
macro_rules! be_buffer_add {
    ($b:ident, $v:literal) => {
        $b.push($v)
    };
    ($b:ident, [ $( $v:expr ),* $(,)? ]) => {
        $b.extend([ $( $v ),* ])
    };
    ($b:ident, { $v:tt : $tag:literal }) => {
        $b.push_with_tag($v, $tag)
    };
    ($b:ident, ( $v:expr )) => {
        $b.push($v)
    };
    ($b:ident, $v:ident) => {
        $b.push($v)
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn macro_items() {
        const MAGIC: u32 = 0x5F0F3CF5;
        let count = 2usize;
        let mut buf = be_buffer! {
            1u16,
            (-2i16),
            [3u8, 4],
            {0u16: "patch"},
            MAGIC,
            (count as u8)
        };
        assert_eq!(buf.offset_for("patch"), 6);
        buf.write_at("patch", 0xABCDu16);
        assert_eq!(
            buf.data(),
            &[0, 1, 0xff, 0xfe, 3, 4, 0xab, 0xcd, 0x5f, 0x0f, 0x3c, 0xf5, 2]
        );
    }
}
