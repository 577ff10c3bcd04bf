//! raw font bytes

use std::ops::{Bound, Range, RangeBounds};

use types::{BigEndian, FixedSize, Scalar, Tag};

use crate::read::{DecodeError, ErrorKind, FontRead, FontReadWithArgs};

/// A reference to raw binary font data.
///
/// This is a wrapper around a byte slice, that provides convenience methods
/// for parsing and validating that data. It remembers its absolute position
/// in the font file, so that errors can report where they happened.
#[derive(Debug, Default, Clone, Copy)]
pub struct FontData<'a> {
    total_pos: usize,
    bytes: &'a [u8],
}

/// A cursor for validating bytes during parsing.
///
/// Every read is bounds checked; reading past the end of the data returns a
/// [`ErrorKind::TruncatedInput`] error instead of panicking.
pub struct Cursor<'a> {
    pos: usize,
    data: FontData<'a>,
    tag: Option<Tag>,
}

impl<'a> FontData<'a> {
    /// Create a new `FontData` with these bytes.
    ///
    /// The data is assumed to start at the beginning of the font file.
    pub const fn new(bytes: &'a [u8]) -> Self {
        FontData {
            total_pos: 0,
            bytes,
        }
    }

    /// The length of the data, in bytes
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// `true` if the data has a length of zero bytes.
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// The absolute position of the start of this data in the font file.
    pub fn position(&self) -> usize {
        self.total_pos
    }

    /// Returns self[pos..]
    pub fn split_off(&self, pos: usize) -> Option<FontData<'a>> {
        self.bytes.get(pos..).map(|bytes| FontData {
            bytes,
            total_pos: self.total_pos.saturating_add(pos),
        })
    }

    /// Returns self[..pos], and updates self to = self[pos..];
    pub fn take_up_to(&mut self, pos: usize) -> Option<FontData<'a>> {
        if pos > self.len() {
            return None;
        }
        let (head, tail) = self.bytes.split_at(pos);
        let head = FontData {
            bytes: head,
            total_pos: self.total_pos,
        };
        self.bytes = tail;
        self.total_pos = self.total_pos.saturating_add(pos);
        Some(head)
    }

    /// Returns the data in `range`, or `None` if it is out of bounds.
    pub fn slice(&self, range: impl RangeBounds<usize>) -> Option<FontData<'a>> {
        let start = match range.start_bound() {
            Bound::Unbounded => 0,
            Bound::Included(i) => *i,
            Bound::Excluded(i) => i.saturating_add(1),
        };

        let bounds = (range.start_bound().cloned(), range.end_bound().cloned());
        let total_pos = self.total_pos.saturating_add(start);
        self.bytes
            .get(bounds)
            .map(|bytes| FontData { bytes, total_pos })
    }

    /// Like [`split_off`](Self::split_off), but returning an error naming `what`.
    pub fn expect_split_off(
        &self,
        pos: usize,
        what: &'static str,
    ) -> Result<FontData<'a>, DecodeError> {
        self.split_off(pos).ok_or_else(|| self.truncated_at(what, pos))
    }

    /// Read a scalar at the provided location in the data.
    pub fn read_at<T: Scalar>(&self, offset: usize) -> Result<T, DecodeError> {
        offset
            .checked_add(T::RAW_BYTE_LEN)
            .and_then(|end| self.bytes.get(offset..end))
            .and_then(T::read)
            .ok_or_else(|| self.truncated_at(std::any::type_name::<T>(), offset))
    }

    /// Interpret the bytes in `range` as an array of big-endian values.
    ///
    /// This does not copy; the values are decoded on access.
    pub fn read_array<T>(&self, range: Range<usize>) -> Result<&'a [BigEndian<T>], DecodeError>
    where
        T: Scalar + Copy + 'static,
    {
        let start = range.start;
        let bytes = self
            .bytes
            .get(range)
            .ok_or_else(|| self.truncated_at(std::any::type_name::<T>(), start))?;
        bytemuck::try_cast_slice(bytes).map_err(|_| {
            DecodeError::new(
                ErrorKind::InconsistentStructure,
                "array length",
                self.total_pos.saturating_add(start),
            )
        })
    }

    /// Read a type that implements [`FontReadWithArgs`] from the given range.
    pub fn read_with_args<T>(&self, range: Range<usize>, args: &T::Args) -> Result<T, DecodeError>
    where
        T: FontReadWithArgs<'a>,
    {
        let start = range.start;
        self.slice(range)
            .ok_or_else(|| self.truncated_at(std::any::type_name::<T>(), start))
            .and_then(|data| T::read_with_args(data, args))
    }

    /// Read a self-describing type starting at `offset`.
    pub fn read_from<T: FontRead<'a>>(&self, offset: usize) -> Result<T, DecodeError> {
        self.expect_split_off(offset, std::any::type_name::<T>())
            .and_then(T::read)
    }

    /// A cursor positioned at the start of this data.
    pub fn cursor(&self) -> Cursor<'a> {
        Cursor {
            pos: 0,
            data: *self,
            tag: None,
        }
    }

    /// A cursor positioned at `pos`.
    ///
    /// The position is checked on the first read, not here.
    pub fn cursor_at(&self, pos: usize) -> Cursor<'a> {
        Cursor {
            pos,
            data: *self,
            tag: None,
        }
    }

    /// The raw bytes.
    pub fn as_bytes(&self) -> &'a [u8] {
        self.bytes
    }

    /// An error for a read of `what` at `offset`, relative to this data.
    pub(crate) fn truncated_at(&self, what: &'static str, offset: usize) -> DecodeError {
        DecodeError::truncated(what, self.total_pos.saturating_add(offset))
    }

    /// An error of `kind` at `offset`, relative to this data.
    pub(crate) fn error_at(&self, kind: ErrorKind, what: &'static str, offset: usize) -> DecodeError {
        DecodeError::new(kind, what, self.total_pos.saturating_add(offset))
    }
}

impl<'a> Cursor<'a> {
    /// Attach a table tag to every error produced by this cursor.
    pub fn in_table(mut self, tag: Tag) -> Self {
        self.tag = Some(tag);
        self
    }

    fn tagged(&self, err: DecodeError) -> DecodeError {
        match self.tag {
            Some(tag) => err.with_tag(tag),
            None => err,
        }
    }

    /// Skip `n_bytes`, failing if that moves past the end of the data.
    pub fn advance_by(&mut self, n_bytes: usize) -> Result<(), DecodeError> {
        let end = self.pos.saturating_add(n_bytes);
        if end > self.data.len() {
            return Err(self.tagged(self.data.truncated_at("padding", self.pos)));
        }
        self.pos = end;
        Ok(())
    }

    /// Read a scalar and advance the cursor.
    pub fn read<T: Scalar>(&mut self) -> Result<T, DecodeError> {
        let value = self.data.read_at(self.pos).map_err(|e| self.tagged(e))?;
        self.pos += T::RAW_BYTE_LEN;
        Ok(value)
    }

    /// Read `len` items without copying, advancing the cursor past them.
    pub fn read_be_array<T>(&mut self, len: usize) -> Result<&'a [BigEndian<T>], DecodeError>
    where
        T: Scalar + Copy + 'static,
    {
        let end = len
            .checked_mul(T::RAW_BYTE_LEN)
            .and_then(|n_bytes| self.pos.checked_add(n_bytes))
            .ok_or_else(|| self.tagged(self.data.truncated_at("array", self.pos)))?;
        let array = self
            .data
            .read_array(self.pos..end)
            .map_err(|e| self.tagged(e))?;
        self.pos = end;
        Ok(array)
    }

    /// Read `len` items into a vector, advancing the cursor past them.
    pub fn read_array<T>(&mut self, len: usize) -> Result<Vec<T>, DecodeError>
    where
        T: Scalar + Copy + 'static,
    {
        self.read_be_array(len)
            .map(|array| array.iter().map(BigEndian::get).collect())
    }

    /// Read `len` raw bytes.
    pub fn read_bytes(&mut self, len: usize) -> Result<&'a [u8], DecodeError> {
        let end = self.pos.saturating_add(len);
        let bytes = self
            .data
            .as_bytes()
            .get(self.pos..end)
            .ok_or_else(|| self.tagged(self.data.truncated_at("bytes", self.pos)))?;
        self.pos = end;
        Ok(bytes)
    }

    /// The current position, relative to the start of the data.
    pub fn position(&self) -> usize {
        self.pos
    }

    /// The current position in the font file.
    pub fn absolute_position(&self) -> usize {
        self.data.position().saturating_add(self.pos)
    }

    /// The number of bytes remaining after the cursor.
    pub fn remaining_bytes(&self) -> usize {
        self.data.len().saturating_sub(self.pos)
    }

    /// The data after the cursor.
    pub fn remaining(&self) -> Option<FontData<'a>> {
        self.data.split_off(self.pos)
    }

    /// An error of `kind` at the current position.
    pub fn error(&self, kind: ErrorKind, what: &'static str) -> DecodeError {
        self.error_at(kind, what, self.pos)
    }

    /// An error of `kind` at `pos`, relative to the start of the data.
    pub fn error_at(&self, kind: ErrorKind, what: &'static str, pos: usize) -> DecodeError {
        self.tagged(self.data.error_at(kind, what, pos))
    }

    /// Finish reading, returning the number of bytes consumed.
    pub fn finish(self) -> usize {
        self.pos
    }
}

impl<'a> From<&'a [u8]> for FontData<'a> {
    fn from(src: &'a [u8]) -> FontData<'a> {
        FontData::new(src)
    }
}

impl AsRef<[u8]> for FontData<'_> {
    fn as_ref(&self) -> &[u8] {
        self.bytes
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn read_past_end() {
        let data = FontData::new(&[0, 1, 2]);
        assert_eq!(data.read_at::<u16>(0).unwrap(), 1);
        let err = data.read_at::<u16>(2).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::TruncatedInput);
        assert_eq!(err.offset(), 2);
        assert!(data.read_at::<u32>(usize::MAX).is_err());
    }

    #[test]
    fn absolute_offsets() {
        let bytes = [0u8; 10];
        let data = FontData::new(&bytes).split_off(6).unwrap();
        assert_eq!(data.position(), 6);
        let err = data.read_at::<u32>(2).unwrap_err();
        assert_eq!(err.offset(), 8);

        let mut cursor = data.cursor().in_table(Tag::new(b"test"));
        cursor.read::<u16>().unwrap();
        assert_eq!(cursor.absolute_position(), 8);
        let err = cursor.read::<u32>().unwrap_err();
        assert_eq!(err.offset(), 8);
        assert_eq!(err.tag(), Some(Tag::new(b"test")));
    }

    #[test]
    fn cursor_arrays() {
        let data = FontData::new(&[0, 1, 0, 2, 0xff, 0xff, 9]);
        let mut cursor = data.cursor();
        assert_eq!(cursor.read_array::<u16>(2).unwrap(), vec![1, 2]);
        assert_eq!(cursor.read_be_array::<i16>(1).unwrap()[0].get(), -1);
        assert_eq!(cursor.remaining_bytes(), 1);
        assert!(cursor.read_array::<u16>(1).is_err());
        assert!(cursor.read_array::<u16>(usize::MAX).is_err());
        assert_eq!(cursor.read_bytes(1).unwrap(), &[9]);
        assert_eq!(cursor.finish(), 7);
    }

    #[test]
    fn take_up_to() {
        let mut data = FontData::new(&[1, 2, 3, 4]);
        let head = data.take_up_to(1).unwrap();
        assert_eq!(head.as_bytes(), &[1]);
        assert_eq!(data.position(), 1);
        assert!(data.take_up_to(4).is_none());
    }
}
