//! Four-byte table and feature identifiers

use std::fmt::{Debug, Display, Formatter};

/// A four-byte identifier, as used for table, script, feature and axis names.
///
/// Tags are compared as raw bytes. No validation is performed when a tag is
/// read from a font, since malformed tags occur in the wild and still need to
/// be located; [`Tag::new_checked`] and [`Tag::is_valid`] are available when
/// the printable-ASCII rule matters.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(transparent)]
pub struct Tag([u8; 4]);

impl Tag {
    /// Construct a `Tag` from raw bytes, without validation.
    pub const fn new(src: &[u8; 4]) -> Tag {
        Tag(*src)
    }

    /// Attempt to create a `Tag` from up to four printable ASCII bytes.
    ///
    /// Shorter input is padded with spaces.
    pub fn new_checked(src: &[u8]) -> Result<Self, InvalidTag> {
        if src.is_empty() || src.len() > 4 {
            return Err(InvalidTag::InvalidLength(src.len()));
        }
        let mut raw = [b' '; 4];
        raw[..src.len()].copy_from_slice(src);
        let tag = Tag(raw);
        tag.check()?;
        Ok(tag)
    }

    /// Create a tag from raw big-endian bytes.
    pub const fn from_be_bytes(bytes: [u8; 4]) -> Self {
        Self(bytes)
    }

    /// Construct a tag from a big-endian `u32`.
    pub const fn from_u32(src: u32) -> Self {
        Self::from_be_bytes(src.to_be_bytes())
    }

    /// Return the memory representation of this tag.
    pub const fn to_be_bytes(self) -> [u8; 4] {
        self.0
    }

    /// `true` if every byte is printable ASCII and no non-space byte follows a space.
    pub fn is_valid(self) -> bool {
        self.check().is_ok()
    }

    fn check(self) -> Result<(), InvalidTag> {
        let mut seen_space = false;
        for (pos, byte) in self.0.into_iter().enumerate() {
            match byte {
                b' ' if pos == 0 => return Err(InvalidTag::InvalidByte { pos, byte }),
                b' ' => seen_space = true,
                0x21..=0x7e if seen_space => return Err(InvalidTag::ByteAfterSpace { pos }),
                0x21..=0x7e => (),
                _ => return Err(InvalidTag::InvalidByte { pos, byte }),
            }
        }
        Ok(())
    }
}

/// An error representing an invalid tag.
#[derive(Clone, Debug, PartialEq, Eq)]
#[non_exhaustive]
pub enum InvalidTag {
    /// The tag was not between 1 and 4 bytes in length.
    InvalidLength(usize),
    /// The tag contained a byte outside the printable ASCII range.
    InvalidByte { pos: usize, byte: u8 },
    /// The tag contained a non-space character after a space.
    ByteAfterSpace { pos: usize },
}

#[cfg(feature = "std")]
impl std::error::Error for InvalidTag {}

impl Display for InvalidTag {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            InvalidTag::InvalidLength(len) => write!(f, "invalid tag length ({len})"),
            InvalidTag::InvalidByte { pos, byte } => {
                write!(f, "invalid tag byte 0x{byte:02X} at index {pos}")
            }
            InvalidTag::ByteAfterSpace { pos } => {
                write!(f, "non-space tag byte after a space at index {pos}")
            }
        }
    }
}

impl std::str::FromStr for Tag {
    type Err = InvalidTag;

    fn from_str(src: &str) -> Result<Self, Self::Err> {
        Tag::new_checked(src.as_bytes())
    }
}

impl crate::raw::Scalar for Tag {
    type Raw = [u8; 4];

    fn to_raw(self) -> Self::Raw {
        self.0
    }

    fn from_raw(raw: Self::Raw) -> Self {
        Tag(raw)
    }
}

impl PartialEq<[u8; 4]> for Tag {
    fn eq(&self, other: &[u8; 4]) -> bool {
        &self.0 == other
    }
}

impl PartialEq<&[u8; 4]> for Tag {
    fn eq(&self, other: &&[u8; 4]) -> bool {
        &self.0 == *other
    }
}

impl PartialEq<str> for Tag {
    fn eq(&self, other: &str) -> bool {
        self.0 == other.as_bytes()
    }
}

impl PartialEq<&str> for Tag {
    fn eq(&self, other: &&str) -> bool {
        self == *other
    }
}

impl AsRef<[u8]> for Tag {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl Display for Tag {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        for byte in self.0 {
            if (0x20..=0x7E).contains(&byte) {
                write!(f, "{}", byte as char)?;
            } else {
                write!(f, "{{0x{byte:02X}}}")?;
            }
        }
        Ok(())
    }
}

impl Debug for Tag {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "Tag({self})")
    }
}

impl Default for Tag {
    fn default() -> Self {
        Tag([b' '; 4])
    }
}

// human-readable formats get a string, binary formats the raw bytes
#[cfg(feature = "serde")]
impl serde::Serialize for Tag {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        if serializer.is_human_readable() {
            serializer.collect_str(self)
        } else {
            self.0.serialize(serializer)
        }
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for Tag {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        if deserializer.is_human_readable() {
            let raw = <std::borrow::Cow<'de, str>>::deserialize(deserializer)?;
            raw.parse().map_err(serde::de::Error::custom)
        } else {
            <[u8; 4]>::deserialize(deserializer).map(Tag)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn checked_construction() {
        assert_eq!(Tag::new_checked(b"cmap"), Ok(Tag::new(b"cmap")));
        assert_eq!(Tag::new_checked(b"cv"), Ok(Tag::new(b"cv  ")));
        assert_eq!(Tag::new_checked(b""), Err(InvalidTag::InvalidLength(0)));
        assert_eq!(
            Tag::new_checked(b" abc"),
            Err(InvalidTag::InvalidByte { pos: 0, byte: b' ' })
        );
        assert_eq!(
            Tag::new_checked(b"a bc"),
            Err(InvalidTag::ByteAfterSpace { pos: 2 })
        );
    }

    #[test]
    fn raw_bytes_are_not_validated() {
        let tag = Tag::from_be_bytes([0, b'a', 0xff, b'z']);
        assert!(!tag.is_valid());
        assert_eq!(tag.to_string(), "{0x00}a{0xFF}z");
        assert_eq!(format!("{tag:?}"), "Tag({0x00}a{0xFF}z)");
    }

    #[test]
    fn compare_with_bytes_and_str() {
        let tag = Tag::from_u32(0x4F532F32);
        assert_eq!(tag, *b"OS/2");
        assert_eq!(tag, "OS/2");
        assert!(Tag::new(b"GPOS") < Tag::new(b"OS/2"));
    }
}
