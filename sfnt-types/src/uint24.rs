/// A 24-bit unsigned integer, stored in three big-endian bytes.
///
/// cmap format 14 uses these for variation selectors and Unicode values.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(transparent)]
pub struct Uint24(u32);

impl Uint24 {
    const MASK: u32 = 0x00FF_FFFF;

    /// Create from a u32, keeping only the low 24 bits.
    pub const fn new(raw: u32) -> Uint24 {
        Uint24(raw & Self::MASK)
    }

    pub const fn to_u32(self) -> u32 {
        self.0
    }

    pub const fn to_be_bytes(self) -> [u8; 3] {
        let [_, hi, mid, lo] = self.0.to_be_bytes();
        [hi, mid, lo]
    }

    pub const fn from_be_bytes(bytes: [u8; 3]) -> Self {
        let [hi, mid, lo] = bytes;
        Uint24(u32::from_be_bytes([0, hi, mid, lo]))
    }
}

impl From<Uint24> for u32 {
    fn from(src: Uint24) -> u32 {
        src.0
    }
}

impl std::fmt::Display for Uint24 {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{:#06X}", self.0)
    }
}
