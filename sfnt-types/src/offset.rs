//! Offsets to tables

/// A trait for the different offset representations.
pub trait Offset: Sized + Copy {
    /// Returns this offset as a `usize`, or `None` if it is `0`.
    fn non_null(self) -> Option<usize>;

    /// Returns this offset as a `usize`, including the null value.
    fn to_usize(self) -> usize {
        self.non_null().unwrap_or_default()
    }
}

macro_rules! impl_offset {
    ($name:ident, $bits:literal, $rawty:ty) => {
        #[doc = concat!("A ", stringify!($bits), "-bit offset to a table.")]
        ///
        /// Specific offset fields may or may not permit NULL values; however we
        /// assume that errors are possible, and expect the caller to handle
        /// the `None` case.
        #[derive(Copy, Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
        #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
        pub struct $name($rawty);

        impl $name {
            /// Create a new offset.
            pub const fn new(raw: $rawty) -> Self {
                Self(raw)
            }

            /// Return `true` if this offset is null.
            pub fn is_null(self) -> bool {
                self.0 == 0
            }

            /// The raw value of the offset.
            pub const fn to_raw_value(self) -> $rawty {
                self.0
            }
        }

        newtype_scalar!($name, [u8; $bits / 8]);

        impl Offset for $name {
            #[inline]
            fn non_null(self) -> Option<usize> {
                match self.0 {
                    0 => None,
                    other => Some(other as usize),
                }
            }
        }
    };
}

impl_offset!(Offset16, 16, u16);
impl_offset!(Offset32, 32, u32);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn null_offsets() {
        assert!(Offset16::new(0).non_null().is_none());
        assert_eq!(Offset16::new(0).to_usize(), 0);
        assert_eq!(Offset32::new(12).non_null(), Some(12));
        assert!(Offset32::default().is_null());
    }
}
