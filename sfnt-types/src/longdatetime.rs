//! a datetime type

/// A simple datetime type.
///
/// This represented as a number of seconds since 12:00 midnight, January 1, 1904, UTC.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LongDateTime(i64);

impl LongDateTime {
    /// Seconds between the 1904 epoch and the unix epoch.
    const UNIX_EPOCH_OFFSET: i64 = 2_082_844_800;

    /// Create with a number of seconds relative to 1904-01-01 00:00.
    pub const fn new(secs: i64) -> Self {
        Self(secs)
    }

    /// The number of seconds since 00:00 1904-01-01, UTC.
    ///
    /// This can be a negative number, which presumably represents a date prior
    /// to the reference date.
    pub const fn as_secs(&self) -> i64 {
        self.0
    }

    /// The number of seconds since the unix epoch, 1970-01-01 00:00 UTC.
    pub const fn as_unix_secs(&self) -> i64 {
        self.0.saturating_sub(Self::UNIX_EPOCH_OFFSET)
    }
}

newtype_scalar!(LongDateTime, [u8; 8]);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unix_offset() {
        assert_eq!(LongDateTime::new(2_082_844_800).as_unix_secs(), 0);
        assert_eq!(LongDateTime::new(0).as_secs(), 0);
    }
}
