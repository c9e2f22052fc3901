//! Interned identifiers.
//!
//! Loader names, qualified type names, field and selector names and
//! lexical variable names all become a `Name`, so every reference type in
//! the IR is `Copy` and compares by integer.

use std::fmt;

/// Handle to a string in a [`StringInterner`](crate::StringInterner).
///
/// The low [`Name::SHARD_BITS`] bits select the interner shard and the
/// remaining bits index into it. `Name::EMPTY` (raw `0`) is the empty
/// string in shard 0 and exists in every interner.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd, Default)]
#[repr(transparent)]
pub struct Name(u32);

impl Name {
    pub const EMPTY: Name = Name(0);

    pub const SHARD_BITS: u32 = 4;

    pub const NUM_SHARDS: usize = 1 << Self::SHARD_BITS;

    const SHARD_MASK: u32 = (1 << Self::SHARD_BITS) - 1;

    /// Largest per-shard index that still fits beside the shard bits.
    pub const MAX_LOCAL: u32 = u32::MAX >> Self::SHARD_BITS;

    #[inline]
    pub(crate) const fn new(shard: u32, local: u32) -> Self {
        debug_assert!(shard <= Self::SHARD_MASK);
        debug_assert!(local <= Self::MAX_LOCAL);
        Name((local << Self::SHARD_BITS) | shard)
    }

    #[inline]
    pub(crate) const fn shard(self) -> usize {
        (self.0 & Self::SHARD_MASK) as usize
    }

    #[inline]
    pub(crate) const fn local(self) -> usize {
        (self.0 >> Self::SHARD_BITS) as usize
    }

    #[inline]
    pub const fn raw(self) -> u32 {
        self.0
    }

    /// Rebuild a name from [`Name::raw`]. Only meaningful against the
    /// interner that produced it.
    #[inline]
    pub const fn from_raw(raw: u32) -> Self {
        Name(raw)
    }

    #[inline]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }
}

impl fmt::Debug for Name {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Name({}:{})", self.shard(), self.local())
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn shard_and_index_are_packed() {
        let name = Name::new(9, 1234);
        assert_eq!((name.shard(), name.local()), (9, 1234));
        assert_eq!(Name::from_raw(name.raw()), name);
        assert!(!name.is_empty());
    }

    #[test]
    fn largest_index_survives_packing() {
        let name = Name::new(15, Name::MAX_LOCAL);
        assert_eq!(name.shard(), 15);
        assert_eq!(name.local(), Name::MAX_LOCAL as usize);
    }

    #[test]
    fn empty_is_default() {
        assert!(Name::EMPTY.is_empty());
        assert_eq!(Name::default(), Name::EMPTY);
        assert_eq!(format!("{:?}", Name::EMPTY), "Name(0:0)");
    }
}
