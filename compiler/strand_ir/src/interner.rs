//! Sharded string interner shared by every component of an analysis.
//!
//! Interning is append-only: a `Name` handed out once stays valid for the
//! life of the interner, which lets finalized IR be read from many threads
//! while front-ends keep interning new identifiers.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::ops::Deref;
use std::sync::Arc;

use parking_lot::RwLock;
use rustc_hash::{FxHashMap, FxHasher};

use super::Name;

/// Selectors the IR core itself relies on.
const VOCABULARY: &[&str] = &["do"];

/// Error when interning a string fails.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InternError {
    #[error("interner shard {shard} is full ({count} strings, max {max})", max = Name::MAX_LOCAL)]
    ShardOverflow { shard: usize, count: usize },
}

#[derive(Default)]
struct Shard {
    index: FxHashMap<&'static str, u32>,
    strings: Vec<&'static str>,
}

impl Shard {
    fn insert(&mut self, s: &str, shard: usize) -> Result<u32, InternError> {
        let count = self.strings.len();
        let local = u32::try_from(count)
            .ok()
            .filter(|&local| local <= Name::MAX_LOCAL)
            .ok_or(InternError::ShardOverflow { shard, count })?;
        // Leaked strings live as long as the process; names never dangle.
        let text: &'static str = Box::leak(s.to_owned().into_boxed_str());
        self.strings.push(text);
        self.index.insert(text, local);
        Ok(local)
    }
}

/// Sharded string interner.
///
/// Each shard sits behind its own `RwLock`, so lookups of already-interned
/// strings only ever take read locks. Share it through [`SharedInterner`].
pub struct StringInterner {
    shards: [RwLock<Shard>; Name::NUM_SHARDS],
}

impl StringInterner {
    /// Create an interner holding the empty string and the core selectors.
    pub fn new() -> Self {
        let interner = StringInterner {
            shards: std::array::from_fn(|_| RwLock::new(Shard::default())),
        };
        // The empty string must land at raw 0, whatever it hashes to.
        interner.shards[0].write().insert("", 0).ok();
        for word in VOCABULARY {
            interner.intern(word);
        }
        interner
    }

    #[inline]
    fn shard_for(s: &str) -> usize {
        if s.is_empty() {
            return 0;
        }
        let mut hasher = FxHasher::default();
        s.hash(&mut hasher);
        #[expect(
            clippy::cast_possible_truncation,
            reason = "reduced modulo NUM_SHARDS before use"
        )]
        let hash = hasher.finish() as usize;
        hash % Name::NUM_SHARDS
    }

    #[inline]
    fn name_in(shard: usize, local: u32) -> Name {
        #[expect(
            clippy::cast_possible_truncation,
            reason = "shard index is below NUM_SHARDS"
        )]
        let shard = shard as u32;
        Name::new(shard, local)
    }

    /// Intern `s`, or report that its shard is full.
    pub fn try_intern(&self, s: &str) -> Result<Name, InternError> {
        let shard = Self::shard_for(s);
        if let Some(&local) = self.shards[shard].read().index.get(s) {
            return Ok(Self::name_in(shard, local));
        }

        let mut guard = self.shards[shard].write();
        let local = match guard.index.get(s) {
            Some(&local) => local,
            None => guard.insert(s, shard)?,
        };
        Ok(Self::name_in(shard, local))
    }

    /// Intern `s`.
    ///
    /// # Panics
    /// Panics if the string's shard is full. Use [`Self::try_intern`] to
    /// handle that case.
    #[inline]
    pub fn intern(&self, s: &str) -> Name {
        self.try_intern(s).unwrap_or_else(|e| panic!("{e}"))
    }

    /// The name of `s` if it has been interned. Never grows the interner.
    pub fn get(&self, s: &str) -> Option<Name> {
        let shard = Self::shard_for(s);
        self.shards[shard]
            .read()
            .index
            .get(s)
            .map(|&local| Self::name_in(shard, local))
    }

    pub fn lookup(&self, name: Name) -> &'static str {
        self.shards[name.shard()].read().strings[name.local()]
    }

    /// Number of interned strings, the empty string included.
    pub fn len(&self) -> usize {
        self.shards
            .iter()
            .map(|shard| shard.read().strings.len())
            .sum()
    }

    /// `true` when nothing but the empty string is interned.
    pub fn is_empty(&self) -> bool {
        self.len() <= 1
    }
}

impl Default for StringInterner {
    fn default() -> Self {
        Self::new()
    }
}

/// Read access to interned text.
///
/// Display helpers take any `StringLookup` rather than the concrete
/// interner.
pub trait StringLookup {
    fn lookup(&self, name: Name) -> &str;
}

impl StringLookup for StringInterner {
    fn lookup(&self, name: Name) -> &str {
        StringInterner::lookup(self, name)
    }
}

impl StringLookup for SharedInterner {
    fn lookup(&self, name: Name) -> &str {
        self.0.lookup(name)
    }
}

/// Reference-counted interner handle.
///
/// A language catalog creates one and hands clones to every language,
/// registry and scope of the process, so all of them agree on `Name`s.
#[derive(Clone, Default)]
pub struct SharedInterner(Arc<StringInterner>);

impl SharedInterner {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Deref for SharedInterner {
    type Target = StringInterner;

    fn deref(&self) -> &StringInterner {
        &self.0
    }
}

impl fmt::Debug for SharedInterner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SharedInterner({} names)", self.0.len())
    }
}
