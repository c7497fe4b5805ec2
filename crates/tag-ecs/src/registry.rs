//! Archetype registry - identifier to bit assignment.
//!
//! Every distinct component or tag identifier gets exactly one bit, the first
//! time it is seen. Bits are handed out from a monotonically growing counter
//! and are never reused, so two entities carrying the same identifier set
//! always end up with bit-for-bit identical signatures.
//!
//! A [`Registry`] is a cheap handle around shared state. Worlds built from
//! clones of the same handle share bit assignments, which keeps their
//! signatures comparable.

use std::{fmt, sync::Arc};

use parking_lot::RwLock;
use rustc_hash::FxHashMap;
use smallvec::SmallVec;

use crate::{
    config::RegistryConfig,
    error::{EcsError, Result},
};

const WORD_BITS: usize = u64::BITS as usize;

/// Archetype signature: a bit-set over registered identifiers.
///
/// The first 128 identifiers are stored inline; beyond that the set grows
/// on the heap. Trailing zero words are never stored, so equal sets always
/// compare and hash equal.
#[derive(Clone, Default, PartialEq, Eq, Hash)]
pub struct Archetype {
    words: SmallVec<[u64; 2]>,
}

impl Archetype {
    /// The empty signature.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// A signature with a single bit set.
    #[must_use]
    pub fn bit(index: usize) -> Self {
        let mut archetype = Self::empty();
        archetype.insert(index);
        archetype
    }

    /// Set the bit at `index`.
    pub fn insert(&mut self, index: usize) {
        let word = index / WORD_BITS;
        if word >= self.words.len() {
            self.words.resize(word + 1, 0);
        }
        self.words[word] |= 1u64 << (index % WORD_BITS);
    }

    /// Check whether the bit at `index` is set.
    #[must_use]
    pub fn contains(&self, index: usize) -> bool {
        self.words
            .get(index / WORD_BITS)
            .is_some_and(|w| w & (1u64 << (index % WORD_BITS)) != 0)
    }

    /// Bitwise union in place.
    pub fn union_with(&mut self, other: &Self) {
        if other.words.len() > self.words.len() {
            self.words.resize(other.words.len(), 0);
        }
        for (dst, src) in self.words.iter_mut().zip(&other.words) {
            *dst |= src;
        }
    }

    /// Bitwise union.
    #[must_use]
    pub fn union(&self, other: &Self) -> Self {
        let mut out = self.clone();
        out.union_with(other);
        out
    }

    /// Superset test: `self & required == required`.
    #[must_use]
    pub fn contains_all(&self, required: &Self) -> bool {
        required.words.iter().enumerate().all(|(i, &need)| {
            let have = self.words.get(i).copied().unwrap_or(0);
            have & need == need
        })
    }

    /// Check if no bit is set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// Number of bits set.
    #[must_use]
    pub fn count(&self) -> usize {
        self.words.iter().map(|w| w.count_ones() as usize).sum()
    }

    /// Iterate over the indices of set bits, ascending.
    pub fn iter(&self) -> impl Iterator<Item = usize> + '_ {
        self.words.iter().enumerate().flat_map(|(i, &word)| {
            (0..WORD_BITS)
                .filter(move |bit| word & (1u64 << bit) != 0)
                .map(move |bit| i * WORD_BITS + bit)
        })
    }
}

impl fmt::Debug for Archetype {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Archetype({self})")
    }
}

/// Hex rendering, most significant word first.
impl fmt::Display for Archetype {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut words = self.words.iter().rev();
        match words.next() {
            None => f.write_str("0x0"),
            Some(top) => {
                write!(f, "{top:#x}")?;
                for word in words {
                    write!(f, "{word:016x}")?;
                }
                Ok(())
            }
        }
    }
}

#[derive(Default)]
struct RegistryInner {
    /// Identifier to bit index.
    bits: FxHashMap<Box<str>, usize>,
    /// Bit index to identifier, append-only.
    names: Vec<Box<str>>,
    config: RegistryConfig,
}

impl RegistryInner {
    fn allocate(&mut self, id: &str) -> Result<usize> {
        if let Some(&bit) = self.bits.get(id) {
            return Ok(bit);
        }

        let bit = self.names.len();
        if let Some(capacity) = self.config.max_identifiers {
            if bit >= capacity {
                return Err(EcsError::RegistryExhausted { capacity });
            }
        }

        let name: Box<str> = id.into();
        self.names.push(name.clone());
        self.bits.insert(name, bit);
        tracing::trace!(id, bit, "assigned archetype bit");

        Ok(bit)
    }
}

/// Shared identifier to bit table.
///
/// Cloning the handle shares the table. Allocation takes a write lock, so
/// the registry can be shared between worlds living on different threads.
#[derive(Clone, Default)]
pub struct Registry {
    inner: Arc<RwLock<RegistryInner>>,
}

impl Registry {
    /// Create a new, unbounded registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry with the given configuration.
    #[must_use]
    pub fn with_config(config: RegistryConfig) -> Self {
        Self {
            inner: Arc::new(RwLock::new(RegistryInner {
                config,
                ..RegistryInner::default()
            })),
        }
    }

    /// Get the bit index for an identifier, assigning the next one if new.
    pub fn bit_index(&self, id: &str) -> Result<usize> {
        if let Some(&bit) = self.inner.read().bits.get(id) {
            return Ok(bit);
        }
        self.inner.write().allocate(id)
    }

    /// Get the single-bit signature for an identifier, assigning it if new.
    pub fn bit_for(&self, id: &str) -> Result<Archetype> {
        self.bit_index(id).map(Archetype::bit)
    }

    /// Union of the bits of every identifier, assigning new ones as needed.
    ///
    /// Duplicates are idempotent.
    pub fn mask_for<S: AsRef<str>>(&self, ids: &[S]) -> Result<Archetype> {
        let mut inner = self.inner.write();
        let mut mask = Archetype::empty();
        for id in ids {
            mask.insert(inner.allocate(id.as_ref())?);
        }
        Ok(mask)
    }

    /// Union of the bits of every identifier, without assigning.
    ///
    /// Returns `None` if any identifier has never been seen.
    #[must_use]
    pub fn lookup_mask<S: AsRef<str>>(&self, ids: &[S]) -> Option<Archetype> {
        let inner = self.inner.read();
        let mut mask = Archetype::empty();
        for id in ids {
            mask.insert(*inner.bits.get(id.as_ref())?);
        }
        Some(mask)
    }

    /// Identifier assigned to a bit index.
    #[must_use]
    pub fn name_of(&self, bit: usize) -> Option<String> {
        self.inner.read().names.get(bit).map(|n| n.to_string())
    }

    /// Identifiers whose bits are set in `archetype`, in bit order.
    #[must_use]
    pub fn names_in(&self, archetype: &Archetype) -> Vec<String> {
        let inner = self.inner.read();
        archetype
            .iter()
            .filter_map(|bit| inner.names.get(bit).map(|n| n.to_string()))
            .collect()
    }

    /// Number of identifiers assigned so far.
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.read().names.len()
    }

    /// Check if no identifier has been assigned.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.read().names.is_empty()
    }

    /// Check whether two handles share the same table.
    #[must_use]
    pub fn same_as(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner = self.inner.read();
        f.debug_struct("Registry")
            .field("count", &inner.names.len())
            .field("max_identifiers", &inner.config.max_identifiers)
            .finish()
    }
}
