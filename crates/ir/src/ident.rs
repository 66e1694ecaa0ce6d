//! This module contains identifier interning.
//!
//! An [`Id`] is the FNV-1a hash of the identifier's full text, so identical
//! byte content always maps to the same `Id` in every compilation unit.
//! Qualified names (`module.sub.name`) additionally keep the byte offset and
//! hash of every dotted segment, so consumers can compare single components
//! without touching the text.
use std::fmt;

use rustc_hash::FxHashMap;
use tracing::{debug, warn};

use crate::{
    arena::{Arena, ArenaSlice},
    IrError, IrResult,
};

/// An interned identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Id(u32);

impl Id {
    pub const fn from_u32(raw: u32) -> Self {
        Self(raw)
    }

    pub const fn as_u32(self) -> u32 {
        self.0
    }
}

impl fmt::Display for Id {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "id{:08x}", self.0)
    }
}

/// 32-bit FNV-1a accumulator.
///
/// Persisted identifiers depend on this exact scheme.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Hasher(u32);

impl Hasher {
    pub const OFFSET_BASIS: u32 = 0x811c_9dc5;
    pub const PRIME: u32 = 0x0100_0193;

    pub const fn new() -> Self {
        Self(Self::OFFSET_BASIS)
    }

    pub fn add_byte(&mut self, byte: u8) {
        self.0 ^= byte as u32;
        self.0 = self.0.wrapping_mul(Self::PRIME);
    }

    pub fn add_bytes(&mut self, bytes: &[u8]) {
        for &byte in bytes {
            self.add_byte(byte);
        }
    }

    pub fn get(&self) -> u32 {
        self.0
    }

    /// Hashes `bytes` in one go.
    pub fn hash(bytes: &[u8]) -> u32 {
        let mut hasher = Self::new();
        hasher.add_bytes(bytes);
        hasher.get()
    }
}

impl Default for Hasher {
    fn default() -> Self {
        Self::new()
    }
}

/// Interned identifier data. The text and segment tables live in the
/// context's arena; use [`Name`] to read them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Identifier {
    text: ArenaSlice,
    segment_count: u32,
    /// Offsets followed by per-segment hashes. Empty for unqualified names.
    segments: ArenaSlice,
    /// Hash of the whole text for single-segment names, unused otherwise.
    segment_hash: u32,
}

impl Identifier {
    pub(crate) fn unqualified(text: ArenaSlice, hash: u32) -> Self {
        Self {
            text,
            segment_count: 1,
            segments: ArenaSlice::EMPTY,
            segment_hash: hash,
        }
    }

    pub(crate) fn qualified(text: ArenaSlice, segment_count: u32, segments: ArenaSlice) -> Self {
        Self {
            text,
            segment_count,
            segments,
            segment_hash: 0,
        }
    }

    pub fn text_len(&self) -> usize {
        self.text.len()
    }

    pub fn segment_count(&self) -> usize {
        self.segment_count as usize
    }

    pub fn is_qualified(&self) -> bool {
        self.segment_count > 1
    }

    /// Computes the interning key.
    ///
    /// Single-segment names reuse their segment hash; qualified names are keyed
    /// by a fresh hash over the entire text, never by a combination of their
    /// segment hashes.
    pub fn key(&self, arena: &Arena) -> Id {
        if self.is_qualified() {
            Id(Hasher::hash(arena.bytes(self.text)))
        } else {
            Id(self.segment_hash)
        }
    }
}

/// A borrowed view of an interned identifier.
#[derive(Clone, Copy)]
pub struct Name<'a> {
    id: Id,
    ident: &'a Identifier,
    arena: &'a Arena,
}

impl<'a> Name<'a> {
    pub fn id(&self) -> Id {
        self.id
    }

    pub fn identifier(&self) -> &'a Identifier {
        self.ident
    }

    pub fn text(&self) -> &'a str {
        self.arena.str(self.ident.text)
    }

    pub fn as_bytes(&self) -> &'a [u8] {
        self.arena.bytes(self.ident.text)
    }

    pub fn len(&self) -> usize {
        self.ident.text_len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn segment_count(&self) -> usize {
        self.ident.segment_count()
    }

    pub fn is_qualified(&self) -> bool {
        self.ident.is_qualified()
    }

    /// Returns the byte offset of segment `idx` within the text.
    ///
    /// # Panics
    /// Panics if `idx` is not below [`Self::segment_count`].
    pub fn segment_offset(&self, idx: usize) -> usize {
        assert!(idx < self.segment_count(), "segment index out of range");
        if self.is_qualified() {
            self.arena.read_u32(self.ident.segments, idx) as usize
        } else {
            0
        }
    }

    /// Returns the hash of segment `idx`, computed over that segment's bytes
    /// alone.
    ///
    /// # Panics
    /// Panics if `idx` is not below [`Self::segment_count`].
    pub fn segment_hash(&self, idx: usize) -> u32 {
        assert!(idx < self.segment_count(), "segment index out of range");
        if self.is_qualified() {
            self.arena
                .read_u32(self.ident.segments, self.segment_count() + idx)
        } else {
            self.ident.segment_hash
        }
    }

    pub fn segment(&self, idx: usize) -> &'a str {
        let start = self.segment_offset(idx);
        let end = if idx + 1 < self.segment_count() {
            // Exclude the separating dot.
            self.segment_offset(idx + 1) - 1
        } else {
            self.len()
        };
        &self.text()[start..end]
    }

    pub fn segments(&self) -> impl Iterator<Item = &'a str> + 'a {
        let name = *self;
        (0..name.segment_count()).map(move |idx| name.segment(idx))
    }
}

impl fmt::Debug for Name<'_> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("Name")
            .field("id", &self.id)
            .field("text", &self.text())
            .field("segment_count", &self.segment_count())
            .finish()
    }
}

impl fmt::Display for Name<'_> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.text())
    }
}

/// Maps [`Id`]s to their identifiers.
#[derive(Debug, Default)]
pub struct IdentTable {
    idents: FxHashMap<Id, Identifier>,
}

impl IdentTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.idents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.idents.is_empty()
    }

    pub fn contains(&self, id: Id) -> bool {
        self.idents.contains_key(&id)
    }

    pub fn get<'a>(&'a self, arena: &'a Arena, id: Id) -> Option<Name<'a>> {
        let ident = self.idents.get(&id)?;
        Some(Name { id, ident, arena })
    }

    pub fn iter<'a>(&'a self, arena: &'a Arena) -> impl Iterator<Item = Name<'a>> + 'a {
        self.idents
            .iter()
            .map(move |(&id, ident)| Name { id, ident, arena })
    }

    /// Returns the `Id` already interned for `text` under `key`, if any.
    ///
    /// Fails if `key` is taken by a different text.
    pub(crate) fn lookup(&self, arena: &Arena, key: Id, text: &[u8]) -> IrResult<Option<Id>> {
        let Some(existing) = self.idents.get(&key) else {
            return Ok(None);
        };

        let existing = arena.bytes(existing.text);
        if existing == text {
            debug!(%key, "ident: reusing interned identifier");
            Ok(Some(key))
        } else {
            warn!(%key, "ident: hash collision");
            Err(IrError::IdentCollision {
                id: key,
                existing: String::from_utf8_lossy(existing).into_owned(),
                incoming: String::from_utf8_lossy(text).into_owned(),
            })
        }
    }

    /// Interns `ident`. Re-interning identical text returns the existing `Id`.
    /// The table is left untouched unless `ident` carries segments the stored
    /// identifier lacks, in which case it replaces the stored one under the
    /// same `Id`.
    pub fn insert(&mut self, arena: &Arena, ident: Identifier) -> IrResult<Id> {
        let key = ident.key(arena);
        if let Some(id) = self.lookup(arena, key, arena.bytes(ident.text))? {
            let upgrade = ident.is_qualified()
                && self
                    .idents
                    .get(&id)
                    .is_some_and(|existing| !existing.is_qualified());
            if upgrade {
                debug!(%id, segments = ident.segment_count, "ident: added segments");
                self.idents.insert(id, ident);
            }
            return Ok(id);
        }

        debug!(
            %key,
            segments = ident.segment_count,
            text = arena.str(ident.text),
            "ident: interned"
        );
        self.idents.insert(key, ident);
        Ok(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fnv1a_reference_values() {
        assert_eq!(Hasher::hash(b""), 0x811c_9dc5);
        assert_eq!(Hasher::hash(b"a"), 0xe40c_292c);
        assert_eq!(Hasher::hash(b"foobar"), 0xbf9c_f968);
    }

    #[test]
    fn incremental_hash_matches_one_shot() {
        let mut hasher = Hasher::new();
        hasher.add_bytes(b"foo");
        hasher.add_byte(b'b');
        hasher.add_bytes(b"ar");
        assert_eq!(hasher.get(), Hasher::hash(b"foobar"));
    }

    #[test]
    fn insert_is_idempotent() {
        let mut arena = Arena::new();
        let mut table = IdentTable::new();

        let first = arena.alloc_str("main");
        let second = arena.alloc_str("main");
        let id0 = table
            .insert(&arena, Identifier::unqualified(first, Hasher::hash(b"main")))
            .unwrap();
        let id1 = table
            .insert(&arena, Identifier::unqualified(second, Hasher::hash(b"main")))
            .unwrap();

        assert_eq!(id0, id1);
        assert_eq!(table.len(), 1);
        assert_eq!(table.get(&arena, id0).unwrap().text(), "main");
    }

    #[test]
    fn qualified_insert_replaces_unqualified() {
        let mut arena = Arena::new();
        let mut table = IdentTable::new();

        let text = arena.alloc_str("m.f");
        let id = table
            .insert(&arena, Identifier::unqualified(text, Hasher::hash(b"m.f")))
            .unwrap();

        let segments = arena.alloc(16, 4);
        arena.write_u32(segments, 0, 0);
        arena.write_u32(segments, 1, 2);
        arena.write_u32(segments, 2, Hasher::hash(b"m"));
        arena.write_u32(segments, 3, Hasher::hash(b"f"));
        let qualified = Identifier::qualified(text, 2, segments);
        assert_eq!(table.insert(&arena, qualified).unwrap(), id);

        let unqualified = Identifier::unqualified(text, Hasher::hash(b"m.f"));
        assert_eq!(table.insert(&arena, unqualified).unwrap(), id);

        assert_eq!(table.len(), 1);
        let name = table.get(&arena, id).unwrap();
        assert!(name.is_qualified());
        assert_eq!(name.segments().collect::<Vec<_>>(), ["m", "f"]);
    }

    #[test]
    #[should_panic(expected = "segment index out of range")]
    fn segment_index_is_bounds_checked() {
        let mut arena = Arena::new();
        let mut table = IdentTable::new();

        let text = arena.alloc_str("x");
        let id = table
            .insert(&arena, Identifier::unqualified(text, Hasher::hash(b"x")))
            .unwrap();
        table.get(&arena, id).unwrap().segment_offset(1);
    }

    #[test]
    fn insert_detects_collision() {
        let mut arena = Arena::new();
        let mut table = IdentTable::new();

        let a = arena.alloc_str("a");
        let b = arena.alloc_str("b");
        let id = table.insert(&arena, Identifier::unqualified(a, 42)).unwrap();
        let err = table
            .insert(&arena, Identifier::unqualified(b, 42))
            .unwrap_err();

        assert_eq!(
            err,
            IrError::IdentCollision {
                id,
                existing: "a".to_string(),
                incoming: "b".to_string(),
            }
        );
        assert_eq!(table.get(&arena, id).unwrap().text(), "a");
    }
}
