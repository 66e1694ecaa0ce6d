//! This module contains [`Context`], the per-compilation-unit owner of the
//! arena, the identifier table and the operator table.
use crate::{
    arena::{Arena, ArenaConfig, ArenaSlice},
    ident::{Hasher, IdentTable, Identifier, Name},
    ops::{Assoc, OpProperties, OpTable},
    Id, IrError, IrResult,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ContextConfig {
    pub arena: ArenaConfig,
    /// Returned by [`Context::find_op`] for unregistered operators.
    pub default_op: OpProperties,
}

/// State threaded through IR construction of one compilation unit.
///
/// A context is not meant to be shared: independent units each get their
/// own, which is what makes compiling them in parallel safe.
pub struct Context {
    arena: Arena,
    idents: IdentTable,
    ops: OpTable,
}

impl Context {
    pub fn new() -> Self {
        Self::with_config(ContextConfig::default())
    }

    pub fn with_config(config: ContextConfig) -> Self {
        Self {
            arena: Arena::with_config(config.arena),
            idents: IdentTable::new(),
            ops: OpTable::with_fallback(config.default_op),
        }
    }

    pub fn arena(&self) -> &Arena {
        &self.arena
    }

    pub fn arena_mut(&mut self) -> &mut Arena {
        &mut self.arena
    }

    pub fn idents(&self) -> &IdentTable {
        &self.idents
    }

    pub fn ident_count(&self) -> usize {
        self.idents.len()
    }

    pub fn iter_idents(&self) -> impl Iterator<Item = Name<'_>> {
        self.idents.iter(&self.arena)
    }

    /// Copies `text` into the arena.
    pub fn alloc_str(&mut self, text: &str) -> ArenaSlice {
        self.arena.alloc_str(text)
    }

    pub fn str(&self, slice: ArenaSlice) -> &str {
        self.arena.str(slice)
    }

    /// Interns a name without segment information.
    pub fn add_unqualified_name(&mut self, text: &str) -> IrResult<Id> {
        let hash = Hasher::hash(text.as_bytes());
        if let Some(id) = self
            .idents
            .lookup(&self.arena, Id::from_u32(hash), text.as_bytes())?
        {
            return Ok(id);
        }

        let slice = self.arena.alloc_str(text);
        self.add_identifier(Identifier::unqualified(slice, hash))
    }

    /// Interns a dotted name, counting its segments from the `.` separators.
    pub fn add_qualified_name(&mut self, text: &str) -> IrResult<Id> {
        let segment_count = text.bytes().filter(|&b| b == b'.').count() + 1;
        self.add_qualified_name_with_count(text, segment_count)
    }

    /// Interns a dotted name whose segment count the caller already knows.
    ///
    /// Fails with [`IrError::InvalidSegmentCount`] if the count does not match
    /// the text.
    pub fn add_qualified_name_with_count(
        &mut self,
        text: &str,
        segment_count: usize,
    ) -> IrResult<Id> {
        let found = text.bytes().filter(|&b| b == b'.').count() + 1;
        if segment_count != found {
            return Err(IrError::InvalidSegmentCount {
                text: text.to_string(),
                expected: segment_count,
                found,
            });
        }

        if segment_count == 1 {
            return self.add_unqualified_name(text);
        }

        // A name first interned unqualified still gets its segment tables.
        let key = Id::from_u32(Hasher::hash(text.as_bytes()));
        if let Some(id) = self.idents.lookup(&self.arena, key, text.as_bytes())? {
            if self.find(id).is_some_and(|name| name.is_qualified()) {
                return Ok(id);
            }
        }

        // Offsets, then hashes, then the text: the index arrays come first so
        // they sit on a 4-byte boundary.
        let tables_len = 2 * segment_count * 4;
        let block = self.arena.alloc(tables_len + text.len(), 4);
        let segments = block.subslice(0, tables_len);
        let text_slice = block.subslice(tables_len, text.len());
        self.arena.bytes_mut(text_slice).copy_from_slice(text.as_bytes());

        let mut offset = 0;
        for (idx, segment) in text.split('.').enumerate() {
            self.arena.write_u32(segments, idx, offset as u32);
            self.arena.write_u32(
                segments,
                segment_count + idx,
                Hasher::hash(segment.as_bytes()),
            );
            offset += segment.len() + 1;
        }

        self.add_identifier(Identifier::qualified(
            text_slice,
            segment_count as u32,
            segments,
        ))
    }

    /// Interns a prebuilt identifier whose storage lives in this context's
    /// arena.
    pub fn add_identifier(&mut self, ident: Identifier) -> IrResult<Id> {
        self.idents.insert(&self.arena, ident)
    }

    pub fn find(&self, id: Id) -> Option<Name<'_>> {
        self.idents.get(&self.arena, id)
    }

    /// Like [`Self::find`], but reports a never-interned `id` as an error.
    pub fn resolve(&self, id: Id) -> IrResult<Name<'_>> {
        self.find(id).ok_or(IrError::UnknownIdent(id))
    }

    pub fn add_op(&mut self, op: Id, precedence: u16, assoc: Assoc) {
        self.ops.insert(op, OpProperties::new(precedence, assoc));
    }

    pub fn find_op(&self, op: Id) -> OpProperties {
        self.ops.get(op)
    }
}

impl Default for Context {
    fn default() -> Self {
        Self::new()
    }
}
