//! This module contains the bump arena backing identifier text and string
//! constants.
//!
//! The arena hands out [`ArenaSlice`] handles instead of references, so the
//! storage can be resolved from anywhere that can see the owning [`Arena`]
//! without tying borrows to the arena's lifetime. Individual allocations are
//! never freed; every chunk is released when the arena is dropped.

use tracing::debug;

/// Default chunk size in bytes.
pub const CHUNK_SIZE: usize = 64 * 1024;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArenaConfig {
    /// Capacity of every regular chunk. Requests larger than this get a chunk
    /// of their own.
    pub chunk_size: usize,
}

impl Default for ArenaConfig {
    fn default() -> Self {
        Self {
            chunk_size: CHUNK_SIZE,
        }
    }
}

/// An opaque reference to a byte range allocated from an [`Arena`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ArenaSlice {
    chunk: usize,
    offset: usize,
    len: usize,
}

impl ArenaSlice {
    /// The zero-length slice. Resolves to `&[]` in any arena.
    pub const EMPTY: Self = Self {
        chunk: 0,
        offset: 0,
        len: 0,
    };

    pub fn chunk(self) -> usize {
        self.chunk
    }

    pub fn offset(self) -> usize {
        self.offset
    }

    pub fn len(self) -> usize {
        self.len
    }

    pub fn is_empty(self) -> bool {
        self.len == 0
    }

    /// Returns the byte offset one past the end of the slice within its chunk.
    pub fn end(self) -> usize {
        self.offset + self.len
    }

    /// Returns the sub-range `start..start + len` of this slice.
    pub fn subslice(self, start: usize, len: usize) -> Self {
        debug_assert!(start + len <= self.len);
        if len == 0 {
            return Self::EMPTY;
        }

        Self {
            chunk: self.chunk,
            offset: self.offset + start,
            len,
        }
    }

    /// Returns `true` if both slices live in the same chunk and share at least
    /// one byte.
    pub fn overlaps(self, other: Self) -> bool {
        !self.is_empty()
            && !other.is_empty()
            && self.chunk == other.chunk
            && self.offset < other.end()
            && other.offset < self.end()
    }
}

struct Chunk {
    data: Box<[u8]>,
    used: usize,
}

impl Chunk {
    fn new(capacity: usize) -> Self {
        Self {
            data: vec![0; capacity].into_boxed_slice(),
            used: 0,
        }
    }

    fn capacity(&self) -> usize {
        self.data.len()
    }

    /// Bumps `size` bytes aligned to `align` relative to the chunk start.
    fn try_bump(&mut self, size: usize, align: usize) -> Option<usize> {
        let aligned = (self.used + align - 1) & !(align - 1);
        let end = aligned.checked_add(size)?;
        if end > self.capacity() {
            return None;
        }

        self.used = end;
        Some(aligned)
    }
}

/// A bump-pointer byte arena.
pub struct Arena {
    chunks: Vec<Chunk>,
    /// The chunk regular allocations are bumped from.
    current: Option<usize>,
    chunk_size: usize,
}

impl Arena {
    pub fn new() -> Self {
        Self::with_config(ArenaConfig::default())
    }

    pub fn with_config(config: ArenaConfig) -> Self {
        debug_assert!(config.chunk_size > 0);
        Self {
            chunks: Vec::new(),
            current: None,
            chunk_size: config.chunk_size.max(1),
        }
    }

    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    /// Allocates `size` zeroed bytes whose offset is a multiple of `align`.
    ///
    /// `align` must be a power of two. A request larger than the chunk size is
    /// served from a dedicated chunk sized to fit it exactly, and the current
    /// bump chunk stays in use for later requests.
    pub fn alloc(&mut self, size: usize, align: usize) -> ArenaSlice {
        debug_assert!(align.is_power_of_two());
        if size == 0 {
            return ArenaSlice::EMPTY;
        }

        if size > self.chunk_size {
            let chunk = self.push_chunk(size);
            self.chunks[chunk].used = size;
            return ArenaSlice {
                chunk,
                offset: 0,
                len: size,
            };
        }

        if let Some(current) = self.current {
            if let Some(offset) = self.chunks[current].try_bump(size, align) {
                return ArenaSlice {
                    chunk: current,
                    offset,
                    len: size,
                };
            }
        }

        let chunk = self.push_chunk(self.chunk_size);
        self.current = Some(chunk);
        self.chunks[chunk].used = size;
        ArenaSlice {
            chunk,
            offset: 0,
            len: size,
        }
    }

    /// Copies `bytes` into the arena.
    pub fn alloc_bytes(&mut self, bytes: &[u8]) -> ArenaSlice {
        let slice = self.alloc(bytes.len(), 1);
        self.bytes_mut(slice).copy_from_slice(bytes);
        slice
    }

    /// Copies `text` into the arena.
    pub fn alloc_str(&mut self, text: &str) -> ArenaSlice {
        self.alloc_bytes(text.as_bytes())
    }

    pub fn bytes(&self, slice: ArenaSlice) -> &[u8] {
        if slice.is_empty() {
            return &[];
        }
        &self.chunks[slice.chunk].data[slice.offset..slice.end()]
    }

    pub fn bytes_mut(&mut self, slice: ArenaSlice) -> &mut [u8] {
        if slice.is_empty() {
            return &mut [];
        }
        &mut self.chunks[slice.chunk].data[slice.offset..slice.end()]
    }

    /// Resolves a slice produced by [`Self::alloc_str`].
    pub fn str(&self, slice: ArenaSlice) -> &str {
        std::str::from_utf8(self.bytes(slice)).unwrap_or_default()
    }

    /// Reads the `idx`-th native-endian `u32` of `slice`.
    pub fn read_u32(&self, slice: ArenaSlice, idx: usize) -> u32 {
        let start = idx * 4;
        let mut buf = [0; 4];
        buf.copy_from_slice(&self.bytes(slice)[start..start + 4]);
        u32::from_ne_bytes(buf)
    }

    /// Writes the `idx`-th native-endian `u32` of `slice`.
    pub fn write_u32(&mut self, slice: ArenaSlice, idx: usize, value: u32) {
        let start = idx * 4;
        self.bytes_mut(slice)[start..start + 4].copy_from_slice(&value.to_ne_bytes());
    }

    pub fn chunk_count(&self) -> usize {
        self.chunks.len()
    }

    pub fn chunk_capacity(&self, chunk: usize) -> usize {
        self.chunks[chunk].capacity()
    }

    /// Returns the number of bytes bumped from `chunk`, alignment padding
    /// included.
    pub fn chunk_used(&self, chunk: usize) -> usize {
        self.chunks[chunk].used
    }

    /// Returns the total capacity of every chunk the arena owns.
    pub fn allocated_bytes(&self) -> usize {
        self.chunks.iter().map(Chunk::capacity).sum()
    }

    /// Releases every chunk. Slices handed out before the reset must not be
    /// resolved afterwards.
    pub fn reset(&mut self) {
        self.chunks.clear();
        self.current = None;
    }

    fn push_chunk(&mut self, capacity: usize) -> usize {
        let idx = self.chunks.len();
        debug!(chunk = idx, capacity, "arena: allocating chunk");
        self.chunks.push(Chunk::new(capacity));
        idx
    }
}

impl Default for Arena {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    fn small_arena(chunk_size: usize) -> Arena {
        Arena::with_config(ArenaConfig { chunk_size })
    }

    #[test]
    fn bumps_within_one_chunk() {
        let mut arena = small_arena(64);
        let a = arena.alloc(10, 1);
        let b = arena.alloc(4, 4);
        let c = arena.alloc(3, 1);

        assert_eq!(arena.chunk_count(), 1);
        assert_eq!((a.offset(), a.len()), (0, 10));
        // Padded up to the next multiple of four.
        assert_eq!((b.offset(), b.len()), (12, 4));
        assert_eq!((c.offset(), c.len()), (16, 3));
        assert_eq!(arena.chunk_used(0), 19);
    }

    #[test]
    fn grabs_new_chunk_when_full() {
        let mut arena = small_arena(16);
        let a = arena.alloc(12, 1);
        let b = arena.alloc(8, 1);

        assert_eq!(arena.chunk_count(), 2);
        assert_eq!(a.chunk(), 0);
        assert_eq!((b.chunk(), b.offset()), (1, 0));
        assert!(!a.overlaps(b));
    }

    #[test]
    fn oversized_request_gets_dedicated_chunk() {
        let mut arena = small_arena(16);
        let small = arena.alloc(4, 1);
        let big = arena.alloc(100, 8);
        let after = arena.alloc(4, 1);

        assert_eq!(arena.chunk_count(), 2);
        assert_eq!(arena.chunk_capacity(big.chunk()), 100);
        assert_eq!(arena.chunk_used(big.chunk()), 100);
        // The regular chunk keeps serving small requests.
        assert_eq!(after.chunk(), small.chunk());
        assert_eq!(after.offset(), 4);
    }

    #[test]
    fn copies_bytes_and_u32s() {
        let mut arena = small_arena(32);
        let text = arena.alloc_str("a.bc");
        let words = arena.alloc(8, 4);
        arena.write_u32(words, 0, 7);
        arena.write_u32(words, 1, u32::MAX);

        assert_eq!(arena.str(text), "a.bc");
        assert_eq!(arena.read_u32(words, 0), 7);
        assert_eq!(arena.read_u32(words, 1), u32::MAX);
    }

    #[test]
    fn empty_requests_do_not_allocate() {
        let mut arena = Arena::new();
        let empty = arena.alloc_bytes(&[]);

        assert!(empty.is_empty());
        assert_eq!(arena.chunk_count(), 0);
        assert_eq!(arena.bytes(empty), &[] as &[u8]);
    }

    #[test]
    fn reset_releases_chunks() {
        let mut arena = small_arena(8);
        arena.alloc(6, 1);
        arena.alloc(6, 1);
        assert_eq!(arena.allocated_bytes(), 16);

        arena.reset();
        assert_eq!(arena.chunk_count(), 0);
        assert_eq!(arena.allocated_bytes(), 0);
    }

    proptest! {
        #[test]
        fn allocations_never_overlap(
            requests in prop::collection::vec((1usize..96, 0u32..4), 1..64)
        ) {
            let mut arena = small_arena(64);
            let slices: Vec<_> = requests
                .iter()
                .map(|&(size, align_log)| arena.alloc(size, 1 << align_log))
                .collect();

            for (i, a) in slices.iter().enumerate() {
                prop_assert_eq!(a.offset() % (1 << requests[i].1), 0);
                for b in &slices[i + 1..] {
                    prop_assert!(!a.overlaps(*b));
                }
            }

            for chunk in 0..arena.chunk_count() {
                let used = arena.chunk_used(chunk);
                let capacity = arena.chunk_capacity(chunk);
                prop_assert!(used <= capacity);
                // Only a dedicated chunk for a single oversized request may exceed
                // the configured size.
                prop_assert!(capacity <= 64 || used == capacity);
            }
        }
    }
}
