use std::{
  fmt,
  ops::Range,
  ptr::{self, NonNull},
  slice,
  sync::atomic::{AtomicU64, Ordering},
};

use log::{debug, warn};

use crate::{
  chunk::{self, Chunk, ChunkHeader, HEADER_SIZE},
  config::ArenaConfig,
  dump::Dump,
  error::ArenaError,
  list::ChunkList,
  scan,
};

/// An arena must be strictly larger than this to hold any chunk.
pub const MIN_ARENA_SIZE: usize = HEADER_SIZE;

static NEXT_ID: AtomicU64 = AtomicU64::new(1);

/// Identity of an arena, stamped into every chunk header it hands out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(transparent)]
pub struct ArenaId(u64);

impl ArenaId {
  fn next() -> Self {
    Self(NEXT_ID.fetch_add(1, Ordering::Relaxed))
  }

  #[cfg(test)]
  pub(crate) const fn from_raw(raw: u64) -> Self {
    Self(raw)
  }
}

impl fmt::Display for ArenaId {
  fn fmt(
    &self,
    f: &mut fmt::Formatter<'_>,
  ) -> fmt::Result {
    write!(f, "#{}", self.0)
  }
}

/// A fixed buffer carved into variable-sized chunks.
///
/// ```text
///   base        start                                              limit
///   ┌──────────┬────────┬─────────┬──────────┬────────┬─────────┬──────┐
///   │ reserved │ header │ payload │ $$$$$$$$ │ header │ payload │ $$$$ │
///   │  prefix  │        │         │   gap    │        │         │ gap  │
///   └──────────┴────────┴─────────┴──────────┴────────┴─────────┴──────┘
/// ```
///
/// The buffer comes from the system allocator once, in [`Arena::new`], and
/// goes back when the arena is dropped. Every byte between `start` and `limit`
/// that no live chunk covers holds the free sentinel.
pub struct Arena {
  base: NonNull<u8>,
  start: *mut u8,
  limit: *mut u8,
  chunks: ChunkList,
  id: ArenaId,
  config: ArenaConfig,
}

impl Arena {
  /// Reserves an arena with `size` usable bytes and the default configuration.
  ///
  /// # Panics
  ///
  /// If `size` is not larger than [`MIN_ARENA_SIZE`].
  pub fn new(size: usize) -> Result<Self, ArenaError> {
    Self::with_config(size, ArenaConfig::default())
  }

  pub fn with_config(
    size: usize,
    config: ArenaConfig,
  ) -> Result<Self, ArenaError> {
    assert!(
      size > MIN_ARENA_SIZE,
      "arena of {size} bytes cannot hold a {MIN_ARENA_SIZE} byte chunk header"
    );
    config.validate()?;

    let total = size
      .checked_add(config.reserved_prefix)
      .ok_or(ArenaError::SizeOverflow {
        size,
        prefix: config.reserved_prefix,
      })?;

    let raw = unsafe { libc::malloc(total) }.cast::<u8>();
    let base = NonNull::new(raw).ok_or(ArenaError::SystemAllocation { size: total })?;

    let (start, limit) = unsafe {
      let start = base.as_ptr().add(config.reserved_prefix);
      ptr::write_bytes(base.as_ptr(), 0, config.reserved_prefix);
      ptr::write_bytes(start, config.free_byte, size);
      (start, start.add(size))
    };

    let id = ArenaId::next();
    debug!("arena {id}: reserved {total} bytes, {size} usable");

    Ok(Self {
      base,
      start,
      limit,
      chunks: ChunkList::new(),
      id,
      config,
    })
  }

  pub fn id(&self) -> ArenaId {
    self.id
  }

  pub fn config(&self) -> &ArenaConfig {
    &self.config
  }

  /// Usable bytes, excluding the reserved prefix.
  pub fn capacity(&self) -> usize {
    self.limit as usize - self.start as usize
  }

  pub fn is_empty(&self) -> bool {
    self.chunks.is_empty()
  }

  /// Number of live chunks.
  pub fn len(&self) -> usize {
    self.chunks.iter().count()
  }

  /// Hands out `size` bytes, or `None` when no free run is large enough.
  pub fn allocate(
    &mut self,
    size: usize,
  ) -> Option<NonNull<u8>> {
    self.try_allocate(size).ok()
  }

  /// Like [`Arena::allocate`], but reports why the allocation failed.
  ///
  /// On failure the arena is left untouched.
  pub fn try_allocate(
    &mut self,
    size: usize,
  ) -> Result<NonNull<u8>, ArenaError> {
    let needed = HEADER_SIZE
      .checked_add(size)
      .and_then(|needed| needed.checked_add(self.config.margin.bytes()));

    let offset = needed.and_then(|needed| {
      scan::first_fit(
        self.region(),
        self.occupied(),
        needed,
        self.config.free_byte,
      )
    });

    let Some(offset) = offset else {
      let largest_run = self.largest_free_run();
      debug!(
        "arena {}: no room for {size} bytes (largest run {largest_run})",
        self.id
      );
      return Err(ArenaError::OutOfSpace {
        requested: size,
        largest_run,
      });
    };

    unsafe {
      let node = self.start.add(offset).cast::<ChunkHeader>();
      let payload = ChunkHeader::payload(node);
      debug_assert!(payload.wrapping_add(size) <= self.limit);

      chunk::store(node, ChunkHeader::new(size, self.id));
      self.chunks.insert(node);
      ptr::write_bytes(payload, self.config.init_byte, size);

      debug!("arena {}: allocated {size} bytes at offset {offset}", self.id);
      Ok(NonNull::new_unchecked(payload))
    }
  }

  /// Returns a chunk to the arena by stomping it back to free sentinels.
  ///
  /// # Safety
  ///
  /// `payload` must have been returned by [`Arena::allocate`] (or
  /// [`Arena::try_allocate`]) on this arena and not released since.
  ///
  /// # Panics
  ///
  /// If `payload` lies outside this arena or its header names another arena.
  /// Most double releases are caught this way, since the stomp also wipes the
  /// header.
  pub unsafe fn release(
    &mut self,
    payload: NonNull<u8>,
  ) {
    let payload = payload.as_ptr();
    let node = ChunkHeader::from_payload(payload);

    assert!(
      node.cast::<u8>() >= self.start && payload <= self.limit,
      "chunk at {payload:?} does not belong to arena {}",
      self.id
    );

    unsafe {
      let header = chunk::load(node);
      assert!(
        header.owner == self.id,
        "chunk at {payload:?} does not belong to arena {}",
        self.id
      );

      self.chunks.remove(node);
      ptr::write_bytes(
        node.cast::<u8>(),
        self.config.free_byte,
        HEADER_SIZE + header.size,
      );

      debug!(
        "arena {}: released {} bytes at offset {}",
        self.id,
        header.size,
        node as usize - self.start as usize
      );
    }
  }

  /// Gives the buffer back to the system allocator.
  ///
  /// Equivalent to dropping the arena. Live chunks are reported, not fatal.
  pub fn destroy(self) {
    drop(self);
  }

  /// Live chunks in ascending address order.
  pub fn chunks(&self) -> impl Iterator<Item = Chunk<'_>> {
    self.chunks.iter().map(move |node| {
      // Linked headers and their payloads lie inside the buffer.
      let header = unsafe { chunk::load(node) };
      let payload =
        unsafe { slice::from_raw_parts(ChunkHeader::payload(node), header.size) };

      Chunk {
        offset: node as usize - self.start as usize,
        size: header.size,
        has_prev: !header.prev.is_null(),
        has_next: !header.next.is_null(),
        payload,
      }
    })
  }

  /// Header offset of the chunk owning `payload`, if it lies in this arena.
  pub fn offset_of(
    &self,
    payload: NonNull<u8>,
  ) -> Option<usize> {
    let address = payload.as_ptr() as usize;
    let start = self.start as usize;

    (address >= start + HEADER_SIZE && address <= self.limit as usize)
      .then(|| address - HEADER_SIZE - start)
  }

  /// Free bytes outside live chunks.
  pub fn free_bytes(&self) -> usize {
    scan::free_bytes(self.region(), self.occupied(), self.config.free_byte)
  }

  /// Longest run of free bytes; a chunk needs a run of at least
  /// `HEADER_SIZE + size` to be placed.
  pub fn largest_free_run(&self) -> usize {
    scan::largest_run(self.region(), self.occupied(), self.config.free_byte)
  }

  pub fn dump(&self) -> Dump<'_> {
    Dump::new(self)
  }

  /// Writes [`Arena::dump`] to stdout.
  pub fn print_debug(&self) {
    print!("{}", self.dump());
  }

  /// The usable region, live chunks included.
  pub(crate) fn region(&self) -> &[u8] {
    unsafe { slice::from_raw_parts(self.start, self.capacity()) }
  }

  /// Byte ranges covered by live chunks, ascending.
  fn occupied(&self) -> impl Iterator<Item = Range<usize>> {
    self.chunks.iter().map(move |node| {
      let offset = node as usize - self.start as usize;
      let size = unsafe { chunk::load(node).size };
      offset..offset + HEADER_SIZE + size
    })
  }
}

impl Drop for Arena {
  fn drop(&mut self) {
    if !self.chunks.is_empty() {
      warn!(
        "destroying non-empty arena {} ({} live chunks)",
        self.id,
        self.len()
      );
    }

    unsafe { libc::free(self.base.as_ptr().cast()) };
    debug!("arena {}: destroyed", self.id);
  }
}

impl fmt::Debug for Arena {
  fn fmt(
    &self,
    f: &mut fmt::Formatter<'_>,
  ) -> fmt::Result {
    f.debug_struct("Arena")
      .field("id", &self.id)
      .field("capacity", &self.capacity())
      .field("chunks", &self.len())
      .field("config", &self.config)
      .finish()
  }
}
