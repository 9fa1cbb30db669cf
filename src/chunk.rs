use std::{mem, ptr};

use crate::arena::ArenaId;

/// Metadata written in-band right before every live payload.
///
/// Headers land at arbitrary byte offsets inside the arena, so they are only
/// ever touched through [`load`] and [`store`].
#[derive(Debug, Clone, Copy)]
#[repr(C)]
pub struct ChunkHeader {
  pub size: usize,
  pub prev: *mut ChunkHeader,
  pub next: *mut ChunkHeader,
  pub owner: ArenaId,
}

/// Distance from a chunk header to its payload.
pub const HEADER_SIZE: usize = mem::size_of::<ChunkHeader>();

impl ChunkHeader {
  pub fn new(
    size: usize,
    owner: ArenaId,
  ) -> Self {
    Self {
      size,
      prev: ptr::null_mut(),
      next: ptr::null_mut(),
      owner,
    }
  }

  /// Header that owns `payload`.
  pub fn from_payload(payload: *mut u8) -> *mut ChunkHeader {
    payload.wrapping_sub(HEADER_SIZE).cast()
  }

  pub fn payload(node: *mut ChunkHeader) -> *mut u8 {
    node.cast::<u8>().wrapping_add(HEADER_SIZE)
  }
}

pub(crate) unsafe fn load(node: *const ChunkHeader) -> ChunkHeader {
  unsafe { ptr::read_unaligned(node) }
}

pub(crate) unsafe fn store(
  node: *mut ChunkHeader,
  header: ChunkHeader,
) {
  unsafe { ptr::write_unaligned(node, header) }
}

pub(crate) unsafe fn set_prev(
  node: *mut ChunkHeader,
  prev: *mut ChunkHeader,
) {
  unsafe {
    let mut header = load(node);
    header.prev = prev;
    store(node, header);
  }
}

pub(crate) unsafe fn set_next(
  node: *mut ChunkHeader,
  next: *mut ChunkHeader,
) {
  unsafe {
    let mut header = load(node);
    header.next = next;
    store(node, header);
  }
}

/// Read-only view of a live chunk, as yielded by
/// [`Arena::chunks`](crate::Arena::chunks).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Chunk<'a> {
  /// Header position relative to the start of the usable region.
  pub offset: usize,
  pub size: usize,
  pub has_prev: bool,
  pub has_next: bool,
  pub payload: &'a [u8],
}

impl Chunk<'_> {
  /// Offset one past the last payload byte.
  pub fn end(&self) -> usize {
    self.offset + HEADER_SIZE + self.size
  }
}
