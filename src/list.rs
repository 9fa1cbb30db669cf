use std::ptr;

use crate::chunk::{self, ChunkHeader};

/// Address-ordered, doubly-linked list of the live chunk headers of an arena.
///
/// The list never owns its nodes: a header exists because its bytes are not
/// free sentinels, and the links only record the order.
pub(crate) struct ChunkList {
  head: *mut ChunkHeader,
}

impl ChunkList {
  pub fn new() -> Self {
    Self {
      head: ptr::null_mut(),
    }
  }

  pub fn is_empty(&self) -> bool {
    self.head.is_null()
  }

  /// Splices `node` in before the first chunk at a higher address.
  ///
  /// # Safety
  ///
  /// `node` must point at a written header that is not yet linked, and every
  /// linked header must still be valid.
  pub unsafe fn insert(
    &mut self,
    node: *mut ChunkHeader,
  ) {
    unsafe {
      if self.head.is_null() {
        link(node, ptr::null_mut(), ptr::null_mut());
        self.head = node;
        return;
      }

      if node < self.head {
        link(node, ptr::null_mut(), self.head);
        chunk::set_prev(self.head, node);
        self.head = node;
        return;
      }

      let mut current = self.head;
      loop {
        let next = chunk::load(current).next;
        if next.is_null() || next > node {
          break;
        }
        current = next;
      }

      debug_assert!(current != node, "chunk {node:?} linked twice");

      let next = chunk::load(current).next;
      link(node, current, next);
      chunk::set_next(current, node);
      if !next.is_null() {
        chunk::set_prev(next, node);
      }
    }
  }

  /// Unlinks `node`, leaving its own links untouched.
  ///
  /// # Safety
  ///
  /// `node` must currently be linked into this list.
  pub unsafe fn remove(
    &mut self,
    node: *mut ChunkHeader,
  ) {
    unsafe {
      let header = chunk::load(node);

      if self.head == node {
        self.head = header.next;
      } else if !header.prev.is_null() {
        chunk::set_next(header.prev, header.next);
      }

      if !header.next.is_null() {
        chunk::set_prev(header.next, header.prev);
      }
    }
  }

  /// Walks the headers in ascending address order.
  pub fn iter(&self) -> Iter<'_> {
    Iter {
      current: self.head,
      _list: self,
    }
  }
}

unsafe fn link(
  node: *mut ChunkHeader,
  prev: *mut ChunkHeader,
  next: *mut ChunkHeader,
) {
  unsafe {
    let mut header = chunk::load(node);
    header.prev = prev;
    header.next = next;
    chunk::store(node, header);
  }
}

pub(crate) struct Iter<'a> {
  current: *mut ChunkHeader,
  _list: &'a ChunkList,
}

impl Iterator for Iter<'_> {
  type Item = *mut ChunkHeader;

  fn next(&mut self) -> Option<Self::Item> {
    if self.current.is_null() {
      return None;
    }

    let node = self.current;
    // Linked headers stay valid while the list is borrowed.
    self.current = unsafe { chunk::load(node).next };
    Some(node)
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::{arena::ArenaId, chunk::HEADER_SIZE};

  const SLOTS: usize = 4;

  /// Writes `SLOTS` unlinked headers back to back at an odd offset.
  fn nodes(buffer: &mut [u8]) -> Vec<*mut ChunkHeader> {
    let base = buffer.as_mut_ptr();
    (0..SLOTS)
      .map(|i| {
        let node = base.wrapping_add(1 + i * HEADER_SIZE).cast::<ChunkHeader>();
        unsafe { chunk::store(node, ChunkHeader::new(0, ArenaId::from_raw(1))) };
        node
      })
      .collect()
  }

  fn assert_consistent(list: &ChunkList) {
    let order: Vec<_> = list.iter().collect();

    for pair in order.windows(2) {
      assert!(pair[0] < pair[1]);
      unsafe {
        assert_eq!(chunk::load(pair[0]).next, pair[1]);
        assert_eq!(chunk::load(pair[1]).prev, pair[0]);
      }
    }
    if let Some(&first) = order.first() {
      assert!(unsafe { chunk::load(first).prev.is_null() });
    }
    if let Some(&last) = order.last() {
      assert!(unsafe { chunk::load(last).next.is_null() });
    }
  }

  #[test]
  fn test_insert_keeps_address_order() {
    let mut buffer = vec![0u8; 1 + SLOTS * HEADER_SIZE];
    let nodes = nodes(&mut buffer);
    let mut list = ChunkList::new();

    unsafe {
      list.insert(nodes[2]);
      list.insert(nodes[0]);
      list.insert(nodes[3]);
      list.insert(nodes[1]);
    }

    assert_eq!(list.iter().next(), Some(nodes[0]));
    assert_eq!(list.iter().collect::<Vec<_>>(), nodes);
    assert_consistent(&list);
  }

  #[test]
  fn test_remove_head_middle_and_tail() {
    let mut buffer = vec![0u8; 1 + SLOTS * HEADER_SIZE];
    let nodes = nodes(&mut buffer);
    let mut list = ChunkList::new();

    unsafe {
      for &node in &nodes {
        list.insert(node);
      }

      list.remove(nodes[0]);
      assert_eq!(list.iter().next(), Some(nodes[1]));
      assert_consistent(&list);

      list.remove(nodes[2]);
      assert_eq!(list.iter().collect::<Vec<_>>(), vec![nodes[1], nodes[3]]);
      assert_consistent(&list);

      list.remove(nodes[3]);
      assert_eq!(list.iter().collect::<Vec<_>>(), vec![nodes[1]]);
      assert_consistent(&list);

      list.remove(nodes[1]);
    }

    assert!(list.is_empty());
    assert_eq!(list.iter().count(), 0);
  }

  #[test]
  fn test_reinsert_after_remove() {
    let mut buffer = vec![0u8; 1 + SLOTS * HEADER_SIZE];
    let nodes = nodes(&mut buffer);
    let mut list = ChunkList::new();

    unsafe {
      list.insert(nodes[1]);
      list.insert(nodes[3]);
      list.remove(nodes[1]);
      list.insert(nodes[2]);
      list.insert(nodes[0]);
    }

    assert_eq!(
      list.iter().collect::<Vec<_>>(),
      vec![nodes[0], nodes[2], nodes[3]]
    );
    assert_consistent(&list);
  }
}
