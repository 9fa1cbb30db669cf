//! Free-space scanning over the raw bytes of an arena.
//!
//! The region is read byte by byte: a byte is free when it holds the free
//! sentinel and lies outside every live chunk. Live chunk extents arrive as
//! ascending offset ranges and are jumped over, so payload bytes that happen
//! to equal the sentinel never count as free.

use std::ops::Range;

use log::trace;

/// Start offset of the first run of at least `needed` free bytes.
pub(crate) fn first_fit(
  region: &[u8],
  occupied: impl IntoIterator<Item = Range<usize>>,
  needed: usize,
  free_byte: u8,
) -> Option<usize> {
  let found = runs(region, occupied, free_byte).find(|run| run.len() >= needed);
  trace!("first fit for {needed} bytes: {found:?}");
  found.map(|run| run.start)
}

/// Length of the longest free run.
pub(crate) fn largest_run(
  region: &[u8],
  occupied: impl IntoIterator<Item = Range<usize>>,
  free_byte: u8,
) -> usize {
  runs(region, occupied, free_byte)
    .map(|run| run.len())
    .max()
    .unwrap_or(0)
}

/// Number of free bytes.
pub(crate) fn free_bytes(
  region: &[u8],
  occupied: impl IntoIterator<Item = Range<usize>>,
  free_byte: u8,
) -> usize {
  runs(region, occupied, free_byte).map(|run| run.len()).sum()
}

/// Maximal runs of free bytes, in ascending order.
fn runs<'a, I>(
  region: &'a [u8],
  occupied: I,
  free_byte: u8,
) -> Runs<'a, I::IntoIter>
where
  I: IntoIterator<Item = Range<usize>>,
{
  Runs {
    region,
    occupied: occupied.into_iter().peekable(),
    cursor: 0,
    free_byte,
  }
}

struct Runs<'a, I: Iterator<Item = Range<usize>>> {
  region: &'a [u8],
  occupied: std::iter::Peekable<I>,
  cursor: usize,
  free_byte: u8,
}

impl<I: Iterator<Item = Range<usize>>> Iterator for Runs<'_, I> {
  type Item = Range<usize>;

  fn next(&mut self) -> Option<Range<usize>> {
    let mut start = None;

    while self.cursor < self.region.len() {
      let chunk = self.occupied.peek().map(|chunk| (chunk.start, chunk.end));
      if let Some((chunk_start, chunk_end)) = chunk
        && chunk_start <= self.cursor
      {
        if let Some(start) = start {
          return Some(start..self.cursor);
        }
        self.cursor = self.cursor.max(chunk_end);
        self.occupied.next();
        continue;
      }

      if self.region[self.cursor] == self.free_byte {
        start.get_or_insert(self.cursor);
      } else if let Some(start) = start {
        let run = start..self.cursor;
        self.cursor += 1;
        return Some(run);
      }
      self.cursor += 1;
    }

    start.map(|start| start..self.region.len())
  }
}
