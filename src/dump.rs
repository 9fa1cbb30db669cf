use std::fmt;

use crate::Arena;

const RULE: &str = "----------------------------------------------------------------";

/// Human-readable rendering of an arena's chunks and the gaps between them.
///
/// Built by [`Arena::dump`]. Formatting only reads the arena.
pub struct Dump<'a> {
  arena: &'a Arena,
}

impl<'a> Dump<'a> {
  pub(crate) fn new(arena: &'a Arena) -> Self {
    Self { arena }
  }
}

fn maybe_null(present: bool) -> &'static str {
  if present { "*" } else { "NULL" }
}

fn write_gap(
  f: &mut fmt::Formatter<'_>,
  gap: usize,
) -> fmt::Result {
  if gap != 0 {
    writeln!(f, "{gap} byte gap")?;
  }
  Ok(())
}

impl fmt::Display for Dump<'_> {
  fn fmt(
    &self,
    f: &mut fmt::Formatter<'_>,
  ) -> fmt::Result {
    writeln!(f, "{RULE}")?;
    writeln!(f, "arena")?;
    writeln!(f, "    head: {}", maybe_null(!self.arena.is_empty()))?;

    let mut cursor = 0;
    for chunk in self.arena.chunks() {
      write_gap(f, chunk.offset - cursor)?;

      writeln!(f, "chunk")?;
      writeln!(f, "    size: {}", chunk.size)?;
      writeln!(f, "    prev: {}", maybe_null(chunk.has_prev))?;
      writeln!(f, "    next: {}", maybe_null(chunk.has_next))?;
      writeln!(f, "{} byte payload: {}", chunk.size, Escaped(chunk.payload))?;

      cursor = chunk.end();
    }
    write_gap(f, self.arena.capacity() - cursor)?;

    writeln!(f, "{RULE}")
  }
}

/// Printable ASCII other than `\` as-is, anything else as `\xXX`.
struct Escaped<'a>(&'a [u8]);

impl fmt::Display for Escaped<'_> {
  fn fmt(
    &self,
    f: &mut fmt::Formatter<'_>,
  ) -> fmt::Result {
    for &byte in self.0 {
      if (0x20..0x7F).contains(&byte) && byte != b'\\' {
        write!(f, "{}", byte as char)?;
      } else {
        write!(f, "\\x{byte:02X}")?;
      }
    }
    Ok(())
  }
}
