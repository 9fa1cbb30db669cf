use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ArenaError {
  #[error("system allocator could not reserve {size} bytes")]
  SystemAllocation { size: usize },

  #[error("arena size {size} overflows with a {prefix} byte reserved prefix")]
  SizeOverflow { size: usize, prefix: usize },

  #[error("free and initialized sentinels must differ (both {byte:#04x})")]
  SentinelClash { byte: u8 },

  #[error("no free run for a {requested} byte payload (largest run is {largest_run} bytes)")]
  OutOfSpace { requested: usize, largest_run: usize },
}
