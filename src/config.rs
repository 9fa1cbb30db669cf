use crate::{chunk::HEADER_SIZE, error::ArenaError};

/// Byte value marking arena storage that no live chunk covers.
pub const FREE_BYTE: u8 = b'$';

/// Byte value stamped over a payload when it is handed out.
pub const INIT_BYTE: u8 = b'9';

/// Bytes kept unused between the start of the buffer and the usable region.
pub const RESERVED_PREFIX: usize = 16;

/// How much free space the scanner demands beyond header + payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScanMargin {
  /// A run of exactly `HEADER_SIZE + size` bytes is enough.
  #[default]
  Exact,
  /// Demand one more header's worth of free bytes after the payload.
  TrailingHeader,
}

impl ScanMargin {
  pub fn bytes(self) -> usize {
    match self {
      ScanMargin::Exact => 0,
      ScanMargin::TrailingHeader => HEADER_SIZE,
    }
  }
}

/// Tunables fixed for the lifetime of an [`Arena`](crate::Arena).
///
/// ```rust
/// use contiguous::{ArenaConfig, ScanMargin};
///
/// let config = ArenaConfig::new()
///   .with_free_byte(0)
///   .with_init_byte(0xAA)
///   .with_margin(ScanMargin::TrailingHeader);
///
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArenaConfig {
  pub reserved_prefix: usize,
  pub free_byte: u8,
  pub init_byte: u8,
  pub margin: ScanMargin,
}

impl Default for ArenaConfig {
  fn default() -> Self {
    Self {
      reserved_prefix: RESERVED_PREFIX,
      free_byte: FREE_BYTE,
      init_byte: INIT_BYTE,
      margin: ScanMargin::default(),
    }
  }
}

impl ArenaConfig {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn with_reserved_prefix(
    mut self,
    reserved_prefix: usize,
  ) -> Self {
    self.reserved_prefix = reserved_prefix;
    self
  }

  pub fn with_free_byte(
    mut self,
    free_byte: u8,
  ) -> Self {
    self.free_byte = free_byte;
    self
  }

  pub fn with_init_byte(
    mut self,
    init_byte: u8,
  ) -> Self {
    self.init_byte = init_byte;
    self
  }

  pub fn with_margin(
    mut self,
    margin: ScanMargin,
  ) -> Self {
    self.margin = margin;
    self
  }

  /// A fresh payload must never read as free space.
  pub fn validate(&self) -> Result<(), ArenaError> {
    if self.free_byte == self.init_byte {
      return Err(ArenaError::SentinelClash {
        byte: self.free_byte,
      });
    }

    Ok(())
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_defaults() {
    let config = ArenaConfig::default();

    assert_eq!(config.reserved_prefix, 16);
    assert_eq!(config.free_byte, b'$');
    assert_eq!(config.init_byte, b'9');
    assert_eq!(config.margin, ScanMargin::Exact);
    assert!(config.validate().is_ok());
  }

  #[test]
  fn test_sentinel_clash() {
    let config = ArenaConfig::new().with_free_byte(7).with_init_byte(7);

    assert_eq!(
      config.validate(),
      Err(ArenaError::SentinelClash { byte: 7 })
    );
  }

  #[test]
  fn test_margin_bytes() {
    assert_eq!(ScanMargin::Exact.bytes(), 0);
    assert_eq!(ScanMargin::TrailingHeader.bytes(), HEADER_SIZE);
  }
}
