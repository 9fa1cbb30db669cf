//! # contiguous - A Byte-Scanning Arena Sub-Allocator
//!
//! This crate carves variable-sized chunks out of **one** buffer reserved from
//! the system allocator up front. After [`Arena::new`] returns, no allocation,
//! release, scan or dump touches the system allocator again.
//!
//! ## Overview
//!
//! Free space is not tracked in a free-list or a bitmap. Every byte that no
//! live chunk covers holds a *free sentinel* (`$` by default), and allocation
//! scans the raw bytes for a long enough run of them:
//!
//! ```text
//!   Arena Buffer:
//!
//!   ┌──────────┬───────────────────────────────────────────────────────────┐
//!   │ reserved │                     usable region                         │
//!   │  prefix  │ ┌─────┬───────┐ ┌───────────┐ ┌─────┬──────┐ ┌─────────┐ │
//!   │ (unused) │ │ hdr │ 99999 │ │ $$$$$$$$$ │ │ hdr │ data │ │ $$$$$$$ │ │
//!   │          │ └─────┴───────┘ └───────────┘ └─────┴──────┘ └─────────┘ │
//!   └──────────┴───────────────────────────────────────────────────────────┘
//!                   chunk           free run       chunk        free run
//!                     ▲                              ▲
//!                     └───── prev / next links ──────┘
//! ```
//!
//! Live chunks form an address-ordered, doubly-linked list whose headers
//! live in-band, right before each payload:
//!
//! ```text
//!   Single Chunk:
//!   ┌───────────────────────┬────────────────────────────────┐
//!   │    Chunk Header       │         Payload                │
//!   │  ┌─────────────────┐  │                                │
//!   │  │ size: N         │  │  ┌──────────────────────────┐  │
//!   │  │ prev: null/ptr  │  │  │  N bytes, stamped with   │  │
//!   │  │ next: null/ptr  │  │  │  '9' on allocation       │  │
//!   │  │ owner: arena id │  │  │                          │  │
//!   │  └─────────────────┘  │  └──────────────────────────┘  │
//!   │     HEADER_SIZE       │                                │
//!   └───────────────────────┴────────────────────────────────┘
//!                           ▲
//!                           └── Pointer returned to user
//! ```
//!
//! ## Crate Structure
//!
//! ```text
//!   contiguous
//!   ├── arena   - Arena lifecycle, allocate / release, introspection
//!   ├── chunk   - Chunk header layout and HEADER_SIZE
//!   ├── config  - Sentinels, reserved prefix, scan margin
//!   ├── dump    - Debug rendering of chunks and gaps
//!   ├── error   - ArenaError
//!   ├── list    - Address-ordered chunk list (internal)
//!   └── scan    - Free-run search over raw bytes (internal)
//! ```
//!
//! ## Quick Start
//!
//! ```rust
//! use contiguous::Arena;
//!
//! let mut arena = Arena::new(1024).expect("system allocator is exhausted");
//!
//! let a = arena.allocate(100).expect("fits in a fresh arena");
//! let b = arena.allocate(200).expect("fits after the first chunk");
//! assert!(b > a);
//!
//! unsafe { arena.release(a) };
//!
//! // First fit: the freed run in front of `b` is reused.
//! let c = arena.allocate(50).unwrap();
//! assert_eq!(c, a);
//!
//! println!("{}", arena.dump());
//!
//! unsafe {
//!   arena.release(b);
//!   arena.release(c);
//! }
//! ```
//!
//! ## How It Works
//!
//! - **Allocate** walks the usable region once, skipping live chunks, and takes
//!   the first run of free bytes long enough for a header plus the payload.
//!   The header is written there, spliced into the chunk list, and the payload
//!   is stamped with the *initialized* sentinel.
//! - **Release** unlinks the header and stomps the whole chunk back to the free
//!   sentinel, which is all it takes for the next scan to see the space again.
//!   Adjacent free runs merge implicitly because they are just bytes.
//!
//! ## Limitations
//!
//! - **Single-threaded only**: `Arena` is neither `Send` nor `Sync`
//! - **No alignment**: headers and payloads sit at arbitrary byte offsets
//! - **Linear scans**: allocation cost grows with the arena size
//! - **Fixed size**: an arena never grows or shrinks
//!
//! ## Safety
//!
//! Payloads are handed out as raw [`NonNull<u8>`](std::ptr::NonNull) pointers.
//! [`Arena::release`] is `unsafe`: the pointer must come from the same arena
//! and must not have been released already.

mod arena;
mod chunk;
mod config;
mod dump;
mod error;
mod list;
mod scan;

pub use arena::{Arena, ArenaId, MIN_ARENA_SIZE};
pub use chunk::{Chunk, HEADER_SIZE};
pub use config::{ArenaConfig, FREE_BYTE, INIT_BYTE, RESERVED_PREFIX, ScanMargin};
pub use dump::Dump;
pub use error::ArenaError;
