use std::ptr::NonNull;

use contiguous::{Arena, ArenaConfig, HEADER_SIZE, ScanMargin};

/// Prints where a payload landed inside the arena.
fn print_alloc(
  arena: &Arena,
  label: &str,
  payload: Option<NonNull<u8>>,
) {
  match payload.and_then(|payload| arena.offset_of(payload)) {
    Some(offset) => println!(
      "[{label}] header at offset {offset}, payload at offset {}, {} bytes free",
      offset + HEADER_SIZE,
      arena.free_bytes()
    ),
    None => println!(
      "[{label}] no room (largest free run is {} bytes)",
      arena.largest_free_run()
    ),
  }
}

fn main() {
  // RUST_LOG=debug shows every allocation and release.
  env_logger::init();

  let mut arena = match Arena::new(1024) {
    Ok(arena) => arena,
    Err(err) => {
      eprintln!("could not create arena: {err}");
      return;
    }
  };
  println!("{arena:?}");
  arena.print_debug();

  // --------------------------------------------------------------------
  // 1) Two chunks, back to back.
  // --------------------------------------------------------------------
  let a = arena.allocate(100);
  print_alloc(&arena, "1a", a);
  let b = arena.allocate(200);
  print_alloc(&arena, "1b", b);

  // Overwrite the '9' placeholder in `b` with something readable.
  if let Some(b) = b {
    let text = b"hello, arena\n";
    unsafe { b.as_ptr().copy_from_nonoverlapping(text.as_ptr(), text.len()) };
  }

  // --------------------------------------------------------------------
  // 2) Release the first chunk: its bytes go back to '$'.
  // --------------------------------------------------------------------
  if let Some(a) = a {
    unsafe { arena.release(a) };
    println!("\n[2] released first chunk");
  }

  // --------------------------------------------------------------------
  // 3) A smaller chunk reuses the hole in front of `b`.
  // --------------------------------------------------------------------
  let c = arena.allocate(50);
  print_alloc(&arena, "3", c);
  arena.print_debug();

  // --------------------------------------------------------------------
  // 4) Ask for more than is left.
  // --------------------------------------------------------------------
  match arena.try_allocate(2048) {
    Ok(_) => println!("\n[4] unexpectedly fit 2048 bytes"),
    Err(err) => println!("\n[4] {err}"),
  }

  // --------------------------------------------------------------------
  // 5) Dropping the arena with `b` and `c` still live is reported, not fatal.
  // --------------------------------------------------------------------
  arena.destroy();

  // --------------------------------------------------------------------
  // 6) The same capacity with a trailing header of slack per chunk.
  // --------------------------------------------------------------------
  let config = ArenaConfig::new().with_margin(ScanMargin::TrailingHeader);
  if let Ok(mut strict) = Arena::with_config(1024, config) {
    let whole = strict.allocate(1024 - HEADER_SIZE);
    print_alloc(&strict, "6a", whole);
    let almost = strict.allocate(1024 - 2 * HEADER_SIZE);
    print_alloc(&strict, "6b", almost);

    if let Some(almost) = almost {
      unsafe { strict.release(almost) };
    }
  }
}
