//! Generated document identifiers.
//!
//! Layout: 4 bytes of big-endian unix seconds, 5 bytes drawn once per process, 3 bytes of a
//! wrapping counter. Rendered as 24 lowercase hex characters.

use std::{
    fmt::Write,
    sync::{
        atomic::{AtomicU32, Ordering},
        OnceLock,
    },
};

use chrono::Utc;

static PROCESS_UNIQUE: OnceLock<[u8; 5]> = OnceLock::new();
static COUNTER: OnceLock<AtomicU32> = OnceLock::new();

/// Generate a new object id string.
pub fn generate() -> String {
    let timestamp = Utc::now().timestamp() as u32;
    let process_unique = PROCESS_UNIQUE.get_or_init(rand::random::<[u8; 5]>);
    let counter = COUNTER
        .get_or_init(|| AtomicU32::new(rand::random::<u32>()))
        .fetch_add(1, Ordering::SeqCst);

    let mut bytes = [0u8; 12];
    bytes[..4].copy_from_slice(&timestamp.to_be_bytes());
    bytes[4..9].copy_from_slice(process_unique);
    bytes[9..].copy_from_slice(&counter.to_be_bytes()[1..]);

    bytes.iter().fold(String::with_capacity(24), |mut hex, byte| {
        let _ = write!(hex, "{:02x}", byte);
        hex
    })
}
