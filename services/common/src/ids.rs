//! Action id generation and error-code fingerprinting

use std::fmt::Write as _;

/// Generates a fresh action id: 24 lowercase hex characters, taken from the
/// low 12 bytes of a random UUIDv4. Cheap and collision-resistant enough for
/// a single process's action volume.
#[must_use]
pub fn new_action_id() -> String {
    let uuid = uuid::Uuid::new_v4();
    let bytes = &uuid.as_bytes()[4..16];
    let mut out = String::with_capacity(24);
    for b in bytes {
        let _ = write!(out, "{b:02x}");
    }
    out
}

/// Derives a stable error code from a Rust type name when the error itself
/// doesn't supply one via `ActionFault::code()`. Mirrors the "stable
/// fingerprint of its type name" rule in spec.md §4.5.
#[must_use]
pub fn fingerprint_type_name(type_name: &str) -> String {
    let short = type_name.rsplit("::").next().unwrap_or(type_name);
    short
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c.to_ascii_uppercase() } else { '_' })
        .collect()
}
