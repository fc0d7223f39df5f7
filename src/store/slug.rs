//! Session slugs: short, URL-safe, random identifiers.

use rand::Rng;

/// Letters and digits without look-alikes (0/O, 1/l/I).
pub const SLUG_ALPHABET: &[u8] = b"23456789abcdefghijkmnopqrstuvwxyzABCDEFGHJKLMNPQRSTUVWXYZ";

pub const SLUG_LEN: usize = 10;

/// A fresh random slug from the thread RNG.
pub fn new_slug() -> String {
    new_slug_with(&mut rand::thread_rng())
}

pub(crate) fn new_slug_with<R: Rng + ?Sized>(rng: &mut R) -> String {
    (0..SLUG_LEN)
        .map(|_| SLUG_ALPHABET[rng.gen_range(0..SLUG_ALPHABET.len())] as char)
        .collect()
}
