//! URL-safe base64 handling for VAPID application server keys.
//!
//! Servers publish their public key as URL-safe base64 with the padding
//! stripped. The push runtime wants raw bytes, so the padding is re-derived
//! from the text length and the alphabet is mapped back to standard base64
//! before decoding.

use base64::{
    engine::general_purpose::{STANDARD, URL_SAFE_NO_PAD},
    Engine as _,
};

use crate::error::{PushError, Result};

/// Number of `=` characters needed to bring `len` up to a multiple of four.
pub fn padding_len(len: usize) -> usize {
    (4 - len % 4) % 4
}

pub fn url_base64_to_bytes(encoded: &str) -> Result<Vec<u8>> {
    let encoded = encoded.trim();

    // A single trailing sextet cannot carry a whole byte.
    if encoded.len() % 4 == 1 {
        return Err(PushError::KeyDecode(format!(
            "{} characters is not a valid base64 length",
            encoded.len()
        )));
    }

    let padding = padding_len(encoded.len());
    let mut standard = String::with_capacity(encoded.len() + padding);
    standard.extend(encoded.chars().map(|c| match c {
        '-' => '+',
        '_' => '/',
        c => c,
    }));
    standard.extend(std::iter::repeat('=').take(padding));

    STANDARD
        .decode(standard.as_bytes())
        .map_err(|e| PushError::KeyDecode(e.to_string()))
}

pub fn bytes_to_url_base64(bytes: &[u8]) -> String {
    URL_SAFE_NO_PAD.encode(bytes)
}
