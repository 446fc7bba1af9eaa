//! Storage names for uploaded photos

use chrono::Utc;
use rand::Rng;

const TOKEN_ALPHABET: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";
const TOKEN_LEN: usize = 6;
const DEFAULT_EXTENSION: &str = "jpg";

/// Builds `photo_<unix-millis>_<token>.<ext>` for an uploaded file
///
/// The extension is taken from the original file name and falls back to
/// `jpg` when the name has none.
#[must_use]
pub fn generate(original_name: Option<&str>) -> String {
    format!(
        "photo_{}_{}.{}",
        Utc::now().timestamp_millis(),
        random_token(&mut rand::thread_rng()),
        extension(original_name)
    )
}

fn random_token(rng: &mut impl Rng) -> String {
    (0..TOKEN_LEN)
        .map(|_| char::from(TOKEN_ALPHABET[rng.gen_range(0..TOKEN_ALPHABET.len())]))
        .collect()
}

fn extension(original_name: Option<&str>) -> &str {
    original_name
        .and_then(|name| name.rsplit_once('.'))
        .map(|(_, ext)| ext)
        .filter(|ext| !ext.is_empty() && ext.chars().all(|c| c.is_ascii_alphanumeric()))
        .unwrap_or(DEFAULT_EXTENSION)
}
