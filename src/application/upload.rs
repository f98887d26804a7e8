// SPDX-License-Identifier: MPL-2.0
//! Card photo uploads.
//!
//! Photos live under `cardImages/{game}/{version}/{name}_{millis}.jpg`. The
//! file name is derived from the card name so objects stay recognizable in
//! the bucket; the millisecond suffix keeps replacements from colliding.

use crate::app::config::{MAX_PHOTO_NAME_CHARS, PHOTO_ROOT};
use crate::application::port::{BlobError, BlobStore};
use std::path::PathBuf;
use std::sync::Arc;

/// A photo picked from disk, waiting to be uploaded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PickedPhoto {
    pub path: PathBuf,
    pub bytes: Vec<u8>,
}

/// Replaces every character outside ASCII word characters, `-`, CJK
/// ideographs, hiragana and katakana with `_`, then truncates.
#[must_use]
pub fn sanitize_photo_name(card_name: &str) -> String {
    card_name
        .trim()
        .chars()
        .map(|c| if is_kept(c) { c } else { '_' })
        .take(MAX_PHOTO_NAME_CHARS)
        .collect()
}

fn is_kept(c: char) -> bool {
    c.is_ascii_alphanumeric()
        || c == '_'
        || c == '-'
        || ('\u{4E00}'..='\u{9FA5}').contains(&c)
        || ('\u{3041}'..='\u{3093}').contains(&c)
        || ('\u{30A1}'..='\u{30F3}').contains(&c)
}

/// Object path of a card photo uploaded at `millis` (Unix epoch).
#[must_use]
pub fn photo_object_path(
    card_game_name: &str,
    version_name: &str,
    card_name: &str,
    millis: i64,
) -> String {
    format!(
        "{PHOTO_ROOT}/{card_game_name}/{version_name}/{}_{millis}.jpg",
        sanitize_photo_name(card_name)
    )
}

/// Uploads a card photo and returns its permanent URL.
///
/// # Errors
///
/// Propagates the [`BlobStore`] failure.
pub async fn upload_card_photo(
    blobs: Arc<dyn BlobStore>,
    card_game_name: String,
    version_name: String,
    card_name: String,
    photo: PickedPhoto,
) -> Result<String, BlobError> {
    let millis = chrono::Utc::now().timestamp_millis();
    let path = photo_object_path(&card_game_name, &version_name, &card_name, millis);
    tracing::debug!(%path, bytes = photo.bytes.len(), "uploading card photo");
    let url = blobs.upload(&path, photo.bytes).await?;
    tracing::info!(%path, "card photo uploaded");
    Ok(url)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sanitize_keeps_ascii_words_and_japanese() {
        assert_eq!(sanitize_photo_name("Pikachu-V_01"), "Pikachu-V_01");
        assert_eq!(sanitize_photo_name("ピカチュウ ex"), "ピカチュウ_ex");
        assert_eq!(sanitize_photo_name("ミュウ＆ミュウツー"), "ミュウ_ミュウツ_");
        assert_eq!(sanitize_photo_name("博士の研究"), "博士の研究");
    }

    #[test]
    fn sanitize_replaces_prolonged_sound_mark_and_punctuation() {
        assert_eq!(sanitize_photo_name("ルギアＶＳＴＡＲ"), "ルギア_____");
        assert_eq!(sanitize_photo_name("a/b\\c"), "a_b_c");
        assert_eq!(sanitize_photo_name("スーパーボール"), "ス_パ_ボ_ル");
    }

    #[test]
    fn sanitize_trims_then_truncates() {
        let long = format!("  {}  ", "あ".repeat(80));
        let safe = sanitize_photo_name(&long);
        assert_eq!(safe.chars().count(), MAX_PHOTO_NAME_CHARS);
        assert!(safe.chars().all(|c| c == 'あ'));
    }

    #[test]
    fn object_path_layout() {
        let path = photo_object_path("ポケモンカード", "151", "ミュウ ex", 1_700_000_000_000);
        assert_eq!(
            path,
            "cardImages/ポケモンカード/151/ミュウ_ex_1700000000000.jpg"
        );
    }
}
