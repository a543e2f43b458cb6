// SPDX-License-Identifier: GPL-3.0-only

//! Storage utilities for captured photos and videos
//!
//! Photos go to `<Pictures>/KameraKu` and videos to `<Videos>/KameraKu`, named
//! `IMG_<timestamp>.jpg` and `VID_<timestamp>.mp4`.

use crate::constants::media;
use chrono::{DateTime, Local};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Kind of media artifact being written
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaKind {
    Photo,
    Video,
}

impl MediaKind {
    pub fn prefix(&self) -> &'static str {
        match self {
            MediaKind::Photo => media::PHOTO_PREFIX,
            MediaKind::Video => media::VIDEO_PREFIX,
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            MediaKind::Photo => media::PHOTO_EXTENSION,
            MediaKind::Video => media::VIDEO_EXTENSION,
        }
    }

    fn user_dir(&self) -> PathBuf {
        let (xdg, fallback) = match self {
            MediaKind::Photo => (dirs::picture_dir(), "Pictures"),
            MediaKind::Video => (dirs::video_dir(), "Videos"),
        };
        xdg.or_else(|| dirs::home_dir().map(|home| home.join(fallback)))
            .unwrap_or_else(|| PathBuf::from(fallback))
    }
}

/// Directory that holds media of the given kind
pub fn media_directory(kind: MediaKind) -> PathBuf {
    kind.user_dir().join(media::FOLDER)
}

/// Ensure the media directory exists, creating it if necessary
pub fn ensure_media_directory(kind: MediaKind) -> std::io::Result<PathBuf> {
    let dir = media_directory(kind);
    std::fs::create_dir_all(&dir)?;
    debug!(path = %dir.display(), ?kind, "Media directory ready");
    Ok(dir)
}

/// File name for an artifact created at `at`, e.g. `IMG_2024-05-01-13-45-12-034.jpg`
pub fn timestamped_name(kind: MediaKind, at: DateTime<Local>) -> String {
    format!(
        "{}{}.{}",
        kind.prefix(),
        at.format(media::TIMESTAMP_FORMAT),
        kind.extension()
    )
}

/// Free path inside `dir` for an artifact created at `at`
///
/// Two captures within the same millisecond get a numeric suffix instead of
/// overwriting each other.
pub fn unique_path_in(dir: &Path, kind: MediaKind, at: DateTime<Local>) -> PathBuf {
    let candidate = dir.join(timestamped_name(kind, at));
    if !candidate.exists() {
        return candidate;
    }

    let stem = format!("{}{}", kind.prefix(), at.format(media::TIMESTAMP_FORMAT));
    (1..)
        .map(|n| dir.join(format!("{}-{}.{}", stem, n, kind.extension())))
        .find(|path| !path.exists())
        .unwrap_or(candidate)
}

/// Output path for a new artifact, creating the media directory on the way
pub fn next_output_path(kind: MediaKind) -> std::io::Result<PathBuf> {
    let dir = ensure_media_directory(kind)?;
    let path = unique_path_in(&dir, kind, Local::now());
    info!(path = %path.display(), "Allocated output path");
    Ok(path)
}

/// Decode a saved photo into a small thumbnail handle
///
/// Decoding happens on the blocking pool so the UI thread never waits on it.
pub async fn load_thumbnail(path: PathBuf) -> Option<cosmic::widget::image::Handle> {
    let bytes = tokio::fs::read(&path).await.ok()?;

    let (rgba, width, height) = tokio::task::spawn_blocking(move || {
        let img = image::load_from_memory(&bytes).ok()?;
        let thumb = img
            .thumbnail(media::THUMBNAIL_SIZE, media::THUMBNAIL_SIZE)
            .to_rgba8();
        let (width, height) = thumb.dimensions();
        Some((thumb.into_raw(), width, height))
    })
    .await
    .ok()??;

    debug!(path = %path.display(), width, height, "Thumbnail decoded");
    Some(cosmic::widget::image::Handle::from_rgba(width, height, rgba))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn sample_time() -> DateTime<Local> {
        Local
            .with_ymd_and_hms(2024, 5, 1, 13, 45, 12)
            .single()
            .expect("unambiguous local time")
            + chrono::Duration::milliseconds(34)
    }

    #[test]
    fn photo_names_are_zero_padded_with_millis() {
        let name = timestamped_name(MediaKind::Photo, sample_time());
        assert_eq!(name, "IMG_2024-05-01-13-45-12-034.jpg");
    }

    #[test]
    fn video_names_use_mp4() {
        let name = timestamped_name(MediaKind::Video, sample_time());
        assert_eq!(name, "VID_2024-05-01-13-45-12-034.mp4");
    }

    #[test]
    fn media_directories_end_in_app_folder() {
        assert!(media_directory(MediaKind::Photo).ends_with(media::FOLDER));
        assert!(media_directory(MediaKind::Video).ends_with(media::FOLDER));
    }

    #[test]
    fn colliding_names_get_a_suffix() {
        let dir = std::env::temp_dir().join(format!("kameraku-test-{}", uuid::Uuid::new_v4()));
        std::fs::create_dir_all(&dir).expect("create temp dir");

        let first = unique_path_in(&dir, MediaKind::Photo, sample_time());
        std::fs::write(&first, b"x").expect("write first");
        let second = unique_path_in(&dir, MediaKind::Photo, sample_time());

        assert_ne!(first, second);
        assert!(
            second
                .file_name()
                .and_then(|n| n.to_str())
                .is_some_and(|n| n.ends_with("-034-1.jpg"))
        );

        let _ = std::fs::remove_dir_all(&dir);
    }
}
