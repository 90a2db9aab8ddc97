//! Group image lookup.
//!
//! Images follow the catalogue's fixed naming: `<group><n>1.<ext>` for
//! `n` in 1..=3, under the catalogue's media root.

use std::fs::File;
use std::path::PathBuf;

use tracing::{debug, warn};

use crate::models::MediaHandle;
use crate::query::guards::{is_path_safe_code, MAX_MEDIA_PER_GROUP};
use crate::store::catalogue::Catalogue;

/// The candidate paths for a group, in display order.
pub fn media_candidates(catalogue: &Catalogue, group_code: &str) -> Vec<PathBuf> {
    (1..=MAX_MEDIA_PER_GROUP)
        .map(|index| {
            catalogue.media_root().join(format!(
                "{group_code}{index}1.{}",
                catalogue.media_extension()
            ))
        })
        .collect()
}

/// Open every existing image of a group. Missing or unreadable files are
/// skipped; this never fails.
pub fn resolve_media(catalogue: &Catalogue, group_code: &str) -> Vec<MediaHandle> {
    if !is_path_safe_code(group_code) {
        warn!("Refusing media lookup for group code {group_code:?}");
        return Vec::new();
    }

    let mut media = Vec::new();
    for path in media_candidates(catalogue, group_code) {
        if !path.is_file() {
            continue;
        }
        match File::open(&path) {
            Ok(file) => media.push(MediaHandle::new(path, file)),
            Err(e) => debug!("Skipping image {}: {e}", path.display()),
        }
    }
    media
}
