use std::{collections::HashSet, path::Path};

use crate::{
    error::AcquireError,
    types::{PlaylistId, Track},
};

const MAX_STEM_BYTES: usize = 150;
const UNSAFE_STEM_CHARS: &[char] = &['/', '\\', ':', '*', '?', '"', '<', '>', '|'];

/// Extracts the playlist id from a Spotify playlist URL, a `spotify:playlist:`
/// URI or a bare id.
pub fn parse_playlist_reference(reference: &str) -> Result<PlaylistId, AcquireError> {
    let reference = reference.trim();
    let invalid = || AcquireError::InvalidPlaylistReference(reference.to_string());

    let id = if let Some((_, rest)) = reference.split_once("/playlist/") {
        rest.split(['?', '#', '/']).next().unwrap_or_default()
    } else if let Some(rest) = reference.strip_prefix("spotify:playlist:") {
        rest
    } else if reference.contains(['/', ':']) {
        return Err(invalid());
    } else {
        reference
    };

    if id.is_empty() || !id.chars().all(|c| c.is_ascii_alphanumeric()) {
        return Err(invalid());
    }

    Ok(PlaylistId(id.to_string()))
}

pub fn build_query(track: &Track) -> String {
    format!("{} {}", track.title.trim(), track.artist.trim())
        .trim()
        .to_string()
}

/// Turns a search query into a file name stem that is safe on common
/// filesystems. Ordinary titles pass through unchanged.
pub fn sanitize_stem(query: &str) -> String {
    let replaced: String = query
        .chars()
        .map(|c| {
            if c.is_control() || UNSAFE_STEM_CHARS.contains(&c) {
                '_'
            } else {
                c
            }
        })
        .collect();

    let collapsed = replaced.split_whitespace().collect::<Vec<_>>().join(" ");
    let trimmed = collapsed.trim_matches(|c: char| c == '.' || c == ' ');

    let mut stem = String::new();
    for c in trimmed.chars() {
        if stem.len() + c.len_utf8() > MAX_STEM_BYTES {
            break;
        }
        stem.push(c);
    }

    let stem = stem.trim_end_matches(|c: char| c == '.' || c == ' ');
    if stem.is_empty() {
        "track".to_string()
    } else {
        stem.to_string()
    }
}

/// Returns `stem`, or `stem (n)` for the smallest `n >= 2` not yet taken, and
/// records the result in `taken`.
pub fn unique_stem(stem: &str, taken: &mut HashSet<String>) -> String {
    let mut candidate = stem.to_string();
    let mut n = 2;
    while taken.contains(&candidate.to_lowercase()) {
        candidate = format!("{} ({})", stem, n);
        n += 1;
    }

    taken.insert(candidate.to_lowercase());
    candidate
}

pub fn is_mp3(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("mp3"))
}

pub fn parse_key_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|key| !key.is_empty())
        .map(String::from)
        .collect()
}

pub fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
