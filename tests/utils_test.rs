use std::{collections::HashSet, path::Path};

use tunegrab::error::AcquireError;
use tunegrab::types::Track;
use tunegrab::utils::*;

// Helper function to create a test track
fn create_test_track(title: &str, artist: &str) -> Track {
    Track {
        title: title.to_string(),
        artist: artist.to_string(),
    }
}

#[test]
fn test_parse_playlist_reference_from_url() {
    let id = parse_playlist_reference(
        "https://open.spotify.com/playlist/37i9dQZF1DXcBWIGoYBM5M?si=1a2b3c",
    )
    .unwrap();
    assert_eq!(id.as_str(), "37i9dQZF1DXcBWIGoYBM5M");

    // Localized URLs and trailing slashes
    let id = parse_playlist_reference("https://open.spotify.com/intl-de/playlist/abc123/").unwrap();
    assert_eq!(id.as_str(), "abc123");

    // Surrounding whitespace is ignored
    let id = parse_playlist_reference("  https://open.spotify.com/playlist/abc123#top \n").unwrap();
    assert_eq!(id.as_str(), "abc123");
}

#[test]
fn test_parse_playlist_reference_from_uri_and_bare_id() {
    let id = parse_playlist_reference("spotify:playlist:37i9dQZF1DXcBWIGoYBM5M").unwrap();
    assert_eq!(id.as_str(), "37i9dQZF1DXcBWIGoYBM5M");

    let id = parse_playlist_reference("37i9dQZF1DXcBWIGoYBM5M").unwrap();
    assert_eq!(id.as_str(), "37i9dQZF1DXcBWIGoYBM5M");
}

#[test]
fn test_parse_playlist_reference_rejects_invalid_input() {
    let invalid = [
        "",
        "   ",
        "https://open.spotify.com/playlist/",
        "https://open.spotify.com/playlist/?si=abc",
        "https://open.spotify.com/album/37i9dQZF1DXcBWIGoYBM5M",
        "spotify:playlist:",
        "spotify:track:37i9dQZF1DXcBWIGoYBM5M",
        "../../etc/passwd",
        "playlist id with spaces",
    ];

    for reference in invalid {
        match parse_playlist_reference(reference) {
            Err(AcquireError::InvalidPlaylistReference(_)) => {}
            other => panic!("expected invalid reference for {:?}, got {:?}", reference, other),
        }
    }
}

#[test]
fn test_build_query() {
    let track = create_test_track("Song A", "Artist X");
    assert_eq!(build_query(&track), "Song A Artist X");

    // Missing artist does not leave a trailing space
    let track = create_test_track("Intro", "");
    assert_eq!(build_query(&track), "Intro");

    let track = create_test_track("  Padded  ", " Artist ");
    assert_eq!(build_query(&track), "Padded Artist");
}

#[test]
fn test_sanitize_stem_keeps_ordinary_names() {
    assert_eq!(sanitize_stem("Song A Artist X"), "Song A Artist X");
    assert_eq!(sanitize_stem("Café del Mar (Remix) Björk"), "Café del Mar (Remix) Björk");
}

#[test]
fn test_sanitize_stem_replaces_unsafe_characters() {
    assert_eq!(sanitize_stem("AC/DC Back In Black"), "AC_DC Back In Black");
    assert_eq!(sanitize_stem("What? Who: Me*"), "What_ Who_ Me_");
    assert_eq!(sanitize_stem("a\\b\"c<d>e|f"), "a_b_c_d_e_f");
    assert_eq!(sanitize_stem("tab\there"), "tab_here");
}

#[test]
fn test_sanitize_stem_trims_and_collapses() {
    assert_eq!(sanitize_stem("  lots    of   space  "), "lots of space");
    assert_eq!(sanitize_stem("..hidden."), "hidden");
    assert_eq!(sanitize_stem(""), "track");
    assert_eq!(sanitize_stem(" . . "), "track");
}

#[test]
fn test_sanitize_stem_caps_length_on_char_boundary() {
    let long = "é".repeat(200);
    let stem = sanitize_stem(&long);

    assert!(stem.len() <= 150);
    assert!(stem.chars().all(|c| c == 'é'));
    assert_eq!(stem.chars().count(), 75);
}

#[test]
fn test_unique_stem_appends_suffix_on_collision() {
    let mut taken = HashSet::new();

    assert_eq!(unique_stem("Song A Artist X", &mut taken), "Song A Artist X");
    assert_eq!(unique_stem("Song A Artist X", &mut taken), "Song A Artist X (2)");
    assert_eq!(unique_stem("Song A Artist X", &mut taken), "Song A Artist X (3)");

    // Case-insensitive filesystems would merge these
    assert_eq!(unique_stem("song a artist x", &mut taken), "song a artist x (4)");

    assert_eq!(unique_stem("Other", &mut taken), "Other");
}

#[test]
fn test_is_mp3() {
    assert!(is_mp3(Path::new("a.mp3")));
    assert!(is_mp3(Path::new("/tmp/session/B.MP3")));
    assert!(!is_mp3(Path::new("a.webm")));
    assert!(!is_mp3(Path::new("mp3")));
    assert!(!is_mp3(Path::new("a.mp3.part")));
}

#[test]
fn test_parse_key_list() {
    assert_eq!(parse_key_list("k1, k2 ,,k3"), vec!["k1", "k2", "k3"]);
    assert!(parse_key_list("").is_empty());
    assert!(parse_key_list(" , ").is_empty());
}

#[test]
fn test_parse_bool() {
    assert_eq!(parse_bool("true"), Some(true));
    assert_eq!(parse_bool(" YES "), Some(true));
    assert_eq!(parse_bool("0"), Some(false));
    assert_eq!(parse_bool("off"), Some(false));
    assert_eq!(parse_bool("maybe"), None);
}
