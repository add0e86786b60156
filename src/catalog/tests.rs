use super::client::{parse_tracks, upscale_artwork};
use super::*;
use crate::config::CatalogSettings;

const DAFT_PUNK: &str = r#"{
  "resultCount": 2,
  "results": [
    {
      "wrapperType": "track",
      "kind": "song",
      "trackId": 697195787,
      "artistName": "Daft Punk",
      "trackName": "Get Lucky (feat. Pharrell Williams & Nile Rodgers)",
      "artworkUrl100": "https://is1-ssl.mzstatic.com/image/thumb/Music/v4/e8/43/5f/source/100x100bb.jpg",
      "previewUrl": "https://audio-ssl.itunes.apple.com/itunes-assets/preview1.m4a",
      "trackTimeMillis": 369629
    },
    {
      "wrapperType": "track",
      "kind": "song",
      "trackId": 1440650714,
      "artistName": "Daft Punk",
      "trackName": "One More Time",
      "artworkUrl100": "https://is1-ssl.mzstatic.com/image/thumb/Music/v4/aa/bb/cc/source/100x100bb.jpg",
      "previewUrl": "https://audio-ssl.itunes.apple.com/itunes-assets/preview2.m4a",
      "trackTimeMillis": 320357
    }
  ]
}"#;

#[test]
fn normalize_query_trims_and_rejects_blank() {
    assert_eq!(normalize_query("  Daft Punk \n"), Some("Daft Punk".to_string()));
    assert_eq!(normalize_query(""), None);
    assert_eq!(normalize_query("   \t "), None);
}

#[test]
fn parse_tracks_maps_fields_in_response_order() {
    let tracks = parse_tracks(DAFT_PUNK, 300).unwrap();
    assert_eq!(tracks.len(), 2);

    let first = &tracks[0];
    assert_eq!(first.id, 697195787);
    assert_eq!(first.artist, "Daft Punk");
    assert!(first.title.starts_with("Get Lucky"));
    assert_eq!(
        first.cover_url,
        "https://is1-ssl.mzstatic.com/image/thumb/Music/v4/e8/43/5f/source/300x300bb.jpg"
    );
    assert_eq!(
        first.preview_url,
        "https://audio-ssl.itunes.apple.com/itunes-assets/preview1.m4a"
    );
    // 369629 ms truncates to 369 s.
    assert_eq!(first.duration_secs, 369);

    assert_eq!(tracks[1].title, "One More Time");
    assert_eq!(tracks[1].duration_secs, 320);
}

#[test]
fn parse_tracks_empty_results_is_not_an_error() {
    let tracks = parse_tracks(r#"{"resultCount":0,"results":[]}"#, 300).unwrap();
    assert!(tracks.is_empty());

    // A payload without a results array counts as zero matches too.
    let tracks = parse_tracks(r#"{"resultCount":0}"#, 300).unwrap();
    assert!(tracks.is_empty());
}

#[test]
fn parse_tracks_rejects_malformed_payloads() {
    assert!(matches!(
        parse_tracks("<html>oops</html>", 300),
        Err(SearchError::Payload(_))
    ));
    assert!(matches!(
        parse_tracks(r#"{"results":[{"trackName":"No id"}]}"#, 300),
        Err(SearchError::Payload(_))
    ));
}

#[test]
fn parse_tracks_skips_results_without_preview_and_defaults_duration() {
    let body = r#"{"resultCount":2,"results":[
        {"trackId":1,"trackName":"A","artistName":"X"},
        {"trackId":2,"trackName":"B","artistName":"X","previewUrl":"https://p/b.m4a"}
    ]}"#;
    let tracks = parse_tracks(body, 300).unwrap();
    assert_eq!(tracks.len(), 1);
    assert_eq!(tracks[0].id, 2);
    assert_eq!(tracks[0].duration_secs, 0);
    assert_eq!(tracks[0].cover_url, "");
}

#[test]
fn upscale_artwork_replaces_size_token_only() {
    assert_eq!(
        upscale_artwork("https://a/b/100x100bb.jpg", 600),
        "https://a/b/600x600bb.jpg"
    );
    assert_eq!(upscale_artwork("https://a/b/60x60bb.jpg", 300), "https://a/b/60x60bb.jpg");
}

#[test]
fn track_display_prefers_artist_dash_title() {
    let mut t = parse_tracks(DAFT_PUNK, 300).unwrap().remove(1);
    assert_eq!(t.display(), "Daft Punk - One More Time");
    t.artist = "  ".to_string();
    assert_eq!(t.display(), "One More Time");
}

#[test]
fn search_url_tolerates_trailing_slash() {
    let settings = CatalogSettings {
        base_url: "http://localhost:8080/".to_string(),
        ..CatalogSettings::default()
    };
    let client = CatalogClient::new(settings).unwrap();
    assert_eq!(client.search_url(), "http://localhost:8080/search");
}

#[test]
fn search_sequence_only_latest_is_current() {
    let mut seq = SearchSequence::default();
    assert!(!seq.is_current(0));

    let first = seq.issue();
    assert!(seq.is_current(first));

    let second = seq.issue();
    assert!(second > first);
    assert!(!seq.is_current(first));
    assert!(seq.is_current(second));
    assert_eq!(seq.latest(), second);
}
