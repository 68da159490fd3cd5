//! Filter/sort pipeline
//!
//! Derives the display list from the catalog (or an active playlist's resolved
//! members). Pure and allocation-only, so it can run on a blocking worker.
//!
//! Every ordering ends with the track id as a tie-breaker. The result of a
//! sort therefore does not depend on the input order, which makes re-sorting
//! idempotent and `search("")` after `sort(x)` equal to `sort(x)` alone.

use crate::types::{FilterField, SortOption};
use hearth_core::Track;
use std::cmp::Ordering;

/// Derive the display list
///
/// Empty (or whitespace-only) `search_text` keeps every track; otherwise a
/// track is kept when `field` contains the text, ignoring case. The kept tracks
/// are sorted by `sort`.
pub fn derive_display_list(
    source: &[Track],
    field: FilterField,
    search_text: &str,
    sort: SortOption,
) -> Vec<Track> {
    let needle = search_text.trim().to_lowercase();

    let mut tracks: Vec<Track> = if needle.is_empty() {
        source.to_vec()
    } else {
        source
            .iter()
            .filter(|track| matches_field(track, field, &needle))
            .cloned()
            .collect()
    };

    sort_tracks(&mut tracks, sort);
    tracks
}

/// Whether `field` of `track` contains the already-lowercased `needle`
///
/// Tracks lacking the field (no artist, no album) never match.
pub fn matches_field(track: &Track, field: FilterField, needle: &str) -> bool {
    let value = match field {
        FilterField::Title => Some(track.title.as_str()),
        FilterField::Artist => track.artist.as_deref(),
        FilterField::Album => track.album.as_deref(),
    };

    value.is_some_and(|v| v.to_lowercase().contains(needle))
}

/// Stable in-place sort
pub fn sort_tracks(tracks: &mut [Track], sort: SortOption) {
    tracks.sort_by(|a, b| compare(a, b, sort));
}

fn compare(a: &Track, b: &Track, sort: SortOption) -> Ordering {
    let primary = match sort {
        SortOption::TitleAscending => cmp_text(&a.title, &b.title),
        SortOption::TitleDescending => cmp_text(&b.title, &a.title),
        SortOption::ArtistAscending => cmp_optional_text(a.artist.as_deref(), b.artist.as_deref())
            .then_with(|| cmp_text(&a.title, &b.title)),
        SortOption::Folder => {
            cmp_text(a.folder(), b.folder()).then_with(|| cmp_text(&a.title, &b.title))
        }
        // Newest first, undated last
        SortOption::RecentlyAdded => match (a.added_at, b.added_at) {
            (Some(x), Some(y)) => y.cmp(&x),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        }
        .then_with(|| cmp_text(&a.title, &b.title)),
    };

    primary.then_with(|| a.id.cmp(&b.id))
}

fn cmp_text(a: &str, b: &str) -> Ordering {
    a.to_lowercase().cmp(&b.to_lowercase())
}

// Missing values sort after present ones
fn cmp_optional_text(a: Option<&str>, b: Option<&str>) -> Ordering {
    match (a, b) {
        (Some(x), Some(y)) => cmp_text(x, y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}
