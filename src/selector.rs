use log::debug;

use crate::clients::{
    entities::Track,
    errors::{Error, Result},
};
use crate::random::RandomSource;

// Rejection sampling draws at most this many candidates per track before
// falling back to a linear scan
pub const MAX_ATTEMPTS_PER_TRACK: usize = 4;

/// Track picked for a request along with its position in the playlist.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Selection<'a> {
    pub index: usize,
    pub track: &'a Track,
}

/// Picks a selectable track by rejection sampling over `tracks`.
///
/// Candidates are drawn as `floor(r * len)`, the same formula the browser
/// uses, so a seeded source yields the same index on both sides. Sampling is
/// bounded. Once the bound is hit the first selectable track wins, and a list
/// without any selectable track fails with
/// [`Error::SelectionExhaustedError`] instead of spinning forever.
pub fn select_track<'a>(tracks: &'a [Track], rng: &mut RandomSource) -> Result<Selection<'a>> {
    if tracks.is_empty() {
        return Err(Error::NotFoundError);
    }

    let max_attempts = tracks.len().saturating_mul(MAX_ATTEMPTS_PER_TRACK);
    for attempt in 1..=max_attempts {
        let index = draw_index(rng.next_f64(), tracks.len());
        let track = &tracks[index];
        if track.is_selectable() {
            debug!("Selected track {index} ({:?}) after {attempt} draws", track.title);
            return Ok(Selection { index, track });
        }
    }

    debug!("Sampling gave up after {max_attempts} draws, scanning linearly");
    tracks
        .iter()
        .enumerate()
        .find(|(_, track)| track.is_selectable())
        .map(|(index, track)| Selection { index, track })
        .ok_or(Error::SelectionExhaustedError)
}

#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_precision_loss,
    clippy::cast_sign_loss
)]
fn draw_index(r: f64, len: usize) -> usize {
    let index = (r * len as f64).floor() as usize;
    index.min(len - 1)
}
