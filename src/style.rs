//! Music style classification
//!
//! Maps a segment's pace and elevation delta to a (genre, tempo) pair. The
//! two axes never interact: tempo is a function of pace alone, genre a
//! function of elevation alone. The mapping is total and deterministic for
//! any finite input; callers must not pass NaN or infinity.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::models::{Genre, MusicStyle};

/// Tempo ladder over pace in minutes per kilometer. Each row is the
/// exclusive upper bound of a bracket and the BPM it maps to; anything at or
/// beyond the last bound falls through to [`TEMPO_FLOOR_BPM`].
const TEMPO_LADDER: [(Decimal, u16); 8] = [
    (dec!(4.0), 170),
    (dec!(4.5), 160),
    (dec!(5.0), 150),
    (dec!(5.5), 140),
    (dec!(6.0), 130),
    (dec!(6.5), 120),
    (dec!(7.0), 110),
    (dec!(7.5), 100),
];

/// BPM for paces slower than the last ladder bound (7:30 min/km and up)
const TEMPO_FLOOR_BPM: u16 = 90;

/// Fallback BPM should a rounded tempo ever fail integer conversion
const DEFAULT_TEMPO_BPM: u16 = 120;

/// Elevation delta above which a segment counts as uphill (strict >)
pub const UPHILL_THRESHOLD_METERS: Decimal = dec!(20);

/// Elevation delta below which a segment counts as downhill (strict <)
pub const DOWNHILL_THRESHOLD_METERS: Decimal = dec!(-20);

/// Classify one segment: pace in seconds per kilometer, elevation delta in
/// meters, out comes the music style to request for it.
pub fn determine_music_style(
    pace_seconds_per_km: Decimal,
    elevation_delta_meters: Decimal,
) -> MusicStyle {
    MusicStyle {
        genre: genre_for_elevation(elevation_delta_meters),
        tempo_bpm: tempo_for_pace(pace_seconds_per_km),
    }
}

/// Tempo from pace alone, via the fixed threshold ladder
fn tempo_for_pace(pace_seconds_per_km: Decimal) -> u16 {
    let pace_min_per_km = pace_seconds_per_km / dec!(60);

    let tempo = TEMPO_LADDER
        .iter()
        .find(|(bound, _)| pace_min_per_km < *bound)
        .map(|(_, bpm)| Decimal::from(*bpm))
        .unwrap_or_else(|| Decimal::from(TEMPO_FLOOR_BPM));

    // The ladder already yields integers; the contract still requires
    // rounding so a future interpolated ladder cannot return fractions.
    tempo.round().to_u16().unwrap_or(DEFAULT_TEMPO_BPM)
}

/// Genre from elevation delta alone
fn genre_for_elevation(elevation_delta_meters: Decimal) -> Genre {
    if elevation_delta_meters > UPHILL_THRESHOLD_METERS {
        Genre::Rock
    } else if elevation_delta_meters < DOWNHILL_THRESHOLD_METERS {
        Genre::Electronic
    } else {
        Genre::Pop
    }
}
