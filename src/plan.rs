//! Synthetic training plan generation
//!
//! Builds segment sequences from a target distance or duration alone, with
//! no recorded sensor data. Three fixed shapes exist: a progressive ramp, a
//! fartlek alternation, and a hill repeat cycle. Every synthetic segment
//! runs through the same style classifier as recorded ones.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::error::{Result, RunbeatError};
use crate::models::{PlanKind, PlanRequest, PlanTarget, Segment, TrainingPlanOption};
use crate::style::determine_music_style;

/// Assumed average pace for converting between target distance and duration
pub const ASSUMED_PACE_MIN_PER_KM: Decimal = dec!(6);

/// Progressive ramp endpoints, seconds per kilometer
const PROGRESSIVE_START_PACE: Decimal = dec!(480); // 8:00 min/km
const PROGRESSIVE_END_PACE: Decimal = dec!(300); // 5:00 min/km

/// Fartlek paces: every third segment is fast
const FARTLEK_FAST_PACE: Decimal = dec!(330); // 5:30 min/km
const FARTLEK_EASY_PACE: Decimal = dec!(450); // 7:30 min/km

/// Hill cycle: two segments up, one down, one flat
const HILL_UP_PACE: Decimal = dec!(450);
const HILL_UP_ELEVATION: Decimal = dec!(30);
const HILL_DOWN_PACE: Decimal = dec!(330);
const HILL_DOWN_ELEVATION: Decimal = dec!(-20);
const HILL_FLAT_PACE: Decimal = dec!(360);

/// Synthetic plan generator
pub struct PlanSynthesizer;

impl PlanSynthesizer {
    /// Produce all three plan shapes for one request. The request's value is
    /// kilometers for a distance target, minutes for a duration target; the
    /// missing dimension is derived at the assumed 6 min/km pace.
    pub fn plan_options(request: &PlanRequest) -> Result<Vec<TrainingPlanOption>> {
        Self::validate(request)?;

        let (distance_km, duration_minutes) = match request.target {
            PlanTarget::Distance => (request.value, request.value * ASSUMED_PACE_MIN_PER_KM),
            PlanTarget::Duration => (request.value / ASSUMED_PACE_MIN_PER_KM, request.value),
        };

        Ok([PlanKind::Progressive, PlanKind::Fartlek, PlanKind::Hills]
            .into_iter()
            .map(|kind| Self::synthesize(kind, distance_km, duration_minutes, request.target))
            .collect())
    }

    fn validate(request: &PlanRequest) -> Result<()> {
        if request.value <= dec!(0) {
            return Err(RunbeatError::Validation(
                "plan target value must be positive".to_string(),
            ));
        }
        Ok(())
    }

    /// Build one plan shape over the given distance. Deterministic and
    /// index-driven; calling twice yields identical sequences.
    pub fn synthesize(
        kind: PlanKind,
        distance_km: Decimal,
        duration_minutes: Decimal,
        target: PlanTarget,
    ) -> TrainingPlanOption {
        let segment_count = Self::segment_count(distance_km);
        let segment_distance = distance_km / Decimal::from(segment_count as u64);

        let segments = (0..segment_count)
            .map(|i| {
                let (pace, elevation) = Self::pattern_at(kind, i, segment_count);
                let style = determine_music_style(pace, elevation);
                Segment {
                    segment_index: i,
                    start_km: Decimal::from(i as u64) * segment_distance,
                    end_km: Decimal::from(i as u64 + 1) * segment_distance,
                    distance_km: segment_distance,
                    pace_seconds_per_km: pace,
                    elevation_delta_meters: elevation,
                    duration_seconds: None,
                    start_lat: None,
                    start_lng: None,
                    genre: style.genre,
                    tempo_bpm: style.tempo_bpm,
                }
            })
            .collect();

        TrainingPlanOption {
            id: kind,
            name: kind.display_name().to_string(),
            description: Self::description(kind, distance_km, duration_minutes, target),
            segments,
        }
    }

    /// Pace (s/km) and elevation delta (m) for segment `i` of each shape
    fn pattern_at(kind: PlanKind, i: usize, segment_count: usize) -> (Decimal, Decimal) {
        match kind {
            PlanKind::Progressive => {
                // Linear ramp from the slow start pace to the fast finish
                let progress = Decimal::from(i as u64) / Decimal::from(segment_count as u64);
                let pace = PROGRESSIVE_START_PACE
                    - progress * (PROGRESSIVE_START_PACE - PROGRESSIVE_END_PACE);
                (pace, dec!(0))
            }
            PlanKind::Fartlek => {
                let pace = if i % 3 == 0 {
                    FARTLEK_FAST_PACE
                } else {
                    FARTLEK_EASY_PACE
                };
                (pace, dec!(0))
            }
            PlanKind::Hills => match i % 4 {
                0 | 1 => (HILL_UP_PACE, HILL_UP_ELEVATION),
                2 => (HILL_DOWN_PACE, HILL_DOWN_ELEVATION),
                _ => (HILL_FLAT_PACE, dec!(0)),
            },
        }
    }

    /// ~2 uniform segments per kilometer, at least one
    fn segment_count(distance_km: Decimal) -> usize {
        (distance_km * dec!(2))
            .ceil()
            .to_usize()
            .unwrap_or(1)
            .max(1)
    }

    fn description(
        kind: PlanKind,
        distance_km: Decimal,
        duration_minutes: Decimal,
        target: PlanTarget,
    ) -> String {
        let extent = match target {
            PlanTarget::Distance => format!("{}km", distance_km.normalize()),
            PlanTarget::Duration => format!("{} minutes", duration_minutes.normalize()),
        };
        match kind {
            PlanKind::Progressive => {
                format!("Start easy and gradually increase pace over {}", extent)
            }
            PlanKind::Fartlek => format!("Mix of fast and easy segments for {}", extent),
            PlanKind::Hills => match target {
                PlanTarget::Distance => format!("Simulated hill intervals over {}", extent),
                PlanTarget::Duration => format!("Simulated hill intervals for {}", extent),
            },
        }
    }
}
