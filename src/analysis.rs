//! Activity analysis: segmentation of recorded runs
//!
//! Converts one activity's totals plus whatever detail the data source could
//! provide into an ordered segment sequence with music style annotations.
//! Three data-availability tiers exist, selected by what the caller supplies
//! rather than an explicit mode flag: sample streams (richest), per-kilometer
//! splits, or nothing but the totals.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::error::{ComputationError, Result, RunbeatError};
use crate::models::{
    ActivitySummary, AggregateStats, RunAnalysis, Segment, SplitSummary, StreamKind, StreamSet,
};
use crate::style::determine_music_style;

/// Base of the stream-tier segment count heuristic
pub const SEGMENT_COUNT_BASE: f64 = 8.0;

/// Logarithmic coefficient of the stream-tier segment count heuristic.
/// Canonical value; a 1.0 variant existed historically and is superseded.
pub const SEGMENT_COUNT_LOG_COEFF: f64 = 5.0;

/// Segments per kilometer in the split and totals tiers
pub const SEGMENTS_PER_KM: Decimal = dec!(2);

/// Main activity analysis entry point
pub struct ActivityAnalyzer;

impl ActivityAnalyzer {
    /// Analyze one recorded run. Streams win over splits when both are
    /// present; with neither, every segment falls back to the overall
    /// average pace and zero elevation (a documented degraded mode, not an
    /// error mask).
    pub fn analyze(
        activity: &ActivitySummary,
        streams: Option<&StreamSet>,
        splits: Option<&[SplitSummary]>,
    ) -> Result<RunAnalysis> {
        Self::validate(activity)?;

        let segments = match (streams, splits) {
            (Some(set), _) if !set.is_empty() => Self::segment_from_streams(activity, set)?,
            (_, Some(splits)) if !splits.is_empty() => Self::segment_from_splits(activity, splits)?,
            _ => Self::segment_from_totals(activity)?,
        };

        Ok(RunAnalysis {
            segments,
            overall: Self::aggregate_stats(activity),
            polyline: activity.encoded_polyline.clone(),
        })
    }

    /// Reject missing or non-positive totals before any computation
    fn validate(activity: &ActivitySummary) -> Result<()> {
        if activity.moving_duration_seconds == 0 {
            return Err(RunbeatError::Validation(
                "activity moving time must be positive".to_string(),
            ));
        }
        if activity.distance_meters <= dec!(0) {
            return Err(RunbeatError::Validation(
                "activity distance must be positive".to_string(),
            ));
        }
        Ok(())
    }

    /// Whole-run statistics from the summary totals, independent of
    /// segmentation
    pub fn aggregate_stats(activity: &ActivitySummary) -> AggregateStats {
        let distance_km = activity.distance_meters / dec!(1000);
        AggregateStats {
            average_pace_seconds_per_km: Decimal::from(activity.moving_duration_seconds)
                / distance_km,
            total_elevation_gain_meters: activity.total_elevation_gain_meters,
            duration_seconds: activity.moving_duration_seconds,
            distance_meters: distance_km * dec!(1000),
        }
    }

    /// Stream tier: segment count from a logarithmic heuristic over an
    /// effective size combining distance and duration; per-segment values
    /// from cumulative stream deltas over index spans. The final partial
    /// segment is dropped by design, an accepted approximation.
    fn segment_from_streams(
        activity: &ActivitySummary,
        streams: &StreamSet,
    ) -> Result<Vec<Segment>> {
        let distance_stream = streams.scalar(StreamKind::Distance).ok_or_else(|| {
            RunbeatError::Validation("cumulative distance stream is required".to_string())
        })?;
        let altitude_stream = streams.scalar(StreamKind::Altitude).ok_or_else(|| {
            RunbeatError::Validation("cumulative altitude stream is required".to_string())
        })?;

        let total_samples = distance_stream.len();
        if total_samples == 0 {
            return Err(ComputationError::EmptyStream {
                stream: "distance".to_string(),
            }
            .into());
        }
        if altitude_stream.len() != total_samples {
            return Err(ComputationError::MismatchedStreams {
                stream: "altitude".to_string(),
                expected: total_samples,
                actual: altitude_stream.len(),
            }
            .into());
        }
        let coordinates = streams.latlng();
        if let Some(points) = coordinates {
            if points.len() != total_samples {
                return Err(ComputationError::MismatchedStreams {
                    stream: "latlng".to_string(),
                    expected: total_samples,
                    actual: points.len(),
                }
                .into());
            }
        }

        let duration = Decimal::from(activity.moving_duration_seconds);
        let segment_count = Self::stream_segment_count(activity);

        let mut segments = Vec::with_capacity(segment_count.saturating_sub(1));
        for i in 0..segment_count - 1 {
            let start_index = i * total_samples / segment_count;
            let end_index = ((i + 1) * total_samples / segment_count).min(total_samples - 1);

            let span_fraction =
                Decimal::from(end_index - start_index) / Decimal::from(total_samples);
            let segment_duration = span_fraction * duration;
            let segment_distance_km =
                (distance_stream[end_index] - distance_stream[start_index]) / dec!(1000);

            if segment_distance_km <= dec!(0) {
                return Err(ComputationError::DivisionByZero {
                    calculation: "stream segment pace".to_string(),
                }
                .into());
            }

            let pace = segment_duration / segment_distance_km;
            let elevation_delta = altitude_stream[end_index] - altitude_stream[start_index];
            let style = determine_music_style(pace, elevation_delta);
            let start_point = coordinates.map(|points| points[start_index]);

            segments.push(Segment {
                segment_index: i,
                start_km: distance_stream[start_index] / dec!(1000),
                end_km: distance_stream[end_index] / dec!(1000),
                distance_km: segment_distance_km,
                pace_seconds_per_km: pace,
                elevation_delta_meters: elevation_delta,
                duration_seconds: Some(segment_duration),
                start_lat: start_point.map(|(lat, _)| lat),
                start_lng: start_point.map(|(_, lng)| lng),
                genre: style.genre,
                tempo_bpm: style.tempo_bpm,
            });
        }

        Ok(segments)
    }

    /// Stream-tier segment count: `ceil(base + coeff * ln(effective_size))`
    /// where effective size blends distance (km) and duration (s / 10)
    fn stream_segment_count(activity: &ActivitySummary) -> usize {
        let distance_km = (activity.distance_meters / dec!(1000))
            .to_f64()
            .unwrap_or(0.0);
        let effective_size = distance_km + f64::from(activity.moving_duration_seconds) / 10.0;
        let count = (SEGMENT_COUNT_BASE + SEGMENT_COUNT_LOG_COEFF * effective_size.ln()).ceil();
        // At least two, so dropping the final partial segment leaves one
        (count as usize).max(2)
    }

    /// Split tier: one fixed-width segment per half kilometer, each mapped
    /// onto the split it falls into
    fn segment_from_splits(
        activity: &ActivitySummary,
        splits: &[SplitSummary],
    ) -> Result<Vec<Segment>> {
        let distance_km = activity.distance_meters / dec!(1000);
        let segment_count = Self::distance_segment_count(distance_km)?;
        let segment_distance = distance_km / Decimal::from(segment_count as u64);
        let overall_pace = Decimal::from(activity.moving_duration_seconds) / distance_km;

        let mut segments = Vec::with_capacity(segment_count);
        for i in 0..segment_count {
            let split_index = (i * splits.len() / segment_count).min(splits.len() - 1);
            let split = &splits[split_index];

            let pace = if split.average_speed_meters_per_second > dec!(0) {
                dec!(1000) / split.average_speed_meters_per_second
            } else {
                overall_pace
            };
            let elevation_delta = split.elevation_difference_meters.unwrap_or_default();
            let style = determine_music_style(pace, elevation_delta);

            segments.push(Segment {
                segment_index: i,
                start_km: Decimal::from(i as u64) * segment_distance,
                end_km: Decimal::from(i as u64 + 1) * segment_distance,
                distance_km: segment_distance,
                pace_seconds_per_km: pace,
                elevation_delta_meters: elevation_delta,
                duration_seconds: None,
                start_lat: None,
                start_lng: None,
                genre: style.genre,
                tempo_bpm: style.tempo_bpm,
            });
        }

        Ok(segments)
    }

    /// Totals tier: uniform segments, every one at the overall average pace
    /// with zero elevation
    fn segment_from_totals(activity: &ActivitySummary) -> Result<Vec<Segment>> {
        let distance_km = activity.distance_meters / dec!(1000);
        let segment_count = Self::distance_segment_count(distance_km)?;
        let segment_distance = distance_km / Decimal::from(segment_count as u64);
        let pace = Decimal::from(activity.moving_duration_seconds) / distance_km;
        let style = determine_music_style(pace, dec!(0));

        let segments = (0..segment_count)
            .map(|i| Segment {
                segment_index: i,
                start_km: Decimal::from(i as u64) * segment_distance,
                end_km: Decimal::from(i as u64 + 1) * segment_distance,
                distance_km: segment_distance,
                pace_seconds_per_km: pace,
                elevation_delta_meters: dec!(0),
                duration_seconds: None,
                start_lat: None,
                start_lng: None,
                genre: style.genre,
                tempo_bpm: style.tempo_bpm,
            })
            .collect();

        Ok(segments)
    }

    /// `ceil(distance_km * 2)` shared by the split and totals tiers
    fn distance_segment_count(distance_km: Decimal) -> Result<usize> {
        (distance_km * SEGMENTS_PER_KM)
            .ceil()
            .to_usize()
            .filter(|count| *count > 0)
            .ok_or_else(|| {
                ComputationError::InvalidParameter {
                    calculation: "segment count".to_string(),
                    parameter: "distance_km".to_string(),
                    value: distance_km.to_string(),
                }
                .into()
            })
    }
}
