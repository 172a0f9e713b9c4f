use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Summary totals for one recorded run, as delivered by the activity data
/// source. The encoded polyline is opaque route geometry and is passed
/// through to the rendering layer untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActivitySummary {
    /// Display name of the activity
    pub name: Option<String>,

    /// Start time of the recording
    pub start_date: Option<DateTime<Utc>>,

    /// Moving time in seconds (must be > 0)
    pub moving_duration_seconds: u32,

    /// Total distance in meters (must be > 0)
    pub distance_meters: Decimal,

    /// Total elevation gain in meters
    #[serde(default)]
    pub total_elevation_gain_meters: Decimal,

    /// Encoded route polyline, never decoded by this crate
    pub encoded_polyline: Option<String>,
}

/// Stream type tags recognized by the analyzer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StreamKind {
    Distance,
    Altitude,
    Velocity,
    Latlng,
}

/// Sample payload of one stream. Scalar streams carry cumulative values
/// (distance in meters, altitude in meters); the latlng stream carries
/// `[lat, lng]` pairs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StreamData {
    Scalar(Vec<Decimal>),
    LatLng(Vec<(f64, f64)>),
}

impl StreamData {
    pub fn len(&self) -> usize {
        match self {
            StreamData::Scalar(values) => values.len(),
            StreamData::LatLng(points) => points.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// One named time series over a recording. Index 0 is the run's start,
/// index N-1 its end; all streams of one activity share the sample count.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SampleStream {
    #[serde(rename = "type")]
    pub kind: StreamKind,
    pub data: StreamData,
}

/// Keyed collection of sample streams for one activity
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StreamSet {
    streams: HashMap<StreamKind, SampleStream>,
}

impl StreamSet {
    pub fn new(streams: Vec<SampleStream>) -> Self {
        let streams = streams
            .into_iter()
            .map(|stream| (stream.kind, stream))
            .collect();
        Self { streams }
    }

    pub fn get(&self, kind: StreamKind) -> Option<&SampleStream> {
        self.streams.get(&kind)
    }

    /// Scalar samples for the given stream type, if present
    pub fn scalar(&self, kind: StreamKind) -> Option<&[Decimal]> {
        match self.streams.get(&kind) {
            Some(SampleStream {
                data: StreamData::Scalar(values),
                ..
            }) => Some(values),
            _ => None,
        }
    }

    /// Coordinate pairs of the latlng stream, if present
    pub fn latlng(&self) -> Option<&[(f64, f64)]> {
        match self.streams.get(&StreamKind::Latlng) {
            Some(SampleStream {
                data: StreamData::LatLng(points),
                ..
            }) => Some(points),
            _ => None,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.streams.is_empty()
    }

    pub fn len(&self) -> usize {
        self.streams.len()
    }
}

/// Per-kilometer split record, the coarser alternative to sample streams
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SplitSummary {
    /// Average speed over the split in meters per second
    pub average_speed_meters_per_second: Decimal,

    /// Net elevation change over the split in meters
    pub elevation_difference_meters: Option<Decimal>,
}

/// Music genre tag, derived solely from elevation delta
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Genre {
    Rock,
    Electronic,
    Pop,
}

impl std::fmt::Display for Genre {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Genre::Rock => "rock",
            Genre::Electronic => "electronic",
            Genre::Pop => "pop",
        };
        write!(f, "{}", name)
    }
}

/// Music style recommendation for one segment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MusicStyle {
    pub genre: Genre,
    pub tempo_bpm: u16,
}

/// One contiguous portion of a run or plan, annotated with pace, elevation
/// delta, and a music style. Segments form an ordered, route-order sequence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    /// 0-based position within the sequence
    pub segment_index: usize,

    /// Cumulative distance at segment start, in kilometers
    pub start_km: Decimal,

    /// Cumulative distance at segment end, in kilometers
    pub end_km: Decimal,

    /// Segment length in kilometers (always > 0)
    pub distance_km: Decimal,

    /// Pace in seconds per kilometer
    pub pace_seconds_per_km: Decimal,

    /// Net elevation change over the segment in meters
    pub elevation_delta_meters: Decimal,

    /// Segment duration in seconds; only the stream-based analysis knows this
    pub duration_seconds: Option<Decimal>,

    /// Coordinates of the segment start, when a latlng stream was supplied
    pub start_lat: Option<f64>,
    pub start_lng: Option<f64>,

    pub genre: Genre,
    pub tempo_bpm: u16,
}

/// Whole-run statistics, derived from the summary totals and independent of
/// how the run was segmented
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregateStats {
    pub average_pace_seconds_per_km: Decimal,
    pub total_elevation_gain_meters: Decimal,
    pub duration_seconds: u32,
    pub distance_meters: Decimal,
}

/// Result of analyzing one recorded activity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunAnalysis {
    pub segments: Vec<Segment>,
    pub overall: AggregateStats,

    /// Opaque route geometry for the map rendering collaborator
    pub polyline: Option<String>,
}

/// Complete input package from the activity data source: summary totals plus
/// optional streams or splits
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActivityData {
    pub activity: ActivitySummary,
    pub streams: Option<Vec<SampleStream>>,
    pub splits: Option<Vec<SplitSummary>>,
}

/// The three canned training-plan shapes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlanKind {
    Progressive,
    Fartlek,
    Hills,
}

impl PlanKind {
    pub fn from_str(s: &str) -> anyhow::Result<Self> {
        match s.to_lowercase().as_str() {
            "progressive" => Ok(Self::Progressive),
            "fartlek" => Ok(Self::Fartlek),
            "hills" | "hill" => Ok(Self::Hills),
            _ => anyhow::bail!("Unknown plan kind: {}", s),
        }
    }

    pub fn id(&self) -> &'static str {
        match self {
            Self::Progressive => "progressive",
            Self::Fartlek => "fartlek",
            Self::Hills => "hills",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Progressive => "Progressive Run",
            Self::Fartlek => "Fartlek Training",
            Self::Hills => "Hill Training",
        }
    }
}

/// Whether a plan request targets a distance or a duration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlanTarget {
    Distance,
    Duration,
}

/// Caller-facing plan request: a target kind plus its value
/// (kilometers for distance, minutes for duration)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanRequest {
    #[serde(rename = "type")]
    pub target: PlanTarget,
    pub value: Decimal,
}

/// One synthetic plan shape with its segment sequence
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingPlanOption {
    pub id: PlanKind,
    pub name: String,
    pub description: String,
    pub segments: Vec<Segment>,
}
