use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use runbeat::analysis::ActivityAnalyzer;
use runbeat::models::{
    ActivityData, ActivitySummary, Genre, PlanKind, PlanRequest, PlanTarget, SampleStream,
    SplitSummary, StreamData, StreamKind, StreamSet,
};
use runbeat::plan::PlanSynthesizer;
use runbeat::playlist::clip_requests;
use runbeat::style::determine_music_style;
use runbeat::RunbeatError;

/// Integration tests that exercise the complete analysis and planning flows

fn summary(duration_seconds: u32, distance_meters: Decimal) -> ActivitySummary {
    ActivitySummary {
        name: Some("Evening 10k".to_string()),
        start_date: None,
        moving_duration_seconds: duration_seconds,
        distance_meters,
        total_elevation_gain_meters: dec!(120),
        encoded_polyline: Some("_p~iF~ps|U_ulLnnqC".to_string()),
    }
}

/// Streams for a steady 10 km in 3000 s: flat first half, climbing second
fn recorded_streams(samples: usize) -> StreamSet {
    let mut distance = Vec::with_capacity(samples);
    let mut altitude = Vec::with_capacity(samples);
    for i in 0..samples {
        let fraction = Decimal::from(i as u64) / Decimal::from(samples as u64 - 1);
        distance.push(fraction * dec!(10000));
        let alt = if i < samples / 2 {
            dec!(250)
        } else {
            dec!(250) + Decimal::from((i - samples / 2) as u64) * dec!(2)
        };
        altitude.push(alt);
    }
    StreamSet::new(vec![
        SampleStream {
            kind: StreamKind::Distance,
            data: StreamData::Scalar(distance),
        },
        SampleStream {
            kind: StreamKind::Altitude,
            data: StreamData::Scalar(altitude),
        },
    ])
}

#[test]
fn test_classifier_boundary_at_four_minutes_per_km() {
    // Exactly 4.0 min/km uses the next tier down, not the sub-4 one
    let style = determine_music_style(dec!(4.0) * dec!(60), dec!(0));
    assert_eq!(style.tempo_bpm, 160);
}

#[test]
fn test_classifier_elevation_boundary_is_strict() {
    assert_eq!(determine_music_style(dec!(360), dec!(20)).genre, Genre::Pop);
    assert_eq!(
        determine_music_style(dec!(360), dec!(20.01)).genre,
        Genre::Rock
    );
}

#[test]
fn test_totals_only_analysis_workflow() {
    // 10 km in 3000 s with no detail data: 20 segments, all at 300 s/km
    let analysis = ActivityAnalyzer::analyze(&summary(3000, dec!(10000)), None, None).unwrap();

    assert_eq!(analysis.segments.len(), 20);
    for segment in &analysis.segments {
        assert_eq!(segment.pace_seconds_per_km, dec!(300));
        assert_eq!(segment.elevation_delta_meters, dec!(0));
    }
    assert_eq!(analysis.overall.distance_meters, dec!(10000));
    assert_eq!(analysis.overall.average_pace_seconds_per_km, dec!(300));
}

#[test]
fn test_stream_analysis_to_playlist_workflow() {
    let streams = recorded_streams(900);
    let analysis =
        ActivityAnalyzer::analyze(&summary(3000, dec!(10000)), Some(&streams), None).unwrap();

    // Polyline passes through for the map collaborator, untouched
    assert_eq!(analysis.polyline.as_deref(), Some("_p~iF~ps|U_ulLnnqC"));

    // Every segment carries a positive distance and a classified style
    assert!(!analysis.segments.is_empty());
    for segment in &analysis.segments {
        assert!(segment.distance_km > dec!(0));
        assert!(segment.pace_seconds_per_km > dec!(0));
        assert!(segment.tempo_bpm >= 90 && segment.tempo_bpm <= 170);
    }

    // The flat first half stays pop, the climb turns rock somewhere
    assert_eq!(analysis.segments[0].genre, Genre::Pop);
    assert!(analysis.segments.iter().any(|s| s.genre == Genre::Rock));

    // The playlist layer requests at most one clip per (pace, genre) pair
    let clips = clip_requests(&analysis.segments);
    assert!(!clips.is_empty());
    assert!(clips.len() <= analysis.segments.len());
    for clip in &clips {
        assert!(clip.prompt.contains("BPM"));
    }
}

#[test]
fn test_mismatched_streams_fail_without_partial_result() {
    let streams = StreamSet::new(vec![
        SampleStream {
            kind: StreamKind::Distance,
            data: StreamData::Scalar(vec![dec!(0), dec!(5000), dec!(10000)]),
        },
        SampleStream {
            kind: StreamKind::Altitude,
            data: StreamData::Scalar(vec![dec!(250)]),
        },
    ]);
    let result = ActivityAnalyzer::analyze(&summary(3000, dec!(10000)), Some(&streams), None);
    assert!(matches!(result, Err(RunbeatError::Computation(_))));
}

#[test]
fn test_split_analysis_workflow() {
    let splits: Vec<SplitSummary> = (0..10)
        .map(|_| SplitSummary {
            average_speed_meters_per_second: dec!(3.2),
            elevation_difference_meters: Some(dec!(25)),
        })
        .collect();
    let analysis =
        ActivityAnalyzer::analyze(&summary(3000, dec!(10000)), None, Some(&splits)).unwrap();

    assert_eq!(analysis.segments.len(), 20);
    for segment in &analysis.segments {
        assert_eq!(segment.pace_seconds_per_km, dec!(1000) / dec!(3.2));
        // +25 m per split is strictly uphill
        assert_eq!(segment.genre, Genre::Rock);
    }
}

#[test]
fn test_plan_synthesis_is_deterministic() {
    let request = PlanRequest {
        target: PlanTarget::Distance,
        value: dec!(5),
    };
    let first = PlanSynthesizer::plan_options(&request).unwrap();
    let second = PlanSynthesizer::plan_options(&request).unwrap();
    assert_eq!(first, second);

    let progressive = &first[0];
    assert_eq!(progressive.id, PlanKind::Progressive);
    assert_eq!(progressive.segments.len(), 10);
    assert_eq!(progressive.segments[0].pace_seconds_per_km, dec!(480));
    // Last segment within one ramp step of the 300 s/km target
    let last = progressive.segments[9].pace_seconds_per_km;
    assert!(last >= dec!(300) && last <= dec!(318));
}

#[test]
fn test_fartlek_pattern_over_three_kilometers() {
    let request = PlanRequest {
        target: PlanTarget::Distance,
        value: dec!(3),
    };
    let options = PlanSynthesizer::plan_options(&request).unwrap();
    let fartlek = &options[1];
    assert_eq!(fartlek.id, PlanKind::Fartlek);
    assert_eq!(fartlek.segments.len(), 6);
    for (i, segment) in fartlek.segments.iter().enumerate() {
        let expected = if i % 3 == 0 { dec!(330) } else { dec!(450) };
        assert_eq!(segment.pace_seconds_per_km, expected);
    }
}

#[test]
fn test_hill_pattern_over_eight_segments() {
    let request = PlanRequest {
        target: PlanTarget::Distance,
        value: dec!(4),
    };
    let options = PlanSynthesizer::plan_options(&request).unwrap();
    let hills = &options[2];
    assert_eq!(hills.segments.len(), 8);
    for i in [0usize, 1, 4, 5] {
        assert_eq!(hills.segments[i].elevation_delta_meters, dec!(30));
        assert_eq!(hills.segments[i].pace_seconds_per_km, dec!(450));
    }
    for i in [2usize, 6] {
        assert_eq!(hills.segments[i].elevation_delta_meters, dec!(-20));
        assert_eq!(hills.segments[i].pace_seconds_per_km, dec!(330));
    }
    for i in [3usize, 7] {
        assert_eq!(hills.segments[i].elevation_delta_meters, dec!(0));
        assert_eq!(hills.segments[i].pace_seconds_per_km, dec!(360));
    }
}

#[test]
fn test_plan_request_validation() {
    for value in [dec!(0), dec!(-3)] {
        let request = PlanRequest {
            target: PlanTarget::Duration,
            value,
        };
        let result = PlanSynthesizer::plan_options(&request);
        assert!(matches!(result, Err(RunbeatError::Validation(_))));
    }
}

#[test]
fn test_plan_request_rejects_unknown_kind_tag() {
    let json = r#"{"type": "laps", "value": 5}"#;
    assert!(serde_json::from_str::<PlanRequest>(json).is_err());

    let json = r#"{"type": "distance", "value": 5}"#;
    let request: PlanRequest = serde_json::from_str(json).unwrap();
    assert_eq!(request.target, PlanTarget::Distance);
}

#[test]
fn test_activity_file_deserialization_end_to_end() {
    let json = r#"{
        "activity": {
            "name": "Lunch Run",
            "start_date": "2024-05-01T12:00:00Z",
            "moving_duration_seconds": 1500,
            "distance_meters": 5000,
            "total_elevation_gain_meters": 30,
            "encoded_polyline": null
        },
        "streams": null,
        "splits": [
            {"average_speed_meters_per_second": 3.3, "elevation_difference_meters": 5},
            {"average_speed_meters_per_second": 3.4, "elevation_difference_meters": -5},
            {"average_speed_meters_per_second": 3.3, "elevation_difference_meters": null},
            {"average_speed_meters_per_second": 3.5, "elevation_difference_meters": 10},
            {"average_speed_meters_per_second": 3.2, "elevation_difference_meters": 20}
        ]
    }"#;
    let data: ActivityData = serde_json::from_str(json).unwrap();
    let streams = data.streams.map(StreamSet::new);
    let analysis =
        ActivityAnalyzer::analyze(&data.activity, streams.as_ref(), data.splits.as_deref())
            .unwrap();

    assert_eq!(analysis.segments.len(), 10);
    // Missing split elevation defaults to flat
    assert_eq!(analysis.segments[4].elevation_delta_meters, dec!(0));
    assert_eq!(analysis.overall.duration_seconds, 1500);
}
