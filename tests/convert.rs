use std::path::PathBuf;

use veloconv::data_types::irap::IrapRecord;
use veloconv::processors::{points_to_segments, segments_to_points, ConvertParams};
use veloconv::util::wkt;
use veloconv::App;

fn survey_point(id: i64, lat: f64, lon: f64) -> IrapRecord {
    IrapRecord {
        id,
        road_survey_date: "5.6.2021".to_string(),
        latitude: lat,
        longitude: lon,
        length: 0.05,
        speed_limit: 9,
        bicycle_facility: 4,
        vehicle_flow_aadt: 800,
        pedestrian_crossing_inspected_road: 7,
        intersection_type: 12,
        coder_name: "surveyor".to_string(),
        ..Default::default()
    }
}

fn straight_track(n: usize) -> Vec<IrapRecord> {
    // ~50 m steps heading north
    (0..n)
        .map(|i| survey_point(i as i64 + 1, 47.0 + 0.00045 * i as f64, 19.0))
        .collect()
}

#[test]
fn forward_then_backward_preserves_the_endpoints() {
    let params = ConvertParams::default();
    let track = straight_track(60);

    let first = (track[0].longitude, track[0].latitude);
    let last = (
        track[track.len() - 1].longitude,
        track[track.len() - 1].latitude,
    );

    let segments = points_to_segments(track, &params).unwrap();
    assert!(!segments.minor_sections.is_empty());

    let points = segments_to_points(segments.minor_sections, &params)
        .unwrap()
        .points;
    assert!(points.len() >= 2);

    let eps = 1e-9;
    assert!((points[0].longitude - first.0).abs() < eps);
    assert!((points[0].latitude - first.1).abs() < eps);
    let tail = points.last().unwrap();
    assert!((tail.longitude - last.0).abs() < eps);
    assert!((tail.latitude - last.1).abs() < eps);
}

#[test]
fn segment_geometries_chain_without_gaps() {
    let mut track = straight_track(80);
    for (i, p) in track.iter_mut().enumerate() {
        if i >= 30 {
            p.speed_limit = 17;
        }
        if i >= 55 {
            p.speed_limit = 25;
        }
    }

    let segments = points_to_segments(track, &ConvertParams::default()).unwrap();
    assert!(segments.minor_sections.len() >= 2);

    for pair in segments.minor_sections.windows(2) {
        let left = wkt::parse_linestring(&pair[0].geometry).unwrap();
        let right = wkt::parse_linestring(&pair[1].geometry).unwrap();
        assert_eq!(left.last().unwrap(), right.first().unwrap());
    }
}

#[test]
fn app_converts_an_irap_file_end_to_end() {
    let dir = std::env::temp_dir().join(format!("veloconv_it_{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    let input = dir.join("survey.csv");

    let mut content = String::from(
        "Road Survey Date;Latitude;Longitude;Distance;Length;Speed Limit;Bicycle Facility;\
Skid Resistance / Grip;Number Of Lanes;Lane Width;Road Condition;Median Type;\
Carriageway Label;Vehicle Flow (AADT);Bicyclist Peak Hourly Flow;\
Pedestrian Observed Flow Along The Road Passenger Side;\
Pedestrian Crossing - Inspected Road;Intersection Type;Image Reference;Road Name;Section;Comments;Coder Name\n",
    );
    for i in 0..20 {
        content.push_str(&format!(
            "5.6.2021;{};19.0;{};0.05;9;4;2;2;3.5;1;1;1;800;10;5;7;12;img{}.jpg;Nagy utca;1;;surveyor\n",
            47.0 + 0.00045 * i as f64,
            0.05 * i as f64,
            i
        ));
    }
    std::fs::write(&input, content).unwrap();

    let app = App::new(ConvertParams::default()).unwrap();
    let outcome = app.convert_file(&input).unwrap();

    let expected: Vec<PathBuf> = ["surveys.csv", "minor_sections.csv", "survey_points_crossing_or_obstacle.csv"]
        .iter()
        .map(|n| dir.join(n))
        .collect();
    assert_eq!(outcome.written, expected);
    for path in &expected {
        assert!(path.exists());
    }

    // The generated minor sections file feeds straight back into the tool
    let back = app.convert_file(&dir.join("minor_sections.csv")).unwrap();
    assert_eq!(back.written, vec![dir.join("irap.csv")]);

    std::fs::remove_dir_all(&dir).unwrap();
}
