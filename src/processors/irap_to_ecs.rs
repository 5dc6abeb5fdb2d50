use chrono::NaiveDate;

use crate::data_types::{
    ecs::{CrossingPointRecord, MinorSectionRecord, SurveyRecord},
    irap::IrapRecord,
};
use crate::logln;
use crate::processors::{
    attributes::AttributeDeriver, merge::SegmentMerger, rank::RankClassifier,
    vertices::VertexIdentifier, ConvertError, ConvertParams, EcsBundle,
};
use crate::util::{wkt, DateTimeUtils};

/// Sequences the iRAP→ECS passes end to end: ranking and crossing-point
/// extraction, vertex identification, the two merge passes, then assembly of
/// the survey, minor-section and crossing-point record sets.
pub struct IrapToEcsConverter {
    params: ConvertParams,
}

impl IrapToEcsConverter {
    const CC: &'static str = "IrapToEcs";

    pub fn new(params: ConvertParams) -> Result<Self, ConvertError> {
        params.validate()?;
        Ok(Self { params })
    }

    pub fn convert(&self, mut points: Vec<IrapRecord>) -> Result<EcsBundle, ConvertError> {
        if points.len() < 2 {
            return Err(ConvertError::NotEnoughPoints(points.len()));
        }

        logln!("converting {} survey points", points.len());

        let mut classifier = RankClassifier::new();
        let mut first_date: Option<NaiveDate> = None;
        let mut last_date: Option<NaiveDate> = None;
        let mut crossing_points: Vec<CrossingPointRecord> = Vec::new();

        for rec in points.iter_mut() {
            classifier.classify(rec);

            // Bad dates are skipped per record, not fatal
            if let Some(date) = DateTimeUtils::parse_survey_date(&rec.road_survey_date) {
                first_date = Some(first_date.map_or(date, |d| d.min(date)));
                last_date = Some(last_date.map_or(date, |d| d.max(date)));
            }

            if rec.pedestrian_crossing_inspected_road != 7 || rec.intersection_type != 12 {
                crossing_points.push(CrossingPointRecord {
                    id: crossing_points.len() as i64 + 1,
                    survey_id: self.params.survey_id,
                    minor_section_id: rec.id,
                    kilometre_section: rec.distance,
                    date: rec.road_survey_date.clone(),
                    log_position_lat: rec.latitude,
                    log_position_lon: rec.longitude,
                    comment: rec.comments.clone(),
                });
            }
        }

        VertexIdentifier::identify(&mut points, self.params.max_divergence);

        let merger = SegmentMerger::new(&self.params);
        merger.merge_zero_ranked(&mut points);
        merger.merge_short_segments(&mut points, &mut crossing_points);
        merger.recompute_distances(&mut points);

        let minor_sections: Vec<MinorSectionRecord> = points
            .iter()
            .map(|rec| self.build_minor_section(rec))
            .collect();
        let survey = self.build_survey(&points, &crossing_points, first_date, last_date);

        logln!(
            "produced {} minor sections and {} crossing points",
            minor_sections.len(),
            crossing_points.len()
        );

        Ok(EcsBundle {
            surveys: vec![survey],
            minor_sections,
            crossing_points,
        })
    }

    fn build_minor_section(&self, rec: &IrapRecord) -> MinorSectionRecord {
        let facility_type = AttributeDeriver::facility_type(rec);

        MinorSectionRecord {
            id: rec.new_id,
            survey_id: self.params.survey_id,
            index: rec.new_id,
            date: DateTimeUtils::parse_survey_date(&rec.road_survey_date)
                .map(DateTimeUtils::to_atom)
                .unwrap_or_default(),
            length: rec.length,
            i1_legal: AttributeDeriver::legal_value(rec).to_string(),
            i2_type: facility_type.to_string(),
            i2_direction: AttributeDeriver::direction(rec, facility_type).to_string(),
            i2_traffic_volume: rec.vehicle_flow_aadt,
            i2_traffic_speed: AttributeDeriver::speed_band(rec.speed_limit).to_string(),
            i2_traffic_category: AttributeDeriver::traffic_category(rec.vehicle_flow_aadt)
                .to_string(),
            i3_surface_type: AttributeDeriver::surface_type(rec).to_string(),
            comment: AttributeDeriver::comment(rec),
            log_position_y: rec.latitude,
            log_position_x: rec.longitude,
            geometry: wkt::format_linestring(&rec.latlong),
        }
    }

    fn build_survey(
        &self,
        points: &[IrapRecord],
        crossing_points: &[CrossingPointRecord],
        first_date: Option<NaiveDate>,
        last_date: Option<NaiveDate>,
    ) -> SurveyRecord {
        let last = points.last();

        SurveyRecord {
            id: self.params.survey_id,
            start_date: first_date.map(DateTimeUtils::to_atom).unwrap_or_default(),
            end_date: last_date.map(DateTimeUtils::to_atom).unwrap_or_default(),
            by: last.map(|p| p.coder_name.clone()).unwrap_or_default(),
            device: "unknown".to_string(),
            app_version: "0.0".to_string(),
            length: last.map(|p| p.distance).unwrap_or_default(),
            minor_section_count: points.len() as i64,
            point_count: crossing_points.len() as i64,
            daily_section_id: 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::processors::points_to_segments;

    fn survey_point(id: i64, lat: f64, speed: i32) -> IrapRecord {
        IrapRecord {
            id,
            road_survey_date: "5.6.2021".to_string(),
            latitude: lat,
            longitude: 19.0,
            length: 0.05,
            speed_limit: speed,
            // Excluded from the crossing side table
            pedestrian_crossing_inspected_road: 7,
            intersection_type: 12,
            coder_name: "surveyor".to_string(),
            ..Default::default()
        }
    }

    fn uniform_track(n: usize) -> Vec<IrapRecord> {
        (0..n)
            .map(|i| survey_point(i as i64 + 1, 47.0 + 0.0005 * i as f64, 9))
            .collect()
    }

    #[test]
    fn too_few_points_is_an_error() {
        let result = points_to_segments(vec![survey_point(1, 47.0, 9)], &ConvertParams::default());
        assert!(matches!(result, Err(ConvertError::NotEnoughPoints(1))));
    }

    #[test]
    fn segment_ids_are_dense_from_one() {
        let mut points = uniform_track(40);
        // Force segment boundaries with a few speed-limit changes
        for (i, p) in points.iter_mut().enumerate() {
            if i >= 10 {
                p.speed_limit = 15;
            }
            if i >= 25 {
                p.speed_limit = 21;
            }
        }
        let bundle = points_to_segments(points, &ConvertParams::default()).unwrap();

        let ids: Vec<i64> = bundle.minor_sections.iter().map(|s| s.id).collect();
        let expected: Vec<i64> = (1..=ids.len() as i64).collect();
        assert_eq!(ids, expected);
    }

    #[test]
    fn total_length_matches_cumulative_distance() {
        let bundle = points_to_segments(uniform_track(30), &ConvertParams::default()).unwrap();
        let total: f64 = bundle.minor_sections.iter().map(|s| s.length).sum();
        assert!((total - bundle.surveys[0].length).abs() < 1e-6);
    }

    #[test]
    fn zero_rank_track_collapses_to_one_segment() {
        // 5 points, 50 m steps, identical attributes: one ~200 m segment
        let bundle = points_to_segments(uniform_track(5), &ConvertParams::default()).unwrap();
        assert_eq!(bundle.minor_sections.len(), 1);
        assert!((bundle.minor_sections[0].length - 0.2).abs() < 1e-9);
        assert_eq!(bundle.surveys[0].minor_section_count, 1);
    }

    #[test]
    fn survey_aggregates_dates_and_counts() {
        let mut points = uniform_track(10);
        points[3].road_survey_date = "1.6.2021".to_string();
        points[7].road_survey_date = "9.6.2021".to_string();
        points[5].road_survey_date = "garbage".to_string();
        // One crossing point
        points[4].intersection_type = 3;

        let bundle = points_to_segments(points, &ConvertParams::default()).unwrap();
        let survey = &bundle.surveys[0];
        assert_eq!(survey.start_date, "2021-06-01T00:00:00+00:00");
        assert_eq!(survey.end_date, "2021-06-09T00:00:00+00:00");
        assert_eq!(survey.point_count, 1);
        assert_eq!(survey.by, "surveyor");
    }

    #[test]
    fn geometry_is_a_wkt_linestring() {
        let bundle = points_to_segments(uniform_track(5), &ConvertParams::default()).unwrap();
        let geometry = &bundle.minor_sections[0].geometry;
        assert!(geometry.starts_with("LINESTRING Z ("));
        assert!(geometry.ends_with(')'));
    }
}
