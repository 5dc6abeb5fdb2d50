use serde_derive::{Deserialize, Serialize};

use super::common::DocumentId;

/// One coordinate triple of a line geometry: longitude, latitude, height.
pub type GeoPoint = [f64; 3];

/// One surveyed GPS point of an iRAP file, together with the working
/// annotations the conversion passes attach to it (rank, vertex and deletion
/// flags, the id assigned after merging and the accumulated line geometry).
#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct IrapRecord {
    pub id: DocumentId,

    pub road_survey_date: String,
    pub latitude: f64,
    pub longitude: f64,

    /// Cumulative distance along the survey, kilometers.
    pub distance: f64,
    /// Length of the step this point closes, kilometers.
    pub length: f64,

    pub speed_limit: i32,
    pub bicycle_facility: i32,
    pub skid_resistance_grip: i32,
    pub number_of_lanes: i32,
    pub lane_width: f64,
    pub road_condition: i32,
    pub median_type: i32,
    pub carriageway_label: i32,
    pub vehicle_flow_aadt: i64,
    pub bicyclist_peak_hourly_flow: i64,
    pub pedestrian_observed_flow: i64,
    pub pedestrian_crossing_inspected_road: i32,
    pub intersection_type: i32,

    pub image_reference: String,
    pub road_name: String,
    pub section: String,
    pub comments: String,
    pub coder_name: String,

    #[serde(default)]
    pub rank: i32,
    #[serde(default)]
    pub vertex: bool,
    #[serde(default)]
    pub deleted: bool,
    #[serde(default)]
    pub new_id: DocumentId,
    #[serde(default)]
    pub latlong: Vec<GeoPoint>,
}

impl IrapRecord {
    pub fn add_latlong_point(&mut self, longitude: f64, latitude: f64, z: f64) {
        self.latlong.push([longitude, latitude, z]);
    }

    /// Concatenates another record's geometry onto this one, after or before
    /// the points already collected. Order within both lists is preserved.
    pub fn merge_latlong(&mut self, other: &[GeoPoint], after: bool) {
        if after {
            self.latlong.extend_from_slice(other);
        } else {
            let mut merged = other.to_vec();
            merged.extend_from_slice(&self.latlong);
            self.latlong = merged;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::IrapRecord;

    #[test]
    fn merge_latlong_preserves_order() {
        let mut rec = IrapRecord::default();
        rec.add_latlong_point(19.0, 47.0, 0.0);
        rec.add_latlong_point(19.1, 47.1, 0.0);

        let other = vec![[19.2, 47.2, 0.0], [19.3, 47.3, 0.0]];

        let mut after = rec.clone();
        after.merge_latlong(&other, true);
        assert_eq!(after.latlong[2], [19.2, 47.2, 0.0]);

        let mut before = rec;
        before.merge_latlong(&other, false);
        assert_eq!(before.latlong[0], [19.2, 47.2, 0.0]);
        assert_eq!(before.latlong[2], [19.0, 47.0, 0.0]);
    }
}
