use serde_derive::{Deserialize, Serialize};

use super::common::DocumentId;

/// One ECS minor section: a road segment with its 3-D line geometry and the
/// descriptive attributes derived from the surveyed points it absorbed.
#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct MinorSectionRecord {
    pub id: DocumentId,
    pub survey_id: DocumentId,
    pub index: i64,
    pub date: String,
    /// Section length, kilometers.
    pub length: f64,

    pub i1_legal: String,
    pub i2_type: String,
    pub i2_direction: String,
    pub i2_traffic_volume: i64,
    pub i2_traffic_speed: String,
    pub i2_traffic_category: String,
    pub i3_surface_type: String,

    pub comment: String,
    pub log_position_y: f64,
    pub log_position_x: f64,
    /// `LINESTRING Z (x y z, ...)` with coordinates in lon-lat-height order.
    pub geometry: String,
}

/// One ECS survey row aggregating a whole conversion run.
#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct SurveyRecord {
    pub id: DocumentId,
    pub start_date: String,
    pub end_date: String,
    pub by: String,
    pub device: String,
    pub app_version: String,
    /// Total surveyed length, kilometers.
    pub length: f64,
    pub minor_section_count: i64,
    pub point_count: i64,
    pub daily_section_id: i64,
}

/// One crossing-or-obstacle point of the ECS side table. `minor_section_id`
/// starts out as the owning iRAP point id and is re-homed to the final
/// segment id during merging.
#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct CrossingPointRecord {
    pub id: DocumentId,
    pub survey_id: DocumentId,
    pub minor_section_id: DocumentId,
    pub kilometre_section: f64,
    pub date: String,
    pub log_position_lat: f64,
    pub log_position_lon: f64,
    pub comment: String,
}
