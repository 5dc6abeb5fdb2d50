use thiserror::Error;

use crate::data_types::{
    common::DocumentId,
    ecs::{CrossingPointRecord, MinorSectionRecord, SurveyRecord},
    irap::IrapRecord,
};

pub mod attributes;
pub mod ecs_to_irap;
pub mod irap_to_ecs;
pub mod merge;
pub mod rank;
pub mod splitter;
pub mod vertices;

pub use ecs_to_irap::EcsToIrapConverter;
pub use irap_to_ecs::IrapToEcsConverter;

/// Tuning knobs of one conversion run. Both directions take the full set; each
/// uses the subset that applies to it.
#[derive(Debug, Clone, Copy)]
pub struct ConvertParams {
    /// Height used as `z` in generated line strings, meters.
    pub average_height: f64,
    /// Maximum divergence from the original polyline for vertex detection, meters.
    pub max_divergence: f64,
    /// Minimum length of ECS segments, meters.
    pub min_length: f64,
    /// Maximum length of ECS segments, meters.
    pub max_length: f64,
    /// Target iRAP sub-segment length when splitting, meters.
    pub segment_length: f64,
    pub survey_id: DocumentId,
}

impl Default for ConvertParams {
    fn default() -> Self {
        Self {
            average_height: 0.0,
            max_divergence: 1.0,
            min_length: 200.0,
            max_length: 5000.0,
            segment_length: 100.0,
            survey_id: 1,
        }
    }
}

impl ConvertParams {
    /// Configuration errors are rejected before any record is touched.
    pub fn validate(&self) -> Result<(), ConvertError> {
        if self.min_length >= self.max_length {
            return Err(ConvertError::InvalidThresholds {
                min: self.min_length,
                max: self.max_length,
            });
        }
        if self.segment_length <= 0.0 {
            return Err(ConvertError::InvalidSegmentLength(self.segment_length));
        }
        Ok(())
    }
}

#[derive(Debug, Error)]
pub enum ConvertError {
    #[error("minimum segment length {min}m must be below maximum length {max}m")]
    InvalidThresholds { min: f64, max: f64 },

    #[error("target sub-segment length {0}m must be positive")]
    InvalidSegmentLength(f64),

    #[error("at least two survey points are required, got {0}")]
    NotEnoughPoints(usize),

    #[error("input contains no convertible records")]
    EmptyInput,
}

/// Everything one iRAP→ECS run produces.
#[derive(Debug, Default)]
pub struct EcsBundle {
    pub surveys: Vec<SurveyRecord>,
    pub minor_sections: Vec<MinorSectionRecord>,
    pub crossing_points: Vec<CrossingPointRecord>,
}

/// Everything one ECS→iRAP run produces.
#[derive(Debug, Default)]
pub struct IrapBundle {
    pub points: Vec<IrapRecord>,
}

/// Collapses an ordered iRAP point sequence into ECS segments.
pub fn points_to_segments(
    points: Vec<IrapRecord>,
    params: &ConvertParams,
) -> Result<EcsBundle, ConvertError> {
    IrapToEcsConverter::new(*params)?.convert(points)
}

/// Expands ECS segment geometries back into a regularly spaced point sequence.
pub fn segments_to_points(
    sections: Vec<MinorSectionRecord>,
    params: &ConvertParams,
) -> Result<IrapBundle, ConvertError> {
    EcsToIrapConverter::new(*params)?.convert(sections)
}

#[cfg(test)]
mod tests {
    use super::ConvertParams;

    #[test]
    fn default_params_pass_validation() {
        assert!(ConvertParams::default().validate().is_ok());
    }

    #[test]
    fn inverted_thresholds_are_rejected() {
        let params = ConvertParams {
            min_length: 5000.0,
            max_length: 200.0,
            ..Default::default()
        };
        assert!(params.validate().is_err());
    }

    #[test]
    fn zero_segment_length_is_rejected() {
        let params = ConvertParams {
            segment_length: 0.0,
            ..Default::default()
        };
        assert!(params.validate().is_err());
    }
}
