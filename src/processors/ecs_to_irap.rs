use crate::data_types::ecs::MinorSectionRecord;
use crate::logln;
use crate::processors::{splitter::SegmentSplitter, ConvertError, ConvertParams, IrapBundle};

/// Sequences the ECS→iRAP direction: parse each section's line geometry,
/// split over-length spans, renumber the resulting point sequence.
pub struct EcsToIrapConverter {
    params: ConvertParams,
}

impl EcsToIrapConverter {
    const CC: &'static str = "EcsToIrap";

    pub fn new(params: ConvertParams) -> Result<Self, ConvertError> {
        params.validate()?;
        Ok(Self { params })
    }

    pub fn convert(&self, sections: Vec<MinorSectionRecord>) -> Result<IrapBundle, ConvertError> {
        if sections.is_empty() {
            return Err(ConvertError::EmptyInput);
        }

        logln!("splitting {} minor sections", sections.len());

        let splitter = SegmentSplitter::new(self.params.segment_length);
        let points = splitter.split(&sections);

        logln!("produced {} survey points", points.len());

        Ok(IrapBundle { points })
    }
}
