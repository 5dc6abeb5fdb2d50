use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::csv::{CsvConfig, CsvError, CsvHandler, CsvType};
use crate::processors::{ConvertError, ConvertParams};

pub mod csv;
pub mod data_types;
pub mod processors;
pub mod util;

#[derive(Debug, Error)]
pub enum VeloconvError {
    #[error(transparent)]
    Csv(#[from] CsvError),

    #[error(transparent)]
    Convert(#[from] ConvertError),

    #[error("{0} files cannot be converted on their own, feed in the minor sections file")]
    UnsupportedInput(&'static str),
}

/// What one conversion run wrote, for reporting back to the caller.
#[derive(Debug)]
pub struct ConversionResult {
    pub detected: CsvType,
    pub written: Vec<PathBuf>,
}

/// Ties the CSV boundary and the converters together: detect what a file is,
/// run the matching direction and write the counterpart files next to the
/// input.
pub struct App {
    handler: CsvHandler,
    params: ConvertParams,
}

impl App {
    const CC: &'static str = "App";

    pub fn new(params: ConvertParams) -> Result<Self, VeloconvError> {
        params.validate()?;

        Ok(Self {
            handler: CsvHandler::new(CsvConfig::load()?),
            params,
        })
    }

    pub fn convert_file(&self, input: &Path) -> Result<ConversionResult, VeloconvError> {
        let (csv_type, delimiter) = self.handler.detect(input)?;

        logln!("{} detected as file type {}", input.display(), csv_type.file_id());

        let written = match csv_type {
            CsvType::Irap => self.convert_irap(input, delimiter)?,
            CsvType::EcsMinorSections => self.convert_minor_sections(input, delimiter)?,
            CsvType::EcsSurveys => return Err(VeloconvError::UnsupportedInput("survey")),
            CsvType::EcsPoints => return Err(VeloconvError::UnsupportedInput("crossing point")),
        };

        Ok(ConversionResult {
            detected: csv_type,
            written,
        })
    }

    fn convert_irap(&self, input: &Path, delimiter: u8) -> Result<Vec<PathBuf>, VeloconvError> {
        let points = self.handler.load_irap(input, delimiter)?;
        let bundle = processors::points_to_segments(points, &self.params)?;

        logln!(
            "{} minor sections, {} crossing points",
            bundle.minor_sections.len(),
            bundle.crossing_points.len()
        );

        let surveys_path = self.output_path(input, CsvType::EcsSurveys);
        let sections_path = self.output_path(input, CsvType::EcsMinorSections);
        let points_path = self.output_path(input, CsvType::EcsPoints);

        self.handler.save_surveys(&surveys_path, &bundle.surveys)?;
        self.handler
            .save_minor_sections(&sections_path, &bundle.minor_sections)?;
        self.handler
            .save_crossing_points(&points_path, &bundle.crossing_points)?;

        Ok(vec![surveys_path, sections_path, points_path])
    }

    fn convert_minor_sections(
        &self,
        input: &Path,
        delimiter: u8,
    ) -> Result<Vec<PathBuf>, VeloconvError> {
        let sections = self.handler.load_minor_sections(input, delimiter)?;
        let bundle = processors::segments_to_points(sections, &self.params)?;

        logln!("{} survey points generated", bundle.points.len());

        let irap_path = self.output_path(input, CsvType::Irap);
        self.handler.save_irap(&irap_path, &bundle.points)?;

        Ok(vec![irap_path])
    }

    /// Output files land next to the input, named after the schema they hold.
    fn output_path(&self, input: &Path, csv_type: CsvType) -> PathBuf {
        let mut path = input.parent().unwrap_or(Path::new(".")).to_path_buf();
        path.push(format!("{}.csv", self.handler.config().output_name(csv_type)));
        path
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_params_are_rejected_at_construction() {
        let params = ConvertParams {
            min_length: 500.0,
            max_length: 100.0,
            ..Default::default()
        };
        assert!(App::new(params).is_err());
    }

    #[test]
    fn output_files_land_next_to_the_input() {
        let app = App::new(ConvertParams::default()).unwrap();
        let path = app.output_path(Path::new("/data/survey.csv"), CsvType::EcsSurveys);
        assert_eq!(path, PathBuf::from("/data/surveys.csv"));
    }
}
