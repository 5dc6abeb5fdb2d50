use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use crate::data_types::ecs::{CrossingPointRecord, MinorSectionRecord, SurveyRecord};
use crate::data_types::irap::IrapRecord;
use crate::logvbln;

use super::{CsvConfig, CsvError, CsvType};

/// Reads and writes the supported CSV schemas. Input files are identified by
/// their header row, so iRAP and ECS exports can be fed in without telling
/// the tool which is which.
pub struct CsvHandler {
    config: CsvConfig,
}

/// Column lookup for one parsed row, keyed by canonical field name. Missing
/// or unparseable cells fall back to the type's zero value, the way partial
/// exports are expected to behave.
struct FieldReader<'a> {
    index: &'a HashMap<String, usize>,
    row: &'a csv::StringRecord,
}

impl<'a> FieldReader<'a> {
    fn str(&self, id: &str) -> String {
        self.index
            .get(id)
            .and_then(|&i| self.row.get(i))
            .unwrap_or("")
            .trim()
            .to_string()
    }

    fn f64(&self, id: &str) -> f64 {
        self.str(id).parse().unwrap_or(0.0)
    }

    fn i32(&self, id: &str) -> i32 {
        self.str(id).parse().unwrap_or(0)
    }

    fn i64(&self, id: &str) -> i64 {
        self.str(id).parse().unwrap_or(0)
    }
}

impl CsvHandler {
    const CC: &'static str = "CsvHandler";

    pub fn new(config: CsvConfig) -> CsvHandler {
        CsvHandler { config }
    }

    pub fn config(&self) -> &CsvConfig {
        &self.config
    }

    /// Identifies the schema and delimiter of a CSV file from its header row.
    pub fn detect(&self, path: &Path) -> Result<(CsvType, u8), CsvError> {
        let file = File::open(path).map_err(|source| CsvError::Io {
            path: path.display().to_string(),
            source,
        })?;

        let mut header_line = String::new();
        BufReader::new(file)
            .read_line(&mut header_line)
            .map_err(|source| CsvError::Io {
                path: path.display().to_string(),
                source,
            })?;

        if header_line.trim().is_empty() {
            return Err(CsvError::MissingHeader(path.display().to_string()));
        }

        let delimiter = Self::sniff_delimiter(&header_line);
        let headers = Self::split_header(&header_line, delimiter)?;

        let best = CsvType::ALL
            .iter()
            .map(|&t| (t, self.config.match_count(t, &headers)))
            .max_by_key(|&(_, count)| count)
            .filter(|&(_, count)| count > 0);

        match best {
            Some((csv_type, count)) => {
                logvbln!(
                    "{} matched {} of its header columns as file type {}",
                    path.display(),
                    count,
                    csv_type.file_id()
                );
                Ok((csv_type, delimiter))
            }
            None => Err(CsvError::UnknownSchema(path.display().to_string())),
        }
    }

    /// Picks the candidate separator occurring most often in the header row.
    fn sniff_delimiter(header_line: &str) -> u8 {
        let candidates = [b',', b';', b'\t'];
        let mut best = b',';
        let mut best_count = 0;

        for &cand in &candidates {
            let count = header_line.bytes().filter(|&b| b == cand).count();
            if count > best_count {
                best = cand;
                best_count = count;
            }
        }

        best
    }

    fn split_header(header_line: &str, delimiter: u8) -> Result<Vec<String>, CsvError> {
        let mut reader = csv::ReaderBuilder::new()
            .delimiter(delimiter)
            .has_headers(false)
            .from_reader(header_line.as_bytes());

        let mut headers = Vec::new();
        for row in reader.records() {
            for cell in row?.iter() {
                headers.push(CsvConfig::canonical_field_name(cell));
            }
        }

        Ok(headers)
    }

    fn open_reader(path: &Path, delimiter: u8) -> Result<csv::Reader<File>, CsvError> {
        let file = File::open(path).map_err(|source| CsvError::Io {
            path: path.display().to_string(),
            source,
        })?;

        Ok(csv::ReaderBuilder::new()
            .delimiter(delimiter)
            .flexible(true)
            .from_reader(file))
    }

    fn header_index(reader: &mut csv::Reader<File>) -> Result<HashMap<String, usize>, CsvError> {
        Ok(reader
            .headers()?
            .iter()
            .enumerate()
            .map(|(i, cell)| (CsvConfig::canonical_field_name(cell), i))
            .collect())
    }

    /// Loads an iRAP point file. Points get sequential ids starting from 1,
    /// the file itself carries none.
    pub fn load_irap(&self, path: &Path, delimiter: u8) -> Result<Vec<IrapRecord>, CsvError> {
        let mut reader = Self::open_reader(path, delimiter)?;
        let index = Self::header_index(&mut reader)?;

        let mut records = Vec::new();
        for row in reader.records() {
            let row = row?;
            let fields = FieldReader { index: &index, row: &row };

            let rec = IrapRecord {
                id: records.len() as i64 + 1,
                road_survey_date: fields.str("road_survey_date"),
                latitude: fields.f64("latitude"),
                longitude: fields.f64("longitude"),
                distance: fields.f64("distance"),
                length: fields.f64("length"),
                speed_limit: fields.i32("speed_limit"),
                bicycle_facility: fields.i32("bicycle_facility"),
                skid_resistance_grip: fields.i32("skid_resistance_grip"),
                number_of_lanes: fields.i32("number_of_lanes"),
                lane_width: fields.f64("lane_width"),
                road_condition: fields.i32("road_condition"),
                median_type: fields.i32("median_type"),
                carriageway_label: fields.i32("carriageway_label"),
                vehicle_flow_aadt: fields.i64("vehicle_flow_aadt"),
                bicyclist_peak_hourly_flow: fields.i64("bicyclist_peak_hourly_flow"),
                pedestrian_observed_flow: fields
                    .i64("pedestrian_observed_flow_along_the_road_passenger_side"),
                pedestrian_crossing_inspected_road: fields.i32("pedestrian_crossing_inspected_road"),
                intersection_type: fields.i32("intersection_type"),
                image_reference: fields.str("image_reference"),
                road_name: fields.str("road_name"),
                section: fields.str("section"),
                comments: fields.str("comments"),
                coder_name: fields.str("coder_name"),
                ..Default::default()
            };

            records.push(rec);
        }

        logvbln!("loaded {} iRAP points from {}", records.len(), path.display());
        Ok(records)
    }

    pub fn load_minor_sections(
        &self,
        path: &Path,
        delimiter: u8,
    ) -> Result<Vec<MinorSectionRecord>, CsvError> {
        let mut reader = Self::open_reader(path, delimiter)?;
        let index = Self::header_index(&mut reader)?;

        let mut records = Vec::new();
        for row in reader.records() {
            let row = row?;
            let fields = FieldReader { index: &index, row: &row };

            records.push(MinorSectionRecord {
                id: fields.i64("id"),
                survey_id: fields.i64("survey_id"),
                index: fields.i64("index"),
                date: fields.str("date"),
                length: fields.f64("length"),
                i1_legal: fields.str("i1_legal"),
                i2_type: fields.str("i2_type"),
                i2_direction: fields.str("i2_direction"),
                i2_traffic_volume: fields.i64("i2_traffic_volume"),
                i2_traffic_speed: fields.str("i2_traffic_speed"),
                i2_traffic_category: fields.str("i2_traffic_category"),
                i3_surface_type: fields.str("i3_surface_type"),
                comment: fields.str("comment"),
                log_position_y: fields.f64("log_position_y"),
                log_position_x: fields.f64("log_position_x"),
                geometry: fields.str("geometry"),
            });
        }

        logvbln!(
            "loaded {} minor sections from {}",
            records.len(),
            path.display()
        );
        Ok(records)
    }

    fn write_rows(
        path: &Path,
        delimiter: u8,
        headers: &[&str],
        rows: Vec<Vec<String>>,
    ) -> Result<(), CsvError> {
        let file = File::create(path).map_err(|source| CsvError::Io {
            path: path.display().to_string(),
            source,
        })?;

        let mut writer = csv::WriterBuilder::new()
            .delimiter(delimiter)
            .from_writer(file);

        writer.write_record(headers)?;
        for row in rows {
            writer.write_record(&row)?;
        }
        writer.flush().map_err(|source| CsvError::Io {
            path: path.display().to_string(),
            source,
        })?;

        Ok(())
    }

    fn header_names(&self, csv_type: CsvType) -> Vec<&str> {
        self.config
            .fields_for(csv_type)
            .iter()
            .map(|f| f.name.as_str())
            .collect()
    }

    /// Writes an iRAP point file, semicolon separated like the upstream
    /// exports.
    pub fn save_irap(&self, path: &Path, records: &[IrapRecord]) -> Result<(), CsvError> {
        let rows = records
            .iter()
            .map(|r| {
                vec![
                    r.road_survey_date.clone(),
                    r.latitude.to_string(),
                    r.longitude.to_string(),
                    r.distance.to_string(),
                    r.length.to_string(),
                    r.speed_limit.to_string(),
                    r.bicycle_facility.to_string(),
                    r.skid_resistance_grip.to_string(),
                    r.number_of_lanes.to_string(),
                    r.lane_width.to_string(),
                    r.road_condition.to_string(),
                    r.median_type.to_string(),
                    r.carriageway_label.to_string(),
                    r.vehicle_flow_aadt.to_string(),
                    r.bicyclist_peak_hourly_flow.to_string(),
                    r.pedestrian_observed_flow.to_string(),
                    r.pedestrian_crossing_inspected_road.to_string(),
                    r.intersection_type.to_string(),
                    r.image_reference.clone(),
                    r.road_name.clone(),
                    r.section.clone(),
                    r.comments.clone(),
                    r.coder_name.clone(),
                ]
            })
            .collect();

        Self::write_rows(path, b';', &self.header_names(CsvType::Irap), rows)
    }

    pub fn save_surveys(&self, path: &Path, records: &[SurveyRecord]) -> Result<(), CsvError> {
        let rows = records
            .iter()
            .map(|r| {
                vec![
                    r.id.to_string(),
                    r.start_date.clone(),
                    r.end_date.clone(),
                    r.by.clone(),
                    r.device.clone(),
                    r.app_version.clone(),
                    r.length.to_string(),
                    r.minor_section_count.to_string(),
                    r.point_count.to_string(),
                    r.daily_section_id.to_string(),
                ]
            })
            .collect();

        Self::write_rows(path, b',', &self.header_names(CsvType::EcsSurveys), rows)
    }

    pub fn save_minor_sections(
        &self,
        path: &Path,
        records: &[MinorSectionRecord],
    ) -> Result<(), CsvError> {
        let rows = records
            .iter()
            .map(|r| {
                vec![
                    r.id.to_string(),
                    r.survey_id.to_string(),
                    r.index.to_string(),
                    r.date.clone(),
                    r.length.to_string(),
                    r.i1_legal.clone(),
                    r.i2_type.clone(),
                    r.i2_direction.clone(),
                    r.i2_traffic_volume.to_string(),
                    r.i2_traffic_speed.clone(),
                    r.i2_traffic_category.clone(),
                    r.i3_surface_type.clone(),
                    r.comment.clone(),
                    r.log_position_y.to_string(),
                    r.log_position_x.to_string(),
                    r.geometry.clone(),
                ]
            })
            .collect();

        Self::write_rows(
            path,
            b',',
            &self.header_names(CsvType::EcsMinorSections),
            rows,
        )
    }

    pub fn save_crossing_points(
        &self,
        path: &Path,
        records: &[CrossingPointRecord],
    ) -> Result<(), CsvError> {
        let rows = records
            .iter()
            .map(|r| {
                vec![
                    r.id.to_string(),
                    r.survey_id.to_string(),
                    r.minor_section_id.to_string(),
                    r.kilometre_section.to_string(),
                    r.date.clone(),
                    r.log_position_lat.to_string(),
                    r.log_position_lon.to_string(),
                    r.comment.clone(),
                ]
            })
            .collect();

        Self::write_rows(path, b',', &self.header_names(CsvType::EcsPoints), rows)
    }
}
