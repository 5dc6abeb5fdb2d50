use serde_derive::Deserialize;

use super::{CsvError, CsvType};

/// One column of one of the supported CSV schemas.
#[derive(Debug, Clone, Deserialize)]
pub struct FieldDef {
    /// Canonical identifier, also the struct field it maps to.
    pub id: String,
    /// Header text as written in the file.
    pub name: String,
    /// Which schema the column belongs to, see [`CsvType::file_id`].
    pub fileid: u8,
    /// Base name of the output file this schema is written to.
    pub filename: String,
    pub datatype: String,
}

#[derive(Debug, Deserialize)]
struct FieldsDocument {
    fields: Vec<FieldDef>,
}

/// Field dictionary for all supported schemas, loaded from the embedded
/// `fields.json` document.
#[derive(Debug)]
pub struct CsvConfig {
    fields: Vec<FieldDef>,
}

impl CsvConfig {
    pub fn load() -> Result<CsvConfig, CsvError> {
        let doc: FieldsDocument = serde_json::from_str(include_str!("fields.json"))?;

        Ok(CsvConfig { fields: doc.fields })
    }

    pub fn fields_for(&self, csv_type: CsvType) -> Vec<&FieldDef> {
        self.fields
            .iter()
            .filter(|f| f.fileid == csv_type.file_id())
            .collect()
    }

    /// Base name (without extension) used when writing files of this schema.
    pub fn output_name(&self, csv_type: CsvType) -> &str {
        self.fields
            .iter()
            .find(|f| f.fileid == csv_type.file_id())
            .map(|f| f.filename.as_str())
            .unwrap_or("output")
    }

    /// How many of the given canonical header names belong to this schema.
    pub fn match_count(&self, csv_type: CsvType, canonical_headers: &[String]) -> usize {
        self.fields_for(csv_type)
            .iter()
            .filter(|f| canonical_headers.iter().any(|h| *h == f.id))
            .count()
    }

    /// Normalizes a header cell so that cosmetic differences (case, spacing,
    /// punctuation) do not break schema detection. "Vehicle Flow (AADT)"
    /// becomes "vehicle_flow_aadt".
    pub fn canonical_field_name(name: &str) -> String {
        let mut out = String::with_capacity(name.len());
        let mut last_was_sep = true;

        for ch in name.trim().chars() {
            if ch.is_ascii_alphanumeric() {
                out.push(ch.to_ascii_lowercase());
                last_was_sep = false;
            } else if !last_was_sep {
                out.push('_');
                last_was_sep = true;
            }
        }

        while out.ends_with('_') {
            out.pop();
        }

        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canonical_names_collapse_punctuation() {
        assert_eq!(
            CsvConfig::canonical_field_name("Vehicle Flow (AADT)"),
            "vehicle_flow_aadt"
        );
        assert_eq!(
            CsvConfig::canonical_field_name("Skid Resistance / Grip"),
            "skid_resistance_grip"
        );
        assert_eq!(
            CsvConfig::canonical_field_name("Pedestrian Crossing - Inspected Road"),
            "pedestrian_crossing_inspected_road"
        );
        assert_eq!(CsvConfig::canonical_field_name("  Latitude  "), "latitude");
    }

    #[test]
    fn embedded_document_loads_and_covers_all_schemas() {
        let config = CsvConfig::load().unwrap();

        assert_eq!(config.fields_for(CsvType::Irap).len(), 23);
        assert_eq!(config.fields_for(CsvType::EcsSurveys).len(), 10);
        assert_eq!(config.fields_for(CsvType::EcsMinorSections).len(), 16);
        assert_eq!(config.fields_for(CsvType::EcsPoints).len(), 8);
    }

    #[test]
    fn output_names_follow_the_schema() {
        let config = CsvConfig::load().unwrap();

        assert_eq!(config.output_name(CsvType::EcsSurveys), "surveys");
        assert_eq!(config.output_name(CsvType::EcsMinorSections), "minor_sections");
        assert_eq!(
            config.output_name(CsvType::EcsPoints),
            "survey_points_crossing_or_obstacle"
        );
    }

    #[test]
    fn match_count_prefers_the_right_schema() {
        let config = CsvConfig::load().unwrap();
        let headers: Vec<String> = ["id", "survey_id", "index", "date", "geometry"]
            .iter()
            .map(|s| s.to_string())
            .collect();

        assert!(
            config.match_count(CsvType::EcsMinorSections, &headers)
                > config.match_count(CsvType::EcsSurveys, &headers)
        );
        assert_eq!(config.match_count(CsvType::Irap, &headers), 0);
    }
}
