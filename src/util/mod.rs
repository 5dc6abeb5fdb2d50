use chrono::NaiveDate;

pub mod geo;
pub mod logging;
pub mod wkt;

pub struct DateTimeUtils {}

impl DateTimeUtils {
    /// Parses a survey date in day.month.year form, without zero padding
    /// ("3.1.2021" as well as "03.01.2021").
    pub fn parse_survey_date(text: &str) -> Option<NaiveDate> {
        NaiveDate::parse_from_str(text.trim(), "%d.%m.%Y").ok()
    }

    /// ECS date columns carry ISO 8601 timestamps at UTC midnight.
    pub fn to_atom(date: NaiveDate) -> String {
        format!("{}T00:00:00+00:00", date.format("%Y-%m-%d"))
    }

    /// Back from an ECS date column to the iRAP day.month.year form. Accepts
    /// either a full timestamp or a bare date.
    pub fn atom_to_survey_date(text: &str) -> Option<String> {
        let date_part = text.trim().split('T').next().unwrap_or("");
        let date = NaiveDate::parse_from_str(date_part, "%Y-%m-%d").ok()?;

        Some(format!("{}.{}.{}", date.format("%-d"), date.format("%-m"), date.format("%Y")))
    }
}

#[cfg(test)]
mod tests {
    use super::DateTimeUtils;

    #[test]
    fn parses_unpadded_survey_dates() {
        let d = DateTimeUtils::parse_survey_date("3.1.2021").unwrap();
        assert_eq!(d, DateTimeUtils::parse_survey_date("03.01.2021").unwrap());
        assert_eq!(DateTimeUtils::to_atom(d), "2021-01-03T00:00:00+00:00");
    }

    #[test]
    fn rejects_malformed_dates() {
        assert!(DateTimeUtils::parse_survey_date("2021-01-03").is_none());
        assert!(DateTimeUtils::parse_survey_date("").is_none());
    }

    #[test]
    fn atom_round_trip() {
        let back = DateTimeUtils::atom_to_survey_date("2021-01-03T00:00:00+00:00").unwrap();
        assert_eq!(back, "3.1.2021");
    }
}
