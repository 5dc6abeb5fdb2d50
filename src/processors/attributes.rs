use crate::data_types::irap::IrapRecord;

/// Fixed mapping dictionary from point-level coded attributes to the
/// descriptive values carried by ECS minor sections. Every function is total
/// and side-effect free.
pub struct AttributeDeriver;

impl AttributeDeriver {
    /// The 13 speed bands, highest first. Checked with descending `>=`
    /// comparisons, so 150 starts the open top band and everything below 40
    /// (30 included) falls into the open bottom band.
    const SPEED_BANDS: [(i32, &'static str); 12] = [
        (150, ">=150km/h"),
        (140, "140km/h"),
        (130, "130km/h"),
        (120, "120km/h"),
        (110, "110km/h"),
        (100, "100km/h"),
        (90, "90km/h"),
        (80, "80km/h"),
        (70, "70km/h"),
        (60, "60km/h"),
        (50, "50km/h"),
        (40, "40km/h"),
    ];

    pub fn speed_band(value: i32) -> &'static str {
        for (threshold, label) in AttributeDeriver::SPEED_BANDS {
            if value >= threshold {
                return label;
            }
        }

        "<30km/h"
    }

    /// "Entry forbidden" on multi-lane carriageways with no observed bicycle
    /// flow and a high speed limit; cycling is allowed everywhere else.
    pub fn legal_value(rec: &IrapRecord) -> &'static str {
        if rec.carriageway_label != 3
            && rec.number_of_lanes >= 2
            && rec.bicyclist_peak_hourly_flow == 0
            && rec.speed_limit >= 17
        {
            "Entry forbidden"
        } else {
            "cycling allowed"
        }
    }

    pub fn facility_type(rec: &IrapRecord) -> &'static str {
        let facility = rec.bicycle_facility;
        let aadt = rec.vehicle_flow_aadt;

        if (4..=6).contains(&facility) && aadt > 0 {
            "Public road"
        } else if facility == 3 && aadt > 0 {
            "Painted cycle lane"
        } else if (facility == 1 || facility == 2 || facility == 7) && aadt > 0 {
            if facility != 2 && rec.pedestrian_observed_flow > 0 {
                "Cycle and pedestrian path"
            } else {
                "Cycle path"
            }
        } else {
            "unknown"
        }
    }

    pub fn direction(rec: &IrapRecord, facility_type: &str) -> &'static str {
        if facility_type == "Public road" && rec.median_type == 13 {
            "one-way"
        } else {
            "two-way"
        }
    }

    /// Surface is only known for facility codes 3..=6; the skid-resistance
    /// grip code then selects the material.
    pub fn surface_type(rec: &IrapRecord) -> &'static str {
        if !(3..=6).contains(&rec.bicycle_facility) {
            return "unknown";
        }

        match rec.skid_resistance_grip {
            1..=3 => "asphalt/concrete",
            4 => "stabilised gravel",
            5 => "gravel/dirt",
            _ => "unknown",
        }
    }

    pub fn traffic_category(aadt: i64) -> &'static str {
        if aadt < 500 {
            "low"
        } else if aadt < 10_000 {
            "moderate"
        } else {
            "high"
        }
    }

    pub fn comment(rec: &IrapRecord) -> String {
        format!("{};{};{}", rec.image_reference, rec.road_name, rec.section)
    }
}
