use crate::data_types::irap::IrapRecord;

/// Running "last seen" snapshot of the six tracked survey attributes. The
/// snapshot advances field by field, so a point is always compared against the
/// most recent value of each attribute, not against the whole previous record.
#[derive(Debug)]
struct TrackedFields {
    speed_limit: i32,
    bicycle_facility: i32,
    number_of_lanes: i32,
    lane_width: f64,
    road_condition: i32,
    skid_resistance_grip: i32,
}

impl TrackedFields {
    const COUNT: i32 = 6;

    fn from_record(rec: &IrapRecord) -> Self {
        Self {
            speed_limit: rec.speed_limit,
            bicycle_facility: rec.bicycle_facility,
            number_of_lanes: rec.number_of_lanes,
            lane_width: rec.lane_width,
            road_condition: rec.road_condition,
            skid_resistance_grip: rec.skid_resistance_grip,
        }
    }
}

/// Assigns each point its rank: the number of tracked attributes that changed
/// since the previous point. The first point counts as "all changed".
#[derive(Default)]
pub struct RankClassifier {
    last_row: Option<TrackedFields>,
}

impl RankClassifier {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn classify(&mut self, rec: &mut IrapRecord) {
        let last = match self.last_row.as_mut() {
            Some(last) => last,
            None => {
                self.last_row = Some(TrackedFields::from_record(rec));
                rec.rank = TrackedFields::COUNT;
                return;
            }
        };

        let mut rank = 0;
        if last.speed_limit != rec.speed_limit {
            last.speed_limit = rec.speed_limit;
            rank += 1;
        }
        if last.bicycle_facility != rec.bicycle_facility {
            last.bicycle_facility = rec.bicycle_facility;
            rank += 1;
        }
        if last.number_of_lanes != rec.number_of_lanes {
            last.number_of_lanes = rec.number_of_lanes;
            rank += 1;
        }
        if last.lane_width != rec.lane_width {
            last.lane_width = rec.lane_width;
            rank += 1;
        }
        if last.road_condition != rec.road_condition {
            last.road_condition = rec.road_condition;
            rank += 1;
        }
        if last.skid_resistance_grip != rec.skid_resistance_grip {
            last.skid_resistance_grip = rec.skid_resistance_grip;
            rank += 1;
        }

        rec.rank = rank;
    }
}

#[cfg(test)]
mod tests {
    use super::RankClassifier;
    use crate::data_types::irap::IrapRecord;

    fn point(speed: i32, lanes: i32) -> IrapRecord {
        IrapRecord {
            speed_limit: speed,
            number_of_lanes: lanes,
            ..Default::default()
        }
    }

    #[test]
    fn first_point_counts_all_tracked_fields() {
        let mut classifier = RankClassifier::new();
        let mut rec = point(9, 2);
        classifier.classify(&mut rec);
        assert_eq!(rec.rank, 6);
    }

    #[test]
    fn unchanged_points_rank_zero() {
        let mut classifier = RankClassifier::new();
        let mut a = point(9, 2);
        let mut b = point(9, 2);
        classifier.classify(&mut a);
        classifier.classify(&mut b);
        assert_eq!(b.rank, 0);
    }

    #[test]
    fn rank_counts_changed_fields_and_advances_snapshot() {
        let mut classifier = RankClassifier::new();
        let mut a = point(9, 2);
        let mut b = point(11, 4);
        let mut c = point(11, 4);
        classifier.classify(&mut a);
        classifier.classify(&mut b);
        classifier.classify(&mut c);
        assert_eq!(b.rank, 2);
        // c matches the updated snapshot, not the original first point
        assert_eq!(c.rank, 0);
    }
}
