use crate::data_types::{common::DocumentId, ecs::CrossingPointRecord, irap::IrapRecord};
use crate::logvbln;
use crate::processors::ConvertParams;

/// Direction of a short-segment merge: either the next segment is folded into
/// the current one, or the current one is folded in front of the next.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum MergeDecision {
    AbsorbIntoCurrent,
    AbsorbIntoNext,
}

impl MergeDecision {
    /// The side with the lower rank is merged away, keeping the segment with
    /// more attribute transitions distinct; rank ties fall back to absorbing
    /// the shorter of the two into the longer.
    pub fn decide(cur_rank: i32, next_rank: i32, cur_length: f64, next_length: f64) -> Self {
        if next_rank < cur_rank {
            MergeDecision::AbsorbIntoCurrent
        } else if cur_rank < next_rank {
            MergeDecision::AbsorbIntoNext
        } else if next_length < cur_length {
            MergeDecision::AbsorbIntoCurrent
        } else {
            MergeDecision::AbsorbIntoNext
        }
    }
}

/// The two merge passes that turn a ranked, vertex-flagged point sequence into
/// final segment boundaries, plus the closing distance pass. Records are
/// flagged deleted first and physically compacted between passes.
pub struct SegmentMerger {
    average_height: f64,
    min_length: f64,
    max_length: f64,
}

impl SegmentMerger {
    const CC: &'static str = "SegmentMerger";

    pub fn new(params: &ConvertParams) -> Self {
        Self {
            average_height: params.average_height,
            min_length: params.min_length,
            max_length: params.max_length,
        }
    }

    /// Pass 1: absorb runs of rank-0 points into the segment opened before
    /// them, as long as the combined length stays under the
    /// (max_length - min_length) budget. Vertex coordinates survive into the
    /// growing geometry; every segment is closed with the coordinate of the
    /// point that terminated the run. Caller guarantees at least two records.
    pub fn merge_zero_ranked(&self, records: &mut Vec<IrapRecord>) {
        let count = records.len();
        let mut n = 0;
        while n < count - 1 {
            let (lon, lat) = (records[n].longitude, records[n].latitude);
            records[n].add_latlong_point(lon, lat, self.average_height);

            let mut m = n + 1;
            while m < count - 1
                && records[m].rank == 0
                && (records[n].length + records[m].length) * 1000.0
                    < self.max_length - self.min_length
            {
                records[n].length += records[m].length;
                if records[m].vertex {
                    let (lon, lat) = (records[m].longitude, records[m].latitude);
                    records[n].add_latlong_point(lon, lat, self.average_height);
                }
                records[m].deleted = true;
                m += 1;
            }

            // Closing coordinate comes from the terminating point
            let (lon, lat) = (records[m].longitude, records[m].latitude);
            records[n].add_latlong_point(lon, lat, self.average_height);
            n = m;
        }

        // The last point only ever closes the segment before it
        records[count - 1].deleted = true;

        logvbln!("pass 1 kept {} of {} points", records.iter().filter(|r| !r.deleted).count(), count);
        Self::delete_marked(records);
    }

    /// Pass 2: resolve segments shorter than min_length by folding them into a
    /// neighbor per `MergeDecision`, then assign dense new ids in traversal
    /// order, accumulate cumulative distance and re-home crossing points to
    /// the segment that absorbed their original owning point.
    ///
    /// Crossing-point owning ids are assumed to be non-decreasing in input
    /// order; disordered input silently produces wrong ownership.
    pub fn merge_short_segments(
        &self,
        records: &mut Vec<IrapRecord>,
        crossing_points: &mut [CrossingPointRecord],
    ) {
        let count = records.len();
        let spo_count = crossing_points.len();
        let mut n_spo = 0;
        let mut serial: DocumentId = 1;
        let mut distance = 0.0;

        let mut n = 0;
        while n < count {
            let mut cur = n;
            let mut m = n + 1;
            while m < count && records[cur].length * 1000.0 < self.min_length {
                match MergeDecision::decide(
                    records[cur].rank,
                    records[m].rank,
                    records[cur].length,
                    records[m].length,
                ) {
                    MergeDecision::AbsorbIntoCurrent => {
                        let geometry = std::mem::take(&mut records[m].latlong);
                        records[cur].merge_latlong(&geometry, true);
                        records[cur].length += records[m].length;
                        records[m].deleted = true;
                    }
                    MergeDecision::AbsorbIntoNext => {
                        let geometry = std::mem::take(&mut records[cur].latlong);
                        records[m].merge_latlong(&geometry, false);
                        records[m].length += records[cur].length;
                        records[cur].deleted = true;
                        cur = m;
                    }
                }
                n = m;
                m += 1;
            }
            n = m;

            records[cur].new_id = serial;
            distance += records[cur].length;
            records[cur].distance = distance;

            if n < count && n_spo < spo_count {
                let next_id = records[n].id;
                while n_spo < spo_count && crossing_points[n_spo].minor_section_id < next_id {
                    crossing_points[n_spo].minor_section_id = serial;
                    n_spo += 1;
                }
            }
            serial += 1;
        }

        // Whatever crossing points are left belong to the final segment
        let last_serial = serial - 1;
        while n_spo < spo_count {
            crossing_points[n_spo].minor_section_id = last_serial;
            n_spo += 1;
        }

        logvbln!("pass 2 finalized {} segments", last_serial);
        Self::delete_marked(records);
    }

    /// Closing pass: re-derive cumulative distance as a plain running sum over
    /// the finalized segments, correcting any drift from the merge passes.
    pub fn recompute_distances(&self, records: &mut [IrapRecord]) {
        let mut distance = 0.0;
        for rec in records.iter_mut() {
            distance += rec.length;
            rec.distance = distance;
        }
    }

    fn delete_marked(records: &mut Vec<IrapRecord>) {
        records.retain(|rec| !rec.deleted);
    }
}
