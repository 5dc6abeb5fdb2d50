use crate::data_types::irap::IrapRecord;
use crate::util::geo::GeoUtils;

/// Flags geometrically significant points with a single forward pass: stretch
/// the arc from the current key point until some in-between point diverges by
/// more than half the configured threshold, then restart from there. This is
/// deliberately not a recursive Douglas-Peucker split.
pub struct VertexIdentifier;

impl VertexIdentifier {
    /// Caller guarantees at least two records.
    pub fn identify(records: &mut [IrapRecord], max_divergence: f64) {
        let div = max_divergence / 2.0;
        let count = records.len();

        // First and last are always vertices
        records[0].vertex = true;
        records[count - 1].vertex = true;

        let mut n = 0;
        while n < count - 1 {
            let mut m = n + 1;
            while m < count - 1 {
                let dist = GeoUtils::cross_track_distance(
                    records[n].latitude,
                    records[n].longitude,
                    records[m + 1].latitude,
                    records[m + 1].longitude,
                    records[m].latitude,
                    records[m].longitude,
                );
                if dist > div {
                    records[m].vertex = true;
                    break;
                }
                m += 1;
            }
            n = m;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::VertexIdentifier;
    use crate::data_types::irap::IrapRecord;

    fn track(coords: &[(f64, f64)]) -> Vec<IrapRecord> {
        coords
            .iter()
            .enumerate()
            .map(|(i, &(lat, lon))| IrapRecord {
                id: i as i64 + 1,
                latitude: lat,
                longitude: lon,
                ..Default::default()
            })
            .collect()
    }

    #[test]
    fn endpoints_are_always_vertices() {
        let mut recs = track(&[(47.0, 19.0), (47.0005, 19.0), (47.001, 19.0)]);
        VertexIdentifier::identify(&mut recs, 1.0);
        assert!(recs[0].vertex);
        assert!(recs[2].vertex);
    }

    #[test]
    fn straight_line_has_no_interior_vertices() {
        let coords: Vec<(f64, f64)> = (0..6).map(|i| (47.0 + 0.0005 * i as f64, 19.0)).collect();
        let mut recs = track(&coords);
        VertexIdentifier::identify(&mut recs, 1.0);
        assert!(recs[1..5].iter().all(|r| !r.vertex));
    }

    #[test]
    fn sharp_corner_is_flagged() {
        // North up to index 2, then hard east: index 2 diverges far from the
        // arcs spanning it once the key stretches past the corner.
        let mut recs = track(&[
            (47.0, 19.0),
            (47.001, 19.0),
            (47.002, 19.0),
            (47.002, 19.001),
            (47.002, 19.002),
        ]);
        VertexIdentifier::identify(&mut recs, 1.0);
        assert!(recs[2].vertex);
    }
}
