use crate::data_types::{ecs::MinorSectionRecord, irap::IrapRecord};
use crate::util::geo::GeoUtils;
use crate::util::wkt;
use crate::util::DateTimeUtils;

/// Expands minor-section line geometries back into a point sequence with at
/// most `segment_length` meters between consecutive points. Extra points are
/// projected along the great circle of each over-length coordinate pair.
pub struct SegmentSplitter {
    segment_length: f64,
}

impl SegmentSplitter {
    pub fn new(segment_length: f64) -> Self {
        Self { segment_length }
    }

    /// One point per surviving geometry coordinate plus the interpolated
    /// in-between points, renumbered, with per-step length and cumulative
    /// distance recomputed over the final sequence. Sections whose geometry
    /// cannot be parsed contribute nothing.
    pub fn split(&self, sections: &[MinorSectionRecord]) -> Vec<IrapRecord> {
        let mut points: Vec<IrapRecord> = Vec::new();

        for (index, section) in sections.iter().enumerate() {
            let mut coords = match wkt::parse_linestring(&section.geometry) {
                Some(coords) => coords,
                None => continue,
            };

            // The last coordinate is shared with the next section's first;
            // only the final section keeps it.
            if index + 1 < sections.len() {
                coords.pop();
            }

            for coord in coords {
                points.push(Self::point_from_section(section, coord[1], coord[0]));
            }
        }

        self.interpolate(&mut points);
        Self::renumber(&mut points);

        points
    }

    fn point_from_section(section: &MinorSectionRecord, lat: f64, lon: f64) -> IrapRecord {
        IrapRecord {
            road_survey_date: DateTimeUtils::atom_to_survey_date(&section.date)
                .unwrap_or_default(),
            latitude: lat,
            longitude: lon,
            vehicle_flow_aadt: section.i2_traffic_volume,
            comments: section.comment.clone(),
            ..Default::default()
        }
    }

    /// Inserts projected points at multiples of the target length along every
    /// over-length pair, each carrying the preceding point's attributes.
    fn interpolate(&self, points: &mut Vec<IrapRecord>) {
        let mut result: Vec<IrapRecord> = Vec::with_capacity(points.len());

        for point in points.drain(..) {
            if let Some(prev) = result.last() {
                let dist = GeoUtils::distance(
                    prev.latitude,
                    prev.longitude,
                    point.latitude,
                    point.longitude,
                );
                if dist > self.segment_length {
                    let bearing = GeoUtils::bearing(
                        prev.latitude,
                        prev.longitude,
                        point.latitude,
                        point.longitude,
                    );
                    let (lat, lon) = (prev.latitude, prev.longitude);
                    let template = prev.clone();

                    let mut offset = self.segment_length;
                    while offset < dist {
                        let projected = GeoUtils::destination(lat, lon, bearing, offset);
                        let mut inserted = template.clone();
                        inserted.latitude = projected.y;
                        inserted.longitude = projected.x;
                        inserted.length = 0.0;
                        inserted.distance = 0.0;
                        inserted.comments = String::from("interpolated");
                        result.push(inserted);
                        offset += self.segment_length;
                    }
                }
            }
            result.push(point);
        }

        *points = result;
    }

    /// Sequential ids from 1 and per-step geodesic lengths summed into
    /// cumulative distance, kilometers.
    fn renumber(points: &mut [IrapRecord]) {
        let mut distance = 0.0;
        for i in 0..points.len() {
            points[i].id = i as i64 + 1;
            if i == 0 {
                points[i].length = 0.0;
                points[i].distance = 0.0;
                continue;
            }

            let step = GeoUtils::distance(
                points[i - 1].latitude,
                points[i - 1].longitude,
                points[i].latitude,
                points[i].longitude,
            ) / 1000.0;
            points[i].length = step;
            distance += step;
            points[i].distance = distance;
        }
    }
}
