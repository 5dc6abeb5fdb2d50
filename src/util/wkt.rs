use crate::data_types::irap::GeoPoint;

/// The exact textual shape of ECS line geometries:
/// `LINESTRING Z (x1 y1 z1, x2 y2 z2, ...)`, coordinates in
/// longitude-latitude-height order, one space between ordinates.
pub fn format_linestring(points: &[GeoPoint]) -> String {
    let coords: Vec<String> = points
        .iter()
        .map(|p| format!("{} {} {}", p[0], p[1], p[2]))
        .collect();

    format!("LINESTRING Z ({})", coords.join(", "))
}

/// Parses a line-string field back into coordinate triples; a missing z
/// defaults to 0. Anything that does not yield at least two triples counts as
/// malformed and returns None.
pub fn parse_linestring(text: &str) -> Option<Vec<GeoPoint>> {
    let open = text.find('(')?;
    let close = text.rfind(')')?;
    if close <= open {
        return None;
    }

    let mut points = Vec::new();
    for part in text[open + 1..close].split(',') {
        let mut ords = part.split_whitespace();
        let x: f64 = ords.next()?.parse().ok()?;
        let y: f64 = ords.next()?.parse().ok()?;
        let z: f64 = match ords.next() {
            Some(v) => v.parse().ok()?,
            None => 0.0,
        };
        points.push([x, y, z]);
    }

    if points.len() < 2 {
        return None;
    }
    Some(points)
}
