/// WGS84 semi-major axis in meters
pub const WGS84_A: f64 = 6378137.0;
/// WGS84 semi-minor axis in meters
pub const WGS84_B: f64 = 6356752.314245;

/// Angular extent (degrees) of a square of the given width at a latitude
///
/// Returns `(delta_lat, delta_lon)`: the full side lengths in latitude and
/// longitude of a square `width_m` meters across, centered at `lat`.
pub fn square_extent(lat: f64, width_m: f64) -> (f64, f64) {
    let lat_rad = lat.to_radians();
    let (lat_sin, lat_cos) = lat_rad.sin_cos();

    let lat_width = (width_m.powi(2) / ((WGS84_A * lat_sin).powi(2) + (WGS84_B * lat_cos).powi(2)))
        .sqrt();
    let lon_width = width_m / (WGS84_A * lat_cos);

    (lat_width.to_degrees(), lon_width.to_degrees())
}

/// Build the ring of a square release area
///
/// # Arguments
/// * `lat`, `lon` - Center of the square in decimal degrees
/// * `width_m` - Side length in meters
///
/// # Returns
/// * Four (lat, lon) corners: southwest, northwest, northeast, southeast
pub fn square_polygon(lat: f64, lon: f64, width_m: f64) -> Vec<(f64, f64)> {
    let (delta_lat, delta_lon) = square_extent(lat, width_m);

    let lat1 = lat - 0.5 * delta_lat;
    let lat2 = lat + 0.5 * delta_lat;
    let lon1 = lon - 0.5 * delta_lon;
    let lon2 = lon + 0.5 * delta_lon;

    vec![(lat1, lon1), (lat2, lon1), (lat2, lon2), (lat1, lon2)]
}
