use geo::{Distance, Haversine};

use crate::travel_matrices::TravelMatrices;

/// Great-circle distances between every pair of points, travel times derived from a constant
/// average speed.
pub fn as_the_crow_flies_matrices<P>(points: &[P], speed_kmh: f64) -> TravelMatrices
where
    for<'a> &'a P: Into<geo_types::Point>,
{
    let points: Vec<geo_types::Point> = points.iter().map(|point| point.into()).collect();
    let num_locations = points.len();

    let mut distances = vec![0.0; num_locations * num_locations];
    let mut times = vec![0.0; num_locations * num_locations];

    let meters_per_second = speed_kmh / 3.6;

    for (i, &from) in points.iter().enumerate() {
        for (j, &to) in points.iter().enumerate() {
            if i == j {
                continue;
            }

            let distance = Haversine.distance(from, to);
            distances[i * num_locations + j] = distance;
            times[i * num_locations + j] = distance / meters_per_second;
        }
    }

    TravelMatrices { distances, times }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct LonLat(f64, f64);

    impl From<&LonLat> for geo_types::Point {
        fn from(value: &LonLat) -> Self {
            geo_types::Point::new(value.0, value.1)
        }
    }

    #[test]
    fn test_as_the_crow_flies_matrices() {
        let points = vec![
            LonLat(4.3517, 50.8503),
            LonLat(4.4025, 51.2194),
            LonLat(4.3517, 50.8503),
        ];

        let matrices = as_the_crow_flies_matrices(&points, 36.0);

        assert_eq!(matrices.num_locations(), 3);
        assert_eq!(matrices.distances[0], 0.0);

        // Brussels -> Antwerp is roughly 41 km
        let distance = matrices.distances[1];
        assert!((40_000.0..42_000.0).contains(&distance), "{distance}");
        assert_eq!(matrices.distances[1], matrices.distances[3]);

        // 36 km/h is 10 m/s
        assert!((matrices.times[1] - distance / 10.0).abs() < 1e-9);

        // Same coordinates, different indices
        assert_eq!(matrices.distances[2], 0.0);
    }
}
