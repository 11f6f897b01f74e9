//! Great-circle distance to the fixed fulfillment points.

const EARTH_RADIUS_KM: f64 = 6371.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    #[must_use]
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }
}

/// A warehouse or collection location that orders ship from.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FulfillmentPoint {
    pub name: &'static str,
    pub coordinates: Coordinates,
}

pub const FULFILLMENT_POINTS: &[FulfillmentPoint] = &[
    FulfillmentPoint {
        name: "Archerfield, QLD",
        coordinates: Coordinates::new(-27.575_9, 153.017_2),
    },
    FulfillmentPoint {
        name: "Rockdale, NSW",
        coordinates: Coordinates::new(-33.943_9, 151.146_2),
    },
    FulfillmentPoint {
        name: "Reservoir, VIC",
        coordinates: Coordinates::new(-37.717_3, 145.011_4),
    },
    FulfillmentPoint {
        name: "Forrestfield, WA",
        coordinates: Coordinates::new(-31.950_1, 116.007_5),
    },
];

/// The closest fulfillment point to some location.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NearestPoint {
    pub point: &'static FulfillmentPoint,
    pub distance_km: f64,
}

/// Haversine distance in kilometres between two coordinates.
#[must_use]
pub fn haversine_km(a: Coordinates, b: Coordinates) -> f64 {
    let d_lat = (b.latitude - a.latitude).to_radians();
    let d_lon = (b.longitude - a.longitude).to_radians();
    let lat1 = a.latitude.to_radians();
    let lat2 = b.latitude.to_radians();

    let h = (d_lat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (d_lon / 2.0).sin().powi(2);
    let c = 2.0 * h.sqrt().atan2((1.0 - h).sqrt());
    EARTH_RADIUS_KM * c
}

/// Linear scan over [`FULFILLMENT_POINTS`] for the smallest distance.
///
/// Ties keep the earlier point in the table.
#[must_use]
pub fn nearest_fulfillment_point(from: Coordinates) -> NearestPoint {
    let mut nearest = NearestPoint {
        point: &FULFILLMENT_POINTS[0],
        distance_km: haversine_km(from, FULFILLMENT_POINTS[0].coordinates),
    };

    for point in &FULFILLMENT_POINTS[1..] {
        let distance_km = haversine_km(from, point.coordinates);
        if distance_km < nearest.distance_km {
            nearest = NearestPoint { point, distance_km };
        }
    }

    nearest
}

#[cfg(test)]
mod tests {
    use super::*;

    // Melbourne CBD (postcode 3000).
    const MELBOURNE: Coordinates = Coordinates::new(-37.814, 144.963);
    // Darwin (postcode 0800).
    const DARWIN: Coordinates = Coordinates::new(-12.463, 130.845);

    #[test]
    fn haversine_is_zero_for_identical_points() {
        assert!(haversine_km(MELBOURNE, MELBOURNE).abs() < 1e-9);
    }

    #[test]
    fn haversine_is_symmetric_and_non_negative() {
        let ab = haversine_km(MELBOURNE, DARWIN);
        let ba = haversine_km(DARWIN, MELBOURNE);
        assert!(ab > 0.0);
        assert!((ab - ba).abs() < 1e-9, "ab={ab} ba={ba}");
    }

    #[test]
    fn haversine_matches_known_distance() {
        // Sydney to Melbourne is roughly 713 km as the crow flies.
        let sydney = Coordinates::new(-33.8688, 151.2093);
        let d = haversine_km(sydney, MELBOURNE);
        assert!((d - 713.0).abs() < 5.0, "got {d}");
    }

    #[test]
    fn haversine_quarter_meridian() {
        let equator = Coordinates::new(0.0, 0.0);
        let pole = Coordinates::new(90.0, 0.0);
        let expected = EARTH_RADIUS_KM * std::f64::consts::FRAC_PI_2;
        assert!((haversine_km(equator, pole) - expected).abs() < 1e-6);
    }

    #[test]
    fn nearest_point_for_melbourne_is_reservoir() {
        let nearest = nearest_fulfillment_point(MELBOURNE);
        assert_eq!(nearest.point.name, "Reservoir, VIC");
        assert!(nearest.distance_km < 20.0, "got {}", nearest.distance_km);
    }

    #[test]
    fn nearest_point_for_perth_is_forrestfield() {
        let perth = Coordinates::new(-31.9505, 115.8605);
        let nearest = nearest_fulfillment_point(perth);
        assert_eq!(nearest.point.name, "Forrestfield, WA");
    }

    #[test]
    fn nearest_point_distance_is_minimum_over_all_points() {
        let nearest = nearest_fulfillment_point(DARWIN);
        for point in FULFILLMENT_POINTS {
            assert!(nearest.distance_km <= haversine_km(DARWIN, point.coordinates));
        }
    }

    #[test]
    fn nearest_point_at_a_fulfillment_point_is_zero() {
        let rockdale = FULFILLMENT_POINTS[1].coordinates;
        let nearest = nearest_fulfillment_point(rockdale);
        assert_eq!(nearest.point.name, "Rockdale, NSW");
        assert!(nearest.distance_km.abs() < 1e-9);
    }
}
