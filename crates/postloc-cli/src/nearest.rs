use postloc_core::{
    format_price, nearest_fulfillment_point, round_distance_km, surcharge_for_distance,
    Coordinates,
};

/// Prints the nearest fulfillment point to `(lat, lon)` and its surcharge.
pub(crate) fn run_nearest(lat: f64, lon: f64) {
    let nearest = nearest_fulfillment_point(Coordinates::new(lat, lon));
    let distance_km = round_distance_km(nearest.distance_km);

    println!("{:<12}{}", "NEAREST", nearest.point.name);
    println!("{:<12}{distance_km:.2} km", "DISTANCE");
    println!(
        "{:<12}{}",
        "SURCHARGE",
        format_price(surcharge_for_distance(distance_km))
    );
}
