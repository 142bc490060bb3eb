use crate::data::RouteStep;
use crate::schemes::{Direction, VehicleKeyScheme};

/// Decodes every key into a direction for this vehicle; keys outside its
/// alphabet decode to `None`.
pub fn decode(keys: &[char], vehicle_type: &str, scheme: &VehicleKeyScheme) -> Vec<Option<Direction>> {
    keys.iter()
        .map(|&k| scheme.direction(k, vehicle_type))
        .collect()
}

/// Number of positions, up to the shorter of the two sequences, where the
/// decoded key matches the planned route. Undecodable keys never match.
pub fn recompute_correct(
    keys: &[char],
    optimal: &[RouteStep],
    vehicle_type: &str,
    scheme: &VehicleKeyScheme,
) -> usize {
    decode(keys, vehicle_type, scheme)
        .into_iter()
        .zip(optimal)
        .filter(|(decoded, step)| matches!((decoded, step), (Some(d), Some(s)) if d == s))
        .count()
}

/// Fraction of keys that belong to the vehicle's alphabet. Zero for an empty
/// sequence or an unknown vehicle.
pub fn recompute_valid(keys: &[char], vehicle_type: &str, scheme: &VehicleKeyScheme) -> f64 {
    if keys.is_empty() || scheme.allowed_keys(vehicle_type).is_empty() {
        return 0.0;
    }
    let hits = keys
        .iter()
        .filter(|&&k| scheme.is_allowed(k, vehicle_type))
        .count();
    hits as f64 / keys.len() as f64
}
