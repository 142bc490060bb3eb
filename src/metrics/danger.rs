use crate::schemes::{Axis, Category, VehicleKeyScheme};
use std::ops::AddAssign;

/// Signed tally of mistaken keys per motor axis: +1 when the key belongs to
/// the participant's dangerous category, -1 otherwise.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct DangerAlignment {
    pub up_down: i64,
    pub left_right: i64,
    /// Mistakes that were scored on either axis.
    pub scored: usize,
}

impl DangerAlignment {
    pub fn axis(&self, axis: Axis) -> i64 {
        match axis {
            Axis::UpDown => self.up_down,
            Axis::LeftRight => self.left_right,
        }
    }
}

impl AddAssign for DangerAlignment {
    fn add_assign(&mut self, rhs: Self) {
        self.up_down += rhs.up_down;
        self.left_right += rhs.left_right;
        self.scored += rhs.scored;
    }
}

/// Scores every key outside the vehicle's alphabet. Keys that belong to no
/// vehicle of either category are ignored.
pub fn danger_alignment(
    keys: &[char],
    vehicle_type: &str,
    dangerous: Category,
    scheme: &VehicleKeyScheme,
) -> DangerAlignment {
    let mut score = DangerAlignment::default();

    for &key in keys {
        let key = key.to_ascii_lowercase();
        if scheme.is_allowed(key, vehicle_type) {
            continue;
        }
        let Some(axis) = scheme.mistake_axis(key) else {
            continue;
        };
        let delta = if scheme.category_has_key(dangerous, axis, key) {
            1
        } else {
            -1
        };
        match axis {
            Axis::UpDown => score.up_down += delta,
            Axis::LeftRight => score.left_right += delta,
        }
        score.scored += 1;
    }

    score
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schemes::KnownScheme;

    fn chars(s: &str) -> Vec<char> {
        s.chars().collect()
    }

    #[test]
    fn truck_key_in_car_counts_towards_truck_danger() {
        let scheme = KnownScheme::CarTruck.build();
        let score = danger_alignment(&chars("t"), "small_car", Category::TruckLike, &scheme);
        assert_eq!(score.up_down, 1);
        assert_eq!(score.left_right, 0);
        assert_eq!(score.scored, 1);
    }

    #[test]
    fn opposite_category_scores_negative() {
        let scheme = KnownScheme::CarTruck.build();
        let score = danger_alignment(&chars("bn"), "small_car", Category::CarLike, &scheme);
        assert_eq!(score.up_down, -1);
        assert_eq!(score.left_right, -1);
    }

    #[test]
    fn same_category_mistake_can_align() {
        // 'z' steers the big car, so it is a car-like mistake in the small car.
        let scheme = KnownScheme::CarTruck.build();
        let score = danger_alignment(&chars("zq"), "small_car", Category::CarLike, &scheme);
        assert_eq!(score.left_right, 1);
        assert_eq!(score.scored, 1);
    }

    #[test]
    fn unknown_keys_are_invisible() {
        let scheme = KnownScheme::CarTruck.build();
        let score = danger_alignment(&chars("p1!"), "truck", Category::TruckLike, &scheme);
        assert_eq!(score, DangerAlignment::default());
    }

    #[test]
    fn valid_keys_are_not_mistakes() {
        let scheme = KnownScheme::CarTruck.build();
        let score = danger_alignment(&chars("tbnm"), "truck", Category::TruckLike, &scheme);
        assert_eq!(score.scored, 0);
    }
}
