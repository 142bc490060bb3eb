//! Vehicle key schemes.
//!
//! A scheme maps every vehicle type of one experiment variant to its legal key
//! alphabet and to the semantic direction of each key. Schemes are plain values
//! selected once per run and passed explicitly into the metric functions, so
//! both experiment variants can be analysed by the same engine.

use crate::error::SsResult;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap, HashSet};
use std::fs;
use std::path::Path;
use strum_macros::{Display, EnumIter, EnumString};

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, EnumIter,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Direction {
    Left,
    Right,
    Up,
    Down,
}

impl Direction {
    pub fn axis(self) -> Axis {
        match self {
            Self::Up | Self::Down => Axis::UpDown,
            Self::Left | Self::Right => Axis::LeftRight,
        }
    }
}

/// Motor axis: up/down is the "large" movement, left/right the "fine" one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
#[strum(serialize_all = "lowercase")]
pub enum Axis {
    UpDown,
    LeftRight,
}

/// Broad vehicle category used by the danger-alignment analysis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Category {
    CarLike,
    TruckLike,
}

/// Serializable control layout of one vehicle type.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct VehicleControls {
    pub category: Category,
    #[serde(default)]
    pub up: Vec<char>,
    #[serde(default)]
    pub down: Vec<char>,
    #[serde(default)]
    pub left: Vec<char>,
    #[serde(default)]
    pub right: Vec<char>,
}

impl VehicleControls {
    fn from_keys(category: Category, up: &str, down: &str, left: &str, right: &str) -> Self {
        Self {
            category,
            up: up.chars().collect(),
            down: down.chars().collect(),
            left: left.chars().collect(),
            right: right.chars().collect(),
        }
    }

    fn bindings(&self) -> impl Iterator<Item = (char, Direction)> + '_ {
        let up = self.up.iter().map(|&k| (k, Direction::Up));
        let down = self.down.iter().map(|&k| (k, Direction::Down));
        let left = self.left.iter().map(|&k| (k, Direction::Left));
        let right = self.right.iter().map(|&k| (k, Direction::Right));
        up.chain(down).chain(left).chain(right)
    }
}

/// On-disk form of a scheme (`--scheme-file`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchemeDefinition {
    pub name: String,
    /// Substring marking a dangerous-vehicle label as truck-like.
    pub truck_label: String,
    pub vehicles: BTreeMap<String, VehicleControls>,
}

impl SchemeDefinition {
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> SsResult<Self> {
        let content = fs::read_to_string(path)?;
        let def = serde_json::from_str(&content)?;
        Ok(def)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, EnumString, Display)]
pub enum KnownScheme {
    /// Study 1: cars vs trucks.
    #[strum(to_string = "car-truck", serialize = "v1")]
    CarTruck,
    /// Study 2: cars vs sedans.
    #[strum(to_string = "car-sedan", serialize = "v2")]
    CarSedan,
}

impl KnownScheme {
    pub fn definition(&self) -> SchemeDefinition {
        use Category::{CarLike, TruckLike};

        let (truck_label, table): (&str, [(&str, VehicleControls); 6]) = match self {
            Self::CarTruck => (
                "truck",
                [
                    ("small_car", VehicleControls::from_keys(CarLike, "e", "c", "q", "w")),
                    ("big_car", VehicleControls::from_keys(CarLike, "e", "c", "z", "x")),
                    ("medium_car", VehicleControls::from_keys(CarLike, "e", "c", "qz", "wx")),
                    ("truck", VehicleControls::from_keys(TruckLike, "t", "b", "n", "m")),
                    ("pickup_truck", VehicleControls::from_keys(TruckLike, "t", "b", "y", "u")),
                    ("dump_truck", VehicleControls::from_keys(TruckLike, "t", "b", "ny", "mu")),
                ],
            ),
            Self::CarSedan => (
                "sedan",
                [
                    ("small_car", VehicleControls::from_keys(CarLike, "w", "x", "a", "d")),
                    ("big_car", VehicleControls::from_keys(CarLike, "e", "c", "s", "f")),
                    ("medium_car", VehicleControls::from_keys(CarLike, "we", "xc", "as", "df")),
                    ("small_sedan", VehicleControls::from_keys(TruckLike, "y", "n", "g", "j")),
                    ("big_sedan", VehicleControls::from_keys(TruckLike, "u", "m", "h", "k")),
                    ("medium_sedan", VehicleControls::from_keys(TruckLike, "yu", "nm", "gh", "jk")),
                ],
            ),
        };

        SchemeDefinition {
            name: self.to_string(),
            truck_label: truck_label.to_string(),
            vehicles: table
                .into_iter()
                .map(|(name, controls)| (name.to_string(), controls))
                .collect(),
        }
    }

    pub fn build(&self) -> VehicleKeyScheme {
        VehicleKeyScheme::from_definition(self.definition())
    }
}

#[derive(Debug, Clone)]
struct VehicleLookup {
    allowed: HashSet<char>,
    directions: HashMap<char, Direction>,
}

#[derive(Debug, Clone, Default)]
struct CategoryKeys {
    up_down: HashSet<char>,
    left_right: HashSet<char>,
}

impl CategoryKeys {
    fn axis(&self, axis: Axis) -> &HashSet<char> {
        match axis {
            Axis::UpDown => &self.up_down,
            Axis::LeftRight => &self.left_right,
        }
    }
}

/// Runtime lookup tables for one scheme. All lookups are case-insensitive.
#[derive(Debug, Clone)]
pub struct VehicleKeyScheme {
    name: String,
    truck_label: String,
    vehicles: HashMap<String, VehicleLookup>,
    car_keys: CategoryKeys,
    truck_keys: CategoryKeys,
    empty: HashSet<char>,
}

impl VehicleKeyScheme {
    pub fn from_definition(def: SchemeDefinition) -> Self {
        let mut vehicles = HashMap::new();
        let mut car_keys = CategoryKeys::default();
        let mut truck_keys = CategoryKeys::default();

        for (name, controls) in &def.vehicles {
            let mut lookup = VehicleLookup {
                allowed: HashSet::new(),
                directions: HashMap::new(),
            };
            let bucket = match controls.category {
                Category::CarLike => &mut car_keys,
                Category::TruckLike => &mut truck_keys,
            };

            for (key, dir) in controls.bindings() {
                let key = key.to_ascii_lowercase();
                lookup.allowed.insert(key);
                lookup.directions.insert(key, dir);
                match dir.axis() {
                    Axis::UpDown => bucket.up_down.insert(key),
                    Axis::LeftRight => bucket.left_right.insert(key),
                };
            }
            vehicles.insert(name.to_ascii_lowercase(), lookup);
        }

        Self {
            name: def.name,
            truck_label: def.truck_label.to_ascii_lowercase(),
            vehicles,
            car_keys,
            truck_keys,
            empty: HashSet::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    fn vehicle(&self, vehicle_type: &str) -> Option<&VehicleLookup> {
        match self.vehicles.get(vehicle_type) {
            Some(v) => Some(v),
            None => self.vehicles.get(&vehicle_type.trim().to_ascii_lowercase()),
        }
    }

    /// Legal key alphabet of a vehicle type; empty for unknown types.
    pub fn allowed_keys(&self, vehicle_type: &str) -> &HashSet<char> {
        self.vehicle(vehicle_type)
            .map(|v| &v.allowed)
            .unwrap_or(&self.empty)
    }

    pub fn is_allowed(&self, key: char, vehicle_type: &str) -> bool {
        self.allowed_keys(vehicle_type)
            .contains(&key.to_ascii_lowercase())
    }

    /// Semantic direction of `key` for this vehicle, `None` outside its alphabet.
    pub fn direction(&self, key: char, vehicle_type: &str) -> Option<Direction> {
        self.vehicle(vehicle_type)?
            .directions
            .get(&key.to_ascii_lowercase())
            .copied()
    }

    /// Classifies a dangerous-vehicle label. The truck-like keyword wins over
    /// `car`; anything else is unknown.
    pub fn category_of_label(&self, label: &str) -> Option<Category> {
        let label = label.to_ascii_lowercase();
        let truck_like = !self.truck_label.is_empty() && label.contains(&self.truck_label);
        if truck_like || label.contains("truck") {
            Some(Category::TruckLike)
        } else if label.contains("car") {
            Some(Category::CarLike)
        } else {
            None
        }
    }

    /// Axis a key belongs to across every vehicle of either category.
    /// Up/down membership is checked first.
    pub fn mistake_axis(&self, key: char) -> Option<Axis> {
        let key = key.to_ascii_lowercase();
        if self.car_keys.up_down.contains(&key) || self.truck_keys.up_down.contains(&key) {
            Some(Axis::UpDown)
        } else if self.car_keys.left_right.contains(&key)
            || self.truck_keys.left_right.contains(&key)
        {
            Some(Axis::LeftRight)
        } else {
            None
        }
    }

    pub fn category_has_key(&self, category: Category, axis: Axis, key: char) -> bool {
        let keys = match category {
            Category::CarLike => &self.car_keys,
            Category::TruckLike => &self.truck_keys,
        };
        keys.axis(axis).contains(&key.to_ascii_lowercase())
    }

    pub fn vehicle_types(&self) -> impl Iterator<Item = &str> {
        self.vehicles.keys().map(|s| s.as_str())
    }
}
