use rstest::rstest;
use steerstat::metrics::{danger_alignment, recompute_correct, recompute_valid};
use steerstat::schemes::{Category, Direction, KnownScheme, SchemeDefinition, VehicleKeyScheme};

#[rstest]
#[case(KnownScheme::CarTruck, "small_car", 'e', Some(Direction::Up))]
#[case(KnownScheme::CarTruck, "small_car", 'q', Some(Direction::Left))]
#[case(KnownScheme::CarTruck, "dump_truck", 'y', Some(Direction::Left))]
#[case(KnownScheme::CarTruck, "dump_truck", 'U', Some(Direction::Right))]
#[case(KnownScheme::CarTruck, "truck", 'e', None)]
#[case(KnownScheme::CarSedan, "small_car", 'w', Some(Direction::Up))]
#[case(KnownScheme::CarSedan, "SMALL_CAR", 'd', Some(Direction::Right))]
#[case(KnownScheme::CarSedan, "medium_sedan", 'k', Some(Direction::Right))]
#[case(KnownScheme::CarSedan, "big_sedan", 'y', None)]
#[case(KnownScheme::CarSedan, "hovercraft", 'w', None)]
fn direction_lookup(
    #[case] scheme: KnownScheme,
    #[case] vehicle: &str,
    #[case] key: char,
    #[case] expected: Option<Direction>,
) {
    assert_eq!(scheme.build().direction(key, vehicle), expected);
}

#[rstest]
#[case(KnownScheme::CarTruck, "medium_car", "ecqzwx")]
#[case(KnownScheme::CarTruck, "pickup_truck", "tbyu")]
#[case(KnownScheme::CarSedan, "big_car", "ecsf")]
#[case(KnownScheme::CarSedan, "medium_sedan", "yunmghjk")]
fn allowed_alphabets(#[case] scheme: KnownScheme, #[case] vehicle: &str, #[case] keys: &str) {
    let built = scheme.build();
    let allowed = built.allowed_keys(vehicle);
    assert_eq!(allowed.len(), keys.len());
    assert!(keys.chars().all(|k| allowed.contains(&k)));
}

#[rstest]
#[case("v1", KnownScheme::CarTruck)]
#[case("car-truck", KnownScheme::CarTruck)]
#[case("v2", KnownScheme::CarSedan)]
#[case("car-sedan", KnownScheme::CarSedan)]
fn scheme_names_parse(#[case] name: &str, #[case] expected: KnownScheme) {
    assert_eq!(name.parse::<KnownScheme>().unwrap(), expected);
}

#[test]
fn e2e_small_car_example() {
    let scheme = KnownScheme::CarSedan.build();
    let keys: Vec<char> = "wad".chars().collect();
    let optimal = vec![Some(Direction::Up), Some(Direction::Left), Some(Direction::Down)];
    assert_eq!(recompute_valid(&keys, "small_car", &scheme), 1.0);
    assert_eq!(recompute_correct(&keys, &optimal, "small_car", &scheme), 2);
}

#[test]
fn e2e_empty_sequence() {
    for scheme in [KnownScheme::CarTruck.build(), KnownScheme::CarSedan.build()] {
        let optimal = vec![Some(Direction::Up)];
        assert_eq!(recompute_valid(&[], "small_car", &scheme), 0.0);
        assert_eq!(recompute_correct(&[], &optimal, "small_car", &scheme), 0);
    }
}

#[test]
fn e2e_truck_danger_example() {
    let scheme = KnownScheme::CarTruck.build();
    let category = scheme.category_of_label("truck").unwrap();
    assert_eq!(category, Category::TruckLike);
    let score = danger_alignment(&['b'], "big_car", category, &scheme);
    assert_eq!(score.up_down, 1);
}

#[test]
fn custom_scheme_round_trips_through_json() {
    let def = KnownScheme::CarTruck.definition();
    let json = serde_json::to_string(&def).unwrap();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("scheme.json");
    std::fs::write(&path, json).unwrap();

    let loaded = VehicleKeyScheme::from_definition(SchemeDefinition::load_from_file(&path).unwrap());
    assert_eq!(loaded.direction('m', "truck"), Some(Direction::Right));
    assert_eq!(loaded.name(), "car-truck");
}
