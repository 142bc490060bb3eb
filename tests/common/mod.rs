#![allow(dead_code)]

use std::fs::File;
use std::io::Write;
use std::path::PathBuf;
use tempfile::TempDir;

pub const HEADER: &str = "sessionId,vehicleType,dangerous_vehicle,plan_seq,raw_input_seq,optimalRoute,type_generalization,phase,worry,somatic_anxiety,correctness_generalization,valid_generalization,bias_second_order_valid,bias_second_order_correct";

/// One CSV row of the trial export.
#[derive(Clone)]
pub struct Row {
    pub session: String,
    pub vehicle: String,
    pub dangerous: String,
    pub plan: String,
    pub raw: String,
    pub route: String,
    pub order: String,
    pub phase: String,
    pub worry: String,
    pub somatic: String,
    pub correctness: String,
}

impl Row {
    pub fn new(session: &str, vehicle: &str, keys: &str) -> Self {
        Self {
            session: session.into(),
            vehicle: vehicle.into(),
            dangerous: "small_sedan".into(),
            plan: keys.into(),
            raw: keys.into(),
            route: r#"["up","left","down"]"#.into(),
            order: "first-order".into(),
            phase: "2".into(),
            worry: "3".into(),
            somatic: "2".into(),
            correctness: "2".into(),
        }
    }

    pub fn order(mut self, order: &str) -> Self {
        self.order = order.into();
        self
    }

    pub fn phase(mut self, phase: &str) -> Self {
        self.phase = phase.into();
        self
    }

    pub fn route(mut self, route: &str) -> Self {
        self.route = route.into();
        self
    }

    pub fn dangerous(mut self, label: &str) -> Self {
        self.dangerous = label.into();
        self
    }

    pub fn to_csv(&self) -> String {
        let quoted_route = format!("\"{}\"", self.route.replace('"', "\"\""));
        [
            self.session.as_str(),
            &self.vehicle,
            &self.dangerous,
            &self.plan,
            &self.raw,
            &quoted_route,
            &self.order,
            &self.phase,
            &self.worry,
            &self.somatic,
            &self.correctness,
            "0.5",
            "",
            "",
        ]
        .join(",")
    }
}

pub fn to_csv(rows: &[Row]) -> String {
    let mut out = String::from(HEADER);
    out.push('\n');
    for row in rows {
        out.push_str(&row.to_csv());
        out.push('\n');
    }
    out
}

pub struct Fixture {
    _dir: TempDir,
    pub path: PathBuf,
}

impl Fixture {
    pub fn new(rows: &[Row]) -> Self {
        Self::from_text(&to_csv(rows))
    }

    pub fn from_text(text: &str) -> Self {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let path = dir.path().join("trials.csv");
        let mut file = File::create(&path).unwrap();
        write!(file, "{}", text).unwrap();
        Self { _dir: dir, path }
    }
}

/// A small two-version-compatible study: three participants on the
/// car/sedan scheme with a mix of valid and invalid presses.
pub fn sample_rows() -> Vec<Row> {
    vec![
        Row::new("p1", "small_car", "wad"),
        Row::new("p1", "big_car", "escf").order("second-order"),
        Row::new("p1", "small_car", "wwyy"),
        Row::new("p2", "small_sedan", "ygn").dangerous("big_car"),
        Row::new("p2", "medium_sedan", "yuhk").dangerous("big_car").order("second-order"),
        Row::new("p2", "small_sedan", "").dangerous("big_car"),
        Row::new("p3", "medium_car", "wxadj"),
        Row::new("p3", "big_sedan", "umhk").order("second-order"),
        Row::new("p3", "big_car", "nn").phase("1"),
    ]
}
