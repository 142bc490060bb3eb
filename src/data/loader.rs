use super::types::{Dataset, GeneralizationOrder, RouteStep, Trial};
use crate::error::{SsResult, SteerError};
use crate::schemes::Direction;
use csv::StringRecord;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::{debug, info, warn};

pub const COL_SESSION: &str = "sessionId";
pub const COL_VEHICLE: &str = "vehicleType";
pub const COL_DANGEROUS: &str = "dangerous_vehicle";
pub const COL_ROUTE: &str = "optimalRoute";
pub const COL_ORDER: &str = "type_generalization";
pub const COL_PHASE: &str = "phase";
pub const COL_PLAN_SEQ: &str = "plan_seq";
pub const COL_RAW_INPUT_SEQ: &str = "raw_input_seq";

/// Tokens pandas-style exports use for missing values.
const MISSING_TOKENS: [&str; 9] = ["", "nan", "NaN", "NAN", "None", "null", "NULL", "NA", "<NA>"];

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct LoadReport {
    pub rows_read: usize,
    pub rows_skipped: usize,
    pub malformed_routes: usize,
    pub malformed_numbers: usize,
}

struct Columns {
    session: usize,
    keys: usize,
    vehicle: Option<usize>,
    dangerous: Option<usize>,
    route: Option<usize>,
    order: Option<usize>,
    phase: Option<usize>,
    worry: Option<usize>,
    somatic: Option<usize>,
    correctness: Option<usize>,
    valid: Option<usize>,
    bias_valid: Option<usize>,
    bias_correct: Option<usize>,
}

impl Columns {
    fn resolve(headers: &StringRecord, keys_column: &str) -> SsResult<Self> {
        let find = |name: &str| headers.iter().position(|h| h.trim() == name);

        let session = find(COL_SESSION).ok_or_else(|| {
            SteerError::Schema(format!("required column '{}' is missing", COL_SESSION))
        })?;

        let fallback = if keys_column == COL_PLAN_SEQ {
            COL_RAW_INPUT_SEQ
        } else {
            COL_PLAN_SEQ
        };
        let keys = match find(keys_column) {
            Some(idx) => idx,
            None => {
                let idx = find(fallback).ok_or_else(|| {
                    SteerError::Schema(format!(
                        "neither '{}' nor '{}' column is present",
                        keys_column, fallback
                    ))
                })?;
                warn!(
                    "Key column '{}' not found, using '{}' instead.",
                    keys_column, fallback
                );
                idx
            }
        };

        let cols = Self {
            session,
            keys,
            vehicle: find(COL_VEHICLE),
            dangerous: find(COL_DANGEROUS),
            route: find(COL_ROUTE),
            order: find(COL_ORDER),
            phase: find(COL_PHASE),
            worry: find("worry"),
            somatic: find("somatic_anxiety"),
            correctness: find("correctness_generalization"),
            valid: find("valid_generalization"),
            bias_valid: find("bias_second_order_valid"),
            bias_correct: find("bias_second_order_correct"),
        };

        for (name, idx) in [
            (COL_VEHICLE, cols.vehicle),
            (COL_ROUTE, cols.route),
            (COL_ORDER, cols.order),
            (COL_PHASE, cols.phase),
        ] {
            if idx.is_none() {
                warn!("Column '{}' not found; every row treats it as missing.", name);
            }
        }

        Ok(cols)
    }
}

/// Untrimmed cell text, `None` when the cell holds a missing-value token.
/// Used for key sequences, where surrounding spaces are typed keys.
fn raw_field<'r>(rec: &'r StringRecord, idx: Option<usize>) -> Option<&'r str> {
    let value = rec.get(idx?)?;
    if MISSING_TOKENS.contains(&value.trim()) {
        None
    } else {
        Some(value)
    }
}

fn field<'r>(rec: &'r StringRecord, idx: Option<usize>) -> Option<&'r str> {
    raw_field(rec, idx).map(str::trim)
}

fn number(rec: &StringRecord, idx: Option<usize>, report: &mut LoadReport) -> Option<f64> {
    let raw = field(rec, idx)?;
    match raw.parse::<f64>() {
        Ok(v) if v.is_finite() => Some(v),
        _ => {
            report.malformed_numbers += 1;
            None
        }
    }
}

/// Parses a JSON array of direction labels. `None` if the text is not a
/// JSON array of strings.
pub fn parse_route(raw: &str) -> Option<Vec<RouteStep>> {
    let labels: Vec<String> = serde_json::from_str(raw).ok()?;
    Some(
        labels
            .iter()
            .map(|l| l.trim().parse::<Direction>().ok())
            .collect(),
    )
}

fn parse_trial(rec: &StringRecord, cols: &Columns, report: &mut LoadReport) -> Option<Trial> {
    let session_id = field(rec, Some(cols.session))?.to_string();

    let optimal_route = match field(rec, cols.route) {
        Some(raw) => parse_route(raw).unwrap_or_else(|| {
            report.malformed_routes += 1;
            debug!("Malformed optimalRoute for session {}: {}", session_id, raw);
            Vec::new()
        }),
        None => Vec::new(),
    };

    let order = field(rec, cols.order).and_then(|o| o.parse::<GeneralizationOrder>().ok());

    Some(Trial {
        vehicle_type: field(rec, cols.vehicle)
            .map(|v| v.to_lowercase())
            .unwrap_or_default(),
        dangerous_vehicle: field(rec, cols.dangerous)
            .map(|v| v.to_lowercase())
            .unwrap_or_default(),
        keys: raw_field(rec, Some(cols.keys))
            .map(|k| k.to_lowercase().chars().collect())
            .unwrap_or_default(),
        optimal_route,
        order,
        phase: number(rec, cols.phase, report),
        worry: number(rec, cols.worry, report),
        somatic_anxiety: number(rec, cols.somatic, report),
        correctness_generalization: number(rec, cols.correctness, report),
        valid_generalization: number(rec, cols.valid, report),
        bias_second_order_valid: number(rec, cols.bias_valid, report),
        bias_second_order_correct: number(rec, cols.bias_correct, report),
        session_id,
    })
}

/// Reads trial rows from any CSV source. `keys_column` names the preferred
/// key-sequence column; the other known one is used if it is absent.
pub fn load_trials_from_reader<R: Read>(
    reader: R,
    keys_column: &str,
) -> SsResult<(Dataset, LoadReport)> {
    let mut rdr = csv::ReaderBuilder::new()
        .flexible(true)
        .has_headers(true)
        .from_reader(reader);

    let headers = rdr.headers()?.clone();
    let cols = Columns::resolve(&headers, keys_column)?;

    let mut report = LoadReport::default();
    let mut trials = Vec::new();

    for (row_idx, result) in rdr.records().enumerate() {
        report.rows_read += 1;
        match result {
            Ok(rec) => match parse_trial(&rec, &cols, &mut report) {
                Some(trial) => trials.push(trial),
                None => {
                    report.rows_skipped += 1;
                    debug!("[Row {}] skipped: no session id", row_idx + 1);
                }
            },
            Err(e) => {
                report.rows_skipped += 1;
                debug!("[Row {}] CSV Parse Error: {}", row_idx + 1, e);
            }
        }
    }

    if report.rows_skipped > 0 {
        warn!("Skipped {} unreadable rows.", report.rows_skipped);
    }
    if report.malformed_routes > 0 {
        warn!(
            "{} rows had an unparsable optimalRoute (scored against an empty route).",
            report.malformed_routes
        );
    }
    if report.malformed_numbers > 0 {
        warn!(
            "{} numeric fields were not numbers (treated as missing).",
            report.malformed_numbers
        );
    }

    Ok((Dataset::new(trials), report))
}

pub fn load_trials<P: AsRef<Path>>(path: P, keys_column: &str) -> SsResult<Dataset> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(SteerError::MissingInput(path.to_path_buf()));
    }

    info!("📂 Loading trials from: {}", path.display());
    let file = File::open(path)?;
    let (dataset, report) = load_trials_from_reader(file, keys_column)?;
    info!(
        "   -> Read {} rows, kept {} trials from {} participants.",
        report.rows_read,
        dataset.len(),
        dataset.participant_count()
    );
    Ok(dataset)
}
