use comfy_table::presets::ASCII_FULL;
use comfy_table::{Cell, CellAlignment, ContentArrangement, Table};
use std::path::Path;
use steerstat::aggregate::Statistic;
use steerstat::analysis::{FirstAnalysis, TestOutcome};
use steerstat::data::Dataset;
use steerstat::error::SsResult;
use steerstat::permutation::{NullDistributions, PermutationOutcome};
use steerstat::stats::hypothesis::TTest;
use steerstat::stats::Histogram;

const HISTOGRAM_WIDTH: usize = 40;

fn fixed(value: Option<f64>, places: usize) -> String {
    match value {
        Some(v) if v.is_finite() => format!("{:.*}", places, v),
        _ => "n/a".to_string(),
    }
}

fn new_table(header: Vec<&str>) -> Table {
    let mut table = Table::new();
    table
        .load_preset(ASCII_FULL)
        .set_content_arrangement(ContentArrangement::Disabled)
        .set_header(header);
    table
}

fn right_align(table: &mut Table, from: usize) {
    let columns = table.column_count();
    for i in from..columns {
        if let Some(col) = table.column_mut(i) {
            col.set_cell_alignment(CellAlignment::Right);
        }
    }
}

pub fn print_permutation_report(outcome: &PermutationOutcome, dataset: &Dataset, phase: i64) {
    println!(
        "\n=== PERMUTATION TEST: {} iterations, phase {}, {} trials, {} participants ===",
        outcome.nulls.iterations(),
        phase,
        dataset.len(),
        dataset.participant_count()
    );

    let mut table = new_table(vec!["Statistic", "Observed", "p (obs ≥ null)", "Null mean ± SD"]);
    for r in outcome.results() {
        let null = match r.null {
            Some(s) => format!("{:.3} ± {:.3}", s.mean, s.std_dev),
            None => "n/a".to_string(),
        };
        table.add_row(vec![
            Cell::new(r.statistic.to_string()),
            Cell::new(fixed(r.observed, 3)),
            Cell::new(fixed(r.p_value, 4)),
            Cell::new(null),
        ]);
    }
    right_align(&mut table, 1);
    println!("{}", table);
}

/// Text stand-in for the null histogram figure of the validity statistic.
pub fn print_null_histogram(outcome: &PermutationOutcome, bins: usize) {
    let stat = Statistic::SubjectValid;
    let Some(null) = outcome.nulls.get(stat) else {
        return;
    };
    match Histogram::new(null, bins) {
        Some(hist) => {
            println!("\nNull distribution: {} ({} bins)", stat, hist.bins.len());
            print!("{}", hist.render(outcome.observed.get(stat), HISTOGRAM_WIDTH));
        }
        None => println!("\n=== Histogram skipped: no defined null values ==="),
    }
}

/// One row per iteration, one column per statistic. Undefined draws are
/// written as empty fields.
pub fn export_nulls(path: &Path, nulls: &NullDistributions) -> SsResult<()> {
    let stats = nulls.statistics();
    let mut wtr = csv::Writer::from_path(path)?;

    let mut header = vec!["iteration".to_string()];
    header.extend(stats.iter().map(|s| s.key().to_string()));
    wtr.write_record(&header)?;

    for i in 0..nulls.iterations() {
        let mut row = vec![i.to_string()];
        for stat in &stats {
            let v = nulls.get(*stat).and_then(|col| col.get(i)).copied();
            row.push(match v {
                Some(v) if v.is_finite() => v.to_string(),
                _ => String::new(),
            });
        }
        wtr.write_record(&row)?;
    }
    wtr.flush()?;
    Ok(())
}

fn skipped(title: &str, reason: &str) {
    println!("=== {} skipped: {} ===\n", title, reason);
}

fn t_line(t: &TTest) -> String {
    format!("t = {:.3}, p = {:.4}", t.statistic, t.p_value)
}

pub fn print_analysis_report(report: &FirstAnalysis) {
    println!("=== MEAN proportion-correct ===");
    println!("{:<16}: {}", "Overall", fixed(report.overall_pcorrect, 3));
    for (order, m) in &report.pcorrect_by_order {
        println!("{:<16}: {:.3}", order.to_string(), m);
    }
    println!();

    if !report.exported_means.is_empty() {
        println!("=== MEAN exported scores ===");
        for (name, m) in &report.exported_means {
            println!("{:<26}: {:.3}", name, m);
        }
        println!();
    }

    match &report.order_t_test {
        TestOutcome::Ran(t) => {
            println!("=== t-test: pcorrect (first vs second) ===");
            println!("{}\n", t_line(t));
        }
        TestOutcome::Skipped(reason) => skipped("t-test", reason),
    }

    match &report.correlations {
        TestOutcome::Ran(rows) => {
            println!("=== Participant-level correlations ===");
            let mut table = new_table(vec!["Pair", "r", "p", "n"]);
            for row in rows {
                let pair = format!("{} ↔ {}", row.left, row.right);
                let cells = match &row.result {
                    Some(c) => vec![
                        pair,
                        format!("{:.3}", c.r),
                        format!("{:.4}", c.p_value),
                        c.n.to_string(),
                    ],
                    None => vec![
                        pair,
                        "skipped".into(),
                        "zero variance".into(),
                        String::new(),
                    ],
                };
                table.add_row(cells);
            }
            right_align(&mut table, 1);
            println!("{}\n", table);
        }
        TestOutcome::Skipped(reason) => skipped("Correlation", reason),
    }

    match &report.danger {
        TestOutcome::Ran(axes) => {
            for axis in axes {
                println!("=== Danger-aligned mistakes: {} ===", axis.axis);
                println!("Mean score ( +1 aligned / -1 opposed ) : {:.3}", axis.mean);
                match &axis.t_test {
                    Some(t) => println!("t vs 0: {}\n", t_line(t)),
                    None => println!("t vs 0: skipped (fewer than 2 participants or zero variance)\n"),
                }
            }
        }
        TestOutcome::Skipped(reason) => skipped("Danger-alignment analysis", reason),
    }

    match &report.ols {
        TestOutcome::Ran(fit) => {
            println!(
                "=== OLS on second-order pcorrect (worry, somatic, danger): n = {}, R² = {} ===",
                fit.n,
                fixed(Some(fit.r_squared), 3)
            );
            let mut table = new_table(vec!["Term", "coef", "std err", "t", "P>|t|"]);
            for c in &fit.coefficients {
                table.add_row(vec![
                    c.name.clone(),
                    format!("{:.4}", c.estimate),
                    format!("{:.4}", c.std_err),
                    fixed(Some(c.t), 3),
                    fixed(Some(c.p_value), 4),
                ]);
            }
            right_align(&mut table, 1);
            println!("{}", table);
        }
        TestOutcome::Skipped(reason) => skipped("OLS", reason),
    }
}
