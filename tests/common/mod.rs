#![allow(dead_code)]

use approx::assert_relative_eq;
use serde_json::json;
use spiacs::{constants::SECONDS_PER_DAY, Sample};

/// First time stamp of the synthetic series (IJD)
pub const START_IJD: f64 = 6195.25;

pub fn ijd_at(index: usize, step_seconds: f64) -> f64 {
    START_IJD + index as f64 * step_seconds / SECONDS_PER_DAY
}

/// Ordinary-tier text payload of `n` rows, `counts(i)` counts in row `i`
pub fn row_payload(n: usize, step_seconds: f64, counts: impl Fn(usize) -> f64) -> String {
    let mut text = String::from("# IJD dt counts\n");
    for i in 0..n {
        text.push_str(&format!(
            "{} {step_seconds} {}\n",
            ijd_at(i, step_seconds),
            counts(i)
        ));
    }
    text
}

/// Realtime-tier JSON payload with the given column names, `ijd` and `counts` filled in
/// where the names ask for them, `dt` elsewhere.
pub fn structured_payload(
    n: usize,
    step_seconds: f64,
    columns: &[&str],
    comment: Option<&str>,
) -> String {
    let data: Vec<serde_json::Value> = (0..n)
        .map(|i| {
            let row: Vec<serde_json::Value> = columns
                .iter()
                .map(|column| match *column {
                    "ijd" => json!(ijd_at(i, step_seconds)),
                    "counts" => json!(10),
                    _ => json!(step_seconds),
                })
                .collect();
            json!(row)
        })
        .collect();

    let mut document = json!({ "columns": columns, "data": data });
    if let Some(comment) = comment {
        document["comment"] = json!(comment);
    }
    document.to_string()
}

pub fn assert_samples_close(actual: &[Sample], expected: &[Sample], epsilon: f64) {
    assert_eq!(actual.len(), expected.len());
    for (a, e) in actual.iter().zip(expected) {
        assert_relative_eq!(a.time, e.time, epsilon = epsilon);
        assert_relative_eq!(a.rate, e.rate, epsilon = epsilon);
        assert_relative_eq!(a.error, e.error, epsilon = epsilon);
    }
}
