//! # Degradation metrics
//!
//! Remaining Useful Life and per-sensor linear degradation slopes over a
//! [`SensorTable`], folded into a single [`MetricsSummary`].
//!
//! - RUL of a row is `max_cycle(unit) - cycle`, so the last observed cycle of
//!   every unit has RUL 0.
//! - The degradation slope of a (unit, sensor) pair is the ordinary
//!   least-squares slope of the sensor value against cycle over that unit's
//!   rows. Pairs whose cycles have zero variance contribute a slope of 0.
//! - `mean_sensor_degradation_slope` is the plain mean of all pair slopes,
//!   sign preserved.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::dataset::{DatasetError, SensorRow, SensorTable};

/// Summary degradation statistics for one table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricsSummary {
    pub rows: usize,
    pub units: usize,
    pub mean_rul: f64,
    pub max_rul: f64,
    pub min_rul: f64,
    pub mean_sensor_degradation_slope: f64,
    pub num_sensors: usize,
}

/// Compute the summary for `table`.
///
/// Fails with [`DatasetError::EmptyTable`] when there are no rows.
pub fn compute_summary(table: &SensorTable) -> Result<MetricsSummary, DatasetError> {
    if table.is_empty() {
        return Err(DatasetError::EmptyTable);
    }

    let units = group_by_unit(table.rows());
    let lifespans = unit_lifespans(table);
    let ruls = rul_values_with(table.rows(), &lifespans);

    let sum: f64 = ruls.iter().map(|&r| r as f64).sum();
    let mean_rul = sum / ruls.len() as f64;
    let max_rul = ruls.iter().copied().max().unwrap_or_default() as f64;
    let min_rul = ruls.iter().copied().min().unwrap_or_default() as f64;

    let mut slope_sum = 0.0;
    let mut slope_count = 0usize;
    for rows in units.values() {
        let cycles: Vec<f64> = rows.iter().map(|r| r.cycle as f64).collect();
        for sensor in 0..table.num_sensors() {
            let values: Vec<f64> = rows.iter().map(|r| r.sensors[sensor]).collect();
            slope_sum += linear_slope(&cycles, &values);
            slope_count += 1;
        }
    }

    Ok(MetricsSummary {
        rows: table.len(),
        units: units.len(),
        mean_rul,
        max_rul,
        min_rul,
        mean_sensor_degradation_slope: slope_sum / slope_count as f64,
        num_sensors: table.num_sensors(),
    })
}

/// Max observed cycle per unit.
pub fn unit_lifespans(table: &SensorTable) -> HashMap<i64, i64> {
    let mut lifespans: HashMap<i64, i64> = HashMap::new();
    for row in table.rows() {
        lifespans
            .entry(row.unit_id)
            .and_modify(|max| *max = (*max).max(row.cycle))
            .or_insert(row.cycle);
    }
    lifespans
}

/// RUL of every row, in table order.
pub fn rul_values(table: &SensorTable) -> Vec<i64> {
    rul_values_with(table.rows(), &unit_lifespans(table))
}

fn rul_values_with(rows: &[SensorRow], lifespans: &HashMap<i64, i64>) -> Vec<i64> {
    rows.iter()
        .map(|row| lifespans[&row.unit_id] - row.cycle)
        .collect()
}

fn group_by_unit(rows: &[SensorRow]) -> HashMap<i64, Vec<&SensorRow>> {
    let mut units: HashMap<i64, Vec<&SensorRow>> = HashMap::new();
    for row in rows {
        units.entry(row.unit_id).or_default().push(row);
    }
    units
}

/// Ordinary least-squares slope of `ys` against `xs`.
///
/// Returns 0 when the inputs are shorter than two points or `xs` has zero
/// variance.
pub fn linear_slope(xs: &[f64], ys: &[f64]) -> f64 {
    let n = xs.len().min(ys.len());
    if n < 2 {
        return 0.0;
    }

    let mean_x = xs[..n].iter().sum::<f64>() / n as f64;
    let mean_y = ys[..n].iter().sum::<f64>() / n as f64;

    let (cov, var) = xs[..n]
        .iter()
        .zip(&ys[..n])
        .fold((0.0, 0.0), |(cov, var), (x, y)| {
            let dx = x - mean_x;
            (cov + dx * (y - mean_y), var + dx * dx)
        });

    if var.abs() < f64::EPSILON {
        return 0.0;
    }
    cov / var
}
