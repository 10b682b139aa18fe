//! Sensor dataset layer: table model, file loading and the shared snapshot.
//!
//! ```text
//!  .txt / .csv / .xlsx
//!        │
//!        ▼
//!   ┌──────────┐
//!   │  loader  │  parse file → SensorTable
//!   └──────────┘
//!        │
//!        ▼
//!   ┌──────────┐
//!   │  store   │  Arc<DatasetSnapshot>, swapped on reload
//!   └──────────┘
//! ```
//!
//! Columns are positional: column 0 is the unit id, column 1 the cycle and
//! every remaining column a sensor reading.

pub mod error;
pub mod loader;
pub mod store;

pub use error::DatasetError;
pub use loader::load_table;
pub use store::{DatasetSnapshot, DatasetStore};

/// One observation of one engine unit at one cycle.
#[derive(Debug, Clone, PartialEq)]
pub struct SensorRow {
    pub unit_id: i64,
    pub cycle: i64,
    pub sensors: Vec<f64>,
}

impl SensorRow {
    pub fn new(unit_id: i64, cycle: i64, sensors: Vec<f64>) -> Self {
        Self {
            unit_id,
            cycle,
            sensors,
        }
    }
}

/// Immutable, fixed-shape sensor table.
///
/// Every row carries exactly `num_sensors` readings; construction rejects
/// anything else.
#[derive(Debug, Clone, PartialEq)]
pub struct SensorTable {
    rows: Vec<SensorRow>,
    num_sensors: usize,
}

impl SensorTable {
    /// Build a table, checking that every row has `num_sensors` readings.
    pub fn new(rows: Vec<SensorRow>, num_sensors: usize) -> Result<Self, DatasetError> {
        if num_sensors == 0 {
            return Err(DatasetError::format(
                0,
                "table needs at least 3 columns (unit, cycle, sensor)",
            ));
        }
        if let Some((i, row)) = rows
            .iter()
            .enumerate()
            .find(|(_, r)| r.sensors.len() != num_sensors)
        {
            return Err(DatasetError::format(
                i + 1,
                format!(
                    "expected {} sensor values, found {}",
                    num_sensors,
                    row.sensors.len()
                ),
            ));
        }
        Ok(Self { rows, num_sensors })
    }

    pub fn rows(&self) -> &[SensorRow] {
        &self.rows
    }

    pub fn num_sensors(&self) -> usize {
        self.num_sensors
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_accepts_consistent_rows() {
        let table = SensorTable::new(
            vec![
                SensorRow::new(1, 1, vec![0.1, 0.2]),
                SensorRow::new(1, 2, vec![0.3, 0.4]),
            ],
            2,
        )
        .unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table.num_sensors(), 2);
    }

    #[test]
    fn test_table_rejects_ragged_rows() {
        let result = SensorTable::new(
            vec![
                SensorRow::new(1, 1, vec![0.1, 0.2]),
                SensorRow::new(1, 2, vec![0.3]),
            ],
            2,
        );
        assert!(matches!(result, Err(DatasetError::Format { line: 2, .. })));
    }

    #[test]
    fn test_table_rejects_zero_sensors() {
        let result = SensorTable::new(vec![], 0);
        assert!(matches!(result, Err(DatasetError::Format { .. })));
    }

    #[test]
    fn test_empty_table_is_allowed() {
        let table = SensorTable::new(vec![], 21).unwrap();
        assert!(table.is_empty());
    }
}
