//! FILENAME: core/group-engine/src/accumulator.rs
//! Running aggregate over the leaf values of one group.
//!
//! Non-numeric values count as rows but are ignored by sum/avg/min/max.

use table_engine::{AggregationType, CellValue};

#[derive(Debug, Clone, PartialEq)]
pub struct AggregateAccumulator {
    pub sum: f64,
    /// Rows seen, numeric or not.
    pub count: u64,
    pub count_numbers: u64,
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub first: Option<CellValue>,
    pub last: Option<CellValue>,
}

impl AggregateAccumulator {
    pub fn new() -> Self {
        AggregateAccumulator {
            sum: 0.0,
            count: 0,
            count_numbers: 0,
            min: None,
            max: None,
            first: None,
            last: None,
        }
    }

    pub fn add(&mut self, value: &CellValue) {
        match value {
            CellValue::Number(n) if n.is_finite() => self.add_number(*n),
            _ => self.count += 1,
        }
        if self.first.is_none() {
            self.first = Some(value.clone());
        }
        self.last = Some(value.clone());
    }

    /// Adds a numeric value to the accumulator.
    pub fn add_number(&mut self, value: f64) {
        self.count += 1;
        self.count_numbers += 1;
        self.sum += value;
        self.min = Some(self.min.map_or(value, |m| m.min(value)));
        self.max = Some(self.max.map_or(value, |m| m.max(value)));
    }

    pub fn result(&self, aggregation: AggregationType) -> CellValue {
        match aggregation {
            AggregationType::Sum => CellValue::Number(self.sum),
            AggregationType::Count => CellValue::Number(self.count as f64),
            AggregationType::Avg => {
                if self.count_numbers == 0 {
                    CellValue::Empty
                } else {
                    CellValue::Number(self.sum / self.count_numbers as f64)
                }
            }
            AggregationType::Min => self.min.map_or(CellValue::Empty, CellValue::Number),
            AggregationType::Max => self.max.map_or(CellValue::Empty, CellValue::Number),
            AggregationType::First => self.first.clone().unwrap_or_default(),
            AggregationType::Last => self.last.clone().unwrap_or_default(),
        }
    }
}

impl Default for AggregateAccumulator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fill(values: &[CellValue]) -> AggregateAccumulator {
        let mut acc = AggregateAccumulator::new();
        for v in values {
            acc.add(v);
        }
        acc
    }

    #[test]
    fn numeric_aggregates_ignore_text() {
        let acc = fill(&[CellValue::Number(2.0), CellValue::from("x"), CellValue::Number(4.0)]);
        assert_eq!(acc.result(AggregationType::Sum), CellValue::Number(6.0));
        assert_eq!(acc.result(AggregationType::Avg), CellValue::Number(3.0));
        assert_eq!(acc.result(AggregationType::Count), CellValue::Number(3.0));
        assert_eq!(acc.result(AggregationType::Min), CellValue::Number(2.0));
        assert_eq!(acc.result(AggregationType::Max), CellValue::Number(4.0));
        assert_eq!(acc.result(AggregationType::First), CellValue::Number(2.0));
        assert_eq!(acc.result(AggregationType::Last), CellValue::Number(4.0));
    }

    #[test]
    fn no_numbers_gives_empty_avg_min_max() {
        let acc = fill(&[CellValue::from("a"), CellValue::Empty]);
        assert_eq!(acc.result(AggregationType::Avg), CellValue::Empty);
        assert_eq!(acc.result(AggregationType::Min), CellValue::Empty);
        assert_eq!(acc.result(AggregationType::Max), CellValue::Empty);
        assert_eq!(acc.result(AggregationType::Sum), CellValue::Number(0.0));
        assert_eq!(acc.result(AggregationType::Last), CellValue::Empty);
    }
}
