use lanches_data::models::Dataset;

use crate::features::build_interactions;
use crate::regression::FittedModel;

pub const DEFAULT_TOLERANCE: f64 = 0.01;

#[derive(Debug, Clone, PartialEq)]
pub struct ValidationRow {
    pub flavor: String,
    pub length: f64,
    pub actual: f64,
    pub predicted: f64,
    pub residual: f64,
    pub passed: bool,
}

/// Proportionality test over the training rows.
#[derive(Debug, Clone)]
pub struct ValidationReport {
    pub rows: Vec<ValidationRow>,
    pub tolerance: f64,
}

impl ValidationReport {
    pub fn total(&self) -> usize {
        self.rows.len()
    }

    pub fn passed_count(&self) -> usize {
        self.rows.iter().filter(|r| r.passed).count()
    }

    pub fn failed_count(&self) -> usize {
        self.total() - self.passed_count()
    }

    pub fn all_passed(&self) -> bool {
        self.failed_count() == 0
    }

    pub fn max_abs_residual(&self) -> f64 {
        self.rows.iter().map(|r| r.residual.abs()).fold(0.0, f64::max)
    }

    pub fn rmse(&self) -> f64 {
        if self.rows.is_empty() {
            return 0.0;
        }
        let sum_sq: f64 = self.rows.iter().map(|r| r.residual * r.residual).sum();
        (sum_sq / self.rows.len() as f64).sqrt()
    }

    pub fn summary(&self) -> String {
        if self.all_passed() {
            format!("✅ Todos os {} testes aprovados!", self.total())
        } else {
            format!(
                "❌ {} de {} testes falharam. O modelo não está 100% proporcional.",
                self.failed_count(),
                self.total()
            )
        }
    }
}

pub fn within_tolerance(residual: f64, tolerance: f64) -> bool {
    residual.abs() <= tolerance
}

/// Re-predicts every training record and compares with its actual price.
/// residual = predicted - actual.
pub fn validate(model: &FittedModel, dataset: &Dataset, tolerance: f64) -> ValidationReport {
    let predictions = model.predict_matrix(&build_interactions(dataset));

    let rows: Vec<ValidationRow> = dataset
        .records
        .iter()
        .zip(predictions.iter())
        .map(|(record, &predicted)| {
            let residual = predicted - record.price;
            ValidationRow {
                flavor: dataset.flavors.label(record.flavor),
                length: record.length,
                actual: record.price,
                predicted,
                residual,
                passed: within_tolerance(residual, tolerance),
            }
        })
        .collect();

    for (i, row) in rows.iter().enumerate().filter(|(_, r)| !r.passed) {
        log::warn!(
            "linha {} ({}, {} cm): previsto {:.4}, real {:.4}, diferença {:+.4}",
            i + 1,
            row.flavor,
            row.length,
            row.predicted,
            row.actual,
            row.residual
        );
    }

    ValidationReport { rows, tolerance }
}
