use std::time::Instant;

use anyhow::{Context, Result};

use lanches_data::loader::load_csv;
use lanches_data::models::Dataset;

use crate::config::Config;
use crate::regression::{FittedModel, fit};
use crate::validation::{ValidationReport, validate};

/// Everything computed once at startup. Immutable for the rest of the process.
#[derive(Debug, Clone)]
pub struct Trained {
    pub dataset: Dataset,
    pub model: FittedModel,
    pub report: ValidationReport,
    pub train_time_ms: u64,
}

/// Fit on an already loaded table and run the proportionality test.
pub fn train_on(dataset: Dataset, tolerance: f64) -> Result<Trained> {
    let start = Instant::now();
    let model = fit(&dataset).context("Erro ao treinar o modelo")?;
    let report = validate(&model, &dataset, tolerance);
    let train_time_ms = start.elapsed().as_millis() as u64;

    log::info!(
        "Modelo treinado em {} ms: {}/{} testes aprovados",
        train_time_ms,
        report.passed_count(),
        report.total()
    );

    Ok(Trained {
        dataset,
        model,
        report,
        train_time_ms,
    })
}

/// Load the CSV named by the config, fit and validate.
pub fn train_and_validate(config: &Config) -> Result<Trained> {
    config.validate()?;
    let dataset = load_csv(&config.file, &config.loader)?;
    train_on(dataset, config.tolerance)
}

#[cfg(test)]
mod tests {
    use super::*;
    use lanches_data::loader::{LoaderConfig, read_dataset};

    const PROPORTIONAL: &str = "\
frango,carne,peito de peru,comprimento,preço
1,0,0,15,37.5
1,0,0,30,75
0,1,0,15,45
0,1,0,20,60
0,0,1,20,56
";

    #[test]
    fn test_train_on_proportional_table() {
        let dataset = read_dataset(PROPORTIONAL.as_bytes(), &LoaderConfig::default()).unwrap();
        let trained = train_on(dataset, 0.01).unwrap();
        assert!(trained.report.all_passed());
        assert_eq!(trained.report.total(), 5);
        assert!((trained.model.weights()[2] - 2.8).abs() < 1e-9);
    }

    #[test]
    fn test_train_on_reports_fit_failure() {
        let csv = "frango,carne,comprimento,preço\n1,0,10,25\n";
        let dataset = read_dataset(csv.as_bytes(), &LoaderConfig::default()).unwrap();
        let err = train_on(dataset, 0.01).unwrap_err();
        assert!(format!("{err:#}").contains("Erro ao treinar o modelo"));
    }

    #[test]
    fn test_train_and_validate_sample_file() {
        let config = Config {
            file: concat!(env!("CARGO_MANIFEST_DIR"), "/../assets/lanches.csv").into(),
            ..Config::default()
        };
        let trained = train_and_validate(&config).unwrap();
        assert_eq!(trained.model.flavors().len(), 4);
        assert_eq!(trained.report.total(), 12);
        assert!(trained.report.all_passed(), "{}", trained.report.summary());
    }

    #[test]
    fn test_train_and_validate_missing_file() {
        let config = Config {
            file: "nao/existe.csv".into(),
            ..Config::default()
        };
        let err = train_and_validate(&config).unwrap_err();
        assert!(err.to_string().contains("não foi encontrado"));
    }

    #[test]
    fn test_train_and_validate_rejects_bad_tolerance() {
        let config = Config {
            tolerance: -1.0,
            ..Config::default()
        };
        assert!(train_and_validate(&config).is_err());
    }
}
