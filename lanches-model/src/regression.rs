use anyhow::{Context, Result, bail};
use ndarray::{Array1, Array2, ArrayView1};

use lanches_data::models::{Dataset, FlavorSet};

use crate::features::{build_interactions, price_targets};
use crate::linalg::least_squares_through_origin;

/// No-intercept linear model over the per-flavor interaction features.
/// weights[j] is the price per centimetre of flavor j.
#[derive(Debug, Clone, PartialEq)]
pub struct FittedModel {
    flavors: FlavorSet,
    weights: Array1<f64>,
}

impl FittedModel {
    pub fn from_weights(flavors: FlavorSet, weights: Array1<f64>) -> Result<Self> {
        if weights.len() != flavors.len() {
            bail!("{} pesos para {} sabores", weights.len(), flavors.len());
        }
        Ok(FittedModel { flavors, weights })
    }

    pub fn flavors(&self) -> &FlavorSet {
        &self.flavors
    }

    pub fn weights(&self) -> &Array1<f64> {
        &self.weights
    }

    /// Unclamped price for one feature vector.
    pub fn predict_raw(&self, features: ArrayView1<f64>) -> f64 {
        features.dot(&self.weights)
    }

    /// Unclamped prices for every row of an interaction matrix.
    pub fn predict_matrix(&self, x: &Array2<f64>) -> Array1<f64> {
        x.dot(&self.weights)
    }
}

/// Fit price = Σ wⱼ·(indicatorⱼ × length) by least squares, with no intercept.
pub fn fit(dataset: &Dataset) -> Result<FittedModel> {
    if dataset.flavors.is_empty() || dataset.is_empty() {
        bail!(
            "Matriz de features vazia: {} registros, {} sabores",
            dataset.len(),
            dataset.flavors.len()
        );
    }

    let x = build_interactions(dataset);
    let y = price_targets(dataset);

    // A zero column makes XᵀX singular; name the flavor instead of failing in the solver.
    for (idx, name) in dataset.flavors.iter() {
        if x.column(idx).iter().all(|&v| v == 0.0) {
            bail!("Sabor '{}' sem registros de comprimento positivo: matriz singular", name);
        }
    }

    let weights = least_squares_through_origin(&x, &y).context("Falha no ajuste dos pesos")?;

    for (idx, name) in dataset.flavors.iter() {
        log::debug!("peso {} = {:.6} por cm", name, weights[idx]);
    }

    FittedModel::from_weights(dataset.flavors.clone(), weights)
}
