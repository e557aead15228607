use ndarray::{Array1, Array2};

use lanches_data::models::{Dataset, FlavorSet};

/// Interaction features for one (flavor, length) pair: every entry is zero
/// except the flavor's own, which holds the length.
pub fn interaction_row(flavor_count: usize, flavor: usize, length: f64) -> Array1<f64> {
    let mut row = Array1::zeros(flavor_count);
    row[flavor] = length;
    row
}

/// Feature matrix [n_records, n_flavors], entry (i, j) = indicator_j(i) × length(i).
pub fn build_interactions(dataset: &Dataset) -> Array2<f64> {
    let shape = (dataset.records.len(), dataset.flavors.len());
    Array2::from_shape_fn(shape, |(i, j)| {
        let record = &dataset.records[i];
        let indicator = if record.flavor == j { 1.0 } else { 0.0 };
        indicator * record.length
    })
}

pub fn price_targets(dataset: &Dataset) -> Array1<f64> {
    dataset.records.iter().map(|r| r.price).collect()
}

/// Column names of the interaction matrix, in feature order.
pub fn feature_names(flavors: &FlavorSet) -> Vec<String> {
    (0..flavors.len()).map(|i| flavors.feature_name(i)).collect()
}
