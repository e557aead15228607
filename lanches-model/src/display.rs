use comfy_table::{Cell, Color, ContentArrangement, Table, presets::UTF8_FULL};

use lanches_data::models::Dataset;

use crate::features::feature_names;
use crate::predictor::Prediction;
use crate::regression::FittedModel;
use crate::validation::ValidationReport;

fn new_table(header: Vec<&str>) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(header);
    table
}

pub fn format_price(price: f64) -> String {
    format!("R$ {:.2}", price)
}

pub fn prediction_message(prediction: &Prediction) -> String {
    format!(
        "O preço previsto para um {} de {} cm é {}",
        prediction.flavor,
        prediction.length,
        format_price(prediction.price)
    )
}

pub fn validation_table(report: &ValidationReport) -> Table {
    let mut table = new_table(vec![
        "Sabor",
        "Comprimento (cm)",
        "Preço Real",
        "Preço Previsto",
        "Diferença",
        "Status",
    ]);

    for row in &report.rows {
        let (status, color) = if row.passed {
            ("✔", Color::Green)
        } else {
            ("✘", Color::Red)
        };
        table.add_row(vec![
            Cell::new(&row.flavor),
            Cell::new(format!("{}", row.length)),
            Cell::new(format!("{:.2}", row.actual)),
            Cell::new(format!("{:.2}", row.predicted)),
            Cell::new(format!("{:+.4}", row.residual)),
            Cell::new(status).fg(color),
        ]);
    }
    table
}

pub fn display_validation(report: &ValidationReport) {
    println!("\n📊 Testes de Proporcionalidade (tolerância {})\n", report.tolerance);
    println!("{}", report.summary());
    println!("{}", validation_table(report));
    println!(
        "Maior diferença absoluta: {:.4}   RMSE: {:.4}",
        report.max_abs_residual(),
        report.rmse()
    );
}

pub fn weights_table(model: &FittedModel) -> Table {
    let mut table = new_table(vec!["Sabor", "Feature", "Preço por cm"]);
    let flavors = model.flavors();
    let features = feature_names(flavors);
    for ((idx, feature), weight) in features.into_iter().enumerate().zip(model.weights()) {
        table.add_row(vec![flavors.label(idx), feature, format!("{:.4}", weight)]);
    }
    table
}

pub fn display_weights(model: &FittedModel) {
    println!("\n== Pesos do modelo (sem intercepto) ==\n");
    println!("{}", weights_table(model));
}

/// Known flavors with their CSV column and how many training rows each has.
pub fn flavors_table(dataset: &Dataset) -> Table {
    let mut table = new_table(vec!["#", "Sabor", "Coluna", "Registros"]);
    let counts = dataset.count_by_flavor();
    for ((idx, name), count) in dataset.flavors.iter().zip(counts) {
        table.add_row(vec![
            format!("{}", idx + 1),
            dataset.flavors.label(idx),
            name.to_string(),
            format!("{}", count),
        ]);
    }
    table
}

pub fn display_flavors(dataset: &Dataset) {
    if dataset.flavors.is_empty() {
        println!("Nenhum sabor disponível.");
        return;
    }
    println!("{}", flavors_table(dataset));
}

pub fn display_prediction(prediction: &Prediction) {
    println!("\n── Resultado da Previsão ──");
    println!("{}", prediction_message(prediction));
    if prediction.was_clamped() {
        println!(
            "(valor bruto {} negativo, ajustado para zero)",
            format_price(prediction.raw_price)
        );
    }
    println!();
}
