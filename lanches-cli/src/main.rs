mod interactive;

use std::path::PathBuf;

use anyhow::{Result, bail};
use clap::{Parser, Subcommand};

use lanches_model::config::Config;
use lanches_model::display::{
    display_flavors, display_prediction, display_validation, display_weights,
};
use lanches_model::predictor::Predictor;
use lanches_model::training::{self, Trained};

#[derive(Parser)]
#[command(
    name = "lanches",
    about = "Previsor de preço de lanches (regressão proporcional ao comprimento)"
)]
struct Cli {
    /// Arquivo CSV de treino
    #[arg(short, long, global = true)]
    file: Option<PathBuf>,

    /// Arquivo de configuração JSON
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Tolerância dos testes de proporcionalidade
    #[arg(long, global = true)]
    tolerance: Option<f64>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Prever o preço de um lanche
    Predict {
        /// Sabor do lanche (ex: frango)
        #[arg(short = 's', long)]
        flavor: String,

        /// Tamanho do lanche em cm
        #[arg(short, long, allow_negative_numbers = true)]
        length: f64,
    },

    /// Testes de proporcionalidade sobre os dados de treino
    Validate,

    /// Mostrar os pesos (preço por cm) de cada sabor
    Weights,

    /// Listar os sabores conhecidos
    Flavors,

    /// Formulário interativo (padrão)
    Interactive,
}

fn resolve_config(cli: &Cli) -> Result<Config> {
    let mut config = match &cli.config {
        Some(path) => Config::from_json_file(path)?,
        None => Config::default(),
    };
    if let Some(file) = &cli.file {
        config.file = file.clone();
    }
    if let Some(tolerance) = cli.tolerance {
        config.tolerance = tolerance;
    }
    Ok(config)
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    let config = resolve_config(&cli)?;

    let trained = training::train_and_validate(&config)?;
    log::info!(
        "{} registros, {} sabores carregados de {}",
        trained.dataset.len(),
        trained.model.flavors().len(),
        config.file.display()
    );

    match cli.command.unwrap_or(Command::Interactive) {
        Command::Predict { flavor, length } => cmd_predict(&trained, &flavor, length),
        Command::Validate => cmd_validate(&trained),
        Command::Weights => cmd_weights(&trained),
        Command::Flavors => cmd_flavors(&trained),
        Command::Interactive => interactive::run_interactive(&trained),
    }
}

/// Shows the price, a warning for invalid input, or the prediction error.
/// Returns whether a price was shown; the form keeps running either way.
pub(crate) fn run_prediction(predictor: &Predictor, flavor: &str, length: f64) -> bool {
    let request = match predictor.request(flavor, length) {
        Ok(request) => request,
        Err(warning) => {
            println!("⚠️  {warning}");
            return false;
        }
    };

    match predictor.predict(request) {
        Ok(prediction) => {
            display_prediction(&prediction);
            true
        }
        Err(e) => {
            println!("Erro ao fazer a previsão: {e:#}");
            false
        }
    }
}

fn cmd_predict(trained: &Trained, flavor: &str, length: f64) -> Result<()> {
    if !run_prediction(&Predictor::new(&trained.model), flavor, length) {
        bail!("Nenhum preço previsto para '{}' com {} cm", flavor.trim(), length);
    }
    Ok(())
}

pub(crate) fn cmd_tests(trained: &Trained) -> Result<()> {
    display_validation(&trained.report);
    Ok(())
}

fn cmd_validate(trained: &Trained) -> Result<()> {
    cmd_tests(trained)?;
    if !trained.report.all_passed() {
        bail!(
            "{} de {} testes falharam",
            trained.report.failed_count(),
            trained.report.total()
        );
    }
    Ok(())
}

pub(crate) fn cmd_weights(trained: &Trained) -> Result<()> {
    display_weights(&trained.model);
    println!("\nTempo de treino: {} ms", trained.train_time_ms);
    Ok(())
}

pub(crate) fn cmd_flavors(trained: &Trained) -> Result<()> {
    display_flavors(&trained.dataset);
    Ok(())
}
