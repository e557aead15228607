use std::io::{self, Write};

use anyhow::{Context, Result, bail};
use lanches_data::loader::parse_decimal;
use lanches_data::models::FlavorSet;
use lanches_model::predictor::Predictor;
use lanches_model::training::Trained;

#[derive(Debug, PartialEq)]
enum InteractiveCommand {
    Predict,
    Tests,
    Flavors,
    Weights,
    Quit,
}

fn parse_command(input: &str) -> Option<InteractiveCommand> {
    match input.trim().to_lowercase().as_str() {
        "1" | "prever" | "predict" | "pred" => Some(InteractiveCommand::Predict),
        "2" | "testes" | "tests" | "validate" => Some(InteractiveCommand::Tests),
        "3" | "sabores" | "flavors" => Some(InteractiveCommand::Flavors),
        "4" | "pesos" | "weights" => Some(InteractiveCommand::Weights),
        "5" | "sair" | "quit" | "q" | "exit" => Some(InteractiveCommand::Quit),
        _ => None,
    }
}

fn display_menu() {
    println!();
    println!("── Previsor de Preço de Lanches 🥪 ──");
    println!("  1. prever   Prever o preço de um lanche");
    println!("  2. testes   Testes de proporcionalidade");
    println!("  3. sabores  Sabores disponíveis");
    println!("  4. pesos    Preço por cm de cada sabor");
    println!("  5. sair     Sair");
    println!();
}

fn prompt(msg: &str) -> Result<String> {
    print!("{}", msg);
    io::stdout().flush()?;
    let mut input = String::new();
    let read = io::stdin()
        .read_line(&mut input)
        .context("Erro de leitura")?;
    if read == 0 {
        bail!("Fim da entrada");
    }
    Ok(input.trim().to_string())
}

/// A list number ("2") selects by position; anything else is taken as a name.
fn resolve_flavor_choice(input: &str, flavors: &FlavorSet) -> String {
    match input.trim().parse::<usize>() {
        Ok(n) if (1..=flavors.len()).contains(&n) => flavors.name(n - 1).to_string(),
        _ => input.trim().to_string(),
    }
}

/// Unparsable input becomes NaN so the predictor rejects it like any invalid length.
fn parse_length(input: &str) -> f64 {
    parse_decimal(input).unwrap_or(f64::NAN)
}

fn cmd_predict_interactive(predictor: &Predictor) -> Result<()> {
    let flavors = predictor.model().flavors();
    println!("Escolha o tipo de lanche:");
    for (idx, _) in flavors.iter() {
        println!("  {}. {}", idx + 1, flavors.label(idx));
    }

    let choice = prompt("Sabor (número ou nome): ")?;
    let flavor = resolve_flavor_choice(&choice, flavors);
    let length = parse_length(&prompt("Tamanho do lanche (cm): ")?);

    super::run_prediction(predictor, &flavor, length);
    Ok(())
}

pub fn run_interactive(trained: &Trained) -> Result<()> {
    let predictor = Predictor::new(&trained.model);
    println!("Modelo de Regressão Linear com Proporcionalidade");
    println!("{}", trained.report.summary());

    loop {
        display_menu();
        let input = match prompt("> ") {
            Ok(s) => s,
            Err(_) => break,
        };

        if input.is_empty() {
            continue;
        }

        let result = match parse_command(&input) {
            Some(InteractiveCommand::Quit) => {
                println!("Até logo!");
                break;
            }
            Some(InteractiveCommand::Predict) => cmd_predict_interactive(&predictor),
            Some(InteractiveCommand::Tests) => super::cmd_tests(trained),
            Some(InteractiveCommand::Flavors) => super::cmd_flavors(trained),
            Some(InteractiveCommand::Weights) => super::cmd_weights(trained),
            None => {
                println!(
                    "Comando desconhecido: '{}'. Digite um número (1-5) ou um nome de comando.",
                    input
                );
                Ok(())
            }
        };
        if let Err(e) = result {
            println!("Erro: {e:#}");
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_command_by_number() {
        assert_eq!(parse_command("1"), Some(InteractiveCommand::Predict));
        assert_eq!(parse_command("2"), Some(InteractiveCommand::Tests));
        assert_eq!(parse_command("3"), Some(InteractiveCommand::Flavors));
        assert_eq!(parse_command("4"), Some(InteractiveCommand::Weights));
        assert_eq!(parse_command("5"), Some(InteractiveCommand::Quit));
    }

    #[test]
    fn test_parse_command_by_name() {
        assert_eq!(parse_command("prever"), Some(InteractiveCommand::Predict));
        assert_eq!(parse_command("testes"), Some(InteractiveCommand::Tests));
        assert_eq!(parse_command("sabores"), Some(InteractiveCommand::Flavors));
        assert_eq!(parse_command("pesos"), Some(InteractiveCommand::Weights));
        assert_eq!(parse_command("sair"), Some(InteractiveCommand::Quit));
    }

    #[test]
    fn test_parse_command_by_alias() {
        assert_eq!(parse_command("predict"), Some(InteractiveCommand::Predict));
        assert_eq!(parse_command("pred"), Some(InteractiveCommand::Predict));
        assert_eq!(parse_command("validate"), Some(InteractiveCommand::Tests));
        assert_eq!(parse_command("flavors"), Some(InteractiveCommand::Flavors));
        assert_eq!(parse_command("weights"), Some(InteractiveCommand::Weights));
        assert_eq!(parse_command("q"), Some(InteractiveCommand::Quit));
        assert_eq!(parse_command("exit"), Some(InteractiveCommand::Quit));
    }

    #[test]
    fn test_parse_command_case_insensitive() {
        assert_eq!(parse_command("SAIR"), Some(InteractiveCommand::Quit));
        assert_eq!(parse_command("Prever"), Some(InteractiveCommand::Predict));
        assert_eq!(parse_command(" Testes "), Some(InteractiveCommand::Tests));
    }

    #[test]
    fn test_parse_command_unknown() {
        assert_eq!(parse_command("foo"), None);
        assert_eq!(parse_command(""), None);
        assert_eq!(parse_command("6"), None);
    }

    #[test]
    fn test_resolve_flavor_choice() {
        let flavors = FlavorSet::new(["frango", "peito de peru"]).unwrap();
        assert_eq!(resolve_flavor_choice("1", &flavors), "frango");
        assert_eq!(resolve_flavor_choice(" 2 ", &flavors), "peito de peru");
        assert_eq!(resolve_flavor_choice("Peito De Peru", &flavors), "Peito De Peru");
        assert_eq!(resolve_flavor_choice("3", &flavors), "3");
        assert_eq!(resolve_flavor_choice("0", &flavors), "0");
    }

    #[test]
    fn test_parse_length() {
        assert_eq!(parse_length("15"), 15.0);
        assert_eq!(parse_length("12,5"), 12.5);
        assert!(parse_length("").is_nan());
        assert!(parse_length("grande").is_nan());
        assert_eq!(parse_length("-5"), -5.0);
    }
}
