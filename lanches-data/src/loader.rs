use std::collections::HashSet;
use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};

use crate::models::{Dataset, FlavorSet, Record, normalize_name, one_hot_index, validate_measures};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoaderConfig {
    pub length_column: String,
    pub price_column: String,
    pub delimiter: char,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            length_column: "comprimento".to_string(),
            price_column: "preço".to_string(),
            delimiter: ',',
        }
    }
}

/// Parses a numeric cell. Accepts a decimal comma when the dotted form fails.
pub fn parse_decimal(s: &str) -> Result<f64> {
    let s = s.trim();
    if s.is_empty() {
        bail!("Valor vazio");
    }
    let value = match s.parse::<f64>() {
        Ok(v) => v,
        Err(_) => s
            .replace(',', ".")
            .parse::<f64>()
            .with_context(|| format!("Impossível interpretar o número: '{}'", s))?,
    };
    if !value.is_finite() {
        bail!("Número não finito: '{}'", s);
    }
    Ok(value)
}

pub fn parse_indicator(s: &str) -> Result<bool> {
    match s.trim().to_lowercase().as_str() {
        "1" | "true" => Ok(true),
        "0" | "false" => Ok(false),
        other => {
            let value = parse_decimal(other)
                .with_context(|| format!("Indicador inválido: '{}'", s.trim()))?;
            if value == 1.0 {
                Ok(true)
            } else if value == 0.0 {
                Ok(false)
            } else {
                bail!("Indicador deve ser 0 ou 1, recebido '{}'", s.trim());
            }
        }
    }
}

/// Positions of the length, price and flavor columns in a CSV row.
#[derive(Debug)]
struct Columns {
    length: usize,
    price: usize,
    flavors: Vec<usize>,
}

fn resolve_columns(
    headers: &csv::StringRecord,
    config: &LoaderConfig,
) -> Result<(Columns, FlavorSet)> {
    let names: Vec<String> = headers.iter().map(normalize_name).collect();

    let mut seen = HashSet::new();
    for name in &names {
        if !seen.insert(name.as_str()) {
            bail!("Coluna duplicada após normalização: '{}'", name);
        }
    }

    let length_name = normalize_name(&config.length_column);
    let price_name = normalize_name(&config.price_column);
    let position = |wanted: &str| -> Result<usize> {
        names
            .iter()
            .position(|n| n == wanted)
            .with_context(|| format!("Coluna '{}' ausente no cabeçalho", wanted))
    };
    let length = position(&length_name)?;
    let price = position(&price_name)?;

    let flavors: Vec<usize> = (0..names.len()).filter(|&i| i != length && i != price).collect();
    if flavors.is_empty() {
        bail!("Nenhuma coluna de sabor encontrada");
    }
    let flavor_set = FlavorSet::new(flavors.iter().map(|&i| names[i].as_str()))?;

    let columns = Columns {
        length,
        price,
        flavors,
    };
    Ok((columns, flavor_set))
}

fn field<'r>(record: &'r csv::StringRecord, idx: usize, headers: &[String]) -> Result<&'r str> {
    record
        .get(idx)
        .with_context(|| format!("Campo ausente na coluna '{}'", headers[idx]))
}

fn parse_record(
    record: &csv::StringRecord,
    columns: &Columns,
    headers: &[String],
) -> Result<Record> {
    let get = |idx: usize| field(record, idx, headers);

    let indicators = columns
        .flavors
        .iter()
        .map(|&idx| {
            parse_indicator(get(idx)?).with_context(|| format!("Coluna '{}'", headers[idx]))
        })
        .collect::<Result<Vec<bool>>>()?;
    let flavor = one_hot_index(&indicators)?;

    let length = parse_decimal(get(columns.length)?)
        .with_context(|| format!("Coluna '{}'", headers[columns.length]))?;
    let price = parse_decimal(get(columns.price)?)
        .with_context(|| format!("Coluna '{}'", headers[columns.price]))?;
    validate_measures(length, price)?;

    Ok(Record::new(flavor, length, price))
}

/// Reads a training table from any reader. Every row must be one-hot over the
/// flavor columns; the first malformed row aborts the load.
pub fn read_dataset<R: Read>(reader: R, config: &LoaderConfig) -> Result<Dataset> {
    let delimiter = u8::try_from(config.delimiter)
        .ok()
        .filter(u8::is_ascii)
        .with_context(|| format!("Delimitador não ASCII: '{}'", config.delimiter))?;

    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .from_reader(reader);

    let headers = reader.headers().context("Impossível ler o cabeçalho do CSV")?.clone();
    let (columns, flavors) = resolve_columns(&headers, config)?;
    let header_names: Vec<String> = headers.iter().map(normalize_name).collect();

    let mut records = Vec::new();
    for (i, record_result) in reader.records().enumerate() {
        let record = record_result.with_context(|| format!("Erro de leitura na linha {}", i + 2))?;
        let line = record.position().map(|p| p.line()).unwrap_or(i as u64 + 2);
        let parsed = parse_record(&record, &columns, &header_names)
            .with_context(|| format!("Linha {} inválida", line))?;
        records.push(parsed);
    }

    log::info!("{} registros carregados, {} sabores", records.len(), flavors.len());
    log::debug!("Sabores: {:?}", flavors.names());

    Ok(Dataset { flavors, records })
}

pub fn load_csv(path: &Path, config: &LoaderConfig) -> Result<Dataset> {
    let file = match File::open(path) {
        Ok(f) => f,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            bail!("O arquivo '{}' não foi encontrado.", path.display())
        }
        Err(e) => return Err(e).with_context(|| format!("Impossível abrir {:?}", path)),
    };
    read_dataset(file, config).with_context(|| format!("Erro ao carregar {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "\
Frango, Carne ,Peito de Peru,Comprimento, PREÇO
1,0,0,10,25
0,1,0,15,45
0,0,1,20,70
1,0,0,30,75
";

    fn read(csv: &str) -> Result<Dataset> {
        read_dataset(csv.as_bytes(), &LoaderConfig::default())
    }

    #[test]
    fn test_parse_decimal() {
        assert!((parse_decimal("25").unwrap() - 25.0).abs() < 1e-12);
        assert!((parse_decimal(" 12.5 ").unwrap() - 12.5).abs() < 1e-12);
        assert!((parse_decimal("12,5").unwrap() - 12.5).abs() < 1e-12);
        assert!(parse_decimal("").is_err());
        assert!(parse_decimal("abc").is_err());
        assert!(parse_decimal("NaN").is_err());
        assert!(parse_decimal("inf").is_err());
    }

    #[test]
    fn test_parse_indicator() {
        assert!(parse_indicator("1").unwrap());
        assert!(parse_indicator(" 1.0 ").unwrap());
        assert!(parse_indicator("True").unwrap());
        assert!(!parse_indicator("0").unwrap());
        assert!(!parse_indicator("0.0").unwrap());
        assert!(!parse_indicator("false").unwrap());
        assert!(parse_indicator("2").is_err());
        assert!(parse_indicator("").is_err());
        assert!(parse_indicator("sim").is_err());
    }

    #[test]
    fn test_read_dataset_normalizes_columns() {
        let dataset = read(SAMPLE).unwrap();
        assert_eq!(dataset.flavors.names(), &["frango", "carne", "peito de peru"]);
        assert_eq!(dataset.len(), 4);
        assert_eq!(dataset.records[0], Record::new(0, 10.0, 25.0));
        assert_eq!(dataset.records[2], Record::new(2, 20.0, 70.0));
    }

    #[test]
    fn test_read_dataset_columns_in_any_position() {
        let csv = "preço,frango,comprimento,carne\n25,1,10,0\n30,0,10,1\n";
        let dataset = read(csv).unwrap();
        assert_eq!(dataset.flavors.names(), &["frango", "carne"]);
        assert_eq!(dataset.records[1], Record::new(1, 10.0, 30.0));
    }

    #[test]
    fn test_read_dataset_header_only() {
        let dataset = read("frango,comprimento,preço\n").unwrap();
        assert!(dataset.is_empty());
        assert_eq!(dataset.flavors.len(), 1);
    }

    #[test]
    fn test_read_dataset_missing_length_column() {
        let err = read("frango,tamanho,preço\n1,10,25\n").unwrap_err();
        assert!(format!("{err:#}").contains("comprimento"));
    }

    #[test]
    fn test_read_dataset_missing_price_column() {
        assert!(read("frango,comprimento\n1,10\n").is_err());
    }

    #[test]
    fn test_read_dataset_without_flavors() {
        assert!(read("comprimento,preço\n10,25\n").is_err());
    }

    #[test]
    fn test_read_dataset_rejects_duplicate_normalized_columns() {
        let err = read("Frango,frango ,comprimento,preço\n1,0,10,25\n").unwrap_err();
        assert!(format!("{err:#}").contains("duplicada"));
    }

    #[test]
    fn test_read_dataset_rejects_non_one_hot_rows() {
        let none = read("frango,carne,comprimento,preço\n0,0,10,25\n").unwrap_err();
        assert!(format!("{none:#}").contains("Linha 2"));
        assert!(read("frango,carne,comprimento,preço\n1,1,10,25\n").is_err());
    }

    #[test]
    fn test_read_dataset_rejects_bad_numbers() {
        assert!(read("frango,comprimento,preço\n1,dez,25\n").is_err());
        assert!(read("frango,comprimento,preço\n1,10,\n").is_err());
        assert!(read("frango,comprimento,preço\n1,-5,25\n").is_err());
    }

    #[test]
    fn test_read_dataset_rejects_short_rows() {
        assert!(read("frango,comprimento,preço\n1,10\n").is_err());
    }

    #[test]
    fn test_read_dataset_custom_config() {
        let config = LoaderConfig {
            length_column: "Tamanho".to_string(),
            price_column: "valor".to_string(),
            delimiter: ';',
        };
        let csv = "frango;tamanho;valor\n1;10;25,50\n";
        let dataset = read_dataset(csv.as_bytes(), &config).unwrap();
        assert!((dataset.records[0].price - 25.5).abs() < 1e-12);
    }

    #[test]
    fn test_read_dataset_rejects_non_ascii_delimiter() {
        let config = LoaderConfig {
            delimiter: '§',
            ..LoaderConfig::default()
        };
        assert!(read_dataset("frango§comprimento§preço\n".as_bytes(), &config).is_err());
    }

    #[test]
    fn test_load_csv_missing_file() {
        let path = Path::new("nao/existe/lanches.csv");
        let err = load_csv(path, &LoaderConfig::default()).unwrap_err();
        assert!(err.to_string().contains("não foi encontrado"));
    }

    #[test]
    fn test_loader_config_serde_defaults() {
        let config: LoaderConfig = serde_json::from_str(r#"{"delimiter": ";"}"#).unwrap();
        assert_eq!(config.delimiter, ';');
        assert_eq!(config.length_column, "comprimento");
        assert_eq!(config.price_column, "preço");
    }
}
