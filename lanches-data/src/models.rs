use std::collections::HashMap;

use anyhow::{Result, bail};

/// Canonical form of a column or flavor name: trimmed, lowercased, inner
/// whitespace runs collapsed to a single space.
pub fn normalize_name(raw: &str) -> String {
    raw.trim_start_matches('\u{feff}')
        .split_whitespace()
        .map(|word| word.to_lowercase())
        .collect::<Vec<_>>()
        .join(" ")
}

/// "peito de peru" -> "Peito De Peru"
pub fn title_case(name: &str) -> String {
    name.split(' ')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Known flavors, in column order, with an explicit name -> feature index map.
#[derive(Debug, Clone, PartialEq)]
pub struct FlavorSet {
    names: Vec<String>,
    index: HashMap<String, usize>,
}

impl FlavorSet {
    pub fn new<I, S>(names: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut set = FlavorSet {
            names: Vec::new(),
            index: HashMap::new(),
        };
        for raw in names {
            let name = normalize_name(raw.as_ref());
            if name.is_empty() {
                bail!("Nome de sabor vazio");
            }
            if set.index.contains_key(&name) {
                bail!("Sabor duplicado após normalização: '{}'", name);
            }
            set.index.insert(name.clone(), set.names.len());
            set.names.push(name);
        }
        Ok(set)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn name(&self, idx: usize) -> &str {
        &self.names[idx]
    }

    /// Display label shown in selectors and tables.
    pub fn label(&self, idx: usize) -> String {
        title_case(&self.names[idx])
    }

    /// Name of the interaction feature (flavor × length) for this flavor.
    pub fn feature_name(&self, idx: usize) -> String {
        format!("{}_comp", self.names[idx].replace(' ', "_"))
    }

    /// Feature index of a flavor, matched after normalization so that labels
    /// ("Frango") and raw column names ("  FRANGO ") both resolve.
    pub fn lookup(&self, raw: &str) -> Option<usize> {
        self.index.get(&normalize_name(raw)).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (usize, &str)> {
        self.names.iter().enumerate().map(|(i, n)| (i, n.as_str()))
    }
}

/// One training example. The one-hot flavor indicators are stored as the index
/// of the single true indicator.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Record {
    pub flavor: usize,
    pub length: f64,
    pub price: f64,
}

impl Record {
    pub fn new(flavor: usize, length: f64, price: f64) -> Self {
        Record {
            flavor,
            length,
            price,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Dataset {
    pub flavors: FlavorSet,
    pub records: Vec<Record>,
}

impl Dataset {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Number of records per flavor, indexed like the flavor set.
    pub fn count_by_flavor(&self) -> Vec<usize> {
        let mut counts = vec![0; self.flavors.len()];
        for record in &self.records {
            counts[record.flavor] += 1;
        }
        counts
    }
}

/// Index of the single true indicator of a row.
pub fn one_hot_index(indicators: &[bool]) -> Result<usize> {
    let mut hot = indicators.iter().enumerate().filter(|(_, on)| **on);
    match (hot.next(), hot.next()) {
        (Some((idx, _)), None) => Ok(idx),
        (None, _) => bail!("Nenhum sabor marcado"),
        (Some(_), Some(_)) => bail!(
            "Mais de um sabor marcado ({} indicadores a 1)",
            indicators.iter().filter(|on| **on).count()
        ),
    }
}

pub fn validate_measures(length: f64, price: f64) -> Result<()> {
    if !length.is_finite() || length < 0.0 {
        bail!("Comprimento inválido: {}", length);
    }
    if !price.is_finite() {
        bail!("Preço inválido: {}", price);
    }
    Ok(())
}
