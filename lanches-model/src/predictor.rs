use std::fmt;

use anyhow::{Result, bail};

use crate::features::interaction_row;
use crate::regression::FittedModel;

/// Rejected prediction input. Shown as a warning; no price is produced.
#[derive(Debug, Clone, PartialEq)]
pub enum InvalidInput {
    UnknownFlavor(String),
    NonPositiveLength(f64),
}

impl fmt::Display for InvalidInput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InvalidInput::UnknownFlavor(name) => write!(f, "Sabor desconhecido: '{}'", name),
            InvalidInput::NonPositiveLength(length) => write!(
                f,
                "Por favor, insira um comprimento de lanche válido (recebido {}).",
                length
            ),
        }
    }
}

impl std::error::Error for InvalidInput {}

/// A validated (flavor index, length) pair.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PredictionRequest {
    pub flavor: usize,
    pub length: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Prediction {
    pub flavor: String,
    pub length: f64,
    pub raw_price: f64,
    pub price: f64,
}

impl Prediction {
    pub fn was_clamped(&self) -> bool {
        self.raw_price < 0.0
    }
}

pub struct Predictor<'m> {
    model: &'m FittedModel,
}

impl<'m> Predictor<'m> {
    pub fn new(model: &'m FittedModel) -> Self {
        Self { model }
    }

    pub fn model(&self) -> &FittedModel {
        self.model
    }

    pub fn request(&self, flavor: &str, length: f64) -> Result<PredictionRequest, InvalidInput> {
        let idx = self
            .model
            .flavors()
            .lookup(flavor)
            .ok_or_else(|| InvalidInput::UnknownFlavor(flavor.trim().to_string()))?;
        if !length.is_finite() || length <= 0.0 {
            return Err(InvalidInput::NonPositiveLength(length));
        }
        Ok(PredictionRequest {
            flavor: idx,
            length,
        })
    }

    /// Price for a validated request, clamped to be non-negative.
    pub fn predict(&self, request: PredictionRequest) -> Result<Prediction> {
        let flavors = self.model.flavors();
        if request.flavor >= flavors.len() {
            bail!(
                "Índice de sabor {} fora do modelo ({} sabores)",
                request.flavor,
                flavors.len()
            );
        }

        let features = interaction_row(flavors.len(), request.flavor, request.length);
        let raw_price = self.model.predict_raw(features.view());
        if !raw_price.is_finite() {
            bail!("Resultado não finito: {}", raw_price);
        }
        if raw_price < 0.0 {
            log::debug!("preço bruto negativo ({raw_price:.4}) ajustado para 0");
        }

        Ok(Prediction {
            flavor: flavors.label(request.flavor),
            length: request.length,
            raw_price,
            price: raw_price.max(0.0),
        })
    }
}
