pub mod config;
pub mod display;
pub mod features;
pub mod linalg;
pub mod predictor;
pub mod regression;
pub mod training;
pub mod validation;
