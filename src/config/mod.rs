// src/config/mod.rs
pub mod validator;

pub use validator::{
    FetchConfig, ModelMode, ModelsConfig, ScoringConfig, ValidatorConfig, DEFAULT_CONFIG_PATH,
    ENV_CONFIG_PATH,
};
