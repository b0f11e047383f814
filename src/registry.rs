use once_cell::sync::Lazy;
use serde::Deserialize;

use crate::error::{Result, SepError};
use crate::types::{Engine, TranscriberKind};

#[derive(Debug, Deserialize)]
pub struct EngineEntry {
    pub name: String,
    pub suffix: String,
    pub default_model: String,
    pub models: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct TranscriberEntry {
    pub name: String,
    pub default_model: String,
    pub models: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct Registry {
    engines: Vec<EngineEntry>,
    transcribers: Vec<TranscriberEntry>,
}

const REGISTRY_JSON: &str = include_str!("../models/registry.json");

static REGISTRY: Lazy<Registry> =
    Lazy::new(|| serde_json::from_str(REGISTRY_JSON).expect("embedded registry is valid JSON"));

pub fn engine_entry(engine: Engine) -> Result<&'static EngineEntry> {
    REGISTRY
        .engines
        .iter()
        .find(|e| e.name == engine.name())
        .ok_or_else(|| SepError::Registry(format!("engine `{engine}` not in registry")))
}

pub fn default_model(engine: Engine) -> Result<String> {
    Ok(engine_entry(engine)?.default_model.clone())
}

pub fn validate_model(engine: Engine, model: &str) -> Result<()> {
    let entry = engine_entry(engine)?;
    if entry.models.iter().any(|m| m == model) {
        Ok(())
    } else {
        Err(SepError::UnknownModel {
            engine: engine.name().to_string(),
            model: model.to_string(),
        })
    }
}

pub fn transcriber_entry(kind: TranscriberKind) -> Result<&'static TranscriberEntry> {
    REGISTRY
        .transcribers
        .iter()
        .find(|e| e.name == kind.name())
        .ok_or_else(|| SepError::Registry(format!("transcriber `{kind}` not in registry")))
}

pub fn default_transcriber_model(kind: TranscriberKind) -> Result<String> {
    Ok(transcriber_entry(kind)?.default_model.clone())
}

pub fn validate_transcriber_model(kind: TranscriberKind, model: &str) -> Result<()> {
    let entry = transcriber_entry(kind)?;
    if entry.models.iter().any(|m| m == model) {
        Ok(())
    } else {
        Err(SepError::UnknownModel {
            engine: kind.name().to_string(),
            model: model.to_string(),
        })
    }
}
