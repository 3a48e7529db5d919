//! Shared helpers for building the engine from CLI inputs.

use std::collections::HashMap;
use std::error::Error;
use std::path::Path;
use std::sync::Arc;

use fairhour_core::{
    CountryWorkConfig, EngineConfig, EquityScorer, HeatmapGenerator, HolidayApiClient,
    HolidayService, HolidayStore, Participant, WorkConfigRegistry,
};

/// Cache scope used for all CLI lookups.
const CLI_SCOPE: &str = "cli";

/// Parse repeated `id:zone:country` participant specs.
pub fn parse_participants(specs: &[String]) -> Result<Vec<Participant>, Box<dyn Error>> {
    let mut participants = Vec::new();
    for spec in specs {
        let parts: Vec<&str> = spec.split(':').collect();
        if parts.len() != 3 {
            return Err(format!("invalid participant '{spec}': expected id:zone:country").into());
        }
        participants.push(Participant::new(parts[0], parts[1], parts[2]));
    }
    Ok(participants)
}

/// Load participants from a JSON file containing an array of
/// `{id, timezone, country}` objects.
pub fn load_participants_file(path: &Path) -> Result<Vec<Participant>, Box<dyn Error>> {
    let raw = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&raw)?)
}

/// Load a per-country working-hours registry from a TOML file mapping
/// country codes to configs; entries are validated on the way in.
pub fn load_registry(path: Option<&Path>) -> Result<WorkConfigRegistry, Box<dyn Error>> {
    let Some(path) = path else {
        return Ok(WorkConfigRegistry::new());
    };
    let raw = std::fs::read_to_string(path)?;
    let configs: HashMap<String, CountryWorkConfig> = toml::from_str(&raw)?;
    for (country, config) in &configs {
        config
            .validate()
            .map_err(|e| format!("work config for {country}: {e}"))?;
    }
    Ok(WorkConfigRegistry::from_configs(configs))
}

/// Holiday service wired from the engine configuration and the on-disk cache.
pub fn build_service() -> Result<HolidayService, Box<dyn Error>> {
    let config = EngineConfig::load()?;
    let client = HolidayApiClient::from_config(&config.holiday_api)?;
    let store = Arc::new(HolidayStore::open()?);
    Ok(HolidayService::new(client, store, CLI_SCOPE).with_ttl_days(config.cache.ttl_days))
}

/// Heatmap generator wired from the engine configuration.
pub fn build_generator(work_config: Option<&Path>) -> Result<HeatmapGenerator, Box<dyn Error>> {
    let config = EngineConfig::load()?;
    let service = build_service()?;
    let registry = load_registry(work_config)?;
    Ok(HeatmapGenerator::new(service, registry)
        .with_scorer(EquityScorer::with_weights(config.scoring)))
}
