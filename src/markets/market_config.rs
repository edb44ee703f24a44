use super::market::MarketDefinition;
use crate::Token;
use crate::constants::{ChainId, MAX_EDGE_PATH_LENGTH};
use crate::utils::config_loader::{LoadConfigError, RoutingConfigLoader, RoutingConfigLoaderSync, load_from_file, load_from_file_sync, load_from_str};
use async_trait::async_trait;
use serde::Deserialize;

#[derive(Clone, Deserialize, Debug)]
#[serde(deny_unknown_fields)]
pub struct RoutingConfigSection {
    pub max_hops: u8,
}

impl RoutingConfigSection {
    pub fn with_max_hops(self, max_hops: u8) -> Self {
        Self { max_hops, ..self }
    }

    pub fn validate(&self) -> Result<(), LoadConfigError> {
        if self.max_hops == 0 {
            return Err(LoadConfigError::ConfigError("routing.max_hops must be at least 1".to_string()));
        }
        Ok(())
    }
}

impl Default for RoutingConfigSection {
    fn default() -> Self {
        Self { max_hops: MAX_EDGE_PATH_LENGTH }
    }
}

/// Markets listed on a single chain.
#[derive(Clone, Deserialize, Debug, Default)]
pub struct ChainMarketsConfig {
    pub chain_id: ChainId,
    // Optional registry, markets referencing tokens outside of it are rejected
    #[serde(default)]
    pub tokens: Vec<Token>,
    #[serde(default)]
    pub markets: Vec<MarketDefinition>,
}

impl ChainMarketsConfig {
    pub fn new(chain_id: ChainId, markets: Vec<MarketDefinition>) -> Self {
        Self { chain_id, tokens: vec![], markets }
    }

    pub fn with_tokens(self, tokens: Vec<Token>) -> Self {
        Self { tokens, ..self }
    }
}

#[derive(Clone, Deserialize, Debug, Default)]
pub struct RouteConfig {
    #[serde(default)]
    pub routing: RoutingConfigSection,
    #[serde(default)]
    pub chains: Vec<ChainMarketsConfig>,
}

impl RouteConfig {
    pub fn from_toml_str(contents: &str) -> Result<Self, LoadConfigError> {
        let config: RouteConfig = load_from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), LoadConfigError> {
        self.routing.validate()?;
        for (idx, chain) in self.chains.iter().enumerate() {
            if self.chains[..idx].iter().any(|other| other.chain_id == chain.chain_id) {
                return Err(LoadConfigError::ConfigError(format!("chain {} is configured more than once", chain.chain_id)));
            }
        }
        Ok(())
    }

    pub fn get_chain(&self, chain_id: ChainId) -> Option<&ChainMarketsConfig> {
        self.chains.iter().find(|chain| chain.chain_id == chain_id)
    }
}

#[async_trait]
impl RoutingConfigLoader for RouteConfig {
    type SectionType = RouteConfig;

    async fn load_section_from_file(file_name: String) -> Result<Self::SectionType, LoadConfigError> {
        let config: RouteConfig = load_from_file(file_name).await?;
        config.validate()?;
        Ok(config)
    }
}

impl RoutingConfigLoaderSync for RouteConfig {
    type SectionType = RouteConfig;

    fn load_section_from_file_sync(file_name: String) -> Result<Self::SectionType, LoadConfigError> {
        let config: RouteConfig = load_from_file_sync(file_name)?;
        config.validate()?;
        Ok(config)
    }
}
