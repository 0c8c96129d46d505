use std::{sync::Arc, time::Duration};

use crate::{
    config::{GenerationConfig, DEFAULT_DAILY_PAUSE, DEFAULT_TIMEOUT},
    core::governor::{MinIntervalGovernor, RateGovernor},
    error::Result,
    map::MapAssembler,
    services::{create_client, GenerationClient},
};

/// Four-stage itinerary generator.
///
/// Holds no per-run state; every call to [`ItineraryPipeline::generate`]
/// starts fresh.
#[derive(Debug, Clone)]
pub struct ItineraryPipeline {
    client: Arc<dyn GenerationClient>,
    governor: Arc<dyn RateGovernor>,
    map_assembler: MapAssembler,
    call_timeout: Duration,
    static_map_fallback: bool,
}

impl ItineraryPipeline {
    pub fn new(client: Arc<dyn GenerationClient>) -> Self {
        Self {
            client,
            governor: Arc::new(MinIntervalGovernor::new(DEFAULT_DAILY_PAUSE)),
            map_assembler: MapAssembler::new(),
            call_timeout: DEFAULT_TIMEOUT,
            static_map_fallback: true,
        }
    }

    /// Build the client described by `config` and pace daily calls by its pause.
    pub fn from_config(config: &GenerationConfig) -> Result<Self> {
        let client = create_client(config)?;
        Ok(Self::new(client)
            .with_call_timeout(config.timeout)
            .with_governor(Arc::new(MinIntervalGovernor::new(config.daily_pause))))
    }

    pub fn with_governor(mut self, governor: Arc<dyn RateGovernor>) -> Self {
        self.governor = governor;
        self
    }

    pub fn with_map_assembler(mut self, map_assembler: MapAssembler) -> Self {
        self.map_assembler = map_assembler;
        self
    }

    pub fn with_call_timeout(mut self, call_timeout: Duration) -> Self {
        self.call_timeout = call_timeout;
        self
    }

    /// Place a single city-centre marker when coordinates cannot be generated
    pub fn with_static_map_fallback(mut self, enabled: bool) -> Self {
        self.static_map_fallback = enabled;
        self
    }

    pub(crate) fn client(&self) -> &dyn GenerationClient {
        self.client.as_ref()
    }

    pub(crate) fn governor(&self) -> &dyn RateGovernor {
        self.governor.as_ref()
    }

    pub(crate) fn map_assembler(&self) -> &MapAssembler {
        &self.map_assembler
    }

    pub(crate) fn call_timeout(&self) -> Duration {
        self.call_timeout
    }

    pub(crate) fn static_map_fallback(&self) -> bool {
        self.static_map_fallback
    }
}
