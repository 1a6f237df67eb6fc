use std::str::FromStr;
use tower_governor::governor::{GovernorConfig, GovernorConfigBuilder};
use tower_governor::key_extractor::PeerIpKeyExtractor;

fn env_or<T: FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

fn build_governor(
    per_second: u64,
    burst_size: u32,
) -> GovernorConfig<PeerIpKeyExtractor, ::governor::middleware::NoOpMiddleware> {
    GovernorConfigBuilder::default()
        .per_second(per_second)
        .burst_size(burst_size)
        .key_extractor(PeerIpKeyExtractor)
        .finish()
        .expect("Failed to build rate limiter config")
}

/// Rate limit configuration for the API.
///
/// The adjustment endpoint gets its own, stricter tier: a batch touches
/// many rows under lock, so it is the endpoint worth throttling hardest.
#[derive(Clone, Debug)]
pub struct RateLimitConfig {
    /// Requests per second for general endpoints
    pub general_per_second: u64,
    /// Burst size for general endpoints
    pub general_burst_size: u32,
    /// Requests per second for the score adjustment endpoint
    pub adjust_per_second: u64,
    /// Burst size for the score adjustment endpoint
    pub adjust_burst_size: u32,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            general_per_second: 2,
            general_burst_size: 30,
            adjust_per_second: 10,
            adjust_burst_size: 5,
        }
    }
}

impl RateLimitConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            general_per_second: env_or(
                "RATE_LIMIT_GENERAL_PER_SECOND",
                defaults.general_per_second,
            ),
            general_burst_size: env_or(
                "RATE_LIMIT_GENERAL_BURST_SIZE",
                defaults.general_burst_size,
            ),
            adjust_per_second: env_or("RATE_LIMIT_ADJUST_PER_SECOND", defaults.adjust_per_second),
            adjust_burst_size: env_or("RATE_LIMIT_ADJUST_BURST_SIZE", defaults.adjust_burst_size),
        }
    }

    /// GovernorConfig for general API endpoints.
    pub fn general_governor_config(
        &self,
    ) -> GovernorConfig<PeerIpKeyExtractor, ::governor::middleware::NoOpMiddleware> {
        build_governor(self.general_per_second, self.general_burst_size)
    }

    /// GovernorConfig for the score adjustment endpoint.
    pub fn adjust_governor_config(
        &self,
    ) -> GovernorConfig<PeerIpKeyExtractor, ::governor::middleware::NoOpMiddleware> {
        build_governor(self.adjust_per_second, self.adjust_burst_size)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = RateLimitConfig::default();
        assert_eq!(config.general_per_second, 2);
        assert_eq!(config.general_burst_size, 30);
        assert_eq!(config.adjust_per_second, 10);
        assert_eq!(config.adjust_burst_size, 5);
    }

    #[test]
    fn test_governor_configs_build() {
        let config = RateLimitConfig::default();
        let _ = config.general_governor_config();
        let _ = config.adjust_governor_config();
    }
}
