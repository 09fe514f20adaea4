use std::{fmt::Display, time::Duration};

use clap::ValueEnum;

/// Regional routing value of the match-v5 endpoints.
#[derive(ValueEnum, Debug, Copy, Clone, Default, PartialEq, Eq)]
pub enum Region {
    #[default]
    Americas,
    Europe,
    Asia,
    Sea,
}

impl Region {
    pub fn base_url(self) -> String {
        format!("https://{}.api.riotgames.com", self)
    }
}

impl Display for Region {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Region::Americas => "americas",
            Region::Europe => "europe",
            Region::Asia => "asia",
            Region::Sea => "sea",
        };
        f.write_str(name)
    }
}

pub const DATA_DRAGON_URL: &str = "https://ddragon.leagueoflegends.com";

/// Wait applied when a 429 response carries no usable `Retry-After` header.
pub const DEFAULT_FALLBACK_WAIT: Duration = Duration::from_secs(10);

#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub base_url: String,
    pub api_key: Option<String>,
    pub proxy: Option<String>,
    pub timeout: Duration,
    pub connect_timeout: Duration,
    pub fallback_wait: Duration,
    /// `None` retries rate-limited requests for as long as the server asks us to.
    pub max_retries: Option<u32>,
}

impl ClientConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            api_key: None,
            proxy: None,
            timeout: Duration::from_secs(120),
            connect_timeout: Duration::from_secs(60),
            fallback_wait: DEFAULT_FALLBACK_WAIT,
            max_retries: None,
        }
    }

    pub fn for_region(region: Region, api_key: impl Into<String>) -> Self {
        Self::new(region.base_url()).with_api_key(api_key)
    }

    pub fn data_dragon() -> Self {
        Self::new(DATA_DRAGON_URL)
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    pub fn with_proxy(mut self, proxy: Option<String>) -> Self {
        self.proxy = proxy;
        self
    }

    pub fn with_max_retries(mut self, max_retries: Option<u32>) -> Self {
        self.max_retries = max_retries;
        self
    }

    pub fn with_fallback_wait(mut self, fallback_wait: Duration) -> Self {
        self.fallback_wait = fallback_wait;
        self
    }
}
