#[cfg(feature = "cli")]
pub mod cli;
pub mod toml_config;

use crate::domain::model::Platform;
use crate::utils::error::{Result, VerifyError};
use crate::utils::validation::{self, Validate};
use std::collections::BTreeMap;
use std::path::PathBuf;
use toml_config::TomlConfig;

pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
    AppleWebKit/537.36 (KHTML, like Gecko) Chrome/121.0.0.0 Safari/537.36";

pub const DEFAULT_SENTINEL: &str = "#N/A";

pub const HACKERRANK_LANDING_TITLE: &str = "Programming Problems and Competitions :: HackerRank";

/// Where a platform is probed and what its "not found" signal looks like.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EndpointConfig {
    /// Profile URL prefix; the handle is appended. For LeetCode this is the
    /// GraphQL endpoint and the handle goes into the query instead.
    pub profile_url: String,
    /// Final URL that means the platform bounced an unknown handle.
    pub landing_url: Option<String>,
    /// Page title that means the platform bounced an unknown handle.
    pub landing_title: Option<String>,
}

impl EndpointConfig {
    pub fn default_for(platform: Platform) -> Self {
        let (profile_url, landing_url, landing_title) = match platform {
            Platform::GeeksForGeeks => (
                "https://auth.geeksforgeeks.org/user/",
                Some("https://auth.geeksforgeeks.org/?to=https://auth.geeksforgeeks.org/profile.php"),
                None,
            ),
            Platform::Codeforces => (
                "https://codeforces.com/profile/",
                Some("https://codeforces.com/"),
                None,
            ),
            Platform::LeetCode => ("https://leetcode.com/graphql", None, None),
            Platform::CodeChef => (
                "https://www.codechef.com/users/",
                Some("https://www.codechef.com/"),
                None,
            ),
            Platform::HackerRank => (
                "https://www.hackerrank.com/profile/",
                None,
                Some(HACKERRANK_LANDING_TITLE),
            ),
        };
        Self {
            profile_url: profile_url.to_string(),
            landing_url: landing_url.map(str::to_string),
            landing_title: landing_title.map(str::to_string),
        }
    }
}

/// Fully resolved runtime settings: defaults, then the TOML file, then flags.
#[derive(Debug, Clone)]
pub struct Settings {
    pub user_agent: String,
    pub timeout_seconds: Option<u64>,
    pub sentinels: Vec<String>,
    pub output_dir: PathBuf,
    pub resume: bool,
    endpoints: BTreeMap<Platform, EndpointConfig>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            user_agent: DEFAULT_USER_AGENT.to_string(),
            timeout_seconds: None,
            sentinels: vec![DEFAULT_SENTINEL.to_string()],
            output_dir: PathBuf::from("."),
            resume: false,
            endpoints: Platform::ALL
                .into_iter()
                .map(|p| (p, EndpointConfig::default_for(p)))
                .collect(),
        }
    }
}

impl Settings {
    pub fn from_toml(config: TomlConfig) -> Result<Self> {
        let mut settings = Self::default();

        if let Some(user_agent) = config.http.user_agent {
            settings.user_agent = user_agent;
        }
        settings.timeout_seconds = config.http.timeout_seconds;
        if let Some(sentinels) = config.roster.sentinels {
            settings.sentinels = sentinels;
        }
        if let Some(dir) = config.output.dir {
            settings.output_dir = PathBuf::from(dir);
        }

        for (name, overrides) in config.endpoints {
            let platform: Platform = name.parse().map_err(|_| VerifyError::InvalidConfigValueError {
                field: "endpoints".to_string(),
                value: name.clone(),
                reason: "not a supported platform".to_string(),
            })?;
            let endpoint = settings.endpoint_mut(platform);
            if let Some(url) = overrides.profile_url {
                endpoint.profile_url = url;
            }
            if overrides.landing_url.is_some() {
                endpoint.landing_url = overrides.landing_url;
            }
            if overrides.landing_title.is_some() {
                endpoint.landing_title = overrides.landing_title;
            }
        }

        Ok(settings)
    }

    pub fn endpoint(&self, platform: Platform) -> &EndpointConfig {
        // Every platform is seeded in `Default`.
        &self.endpoints[&platform]
    }

    pub fn endpoint_mut(&mut self, platform: Platform) -> &mut EndpointConfig {
        self.endpoints
            .entry(platform)
            .or_insert_with(|| EndpointConfig::default_for(platform))
    }

    pub fn log_path(&self, platform: Platform) -> PathBuf {
        self.output_dir.join(platform.log_file_name())
    }

    pub fn report_path(&self) -> PathBuf {
        self.output_dir.join(crate::core::merge::REPORT_FILE_NAME)
    }
}

impl Validate for Settings {
    fn validate(&self) -> Result<()> {
        validation::validate_non_empty_string("http.user_agent", &self.user_agent)?;
        if let Some(timeout) = self.timeout_seconds {
            validation::validate_range("http.timeout_seconds", timeout, 1, 600)?;
        }
        validation::validate_path("output.dir", &self.output_dir.to_string_lossy())?;

        for platform in Platform::ALL {
            let endpoint = self.endpoint(platform);
            let field = format!("endpoints.{}", platform.key());
            validation::validate_url(&format!("{}.profile_url", field), &endpoint.profile_url)?;
            if let Some(landing) = &endpoint.landing_url {
                validation::validate_url(&format!("{}.landing_url", field), landing)?;
            }
            if let Some(title) = &endpoint.landing_title {
                validation::validate_non_empty_string(&format!("{}.landing_title", field), title)?;
            }
        }
        Ok(())
    }
}
