use crate::utils::error::VerifyError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Resolved URL recorded when a probe never got a usable response.
pub const EXCEPTION_MARKER: &str = "Exception";

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    GeeksForGeeks,
    Codeforces,
    LeetCode,
    CodeChef,
    HackerRank,
}

/// How a platform signals "no such handle".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    /// JSON body with an `errors` field.
    GraphQl,
    /// Generic landing page title instead of a profile.
    PageTitle,
    /// Silent redirect to a canonical landing URL.
    RedirectCheck,
}

impl Platform {
    /// Roster column order, pass order for `all`, and report column order.
    pub const ALL: [Platform; 5] = [
        Platform::GeeksForGeeks,
        Platform::Codeforces,
        Platform::LeetCode,
        Platform::CodeChef,
        Platform::HackerRank,
    ];

    pub fn key(self) -> &'static str {
        match self {
            Platform::GeeksForGeeks => "geeksforgeeks",
            Platform::Codeforces => "codeforces",
            Platform::LeetCode => "leetcode",
            Platform::CodeChef => "codechef",
            Platform::HackerRank => "hackerrank",
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            Platform::GeeksForGeeks => "GeeksForGeeks",
            Platform::Codeforces => "Codeforces",
            Platform::LeetCode => "LeetCode",
            Platform::CodeChef => "CodeChef",
            Platform::HackerRank => "HackerRank",
        }
    }

    pub fn strategy(self) -> Strategy {
        match self {
            Platform::LeetCode => Strategy::GraphQl,
            Platform::HackerRank => Strategy::PageTitle,
            Platform::GeeksForGeeks | Platform::Codeforces | Platform::CodeChef => {
                Strategy::RedirectCheck
            }
        }
    }

    /// Position in [`Platform::ALL`].
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn log_file_name(self) -> String {
        format!("{}_handles.txt", self.key())
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

impl FromStr for Platform {
    type Err = VerifyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        Platform::ALL
            .into_iter()
            .find(|p| p.key() == wanted)
            .ok_or_else(|| VerifyError::UnknownPlatform {
                value: s.to_string(),
            })
    }
}

/// What the operator asked for on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selection {
    Single(Platform),
    All,
    Combine,
}

impl Selection {
    /// Platforms to probe, in pass order. Empty for `Combine`.
    pub fn platforms(self) -> Vec<Platform> {
        match self {
            Selection::Single(p) => vec![p],
            Selection::All => Platform::ALL.to_vec(),
            Selection::Combine => Vec::new(),
        }
    }
}

impl FromStr for Selection {
    type Err = VerifyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "all" => Ok(Selection::All),
            "combine" => Ok(Selection::Combine),
            _ => s.parse().map(Selection::Single),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParticipantRecord {
    pub id: String,
    pub handles: BTreeMap<Platform, String>,
}

impl ParticipantRecord {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            handles: BTreeMap::new(),
        }
    }

    pub fn with_handle(mut self, platform: Platform, handle: impl Into<String>) -> Self {
        self.handles.insert(platform, handle.into());
        self
    }

    /// The handle to probe, or `None` when the cell is empty or a sentinel.
    pub fn handle_for(&self, platform: Platform, sentinels: &[String]) -> Option<&str> {
        let handle = self.handles.get(&platform)?.trim();
        if handle.is_empty() || sentinels.iter().any(|s| s.trim() == handle) {
            return None;
        }
        Some(handle)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Classification {
    Exists,
    NotFound,
    TransportError,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeOutcome {
    pub exists: bool,
    pub resolved_url: String,
    pub classification: Classification,
}

impl ProbeOutcome {
    pub fn exists(resolved_url: impl Into<String>) -> Self {
        Self {
            exists: true,
            resolved_url: resolved_url.into(),
            classification: Classification::Exists,
        }
    }

    pub fn not_found(resolved_url: impl Into<String>) -> Self {
        Self {
            exists: false,
            resolved_url: resolved_url.into(),
            classification: Classification::NotFound,
        }
    }

    pub fn transport_error() -> Self {
        Self {
            exists: false,
            resolved_url: EXCEPTION_MARKER.to_string(),
            classification: Classification::TransportError,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultRecord {
    pub participant_id: String,
    pub handle: String,
    pub exists: bool,
}

/// Counters for one platform pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PassSummary {
    pub probed: usize,
    pub skipped: usize,
    pub existing: usize,
    pub missing: usize,
    pub retried: usize,
}
