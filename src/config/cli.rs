use super::toml_config::TomlConfig;
use super::Settings;
use crate::domain::model::Selection;
use crate::utils::error::Result;
use crate::utils::validation::Validate;
use clap::Parser;
use std::path::PathBuf;

#[derive(Debug, Clone, Parser)]
#[command(name = "handle-verifier")]
#[command(about = "Checks that competitive-programming handles resolve to live profiles")]
pub struct CliConfig {
    /// Roster file (.xlsx or .csv)
    pub input: PathBuf,

    /// GeeksForGeeks, Codeforces, LeetCode, CodeChef, HackerRank, All or Combine
    pub platform: String,

    /// Directory for the per-platform logs and the combined report
    #[arg(long)]
    pub output_dir: Option<PathBuf>,

    /// Optional TOML file with endpoint, HTTP and roster settings
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Append to existing result logs instead of truncating them
    #[arg(long)]
    pub resume: bool,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Emit logs as JSON lines")]
    pub json_logs: bool,
}

impl CliConfig {
    pub fn selection(&self) -> Result<Selection> {
        self.platform.parse()
    }

    /// Builds validated settings from the optional TOML file and the flags.
    pub fn settings(&self) -> Result<Settings> {
        let file_config = match &self.config {
            Some(path) => TomlConfig::from_file(path)?,
            None => TomlConfig::default(),
        };

        let mut settings = Settings::from_toml(file_config)?;
        if let Some(dir) = &self.output_dir {
            settings.output_dir = dir.clone();
        }
        settings.resume = self.resume;
        settings.validate()?;
        Ok(settings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::Platform;

    #[test]
    fn test_positional_arguments_and_flags() {
        let cli = CliConfig::parse_from([
            "handle-verifier",
            "roster.xlsx",
            "Codeforces",
            "--output-dir",
            "out",
            "--resume",
        ]);
        assert_eq!(cli.input, PathBuf::from("roster.xlsx"));
        assert_eq!(cli.selection().unwrap(), Selection::Single(Platform::Codeforces));

        let settings = cli.settings().unwrap();
        assert_eq!(settings.output_dir, PathBuf::from("out"));
        assert!(settings.resume);
    }

    #[test]
    fn test_unknown_platform_is_reported() {
        let cli = CliConfig::parse_from(["handle-verifier", "roster.csv", "atcoder"]);
        assert!(cli.selection().is_err());
    }
}
