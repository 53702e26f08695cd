//! Profiler configuration and report destinations
//!
//! Accepts the same `profileOutputPath` key as the crawler configuration the
//! profiler reports for, in either JSON or TOML.

use crate::error::{ProfilerError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

/// Where a report is written
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReportDestination {
    Stdout,
    /// Appended to, never truncated
    File(PathBuf),
}

impl fmt::Display for ReportDestination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReportDestination::Stdout => write!(f, "<stdout>"),
            ReportDestination::File(path) => write!(f, "{}", path.display()),
        }
    }
}

/// Profiler settings
///
/// # Example
/// ```
/// use method_profiler::config::{ProfilerConfig, ReportDestination};
///
/// let config = ProfilerConfig::from_json_str(r#"{ "profileOutputPath": "profile.txt" }"#).unwrap();
/// assert_eq!(config.destination(), ReportDestination::File("profile.txt".into()));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ProfilerConfig {
    /// File the report is appended to
    ///
    /// Unset or empty means stdout.
    pub profile_output_path: Option<PathBuf>,
}

impl ProfilerConfig {
    pub fn from_json_str(json: &str) -> std::result::Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn from_toml_str(text: &str) -> std::result::Result<Self, toml::de::Error> {
        toml::from_str(text)
    }

    /// Load from a file; `.toml` files are parsed as TOML, anything else as JSON
    pub fn from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|source| ProfilerError::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;

        let is_toml = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("toml"));
        let parsed = if is_toml {
            Self::from_toml_str(&text).map_err(|e| e.to_string())
        } else {
            Self::from_json_str(&text).map_err(|e| e.to_string())
        };

        parsed.map_err(|message| ProfilerError::ConfigParse {
            path: path.to_path_buf(),
            message,
        })
    }

    pub fn destination(&self) -> ReportDestination {
        match &self.profile_output_path {
            Some(path) if !path.as_os_str().is_empty() => ReportDestination::File(path.clone()),
            _ => ReportDestination::Stdout,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::{Builder, NamedTempFile};

    fn temp_with_suffix(suffix: &str) -> NamedTempFile {
        Builder::new().suffix(suffix).tempfile().unwrap()
    }

    #[test]
    fn test_default_writes_to_stdout() {
        let config = ProfilerConfig::default();
        assert_eq!(config.profile_output_path, None);
        assert_eq!(config.destination(), ReportDestination::Stdout);
    }

    #[test]
    fn test_empty_path_means_stdout() {
        let config = ProfilerConfig::from_json_str(r#"{ "profileOutputPath": "" }"#).unwrap();
        assert_eq!(config.destination(), ReportDestination::Stdout);
    }

    #[test]
    fn test_json_ignores_unrelated_crawler_keys() {
        let json = r#"{
            "startPages": ["http://example.com"],
            "parallelism": 4,
            "profileOutputPath": "profileData.txt"
        }"#;
        let config = ProfilerConfig::from_json_str(json).unwrap();
        assert_eq!(
            config.destination(),
            ReportDestination::File(PathBuf::from("profileData.txt"))
        );
    }

    #[test]
    fn test_toml_config() {
        let config = ProfilerConfig::from_toml_str("profileOutputPath = \"out/profile.txt\"\n").unwrap();
        assert_eq!(
            config.profile_output_path,
            Some(PathBuf::from("out/profile.txt"))
        );
    }

    #[test]
    fn test_from_file_picks_format_by_extension() {
        let mut toml_file = temp_with_suffix(".toml");
        writeln!(toml_file, "profileOutputPath = \"a.txt\"").unwrap();
        let config = ProfilerConfig::from_file(toml_file.path()).unwrap();
        assert_eq!(config.profile_output_path, Some(PathBuf::from("a.txt")));

        let mut json_file = temp_with_suffix(".json");
        write!(json_file, r#"{{"profileOutputPath": "b.txt"}}"#).unwrap();
        let config = ProfilerConfig::from_file(json_file.path()).unwrap();
        assert_eq!(config.profile_output_path, Some(PathBuf::from("b.txt")));
    }

    #[test]
    fn test_from_file_errors_name_the_path() {
        let mut bad = temp_with_suffix(".json");
        write!(bad, "{{ not json").unwrap();
        let err = ProfilerConfig::from_file(bad.path()).unwrap_err();
        assert!(matches!(err, ProfilerError::ConfigParse { ref path, .. } if path == bad.path()));

        let err = ProfilerConfig::from_file(Path::new("/nonexistent/profiler.json")).unwrap_err();
        assert!(matches!(err, ProfilerError::ConfigRead { .. }));
        assert!(err.to_string().contains("/nonexistent/profiler.json"));
    }

    #[test]
    fn test_destination_display() {
        assert_eq!(ReportDestination::Stdout.to_string(), "<stdout>");
        assert_eq!(
            ReportDestination::File(PathBuf::from("/tmp/p.txt")).to_string(),
            "/tmp/p.txt"
        );
    }
}
