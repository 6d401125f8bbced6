use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// File name searched for by [`BuildConfig::discover`].
pub const CONFIG_FILE_NAME: &str = ".seqbuild.json";

/// Declarative description of how to invoke `seqc`.
///
/// Every key is optional in the JSON form; missing keys fall back to the
/// values of [`BuildConfig::default`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BuildConfig {
    /// Display name used in log output.
    pub name: String,
    /// Program to run.
    pub cmd: String,
    /// Arguments, may contain placeholders such as `{FILE_ACTIVE}`.
    pub args: Vec<String>,
    /// Environment overrides applied on top of the inherited environment.
    pub env: BTreeMap<String, String>,
    /// Run through the platform shell instead of spawning `cmd` directly.
    pub sh: bool,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            name: "seqc".to_string(),
            cmd: "seqc".to_string(),
            args: ["-d", "{FILE_ACTIVE}", "interleaved.fastq"]
                .map(String::from)
                .to_vec(),
            env: BTreeMap::from([(
                "SEQ_PYTHON".to_string(),
                "/usr/local/Frameworks/Python.framework/Versions/3.8/lib/libpython3.8.dylib"
                    .to_string(),
            )]),
            sh: true,
        }
    }
}

impl BuildConfig {
    pub fn from_json(content: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(content).context("Invalid build configuration")?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        Self::from_json(&content).with_context(|| format!("In {}", path.display()))
    }

    /// Looks for [`CONFIG_FILE_NAME`] in `start` and each of its ancestors.
    ///
    /// Returns the default configuration (and no path) when nothing is found.
    pub fn discover(start: &Path) -> Result<(Self, Option<PathBuf>)> {
        for dir in start.ancestors() {
            let candidate = dir.join(CONFIG_FILE_NAME);
            if candidate.is_file() {
                log::debug!("Using build configuration {:?}", candidate);
                let config = Self::load(&candidate)?;
                return Ok((config, Some(candidate)));
            }
        }
        log::debug!("No {} above {:?}, using defaults", CONFIG_FILE_NAME, start);
        Ok((Self::default(), None))
    }

    pub fn validate(&self) -> Result<()> {
        if self.cmd.trim().is_empty() {
            bail!("Build configuration '{}' has an empty `cmd`", self.name);
        }
        Ok(())
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_default_targets_seqc() {
        let config = BuildConfig::default();
        assert_eq!(config.cmd, "seqc");
        assert!(config.sh);
        assert_eq!(config.args, ["-d", "{FILE_ACTIVE}", "interleaved.fastq"]);
        assert_eq!(config.env.len(), 1);
        assert!(config.env["SEQ_PYTHON"].ends_with("libpython3.8.dylib"));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_json_merges_over_defaults() {
        let config = BuildConfig::from_json(r#"{ "args": ["--release", "main.seq"] }"#).unwrap();
        assert_eq!(config.cmd, "seqc");
        assert_eq!(config.args, vec!["--release", "main.seq"]);
        assert!(config.env.contains_key("SEQ_PYTHON"));
    }

    #[test]
    fn test_empty_cmd_is_rejected() {
        let err = BuildConfig::from_json(r#"{ "cmd": "  " }"#).unwrap_err();
        assert!(format!("{err:#}").contains("empty `cmd`"));
    }

    #[test]
    fn test_malformed_json_is_an_error() {
        assert!(BuildConfig::from_json("{ cmd: seqc").is_err());
        assert!(BuildConfig::from_json(r#"{ "sh": "yes" }"#).is_err());
    }

    #[test]
    fn test_json_round_trip() {
        let config = BuildConfig {
            sh: false,
            ..BuildConfig::default()
        };
        let parsed = BuildConfig::from_json(&config.to_json().unwrap()).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn test_discover_walks_up() {
        let root = tempfile::tempdir().unwrap();
        let nested = root.path().join("src").join("stages");
        fs::create_dir_all(&nested).unwrap();
        fs::write(
            root.path().join(CONFIG_FILE_NAME),
            r#"{ "name": "project", "sh": false }"#,
        )
        .unwrap();

        let (config, path) = BuildConfig::discover(&nested).unwrap();
        assert_eq!(config.name, "project");
        assert!(!config.sh);
        assert_eq!(path.unwrap(), root.path().join(CONFIG_FILE_NAME));
    }

    #[test]
    fn test_load_reports_path() {
        let root = tempfile::tempdir().unwrap();
        let path = root.path().join("broken.json");
        fs::write(&path, "not json").unwrap();

        let err = BuildConfig::load(&path).unwrap_err();
        assert!(format!("{err:#}").contains("broken.json"));
    }
}
