use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use serde::Deserialize;

const CONFIG_CANDIDATES: &[(&str, ConfigFormat)] = &[
    ("sublime-project.yml", ConfigFormat::Yaml),
    ("sublime-project.yaml", ConfigFormat::Yaml),
    ("sublime-project.toml", ConfigFormat::Toml),
];

#[derive(Debug, Clone)]
pub enum ConfigFormat {
    Yaml,
    Toml,
}

#[derive(Debug, Clone)]
pub struct LoadedGeneratorConfig {
    pub path: PathBuf,
    pub data: GeneratorConfig,
}

impl LoadedGeneratorConfig {
    /// The configured interpreter launcher, if any. An empty launcher is an error.
    pub fn python_launcher(&self) -> Result<Option<Vec<String>>> {
        let Some(python) = self.data.python.as_ref() else {
            return Ok(None);
        };
        let argv = python.argv();
        if argv.is_empty() {
            bail!("`python` launcher in {} is empty", self.path.display());
        }
        Ok(Some(argv))
    }
}

/// Per-repository overrides for the generated project. Every key is optional.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct GeneratorConfig {
    #[serde(default)]
    pub name: Option<String>,
    /// Relative paths resolve against the repository's parent directory.
    #[serde(default)]
    pub mtb_dir: Option<PathBuf>,
    #[serde(default)]
    pub python: Option<Launcher>,
    /// Relative paths resolve against the repository root.
    #[serde(default)]
    pub output: Option<PathBuf>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum Launcher {
    Command(String),
    Args(Vec<String>),
}

impl Launcher {
    pub fn argv(&self) -> Vec<String> {
        match self {
            Launcher::Command(cmd) => cmd.split_whitespace().map(str::to_string).collect(),
            Launcher::Args(args) => args
                .iter()
                .filter(|arg| !arg.trim().is_empty())
                .cloned()
                .collect(),
        }
    }
}

pub fn load_generator_config_from_dir(base_dir: &Path) -> Result<Option<LoadedGeneratorConfig>> {
    for (file, format) in CONFIG_CANDIDATES {
        let path = base_dir.join(file);
        if !path.exists() {
            continue;
        }
        let content = fs::read_to_string(&path)
            .with_context(|| format!("reading generator config at {}", path.display()))?;
        let data = match format {
            ConfigFormat::Yaml => parse_yaml_str(&content)
                .with_context(|| format!("parsing YAML config at {}", path.display()))?,
            ConfigFormat::Toml => parse_toml_str(&content)
                .with_context(|| format!("parsing TOML config at {}", path.display()))?,
        };
        return Ok(Some(LoadedGeneratorConfig { path, data }));
    }
    Ok(None)
}

pub(crate) fn parse_yaml_str(content: &str) -> Result<GeneratorConfig> {
    // Empty and `~` documents are null, not an empty mapping.
    if content.trim().is_empty() {
        return Ok(GeneratorConfig::default());
    }
    let parsed: Option<GeneratorConfig> = serde_yaml::from_str(content)?;
    Ok(parsed.unwrap_or_default())
}

pub(crate) fn parse_toml_str(content: &str) -> Result<GeneratorConfig> {
    Ok(toml::from_str(content)?)
}
