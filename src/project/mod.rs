pub mod paths;
pub mod sublime;
pub mod writer;

use std::path::PathBuf;

use anyhow::{Context, Result};
use tracing::debug;

use crate::config::{LoadedGeneratorConfig, load_generator_config_from_dir};
use paths::ProjectPaths;
use sublime::{BuildOptions, assemble};
use writer::{Destination, write_project};

/// Inputs for one generator run. `None` falls back to config, then defaults.
#[derive(Debug, Clone, Default)]
pub struct GenerateRequest {
    pub dest: Option<PathBuf>,
    pub repo_root: Option<PathBuf>,
    pub mtb_dir: Option<PathBuf>,
    pub use_config: bool,
}

/// Resolve paths, assemble the project and write it. Returns where it went.
pub fn generate(request: &GenerateRequest) -> Result<Destination> {
    let mut paths = match request.repo_root.as_deref() {
        Some(root) => ProjectPaths::from_repo_root_arg(root)?,
        None => ProjectPaths::from_tool_dir(),
    };

    let config = if request.use_config {
        load_generator_config_from_dir(&paths.repo_root)?
    } else {
        None
    };

    let mut options = BuildOptions::default();
    if let Some(cfg) = config.as_ref() {
        debug!(path = %cfg.path.display(), "using generator config");
        apply_config(cfg, &mut paths, &mut options)?;
    }

    // Command-line values are relative to where the tool was run, unlike config values.
    if let Some(dir) = request.mtb_dir.as_deref() {
        paths.mtb_dir = std::path::absolute(dir)
            .with_context(|| format!("resolving mtb directory {}", dir.display()))?;
    }
    debug!(
        repo_root = %paths.repo_root.display(),
        mtb_dir = %paths.mtb_dir.display(),
        "resolved project paths"
    );

    let destination = match request.dest.as_deref() {
        Some(raw) => Destination::from_arg(raw),
        None => Destination::File(
            config
                .as_ref()
                .and_then(|cfg| cfg.data.output.as_deref())
                .map(|output| paths.in_repo(output))
                .unwrap_or_else(|| paths.default_output()),
        ),
    };

    let project = assemble(&paths, &options);
    write_project(&project, &destination)?;
    Ok(destination)
}

fn apply_config(
    cfg: &LoadedGeneratorConfig,
    paths: &mut ProjectPaths,
    options: &mut BuildOptions,
) -> Result<()> {
    if let Some(name) = cfg.data.name.as_ref() {
        options.name = name.clone();
    }
    if let Some(launcher) = cfg.python_launcher()? {
        options.python = launcher;
    }
    if let Some(dir) = cfg.data.mtb_dir.as_deref() {
        *paths = paths.clone().with_mtb_dir(dir);
    }
    Ok(())
}
