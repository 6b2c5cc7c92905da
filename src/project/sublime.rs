use std::collections::BTreeMap;
use std::path::Path;

use serde::Serialize;

use super::paths::ProjectPaths;

/// Build-system name shown in Sublime's `Tools > Build System` menu.
pub const PROJECT_NAME: &str = "couscous";

/// Matches MSVC diagnostics like `C:\src\couscous.cpp(42,7): error C2065`.
/// Group 1 is the file, group 2 the line.
pub const FILE_REGEX: &str = r"([A-z]:.*?)\(([0-9]+)(?:,\s*[0-9]+)?\)";

pub const DEFAULT_PYTHON: &[&str] = &["py", "-3"];

pub const BUILD_ONLY: &str = "Build Only";
pub const BUILD_AND_RUN: &str = "Build and Run";
pub const UPDATE_MTB: &str = "Update MTB";

/// Top-level `*.sublime-project` document. Field order is serialization order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SublimeProject {
    pub folders: Vec<Folder>,
    pub build_systems: Vec<BuildSystem>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Folder {
    pub path: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BuildSystem {
    pub name: String,
    pub file_regex: String,
    pub variants: Vec<Variant>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Variant {
    pub name: String,
    #[serde(flatten)]
    pub platforms: BTreeMap<Platform, PlatformCommand>,
}

/// Platform key of a build variant. Only Windows has build scripts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Windows,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlatformCommand {
    pub cmd: Vec<String>,
}

/// Knobs the generated build system can be tuned with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildOptions {
    pub name: String,
    /// Interpreter launcher used to run mtb's generator script.
    pub python: Vec<String>,
}

impl Default for BuildOptions {
    fn default() -> Self {
        Self {
            name: PROJECT_NAME.to_string(),
            python: DEFAULT_PYTHON.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl Variant {
    /// The build scripts are batch files, so every variant targets Windows.
    fn windows(name: &str, cmd: Vec<String>) -> Self {
        Self {
            name: name.to_string(),
            platforms: [(Platform::Windows, PlatformCommand { cmd })]
                .into_iter()
                .collect(),
        }
    }
}

pub fn assemble(paths: &ProjectPaths, options: &BuildOptions) -> SublimeProject {
    let build_script = path_arg(&paths.build_script());

    let mut update_mtb = options.python.clone();
    update_mtb.extend([
        path_arg(&paths.mtb_generator()),
        "-o".to_string(),
        path_arg(&paths.mtb_header()),
    ]);

    SublimeProject {
        folders: vec![Folder {
            path: path_arg(&paths.repo_root),
        }],
        build_systems: vec![BuildSystem {
            name: options.name.clone(),
            file_regex: FILE_REGEX.to_string(),
            variants: vec![
                Variant::windows(BUILD_ONLY, vec![build_script.clone()]),
                Variant::windows(BUILD_AND_RUN, vec![build_script, "run".to_string()]),
                Variant::windows(UPDATE_MTB, update_mtb),
            ],
        }],
    }
}

fn path_arg(path: &Path) -> String {
    path.to_string_lossy().into_owned()
}
