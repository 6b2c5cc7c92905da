use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

/// Directory of this tool's manifest. The tool lives directly inside the
/// repository it describes, so the repository root is one level up.
const TOOL_DIR: &str = env!("CARGO_MANIFEST_DIR");

/// Name of the sibling checkout that provides the `mtb` headers.
pub const MTB_DIR_NAME: &str = "mtb";

/// File name of the generated project, placed under `workspace/` by default.
pub const PROJECT_FILE_NAME: &str = "couscous.sublime-project";

/// Repository-relative locations the generated project points at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectPaths {
    pub repo_root: PathBuf,
    pub mtb_dir: PathBuf,
}

impl ProjectPaths {
    pub fn from_tool_dir() -> Self {
        Self::from_anchor(Path::new(TOOL_DIR))
    }

    /// Resolve from the directory the tool itself lives in.
    pub fn from_anchor(tool_dir: &Path) -> Self {
        Self::from_repo_root(parent_or_self(tool_dir).to_path_buf())
    }

    pub fn from_repo_root(repo_root: PathBuf) -> Self {
        let mtb_dir = parent_or_self(&repo_root).join(MTB_DIR_NAME);
        Self { repo_root, mtb_dir }
    }

    /// Like [`ProjectPaths::from_repo_root`], but makes a relative root
    /// absolute against the current directory first.
    pub fn from_repo_root_arg(raw: &Path) -> Result<Self> {
        let root = std::path::absolute(raw)
            .with_context(|| format!("resolving repository root {}", raw.display()))?;
        Ok(Self::from_repo_root(root))
    }

    /// Replace the mtb location. Relative values hang off the repository's
    /// parent, next to where the default checkout would be.
    pub fn with_mtb_dir(mut self, dir: &Path) -> Self {
        self.mtb_dir = if dir.is_absolute() {
            dir.to_path_buf()
        } else {
            parent_or_self(&self.repo_root).join(dir)
        };
        self
    }

    pub fn code_dir(&self) -> PathBuf {
        self.repo_root.join("code")
    }

    pub fn build_script(&self) -> PathBuf {
        self.code_dir().join("build.bat")
    }

    /// Single-header amalgamation of mtb checked into `code/`.
    pub fn mtb_header(&self) -> PathBuf {
        self.code_dir().join("mtb.hpp")
    }

    pub fn mtb_generator(&self) -> PathBuf {
        self.mtb_dir.join("tools").join("generate_self_contained.py")
    }

    pub fn default_output(&self) -> PathBuf {
        self.repo_root.join("workspace").join(PROJECT_FILE_NAME)
    }

    /// Resolve a repository-relative path; absolute paths pass through.
    pub fn in_repo(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.repo_root.join(path)
        }
    }
}

/// `/` has no parent; treat it as its own, the way the filesystem does.
fn parent_or_self(path: &Path) -> &Path {
    path.parent().unwrap_or(path)
}
