use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::{debug, info};

use super::sublime::SublimeProject;

/// Destination argument meaning "write to standard output".
pub const STDOUT_SENTINEL: &str = "-";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Destination {
    Stdout,
    File(PathBuf),
}

impl Destination {
    pub fn from_arg(raw: &Path) -> Self {
        if raw.as_os_str() == STDOUT_SENTINEL {
            Destination::Stdout
        } else {
            Destination::File(raw.to_path_buf())
        }
    }
}

/// Pretty JSON with two-space indentation and a trailing newline.
pub fn render(project: &SublimeProject) -> Result<String> {
    let mut text = serde_json::to_string_pretty(project).context("serializing project")?;
    text.push('\n');
    Ok(text)
}

pub fn write_to<W: Write>(project: &SublimeProject, out: &mut W) -> Result<()> {
    let text = render(project)?;
    out.write_all(text.as_bytes())?;
    out.flush()?;
    Ok(())
}

pub fn write_project(project: &SublimeProject, destination: &Destination) -> Result<()> {
    match destination {
        Destination::Stdout => {
            let stdout = io::stdout();
            let mut handle = stdout.lock();
            write_to(project, &mut handle).context("writing project to stdout")?;
        }
        Destination::File(path) => {
            ensure_parent_dir(path)?;
            let text = render(project)?;
            fs::write(path, text).with_context(|| format!("writing {}", path.display()))?;
            info!(path = %path.display(), "wrote project file");
        }
    }
    Ok(())
}

/// Create every missing ancestor of `path`.
fn ensure_parent_dir(path: &Path) -> Result<()> {
    let Some(parent) = path.parent() else {
        return Ok(());
    };
    if parent.as_os_str().is_empty() || parent.exists() {
        return Ok(());
    }
    fs::create_dir_all(parent)
        .with_context(|| format!("creating directory {}", parent.display()))?;
    debug!(dir = %parent.display(), "created destination directory");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::project::paths::ProjectPaths;
    use crate::project::sublime::{BuildOptions, assemble};
    use serde_json::Value;
    use tempfile::tempdir;

    fn project_for(root: &Path) -> SublimeProject {
        assemble(
            &ProjectPaths::from_repo_root(root.to_path_buf()),
            &BuildOptions::default(),
        )
    }

    #[test]
    fn dash_means_stdout() {
        assert_eq!(Destination::from_arg(Path::new("-")), Destination::Stdout);
        assert_eq!(
            Destination::from_arg(Path::new("out/-")),
            Destination::File(PathBuf::from("out/-"))
        );
    }

    #[test]
    fn rendered_document_has_exactly_two_top_level_keys() {
        let text = render(&project_for(Path::new("/work/couscous"))).expect("render");
        assert!(text.ends_with("}\n"));

        let value: Value = serde_json::from_str(&text).expect("valid json");
        let object = value.as_object().expect("top-level object");
        let keys: Vec<&str> = object.keys().map(String::as_str).collect();
        assert_eq!(keys.len(), 2);
        assert!(object.contains_key("folders"));
        assert!(object.contains_key("build_systems"));
        assert_eq!(value["build_systems"][0]["variants"].as_array().map(Vec::len), Some(3));
    }

    #[test]
    fn key_order_is_stable() {
        let text = render(&project_for(Path::new("/work/couscous"))).expect("render");
        let folders = text.find("\"folders\"").expect("folders");
        let systems = text.find("\"build_systems\"").expect("build_systems");
        let regex = text.find("\"file_regex\"").expect("file_regex");
        let variants = text.find("\"variants\"").expect("variants");
        assert!(folders < systems && systems < regex && regex < variants);
    }

    #[cfg(unix)]
    #[test]
    fn rendered_document_snapshot() {
        let text = render(&project_for(Path::new("/work/couscous"))).expect("render");
        insta::assert_snapshot!(text.trim_end(), @r#"
        {
          "folders": [
            {
              "path": "/work/couscous"
            }
          ],
          "build_systems": [
            {
              "name": "couscous",
              "file_regex": "([A-z]:.*?)\\(([0-9]+)(?:,\\s*[0-9]+)?\\)",
              "variants": [
                {
                  "name": "Build Only",
                  "windows": {
                    "cmd": [
                      "/work/couscous/code/build.bat"
                    ]
                  }
                },
                {
                  "name": "Build and Run",
                  "windows": {
                    "cmd": [
                      "/work/couscous/code/build.bat",
                      "run"
                    ]
                  }
                },
                {
                  "name": "Update MTB",
                  "windows": {
                    "cmd": [
                      "py",
                      "-3",
                      "/work/mtb/tools/generate_self_contained.py",
                      "-o",
                      "/work/couscous/code/mtb.hpp"
                    ]
                  }
                }
              ]
            }
          ]
        }
        "#);
    }

    #[test]
    fn creates_missing_ancestors_before_writing() {
        let tmp = tempdir().expect("tempdir");
        let dest = tmp.path().join("a").join("b").join("c").join("out.sublime-project");
        let project = project_for(tmp.path());

        write_project(&project, &Destination::File(dest.clone())).expect("write");

        let written = fs::read_to_string(&dest).expect("read back");
        assert_eq!(written, render(&project).expect("render"));
    }

    #[test]
    fn existing_parent_is_left_alone() {
        let tmp = tempdir().expect("tempdir");
        fs::write(tmp.path().join("keep.txt"), "untouched").expect("seed");

        ensure_parent_dir(&tmp.path().join("out.json")).expect("ensure");
        ensure_parent_dir(Path::new("bare-file.json")).expect("ensure bare");

        let entries: Vec<_> = fs::read_dir(tmp.path())
            .expect("read dir")
            .map(|entry| entry.expect("entry").file_name())
            .collect();
        assert_eq!(entries, ["keep.txt"]);
        assert!(!Path::new("bare-file.json").exists());
    }

    #[test]
    fn missing_parent_chain_is_created_without_the_file() {
        let tmp = tempdir().expect("tempdir");
        let dest = tmp.path().join("x").join("y").join("out.json");

        ensure_parent_dir(&dest).expect("ensure");

        assert!(tmp.path().join("x").join("y").is_dir());
        assert!(!dest.exists());
    }

    #[test]
    fn rewriting_overwrites_previous_content() {
        let tmp = tempdir().expect("tempdir");
        let dest = tmp.path().join("workspace").join("couscous.sublime-project");
        fs::create_dir_all(dest.parent().expect("parent")).expect("mkdir");
        fs::write(&dest, "stale content that is much longer than nothing at all").expect("seed");

        let project = project_for(tmp.path());
        write_project(&project, &Destination::File(dest.clone())).expect("first write");
        let first = fs::read(&dest).expect("first read");
        write_project(&project, &Destination::File(dest.clone())).expect("second write");
        let second = fs::read(&dest).expect("second read");

        assert_eq!(first, second);
        assert_eq!(first, render(&project).expect("render").into_bytes());
    }

    #[test]
    fn stream_output_matches_file_output() {
        let tmp = tempdir().expect("tempdir");
        let dest = tmp.path().join("out.sublime-project");
        let project = project_for(tmp.path());

        let mut buffer = Vec::new();
        write_to(&project, &mut buffer).expect("write to buffer");
        write_project(&project, &Destination::File(dest.clone())).expect("write file");

        assert_eq!(buffer, fs::read(&dest).expect("read file"));
    }

    #[test]
    fn directory_as_destination_fails_to_write() {
        let tmp = tempdir().expect("tempdir");
        let dest = tmp.path().join("already-a-dir");
        fs::create_dir(&dest).expect("mkdir");

        let err = write_project(&project_for(tmp.path()), &Destination::File(dest.clone()))
            .expect_err("writing over a directory should fail");
        assert!(format!("{err:#}").contains(&format!("writing {}", dest.display())));
        assert!(dest.is_dir());
    }

    struct BrokenPipe;

    impl Write for BrokenPipe {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "reader went away"))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn stream_write_failure_propagates() {
        let err = write_to(&project_for(Path::new("/work/couscous")), &mut BrokenPipe)
            .expect_err("stream write should fail");
        let io_err = err.downcast_ref::<io::Error>().expect("io error");
        assert_eq!(io_err.kind(), io::ErrorKind::BrokenPipe);
        assert!(err.to_string().contains("reader went away"));
    }

    #[test]
    fn parent_that_is_a_file_fails() {
        let tmp = tempdir().expect("tempdir");
        let blocker = tmp.path().join("blocker");
        fs::write(&blocker, "not a directory").expect("seed");
        let dest = blocker.join("nested").join("out.sublime-project");

        let err = write_project(&project_for(tmp.path()), &Destination::File(dest))
            .expect_err("directory creation should fail");
        assert!(format!("{err:#}").contains("creating directory"));
    }
}
