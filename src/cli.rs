use std::path::PathBuf;

use clap::Parser;

use crate::project::writer::Destination;
use crate::project::{GenerateRequest, generate};

/// Root CLI for couscous-sublime
#[derive(Parser)]
#[command(name = "couscous-sublime")]
#[command(about = "Generate the Sublime Text project file for couscous")]
pub struct Cli {
    /// The destination file (`-` writes to standard output)
    pub dest: Option<PathBuf>,
    /// Repository root to describe instead of the checkout this tool lives in
    #[arg(long)]
    pub repo_root: Option<PathBuf>,
    /// Location of the mtb checkout, relative to the current directory (defaults to `<repo>/../mtb`)
    #[arg(long)]
    pub mtb_dir: Option<PathBuf>,
    /// Ignore sublime-project.{yml,yaml,toml} in the repository root
    #[arg(long)]
    pub no_config: bool,
}

impl Cli {
    fn request(self) -> GenerateRequest {
        GenerateRequest {
            dest: self.dest,
            repo_root: self.repo_root,
            mtb_dir: self.mtb_dir,
            use_config: !self.no_config,
        }
    }
}

/// Dispatch after parse
pub fn run() {
    let cli = Cli::parse();

    match generate(&cli.request()) {
        Ok(Destination::File(path)) => println!("Wrote {}", path.display()),
        Ok(Destination::Stdout) => {}
        Err(e) => {
            eprintln!("error (generate): {e:#}");
            std::process::exit(1);
        }
    }
}
