//! Checks every post under the posts directory and fails if any is malformed.

use std::path::Path;
use std::process::ExitCode;

use log::Level;
use postshelf::logger::Logger;
use postshelf::services::validation_service::validate_dir;
use postshelf::Config;

const TAG: &str = "[validate:posts]";

fn main() -> ExitCode {
    if let Err(e) = Logger::init_with_default(Level::Warn) {
        eprintln!("{TAG} Failed to initialize logger: {e}");
    }

    let posts_dir = Config::from_env().posts_dir;
    let (checked, failures) = match validate_dir(&posts_dir) {
        Ok(outcome) => outcome,
        Err(e) => {
            eprintln!("{TAG} Unexpected error: {e}");
            return ExitCode::FAILURE;
        }
    };

    if failures.is_empty() {
        println!("{TAG} OK ({checked} post(s))");
        return ExitCode::SUCCESS;
    }

    eprintln!("{TAG} Found {} invalid post(s).", failures.len());
    for failure in &failures {
        eprintln!("\n- {}", display_path(&failure.path));
        for message in &failure.errors {
            eprintln!("  - {message}");
        }
    }
    ExitCode::FAILURE
}

/// Path relative to the working directory when possible
fn display_path(path: &Path) -> String {
    std::env::current_dir()
        .ok()
        .and_then(|cwd| path.strip_prefix(cwd).ok().map(Path::to_path_buf))
        .unwrap_or_else(|| path.to_path_buf())
        .display()
        .to_string()
}
