use clap::{Arg, ArgAction, Command};
use std::io::ErrorKind;
use std::path::PathBuf;

pub fn build_cli() -> Command {
    Command::new("open-stack-backend")
        .about("Beginner-friendly GitHub issue finder (HTTP JSON API)")
        .arg(
            Arg::new("log-level")
                .long("log-level")
                .num_args(1)
                .help("Override RUST_LOG level (e.g., info, debug)"),
        )
        .arg(
            Arg::new("port")
                .long("port")
                .num_args(1)
                .value_parser(clap::value_parser!(u16))
                .help("Listen port (overrides PORT)"),
        )
        .arg(
            Arg::new("version")
                .long("version")
                .help("Print version and exit")
                .action(ArgAction::SetTrue),
        )
}

pub fn init_logging(level: Option<&str>) {
    // Explicit level wins, then RUST_LOG, then info
    let filter = match level {
        Some(lvl) => lvl.to_string(),
        None => std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
    };
    env_logger::Builder::new().parse_filters(&filter).init();
}

/// Warning to log for a `.env` load. A missing file is silent; a file that
/// exists but cannot be read or parsed is not.
pub fn dotenv_warning(result: &Result<PathBuf, dotenv::Error>) -> Option<String> {
    match result {
        Ok(_) => None,
        Err(dotenv::Error::Io(e)) if e.kind() == ErrorKind::NotFound => None,
        Err(e) => Some(format!("Ignoring .env: {}", e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_dotenv_is_silent() {
        assert!(dotenv_warning(&Ok(PathBuf::from(".env"))).is_none());
        let missing = dotenv::Error::Io(std::io::Error::new(ErrorKind::NotFound, "no file"));
        assert!(dotenv_warning(&Err(missing)).is_none());
    }

    #[test]
    fn unreadable_or_malformed_dotenv_warns() {
        let denied = dotenv::Error::Io(std::io::Error::new(ErrorKind::PermissionDenied, "denied"));
        assert!(dotenv_warning(&Err(denied)).is_some());
        let bad = dotenv::Error::LineParse("NOT A LINE".to_string(), 0);
        let msg = dotenv_warning(&Err(bad)).unwrap();
        assert!(msg.starts_with("Ignoring .env"));
    }
}
