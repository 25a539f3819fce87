use open_stack_backend::config::Config;
use log::warn;
use open_stack_backend::{cli, server};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cmd = cli::build_cli();
    let matches = cmd.get_matches();
    let log_level = matches.get_one::<String>("log-level").cloned();
    let port_override = matches.get_one::<u16>("port").copied();
    let version_flag = matches.get_flag("version");

    if version_flag {
        println!("open-stack-backend {}", env!("CARGO_PKG_VERSION"));
        return Ok(());
    }

    // Loaded before logging so that RUST_LOG may come from the file.
    let dotenv_result = dotenv::dotenv();
    cli::init_logging(log_level.as_deref());
    if let Some(msg) = cli::dotenv_warning(&dotenv_result) {
        warn!("{}", msg);
    }

    let mut cfg = Config::from_env().map_err(anyhow::Error::msg)?;
    if let Some(port) = port_override {
        cfg.port = port;
    }
    server::run(cfg).await
}
