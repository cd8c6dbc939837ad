//! `cuboid` binary: runs the HTTP service or a linkage probe.

use anyhow::{anyhow, Context};
use clap::{Parser, Subcommand};
use cuboid_core::db::{open_db, open_db_in_memory};
use cuboid_http::AppState;
use log::{info, warn};
use std::path::PathBuf;
use tokio::net::TcpListener;

#[derive(Debug, Parser)]
#[command(name = "cuboid", version, about = "Bag capacity-checked cuboid storage")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Start the REST API.
    Serve(ServeArgs),
    /// Print core ping and version.
    Ping,
}

#[derive(Debug, clap::Args)]
struct ServeArgs {
    /// Listen address.
    #[arg(long, env = "CUBOID_BIND_ADDR", default_value = "127.0.0.1:3000")]
    bind: String,

    /// SQLite file; in-memory when omitted.
    #[arg(long, env = "CUBOID_DB_PATH")]
    db_path: Option<PathBuf>,

    /// trace, debug, info, warn or error.
    #[arg(long, env = "CUBOID_LOG_LEVEL", default_value = cuboid_core::default_log_level())]
    log_level: String,

    /// Directory for rotating log files; stderr when omitted.
    #[arg(long, env = "CUBOID_LOG_DIR")]
    log_dir: Option<String>,
}

fn main() -> anyhow::Result<()> {
    match Cli::parse().command {
        Command::Ping => {
            println!("cuboid_core ping={}", cuboid_core::ping());
            println!("cuboid_core version={}", cuboid_core::core_version());
            Ok(())
        }
        Command::Serve(args) => serve(args),
    }
}

fn serve(args: ServeArgs) -> anyhow::Result<()> {
    cuboid_core::init_logging(&args.log_level, args.log_dir.as_deref())
        .map_err(|err| anyhow!("logging init failed: {err}"))?;

    let conn = match &args.db_path {
        Some(path) => {
            open_db(path).with_context(|| format!("opening database {}", path.display()))?
        }
        None => {
            warn!("event=db_open module=cli status=ok mode=memory note=data_not_persisted");
            open_db_in_memory().context("opening in-memory database")?
        }
    };

    let runtime = tokio::runtime::Runtime::new().context("starting tokio runtime")?;
    runtime.block_on(async move {
        let listener = TcpListener::bind(&args.bind)
            .await
            .with_context(|| format!("binding {}", args.bind))?;
        info!(
            "event=serve module=cli status=start version={} bind={}",
            cuboid_core::core_version(),
            args.bind
        );
        cuboid_http::serve(listener, AppState::new(conn))
            .await
            .context("http server failed")
    })
}

#[cfg(test)]
mod tests {
    use super::{Cli, Command};
    use clap::Parser;

    #[test]
    fn serve_defaults() {
        let cli = Cli::try_parse_from(["cuboid", "serve"]).unwrap();
        let Command::Serve(args) = cli.command else {
            panic!("expected serve");
        };
        if std::env::var_os("CUBOID_BIND_ADDR").is_none() {
            assert_eq!(args.bind, "127.0.0.1:3000");
        }
        if std::env::var_os("CUBOID_DB_PATH").is_none() {
            assert!(args.db_path.is_none());
        }
    }

    #[test]
    fn serve_flags_override() {
        let cli = Cli::try_parse_from([
            "cuboid",
            "serve",
            "--bind",
            "0.0.0.0:8080",
            "--db-path",
            "/tmp/cuboid.sqlite3",
            "--log-level",
            "debug",
        ])
        .unwrap();
        let Command::Serve(args) = cli.command else {
            panic!("expected serve");
        };
        assert_eq!(args.bind, "0.0.0.0:8080");
        assert_eq!(args.log_level, "debug");
        assert_eq!(
            args.db_path.as_deref(),
            Some(std::path::Path::new("/tmp/cuboid.sqlite3"))
        );
    }

    #[test]
    fn ping_subcommand_parses() {
        let cli = Cli::try_parse_from(["cuboid", "ping"]).unwrap();
        assert!(matches!(cli.command, Command::Ping));
    }
}
