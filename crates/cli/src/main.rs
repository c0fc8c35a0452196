mod config_commands;

use std::path::PathBuf;

use {
    clap::{Parser, Subcommand},
    quill_config::load_or_discover,
    quill_graphql::{SchemaOptions, Stores, build_mock_schema, build_schema},
    tracing::{info, warn},
    tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt},
};

#[derive(Parser)]
#[command(name = "quill", about = "GraphQL demo server over sample blog data", version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Default tracing filter when RUST_LOG is unset.
    #[arg(long, global = true, default_value = "info")]
    log_level: String,

    /// Emit JSON log lines.
    #[arg(long, global = true, default_value_t = false)]
    json_logs: bool,

    /// Config file (overrides discovery in ./ and ~/.config/quill/).
    #[arg(long, global = true, env = "QUILL_CONFIG")]
    config: Option<PathBuf>,

    /// Listen address; wins over `server.bind`.
    #[arg(long, global = true)]
    bind: Option<String>,
    /// Listen port; wins over `server.port`.
    #[arg(long, global = true)]
    port: Option<u16>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP server. This is the default.
    Serve,
    /// Print the schema SDL.
    Schema {
        /// Print the mock schema instead.
        #[arg(long)]
        mock: bool,
    },
    /// Check the config file for mistakes.
    CheckConfig {
        /// Include info diagnostics.
        #[arg(long)]
        verbose: bool,
    },
}

fn init_telemetry(cli: &Cli) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cli.log_level));

    let registry = tracing_subscriber::registry().with(filter);

    if cli.json_logs {
        registry
            .with(fmt::layer().json().with_target(true).with_thread_ids(false))
            .init();
    } else {
        registry
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_thread_ids(false)
                    .with_ansi(true),
            )
            .init();
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    init_telemetry(&cli);

    let Cli {
        command,
        config: config_path,
        bind,
        port,
        ..
    } = cli;

    match command {
        None | Some(Commands::Serve) => {
            info!(version = env!("CARGO_PKG_VERSION"), "quill starting");
            let mut config = load_or_discover(config_path.as_deref())?;

            // CLI args override config values
            if let Some(bind) = bind {
                config.server.bind = bind;
            }
            if let Some(port) = port {
                config.server.port = port;
            }
            if !config.graphql.enabled {
                warn!("graphql is disabled; /graphql will answer 503");
            }

            quill_gateway::start_server(&config).await
        },
        Some(Commands::Schema { mock }) => {
            let config = load_or_discover(config_path.as_deref())?;
            let options = SchemaOptions {
                date_format: config.graphql.date_format,
            };
            let sdl = if mock {
                build_mock_schema(config.mocks, options).sdl()
            } else {
                build_schema(Stores::empty(), options)?.sdl()
            };
            println!("{sdl}");
            Ok(())
        },
        Some(Commands::CheckConfig { verbose }) => {
            config_commands::check(config_path.as_deref(), verbose)
        },
    }
}
