use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use hotswap_core::{BundleId, Platform};

mod commands;

use commands::list::OutputFormat;

#[derive(Parser)]
#[command(
    name = "hotswap",
    about = "hotswap: over-the-air bundle catalog and update server",
    version,
    propagate_version = true,
)]
struct Cli {
    /// Path to hotswap.toml
    #[arg(short, long, global = true, default_value = "hotswap.toml")]
    config: PathBuf,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a scaffold hotswap.toml
    Init {
        /// Default platform for commands that take --platform
        #[arg(short, long)]
        platform: Option<Platform>,
        /// Overwrite an existing config file
        #[arg(long)]
        force: bool,
    },
    /// List bundles, newest first
    List {
        #[arg(short, long)]
        platform: Option<Platform>,
        /// Only bundles whose target version admits this app version
        #[arg(short, long)]
        app_version: Option<String>,
        #[arg(short, long, value_enum, default_value = "text")]
        format: OutputFormat,
    },
    /// Publish a new bundle to the catalog
    Publish {
        #[arg(short, long)]
        platform: Option<Platform>,
        /// App versions this bundle may run on, e.g. "1.x.x" or ">=1.2.0 <2.0.0"
        #[arg(short, long)]
        target_version: String,
        /// Payload archive; its SHA-256 becomes the bundle's file hash
        #[arg(long)]
        file: Option<PathBuf>,
        /// Where clients download the payload from
        #[arg(long)]
        file_url: Option<String>,
        /// Ask clients to apply the bundle immediately
        #[arg(long)]
        force: bool,
        /// Publish without serving it yet
        #[arg(long)]
        disabled: bool,
        #[arg(short, long)]
        message: Option<String>,
        /// Git commit the bundle was built from
        #[arg(long)]
        commit: Option<String>,
    },
    /// Start serving a bundle
    Enable { id: BundleId },
    /// Stop serving a bundle (it stays in the catalog)
    Disable { id: BundleId },
    /// Toggle whether clients must apply a bundle immediately
    Force {
        id: BundleId,
        #[arg(value_enum)]
        state: Switch,
    },
    /// Resolve an update check locally and print the response
    Check {
        #[arg(short, long)]
        platform: Option<Platform>,
        #[arg(short, long)]
        app_version: String,
        /// Bundle the client currently runs (default: the embedded one)
        #[arg(short, long)]
        bundle_id: Option<BundleId>,
    },
    /// Run the HTTP API
    Serve {
        /// Port to listen on (overrides [server] port)
        #[arg(long)]
        port: Option<u16>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Switch {
    On,
    Off,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info,hotswap=debug"));
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    if cli.log_json {
        subscriber.json().init();
    } else {
        subscriber.init();
    }

    let config = cli.config.as_path();
    match cli.command {
        Commands::Init { platform, force } => commands::init::init(config, platform, force),
        Commands::List {
            platform,
            app_version,
            format,
        } => commands::list::list(config, platform, app_version.as_deref(), format),
        Commands::Publish {
            platform,
            target_version,
            file,
            file_url,
            force,
            disabled,
            message,
            commit,
        } => commands::publish::publish(
            config,
            commands::publish::PublishArgs {
                platform,
                target_version,
                file,
                file_url,
                force_update: force,
                enabled: !disabled,
                message,
                git_commit_hash: commit,
            },
        ),
        Commands::Enable { id } => commands::admin::set_enabled(config, &id, true),
        Commands::Disable { id } => commands::admin::set_enabled(config, &id, false),
        Commands::Force { id, state } => {
            commands::admin::set_force_update(config, &id, state == Switch::On)
        }
        Commands::Check {
            platform,
            app_version,
            bundle_id,
        } => commands::check::check(config, platform, &app_version, bundle_id),
        Commands::Serve { port } => commands::serve::serve(config, port).await,
    }
}
