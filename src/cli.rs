use std::path::PathBuf;

mod lookup;
mod terminal;
mod validate;

use anyhow::Context;
use clap::ArgAction;
use lookup::Lookup;
use tracing::instrument;
use validate::Validate;
use ytj::Config;

#[derive(Debug, clap::Parser)]
#[command(version, about)]
pub struct Cli {
    /// Verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// Path to a TOML configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Registry endpoint, overriding the configuration file
    #[arg(long, env = "YTJ_BASE_URL", global = true)]
    base_url: Option<String>,

    #[command(subcommand)]
    command: Command,
}

impl Cli {
    pub fn run(self) -> anyhow::Result<()> {
        Self::setup_logging(self.verbose);

        let config = self.load_config()?;
        self.command.run(&config)
    }

    fn load_config(&self) -> anyhow::Result<Config> {
        let mut config = match &self.config {
            Some(path) => Config::load(path)
                .with_context(|| format!("failed to load {}", path.display()))?,
            None => Config::default(),
        };

        if let Some(base_url) = &self.base_url {
            tracing::debug!("Using registry endpoint {base_url}");
            config.set_base_url(base_url.clone());
        }

        Ok(config)
    }

    fn setup_logging(verbosity: u8) {
        use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

        let level = match verbosity {
            0 => tracing::Level::WARN,
            1 => tracing::Level::INFO,
            2 => tracing::Level::DEBUG,
            _ => tracing::Level::TRACE,
        };

        let filter = tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into());

        let fmt_layer = tracing_subscriber::fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(false)
            .with_thread_names(false)
            .with_line_number(false);

        tracing_subscriber::registry()
            .with(filter)
            .with(fmt_layer)
            .init();
    }
}

#[derive(Debug, clap::Parser)]
pub enum Command {
    /// Look up a business from the registry
    Lookup(Lookup),

    /// Validate business ids without contacting the registry
    ///
    /// Prints the normalized form of each valid id.
    Validate(Validate),

    /// Show the effective configuration
    Config,
}

impl Command {
    fn run(self, config: &Config) -> anyhow::Result<()> {
        match self {
            Self::Lookup(command) => command.run(config)?,
            Self::Validate(command) => command.run()?,
            Self::Config => show_config(config)?,
        }
        Ok(())
    }
}

#[instrument(level = "debug")]
fn show_config(config: &Config) -> anyhow::Result<()> {
    print!("{}", toml::to_string_pretty(config)?);
    Ok(())
}
