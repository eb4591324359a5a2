//! Command line front-end: inspect, toggle, or watch the persisted theme.

use std::path::{Path, PathBuf};
use std::thread;
use std::time::Duration;

use anyhow::Context;
use clap::{Parser, Subcommand};
use console::style;
use theme_switch::{FileStore, OsSignal, Theme, ThemeConfig, ThemeResolver};

const APP_NAME: &str = "theme-switch";

#[derive(Parser, Debug)]
#[command(name = APP_NAME, version, about = "Resolve and persist a light/dark theme preference")]
struct Cli {
    /// Preference file (defaults to the per-user config directory)
    #[arg(long, global = true, value_name = "PATH")]
    store: Option<PathBuf>,

    /// JSON resolver configuration
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the resolved theme (default)
    Show,
    /// Flip the theme and remember the choice
    Toggle,
    /// Choose a theme explicitly
    Set {
        /// light or dark
        theme: Theme,
    },
    /// Follow OS color scheme changes until interrupted
    Watch {
        /// Polling interval in milliseconds
        #[arg(long, default_value_t = 1000)]
        interval_ms: u64,
    },
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => load_config(path)?,
        None => ThemeConfig::default(),
    };
    let store_path = match cli.store {
        Some(path) => path,
        None => FileStore::default_path(APP_NAME)
            .context("no per-user config directory on this platform; pass --store")?,
    };
    log::debug!("using preference file {}", store_path.display());

    let signal = OsSignal::new();
    let resolver = ThemeResolver::builder()
        .config(config)
        .store(FileStore::new(store_path))
        .signal(signal.clone())
        .build();

    match cli.command.unwrap_or(Command::Show) {
        Command::Show => print_state(&resolver),
        Command::Toggle => {
            resolver.toggle();
            print_state(&resolver);
        }
        Command::Set { theme } => {
            resolver.set_theme(theme);
            print_state(&resolver);
        }
        Command::Watch { interval_ms } => watch(&resolver, &signal, interval_ms),
    }
    Ok(())
}

fn load_config(path: &Path) -> anyhow::Result<ThemeConfig> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("reading config {}", path.display()))?;
    serde_json::from_str(&content).with_context(|| format!("parsing config {}", path.display()))
}

fn styled_theme(theme: Theme) -> console::StyledObject<Theme> {
    match theme {
        Theme::Light => style(theme).yellow().bold(),
        Theme::Dark => style(theme).blue().bold(),
    }
}

fn print_state(resolver: &ThemeResolver) {
    let origin = if resolver.is_overridden() {
        style("user choice").green()
    } else {
        style("following system").dim()
    };
    println!("{} ({})", styled_theme(resolver.theme()), origin);
}

fn watch(resolver: &ThemeResolver, signal: &OsSignal, interval_ms: u64) -> ! {
    print_state(resolver);
    if !resolver.is_following_environment() {
        println!(
            "{}",
            style("a stored choice is in effect; system changes will be ignored").dim()
        );
    }

    let _printer = resolver.subscribe(|theme| println!("-> {}", styled_theme(theme)));
    let interval = Duration::from_millis(interval_ms.max(1));
    loop {
        thread::sleep(interval);
        signal.poll();
    }
}
