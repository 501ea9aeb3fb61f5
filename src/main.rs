//! Subnet Client - desktop chat client for Subnet BBS servers
//!
//! Opens the chat window. Host, port and nickname are entered in the
//! connect dialog; a configuration file can pre-fill them.

mod app;

use std::env;
use std::path::PathBuf;
use std::process;

use anyhow::anyhow;
use eframe::egui;
use tracing::{debug, error, info, warn};

use subnet_client::config::loader::{self, ConfigLoader, CONFIG_ENV_VAR};
use subnet_client::config::RuntimeConfig;
use subnet_client::handle_startup_error;

use app::SubnetApp;

/// Environment variable enabling debug logging
const DEBUG_ENV_VAR: &str = "SUBNET_CLIENT_DEBUG";

/// Command line options
#[derive(Debug, Default)]
struct AppArgs {
    /// Configuration file path
    config_path: Option<PathBuf>,
    /// Enable debug logging
    debug: bool,
}

impl AppArgs {
    /// Parse command line arguments
    fn parse_from(args: &[String]) -> Result<Self, String> {
        let mut app_args = AppArgs::default();

        let mut i = 1;
        while i < args.len() {
            match args[i].as_str() {
                "--config" | "-c" => {
                    let path = args.get(i + 1).ok_or("Missing config file path")?;
                    app_args.config_path = Some(PathBuf::from(path));
                    i += 1;
                }
                "--debug" | "-d" => {
                    app_args.debug = true;
                }
                "--help" | "-h" => {
                    print_help();
                    process::exit(0);
                }
                "--version" | "-V" => {
                    println!("{} v{}", subnet_client::NAME, subnet_client::VERSION);
                    process::exit(0);
                }
                arg => {
                    return Err(format!("Unknown option: {}", arg));
                }
            }
            i += 1;
        }

        Ok(app_args)
    }
}

/// Help text for `--help`
fn help_text() -> String {
    let mut help = String::new();
    help.push_str(&format!("{} - {}\n\n", subnet_client::NAME, subnet_client::DESCRIPTION));
    help.push_str("USAGE:\n");
    help.push_str("    subnet-client [OPTIONS]\n\n");
    help.push_str("OPTIONS:\n");
    help.push_str("    -c, --config <PATH>    Path to configuration file\n");
    help.push_str("    -d, --debug            Enable debug logging\n");
    help.push_str("    -h, --help             Print this help message\n");
    help.push_str("    -V, --version          Print version information\n\n");
    help.push_str("CONFIGURATION:\n");
    help.push_str("    No file is required. The connect dialog opens at startup and a\n");
    help.push_str("    configuration file only pre-fills its host, port and nickname\n");
    help.push_str("    and sets window preferences. The first existing file is used:\n");
    help.push_str("    1. Path specified with --config\n");
    help.push_str(&format!("    2. ${}\n", CONFIG_ENV_VAR));
    help.push_str("    3. <config dir>/subnet-client/config.toml\n");
    help.push_str("    4. ./subnet-client.toml\n\n");
    help.push_str("ENVIRONMENT:\n");
    help.push_str(&format!("    {}  Path to configuration file\n", CONFIG_ENV_VAR));
    help.push_str(&format!("    {}   Enable debug logging (1 or true)\n", DEBUG_ENV_VAR));
    help.push_str("    RUST_LOG              Set logging level (error, warn, info, debug, trace)\n");
    help
}

/// Print help information
fn print_help() {
    print!("{}", help_text());
}

fn main() -> anyhow::Result<()> {
    let raw_args: Vec<String> = env::args().collect();
    let args = AppArgs::parse_from(&raw_args).unwrap_or_else(|e| {
        eprintln!("{}", e);
        print_help();
        process::exit(1);
    });

    init_logging(&args);
    info!("Starting {} v{}", subnet_client::NAME, subnet_client::VERSION);

    let runtime_config = load_configuration(&args);
    let native_options = create_native_options(&runtime_config);

    eframe::run_native(
        "Subnet Client",
        native_options,
        Box::new(move |cc| Ok(Box::new(SubnetApp::new(cc, runtime_config)))),
    )
    .map_err(|e| {
        error!("Application failed: {}", e);
        anyhow!("failed to run the chat window: {}", e)
    })?;

    info!("Subnet client shutdown complete");
    Ok(())
}

/// Initialize logging from `--debug`, `SUBNET_CLIENT_DEBUG` and `RUST_LOG`
fn init_logging(args: &AppArgs) {
    let debug_env = env::var(DEBUG_ENV_VAR)
        .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
        .unwrap_or(false);
    let log_level = if args.debug || debug_env { "debug" } else { "info" };

    let env_filter = env::var("RUST_LOG").unwrap_or_else(|_| log_level.to_string());
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::new(env_filter))
        .with_target(false)
        .with_thread_names(true)
        .compact()
        .init();
}

/// Load configuration from `--config` or the search paths
fn load_configuration(args: &AppArgs) -> RuntimeConfig {
    match &args.config_path {
        Some(path) => match ConfigLoader::load_from_file(path) {
            Ok(config) => {
                info!("Configuration loaded from: {}", path.display());
                RuntimeConfig::new(config, Some(path.clone()))
            }
            Err(e) => {
                eprintln!("{}", handle_startup_error(&e));
                warn!("Falling back to default configuration");
                RuntimeConfig::default()
            }
        },
        None => loader::load_or_default(),
    }
}

/// Create native options for the application window
fn create_native_options(runtime_config: &RuntimeConfig) -> eframe::NativeOptions {
    let ui = &runtime_config.config().ui;
    debug!("Window size {}x{}", ui.window_width, ui.window_height);

    eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("SUBNET CLIENT")
            .with_app_id("subnet-client")
            .with_inner_size([ui.window_width, ui.window_height])
            .with_min_inner_size([400.0, 300.0]),
        ..Default::default()
    }
}
