mod app;
mod cli;
mod core;
mod screens;
mod utils;

use anyhow::Result;
use clap::Parser;

use app::App;
use cli::{Cli, Commands, ConfigCommands};
use crate::core::{ram_hardware_description, MemorySampler, Settings, SettingsStore};
use utils::LOG_FILE_NAME;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let store = match cli.config {
        Some(path) => SettingsStore::new(path),
        None => SettingsStore::new(SettingsStore::default_path()),
    };

    match cli.command {
        None => {
            // No command - run the interactive widget
            init_logging(&store);
            let mut app = App::new(store);
            app.run().await?;
        }
        Some(Commands::Status) => {
            handle_status();
        }
        Some(Commands::Hardware) => {
            handle_hardware();
        }
        Some(Commands::Config { command }) => {
            handle_config(command, &store)?;
        }
    }

    Ok(())
}

/// Route the log facade to a file beside the settings file. stderr belongs
/// to the TUI while it owns the terminal. Logging is itself best-effort:
/// a failure to set it up must not keep the widget from starting.
fn init_logging(store: &SettingsStore) {
    use log4rs::append::file::FileAppender;
    use log4rs::config::{Appender, Config, Root};
    use log4rs::encode::pattern::PatternEncoder;

    let log_path = store.path().with_file_name(LOG_FILE_NAME);

    let Ok(appender) = FileAppender::builder()
        .encoder(Box::new(PatternEncoder::new(
            "{d(%Y-%m-%d %H:%M:%S)} {l} {t} - {m}{n}",
        )))
        .build(log_path)
    else {
        return;
    };

    let Ok(config) = Config::builder()
        .appender(Appender::builder().build("file", Box::new(appender)))
        .build(Root::builder().appender("file").build(log::LevelFilter::Info))
    else {
        return;
    };

    let _ = log4rs::init_config(config);
}

fn handle_status() {
    let sampler = MemorySampler::new();
    let ram = sampler.ram();
    let swap = sampler.swap();

    println!(
        "RAM:  {:.2} GB / {:.2} GB ({:.1}%)",
        ram.used_gb(),
        ram.total_gb(),
        ram.percent()
    );
    println!(
        "Swap: {:.2} GB / {:.2} GB ({:.1}%)",
        swap.used_gb(),
        swap.total_gb(),
        swap.percent()
    );
}

fn handle_hardware() {
    let sampler = MemorySampler::new();
    println!("{}", ram_hardware_description(sampler.ram().total_bytes));
}

fn handle_config(command: ConfigCommands, store: &SettingsStore) -> Result<()> {
    match command {
        ConfigCommands::View => {
            let settings = store.load();
            println!("{}", serde_json::to_string_pretty(&settings)?);
        }
        ConfigCommands::Path => {
            println!("{}", store.path().display());
        }
        ConfigCommands::Reset => {
            store.save_all(&Settings::default());
            println!("Settings reset to defaults");
        }
    }

    Ok(())
}
