use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use mlua::{Value, Variadic};
use tracing::info;

use prelua::{loader, logging, ScriptEngine, ScriptingConfig};

#[derive(Parser)]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Directory to load .lua scripts from (overrides the config file)
    #[arg(short = 'd', long)]
    script_dir: Option<PathBuf>,

    /// Path to the config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Event to activate after the entry script has run
    #[arg(short, long)]
    event: Option<String>,

    /// Argument passed to the activated event or called function (repeatable)
    #[arg(long = "arg", value_name = "VALUE")]
    args: Vec<String>,

    /// Script function to call by name after the entry script has run
    #[arg(long, value_name = "NAME")]
    call: Option<String>,

    /// Also log to a file in the data directory
    #[arg(long)]
    log_file: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let _guard =
        logging::init_logging("cli", cli.log_file).context("Failed to initialize logging")?;

    // Load config from the given path, the well-known path, or defaults
    let config = match &cli.config {
        Some(path) => ScriptingConfig::load(path)
            .with_context(|| format!("Failed to load config from {}", path.display()))?,
        None => {
            let path = ScriptingConfig::default_path();
            if path.exists() {
                ScriptingConfig::load(&path)
                    .with_context(|| format!("Failed to load config from {}", path.display()))?
            } else {
                ScriptingConfig::default()
            }
        }
    };

    if !config.enabled {
        info!("Scripting is disabled in config, nothing to do");
        return Ok(());
    }

    let script_dir = cli
        .script_dir
        .clone()
        .unwrap_or_else(|| config.script_dir());
    let scripts = loader::load_script_dir(&script_dir, &config.config);

    let engine = ScriptEngine::new(scripts).context("Failed to start script engine")?;

    if let Some(event) = &cli.event {
        let results = engine
            .emit(event, Variadic::from_iter(cli.args.iter().cloned()))
            .with_context(|| format!("Failed to activate event '{event}'"))?;
        for (i, value) in results.iter().enumerate() {
            println!("[{}] {}", i + 1, display_value(value));
        }
    }

    if let Some(name) = &cli.call {
        let result = engine
            .call_function(name, Variadic::from_iter(cli.args.iter().cloned()))
            .with_context(|| format!("Failed to call script function '{name}'"))?;
        println!("{}", display_value(&result));
    }

    Ok(())
}

/// Render a lua value for terminal output.
fn display_value(value: &Value) -> String {
    match value {
        Value::Nil => "nil".to_owned(),
        Value::Boolean(b) => b.to_string(),
        Value::Integer(i) => i.to_string(),
        Value::Number(n) => n.to_string(),
        Value::String(s) => s.to_string_lossy().to_string(),
        other => format!("<{}>", other.type_name()),
    }
}
