use std::path::PathBuf;

use clap::Parser;

use leitner::Leitner;
use leitner::config::Config;

#[derive(Parser)]
#[command(name = "leitner", about = "Leitner-box flashcard reviewer")]
struct Cli {
    /// Path to the config file (default: <config dir>/leitner/config.toml)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Directory holding the card files (overrides the config file)
    #[arg(long)]
    cards_dir: Option<PathBuf>,

    /// Command used to edit cards (overrides the config file and $EDITOR)
    #[arg(long)]
    editor: Option<String>,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();
    let config_path = cli.config.unwrap_or_else(Config::default_path);
    let mut config = Config::load(&config_path)?;
    if let Some(dir) = cli.cards_dir {
        config.cards_dir = dir.to_string_lossy().into_owned();
    }
    if cli.editor.is_some() {
        config.editor = cli.editor;
    }
    log::debug!("cards directory: {}", config.cards_dir);

    let app = Leitner::new(&config.cards_path())?;
    leitner::cli::menu::run(&app, &config)?;

    Ok(())
}
