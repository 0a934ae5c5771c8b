use std::io;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};

use power_four::ai::Difficulty;
use power_four::config::AppConfig;
use power_four::logging;
use power_four::session::{GameSession, Opponent, SharedSession};
use power_four::ui::App;

/// Play four-in-a-row in the terminal, against a friend or the computer.
#[derive(Parser)]
#[command(name = "power-four", about = "Four-in-a-row in the terminal")]
struct Cli {
    /// Path to TOML configuration file
    #[arg(long, default_value = "power_four.toml")]
    config: PathBuf,

    /// Two human players on one keyboard instead of playing the computer
    #[arg(long)]
    human: bool,

    /// Computer strength: easy, medium or hard (unknown names fall back to medium)
    #[arg(long)]
    difficulty: Option<String>,

    /// Name of the first (Red) player
    #[arg(long, default_value = "")]
    player_one: String,

    /// Name of the second (Yellow) player
    #[arg(long, default_value = "")]
    player_two: String,

    /// Seed for the computer's random choices
    #[arg(long)]
    seed: Option<u64>,

    /// Print the default configuration as TOML and exit
    #[arg(long)]
    print_config: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.print_config {
        print!("{}", AppConfig::default_toml()?);
        return Ok(());
    }

    let config = AppConfig::load_or_default(&cli.config)
        .with_context(|| format!("loading config from {}", cli.config.display()))?;
    logging::init(&config.logging);

    let opponent = if cli.human {
        Opponent::Human
    } else {
        let difficulty = match cli.difficulty.as_deref() {
            Some(name) => Difficulty::parse_or_default(name),
            None => config.ai.difficulty,
        };
        Opponent::Computer(difficulty)
    };

    let session = GameSession::start(
        &config.players,
        &config.ai,
        (cli.player_one.as_str(), cli.player_two.as_str()),
        opponent,
        cli.seed,
    );
    let mut app = App::new(SharedSession::new(session), config.ui.clone())
        .context("opening session")?;

    run(&mut app).context("terminal UI failed")
}

fn run(app: &mut App) -> io::Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = app.run(&mut terminal);

    // Restore terminal, even on error
    let _ = disable_raw_mode();
    let _ = execute!(terminal.backend_mut(), LeaveAlternateScreen);
    let _ = terminal.show_cursor();

    res
}
