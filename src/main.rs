use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};

use connect_four_engine::ai::{Difficulty, MoveSelector};
use connect_four_engine::config::AppConfig;
use connect_four_engine::game::{GameOutcome, GameState, MoveError, Player};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Mode {
    /// Two humans share the terminal
    Pvp,
    /// Play against the bot
    Bot,
}

/// Play Connect Four in the terminal.
#[derive(Parser)]
#[command(name = "connect-four", about = "Play Connect Four against a friend or the bot")]
struct Cli {
    #[arg(long, value_enum, default_value = "bot")]
    mode: Mode,

    /// Bot difficulty: 1 random, 2 win/block/center, 3 search
    #[arg(long, value_parser = clap::value_parser!(u8).range(1..=3))]
    difficulty: Option<u8>,

    /// Path to TOML configuration file
    #[arg(long, default_value = "connect4.toml")]
    config: PathBuf,

    /// Opening book file (overrides the config)
    #[arg(long)]
    book: Option<PathBuf>,

    /// Search budget per bot move, in milliseconds
    #[arg(long)]
    time_budget_ms: Option<u64>,

    /// Let the bot make the first move
    #[arg(long)]
    bot_first: bool,
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let mut config = AppConfig::load_or_default(&cli.config)
        .with_context(|| format!("loading config from {}", cli.config.display()))?;

    // Apply CLI overrides
    if let Some(difficulty) = cli.difficulty {
        config.difficulty = difficulty;
    }
    if let Some(book) = cli.book {
        config.book.path = Some(book);
    }
    if let Some(budget) = cli.time_budget_ms {
        config.search.time_budget_ms = budget;
    }
    config.validate().context("invalid settings")?;

    let bot = match cli.mode {
        Mode::Pvp => None,
        Mode::Bot if cli.bot_first => Some(Player::Red),
        Mode::Bot => Some(Player::Yellow),
    };
    let mut selector = MoveSelector::from_config(&config);
    play(&mut selector, bot, config.difficulty())
}

fn play(selector: &mut MoveSelector, bot: Option<Player>, difficulty: Difficulty) -> Result<()> {
    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();
    let mut state = GameState::initial();

    loop {
        println!("\n{}", state.board());

        if let Some(outcome) = state.outcome() {
            match outcome {
                GameOutcome::Winner(player) if Some(player) == bot => println!("{} (bot) wins!", player.name()),
                GameOutcome::Winner(player) => println!("{} wins!", player.name()),
                GameOutcome::Draw => println!("It's a draw!"),
            }
            return Ok(());
        }

        let player = state.current_player();
        if Some(player) == bot {
            let Some(col) = selector.choose_column(state.board(), player, difficulty) else {
                println!("It's a draw!");
                return Ok(());
            };
            println!("Bot {} chooses column {}", player.name(), col + 1);
            state
                .apply_move_mut(col)
                .context("bot chose an illegal column")?;
            continue;
        }

        print!("{} - choose column (1-7): ", player.name());
        io::stdout().flush()?;
        let Some(line) = lines.next() else {
            println!("\nInput closed, exiting.");
            return Ok(());
        };
        let col = match line?.trim().parse::<usize>() {
            Ok(n) if n >= 1 => n - 1,
            _ => {
                println!("Please enter a number from 1 to 7.");
                continue;
            }
        };

        match state.apply_move_mut(col) {
            Ok(_) => {}
            Err(e @ (MoveError::ColumnFull | MoveError::InvalidColumn)) => {
                let open: Vec<String> = state.legal_actions().iter().map(|c| (c + 1).to_string()).collect();
                println!("Invalid move ({e}), open columns: {}", open.join(" "));
            }
            Err(MoveError::GameOver) => return Ok(()),
        }
    }
}
