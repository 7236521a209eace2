mod term_render;

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use console::{Key as TermKey, Term};
use petris::{Command, Frame, GameConfig, Key, Rotation, Runner, Session, StepResult};
use term_render::{AnsiTermStyle, GameScreen, PlainTermStyle, TermRender};

/// petris - falling blocks in the terminal
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to a JSON game config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Board width in cells
    #[arg(long)]
    width: Option<usize>,

    /// Board height in cells
    #[arg(long)]
    height: Option<usize>,

    /// Tick period in milliseconds
    #[arg(short, long)]
    tick_ms: Option<u64>,

    /// Seed for the piece generator
    #[arg(short, long)]
    seed: Option<u64>,

    /// Draw without ANSI colors
    #[arg(long)]
    plain: bool,
}

impl Args {
    fn game_config(&self) -> anyhow::Result<GameConfig> {
        let mut config = match &self.config {
            Some(path) => GameConfig::from_file(path)
                .with_context(|| format!("Failed to load config file {}", path.display()))?,
            None => GameConfig::default(),
        };
        if let Some(width) = self.width {
            config.width = width;
        }
        if let Some(height) = self.height {
            config.height = height;
        }
        if let Some(tick_ms) = self.tick_ms {
            config.tick_ms = tick_ms;
        }
        config.validate()?;
        Ok(config)
    }
}

fn map_key(key: TermKey) -> Option<Command> {
    match key {
        TermKey::ArrowLeft => Some(Command::Press(Key::Left)),
        TermKey::ArrowRight => Some(Command::Press(Key::Right)),
        TermKey::ArrowDown => Some(Command::Press(Key::Down)),
        TermKey::ArrowUp | TermKey::Char('z') | TermKey::Char('Z') => Some(Command::Press(Key::Rotate)),
        TermKey::Char('x') | TermKey::Char('X') => Some(Command::Rotate(Rotation::Clockwise)),
        TermKey::Enter | TermKey::Char('s') | TermKey::Char('S') => Some(Command::Start),
        TermKey::Escape => Some(Command::Stop),
        TermKey::Char('q') | TermKey::Char('Q') => Some(Command::Quit),
        _ => None,
    }
}

#[tokio::main(flavor = "multi_thread", worker_threads = 1)]
async fn main() -> anyhow::Result<()> {
    // Parse command line arguments
    let args = Args::parse();

    // Logs go to stderr, the board owns stdout
    tracing_subscriber::fmt().with_writer(std::io::stderr).init();

    let config = args.game_config()?;
    tracing::info!(?config, seed = ?args.seed, "starting petris");
    let session = match args.seed {
        Some(seed) => Session::with_seed(config, seed)?,
        None => Session::new(config)?,
    };
    let mut runner = Runner::new(session);

    // Spawn keyboard input task with separate term
    let keyboard_sender = runner.sender();
    let keyboard_task = tokio::task::spawn_blocking(move || {
        let input_term = Term::stdout();
        loop {
            let Ok(key) = input_term.read_key() else {
                let _ = keyboard_sender.send(Command::Quit);
                break;
            };
            let Some(command) = map_key(key) else {
                continue;
            };
            let quit = command == Command::Quit;
            if keyboard_sender.send(command).is_err() || quit {
                break;
            }
        }
    });

    let render_term = Term::stdout();
    render_term.hide_cursor()?;
    render_term.clear_screen()?;
    render(&render_term, &runner.session().frame(), args.plain)?;

    // Main step loop - applies commands and ticks, renders on change
    loop {
        match runner.step().await {
            StepResult::Stop => break,
            StepResult::Redraw(frame) => render(&render_term, &frame, args.plain)?,
            StepResult::Idle => {}
        }
    }

    keyboard_task.abort();
    let _ = keyboard_task.await;

    render_term.show_cursor()?;
    println!("Final score: {}", runner.session().score());
    Ok(())
}

fn render(term: &Term, frame: &Frame, plain: bool) -> anyhow::Result<()> {
    let screen = GameScreen::new(frame);
    let lines = if plain {
        screen.render(&PlainTermStyle)
    } else {
        screen.render(&AnsiTermStyle)
    };

    term.move_cursor_to(0, 0)?;
    for line in lines {
        term.write_line(&line)?;
    }
    term.flush()?;
    Ok(())
}
