//! Terminal pathfinding visualizer.
//!
//! Draws a [`Session`] with crossterm and feeds it key presses, mouse
//! edits and replay ticks from a [`ThreadScheduler`].

mod app;
mod input;
mod render;

use std::io;
use std::time::Duration;

use clap::Parser;
use crossterm::{
    cursor, event, execute,
    event::Event,
    terminal::{self, ClearType},
};
use rand::SeedableRng;
use rand::rngs::SmallRng;

use pathviz_playback::{Session, SessionConfig, Speed, ThreadScheduler};
use pathviz_search::AlgorithmId;

use app::App;

#[derive(Parser, Debug)]
#[command(name = "pathviz", version, about = "Watch grid search algorithms find a path")]
struct Cli {
    #[arg(long, default_value_t = 20)]
    rows: i32,
    #[arg(long, default_value_t = 40)]
    cols: i32,
    /// bfs, dfs, dijkstra, astar, greedy or bidirectional
    #[arg(long, short, default_value_t = AlgorithmId::Bfs)]
    algorithm: AlgorithmId,
    /// Replay speed, 1 to 1000.
    #[arg(long, short, default_value_t = 50)]
    speed: u32,
    /// Percentage of cells turned into walls by `g` and at startup.
    #[arg(long, default_value_t = pathviz_core::DEFAULT_WALL_DENSITY)]
    density: u8,
    /// Generate walls on startup.
    #[arg(long)]
    walls: bool,
    /// Seed for wall generation.
    #[arg(long)]
    seed: Option<u64>,
}

impl Cli {
    fn session_config(&self) -> SessionConfig {
        SessionConfig {
            rows: self.rows,
            cols: self.cols,
            algorithm: self.algorithm,
            speed: Speed::new(self.speed),
            wall_density: self.density,
            ..SessionConfig::default()
        }
    }
}

/// Raw mode and the alternate screen, restored on drop.
struct Terminal;

impl Terminal {
    fn enter() -> io::Result<Self> {
        terminal::enable_raw_mode()?;
        execute!(
            io::stdout(),
            terminal::EnterAlternateScreen,
            cursor::Hide,
            terminal::Clear(ClearType::All),
            event::EnableMouseCapture
        )?;
        Ok(Self)
    }
}

impl Drop for Terminal {
    fn drop(&mut self) {
        let _ = execute!(
            io::stdout(),
            event::DisableMouseCapture,
            cursor::Show,
            terminal::LeaveAlternateScreen
        );
        let _ = terminal::disable_raw_mode();
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let (scheduler, ticks) = ThreadScheduler::new();
    let session = Session::new(cli.session_config(), scheduler)?;
    let rng = match cli.seed {
        Some(seed) => SmallRng::seed_from_u64(seed),
        None => rand::make_rng::<SmallRng>(),
    };
    let mut app = App::new(session, rng);
    if cli.walls {
        app.generate_walls();
    }

    let _terminal = Terminal::enter()?;
    let mut out = io::stdout();
    let mut dirty = true;
    while !app.should_quit() {
        while let Ok(tick) = ticks.try_recv() {
            dirty |= app.tick(tick);
        }
        if dirty {
            app.draw(&mut out)?;
            dirty = false;
        }
        if !event::poll(Duration::from_millis(16))? {
            continue;
        }
        match event::read()? {
            Event::Key(key) => {
                if let Some(action) = input::action_for(key) {
                    app.apply(action);
                    dirty = true;
                }
            }
            Event::Mouse(me) => {
                if let Some(gesture) = input::gesture_for(me.kind) {
                    dirty |= app.mouse(gesture, me.column, me.row);
                }
            }
            Event::Resize(..) => dirty = true,
            _ => {}
        }
    }
    Ok(())
}
