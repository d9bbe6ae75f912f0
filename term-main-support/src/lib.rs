#![deny(clippy::all)]
#![forbid(unsafe_code)]

use crossterm::cursor::{Hide, MoveTo, Show};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::style::Print;
use crossterm::terminal::{
    self, disable_raw_mode, enable_raw_mode, Clear, ClearType, EnterAlternateScreen,
    LeaveAlternateScreen,
};
use crossterm::{execute, queue};
use life_grid::{GridError, World};
use log::{error, info};
use std::io::{self, Stdout, Write};
use std::time::{Duration, Instant};

const TIME_STEP_MILLIS: u64 = 100;

#[derive(Clone, Debug)]
pub struct AnimationConfig {
    pub time_step: Duration,
    /// Stop after this many generations even if the world is still changing.
    pub max_generations: Option<u64>,
}

impl Default for AnimationConfig {
    fn default() -> Self {
        Self {
            time_step: Duration::from_millis(TIME_STEP_MILLIS),
            max_generations: None,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StopReason {
    Stable,
    Interrupted,
    GenerationLimit,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Outcome {
    pub reason: StopReason,
    pub generations: u64,
}

#[derive(Debug, thiserror::Error)]
pub enum AnimateError {
    #[error("Terminal I/O failed: {0}")]
    Io(#[from] io::Error),
    #[error(transparent)]
    Grid(#[from] GridError),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TerminalSize {
    pub width: u16,
    pub height: u16,
}

pub trait Screen {
    fn size(&self) -> io::Result<TerminalSize>;
    fn draw(&mut self, text: &str, status: &str) -> io::Result<()>;
    /// Blocks for up to `timeout`. Returns true as soon as the user asks to stop.
    fn wait_for_interrupt(&mut self, timeout: Duration) -> io::Result<bool>;
}

pub fn animate<W, F>(config: &AnimationConfig, build_world: F) -> Result<Outcome, AnimateError>
where
    W: World,
    F: FnOnce(TerminalSize) -> Result<W, GridError>,
{
    let mut screen = TerminalScreen::open()?;
    let mut world = build_world(screen.size()?)?;
    run(&mut world, &mut screen, config)
}

/// Draws the world, then steps and redraws it every time step until it stops
/// changing, the user interrupts, or the generation limit is reached.
pub fn run<W, S>(
    world: &mut W,
    screen: &mut S,
    config: &AnimationConfig,
) -> Result<Outcome, AnimateError>
where
    W: World,
    S: Screen,
{
    info!(
        "Animating {}x{} world with {} live cells",
        world.width(),
        world.height(),
        world.live_count()
    );
    draw(world, screen)?;

    let reason = loop {
        if config
            .max_generations
            .is_some_and(|max| world.generation() >= max)
        {
            break StopReason::GenerationLimit;
        }
        if screen.wait_for_interrupt(config.time_step)? {
            break StopReason::Interrupted;
        }

        let changed = world.update();
        draw(world, screen)?;
        if !changed {
            break StopReason::Stable;
        }
    };

    info!("Stopped after {} generations: {:?}", world.generation(), reason);
    Ok(Outcome {
        reason,
        generations: world.generation(),
    })
}

fn draw<W: World, S: Screen>(world: &W, screen: &mut S) -> io::Result<()> {
    let status = format!(
        "generation {}  live cells {}  (q to quit)",
        world.generation(),
        world.live_count()
    );
    screen.draw(&world.to_text(), &status)
}

/// The real terminal, in raw mode on the alternate screen until dropped.
pub struct TerminalScreen {
    stdout: Stdout,
}

impl TerminalScreen {
    pub fn open() -> io::Result<Self> {
        let mut stdout = io::stdout();
        enable_raw_mode()?;
        execute!(stdout, EnterAlternateScreen, Hide)?;
        Ok(Self { stdout })
    }

    fn is_interrupt(key: &KeyEvent) -> bool {
        if key.kind != KeyEventKind::Press {
            return false;
        }
        match key.code {
            KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Char('x') => true,
            KeyCode::Char('c') => key.modifiers.contains(KeyModifiers::CONTROL),
            _ => false,
        }
    }
}

impl Screen for TerminalScreen {
    fn size(&self) -> io::Result<TerminalSize> {
        let (width, height) = terminal::size()?;
        Ok(TerminalSize { width, height })
    }

    fn draw(&mut self, text: &str, status: &str) -> io::Result<()> {
        // Raw mode does not return the carriage on '\n', so every line is placed explicitly.
        queue!(self.stdout, Clear(ClearType::All))?;
        let mut row = 0;
        for line in text.lines() {
            queue!(self.stdout, MoveTo(0, row), Print(line))?;
            row = row.saturating_add(1);
        }
        queue!(self.stdout, MoveTo(0, row), Print(status))?;
        self.stdout.flush()
    }

    fn wait_for_interrupt(&mut self, timeout: Duration) -> io::Result<bool> {
        let deadline = Instant::now() + timeout;
        loop {
            let remaining = deadline.saturating_duration_since(Instant::now());
            if !event::poll(remaining)? {
                return Ok(false);
            }
            if let Event::Key(key) = event::read()?
                && Self::is_interrupt(&key)
            {
                return Ok(true);
            }
        }
    }
}

impl Drop for TerminalScreen {
    fn drop(&mut self) {
        if let Err(err) = execute!(self.stdout, Show, LeaveAlternateScreen) {
            error!("Failed to leave alternate screen: {}", err);
        }
        if let Err(err) = disable_raw_mode() {
            error!("Failed to disable raw mode: {}", err);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use life_grid::{GenerationEngine, LifeGrid, Loc};

    struct GridWorld {
        grid: LifeGrid,
        engine: GenerationEngine,
        generation: u64,
    }

    impl GridWorld {
        fn new(width: u32, height: u32, live: &[(u32, u32)]) -> Self {
            let live: Vec<Loc> = live.iter().map(|&(row, col)| Loc::new(row, col)).collect();
            Self {
                grid: LifeGrid::from_live_cells(width, height, &live).unwrap(),
                engine: GenerationEngine::new(),
                generation: 0,
            }
        }
    }

    impl World for GridWorld {
        fn width(&self) -> u32 {
            self.grid.width()
        }

        fn height(&self) -> u32 {
            self.grid.height()
        }

        fn generation(&self) -> u64 {
            self.generation
        }

        fn live_count(&self) -> usize {
            self.grid.live_count()
        }

        fn to_text(&self) -> String {
            self.grid.to_text()
        }

        fn update(&mut self) -> bool {
            let next = self.engine.step(&self.grid);
            self.grid = next.grid;
            self.generation += 1;
            next.changed
        }
    }

    /// Records frames and reports an interrupt on the given wait, if any.
    #[derive(Default)]
    struct ScriptedScreen {
        frames: Vec<(String, String)>,
        waits: usize,
        interrupt_on_wait: Option<usize>,
    }

    impl Screen for ScriptedScreen {
        fn size(&self) -> io::Result<TerminalSize> {
            Ok(TerminalSize {
                width: 80,
                height: 24,
            })
        }

        fn draw(&mut self, text: &str, status: &str) -> io::Result<()> {
            self.frames.push((text.to_string(), status.to_string()));
            Ok(())
        }

        fn wait_for_interrupt(&mut self, _timeout: Duration) -> io::Result<bool> {
            self.waits += 1;
            Ok(self.interrupt_on_wait == Some(self.waits))
        }
    }

    fn quick_config(max_generations: Option<u64>) -> AnimationConfig {
        AnimationConfig {
            time_step: Duration::ZERO,
            max_generations,
        }
    }

    #[test]
    fn still_life_stops_after_one_step() {
        let mut world = GridWorld::new(4, 4, &[(1, 1), (1, 2), (2, 1), (2, 2)]);
        let mut screen = ScriptedScreen::default();

        let outcome = run(&mut world, &mut screen, &quick_config(None)).unwrap();

        assert_eq!(outcome.reason, StopReason::Stable);
        assert_eq!(outcome.generations, 1);
        assert_eq!(screen.frames.len(), 2);
        assert_eq!(screen.frames[0].0, screen.frames[1].0);
    }

    #[test]
    fn blinker_runs_until_limit() {
        let mut world = GridWorld::new(5, 5, &[(2, 1), (2, 2), (2, 3)]);
        let mut screen = ScriptedScreen::default();

        let outcome = run(&mut world, &mut screen, &quick_config(Some(4))).unwrap();

        assert_eq!(outcome.reason, StopReason::GenerationLimit);
        assert_eq!(outcome.generations, 4);
        assert_eq!(screen.frames.len(), 5);
        assert_eq!(screen.frames[0].0, screen.frames[2].0);
        assert_ne!(screen.frames[0].0, screen.frames[1].0);
        assert!(screen.frames[4].1.starts_with("generation 4 "));
    }

    #[test]
    fn interrupt_stops_before_next_step() {
        let mut world = GridWorld::new(5, 5, &[(2, 1), (2, 2), (2, 3)]);
        let mut screen = ScriptedScreen {
            interrupt_on_wait: Some(3),
            ..ScriptedScreen::default()
        };

        let outcome = run(&mut world, &mut screen, &quick_config(None)).unwrap();

        assert_eq!(outcome.reason, StopReason::Interrupted);
        assert_eq!(outcome.generations, 2);
        assert_eq!(screen.frames.len(), 3);
    }

    #[test]
    fn empty_world_is_stable() {
        let mut world = GridWorld::new(0, 0, &[]);
        let mut screen = ScriptedScreen::default();

        let outcome = run(&mut world, &mut screen, &quick_config(None)).unwrap();

        assert_eq!(outcome.reason, StopReason::Stable);
        assert_eq!(screen.frames[0].0, "");
    }

    #[test]
    fn interrupt_keys() {
        let press = |code, modifiers| KeyEvent::new(code, modifiers);
        assert!(TerminalScreen::is_interrupt(&press(KeyCode::Esc, KeyModifiers::NONE)));
        assert!(TerminalScreen::is_interrupt(&press(KeyCode::Char('q'), KeyModifiers::NONE)));
        assert!(TerminalScreen::is_interrupt(&press(
            KeyCode::Char('c'),
            KeyModifiers::CONTROL
        )));
        assert!(!TerminalScreen::is_interrupt(&press(KeyCode::Char('c'), KeyModifiers::NONE)));
        assert!(!TerminalScreen::is_interrupt(&press(KeyCode::Enter, KeyModifiers::NONE)));
    }
}
