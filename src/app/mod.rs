pub mod config;
pub mod logging;
mod renderer;

use std::{
    io::{Stdout, Write},
    sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
        mpsc::SyncSender,
    },
    time::Duration,
};

use crossterm::{
    ExecutableCommand, cursor,
    event::{self, KeyCode},
    queue,
    style::{self, Attribute, Color, Stylize},
    terminal::{self, ClearType},
};
use rand::Rng;

use crate::{
    app::{
        config::Config,
        renderer::{Renderer, RendererStatus},
    },
    carver::{
        CarveError, Path, PathGenerator, get_rng,
        painter::{GridPainter, NullPainter},
    },
    field::{Field, grid::GridEvent},
};

pub struct App {
    config: Config,
    /// How often the input thread checks the done/cancel flags between key polls
    user_input_event_poll_timeout: Duration,
    /// How often the level loop checks for cancellation while waiting between levels
    cancel_check_interval: Duration,
}

impl App {
    /// Maximum number of grid events to buffer in the channel between carve and render threads
    const MAX_EVENTS_IN_CHANNEL_BUFFER: usize = 1000;

    pub fn new(config: Config) -> Self {
        Self {
            config,
            user_input_event_poll_timeout: Duration::from_millis(100),
            cancel_check_interval: Duration::from_millis(50),
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Set a panic hook to restore terminal state on panic
    /// This ensures that the terminal is not left in raw mode or alternate screen on panic
    /// even if the panic occurs in a different thread
    fn set_panic_hook() {
        let hook = std::panic::take_hook();
        std::panic::set_hook(Box::new(move |panic_info| {
            let _ = App::restore_terminal(&mut std::io::stdout()); // ignore any errors as we are already failing
            hook(panic_info);
        }));
    }

    /// Setup terminal in raw mode and enter alternate screen
    /// Also sets a panic hook to restore terminal on panic
    pub fn setup_terminal(stdout: &mut Stdout) -> std::io::Result<()> {
        terminal::enable_raw_mode()?;
        App::set_panic_hook();
        queue!(
            stdout,
            terminal::EnterAlternateScreen,
            terminal::Clear(ClearType::All),
            cursor::Hide,
            cursor::MoveTo(0, 0)
        )?;
        stdout.flush()?;
        Ok(())
    }

    /// Restore terminal to original state
    /// Leave alternate screen and disable raw mode
    pub fn restore_terminal(stdout: &mut Stdout) -> std::io::Result<()> {
        queue!(stdout, terminal::LeaveAlternateScreen, cursor::Show)?;
        stdout.flush()?;
        terminal::disable_raw_mode()?;
        Ok(())
    }

    /// Seed of the `level`-th level: counts up from the configured seed, or random when unset.
    fn level_seed(seed: Option<u64>, level: u64, rng: &mut impl Rng) -> u64 {
        match seed {
            Some(seed) => seed.wrapping_add(level),
            None => rng.random(),
        }
    }

    /// Carve one level into a fresh field.
    /// With visualization on, the field paints the search as it happens; otherwise
    /// the search runs unobserved and only the finished road is painted.
    pub fn carve_level(
        config: &Config,
        seed: u64,
        grid_event_tx: Option<SyncSender<GridEvent>>,
    ) -> (Field, Result<Path, CarveError>) {
        let mut field = Field::new(config.width, config.height, grid_event_tx);
        let mut generator = PathGenerator::new(config.carve_config(seed));
        let mut rng = get_rng(Some(seed));

        let result = if config.visualize {
            generator.generate(&mut rng, &mut field)
        } else {
            let result = generator.generate(&mut rng, &mut NullPainter);
            match &result {
                Ok(road) => {
                    field.clear(config.width, config.height);
                    field.paint_road(road.points());
                }
                Err(CarveError::SearchExhausted { .. }) => field.clear(config.width, config.height),
                Err(CarveError::InvalidConfiguration { .. }) => {}
            }
            result
        };

        match &result {
            Ok(road) => {
                tracing::info!(
                    "[level] Seed {}: road of {} tiles, {} steps, {} backtracks{}",
                    seed,
                    road.len(),
                    generator.steps_taken(),
                    generator.backtracks(),
                    if generator.forced_descent() {
                        ", forced descent"
                    } else {
                        ""
                    }
                );
            }
            Err(e) => tracing::warn!("[level] Seed {}: {}", seed, e),
        }
        field.announce(seed, result.as_ref().ok().map(Path::len));
        (field, result)
    }

    /// Print finished fields to `out` without any terminal control.
    pub fn run_headless(&self, out: &mut impl Write) -> std::io::Result<()> {
        let mut seed_rng = get_rng(None);
        let mut level = 0;
        loop {
            let seed = App::level_seed(self.config.seed, level, &mut seed_rng);
            let (field, result) = App::carve_level(&self.config, seed, None);
            match result {
                Ok(road) => {
                    write!(out, "{}", field)?;
                    writeln!(out, "seed {}: road of {} tiles", seed, road.len())?;
                }
                Err(CarveError::SearchExhausted { steps }) => {
                    writeln!(out, "seed {}: search exhausted after {} steps", seed, steps)?;
                }
                Err(e @ CarveError::InvalidConfiguration { .. }) => {
                    return Err(std::io::Error::new(std::io::ErrorKind::InvalidInput, e));
                }
            }
            out.flush()?;

            if !self.config.forever {
                return Ok(());
            }
            level += 1;
            std::thread::sleep(self.config.level_delay);
        }
    }

    /// Main application loop: animate carving in the terminal until done or Esc is pressed
    pub fn run(&self, stdout: &mut Stdout) -> std::io::Result<()> {
        // Rejected up front so the user sees the reason instead of an empty screen
        if let Err(e) = self.config.carve_config(0).validate() {
            return Err(std::io::Error::new(std::io::ErrorKind::InvalidInput, e));
        }

        // Flag to indicate rendering is done. Set to true by the render thread when it finishes.
        let render_done = Arc::new(AtomicBool::new(false));
        // Flag to indicate rendering should be cancelled. Set on Esc or when the field does not fit.
        let render_cancel = Arc::new(AtomicBool::new(false));

        let user_input_event_poll_timeout = self.user_input_event_poll_timeout;
        let render_done_for_input = render_done.clone();
        let render_cancel_for_input = render_cancel.clone();
        // Spawn a thread to listen for user input
        let input_thread_handle = std::thread::spawn(move || -> std::io::Result<()> {
            App::listen_to_user_input(
                user_input_event_poll_timeout,
                &render_done_for_input,
                &render_cancel_for_input,
            )
        });

        let (grid_event_tx, grid_event_rx) =
            std::sync::mpsc::sync_channel::<GridEvent>(App::MAX_EVENTS_IN_CHANNEL_BUFFER);

        // Spawn a thread to listen for grid updates and render the field
        let paint_delay = self.config.paint_delay;
        let render_cancel_for_render = render_cancel.clone();
        let render_done_for_render = render_done.clone();
        let render_thread_handle = std::thread::spawn(move || {
            let mut renderer = Renderer::new(paint_delay);
            renderer.render(
                grid_event_rx,
                &render_cancel_for_render,
                &render_done_for_render,
            )
        });

        // Spawn a thread to carve levels; dropping its grid_event_tx on return ends the render loop
        let config = self.config.clone();
        let cancel_check_interval = self.cancel_check_interval;
        let render_cancel_for_compute = render_cancel.clone();
        let compute_thread_handle = std::thread::spawn(move || -> bool {
            let mut seed_rng = get_rng(None);
            let mut level = 0;
            loop {
                let seed = App::level_seed(config.seed, level, &mut seed_rng);
                let (_field, result) =
                    App::carve_level(&config, seed, Some(grid_event_tx.clone()));
                if !config.forever || render_cancel_for_compute.load(Ordering::Relaxed) {
                    return result.is_ok();
                }
                level += 1;

                // Wait between levels, waking up regularly to notice cancellation
                let mut waited = Duration::ZERO;
                while waited < config.level_delay {
                    if render_cancel_for_compute.load(Ordering::Relaxed) {
                        tracing::info!("[level] Carve thread detected render cancel, exiting loop");
                        return result.is_ok();
                    }
                    let nap = cancel_check_interval.min(config.level_delay - waited);
                    std::thread::sleep(nap);
                    waited += nap;
                }
            }
        });

        // Wait for compute thread to finish
        let road_carved = compute_thread_handle
            .join()
            .expect("Carve thread panicked");

        // Wait for render thread to finish
        let status = render_thread_handle
            .join()
            .expect("Render thread panicked")?;

        // Wait for input thread to finish; it exits once rendering is done or cancelled
        input_thread_handle
            .join()
            .expect("Input thread panicked")?;

        match status {
            RendererStatus::Cancelled => {
                tracing::info!("Rendering was cancelled by user.");
                return Ok(());
            }
            RendererStatus::TooSmall => {}
            RendererStatus::Completed => {
                let msg = if road_carved {
                    "Road carved! "
                } else {
                    "No road found. "
                };
                stdout.execute(style::PrintStyledContent(
                    msg.with(Color::Green).attribute(Attribute::Bold),
                ))?;
            }
        }
        stdout.execute(style::PrintStyledContent(
            "Press Esc to exit...\r\n"
                .with(Color::Blue)
                .attribute(Attribute::Bold),
        ))?;
        // Wait for user to press Esc
        App::wait_for_esc()?;
        Ok(())
    }

    /// Listen for Esc while rendering.
    /// This function runs in a separate thread, and is the only place where user input is read
    /// until rendering finishes
    fn listen_to_user_input(
        event_poll_timeout: Duration,
        render_done: &AtomicBool,
        render_cancel: &AtomicBool,
    ) -> std::io::Result<()> {
        loop {
            // Check if render is done or canceled
            if render_done.load(Ordering::Relaxed) || render_cancel.load(Ordering::Relaxed) {
                return Ok(());
            }

            // Poll for events with a timeout
            if !event::poll(event_poll_timeout)? {
                // No event available, continue loop to check flags again
                continue;
            }

            if let event::Event::Key(event::KeyEvent { code, kind, .. }) = event::read()? {
                if kind == event::KeyEventKind::Press && code == KeyCode::Esc {
                    tracing::debug!("[input loop] Esc key pressed, cancelling render");
                    render_cancel.store(true, Ordering::Relaxed);
                    return Ok(());
                }
            }
        }
    }

    /// Wait for the user to press the Esc key
    /// This function blocks until Esc is pressed
    fn wait_for_esc() -> std::io::Result<()> {
        loop {
            if let event::Event::Key(event::KeyEvent { code, kind, .. }) = event::read()? {
                if code == KeyCode::Esc && kind == event::KeyEventKind::Press {
                    break;
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::{Point, Tile};

    fn quiet_config() -> Config {
        Config {
            seed: Some(42),
            paint_delay: Duration::ZERO,
            level_delay: Duration::ZERO,
            ..Config::default()
        }
    }

    #[test]
    fn test_level_seeds_count_up_from_configured_seed() {
        let mut rng = get_rng(Some(0));
        assert_eq!(App::level_seed(Some(10), 0, &mut rng), 10);
        assert_eq!(App::level_seed(Some(10), 3, &mut rng), 13);
        assert_eq!(App::level_seed(Some(u64::MAX), 1, &mut rng), 0);
    }

    #[test]
    fn test_visualized_and_hidden_carves_paint_the_same_road() {
        let visible = quiet_config();
        let hidden = Config {
            visualize: false,
            ..quiet_config()
        };
        let (visible_field, visible_road) = App::carve_level(&visible, 42, None);
        let (hidden_field, hidden_road) = App::carve_level(&hidden, 42, None);
        assert_eq!(visible_road, hidden_road);

        if let Ok(road) = visible_road {
            assert_eq!(visible_field.road_tiles(), road.len());
            assert_eq!(hidden_field.road_tiles(), road.len());
            assert!(
                road.points()
                    .iter()
                    .all(|&p| visible_field.tile(p) == Some(Tile::Road))
            );
            assert_eq!(visible_field.tile(Point::new(0, 0)), Some(Tile::Grass));
        }
    }

    #[test]
    fn test_carve_level_streams_events_and_outcome() {
        let (tx, rx) = std::sync::mpsc::sync_channel(100_000);
        let (_field, result) = App::carve_level(&quiet_config(), 42, Some(tx));
        let events = rx.try_iter().collect::<Vec<_>>();

        assert!(matches!(
            events.first(),
            Some(GridEvent::Initial {
                tile: Tile::Grass,
                width: 25,
                height: 20
            })
        ));
        assert_eq!(
            events.last(),
            Some(&GridEvent::Finished {
                seed: 42,
                road_length: result.as_ref().ok().map(Path::len)
            })
        );
    }

    #[test]
    fn test_each_level_announces_the_field_once() {
        for visualize in [true, false] {
            let config = Config {
                visualize,
                ..quiet_config()
            };
            let (tx, rx) = std::sync::mpsc::sync_channel(100_000);
            for seed in [42, 43] {
                App::carve_level(&config, seed, Some(tx.clone()));
            }
            drop(tx);

            let announcements = rx
                .iter()
                .filter(|event| matches!(event, GridEvent::Initial { .. }))
                .count();
            assert_eq!(announcements, 2, "visualize = {}", visualize);
        }
    }

    #[test]
    fn test_hidden_carve_streams_only_the_finished_road() {
        let config = Config {
            visualize: false,
            ..quiet_config()
        };
        let (tx, rx) = std::sync::mpsc::sync_channel(100_000);
        let (_field, result) = App::carve_level(&config, 42, Some(tx));
        let events = rx.try_iter().collect::<Vec<_>>();

        assert!(matches!(events.first(), Some(GridEvent::Initial { .. })));
        let updates = events
            .iter()
            .filter(|event| matches!(event, GridEvent::Update { .. }))
            .count();
        assert_eq!(updates, result.as_ref().map_or(0, Path::len));
    }

    #[test]
    fn test_run_headless_prints_field() {
        let app = App::new(quiet_config());
        let mut out = Vec::new();
        app.run_headless(&mut out).unwrap();
        let text = String::from_utf8(out).unwrap();

        let lines = text.lines().collect::<Vec<_>>();
        let last = lines.last().unwrap();
        assert!(last.starts_with("seed 42:"));
        if last.contains("road of") {
            assert_eq!(lines.len(), 21);
            assert!(lines[..20].iter().all(|line| line.len() == 25));
            assert!(lines[0].contains('#'));
            assert!(lines[19].contains('#'));
        }
    }

    #[test]
    fn test_run_headless_rejects_tiny_field() {
        let app = App::new(Config {
            width: 3,
            ..quiet_config()
        });
        let err = app.run_headless(&mut Vec::<u8>::new()).unwrap_err();
        assert_eq!(err.kind(), std::io::ErrorKind::InvalidInput);
    }
}
