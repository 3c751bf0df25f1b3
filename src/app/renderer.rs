use std::{
    io::{Stdout, Write},
    sync::{
        atomic::{AtomicBool, Ordering},
        mpsc::Receiver,
    },
    time::Duration,
};

use crossterm::{
    QueueableCommand, cursor, queue,
    style::{self, Attribute, Color, Stylize},
    terminal::{self, ClearType},
};

use crate::field::{Tile, grid::GridEvent};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RendererStatus {
    Completed,
    Cancelled,
    /// The terminal cannot show the field; a message explaining why is on screen
    TooSmall,
}

pub struct Renderer {
    /// Standard output handle to write to the terminal
    stdout: Stdout,
    /// Current grid dimensions (width, height)
    grid_dims: Option<(u16, u16)>,
    /// Time to wait after each tile change so the carve can be followed
    paint_delay: Duration,
}

impl Renderer {
    /// Rows below the field reserved for the status line.
    pub const NUM_STATUS_ROWS: u16 = 2;

    pub fn new(paint_delay: Duration) -> Self {
        Self {
            stdout: std::io::stdout(),
            grid_dims: None,
            paint_delay,
        }
    }

    /// Check if terminal size is sufficient for the given grid dimensions.
    /// If not, display a message and return Ok(false).
    fn check_size(stdout: &mut Stdout, width: u16, height: u16) -> std::io::Result<bool> {
        let (term_width, term_height) = terminal::size()?;
        let needed_width = width.saturating_mul(Tile::TILE_WIDTH);
        let needed_height = height.saturating_add(Renderer::NUM_STATUS_ROWS);
        if term_width < needed_width || term_height < needed_height {
            let msg = format!(
                "Terminal size is too small ({}x{}) for a {}x{} field, which needs {}x{}. Please resize the terminal and try again.\r\n",
                term_width, term_height, width, height, needed_width, needed_height
            );
            queue!(
                stdout,
                terminal::Clear(ClearType::All),
                cursor::MoveTo(0, 0),
                style::PrintStyledContent(msg.with(Color::Yellow).attribute(Attribute::Bold)),
            )?;
            stdout.flush()?;
            return Ok(false);
        }
        Ok(true)
    }

    /// Render a single grid event to the terminal
    /// Returns Ok(true) if rendering completed successfully
    /// Returns Ok(false) if the terminal cannot show the field
    fn render_grid_event(&mut self, event: &GridEvent) -> std::io::Result<bool> {
        match *event {
            GridEvent::Initial {
                tile,
                width,
                height,
            } => {
                self.grid_dims = Some((width, height));
                if !Renderer::check_size(&mut self.stdout, width, height)? {
                    return Ok(false);
                }

                queue!(self.stdout, terminal::Clear(ClearType::All), cursor::MoveTo(0, 0))?;
                for _y in 0..height {
                    for _x in 0..width {
                        self.stdout.queue(style::Print(tile))?;
                    }
                    self.stdout.queue(style::Print("\r\n"))?;
                }
                self.stdout.flush()?;
            }
            GridEvent::Update { coord, new, .. } => {
                // Skip if width and height are not set
                if self.grid_dims.is_some() {
                    queue!(
                        self.stdout,
                        cursor::MoveTo(coord.0 * Tile::TILE_WIDTH, coord.1),
                        style::Print(new)
                    )?;
                    self.stdout.flush()?;
                    std::thread::sleep(self.paint_delay);
                }
            }
            GridEvent::Finished { seed, road_length } => {
                if let Some((_, height)) = self.grid_dims {
                    let status = match road_length {
                        Some(length) => format!("Seed {}: road of {} tiles", seed, length)
                            .with(Color::Green)
                            .attribute(Attribute::Bold),
                        None => format!("Seed {}: search exhausted, no road", seed)
                            .with(Color::Red)
                            .attribute(Attribute::Bold),
                    };
                    queue!(
                        self.stdout,
                        cursor::MoveTo(0, height),
                        terminal::Clear(ClearType::CurrentLine),
                        style::PrintStyledContent(status),
                        style::Print("\r\n"),
                    )?;
                    self.stdout.flush()?;
                }
            }
        }
        Ok(true)
    }

    /// Render loop that draws every grid event until the channel closes.
    /// Returns Ok(Cancelled) if the user cancelled, Ok(TooSmall) if the terminal is too small
    /// Returns Err if there was an I/O error
    pub fn render(
        &mut self,
        grid_event_rx: Receiver<GridEvent>,
        cancel: &AtomicBool,
        done: &AtomicBool,
    ) -> std::io::Result<RendererStatus> {
        queue!(self.stdout, terminal::Clear(ClearType::All), cursor::Hide)?;
        self.stdout.flush()?;

        // Block and wait for the next grid event; the loop ends when every sender is dropped
        for event in grid_event_rx.iter() {
            if cancel.load(Ordering::Relaxed) {
                return Ok(RendererStatus::Cancelled);
            }

            if !self.render_grid_event(&event)? {
                tracing::info!("[render] Field does not fit the terminal, cancelling");
                cancel.store(true, Ordering::Relaxed);
                return Ok(RendererStatus::TooSmall);
            }
        }

        // Esc may arrive after the last event was drawn
        if cancel.load(Ordering::Relaxed) {
            return Ok(RendererStatus::Cancelled);
        }

        // Move cursor below the field and status line after exiting
        if let Some((_, height)) = self.grid_dims {
            queue!(
                self.stdout,
                cursor::MoveTo(0, height.saturating_add(1)),
                cursor::Show
            )?;
            self.stdout.flush()?;
        }
        done.store(true, Ordering::Relaxed);
        Ok(RendererStatus::Completed)
    }
}
