pub mod painter;
pub mod policy;
pub mod random;

use std::collections::HashSet;
use std::time::Instant;

use crate::field::{Direction, Point};
use painter::{GridPainter, NullPainter};
use policy::{Bounds, Verdict};
pub use random::{RandomSource, get_rng};

/// Smallest width or height that leaves a carve-able interior with room to turn.
pub const MIN_DIMENSION: u16 = 5;

/// Default number of direction draws before the carver gives up searching and heads straight down.
pub const DEFAULT_MAX_STEPS: u64 = 10_000_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CarveConfig {
    pub width: u16,
    pub height: u16,
    pub seed: u64,
    /// Once this many directions have been drawn, every further draw is forced to be `Down`.
    pub max_steps: u64,
}

impl CarveConfig {
    pub fn new(seed: u64, width: u16, height: u16) -> Self {
        CarveConfig {
            width,
            height,
            seed,
            max_steps: DEFAULT_MAX_STEPS,
        }
    }

    pub fn with_max_steps(self, max_steps: u64) -> Self {
        CarveConfig { max_steps, ..self }
    }

    /// Checks that the field is large enough to carve.
    pub fn validate(&self) -> Result<(), CarveError> {
        if self.width < MIN_DIMENSION || self.height < MIN_DIMENSION {
            return Err(CarveError::InvalidConfiguration {
                width: self.width,
                height: self.height,
            });
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CarveError {
    /// The field is too small to hold a road.
    InvalidConfiguration { width: u16, height: u16 },
    /// Backtracking removed the start cell before the bottom row was reached.
    SearchExhausted { steps: u64 },
}

impl std::fmt::Display for CarveError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CarveError::InvalidConfiguration { width, height } => write!(
                f,
                "a {}x{} field is too small, width and height must be at least {}",
                width, height, MIN_DIMENSION
            ),
            CarveError::SearchExhausted { steps } => {
                write!(f, "no road could be carved after {} steps", steps)
            }
        }
    }
}

impl std::error::Error for CarveError {}

/// A finished road, from a cell on the top row down to a cell on row 0.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Path {
    points: Vec<Point>,
}

impl Path {
    pub fn points(&self) -> &[Point] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn start(&self) -> Option<Point> {
        self.points.first().copied()
    }

    pub fn goal(&self) -> Option<Point> {
        self.points.last().copied()
    }
}

/// Result of a single search step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Progress {
    Carving,
    /// The last cell of the road is on row 0
    Reached,
    /// Backtracking removed the start cell
    Exhausted,
}

/// Randomized backtracking carver.
///
/// The road is kept as an explicit stack of cells, each paired with the directions
/// not yet tried from it. A run draws directions from the top frame until one leads to
/// a legal cell (push) or the frame runs dry (pop). All search state belongs to a single
/// call to [`PathGenerator::generate`] and is reset at the start of the next one.
pub struct PathGenerator {
    config: CarveConfig,
    bounds: Bounds,
    path: Vec<Point>,
    /// Untried directions per path entry; always as long as `path`
    frontier: Vec<Vec<Direction>>,
    /// Every cell accepted this run, including ones later undone by backtracking
    visited: HashSet<Point>,
    /// Every in-bounds candidate evaluated this run
    checked: HashSet<Point>,
    steps: u64,
    backtracks: u64,
    forced_descent: bool,
}

impl PathGenerator {
    pub fn new(config: CarveConfig) -> Self {
        PathGenerator {
            config,
            bounds: Bounds::new(config.width, config.height),
            path: Vec::new(),
            frontier: Vec::new(),
            visited: HashSet::new(),
            checked: HashSet::new(),
            steps: 0,
            backtracks: 0,
            forced_descent: false,
        }
    }

    /// Number of directions drawn during the last run.
    pub fn steps_taken(&self) -> u64 {
        self.steps
    }

    /// Number of cells undone by backtracking during the last run.
    pub fn backtracks(&self) -> u64 {
        self.backtracks
    }

    /// Whether the last run hit the step limit and finished with forced descent.
    pub fn forced_descent(&self) -> bool {
        self.forced_descent
    }

    fn reset(&mut self) {
        self.path.clear();
        self.frontier.clear();
        self.visited.clear();
        self.checked.clear();
        self.steps = 0;
        self.backtracks = 0;
        self.forced_descent = false;
    }

    fn push<P: GridPainter>(&mut self, point: Point, painter: &mut P) {
        self.path.push(point);
        self.frontier.push(Direction::ALL.to_vec());
        self.visited.insert(point);
        painter.place(point);
    }

    /// Carves a road, reporting every placed and removed cell to `painter`.
    ///
    /// `rng` is reseeded with the configured seed, so the same configuration always
    /// produces the same road.
    pub fn generate<R, P>(&mut self, rng: &mut R, painter: &mut P) -> Result<Path, CarveError>
    where
        R: RandomSource,
        P: GridPainter,
    {
        self.config.validate()?;
        self.reset();

        let CarveConfig {
            width,
            height,
            seed,
            ..
        } = self.config;
        tracing::debug!("[carver] Carving a {}x{} field with seed {}", width, height, seed);

        rng.reseed(seed);
        painter.clear(width, height);

        let start = Point::new(rng.next_int(1, self.bounds.width - 2), self.bounds.height - 1);
        self.push(start, painter);

        self.carve(rng, painter)
    }

    /// Runs steps from the current stack until the road reaches row 0 or the stack empties.
    fn carve<R, P>(&mut self, rng: &mut R, painter: &mut P) -> Result<Path, CarveError>
    where
        R: RandomSource,
        P: GridPainter,
    {
        let started_at = Instant::now();
        loop {
            match self.step(rng, painter) {
                Progress::Carving => {}
                Progress::Reached => {
                    tracing::info!(
                        "[carver] Road of {} cells carved in {:.3}ms ({} steps, {} backtracks)",
                        self.path.len(),
                        started_at.elapsed().as_secs_f64() * 1000.0,
                        self.steps,
                        self.backtracks
                    );
                    self.frontier.clear();
                    return Ok(Path {
                        points: std::mem::take(&mut self.path),
                    });
                }
                Progress::Exhausted => {
                    tracing::info!(
                        "[carver] Search exhausted after {} steps (seed {})",
                        self.steps,
                        self.config.seed
                    );
                    return Err(CarveError::SearchExhausted { steps: self.steps });
                }
            }
        }
    }

    /// Extends the road from its last cell by one cell, or undoes that cell if every
    /// direction from it has been tried.
    fn step<R, P>(&mut self, rng: &mut R, painter: &mut P) -> Progress
    where
        R: RandomSource,
        P: GridPainter,
    {
        let Some(&current) = self.path.last() else {
            return Progress::Exhausted;
        };
        let depth = self.path.len() - 1;

        while !self.frontier[depth].is_empty() {
            let remaining = self.frontier[depth].len() as i32;
            let index = rng.next_int(0, remaining) as usize;
            let mut direction = self.frontier[depth].remove(index);

            self.steps += 1;
            if self.steps >= self.config.max_steps {
                if !self.forced_descent {
                    tracing::warn!(
                        "[carver] Step limit {} reached, descending straight down",
                        self.config.max_steps
                    );
                    self.forced_descent = true;
                }
                self.frontier[depth].clear();
                direction = Direction::Down;
            }

            let candidate = current + direction;
            if candidate.y == 0 {
                self.path.push(candidate);
                painter.place(candidate);
                return Progress::Reached;
            }

            match policy::check(
                candidate,
                direction,
                self.bounds,
                &self.visited,
                &mut self.checked,
            ) {
                Verdict::Accept => {
                    self.push(candidate, painter);
                    return Progress::Carving;
                }
                verdict => {
                    tracing::trace!("[carver] Rejected {}: {:?}", candidate, verdict);
                }
            }
        }

        // Dead end: every direction from here was tried
        self.path.pop();
        self.frontier.pop();
        self.backtracks += 1;
        painter.remove(current);
        if self.path.is_empty() {
            Progress::Exhausted
        } else {
            Progress::Carving
        }
    }
}

/// Carves a road through a `width` x `height` field with the default step limit and no painter.
pub fn generate(seed: u64, width: u16, height: u16) -> Result<Path, CarveError> {
    let mut rng = get_rng(Some(seed));
    PathGenerator::new(CarveConfig::new(seed, width, height)).generate(&mut rng, &mut NullPainter)
}
