pub mod app;
pub mod carver;
pub mod field;

pub use carver::{CarveConfig, CarveError, Path, PathGenerator, generate};
pub use field::{Direction, Field, Point};
