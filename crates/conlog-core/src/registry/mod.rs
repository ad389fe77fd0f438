//! Level Registry
//!
//! Holds the ordered severity levels and the active per-category minimum
//! levels, and answers "should this message be emitted?".
//!
//! - `Level`: the closed, totally ordered set of level tokens
//! - `LevelCategoryMap`: category thresholds plus the `all`/`none` sentinels
//! - `LevelRegistry`: the swappable active configuration

mod level;
mod map;

pub use level::{Level, LEVELS};
pub use map::{LevelCategoryMap, LevelRegistry};
