//! Task domain types.

mod filter;
mod map;
mod types;

pub use filter::TasksFilter;
pub use map::TaskMap;
pub use types::{Task, TaskRef};
