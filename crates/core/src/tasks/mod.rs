//! Task resolution

pub mod resolver;

pub use resolver::{ResolvedTask, TaskResolver};
