//! CLI command handlers, one file per command.

mod cache_dir;
mod completions;
mod fetch;
mod inspect;
mod resolve;

pub use cache_dir::run_cache_dir;
pub use completions::run_completions;
pub use fetch::run_fetch;
pub use inspect::run_inspect;
pub use resolve::run_resolve;
