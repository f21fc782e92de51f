//! Lists the repositories owned by a GitHub account, page by page, and renders their
//! fork, star and watcher counters.

mod infrastructure;
mod interface;
mod model;

pub use infrastructure::*;
pub use interface::*;
pub use model::*;
