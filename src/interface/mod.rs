mod collector;
mod fetcher;
mod formatter;

pub use collector::*;
pub use fetcher::*;
pub use formatter::*;
