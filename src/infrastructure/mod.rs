mod collector_paginated;
mod fetcher_rest;
mod formatter_json;
mod formatter_table;

pub use collector_paginated::*;
pub use fetcher_rest::*;
pub use formatter_json::*;
pub use formatter_table::*;
