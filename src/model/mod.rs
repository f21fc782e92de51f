mod configuration;
mod entities;
mod error;
mod request;
mod response;

pub use configuration::*;
pub use entities::*;
pub use error::*;
pub use request::*;
pub use response::*;
