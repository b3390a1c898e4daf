pub mod error;
pub mod config;
pub mod pipeline;
pub mod stages;
pub mod driver;

pub use error::*;
pub use config::*;
pub use pipeline::*;
pub use stages::*;
pub use driver::*;
