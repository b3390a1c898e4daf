pub mod error;
pub mod imputer;
pub mod cleaner;
pub mod encoder;
pub mod scaler;

pub use error::*;
pub use imputer::*;
pub use cleaner::*;
pub use encoder::*;
pub use scaler::*;
