pub mod classification;
pub mod agreement;

pub use classification::*;
pub use agreement::*;
