pub mod error;
pub mod logistic;

pub use error::*;
pub use logistic::*;
