pub mod error;
pub mod frame;
pub mod matrix;

pub use error::{FrameError, FrameResult};
pub use frame::{Column, ColumnKind, DataFrame};
pub use matrix::Matrix;
