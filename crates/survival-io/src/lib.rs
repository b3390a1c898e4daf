pub mod csv_io;
pub mod reference;

pub use csv_io::*;
pub use reference::*;
