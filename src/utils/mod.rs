// src/utils/mod.rs
mod format;
mod io;
mod validation;

pub use format::*;
pub use io::*;
pub use validation::*;
