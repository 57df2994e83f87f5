#![forbid(unsafe_code)]

//! Command-line front end for `tscat-catalog`.

pub mod check;
pub mod cli;
pub mod error;
pub mod logging;
pub mod normalize;
pub mod resolve;
pub mod stats;
pub mod util;

pub use cli::run;
pub use error::{Result, TscatError};
