#![no_std]

extern crate alloc;

pub use drag::*;
pub use error::*;
pub use progressive::*;
pub use puzzle::*;
pub use scratch::*;
pub use session::*;
pub use types::*;

mod drag;
mod error;
mod progressive;
mod puzzle;
mod scratch;
mod session;
mod types;
