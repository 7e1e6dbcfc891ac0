#![doc = include_str!("../README.md")]

mod counter;
mod error;
mod periodic;
mod pool;

pub use crate::counter::*;
pub use crate::error::*;
pub use crate::periodic::*;
pub use crate::pool::*;
