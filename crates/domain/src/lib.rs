#![warn(clippy::pedantic)]
#![allow(clippy::missing_errors_doc)]

use std::slice::Iter;

mod error;
mod exercise;
mod muscle;
mod recommendation;
mod rotation;
mod service;

pub use error::*;
pub use exercise::*;
pub use muscle::*;
pub use recommendation::*;
pub use rotation::*;
pub use service::*;

pub trait Property: Clone + Copy + Sized {
    fn iter() -> Iter<'static, Self>;
    fn name(self) -> &'static str;
}
