//! Domain entities

mod failure;

pub use failure::{Failure, ResponseBody, ResponseHeaders};
