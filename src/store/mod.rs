//! The in-memory store of users and their relations lives here.

pub use relations::*;

mod relations;
