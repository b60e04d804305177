pub mod core;
pub mod sentences;

pub use core::Language;
