//! Application models declared as entity descriptors.

pub mod student;

pub use student::{registry, Student};
