//! CrudService: generic CRUD using the safe SQL builder.

mod crud;
mod validation;
pub use crud::{CrudService, Record};
pub use validation::{unique_message, FormErrors, FormValidator, NOT_AN_INTEGER, REQUIRED};
