pub mod error;
pub mod health;
pub mod model;
pub mod value_object;
