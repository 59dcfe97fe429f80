//! Sentiment dataset aggregate: raw records, normalized points and the
//! services that turn one into the other.

pub mod entities;
pub mod services;
pub mod value_objects;

pub use entities::*;
pub use services::*;
pub use value_objects::*;
