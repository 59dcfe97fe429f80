//! Chart aggregate: scales, series storage, cursor tracking and tooltip content.

pub mod cursor;
pub mod entities;
pub mod tooltip;
pub mod value_objects;

pub use cursor::*;
pub use entities::*;
pub use tooltip::*;
pub use value_objects::*;
