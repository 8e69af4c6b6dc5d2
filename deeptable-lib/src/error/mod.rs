//! Error types

mod action;
mod compare;
mod field;
mod page;
mod schema;
mod view;

pub use action::*;
pub use compare::*;
pub use field::*;
pub use page::*;
pub use schema::*;
pub use view::*;
