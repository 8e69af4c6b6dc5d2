//! Client-side tabular data engine
//!
//! Computes which rows of an in-memory dataset are visible, in what order and
//! which of them are selected, given a column schema and the user's filter,
//! search, sort, page and selection choices.

pub mod action;
pub mod config;
pub mod error;
pub mod filter;
pub mod format;
pub mod model;
pub mod page;
pub mod selection;
pub mod sort;
pub mod view;

pub use config::ViewConfig;
pub use view::TableView;
pub use view::ViewAction;
pub use view::ViewSnapshot;
