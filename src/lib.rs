pub mod config;
pub mod contrib;
pub mod error;
pub mod grid;
pub mod layout;
pub mod svg;
