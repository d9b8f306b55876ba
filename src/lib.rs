pub mod commands;
pub mod error;
pub mod language;
pub mod package;
pub mod reference;
pub mod runtime;
pub mod sync;
pub mod ui;
