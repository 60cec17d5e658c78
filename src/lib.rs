pub mod config;
pub mod core;
pub mod error;
pub mod logging;
pub mod pointer;
pub mod runtime;
pub mod terminal;
pub mod ui;
pub mod widgets;

pub use core::candidates;
pub use core::controller;
pub use core::debouncer;
pub use core::matcher;

pub use pointer::outside_click;

pub use runtime::key_bindings;
pub use runtime::runner;

pub use error::{Error, Result};
