pub mod config;
pub mod installer;
pub mod linker;
pub mod package;
pub mod plugin;
pub mod resolver;
pub mod runtime;
