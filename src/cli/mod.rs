//! Command line front end: flags and environment in, a runnable [`actions::Action`] out.

pub mod actions;
pub mod commands;
pub mod dispatch;
pub mod globals;
pub mod telemetry;

mod start;
pub use self::start::start;
