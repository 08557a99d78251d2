//! CLI module graph.

pub mod check;
pub mod command;
pub mod diagnostic;
pub mod dispatch;
pub mod logs;
pub mod operator;
pub mod output;
pub mod run;
pub mod service;
pub mod session;
pub mod subscribers;
