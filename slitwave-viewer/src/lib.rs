//! slitwave viewer - native window and headless runner for slitwave sessions
//!
//! This crate provides:
//! - A native eframe window that runs a session live under keyboard control
//! - A runner binary that runs a saved configuration headless and exports a PNG
//! - The shared keyboard [`controls`]

pub mod controls;

pub use controls::{Command, BINDINGS};
