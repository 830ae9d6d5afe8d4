//! Launcher plumbing behind the `jrun` binary.
//!
//! The binary (`src/main.rs`) only parses arguments and prints; everything
//! that decides what gets executed lives here so it can be unit tested
//! without spawning a JVM.

mod launch;

pub use launch::{LaunchPlan, Launcher, OptionsReport};
