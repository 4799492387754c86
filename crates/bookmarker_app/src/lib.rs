//! Command line front end for the shortcut bookmarker.
pub mod cli;
pub mod platform;
