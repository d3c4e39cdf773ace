//! Hunter Engine - headless runner for the Monster Hunter gameplay core.
//!
//! This crate provides the frame loop, frame timing, scripted input, the
//! engine configuration file and a logging render sink.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(clippy::unwrap_used)]

pub mod app;
pub mod config;
pub mod input;
pub mod renderer;
pub mod timing;
