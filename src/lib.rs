// src/lib.rs
//
// rubblescan: animated visualization of a simulated drone survey that
// locates a body under rubble with EMI and ERT sensing.

pub mod animation;
pub mod config;
pub mod error;
pub mod models;
pub mod services;
pub mod views;

pub use error::{Error, Result};
