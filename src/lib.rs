// src/lib.rs

//! Tennis course availability notifier.

pub mod config;
pub mod error;
pub mod models;
pub mod pipeline;
pub mod queue;
pub mod services;
pub mod session;
pub mod trigger;
pub mod utils;
