//! Shared fixtures for stella-runtime integration tests.

#![allow(dead_code)]

pub mod runner;
pub mod server;
