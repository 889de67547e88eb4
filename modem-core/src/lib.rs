#![no_std]

// Shared logic for the modem power controller feature set.
//
// This crate stays portable across MCU firmware and host tooling by avoiding the
// Rust standard library and exposing abstractions the other crates can adopt.

pub mod config;
pub mod console;
pub mod lines;
pub mod power;
pub mod report;
pub mod telemetry;
