//! Rotation scheduling and OB pay engine for Swedish shift work.
//!
//! This crate assigns shifts from a ten-week rotation, generates the Swedish
//! holiday calendar, splits every shift into minute-exact pay segments by
//! rule priority, and rolls days up into monthly and yearly pay summaries
//! with sick-day deductions and preliminary tax.

#![warn(missing_docs)]

pub mod api;
pub mod cache;
pub mod calculation;
pub mod config;
pub mod engine;
pub mod error;
pub mod models;
