// SPDX-License-Identifier: MIT

//! Cragsync: pull climbing logbooks into one local database
//!
//! This crate fetches tick logbooks from Mountain Project and 8a.nu,
//! normalizes them to a common shape, classifies each ascent, stamps
//! running-max difficulty context, and commits the result atomically
//! to SQLite.

pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod services;
