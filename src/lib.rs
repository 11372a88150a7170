//! Labor Payroll Engine for jewellery workshop laborers
//!
//! This crate keeps laborer profiles, calculates monthly salary breakdowns
//! (regular pay, overtime, weekend bonuses, allowances and deductions),
//! saves them as daily salary records in SQLite, and reports over the saved
//! records. An axum HTTP API exposes the same operations.

#![warn(missing_docs)]

pub mod api;
pub mod calculation;
pub mod config;
pub mod error;
pub mod models;
pub mod service;
pub mod storage;
