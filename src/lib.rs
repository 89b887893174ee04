//! GISS surface temperature anomalies: load, reshape, aggregate, chart.

pub mod analysis;
pub mod app;
pub mod chart;
pub mod cli;
pub mod color;
pub mod config;
pub mod data;
pub mod error;
pub mod export;
pub mod state;
pub mod ui;
pub mod units;
