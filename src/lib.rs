//! Rowscope Library
//!
//! A native viewer for browsing very large ordered datasets in a table while
//! holding only one window of rows in memory.

pub mod app;
pub mod constants;
pub mod domain;
pub mod error;
pub mod helpers;
pub mod services;
pub mod states;
pub mod theme;
pub mod viewport;
pub mod views;
