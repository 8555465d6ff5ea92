//! Notefolio library
//!
//! Offline-first notes core: folders, notes with formatting, recents,
//! favorites and a restorable trash, bound to a local SQLite store.
//! A UI host drives the screens in [`screens`] and renders their state.

pub mod app;
pub mod config;
pub mod database;
pub mod error;
pub mod screens;
pub mod services;
pub mod session;
