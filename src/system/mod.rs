//! System configuration

pub mod config;
