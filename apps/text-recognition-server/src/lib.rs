//! Text Recognition Server
//!
//! Runs every configured OCR provider over an image concurrently and
//! returns the most confident result alongside all provider outcomes.
//!
//! # Modules
//!
//! - `ocr`: providers, fan-out and result reconciliation
//! - `routes`: HTTP endpoints
//! - `config`: environment-driven configuration

pub mod config;
pub mod error;
pub mod ocr;
pub mod routes;
pub mod state;
