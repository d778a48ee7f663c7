//! OCR Proxy Server
//!
//! Public entry point for OCR requests. Validates the payload and forwards
//! it to the text recognition server.

pub mod client;
pub mod config;
pub mod error;
pub mod routes;
pub mod state;
