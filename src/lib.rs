//! LLMBox - compare answers from free OpenRouter models side by side.
//!
//! Features:
//! - Startup discovery of zero-cost models, with an offline fallback catalog
//! - Sequential fan-out of one prompt to the caller's selected models
//! - Per-model error isolation in the comparison results

pub mod api;
pub mod catalog;
pub mod compare;
pub mod config;
pub mod error;
pub mod http;
pub mod logger;
