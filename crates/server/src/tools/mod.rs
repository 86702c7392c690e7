//! MCP tool implementations.
//!
//! This module contains all tools exposed by the datemark server.

pub mod date_headings;
