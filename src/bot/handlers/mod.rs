//! Discord interaction handlers
//!
//! This module provides handlers for Discord interactions such as autocomplete,
//! plus the parsing of the values those handlers suggest.

/// Autocomplete handlers for customer names
pub mod autocomplete;
