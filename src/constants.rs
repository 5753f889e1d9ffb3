//! # Constants and type definitions for spiacs
//!
//! This module centralizes the **time constants**, **payload markers**, and **type aliases**
//! shared by the light-curve pipeline.
//!
//! ## Overview
//!
//! - Day/second conversion and the INTEGRAL mission epoch
//! - Sentinel strings the SPI-ACS backend uses to report an empty interval
//! - Parsing and rebinning thresholds
//! - Core type aliases used across the crate

// -------------------------------------------------------------------------------------------------
// Time constants
// -------------------------------------------------------------------------------------------------

/// Number of seconds in a day
pub const SECONDS_PER_DAY: f64 = 86_400.0;

/// MJD of the INTEGRAL mission reference (IJD 0.0 = 2000-01-01T00:00:00 TT)
pub const INTEGRAL_MJDREF: f64 = 51544.0;

/// Number of decimal digits kept when rounding timestamp deltas (seconds) before
/// looking for the native cadence.
pub const CADENCE_ROUNDING_DIGITS: i32 = 3;

/// Samples closer than this to a bucket edge are assigned to the bucket starting at that edge.
pub const EDGE_TOLERANCE_SECONDS: f64 = 5e-4;

/// Relative tolerance applied to `requested / native` before flooring it.
pub const BIN_RATIO_TOLERANCE: f64 = 1e-9;

// -------------------------------------------------------------------------------------------------
// Payload markers and limits
// -------------------------------------------------------------------------------------------------

/// Substrings the backend writes instead of data when the interval is empty
pub const NO_DATA_MARKERS: [&str; 2] = ["ZeroData", "NoData"];

/// Marker reported when the payload carries no text at all
pub const EMPTY_PAYLOAD_MARKER: &str = "<empty>";

/// Substrings the backend writes when it refuses a request for resource reasons
pub const BACKEND_REFUSAL_MARKERS: [&str; 2] = ["this service are limited", "Over revolution"];

/// Refusal messages are short; longer bodies are never scanned for them
pub const REFUSAL_SCAN_MAX_BYTES: usize = 8000;

/// Maximum number of characters of raw payload kept in an error
pub const RAW_EXCERPT_MAX_CHARS: usize = 500;

/// Minimum number of rows a payload must contain to be analysed
pub const MIN_ROWS: usize = 101;

/// Column names looked up in the structured payload
pub const IJD_COLUMN: &str = "ijd";
pub const COUNTS_COLUMN: &str = "counts";

// -------------------------------------------------------------------------------------------------
// Type aliases
// -------------------------------------------------------------------------------------------------

/// INTEGRAL Julian Date (days since [`INTEGRAL_MJDREF`], TT)
pub type IJD = f64;
/// Duration or time offset in seconds
pub type Seconds = f64;
/// Count rate in counts per second
pub type CountRate = f64;
