//! Integration tests for the fleetview-node binary
//!
//! The binary is driven end to end: a JSON-lines feed goes in on stdin or
//! through `--input`, state changes come out on stdout.

mod replay;
