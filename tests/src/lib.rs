//! # Credential Relay Test Suite
//!
//! Unified test crate wiring client and provider on one in-memory page.
//!
//! ## Structure
//!
//! ```text
//! tests/src/
//! ├── harness.rs        # Page, container, channels, router and client
//! ├── integration/      # End-to-end client/provider flows
//! │   ├── flows.rs
//! │   └── handshake.rs
//! └── exploits/         # Hostile content sharing the page
//!     └── spoofing.rs
//! ```
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test -p relay-tests
//! cargo test -p relay-tests exploits::
//! cargo bench -p relay-tests
//! ```

#![allow(dead_code)]

pub mod exploits;
pub mod harness;
pub mod integration;
