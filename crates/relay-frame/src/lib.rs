//! # Relay Frame - Provider Container Management
//!
//! Creates and manages the container that hosts the provider, builds the
//! URL it loads, and owns the process-wide default container styling.
//!
//! ```text
//!   client page
//!   ┌───────────────────────────────────────────────┐
//!   │  HeadlessContainer / visual container         │
//!   │  ┌─────────────────────────────────────────┐  │
//!   │  │ provider window                         │  │
//!   │  │ src = base?client=<origin>&id=<instance>│  │
//!   │  └─────────────────────────────────────────┘  │
//!   │        ▲ target_reference() pins the channel  │
//!   └───────────────────────────────────────────────┘
//! ```

#![cfg_attr(test, allow(clippy::unwrap_used))]

pub mod config;
pub mod container;
pub mod headless;
pub mod style;

pub use config::{provider_frame_url, FrameConfig, FrameError};
pub use container::{FrameVisibility, ProviderContainer};
pub use headless::HeadlessContainer;
pub use style::{
    default_frame_stylesheet, stylesheet_installed, FrameStylesheet, HIDDEN_FRAME_CLASS,
    VISIBLE_FRAME_CLASS,
};
