//! # Provider Container Port
//!
//! The embedded context hosting the provider. The relay core only needs its
//! addressable identity to pin a channel; the visual hooks belong to
//! page-level orchestration and the core never calls them.

use crate::style::{HIDDEN_FRAME_CLASS, VISIBLE_FRAME_CLASS};
use relay_types::{DisplayOptions, Origin, PeerIdentity, WindowId};
use std::fmt;

/// Whether a container is currently shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum FrameVisibility {
    #[default]
    Hidden,
    Visible,
}

impl FrameVisibility {
    /// Stylesheet class for this state.
    pub fn class_name(&self) -> &'static str {
        match self {
            FrameVisibility::Hidden => HIDDEN_FRAME_CLASS,
            FrameVisibility::Visible => VISIBLE_FRAME_CLASS,
        }
    }
}

impl fmt::Display for FrameVisibility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            FrameVisibility::Hidden => "hidden",
            FrameVisibility::Visible => "visible",
        })
    }
}

/// Container holding the provider's window.
pub trait ProviderContainer: Send + Sync {
    /// The provider window, or `None` once the container is destroyed.
    fn target_reference(&self) -> Option<WindowId>;

    /// Show the container.
    fn display(&self, options: DisplayOptions);

    /// Hide the container and reset any display height.
    fn hide(&self);

    /// Tear the container down. Idempotent.
    fn destroy(&self);

    /// Identity a client channel should pin for this container.
    fn peer_identity(&self, provider_origin: Origin) -> Option<PeerIdentity> {
        self.target_reference()
            .map(|window| PeerIdentity::new(provider_origin, window))
    }
}
