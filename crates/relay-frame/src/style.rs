//! Default container styling, installed once per process.

use once_cell::sync::OnceCell;
use tracing::debug;

/// Class of a container that is not shown.
pub const HIDDEN_FRAME_CLASS: &str = "relay-hidden";

/// Class of a displayed container.
pub const VISIBLE_FRAME_CLASS: &str = "relay-visible";

const DEFAULT_FRAME_CSS: &str = "
.relay-hidden {
  display: none;
}

.relay-visible {
  position: fixed;
  border: none;
  z-index: 9999;
  bottom: 0;
  left: 0;
  width: 100%;
}

@media (min-width:801px) {
  .relay-visible {
    position: fixed;
    left: auto;
    top: 16px;
    right: 16px;
    width: 320px;
    height: 480px;
  }
}
";

/// Shared stylesheet every container on the page relies on.
#[derive(Debug, PartialEq, Eq)]
pub struct FrameStylesheet {
    pub css: &'static str,
    pub hidden_class: &'static str,
    pub visible_class: &'static str,
}

static DEFAULT_STYLESHEET: OnceCell<FrameStylesheet> = OnceCell::new();

/// The process-wide default stylesheet, installed on first use.
pub fn default_frame_stylesheet() -> &'static FrameStylesheet {
    DEFAULT_STYLESHEET.get_or_init(|| {
        debug!("Default frame stylesheet installed");
        FrameStylesheet {
            css: DEFAULT_FRAME_CSS,
            hidden_class: HIDDEN_FRAME_CLASS,
            visible_class: VISIBLE_FRAME_CLASS,
        }
    })
}

pub fn stylesheet_installed() -> bool {
    DEFAULT_STYLESHEET.get().is_some()
}
