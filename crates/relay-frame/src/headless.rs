//! In-memory container for tests and non-visual hosts.

use crate::config::{FrameConfig, FrameError};
use crate::container::{FrameVisibility, ProviderContainer};
use crate::style::{default_frame_stylesheet, FrameStylesheet};
use parking_lot::Mutex;
use relay_channel::{InMemoryPage, InMemoryWindow};
use relay_types::{DisplayOptions, Origin, WindowId};
use tracing::debug;
use url::Url;

#[derive(Debug, Default)]
struct HeadlessState {
    visibility: FrameVisibility,
    height: Option<u32>,
    destroyed: bool,
}

/// Container backed by a window on an [`InMemoryPage`].
///
/// Records what a visual container would show without rendering anything.
pub struct HeadlessContainer {
    page: InMemoryPage,
    window: InMemoryWindow,
    src: Url,
    stylesheet: &'static FrameStylesheet,
    state: Mutex<HeadlessState>,
}

impl HeadlessContainer {
    /// Open the provider window for `client_origin`. Starts hidden.
    pub fn open(
        page: &InMemoryPage,
        config: &FrameConfig,
        client_origin: &Origin,
    ) -> Result<Self, FrameError> {
        let src = config.provider_url(client_origin)?;
        let provider_origin = config.provider_origin()?;
        let stylesheet = default_frame_stylesheet();
        let window = page.open_window(provider_origin);

        debug!(
            window = %window.id(),
            instance = %config.instance_id,
            src = %src,
            "Provider container opened"
        );
        Ok(Self {
            page: page.clone(),
            window,
            src,
            stylesheet,
            state: Mutex::new(HeadlessState::default()),
        })
    }

    /// The provider's end of the transport, for wiring provider-side logic.
    pub fn provider_window(&self) -> &InMemoryWindow {
        &self.window
    }

    /// URL the container loaded.
    pub fn src(&self) -> &Url {
        &self.src
    }

    pub fn visibility(&self) -> FrameVisibility {
        self.state.lock().visibility
    }

    /// Current stylesheet class.
    pub fn class_name(&self) -> &'static str {
        match self.visibility() {
            FrameVisibility::Hidden => self.stylesheet.hidden_class,
            FrameVisibility::Visible => self.stylesheet.visible_class,
        }
    }

    /// Height requested by the last `display`, cleared by `hide`.
    pub fn height(&self) -> Option<u32> {
        self.state.lock().height
    }

    pub fn is_destroyed(&self) -> bool {
        self.state.lock().destroyed
    }
}

impl ProviderContainer for HeadlessContainer {
    fn target_reference(&self) -> Option<WindowId> {
        if self.state.lock().destroyed {
            None
        } else {
            Some(self.window.id())
        }
    }

    fn display(&self, options: DisplayOptions) {
        let mut state = self.state.lock();
        if state.destroyed {
            return;
        }
        state.visibility = FrameVisibility::Visible;
        if options.height.is_some() {
            state.height = options.height;
        }
    }

    fn hide(&self) {
        let mut state = self.state.lock();
        state.visibility = FrameVisibility::Hidden;
        state.height = None;
    }

    fn destroy(&self) {
        {
            let mut state = self.state.lock();
            if state.destroyed {
                return;
            }
            state.destroyed = true;
            state.visibility = FrameVisibility::Hidden;
            state.height = None;
        }
        self.page.close_window(self.window.id());
        debug!(window = %self.window.id(), "Provider container destroyed");
    }
}

impl Drop for HeadlessContainer {
    fn drop(&mut self) {
        self.destroy();
    }
}
