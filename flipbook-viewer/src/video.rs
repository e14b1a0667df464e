//! Corner video overlay: a thumbnail that can be hidden, expanded into a
//! modal, and muted. Playback itself is handed to the system player.

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VideoOverlay {
    url: String,
    visible: bool,
    expanded: bool,
    muted: bool,
}

impl VideoOverlay {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            visible: true,
            expanded: false,
            muted: true,
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn is_expanded(&self) -> bool {
        self.expanded
    }

    pub fn is_muted(&self) -> bool {
        self.muted
    }

    pub fn toggle_visibility(&mut self) {
        self.visible = !self.visible;
    }

    /// Only a visible thumbnail can be expanded.
    pub fn expand(&mut self) {
        if self.visible {
            self.expanded = true;
        }
    }

    pub fn close(&mut self) {
        self.expanded = false;
    }

    pub fn toggle_mute(&mut self) {
        self.muted = !self.muted;
    }
}
