//! Screen navigation and its side effects.

/// A top-level screen of the app.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Screen {
    /// Landing screen.
    #[default]
    Home,
    /// Live camera capture.
    Camera,
    /// File upload.
    Upload,
    /// Crop and enhancement editor.
    Preprocess,
    /// Waiting for the classifier.
    Loading,
    /// Classification result.
    Results,
    /// Saved results.
    History,
    /// About and disclaimer.
    Info,
}

impl Screen {
    /// Screens reachable from the bottom navigation bar, in display order.
    pub const NAV: [Self; 4] = [Self::Home, Self::Camera, Self::History, Self::Info];

    /// Short label for navigation and titles.
    #[must_use]
    pub const fn title(self) -> &'static str {
        match self {
            Self::Home => "Home",
            Self::Camera => "Scan",
            Self::Upload => "Upload",
            Self::Preprocess => "Adjust",
            Self::Loading => "Analyzing",
            Self::Results => "Results",
            Self::History => "History",
            Self::Info => "Info",
        }
    }

    /// Whether the bottom navigation bar is shown on this screen.
    #[must_use]
    pub const fn shows_nav(self) -> bool {
        !matches!(self, Self::Camera | Self::Preprocess | Self::Loading)
    }
}

/// Work the shell must perform on a screen change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScreenEffect {
    /// Release the camera stream.
    StopCamera,
    /// Acquire (or re-acquire) the camera stream.
    StartCamera,
    /// Reload history from storage.
    LoadHistory,
}

/// Tracks the current screen and derives side effects of moving between
/// screens.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Navigator {
    current: Screen,
}

impl Navigator {
    /// A navigator on the home screen.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            current: Screen::Home,
        }
    }

    /// The screen currently shown.
    #[must_use]
    pub const fn current(&self) -> Screen {
        self.current
    }

    /// Switch to `to`, returning effects in the order they must run.
    ///
    /// Entering the camera screen always (re)acquires the stream, even
    /// when already there; leaving it always releases the stream.
    pub fn show(&mut self, to: Screen) -> Vec<ScreenEffect> {
        let from = std::mem::replace(&mut self.current, to);
        let mut effects = Vec::new();
        if from == Screen::Camera || to == Screen::Camera {
            effects.push(ScreenEffect::StopCamera);
        }
        match to {
            Screen::Camera => effects.push(ScreenEffect::StartCamera),
            Screen::History => effects.push(ScreenEffect::LoadHistory),
            _ => {}
        }
        if from != to {
            tracing::debug!(?from, ?to, "screen change");
        }
        effects
    }

    /// The document became hidden. Releases the camera if it is showing.
    #[must_use]
    pub fn on_hidden(&self) -> Option<ScreenEffect> {
        (self.current == Screen::Camera).then_some(ScreenEffect::StopCamera)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_home() {
        assert_eq!(Navigator::new().current(), Screen::Home);
        assert_eq!(Navigator::default().current(), Screen::Home);
    }

    #[test]
    fn entering_camera_restarts_stream() {
        let mut nav = Navigator::new();
        assert_eq!(
            nav.show(Screen::Camera),
            vec![ScreenEffect::StopCamera, ScreenEffect::StartCamera]
        );
        assert_eq!(nav.current(), Screen::Camera);
    }

    #[test]
    fn leaving_camera_stops_stream() {
        let mut nav = Navigator::new();
        nav.show(Screen::Camera);
        assert_eq!(nav.show(Screen::Preprocess), vec![ScreenEffect::StopCamera]);
    }

    #[test]
    fn entering_history_reloads() {
        let mut nav = Navigator::new();
        assert_eq!(nav.show(Screen::History), vec![ScreenEffect::LoadHistory]);
        assert_eq!(nav.show(Screen::History), vec![ScreenEffect::LoadHistory]);
    }

    #[test]
    fn camera_to_history_stops_then_loads() {
        let mut nav = Navigator::new();
        nav.show(Screen::Camera);
        assert_eq!(
            nav.show(Screen::History),
            vec![ScreenEffect::StopCamera, ScreenEffect::LoadHistory]
        );
    }

    #[test]
    fn plain_screens_have_no_effects() {
        let mut nav = Navigator::new();
        for screen in [Screen::Upload, Screen::Preprocess, Screen::Loading, Screen::Results] {
            assert!(nav.show(screen).is_empty());
        }
    }

    #[test]
    fn hidden_document_stops_camera_only_on_camera_screen() {
        let mut nav = Navigator::new();
        assert_eq!(nav.on_hidden(), None);
        nav.show(Screen::Camera);
        assert_eq!(nav.on_hidden(), Some(ScreenEffect::StopCamera));
    }

    #[test]
    fn nav_bar_visibility() {
        assert!(Screen::Home.shows_nav());
        assert!(Screen::History.shows_nav());
        assert!(!Screen::Camera.shows_nav());
        assert!(!Screen::Preprocess.shows_nav());
    }
}
