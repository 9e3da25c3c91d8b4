use egui::ViewportCommand;
use tracing::debug;

/// How much window chrome the reader shows around the pages.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ChromeVisibility {
    pub fullscreen: bool,
    pub decorations: bool,
}

impl Default for ChromeVisibility {
    fn default() -> Self {
        Self {
            fullscreen: true,
            decorations: false,
        }
    }
}

impl ChromeVisibility {
    pub fn windowed() -> Self {
        Self {
            fullscreen: false,
            decorations: true,
        }
    }

    pub fn commands(&self) -> Vec<ViewportCommand> {
        vec![
            ViewportCommand::Fullscreen(self.fullscreen),
            ViewportCommand::Decorations(self.decorations),
        ]
    }

    pub fn apply(&self, ctx: &egui::Context) {
        debug!("Applying chrome {:?}", self);
        for command in self.commands() {
            ctx.send_viewport_cmd(command);
        }
    }
}

/// Decides when the chrome setting is (re)applied: on the first frame and
/// every time the window regains focus.
#[derive(Default)]
pub struct ChromeState {
    was_focused: Option<bool>,
}

impl ChromeState {
    /// Returns `true` when the setting should be applied this frame.
    pub fn on_frame(&mut self, focused: bool) -> bool {
        let apply = match self.was_focused {
            None => true,
            Some(was) => focused && !was,
        };
        self.was_focused = Some(focused);
        apply
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn applies_on_first_frame_and_focus_gain_only() {
        let mut state = ChromeState::default();
        assert!(state.on_frame(true));
        assert!(!state.on_frame(true));
        assert!(!state.on_frame(false));
        assert!(!state.on_frame(false));
        assert!(state.on_frame(true));
        assert!(!state.on_frame(true));
    }

    #[test]
    fn default_hides_window_chrome() {
        let commands = ChromeVisibility::default().commands();
        assert_eq!(commands.len(), 2);
        assert!(matches!(commands[0], ViewportCommand::Fullscreen(true)));
        assert!(matches!(commands[1], ViewportCommand::Decorations(false)));
    }

    #[test]
    fn windowed_keeps_decorations() {
        let commands = ChromeVisibility::windowed().commands();
        assert!(matches!(commands[0], ViewportCommand::Fullscreen(false)));
        assert!(matches!(commands[1], ViewportCommand::Decorations(true)));
    }
}
