use super::command::{Action, TiltLabel};

/// Turns the continuous head-tilt signal into discrete actions.
///
/// The classifier reports a label for every camera frame, so holding a tilt
/// repeats the same label many times per second. An action fires only on the
/// rising edge out of [`TiltLabel::Center`]; the signal has to return to the
/// center before the next action can fire.
///
/// ```
/// use tiltris_engine::{Action, GestureDebouncer, TiltLabel};
///
/// let mut debouncer = GestureDebouncer::new();
/// assert_eq!(debouncer.observe(TiltLabel::Left), Some(Action::MoveLeft));
/// assert_eq!(debouncer.observe(TiltLabel::Left), None);
/// assert_eq!(debouncer.observe(TiltLabel::Center), None);
/// assert_eq!(debouncer.observe(TiltLabel::Left), Some(Action::MoveLeft));
/// ```
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct GestureDebouncer {
    last_label: TiltLabel,
}

impl GestureDebouncer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn last_label(&self) -> &TiltLabel {
        &self.last_label
    }

    /// Records `label` and returns the action to perform, if any.
    ///
    /// The label is remembered even when it maps to no action.
    pub fn observe(&mut self, label: TiltLabel) -> Option<Action> {
        let action = if self.last_label.is_center() {
            label.action()
        } else {
            None
        };
        self.last_label = label;
        action
    }

    pub fn reset(&mut self) {
        self.last_label = TiltLabel::Center;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn feed(debouncer: &mut GestureDebouncer, labels: &[&str]) -> Vec<Option<Action>> {
        labels
            .iter()
            .map(|&label| debouncer.observe(TiltLabel::from(label)))
            .collect()
    }

    #[test]
    fn test_fires_only_on_leaving_center() {
        let mut debouncer = GestureDebouncer::new();
        let actions = feed(
            &mut debouncer,
            &["Center", "Tilted Left", "Tilted Left", "Center", "Tilted Left"],
        );
        assert_eq!(
            actions,
            [None, Some(Action::MoveLeft), None, None, Some(Action::MoveLeft)]
        );
    }

    #[test]
    fn test_non_center_to_non_center_does_not_fire() {
        let mut debouncer = GestureDebouncer::new();
        let actions = feed(&mut debouncer, &["Tilted Up", "Tilted Down", "Tilted Right"]);
        assert_eq!(actions, [Some(Action::Rotate), None, None]);
    }

    #[test]
    fn test_unknown_label_blocks_next_edge() {
        let mut debouncer = GestureDebouncer::new();
        let actions = feed(
            &mut debouncer,
            &["No Face Detected", "Tilted Left", "Center", "Tilted Down"],
        );
        assert_eq!(actions, [None, None, None, Some(Action::Drop)]);
        assert_eq!(debouncer.last_label(), &TiltLabel::Down);
    }

    #[test]
    fn test_reset_returns_to_center() {
        let mut debouncer = GestureDebouncer::new();
        debouncer.observe(TiltLabel::Right);
        debouncer.reset();
        assert_eq!(debouncer.observe(TiltLabel::Right), Some(Action::MoveRight));
    }
}
