use serde::{Deserialize, Serialize};

/// What happens at the ends of the result list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NavigationPolicy {
    #[default]
    Clamp,
    Wrap,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionEvent {
    Moved(Option<usize>),
    Committed(usize),
    Closed,
    Ignored,
}

/// Keyboard cursor over the flattened result list. `None` means nothing is
/// highlighted; otherwise the index is always valid for the current length.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionController {
    selected: Option<usize>,
    len: usize,
    policy: NavigationPolicy,
}

impl SelectionController {
    pub fn new(policy: NavigationPolicy) -> Self {
        Self {
            selected: None,
            len: 0,
            policy,
        }
    }

    pub fn policy(&self) -> NavigationPolicy {
        self.policy
    }

    pub fn selected_index(&self) -> Option<usize> {
        self.selected
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// A new result list arrived; nothing is highlighted.
    pub fn reset(&mut self, len: usize) {
        self.len = len;
        self.selected = None;
    }

    pub fn navigate_down(&mut self) -> SelectionEvent {
        if self.len == 0 {
            return SelectionEvent::Ignored;
        }
        let last = self.len - 1;
        self.selected = Some(match (self.selected, self.policy) {
            (None, _) => 0,
            (Some(current), NavigationPolicy::Wrap) if current >= last => 0,
            (Some(current), _) => (current + 1).min(last),
        });
        SelectionEvent::Moved(self.selected)
    }

    pub fn navigate_up(&mut self) -> SelectionEvent {
        if self.len == 0 {
            return SelectionEvent::Ignored;
        }
        let last = self.len - 1;
        let next = match (self.selected, self.policy) {
            (None, NavigationPolicy::Clamp) => return SelectionEvent::Ignored,
            (None, NavigationPolicy::Wrap) => last,
            (Some(0), NavigationPolicy::Clamp) => 0,
            (Some(0), NavigationPolicy::Wrap) => last,
            (Some(current), _) => (current - 1).min(last),
        };
        self.selected = Some(next);
        SelectionEvent::Moved(self.selected)
    }

    pub fn commit(&self) -> SelectionEvent {
        match self.selected {
            Some(index) if index < self.len => SelectionEvent::Committed(index),
            _ => SelectionEvent::Ignored,
        }
    }

    pub fn cancel(&mut self) -> SelectionEvent {
        self.selected = None;
        SelectionEvent::Closed
    }
}

#[cfg(test)]
mod tests {
    use super::{NavigationPolicy, SelectionController, SelectionEvent};

    #[test]
    fn clamps_at_both_ends() {
        let mut selection = SelectionController::new(NavigationPolicy::Clamp);
        selection.reset(3);

        assert_eq!(selection.navigate_up(), SelectionEvent::Ignored);
        assert_eq!(selection.selected_index(), None);
        for _ in 0..10 {
            selection.navigate_down();
        }
        assert_eq!(selection.selected_index(), Some(2));
        for _ in 0..10 {
            selection.navigate_up();
        }
        assert_eq!(selection.selected_index(), Some(0));
    }

    #[test]
    fn wraps_when_opted_in() {
        let mut selection = SelectionController::new(NavigationPolicy::Wrap);
        selection.reset(3);

        assert_eq!(selection.navigate_up(), SelectionEvent::Moved(Some(2)));
        assert_eq!(selection.navigate_down(), SelectionEvent::Moved(Some(0)));
        assert_eq!(selection.navigate_up(), SelectionEvent::Moved(Some(2)));
        assert_eq!(selection.navigate_down(), SelectionEvent::Moved(Some(0)));
    }

    #[test]
    fn empty_list_ignores_navigation() {
        let mut selection = SelectionController::default();
        assert_eq!(selection.navigate_down(), SelectionEvent::Ignored);
        assert_eq!(selection.commit(), SelectionEvent::Ignored);
        assert_eq!(selection.selected_index(), None);
    }

    #[test]
    fn new_results_and_cancel_reset_highlight() {
        let mut selection = SelectionController::default();
        selection.reset(2);
        selection.navigate_down();
        assert_eq!(selection.commit(), SelectionEvent::Committed(0));

        selection.reset(5);
        assert_eq!(selection.selected_index(), None);
        selection.navigate_down();
        assert_eq!(selection.cancel(), SelectionEvent::Closed);
        assert_eq!(selection.selected_index(), None);
    }
}
