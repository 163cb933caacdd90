use serde::Serialize;

/// What a toggle did to the selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum SelectionEvent {
    Deselected { index: usize },
    StartSelected { index: usize },
    /// Two nodes selected; a route can be computed
    Ready { start: usize, end: usize },
    /// A third node was picked, so the selection starts over from it
    Restarted { index: usize },
}

/// Start/end node pair being assembled by successive picks
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    nodes: Vec<usize>,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn toggle(&mut self, index: usize) -> SelectionEvent {
        if let Some(position) = self.nodes.iter().position(|&n| n == index) {
            self.nodes.remove(position);
            return SelectionEvent::Deselected { index };
        }

        self.nodes.push(index);
        match self.nodes.as_slice() {
            [_] => SelectionEvent::StartSelected { index },
            [start, end] => SelectionEvent::Ready {
                start: *start,
                end: *end,
            },
            _ => {
                self.nodes.clear();
                self.nodes.push(index);
                SelectionEvent::Restarted { index }
            }
        }
    }

    pub fn clear(&mut self) {
        self.nodes.clear();
    }

    pub fn nodes(&self) -> &[usize] {
        &self.nodes
    }

    pub fn start(&self) -> Option<usize> {
        self.nodes.first().copied()
    }

    pub fn end(&self) -> Option<usize> {
        self.nodes.get(1).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_two_picks_make_a_pair() {
        let mut selection = Selection::new();

        assert_eq!(selection.toggle(4), SelectionEvent::StartSelected { index: 4 });
        assert_eq!(selection.toggle(9), SelectionEvent::Ready { start: 4, end: 9 });
        assert_eq!(selection.start(), Some(4));
        assert_eq!(selection.end(), Some(9));
    }

    #[test]
    fn test_third_pick_restarts() {
        let mut selection = Selection::new();
        selection.toggle(1);
        selection.toggle(2);

        assert_eq!(selection.toggle(3), SelectionEvent::Restarted { index: 3 });
        assert_eq!(selection.nodes(), &[3]);
    }

    #[test]
    fn test_pick_again_deselects() {
        let mut selection = Selection::new();
        selection.toggle(1);
        selection.toggle(2);

        assert_eq!(selection.toggle(1), SelectionEvent::Deselected { index: 1 });
        assert_eq!(selection.nodes(), &[2]);
        // Remaining node becomes the start of the next pair
        assert_eq!(selection.toggle(5), SelectionEvent::Ready { start: 2, end: 5 });
    }

    #[test]
    fn test_clear() {
        let mut selection = Selection::new();
        selection.toggle(0);
        selection.clear();
        assert!(selection.nodes().is_empty());
        assert_eq!(selection.start(), None);
    }

    #[test]
    fn test_event_json_shape() {
        let json = serde_json::to_string(&SelectionEvent::Ready { start: 1, end: 2 }).unwrap();
        assert_eq!(json, r#"{"event":"ready","start":1,"end":2}"#);
    }
}
