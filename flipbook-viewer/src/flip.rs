//! Navigation contract between the viewer and the flip widget.

use std::fmt;

/// Notification that the widget finished turning to a new spread.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FlipEvent {
    /// Zero-based index of the first visible page.
    pub page: usize,
}

impl FlipEvent {
    /// One-based page number shown in the footer.
    pub fn display_page(self) -> usize {
        self.page + 1
    }
}

/// Imperative handle of a page-turning widget.
///
/// Each method returns the completion notification when the visible spread
/// actually changed, and `None` when the request was a no-op.
pub trait PageFlip {
    /// Jumps to a zero-based page index.
    fn flip(&mut self, page: usize) -> Option<FlipEvent>;
    fn flip_next(&mut self) -> Option<FlipEvent>;
    fn flip_prev(&mut self) -> Option<FlipEvent>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlipAction {
    First,
    Last,
    Next,
    Prev,
}

impl fmt::Display for FlipAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::First => "first",
            Self::Last => "last",
            Self::Next => "next",
            Self::Prev => "prev",
        };
        f.write_str(name)
    }
}

/// Translates footer actions into widget commands.
///
/// The controller never tracks the current page; it only knows the page
/// count once the document reports it.
#[derive(Debug, Clone, Default)]
pub struct PageFlipController {
    total_pages: Option<usize>,
}

impl PageFlipController {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records the page count of a freshly loaded document.
    pub fn document_loaded(&mut self, total_pages: usize) {
        self.total_pages = Some(total_pages);
    }

    pub fn total_pages(&self) -> Option<usize> {
        self.total_pages
    }

    /// Issues `action` to the widget. An unmounted widget, or "last" before
    /// the page count is known, is silently ignored.
    pub fn go_to<B>(&self, book: Option<&mut B>, action: FlipAction) -> Option<FlipEvent>
    where
        B: PageFlip + ?Sized,
    {
        let Some(book) = book else {
            tracing::debug!(%action, "flip widget not mounted, ignoring navigation");
            return None;
        };

        match action {
            FlipAction::First => book.flip(0),
            FlipAction::Last => {
                let last = self.total_pages?.checked_sub(1)?;
                book.flip(last)
            }
            FlipAction::Next => book.flip_next(),
            FlipAction::Prev => book.flip_prev(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[derive(Debug, Clone, PartialEq, Eq)]
    enum Command {
        Jump(usize),
        Next,
        Prev,
    }

    #[derive(Default)]
    struct Recorder {
        commands: Vec<Command>,
    }

    impl PageFlip for Recorder {
        fn flip(&mut self, page: usize) -> Option<FlipEvent> {
            self.commands.push(Command::Jump(page));
            Some(FlipEvent { page })
        }

        fn flip_next(&mut self) -> Option<FlipEvent> {
            self.commands.push(Command::Next);
            None
        }

        fn flip_prev(&mut self) -> Option<FlipEvent> {
            self.commands.push(Command::Prev);
            None
        }
    }

    #[test]
    fn first_and_last_jump_to_absolute_indices() {
        let mut controller = PageFlipController::new();
        controller.document_loaded(8);
        let mut book = Recorder::default();

        controller.go_to(Some(&mut book), FlipAction::First);
        controller.go_to(Some(&mut book), FlipAction::Last);

        assert_eq!(book.commands, vec![Command::Jump(0), Command::Jump(7)]);
    }

    #[test]
    fn last_before_page_count_is_known_is_ignored() {
        let controller = PageFlipController::new();
        let mut book = Recorder::default();

        assert_eq!(controller.go_to(Some(&mut book), FlipAction::Last), None);
        assert!(book.commands.is_empty());
    }

    #[test]
    fn last_of_empty_document_is_ignored() {
        let mut controller = PageFlipController::new();
        controller.document_loaded(0);
        let mut book = Recorder::default();

        assert_eq!(controller.go_to(Some(&mut book), FlipAction::Last), None);
        assert!(book.commands.is_empty());
    }

    #[test]
    fn unmounted_widget_is_a_no_op() {
        let mut controller = PageFlipController::new();
        controller.document_loaded(8);

        assert_eq!(controller.go_to(None::<&mut Recorder>, FlipAction::Next), None);
    }

    #[test]
    fn relative_actions_delegate_to_widget() {
        let controller = PageFlipController::new();
        let mut book = Recorder::default();

        controller.go_to(Some(&mut book), FlipAction::Next);
        controller.go_to(Some(&mut book), FlipAction::Prev);

        assert_eq!(book.commands, vec![Command::Next, Command::Prev]);
    }

    #[test]
    fn action_names_are_lowercase() {
        assert_eq!(FlipAction::Last.to_string(), "last");
        assert_eq!(FlipAction::Prev.to_string(), "prev");
    }

    #[test]
    fn display_page_is_one_based() {
        assert_eq!(FlipEvent { page: 0 }.display_page(), 1);
    }
}
