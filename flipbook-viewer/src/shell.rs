//! Composition root: owns sizing, gesture and navigation state and wires
//! them into the iced update loop.

use std::path::PathBuf;
use std::time::Instant;

use iced::widget::{
    column, container, image, mouse_area, scrollable, stack, text, Column,
};
use iced::{event, keyboard, mouse, touch, window, Color, ContentFit, Element, Event, Length};
use iced::{Point, Size, Subscription, Task};

use crate::book::{FlipBook, Side};
use crate::chrome::{self, FooterProps};
use crate::document::{self, BookDocument, Fetched, PageSource, RenderedPages};
use crate::error::ViewerError;
use crate::flip::{FlipAction, FlipEvent, PageFlip, PageFlipController};
use crate::gesture::{Classification, GestureClassifier, Position};
use crate::platform;
use crate::renderer::PdfRenderer;
use crate::video::VideoOverlay;
use crate::viewport::Viewport;

/// Launch-time choices for one viewer instance.
#[derive(Debug, Clone)]
pub struct ViewerSettings {
    pub source: PageSource,
    pub title: String,
    pub share_url: String,
    pub video_url: Option<String>,
}

#[derive(Debug, Clone)]
pub enum Message {
    Fetched(Result<Fetched, ViewerError>),
    PagesRendered(RenderedPages),
    WindowResized(Size),
    WindowModeChanged(window::Mode),

    PointerPressed,
    PointerReleased,
    /// Button or finger released away from the book.
    PointerLifted,
    PointerMoved(Point),
    TouchPressed(Point),

    Navigate(FlipAction),
    ZoomIn,
    ZoomOut,
    ZoomReset,

    ToggleFullscreen,
    Share,
    Print,
    Download,
    DownloadFinished(Result<Option<PathBuf>, ViewerError>),
    DismissNotice,

    ToggleVideo,
    ExpandVideo,
    CloseVideo,
    PlayVideo,
    ToggleMute,
}

enum LoadState {
    Loading,
    Failed(ViewerError),
    Ready(BookDocument),
}

pub struct FlipbookViewer {
    settings: ViewerSettings,
    renderer: Option<PdfRenderer>,
    load: LoadState,
    /// Exists once the page count is known.
    book: Option<FlipBook>,
    controller: PageFlipController,
    gesture: GestureClassifier,
    viewport: Viewport,
    /// One-based; only ever set from flip notifications.
    current_page: usize,
    fullscreen: bool,
    /// Last pointer position in window coordinates.
    pointer: Position,
    notice: Option<String>,
    video: Option<VideoOverlay>,
}

impl FlipbookViewer {
    pub fn new(settings: ViewerSettings) -> (Self, Task<Message>) {
        let fetch = Task::perform(
            document::fetch(settings.source.clone()),
            Message::Fetched,
        );
        let initial_size = window::get_oldest()
            .and_then(window::get_size)
            .map(Message::WindowResized);

        let viewer = Self {
            video: settings.video_url.clone().map(VideoOverlay::new),
            settings,
            renderer: None,
            load: LoadState::Loading,
            book: None,
            controller: PageFlipController::new(),
            gesture: GestureClassifier::default(),
            viewport: Viewport::default(),
            current_page: 1,
            fullscreen: false,
            pointer: Position::default(),
            notice: None,
        };

        (viewer, Task::batch([fetch, initial_size]))
    }

    pub fn title(&self) -> String {
        self.settings.title.clone()
    }

    pub fn update(&mut self, message: Message) -> Task<Message> {
        match message {
            Message::Fetched(result) => {
                self.load = match result.and_then(|fetched| self.open(fetched)) {
                    Ok(document) => {
                        let total = document.page_count();
                        tracing::info!(pages = total, "document loaded");
                        self.controller.document_loaded(total);
                        self.book = Some(FlipBook::new(total, 0, self.viewport.class()));
                        self.current_page = 1;
                        LoadState::Ready(document)
                    }
                    Err(e) => {
                        tracing::error!("Failed to load document: {}", e);
                        LoadState::Failed(e)
                    }
                };
                return self.prepare_visible_pages();
            }
            Message::PagesRendered(rendered) => {
                if let LoadState::Ready(document) = &mut self.load {
                    document.store(rendered);
                }
            }
            Message::WindowResized(size) => {
                if self.viewport.resize(size.width, size.height) {
                    let class = self.viewport.class();
                    let event = self.book.as_mut().and_then(|book| book.set_orientation(class));
                    if let Some(event) = event {
                        self.current_page = event.display_page();
                    }
                }
                return self.prepare_visible_pages();
            }
            Message::WindowModeChanged(mode) => {
                self.fullscreen = mode == window::Mode::Fullscreen;
            }
            Message::PointerMoved(position) => {
                self.pointer = Position::new(position.x, position.y);
                let dragging = self.gesture.pointer_move(self.pointer);
                if let Some(book) = self.book.as_mut() {
                    book.set_click_forwarding(!dragging);
                }
            }
            Message::TouchPressed(position) => {
                self.pointer = Position::new(position.x, position.y);
                // The book's press may arrive first, with the previous touch
                // position as its origin. Hold time still counts from it.
                self.gesture.relocate(self.pointer);
            }
            Message::PointerPressed => {
                self.gesture.pointer_down(self.pointer, Instant::now());
                if let Some(book) = self.book.as_mut() {
                    book.set_click_forwarding(true);
                }
            }
            Message::PointerReleased => {
                let classification = self.gesture.pointer_up_now();
                let event = self.release(classification);
                return self.flipped(event);
            }
            Message::PointerLifted => {
                if self.gesture.is_active() {
                    let classification = self.gesture.pointer_up_now();
                    tracing::debug!(?classification, "pointer released off the book");
                }
                if let Some(book) = self.book.as_mut() {
                    book.set_click_forwarding(true);
                }
            }
            Message::Navigate(action) => {
                let event = self.controller.go_to(self.book.as_mut(), action);
                return self.flipped(event);
            }
            Message::ZoomIn => {
                self.viewport.zoom_in();
                return self.prepare_visible_pages();
            }
            Message::ZoomOut => {
                self.viewport.zoom_out();
                return self.prepare_visible_pages();
            }
            Message::ZoomReset => {
                self.viewport.reset_zoom();
                return self.prepare_visible_pages();
            }
            Message::ToggleFullscreen => {
                return platform::set_fullscreen(!self.fullscreen, Message::WindowModeChanged);
            }
            Message::Share => {
                self.notice = Some("Link copied to clipboard!".to_string());
                return platform::share_link(self.settings.share_url.clone());
            }
            Message::Print => {
                let page = self.current_page.saturating_sub(1);
                if let Some(path) = self.settings.source.page_file(page) {
                    if let Err(e) = platform::print(path) {
                        tracing::warn!("{}", e);
                        self.notice = Some("Printing is not available.".to_string());
                    }
                }
            }
            Message::Download => {
                let page = self.current_page.saturating_sub(1);
                if let Some(path) = self.settings.source.page_file(page) {
                    let name = self.settings.source.suggested_file_name(page);
                    return Task::perform(
                        platform::download(path.to_path_buf(), name),
                        Message::DownloadFinished,
                    );
                }
            }
            Message::DownloadFinished(result) => match result {
                Ok(Some(path)) => {
                    tracing::info!(path = %path.display(), "document downloaded");
                    self.notice = Some(format!("Saved to {}", path.display()));
                }
                Ok(None) => {}
                Err(e) => {
                    tracing::warn!("{}", e);
                    self.notice = Some("Download failed.".to_string());
                }
            },
            Message::DismissNotice => {
                self.notice = None;
            }
            Message::ToggleVideo => {
                if let Some(video) = self.video.as_mut() {
                    video.toggle_visibility();
                }
            }
            Message::ExpandVideo => {
                if let Some(video) = self.video.as_mut() {
                    video.expand();
                }
            }
            Message::CloseVideo => {
                if let Some(video) = self.video.as_mut() {
                    video.close();
                }
            }
            Message::PlayVideo => {
                if let Some(video) = self.video.as_ref() {
                    if let Err(e) = platform::open_external(video.url()) {
                        tracing::warn!("{}", e);
                        self.notice = Some("Could not open the video.".to_string());
                    }
                }
            }
            Message::ToggleMute => {
                if let Some(video) = self.video.as_mut() {
                    video.toggle_mute();
                }
            }
        }
        Task::none()
    }

    /// Window resize, pointer tracking and keyboard navigation. Each stream
    /// is active only while the viewer is running.
    pub fn subscription(&self) -> Subscription<Message> {
        Subscription::batch([
            window::resize_events().map(|(_id, size)| Message::WindowResized(size)),
            event::listen_with(pointer_event),
            keyboard::on_key_press(navigation_key),
        ])
    }

    pub fn view(&self) -> Element<'_, Message> {
        let mut page = Column::new().push(chrome::header(&self.settings.title));

        if let Some(notice) = &self.notice {
            page = page.push(chrome::notice(notice));
        }

        let body = container(self.body())
            .width(Length::Fill)
            .height(Length::Fill)
            .center_x(Length::Fill)
            .center_y(Length::Fill)
            .padding(8);

        let footer = chrome::footer(FooterProps {
            current_page: self.current_page,
            total_pages: self.controller.total_pages().unwrap_or(0),
            zoom: self.viewport.zoom(),
            can_zoom_in: self.viewport.can_zoom_in(),
            can_zoom_out: self.viewport.can_zoom_out(),
            fullscreen: self.fullscreen,
            muted: self.video.as_ref().map(VideoOverlay::is_muted),
        });

        let content: Element<'_, Message> = column![page, body, footer].into();

        match &self.video {
            Some(video) => stack![content, chrome::video_overlay(video)].into(),
            None => content,
        }
    }

    fn open(&mut self, fetched: Fetched) -> Result<BookDocument, ViewerError> {
        match fetched {
            Fetched::Images(handles) => BookDocument::from_images(handles),
            Fetched::Pdf(bytes) => {
                let renderer = match self.renderer {
                    Some(renderer) => renderer,
                    None => {
                        let renderer = PdfRenderer::new()
                            .map_err(|e| ViewerError::Decode(format!("{e:#}")))?;
                        self.renderer = Some(renderer);
                        renderer
                    }
                };
                BookDocument::from_pdf(bytes, &renderer)
            }
        }
    }

    /// Applies a finished press to the book: taps are forwarded as clicks,
    /// drags and holds send the book back to the page it was on.
    fn release(&mut self, classification: Classification) -> Option<FlipEvent> {
        let book = self.book.as_mut()?;

        let event = if classification.should_suppress_flip() {
            book.flip(self.current_page.saturating_sub(1))
        } else if classification == Classification::Tap {
            let (window_width, _) = self.viewport.size();
            book.click(Side::at(self.pointer.x, window_width))
        } else {
            None
        };

        book.set_click_forwarding(true);
        event
    }

    fn flipped(&mut self, event: Option<FlipEvent>) -> Task<Message> {
        match event {
            Some(event) => {
                self.current_page = event.display_page();
                self.prepare_visible_pages()
            }
            None => Task::none(),
        }
    }

    /// Starts rasterising visible pages that are not cached yet.
    fn prepare_visible_pages(&mut self) -> Task<Message> {
        let (Some(book), LoadState::Ready(document), Some(renderer)) =
            (&self.book, &mut self.load, self.renderer)
        else {
            return Task::none();
        };

        match document.render_job(&book.visible_pages(), self.viewport.render_width()) {
            Some(job) => Task::perform(job.run(renderer), Message::PagesRendered),
            None => Task::none(),
        }
    }

    fn body(&self) -> Element<'_, Message> {
        match &self.load {
            LoadState::Loading => text("Loading document, please wait...").size(20).into(),
            LoadState::Failed(e) => column![
                text("Could not load the document. Check the path or file.")
                    .size(20)
                    .color(Color::from_rgb8(0xef, 0x44, 0x44)),
                text(e.to_string()).size(14),
            ]
            .spacing(8)
            .into(),
            LoadState::Ready(document) => {
                let Some(book) = &self.book else {
                    return text("No document loaded").into();
                };

                let (width, height) = self.viewport.page_size();
                let render_width = self.viewport.render_width();
                let spread = book.view(|index| {
                    match document.page(index, render_width) {
                        Some(handle) => image(handle)
                            .width(Length::Fixed(width))
                            .height(Length::Fixed(height))
                            .content_fit(ContentFit::Contain)
                            .into(),
                        None => container(text("Rendering page..."))
                            .center_x(Length::Fixed(width))
                            .center_y(Length::Fixed(height))
                            .into(),
                    }
                });

                let surface = mouse_area(spread)
                    .on_press(Message::PointerPressed)
                    .on_release(Message::PointerReleased);

                if self.viewport.zoom() > 1.0 {
                    scrollable(surface)
                        .direction(scrollable::Direction::Both {
                            vertical: scrollable::Scrollbar::default(),
                            horizontal: scrollable::Scrollbar::default(),
                        })
                        .into()
                } else {
                    surface.into()
                }
            }
        }
    }
}

fn pointer_event(event: Event, status: event::Status, _window: window::Id) -> Option<Message> {
    match event {
        // Releases over the book are captured by its mouse area.
        Event::Mouse(mouse::Event::ButtonReleased(mouse::Button::Left))
        | Event::Touch(touch::Event::FingerLifted { .. })
            if status == event::Status::Ignored =>
        {
            Some(Message::PointerLifted)
        }
        Event::Touch(touch::Event::FingerLost { .. }) => Some(Message::PointerLifted),
        Event::Mouse(mouse::Event::CursorMoved { position }) => {
            Some(Message::PointerMoved(position))
        }
        Event::Touch(touch::Event::FingerPressed { position, .. }) => {
            Some(Message::TouchPressed(position))
        }
        Event::Touch(touch::Event::FingerMoved { position, .. }) => {
            Some(Message::PointerMoved(position))
        }
        _ => None,
    }
}

fn navigation_key(key: keyboard::Key, _modifiers: keyboard::Modifiers) -> Option<Message> {
    use keyboard::key::Named;

    let action = match key.as_ref() {
        keyboard::Key::Named(Named::Home) => FlipAction::First,
        keyboard::Key::Named(Named::End) => FlipAction::Last,
        keyboard::Key::Named(Named::ArrowLeft | Named::PageUp) => FlipAction::Prev,
        keyboard::Key::Named(Named::ArrowRight | Named::PageDown) => FlipAction::Next,
        _ => return None,
    };

    Some(Message::Navigate(action))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::ResponsiveSizer;
    use std::time::Duration;

    fn settings() -> ViewerSettings {
        ViewerSettings {
            source: PageSource::Images(vec![PathBuf::from("1.jpg")]),
            title: "Test".to_string(),
            share_url: "file:///tmp/book.pdf".to_string(),
            video_url: Some("clip.mp4".to_string()),
        }
    }

    fn loaded(pages: usize) -> FlipbookViewer {
        let (mut viewer, _) = FlipbookViewer::new(settings());
        let handles = (0..pages)
            .map(|_| iced::widget::image::Handle::from_rgba(1, 1, vec![0u8; 4]))
            .collect();
        let _ = viewer.update(Message::Fetched(Ok(Fetched::Images(handles))));
        viewer
    }

    #[test]
    fn navigation_before_load_is_ignored() {
        let (mut viewer, _) = FlipbookViewer::new(settings());
        let _ = viewer.update(Message::Navigate(FlipAction::Last));
        assert_eq!(viewer.current_page, 1);
        assert!(viewer.book.is_none());
    }

    #[test]
    fn footer_navigation_updates_current_page() {
        let mut viewer = loaded(8);
        let _ = viewer.update(Message::Navigate(FlipAction::Last));
        assert_eq!(viewer.current_page, 8);
        let _ = viewer.update(Message::Navigate(FlipAction::First));
        assert_eq!(viewer.current_page, 1);
    }

    #[test]
    fn failed_load_keeps_viewer_usable() {
        let (mut viewer, _) = FlipbookViewer::new(settings());
        let _ = viewer.update(Message::Fetched(Err(ViewerError::Empty)));
        assert!(matches!(viewer.load, LoadState::Failed(ViewerError::Empty)));

        let _ = viewer.update(Message::ZoomIn);
        assert_eq!(viewer.viewport.zoom(), 1.2);
    }

    #[test]
    fn tap_on_right_half_turns_the_page() {
        let mut viewer = loaded(8);
        let _ = viewer.update(Message::WindowResized(Size::new(400.0, 800.0)));
        let _ = viewer.update(Message::PointerMoved(Point::new(300.0, 400.0)));
        let _ = viewer.update(Message::PointerPressed);
        let _ = viewer.update(Message::PointerReleased);

        assert_eq!(viewer.current_page, 2);
    }

    #[test]
    fn drag_does_not_turn_the_page() {
        let mut viewer = loaded(8);
        let _ = viewer.update(Message::WindowResized(Size::new(400.0, 800.0)));
        let _ = viewer.update(Message::PointerMoved(Point::new(300.0, 400.0)));
        let _ = viewer.update(Message::PointerPressed);
        let _ = viewer.update(Message::PointerMoved(Point::new(250.0, 400.0)));
        assert!(!viewer.book.as_ref().unwrap().click_forwarding());
        let _ = viewer.update(Message::PointerReleased);

        assert_eq!(viewer.current_page, 1);
        assert!(viewer.book.as_ref().unwrap().click_forwarding());
    }

    #[test]
    fn held_press_does_not_turn_the_page() {
        let mut viewer = loaded(8);
        viewer.gesture.pointer_down(
            Position::new(300.0, 400.0),
            Instant::now() - Duration::from_millis(400),
        );
        let _ = viewer.update(Message::PointerReleased);

        assert_eq!(viewer.current_page, 1);
    }

    #[test]
    fn drag_released_off_the_book_does_not_swallow_next_tap() {
        let mut viewer = loaded(8);
        let _ = viewer.update(Message::WindowResized(Size::new(400.0, 800.0)));
        let _ = viewer.update(Message::PointerMoved(Point::new(300.0, 400.0)));
        let _ = viewer.update(Message::PointerPressed);
        let _ = viewer.update(Message::PointerMoved(Point::new(390.0, 780.0)));
        let _ = viewer.update(Message::PointerLifted);

        assert!(!viewer.gesture.is_active());
        assert!(viewer.book.as_ref().unwrap().click_forwarding());
        assert_eq!(viewer.current_page, 1);

        let _ = viewer.update(Message::PointerMoved(Point::new(300.0, 400.0)));
        let _ = viewer.update(Message::PointerPressed);
        let _ = viewer.update(Message::PointerReleased);
        assert_eq!(viewer.current_page, 2);
    }

    #[test]
    fn press_restores_click_forwarding() {
        let mut viewer = loaded(8);
        let _ = viewer.update(Message::WindowResized(Size::new(400.0, 800.0)));
        viewer.book.as_mut().unwrap().set_click_forwarding(false);

        let _ = viewer.update(Message::PointerMoved(Point::new(300.0, 400.0)));
        let _ = viewer.update(Message::PointerPressed);
        let _ = viewer.update(Message::PointerReleased);
        assert_eq!(viewer.current_page, 2);
    }

    #[test]
    fn releases_outside_the_book_end_the_session() {
        let release = Event::Mouse(mouse::Event::ButtonReleased(mouse::Button::Left));
        assert!(matches!(
            pointer_event(release.clone(), event::Status::Ignored, window::Id::unique()),
            Some(Message::PointerLifted)
        ));
        // captured by the book's mouse area, which sends its own release
        assert!(pointer_event(release, event::Status::Captured, window::Id::unique()).is_none());
    }

    #[test]
    fn touch_position_corrects_origin_without_restarting_hold() {
        let mut viewer = loaded(8);
        let _ = viewer.update(Message::WindowResized(Size::new(400.0, 800.0)));
        // book press delivered before the finger position
        viewer.gesture.pointer_down(
            Position::default(),
            Instant::now() - Duration::from_millis(400),
        );
        let _ = viewer.update(Message::TouchPressed(Point::new(300.0, 400.0)));
        let _ = viewer.update(Message::PointerReleased);

        assert_eq!(viewer.current_page, 1);
    }

    #[test]
    fn touch_tap_is_measured_from_the_finger() {
        let mut viewer = loaded(8);
        let _ = viewer.update(Message::WindowResized(Size::new(400.0, 800.0)));
        let _ = viewer.update(Message::PointerPressed);
        let _ = viewer.update(Message::TouchPressed(Point::new(300.0, 400.0)));
        let _ = viewer.update(Message::PointerMoved(Point::new(302.0, 401.0)));
        let _ = viewer.update(Message::PointerReleased);

        assert_eq!(viewer.current_page, 2);
    }

    #[test]
    fn book_fits_the_window_for_every_class() {
        let sizer = ResponsiveSizer::default();

        for (width, height) in [
            (400.0, 800.0),
            (769.0, 1200.0),
            (900.0, 1000.0),
            (1024.0, 1366.0),
            (1025.0, 800.0),
            (1920.0, 1080.0),
        ] {
            let mut viewer = loaded(8);
            let _ = viewer.update(Message::WindowResized(Size::new(width, height)));
            let _ = viewer.update(Message::Navigate(FlipAction::Next));

            let class = viewer.viewport.class();
            let (available_width, available_height) =
                sizer.available(f64::from(width), f64::from(height), class);
            let (page_width, page_height) = viewer.viewport.page_size();
            let visible = viewer.book.as_ref().unwrap().visible_pages().len();

            assert!(
                f64::from(page_width) * visible as f64 <= available_width,
                "{class:?} at {width}x{height}: {visible} x {page_width} > {available_width}"
            );
            assert!(f64::from(page_height) <= available_height);
        }
    }

    #[test]
    fn shrinking_to_mobile_switches_to_portrait() {
        let mut viewer = loaded(8);
        assert!(!viewer.book.as_ref().unwrap().is_portrait());

        let _ = viewer.update(Message::WindowResized(Size::new(400.0, 800.0)));
        assert!(viewer.book.as_ref().unwrap().is_portrait());
    }

    #[test]
    fn share_shows_clipboard_notice() {
        let mut viewer = loaded(2);
        let _ = viewer.update(Message::Share);
        assert_eq!(viewer.notice.as_deref(), Some("Link copied to clipboard!"));

        let _ = viewer.update(Message::DismissNotice);
        assert!(viewer.notice.is_none());
    }

    #[test]
    fn refused_fullscreen_stays_windowed() {
        let mut viewer = loaded(2);
        let _ = viewer.update(Message::WindowModeChanged(window::Mode::Windowed));
        assert!(!viewer.fullscreen);
        let _ = viewer.update(Message::WindowModeChanged(window::Mode::Fullscreen));
        assert!(viewer.fullscreen);
    }

    #[test]
    fn footer_mute_reaches_video() {
        let mut viewer = loaded(2);
        let _ = viewer.update(Message::ToggleMute);
        assert_eq!(viewer.video.as_ref().map(VideoOverlay::is_muted), Some(false));
    }
}
