//! Header, footer and overlay views around the book.

use iced::widget::{
    button, center, container, horizontal_space, opaque, row, text, vertical_rule, Row,
};
use iced::{Background, Color, Element, Length, Theme};

use crate::flip::FlipAction;
use crate::shell::Message;
use crate::video::VideoOverlay;

fn bar(_theme: &Theme) -> container::Style {
    container::Style::default()
        .background(Color::from_rgb8(0x1a, 0x28, 0x38))
        .color(Color::WHITE)
}

pub fn header<'a>(title: &'a str) -> Element<'a, Message> {
    container(text(title).size(18))
        .width(Length::Fill)
        .center_x(Length::Fill)
        .padding(4)
        .style(bar)
        .into()
}

pub fn notice<'a>(message: &'a str) -> Element<'a, Message> {
    container(
        row![
            text(message),
            horizontal_space(),
            button("×").on_press(Message::DismissNotice),
        ]
        .spacing(10),
    )
    .width(Length::Fill)
    .padding([4, 12])
    .style(container::rounded_box)
    .into()
}

/// Everything the footer displays.
#[derive(Debug, Clone, Copy)]
pub struct FooterProps {
    pub current_page: usize,
    pub total_pages: usize,
    pub zoom: f32,
    pub can_zoom_in: bool,
    pub can_zoom_out: bool,
    pub fullscreen: bool,
    /// `None` when no video is configured.
    pub muted: Option<bool>,
}

pub fn footer<'a>(props: FooterProps) -> Element<'a, Message> {
    let has_pages = props.total_pages > 0;
    let nav = |label: &'a str, message: Message| {
        button(label).on_press_maybe(has_pages.then_some(message))
    };

    let mut controls: Row<'a, Message> = row![
        nav("« First", Message::Navigate(FlipAction::First)),
        nav("‹", Message::Navigate(FlipAction::Prev)),
        nav("›", Message::Navigate(FlipAction::Next)),
        nav("Last »", Message::Navigate(FlipAction::Last)),
        vertical_rule(1),
        button("−").on_press_maybe(props.can_zoom_out.then_some(Message::ZoomOut)),
        text(format!("{}%", (props.zoom * 100.0).round() as i32)),
        button("+").on_press_maybe(props.can_zoom_in.then_some(Message::ZoomIn)),
        button("Reset").on_press(Message::ZoomReset),
        vertical_rule(1),
        button(if props.fullscreen {
            "Exit fullscreen"
        } else {
            "Fullscreen"
        })
        .on_press(Message::ToggleFullscreen),
        button("Share").on_press(Message::Share),
        button("Print").on_press(Message::Print),
        button("Download").on_press(Message::Download),
    ]
    .spacing(4)
    .height(Length::Fixed(36.0));

    if let Some(muted) = props.muted {
        controls = controls
            .push(vertical_rule(1))
            .push(button(if muted { "Unmute" } else { "Mute" }).on_press(Message::ToggleMute));
    }

    container(
        row![
            text(format!("{}/{}", props.current_page, props.total_pages)),
            horizontal_space(),
            controls,
        ]
        .spacing(10),
    )
    .width(Length::Fill)
    .padding([6, 16])
    .style(bar)
    .into()
}

/// Corner thumbnail plus, when expanded, a modal covering the window.
pub fn video_overlay(video: &VideoOverlay) -> Element<'_, Message> {
    if video.is_expanded() {
        let panel = container(
            iced::widget::column![
                text("Video").size(24),
                text(video.url()).size(14),
                text(if video.is_muted() { "Muted" } else { "Sound on" }).size(14),
                row![
                    button("Play").on_press(Message::PlayVideo),
                    button(if video.is_muted() { "Unmute" } else { "Mute" })
                        .on_press(Message::ToggleMute),
                    button("Close").on_press(Message::CloseVideo),
                ]
                .spacing(8),
            ]
            .spacing(12),
        )
        .padding(24)
        .style(container::rounded_box);

        return opaque(center(panel).style(|_theme: &Theme| {
            container::Style::default().background(Background::Color(Color {
                a: 0.8,
                ..Color::BLACK
            }))
        }));
    }

    let toggle = button(if video.is_visible() { "Hide video" } else { "Show video" })
        .on_press(Message::ToggleVideo);

    let corner = (if video.is_visible() {
        row![
            toggle,
            button(
                container(text("▶ Video"))
                    .center_x(Length::Fixed(192.0))
                    .center_y(Length::Fixed(128.0))
            )
            .on_press(Message::ExpandVideo),
        ]
    } else {
        row![toggle]
    })
    .spacing(8);

    container(corner)
        .align_left(Length::Fill)
        .align_bottom(Length::Fill)
        .padding([96, 16])
        .into()
}
