//! Spread-based flip widget.
//!
//! Pages are grouped into spreads. In portrait every spread is one page. In
//! landscape with a cover the first page stands alone and the rest pair up
//! as (1, 2), (3, 4), ...

use iced::widget::{row, Row};
use iced::Element;

use crate::flip::{FlipEvent, PageFlip};
use crate::layout::ViewportClass;

/// Half of the book a click landed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Left,
    Right,
}

impl Side {
    /// Splits a spread of `spread_width` pixels down the middle.
    pub fn at(x: f32, spread_width: f32) -> Self {
        if x < spread_width / 2.0 {
            Self::Left
        } else {
            Self::Right
        }
    }
}

#[derive(Debug, Clone)]
pub struct FlipBook {
    page_count: usize,
    /// First page of the visible spread.
    current: usize,
    portrait: bool,
    show_cover: bool,
    click_forwarding: bool,
}

impl FlipBook {
    pub fn new(page_count: usize, start_page: usize, class: ViewportClass) -> Self {
        let mut book = Self {
            page_count,
            current: 0,
            portrait: class.is_portrait(),
            show_cover: !class.is_portrait(),
            click_forwarding: true,
        };
        book.current = book.spread_start(start_page.min(page_count.saturating_sub(1)));
        book
    }

    pub fn page_count(&self) -> usize {
        self.page_count
    }

    pub fn current_index(&self) -> usize {
        self.current
    }

    pub fn is_portrait(&self) -> bool {
        self.portrait
    }

    /// Switches between single-page and spread layouts. Reports a flip when
    /// realigning moved the first visible page.
    pub fn set_orientation(&mut self, class: ViewportClass) -> Option<FlipEvent> {
        let portrait = class.is_portrait();
        if portrait == self.portrait {
            return None;
        }

        self.portrait = portrait;
        self.show_cover = !portrait;
        let aligned = self.spread_start(self.current);
        self.move_to(aligned)
    }

    /// Native click-to-flip is disabled while a drag is in progress.
    pub fn set_click_forwarding(&mut self, enabled: bool) {
        self.click_forwarding = enabled;
    }

    pub fn click_forwarding(&self) -> bool {
        self.click_forwarding
    }

    pub fn click(&mut self, side: Side) -> Option<FlipEvent> {
        if !self.click_forwarding {
            return None;
        }

        match side {
            Side::Left => self.flip_prev(),
            Side::Right => self.flip_next(),
        }
    }

    pub fn visible_pages(&self) -> Vec<usize> {
        let len = if self.portrait || (self.show_cover && self.current == 0) {
            1
        } else {
            2
        };

        (self.current..self.current + len)
            .filter(|&page| page < self.page_count)
            .collect()
    }

    /// Renders the visible spread with `page` producing each page element.
    pub fn view<'a, Message: 'a>(
        &self,
        page: impl Fn(usize) -> Element<'a, Message>,
    ) -> Element<'a, Message> {
        let pages: Row<'a, Message> = self
            .visible_pages()
            .into_iter()
            .fold(row![], |spread, index| spread.push(page(index)));

        pages.into()
    }

    fn spread_start(&self, page: usize) -> usize {
        if self.portrait {
            page
        } else if self.show_cover {
            if page == 0 || page % 2 == 1 {
                page
            } else {
                page - 1
            }
        } else {
            page - page % 2
        }
    }

    fn move_to(&mut self, start: usize) -> Option<FlipEvent> {
        if start == self.current || start >= self.page_count {
            return None;
        }

        tracing::debug!(from = self.current, to = start, "page flipped");
        self.current = start;
        Some(FlipEvent { page: start })
    }
}

impl PageFlip for FlipBook {
    fn flip(&mut self, page: usize) -> Option<FlipEvent> {
        let last = self.page_count.checked_sub(1)?;
        let start = self.spread_start(page.min(last));
        self.move_to(start)
    }

    fn flip_next(&mut self) -> Option<FlipEvent> {
        let step = if self.portrait || (self.show_cover && self.current == 0) {
            1
        } else {
            2
        };
        self.move_to(self.current + step)
    }

    fn flip_prev(&mut self) -> Option<FlipEvent> {
        if self.current == 0 {
            return None;
        }

        let target = if self.portrait {
            self.current - 1
        } else {
            self.spread_start(self.current.saturating_sub(2))
        };
        self.move_to(target)
    }
}
