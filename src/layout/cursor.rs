use super::{DrawItem, PageContent};

/// Vertical write position, measured downward from the top edge of the page.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LayoutState {
    pub current_y: f32,
    pub page_height: f32,
    pub top_margin: f32,
    pub bottom_margin: f32,
}

impl LayoutState {
    pub fn bottom_limit(&self) -> f32 {
        self.page_height - self.bottom_margin
    }

    pub fn usable_height(&self) -> f32 {
        self.bottom_limit() - self.top_margin
    }
}

/// Tracks the write position and owns the pages emitted so far.
pub struct PageCursor {
    state: LayoutState,
    pages: Vec<PageContent>,
}

impl PageCursor {
    /// Start on page one with the first baseline at `start_y`.
    pub fn new(page_height: f32, top_margin: f32, bottom_margin: f32, start_y: f32) -> Self {
        Self {
            state: LayoutState {
                current_y: start_y,
                page_height,
                top_margin,
                bottom_margin,
            },
            pages: vec![PageContent::default()],
        }
    }

    pub fn state(&self) -> LayoutState {
        self.state
    }

    /// Zero-based index of the page currently written to.
    pub fn page_index(&self) -> usize {
        self.pages.len() - 1
    }

    fn current_page_is_blank(&self) -> bool {
        self.pages.last().is_none_or(|p| p.items.is_empty())
    }

    /// Make room for `needed` points and return the y to write at. Starts a new
    /// page when the block would cross the bottom margin. A block taller than a
    /// whole page is placed on a blank page anyway and overflows the margin.
    pub fn ensure_space(&mut self, needed: f32) -> f32 {
        if self.state.current_y + needed > self.state.bottom_limit() {
            if self.current_page_is_blank() {
                log::debug!(
                    "block of {needed:.1}pt exceeds page {} capacity; placing on blank page",
                    self.page_index() + 1
                );
            } else {
                self.pages.push(PageContent::default());
                self.state.current_y = self.state.top_margin;
                log::debug!(
                    "page break before {needed:.1}pt block → page {}",
                    self.page_index() + 1
                );
            }
        }
        self.state.current_y
    }

    pub fn advance(&mut self, delta: f32) {
        self.state.current_y += delta;
    }

    pub(crate) fn emit(&mut self, item: DrawItem) {
        if let Some(page) = self.pages.last_mut() {
            page.items.push(item);
        }
    }

    pub fn into_pages(self) -> Vec<PageContent> {
        self.pages
    }
}
