use crate::scroll::ScrollBindings;
use crate::selection::SelectionBindings;

/// Behaviour and layout constants of the text card controller.
///
/// Distances are in the units the host reports geometry in. [`TextCardOptions::default`] matches
/// a pixel-based host; [`TextCardOptions::terminal`] scales the same rules to terminal cells.
#[derive(Clone, Debug)]
pub struct TextCardOptions {
    /// Cards rendered per batch.
    pub page_size: usize,
    /// Vertical room reserved around a card that shows an annotation header.
    pub annotation_padding: u32,
    /// Vertical room reserved around a card without annotation.
    pub plain_padding: u32,
    /// Width of the strip at a card's right edge that belongs to its scrollbar.
    pub scroll_thumb_zone: u32,
    /// Width of the strip at the container's right edge that never clears marking.
    pub scrollbar_strip: u32,
    /// Subtracted from the window height to get the container height.
    pub container_inset: u32,
    /// Slack allowed when deciding the container is scrolled to the bottom.
    pub bottom_tolerance: u32,
    pub scroll: ScrollBindings,
    pub selection: SelectionBindings,
}

impl Default for TextCardOptions {
    fn default() -> Self {
        Self {
            page_size: 100,
            annotation_padding: 80,
            plain_padding: 50,
            scroll_thumb_zone: 10,
            scrollbar_strip: 12,
            container_inset: 4,
            bottom_tolerance: 1,
            scroll: ScrollBindings::default(),
            selection: SelectionBindings::default(),
        }
    }
}

impl TextCardOptions {
    pub fn terminal() -> Self {
        Self {
            page_size: 100,
            annotation_padding: 4,
            plain_padding: 3,
            scroll_thumb_zone: 1,
            scrollbar_strip: 2,
            container_inset: 0,
            bottom_tolerance: 0,
            scroll: ScrollBindings::default().with_step(3),
            selection: SelectionBindings::default(),
        }
    }

    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    pub fn padding(&self, has_annotation: bool) -> u32 {
        if has_annotation {
            self.annotation_padding
        } else {
            self.plain_padding
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_size_is_at_least_one() {
        assert_eq!(TextCardOptions::default().with_page_size(25).page_size, 25);
        assert_eq!(TextCardOptions::terminal().with_page_size(0).page_size, 1);
    }
}
