/// Scroll position of a container, in the units of the host that measured it.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ScrollMetrics {
    /// Total height of the scrolled content.
    pub scroll_height: u32,
    /// Offset of the top of the visible area.
    pub scroll_top: u32,
    /// Height of the visible area.
    pub client_height: u32,
}

impl ScrollMetrics {
    /// Returns `true` once the visible area reaches the end of the content.
    pub fn is_at_bottom(&self, tolerance: u32) -> bool {
        self.scroll_height.saturating_sub(self.scroll_top)
            <= self.client_height.saturating_add(tolerance)
    }
}

#[derive(Clone, Copy, Debug, Default)]
pub struct ViewportState {
    pub x: u32,
    pub y: u32,
    pub viewport_w: u16,
    pub viewport_h: u16,
    pub content_w: u32,
    pub content_h: u32,
}

impl ViewportState {
    pub fn set_viewport(&mut self, w: u16, h: u16) {
        self.viewport_w = w;
        self.viewport_h = h;
        self.clamp();
    }

    pub fn set_content(&mut self, w: u32, h: u32) {
        self.content_w = w;
        self.content_h = h;
        self.clamp();
    }

    pub fn clamp(&mut self) {
        let max_y = self.max_y();
        let max_x = self.max_x();
        self.y = self.y.min(max_y);
        self.x = self.x.min(max_x);
    }

    pub fn scroll_y_by(&mut self, delta: i32) {
        let next = self.y as i64 + delta as i64;
        self.y = next.clamp(0, self.max_y() as i64) as u32;
    }

    pub fn to_bottom(&mut self) {
        self.y = self.max_y();
    }

    pub fn metrics(&self) -> ScrollMetrics {
        ScrollMetrics {
            scroll_height: self.content_h,
            scroll_top: self.y,
            client_height: self.viewport_h as u32,
        }
    }

    fn max_y(&self) -> u32 {
        self.content_h.saturating_sub(self.viewport_h as u32)
    }

    fn max_x(&self) -> u32 {
        self.content_w.saturating_sub(self.viewport_w as u32)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn viewport_clamps_both_axes() {
        let mut s = ViewportState::default();
        s.set_viewport(10, 5);
        s.set_content(12, 6);
        s.x = 99;
        s.y = 99;
        s.clamp();
        assert_eq!(s.x, 2);
        assert_eq!(s.y, 1);
    }

    #[test]
    fn bottom_detection_allows_one_unit_of_slack() {
        let at = |top| ScrollMetrics {
            scroll_height: 1000,
            scroll_top: top,
            client_height: 400,
        };
        assert!(!at(598).is_at_bottom(1));
        assert!(at(599).is_at_bottom(1));
        assert!(at(600).is_at_bottom(1));
        assert!(!at(599).is_at_bottom(0));
    }

    #[test]
    fn short_content_is_always_at_bottom() {
        let mut s = ViewportState::default();
        s.set_viewport(20, 10);
        s.set_content(20, 4);
        assert!(s.metrics().is_at_bottom(0));
        s.set_content(20, 30);
        assert!(!s.metrics().is_at_bottom(0));
        s.to_bottom();
        assert!(s.metrics().is_at_bottom(0));
    }
}
