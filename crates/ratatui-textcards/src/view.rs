//! Terminal painter for [`TextCards`].
//!
//! The view draws the cards the controller rendered, keeps the container scroll position and
//! turns terminal mouse and key events into controller gestures. It owns no data: every frame
//! is painted from the controller's current cards.

use std::collections::HashMap;

use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::Color;
use ratatui::style::Modifier;
use ratatui::style::Style;
use tracing::debug;
use unicode_width::UnicodeWidthStr;

use ratatui_textcards_core::controller::CardRegion;
use ratatui_textcards_core::controller::HoverTarget;
use ratatui_textcards_core::controller::KeyAction;
use ratatui_textcards_core::controller::TextCards;
use ratatui_textcards_core::gate::WarningChoice;
use ratatui_textcards_core::host::DataView;
use ratatui_textcards_core::host::ModHost;
use ratatui_textcards_core::input::InputEvent;
use ratatui_textcards_core::input::MouseButton;
use ratatui_textcards_core::input::MouseEvent;
use ratatui_textcards_core::input::MouseEventKind;
use ratatui_textcards_core::marking::CardGeometry;
use ratatui_textcards_core::marking::GestureIntent;
use ratatui_textcards_core::marking::PointerPress;
use ratatui_textcards_core::paging::Card;
use ratatui_textcards_core::paging::CardEmphasis;
use ratatui_textcards_core::render;
use ratatui_textcards_core::selection::SelectionAction;
use ratatui_textcards_core::sort::SortOrder;
use ratatui_textcards_core::text;
use ratatui_textcards_core::theme::CardStyle;
use ratatui_textcards_core::theme::Theme;
use ratatui_textcards_core::theme::parse_hex_color;
use ratatui_textcards_core::viewport::ScrollMetrics;
use ratatui_textcards_core::viewport::ViewportState;
use ratatui_textcards_core::wrapping;
use ratatui_textcards_core::wrapping::WrapCache;

/// Columns from a card's left edge to its text: border, color bar, space.
const TEXT_LEFT: u16 = 3;
/// Columns right of a card's text: in-card scrollbar, border.
const TEXT_RIGHT: u16 = 2;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ViewAction {
    None,
    Redraw,
    /// The app owns the clipboard.
    CopyRequested(String),
    /// The container scrolled; pass the metrics to [`TextCards::on_scroll`].
    Scrolled(ScrollMetrics),
    /// A pointer gesture completed and was handed to the controller.
    Gesture(GestureIntent),
}

#[derive(Clone, Debug)]
pub struct TextCardsViewOptions {
    pub show_scrollbar: bool,
    /// Blank rows between cards.
    pub gap: u16,
    /// Rows scrolled per mouse wheel notch.
    pub wheel_step: i32,
    pub copy_glyph: String,
    pub bar_glyph: String,
    pub selection_style: Style,
}

impl Default for TextCardsViewOptions {
    fn default() -> Self {
        Self {
            show_scrollbar: true,
            gap: 1,
            wheel_step: 3,
            copy_glyph: "⧉".to_string(),
            bar_glyph: "▌".to_string(),
            selection_style: Style::default().add_modifier(Modifier::REVERSED),
        }
    }
}

/// Placement of one card in container rows.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct Slot {
    /// Position in the controller's card list.
    position: usize,
    /// Row index of the card.
    index: usize,
    top: u32,
    height: u32,
    has_annotation: bool,
    /// Wrapped content lines.
    lines: u32,
    /// Content lines shown at once.
    visible_lines: u32,
    /// Content height cap of the card.
    cap: u32,
}

impl Slot {
    fn bottom(&self) -> u32 {
        self.top + self.height
    }

    /// Row of the first content line, relative to the card's top.
    fn content_offset(&self) -> u32 {
        1 + self.has_annotation as u32
    }

    fn scrollable(&self) -> bool {
        self.lines > self.visible_lines
    }

    fn max_offset(&self) -> u32 {
        self.lines - self.visible_lines
    }
}

#[derive(Clone, Copy, Debug)]
struct CardHit {
    slot: Slot,
    region: CardRegion,
    copy_button: bool,
    /// `(line, column)` of the content text under the pointer.
    text_pos: Option<(u32, u32)>,
}

#[derive(Clone, Copy, Debug)]
struct Pressed {
    index: usize,
    scrolling: bool,
    last_y: u16,
}

/// Text selected by dragging inside one card's content.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct TextSelection {
    index: usize,
    position: usize,
    anchor: (u32, u32),
    head: (u32, u32),
}

impl TextSelection {
    fn ordered(&self) -> ((u32, u32), (u32, u32)) {
        if self.anchor <= self.head {
            (self.anchor, self.head)
        } else {
            (self.head, self.anchor)
        }
    }

    /// Selected column range `[from, to)` on `line`, `to` capped at `line_cols`.
    fn cols_on(&self, line: u32, line_cols: u32) -> Option<(u32, u32)> {
        let (start, end) = self.ordered();
        if start == end || line < start.0 || line > end.0 {
            return None;
        }
        let from = if line == start.0 { start.1 } else { 0 };
        let to = if line == end.0 { end.1 + 1 } else { line_cols };
        let to = to.min(line_cols);
        (to > from).then_some((from, to))
    }
}

pub struct TextCardsView {
    pub viewport: ViewportState,
    options: TextCardsViewOptions,
    wraps: WrapCache,
    slots: Vec<Slot>,
    card_scroll: HashMap<usize, u32>,
    container: Rect,
    cards_w: u16,
    warning_buttons: Vec<(Rect, WarningChoice)>,
    sort_button: Option<Rect>,
    pressed: Option<Pressed>,
    selection: Option<TextSelection>,
}

impl Default for TextCardsView {
    fn default() -> Self {
        Self::with_options(TextCardsViewOptions::default())
    }
}

impl TextCardsView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: TextCardsViewOptions) -> Self {
        Self {
            viewport: ViewportState::default(),
            options,
            wraps: WrapCache::new(),
            slots: Vec::new(),
            card_scroll: HashMap::new(),
            container: Rect::default(),
            cards_w: 0,
            warning_buttons: Vec::new(),
            sort_button: None,
            pressed: None,
            selection: None,
        }
    }

    pub fn options(&self) -> &TextCardsViewOptions {
        &self.options
    }

    pub fn set_options(&mut self, options: TextCardsViewOptions) {
        self.options = options;
    }

    /// Text currently selected inside a card, empty when nothing is selected.
    pub fn selected_text(&self) -> String {
        let Some(sel) = self.selection else {
            return String::new();
        };
        let Some(wrapped) = self.wraps.get(sel.position) else {
            return String::new();
        };
        let (start, end) = sel.ordered();
        let mut out = Vec::new();
        for line in start.0..=end.0 {
            let Some(text) = wrapped.lines().get(line as usize) else {
                break;
            };
            let cols = UnicodeWidthStr::width(text.as_str()) as u32;
            let Some((from, to)) = sel.cols_on(line, cols) else {
                if line != start.0 && line != end.0 {
                    out.push(String::new());
                }
                continue;
            };
            let width = (to - from).min(u16::MAX as u32) as u16;
            out.push(render::slice_by_cols(text, from, width));
        }
        out.join("\n")
    }

    pub fn clear_selection(&mut self) {
        self.selection = None;
    }

    pub fn render<D: DataView, H: ModHost>(
        &mut self,
        area: Rect,
        buf: &mut Buffer,
        cards: &TextCards<D, H>,
    ) {
        self.slots.clear();
        self.warning_buttons.clear();
        self.sort_button = None;
        self.container = Rect::default();
        if area.width == 0 || area.height == 0 {
            return;
        }

        let theme = if *cards.style() == CardStyle::default() {
            Theme::default()
        } else {
            Theme::from_card_style(cards.style())
        };

        if let Some(warning) = cards.warning() {
            self.render_warning(area, buf, &warning.message(), &theme);
            return;
        }

        let mut body = area;
        if let Some(order) = cards.sort_toggle() {
            if area.height >= 2 {
                let header = Rect::new(area.x, area.y, area.width, 1);
                self.render_header(header, buf, order, cards, &theme);
                body = Rect::new(area.x, area.y + 1, area.width, area.height - 1);
            }
        }

        let (cards_w, scrollbar_x) = if self.options.show_scrollbar && body.width >= 2 {
            (body.width - 1, Some(body.x + body.width - 1))
        } else {
            (body.width, None)
        };
        self.container = body;
        self.cards_w = cards_w;

        let total = self.layout(cards.cards());
        self.viewport.set_viewport(cards_w, body.height);
        self.viewport.set_content(cards_w as u32, total);

        let hovered = cards.hovered().map(|h| h.index);
        let first = self
            .slots
            .partition_point(|s| s.bottom() <= self.viewport.y);
        let end = self.viewport.y + body.height as u32;
        for slot in self.slots[first..].iter().take_while(|s| s.top < end) {
            if let Some(card) = cards.cards().get(slot.position) {
                self.paint_card(buf, card, slot, &theme, hovered == Some(slot.index));
            }
        }

        if let Some(x) = scrollbar_x {
            render::render_scrollbar(
                Rect::new(x, body.y, 1, body.height),
                buf,
                &self.viewport,
                theme.scrollbar.add_modifier(Modifier::DIM),
                theme.scrollbar,
            );
        }
    }

    pub fn handle_event<D: DataView, H: ModHost>(
        &mut self,
        cards: &mut TextCards<D, H>,
        event: InputEvent,
    ) -> ViewAction {
        match event {
            InputEvent::Key(key) => match cards.on_key(&key, &self.selected_text()) {
                KeyAction::Copy(text) => ViewAction::CopyRequested(text),
                KeyAction::ScrollBy(delta) => self.scroll_container(delta),
                KeyAction::None => ViewAction::None,
            },
            InputEvent::Paste(_) => ViewAction::None,
            InputEvent::Mouse(m) => self.handle_mouse(cards, m),
        }
    }

    fn handle_mouse<D: DataView, H: ModHost>(
        &mut self,
        cards: &mut TextCards<D, H>,
        m: MouseEvent,
    ) -> ViewAction {
        match m.kind {
            MouseEventKind::Down(button) => self.press(cards, m, button),
            MouseEventKind::Drag(MouseButton::Left) => self.drag(m),
            MouseEventKind::Drag(_) => ViewAction::None,
            MouseEventKind::Up(_) => self.release(cards, m),
            MouseEventKind::Moved => {
                let target = self
                    .hit_card(m.x, m.y)
                    .map(|hit| HoverTarget::new(hit.slot.index, hit.region));
                let before = cards.hovered();
                cards.hover(target);
                if before == target {
                    ViewAction::None
                } else {
                    ViewAction::Redraw
                }
            }
            MouseEventKind::ScrollUp => self.wheel(m, -self.options.wheel_step),
            MouseEventKind::ScrollDown => self.wheel(m, self.options.wheel_step),
        }
    }

    fn press<D: DataView, H: ModHost>(
        &mut self,
        cards: &mut TextCards<D, H>,
        m: MouseEvent,
        button: MouseButton,
    ) -> ViewAction {
        if let Some(choice) = self
            .warning_buttons
            .iter()
            .find(|(r, _)| contains(*r, m.x, m.y))
            .map(|(_, choice)| *choice)
        {
            debug!(target: "ratatui_textcards::view", ?choice, "warning button pressed");
            cards.resolve_warning(choice);
            return ViewAction::Redraw;
        }
        if self.sort_button.is_some_and(|r| contains(r, m.x, m.y)) {
            let order = cards.toggle_sort_order();
            debug!(target: "ratatui_textcards::view", ?order, "sort header pressed");
            return ViewAction::Redraw;
        }
        if !contains(self.container, m.x, m.y) {
            return ViewAction::None;
        }

        self.selection = None;
        let rel_x = (m.x - self.container.x) as u32;
        let Some(hit) = self.hit_card(m.x, m.y) else {
            self.pressed = None;
            return match cards.press_background(rel_x, self.container.width as u32) {
                Some(intent) => ViewAction::Gesture(intent),
                None => ViewAction::None,
            };
        };

        if hit.copy_button && button == MouseButton::Left {
            self.pressed = None;
            return match cards.copy_card(hit.slot.index) {
                SelectionAction::CopyRequested(text) => ViewAction::CopyRequested(text),
                _ => ViewAction::None,
            };
        }

        // A card that exactly fills its cap shows no scrollbar.
        let geometry = CardGeometry {
            right: self.cards_w.saturating_sub(1) as u32,
            height: hit.slot.visible_lines,
            max_height: if hit.slot.scrollable() {
                hit.slot.cap
            } else {
                hit.slot.cap + 1
            },
        };
        let pointer = PointerPress::new(rel_x, button, m.modifiers);
        let gesture = cards.press_card(hit.slot.index, geometry, pointer);
        self.pressed = Some(Pressed {
            index: hit.slot.index,
            scrolling: gesture.scrolling,
            last_y: m.y,
        });
        if !gesture.scrolling && !gesture.suppresses_text_selection() && button == MouseButton::Left
        {
            if let Some(pos) = hit.text_pos {
                self.selection = Some(TextSelection {
                    index: hit.slot.index,
                    position: hit.slot.position,
                    anchor: pos,
                    head: pos,
                });
            }
        }
        ViewAction::Redraw
    }

    fn drag(&mut self, m: MouseEvent) -> ViewAction {
        let Some(pressed) = self.pressed else {
            return ViewAction::None;
        };
        let Some(slot) = self.slots.iter().find(|s| s.index == pressed.index).copied() else {
            return ViewAction::None;
        };

        if pressed.scrolling {
            let dy = m.y as i64 - pressed.last_y as i64;
            let scale = (slot.lines / slot.visible_lines.max(1)).max(1) as i64;
            let current = self.card_offset(&slot) as i64;
            let next = (current + dy * scale).clamp(0, slot.max_offset() as i64) as u32;
            self.card_scroll.insert(slot.index, next);
            self.pressed = Some(Pressed {
                last_y: m.y,
                ..pressed
            });
            return ViewAction::Redraw;
        }

        let head = self.text_pos_in(&slot, m.x, m.y);
        match self.selection.as_mut() {
            Some(sel) if sel.index == slot.index && sel.head != head => {
                sel.head = head;
                ViewAction::Redraw
            }
            _ => ViewAction::None,
        }
    }

    fn release<D: DataView, H: ModHost>(
        &mut self,
        cards: &mut TextCards<D, H>,
        m: MouseEvent,
    ) -> ViewAction {
        let Some(pressed) = self.pressed.take() else {
            return ViewAction::None;
        };
        let index = self
            .hit_card(m.x, m.y)
            .map_or(pressed.index, |hit| hit.slot.index);
        let selected = self.selected_text();
        let intent = cards.release_card(index, &selected);
        if intent != GestureIntent::SelectText {
            self.selection = None;
        }
        ViewAction::Gesture(intent)
    }

    fn wheel(&mut self, m: MouseEvent, delta: i32) -> ViewAction {
        if let Some(hit) = self.hit_card(m.x, m.y) {
            let slot = hit.slot;
            if slot.scrollable() {
                let current = self.card_offset(&slot);
                let next = (current as i64 + delta as i64).clamp(0, slot.max_offset() as i64) as u32;
                if next != current {
                    self.card_scroll.insert(slot.index, next);
                    return ViewAction::Redraw;
                }
            }
        }
        self.scroll_container(delta)
    }

    fn scroll_container(&mut self, delta: i32) -> ViewAction {
        self.viewport.scroll_y_by(delta);
        ViewAction::Scrolled(self.viewport.metrics())
    }

    /// Lays out every card and returns the container content height.
    fn layout(&mut self, cards: &[Card]) -> u32 {
        let text_w = self.cards_w.saturating_sub(TEXT_LEFT + TEXT_RIGHT);
        self.wraps
            .sync(text_w, cards.iter().map(|c| c.content.as_str()));

        let gap = self.options.gap as u32;
        let mut y = 0u32;
        for (position, card) in cards.iter().enumerate() {
            let lines = self.wraps.get(position).map_or(1, |w| w.height().max(1));
            let cap = card.max_height.max(1);
            let visible_lines = lines.min(cap);
            let has_annotation = card.annotation.is_some();
            let height = 2 + has_annotation as u32 + visible_lines;
            self.slots.push(Slot {
                position,
                index: card.index,
                top: y,
                height,
                has_annotation,
                lines,
                visible_lines,
                cap,
            });
            y += height + gap;
        }
        if cards.is_empty() { 0 } else { y - gap }
    }

    fn card_offset(&self, slot: &Slot) -> u32 {
        self.card_scroll
            .get(&slot.index)
            .copied()
            .unwrap_or(0)
            .min(slot.max_offset())
    }

    fn screen_row(&self, y: u32) -> Option<u16> {
        let top = self.viewport.y;
        if y < top || y >= top + self.container.height as u32 {
            return None;
        }
        Some(self.container.y + (y - top) as u16)
    }

    fn hit_card(&self, x: u16, y: u16) -> Option<CardHit> {
        if !contains(self.container, x, y) {
            return None;
        }
        let rel_x = x - self.container.x;
        let w = self.cards_w;
        if rel_x >= w {
            return None;
        }
        let cy = self.viewport.y + (y - self.container.y) as u32;
        let i = self.slots.partition_point(|s| s.bottom() <= cy);
        let slot = *self.slots.get(i).filter(|s| s.top <= cy)?;

        let r = cy - slot.top;
        let frame_row = r == 0 || r + 1 == slot.height;
        let in_text = rel_x >= TEXT_LEFT && rel_x < w.saturating_sub(TEXT_RIGHT);
        let region = if frame_row {
            CardRegion::Frame
        } else if slot.has_annotation && r == 1 {
            CardRegion::Annotation
        } else if in_text {
            CardRegion::Content
        } else {
            CardRegion::Frame
        };
        let text_pos = (region == CardRegion::Content).then(|| {
            (
                r - slot.content_offset() + self.card_offset(&slot),
                (rel_x - TEXT_LEFT) as u32,
            )
        });
        Some(CardHit {
            slot,
            region,
            copy_button: r == 0 && w >= 6 && rel_x == w - 3,
            text_pos,
        })
    }

    /// Text position in `slot` closest to the pointer.
    fn text_pos_in(&self, slot: &Slot, x: u16, y: u16) -> (u32, u32) {
        let cy = self.viewport.y as i64 + y as i64 - self.container.y as i64;
        let first = (slot.top + slot.content_offset()) as i64;
        let last = slot.visible_lines.saturating_sub(1) as i64;
        let row = (cy - first).clamp(0, last) as u32;
        let text_w = self.cards_w.saturating_sub(TEXT_LEFT + TEXT_RIGHT) as u32;
        let col = (x.saturating_sub(self.container.x + TEXT_LEFT) as u32).min(text_w.saturating_sub(1));
        (row + self.card_offset(slot), col)
    }

    fn paint_card(&self, buf: &mut Buffer, card: &Card, slot: &Slot, theme: &Theme, hovered: bool) {
        let w = self.cards_w;
        if w < TEXT_LEFT + TEXT_RIGHT + 1 {
            return;
        }
        let x0 = self.container.x;
        let text_x = x0 + TEXT_LEFT;
        let text_w = w - TEXT_LEFT - TEXT_RIGHT;

        let border = if hovered {
            theme.border_hover
        } else if card.emphasis == CardEmphasis::Marked {
            theme.border_marked
        } else {
            theme.border
        };
        let dimmed = card.emphasis == CardEmphasis::Dimmed;
        let text_style = if dimmed {
            theme.text_muted
        } else {
            theme.text_primary
        };
        let mut bar = Style::default().fg(parse_hex_color(&card.color).unwrap_or(Color::Reset));
        if dimmed {
            bar = bar.add_modifier(Modifier::DIM);
        }

        let offset = self.card_offset(slot);
        let wrapped = self.wraps.get(slot.position);
        let mut thumb_state = ViewportState::default();
        thumb_state.set_viewport(1, slot.visible_lines.min(u16::MAX as u32) as u16);
        thumb_state.set_content(1, slot.lines);
        thumb_state.y = offset;
        let (thumb_top, thumb_h) =
            render::thumb_span(slot.visible_lines.min(u16::MAX as u32) as u16, &thumb_state);

        for r in 0..slot.height {
            let Some(sy) = self.screen_row(slot.top + r) else {
                continue;
            };
            if r == 0 || r + 1 == slot.height {
                let (left, right) = if r == 0 { ("╭", "╮") } else { ("╰", "╯") };
                let line = format!("{left}{}{right}", "─".repeat((w - 2) as usize));
                buf.set_stringn(x0, sy, line, w as usize, border);
                if r == 0 && w >= 6 {
                    buf.set_stringn(x0 + w - 3, sy, &self.options.copy_glyph, 1, text_style);
                }
                continue;
            }

            buf.set_stringn(x0, sy, "│", 1, border);
            buf.set_stringn(x0 + w - 1, sy, "│", 1, border);
            buf.set_stringn(x0 + 1, sy, &self.options.bar_glyph, 1, bar);

            if slot.has_annotation && r == 1 {
                if let Some(annotation) = &card.annotation {
                    let shown = text::truncate_to_fit(annotation, text_w as usize);
                    render::render_str_clipped(text_x, sy, 0, text_w, buf, &shown, theme.annotation);
                }
                continue;
            }

            let row = r - slot.content_offset();
            let line = row + offset;
            if let Some(content) = wrapped.and_then(|w| w.lines().get(line as usize)) {
                render::render_str_clipped(text_x, sy, 0, text_w, buf, content, text_style);
            }
            if let Some(sel) = self.selection.filter(|s| s.index == slot.index) {
                if let Some((from, to)) = sel.cols_on(line, text_w as u32) {
                    buf.set_style(
                        Rect::new(text_x + from as u16, sy, (to - from) as u16, 1),
                        self.options.selection_style,
                    );
                }
            }
            if slot.scrollable() {
                let row = row.min(u16::MAX as u32) as u16;
                let ch = if row >= thumb_top && row < thumb_top + thumb_h {
                    "█"
                } else {
                    "│"
                };
                buf.set_stringn(x0 + w - 2, sy, ch, 1, theme.scrollbar);
            }
        }
    }

    fn render_warning(&mut self, area: Rect, buf: &mut Buffer, message: &str, theme: &Theme) {
        let wrapped = wrapping::wrap(message, area.width);
        let mut y = area.y;
        for line in wrapped.lines() {
            if y >= area.bottom() {
                return;
            }
            render::render_str_clipped(area.x, y, 0, area.width, buf, line, theme.warning);
            y += 1;
        }
        y += 1;
        if y >= area.bottom() {
            return;
        }

        let button_style = theme.text_primary.add_modifier(Modifier::BOLD);
        let mut x = area.x;
        for (label, choice) in [
            ("[ Use row id ]", WarningChoice::UseRowId),
            ("[ Keep custom card by ]", WarningChoice::KeepCustom),
        ] {
            let width = UnicodeWidthStr::width(label) as u16;
            if x + width > area.right() {
                break;
            }
            buf.set_stringn(x, y, label, width as usize, button_style);
            self.warning_buttons.push((Rect::new(x, y, width, 1), choice));
            x += width + 2;
        }
    }

    fn render_header<D: DataView, H: ModHost>(
        &mut self,
        area: Rect,
        buf: &mut Buffer,
        order: SortOrder,
        cards: &TextCards<D, H>,
        theme: &Theme,
    ) {
        let status = format!("{} of {} rows", cards.cards().len(), cards.row_count());
        render::render_str_clipped(area.x, area.y, 0, area.width, buf, &status, theme.text_muted);

        let label = match order {
            SortOrder::Ascending => "[ ▲ Ascending ]",
            SortOrder::Descending => "[ ▼ Descending ]",
        };
        let width = UnicodeWidthStr::width(label) as u16;
        if width > area.width {
            return;
        }
        let x = area.right() - width;
        buf.set_stringn(x, area.y, label, width as usize, theme.text_primary);
        self.sort_button = Some(Rect::new(x, area.y, width, 1));
    }
}

fn contains(r: Rect, x: u16, y: u16) -> bool {
    x >= r.x && x < r.right() && y >= r.y && y < r.bottom()
}
