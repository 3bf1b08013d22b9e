//! Translates pointer gestures on cards into marking operations.
//!
//! Gesture detection is split from event plumbing: a press is classified into a
//! [`PendingGesture`], its release into a [`GestureIntent`], and only [`apply`] talks to the
//! host rows. Each step is a plain function so hosts with very different event models (DOM
//! listeners, terminal mouse reports) can share it.

use crate::host::HostRow;
use crate::host::MarkingOperation;
use crate::input::KeyModifiers;
use crate::input::MouseButton;
use crate::row::RowRecord;

/// Geometry of a card at the time it is pressed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CardGeometry {
    /// X coordinate of the card's right edge (exclusive), in pointer coordinates.
    pub right: u32,
    /// Rendered height of the card.
    pub height: u32,
    /// Height cap of the card; content beyond it scrolls inside the card.
    pub max_height: u32,
}

impl CardGeometry {
    /// A card that reached its height cap shows its own scrollbar.
    pub fn can_scroll(&self) -> bool {
        self.max_height > 0 && self.height >= self.max_height
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PointerPress {
    pub x: u32,
    pub button: MouseButton,
    pub modifiers: KeyModifiers,
}

impl PointerPress {
    pub fn new(x: u32, button: MouseButton, modifiers: KeyModifiers) -> Self {
        Self {
            x,
            button,
            modifiers,
        }
    }

    pub fn left(x: u32) -> Self {
        Self::new(x, MouseButton::Left, KeyModifiers::none())
    }

    pub fn with_modifiers(mut self, modifiers: KeyModifiers) -> Self {
        self.modifiers = modifiers;
        self
    }
}

/// What a completed gesture means.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GestureIntent {
    /// The press grabbed a card scrollbar.
    Scroll,
    /// The user is selecting text.
    SelectText,
    /// Nothing to do (e.g. a secondary button).
    Ignore,
    MarkSingle {
        index: usize,
        operation: MarkingOperation,
    },
    /// Inclusive range, `start <= end`.
    MarkRange {
        start: usize,
        end: usize,
        operation: MarkingOperation,
    },
    ClearAll,
}

/// A card press waiting for its release.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PendingGesture {
    pub press: PointerPress,
    pub scrolling: bool,
}

impl PendingGesture {
    /// Operation the gesture will mark with: toggle with ctrl/meta, replace otherwise.
    pub fn operation(&self) -> MarkingOperation {
        if self.press.modifiers.command() {
            MarkingOperation::ToggleOrAdd
        } else {
            MarkingOperation::Replace
        }
    }

    /// Shift-presses mark ranges, so text selection is suppressed until release.
    pub fn suppresses_text_selection(&self) -> bool {
        self.press.modifiers.shift
    }

    pub fn release(&self, index: usize, anchor: usize, selected_text: &str) -> GestureIntent {
        if self.scrolling {
            return GestureIntent::Scroll;
        }
        let operation = self.operation();
        if self.press.modifiers.shift {
            let (start, end) = if anchor <= index {
                (anchor, index)
            } else {
                (index, anchor)
            };
            return GestureIntent::MarkRange {
                start,
                end,
                operation,
            };
        }
        if !selected_text.is_empty() {
            return GestureIntent::SelectText;
        }
        if self.press.button != MouseButton::Left {
            return GestureIntent::Ignore;
        }
        GestureIntent::MarkSingle { index, operation }
    }
}

/// Classifies a press on a card.
///
/// The press counts as scrolling when the card can scroll and the pointer is within
/// `thumb_zone` of the card's right edge. Presses past the edge never scroll.
pub fn press(geometry: CardGeometry, pointer: PointerPress, thumb_zone: u32) -> PendingGesture {
    let from_right = geometry.right as i64 - pointer.x as i64;
    let scrolling = geometry.can_scroll() && (0..=thumb_zone as i64).contains(&from_right);
    PendingGesture {
        press: pointer,
        scrolling,
    }
}

/// Classifies a press on the container background.
///
/// Presses inside the reserved strip left of the container's right edge (the scrollbar) are
/// ignored; every other background press clears marking.
pub fn background_press(x: u32, container_width: u32, strip: u32) -> Option<GestureIntent> {
    let x = x as i64;
    let width = container_width as i64;
    if x < width && x > width - strip as i64 {
        None
    } else {
        Some(GestureIntent::ClearAll)
    }
}

/// Effect of [`apply`] that the caller still has to carry out.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MarkOutcome {
    Unchanged,
    /// Number of mark calls issued.
    Marked(usize),
    /// The caller must clear marking on the data view.
    ClearRequested,
}

/// Issues the mark calls for `intent` and maintains the anchor.
///
/// Range marks are issued as consecutive per-row calls; the host coalesces them into one
/// selection change. Indices outside `rows` are skipped. Only a single-row mark moves the anchor.
pub fn apply<R: HostRow>(
    rows: &[RowRecord<R>],
    anchor: &mut usize,
    intent: GestureIntent,
) -> MarkOutcome {
    match intent {
        GestureIntent::Scroll | GestureIntent::SelectText | GestureIntent::Ignore => {
            MarkOutcome::Unchanged
        }
        GestureIntent::ClearAll => MarkOutcome::ClearRequested,
        GestureIntent::MarkSingle { index, operation } => {
            let Some(row) = rows.get(index) else {
                return MarkOutcome::Unchanged;
            };
            row.mark(operation);
            *anchor = index;
            tracing::trace!(target: "ratatui_textcards::marking", index, ?operation, "marked row");
            MarkOutcome::Marked(1)
        }
        GestureIntent::MarkRange {
            start,
            end,
            operation,
        } => {
            let end = end.min(rows.len().saturating_sub(1));
            if rows.is_empty() || start > end {
                return MarkOutcome::Unchanged;
            }
            for row in &rows[start..=end] {
                row.mark(operation);
            }
            let count = end - start + 1;
            tracing::trace!(target: "ratatui_textcards::marking", start, end, ?operation, "marked range");
            MarkOutcome::Marked(count)
        }
    }
}
