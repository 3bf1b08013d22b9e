//! Incremental card rendering.
//!
//! Rows are rendered a page at a time. A rebuild redraws everything that was visible before (or
//! the first page on the very first render); an append adds the next page after a scroll reached
//! the bottom. Both work on the same frozen row snapshot, so later pages never re-fetch or
//! re-sort.

use std::ops::Range;

use crate::host::HostRow;
use crate::host::HostStyling;
use crate::host::WindowSize;
use crate::options::TextCardOptions;
use crate::row::Bindings;
use crate::row::RowRecord;
use crate::row::all_marked;
use crate::theme::CardStyle;
use crate::viewport::ScrollMetrics;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RenderMode {
    /// Clear all cards and redraw from the first row.
    Rebuild,
    /// Add the next page below the existing cards.
    Append,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PageRequest {
    pub cursor: usize,
    pub page_size: usize,
    pub mode: RenderMode,
}

impl PageRequest {
    pub fn rebuild(cursor: usize, page_size: usize) -> Self {
        Self {
            cursor,
            page_size,
            mode: RenderMode::Rebuild,
        }
    }

    pub fn append(cursor: usize, page_size: usize) -> Self {
        Self {
            cursor,
            page_size,
            mode: RenderMode::Append,
        }
    }

    /// Row indices this request covers before clipping to the sequence length.
    ///
    /// A rebuild restores everything up to the cursor, or the first page when nothing was
    /// rendered yet.
    pub fn range(&self) -> Range<usize> {
        match self.mode {
            RenderMode::Rebuild if self.cursor == 0 => 0..self.page_size,
            RenderMode::Rebuild => 0..self.cursor,
            RenderMode::Append => self.cursor..self.cursor.saturating_add(self.page_size),
        }
    }

    /// Cursor after the batch.
    ///
    /// A rebuild from a non-zero cursor re-renders rows already scrolled to and keeps the
    /// cursor; every other batch moves it by one page. An append past the end leaves it alone.
    pub fn next_cursor(&self, len: usize) -> usize {
        match self.mode {
            RenderMode::Append if self.cursor >= len => self.cursor,
            RenderMode::Rebuild if self.cursor != 0 => self.cursor,
            _ => self.cursor.saturating_add(self.page_size),
        }
    }
}

/// How a card is emphasised relative to the marking state of the snapshot.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CardEmphasis {
    /// No row in the snapshot is marked.
    Normal,
    Marked,
    /// Other rows are marked, this one is not.
    Dimmed,
}

impl CardEmphasis {
    pub fn resolve(row_marked: bool, none_marked: bool) -> Self {
        if none_marked {
            CardEmphasis::Normal
        } else if row_marked {
            CardEmphasis::Marked
        } else {
            CardEmphasis::Dimmed
        }
    }
}

/// One rendered card.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Card {
    /// Index of the row in the frozen snapshot.
    pub index: usize,
    pub content: String,
    pub annotation: Option<String>,
    /// Hex color of the card's side bar.
    pub color: String,
    pub emphasis: CardEmphasis,
    /// Height cap; taller content scrolls inside the card.
    pub max_height: u32,
}

/// Everything a batch needs besides the rows.
#[derive(Clone, Copy, Debug)]
pub struct PageContext<'a> {
    pub window: WindowSize,
    pub bindings: &'a Bindings,
    pub styling: &'a HostStyling,
    pub options: &'a TextCardOptions,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RenderBatch {
    pub mode: RenderMode,
    pub cards: Vec<Card>,
    pub next_cursor: usize,
    pub style: CardStyle,
}

/// Height cap of each card in a sequence of `row_count` rows.
///
/// A lone card may fill the window minus its padding; otherwise cards take at most half the
/// window so several stay visible.
pub fn card_max_height(
    row_count: usize,
    window_height: u32,
    has_annotation: bool,
    options: &TextCardOptions,
) -> u32 {
    if row_count == 1 {
        window_height.saturating_sub(options.padding(has_annotation))
    } else {
        window_height / 2
    }
}

/// Renders the rows covered by `request`.
///
/// Rows with a null content value produce no card but still count towards the page.
pub fn render_page<R: HostRow>(
    rows: &[RowRecord<R>],
    request: PageRequest,
    ctx: &PageContext<'_>,
) -> RenderBatch {
    let range = request.range();
    let clipped = range.start.min(rows.len())..range.end.min(rows.len());

    let none_marked = all_marked(rows);
    let max_height = card_max_height(
        rows.len(),
        ctx.window.height,
        ctx.bindings.has_annotation(),
        ctx.options,
    );

    let cards: Vec<Card> = clipped
        .clone()
        .filter_map(|index| {
            let row = &rows[index];
            row.content_key()?;
            Some(Card {
                index,
                content: row.content(),
                annotation: row.annotation(ctx.bindings),
                color: row.color(),
                emphasis: CardEmphasis::resolve(row.is_marked(), none_marked),
                max_height,
            })
        })
        .collect();

    let next_cursor = request.next_cursor(rows.len());
    tracing::trace!(
        target: "ratatui_textcards::paging",
        mode = ?request.mode,
        start = clipped.start,
        end = clipped.end,
        cards = cards.len(),
        next_cursor,
        "rendered page"
    );

    RenderBatch {
        mode: request.mode,
        cards,
        next_cursor,
        style: CardStyle::from_styling(ctx.styling),
    }
}

/// Returns `true` when a scroll position should trigger the next append.
pub fn is_scrolled_to_bottom(metrics: ScrollMetrics, tolerance: u32) -> bool {
    metrics.is_at_bottom(tolerance)
}
