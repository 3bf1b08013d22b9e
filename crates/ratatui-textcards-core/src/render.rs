use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::Style;
use unicode_width::UnicodeWidthChar;

use crate::viewport::ViewportState;

/// Draws a vertical scrollbar for `state` into a one-column `area`.
///
/// Nothing but the track is drawn while the content fits the viewport.
pub fn render_scrollbar(
    area: Rect,
    buf: &mut Buffer,
    state: &ViewportState,
    track: Style,
    thumb: Style,
) {
    buf.set_style(area, track);
    if area.height == 0 {
        return;
    }
    if state.content_h <= state.viewport_h as u32 || state.content_h == 0 {
        for dy in 0..area.height {
            buf.set_stringn(area.x, area.y + dy, "│", 1, track);
        }
        return;
    }

    let (thumb_top, thumb_h) = thumb_span(area.height, state);
    for dy in 0..area.height {
        let (ch, style) = if dy >= thumb_top && dy < thumb_top + thumb_h {
            ("█", thumb)
        } else {
            ("│", track)
        };
        buf.set_stringn(area.x, area.y + dy, ch, 1, style);
    }
}

/// Offset and length of the scrollbar thumb on a track of `track_h` cells.
pub fn thumb_span(track_h: u16, state: &ViewportState) -> (u16, u16) {
    if state.content_h == 0 || track_h == 0 {
        return (0, track_h);
    }
    let track = track_h as f64;
    let thumb_h = ((state.viewport_h as f64 / state.content_h as f64) * track)
        .round()
        .clamp(1.0, track) as u16;

    let max_y = state
        .content_h
        .saturating_sub(state.viewport_h as u32)
        .max(1) as f64;
    let thumb_top = ((state.y as f64 / max_y) * (track - thumb_h as f64))
        .round()
        .clamp(0.0, (track - thumb_h as f64).max(0.0)) as u16;
    (thumb_top, thumb_h)
}

/// Writes `input` at `(x, y)`, skipping `start_col` columns and stopping after `max_cols`.
///
/// Wide characters that would straddle either edge are dropped. Returns the columns written.
pub fn render_str_clipped(
    x: u16,
    y: u16,
    start_col: u32,
    max_cols: u16,
    buf: &mut Buffer,
    input: &str,
    style: Style,
) -> u16 {
    if max_cols == 0 {
        return 0;
    }

    let start_col = start_col as usize;
    let max_cols = max_cols as usize;
    let mut col = 0usize;
    let mut out_cols = 0usize;
    let mut dx = 0u16;

    let mut tmp = [0u8; 4];

    for ch in input.chars() {
        let w = UnicodeWidthChar::width(ch).unwrap_or(0);
        if w == 0 {
            continue;
        }
        if col < start_col {
            col += w;
            continue;
        }
        if out_cols + w > max_cols {
            break;
        }

        let s = ch.encode_utf8(&mut tmp);
        if let Some(cell) = buf.cell_mut((x + dx, y)) {
            cell.set_style(style);
            cell.set_symbol(s);
        }
        dx += 1;
        out_cols += 1;
        col += w;

        if w == 2 {
            if let Some(cell) = buf.cell_mut((x + dx, y)) {
                cell.set_style(style);
                cell.set_symbol("");
            }
            dx += 1;
            out_cols += 1;
        }
    }
    dx
}

/// The characters of `input` that fall inside `[start_col, start_col + max_cols)`.
pub fn slice_by_cols(input: &str, start_col: u32, max_cols: u16) -> String {
    if max_cols == 0 {
        return String::new();
    }

    let start_col = start_col as usize;
    let max_cols = max_cols as usize;
    let mut col = 0usize;
    let mut out_cols = 0usize;
    let mut out = String::new();

    for ch in input.chars() {
        let w = UnicodeWidthChar::width(ch).unwrap_or(0);
        if w == 0 {
            continue;
        }
        if col < start_col {
            col += w;
            continue;
        }
        if out_cols + w > max_cols {
            break;
        }
        out.push(ch);
        col += w;
        out_cols += w;
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(buf: &Buffer, width: u16) -> String {
        (0..width)
            .map(|x| buf.cell((x, 0)).map(|c| c.symbol().to_string()).unwrap_or_default())
            .collect()
    }

    #[test]
    fn slice_by_cols_skips_and_clips() {
        assert_eq!(slice_by_cols("abcdef", 0, 3), "abc");
        assert_eq!(slice_by_cols("abcdef", 2, 3), "cde");
        assert_eq!(slice_by_cols("你好", 1, 4), "好");
        assert_eq!(slice_by_cols("abc", 0, 0), "");
    }

    #[test]
    fn clipped_string_stops_at_max_cols() {
        let mut buf = Buffer::empty(Rect::new(0, 0, 6, 1));
        let written = render_str_clipped(0, 0, 1, 3, &mut buf, "abcdef", Style::default());
        assert_eq!(written, 3);
        assert!(row(&buf, 6).starts_with("bcd"));

        let mut buf = Buffer::empty(Rect::new(0, 0, 6, 1));
        let written = render_str_clipped(0, 0, 0, 3, &mut buf, "你好", Style::default());
        assert_eq!(written, 2);
    }

    #[test]
    fn thumb_tracks_scroll_position() {
        let mut state = ViewportState::default();
        state.set_viewport(10, 5);
        state.set_content(10, 50);
        assert_eq!(thumb_span(10, &state), (0, 1));
        state.to_bottom();
        assert_eq!(thumb_span(10, &state), (9, 1));

        let mut buf = Buffer::empty(Rect::new(0, 0, 1, 10));
        render_scrollbar(
            Rect::new(0, 0, 1, 10),
            &mut buf,
            &state,
            Style::default(),
            Style::default(),
        );
        assert_eq!(buf.cell((0, 9)).map(|c| c.symbol().to_string()), Some("█".into()));
    }
}
