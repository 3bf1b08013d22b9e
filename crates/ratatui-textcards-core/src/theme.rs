use ratatui::style::Color;
use ratatui::style::Modifier;
use ratatui::style::Style;

use crate::error::ParseColorError;
use crate::host::FontStyling;
use crate::host::HostStyling;

/// Hex alpha suffix for 30% opacity.
pub const ALPHA_30: &str = "4D";
/// Hex alpha suffix for 75% opacity.
pub const ALPHA_75: &str = "BF";

/// Card styling derived from the host theme, read once per render batch.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CardStyle {
    pub font: FontStyling,
    /// Card outline.
    pub border_color: String,
    /// Outline of the hovered card.
    pub hover_border_color: String,
    /// Annotation header and separators.
    pub tick_color: String,
    pub scrollbar_track: String,
    pub scrollbar_thumb: String,
    pub scrollbar_thumb_active: String,
}

impl CardStyle {
    pub fn from_styling(styling: &HostStyling) -> Self {
        let font_color = &styling.font.color;
        Self {
            font: styling.font.clone(),
            border_color: styling.line_color.clone(),
            hover_border_color: font_color.clone(),
            tick_color: styling.tick_color.clone(),
            scrollbar_track: format!("{}{ALPHA_30}", styling.line_color),
            scrollbar_thumb: format!("{font_color}{ALPHA_30}"),
            scrollbar_thumb_active: format!("{font_color}{ALPHA_75}"),
        }
    }
}

/// Parses `#rgb`, `#rrggbb` or `#rrggbbaa` (alpha is dropped).
pub fn parse_hex_color(value: &str) -> Result<Color, ParseColorError> {
    let err = || ParseColorError(value.to_string());
    let hex = value.trim().strip_prefix('#').ok_or_else(err)?;
    if !hex.is_ascii() {
        return Err(err());
    }
    let channel = |s: &str| u8::from_str_radix(s, 16).map_err(|_| err());
    match hex.len() {
        3 => {
            let expand = |i: usize| channel(&hex[i..=i].repeat(2));
            Ok(Color::Rgb(expand(0)?, expand(1)?, expand(2)?))
        }
        6 | 8 => Ok(Color::Rgb(
            channel(&hex[0..2])?,
            channel(&hex[2..4])?,
            channel(&hex[4..6])?,
        )),
        _ => Err(err()),
    }
}

fn color_or_reset(value: &str) -> Color {
    parse_hex_color(value).unwrap_or(Color::Reset)
}

/// Terminal styles for painting cards.
#[derive(Clone, Debug)]
pub struct Theme {
    pub text_primary: Style,
    pub text_muted: Style,
    pub annotation: Style,
    pub border: Style,
    pub border_hover: Style,
    pub border_marked: Style,
    pub scrollbar: Style,
    pub warning: Style,
}

impl Default for Theme {
    fn default() -> Self {
        use ratatui::style::Stylize;

        Self {
            text_primary: Style::default(),
            text_muted: Style::default().dark_gray(),
            annotation: Style::default().gray(),
            border: Style::default().dark_gray(),
            border_hover: Style::default(),
            border_marked: Style::default().add_modifier(Modifier::BOLD),
            scrollbar: Style::default().dark_gray(),
            warning: Style::default().yellow(),
        }
    }
}

impl Theme {
    pub fn from_card_style(style: &CardStyle) -> Self {
        let mut text = Style::default().fg(color_or_reset(&style.font.color));
        if style.font.weight.eq_ignore_ascii_case("bold") {
            text = text.add_modifier(Modifier::BOLD);
        }
        if style.font.style.eq_ignore_ascii_case("italic") {
            text = text.add_modifier(Modifier::ITALIC);
        }
        let border = Style::default().fg(color_or_reset(&style.border_color));
        let hover = Style::default().fg(color_or_reset(&style.hover_border_color));
        Self {
            text_primary: text,
            text_muted: text.add_modifier(Modifier::DIM),
            annotation: Style::default().fg(color_or_reset(&style.tick_color)),
            border,
            border_hover: hover,
            border_marked: hover.add_modifier(Modifier::BOLD),
            scrollbar: Style::default().fg(color_or_reset(&style.font.color)),
            warning: text,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_short_long_and_alpha_hex() {
        assert_eq!(parse_hex_color("#fff"), Ok(Color::Rgb(255, 255, 255)));
        assert_eq!(parse_hex_color("#1a2B3c"), Ok(Color::Rgb(0x1a, 0x2b, 0x3c)));
        assert_eq!(parse_hex_color("#1a2b3c4D"), Ok(Color::Rgb(0x1a, 0x2b, 0x3c)));
        assert!(parse_hex_color("1a2b3c").is_err());
        assert!(parse_hex_color("#12").is_err());
        assert!(parse_hex_color("#zzzzzz").is_err());
        assert!(parse_hex_color("#ééé").is_err());
    }

    #[test]
    fn scrollbar_colors_carry_alpha_suffixes() {
        let styling = HostStyling {
            font: FontStyling {
                color: "#333333".into(),
                ..FontStyling::default()
            },
            line_color: "#cccccc".into(),
            tick_color: "#999999".into(),
            background_color: "#ffffff".into(),
        };
        let style = CardStyle::from_styling(&styling);
        assert_eq!(style.scrollbar_track, "#cccccc4D");
        assert_eq!(style.scrollbar_thumb, "#3333334D");
        assert_eq!(style.scrollbar_thumb_active, "#333333BF");
        assert_eq!(style.hover_border_color, "#333333");

        let theme = Theme::from_card_style(&style);
        assert_eq!(theme.border.fg, Some(Color::Rgb(0xcc, 0xcc, 0xcc)));
    }
}
