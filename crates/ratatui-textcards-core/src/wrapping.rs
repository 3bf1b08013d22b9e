use unicode_width::UnicodeWidthChar;
use unicode_width::UnicodeWidthStr;

/// Word-wrapped lines of one card's content.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct WrappedText {
    lines: Vec<String>,
    width: u16,
}

impl WrappedText {
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn height(&self) -> u32 {
        self.lines.len() as u32
    }

    /// Widest line, in columns.
    pub fn width(&self) -> u16 {
        self.width
    }
}

/// Wraps `content` at `width` columns, breaking after whitespace or punctuation when possible.
///
/// Explicit newlines are kept and tabs expand to four spaces. A width of zero disables wrapping.
pub fn wrap(content: &str, width: u16) -> WrappedText {
    let mut lines = Vec::new();
    for raw in content.split('\n') {
        let raw = normalize_tabs(raw.strip_suffix('\r').unwrap_or(raw));
        if width == 0 || UnicodeWidthStr::width(raw.as_str()) <= width as usize {
            lines.push(raw);
            continue;
        }
        word_wrap(&raw, width as usize, &mut lines);
    }
    let width = lines
        .iter()
        .map(|l| UnicodeWidthStr::width(l.as_str()) as u16)
        .max()
        .unwrap_or(0);
    WrappedText { lines, width }
}

fn word_wrap(raw: &str, max_cols: usize, out: &mut Vec<String>) {
    let mut line = String::new();
    let mut line_cols = 0usize;
    let mut last_soft_idx: Option<usize> = None;

    for ch in raw.chars() {
        let w = UnicodeWidthChar::width(ch).unwrap_or(0);
        if line_cols.saturating_add(w) > max_cols {
            if let Some(split) = last_soft_idx {
                let (prefix, rest) = line.split_at(split);
                out.push(prefix.trim_end().to_string());
                line = rest.trim_start().to_string();
                last_soft_idx = None;
            } else if !line.is_empty() {
                out.push(std::mem::take(&mut line));
            }
        }

        if line.is_empty() && ch.is_whitespace() {
            continue;
        }

        if ch.is_whitespace()
            || matches!(
                ch,
                ',' | ';' | '.' | ':' | ')' | ']' | '}' | '|' | '/' | '?' | '!' | '-' | '_'
            )
        {
            last_soft_idx = Some(line.len() + ch.len_utf8());
        }

        line.push(ch);
        line_cols = UnicodeWidthStr::width(line.as_str());
    }

    if !line.is_empty() {
        out.push(line);
    }
}

fn normalize_tabs(s: &str) -> String {
    if s.contains('\t') {
        s.replace('\t', "    ")
    } else {
        s.to_string()
    }
}

#[derive(Clone, Debug)]
struct Entry {
    source: String,
    wrapped: WrappedText,
}

/// Wrapped text of every rendered card, rewrapped only when a card's content or the width
/// changes.
#[derive(Clone, Debug, Default)]
pub struct WrapCache {
    width: Option<u16>,
    entries: Vec<Entry>,
}

impl WrapCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Brings the cache in line with the card contents, in display order.
    pub fn sync<'a, I>(&mut self, width: u16, contents: I)
    where
        I: IntoIterator<Item = &'a str>,
    {
        if self.width != Some(width) {
            self.entries.clear();
            self.width = Some(width);
        }
        let mut len = 0;
        for (i, content) in contents.into_iter().enumerate() {
            len = i + 1;
            match self.entries.get_mut(i) {
                Some(entry) if entry.source == content => {}
                Some(entry) => entry.wrapped = rewrap(&mut entry.source, content, width),
                None => self.entries.push(Entry {
                    source: content.to_string(),
                    wrapped: wrap(content, width),
                }),
            }
        }
        self.entries.truncate(len);
    }

    pub fn get(&self, position: usize) -> Option<&WrappedText> {
        self.entries.get(position).map(|e| &e.wrapped)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn rewrap(source: &mut String, content: &str, width: u16) -> WrappedText {
    source.clear();
    source.push_str(content);
    wrap(content, width)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wraps_at_word_boundaries() {
        let wrapped = wrap("hello world", 5);
        assert_eq!(wrapped.lines(), ["hello", "world"]);
        assert_eq!(wrapped.height(), 2);
        assert_eq!(wrapped.width(), 5);

        let wrapped = wrap("a-b-c-d", 4);
        assert_eq!(wrapped.lines(), ["a-b-", "c-d"]);
    }

    #[test]
    fn keeps_newlines_and_expands_tabs() {
        let wrapped = wrap("first\n\n\tsecond", 80);
        assert_eq!(wrapped.lines(), ["first", "", "    second"]);
    }

    #[test]
    fn long_words_are_split_hard() {
        let wrapped = wrap("abcdefgh", 3);
        assert_eq!(wrapped.lines(), ["abc", "def", "gh"]);
    }

    #[test]
    fn cache_rewraps_changed_cards_only() {
        let mut cache = WrapCache::new();
        cache.sync(5, ["hello world", "x"]);
        assert_eq!(cache.len(), 2);
        assert_eq!(cache.get(0).map(WrappedText::height), Some(2));

        cache.sync(5, ["hello world", "y", "z"]);
        assert_eq!(cache.get(1).map(|w| w.lines().to_vec()), Some(vec!["y".to_string()]));
        assert_eq!(cache.len(), 3);

        cache.sync(20, ["hello world"]);
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.get(0).map(WrappedText::height), Some(1));
    }
}
