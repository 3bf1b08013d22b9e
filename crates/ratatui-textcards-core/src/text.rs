/// Separator hosts use between hierarchy levels in a formatted value.
pub const PATH_SEPARATOR: &str = " » ";

/// Cuts `value` so the result, including the trailing `...`, is `max_len` characters long.
pub fn truncate(value: &str, max_len: usize) -> String {
    let keep = max_len.saturating_sub(3);
    let mut out: String = value.chars().take(keep).collect();
    out.push_str("...");
    out
}

/// Like [`truncate`], but leaves strings that already fit untouched.
pub fn truncate_to_fit(value: &str, max_len: usize) -> String {
    if value.chars().count() <= max_len {
        return value.to_string();
    }
    truncate(value, max_len)
}

pub fn join_path(path: &[String]) -> String {
    path.join(PATH_SEPARATOR)
}

/// One `level: value` line per hierarchy level.
pub fn hierarchy_tooltip(levels: &[String], path: &[String]) -> String {
    levels
        .iter()
        .zip(path)
        .map(|(level, value)| format!("{level}: {value}"))
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncate_counts_the_ellipsis() {
        assert_eq!(truncate("abcdefghij", 6), "abc...");
        assert_eq!(truncate("ab", 2), "...");
        assert_eq!(truncate_to_fit("short", 10), "short");
        assert_eq!(truncate_to_fit("你好世界你好", 5), "你好...");
    }

    #[test]
    fn tooltip_pairs_levels_with_values() {
        let levels = vec!["Country".to_string(), "City".to_string()];
        let path = vec!["Sweden".to_string(), "Göteborg".to_string()];
        assert_eq!(
            hierarchy_tooltip(&levels, &path),
            "Country: Sweden\nCity: Göteborg"
        );
        assert_eq!(join_path(&path), "Sweden » Göteborg");
    }
}
