/// Interaction state owned by one text card instance.
///
/// Both fields outlive individual data views: a new delivery overwrites them through the engines
/// but never resets them.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SessionState {
    /// Index of the next row that has not been rendered yet.
    pub cursor: usize,
    /// Index of the last row marked by a plain or ctrl click; start of shift-click ranges.
    pub mark_anchor: usize,
}

impl SessionState {
    pub fn new() -> Self {
        Self::default()
    }
}
