//! Wrapping transcript text to the view width.

/// Tabs are expanded to this many spaces before wrapping.
pub(crate) const TAB_WIDTH: usize = 4;

/// Wrap `text` to `width` columns. Explicit newlines are kept, blank lines are
/// preserved, and a width of zero leaves each line whole.
pub(crate) fn wrap_lines(text: &str, width: usize) -> Vec<String> {
    let tab = " ".repeat(TAB_WIDTH);
    let mut out = Vec::new();
    for line in text.split('\n') {
        let line = line.trim_end_matches('\r').replace('\t', &tab);
        if line.is_empty() {
            out.push(String::new());
        } else if width == 0 {
            out.push(line);
        } else {
            out.extend(textwrap::wrap(&line, width).into_iter().map(|c| c.into_owned()));
        }
    }
    out
}
