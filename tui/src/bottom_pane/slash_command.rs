//! Cursor-token matcher for in-progress `/command` input.
//!
//! Derived state only: the match is recomputed on every text change *and*
//! every cursor movement, because moving the caret out of a token must
//! dismiss the popup and moving back in must restore it.

/// An in-progress slash token under the cursor.
///
/// `start..end` is the byte span of the `/query` token (leading whitespace
/// excluded); replacing exactly that span with template content is what keeps
/// surrounding text intact on acceptance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlashCommandMatch {
    pub query: String,
    pub start: usize,
    pub end: usize,
}

/// Find the slash token the cursor is sitting in, if any.
///
/// Only the substring ending at the cursor is considered: the token must be
/// a `/` immediately preceded by start-of-text or whitespace, followed by a
/// run of non-whitespace, non-slash characters reaching exactly to the
/// cursor. A bare `/` matches with an empty query (the popup then shows the
/// full template list).
pub fn find_slash_command(text: &str, cursor: usize) -> Option<SlashCommandMatch> {
    // Clamp to the text and snap to the nearest char boundary at or before
    // the requested offset.
    let mut cursor = cursor.min(text.len());
    while cursor > 0 && !text.is_char_boundary(cursor) {
        cursor -= 1;
    }
    if cursor == 0 {
        return None;
    }

    let before_cursor = &text[..cursor];
    let start = before_cursor
        .char_indices()
        .rfind(|(_, c)| c.is_whitespace())
        .map(|(idx, c)| idx + c.len_utf8())
        .unwrap_or(0);

    let token = &before_cursor[start..];
    let query = token.strip_prefix('/')?;
    if query.chars().any(|c| c.is_whitespace() || c == '/') {
        return None;
    }

    Some(SlashCommandMatch {
        query: query.to_string(),
        start,
        end: cursor,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn matched(query: &str, start: usize, end: usize) -> Option<SlashCommandMatch> {
        Some(SlashCommandMatch {
            query: query.to_string(),
            start,
            end,
        })
    }

    #[test]
    fn token_after_whitespace_matches() {
        assert_eq!(find_slash_command("hello /wor", 10), matched("wor", 6, 10));
    }

    #[test]
    fn slash_without_leading_whitespace_does_not_match() {
        assert_eq!(find_slash_command("hello/wor", 9), None);
    }

    #[test]
    fn bare_slash_matches_with_empty_query() {
        assert_eq!(find_slash_command("/", 1), matched("", 0, 1));
    }

    #[test]
    fn cursor_at_position_zero_never_matches() {
        assert_eq!(find_slash_command("/cmd", 0), None);
        assert_eq!(find_slash_command("", 0), None);
    }

    #[test]
    fn cursor_inside_token_matches_the_prefix() {
        // Caret between "wo" and "r": the run ending at the cursor is "/wo".
        assert_eq!(find_slash_command("hello /wor", 9), matched("wo", 6, 9));
    }

    #[test]
    fn cursor_outside_token_does_not_match() {
        // Caret in the leading word, before the slash token.
        assert_eq!(find_slash_command("hello /wor", 3), None);
        // Caret right on the whitespace before the slash.
        assert_eq!(find_slash_command("hello /wor", 6), None);
    }

    #[test]
    fn only_the_token_preceding_the_cursor_counts() {
        assert_eq!(
            find_slash_command("/one two /three", 15),
            matched("three", 9, 15)
        );
        // Cursor at the end of the first token still sees only that token.
        assert_eq!(find_slash_command("/one two /three", 4), matched("one", 0, 4));
    }

    #[test]
    fn second_slash_inside_a_token_breaks_the_match() {
        assert_eq!(find_slash_command("see //x", 7), None);
        assert_eq!(find_slash_command("a /b/c", 6), None);
    }

    #[test]
    fn whitespace_after_the_token_ends_the_run() {
        // The run before the cursor includes a space, so no match.
        assert_eq!(find_slash_command("/cmd ", 5), None);
    }

    #[test]
    fn start_of_line_after_newline_counts_as_whitespace_boundary() {
        assert_eq!(find_slash_command("first\n/next", 11), matched("next", 6, 11));
    }

    #[test]
    fn out_of_range_cursor_is_clamped() {
        assert_eq!(find_slash_command("/go", 99), matched("go", 0, 3));
    }
}
