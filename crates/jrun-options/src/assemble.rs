/// Collapse every whitespace run to a single space and trim both ends.
pub fn normalize_whitespace(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    push_tokens(&mut out, input);
    out
}

/// User options first, then each derived option in order, single-space
/// separated. Flags are passed through verbatim; nothing is validated.
pub fn assemble<I, S>(user_options: &str, derived: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut out = String::with_capacity(user_options.len());
    push_tokens(&mut out, user_options);
    for option in derived {
        push_tokens(&mut out, option.as_ref());
    }
    out
}

fn push_tokens(out: &mut String, text: &str) {
    for token in text.split_whitespace() {
        if !out.is_empty() {
            out.push(' ');
        }
        out.push_str(token);
    }
}
