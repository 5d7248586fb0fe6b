use crate::error::ParseError;

/// Split an argument line into tokens.
///
/// * Whitespace separates tokens, except inside double quotes.
/// * A double quote toggles quoting, and always ends the token before it.
/// A quoted segment is its own token (even when empty).
/// * `escape` makes the next character literal (inside quotes as well) and is itself dropped.
///
/// ### Example
/// ```
/// # use argwise_engine as argwise;
/// use argwise::split_line;
///
/// let tokens = split_line(r#"-v --msg "hello world" a\ b"#, '\\').unwrap();
/// assert_eq!(tokens, vec!["-v", "--msg", "hello world", "a b"]);
/// ```
pub fn split_line(line: &str, escape: char) -> Result<Vec<String>, ParseError> {
    let mut tokens = Vec::default();
    let mut current = String::default();
    // The character offset of the open quote, while quoting.
    let mut quoted: Option<usize> = None;
    let mut escaped = false;

    for (offset, c) in line.chars().enumerate() {
        if escaped {
            current.push(c);
            escaped = false;
        } else if c == escape {
            escaped = true;
        } else if c == '"' {
            match quoted.take() {
                Some(_) => {
                    tokens.push(std::mem::take(&mut current));
                }
                None => {
                    flush(&mut tokens, &mut current);
                    quoted.replace(offset);
                }
            }
        } else if quoted.is_none() && c.is_whitespace() {
            flush(&mut tokens, &mut current);
        } else {
            current.push(c);
        }
    }

    if let Some(offset) = quoted {
        return Err(ParseError::UnterminatedQuote(offset));
    }

    flush(&mut tokens, &mut current);
    Ok(tokens)
}

fn flush(tokens: &mut Vec<String>, current: &mut String) {
    if !current.is_empty() {
        tokens.push(std::mem::take(current));
    }
}
