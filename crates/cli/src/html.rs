//! Just enough HTML scanning to read a saved page: attribute values, the
//! cells of table rows and their text.

/// Returns the value of the first `name` attribute in `html`, with its
/// character references decoded.
pub(crate) fn find_attribute(html: &str, name: &str) -> Option<String> {
    let mut rest = html;

    while let Some(at) = rest.find(name) {
        let preceded_by_space = rest[..at].chars().next_back().is_some_and(char::is_whitespace);
        rest = &rest[at + name.len()..];

        if !preceded_by_space {
            continue;
        }

        let Some(value) = rest.trim_start().strip_prefix('=') else {
            continue;
        };
        let value = value.trim_start();

        let raw = match value.chars().next() {
            Some(quote @ ('"' | '\'')) => {
                let quoted = &value[1..];
                &quoted[..quoted.find(quote)?]
            }
            Some(_) => {
                let end = value
                    .find(|c: char| c.is_whitespace() || c == '>')
                    .unwrap_or(value.len());
                &value[..end]
            }
            None => return None,
        };

        return Some(unescape(raw));
    }

    None
}

/// Returns the inner HTML of every `tag` element of `html`, in document
/// order. Elements of the same tag are not expected to nest.
pub(crate) fn elements<'a>(html: &'a str, tag: &str) -> Vec<&'a str> {
    let open = format!("<{tag}");
    let close = format!("</{tag}>");

    let mut found = Vec::new();
    let mut rest = html;

    while let Some(start) = find_open_tag(rest, &open) {
        let after = &rest[start + open.len()..];
        let Some(gt) = after.find('>') else {
            break;
        };

        let body = &after[gt + 1..];
        let end = body.find(&close).unwrap_or(body.len());
        found.push(&body[..end]);
        rest = &body[end..];
    }

    found
}

fn find_open_tag(html: &str, open: &str) -> Option<usize> {
    let mut offset = 0;

    while let Some(at) = html[offset..].find(open) {
        let start = offset + at;
        let next = html[start + open.len()..].chars().next();

        if matches!(next, Some(c) if c.is_whitespace() || c == '>' || c == '/') {
            return Some(start);
        }

        offset = start + open.len();
    }

    None
}

/// The text of an HTML fragment: tags removed, character references
/// decoded, white space collapsed.
pub(crate) fn inner_text(html: &str) -> String {
    let mut text = String::with_capacity(html.len());
    let mut in_tag = false;

    for c in html.chars() {
        match c {
            '<' => in_tag = true,
            '>' if in_tag => in_tag = false,
            _ if !in_tag => text.push(c),
            _ => {}
        }
    }

    unescape(&text).split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Decodes the character references of `text`. Unknown references are kept
/// as they are.
pub(crate) fn unescape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;

    while let Some(at) = rest.find('&') {
        out.push_str(&rest[..at]);
        let reference = &rest[at..];

        let decoded = reference
            .find(';')
            .filter(|&end| end <= 10)
            .and_then(|end| decode_reference(&reference[1..end]).map(|c| (c, end)));

        match decoded {
            Some((c, end)) => {
                out.push(c);
                rest = &reference[end + 1..];
            }
            None => {
                out.push('&');
                rest = &reference[1..];
            }
        }
    }

    out.push_str(rest);
    out
}

fn decode_reference(name: &str) -> Option<char> {
    match name {
        "quot" => Some('"'),
        "apos" => Some('\''),
        "amp" => Some('&'),
        "lt" => Some('<'),
        "gt" => Some('>'),
        "nbsp" => Some('\u{a0}'),
        _ => {
            let number = name.strip_prefix('#')?;
            let code = match number.strip_prefix(['x', 'X']) {
                Some(hex) => u32::from_str_radix(hex, 16).ok()?,
                None => number.parse().ok()?,
            };
            char::from_u32(code)
        }
    }
}
