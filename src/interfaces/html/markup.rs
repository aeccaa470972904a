//! Minimal markup scanning helpers.
//!
//! These do not build a DOM. They locate opening tags by name, read their
//! attributes and pull text out of simple elements, which is all the skin
//! cards need. Tag and attribute names are matched ASCII case-insensitively.

/// An opening tag found in a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OpenTag<'a> {
    /// Byte offset of the `<`.
    pub start: usize,
    /// Byte offset just past the closing `>`.
    pub end: usize,
    /// The raw tag text, `<` to `>` inclusive.
    pub raw: &'a str,
}

impl<'a> OpenTag<'a> {
    /// Value of attribute `name`, entity-decoded.
    pub fn attr(&self, name: &str) -> Option<String> {
        attr_value(self.raw, name)
    }

    /// Whether the `class` attribute contains `needle` as a substring.
    pub fn class_contains(&self, needle: &str) -> bool {
        self.attr("class").is_some_and(|c| c.contains(needle))
    }
}

/// Iterates every opening `<tag ...>` in `html`.
pub fn open_tags<'a>(html: &'a str, tag: &'a str) -> impl Iterator<Item = OpenTag<'a>> + 'a {
    let mut from = 0;
    std::iter::from_fn(move || {
        let found = find_open_tag(html, tag, from)?;
        from = found.end;
        Some(found)
    })
}

/// First opening `<tag ...>` at or after `from`.
pub fn find_open_tag<'a>(html: &'a str, tag: &str, from: usize) -> Option<OpenTag<'a>> {
    let bytes = html.as_bytes();
    let mut pos = from;
    while let Some(rel) = html.get(pos..)?.find('<') {
        let start = pos + rel;
        let name_start = start + 1;
        let name_end = name_start + tag.len();
        let name_matches = html
            .get(name_start..name_end)
            .is_some_and(|n| n.eq_ignore_ascii_case(tag));
        let boundary = bytes
            .get(name_end)
            .is_some_and(|b| b.is_ascii_whitespace() || *b == b'>' || *b == b'/');

        if name_matches && boundary {
            let end = tag_end(html, name_end)?;
            return Some(OpenTag {
                start,
                end,
                raw: &html[start..end],
            });
        }
        pos = start + 1;
    }
    None
}

/// Offset just past the `>` closing a tag, skipping quoted attribute values.
fn tag_end(html: &str, from: usize) -> Option<usize> {
    let mut quote: Option<u8> = None;
    for (i, b) in html.as_bytes().iter().enumerate().skip(from) {
        match (quote, *b) {
            (Some(q), c) if c == q => quote = None,
            (Some(_), _) => {}
            (None, b'"') | (None, b'\'') => quote = Some(*b),
            (None, b'>') => return Some(i + 1),
            _ => {}
        }
    }
    None
}

/// Reads an attribute from a raw opening tag.
///
/// Handles double-quoted, single-quoted and unquoted values. Attributes
/// without a value yield an empty string.
pub fn attr_value(raw_tag: &str, name: &str) -> Option<String> {
    let bytes = raw_tag.as_bytes();
    // skip "<tagname"
    let mut i = 1;
    while i < bytes.len() && !bytes[i].is_ascii_whitespace() && bytes[i] != b'>' {
        i += 1;
    }

    loop {
        while i < bytes.len() && (bytes[i].is_ascii_whitespace() || bytes[i] == b'/') {
            i += 1;
        }
        if i >= bytes.len() || bytes[i] == b'>' {
            return None;
        }

        let key_start = i;
        while i < bytes.len()
            && !bytes[i].is_ascii_whitespace()
            && !matches!(bytes[i], b'=' | b'>' | b'/')
        {
            i += 1;
        }
        let key = &raw_tag[key_start..i];

        while i < bytes.len() && bytes[i].is_ascii_whitespace() {
            i += 1;
        }

        let value = if i < bytes.len() && bytes[i] == b'=' {
            i += 1;
            while i < bytes.len() && bytes[i].is_ascii_whitespace() {
                i += 1;
            }
            match bytes.get(i).copied() {
                Some(q @ (b'"' | b'\'')) => {
                    let value_start = i + 1;
                    let close = raw_tag[value_start..].find(q as char)? + value_start;
                    i = close + 1;
                    &raw_tag[value_start..close]
                }
                _ => {
                    let value_start = i;
                    while i < bytes.len() && !bytes[i].is_ascii_whitespace() && bytes[i] != b'>' {
                        i += 1;
                    }
                    &raw_tag[value_start..i]
                }
            }
        } else {
            ""
        };

        if key.eq_ignore_ascii_case(name) {
            return Some(decode_entities(value));
        }
    }
}

/// Offset just past the `</tag>` matching `open`, or the end of `html`.
///
/// Nested elements of the same name are counted so the match is the
/// element's own closing tag. Self-closing tags do not open a level.
pub fn element_end(html: &str, open: &OpenTag<'_>, tag: &str) -> usize {
    let close = format!("</{tag}");
    let mut depth = 1usize;
    let mut pos = open.end;

    while let Some(rel) = find_ci(&html[pos..], &close) {
        let close_at = pos + rel;
        match find_open_tag(html, tag, pos) {
            Some(inner) if inner.start < close_at => {
                if !inner.raw.ends_with("/>") {
                    depth += 1;
                }
                pos = inner.end;
            }
            _ => {
                let after = html[close_at..]
                    .find('>')
                    .map_or(html.len(), |i| close_at + i + 1);
                depth -= 1;
                if depth == 0 {
                    return after;
                }
                pos = after;
            }
        }
    }
    html.len()
}

/// Markup of the element opened by `open`, from its `<` to its closing tag.
pub fn element_markup<'a>(html: &'a str, open: &OpenTag<'_>, tag: &str) -> &'a str {
    &html[open.start..element_end(html, open, tag)]
}

/// Text content of the element opened by `open`, up to its `</tag>`.
///
/// Nested markup is stripped; whitespace is collapsed and entities decoded.
pub fn element_text(html: &str, open: &OpenTag<'_>, tag: &str) -> String {
    let close = format!("</{tag}");
    let rest = &html[open.end..];
    let inner_end = find_ci(rest, &close).unwrap_or(rest.len());
    normalize_ws(&decode_entities(&strip_tags(&rest[..inner_end])))
}

/// Case-insensitive ASCII substring search.
pub fn find_ci(haystack: &str, needle: &str) -> Option<usize> {
    let needle = needle.as_bytes();
    haystack
        .as_bytes()
        .windows(needle.len())
        .position(|w| w.eq_ignore_ascii_case(needle))
}

/// Removes every `<...>` span.
pub fn strip_tags(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut in_tag = false;
    for ch in s.chars() {
        match ch {
            '<' => in_tag = true,
            '>' => in_tag = false,
            _ if !in_tag => out.push(ch),
            _ => {}
        }
    }
    out
}

/// Decodes the handful of entities the source pages use.
pub fn decode_entities(s: &str) -> String {
    if !s.contains('&') {
        return s.to_string();
    }
    s.replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&#x27;", "'")
        .replace("&nbsp;", " ")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&amp;", "&")
}

/// Collapses whitespace runs into single spaces and trims.
pub fn normalize_ws(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}
