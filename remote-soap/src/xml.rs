//! Single-field text extraction for XML-shaped payloads.
//!
//! This is deliberately not an XML parser. Matching is a literal,
//! case-sensitive scan for the first `<tag>`/`</tag>` pair: no namespace
//! or attribute awareness, no entity decoding, no handling of repeated or
//! self-closing tags. Renderer control responses and device descriptions
//! are flat and machine-generated, which is the only reason this holds up;
//! anything needing real XML semantics does not belong here.

/// Return the text between the first `<name>` and the first following
/// `</name>`, or `None` if either is missing.
pub fn extract_tag<'a>(text: &'a str, name: &str) -> Option<&'a str> {
    let open = format!("<{}>", name);
    let close = format!("</{}>", name);

    let start = text.find(&open)? + open.len();
    let end = text[start..].find(&close)? + start;
    Some(&text[start..end])
}

/// Decode the five predefined XML entities.
///
/// Track metadata arrives entity-escaped inside its carrier field; this is
/// just enough decoding to run [`extract_tag`] over the payload afterwards.
/// `&amp;` is decoded last so that doubly-escaped sequences stay escaped.
pub fn unescape_minimal(text: &str) -> String {
    text.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&apos;", "'")
        .replace("&amp;", "&")
}
