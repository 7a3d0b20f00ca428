use std::error::Error;

use md5::{Digest, Md5};

/// Split a comma-separated line into trimmed, non-empty URLs.
///
/// Order is kept and repeated URLs are not collapsed.
pub fn parse_url_list(input: &str) -> Vec<String> {
    input
        .split(',')
        .map(str::trim)
        .filter(|url| !url.is_empty())
        .map(str::to_string)
        .collect()
}

/// Final segment of the URL path, or `None` when the path is empty or ends in `/`.
///
/// Works on the text as the user typed it rather than on a parsed
/// `url::Url`, which would percent-encode it and treat `\` as a separator. The
/// segment is returned verbatim, minus any `;params`.
pub fn filename_from_url(url: &str) -> Option<&str> {
    let segment = raw_path(url).rsplit('/').next()?;
    let segment = segment.split(';').next().unwrap_or(segment);
    Some(segment).filter(|segment| !segment.is_empty())
}

/// The path part of `url`: scheme, authority, query and fragment removed.
fn raw_path(url: &str) -> &str {
    let rest = match url.split_once(':') {
        Some((scheme, rest)) if is_scheme(scheme) => rest,
        _ => url,
    };
    let rest = match rest.strip_prefix("//") {
        Some(authority_and_path) => authority_and_path
            .find(['/', '?', '#'])
            .map_or("", |end| &authority_and_path[end..]),
        None => rest,
    };
    let end = rest.find(['?', '#']).unwrap_or(rest.len());
    &rest[..end]
}

fn is_scheme(s: &str) -> bool {
    let mut chars = s.chars();
    chars.next().is_some_and(|c| c.is_ascii_alphabetic())
        && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
}

/// `image_<md5 hex>.jpg` for the given body.
pub fn content_hash_filename(body: &[u8]) -> String {
    format!("image_{}.jpg", hex::encode(Md5::digest(body)))
}

/// Pick the on-disk name for a body fetched from `url`.
pub fn resolve_filename(url: &str, body: &[u8]) -> String {
    match filename_from_url(url) {
        Some(name) => name.to_string(),
        None => content_hash_filename(body),
    }
}

/// Render an error together with its `source()` chain, `outer: inner: ...`.
pub fn error_chain(err: &dyn Error) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        let cause_text = cause.to_string();
        if !message.contains(&cause_text) {
            message.push_str(": ");
            message.push_str(&cause_text);
        }
        source = cause.source();
    }
    message
}
