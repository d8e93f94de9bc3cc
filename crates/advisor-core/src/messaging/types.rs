use std::path::PathBuf;

/// A photo to deliver.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum OutgoingPhoto {
    /// A file on local disk, uploaded as an attachment.
    LocalFile(PathBuf),
    /// A reference the platform resolves itself: an `http(s)` URL or a
    /// platform file id. Passed through verbatim.
    Remote(String),
}

/// Limits of a messenger implementation.
#[derive(Clone, Copy, Debug)]
pub struct MessagingCapabilities {
    pub max_message_len: usize,
    pub max_caption_len: usize,
}

/// Truncate `text` to at most `max_chars` characters, marking the cut.
pub fn truncate_chars(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let keep = max_chars.saturating_sub(1);
    let mut out: String = text.chars().take(keep).collect();
    out.push('…');
    out
}
