//! Admin report formatting and the `USER_ID:<digits>` correlation tag.
//!
//! The tag is the only link between a forwarded report and its requester:
//! nothing is stored, so a later admin reply is routed by re-reading the tag
//! from the message being replied to.

use std::sync::OnceLock;

use regex::Regex;

use crate::{advisory::AdvisoryRequest, domain::UserId, messaging::types::truncate_chars};

pub const TAG_PREFIX: &str = "USER_ID:";

/// Reason forwarded when no AI key is configured.
pub const NO_API_KEY: &str = "NO_API_KEY";

pub fn requester_tag(user: UserId) -> String {
    format!("{TAG_PREFIX}{}", user.0)
}

fn tag_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"USER_ID:(\d+)").expect("tag regex"))
}

/// Recover the requester from a report (or photo caption).
///
/// Returns `None` when the tag is missing or the digits overflow an `i64`.
pub fn extract_requester(text: &str) -> Option<UserId> {
    let caps = tag_re().captures(text)?;
    caps.get(1)?.as_str().parse::<i64>().ok().map(UserId)
}

/// Text body of a report sent to the administrator.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AdminReport {
    pub text: String,
}

impl AdminReport {
    pub fn build(req: &AdvisoryRequest, reason: &str) -> Self {
        let text = format!(
            "📥 گزارش جدید کاربر\n\
{tag}\n\
محصول: {product}\n\
مشکلات: {problems}\n\
توضیحات: {extra}\n\
خطا/وضعیت API: {reason}",
            tag = requester_tag(req.requester()),
            product = req.product,
            problems = req.problems.join(", "),
            extra = req.extra_info,
        );
        Self { text }
    }

    /// The tag sits on the second line, so any sane limit keeps it intact.
    pub fn truncated(self, max_chars: usize) -> Self {
        Self {
            text: truncate_chars(&self.text, max_chars),
        }
    }
}

pub fn photo_caption(user: UserId, index: usize, total: usize) -> String {
    format!("{} • {}/{}", requester_tag(user), index + 1, total)
}
