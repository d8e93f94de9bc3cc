/// Telegram user id (numeric). Doubles as the requester identity.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct UserId(pub i64);

/// Telegram chat id (numeric).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ChatId(pub i64);

impl From<UserId> for ChatId {
    // Private chats share the user's id.
    fn from(u: UserId) -> Self {
        ChatId(u.0)
    }
}
