use teloxide::prelude::*;

const GREETING: &str = "سلام! درخواستت رو از طریق وب-اپ بفرست تا بررسی کنم.";

fn parse_command(text: &str) -> Option<String> {
    // Telegram may send `/cmd@botname arg1 ...`
    let first = text.split_whitespace().next()?;
    let cmd = first.strip_prefix('/')?;
    let name = cmd.split('@').next().unwrap_or("").to_lowercase();
    (!name.is_empty()).then_some(name)
}

/// Answer the commands we know. Returns `false` if `text` was not one of them.
pub async fn handle_command(bot: &Bot, msg: &Message, text: &str) -> ResponseResult<bool> {
    match parse_command(text).as_deref() {
        Some("start") | Some("help") => {
            bot.send_message(msg.chat.id, GREETING).await?;
            Ok(true)
        }
        _ => Ok(false),
    }
}
