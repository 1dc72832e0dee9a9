use super::*;

use teloxide::types::{KeyboardButton, KeyboardMarkup, ParseMode};

#[derive(Clone, Debug, Default)]
pub(super) struct SendOptions {
    pub(super) html: bool,
    pub(super) keyboard: Option<Keyboard>,
}

impl SendOptions {
    pub(super) fn html() -> Self {
        SendOptions {
            html: true,
            keyboard: None,
        }
    }

    pub(super) fn keyboard(keyboard: Keyboard) -> Self {
        SendOptions {
            html: false,
            keyboard: Some(keyboard),
        }
    }
}

#[async_trait]
pub(super) trait Messenger: Send + Sync {
    async fn send_message(&self, chat_id: i64, text: &str, options: SendOptions) -> Result<()>;
    async fn answer_callback(&self, callback_id: &str, text: &str) -> Result<()>;
}

pub(super) struct TelegramMessenger {
    bot: Bot,
}

impl TelegramMessenger {
    pub(super) fn new(bot: Bot) -> Self {
        TelegramMessenger { bot }
    }
}

#[async_trait]
impl Messenger for TelegramMessenger {
    async fn send_message(&self, chat_id: i64, text: &str, options: SendOptions) -> Result<()> {
        let mut request = self.bot.send_message(ChatId(chat_id), text);
        if options.html {
            request = request.parse_mode(ParseMode::Html);
        }
        if let Some(keyboard) = options.keyboard {
            request = request.reply_markup(reply_keyboard(&keyboard));
        }
        request.await?;
        Ok(())
    }

    async fn answer_callback(&self, callback_id: &str, text: &str) -> Result<()> {
        let mut request = self.bot.answer_callback_query(callback_id.to_string());
        if !text.is_empty() {
            request = request.text(text);
        }
        request.await?;
        Ok(())
    }
}

fn reply_keyboard(keyboard: &Keyboard) -> KeyboardMarkup {
    let rows: Vec<Vec<KeyboardButton>> = keyboard
        .rows
        .iter()
        .map(|row| row.iter().map(|cell| KeyboardButton::new(cell.text.clone())).collect())
        .collect();
    KeyboardMarkup::new(rows)
        .resize_keyboard(true)
        .one_time_keyboard(false)
}
