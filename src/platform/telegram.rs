use std::sync::Arc;

use anyhow::Result;
use teloxide::payloads::SendMessageSetters;
use teloxide::prelude::*;
use teloxide::types::{ForceReply, Me, ParseMode};
use tracing::{info, warn};

use crate::bot::{respond, AppState};
use crate::platform::{IncomingMessage, OutgoingText, TextFormat};

/// Run the Telegram bot platform until Ctrl-C
pub async fn run(bot: Bot, state: Arc<AppState>) -> Result<()> {
    info!("Starting Telegram platform...");

    if let Err(e) = bot.set_my_commands(state.commands.bot_commands()).await {
        warn!("Failed to publish command menu: {}", e);
    }

    let handler = Update::filter_message().endpoint(handle_message);

    Dispatcher::builder(bot, handler)
        .dependencies(dptree::deps![state])
        .default_handler(|upd| async move {
            warn!("Unhandled update: {:?}", upd.id);
        })
        .error_handler(LoggingErrorHandler::with_custom_text("telegram"))
        .enable_ctrlc_handler()
        .build()
        .dispatch()
        .await;

    info!("Telegram platform stopped");
    Ok(())
}

async fn handle_message(
    bot: Bot,
    msg: Message,
    me: Me,
    state: Arc<AppState>,
) -> ResponseResult<()> {
    let user = match msg.from.as_ref() {
        Some(user) => user,
        None => return Ok(()),
    };

    let text = match msg.text() {
        Some(t) => t.to_string(),
        None => return Ok(()),
    };

    let incoming = IncomingMessage {
        platform: "telegram".to_string(),
        user_id: user.id.0,
        chat_id: msg.chat.id.0.to_string(),
        user_name: user.full_name(),
        text,
    };

    if let Some(reply) = respond(&state, &incoming, me.user.username.as_deref()).await {
        send_reply(&bot, msg.chat.id, reply).await?;
    }

    Ok(())
}

async fn send_reply(bot: &Bot, chat_id: ChatId, reply: OutgoingText) -> ResponseResult<()> {
    let mut request = bot.send_message(chat_id, reply.text);
    if reply.format == TextFormat::Html {
        request = request.parse_mode(ParseMode::Html);
    }
    if reply.force_reply {
        request = request.reply_markup(ForceReply::new().selective());
    }
    request.await?;
    Ok(())
}
