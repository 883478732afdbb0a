use tracing::{debug, error, info};

use crate::commands::{parse_command, Action, CommandRegistry};
use crate::dates::DatesFetcher;
use crate::platform::{IncomingMessage, OutgoingText};

/// Sent when the dates page cannot be fetched or parsed.
pub const DATES_UNAVAILABLE: &str = "Sorry, the meeting dates are unavailable right now.";

/// Shared application state
pub struct AppState {
    pub commands: CommandRegistry,
    dates: DatesFetcher,
}

impl AppState {
    pub fn new(commands: CommandRegistry, dates: DatesFetcher) -> Self {
        Self { commands, dates }
    }

    /// Release owned resources once the dispatcher has stopped.
    pub fn shutdown(self) {
        info!("Shutting down");
        self.dates.close();
    }
}

/// Answer one incoming message. `None` means the text is not a command
/// registered here and nothing is sent.
pub async fn respond(
    state: &AppState,
    msg: &IncomingMessage,
    bot_username: Option<&str>,
) -> Option<OutgoingText> {
    let name = parse_command(&msg.text, bot_username)?;

    let Some(spec) = state.commands.resolve(name) else {
        debug!("Ignoring unknown command /{} from {}", name, msg.user_id);
        return None;
    };

    info!(
        "Command /{} from {} ({}) in chat {} on {}",
        name, msg.user_name, msg.user_id, msg.chat_id, msg.platform
    );

    let reply = match spec.action {
        Action::Start => greeting(msg),
        Action::Help => OutgoingText::plain(state.commands.help_text()),
        Action::Dates => match state.dates.fetch_dates().await {
            Ok(dates) => OutgoingText::plain(dates),
            Err(e) => {
                error!("Failed to fetch dates from {}: {:#}", state.dates.url(), e);
                OutgoingText::plain(DATES_UNAVAILABLE)
            }
        },
    };

    Some(reply)
}

fn greeting(msg: &IncomingMessage) -> OutgoingText {
    let mention = format!(
        "<a href=\"tg://user?id={}\">{}</a>",
        msg.user_id,
        teloxide::utils::html::escape(&msg.user_name)
    );
    OutgoingText::html(format!(
        "Hi {}!\nSend /help to see what I can do.",
        mention
    ))
    .with_force_reply()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::TextFormat;
    use crate::test_support::{dates_config, serve_page};
    use axum::http::StatusCode;

    const PAGE: &str = "<html><head><meta itemprop=\"description\" content=\"Meeting 1\u{0B}-- Room A\"></head></html>";

    async fn state_for(status: StatusCode, body: &str) -> AppState {
        let url = serve_page(status, body).await;
        AppState::new(
            CommandRegistry::builtin().unwrap(),
            DatesFetcher::new(&dates_config(&url)).unwrap(),
        )
    }

    fn message(text: &str, user_name: &str) -> IncomingMessage {
        IncomingMessage {
            platform: "telegram".to_string(),
            user_id: 42,
            chat_id: "42".to_string(),
            user_name: user_name.to_string(),
            text: text.to_string(),
        }
    }

    #[tokio::test]
    async fn test_dates_command_end_to_end() {
        let state = state_for(StatusCode::OK, PAGE).await;
        let reply = respond(&state, &message("/dates", "Ada"), None)
            .await
            .unwrap();
        assert_eq!(reply, OutgoingText::plain("Meeting 1\nRoom A"));
    }

    #[tokio::test]
    async fn test_aliases_give_identical_output() {
        let state = state_for(StatusCode::OK, PAGE).await;
        let dates = respond(&state, &message("/dates", "Ada"), None).await;
        let termine = respond(&state, &message("/termine", "Ada"), None).await;
        assert!(dates.is_some());
        assert_eq!(dates, termine);
    }

    #[tokio::test]
    async fn test_fetch_failure_replies_with_fallback() {
        let state = state_for(StatusCode::INTERNAL_SERVER_ERROR, PAGE).await;
        let reply = respond(&state, &message("/termine", "Ada"), None)
            .await
            .unwrap();
        assert_eq!(reply.text, DATES_UNAVAILABLE);
    }

    #[tokio::test]
    async fn test_missing_meta_replies_with_fallback() {
        let state = state_for(StatusCode::OK, "<html><head></head></html>").await;
        let reply = respond(&state, &message("/dates", "Ada"), None)
            .await
            .unwrap();
        assert_eq!(reply.text, DATES_UNAVAILABLE);
    }

    #[tokio::test]
    async fn test_help_lists_registry() {
        let state = state_for(StatusCode::OK, PAGE).await;
        let reply = respond(&state, &message("/help", "Ada"), None)
            .await
            .unwrap();
        assert_eq!(reply.format, TextFormat::Plain);
        assert_eq!(reply.text, state.commands.help_text());
        assert_eq!(reply.text.lines().count(), 3);
    }

    #[tokio::test]
    async fn test_start_greets_with_escaped_mention() {
        let state = state_for(StatusCode::OK, PAGE).await;
        let reply = respond(&state, &message("/start", "<b>Tom & Jerry</b>"), None)
            .await
            .unwrap();
        assert_eq!(reply.format, TextFormat::Html);
        assert!(reply.force_reply);
        assert!(reply
            .text
            .starts_with("Hi <a href=\"tg://user?id=42\">&lt;b&gt;Tom &amp; Jerry&lt;/b&gt;</a>!"));
        assert!(reply.text.contains("/help"));
    }

    #[tokio::test]
    async fn test_start_is_idempotent() {
        let state = state_for(StatusCode::OK, PAGE).await;
        let first = respond(&state, &message("/start", "Ada"), None).await;
        let second = respond(&state, &message("/start", "Ada"), None).await;
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_unknown_and_plain_text_ignored() {
        let state = state_for(StatusCode::OK, PAGE).await;
        assert!(respond(&state, &message("/weather", "Ada"), None).await.is_none());
        assert!(respond(&state, &message("/Dates", "Ada"), None).await.is_none());
        assert!(respond(&state, &message("when is the next meeting?", "Ada"), None)
            .await
            .is_none());
    }

    #[tokio::test]
    async fn test_command_for_other_bot_ignored() {
        let state = state_for(StatusCode::OK, PAGE).await;
        assert!(respond(&state, &message("/help@other_bot", "Ada"), Some("lug_bot"))
            .await
            .is_none());
        assert!(respond(&state, &message("/help@lug_bot", "Ada"), Some("lug_bot"))
            .await
            .is_some());
    }
}
