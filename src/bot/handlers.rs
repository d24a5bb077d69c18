//! Command and callback-query handlers.
//!
//! Tokens are decoded once here, at the interaction boundary; every error is
//! rendered as a user-visible message and never escapes to kill the process.
//! Workflow steps edit the original message in place, so a menu message is
//! replaced by the next step rather than stacking new messages.

use super::views;
use super::Backends;
use crate::backend::{qbittorrent::QbitClient, CatalogKind, MediaBackend};
use crate::workflow::machine::StepReply;
use crate::workflow::render::SearchReply;
use crate::workflow::token::Action;
use anyhow::Result;
use std::sync::Arc;
use teloxide::prelude::*;
use teloxide::types::{ChatId, MessageId, ParseMode};
use teloxide::utils::command::BotCommands;
use tracing::{error, warn};

/// Supported bot commands
#[derive(BotCommands, Clone)]
#[command(rename_rule = "lowercase", description = "可用命令:")]
pub enum Command {
    #[command(description = "开始与机器人交互")]
    Start,
    #[command(description = "显示此帮助消息")]
    Help,
    #[command(description = "查看所有后端服务的连接状态")]
    Status,
    #[command(description = "搜索并添加电影到 Radarr")]
    Search(String),
    #[command(description = "搜索并添加剧集到 Sonarr")]
    Series(String),
}

/// Edit a message in place, tolerating a replayed identical edit.
///
/// A double-tapped terminal token produces the same final text twice;
/// Telegram rejects the no-op edit and that must not surface as a failure.
async fn edit_in_place(
    bot: &Bot,
    chat_id: ChatId,
    message_id: MessageId,
    text: String,
    html: bool,
) -> Result<()> {
    let mut request = bot.edit_message_text(chat_id, message_id, text);
    if html {
        request = request.parse_mode(ParseMode::Html);
    }
    match request.await {
        Ok(_) => Ok(()),
        Err(e) if e.to_string().contains("message is not modified") => Ok(()),
        Err(e) => Err(e.into()),
    }
}

/// Handle `/start`.
///
/// # Errors
///
/// Returns an error if the Telegram API call fails.
pub async fn start(bot: Bot, msg: Message) -> Result<()> {
    let (user_id, first_name) = msg
        .from
        .as_ref()
        .map_or((0, "朋友"), |u| (u.id.0, u.first_name.as_str()));
    bot.send_message(msg.chat.id, views::start_text(user_id, first_name))
        .parse_mode(ParseMode::Html)
        .await?;
    Ok(())
}

/// Handle `/help`.
///
/// # Errors
///
/// Returns an error if the Telegram API call fails.
pub async fn help(bot: Bot, msg: Message) -> Result<()> {
    bot.send_message(msg.chat.id, views::help_text())
        .parse_mode(ParseMode::Html)
        .await?;
    Ok(())
}

async fn downloader_status(downloader: Option<&QbitClient>) -> Option<Result<String, String>> {
    match downloader {
        Some(client) => Some(client.version().await.map_err(|e| e.to_string())),
        None => None,
    }
}

/// Handle `/status`: probe every backend and report one line per service.
///
/// # Errors
///
/// Returns an error if a Telegram API call fails; backend failures only
/// produce ❌ lines.
pub async fn status(bot: Bot, msg: Message, backends: Arc<Backends>) -> Result<()> {
    let progress = bot
        .send_message(msg.chat.id, "正在获取所有服务状态...")
        .await?;

    let mut lines = vec!["<b>后端服务状态:</b>".to_string()];
    lines.push(views::status_line(
        "qBittorrent",
        downloader_status(backends.downloader.as_ref()).await,
    ));
    let indexer = match &backends.indexer {
        Some(client) => Some(client.system_version().await.map_err(|e| e.to_string())),
        None => None,
    };
    lines.push(views::status_line("Prowlarr", indexer));
    for (service, backend) in [
        ("Radarr", &backends.movies),
        ("Sonarr", &backends.series),
    ] {
        let probe = backend.system_version().await.map_err(|e| e.to_string());
        lines.push(views::status_line(service, Some(probe)));
    }

    edit_in_place(&bot, msg.chat.id, progress.id, lines.join("\n"), true).await
}

/// Handle `/search` and `/series`: run the lookup and render the first menu.
///
/// # Errors
///
/// Returns an error if a Telegram API call fails.
pub async fn search(
    bot: Bot,
    msg: Message,
    backends: Arc<Backends>,
    kind: CatalogKind,
    query: String,
) -> Result<()> {
    let query = query.trim();
    if query.is_empty() {
        bot.send_message(msg.chat.id, views::usage_text(kind)).await?;
        return Ok(());
    }

    let progress = bot
        .send_message(msg.chat.id, views::searching_text(kind, query))
        .await?;
    let chat_id = msg.chat.id;

    match backends.orchestrator().search(kind, query).await {
        Ok(SearchReply::Menu(menu)) => {
            let keyboard = views::menu_keyboard(&menu);
            bot.edit_message_text(chat_id, progress.id, menu.text)
                .reply_markup(keyboard)
                .await?;
            Ok(())
        }
        Ok(SearchReply::NoResults) => {
            edit_in_place(
                &bot,
                chat_id,
                progress.id,
                views::no_results_text(kind, query),
                false,
            )
            .await
        }
        Ok(SearchReply::NoUsableResults) => {
            edit_in_place(
                &bot,
                chat_id,
                progress.id,
                views::no_usable_results_text(query),
                false,
            )
            .await
        }
        Err(e) => {
            error!(kind = kind.service_name(), query, error = %e, "search failed");
            edit_in_place(&bot, chat_id, progress.id, format!("❌ 搜索失败: {e}"), false).await
        }
    }
}

/// Handle an inline-button tap carrying an action token.
///
/// # Errors
///
/// Returns an error if a Telegram API call fails.
pub async fn callback(bot: Bot, q: CallbackQuery, backends: Arc<Backends>) -> Result<()> {
    // Stop the button spinner even when the payload turns out malformed.
    let _ = bot.answer_callback_query(q.id.clone()).await;

    let Some(data) = q.data.as_deref() else {
        return Ok(());
    };
    let Some(message) = q.message.as_ref() else {
        warn!("callback without attached message, token ignored");
        return Ok(());
    };
    let chat_id = message.chat().id;
    let message_id = message.id();

    let action = match Action::decode(data) {
        Ok(action) => action,
        Err(e) => {
            // Tampered or stale payload; it must never reach a backend.
            warn!(data, error = %e, "malformed action token");
            return edit_in_place(
                &bot,
                chat_id,
                message_id,
                "⚠️ 无效的操作，请重新搜索。".to_string(),
                false,
            )
            .await;
        }
    };

    match backends.orchestrator().respond(action).await {
        Ok(StepReply::Menu(menu)) => {
            let keyboard = views::menu_keyboard(&menu);
            bot.edit_message_text(chat_id, message_id, menu.text)
                .reply_markup(keyboard)
                .await?;
            Ok(())
        }
        Ok(StepReply::Done(outcome)) => {
            edit_in_place(&bot, chat_id, message_id, views::outcome_text(&outcome), true).await
        }
        Err(e) => {
            error!(token = data, error = %e, "workflow step failed");
            edit_in_place(&bot, chat_id, message_id, views::error_text(action, &e), false).await
        }
    }
}
