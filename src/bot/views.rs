//! Keyboards and user-facing message texts.
//!
//! All texts stay in Chinese as shipped; terminal messages reuse the ✅/❌
//! markers users already know from the original bot.

use crate::backend::CatalogKind;
use crate::workflow::machine::Outcome;
use crate::workflow::render::Menu;
use crate::workflow::token::Action;
use crate::workflow::WorkflowError;
use teloxide::types::{InlineKeyboardButton, InlineKeyboardMarkup};

/// One button per row, callback data from the encoded action token.
#[must_use]
pub fn menu_keyboard(menu: &Menu) -> InlineKeyboardMarkup {
    InlineKeyboardMarkup::new(
        menu.buttons
            .iter()
            .map(|(label, action)| {
                vec![InlineKeyboardButton::callback(label.clone(), action.encode())]
            }),
    )
}

/// Greeting for `/start`, mentioning the user.
#[must_use]
pub fn start_text(user_id: u64, first_name: &str) -> String {
    let name = html_escape::encode_text(first_name);
    format!(
        "你好，<a href=\"tg://user?id={user_id}\">{name}</a>！\n\n\
         我是 MediaPilot Bot，你的媒体自动化助手。\n\
         Radarr 和 Sonarr 将会自动处理下载和整理，完成后 Emby 中会自动出现。\n\n\
         使用 /help 查看所有可用命令。"
    )
}

/// Help text for `/help`.
#[must_use]
pub fn help_text() -> String {
    "<b>可用命令:</b>\n\
     /start - 开始与机器人交互\n\
     /help - 显示此帮助消息\n\
     /status - 查看所有后端服务的连接状态\n\
     /search <code>&lt;电影名称&gt;</code> - 搜索并添加电影到 Radarr\n\
     /series <code>&lt;剧集名称&gt;</code> - 搜索并添加剧集到 Sonarr"
        .to_string()
}

/// One ✅/❌ line of the `/status` report.
#[must_use]
pub fn status_line(service: &str, result: Option<Result<String, String>>) -> String {
    match result {
        Some(Ok(version)) => format!("✅ <b>{service}:</b> 连接成功 (v{version})"),
        Some(Err(_)) => format!("❌ <b>{service}:</b> 连接失败"),
        None => format!("❌ <b>{service}:</b> 未配置"),
    }
}

/// Final text for a terminal workflow outcome.
#[must_use]
pub fn outcome_text(outcome: &Outcome) -> String {
    match outcome {
        Outcome::Added { kind, title } => format!(
            "✅ <b>{}</b> 已成功添加到 {} 并开始搜索！",
            html_escape::encode_text(title),
            kind.service_name()
        ),
        Outcome::AlreadyAdded { kind: Some(kind) } => {
            format!("✅ 这部{}已经在你的媒体库中了。", kind.noun())
        }
        Outcome::AlreadyAdded { kind: None } => "✅ 已经在你的媒体库中了。".to_string(),
        Outcome::MissingDetails { kind } => {
            format!("❌ 找不到该{}的详细信息。", kind.noun())
        }
    }
}

/// Context-specific failure prefix for a callback action.
#[must_use]
pub fn failure_prefix(action: Action) -> &'static str {
    match action {
        Action::SelectQuality { .. } => "获取质量配置失败",
        Action::AddWithQuality { .. } => "添加电影时发生错误",
        Action::AddSeries { .. } => "添加剧集时发生错误",
        Action::AlreadyAdded => "操作失败",
    }
}

/// User-visible text for a workflow error.
///
/// Protocol errors are a local bug/tamper signal and are never dressed up as
/// a backend failure; configuration errors stay distinct and actionable.
#[must_use]
pub fn error_text(action: Action, error: &WorkflowError) -> String {
    match error {
        WorkflowError::Protocol(_) => "⚠️ 无效的操作，请重新搜索。".to_string(),
        WorkflowError::Configuration(message) => format!("❌ {message}"),
        WorkflowError::Upstream(e) => format!("❌ {}: {e}", failure_prefix(action)),
    }
}

/// Search result text when the backend returned nothing.
#[must_use]
pub fn no_results_text(kind: CatalogKind, query: &str) -> String {
    format!("🤷‍♂️ 未找到与“{query}”相关的{}。", kind.noun())
}

/// Search result text when every result was unusable.
#[must_use]
pub fn no_usable_results_text(query: &str) -> String {
    format!("🤷‍♂️ 未找到与“{query}”相关的有效结果。")
}

/// Progress text while a search is running.
#[must_use]
pub fn searching_text(kind: CatalogKind, query: &str) -> String {
    format!(
        "正在为“{query}”在 {} 中查找{}...",
        kind.service_name(),
        kind.noun()
    )
}

/// Usage hint for a bare `/search` or `/series`.
#[must_use]
pub fn usage_text(kind: CatalogKind) -> String {
    match kind {
        CatalogKind::Movie => "用法: /search <电影名称>".to_string(),
        CatalogKind::Series => "用法: /series <剧集名称>".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outcome_texts() {
        let added = Outcome::Added {
            kind: CatalogKind::Movie,
            title: "Inception".to_string(),
        };
        assert_eq!(
            outcome_text(&added),
            "✅ <b>Inception</b> 已成功添加到 Radarr 并开始搜索！"
        );

        let already = Outcome::AlreadyAdded {
            kind: Some(CatalogKind::Series),
        };
        assert_eq!(outcome_text(&already), "✅ 这部剧集已经在你的媒体库中了。");
    }

    #[test]
    fn test_added_title_is_html_escaped() {
        let added = Outcome::Added {
            kind: CatalogKind::Movie,
            title: "Fast & Furious <7>".to_string(),
        };
        let text = outcome_text(&added);
        assert!(text.contains("Fast &amp; Furious &lt;7&gt;"));
    }

    #[test]
    fn test_status_lines() {
        assert_eq!(
            status_line("Radarr", Some(Ok("5.2.6".to_string()))),
            "✅ <b>Radarr:</b> 连接成功 (v5.2.6)"
        );
        assert_eq!(
            status_line("Prowlarr", Some(Err("timeout".to_string()))),
            "❌ <b>Prowlarr:</b> 连接失败"
        );
        assert_eq!(
            status_line("qBittorrent", None),
            "❌ <b>qBittorrent:</b> 未配置"
        );
    }

    #[test]
    fn test_menu_keyboard_one_button_per_row() {
        let menu = Menu {
            text: "t".to_string(),
            buttons: vec![
                ("A".to_string(), Action::AlreadyAdded),
                ("B".to_string(), Action::SelectQuality { catalog_id: 1 }),
            ],
        };
        let keyboard = menu_keyboard(&menu);
        assert_eq!(keyboard.inline_keyboard.len(), 2);
        assert_eq!(keyboard.inline_keyboard[0].len(), 1);
    }
}
