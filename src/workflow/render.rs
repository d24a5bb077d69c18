//! Turns raw lookup results into bounded, deduplicated choice menus.

use super::token::Action;
use crate::backend::{CatalogItem, CatalogKind, QualityProfile};

/// Hard cap on rendered search results
pub const MAX_RESULTS: usize = 5;

/// A render-ready workflow step: message text plus labeled action buttons.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Menu {
    pub text: String,
    /// One button per row, label plus the action its token encodes
    pub buttons: Vec<(String, Action)>,
}

/// Outcome of rendering a search-result list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchReply {
    /// The backend returned nothing at all
    NoResults,
    /// Results existed but every one carried the unknown-id sentinel
    NoUsableResults,
    Menu(Menu),
}

fn result_button(kind: CatalogKind, item: &CatalogItem) -> (String, Action) {
    let marker = if item.already_added {
        "✅ 已添加"
    } else {
        "➕ 添加"
    };
    let label = format!("{} ({}) - {marker}", item.title, item.year);
    let action = if item.already_added {
        Action::AlreadyAdded
    } else if kind.needs_quality_menu() {
        Action::SelectQuality {
            catalog_id: item.id,
        }
    } else {
        Action::AddSeries {
            catalog_id: item.id,
        }
    };
    (label, action)
}

/// Render the first menu of the workflow from a lookup result list.
///
/// Results whose external id is the unknown sentinel (0) cannot be
/// re-resolved later and are dropped before the cap is applied. Order is
/// preserved as returned by the backend.
#[must_use]
pub fn render_results(kind: CatalogKind, query: &str, items: &[CatalogItem]) -> SearchReply {
    if items.is_empty() {
        return SearchReply::NoResults;
    }

    let buttons: Vec<(String, Action)> = items
        .iter()
        .filter(|item| item.id != 0)
        .take(MAX_RESULTS)
        .map(|item| result_button(kind, item))
        .collect();

    if buttons.is_empty() {
        return SearchReply::NoUsableResults;
    }

    SearchReply::Menu(Menu {
        text: format!("🔎 “{query}”的{}搜索结果:", kind.noun()),
        buttons,
    })
}

/// Render the quality-profile selection menu for a movie.
#[must_use]
pub fn quality_menu(catalog_id: i64, profiles: &[QualityProfile]) -> Menu {
    Menu {
        text: format!("请选择电影的质量配置 (TMDB ID: {catalog_id}):"),
        buttons: profiles
            .iter()
            .map(|profile| {
                (
                    profile.name.clone(),
                    Action::AddWithQuality {
                        catalog_id,
                        profile_id: profile.id,
                    },
                )
            })
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;

    fn item(id: i64, title: &str, year: i64, added: bool) -> CatalogItem {
        CatalogItem {
            id,
            title: title.to_string(),
            year,
            already_added: added,
            images: Value::Null,
            seasons: Value::Null,
        }
    }

    #[test]
    fn test_movie_result_button_scenario() {
        let items = vec![item(27205, "Inception", 2010, false)];
        let SearchReply::Menu(menu) = render_results(CatalogKind::Movie, "Inception", &items)
        else {
            panic!("expected a menu");
        };
        assert_eq!(menu.buttons.len(), 1);
        assert_eq!(menu.buttons[0].0, "Inception (2010) - ➕ 添加");
        assert_eq!(menu.buttons[0].1.encode(), "select_quality|27205");
    }

    #[test]
    fn test_already_added_series_gets_terminal_token() {
        let items = vec![item(371980, "Severance", 2022, true)];
        let SearchReply::Menu(menu) = render_results(CatalogKind::Series, "Severance", &items)
        else {
            panic!("expected a menu");
        };
        assert_eq!(menu.buttons[0].0, "Severance (2022) - ✅ 已添加");
        assert_eq!(menu.buttons[0].1, Action::AlreadyAdded);
    }

    #[test]
    fn test_series_result_gets_direct_add_token() {
        let items = vec![item(371980, "Severance", 2022, false)];
        let SearchReply::Menu(menu) = render_results(CatalogKind::Series, "Severance", &items)
        else {
            panic!("expected a menu");
        };
        assert_eq!(menu.buttons[0].1.encode(), "add_series|371980");
    }

    #[test]
    fn test_cap_applies_after_sentinel_filter() {
        // Seven results, two unusable: the menu keeps five usable ones.
        let mut items = vec![item(0, "Ghost", 1990, false), item(1, "A", 2001, false)];
        items.push(item(0, "Ghost 2", 1991, false));
        for id in 2..=5 {
            items.push(item(id, "X", 2000 + id, false));
        }
        let SearchReply::Menu(menu) = render_results(CatalogKind::Movie, "x", &items) else {
            panic!("expected a menu");
        };
        assert_eq!(menu.buttons.len(), MAX_RESULTS);
        assert!(menu
            .buttons
            .iter()
            .all(|(label, _)| !label.starts_with("Ghost")));
    }

    #[test]
    fn test_no_results_vs_no_usable_results() {
        assert_eq!(
            render_results(CatalogKind::Movie, "q", &[]),
            SearchReply::NoResults
        );
        let unusable = vec![item(0, "Unknown", 0, false)];
        assert_eq!(
            render_results(CatalogKind::Movie, "q", &unusable),
            SearchReply::NoUsableResults
        );
    }

    #[test]
    fn test_quality_menu_buttons() {
        let profiles = vec![QualityProfile {
            id: 4,
            name: "HD-1080p".to_string(),
        }];
        let menu = quality_menu(27205, &profiles);
        assert_eq!(menu.buttons.len(), 1);
        assert_eq!(menu.buttons[0].0, "HD-1080p");
        assert_eq!(menu.buttons[0].1.encode(), "add_with_quality|27205|4");
    }
}
