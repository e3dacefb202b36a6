// Configuration document model
// A forest of Dashboard -> Tab -> Group -> Entry, serialized as the
// camelCase JSON document the persistence backend stores.
use crate::domain::theme::ThemeLevel;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    pub dashboards: Vec<Dashboard>,
    #[serde(default)]
    pub theme: Theme,
    #[serde(default)]
    pub settings: Settings,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Dashboard {
    pub id: String,
    pub name: String,
    pub path: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background: Option<Background>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub theme: Option<ThemeLevel>,
    pub tabs: Vec<Tab>,
    pub order: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tab {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background: Option<Background>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub theme: Option<ThemeLevel>,
    pub groups: Vec<Group>,
    pub order: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Group {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub collapsed: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub theme: Option<ThemeLevel>,
    pub entries: Vec<Entry>,
    pub order: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Entry {
    pub id: String,
    pub name: String,
    pub url: String,
    pub icon: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub open_mode: OpenMode,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status_check: Option<StatusCheck>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub theme: Option<ThemeLevel>,
    pub size: SizeClass,
    pub order: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OpenMode {
    #[serde(rename = "iframe")]
    Embedded,
    #[serde(rename = "newtab")]
    NewTab,
    #[serde(rename = "sametab")]
    SameTab,
    Modal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SizeClass {
    Small,
    Medium,
    Large,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Background {
    #[serde(rename = "type")]
    pub kind: BackgroundKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub images: Option<Vec<String>>,
    /// Slideshow rotation in seconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interval: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fit: Option<BackgroundFit>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackgroundKind {
    Image,
    Slideshow,
    Color,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackgroundFit {
    Cover,
    Contain,
    Fill,
}

/// Per-entry check configuration. Presentation metadata: the scheduler
/// polls every watched entry on one shared cadence and does not read the
/// per-entry interval.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusCheck {
    #[serde(rename = "type")]
    pub kind: CheckKind,
    pub enabled: bool,
    /// Seconds.
    pub interval: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CheckKind {
    Http,
    Icmp,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Theme {
    pub mode: ThemeMode,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_css: Option<String>,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            mode: ThemeMode::Auto,
            custom_css: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemeMode {
    Light,
    Dark,
    Auto,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    pub search_hotkey: String,
    pub default_view: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            search_hotkey: "/".to_string(),
            default_view: "/".to_string(),
        }
    }
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("duplicate {kind} id {id:?} under {parent:?}")]
    DuplicateId {
        kind: &'static str,
        id: String,
        parent: String,
    },
}

impl Config {
    /// Finds a dashboard by route path or opaque id. Paths are normalized
    /// to a leading '/'; ids are matched verbatim. First match wins, in
    /// document order.
    pub fn find_dashboard(&self, path_or_id: &str) -> Option<&Dashboard> {
        let path = if path_or_id.starts_with('/') {
            path_or_id.to_string()
        } else {
            format!("/{path_or_id}")
        };

        self.dashboards
            .iter()
            .find(|d| d.path == path || d.id == path_or_id)
    }

    /// Dashboards in display order: ascending by `order`, ties broken by id.
    pub fn sorted_dashboards(&self) -> Vec<&Dashboard> {
        let mut items: Vec<&Dashboard> = self.dashboards.iter().collect();
        items.sort_by(|a, b| a.order.cmp(&b.order).then_with(|| a.id.cmp(&b.id)));
        items
    }

    /// Rejects documents where a parent holds two children with the same
    /// id. Ids are caller-supplied opaque strings and are never rewritten
    /// or deduplicated here.
    pub fn validate(&self) -> Result<(), ValidationError> {
        check_unique(
            "dashboard",
            "config",
            self.dashboards.iter().map(|d| d.id.as_str()),
        )?;

        for dashboard in &self.dashboards {
            check_unique(
                "tab",
                &dashboard.id,
                dashboard.tabs.iter().map(|t| t.id.as_str()),
            )?;
            for tab in &dashboard.tabs {
                check_unique("group", &tab.id, tab.groups.iter().map(|g| g.id.as_str()))?;
                for group in &tab.groups {
                    check_unique(
                        "entry",
                        &group.id,
                        group.entries.iter().map(|e| e.id.as_str()),
                    )?;
                }
            }
        }

        Ok(())
    }
}

impl Dashboard {
    pub fn find_tab(&self, tab_id: &str) -> Option<&Tab> {
        self.tabs.iter().find(|t| t.id == tab_id)
    }

    /// Sorts tabs and everything below them into display order: ascending
    /// by `order`, ties broken by id.
    pub fn sort_for_display(&mut self) {
        self.tabs
            .sort_by(|a, b| a.order.cmp(&b.order).then_with(|| a.id.cmp(&b.id)));
        for tab in &mut self.tabs {
            tab.groups
                .sort_by(|a, b| a.order.cmp(&b.order).then_with(|| a.id.cmp(&b.id)));
            for group in &mut tab.groups {
                group
                    .entries
                    .sort_by(|a, b| a.order.cmp(&b.order).then_with(|| a.id.cmp(&b.id)));
            }
        }
    }
}

impl Tab {
    pub fn find_group(&self, group_id: &str) -> Option<&Group> {
        self.groups.iter().find(|g| g.id == group_id)
    }
}

impl Group {
    pub fn find_entry(&self, entry_id: &str) -> Option<&Entry> {
        self.entries.iter().find(|e| e.id == entry_id)
    }
}

fn check_unique<'a>(
    kind: &'static str,
    parent: &str,
    ids: impl Iterator<Item = &'a str>,
) -> Result<(), ValidationError> {
    let mut seen = HashSet::new();
    for id in ids {
        if !seen.insert(id) {
            return Err(ValidationError::DuplicateId {
                kind,
                id: id.to_string(),
                parent: parent.to_string(),
            });
        }
    }
    Ok(())
}
