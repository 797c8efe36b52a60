use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::task::AbortHandle;

use crate::error::InvalidThemeError;

/// How long the transition flag stays raised after a switch.
pub const TRANSITION_WINDOW: Duration = Duration::from_millis(600);

/// The six selectable themes. The set is fixed at compile time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ThemeName {
    Cyber,
    Professional,
    DarkProfessional,
    Neon,
    Minimal,
    Glassmorphism,
}

impl ThemeName {
    /// Parse a theme name; `None` for anything outside the catalog.
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "cyber" => Some(Self::Cyber),
            "professional" => Some(Self::Professional),
            "darkProfessional" => Some(Self::DarkProfessional),
            "neon" => Some(Self::Neon),
            "minimal" => Some(Self::Minimal),
            "glassmorphism" => Some(Self::Glassmorphism),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Cyber => "cyber",
            Self::Professional => "professional",
            Self::DarkProfessional => "darkProfessional",
            Self::Neon => "neon",
            Self::Minimal => "minimal",
            Self::Glassmorphism => "glassmorphism",
        }
    }
}

/// One entry of the static theme catalog.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct ThemeInfo {
    pub name: ThemeName,
    pub label: &'static str,
    pub icon: &'static str,
    pub description: &'static str,
}

/// Catalog order matches the original selector UI.
pub const THEMES: [ThemeInfo; 6] = [
    ThemeInfo {
        name: ThemeName::Cyber,
        label: "赛博科幻",
        icon: "mdi-robot",
        description: "未来科技感的赛博朋克风格",
    },
    ThemeInfo {
        name: ThemeName::Neon,
        label: "霓虹夜光",
        icon: "mdi-lightbulb-on",
        description: "炫彩霓虹灯效果",
    },
    ThemeInfo {
        name: ThemeName::Glassmorphism,
        label: "玻璃态",
        icon: "mdi-glass-fragile",
        description: "现代玻璃拟态设计",
    },
    ThemeInfo {
        name: ThemeName::Professional,
        label: "商业专业",
        icon: "mdi-briefcase",
        description: "简洁专业的商业风格",
    },
    ThemeInfo {
        name: ThemeName::DarkProfessional,
        label: "暗黑专业",
        icon: "mdi-briefcase-outline",
        description: "深色专业商务主题",
    },
    ThemeInfo {
        name: ThemeName::Minimal,
        label: "极简主义",
        icon: "mdi-circle-outline",
        description: "简约纯粹的极简设计",
    },
];

struct ThemeState {
    current: ThemeName,
    transitioning: bool,
    reset_task: Option<AbortHandle>,
}

/// Current theme selection plus the static catalog.
///
/// Switching is visible immediately; the transition flag drops once the
/// 600 ms window ends. A switch during an open window cancels the pending
/// reset, so the flag always reflects the most recent switch.
pub struct ThemeRegistry {
    state: Arc<Mutex<ThemeState>>,
}

impl ThemeRegistry {
    pub fn new() -> Self {
        Self {
            state: Arc::new(Mutex::new(ThemeState {
                current: ThemeName::Cyber,
                transitioning: false,
                reset_task: None,
            })),
        }
    }

    /// The fixed, ordered catalog.
    pub fn list_themes(&self) -> &'static [ThemeInfo] {
        &THEMES
    }

    /// Descriptor lookup; `None` for unknown names, never an error.
    pub fn theme_info(&self, name: &str) -> Option<&'static ThemeInfo> {
        let name = ThemeName::from_str(name)?;
        THEMES.iter().find(|t| t.name == name)
    }

    pub fn current(&self) -> ThemeName {
        self.state.lock().unwrap().current
    }

    pub fn is_transitioning(&self) -> bool {
        self.state.lock().unwrap().transitioning
    }

    /// Switch themes. Must be called from within a tokio runtime; the reset
    /// timer is a spawned task.
    pub fn set_theme(&self, theme: ThemeName) {
        let mut state = self.state.lock().unwrap();
        if let Some(task) = state.reset_task.take() {
            task.abort();
        }
        state.current = theme;
        state.transitioning = true;

        let shared = Arc::clone(&self.state);
        let task = tokio::spawn(async move {
            tokio::time::sleep(TRANSITION_WINDOW).await;
            let mut state = shared.lock().unwrap();
            state.transitioning = false;
            state.reset_task = None;
        });
        state.reset_task = Some(task.abort_handle());
    }

    /// String-keyed switch with explicit validation; rejects unknown names
    /// without touching the current selection.
    pub fn set_theme_by_name(&self, name: &str) -> Result<(), InvalidThemeError> {
        let theme = ThemeName::from_str(name).ok_or_else(|| InvalidThemeError(name.to_string()))?;
        self.set_theme(theme);
        Ok(())
    }
}

impl Default for ThemeRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_has_six_distinct_names() {
        let mut names: Vec<&str> = THEMES.iter().map(|t| t.name.as_str()).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), 6);
    }

    #[test]
    fn lookup_never_fails() {
        let registry = ThemeRegistry::new();
        assert_eq!(
            registry.theme_info("neon").map(|t| t.label),
            Some("霓虹夜光")
        );
        assert!(registry.theme_info("solarized").is_none());
    }

    #[tokio::test]
    async fn switch_is_visible_immediately_and_flag_drops() {
        let registry = ThemeRegistry::new();
        assert_eq!(registry.current(), ThemeName::Cyber);

        registry.set_theme(ThemeName::Minimal);
        assert_eq!(registry.current(), ThemeName::Minimal);
        assert!(registry.is_transitioning());

        tokio::time::sleep(TRANSITION_WINDOW + Duration::from_millis(100)).await;
        assert!(!registry.is_transitioning());
        assert_eq!(registry.current(), ThemeName::Minimal);
    }

    #[tokio::test]
    async fn unknown_name_is_rejected_without_mutation() {
        let registry = ThemeRegistry::new();
        let err = registry.set_theme_by_name("solarized").unwrap_err();
        assert_eq!(err, InvalidThemeError("solarized".to_string()));
        assert_eq!(registry.current(), ThemeName::Cyber);
        assert!(!registry.is_transitioning());
    }

    #[tokio::test]
    async fn second_switch_supersedes_the_first_window() {
        let registry = ThemeRegistry::new();
        registry.set_theme(ThemeName::Neon);
        tokio::time::sleep(Duration::from_millis(300)).await;

        registry.set_theme(ThemeName::Glassmorphism);
        // 400 ms later the first window would have expired; the second keeps
        // the flag raised.
        tokio::time::sleep(Duration::from_millis(400)).await;
        assert!(registry.is_transitioning());
        assert_eq!(registry.current(), ThemeName::Glassmorphism);

        tokio::time::sleep(Duration::from_millis(300)).await;
        assert!(!registry.is_transitioning());
    }
}
