//! Client preferences: theme and responsible-use acceptance.
//!
//! Values are loaded once with a defined fallback and every setter writes
//! through to [`Settings`] before returning.

use anyhow::Result;
use std::fmt;
use std::str::FromStr;

use crate::config::Settings;
use crate::consts::{RESPONSIBLE_USE_KEY, THEME_KEY};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn as_str(self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Theme {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "light" => Ok(Theme::Light),
            "dark" => Ok(Theme::Dark),
            other => anyhow::bail!("unknown theme: {other}"),
        }
    }
}

pub struct Preferences<'a> {
    settings: &'a Settings,
    theme: Theme,
    responsible_use_accepted: bool,
}

impl<'a> Preferences<'a> {
    /// A stored theme wins; anything else falls back to the system
    /// preference. Acceptance holds only if stored as exactly `"true"`.
    pub fn load(settings: &'a Settings, system_prefers_dark: bool) -> Result<Self> {
        let theme = match settings.get(THEME_KEY)?.as_deref().map(Theme::from_str) {
            Some(Ok(theme)) => theme,
            _ if system_prefers_dark => Theme::Dark,
            _ => Theme::Light,
        };
        let responsible_use_accepted =
            settings.get(RESPONSIBLE_USE_KEY)?.as_deref() == Some("true");
        Ok(Self {
            settings,
            theme,
            responsible_use_accepted,
        })
    }

    pub fn theme(&self) -> Theme {
        self.theme
    }

    pub fn responsible_use_accepted(&self) -> bool {
        self.responsible_use_accepted
    }

    pub fn set_theme(&mut self, theme: Theme) -> Result<()> {
        self.settings.set(THEME_KEY, theme.as_str())?;
        self.theme = theme;
        Ok(())
    }

    pub fn toggle_theme(&mut self) -> Result<Theme> {
        let next = self.theme.toggled();
        self.set_theme(next)?;
        Ok(next)
    }

    pub fn accept_responsible_use(&mut self) -> Result<()> {
        self.settings.set(RESPONSIBLE_USE_KEY, "true")?;
        self.responsible_use_accepted = true;
        Ok(())
    }
}
