//! Light and dark colour palettes and the font table.

use std::sync::Arc;

use serde::Serialize;

use crate::preferences::DarkModeSource;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Palette {
    pub background: &'static str,
    pub text: &'static str,
    pub primary: &'static str,
    pub card: &'static str,
    pub border: &'static str,
    pub sub_text: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FontTable {
    pub regular: &'static str,
    pub medium: &'static str,
    pub light: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Theme {
    pub colors: Palette,
    pub fonts: FontTable,
}

const MONO: FontTable = FontTable {
    regular: "DMMono-Regular",
    medium: "DMMono-Medium",
    light: "DMMono-Light",
};

pub const LIGHT: Theme = Theme {
    colors: Palette {
        background: "#FFFFFF",
        text: "#000000",
        primary: "#007AFF",
        card: "#F2F2F2",
        border: "#E5E5E5",
        sub_text: "#666666",
    },
    fonts: MONO,
};

pub const DARK: Theme = Theme {
    colors: Palette {
        background: "#000000",
        text: "#FFFFFF",
        primary: "#0A84FF",
        card: "#1C1C1E",
        border: "#38383A",
        sub_text: "#999999",
    },
    fonts: MONO,
};

impl Theme {
    pub fn for_mode(is_dark: bool) -> &'static Theme {
        if is_dark { &DARK } else { &LIGHT }
    }
}

/// Theme derived from a dark-mode flag owned elsewhere.
pub struct ThemeStore<S: DarkModeSource + ?Sized> {
    source: Arc<S>,
}

impl<S: DarkModeSource + ?Sized> std::fmt::Debug for ThemeStore<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ThemeStore")
            .field("is_dark", &self.is_dark_mode())
            .finish()
    }
}

impl<S: DarkModeSource + ?Sized> Clone for ThemeStore<S> {
    fn clone(&self) -> Self {
        Self {
            source: Arc::clone(&self.source),
        }
    }
}

impl<S: DarkModeSource + ?Sized> ThemeStore<S> {
    pub fn new(source: Arc<S>) -> Self {
        Self { source }
    }

    pub fn is_dark_mode(&self) -> bool {
        self.source.is_dark()
    }

    pub fn theme(&self) -> &'static Theme {
        Theme::for_mode(self.is_dark_mode())
    }

    pub fn palette(&self) -> Palette {
        self.theme().colors
    }

    pub fn fonts(&self) -> FontTable {
        self.theme().fonts
    }

    pub fn toggle_theme(&self) {
        self.source.toggle_dark();
    }
}
