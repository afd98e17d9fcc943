use log::*;
use ratatui::style::Color;

/// Color palette used by every widget.
///
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Theme {
    pub name: &'static str,
    pub primary: ColorSpec,
    pub accent: ColorSpec,
    pub text: ColorSpec,
    pub text_muted: ColorSpec,
    pub success: ColorSpec,
    pub warning: ColorSpec,
    pub error: ColorSpec,
    pub border_active: ColorSpec,
    pub border_normal: ColorSpec,
    pub highlight_bg: ColorSpec,
    pub highlight_fg: ColorSpec,
    pub match_bg: ColorSpec,
    pub footer_search: ColorSpec,
    pub footer_normal: ColorSpec,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ColorSpec {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

const fn rgb(r: u8, g: u8, b: u8) -> ColorSpec {
    ColorSpec { r, g, b }
}

impl ColorSpec {
    pub fn to_color(self) -> Color {
        Color::Rgb(self.r, self.g, self.b)
    }
}

impl Default for Theme {
    fn default() -> Self {
        Theme::tokyo_night()
    }
}

impl Theme {
    pub fn tokyo_night() -> Self {
        Theme {
            name: "tokyo-night",
            primary: rgb(125, 207, 255),
            accent: rgb(255, 159, 196),
            text: rgb(169, 177, 214),
            text_muted: rgb(117, 121, 148),
            success: rgb(158, 206, 106),
            warning: rgb(255, 202, 40),
            error: rgb(247, 118, 142),
            border_active: rgb(125, 207, 255),
            border_normal: rgb(117, 121, 148),
            highlight_bg: rgb(125, 207, 255),
            highlight_fg: rgb(26, 27, 38),
            match_bg: rgb(255, 202, 40),
            footer_search: rgb(125, 207, 255),
            footer_normal: rgb(36, 40, 59),
        }
    }

    pub fn rose_pine_dawn() -> Self {
        Theme {
            name: "rose-pine-dawn",
            primary: rgb(161, 119, 255),
            accent: rgb(255, 109, 146),
            text: rgb(88, 82, 96),
            text_muted: rgb(152, 147, 165),
            success: rgb(59, 247, 209),
            warning: rgb(255, 210, 0),
            error: rgb(235, 111, 146),
            border_active: rgb(161, 119, 255),
            border_normal: rgb(88, 82, 96),
            highlight_bg: rgb(61, 174, 233),
            highlight_fg: rgb(0, 0, 0),
            match_bg: rgb(255, 210, 0),
            footer_search: rgb(61, 174, 233),
            footer_normal: rgb(255, 250, 243),
        }
    }

    /// Get a theme by name.
    ///
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "tokyo-night" => Some(Self::tokyo_night()),
            "rose-pine-dawn" => Some(Self::rose_pine_dawn()),
            _ => None,
        }
    }

    /// Get a theme by name, falling back to the default with a warning.
    ///
    pub fn from_name_or_default(name: &str) -> Self {
        Self::from_name(name).unwrap_or_else(|| {
            warn!("Unknown theme '{}', using '{}'.", name, Theme::default().name);
            Theme::default()
        })
    }

    pub fn available_themes() -> Vec<&'static str> {
        vec!["tokyo-night", "rose-pine-dawn"]
    }
}
