// Theme cascading and contrast utilities
// Effective display attributes cascade Dashboard -> Tab -> Group -> Entry,
// with each level allowed to override the parent's value.
use serde::{Deserialize, Serialize};

/// Partial set of display-attribute overrides attachable at any hierarchy
/// level. An unset field means "inherit", never "reset to default".
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThemeLevel {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub opacity: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text_color: Option<TextColorMode>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextColorMode {
    Auto,
    Light,
    Dark,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextColor {
    Light,
    Dark,
}

/// Resolves a ThemeLevel chain ordered outermost (dashboard) to innermost
/// (entry). For each attribute the innermost defined value wins; levels
/// without a value are transparent. No tree walking happens here - callers
/// pass exactly the ancestor chain for the node being rendered.
pub fn cascade(levels: &[Option<&ThemeLevel>]) -> ThemeLevel {
    let mut result = ThemeLevel::default();

    for level in levels.iter().flatten() {
        if level.color.is_some() {
            result.color = level.color.clone();
        }
        if level.opacity.is_some() {
            result.opacity = level.opacity;
        }
        if level.text_color.is_some() {
            result.text_color = level.text_color;
        }
    }

    result
}

/// Effective theme for an entry.
pub fn effective_entry_theme(
    dashboard: Option<&ThemeLevel>,
    tab: Option<&ThemeLevel>,
    group: Option<&ThemeLevel>,
    entry: Option<&ThemeLevel>,
) -> ThemeLevel {
    cascade(&[dashboard, tab, group, entry])
}

/// Picks light or dark text for a background color using WCAG relative
/// luminance. Luminance above 0.5 means a light background, so dark text.
/// Unparseable input falls back to light text.
pub fn auto_text_color(background: &str) -> TextColor {
    match parse_hex(background) {
        Some((r, g, b)) => {
            if relative_luminance(r, g, b) > 0.5 {
                TextColor::Dark
            } else {
                TextColor::Light
            }
        }
        None => TextColor::Light,
    }
}

/// Concrete CSS color for a resolved text-color mode. Auto mode derives
/// from the resolved background; with no background resolvable it defaults
/// to light text.
pub fn text_color_value(mode: TextColorMode, background: Option<&str>) -> &'static str {
    let resolved = match mode {
        TextColorMode::Light => TextColor::Light,
        TextColorMode::Dark => TextColor::Dark,
        TextColorMode::Auto => match background {
            Some(bg) => auto_text_color(bg),
            None => TextColor::Light,
        },
    };

    match resolved {
        TextColor::Light => "#ffffff",
        TextColor::Dark => "#000000",
    }
}

/// WCAG 2.0 relative luminance.
fn relative_luminance(r: u8, g: u8, b: u8) -> f64 {
    fn channel(c: u8) -> f64 {
        let c = c as f64 / 255.0;
        if c <= 0.03928 {
            c / 12.92
        } else {
            ((c + 0.055) / 1.055).powf(2.4)
        }
    }

    0.2126 * channel(r) + 0.7152 * channel(g) + 0.0722 * channel(b)
}

/// Parses "#rrggbb" (the leading '#' is optional).
fn parse_hex(hex: &str) -> Option<(u8, u8, u8)> {
    let hex = hex.strip_prefix('#').unwrap_or(hex);
    if hex.len() != 6 || !hex.is_ascii() {
        return None;
    }

    let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
    let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
    let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
    Some((r, g, b))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn color(c: &str) -> ThemeLevel {
        ThemeLevel {
            color: Some(c.to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_innermost_defined_wins() {
        let outer = color("a");
        let inner = color("b");
        let resolved = cascade(&[Some(&outer), None, Some(&inner)]);
        assert_eq!(resolved.color.as_deref(), Some("b"));
    }

    #[test]
    fn test_undefined_levels_are_transparent() {
        let outer = color("a");
        let empty = ThemeLevel::default();
        let resolved = cascade(&[Some(&outer), Some(&empty), None]);
        assert_eq!(resolved.color.as_deref(), Some("a"));
    }

    #[test]
    fn test_attributes_cascade_independently() {
        let dashboard = ThemeLevel {
            color: Some("#112233".to_string()),
            opacity: Some(0.8),
            text_color: None,
        };
        let entry = ThemeLevel {
            color: None,
            opacity: Some(0.5),
            text_color: Some(TextColorMode::Dark),
        };
        let resolved = effective_entry_theme(Some(&dashboard), None, None, Some(&entry));
        assert_eq!(resolved.color.as_deref(), Some("#112233"));
        assert_eq!(resolved.opacity, Some(0.5));
        assert_eq!(resolved.text_color, Some(TextColorMode::Dark));
    }

    #[test]
    fn test_empty_chain_resolves_to_nothing() {
        let resolved = cascade(&[None, None, None, None]);
        assert_eq!(resolved, ThemeLevel::default());
    }

    #[test]
    fn test_luminance_boundary() {
        assert_eq!(auto_text_color("#ffffff"), TextColor::Dark);
        assert_eq!(auto_text_color("#000000"), TextColor::Light);
    }

    #[test]
    fn test_auto_without_background_defaults_to_light() {
        assert_eq!(text_color_value(TextColorMode::Auto, None), "#ffffff");
        assert_eq!(
            text_color_value(TextColorMode::Auto, Some("#ffffff")),
            "#000000"
        );
    }

    #[test]
    fn test_invalid_hex_defaults_to_light() {
        assert_eq!(auto_text_color("not-a-color"), TextColor::Light);
        assert_eq!(auto_text_color("#fff"), TextColor::Light);
    }

    #[test]
    fn test_hex_prefix_optional() {
        assert_eq!(auto_text_color("ffffff"), TextColor::Dark);
    }
}
