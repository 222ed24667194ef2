use std::collections::HashMap;
use serde::{Serialize, Deserialize};
use crate::color::{clamp_alpha, parse_hex_color};
use crate::effects::EffectKind;
use crate::types::Rgb;

pub const KEY_THEME: &str = "editorTheme";
pub const KEY_CUSTOM_BG_COLOR: &str = "customBgColor";
pub const KEY_BACKGROUND_EFFECT: &str = "backgroundEffect";
pub const KEY_EFFECT_OPACITY: &str = "effectOpacity";

/// Colour-mode value that unlocks the northern lights effect.
pub const NORTHERN_LIGHTS_MODE: &str = "ntlights";

pub const DEFAULT_OPACITY: i64 = 100;

/// Read-only key/value source the persisted page settings come from.
pub trait SettingsStore {
    fn get(&self, key: &str) -> Option<String>;
}

impl SettingsStore for HashMap<String, String> {
    fn get(&self, key: &str) -> Option<String> {
        HashMap::get(self, key).cloned()
    }
}

impl SettingsStore for HashMap<&str, &str> {
    fn get(&self, key: &str) -> Option<String> {
        HashMap::get(self, key).map(|v| v.to_string())
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct BackgroundSettings {
    pub theme: String,
    pub custom_bg_color: Option<String>,
    pub background_effect: Option<String>,
    pub effect_opacity: i64,
    /// The page's live accent (`--bg-color`). Falls back to the theme when unset.
    pub accent_color: Option<String>,
}

impl Default for BackgroundSettings {
    fn default() -> Self {
        BackgroundSettings {
            theme: "dark".to_string(),
            custom_bg_color: None,
            background_effect: None,
            effect_opacity: DEFAULT_OPACITY,
            accent_color: None,
        }
    }
}

impl BackgroundSettings {
    pub fn load(store: &dyn SettingsStore) -> Self {
        let defaults = BackgroundSettings::default();
        BackgroundSettings {
            theme: store.get(KEY_THEME).filter(|t| !t.is_empty()).unwrap_or(defaults.theme),
            custom_bg_color: store.get(KEY_CUSTOM_BG_COLOR),
            background_effect: store.get(KEY_BACKGROUND_EFFECT),
            effect_opacity: store
                .get(KEY_EFFECT_OPACITY)
                .map(|raw| parse_opacity(&raw))
                .unwrap_or(DEFAULT_OPACITY),
            accent_color: None,
        }
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Global effect opacity in `[0, 1]`.
    pub fn alpha(&self) -> f64 {
        clamp_alpha(self.effect_opacity as f64 / 100.0)
    }

    /// Effect to run when the page loads.
    pub fn startup_effect(&self) -> EffectKind {
        match self.theme.as_str() {
            "matrix" => EffectKind::Matrix,
            "custom" => self
                .background_effect
                .as_deref()
                .map(EffectKind::from_name)
                .unwrap_or(EffectKind::Off),
            _ => EffectKind::Off,
        }
    }

    pub fn selected_effect(&self) -> EffectKind {
        self.background_effect.as_deref().map(EffectKind::from_name).unwrap_or(EffectKind::Off)
    }

    /// Accent colour string, if the page provides one.
    pub fn accent(&self) -> Option<&str> {
        let explicit = self.accent_color.as_deref().map(str::trim).filter(|c| !c.is_empty());
        explicit.or_else(|| {
            if self.theme == "custom" {
                self.custom_bg_color.as_deref().map(str::trim).filter(|c| !c.is_empty())
            } else {
                None
            }
        })
    }

    pub fn northern_lights_enabled(&self) -> bool {
        self.custom_bg_color.as_deref() == Some(NORTHERN_LIGHTS_MODE)
    }

    /// Tint for the northern lights strips. Only a well-formed hex accent counts.
    pub fn northern_lights_tint(&self) -> Option<Rgb> {
        self.accent_color.as_deref().map(str::trim).and_then(parse_hex_color)
    }
}

/// Integer prefix parse of a stored percentage; unreadable values mean 100.
fn parse_opacity(raw: &str) -> i64 {
    let raw = raw.trim();
    let (sign, digits) = match raw.strip_prefix('-') {
        Some(rest) => (-1, rest),
        None => (1, raw.strip_prefix('+').unwrap_or(raw)),
    };
    let end = digits.find(|c: char| !c.is_ascii_digit()).unwrap_or(digits.len());
    match digits[..end].parse::<i64>() {
        Ok(value) => (sign * value).clamp(0, 100),
        Err(_) => DEFAULT_OPACITY,
    }
}
