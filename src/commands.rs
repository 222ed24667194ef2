use serde::Deserialize;
use serde_json::json;
use crate::effects::{effect_catalog, EffectKind};
use crate::engine::BackgroundEngine;
use crate::scheduler::FrameScheduler;
use crate::settings::BackgroundSettings;
use crate::surface::Canvas;
use crate::types::Size;

impl<C: Canvas, S: FrameScheduler> BackgroundEngine<C, S> {
    /// JSON entry point for the settings panel: `{"action": ..., "params": {...}}`.
    /// Always answers with a JSON string, `{"error": ...}` on failure.
    pub fn execute_command(&mut self, cmd_json: &str) -> String {
        #[derive(Deserialize)]
        struct Command {
            action: String,
            #[serde(default)]
            params: serde_json::Value,
        }

        let cmd: Command = match serde_json::from_str(cmd_json) {
            Ok(c) => c,
            Err(e) => return json!({ "error": format!("Invalid JSON: {}", e) }).to_string(),
        };

        match cmd.action.as_str() {
            "activate" => {
                let name = cmd.params["effect"].as_str().unwrap_or("none").to_string();
                let kind = match cmd.params.get("settings") {
                    Some(raw) => match serde_json::from_value::<BackgroundSettings>(raw.clone()) {
                        Ok(settings) => self.activate_named_with(&name, settings),
                        Err(e) => {
                            let msg = format!("Invalid settings: {}", e);
                            return json!({ "error": msg }).to_string();
                        }
                    },
                    None => self.activate_named(&name),
                };
                json!({ "success": true, "effect": kind.name(), "running": self.is_running() })
                    .to_string()
            }
            "stop" => {
                self.stop();
                json!({ "success": true }).to_string()
            }
            "resize" => {
                let dim = |key: &str| cmd.params[key].as_u64().and_then(|v| u32::try_from(v).ok());
                match (dim("width"), dim("height")) {
                    (Some(width), Some(height)) => {
                        self.resize(Size::new(width, height));
                        json!({ "success": true }).to_string()
                    }
                    _ => json!({ "error": "resize needs integer width and height" }).to_string(),
                }
            }
            "set_opacity" => {
                let percent = cmd.params["percent"].as_i64().unwrap_or(100);
                self.set_opacity(percent);
                json!({ "success": true, "alpha": self.settings().alpha() }).to_string()
            }
            "settings" => match serde_json::from_value::<BackgroundSettings>(cmd.params) {
                Ok(settings) => {
                    self.update_settings(settings);
                    json!({ "success": true }).to_string()
                }
                Err(e) => json!({ "error": format!("Invalid settings: {}", e) }).to_string(),
            },
            "status" => self.status_json(),
            "catalog" => {
                serde_json::to_string(&effect_catalog()).unwrap_or_else(|_| "[]".to_string())
            }
            other => json!({ "error": format!("Unknown action: {}", other) }).to_string(),
        }
    }

    pub fn status_json(&self) -> String {
        json!({
            "effect": self.active_effect().map(EffectKind::name),
            "running": self.is_running(),
            "alpha": self.settings().alpha(),
            "surface": self.surface_size(),
        })
        .to_string()
    }
}
