use std::path::Path;

use serde::Deserialize;

use wplot_core::Projection;
use wplot_render::DomainStyle;

/// A complete render request loaded from a JSON file.
///
/// Field names mirror the worker request messages (`colorizationMode`,
/// `ptTopLeft`, ...), so a spec file doubles as a readable record of what a
/// plot was.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlotSpec {
    /// Builtin function name, e.g. `"square"` or `"demo"`.
    pub expression: String,
    pub colorization_mode: Projection,
    /// Domain-coloring style; only consulted for the magnitude mode.
    #[serde(default)]
    pub colorization_function: Option<DomainStyle>,
    pub pt_top_left: [f64; 2],
    pub pt_bottom_right: [f64; 2],
    pub width: u32,
    pub height: u32,
}

impl PlotSpec {
    pub fn load(path: &Path) -> Result<Self, Box<dyn std::error::Error>> {
        let text = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&text)?)
    }
}
