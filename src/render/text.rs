use super::{BorderedModules, RenderError, RenderOptions, Rendered, Renderer};
use crate::models::QRCode;

/// Writes one string per module, rows separated by `\n`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextRenderer {
    /// Written for each dark module
    pub dark: String,
    /// Written for each light module
    pub light: String,
}

impl Default for TextRenderer {
    fn default() -> Self {
        Self {
            dark: "\u{2588}\u{2588}".to_string(),
            light: "  ".to_string(),
        }
    }
}

impl TextRenderer {
    /// `1` for dark and `0` for light modules
    pub fn digits() -> Self {
        Self {
            dark: "1".to_string(),
            light: "0".to_string(),
        }
    }

    /// Render to a string, `scale` repeats every module in both directions
    pub fn to_text(&self, qr: &QRCode, options: &RenderOptions) -> String {
        let modules = BorderedModules::new(qr, options.border);
        let size = modules.size();
        let scale = options.scale.max(1);
        let mut out = String::new();
        for y in 0..size {
            let mut line = String::new();
            for x in 0..size {
                let cell = if modules.is_dark(x, y) { &self.dark } else { &self.light };
                for _ in 0..scale {
                    line.push_str(cell);
                }
            }
            for _ in 0..scale {
                out.push_str(&line);
                out.push('\n');
            }
        }
        out
    }
}

impl Renderer for TextRenderer {
    fn name(&self) -> &str {
        "text"
    }

    fn render(&self, qr: &QRCode, options: &RenderOptions) -> Result<Rendered, RenderError> {
        Ok(Rendered::Text(self.to_text(qr, options)))
    }
}
