//! Rendering of finished symbols
//!
//! Renderers are registered explicitly by name in a [`RendererRegistry`].
//! Two are built in: `"text"` ([`TextRenderer`]) and `"image"`
//! ([`ImageRenderer`]).

use std::collections::BTreeMap;

use thiserror::Error;

use crate::models::QRCode;

/// In-memory grayscale raster output
pub mod image;
/// Plain text output
pub mod text;

pub use self::image::ImageRenderer;
pub use self::text::TextRenderer;

/// Errors returned by renderers and the registry
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RenderError {
    /// No renderer is registered under the name
    #[error("unknown renderer \"{0}\"")]
    UnknownRenderer(String),
    /// The scale must be at least 1
    #[error("invalid scale {0}, expected a positive integer")]
    InvalidScale(usize),
    /// The output does not fit the renderer's size limits
    #[error("output of {0}x{0} units is too large")]
    TooLarge(usize),
}

/// Size parameters shared by all renderers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderOptions {
    /// Output units (pixels, characters) per module
    pub scale: usize,
    /// Quiet zone in modules; the symbol's default when `None`
    pub border: Option<usize>,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            scale: 1,
            border: None,
        }
    }
}

impl RenderOptions {
    /// Options with `scale` and the default border
    pub fn new(scale: usize) -> Self {
        Self {
            scale,
            border: None,
        }
    }

    /// Set the quiet zone width in modules
    pub fn border(mut self, border: usize) -> Self {
        self.border = Some(border);
        self
    }

    fn validate(&self) -> Result<(), RenderError> {
        if self.scale == 0 {
            return Err(RenderError::InvalidScale(self.scale));
        }
        Ok(())
    }
}

/// Output of a renderer
#[derive(Debug, Clone, PartialEq)]
pub enum Rendered {
    /// Lines separated by `\n`
    Text(String),
    /// 8-bit grayscale raster, dark modules are 0
    Image(::image::GrayImage),
}

/// Turns a finished symbol into some output format
pub trait Renderer: Send + Sync {
    /// Name the renderer is registered under
    fn name(&self) -> &str;

    /// Render `qr` including its quiet zone
    fn render(&self, qr: &QRCode, options: &RenderOptions) -> Result<Rendered, RenderError>;
}

/// Symbol modules including the quiet zone; the quiet zone is light
pub(crate) struct BorderedModules<'a> {
    qr: &'a QRCode,
    border: usize,
}

impl<'a> BorderedModules<'a> {
    pub(crate) fn new(qr: &'a QRCode, border: Option<usize>) -> Self {
        Self {
            qr,
            border: border.unwrap_or_else(|| qr.default_border_size()),
        }
    }

    /// Side length in modules
    pub(crate) fn size(&self) -> usize {
        self.qr.size() + 2 * self.border
    }

    pub(crate) fn is_dark(&self, x: usize, y: usize) -> bool {
        let size = self.qr.size();
        match (x.checked_sub(self.border), y.checked_sub(self.border)) {
            (Some(qx), Some(qy)) if qx < size && qy < size => self.qr.get(qx, qy),
            _ => false,
        }
    }
}

/// Named renderers
pub struct RendererRegistry {
    renderers: BTreeMap<String, Box<dyn Renderer>>,
}

impl Default for RendererRegistry {
    fn default() -> Self {
        Self::with_builtins()
    }
}

impl RendererRegistry {
    /// Registry without any renderer
    pub fn empty() -> Self {
        Self {
            renderers: BTreeMap::new(),
        }
    }

    /// Registry holding the built-in `"text"` and `"image"` renderers
    pub fn with_builtins() -> Self {
        let mut registry = Self::empty();
        registry.register(Box::new(TextRenderer::default()));
        registry.register(Box::new(ImageRenderer));
        registry
    }

    /// Add `renderer` under its name, returning the one it replaces
    pub fn register(&mut self, renderer: Box<dyn Renderer>) -> Option<Box<dyn Renderer>> {
        let name = renderer.name().to_ascii_lowercase();
        self.renderers.insert(name, renderer)
    }

    /// Renderer registered under `name` (case-insensitive)
    pub fn get(&self, name: &str) -> Option<&dyn Renderer> {
        self.renderers
            .get(&name.to_ascii_lowercase())
            .map(|r| r.as_ref())
    }

    /// Registered names in sorted order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.renderers.keys().map(String::as_str)
    }

    /// Render `qr` with the renderer registered under `name`
    pub fn render(
        &self,
        name: &str,
        qr: &QRCode,
        options: &RenderOptions,
    ) -> Result<Rendered, RenderError> {
        let renderer = self
            .get(name)
            .ok_or_else(|| RenderError::UnknownRenderer(name.to_string()))?;
        options.validate()?;
        renderer.render(qr, options)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{EncodeOptions, make};

    struct Counter;

    impl Renderer for Counter {
        fn name(&self) -> &str {
            "Count"
        }

        fn render(&self, qr: &QRCode, _: &RenderOptions) -> Result<Rendered, RenderError> {
            Ok(Rendered::Text(qr.modules.count_dark().to_string()))
        }
    }

    #[test]
    fn test_builtins_registered() {
        let registry = RendererRegistry::default();
        let names: Vec<&str> = registry.names().collect();
        assert_eq!(names, vec!["image", "text"]);
    }

    #[test]
    fn test_unknown_renderer() {
        let qr = make("1", &EncodeOptions::new()).unwrap();
        let registry = RendererRegistry::empty();
        assert_eq!(
            registry.render("svg", &qr, &RenderOptions::default()),
            Err(RenderError::UnknownRenderer("svg".to_string()))
        );
    }

    #[test]
    fn test_register_custom_renderer() {
        let qr = make("1", &EncodeOptions::new()).unwrap();
        let mut registry = RendererRegistry::with_builtins();
        assert!(registry.register(Box::new(Counter)).is_none());
        let out = registry.render("count", &qr, &RenderOptions::default()).unwrap();
        assert_eq!(out, Rendered::Text(qr.modules.count_dark().to_string()));
    }

    #[test]
    fn test_zero_scale_rejected() {
        let qr = make("1", &EncodeOptions::new()).unwrap();
        let registry = RendererRegistry::default();
        assert_eq!(
            registry.render("text", &qr, &RenderOptions::new(0)),
            Err(RenderError::InvalidScale(0))
        );
    }

    #[test]
    fn test_bordered_modules() {
        let qr = make("1", &EncodeOptions::new()).unwrap();
        let modules = BorderedModules::new(&qr, None);
        assert_eq!(modules.size(), 11 + 4);
        assert!(!modules.is_dark(0, 0));
        assert!(modules.is_dark(2, 2));
        assert!(!modules.is_dark(14, 14));
    }
}
