use image::{GrayImage, ImageBuffer, Luma};

use super::{BorderedModules, RenderError, RenderOptions, Rendered, Renderer};
use crate::models::QRCode;

const DARK: Luma<u8> = Luma([0]);
const LIGHT: Luma<u8> = Luma([255]);

/// Renders into an in-memory grayscale image, `scale` pixels per module
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ImageRenderer;

impl ImageRenderer {
    /// Render to a grayscale image, dark modules are black
    pub fn to_image(&self, qr: &QRCode, options: &RenderOptions) -> Result<GrayImage, RenderError> {
        if options.scale == 0 {
            return Err(RenderError::InvalidScale(0));
        }
        let modules = BorderedModules::new(qr, options.border);
        let side = modules
            .size()
            .checked_mul(options.scale)
            .ok_or(RenderError::TooLarge(usize::MAX))?;
        let dim = u32::try_from(side).map_err(|_| RenderError::TooLarge(side))?;
        let scale = options.scale;

        let img: GrayImage = ImageBuffer::from_fn(dim, dim, |x, y| {
            if modules.is_dark(x as usize / scale, y as usize / scale) {
                DARK
            } else {
                LIGHT
            }
        });
        Ok(img)
    }
}

impl Renderer for ImageRenderer {
    fn name(&self) -> &str {
        "image"
    }

    fn render(&self, qr: &QRCode, options: &RenderOptions) -> Result<Rendered, RenderError> {
        self.to_image(qr, options).map(Rendered::Image)
    }
}
