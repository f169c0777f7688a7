use std::sync::Arc;

use serde::{Deserialize, Serialize};

/// Named image filters offered by the filter sidebar. Filter names map
/// one-to-one onto the lowercase strings used in the persisted document;
/// the sentinel name "none" is handled by the editor and clears the
/// filter list instead of appearing here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageFilter {
    Grayscale,
    Sepia,
    Invert,
    Brightness,
    Contrast,
    Saturation,
    Blur,
    Sharpen,
    Pixelate,
    Vintage,
    Huerotate,
    Gamma,
}

impl ImageFilter {
    pub const ALL: &'static [ImageFilter] = &[
        ImageFilter::Grayscale,
        ImageFilter::Sepia,
        ImageFilter::Invert,
        ImageFilter::Brightness,
        ImageFilter::Contrast,
        ImageFilter::Saturation,
        ImageFilter::Blur,
        ImageFilter::Sharpen,
        ImageFilter::Pixelate,
        ImageFilter::Vintage,
        ImageFilter::Huerotate,
        ImageFilter::Gamma,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            ImageFilter::Grayscale => "grayscale",
            ImageFilter::Sepia => "sepia",
            ImageFilter::Invert => "invert",
            ImageFilter::Brightness => "brightness",
            ImageFilter::Contrast => "contrast",
            ImageFilter::Saturation => "saturation",
            ImageFilter::Blur => "blur",
            ImageFilter::Sharpen => "sharpen",
            ImageFilter::Pixelate => "pixelate",
            ImageFilter::Vintage => "vintage",
            ImageFilter::Huerotate => "huerotate",
            ImageFilter::Gamma => "gamma",
        }
    }

    pub fn from_name(name: &str) -> Option<ImageFilter> {
        Self::ALL.iter().copied().find(|f| f.name() == name)
    }
}

/// Decoded RGBA pixels of a loaded image asset. Kept out of the
/// persisted document; the source URL is the durable reference.
#[derive(Clone)]
pub struct PixelData {
    pub rgba: Arc<Vec<u8>>,
    pub width: u32,
    pub height: u32,
}

impl std::fmt::Debug for PixelData {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PixelData")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("bytes", &self.rgba.len())
            .finish()
    }
}

/// Kind-specific attributes of an image object
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImageProps {
    /// Source reference the asset was loaded from
    pub src: String,
    /// Applied filters, in application order
    #[serde(default)]
    pub filters: Vec<ImageFilter>,
    /// Decode cache, repopulated on load
    #[serde(skip)]
    pub pixels: Option<PixelData>,
}

// Pixel caches are transient, so equality is over src and filters only.
impl PartialEq for ImageProps {
    fn eq(&self, other: &Self) -> bool {
        self.src == other.src && self.filters == other.filters
    }
}

impl ImageProps {
    pub fn new(src: &str) -> Self {
        Self {
            src: src.to_string(),
            filters: Vec::new(),
            pixels: None,
        }
    }

    pub fn with_pixels(src: &str, pixels: PixelData) -> Self {
        Self {
            src: src.to_string(),
            filters: Vec::new(),
            pixels: Some(pixels),
        }
    }

    /// Name of the most recently applied filter, for the sidebar to
    /// reflect current state.
    pub fn applied_filter(&self) -> Option<&'static str> {
        self.filters.last().map(|f| f.name())
    }
}
