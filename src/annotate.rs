//! Drawing annotation lines onto a crop.
//!
//! Lines are stacked from the top-left margin, one rendered line height apart.
//! Every line gets a border so it stays legible on any background: the text is
//! drawn eight times in the shadow color, offset by the outline radius in each
//! direction, then once in the fill color on top.
//!
//! Font size and outline radius both scale with the crop height (see
//! [`calculations`](crate::imaging::calculations)), so a comparison of small
//! crops gets proportionally small text.

use crate::config::{AnnotationConfig, MissingPolicy};
use crate::imaging::TextRenderer;
use crate::imaging::calculations::{font_px, line_origin, outline_offsets, outline_radius};
use crate::metadata::InfoField;
use image::{Rgb, RgbImage};

/// Fields to draw plus how to draw them.
pub struct Annotator<'a> {
    renderer: &'a dyn TextRenderer,
    fields: Vec<InfoField>,
    style: AnnotationStyle,
    policy: MissingPolicy,
}

/// Resolved drawing parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct AnnotationStyle {
    pub font_size_divisor: u32,
    pub margin: (u32, u32),
    pub border_divisor: u32,
    pub shadow: Rgb<u8>,
    pub fill: Rgb<u8>,
}

impl From<&AnnotationConfig> for AnnotationStyle {
    fn from(config: &AnnotationConfig) -> Self {
        Self {
            font_size_divisor: config.font_size_divisor,
            margin: (config.margin_x, config.margin_y),
            border_divisor: config.border_divisor,
            shadow: Rgb(config.shadow_color),
            fill: Rgb(config.fill_color),
        }
    }
}

impl<'a> Annotator<'a> {
    pub fn new(
        renderer: &'a dyn TextRenderer,
        config: &AnnotationConfig,
        fields: Vec<InfoField>,
    ) -> Self {
        Self {
            renderer,
            fields,
            style: AnnotationStyle::from(config),
            policy: config.missing_policy(),
        }
    }

    pub fn fields(&self) -> &[InfoField] {
        &self.fields
    }

    pub fn policy(&self) -> &MissingPolicy {
        &self.policy
    }

    /// Whether any requested field reads EXIF.
    pub fn needs_metadata(&self) -> bool {
        self.fields.iter().any(|f| f.needs_metadata())
    }

    /// Draw `lines` top to bottom onto `crop`.
    pub fn draw_lines(&self, crop: &mut RgbImage, lines: &[String]) {
        let px = font_px(crop.height(), self.style.font_size_divisor);
        let radius = outline_radius(px, self.style.border_divisor) as i32;
        let size = px as f32;
        let line_height = self.renderer.line_height(size);

        for (i, text) in lines.iter().enumerate() {
            let (x, y) = line_origin(i, self.style.margin, line_height);

            let width = self.renderer.text_width(text, size);
            if (x as u32).saturating_add(width) > crop.width() {
                log::warn!(
                    "annotation \"{}\" is {}px wide and overflows the {}px crop",
                    text,
                    width,
                    crop.width()
                );
            }

            for (dx, dy) in outline_offsets(radius) {
                self.renderer
                    .draw_text(
                        crop,
                        text,
                        x.saturating_add(dx),
                        y.saturating_add(dy),
                        size,
                        self.style.shadow,
                    );
            }
            self.renderer
                .draw_text(crop, text, x, y, size, self.style.fill);
        }
    }
}
