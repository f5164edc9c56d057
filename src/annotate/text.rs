use crate::{
    annotate::composite::blend_layer,
    foundation::{
        core::Rgb8,
        error::{ShotError, ShotResult},
    },
};

/// Brush carried through Parley layouts. Paint color is chosen at draw time, so
/// the same layout serves both the shadow and the main pass.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TextBrushRgba8 {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

/// Padding around a rasterized text layer so antialiased edges are not cut.
const LAYER_PAD: u32 = 2;

/// A TrueType/OpenType face registered with Parley, rasterized with vello_cpu.
pub struct ScalableFont {
    font_ctx: parley::FontContext,
    layout_ctx: parley::LayoutContext<TextBrushRgba8>,
    family_name: String,
    font: vello_cpu::peniko::FontData,
    size_px: f32,
}

impl std::fmt::Debug for ScalableFont {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScalableFont")
            .field("family_name", &self.family_name)
            .field("size_px", &self.size_px)
            .finish_non_exhaustive()
    }
}

impl ScalableFont {
    pub fn from_bytes(font_bytes: Vec<u8>, size_px: f32) -> ShotResult<Self> {
        if !size_px.is_finite() || size_px <= 0.0 {
            return Err(ShotError::config("font size must be finite and > 0"));
        }

        let mut font_ctx = parley::FontContext::default();
        let families = font_ctx
            .collection
            .register_fonts(parley::fontique::Blob::from(font_bytes.clone()), None);
        let family_id = families
            .first()
            .map(|(id, _)| *id)
            .ok_or_else(|| ShotError::config("no font families registered from font bytes"))?;
        let family_name = font_ctx
            .collection
            .family_name(family_id)
            .ok_or_else(|| ShotError::config("registered font family has no name"))?
            .to_string();

        let font =
            vello_cpu::peniko::FontData::new(vello_cpu::peniko::Blob::from(font_bytes), 0);

        Ok(Self {
            font_ctx,
            layout_ctx: parley::LayoutContext::new(),
            family_name,
            font,
            size_px,
        })
    }

    pub fn family_name(&self) -> &str {
        &self.family_name
    }

    pub fn size_px(&self) -> f32 {
        self.size_px
    }

    fn layout(&mut self, text: &str) -> parley::Layout<TextBrushRgba8> {
        let mut builder = self
            .layout_ctx
            .ranged_builder(&mut self.font_ctx, text, 1.0, true);
        builder.push_default(parley::style::StyleProperty::FontStack(
            parley::style::FontStack::Source(std::borrow::Cow::Owned(self.family_name.clone())),
        ));
        builder.push_default(parley::style::StyleProperty::FontSize(self.size_px));
        builder.push_default(parley::style::StyleProperty::Brush(
            TextBrushRgba8::default(),
        ));

        let mut layout: parley::Layout<TextBrushRgba8> = builder.build(text);
        layout.break_all_lines(None);
        layout
    }

    /// Rendered box of a single line, rounded up to whole pixels.
    pub fn measure(&mut self, text: &str) -> ShotResult<(u32, u32)> {
        let layout = self.layout(text);
        layout_box(&layout)
    }

    pub(crate) fn draw(
        &mut self,
        dst: &mut image::RgbaImage,
        x: i64,
        y: i64,
        text: &str,
        color: Rgb8,
    ) -> ShotResult<()> {
        let layout = self.layout(text);
        let (w, h) = layout_box(&layout)?;
        if w == 0 || h == 0 {
            return Ok(());
        }

        let layer_w: u16 = (w + 2 * LAYER_PAD)
            .try_into()
            .map_err(|_| ShotError::encoding("text", "text layer width exceeds u16"))?;
        let layer_h: u16 = (h + 2 * LAYER_PAD)
            .try_into()
            .map_err(|_| ShotError::encoding("text", "text layer height exceeds u16"))?;

        let mut ctx = vello_cpu::RenderContext::new(layer_w, layer_h);
        let pad = f64::from(LAYER_PAD);
        ctx.set_transform(vello_cpu::kurbo::Affine::translate((pad, pad)));
        ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(
            color.r, color.g, color.b, 255,
        ));

        for line in layout.lines() {
            for item in line.items() {
                let parley::layout::PositionedLayoutItem::GlyphRun(run) = item else {
                    continue;
                };
                let glyphs = run.positioned_glyphs().map(|g| vello_cpu::Glyph {
                    id: g.id,
                    x: g.x,
                    y: g.y,
                });
                ctx.glyph_run(&self.font)
                    .font_size(run.run().font_size())
                    .fill_glyphs(glyphs);
            }
        }

        ctx.flush();
        let mut pixmap = vello_cpu::Pixmap::new(layer_w, layer_h);
        ctx.render_to_pixmap(&mut pixmap);

        let pad = i64::from(LAYER_PAD);
        blend_layer(
            dst,
            pixmap.data_as_u8_slice(),
            u32::from(layer_w),
            u32::from(layer_h),
            x - pad,
            y - pad,
        );
        Ok(())
    }
}

fn layout_box(layout: &parley::Layout<TextBrushRgba8>) -> ShotResult<(u32, u32)> {
    let (w, h) = (layout.width(), layout.height());
    if !w.is_finite() || !h.is_finite() || w < 0.0 || h < 0.0 {
        return Err(ShotError::encoding(
            "text",
            format!("degenerate text box {w}x{h}"),
        ));
    }
    Ok((w.ceil() as u32, h.ceil() as u32))
}
