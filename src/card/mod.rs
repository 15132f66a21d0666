//! Manifestation card renderer.
//!
//! Composes a fixed 1080×1350 portrait raster: gradient background, noise
//! speckling, sacred-geometry circle, border with corner accents, logo badge,
//! header, the quoted desire centered in the circle, the affirmation anchored
//! near the bottom, and the brand footer. Output is PNG bytes plus a data URI.
//!
//! Rendering is pure in its inputs: the same (desire, affirmation, date,
//! fonts) produce byte-identical PNGs. The noise layer is seeded from the two
//! strings and the date line is only stamped when a date is passed in.

pub mod draw;
pub mod fonts;
pub mod layout;

use crate::error::RenderError;
use base64::Engine;
use chrono::NaiveDate;
use draw::Canvas;
use fonts::{FontSet, ScaledFont};
use image::codecs::png::PngEncoder;
use image::{ExtendedColorType, ImageEncoder, Rgba};
use layout::wrap_lines;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::path::Path;

pub const CARD_WIDTH: u32 = 1080;
pub const CARD_HEIGHT: u32 = 1350;

const HEADER: &str = "WISH THEORY MANIFESTATION";
const FOOTER: &str = "Trust the process";
const DATA_URI_PREFIX: &str = "data:image/png;base64,";

// Palette lifted from the product design: deep dark blue into rich purple
// into dark slate, gold geometry, amber accents.
const GRADIENT_STOPS: [(f32, Rgba<u8>); 3] = [
    (0.0, Rgba([15, 12, 41, 255])),
    (0.4, Rgba([48, 43, 99, 255])),
    (1.0, Rgba([36, 36, 62, 255])),
];
const GOLD: Rgba<u8> = Rgba([255, 215, 0, 255]);
const VIOLET: Rgba<u8> = Rgba([139, 92, 246, 255]);
const AMBER: Rgba<u8> = Rgba([251, 191, 36, 255]);
const INDIGO: Rgba<u8> = Rgba([99, 102, 241, 255]);
const WHITE: Rgba<u8> = Rgba([255, 255, 255, 255]);
const CREAM: Rgba<u8> = Rgba([255, 251, 235, 255]);
const LAVENDER: Rgba<u8> = Rgba([224, 231, 255, 255]);

const DESIRE_PX: f32 = 72.0;
const DESIRE_LINE_HEIGHT: f32 = 90.0;
const AFFIRMATION_PX: f32 = 42.0;
const AFFIRMATION_LINE_HEIGHT: f32 = 60.0;
const BOTTOM_MARGIN: f32 = 160.0;
const NOISE_SPECKLES: usize = 5000;

/// A flattened card image.
pub struct RenderedCard {
    png: Vec<u8>,
}

impl RenderedCard {
    pub fn png_bytes(&self) -> &[u8] {
        &self.png
    }

    /// `data:image/png;base64,` URI for direct display or embedding.
    pub fn data_uri(&self) -> String {
        let mut uri = String::from(DATA_URI_PREFIX);
        base64::engine::general_purpose::STANDARD.encode_string(&self.png, &mut uri);
        uri
    }

    pub fn save(&self, path: &Path) -> Result<(), RenderError> {
        std::fs::write(path, &self.png)?;
        Ok(())
    }
}

pub struct CardRenderer {
    fonts: FontSet,
}

impl CardRenderer {
    pub fn new(fonts: FontSet) -> Self {
        Self { fonts }
    }

    /// Render the card for one desire and its chosen affirmation.
    ///
    /// `date` is stamped under the header when given; pass `None` for a
    /// dateless (and therefore fully input-determined) card.
    pub fn render(
        &self,
        desire: &str,
        affirmation: &str,
        date: Option<NaiveDate>,
    ) -> Result<RenderedCard, RenderError> {
        let mut canvas = Canvas::new(CARD_WIDTH, CARD_HEIGHT);
        let width = CARD_WIDTH as f32;
        let height = CARD_HEIGHT as f32;
        let center_x = width / 2.0;
        let center_y = height / 2.0;

        // 1. Background gradient
        draw::fill_vertical_gradient(&mut canvas, &GRADIENT_STOPS);

        // 2. Mystical grain overlay, seeded so output stays input-determined
        let mut rng = StdRng::seed_from_u64(noise_seed(desire, affirmation));
        for _ in 0..NOISE_SPECKLES {
            let x = rng.random_range(0.0..width);
            let y = rng.random_range(0.0..height);
            let size: f32 = rng.random_range(0.0..2.0);
            draw::fill_rect(
                &mut canvas,
                x as i32,
                y as i32,
                size.ceil().max(1.0) as u32,
                size.ceil().max(1.0) as u32,
                WHITE,
                0.03,
            );
        }

        // 3. Sacred geometry: gold circle plus inner violet glow
        draw::stroke_circle(&mut canvas, center_x, center_y, 400.0, 2.0, GOLD, 0.15);
        draw::radial_glow(&mut canvas, center_x, center_y, 100.0, 400.0, VIOLET, 0.1);

        // 4. Border with corner accents
        draw::stroke_rect(
            &mut canvas,
            40,
            40,
            CARD_WIDTH - 80,
            CARD_HEIGHT - 80,
            4,
            WHITE,
            0.3,
        );
        for &(cx, cy) in &[
            (40, 40),
            (CARD_WIDTH as i32 - 40, 40),
            (40, CARD_HEIGHT as i32 - 40),
            (CARD_WIDTH as i32 - 40, CARD_HEIGHT as i32 - 40),
        ] {
            draw::fill_rect(&mut canvas, cx - 5, cy - 5, 10, 10, AMBER, 1.0);
        }

        // 5. Logo badge: gradient disc with a sparkle glyph
        draw::fill_circle(&mut canvas, center_x, 64.0, 22.0, INDIGO, 1.0);
        draw::fill_circle(&mut canvas, center_x + 4.0, 60.0, 14.0, AMBER, 0.35);
        draw::sparkle(&mut canvas, center_x, 64.0, 12.0, WHITE, 0.95);

        // 6. Header and optional date line
        draw::draw_text_centered(
            &mut canvas,
            &self.fonts.sans,
            32.0,
            center_x,
            120.0,
            WHITE,
            0.6,
            HEADER,
        );
        if let Some(date) = date {
            let stamp = date.format("%B %-d, %Y").to_string().to_uppercase();
            draw::draw_text_centered(
                &mut canvas,
                &self.fonts.sans,
                24.0,
                center_x,
                160.0,
                WHITE,
                0.4,
                &stamp,
            );
        }

        // 7. The desire, quoted, centered vertically in the circle area
        let quoted = format!("\"{desire}\"");
        let serif = ScaledFont::new(&self.fonts.serif, DESIRE_PX);
        let desire_lines = wrap_lines(&serif, &quoted, width - 240.0);
        let total_desire_height = desire_lines.len() as f32 * DESIRE_LINE_HEIGHT;
        // Offset by a third of a line to balance glyph descenders
        let mut desire_y = center_y - total_desire_height / 2.0 + DESIRE_LINE_HEIGHT / 3.0;
        for line in &desire_lines {
            glow_text(&mut canvas, &self.fonts.serif, DESIRE_PX, center_x, desire_y, line);
            draw::draw_text_centered(
                &mut canvas,
                &self.fonts.serif,
                DESIRE_PX,
                center_x,
                desire_y,
                CREAM,
                1.0,
                line,
            );
            desire_y += DESIRE_LINE_HEIGHT;
        }

        // 8. The affirmation, anchored above the footer and growing upward.
        // No collision avoidance with the desire block; extreme inputs may
        // overlap, which is an accepted layout limitation.
        let sans = ScaledFont::new(&self.fonts.sans, AFFIRMATION_PX);
        let aff_lines = wrap_lines(&sans, affirmation, width - 200.0);
        let total_aff_height = aff_lines.len() as f32 * AFFIRMATION_LINE_HEIGHT;
        let mut aff_y = (height - BOTTOM_MARGIN) - total_aff_height + AFFIRMATION_LINE_HEIGHT;
        for line in &aff_lines {
            draw::draw_text_centered(
                &mut canvas,
                &self.fonts.sans,
                AFFIRMATION_PX,
                center_x,
                aff_y,
                LAVENDER,
                0.9,
                line,
            );
            aff_y += AFFIRMATION_LINE_HEIGHT;
        }

        // 9. Brand footer
        draw::draw_text_centered(
            &mut canvas,
            &self.fonts.serif,
            28.0,
            center_x,
            height - 80.0,
            WHITE,
            0.3,
            FOOTER,
        );

        encode_png(&canvas).map(|png| RenderedCard { png })
    }
}

/// Soft amber glow behind the desire text, approximated with low-alpha
/// offset underdraws.
fn glow_text(canvas: &mut Canvas, font: &rusttype::Font<'static>, px: f32, cx: f32, baseline: f32, text: &str) {
    const OFFSETS: [(f32, f32); 8] = [
        (-2.0, 0.0),
        (2.0, 0.0),
        (0.0, -2.0),
        (0.0, 2.0),
        (-1.5, -1.5),
        (1.5, -1.5),
        (-1.5, 1.5),
        (1.5, 1.5),
    ];
    for (dx, dy) in OFFSETS {
        draw::draw_text_centered(canvas, font, px, cx + dx, baseline + dy, AMBER, 0.08, text);
    }
}

fn encode_png(canvas: &Canvas) -> Result<Vec<u8>, RenderError> {
    let mut out = Vec::new();
    PngEncoder::new(&mut out)
        .write_image(
            canvas.as_raw(),
            canvas.width(),
            canvas.height(),
            ExtendedColorType::Rgba8,
        )
        .map_err(|e| RenderError::Encode(e.to_string()))?;
    Ok(out)
}

/// FNV-1a over both strings; pins the speckle layer to the card's text.
fn noise_seed(desire: &str, affirmation: &str) -> u64 {
    let mut hash = 0xcbf2_9ce4_8422_2325u64;
    for byte in desire.bytes().chain([0u8]).chain(affirmation.bytes()) {
        hash ^= u64::from(byte);
        hash = hash.wrapping_mul(0x0000_0100_0000_01b3);
    }
    hash
}
