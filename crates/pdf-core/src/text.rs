//! Text rendering utilities

use crate::document::Color;

/// Context for rendering text
pub struct TextRenderContext {
    /// PDF font resource name (e.g., "FF1")
    pub font_name: String,
    /// Font size in points
    pub font_size: f32,
    /// Text color (RGB)
    pub color: Color,
    /// Page `/Rotate` in degrees (0, 90, 180 or 270)
    pub rotation: u16,
}

/// Generate PDF operators for text insertion
///
/// Creates the PDF text operators (BT, Tf, Td, Tj, ET) to render text with
/// its baseline starting at `(x, y)`. The block is wrapped in `q`/`Q` so the
/// color change does not leak into later content.
///
/// On a rotated page the position is set with `Tm` instead of `Td`, turning
/// the text so it reads upright once the viewer applies `/Rotate`.
///
/// # Arguments
/// * `text_hex` - Hex-encoded text (e.g., "<48656C6C6F>")
/// * `x` - X coordinate in points (PDF coordinates, from left)
/// * `y` - Y coordinate in points (PDF coordinates, from bottom)
/// * `ctx` - Text rendering context
pub fn generate_text_operators(text_hex: &str, x: f64, y: f64, ctx: &TextRenderContext) -> Vec<u8> {
    let mut ops = String::new();

    ops.push_str("q\n");
    ops.push_str("BT\n");

    // Non-stroking color
    ops.push_str(&format!(
        "{} {} {} rg\n",
        ctx.color.r, ctx.color.g, ctx.color.b
    ));

    ops.push_str(&format!("/{} {} Tf\n", ctx.font_name, ctx.font_size));
    match text_matrix(ctx.rotation) {
        Some((a, b, c, d)) => ops.push_str(&format!("{a} {b} {c} {d} {x} {y} Tm\n")),
        None => ops.push_str(&format!("{x} {y} Td\n")),
    }
    ops.push_str(&format!("{text_hex} Tj\n"));

    ops.push_str("ET\n");
    ops.push_str("Q\n");

    ops.into_bytes()
}

/// Text matrix rotation terms for a page rotated clockwise by `rotation`
fn text_matrix(rotation: u16) -> Option<(i32, i32, i32, i32)> {
    match rotation {
        90 => Some((0, 1, -1, 0)),
        180 => Some((-1, 0, 0, -1)),
        270 => Some((0, -1, 1, 0)),
        _ => None,
    }
}

/// Encode text with the WinAnsi (CP1252) encoding used by the standard fonts
///
/// Returns the first character that has no WinAnsi code as the error.
pub fn encode_win_ansi(text: &str) -> std::result::Result<Vec<u8>, char> {
    text.chars()
        .map(|c| win_ansi_code(c).ok_or(c))
        .collect()
}

/// Format bytes as a PDF hex string
pub(crate) fn hex_string(bytes: &[u8]) -> String {
    let mut result = String::with_capacity(bytes.len() * 2 + 2);
    result.push('<');
    for b in bytes {
        result.push_str(&format!("{b:02X}"));
    }
    result.push('>');
    result
}

fn win_ansi_code(c: char) -> Option<u8> {
    let code = c as u32;
    match code {
        0x20..=0x7E | 0xA0..=0xFF => Some(code as u8),
        _ => match c {
            '€' => Some(0x80),
            '‚' => Some(0x82),
            'ƒ' => Some(0x83),
            '„' => Some(0x84),
            '…' => Some(0x85),
            '†' => Some(0x86),
            '‡' => Some(0x87),
            'ˆ' => Some(0x88),
            '‰' => Some(0x89),
            'Š' => Some(0x8A),
            '‹' => Some(0x8B),
            'Œ' => Some(0x8C),
            'Ž' => Some(0x8E),
            '\u{2018}' => Some(0x91),
            '\u{2019}' => Some(0x92),
            '\u{201C}' => Some(0x93),
            '\u{201D}' => Some(0x94),
            '•' => Some(0x95),
            '–' => Some(0x96),
            '—' => Some(0x97),
            '˜' => Some(0x98),
            '™' => Some(0x99),
            'š' => Some(0x9A),
            '›' => Some(0x9B),
            'œ' => Some(0x9C),
            'ž' => Some(0x9E),
            'Ÿ' => Some(0x9F),
            _ => None,
        },
    }
}
