//! Font handling for PDF documents

use crate::{PdfError, Result};
use flate2::write::ZlibEncoder;
use flate2::Compression;
use lopdf::{Dictionary, Object, Stream};
use std::collections::BTreeSet;
use std::io::Write;

/// Name of the built-in font used when no TrueType font is selected
pub const HELVETICA: &str = "Helvetica";

/// Helvetica advance widths for WinAnsi codes 0x20..=0x7E (1000 units/em)
const HELVETICA_ASCII_WIDTHS: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278, // ' '..'/'
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 278, 278, 584, 584, 584, 556, // '0'..'?'
    1015, 667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, 722, 778, // '@'..'O'
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 278, 278, 278, 469, 556, // 'P'..'_'
    333, 556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, 556, 556, // '`'..'o'
    556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, 334, 260, 334, 584, // 'p'..'~'
];

/// Advance width of a WinAnsi-encoded byte in Helvetica (1000 units/em)
///
/// Codes outside printable ASCII use the width of a lowercase letter.
pub fn helvetica_width(code: u8) -> u16 {
    match code {
        0x20..=0x7E => HELVETICA_ASCII_WIDTHS[(code - 0x20) as usize],
        _ => 556,
    }
}

/// Font dictionary for the built-in Helvetica font
pub(crate) fn helvetica_dictionary() -> Dictionary {
    Dictionary::from_iter(vec![
        ("Type", "Font".into()),
        ("Subtype", "Type1".into()),
        ("BaseFont", HELVETICA.into()),
        ("Encoding", "WinAnsiEncoding".into()),
    ])
}

/// TrueType font data for embedding
#[derive(Debug, Clone)]
pub struct FontData {
    /// Font name/identifier
    pub name: String,
    /// Raw TTF data
    ttf_data: Vec<u8>,
    /// Characters used (for the widths array and ToUnicode map)
    used_chars: BTreeSet<char>,
}

/// PDF objects generated for font embedding
pub struct FontObjects {
    /// Type0 font dictionary
    pub type0_font: Dictionary,
    /// CIDFont Type2 dictionary
    pub cid_font: Dictionary,
    /// Font descriptor dictionary
    pub font_descriptor: Dictionary,
    /// Font file stream (compressed TTF data)
    pub font_file_stream: Stream,
    /// ToUnicode CMap stream
    pub tounicode_stream: Stream,
}

impl FontData {
    /// Create font data from TTF bytes
    ///
    /// # Arguments
    /// * `name` - Font identifier
    /// * `ttf_data` - TrueType font file bytes
    pub fn from_ttf(name: &str, ttf_data: &[u8]) -> Result<Self> {
        ttf_parser::Face::parse(ttf_data, 0)
            .map_err(|e| PdfError::FontParseError(format!("{e:?}")))?;

        Ok(Self {
            name: name.to_string(),
            ttf_data: ttf_data.to_vec(),
            used_chars: BTreeSet::new(),
        })
    }

    fn face(&self) -> Option<ttf_parser::Face<'_>> {
        ttf_parser::Face::parse(&self.ttf_data, 0).ok()
    }

    /// Record characters as used
    pub fn add_chars(&mut self, text: &str) {
        self.used_chars.extend(text.chars());
    }

    /// Get glyph ID for a character
    pub fn glyph_id(&self, c: char) -> Option<u16> {
        self.face()
            .and_then(|face| face.glyph_index(c).map(|id| id.0))
    }

    /// Calculate text width in points for a given font size
    pub fn text_width_points(&self, text: &str, font_size: f32) -> f32 {
        let Some(face) = self.face() else {
            return 0.0;
        };
        let width: u32 = text
            .chars()
            .filter_map(|c| face.glyph_index(c))
            .filter_map(|gid| face.glyph_hor_advance(gid))
            .map(u32::from)
            .sum();
        (width as f32 / face.units_per_em() as f32) * font_size
    }

    /// Encode text as a hex string of glyph IDs (Identity-H)
    ///
    /// Fails with the first character the font has no glyph for.
    pub fn encode_text_hex(&self, text: &str) -> Result<String> {
        let face = self
            .face()
            .ok_or_else(|| PdfError::FontParseError(self.name.clone()))?;
        let mut result = String::from("<");
        for c in text.chars() {
            match face.glyph_index(c) {
                Some(gid) if gid.0 != 0 => result.push_str(&format!("{:04X}", gid.0)),
                _ => {
                    return Err(PdfError::UnsupportedCharacter {
                        ch: c,
                        font: self.name.clone(),
                    })
                }
            }
        }
        result.push('>');
        Ok(result)
    }

    /// Generate all PDF objects needed to embed this font
    ///
    /// References between the objects are placeholders; the document
    /// fills them in once object IDs are assigned.
    pub fn to_pdf_objects(&self) -> Result<FontObjects> {
        let face = self
            .face()
            .ok_or_else(|| PdfError::FontParseError(self.name.clone()))?;
        let base_font = Object::Name(self.name.replace(' ', "").into_bytes());

        let tounicode_content = self.generate_tounicode_cmap();
        let tounicode_stream = Stream::new(Dictionary::new(), tounicode_content.into_bytes());

        let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(&self.ttf_data)?;
        let compressed = encoder.finish()?;
        let font_file_stream = Stream::new(
            Dictionary::from_iter(vec![
                ("Filter", "FlateDecode".into()),
                ("Length1", (self.ttf_data.len() as i64).into()),
            ]),
            compressed,
        );

        let bbox = face.global_bounding_box();
        let font_descriptor = Dictionary::from_iter(vec![
            ("Type", "FontDescriptor".into()),
            ("FontName", base_font.clone()),
            ("Flags", 4.into()),
            (
                "FontBBox",
                vec![
                    bbox.x_min.into(),
                    bbox.y_min.into(),
                    bbox.x_max.into(),
                    bbox.y_max.into(),
                ]
                .into(),
            ),
            ("ItalicAngle", 0.into()),
            ("Ascent", face.ascender().into()),
            ("Descent", face.descender().into()),
            ("CapHeight", face.capital_height().unwrap_or(face.ascender()).into()),
            ("StemV", 80.into()),
        ]);

        let cid_system_info = Dictionary::from_iter(vec![
            ("Registry", Object::string_literal("Adobe")),
            ("Ordering", Object::string_literal("Identity")),
            ("Supplement", 0.into()),
        ]);

        let cid_font = Dictionary::from_iter(vec![
            ("Type", "Font".into()),
            ("Subtype", "CIDFontType2".into()),
            ("BaseFont", base_font.clone()),
            ("CIDSystemInfo", cid_system_info.into()),
            ("CIDToGIDMap", "Identity".into()),
            ("W", self.generate_widths_array(&face).into()),
            ("DW", 1000.into()),
        ]);

        let type0_font = Dictionary::from_iter(vec![
            ("Type", "Font".into()),
            ("Subtype", "Type0".into()),
            ("BaseFont", base_font),
            ("Encoding", "Identity-H".into()),
        ]);

        Ok(FontObjects {
            type0_font,
            cid_font,
            font_descriptor,
            font_file_stream,
            tounicode_stream,
        })
    }

    /// Generate /W array for the used glyphs, scaled to 1000 units/em
    fn generate_widths_array(&self, face: &ttf_parser::Face<'_>) -> Vec<Object> {
        let scale = 1000.0 / face.units_per_em() as f64;
        let mut gids: Vec<u16> = self
            .used_chars
            .iter()
            .filter_map(|&c| face.glyph_index(c).map(|id| id.0))
            .collect();
        gids.sort_unstable();
        gids.dedup();

        let mut widths = Vec::with_capacity(gids.len() * 2);
        for gid in gids {
            let advance = face
                .glyph_hor_advance(ttf_parser::GlyphId(gid))
                .unwrap_or(0);
            widths.push(Object::Integer(gid as i64));
            widths.push(Object::Array(vec![Object::Integer(
                (advance as f64 * scale).round() as i64,
            )]));
        }
        widths
    }

    /// Generate ToUnicode CMap stream content
    fn generate_tounicode_cmap(&self) -> String {
        let mut cmap = String::new();

        cmap.push_str("/CIDInit /ProcSet findresource begin\n");
        cmap.push_str("12 dict begin\n");
        cmap.push_str("begincmap\n");
        cmap.push_str("/CIDSystemInfo << /Registry (Adobe) /Ordering (UCS) /Supplement 0 >> def\n");
        cmap.push_str("/CMapName /Adobe-Identity-UCS def\n");
        cmap.push_str("/CMapType 2 def\n");
        cmap.push_str("1 begincodespacerange\n");
        cmap.push_str("<0000> <FFFF>\n");
        cmap.push_str("endcodespacerange\n");

        let mapped: Vec<(u16, char)> = self
            .used_chars
            .iter()
            .filter_map(|&c| self.glyph_id(c).filter(|&gid| gid != 0).map(|gid| (gid, c)))
            .collect();

        // bfchar sections are limited to 100 entries
        for chunk in mapped.chunks(100) {
            cmap.push_str(&format!("{} beginbfchar\n", chunk.len()));
            for (gid, c) in chunk {
                let mut units = [0u16; 2];
                let utf16: String = c
                    .encode_utf16(&mut units)
                    .iter()
                    .map(|u| format!("{u:04X}"))
                    .collect();
                cmap.push_str(&format!("<{gid:04X}> <{utf16}>\n"));
            }
            cmap.push_str("endbfchar\n");
        }

        cmap.push_str("endcmap\n");
        cmap.push_str("CMapName currentdict /CMap defineresource pop\n");
        cmap.push_str("end\n");
        cmap.push_str("end\n");

        cmap
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_helvetica_widths() {
        assert_eq!(helvetica_width(b' '), 278);
        assert_eq!(helvetica_width(b'A'), 667);
        assert_eq!(helvetica_width(b'i'), 222);
        assert_eq!(helvetica_width(b'~'), 584);
        assert_eq!(helvetica_width(0xE9), 556);
    }

    #[test]
    fn test_helvetica_dictionary() {
        let dict = helvetica_dictionary();
        assert_eq!(dict.get(b"BaseFont").unwrap().as_name().unwrap(), b"Helvetica");
        assert_eq!(
            dict.get(b"Encoding").unwrap().as_name().unwrap(),
            b"WinAnsiEncoding"
        );
    }

    #[test]
    fn test_from_ttf_rejects_garbage() {
        let result = FontData::from_ttf("broken", &[0u8; 100]);
        assert!(matches!(result, Err(PdfError::FontParseError(_))));
    }
}
