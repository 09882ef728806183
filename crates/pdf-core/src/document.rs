//! PDF Document wrapper

use crate::font::{helvetica_dictionary, helvetica_width, FontData, HELVETICA};
use crate::text::{encode_win_ansi, generate_text_operators, hex_string, TextRenderContext};
use crate::{PdfError, Result};
use lopdf::{Dictionary, Document, Object, ObjectId, Stream};
use std::collections::HashMap;
use std::path::Path;

/// RGB Color (values 0.0 - 1.0)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Color {
    /// Create a new RGB color (values 0.0 - 1.0)
    pub fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    /// Create color from RGB values (0-255)
    pub fn from_rgb(r: u8, g: u8, b: u8) -> Self {
        Self {
            r: r as f32 / 255.0,
            g: g as f32 / 255.0,
            b: b as f32 / 255.0,
        }
    }

    /// Black color
    pub fn black() -> Self {
        Self::rgb(0.0, 0.0, 0.0)
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::black()
    }
}

/// Page dimensions in points
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageSize {
    pub width: f64,
    pub height: f64,
}

/// Visible page rectangle: lower-left and upper-right corners, plus the
/// clockwise `/Rotate` applied when the page is displayed
#[derive(Debug, Clone, Copy)]
struct PageBox {
    llx: f64,
    lly: f64,
    urx: f64,
    ury: f64,
    rotation: u16,
}

impl PageBox {
    /// Size of the page as displayed, after rotation
    fn displayed_size(&self) -> PageSize {
        let (width, height) = (self.urx - self.llx, self.ury - self.lly);
        if self.rotation % 180 == 0 {
            PageSize { width, height }
        } else {
            PageSize {
                width: height,
                height: width,
            }
        }
    }

    /// Map a top-left point of the displayed page to PDF user space
    fn to_user_space(&self, x: f64, y: f64) -> (f64, f64) {
        match self.rotation {
            90 => (self.llx + y, self.lly + x),
            180 => (self.urx - x, self.lly + y),
            270 => (self.urx - y, self.ury - x),
            _ => (self.llx + x, self.ury - y),
        }
    }
}

/// PDF Document wrapper providing text stamping
pub struct PdfDocument {
    /// The underlying lopdf document
    inner: Document,
    /// Registered TrueType fonts
    fonts: HashMap<String, FontData>,
    /// Selected TrueType font; `None` selects Helvetica
    current_font: Option<String>,
    /// Current text color
    current_text_color: Color,
    /// Page font resources (page number -> font name -> resource name)
    page_font_resources: HashMap<usize, HashMap<String, String>>,
    /// Next font resource number
    next_font_resource: u32,
    /// Buffered content operators per page (page number -> operators)
    page_content_buffer: HashMap<usize, Vec<u8>>,
}

impl PdfDocument {
    /// Open a PDF document from a file path
    ///
    /// # Example
    /// ```ignore
    /// let doc = PdfDocument::open("template.pdf")?;
    /// ```
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let inner = Document::load(path).map_err(|e| PdfError::OpenError(e.to_string()))?;
        Ok(Self::from_document(inner))
    }

    /// Open a PDF document from bytes
    pub fn open_from_bytes(data: &[u8]) -> Result<Self> {
        let inner = Document::load_mem(data).map_err(|e| PdfError::OpenError(e.to_string()))?;
        Ok(Self::from_document(inner))
    }

    fn from_document(inner: Document) -> Self {
        Self {
            inner,
            fonts: HashMap::new(),
            current_font: None,
            current_text_color: Color::default(),
            page_font_resources: HashMap::new(),
            next_font_resource: 1,
            page_content_buffer: HashMap::new(),
        }
    }

    /// Get the number of pages in the document
    pub fn page_count(&self) -> usize {
        self.inner.get_pages().len()
    }

    /// Get the size of a page in points (1-indexed)
    ///
    /// This is the visible (CropBox) size as displayed, so width and height
    /// swap on pages rotated by 90 or 270 degrees.
    pub fn page_size(&self, page: usize) -> Result<PageSize> {
        Ok(self.page_box(page)?.displayed_size())
    }

    /// Add a TrueType font to the document
    ///
    /// # Arguments
    /// * `name` - Font identifier (used in set_font)
    /// * `ttf_data` - TrueType font file bytes
    pub fn add_font(&mut self, name: &str, ttf_data: &[u8]) -> Result<()> {
        if name == HELVETICA || self.fonts.contains_key(name) {
            return Err(PdfError::FontAlreadyExists(name.to_string()));
        }

        let font_data = FontData::from_ttf(name, ttf_data)?;
        self.fonts.insert(name.to_string(), font_data);
        Ok(())
    }

    /// Select the font for subsequent text insertions
    ///
    /// `HELVETICA` selects the built-in font; any other name must have been
    /// registered with `add_font`.
    pub fn set_font(&mut self, name: &str) -> Result<()> {
        if name == HELVETICA {
            self.current_font = None;
            return Ok(());
        }
        if !self.fonts.contains_key(name) {
            return Err(PdfError::FontNotFound(name.to_string()));
        }
        self.current_font = Some(name.to_string());
        Ok(())
    }

    /// Name of the currently selected font
    pub fn current_font(&self) -> &str {
        self.current_font.as_deref().unwrap_or(HELVETICA)
    }

    /// Set the text color
    pub fn set_text_color(&mut self, color: Color) {
        self.current_text_color = color;
    }

    /// Width of `text` in points with the current font
    pub fn text_width(&self, text: &str, font_size: f32) -> Result<f64> {
        match &self.current_font {
            None => {
                let bytes = encode_win_ansi(text).map_err(|ch| PdfError::UnsupportedCharacter {
                    ch,
                    font: HELVETICA.to_string(),
                })?;
                let units: u32 = bytes.iter().map(|&b| u32::from(helvetica_width(b))).sum();
                Ok(units as f64 / 1000.0 * font_size as f64)
            }
            Some(name) => {
                let font = self
                    .fonts
                    .get(name)
                    .ok_or_else(|| PdfError::FontNotFound(name.clone()))?;
                Ok(font.text_width_points(text, font_size) as f64)
            }
        }
    }

    /// Insert text at a specific position
    ///
    /// # Arguments
    /// * `text` - Text to insert
    /// * `page` - Page number (1-indexed)
    /// * `x` - X coordinate of the baseline start in points
    /// * `y` - Y coordinate of the baseline in points (from top)
    /// * `font_size` - Font size in points
    pub fn insert_text(
        &mut self,
        text: &str,
        page: usize,
        x: f64,
        y: f64,
        font_size: f32,
    ) -> Result<()> {
        let page_count = self.page_count();
        if page == 0 || page > page_count {
            return Err(PdfError::InvalidPage(page, page_count));
        }
        if !font_size.is_finite() || font_size <= 0.0 {
            return Err(PdfError::InvalidFontSize(font_size));
        }
        if text.is_empty() {
            return Ok(());
        }

        // Encode first so an unsupported character leaves the document untouched
        let font_name = self.current_font().to_string();
        let text_hex = match &self.current_font {
            None => {
                let bytes = encode_win_ansi(text).map_err(|ch| PdfError::UnsupportedCharacter {
                    ch,
                    font: HELVETICA.to_string(),
                })?;
                hex_string(&bytes)
            }
            Some(name) => {
                let font = self
                    .fonts
                    .get_mut(name)
                    .ok_or_else(|| PdfError::FontNotFound(name.clone()))?;
                let hex = font.encode_text_hex(text)?;
                font.add_chars(text);
                hex
            }
        };

        // Convert from top-left origin of the displayed page to PDF user space
        let page_box = self.page_box(page)?;
        let (pdf_x, pdf_y) = page_box.to_user_space(x, y);

        let resource_name = self.get_or_create_font_ref(&font_name, page)?;
        let ctx = TextRenderContext {
            font_name: resource_name,
            font_size,
            color: self.current_text_color,
            rotation: page_box.rotation,
        };
        let operators = generate_text_operators(&text_hex, pdf_x, pdf_y, &ctx);
        self.buffer_content(page, &operators);

        tracing::trace!(page, x = pdf_x, y = pdf_y, font_size, font = %font_name, "buffered text");
        Ok(())
    }

    /// Save the document to a file
    pub fn save<P: AsRef<Path>>(&mut self, path: P) -> Result<()> {
        self.finalize()?;
        self.inner
            .save(path)
            .map_err(|e| PdfError::SaveError(e.to_string()))?;
        Ok(())
    }

    /// Save the document to bytes
    pub fn to_bytes(&mut self) -> Result<Vec<u8>> {
        self.finalize()?;
        let mut buffer = Vec::new();
        self.inner
            .save_to(&mut buffer)
            .map_err(|e| PdfError::SaveError(e.to_string()))?;
        Ok(buffer)
    }

    /// Write buffered content and font resources into the page objects
    fn finalize(&mut self) -> Result<()> {
        self.flush_content_buffers()?;
        let embedded = self.embed_fonts()?;
        self.finalize_page_font_resources(&embedded)
    }

    /// Create font objects for every font referenced by a page
    fn embed_fonts(&mut self) -> Result<HashMap<String, ObjectId>> {
        let mut font_names: Vec<String> = self
            .page_font_resources
            .values()
            .flat_map(|fonts| fonts.keys().cloned())
            .collect();
        font_names.sort();
        font_names.dedup();

        let mut embedded = HashMap::new();
        for font_name in font_names {
            let id = if font_name == HELVETICA {
                self.inner.add_object(helvetica_dictionary())
            } else {
                self.embed_font_object(&font_name)?
            };
            embedded.insert(font_name, id);
        }
        Ok(embedded)
    }

    /// Embed a single TrueType font and return its Type0 font object ID
    fn embed_font_object(&mut self, font_name: &str) -> Result<ObjectId> {
        let font_data = self
            .fonts
            .get(font_name)
            .ok_or_else(|| PdfError::FontNotFound(font_name.to_string()))?;
        let objects = font_data.to_pdf_objects()?;

        let font_file_id = self.inner.add_object(objects.font_file_stream);

        let mut font_descriptor = objects.font_descriptor;
        font_descriptor.set("FontFile2", Object::Reference(font_file_id));
        let font_descriptor_id = self.inner.add_object(font_descriptor);

        let mut cid_font = objects.cid_font;
        cid_font.set("FontDescriptor", Object::Reference(font_descriptor_id));
        let cid_font_id = self.inner.add_object(cid_font);

        let tounicode_id = self.inner.add_object(objects.tounicode_stream);

        let mut type0_font = objects.type0_font;
        type0_font.set(
            "DescendantFonts",
            Object::Array(vec![Object::Reference(cid_font_id)]),
        );
        type0_font.set("ToUnicode", Object::Reference(tounicode_id));

        Ok(self.inner.add_object(type0_font))
    }

    /// Get or create a font reference for a specific page
    ///
    /// Returns the resource name (e.g., "FF1") for use in content streams.
    /// Names already present in the page's font resources are skipped.
    fn get_or_create_font_ref(&mut self, font_name: &str, page: usize) -> Result<String> {
        if let Some(name) = self
            .page_font_resources
            .get(&page)
            .and_then(|fonts| fonts.get(font_name))
        {
            return Ok(name.clone());
        }

        let existing = self.existing_font_resource_names(page)?;
        let resource_name = loop {
            let candidate = format!("FF{}", self.next_font_resource);
            self.next_font_resource += 1;
            if !existing.iter().any(|name| name.as_slice() == candidate.as_bytes()) {
                break candidate;
            }
        };

        self.page_font_resources
            .entry(page)
            .or_default()
            .insert(font_name.to_string(), resource_name.clone());
        Ok(resource_name)
    }

    /// Font resource names the page already defines
    fn existing_font_resource_names(&self, page: usize) -> Result<Vec<Vec<u8>>> {
        let page_id = self.page_id(page)?;
        let names = self
            .page_resources(page_id)?
            .and_then(|resources| self.resolve_dict(&resources, b"Font"))
            .map(|fonts| fonts.iter().map(|(key, _)| key.clone()).collect())
            .unwrap_or_default();
        Ok(names)
    }

    /// Add the font references of every page to its Resources dictionary
    fn finalize_page_font_resources(&mut self, embedded: &HashMap<String, ObjectId>) -> Result<()> {
        let page_resources: Vec<(usize, Vec<(String, String)>)> = self
            .page_font_resources
            .iter()
            .map(|(&page, fonts)| {
                let font_list = fonts
                    .iter()
                    .map(|(font_name, resource_name)| (font_name.clone(), resource_name.clone()))
                    .collect();
                (page, font_list)
            })
            .collect();

        for (page, fonts) in page_resources {
            self.add_fonts_to_page_resources(page, &fonts, embedded)?;
        }
        self.page_font_resources.clear();
        Ok(())
    }

    /// Add multiple fonts to a page's Resources dictionary in a single operation
    ///
    /// Indirect and inherited resource dictionaries are copied onto the page
    /// so the existing entries survive.
    fn add_fonts_to_page_resources(
        &mut self,
        page: usize,
        fonts: &[(String, String)],
        embedded: &HashMap<String, ObjectId>,
    ) -> Result<()> {
        let page_id = self.page_id(page)?;
        let mut resources_dict = self.page_resources(page_id)?.unwrap_or_default();
        let mut font_dict = self
            .resolve_dict(&resources_dict, b"Font")
            .unwrap_or_default();

        for (font_name, resource_name) in fonts {
            let font_ref = embedded
                .get(font_name)
                .ok_or_else(|| PdfError::FontNotFound(font_name.clone()))?;
            font_dict.set(resource_name.as_bytes(), Object::Reference(*font_ref));
        }
        resources_dict.set("Font", Object::Dictionary(font_dict));

        let mut page_dict = self
            .inner
            .get_object(page_id)?
            .as_dict()
            .map_err(|_| PdfError::SaveError("Page object is not a dictionary".to_string()))?
            .clone();
        page_dict.set("Resources", Object::Dictionary(resources_dict));
        self.inner.objects.insert(page_id, page_dict.into());

        Ok(())
    }

    /// Resources dictionary of a page, following references and parents
    fn page_resources(&self, page_id: ObjectId) -> Result<Option<Dictionary>> {
        let mut current_id = page_id;

        // Follow parent chain up to 10 levels
        for _ in 0..10 {
            let dict = self
                .inner
                .get_object(current_id)?
                .as_dict()
                .map_err(|_| PdfError::ParseError("Object is not a dictionary".to_string()))?;

            if let Some(resources) = self.resolve_dict(dict, b"Resources") {
                return Ok(Some(resources));
            }

            match dict.get(b"Parent") {
                Ok(Object::Reference(parent_id)) => current_id = *parent_id,
                _ => break,
            }
        }
        Ok(None)
    }

    /// Look up a dictionary-valued key, resolving one level of reference
    fn resolve_dict(&self, dict: &Dictionary, key: &[u8]) -> Option<Dictionary> {
        match dict.get(key).ok()? {
            Object::Dictionary(d) => Some(d.clone()),
            Object::Reference(id) => self
                .inner
                .get_object(*id)
                .ok()
                .and_then(|obj| obj.as_dict().ok())
                .cloned(),
            _ => None,
        }
    }

    fn page_id(&self, page: usize) -> Result<ObjectId> {
        let pages = self.inner.get_pages();
        pages
            .get(&(page as u32))
            .copied()
            .ok_or(PdfError::InvalidPage(page, pages.len()))
    }

    /// Visible box of a page and its rotation
    ///
    /// CropBox wins over MediaBox wherever either sits in the parent chain.
    /// Pages with neither fall back to A4.
    fn page_box(&self, page: usize) -> Result<PageBox> {
        let page_id = self.page_id(page)?;
        let rectangle = match self.inherited_entry(page_id, b"CropBox")? {
            Some(crop_box) => Some(crop_box),
            None => self.inherited_entry(page_id, b"MediaBox")?,
        };
        let rectangle = match rectangle {
            Some(Object::Array(values)) => values,
            Some(_) => return Err(PdfError::ParseError("MediaBox is not an array".to_string())),
            None => vec![
                Object::Integer(0),
                Object::Integer(0),
                Object::Real(595.28),
                Object::Real(841.89),
            ],
        };
        let rotation = match self.inherited_entry(page_id, b"Rotate")? {
            Some(Object::Integer(degrees)) => degrees.rem_euclid(360) as u16,
            _ => 0,
        };
        Self::page_box_from_array(&rectangle, rotation)
    }

    /// Look up an inheritable page attribute, following the parent chain and
    /// resolving one level of reference
    fn inherited_entry(&self, page_id: ObjectId, key: &[u8]) -> Result<Option<Object>> {
        let mut current_id = page_id;

        for _ in 0..10 {
            let dict = self
                .inner
                .get_object(current_id)?
                .as_dict()
                .map_err(|_| PdfError::ParseError("Object is not a dictionary".to_string()))?;

            if let Ok(value) = dict.get(key) {
                let value = match value {
                    Object::Reference(ref_id) => self.inner.get_object(*ref_id)?.clone(),
                    other => other.clone(),
                };
                return Ok(Some(value));
            }

            match dict.get(b"Parent") {
                Ok(Object::Reference(parent_id)) => current_id = *parent_id,
                _ => break,
            }
        }
        Ok(None)
    }

    fn page_box_from_array(media_box: &[Object], rotation: u16) -> Result<PageBox> {
        if media_box.len() < 4 {
            return Err(PdfError::ParseError("Invalid MediaBox format".to_string()));
        }
        let number = |obj: &Object| -> Result<f64> {
            obj.as_f32()
                .map(|v| v as f64)
                .ok()
                .or_else(|| obj.as_i64().ok().map(|v| v as f64))
                .ok_or_else(|| PdfError::ParseError("Invalid MediaBox value".to_string()))
        };
        let (x1, y1, x2, y2) = (
            number(&media_box[0])?,
            number(&media_box[1])?,
            number(&media_box[2])?,
            number(&media_box[3])?,
        );
        Ok(PageBox {
            llx: x1.min(x2),
            lly: y1.min(y2),
            urx: x1.max(x2),
            ury: y1.max(y2),
            rotation: match rotation {
                90 | 180 | 270 => rotation,
                _ => 0,
            },
        })
    }

    /// Buffer content operators for a page (written at save time)
    fn buffer_content(&mut self, page: usize, content: &[u8]) {
        self.page_content_buffer
            .entry(page)
            .or_default()
            .extend_from_slice(content);
    }

    /// Flush all buffered content to page streams
    fn flush_content_buffers(&mut self) -> Result<()> {
        let buffers: Vec<(usize, Vec<u8>)> = self.page_content_buffer.drain().collect();
        for (page, content) in buffers {
            if !content.is_empty() {
                self.append_to_content_stream(page, &content)?;
            }
        }
        Ok(())
    }

    /// Append content to a page's content stream
    ///
    /// The existing content is wrapped in `q`/`Q` so its graphics state does
    /// not affect the stamped text.
    fn append_to_content_stream(&mut self, page: usize, content: &[u8]) -> Result<()> {
        let page_id = self.page_id(page)?;

        let (existing_content, mut page_dict) = {
            let page_dict = self
                .inner
                .get_object(page_id)?
                .as_dict()
                .map_err(|_| PdfError::ParseError("Page object is not a dictionary".to_string()))?;

            let existing_content = match page_dict.get(b"Contents") {
                Ok(Object::Stream(stream)) => stream_content(stream),
                Ok(Object::Reference(ref_id)) => match self.inner.get_object(*ref_id) {
                    Ok(Object::Stream(stream)) => stream_content(stream),
                    Ok(Object::Array(arr)) => self.concat_streams(arr),
                    _ => Vec::new(),
                },
                Ok(Object::Array(arr)) => self.concat_streams(arr),
                _ => Vec::new(),
            };

            (existing_content, page_dict.clone())
        };

        let mut new_content = Vec::with_capacity(existing_content.len() + content.len() + 8);
        if !existing_content.is_empty() {
            new_content.extend_from_slice(b"q\n");
            new_content.extend_from_slice(&existing_content);
            new_content.extend_from_slice(b"\nQ\n");
        }
        new_content.extend_from_slice(content);

        let stream_id = self
            .inner
            .add_object(Stream::new(Dictionary::new(), new_content));
        page_dict.set("Contents", Object::Reference(stream_id));
        self.inner.objects.insert(page_id, page_dict.into());

        Ok(())
    }

    /// Concatenate an array of content streams
    fn concat_streams(&self, arr: &[Object]) -> Vec<u8> {
        let mut combined = Vec::new();
        for obj in arr {
            let data = match obj {
                Object::Reference(ref_id) => match self.inner.get_object(*ref_id) {
                    Ok(Object::Stream(stream)) => stream_content(stream),
                    _ => continue,
                },
                Object::Stream(stream) => stream_content(stream),
                _ => continue,
            };
            combined.extend_from_slice(&data);
            combined.push(b'\n');
        }
        combined
    }
}

fn stream_content(stream: &Stream) -> Vec<u8> {
    stream
        .decompressed_content()
        .unwrap_or_else(|_| stream.content.clone())
}
