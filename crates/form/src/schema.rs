//! Field layout types

use crate::{FormError, Result};
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeSet;

/// Ratio between a field's height and the font size shown in it
pub const FONT_SIZE_RATIO: f64 = 0.6;

/// Smallest font size derived from a field's height
pub const MIN_FONT_SIZE: f64 = 8.0;

/// Font size for a field of the given height: `max(8, floor(height * 0.6))`
pub fn derived_font_size(height: f64) -> f64 {
    (height * FONT_SIZE_RATIO).floor().max(MIN_FONT_SIZE)
}

/// Axis-aligned rectangle, origin at the top-left
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    /// Multiply every component by `factor`
    pub fn scaled(self, factor: f64) -> Self {
        Self {
            x: self.x * factor,
            y: self.y * factor,
            width: self.width * factor,
            height: self.height * factor,
        }
    }
}

/// A named input field placed over the template page
///
/// Coordinates are canvas pixels of the rendered page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Field {
    /// Field name, matched against a CSV column
    pub name: String,

    /// Left edge
    #[serde(deserialize_with = "number_or_string")]
    pub x: f64,

    /// Top edge
    #[serde(deserialize_with = "number_or_string")]
    pub y: f64,

    #[serde(deserialize_with = "number_or_string")]
    pub width: f64,

    #[serde(deserialize_with = "number_or_string")]
    pub height: f64,

    /// Display font size; zero or missing means "derive from height"
    #[serde(default, deserialize_with = "number_or_string")]
    pub font_size: f64,
}

impl Field {
    /// Create a field with a font size derived from its height
    pub fn new(name: &str, x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            name: name.to_string(),
            x,
            y,
            width,
            height,
            font_size: derived_font_size(height),
        }
    }

    /// Field rectangle in canvas pixels
    pub fn rect(&self) -> Rect {
        Rect {
            x: self.x,
            y: self.y,
            width: self.width,
            height: self.height,
        }
    }

    /// Check the name and that every number is finite and non-negative
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(FormError::InvalidField {
                name: self.name.clone(),
                reason: "name is empty".to_string(),
            });
        }

        for (label, value) in [
            ("x", self.x),
            ("y", self.y),
            ("width", self.width),
            ("height", self.height),
            ("font_size", self.font_size),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(FormError::InvalidField {
                    name: self.name.clone(),
                    reason: format!("{label} must be a non-negative number, got {value}"),
                });
            }
        }
        Ok(())
    }

    /// Give a field without a font size one derived from its height
    fn fill_font_size(&mut self) {
        if self.font_size == 0.0 {
            self.font_size = derived_font_size(self.height);
        }
    }
}

/// Older layout files store numbers as strings
fn number_or_string<'de, D>(deserializer: D) -> std::result::Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum NumberOrString {
        Number(f64),
        Text(String),
    }

    match NumberOrString::deserialize(deserializer)? {
        NumberOrString::Number(n) => Ok(n),
        NumberOrString::Text(s) => s
            .trim()
            .parse()
            .map_err(|_| serde::de::Error::custom(format!("invalid number: {s:?}"))),
    }
}

/// Ordered list of fields with unique names
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Layout {
    fields: Vec<Field>,
}

impl Layout {
    /// Create an empty layout
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a layout, validating every field
    ///
    /// Fields without a font size get one derived from their height.
    pub fn from_fields(fields: Vec<Field>) -> Result<Self> {
        let mut layout = Self::new();
        for field in fields {
            layout.push(field)?;
        }
        Ok(layout)
    }

    /// Append a field
    ///
    /// A zero font size is replaced by one derived from the height, the same
    /// way a layout file without `font_size` is read.
    pub fn push(&mut self, mut field: Field) -> Result<()> {
        field.validate()?;
        field.fill_font_size();
        if self.get(&field.name).is_some() {
            return Err(FormError::DuplicateField(field.name));
        }
        self.fields.push(field);
        Ok(())
    }

    /// Remove a field by name, returning it
    pub fn remove(&mut self, name: &str) -> Result<Field> {
        let index = self
            .fields
            .iter()
            .position(|f| f.name == name)
            .ok_or_else(|| FormError::FieldNotFound(name.to_string()))?;
        Ok(self.fields.remove(index))
    }

    /// Find a field by name
    pub fn get(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub(crate) fn get_mut(&mut self, name: &str) -> Option<&mut Field> {
        self.fields.iter_mut().find(|f| f.name == name)
    }

    /// Replace the geometry of an existing field
    ///
    /// The update is validated before it is applied.
    pub fn update<F>(&mut self, name: &str, edit: F) -> Result<&Field>
    where
        F: FnOnce(&mut Field),
    {
        let field = self
            .get_mut(name)
            .ok_or_else(|| FormError::FieldNotFound(name.to_string()))?;
        let mut updated = field.clone();
        edit(&mut updated);
        updated.name = field.name.clone();
        updated.validate()?;
        updated.fill_font_size();
        *field = updated;
        Ok(&*field)
    }

    /// Fields in placement order
    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    /// Field names in placement order
    pub fn names(&self) -> Vec<&str> {
        self.fields.iter().map(|f| f.name.as_str()).collect()
    }

    /// Set of field names
    pub fn name_set(&self) -> BTreeSet<&str> {
        self.fields.iter().map(|f| f.name.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_derived_font_size() {
        assert_eq!(derived_font_size(25.0), 15.0);
        assert_eq!(derived_font_size(26.0), 15.0);
        assert_eq!(derived_font_size(40.0), 24.0);
        // Clamped to the minimum
        assert_eq!(derived_font_size(10.0), 8.0);
        assert_eq!(derived_font_size(0.0), 8.0);
    }

    #[test]
    fn test_rect_scaled() {
        let rect = Field::new("a", 200.0, 100.0, 150.0, 25.0).rect().scaled(0.5);
        assert_eq!(
            rect,
            Rect {
                x: 100.0,
                y: 50.0,
                width: 75.0,
                height: 12.5
            }
        );
    }

    #[test]
    fn test_push_rejects_duplicate() {
        let mut layout = Layout::new();
        layout.push(Field::new("name", 0.0, 0.0, 150.0, 25.0)).unwrap();

        let result = layout.push(Field::new("name", 10.0, 10.0, 150.0, 25.0));
        assert!(matches!(result, Err(FormError::DuplicateField(n)) if n == "name"));
        assert_eq!(layout.len(), 1);
    }

    #[test]
    fn test_push_rejects_invalid() {
        let mut layout = Layout::new();

        let blank = Field::new("  ", 0.0, 0.0, 150.0, 25.0);
        assert!(matches!(layout.push(blank), Err(FormError::InvalidField { .. })));

        let negative = Field::new("x", -1.0, 0.0, 150.0, 25.0);
        assert!(matches!(layout.push(negative), Err(FormError::InvalidField { .. })));

        let infinite = Field::new("y", 0.0, f64::INFINITY, 150.0, 25.0);
        assert!(matches!(layout.push(infinite), Err(FormError::InvalidField { .. })));

        assert!(layout.is_empty());
    }

    #[test]
    fn test_from_fields_derives_missing_font_size() {
        let mut field = Field::new("a", 0.0, 0.0, 150.0, 40.0);
        field.font_size = 0.0;

        let layout = Layout::from_fields(vec![field]).unwrap();
        assert_eq!(layout.get("a").unwrap().font_size, 24.0);
    }

    #[test]
    fn test_push_and_update_derive_zero_font_size() {
        let mut field = Field::new("a", 0.0, 0.0, 150.0, 25.0);
        field.font_size = 0.0;

        let mut layout = Layout::new();
        layout.push(field).unwrap();
        assert_eq!(layout.get("a").unwrap().font_size, 15.0);

        let updated = layout
            .update("a", |f| {
                f.height = 50.0;
                f.font_size = 0.0;
            })
            .unwrap();
        assert_eq!(updated.font_size, 30.0);
    }

    #[test]
    fn test_remove_and_names() {
        let mut layout = Layout::from_fields(vec![
            Field::new("first", 0.0, 0.0, 150.0, 25.0),
            Field::new("second", 0.0, 30.0, 150.0, 25.0),
            Field::new("third", 0.0, 60.0, 150.0, 25.0),
        ])
        .unwrap();

        let removed = layout.remove("second").unwrap();
        assert_eq!(removed.name, "second");
        assert_eq!(layout.names(), vec!["first", "third"]);
        assert!(matches!(layout.remove("second"), Err(FormError::FieldNotFound(_))));
    }

    #[test]
    fn test_update_validates() {
        let mut layout = Layout::from_fields(vec![Field::new("a", 5.0, 5.0, 150.0, 25.0)]).unwrap();

        let field = layout.update("a", |f| f.width = 200.0).unwrap();
        assert_eq!(field.width, 200.0);

        let result = layout.update("a", |f| f.x = -3.0);
        assert!(result.is_err());
        assert_eq!(layout.get("a").unwrap().x, 5.0);

        // Renaming through update is not possible
        layout.update("a", |f| f.name = "b".to_string()).unwrap();
        assert!(layout.get("a").is_some());
    }

    #[test]
    fn test_field_deserialize_numeric_strings() {
        let json = r#"{"name": "n", "x": 10.5, "y": "20", "width": "150", "height": " 25.0 "}"#;
        let field: Field = serde_json::from_str(json).unwrap();

        assert_eq!(field.y, 20.0);
        assert_eq!(field.width, 150.0);
        assert_eq!(field.height, 25.0);
        assert_eq!(field.font_size, 0.0);
    }

    #[test]
    fn test_field_deserialize_bad_number() {
        let json = r#"{"name": "n", "x": "ten", "y": 0, "width": 1, "height": 1}"#;
        let result: std::result::Result<Field, _> = serde_json::from_str(json);
        assert!(result.is_err());
    }
}
