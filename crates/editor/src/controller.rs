//! Placement controller

use crate::{Point, Result};
use form::{
    derived_font_size, fields_path_for, load_layout, save_layout, template_path_for,
    write_csv_template, Field, Layout, Rect,
};
use std::path::{Path, PathBuf};

/// Size of a newly placed field in canvas pixels
pub const DEFAULT_WIDTH: f64 = 150.0;
pub const DEFAULT_HEIGHT: f64 = 25.0;

/// Font size of a newly placed field
pub const DEFAULT_FONT_SIZE: f64 = 10.0;

/// Smallest size a resize drag can produce
pub const MIN_WIDTH: f64 = 100.0;
pub const MIN_HEIGHT: f64 = 25.0;

/// Width of the strip along a field's right edge that starts a width drag
pub const WIDTH_HANDLE: f64 = 18.0;

/// Height of the strip along a field's bottom edge that starts a height drag
pub const HEIGHT_HANDLE: f64 = 4.0;

/// What a drag changes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragKind {
    Move,
    Width,
    Height,
}

#[derive(Debug, Clone)]
struct Drag {
    name: String,
    kind: DragKind,
    start: Point,
    initial: Rect,
}

/// Files written by [`Editor::save`]
#[derive(Debug, Clone, PartialEq)]
pub struct SavedFiles {
    pub fields: PathBuf,
    pub template: PathBuf,
}

/// Field placement state for one template
///
/// Clicks are in canvas pixels. Drags use window-root pointer positions, so
/// only the difference from the drag start matters.
#[derive(Debug, Default)]
pub struct Editor {
    layout: Layout,
    adding: bool,
    drag: Option<Drag>,
}

impl Editor {
    /// Start with no fields
    pub fn new() -> Self {
        Self::default()
    }

    /// Continue editing an existing layout
    pub fn from_layout(layout: Layout) -> Self {
        Self {
            layout,
            ..Self::default()
        }
    }

    /// Continue editing a saved layout file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        Ok(Self::from_layout(load_layout(path)?))
    }

    /// Open the layout saved next to a PDF, or start empty if there is none
    pub fn for_pdf<P: AsRef<Path>>(pdf_path: P) -> Result<Self> {
        let fields_path = fields_path_for(pdf_path);
        if fields_path.exists() {
            Self::load(fields_path)
        } else {
            Ok(Self::new())
        }
    }

    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    pub fn into_layout(self) -> Layout {
        self.layout
    }

    /// Whether the next click places a field
    pub fn is_adding(&self) -> bool {
        self.adding
    }

    /// Turn add mode on or off, returning the new state
    pub fn toggle_add_mode(&mut self) -> bool {
        self.adding = !self.adding;
        tracing::debug!(adding = self.adding, "toggled add mode");
        self.adding
    }

    /// Place a field at a canvas point
    ///
    /// Does nothing outside add mode. Without a name (the prompt was
    /// cancelled) add mode stays on. A placed field has the default size and
    /// ends add mode. On error the layout and mode are unchanged.
    pub fn click(&mut self, point: Point, name: Option<&str>) -> Result<Option<&Field>> {
        if !self.adding {
            return Ok(None);
        }
        let name = match name {
            Some(name) if !name.trim().is_empty() => name,
            _ => return Ok(None),
        };

        self.layout.push(Field {
            name: name.to_string(),
            x: point.x,
            y: point.y,
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            font_size: DEFAULT_FONT_SIZE,
        })?;
        self.adding = false;
        tracing::debug!(name, x = point.x, y = point.y, "placed field");
        Ok(self.layout.fields().last())
    }

    /// Field and drag kind under a canvas point
    ///
    /// Later fields are on top. The right edge strip resizes the width, the
    /// bottom strip the height, the rest of the field moves it.
    pub fn hit_test(&self, point: Point) -> Option<(&str, DragKind)> {
        self.layout.fields().iter().rev().find_map(|field| {
            let inside = point.x >= field.x
                && point.x <= field.x + field.width
                && point.y >= field.y
                && point.y <= field.y + field.height;
            if !inside {
                return None;
            }
            let kind = if point.x >= field.x + field.width - WIDTH_HANDLE {
                DragKind::Width
            } else if point.y >= field.y + field.height - HEIGHT_HANDLE {
                DragKind::Height
            } else {
                DragKind::Move
            };
            Some((field.name.as_str(), kind))
        })
    }

    /// Start dragging a field
    pub fn begin_drag(&mut self, name: &str, kind: DragKind, pointer: Point) -> Result<()> {
        let field = self
            .layout
            .get(name)
            .ok_or_else(|| form::FormError::FieldNotFound(name.to_string()))?;
        self.drag = Some(Drag {
            name: name.to_string(),
            kind,
            start: pointer,
            initial: field.rect(),
        });
        Ok(())
    }

    /// Update the dragged field for a new pointer position
    ///
    /// Moves are clamped to the canvas origin and resizes to the minimum
    /// size. A height change also derives the font size. Returns `None`
    /// when no drag is active.
    pub fn drag_to(&mut self, pointer: Point) -> Result<Option<&Field>> {
        let Some(drag) = &self.drag else {
            return Ok(None);
        };
        let dx = pointer.x - drag.start.x;
        let dy = pointer.y - drag.start.y;
        let initial = drag.initial;
        let kind = drag.kind;

        let field = self.layout.update(&drag.name, |field| match kind {
            DragKind::Move => {
                field.x = (initial.x + dx).max(0.0);
                field.y = (initial.y + dy).max(0.0);
            }
            DragKind::Width => {
                field.width = (initial.width + dx).max(MIN_WIDTH);
            }
            DragKind::Height => {
                field.height = (initial.height + dy).max(MIN_HEIGHT);
                field.font_size = derived_font_size(field.height);
            }
        })?;
        Ok(Some(field))
    }

    /// Finish the active drag; returns whether one was active
    pub fn end_drag(&mut self) -> bool {
        match self.drag.take() {
            Some(drag) => {
                tracing::debug!(name = %drag.name, kind = ?drag.kind, "finished drag");
                true
            }
            None => false,
        }
    }

    /// Delete a field
    pub fn remove(&mut self, name: &str) -> Result<Field> {
        let field = self.layout.remove(name)?;
        if self.drag.as_ref().is_some_and(|drag| drag.name == name) {
            self.drag = None;
        }
        Ok(field)
    }

    /// Write `<pdf>_fields.json` and `<pdf>_template.csv`
    pub fn save<P: AsRef<Path>>(&self, pdf_path: P) -> Result<SavedFiles> {
        let saved = SavedFiles {
            fields: fields_path_for(pdf_path.as_ref()),
            template: template_path_for(pdf_path.as_ref()),
        };
        save_layout(&saved.fields, &self.layout)?;
        write_csv_template(&saved.template, &self.layout)?;
        tracing::info!(
            fields = %saved.fields.display(),
            template = %saved.template.display(),
            "saved field layout"
        );
        Ok(saved)
    }
}
