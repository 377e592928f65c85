//! Drawing primitives over a lopdf content stream.
//!
//! Coordinates are given top-down from the upper left corner of the page and
//! converted to PDF user space (bottom-up) when the operations are emitted.

use lopdf::content::Operation;
use lopdf::{Object, StringFormat};

use super::metrics::{Font, encode_win_ansi, text_width};

pub const PAGE_WIDTH: f32 = 595.0;
pub const PAGE_HEIGHT: f32 = 842.0;

/// Distance from the top of a text line to its baseline, as a fraction of the font size.
const ASCENT: f32 = 0.718;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
  fn operands(&self) -> Vec<Object> {
    [self.0, self.1, self.2]
      .iter()
      .map(|c| real(*c as f32 / 255.0))
      .collect()
  }
}

pub const WHITE: Rgb = Rgb(0xff, 0xff, 0xff);

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
  pub x: f32,
  pub y: f32,
  pub width: f32,
  pub height: f32,
}

impl Rect {
  pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
    Self {
      x,
      y,
      width,
      height,
    }
  }
}

#[derive(Debug, Clone, Copy)]
pub struct TextStyle {
  pub font: Font,
  pub size: f32,
  pub color: Rgb,
}

impl TextStyle {
  pub const fn new(font: Font, size: f32, color: Rgb) -> Self {
    Self { font, size, color }
  }
}

/// Rounds to two decimals so that equal layouts always print equal numbers.
fn real(value: f32) -> Object {
  Object::Real((value * 100.0).round() / 100.0)
}

#[derive(Debug, Default)]
pub struct Canvas {
  operations: Vec<Operation>,
}

impl Canvas {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn into_operations(self) -> Vec<Operation> {
    self.operations
  }

  fn push(&mut self, operator: &str, operands: Vec<Object>) {
    self.operations.push(Operation::new(operator, operands));
  }

  fn rect_path(&mut self, rect: Rect) {
    self.push(
      "re",
      vec![
        real(rect.x),
        real(PAGE_HEIGHT - rect.y - rect.height),
        real(rect.width),
        real(rect.height),
      ],
    );
  }

  pub fn fill_rect(&mut self, rect: Rect, fill: Rgb) {
    self.push("rg", fill.operands());
    self.rect_path(rect);
    self.push("f", vec![]);
  }

  pub fn stroke_rect(&mut self, rect: Rect, stroke: Rgb) {
    self.push("RG", stroke.operands());
    self.push("w", vec![real(1.0)]);
    self.rect_path(rect);
    self.push("S", vec![]);
  }

  pub fn fill_and_stroke_rect(&mut self, rect: Rect, fill: Rgb, stroke: Rgb) {
    self.push("rg", fill.operands());
    self.push("RG", stroke.operands());
    self.push("w", vec![real(1.0)]);
    self.rect_path(rect);
    self.push("B", vec![]);
  }

  /// Draws `text` with the top of the line at `y`.
  pub fn text(&mut self, style: TextStyle, x: f32, y: f32, text: &str) {
    let baseline = PAGE_HEIGHT - y - style.size * ASCENT;
    self.push("BT", vec![]);
    self.push(
      "Tf",
      vec![
        Object::Name(style.font.resource_name().as_bytes().to_vec()),
        real(style.size),
      ],
    );
    self.push("rg", style.color.operands());
    self.push("Td", vec![real(x), real(baseline)]);
    self.push(
      "Tj",
      vec![Object::String(
        encode_win_ansi(text),
        StringFormat::Hexadecimal,
      )],
    );
    self.push("ET", vec![]);
  }

  /// Draws `text` so that it ends at `right`.
  pub fn text_right(&mut self, style: TextStyle, right: f32, y: f32, text: &str) {
    let width = text_width(text, style.font, style.size);
    self.text(style, right - width, y, text);
  }
}
