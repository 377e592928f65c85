//! Glyph advance widths for the two standard Type1 fonts the renderer uses,
//! in thousandths of the font size. Only printable ASCII is tabulated; other
//! WinAnsi bytes fall back to an average glyph width.

use encoding_rs::WINDOWS_1252;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Font {
  Regular,
  Bold,
}

impl Font {
  /// Resource name used inside content streams.
  pub fn resource_name(&self) -> &'static str {
    match self {
      Font::Regular => "F1",
      Font::Bold => "F2",
    }
  }

  pub fn base_font(&self) -> &'static str {
    match self {
      Font::Regular => "Helvetica",
      Font::Bold => "Helvetica-Bold",
    }
  }

  fn widths(&self) -> &'static [u16; 95] {
    match self {
      Font::Regular => &HELVETICA_WIDTHS,
      Font::Bold => &HELVETICA_BOLD_WIDTHS,
    }
  }
}

const FALLBACK_WIDTH: u16 = 556;

#[rustfmt::skip]
const HELVETICA_WIDTHS: [u16; 95] = [
  // space ! " # $ % & ' ( ) * + , - . /
  278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278,
  // 0-9
  556, 556, 556, 556, 556, 556, 556, 556, 556, 556,
  // : ; < = > ? @
  278, 278, 584, 584, 584, 556, 1015,
  // A-Z
  667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833,
  722, 778, 667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611,
  // [ \ ] ^ _ `
  278, 278, 278, 469, 556, 333,
  // a-z
  556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833,
  556, 556, 556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500,
  // { | } ~
  334, 260, 334, 584,
];

#[rustfmt::skip]
const HELVETICA_BOLD_WIDTHS: [u16; 95] = [
  278, 333, 474, 556, 556, 889, 722, 238, 333, 333, 389, 584, 278, 333, 278, 278,
  556, 556, 556, 556, 556, 556, 556, 556, 556, 556,
  333, 333, 584, 584, 584, 611, 975,
  722, 722, 722, 722, 667, 611, 778, 722, 278, 556, 722, 611, 833,
  722, 778, 667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611,
  333, 278, 333, 584, 556, 333,
  556, 611, 556, 611, 556, 333, 611, 611, 278, 278, 556, 278, 889,
  611, 611, 611, 611, 389, 556, 333, 611, 556, 778, 556, 556, 500,
  389, 280, 389, 584,
];

/// Encodes text for a WinAnsiEncoding font. Characters outside the code page become `?`.
pub fn encode_win_ansi(text: &str) -> Vec<u8> {
  let mut bytes = Vec::with_capacity(text.len());
  let mut buf = [0u8; 4];
  for ch in text.chars() {
    if ch.is_ascii() {
      bytes.push(ch as u8);
      continue;
    }
    let (encoded, _, had_errors) = WINDOWS_1252.encode(ch.encode_utf8(&mut buf));
    if had_errors || encoded.len() != 1 {
      bytes.push(b'?');
    } else {
      bytes.extend_from_slice(&encoded);
    }
  }
  bytes
}

/// Width of `text` in points when set in `font` at `size`.
pub fn text_width(text: &str, font: Font, size: f32) -> f32 {
  let widths = font.widths();
  let units: u32 = encode_win_ansi(text)
    .into_iter()
    .map(|byte| match byte {
      32..=126 => widths[(byte - 32) as usize] as u32,
      _ => FALLBACK_WIDTH as u32,
    })
    .sum();
  units as f32 * size / 1000.0
}

/// Shortens `text` with a trailing "..." so that it fits into `max_width`.
pub fn fit_text(text: &str, font: Font, size: f32, max_width: f32) -> String {
  if text_width(text, font, size) <= max_width {
    return text.to_string();
  }

  let mut fitted = String::new();
  for ch in text.chars() {
    let candidate = format!("{}{}...", fitted, ch);
    if text_width(&candidate, font, size) > max_width {
      break;
    }
    fitted.push(ch);
  }
  format!("{}...", fitted.trim_end())
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_currency_width() {
    // "$" and digits are 556, "." is 278
    let width = text_width("$236.00", Font::Regular, 10.0);
    assert!((width - (6.0 * 5.56 + 2.78)).abs() < 0.001);
  }

  #[test]
  fn test_bold_is_wider_for_lowercase() {
    assert!(text_width("invoice", Font::Bold, 12.0) > text_width("invoice", Font::Regular, 12.0));
  }

  #[test]
  fn test_encode_win_ansi() {
    assert_eq!(encode_win_ansi("abc"), b"abc".to_vec());
    assert_eq!(encode_win_ansi("café"), vec![b'c', b'a', b'f', 0xE9]);
    assert_eq!(encode_win_ansi("€"), vec![0x80]);
    assert_eq!(encode_win_ansi("日"), vec![b'?']);
  }

  #[test]
  fn test_fit_text_truncates_with_ellipsis() {
    let long = "Quarterly infrastructure maintenance and on-call support for the platform";
    let fitted = fit_text(long, Font::Regular, 10.0, 220.0);
    assert!(fitted.ends_with("..."));
    assert!(text_width(&fitted, Font::Regular, 10.0) <= 220.0);
    assert!(long.starts_with(fitted.trim_end_matches("...")));

    assert_eq!(fit_text("Design", Font::Regular, 10.0, 220.0), "Design");
  }
}
