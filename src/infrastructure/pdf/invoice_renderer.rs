use chrono::NaiveDate;
use lopdf::content::Content;
use lopdf::{Document, Object, Stream, dictionary};

use super::canvas::{Canvas, PAGE_HEIGHT, PAGE_WIDTH, Rect, Rgb, TextStyle, WHITE};
use super::metrics::{Font, fit_text};
use crate::domain::invoice::{
  DocumentRenderer, InvoiceError, RenderableInvoice, RenderableLine, format_short_date,
};

const HEADER_BAND: Rgb = Rgb(0x2c, 0x3e, 0x50);
const TAGLINE: Rgb = Rgb(0xbd, 0xc3, 0xc7);
const ACCENT: Rgb = Rgb(0xe7, 0x4c, 0x3c);
const PANEL_FILL: Rgb = Rgb(0xf8, 0xf9, 0xfa);
const PANEL_BORDER: Rgb = Rgb(0xbd, 0xc3, 0xc7);
const MUTED: Rgb = Rgb(0x7f, 0x8c, 0x8d);
const TABLE_HEADER: Rgb = Rgb(0x34, 0x49, 0x5e);
const INK: Rgb = HEADER_BAND;

const TABLE_X: f32 = 50.0;
const TABLE_WIDTH: f32 = 500.0;
const TABLE_HEADER_HEIGHT: f32 = 25.0;
const ROW_HEIGHT: f32 = 20.0;
const FIRST_TABLE_TOP: f32 = 250.0;
const CONTINUATION_TOP: f32 = 50.0;
const CONTENT_BOTTOM: f32 = PAGE_HEIGHT - 50.0;
const DESCRIPTION_WIDTH: f32 = 220.0;
const SUMMARY_GAP: f32 = 20.0;
const SUMMARY_HEIGHT: f32 = 58.0;
const SUMMARY_LABEL_X: f32 = 350.0;
const SUMMARY_VALUE_RIGHT: f32 = 540.0;

const COLUMNS: [(&str, f32); 4] = [
  ("DESCRIPTION", TABLE_X + 10.0),
  ("QTY", 300.0),
  ("RATE", 370.0),
  ("AMOUNT", 460.0),
];

/// Fixed texts printed on every document.
#[derive(Debug, Clone)]
pub struct Branding {
  pub title: String,
  pub tagline: String,
  pub tax_label: String,
}

impl Default for Branding {
  fn default() -> Self {
    Self {
      title: "SMART INVOICE".to_string(),
      tagline: "Professional Billing Solutions".to_string(),
      tax_label: "Tax".to_string(),
    }
  }
}

/// Renders invoices as single-font-family A4 PDF documents.
///
/// Output depends only on the invoice and the `today` date: no creation
/// timestamps, document IDs or info dictionary are written.
pub struct PdfInvoiceRenderer {
  branding: Branding,
}

impl PdfInvoiceRenderer {
  pub fn new(branding: Branding) -> Self {
    Self { branding }
  }

  fn layout(
    &self,
    invoice: &RenderableInvoice,
    today: NaiveDate,
  ) -> Result<Vec<Canvas>, InvoiceError> {
    let mut pages = Vec::new();
    let mut canvas = Canvas::new();

    self.draw_header(&mut canvas, invoice);
    draw_parties(&mut canvas, invoice, today);

    let mut y = draw_table_header(&mut canvas, FIRST_TABLE_TOP);
    for (index, line) in invoice.lines.iter().enumerate() {
      if y + ROW_HEIGHT > CONTENT_BOTTOM {
        pages.push(std::mem::take(&mut canvas));
        y = draw_table_header(&mut canvas, CONTINUATION_TOP);
      }
      draw_row(&mut canvas, index, line, y)?;
      y += ROW_HEIGHT;
    }

    let mut summary_top = y + SUMMARY_GAP;
    if summary_top + SUMMARY_HEIGHT > CONTENT_BOTTOM {
      pages.push(std::mem::take(&mut canvas));
      summary_top = CONTINUATION_TOP;
    }
    self.draw_summary(&mut canvas, invoice, summary_top)?;
    pages.push(canvas);

    Ok(pages)
  }

  fn draw_header(&self, canvas: &mut Canvas, invoice: &RenderableInvoice) {
    canvas.fill_rect(Rect::new(0.0, 0.0, PAGE_WIDTH, 80.0), HEADER_BAND);
    canvas.text(
      TextStyle::new(Font::Bold, 24.0, WHITE),
      50.0,
      30.0,
      &self.branding.title,
    );
    canvas.text(
      TextStyle::new(Font::Regular, 10.0, TAGLINE),
      50.0,
      60.0,
      &self.branding.tagline,
    );

    let badge = Rect::new(PAGE_WIDTH - 150.0 - 50.0, 25.0, 150.0, 40.0);
    canvas.fill_rect(badge, ACCENT);
    canvas.text(
      TextStyle::new(Font::Bold, 16.0, WHITE),
      badge.x + 10.0,
      35.0,
      "INVOICE",
    );
    let number = fit_text(
      &format!("#{}", invoice.invoice_number),
      Font::Regular,
      10.0,
      badge.width - 20.0,
    );
    canvas.text(
      TextStyle::new(Font::Regular, 10.0, WHITE),
      badge.x + 10.0,
      55.0,
      &number,
    );
  }

  fn draw_summary(
    &self,
    canvas: &mut Canvas,
    invoice: &RenderableInvoice,
    top: f32,
  ) -> Result<(), InvoiceError> {
    let totals = invoice.resolved_totals()?;
    let tax_label = format!("{} ({}%):", self.branding.tax_label, invoice.tax_rate);
    let rows = [
      ("Subtotal:", totals.subtotal, false),
      (tax_label.as_str(), totals.tax_amount, false),
      ("Total:", totals.total_amount, true),
    ];

    for (index, (label, value, is_total)) in rows.iter().enumerate() {
      let y = top + index as f32 * 20.0;
      let style = if *is_total {
        TextStyle::new(Font::Bold, 12.0, ACCENT)
      } else {
        TextStyle::new(Font::Regular, 10.0, INK)
      };
      canvas.text(style, SUMMARY_LABEL_X, y, label);
      canvas.text_right(style, SUMMARY_VALUE_RIGHT, y, &value.to_string());

      if *is_total {
        canvas.stroke_rect(Rect::new(445.0, y - 2.0, 100.0, 18.0), ACCENT);
      }
    }
    Ok(())
  }
}

fn draw_parties(canvas: &mut Canvas, invoice: &RenderableInvoice, today: NaiveDate) {
  let top = 120.0;
  canvas.text(TextStyle::new(Font::Bold, 14.0, INK), 50.0, top, "BILL TO:");

  let client_box = Rect::new(45.0, top + 25.0, 250.0, 90.0);
  canvas.fill_and_stroke_rect(client_box, PANEL_FILL, PANEL_BORDER);
  let max_width = client_box.width - 30.0;
  let client = &invoice.client;
  canvas.text(
    TextStyle::new(Font::Bold, 12.0, INK),
    60.0,
    top + 40.0,
    &fit_text(&client.name, Font::Bold, 12.0, max_width),
  );

  let contact = TextStyle::new(Font::Bold, 10.0, INK);
  if let Some(phone) = &client.phone {
    let text = fit_text(&format!("Phone: {}", phone), contact.font, contact.size, max_width);
    canvas.text(contact, 60.0, top + 60.0, &text);
  }
  if let Some(email) = &client.email {
    let text = fit_text(&format!("Email: {}", email), contact.font, contact.size, max_width);
    canvas.text(contact, 60.0, top + 75.0, &text);
  }

  canvas.fill_and_stroke_rect(
    Rect::new(320.0, top + 25.0, 200.0, 90.0),
    PANEL_FILL,
    PANEL_BORDER,
  );
  let facts = [
    ("Invoice Date:", format_short_date(invoice.invoice_date)),
    ("Due Date:", format_short_date(invoice.due_date)),
    ("Status:", invoice.display_status(today).label().to_string()),
  ];
  for (index, (label, value)) in facts.iter().enumerate() {
    let y = top + 40.0 + index as f32 * 20.0;
    canvas.text(TextStyle::new(Font::Regular, 10.0, MUTED), 335.0, y, label);
    canvas.text(TextStyle::new(Font::Bold, 10.0, INK), 400.0, y, value);
  }
}

/// Draws the column header band at `top` and returns where the first row goes.
fn draw_table_header(canvas: &mut Canvas, top: f32) -> f32 {
  canvas.fill_rect(
    Rect::new(TABLE_X, top, TABLE_WIDTH, TABLE_HEADER_HEIGHT),
    TABLE_HEADER,
  );
  let style = TextStyle::new(Font::Bold, 11.0, WHITE);
  for (title, x) in COLUMNS {
    canvas.text(style, x, top + 8.0, title);
  }
  top + TABLE_HEADER_HEIGHT
}

fn draw_row(
  canvas: &mut Canvas,
  index: usize,
  line: &RenderableLine,
  y: f32,
) -> Result<(), InvoiceError> {
  if index % 2 == 0 {
    canvas.fill_rect(Rect::new(TABLE_X, y, TABLE_WIDTH, ROW_HEIGHT), PANEL_FILL);
  }

  let style = TextStyle::new(Font::Regular, 10.0, INK);
  let description = fit_text(line.label(), style.font, style.size, DESCRIPTION_WIDTH);
  canvas.text(style, COLUMNS[0].1, y + 5.0, &description);
  canvas.text(style, COLUMNS[1].1, y + 5.0, &line.quantity.normalize().to_string());
  canvas.text(style, COLUMNS[2].1, y + 5.0, &line.rate.to_string());
  canvas.text(
    style,
    COLUMNS[3].1,
    y + 5.0,
    &line.effective_amount()?.to_string(),
  );
  Ok(())
}

fn font_dictionary(font: Font) -> lopdf::Dictionary {
  dictionary! {
    "Type" => "Font",
    "Subtype" => "Type1",
    "BaseFont" => font.base_font(),
    "Encoding" => "WinAnsiEncoding",
  }
}

fn build_document(pages: Vec<Canvas>) -> Result<Vec<u8>, lopdf::Error> {
  let mut doc = Document::with_version("1.4");
  let pages_id = doc.new_object_id();
  let regular_id = doc.add_object(font_dictionary(Font::Regular));
  let bold_id = doc.add_object(font_dictionary(Font::Bold));
  let resources_id = doc.add_object(dictionary! {
    "Font" => dictionary! {
      Font::Regular.resource_name() => regular_id,
      Font::Bold.resource_name() => bold_id,
    },
  });

  let mut kids = Vec::with_capacity(pages.len());
  for canvas in pages {
    let content = Content {
      operations: canvas.into_operations(),
    };
    let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode()?));
    let page_id = doc.add_object(dictionary! {
      "Type" => "Page",
      "Parent" => pages_id,
      "Contents" => content_id,
    });
    kids.push(Object::Reference(page_id));
  }

  let count = kids.len() as i64;
  doc.objects.insert(
    pages_id,
    Object::Dictionary(dictionary! {
      "Type" => "Pages",
      "Kids" => kids,
      "Count" => count,
      "Resources" => resources_id,
      "MediaBox" => vec![
        Object::Integer(0),
        Object::Integer(0),
        Object::Integer(PAGE_WIDTH as i64),
        Object::Integer(PAGE_HEIGHT as i64),
      ],
    }),
  );
  let catalog_id = doc.add_object(dictionary! {
    "Type" => "Catalog",
    "Pages" => pages_id,
  });
  doc.trailer.set("Root", catalog_id);

  let mut bytes = Vec::new();
  doc.save_to(&mut bytes)?;
  Ok(bytes)
}

impl DocumentRenderer for PdfInvoiceRenderer {
  fn render(&self, invoice: &RenderableInvoice, today: NaiveDate) -> Result<Vec<u8>, InvoiceError> {
    let pages = self.layout(invoice, today)?;
    let page_count = pages.len();
    let bytes = build_document(pages).map_err(|e| InvoiceError::Rendering(e.to_string()))?;

    tracing::debug!(
      invoice_number = %invoice.invoice_number,
      pages = page_count,
      bytes = bytes.len(),
      "Rendered invoice document"
    );
    Ok(bytes)
  }

  fn content_type(&self) -> &'static str {
    "application/pdf"
  }

  fn file_extension(&self) -> &'static str {
    "pdf"
  }
}
