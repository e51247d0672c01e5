//! Minimal PDF writer for table documents
//!
//! Emits PDF 1.4 on landscape A4 with the standard Helvetica fonts (no
//! embedding), one grid table per page, the header row repeated on every page
//! and a page footer. Text is encoded as WinAnsi; characters it cannot
//! represent print as `?`.

use std::io::Write;

use chrono::Local;

use crate::application::TableDocument;
use crate::infrastructure::traits::DocumentRenderer;

const PAGE_WIDTH: f32 = 842.0;
const PAGE_HEIGHT: f32 = 595.0;
const MARGIN: f32 = 40.0;
const TITLE_SIZE: f32 = 18.0;
const BODY_SIZE: f32 = 10.0;
const ROW_HEIGHT: f32 = 20.0;
const TITLE_GAP: f32 = 50.0;
const TABLE_GAP: f32 = 75.0;
const BOTTOM: f32 = 50.0;

// Fixed object numbers; pages start after these.
const CATALOG: usize = 1;
const PAGES: usize = 2;
const FONT_REGULAR: usize = 3;
const FONT_BOLD: usize = 4;
const INFO: usize = 5;
const FIRST_PAGE: usize = 6;

/// Renders [`TableDocument`]s as PDF.
#[derive(Debug, Clone)]
pub struct PdfRenderer {
    /// Relative column widths; ignored when the column count differs.
    column_weights: Vec<f32>,
}

impl Default for PdfRenderer {
    fn default() -> Self {
        // Item, Brand, Available, Used, Bought
        Self::with_column_weights(vec![25.0, 22.0, 9.0, 22.0, 22.0])
    }
}

impl PdfRenderer {
    pub fn with_column_weights(column_weights: Vec<f32>) -> Self {
        Self { column_weights }
    }

    /// Data rows that fit on one page below the repeated header row.
    pub fn rows_per_page() -> usize {
        let table_top = PAGE_HEIGHT - TABLE_GAP;
        let total = ((table_top - BOTTOM) / ROW_HEIGHT).floor() as usize;
        total.saturating_sub(1).max(1)
    }

    fn column_widths(&self, columns: usize, table_width: f32) -> Vec<f32> {
        let weights: Vec<f32> = if self.column_weights.len() == columns {
            self.column_weights.clone()
        } else {
            vec![1.0; columns]
        };
        let total: f32 = weights.iter().sum();
        weights.iter().map(|w| table_width * w / total).collect()
    }

    fn page_content(
        &self,
        document: &TableDocument,
        rows: &[Vec<String>],
        page: usize,
        page_count: usize,
    ) -> Vec<u8> {
        let table_width = PAGE_WIDTH - 2.0 * MARGIN;
        let widths = self.column_widths(document.headers.len(), table_width);
        let mut out = Vec::new();

        text(
            &mut out,
            "F2",
            TITLE_SIZE,
            MARGIN,
            PAGE_HEIGHT - TITLE_GAP,
            &document.title,
        );

        let mut top = PAGE_HEIGHT - TABLE_GAP;
        // header background
        let _ = writeln!(
            out,
            "0.85 g {} {} {} {} re f 0 g",
            num(MARGIN),
            num(top - ROW_HEIGHT),
            num(table_width),
            num(ROW_HEIGHT)
        );
        table_row(&mut out, &widths, top, "F2", &document.headers);
        top -= ROW_HEIGHT;

        for row in rows {
            table_row(&mut out, &widths, top, "F1", row);
            top -= ROW_HEIGHT;
        }

        let footer = format!("Page {} of {}", page + 1, page_count);
        text(&mut out, "F1", 8.0, MARGIN, BOTTOM - 20.0, &footer);
        out
    }
}

impl DocumentRenderer for PdfRenderer {
    fn render(&self, document: &TableDocument) -> Result<Vec<u8>, String> {
        if document.headers.is_empty() {
            return Err("table has no columns".to_string());
        }
        if let Some(row) = document
            .rows
            .iter()
            .find(|r| r.len() != document.headers.len())
        {
            return Err(format!(
                "row has {} cells, expected {}",
                row.len(),
                document.headers.len()
            ));
        }

        let per_page = Self::rows_per_page();
        let chunks: Vec<&[Vec<String>]> = if document.rows.is_empty() {
            vec![&document.rows[..0]]
        } else {
            document.rows.chunks(per_page).collect()
        };
        let page_count = chunks.len();

        let mut objects: Vec<Vec<u8>> = vec![Vec::new(); FIRST_PAGE - 1 + 2 * page_count];
        let page_ids: Vec<usize> = (0..page_count).map(|i| FIRST_PAGE + 2 * i).collect();

        objects[CATALOG - 1] = format!("<< /Type /Catalog /Pages {PAGES} 0 R >>").into_bytes();
        let kids = page_ids
            .iter()
            .map(|id| format!("{id} 0 R"))
            .collect::<Vec<_>>()
            .join(" ");
        objects[PAGES - 1] =
            format!("<< /Type /Pages /Kids [{kids}] /Count {page_count} >>").into_bytes();
        objects[FONT_REGULAR - 1] = font_object("Helvetica");
        objects[FONT_BOLD - 1] = font_object("Helvetica-Bold");

        let mut info = b"<< /Title ".to_vec();
        pdf_string(&mut info, &document.title);
        info.extend_from_slice(b" /Producer ");
        pdf_string(&mut info, concat!("groc ", env!("CARGO_PKG_VERSION")));
        let _ = write!(
            info,
            " /CreationDate (D:{}) >>",
            Local::now().format("%Y%m%d%H%M%S")
        );
        objects[INFO - 1] = info;

        for (i, (rows, page_id)) in chunks.iter().zip(&page_ids).enumerate() {
            let content_id = page_id + 1;
            objects[page_id - 1] = format!(
                "<< /Type /Page /Parent {PAGES} 0 R /MediaBox [0 0 {} {}] \
                 /Resources << /Font << /F1 {FONT_REGULAR} 0 R /F2 {FONT_BOLD} 0 R >> >> \
                 /Contents {content_id} 0 R >>",
                num(PAGE_WIDTH),
                num(PAGE_HEIGHT)
            )
            .into_bytes();

            let content = self.page_content(document, rows, i, page_count);
            let mut stream = format!("<< /Length {} >>\nstream\n", content.len()).into_bytes();
            stream.extend_from_slice(&content);
            stream.extend_from_slice(b"\nendstream");
            objects[content_id - 1] = stream;
        }

        Ok(assemble(&objects))
    }

    fn extension(&self) -> &'static str {
        "pdf"
    }
}

/// Serialize numbered objects, the xref table and the trailer.
fn assemble(objects: &[Vec<u8>]) -> Vec<u8> {
    let mut out = b"%PDF-1.4\n%\xE2\xE3\xCF\xD3\n".to_vec();
    let mut offsets = Vec::with_capacity(objects.len());

    for (i, body) in objects.iter().enumerate() {
        offsets.push(out.len());
        let _ = write!(out, "{} 0 obj\n", i + 1);
        out.extend_from_slice(body);
        out.extend_from_slice(b"\nendobj\n");
    }

    let xref = out.len();
    let _ = write!(out, "xref\n0 {}\n0000000000 65535 f \n", objects.len() + 1);
    for offset in offsets {
        let _ = write!(out, "{offset:010} 00000 n \n");
    }
    let _ = write!(
        out,
        "trailer\n<< /Size {} /Root {CATALOG} 0 R /Info {INFO} 0 R >>\nstartxref\n{xref}\n%%EOF\n",
        objects.len() + 1
    );
    out
}

fn font_object(base: &str) -> Vec<u8> {
    format!("<< /Type /Font /Subtype /Type1 /BaseFont /{base} /Encoding /WinAnsiEncoding >>")
        .into_bytes()
}

fn table_row(out: &mut Vec<u8>, widths: &[f32], top: f32, font: &str, cells: &[String]) {
    let mut x = MARGIN;
    for (cell, width) in cells.iter().zip(widths) {
        let _ = writeln!(
            out,
            "0.5 w {} {} {} {} re S",
            num(x),
            num(top - ROW_HEIGHT),
            num(*width),
            num(ROW_HEIGHT)
        );
        let fitted = fit(cell, *width - 8.0, BODY_SIZE);
        text(out, font, BODY_SIZE, x + 4.0, top - ROW_HEIGHT + 6.0, &fitted);
        x += width;
    }
}

fn text(out: &mut Vec<u8>, font: &str, size: f32, x: f32, y: f32, s: &str) {
    if s.is_empty() {
        return;
    }
    let _ = write!(out, "BT /{font} {} Tf {} {} Td ", num(size), num(x), num(y));
    pdf_string(out, s);
    out.extend_from_slice(b" Tj ET\n");
}

/// Truncate to roughly fit `width` points, assuming half-em average glyphs.
fn fit(s: &str, width: f32, size: f32) -> String {
    let max = (width / (size * 0.5)).floor().max(4.0) as usize;
    if s.chars().count() <= max {
        return s.to_string();
    }
    let mut cut: String = s.chars().take(max - 3).collect();
    cut.push_str("...");
    cut
}

/// Append `s` as a PDF literal string in WinAnsi encoding.
fn pdf_string(out: &mut Vec<u8>, s: &str) {
    out.push(b'(');
    for c in s.chars() {
        match c {
            '(' | ')' | '\\' => {
                out.push(b'\\');
                out.push(c as u8);
            }
            ' '..='~' => out.push(c as u8),
            '\u{A0}'..='\u{FF}' => out.push(c as u32 as u8),
            _ => out.push(win_ansi_extra(c).unwrap_or(b'?')),
        }
    }
    out.push(b')');
}

/// WinAnsi code for characters in the 0x80..=0x9F block (cp1252).
fn win_ansi_extra(c: char) -> Option<u8> {
    let code = match c {
        '€' => 0x80,
        '‚' => 0x82,
        'ƒ' => 0x83,
        '„' => 0x84,
        '…' => 0x85,
        '†' => 0x86,
        '‡' => 0x87,
        'ˆ' => 0x88,
        '‰' => 0x89,
        'Š' => 0x8A,
        '‹' => 0x8B,
        'Œ' => 0x8C,
        'Ž' => 0x8E,
        '\u{2018}' => 0x91,
        '\u{2019}' => 0x92,
        '\u{201C}' => 0x93,
        '\u{201D}' => 0x94,
        '•' => 0x95,
        '\u{2013}' => 0x96,
        '\u{2014}' => 0x97,
        '˜' => 0x98,
        '™' => 0x99,
        'š' => 0x9A,
        '›' => 0x9B,
        'œ' => 0x9C,
        'ž' => 0x9E,
        'Ÿ' => 0x9F,
        _ => return None,
    };
    Some(code)
}

fn num(v: f32) -> String {
    let s = format!("{v:.2}");
    s.trim_end_matches('0').trim_end_matches('.').to_string()
}
