//! XLSX writer

use std::fs::File;
use std::io::{Seek, Write};
use std::path::Path;

use crate::cell_ref;
use crate::error::{XlsxError, XlsxResult};
use crate::MAX_SHEET_NAME_LEN;
use sodgen_core::{CellValue, Sheet, TabularDocument};

const STYLES_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<styleSheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main">
    <numFmts count="2"><numFmt numFmtId="164" formatCode="yyyy-mm-dd"/><numFmt numFmtId="165" formatCode="yyyy-mm-dd hh:mm:ss"/></numFmts>
    <fonts count="1"><font><sz val="11"/><name val="Calibri"/></font></fonts>
    <fills count="2"><fill><patternFill patternType="none"/></fill><fill><patternFill patternType="gray125"/></fill></fills>
    <borders count="1"><border><left/><right/><top/><bottom/><diagonal/></border></borders>
    <cellStyleXfs count="1"><xf numFmtId="0" fontId="0" fillId="0" borderId="0"/></cellStyleXfs>
    <cellXfs count="3"><xf numFmtId="0" fontId="0" fillId="0" borderId="0" xfId="0"/><xf numFmtId="164" fontId="0" fillId="0" borderId="0" xfId="0" applyNumberFormat="1"/><xf numFmtId="165" fontId="0" fillId="0" borderId="0" xfId="0" applyNumberFormat="1"/></cellXfs>
</styleSheet>"#;

/// `cellXfs` index of the date format
const DATE_STYLE: u32 = 1;
/// `cellXfs` index of the date-time format
const DATE_TIME_STYLE: u32 = 2;

/// XLSX file writer
///
/// Each sheet is written as a header row of column names followed by its
/// data rows. Empty values produce no cell element.
pub struct XlsxWriter;

impl XlsxWriter {
    /// Write a document to a file path
    pub fn write_file<P: AsRef<Path>>(document: &TabularDocument, path: P) -> XlsxResult<()> {
        // Validate before creating the file so a bad document leaves nothing behind
        Self::validate_sheet_names(document)?;
        let file = File::create(path)?;
        Self::write(document, file)
    }

    /// Write a document to a writer
    pub fn write<W: Write + Seek>(document: &TabularDocument, writer: W) -> XlsxResult<()> {
        Self::validate_sheet_names(document)?;

        let mut zip = zip::ZipWriter::new(writer);

        Self::write_content_types(&mut zip, document)?;
        Self::write_root_rels(&mut zip)?;
        Self::write_workbook_xml(&mut zip, document)?;
        Self::write_workbook_rels(&mut zip, document)?;
        Self::write_part(&mut zip, "xl/styles.xml", STYLES_XML)?;

        for (i, sheet) in document.sheets().enumerate() {
            let xml = Self::worksheet_xml(sheet);
            Self::write_part(&mut zip, &format!("xl/worksheets/sheet{}.xml", i + 1), &xml)?;
            tracing::trace!(
                sheet = sheet.name(),
                rows = sheet.row_count(),
                "wrote worksheet"
            );
        }

        zip.finish()?;
        Ok(())
    }

    /// Check every sheet name against workbook naming rules
    fn validate_sheet_names(document: &TabularDocument) -> XlsxResult<()> {
        const INVALID_CHARS: &[char] = &[':', '\\', '/', '?', '*', '[', ']'];

        let mut seen: Vec<String> = Vec::with_capacity(document.sheet_count());
        for name in document.sheet_names() {
            let invalid = |reason: String| XlsxError::InvalidSheetName {
                name: name.to_string(),
                reason,
            };

            if name.chars().count() > MAX_SHEET_NAME_LEN {
                return Err(invalid(format!(
                    "longer than {} characters",
                    MAX_SHEET_NAME_LEN
                )));
            }
            if let Some(c) = name.chars().find(|c| INVALID_CHARS.contains(c)) {
                return Err(invalid(format!("contains '{}'", c)));
            }

            // Workbooks compare sheet names case-insensitively
            let lower = name.to_lowercase();
            if seen.contains(&lower) {
                return Err(invalid("duplicates another sheet name".into()));
            }
            seen.push(lower);
        }
        Ok(())
    }

    fn write_part<W: Write + Seek>(
        zip: &mut zip::ZipWriter<W>,
        name: &str,
        content: &str,
    ) -> XlsxResult<()> {
        let options = zip::write::SimpleFileOptions::default();
        zip.start_file(name, options)?;
        zip.write_all(content.as_bytes())?;
        Ok(())
    }

    fn write_content_types<W: Write + Seek>(
        zip: &mut zip::ZipWriter<W>,
        document: &TabularDocument,
    ) -> XlsxResult<()> {
        let mut content = String::from(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types">
    <Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/>
    <Default Extension="xml" ContentType="application/xml"/>
    <Override PartName="/xl/workbook.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.sheet.main+xml"/>
    <Override PartName="/xl/styles.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.styles+xml"/>"#,
        );

        for i in 0..document.sheet_count() {
            content.push_str(&format!(
                r#"
    <Override PartName="/xl/worksheets/sheet{}.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.worksheet+xml"/>"#,
                i + 1
            ));
        }

        content.push_str("\n</Types>");
        Self::write_part(zip, "[Content_Types].xml", &content)
    }

    fn write_root_rels<W: Write + Seek>(zip: &mut zip::ZipWriter<W>) -> XlsxResult<()> {
        let content = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
    <Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="xl/workbook.xml"/>
</Relationships>"#;
        Self::write_part(zip, "_rels/.rels", content)
    }

    fn write_workbook_xml<W: Write + Seek>(
        zip: &mut zip::ZipWriter<W>,
        document: &TabularDocument,
    ) -> XlsxResult<()> {
        let mut content = String::from(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<workbook xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships">
    <sheets>"#,
        );

        for (i, name) in document.sheet_names().enumerate() {
            content.push_str(&format!(
                r#"
        <sheet name="{}" sheetId="{}" r:id="rId{}"/>"#,
                Self::escape_xml(name),
                i + 1,
                i + 1
            ));
        }

        content.push_str(
            r#"
    </sheets>
</workbook>"#,
        );

        Self::write_part(zip, "xl/workbook.xml", &content)
    }

    fn write_workbook_rels<W: Write + Seek>(
        zip: &mut zip::ZipWriter<W>,
        document: &TabularDocument,
    ) -> XlsxResult<()> {
        let mut content = String::from(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">"#,
        );

        for i in 0..document.sheet_count() {
            content.push_str(&format!(
                r#"
    <Relationship Id="rId{}" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet" Target="worksheets/sheet{}.xml"/>"#,
                i + 1,
                i + 1
            ));
        }

        // Styles relationship
        content.push_str(&format!(
            r#"
    <Relationship Id="rId{}" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/styles" Target="styles.xml"/>"#,
            document.sheet_count() + 1
        ));

        content.push_str("\n</Relationships>");
        Self::write_part(zip, "xl/_rels/workbook.xml.rels", &content)
    }

    fn worksheet_xml(sheet: &Sheet) -> String {
        let mut content = String::from(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<worksheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main">
    <sheetData>"#,
        );

        if sheet.column_count() > 0 {
            content.push_str("\n        <row r=\"1\">");
            for (col, name) in sheet.columns().iter().enumerate() {
                Self::push_string_cell(&mut content, 0, col as u32, name);
            }
            content.push_str("\n        </row>");
        }

        for (i, row) in sheet.rows().iter().enumerate() {
            let row_idx = i as u32 + 1;
            if row.is_blank() {
                continue;
            }

            content.push_str(&format!("\n        <row r=\"{}\">", row_idx + 1));
            for (col, value) in row.values().iter().enumerate() {
                let col = col as u32;
                match value {
                    _ if value.is_empty() => {}
                    CellValue::Number(n) => {
                        content.push_str(&format!(
                            "\n            <c r=\"{}\"><v>{}</v></c>",
                            cell_ref::format(row_idx, col),
                            n
                        ));
                    }
                    CellValue::DateTime(n) => {
                        let style = if n.fract() == 0.0 {
                            DATE_STYLE
                        } else {
                            DATE_TIME_STYLE
                        };
                        content.push_str(&format!(
                            "\n            <c r=\"{}\" s=\"{}\"><v>{}</v></c>",
                            cell_ref::format(row_idx, col),
                            style,
                            n
                        ));
                    }
                    CellValue::String(s) => {
                        Self::push_string_cell(&mut content, row_idx, col, s.as_str());
                    }
                    CellValue::Boolean(b) => {
                        content.push_str(&format!(
                            "\n            <c r=\"{}\" t=\"b\"><v>{}</v></c>",
                            cell_ref::format(row_idx, col),
                            u8::from(*b)
                        ));
                    }
                    CellValue::Empty => {}
                }
            }
            content.push_str("\n        </row>");
        }

        content.push_str("\n    </sheetData>\n</worksheet>");
        content
    }

    fn push_string_cell(content: &mut String, row: u32, col: u32, text: &str) {
        content.push_str(&format!(
            "\n            <c r=\"{}\" t=\"inlineStr\"><is><t xml:space=\"preserve\">{}</t></is></c>",
            cell_ref::format(row, col),
            Self::escape_xml(text)
        ));
    }

    fn escape_xml(s: &str) -> String {
        s.replace('&', "&amp;")
            .replace('<', "&lt;")
            .replace('>', "&gt;")
            .replace('"', "&quot;")
            .replace('\'', "&apos;")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_long_sheet_name() {
        let mut doc = TabularDocument::new();
        doc.add_sheet(Sheet::new("A".repeat(MAX_SHEET_NAME_LEN + 1)))
            .unwrap();

        let mut buf = Vec::new();
        let err = XlsxWriter::write(&doc, std::io::Cursor::new(&mut buf)).unwrap_err();
        assert!(matches!(err, XlsxError::InvalidSheetName { .. }));
    }

    #[test]
    fn test_rejects_case_insensitive_duplicates() {
        let mut doc = TabularDocument::new();
        doc.add_sheet(Sheet::new("Risks")).unwrap();
        doc.add_sheet(Sheet::new("RISKS")).unwrap();

        let mut buf = Vec::new();
        assert!(XlsxWriter::write(&doc, std::io::Cursor::new(&mut buf)).is_err());
    }

    #[test]
    fn test_worksheet_xml_escapes_and_skips_empties() {
        let mut sheet = Sheet::with_columns("S", ["A & B", "N"]);
        sheet.push_padded(vec![CellValue::string("<x>"), CellValue::Empty]);
        let xml = XlsxWriter::worksheet_xml(&sheet);

        assert!(xml.contains("A &amp; B"));
        assert!(xml.contains("&lt;x&gt;"));
        assert!(!xml.contains("r=\"B2\""));
    }
}
