//! XLSX reader

use std::collections::{BTreeMap, HashMap};
use std::fs::File;
use std::io::{BufReader, Read, Seek};
use std::path::Path;

use quick_xml::events::{BytesStart, Event};
use quick_xml::reader::Reader;

use crate::cell_ref;
use crate::error::{XlsxError, XlsxResult};
use sodgen_core::{CellValue, Sheet, TabularDocument};

/// Decode Excel's `_xHHHH_` escape sequences in strings.
///
/// `_x000d_` is a carriage return, `_x005f_` an escaped underscore. Anything
/// that is not exactly `_x` + four hex digits + `_` is kept as written.
fn decode_excel_escapes(s: &str) -> String {
    if !s.contains("_x") {
        return s.to_string();
    }

    let mut result = String::with_capacity(s.len());
    let mut rest = s;

    while let Some(pos) = rest.find("_x") {
        result.push_str(&rest[..pos]);
        let candidate = &rest[pos..];
        let decoded = candidate
            .get(2..6)
            .filter(|hex| hex.chars().all(|c| c.is_ascii_hexdigit()))
            .filter(|_| candidate.as_bytes().get(6) == Some(&b'_'))
            .and_then(|hex| u32::from_str_radix(hex, 16).ok())
            .and_then(char::from_u32);

        match decoded {
            Some(c) => {
                result.push(c);
                rest = &candidate[7..];
            }
            None => {
                result.push_str("_x");
                rest = &candidate[2..];
            }
        }
    }

    result.push_str(rest);
    result
}

/// Read an attribute value as an owned string
fn attr_value(e: &BytesStart, key: &[u8]) -> Option<String> {
    e.attributes()
        .flatten()
        .find(|a| a.key.as_ref() == key)
        .and_then(|a| a.unescape_value().ok().map(|s| s.to_string()))
}

/// Whether a number format displays a date or time
///
/// Built-in ids 14-22 and 45-47 are dates and times; custom format codes are
/// dates when they use a y/m/d/h/s token outside quoted text and brackets.
fn is_date_format(id: u32, custom: Option<&str>) -> bool {
    match custom {
        Some(code) => is_date_format_code(code),
        None => matches!(id, 14..=22 | 45..=47),
    }
}

fn is_date_format_code(code: &str) -> bool {
    let mut in_quotes = false;
    let mut in_brackets = false;
    let mut chars = code.chars();

    while let Some(c) = chars.next() {
        match c {
            '"' => in_quotes = !in_quotes,
            _ if in_quotes => {}
            '[' => in_brackets = true,
            ']' => in_brackets = false,
            _ if in_brackets => {}
            // Escape, padding and fill take the next character literally
            '\\' | '_' | '*' => {
                chars.next();
            }
            'y' | 'Y' | 'm' | 'M' | 'd' | 'D' | 'h' | 'H' | 's' | 'S' => return true,
            _ => {}
        }
    }

    false
}

/// Cell values of one worksheet, keyed by 0-based row
#[derive(Debug, Default)]
struct CellGrid {
    rows: BTreeMap<u32, Vec<CellValue>>,
}

impl CellGrid {
    fn set(&mut self, row: u32, col: u32, value: CellValue) {
        if value.is_empty() {
            return;
        }
        let cells = self.rows.entry(row).or_default();
        let col = col as usize;
        if cells.len() <= col {
            cells.resize(col + 1, CellValue::Empty);
        }
        cells[col] = value;
    }

    /// First populated row becomes the header; gaps below it stay as blank rows
    fn into_sheet(mut self, name: &str) -> Sheet {
        let Some((&first, _)) = self.rows.iter().next() else {
            return Sheet::new(name);
        };
        let header = self.rows.remove(&first).unwrap_or_default();
        let last = self.rows.keys().next_back().copied().unwrap_or(first);

        let records = (first + 1..=last)
            .map(|r| self.rows.remove(&r).unwrap_or_default())
            .collect();

        Sheet::from_records(name, header, records)
    }
}

/// XLSX file reader
pub struct XlsxReader;

impl XlsxReader {
    /// Read a document from a file path
    pub fn read_file<P: AsRef<Path>>(path: P) -> XlsxResult<TabularDocument> {
        let file = File::open(path)?;
        Self::read(file)
    }

    /// Read a document from a reader
    pub fn read<R: Read + Seek>(reader: R) -> XlsxResult<TabularDocument> {
        let mut archive = zip::ZipArchive::new(reader)?;

        // Verify this is an XLSX file
        if archive.by_name("[Content_Types].xml").is_err() {
            return Err(XlsxError::InvalidFormat(
                "Missing [Content_Types].xml".into(),
            ));
        }

        let shared_strings = Self::read_shared_strings(&mut archive)?;
        let date_styles = Self::read_date_styles(&mut archive)?;
        let sheet_info = Self::read_workbook_xml(&mut archive)?;
        let sheet_paths = Self::read_workbook_rels(&mut archive)?;

        let mut document = TabularDocument::new();

        for (name, r_id) in &sheet_info {
            let Some(path) = sheet_paths.get(r_id) else {
                tracing::debug!(sheet = %name, r_id = %r_id, "skipping sheet without worksheet part");
                continue;
            };
            let grid = Self::read_worksheet(&mut archive, path, &shared_strings, &date_styles)?;
            let sheet = grid.into_sheet(name);
            tracing::trace!(
                sheet = %name,
                columns = sheet.column_count(),
                rows = sheet.row_count(),
                "read worksheet"
            );
            document.add_sheet(sheet)?;
        }

        Ok(document)
    }

    /// Read the shared strings table
    fn read_shared_strings<R: Read + Seek>(
        archive: &mut zip::ZipArchive<R>,
    ) -> XlsxResult<Vec<String>> {
        let mut strings = Vec::new();

        let file = match archive.by_name("xl/sharedStrings.xml") {
            Ok(f) => f,
            Err(_) => return Ok(strings), // No shared strings is valid
        };

        let mut xml_reader = Reader::from_reader(BufReader::new(file));

        let mut buf = Vec::new();
        let mut current = String::new();
        let mut in_si = false;
        let mut in_t = false;
        let mut in_phonetic = false;

        loop {
            match xml_reader.read_event_into(&mut buf) {
                Ok(Event::Start(e)) => match e.name().as_ref() {
                    b"si" => {
                        in_si = true;
                        current.clear();
                    }
                    b"rPh" => in_phonetic = true,
                    b"t" if in_si && !in_phonetic => in_t = true,
                    _ => {}
                },
                Ok(Event::Empty(e)) if e.name().as_ref() == b"si" => {
                    strings.push(String::new());
                }
                Ok(Event::End(e)) => match e.name().as_ref() {
                    b"si" => {
                        strings.push(decode_excel_escapes(&current));
                        current.clear();
                        in_si = false;
                    }
                    b"rPh" => in_phonetic = false,
                    b"t" => in_t = false,
                    _ => {}
                },
                Ok(Event::Text(e)) if in_t => {
                    current.push_str(&e.unescape()?);
                }
                Ok(Event::Eof) => break,
                Err(e) => return Err(XlsxError::Xml(e)),
                _ => {}
            }
            buf.clear();
        }

        Ok(strings)
    }

    /// Read xl/styles.xml, flagging each cell format (`s` index) that shows
    /// numbers as dates
    fn read_date_styles<R: Read + Seek>(
        archive: &mut zip::ZipArchive<R>,
    ) -> XlsxResult<Vec<bool>> {
        let mut date_styles = Vec::new();

        let file = match archive.by_name("xl/styles.xml") {
            Ok(f) => f,
            Err(_) => return Ok(date_styles),
        };

        let mut xml_reader = Reader::from_reader(BufReader::new(file));
        xml_reader.trim_text(true);

        let mut buf = Vec::new();
        let mut custom_formats: HashMap<u32, String> = HashMap::new();
        let mut in_cell_xfs = false;

        loop {
            match xml_reader.read_event_into(&mut buf) {
                Ok(Event::Start(e)) if e.name().as_ref() == b"cellXfs" => in_cell_xfs = true,
                Ok(Event::End(e)) if e.name().as_ref() == b"cellXfs" => in_cell_xfs = false,
                Ok(Event::Empty(e)) | Ok(Event::Start(e)) => match e.name().as_ref() {
                    b"numFmt" => {
                        let id = attr_value(&e, b"numFmtId").and_then(|v| v.parse().ok());
                        if let (Some(id), Some(code)) = (id, attr_value(&e, b"formatCode")) {
                            custom_formats.insert(id, code);
                        }
                    }
                    b"xf" if in_cell_xfs => {
                        let id = attr_value(&e, b"numFmtId")
                            .and_then(|v| v.parse().ok())
                            .unwrap_or(0);
                        let custom = custom_formats.get(&id).map(String::as_str);
                        date_styles.push(is_date_format(id, custom));
                    }
                    _ => {}
                },
                Ok(Event::Eof) => break,
                Err(e) => return Err(XlsxError::Xml(e)),
                _ => {}
            }
            buf.clear();
        }

        Ok(date_styles)
    }

    /// Read workbook.xml to get sheet names and rIds, in workbook order
    fn read_workbook_xml<R: Read + Seek>(
        archive: &mut zip::ZipArchive<R>,
    ) -> XlsxResult<Vec<(String, String)>> {
        let file = archive
            .by_name("xl/workbook.xml")
            .map_err(|_| XlsxError::MissingPart("xl/workbook.xml".into()))?;

        let mut xml_reader = Reader::from_reader(BufReader::new(file));
        xml_reader.trim_text(true);

        let mut buf = Vec::new();
        let mut sheets = Vec::new();

        loop {
            match xml_reader.read_event_into(&mut buf) {
                Ok(Event::Empty(e)) | Ok(Event::Start(e)) if e.name().as_ref() == b"sheet" => {
                    if let (Some(name), Some(r_id)) =
                        (attr_value(&e, b"name"), attr_value(&e, b"r:id"))
                    {
                        sheets.push((name, r_id));
                    }
                }
                Ok(Event::Eof) => break,
                Err(e) => return Err(XlsxError::Xml(e)),
                _ => {}
            }
            buf.clear();
        }

        Ok(sheets)
    }

    /// Read workbook.xml.rels to get worksheet part paths
    fn read_workbook_rels<R: Read + Seek>(
        archive: &mut zip::ZipArchive<R>,
    ) -> XlsxResult<HashMap<String, String>> {
        let file = archive
            .by_name("xl/_rels/workbook.xml.rels")
            .map_err(|_| XlsxError::MissingPart("xl/_rels/workbook.xml.rels".into()))?;

        let mut xml_reader = Reader::from_reader(BufReader::new(file));
        xml_reader.trim_text(true);

        let mut buf = Vec::new();
        let mut rels = HashMap::new();

        loop {
            match xml_reader.read_event_into(&mut buf) {
                Ok(Event::Empty(e)) | Ok(Event::Start(e))
                    if e.name().as_ref() == b"Relationship" =>
                {
                    let id = attr_value(&e, b"Id");
                    let target = attr_value(&e, b"Target");
                    let rel_type = attr_value(&e, b"Type");

                    // Only include worksheet relationships
                    if let (Some(id), Some(target), Some(rel_type)) = (id, target, rel_type) {
                        if rel_type.ends_with("/worksheet") {
                            // Target is relative to xl/ unless absolute
                            let full_path = match target.strip_prefix('/') {
                                Some(absolute) => absolute.to_string(),
                                None => format!("xl/{}", target),
                            };
                            rels.insert(id, full_path);
                        }
                    }
                }
                Ok(Event::Eof) => break,
                Err(e) => return Err(XlsxError::Xml(e)),
                _ => {}
            }
            buf.clear();
        }

        Ok(rels)
    }

    /// Read the cell values of one worksheet part
    fn read_worksheet<R: Read + Seek>(
        archive: &mut zip::ZipArchive<R>,
        path: &str,
        shared_strings: &[String],
        date_styles: &[bool],
    ) -> XlsxResult<CellGrid> {
        let file = archive
            .by_name(path)
            .map_err(|_| XlsxError::MissingPart(path.to_string()))?;

        let mut xml_reader = Reader::from_reader(BufReader::new(file));

        let mut buf = Vec::new();
        let mut grid = CellGrid::default();

        // Position of the next cell when `r` attributes are omitted
        let mut row: u32 = 0;
        let mut next_row: u32 = 0;
        let mut next_col: u32 = 0;

        // Current cell state
        let mut cell_pos: Option<(u32, u32)> = None;
        let mut cell_type: Option<String> = None;
        let mut cell_is_date = false;
        let mut value = String::new();
        let mut in_value = false;
        let mut in_inline_str = false;
        let mut in_inline_text = false;
        let mut in_phonetic = false;

        loop {
            match xml_reader.read_event_into(&mut buf) {
                Ok(Event::Start(e)) => match e.name().as_ref() {
                    b"row" => {
                        row = Self::row_position(&e, next_row)?;
                        next_row = row + 1;
                        next_col = 0;
                    }
                    b"c" => {
                        let pos = Self::cell_position(&e, row, next_col)?;
                        next_col = pos.1 + 1;
                        cell_pos = Some(pos);
                        cell_type = attr_value(&e, b"t");
                        cell_is_date = attr_value(&e, b"s")
                            .and_then(|s| s.parse::<usize>().ok())
                            .and_then(|s| date_styles.get(s).copied())
                            .unwrap_or(false);
                        value.clear();
                    }
                    b"v" if cell_pos.is_some() => in_value = true,
                    b"is" if cell_pos.is_some() => in_inline_str = true,
                    b"rPh" if in_inline_str => in_phonetic = true,
                    b"t" if in_inline_str && !in_phonetic => in_inline_text = true,
                    _ => {}
                },
                Ok(Event::Empty(e)) => match e.name().as_ref() {
                    b"row" => {
                        row = Self::row_position(&e, next_row)?;
                        next_row = row + 1;
                        next_col = 0;
                    }
                    b"c" => {
                        // Style-only cell: takes a position, holds no value
                        let (_, col) = Self::cell_position(&e, row, next_col)?;
                        next_col = col + 1;
                    }
                    _ => {}
                },
                Ok(Event::Text(e)) if in_value || in_inline_text => {
                    value.push_str(&e.unescape()?);
                }
                Ok(Event::End(e)) => match e.name().as_ref() {
                    b"c" => {
                        if let Some((r, c)) = cell_pos.take() {
                            let parsed = Self::parse_cell_value(
                                cell_type.as_deref(),
                                &value,
                                shared_strings,
                                cell_is_date,
                            )?;
                            grid.set(r, c, parsed);
                        }
                    }
                    b"v" => in_value = false,
                    b"is" => in_inline_str = false,
                    b"rPh" => in_phonetic = false,
                    b"t" => in_inline_text = false,
                    _ => {}
                },
                Ok(Event::Eof) => break,
                Err(e) => return Err(XlsxError::Xml(e)),
                _ => {}
            }
            buf.clear();
        }

        Ok(grid)
    }

    fn row_position(e: &BytesStart, fallback: u32) -> XlsxResult<u32> {
        match attr_value(e, b"r") {
            Some(r) => r
                .parse::<u32>()
                .ok()
                .filter(|r| *r >= 1)
                .map(|r| r - 1)
                .ok_or_else(|| XlsxError::Parse(format!("Invalid row number: {}", r))),
            None => Ok(fallback),
        }
    }

    fn cell_position(e: &BytesStart, row: u32, next_col: u32) -> XlsxResult<(u32, u32)> {
        match attr_value(e, b"r") {
            Some(reference) => cell_ref::parse(&reference).ok_or_else(|| {
                XlsxError::Parse(format!("Invalid cell reference '{}'", reference))
            }),
            None => Ok((row, next_col)),
        }
    }

    /// Convert the raw text of a cell to a value according to its `t` attribute
    ///
    /// Formula cells are read through their cached value. Numbers in a
    /// date-formatted cell become dates.
    fn parse_cell_value(
        cell_type: Option<&str>,
        raw: &str,
        shared_strings: &[String],
        is_date: bool,
    ) -> XlsxResult<CellValue> {
        if raw.is_empty() && cell_type != Some("inlineStr") && cell_type != Some("str") {
            return Ok(CellValue::Empty);
        }

        let value = match cell_type {
            // Shared string
            Some("s") => {
                let idx: usize = raw.trim().parse().map_err(|_| {
                    XlsxError::Parse(format!("Invalid shared string index: {}", raw))
                })?;
                let s = shared_strings.get(idx).ok_or_else(|| {
                    XlsxError::Parse(format!("Shared string index {} out of bounds", idx))
                })?;
                CellValue::string(s)
            }

            // Boolean
            Some("b") => CellValue::Boolean(raw == "1" || raw.eq_ignore_ascii_case("true")),

            // Inline or formula string - decode Excel escape sequences
            Some("inlineStr") | Some("str") => CellValue::string(decode_excel_escapes(raw)),

            // Number (default type or explicit "n")
            None | Some("n") => match raw.trim().parse::<f64>() {
                Ok(n) if is_date => CellValue::date_time(n),
                Ok(n) => CellValue::number(n),
                Err(_) => CellValue::string(raw),
            },

            // ISO 8601 date
            Some("d") => CellValue::parse_iso_date(raw).unwrap_or_else(|| CellValue::string(raw)),

            // Error values ("#N/A") and unknown types keep their text
            Some(_) => CellValue::string(raw),
        };

        Ok(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use sodgen_core::row;
    use std::io::{Cursor, Write};

    #[test]
    fn test_decode_excel_escapes() {
        assert_eq!(decode_excel_escapes("hello_x000d_world"), "hello\rworld");
        assert_eq!(decode_excel_escapes("line1_x000D__x000A_line2"), "line1\r\nline2");
        assert_eq!(decode_excel_escapes("under_x005f_score"), "under_score");
        assert_eq!(decode_excel_escapes("plain text"), "plain text");
    }

    #[test]
    fn test_decode_excel_escapes_partial_sequence() {
        assert_eq!(decode_excel_escapes("_x00"), "_x00");
        assert_eq!(decode_excel_escapes("_x000d"), "_x000d");
        assert_eq!(decode_excel_escapes("a_xzzzz_b"), "a_xzzzz_b");
    }

    fn build_xlsx(sheet_xml: &str, shared_strings: Option<&str>, styles: Option<&str>) -> Vec<u8> {
        let mut buf = Vec::new();
        {
            let mut zip = zip::ZipWriter::new(Cursor::new(&mut buf));
            let options = zip::write::SimpleFileOptions::default();

            zip.start_file("[Content_Types].xml", options).unwrap();
            zip.write_all(br#"<?xml version="1.0"?><Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Default Extension="xml" ContentType="application/xml"/></Types>"#).unwrap();

            zip.start_file("xl/workbook.xml", options).unwrap();
            zip.write_all(br#"<?xml version="1.0"?><workbook xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships"><sheets><sheet name="Risks" sheetId="1" r:id="rId1"/><sheet name="Empty" sheetId="2" r:id="rId2"/></sheets></workbook>"#).unwrap();

            zip.start_file("xl/_rels/workbook.xml.rels", options).unwrap();
            zip.write_all(br#"<?xml version="1.0"?><Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet" Target="worksheets/sheet1.xml"/><Relationship Id="rId2" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet" Target="/xl/worksheets/sheet2.xml"/></Relationships>"#).unwrap();

            if let Some(sst) = shared_strings {
                zip.start_file("xl/sharedStrings.xml", options).unwrap();
                zip.write_all(sst.as_bytes()).unwrap();
            }

            if let Some(styles) = styles {
                zip.start_file("xl/styles.xml", options).unwrap();
                zip.write_all(styles.as_bytes()).unwrap();
            }

            zip.start_file("xl/worksheets/sheet1.xml", options).unwrap();
            zip.write_all(sheet_xml.as_bytes()).unwrap();

            zip.start_file("xl/worksheets/sheet2.xml", options).unwrap();
            zip.write_all(br#"<?xml version="1.0"?><worksheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main"><sheetData/></worksheet>"#).unwrap();

            zip.finish().unwrap();
        }
        buf
    }

    #[test]
    fn test_read_cell_types() {
        let sst = r#"<?xml version="1.0"?><sst xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main"><si><t>RISK NAME</t></si><si><t>RANK</t></si><si><r><t xml:space="preserve">Outage </t></r><r><t>(Apollo)</t></r></si></sst>"#;
        let sheet_xml = r#"<?xml version="1.0"?><worksheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main"><sheetData>
<row r="1"><c r="A1" t="s"><v>0</v></c><c r="B1" t="s"><v>1</v></c><c r="C1" t="inlineStr"><is><t>FLAG</t></is></c></row>
<row r="2"><c r="A2" t="s"><v>2</v></c><c r="B2"><v>1</v></c><c r="C2" t="b"><v>1</v></c></row>
<row r="4"><c r="A4" t="str"><f>A2</f><v>Outage (Apollo)</v></c><c r="B4" s="3"/><c r="C4" t="e"><v>#N/A</v></c></row>
</sheetData></worksheet>"#;

        let doc = XlsxReader::read(Cursor::new(build_xlsx(sheet_xml, Some(sst), None))).unwrap();
        assert_eq!(doc.sheet_names().collect::<Vec<_>>(), vec!["Risks", "Empty"]);

        let risks = doc.sheet(0).unwrap();
        assert_eq!(risks.columns(), &["RISK NAME", "RANK", "FLAG"]);
        assert_eq!(risks.row_count(), 3);
        assert_eq!(risks.row(0).unwrap(), &row!["Outage (Apollo)", 1, true]);
        assert!(risks.row(1).unwrap().is_blank());
        assert_eq!(
            risks.row(2).unwrap(),
            &row!["Outage (Apollo)", CellValue::Empty, "#N/A"]
        );

        let empty = doc.sheet(1).unwrap();
        assert_eq!(empty.column_count(), 0);
        assert!(!empty.has_data());
    }

    #[test]
    fn test_read_cells_without_references() {
        let sheet_xml = r#"<?xml version="1.0"?><worksheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main"><sheetData>
<row><c t="inlineStr"><is><t>PROJECT</t></is></c><c t="inlineStr"><is><t>RANK</t></is></c></row>
<row><c t="inlineStr"><is><t xml:space="preserve"> Apollo </t></is></c><c><v>2.5</v></c></row>
</sheetData></worksheet>"#;

        let doc = XlsxReader::read(Cursor::new(build_xlsx(sheet_xml, None, None))).unwrap();
        let sheet = doc.sheet(0).unwrap();
        assert_eq!(sheet.columns(), &["PROJECT", "RANK"]);
        assert_eq!(sheet.row(0).unwrap(), &row![" Apollo ", 2.5]);
    }

    #[test]
    fn test_read_date_styled_cells() {
        let styles = r#"<?xml version="1.0"?><styleSheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main">
<numFmts count="2"><numFmt numFmtId="164" formatCode="dd/mm/yyyy"/><numFmt numFmtId="165" formatCode="0.00&quot; d&quot;"/></numFmts>
<cellStyleXfs count="1"><xf numFmtId="14"/></cellStyleXfs>
<cellXfs count="4"><xf numFmtId="0"/><xf numFmtId="14"/><xf numFmtId="164"/><xf numFmtId="165"/></cellXfs>
</styleSheet>"#;
        let sheet_xml = r#"<?xml version="1.0"?><worksheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main"><sheetData>
<row r="1"><c r="A1" t="inlineStr"><is><t>NAME</t></is></c><c r="B1" t="inlineStr"><is><t>DUE</t></is></c><c r="C1" t="inlineStr"><is><t>DAYS</t></is></c></row>
<row r="2"><c r="A2" s="0"><v>45000</v></c><c r="B2" s="1"><v>45000</v></c><c r="C2" s="3"><v>2</v></c></row>
<row r="3"><c r="A3" t="d"><v>2023-03-15T12:00:00</v></c><c r="B3" s="2"><v>45000.5</v></c><c r="C3" s="9"><v>3</v></c></row>
</sheetData></worksheet>"#;

        let doc = XlsxReader::read(Cursor::new(build_xlsx(sheet_xml, None, Some(styles)))).unwrap();
        let sheet = doc.sheet(0).unwrap();
        assert_eq!(
            sheet.row(0).unwrap(),
            &row![45000, CellValue::DateTime(45000.0), 2]
        );
        assert_eq!(
            sheet.row(1).unwrap(),
            &row![
                CellValue::DateTime(45000.5),
                CellValue::DateTime(45000.5),
                3
            ]
        );
    }

    #[test]
    fn test_date_format_codes() {
        assert!(is_date_format(14, None));
        assert!(is_date_format(47, None));
        assert!(!is_date_format(0, None));
        assert!(!is_date_format(4, None));
        assert!(is_date_format(164, Some("yyyy-mm-dd")));
        assert!(is_date_format(164, Some("[h]:mm:ss")));
        assert!(!is_date_format(164, Some("[Red]#,##0.00")));
        assert!(!is_date_format(164, Some("0.0\"days\"")));
        assert!(!is_date_format(164, Some("General")));
        assert!(!is_date_format(164, Some("0.00E+00")));
    }

    #[test]
    fn test_reject_non_xlsx() {
        let err = XlsxReader::read(Cursor::new(b"not a zip file".to_vec())).unwrap_err();
        assert!(matches!(err, XlsxError::Zip(_)));
    }

    #[test]
    fn test_reject_zip_without_content_types() {
        let mut buf = Vec::new();
        {
            let mut zip = zip::ZipWriter::new(Cursor::new(&mut buf));
            zip.start_file("readme.txt", zip::write::SimpleFileOptions::default())
                .unwrap();
            zip.write_all(b"hello").unwrap();
            zip.finish().unwrap();
        }
        let err = XlsxReader::read(Cursor::new(buf)).unwrap_err();
        assert!(matches!(err, XlsxError::InvalidFormat(_)));
    }
}
