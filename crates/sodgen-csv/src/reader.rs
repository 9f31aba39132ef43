//! CSV reader

use std::fs::File;
use std::io::Read;
use std::path::Path;

use crate::error::CsvResult;
use crate::options::CsvReadOptions;
use sodgen_core::{CellValue, Sheet};

/// CSV file reader
pub struct CsvReader;

impl CsvReader {
    /// Read a CSV file into a sheet named after the file stem
    pub fn read_file<P: AsRef<Path>>(path: P, options: &CsvReadOptions) -> CsvResult<Sheet> {
        let path = path.as_ref();
        let name = path
            .file_stem()
            .and_then(|s| s.to_str())
            .filter(|s| !s.trim().is_empty())
            .unwrap_or("Sheet1")
            .to_string();
        let file = File::open(path)?;
        Self::read(file, name, options)
    }

    /// Read CSV from a reader into a sheet
    ///
    /// The first record supplies the column names.
    pub fn read<R: Read, S: Into<String>>(
        reader: R,
        name: S,
        options: &CsvReadOptions,
    ) -> CsvResult<Sheet> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .delimiter(options.delimiter)
            .has_headers(false)
            .flexible(true)
            .from_reader(reader);

        let mut header = Vec::new();
        let mut records = Vec::new();

        for (idx, result) in csv_reader.records().enumerate() {
            let record = result?;

            if idx == 0 {
                header = record.iter().map(CellValue::string).collect();
                continue;
            }

            records.push(record.iter().map(Self::detect_type).collect());
        }

        Ok(Sheet::from_records(name, header, records))
    }

    /// Detect the type of a field value
    ///
    /// Only plain decimal literals become numbers. `inf`, `NaN` and
    /// zero-padded codes such as `0012` stay text. ISO dates become dates.
    fn detect_type(field: &str) -> CellValue {
        let trimmed = field.trim();

        if trimmed.is_empty() {
            return CellValue::Empty;
        }

        // Try boolean
        if trimmed.eq_ignore_ascii_case("true") {
            return CellValue::Boolean(true);
        }
        if trimmed.eq_ignore_ascii_case("false") {
            return CellValue::Boolean(false);
        }

        // Try number
        if Self::is_decimal_literal(trimmed) {
            if let Ok(n) = trimmed.parse::<f64>() {
                if n.is_finite() {
                    return CellValue::Number(n);
                }
            }
        }

        // Try ISO date, as written for date cells
        if let Some(date) = CellValue::parse_iso_date(trimmed) {
            return date;
        }

        // Default to string, untrimmed
        CellValue::string(field)
    }

    /// `[+-]digits[.digits][(e|E)[+-]digits]` without a leading zero pad
    fn is_decimal_literal(s: &str) -> bool {
        let unsigned = s.strip_prefix(['+', '-']).unwrap_or(s);
        let (mantissa, exponent) = match unsigned.find(['e', 'E']) {
            Some(pos) => (&unsigned[..pos], Some(&unsigned[pos + 1..])),
            None => (unsigned, None),
        };
        let (int_part, frac_part) = match mantissa.split_once('.') {
            Some((i, f)) => (i, Some(f)),
            None => (mantissa, None),
        };

        let all_digits = |p: &str| p.bytes().all(|b| b.is_ascii_digit());
        let int_ok = all_digits(int_part)
            && !(int_part.len() > 1 && int_part.starts_with('0'))
            && (!int_part.is_empty() || frac_part.is_some_and(|f| !f.is_empty()));
        let frac_ok = frac_part.map_or(true, all_digits);
        let exp_ok = exponent.map_or(true, |e| {
            let digits = e.strip_prefix(['+', '-']).unwrap_or(e);
            !digits.is_empty() && all_digits(digits)
        });

        int_ok && frac_ok && exp_ok
    }
}
