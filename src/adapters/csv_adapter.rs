//! CSV tabular decoder: turns a file into raw import rows.
//!
//! This adapter only decodes; field validation and typing happen in the
//! import mapper. The delimiter is sniffed from the header line, so files
//! exported with `;` (the locale default of most spreadsheet tools here)
//! and plain `,` files both decode.

use std::fs;
use std::path::Path;

use crate::domain::error::FluxoError;
use crate::domain::import::RawRow;

pub struct CsvDecoder;

impl CsvDecoder {
    pub fn decode_file<P: AsRef<Path>>(path: P) -> Result<Vec<RawRow>, FluxoError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| FluxoError::ImportDecode {
            reason: format!("failed to read {}: {}", path.display(), e),
        })?;
        Self::decode_str(&content)
    }

    /// Decodes CSV text into rows. The header is line 1; each data row keeps
    /// its 1-based file line number. Cells are trimmed; short rows leave
    /// their trailing columns absent rather than erroring.
    pub fn decode_str(content: &str) -> Result<Vec<RawRow>, FluxoError> {
        let delimiter = sniff_delimiter(content);

        let mut reader = csv::ReaderBuilder::new()
            .delimiter(delimiter)
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(content.as_bytes());

        let headers: Vec<String> = reader
            .headers()
            .map_err(|e| FluxoError::ImportDecode {
                reason: format!("CSV header error: {}", e),
            })?
            .iter()
            .map(str::to_string)
            .collect();
        if headers.iter().all(|h| h.is_empty()) {
            return Err(FluxoError::ImportDecode {
                reason: "empty header line".into(),
            });
        }

        let mut rows = Vec::new();
        for (index, result) in reader.records().enumerate() {
            let record = result.map_err(|e| FluxoError::ImportDecode {
                reason: format!("CSV parse error: {}", e),
            })?;

            // Header is line 1, so the first record is line 2.
            let mut row = RawRow::new(index + 2);
            for (column, value) in headers.iter().zip(record.iter()) {
                row.values.insert(column.clone(), value.to_string());
            }
            rows.push(row);
        }
        Ok(rows)
    }
}

/// Picks `;` when the header carries more semicolons than commas.
fn sniff_delimiter(content: &str) -> u8 {
    let header = content.lines().next().unwrap_or("");
    let semicolons = header.matches(';').count();
    let commas = header.matches(',').count();
    if semicolons > commas { b';' } else { b',' }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn decodes_comma_separated_rows() {
        let content = "DataVencimento,Tipo,Valor,Contraparte\n\
                       2024-05-08,entrada,150.00,ABC LTDA\n\
                       2024-05-09,saida,40.00,XYZ SA\n";
        let rows = CsvDecoder::decode_str(content).unwrap();

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].line, 2);
        assert_eq!(rows[1].line, 3);
        assert_eq!(rows[0].get("DataVencimento"), Some("2024-05-08"));
        assert_eq!(rows[1].get("Contraparte"), Some("XYZ SA"));
    }

    #[test]
    fn sniffs_semicolon_delimiter() {
        let content = "DataVencimento;Tipo;Valor;Contraparte\n\
                       2024-05-08;entrada;150,00;ABC LTDA\n";
        let rows = CsvDecoder::decode_str(content).unwrap();

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].get("Valor"), Some("150,00"));
        assert_eq!(rows[0].get("Tipo"), Some("entrada"));
    }

    #[test]
    fn trims_cell_whitespace() {
        let content = "Tipo,Contraparte\n entrada ,  ABC LTDA \n";
        let rows = CsvDecoder::decode_str(content).unwrap();
        assert_eq!(rows[0].get("Tipo"), Some("entrada"));
        assert_eq!(rows[0].get("Contraparte"), Some("ABC LTDA"));
    }

    #[test]
    fn short_rows_leave_missing_columns_absent() {
        let content = "DataVencimento,Tipo,Valor,Contraparte\n2024-05-08,entrada\n";
        let rows = CsvDecoder::decode_str(content).unwrap();

        assert_eq!(rows[0].get("Tipo"), Some("entrada"));
        assert_eq!(rows[0].get("Valor"), None);
        assert_eq!(rows[0].get("Contraparte"), None);
    }

    #[test]
    fn header_only_file_yields_no_rows() {
        let rows = CsvDecoder::decode_str("DataVencimento,Tipo,Valor,Contraparte\n").unwrap();
        assert!(rows.is_empty());
    }

    #[test]
    fn empty_file_is_a_decode_error() {
        assert!(matches!(
            CsvDecoder::decode_str(""),
            Err(FluxoError::ImportDecode { .. })
        ));
    }

    #[test]
    fn decode_file_reads_from_disk() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "Tipo,Contraparte\nentrada,ABC LTDA\n").unwrap();

        let rows = CsvDecoder::decode_file(file.path()).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].get("Contraparte"), Some("ABC LTDA"));
    }

    #[test]
    fn decode_file_missing_file_is_an_error() {
        let result = CsvDecoder::decode_file("/nonexistent/rows.csv");
        assert!(matches!(result, Err(FluxoError::ImportDecode { .. })));
    }
}
