//! Sheet encoding: CSV with minimal quoting and `\n` line endings

use crate::inventory::Row;

/// Encode rows, header first, as CSV bytes
pub fn encode_csv(rows: &[Row]) -> Result<Vec<u8>, csv::Error> {
    let mut writer = csv::WriterBuilder::new()
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(Vec::new());

    for row in rows {
        writer.write_record(row)?;
    }

    writer
        .into_inner()
        .map_err(|e| csv::Error::from(e.into_error()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(fields: &[&str]) -> Row {
        fields.iter().map(|f| f.to_string()).collect()
    }

    fn encode_str(rows: &[Row]) -> String {
        String::from_utf8(encode_csv(rows).unwrap()).unwrap()
    }

    #[test]
    fn test_plain_fields() {
        let out = encode_str(&[row(&["Project", "Name"]), row(&["Acme", "vm-1"])]);
        assert_eq!(out, "Project,Name\nAcme,vm-1\n");
    }

    #[test]
    fn test_quoting() {
        let out = encode_str(&[row(&["10.0.0.1, 10.0.0.2", "say \"hi\"", "multi\nline", ""])]);
        assert_eq!(out, "\"10.0.0.1, 10.0.0.2\",\"say \"\"hi\"\"\",\"multi\nline\",\n");
    }

    #[test]
    fn test_empty_table() {
        assert!(encode_csv(&[]).unwrap().is_empty());
    }
}
