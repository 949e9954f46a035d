// Page dump import (JSON Lines, one page per line)

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use wardpop_core::Page;

use crate::error::IoError;

/// Read a page dump. Blank lines are skipped; any other line that is not a
/// page object aborts the read with its line number.
pub fn read_pages(path: &Path) -> Result<Vec<Page>, IoError> {
    let file = File::open(path).map_err(|source| IoError::Open { path: path.to_path_buf(), source })?;
    let pages = parse_pages(BufReader::new(file), path)?;
    log::info!("read {} pages from {}", pages.len(), path.display());
    Ok(pages)
}

/// Parse page-dump lines from `reader`. `path` only labels errors.
pub fn parse_pages<R: BufRead>(reader: R, path: &Path) -> Result<Vec<Page>, IoError> {
    let mut pages: Vec<Page> = Vec::new();

    for (idx, line) in reader.lines().enumerate() {
        let line_no = idx as u64 + 1;
        let line = line.map_err(|e| IoError::Parse {
            path: path.to_path_buf(),
            line: Some(line_no),
            message: e.to_string(),
        })?;
        if line.trim().is_empty() {
            continue;
        }

        let page: Page = serde_json::from_str(&line).map_err(|e| IoError::Parse {
            path: path.to_path_buf(),
            line: Some(line_no),
            message: format!("invalid page record: {e}"),
        })?;

        if let Some(prev) = pages.last() {
            if page.number <= prev.number {
                log::warn!(
                    "{}:{line_no}: page {} follows page {}; context is carried in file order",
                    path.display(),
                    page.number,
                    prev.number
                );
            }
        }
        pages.push(page);
    }

    Ok(pages)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn parse(text: &str) -> Result<Vec<Page>, IoError> {
        parse_pages(Cursor::new(text), Path::new("dump.jsonl"))
    }

    #[test]
    fn parses_pages_and_skips_blank_lines() {
        let text = r#"{"page": 1, "text": "Region 1: Dodoma", "tables": []}

{"page": 2, "text": null, "tables": [[["S/N", "Ward", null], ["1", "MAKOJE", "12,408"]]]}
{"page": 3}
"#;
        let pages = parse(text).unwrap();
        assert_eq!(pages.len(), 3);
        assert_eq!(pages[0].text(), Some("Region 1: Dodoma"));
        assert_eq!(pages[1].text, None);
        assert_eq!(pages[1].tables[0][0][2], None);
        assert_eq!(pages[1].tables[0][1][1].as_deref(), Some("MAKOJE"));
        assert!(pages[2].tables.is_empty());
    }

    #[test]
    fn malformed_line_reports_line_number() {
        let text = "{\"page\": 1}\n\n{\"page\": \"two\"}\n";
        let err = parse(text).unwrap_err();
        match &err {
            IoError::Parse { line, .. } => assert_eq!(*line, Some(3)),
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(err.to_string().starts_with("dump.jsonl:3: invalid page record"));
    }

    #[test]
    fn truncated_json_is_fatal() {
        assert!(parse("{\"page\": 1, \"text\": \"abc").is_err());
    }

    #[test]
    fn missing_file_is_open_error() {
        let err = read_pages(Path::new("/nonexistent/dump.jsonl")).unwrap_err();
        assert!(matches!(err, IoError::Open { .. }));
        assert!(err.is_source());
    }
}
