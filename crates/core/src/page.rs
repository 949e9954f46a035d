use serde::{Deserialize, Serialize};

/// A table row: ordered cells, `None` where the table extractor found no text.
pub type Row = Vec<Option<String>>;

/// A detected table: ordered rows, the first of which is treated as the header.
pub type Table = Vec<Row>;

/// One page of the source document as supplied by the external table extractor.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Page {
    /// Page number as reported by the extractor (1-based).
    #[serde(rename = "page")]
    pub number: u32,
    /// Plain text of the page, if the text layer produced any.
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub tables: Vec<Table>,
}

impl Page {
    /// Page text, or `None` when absent or whitespace-only.
    pub fn text(&self) -> Option<&str> {
        self.text.as_deref().filter(|t| !t.trim().is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_fields_default() {
        let page: Page = serde_json::from_str(r#"{"page": 7}"#).unwrap();
        assert_eq!(page.number, 7);
        assert!(page.text().is_none());
        assert!(page.tables.is_empty());
    }

    #[test]
    fn whitespace_text_counts_as_absent() {
        let page = Page { number: 1, text: Some("  \n ".into()), tables: vec![] };
        assert!(page.text().is_none());
    }

    #[test]
    fn null_cells_deserialize_as_none() {
        let page: Page =
            serde_json::from_str(r#"{"page": 2, "tables": [[["Ward", null, "Total"]]]}"#).unwrap();
        assert_eq!(page.tables[0][0][1], None);
        assert_eq!(page.tables[0][0][2].as_deref(), Some("Total"));
    }
}
