//! Contact rows and column lookup
//!
//! Exported contact sheets name the same field many ways, so templates may
//! use short aliases like `{name}` or `{company}`.

use std::path::Path;

use crate::core::Result;

/// Column holding the deliverable email address
pub const EMAIL_COLUMN: &str = "Email (FullEnrich)";

/// Alias to candidate columns, tried in order
pub const COLUMN_ALIASES: &[(&str, &[&str])] = &[
    (
        "name",
        &["First Name (Linkedin)", "First Name", "Full Name (Linkedin)"],
    ),
    ("first_name", &["First Name (Linkedin)", "First Name"]),
    ("last_name", &["Last Name (Linkedin)", "Last Name"]),
    ("full_name", &["Full Name (Linkedin)", "Name"]),
    ("company", &["Company"]),
    ("company_name", &["Company"]),
    ("email", &[EMAIL_COLUMN]),
    (
        "title",
        &["Title", "Job Title (Linkedin)", "Headline (Linkedin)"],
    ),
    ("linkedin", &["LinkedIn Profile Url", "LinkedIn", "Linkedin Url"]),
    ("location", &["Location (Linkedin)"]),
    ("headline", &["Headline (Linkedin)"]),
    ("summary", &["summary (Linkedin)"]),
    ("company_description", &["Company Description (Linkedin)"]),
    ("industry", &["Company Industry (Linkedin)"]),
    ("domain", &["Domain"]),
];

/// One contact, with columns in sheet order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContactRow {
    fields: Vec<(String, String)>,
}

impl ContactRow {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a row from `(column, value)` pairs
    pub fn from_pairs<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            fields: pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    /// Value of an exact column, if the column exists
    pub fn get(&self, column: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(name, _)| name == column)
            .map(|(_, value)| value.as_str())
    }

    /// Value of the first column in `columns` that exists, else `""`
    pub fn first_present(&self, columns: &[&str]) -> &str {
        columns
            .iter()
            .find_map(|column| self.get(column))
            .unwrap_or("")
    }

    pub fn columns(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Recipient address, trimmed
    pub fn email(&self) -> &str {
        self.get(EMAIL_COLUMN).unwrap_or("").trim()
    }

    /// Display name for previews and the output file
    pub fn display_name(&self) -> &str {
        match self.get("Full Name (Linkedin)") {
            Some(name) => name,
            None => self.get("Name").unwrap_or("Unknown"),
        }
    }

    pub fn company(&self) -> &str {
        self.get("Company").unwrap_or("Unknown")
    }
}

fn aliases_for(key: &str) -> Option<&'static [&'static str]> {
    COLUMN_ALIASES
        .iter()
        .find(|(alias, _)| *alias == key)
        .map(|(_, columns)| *columns)
}

/// Resolve a column name or alias to its value
///
/// Order: exact header (even if empty), first non-empty alias column,
/// case-insensitive header, then `""`.
pub fn resolve_column<'a>(name: &str, row: &'a ContactRow) -> &'a str {
    if let Some(value) = row.get(name) {
        return value;
    }

    let alias_key = name.to_lowercase().replace(' ', "_");
    if let Some(columns) = aliases_for(&alias_key) {
        if let Some(value) = columns
            .iter()
            .filter_map(|column| row.get(column))
            .find(|value| !value.is_empty())
        {
            return value;
        }
    }

    let lowered = name.to_lowercase();
    row.columns()
        .find(|(column, _)| column.to_lowercase() == lowered)
        .map(|(_, value)| value)
        .unwrap_or("")
}

/// Read contacts that have a usable email address
///
/// A UTF-8 byte order mark on the header is tolerated.
pub fn load_contacts(path: &Path) -> Result<Vec<ContactRow>> {
    let mut reader = csv::ReaderBuilder::new().flexible(true).from_path(path)?;
    let headers: Vec<String> = reader
        .headers()?
        .iter()
        .enumerate()
        .map(|(i, h)| {
            if i == 0 {
                h.trim_start_matches('\u{feff}').to_string()
            } else {
                h.to_string()
            }
        })
        .collect();

    let mut contacts = Vec::new();
    for record in reader.records() {
        let record = record?;
        let row = ContactRow::from_pairs(
            headers
                .iter()
                .enumerate()
                .map(|(i, header)| (header.clone(), record.get(i).unwrap_or("").to_string())),
        );
        if row.email().contains('@') {
            contacts.push(row);
        }
    }

    Ok(contacts)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_alias_resolves_linkedin_first_name() {
        let row = ContactRow::from_pairs([("First Name (Linkedin)", "Ada")]);
        assert_eq!(resolve_column("name", &row), "Ada");
    }

    #[test]
    fn test_exact_header_wins_even_when_empty() {
        let row = ContactRow::from_pairs([("name", ""), ("First Name", "Ada")]);
        assert_eq!(resolve_column("name", &row), "");
    }

    #[test]
    fn test_alias_skips_empty_columns() {
        let row = ContactRow::from_pairs([("First Name (Linkedin)", ""), ("First Name", "Grace")]);
        assert_eq!(resolve_column("First Name (linkedin)", &row), "");
        assert_eq!(resolve_column("first name", &row), "Grace");
    }

    #[test]
    fn test_case_insensitive_fallback() {
        let row = ContactRow::from_pairs([("Favorite Language", "Rust")]);
        assert_eq!(resolve_column("favorite language", &row), "Rust");
        assert_eq!(resolve_column("missing", &row), "");
    }

    #[test]
    fn test_load_contacts_filters_and_strips_bom() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("people.csv");
        std::fs::write(
            &path,
            "\u{feff}Company,Email (FullEnrich),First Name\nVercel,ada@vercel.com,Ada\nFly,,Grace\nRender,not-an-email,Linus\n",
        )
        .unwrap();

        let contacts = load_contacts(&path).unwrap();
        assert_eq!(contacts.len(), 1);
        assert_eq!(contacts[0].get("Company"), Some("Vercel"));
        assert_eq!(contacts[0].email(), "ada@vercel.com");
    }
}
