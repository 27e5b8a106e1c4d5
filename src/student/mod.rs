//! Student record extraction from the academic status page.
//!
//! The page lays the record out as two-cell table rows:
//!
//! ```html
//! <td valign="top">No mahasiswa</td>
//! <td valign="top">12523001</td>
//! ```
//!
//! Each row whose label is in the fixed label table becomes one record
//! field; rows with other labels are skipped. The combined
//! `SKS/IP kumulatif` value is then split into credits (`sks`) and GPA (`ipk`).

mod error;

use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;
use tracing::{debug, trace};

pub use error::{MalformedRecord, StudentDataError};

/// Label/value row. `.` does not cross lines; the whitespace between the two
/// cells may.
#[allow(clippy::expect_used)]
static ROW_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"<td valign="top">(.*)</td>\s*<td valign="top">(.*)</td>"#)
        .expect("student row regex is valid") // Static pattern, safe to panic
});

/// Separator between credits and GPA in the `sks_ipk` field.
pub const SKS_IPK_SEPARATOR: &str = " / ";

/// Record keys, in output order.
pub const RECORD_KEYS: [&str; 8] = [
    "nim",
    "name",
    "theory",
    "kkn",
    "konsentrasi",
    "sks_ipk",
    "sks",
    "ipk",
];

/// A field read directly from a labeled table row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StudentField {
    Nim,
    Name,
    Theory,
    Kkn,
    Konsentrasi,
    SksIpk,
}

impl StudentField {
    /// All row-backed fields.
    pub const ALL: [Self; 6] = [
        Self::Nim,
        Self::Name,
        Self::Theory,
        Self::Kkn,
        Self::Konsentrasi,
        Self::SksIpk,
    ];

    /// Row label as printed on the page.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Nim => "No mahasiswa",
            Self::Name => "Nama",
            Self::Theory => "Habis teori",
            Self::Kkn => "KKN",
            Self::Konsentrasi => "Konsentrasi studi",
            Self::SksIpk => "SKS/IP kumulatif",
        }
    }

    /// Record key the row is stored under.
    #[must_use]
    pub fn key(self) -> &'static str {
        match self {
            Self::Nim => "nim",
            Self::Name => "name",
            Self::Theory => "theory",
            Self::Kkn => "kkn",
            Self::Konsentrasi => "konsentrasi",
            Self::SksIpk => "sks_ipk",
        }
    }

    /// Looks up a row label. Unknown labels yield `None`.
    #[must_use]
    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|field| field.label() == label)
    }
}

/// Student data scraped from the academic status page.
///
/// Row-backed fields that were not on the page stay `None`. `sks_ipk` and
/// the two values derived from it are always present on a successfully
/// extracted record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct StudentRecord {
    /// Student number (NIM).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nim: Option<String>,
    /// Full name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Semester in which coursework was completed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub theory: Option<String>,
    /// Community service (KKN) status.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kkn: Option<String>,
    /// Study concentration.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub konsentrasi: Option<String>,
    /// Cumulative credits and GPA as printed, e.g. `144 / 3.50`.
    pub sks_ipk: String,
    /// Cumulative credits.
    pub sks: String,
    /// Cumulative GPA.
    pub ipk: String,
}

impl StudentRecord {
    /// Mapping view: the value stored under one of [`RECORD_KEYS`].
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        match key {
            "nim" => self.nim.as_deref(),
            "name" => self.name.as_deref(),
            "theory" => self.theory.as_deref(),
            "kkn" => self.kkn.as_deref(),
            "konsentrasi" => self.konsentrasi.as_deref(),
            "sks_ipk" => Some(&self.sks_ipk),
            "sks" => Some(&self.sks),
            "ipk" => Some(&self.ipk),
            _ => None,
        }
    }

    /// Present keys and values in [`RECORD_KEYS`] order.
    #[must_use]
    pub fn fields(&self) -> Vec<(&'static str, &str)> {
        RECORD_KEYS
            .into_iter()
            .filter_map(|key| self.get(key).map(|value| (key, value)))
            .collect()
    }
}

/// Row values before the derived fields are computed.
#[derive(Debug, Default)]
struct ExtractedRows {
    nim: Option<String>,
    name: Option<String>,
    theory: Option<String>,
    kkn: Option<String>,
    konsentrasi: Option<String>,
    sks_ipk: Option<String>,
}

impl ExtractedRows {
    fn set(&mut self, field: StudentField, value: String) {
        let slot = match field {
            StudentField::Nim => &mut self.nim,
            StudentField::Name => &mut self.name,
            StudentField::Theory => &mut self.theory,
            StudentField::Kkn => &mut self.kkn,
            StudentField::Konsentrasi => &mut self.konsentrasi,
            StudentField::SksIpk => &mut self.sks_ipk,
        };
        *slot = Some(value);
    }
}

/// Extracts a [`StudentRecord`] from academic status page HTML.
///
/// # Errors
///
/// Returns [`MalformedRecord`] when the `SKS/IP kumulatif` row is missing or
/// its value lacks the `" / "` separator.
///
/// # Examples
///
/// ```
/// use unisys_core::student::extract_student_record;
///
/// let html = r#"<tr><td valign="top">SKS/IP kumulatif</td>
///     <td valign="top">144 / 3.50</td></tr>"#;
/// let record = extract_student_record(html).unwrap();
/// assert_eq!(record.sks, "144");
/// assert_eq!(record.ipk, "3.50");
/// assert!(record.nim.is_none());
/// ```
pub fn extract_student_record(html: &str) -> Result<StudentRecord, MalformedRecord> {
    let mut rows = ExtractedRows::default();

    for captures in ROW_PATTERN.captures_iter(html) {
        let label = captures[1].trim();
        let Some(field) = StudentField::from_label(label) else {
            trace!(label, "skipping unrecognized row");
            continue;
        };
        // A repeated label keeps the last value.
        rows.set(field, captures[2].trim().to_string());
    }

    let sks_ipk = rows.sks_ipk.ok_or(MalformedRecord::MissingField {
        field: StudentField::SksIpk.key(),
    })?;
    let (sks, ipk) = split_sks_ipk(&sks_ipk)?;
    debug!("student record extracted");

    Ok(StudentRecord {
        nim: rows.nim,
        name: rows.name,
        theory: rows.theory,
        kkn: rows.kkn,
        konsentrasi: rows.konsentrasi,
        sks: sks.to_string(),
        ipk: ipk.to_string(),
        sks_ipk,
    })
}

/// Splits `"144 / 3.50"` into `("144", "3.50")`. Parts past the second are
/// ignored.
fn split_sks_ipk(value: &str) -> Result<(&str, &str), MalformedRecord> {
    let mut parts = value.split(SKS_IPK_SEPARATOR);
    match (parts.next(), parts.next()) {
        (Some(sks), Some(ipk)) => Ok((sks, ipk)),
        _ => Err(MalformedRecord::MissingSeparator {
            field: StudentField::SksIpk.key(),
            value: value.to_string(),
        }),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn row(label: &str, value: &str) -> String {
        format!("<tr>\n  <td valign=\"top\">{label}</td>\n  <td valign=\"top\">{value}</td>\n</tr>\n")
    }

    fn full_page() -> String {
        [
            row("No mahasiswa", "12523001"),
            row("Nama", "  Siti Rahmawati "),
            row("Habis teori", "Semester 8"),
            row("KKN", "Sudah"),
            row("Konsentrasi studi", "Rekayasa Perangkat Lunak"),
            row("SKS/IP kumulatif", "144 / 3.50"),
            row("Dosen wali", "Dr. Budi"),
        ]
        .concat()
    }

    #[test]
    fn test_extract_all_recognized_labels() {
        let record = extract_student_record(&full_page()).unwrap();
        assert_eq!(record.nim.as_deref(), Some("12523001"));
        assert_eq!(record.name.as_deref(), Some("Siti Rahmawati"));
        assert_eq!(record.theory.as_deref(), Some("Semester 8"));
        assert_eq!(record.kkn.as_deref(), Some("Sudah"));
        assert_eq!(
            record.konsentrasi.as_deref(),
            Some("Rekayasa Perangkat Lunak")
        );
        assert_eq!(record.sks_ipk, "144 / 3.50");
        assert_eq!(record.sks, "144");
        assert_eq!(record.ipk, "3.50");
    }

    #[test]
    fn test_unrecognized_labels_add_no_keys() {
        let record = extract_student_record(&full_page()).unwrap();
        let keys: Vec<&str> = record.fields().into_iter().map(|(key, _)| key).collect();
        assert_eq!(keys, RECORD_KEYS.to_vec());
        assert!(record.get("dosen_wali").is_none());
    }

    #[test]
    fn test_absent_rows_stay_unset() {
        let html = row("SKS/IP kumulatif", "100 / 2.75");
        let record = extract_student_record(&html).unwrap();
        assert!(record.nim.is_none());
        assert!(record.name.is_none());
        let keys: Vec<&str> = record.fields().into_iter().map(|(key, _)| key).collect();
        assert_eq!(keys, vec!["sks_ipk", "sks", "ipk"]);

        let json = serde_json::to_value(&record).unwrap();
        assert!(json.get("nim").is_none());
        assert_eq!(json["sks"], "100");
    }

    #[test]
    fn test_missing_sks_ipk_is_malformed() {
        let html = row("Nama", "Siti");
        let error = extract_student_record(&html).unwrap_err();
        assert_eq!(error, MalformedRecord::MissingField { field: "sks_ipk" });
    }

    #[test]
    fn test_sks_ipk_without_separator_is_malformed() {
        let html = row("SKS/IP kumulatif", "144/3.50");
        let error = extract_student_record(&html).unwrap_err();
        assert!(matches!(
            error,
            MalformedRecord::MissingSeparator { ref value, .. } if value == "144/3.50"
        ));
    }

    #[test]
    fn test_sks_ipk_extra_parts_ignored() {
        let html = row("SKS/IP kumulatif", "144 / 3.50 / x");
        let record = extract_student_record(&html).unwrap();
        assert_eq!(record.sks, "144");
        assert_eq!(record.ipk, "3.50");
    }

    #[test]
    fn test_cells_on_same_line() {
        let html = r#"<tr><td valign="top">KKN</td><td valign="top">Belum</td></tr>
<tr><td valign="top">SKS/IP kumulatif</td>   <td valign="top">20 / 3.00</td></tr>"#;
        let record = extract_student_record(html).unwrap();
        assert_eq!(record.kkn.as_deref(), Some("Belum"));
        assert_eq!(record.sks, "20");
    }

    #[test]
    fn test_label_lookup_is_exact() {
        assert_eq!(StudentField::from_label("Nama"), Some(StudentField::Name));
        assert_eq!(StudentField::from_label("nama"), None);
        assert_eq!(StudentField::from_label("Nama lengkap"), None);
    }

    #[test]
    fn test_repeated_label_keeps_last_value() {
        let html = [
            row("Nama", "First"),
            row("Nama", "Second"),
            row("SKS/IP kumulatif", "1 / 1.00"),
        ]
        .concat();
        let record = extract_student_record(&html).unwrap();
        assert_eq!(record.name.as_deref(), Some("Second"));
    }
}
