use crate::campaign::CampaignEntry;
use crate::error::Result;
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// Writes the campaign as CSV: a header row of entry field names, then one row per entry.
pub fn write_csv<W: Write>(entries: &[CampaignEntry], writer: W) -> Result<()> {
    let mut csv = csv::Writer::from_writer(writer);
    if entries.is_empty() {
        // serde only emits headers alongside the first record.
        csv.write_record(CSV_HEADERS)?;
    }
    for entry in entries {
        csv.serialize(entry)?;
    }
    csv.flush()?;
    Ok(())
}

/// Exports the campaign to a file at `path`, replacing it if present.
pub fn export_to_file(entries: &[CampaignEntry], path: &Path) -> Result<()> {
    let file = File::create(path)?;
    write_csv(entries, file)?;
    tracing::info!(path = %path.display(), rows = entries.len(), "Exported campaign");
    Ok(())
}

/// Renders the campaign CSV into a string.
pub fn to_csv_string(entries: &[CampaignEntry]) -> Result<String> {
    let mut buf = Vec::new();
    write_csv(entries, &mut buf)?;
    Ok(String::from_utf8_lossy(&buf).into_owned())
}

const CSV_HEADERS: [&str; 10] = [
    "repository",
    "owner",
    "stars",
    "forks",
    "languages",
    "average_resolution_time",
    "latest_commit_date",
    "contributors",
    "issues_closed_60d",
    "commits_60d",
];

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn entry() -> CampaignEntry {
        CampaignEntry {
            repository: "tokio".to_string(),
            owner: "tokio-rs".to_string(),
            stars: 25000,
            forks: 2300,
            languages: "Rust, Shell".to_string(),
            average_resolution_time: "3.10 days".to_string(),
            latest_commit_date: Some(NaiveDate::from_ymd_opt(2024, 5, 1).unwrap()),
            contributors: "carllerche, Darksonn".to_string(),
            issues_closed_60d: 42,
            commits_60d: 87,
        }
    }

    #[test]
    fn test_csv_rows() {
        let csv = to_csv_string(&[entry()]).unwrap();
        let lines: Vec<&str> = csv.lines().collect();

        assert_eq!(lines[0], CSV_HEADERS.join(","));
        assert_eq!(
            lines[1],
            "tokio,tokio-rs,25000,2300,\"Rust, Shell\",3.10 days,2024-05-01,\"carllerche, Darksonn\",42,87"
        );
    }

    #[test]
    fn test_missing_commit_date_is_blank() {
        let mut e = entry();
        e.latest_commit_date = None;
        let csv = to_csv_string(&[e]).unwrap();
        assert!(csv.lines().nth(1).unwrap().contains(",3.10 days,,"));
    }

    #[test]
    fn test_empty_campaign_has_header_only() {
        let csv = to_csv_string(&[]).unwrap();
        assert_eq!(csv.lines().count(), 1);
        assert!(csv.starts_with("repository,owner,"));
    }
}
