use anyhow::{Context, Result};
use chrono::NaiveDate;
use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Directory scrape results are written to
pub const OUTPUT_DIR: &str = "data";

const FILE_SUFFIX: &str = "_homedata.json";

/// Dated file name for one day's results, e.g. `2024-03-09_homedata.json`
pub fn results_file_name(date: NaiveDate) -> String {
    format!("{}{}", date.format("%Y-%m-%d"), FILE_SUFFIX)
}

/// Serialize with four-space indentation
pub fn to_pretty_json<T: Serialize + ?Sized>(value: &T) -> Result<Vec<u8>> {
    let mut buf = Vec::new();
    let formatter = PrettyFormatter::with_indent(b"    ");
    let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);
    value
        .serialize(&mut serializer)
        .context("Failed to serialize results")?;
    Ok(buf)
}

/// Write the results for `date` into `dir`, replacing any earlier file from the same day
pub async fn write_results<T: Serialize + ?Sized>(
    dir: &Path,
    date: NaiveDate,
    results: &T,
) -> Result<PathBuf> {
    tokio::fs::create_dir_all(dir)
        .await
        .with_context(|| format!("Failed to create {}", dir.display()))?;

    let path = dir.join(results_file_name(date));
    let json = to_pretty_json(results)?;
    debug!("Writing {} bytes to {}", json.len(), path.display());

    tokio::fs::write(&path, json)
        .await
        .with_context(|| format!("Failed to write {}", path.display()))?;

    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 9).unwrap()
    }

    #[test]
    fn file_name_is_dated() {
        assert_eq!(results_file_name(date()), "2024-03-09_homedata.json");
    }

    #[test]
    fn json_uses_four_space_indent_and_raw_utf8() {
        let bytes = to_pretty_json(&json!([{"city": "Malmö"}])).unwrap();
        let text = String::from_utf8(bytes).unwrap();
        assert_eq!(text, "[\n    {\n        \"city\": \"Malmö\"\n    }\n]");
    }

    #[tokio::test]
    async fn writes_into_created_directory() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path().join("data");

        let path = write_results(&dir, date(), &json!([{"property_id": "1"}]))
            .await
            .unwrap();

        assert_eq!(path, dir.join("2024-03-09_homedata.json"));
        let written: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(written, json!([{"property_id": "1"}]));
    }

    #[tokio::test]
    async fn same_day_run_overwrites_previous_file() {
        let tmp = tempfile::tempdir().unwrap();

        write_results(tmp.path(), date(), &json!([1, 2, 3]))
            .await
            .unwrap();
        let path = write_results(tmp.path(), date(), &json!([4]))
            .await
            .unwrap();

        let written: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(written, json!([4]));
        assert_eq!(std::fs::read_dir(tmp.path()).unwrap().count(), 1);
    }
}
