//! Artifact assembly: filtering, header rendering, and atomic writes.
//!
//! Output order always follows the input rule order. Rules without a domain
//! are kept in every artifact.

use std::io;
use std::path::{Path, PathBuf};

use rulecheck_rules::{HeaderMetadata, Rule};
use time::macros::format_description;
use time::{OffsetDateTime, UtcOffset};

/// Header keys written by [`render`]; metadata lines with these keys are
/// not repeated.
const FIXED_KEYS: [&str; 4] = ["title", "version", "homepage", "total lines"];

/// Per-artifact header values.
#[derive(Debug, Clone)]
pub struct HeaderFields<'a> {
    pub title: &'a str,
    pub homepage: &'a str,
    pub marker: &'a str,
    pub offset: UtcOffset,
}

/// Keep rules without a domain, and rules whose domain `is_member` accepts.
pub fn retain<'r, F>(rules: &'r [Rule], is_member: F) -> Vec<&'r Rule>
where
    F: Fn(&str) -> bool,
{
    rules
        .iter()
        .filter(|rule| rule.domain().is_none_or(&is_member))
        .collect()
}

/// `YYYY-MM-DD HH:MM:SS` at the given fixed offset.
pub fn version_stamp(
    now: OffsetDateTime,
    offset: UtcOffset,
) -> Result<String, time::error::Format> {
    now.to_offset(offset)
        .format(format_description!("[year]-[month]-[day] [hour]:[minute]:[second]"))
}

/// Render a complete artifact, newline-terminated.
pub fn render(
    fields: &HeaderFields<'_>,
    metadata: &HeaderMetadata,
    retained: &[&Rule],
    now: OffsetDateTime,
) -> Result<String, time::error::Format> {
    let marker = fields.marker;
    let mut out = String::with_capacity(retained.len() * 32 + 256);
    out.push_str(&format!("{marker} Title: {}\n", fields.title));
    out.push_str(&format!(
        "{marker} Version: {}\n",
        version_stamp(now, fields.offset)?
    ));
    out.push_str(&format!("{marker} Homepage: {}\n", fields.homepage));
    out.push_str(&format!("{marker} Total lines: {}\n", retained.len()));

    for entry in metadata.entries() {
        if is_fixed_field(entry) {
            continue;
        }
        out.push_str(entry);
        out.push('\n');
    }
    for rule in retained {
        out.push_str(rule.text());
        out.push('\n');
    }
    Ok(out)
}

/// `! Title: x`, `# Version: y`, ... (case-insensitive key).
fn is_fixed_field(entry: &str) -> bool {
    let body = entry.trim_start_matches(['!', '#']).trim_start();
    body.split_once(':').is_some_and(|(key, _)| {
        let key = key.trim();
        FIXED_KEYS.iter().any(|k| k.eq_ignore_ascii_case(key))
    })
}

/// Write `contents` to `path` via a sibling temp file and rename.
///
/// Parent directories are created. Readers never see a partial file.
pub async fn write_artifact(path: &Path, contents: &str) -> io::Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        tokio::fs::create_dir_all(parent).await?;
    }

    let tmp = temp_path(path);
    let result = match tokio::fs::write(&tmp, contents.as_bytes()).await {
        Ok(()) => tokio::fs::rename(&tmp, path).await,
        Err(e) => Err(e),
    };
    if result.is_err() {
        let _ = tokio::fs::remove_file(&tmp).await;
    }
    result
}

fn temp_path(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(".tmp");
    PathBuf::from(name)
}

#[cfg(test)]
mod tests {
    use rulecheck_rules::RuleIndex;
    use time::macros::datetime;

    use super::*;

    fn fields() -> HeaderFields<'static> {
        HeaderFields {
            title: "test-rules",
            homepage: "https://example.org",
            marker: "!",
            offset: UtcOffset::from_hms(8, 0, 0).unwrap(),
        }
    }

    #[test]
    fn version_uses_fixed_offset() {
        let now = datetime!(2024-03-01 20:15:00 UTC);
        let stamp = version_stamp(now, UtcOffset::from_hms(8, 0, 0).unwrap()).unwrap();
        assert_eq!(stamp, "2024-03-02 04:15:00");
    }

    #[test]
    fn retain_keeps_domainless_rules_in_order() {
        let index = RuleIndex::parse(
            "||ads.example^\n/^track[0-9]+\\./\n||gone.example^\n@@||good.example^\n",
        );
        let kept = retain(index.rules(), |d| d != "gone.example");
        let texts: Vec<_> = kept.iter().map(|r| r.text()).collect();
        assert_eq!(
            texts,
            ["||ads.example^", "/^track[0-9]+\\./", "@@||good.example^"]
        );

        let none = retain(index.rules(), |_| false);
        assert_eq!(none.len(), 1);
        assert_eq!(none[0].text(), "/^track[0-9]+\\./");
    }

    #[test]
    fn render_layout() {
        let index = RuleIndex::parse(
            "! Title: upstream\n! Version: 1\n! Description: merged list\n||ads.example^\n",
        );
        let kept = retain(index.rules(), |_| true);
        let out = render(&fields(), index.header(), &kept, datetime!(2024-01-01 0:00 UTC)).unwrap();
        assert_eq!(
            out,
            "! Title: test-rules\n\
             ! Version: 2024-01-01 08:00:00\n\
             ! Homepage: https://example.org\n\
             ! Total lines: 1\n\
             ! Description: merged list\n\
             ||ads.example^\n"
        );
    }

    #[test]
    fn render_empty() {
        let index = RuleIndex::parse("");
        let out = render(&fields(), index.header(), &[], OffsetDateTime::now_utc()).unwrap();
        assert_eq!(out.lines().count(), 4);
        assert!(out.ends_with("! Total lines: 0\n"));
    }

    #[test]
    fn fixed_fields_detected() {
        assert!(is_fixed_field("! Title: x"));
        assert!(is_fixed_field("!Homepage: https://a"));
        assert!(is_fixed_field("# total lines: 12"));
        assert!(!is_fixed_field("! Description: Title: nested"));
        assert!(!is_fixed_field("! no key here"));
    }

    #[tokio::test]
    async fn atomic_write_creates_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/out/all.txt");
        write_artifact(&path, "line\n").await.unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "line\n");
        assert!(!temp_path(&path).exists());

        write_artifact(&path, "replaced\n").await.unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "replaced\n");
    }

    #[tokio::test]
    async fn write_into_file_path_fails() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("file");
        std::fs::write(&blocker, "x").unwrap();
        let err = write_artifact(&blocker.join("all.txt"), "x\n").await;
        assert!(err.is_err());
    }

    #[tokio::test]
    async fn failed_write_leaves_no_temp_file() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("all.txt");
        std::fs::create_dir(&target).unwrap();
        std::fs::write(target.join("occupied"), "x").unwrap();

        assert!(write_artifact(&target, "line\n").await.is_err());
        assert!(!temp_path(&target).exists());
        assert!(target.is_dir());
    }
}
