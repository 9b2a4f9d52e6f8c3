//! End-to-end runs against in-memory resolvers.

use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};
use std::path::Path;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use rulecheck_config::{ArtifactConfig, ArtifactKind, Config};
use rulecheck_dns::{DnsError, RecordLookup, TierConfig};
use rulecheck_pipeline::{DomainState, Pipeline, RunOutcome};
use rulecheck_rules::CountryLookup;
use rustc_hash::FxHashMap;

/// Answers A queries from a table; everything else has no records.
#[derive(Default)]
struct TableLookup {
    a: FxHashMap<String, Ipv4Addr>,
    queries: Mutex<Vec<String>>,
}

impl TableLookup {
    fn new(entries: &[(&str, [u8; 4])]) -> Arc<Self> {
        Arc::new(Self {
            a: entries
                .iter()
                .map(|(d, ip)| (d.to_string(), Ipv4Addr::from(*ip)))
                .collect(),
            queries: Mutex::default(),
        })
    }

    fn queried(&self) -> Vec<String> {
        let mut q = self.queries.lock().unwrap().clone();
        q.sort();
        q
    }
}

#[async_trait]
impl RecordLookup for TableLookup {
    async fn lookup_a(&self, domain: &str) -> Result<Vec<Ipv4Addr>, DnsError> {
        self.queries.lock().unwrap().push(domain.to_string());
        Ok(self.a.get(domain).copied().into_iter().collect())
    }

    async fn lookup_aaaa(&self, _domain: &str) -> Result<Vec<Ipv6Addr>, DnsError> {
        Ok(Vec::new())
    }
}

/// 10.0.0.0/8 is "CN", everything else "US".
struct OctetCountry;

impl CountryLookup for OctetCountry {
    fn country_code(&self, ip: IpAddr) -> Option<String> {
        match ip {
            IpAddr::V4(v4) if v4.octets()[0] == 10 => Some("CN".into()),
            IpAddr::V4(_) => Some("US".into()),
            IpAddr::V6(_) => None,
        }
    }
}

fn config(dir: &Path, input: &str) -> Config {
    let input_path = dir.join("input.txt");
    std::fs::write(&input_path, input).unwrap();

    let mut config = Config::default();
    config.input.path = input_path.display().to_string();
    config.resolver.tiers = vec![
        TierConfig::new("regional", ["127.0.0.1"]),
        TierConfig::new("global", ["127.0.0.2"]),
    ];
    config.output.artifacts = vec![
        ArtifactConfig::full(dir.join("all.txt").display().to_string()),
        ArtifactConfig::lite(dir.join("all-lite.txt").display().to_string()),
    ];
    config
}

/// Pipeline whose tiers answer from `first` and `second`.
fn pipeline(config: Config, first: Arc<TableLookup>, second: Arc<TableLookup>) -> Pipeline {
    Pipeline::new(config).with_resolver_factory(move |tier| {
        let lookup: Arc<dyn RecordLookup> = if tier.name == "regional" {
            first.clone()
        } else {
            second.clone()
        };
        Ok(lookup)
    })
}

fn read(dir: &Path, name: &str) -> String {
    std::fs::read_to_string(dir.join(name)).unwrap()
}

/// Artifact text without the Version line.
fn body(text: &str) -> Vec<&str> {
    text.lines()
        .filter(|l| !l.starts_with("! Version:"))
        .collect()
}

fn rule_lines(text: &str) -> Vec<&str> {
    text.lines().skip(4).collect()
}

async fn run(pipeline: &Pipeline) -> RunOutcome {
    pipeline.run().await.unwrap()
}

#[tokio::test]
async fn failed_domain_dropped_regex_kept() {
    let dir = tempfile::tempdir().unwrap();
    let cfg = config(
        dir.path(),
        "! Title: x\n||ads.example^\n@@||good.example^\n/^ad[0-9]+\\./\n",
    );
    let regional = TableLookup::new(&[("good.example", [10, 0, 0, 1])]);
    let global = TableLookup::new(&[]);
    let outcome = run(&pipeline(cfg, regional, global.clone())).await;

    let all = read(dir.path(), "all.txt");
    assert_eq!(rule_lines(&all), ["@@||good.example^", "/^ad[0-9]+\\./"]);
    assert!(all.contains("! Total lines: 2\n"));
    // The input's own Title collides with the fixed field.
    assert!(!all.contains("! Title: x"));

    // Only the failure is retried by the second tier.
    assert_eq!(global.queried(), ["ads.example"]);

    assert_eq!(outcome.stats.total_rules, 3);
    assert_eq!(outcome.stats.domains, 2);
    assert_eq!(outcome.stats.domains_resolved, 1);
    assert!(outcome.stats.artifacts.iter().all(|a| a.is_written()));
}

#[tokio::test]
async fn descendant_retained_through_parent() {
    let dir = tempfile::tempdir().unwrap();
    let cfg = config(dir.path(), "||sub.cdn.example.com^\n||tracker.net^\n");
    let regional = TableLookup::new(&[("example.com", [10, 0, 0, 2])]);
    let global = TableLookup::new(&[]);
    let outcome = run(&pipeline(cfg, regional.clone(), global)).await;

    assert_eq!(
        rule_lines(&read(dir.path(), "all.txt")),
        ["||sub.cdn.example.com^"]
    );
    assert!(!regional.queried().contains(&"sub.cdn.example.com".to_string()));

    let record = outcome
        .records
        .iter()
        .find(|r| r.domain == "sub.cdn.example.com")
        .unwrap();
    assert_eq!(record.state, DomainState::ResolvedViaParent);
    assert_eq!(record.parent, "example.com");
    assert_eq!(record.tier, Some(0));
}

#[tokio::test]
async fn aggregation_disabled_queries_every_domain() {
    let dir = tempfile::tempdir().unwrap();
    let mut cfg = config(dir.path(), "||sub.cdn.example.com^\n");
    cfg.hierarchy.enabled = false;
    let regional = TableLookup::new(&[("example.com", [10, 0, 0, 2])]);
    let global = TableLookup::new(&[]);
    run(&pipeline(cfg, regional.clone(), global)).await;

    assert_eq!(regional.queried(), ["sub.cdn.example.com"]);
    assert!(rule_lines(&read(dir.path(), "all.txt")).is_empty());
}

#[tokio::test]
async fn lite_keeps_first_tier_only() {
    let dir = tempfile::tempdir().unwrap();
    let cfg = config(dir.path(), "||near.example^\n||far.example^\n||gone.example^\n");
    let regional = TableLookup::new(&[("near.example", [10, 0, 0, 3])]);
    let global = TableLookup::new(&[("far.example", [20, 0, 0, 3])]);
    run(&pipeline(cfg, regional, global)).await;

    assert_eq!(
        rule_lines(&read(dir.path(), "all.txt")),
        ["||near.example^", "||far.example^"]
    );
    assert_eq!(
        rule_lines(&read(dir.path(), "all-lite.txt")),
        ["||near.example^"]
    );
}

#[tokio::test]
async fn empty_input_has_zero_lines() {
    let dir = tempfile::tempdir().unwrap();
    let cfg = config(dir.path(), "! only a comment\n\n");
    let outcome = run(&pipeline(cfg, TableLookup::new(&[]), TableLookup::new(&[]))).await;

    let all = read(dir.path(), "all.txt");
    assert!(all.contains("! Total lines: 0\n"));
    assert!(all.ends_with("! only a comment\n"));
    assert_eq!(outcome.stats.total_rules, 0);
}

#[tokio::test]
async fn rerun_is_idempotent() {
    let dir = tempfile::tempdir().unwrap();
    let input = "! Description: demo\n||a.example^\n||b.example^\n! section\n||c.example^\n";
    let answers = [("a.example", [10, 0, 0, 1]), ("c.example", [20, 0, 0, 1])];

    let cfg = config(dir.path(), input);
    run(&pipeline(cfg.clone(), TableLookup::new(&answers), TableLookup::new(&[]))).await;
    let first_full = read(dir.path(), "all.txt");
    let first_lite = read(dir.path(), "all-lite.txt");

    run(&pipeline(cfg, TableLookup::new(&answers), TableLookup::new(&[]))).await;
    assert_eq!(body(&first_full), body(&read(dir.path(), "all.txt")));
    assert_eq!(body(&first_lite), body(&read(dir.path(), "all-lite.txt")));
}

#[tokio::test]
async fn header_comments_deduplicated() {
    let dir = tempfile::tempdir().unwrap();
    let cfg = config(
        dir.path(),
        "! Source: one\n! Source: two\n! Source: one\n||a.example^\n! Source: two\n",
    );
    run(&pipeline(
        cfg,
        TableLookup::new(&[("a.example", [10, 0, 0, 1])]),
        TableLookup::new(&[]),
    ))
    .await;

    let all = read(dir.path(), "all.txt");
    let lines: Vec<_> = all.lines().skip(4).collect();
    assert_eq!(lines, ["! Source: one", "! Source: two", "||a.example^"]);
}

#[tokio::test]
async fn region_artifact_uses_country_lookup() {
    let dir = tempfile::tempdir().unwrap();
    let mut cfg = config(dir.path(), "||cn.example^\n||us.example^\n||www.cdn.cn-site.com^\n");
    let region_path = dir.path().join("cn.txt");
    cfg.output.artifacts.push(ArtifactConfig::new(
        ArtifactKind::Region,
        region_path.display().to_string(),
    ));
    let regional = TableLookup::new(&[
        ("cn.example", [10, 1, 1, 1]),
        ("us.example", [20, 1, 1, 1]),
        ("cn-site.com", [10, 2, 2, 2]),
    ]);
    let outcome = run(
        &pipeline(cfg, regional, TableLookup::new(&[])).with_country_lookup(OctetCountry),
    )
    .await;

    assert_eq!(
        rule_lines(&read(dir.path(), "cn.txt")),
        ["||cn.example^", "||www.cdn.cn-site.com^"]
    );
    assert_eq!(outcome.stats.region_domains, Some(2));
    let us = outcome
        .records
        .iter()
        .find(|r| r.domain == "us.example")
        .unwrap();
    assert_eq!(us.country.as_deref(), Some("US"));
}

#[tokio::test]
async fn region_skipped_without_database() {
    let dir = tempfile::tempdir().unwrap();
    let mut cfg = config(dir.path(), "||cn.example^\n");
    let region_path = dir.path().join("cn.txt");
    cfg.geoip.path = Some(dir.path().join("missing.mmdb").display().to_string());
    cfg.output.artifacts.push(ArtifactConfig::new(
        ArtifactKind::Region,
        region_path.display().to_string(),
    ));
    let outcome = run(&pipeline(
        cfg,
        TableLookup::new(&[("cn.example", [10, 1, 1, 1])]),
        TableLookup::new(&[]),
    ))
    .await;

    assert!(!region_path.exists());
    let region = &outcome.stats.artifacts[2];
    assert!(!region.is_written());
    assert!(outcome.stats.artifacts[0].is_written());
    assert!(outcome.stats.region_domains.is_none());
}

#[tokio::test]
async fn broken_tier_does_not_stop_run() {
    let dir = tempfile::tempdir().unwrap();
    let cfg = config(dir.path(), "||a.example^\n");
    let global = TableLookup::new(&[("a.example", [20, 0, 0, 1])]);
    let pipeline = Pipeline::new(cfg).with_resolver_factory(move |tier| {
        if tier.name == "regional" {
            return Err(DnsError::InvalidServer("unreachable".into()));
        }
        Ok(global.clone() as Arc<dyn RecordLookup>)
    });
    let outcome = run(&pipeline).await;

    assert!(outcome.stats.tiers[0].is_failed());
    assert_eq!(rule_lines(&read(dir.path(), "all.txt")), ["||a.example^"]);
    assert!(rule_lines(&read(dir.path(), "all-lite.txt")).is_empty());
}

#[tokio::test]
async fn unwritable_artifact_reported() {
    let dir = tempfile::tempdir().unwrap();
    let mut cfg = config(dir.path(), "||a.example^\n");
    let blocker = dir.path().join("blocker");
    std::fs::write(&blocker, "").unwrap();
    cfg.output.artifacts[1].path = blocker.join("lite.txt").display().to_string();
    let outcome = run(&pipeline(
        cfg,
        TableLookup::new(&[("a.example", [10, 0, 0, 1])]),
        TableLookup::new(&[]),
    ))
    .await;

    assert!(outcome.stats.artifacts[0].is_written());
    assert!(!outcome.stats.artifacts[1].is_written());
}

#[tokio::test]
async fn missing_input_is_fatal() {
    let dir = tempfile::tempdir().unwrap();
    let mut cfg = config(dir.path(), "");
    cfg.input.path = dir.path().join("nope.txt").display().to_string();
    let err = Pipeline::new(cfg).run().await.unwrap_err();
    assert_eq!(err.error_type(), "io");
}

#[tokio::test]
async fn json_report_written() {
    let dir = tempfile::tempdir().unwrap();
    let mut cfg = config(dir.path(), "||a.example^\n||b.example^\n");
    let report_path = dir.path().join("report.json");
    cfg.output.report = Some(report_path.display().to_string());
    run(&pipeline(
        cfg,
        TableLookup::new(&[("a.example", [10, 0, 0, 1])]),
        TableLookup::new(&[]),
    ))
    .await;

    let json: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&report_path).unwrap()).unwrap();
    assert_eq!(json["stats"]["total_rules"], 2);
    assert_eq!(json["domains"][0]["domain"], "a.example");
    assert_eq!(json["domains"][0]["state"], "resolved_a");
    assert_eq!(json["domains"][1]["state"], "unresolved");
}
