use std::fs;

use matcher::{Candidate, CandidateScore, DocumentView, Matcher};
use perceptual::signature_for_document;
use tempfile::TempDir;
use webclone::{
    Cluster, Document, FusionConfig, PerceptualConfig, WebcloneConfig, cluster_documents, load_html_dir,
    merge_overlapping, write_report,
};

const LAYOUT: [&str; 8] = ["html:1", "head:2", "title:3", "body:2", "div:3", "ul:4", "li:5", "li:5"];
const COPY: [&str; 6] = ["summer", "sale", "shoe", "discount", "free", "ship"];

fn page(id: &str, classes: &[&str]) -> Document {
    Document::new(id)
        .with_structure_tokens(LAYOUT)
        .with_classes(classes.iter().copied())
        .with_text_tokens(COPY)
}

fn unrelated(id: &str, classes: &[&str]) -> Document {
    Document::new(id)
        .with_structure_tokens(["html:1", "body:2", "table:3", "tr:4", "td:5", "td:5", "form:3", "input:4"])
        .with_classes(classes.iter().copied())
        .with_text_tokens(["quarterly", "earnings", "report", "investor", "relations"])
}

fn members(clusters: &[Cluster]) -> Vec<Vec<&str>> {
    clusters
        .iter()
        .map(|c| c.members().iter().map(String::as_str).collect())
        .collect()
}

#[test]
fn disjoint_class_sets_match_through_fallback() {
    let mut config = WebcloneConfig::default();
    config.matcher = config.matcher.with_exhaustive_fallback(true);

    let docs = vec![
        page("A", &["alpha", "hero"]),
        page("B", &["beta", "banner"]),
        unrelated("C", &["gamma"]),
    ];
    let run = cluster_documents(docs, &config).unwrap();

    assert_eq!(members(&run.clusters), vec![vec!["A", "B"], vec!["C"]]);
    assert_eq!(run.stats.matched_pairs, 1);
}

#[test]
fn disjoint_class_sets_stay_apart_without_fallback() {
    let docs = vec![
        page("A", &["alpha", "hero"]),
        page("B", &["beta", "banner"]),
        unrelated("C", &["gamma"]),
    ];
    let run = cluster_documents(docs, &WebcloneConfig::default()).unwrap();

    assert_eq!(members(&run.clusters), vec![vec!["A"], vec!["B"], vec!["C"]]);
    assert_eq!(run.stats.singletons, 3);
}

fn layout_page(id: &str, structure: &[&str]) -> Document {
    Document::new(id)
        .with_structure_tokens(structure.iter().copied())
        .with_classes(["nav", "hero"])
        .with_text_tokens(COPY)
}

fn score(matcher: &Matcher, target: &Document, candidate: &Document) -> CandidateScore {
    let cfg = PerceptualConfig::default();
    let target_sig = signature_for_document(target, &cfg).unwrap();
    let candidate_sig = signature_for_document(candidate, &cfg).unwrap();
    matcher.score_pair(
        DocumentView::new(target, &target_sig),
        Candidate::lsh(DocumentView::new(candidate, &candidate_sig)),
    )
}

#[test]
fn bridge_page_chains_two_non_matching_pages() {
    // B's structure bag holds both A's and C's token, so its fingerprint keeps
    // only the bits A and C agree on and sits between them.
    let matcher = Matcher::new(FusionConfig::default()).unwrap();
    let tokens: Vec<String> = (0..40).map(|i| format!("section:{i}")).collect();
    let mut bridged = None;
    'search: for (i, p) in tokens.iter().enumerate() {
        for q in &tokens[i + 1..] {
            let a = layout_page("A", &[p.as_str()]);
            let b = layout_page("B", &[p.as_str(), q.as_str()]);
            let c = layout_page("C", &[q.as_str()]);
            if score(&matcher, &b, &a).is_match
                && score(&matcher, &c, &b).is_match
                && !score(&matcher, &c, &a).is_match
            {
                bridged = Some((p.as_str(), q.as_str()));
                break 'search;
            }
        }
    }
    let (p, q) = bridged.expect("some token pair is far apart yet bridged by their union");

    let a = layout_page("A", &[p]);
    let c = layout_page("C", &[q]);
    let direct = score(&matcher, &c, &a);
    assert!(direct.gated, "A-C structure similarity {}", direct.signals.structure_sim);
    assert!(direct.signals.structure_sim < 0.65);

    let docs = vec![a, layout_page("B", &[p, q]), c, unrelated("D", &["ledger"])];
    let run = cluster_documents(docs, &WebcloneConfig::default()).unwrap();

    assert_eq!(members(&run.clusters), vec![vec!["A", "B", "C"], vec!["D"]]);
    // A-B, B-A, B-C, C-B
    assert_eq!(run.stats.matched_pairs, 4);
}

#[test]
fn identical_pages_always_collide() {
    let docs: Vec<Document> = (0..25)
        .map(|i| page(&format!("mirror{i:02}"), &["nav", "hero", "cta", "footer"]))
        .collect();
    let run = cluster_documents(docs, &WebcloneConfig::default()).unwrap();

    assert_eq!(run.clusters.len(), 1);
    assert_eq!(run.clusters[0].len(), 25);
}

#[test]
fn every_document_is_clustered_exactly_once() {
    let mut docs = Vec::new();
    for i in 0..30 {
        let id = format!("site{i:02}");
        let doc = match i % 3 {
            0 => page(&id, &["nav", "hero"]),
            1 => unrelated(&id, &["grid", "table"]),
            _ => {
                let own = format!("unique{i}");
                page(&id, &[own.as_str()])
            }
        };
        docs.push(doc);
    }
    let run = cluster_documents(docs, &WebcloneConfig::default()).unwrap();

    let mut ids: Vec<&str> = run
        .clusters
        .iter()
        .flat_map(|c| c.members().iter().map(String::as_str))
        .collect();
    assert_eq!(ids.len(), 30);
    ids.sort_unstable();
    ids.dedup();
    assert_eq!(ids.len(), 30);
}

#[test]
fn merging_final_clusters_changes_nothing() {
    let mut config = WebcloneConfig::default();
    config.cluster = config.cluster.with_link_bridges(true);
    config.matcher = config.matcher.with_exhaustive_fallback(true);

    let docs: Vec<Document> = (0..12)
        .map(|i| {
            let id = format!("p{i}");
            let own = format!("own{i}");
            match i % 4 {
                0 | 1 => page(&id, &["shared"]),
                2 => page(&id, &[own.as_str()]),
                _ => unrelated(&id, &["other"]),
            }
        })
        .collect();
    let run = cluster_documents(docs, &config).unwrap();

    assert_eq!(merge_overlapping(run.clusters.clone()), run.clusters);
}

#[test]
fn html_directory_to_report() {
    let input = TempDir::new().unwrap();
    let output = TempDir::new().unwrap();

    let shop = r#"<!DOCTYPE html>
<html><head><title>Shoe Shop</title></head>
<body>
  <div class="nav top"><a class="link" href="/">Home</a></div>
  <div class="hero"><h1>Summer sale on running shoes</h1><p class="cta">Free shipping today</p></div>
  <ul class="products"><li class="item">Trail runner</li><li class="item">Road racer</li></ul>
</body></html>"#;
    let blog = r#"<html><body>
  <article class="post"><h2>Quarterly earnings</h2>
  <table class="figures"><tr><td>Revenue</td><td>Up</td></tr></table></article>
  <form class="subscribe"><input name="email"></form>
</body></html>"#;

    fs::write(input.path().join("clone_a.html"), shop).unwrap();
    fs::write(input.path().join("clone_b.html"), shop).unwrap();
    fs::write(input.path().join("empty.html"), "").unwrap();
    fs::write(input.path().join("other.htm"), blog).unwrap();
    fs::write(input.path().join("readme.md"), "# not a page").unwrap();

    let config = WebcloneConfig::default();
    let corpus = load_html_dir(input.path(), &config.extract).unwrap();
    assert_eq!(corpus.len(), 3);
    assert_eq!(corpus.failures.len(), 1);
    assert!(corpus.failures[0].path.ends_with("empty.html"));

    let run = cluster_documents(corpus.documents, &config).unwrap();
    assert_eq!(run.clusters.len(), 2);

    let report_dir = output.path().join("clusters");
    let files = write_report(&run.clusters, &report_dir, Some(input.path())).unwrap();
    assert_eq!(files.len(), 2);

    let first = fs::read_to_string(report_dir.join("cluster_001.txt")).unwrap();
    let expected = format!(
        "Cluster 1 (2 documents)\n{}\n- clone_a.html\n- clone_b.html\n",
        "=".repeat(40)
    );
    assert_eq!(first, expected);

    let second = fs::read_to_string(report_dir.join("cluster_002.txt")).unwrap();
    assert!(second.starts_with("Cluster 2 (1 documents)\n"));
    assert!(second.ends_with("- other.htm\n"));
}
