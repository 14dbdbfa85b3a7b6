//! Integration tests for the skillscope pipeline

use skillscope::catalog::{SkillCatalog, SkillCatalogEntry, SkillCategory};
use skillscope::config::{ClusteringModeKind, Config};
use skillscope::input::InputManager;
use skillscope::output::formatter::ReportGenerator;
use skillscope::output::report::{ClusterReport, Report};
use skillscope::processing::clustering::NOISE_LABEL;
use skillscope::processing::recommender::RecommendationOutcome;
use skillscope::{Document, MatchStrategy, SkillPipeline, SkillScopeError, UserProfile, WarningKind};
use std::collections::BTreeSet;
use std::sync::Arc;

fn four_skill_catalog() -> Arc<SkillCatalog> {
    Arc::new(
        SkillCatalog::new(vec![
            SkillCatalogEntry::new("Python", SkillCategory::Languages, Vec::<String>::new()),
            SkillCatalogEntry::new("Django", SkillCategory::Backend, Vec::<String>::new()),
            SkillCatalogEntry::new("PostgreSQL", SkillCategory::Databases, Vec::<String>::new()),
            SkillCatalogEntry::new("Docker", SkillCategory::CloudDevops, Vec::<String>::new()),
        ])
        .unwrap(),
    )
}

fn fixed_k(k: usize) -> Config {
    let mut config = Config::default();
    config.clustering.k = k;
    config
}

fn postings() -> Vec<Document> {
    [
        "Python Django PostgreSQL",
        "Python Django Redis",
        "Python Flask PostgreSQL",
        "Django REST API and Python",
        "React TypeScript CSS",
        "React Redux TypeScript",
        "Angular TypeScript HTML",
        "Docker Kubernetes Terraform",
        "Kubernetes Helm Docker",
        "Terraform AWS Docker",
    ]
    .iter()
    .enumerate()
    .map(|(i, text)| Document::new(format!("job{:02}", i), *text))
    .collect()
}

#[tokio::test]
async fn test_end_to_end_scenario() {
    let pipeline = SkillPipeline::with_catalog(fixed_k(1), four_skill_catalog()).unwrap();
    let doc = Document::new(
        "d1",
        "Senior Python Developer. Requirements: Python, Django, PostgreSQL, Docker.",
    );

    let run = pipeline.run(vec![doc]).await.unwrap();
    let skills = &run.documents[0].skills;
    assert_eq!(skills.len(), 4);
    assert!(skills
        .iter()
        .all(|s| s.weight == 1.0 && s.match_strategy == MatchStrategy::Exact));
    let sections: BTreeSet<&str> = skills.iter().map(|s| s.matched_section.as_str()).collect();
    assert_eq!(sections.len(), 1);

    let user = UserProfile::new(["python"], None);
    let report = pipeline.recommend(&user).unwrap();
    let names: BTreeSet<&str> = report
        .recommendations
        .iter()
        .map(|r| r.skill_name.as_str())
        .collect();
    assert_eq!(names, BTreeSet::from(["django", "postgresql", "docker"]));
    assert_eq!(report.outcome, RecommendationOutcome::Recommendations);
    assert!((report.gap.gap_percentage - 75.0).abs() < 1e-4);
    assert_eq!(report.gap.priorities.len(), 3);

    let paired: Vec<String> = pipeline
        .complementary(&user, &run.documents)
        .into_iter()
        .map(|c| c.skill_name)
        .collect();
    assert_eq!(paired, vec!["django", "docker", "postgresql"]);
}

#[tokio::test]
async fn test_fixed_k_assigns_every_posting() {
    let pipeline = SkillPipeline::new(fixed_k(3)).unwrap();
    let run = pipeline.run(postings()).await.unwrap();

    assert_eq!(run.clusters.assignments.len(), 10);
    assert!(run
        .clusters
        .assignments
        .values()
        .all(|a| (0..3).contains(&a.cluster_label)));
    assert_eq!(run.snapshot.profiles.len(), 3);

    let members: usize = run.snapshot.profiles.values().map(|p| p.member_count).sum();
    assert_eq!(members, 10);
    assert_eq!(run.snapshot.corpus.skill_frequency["python"], 4);
}

#[tokio::test]
async fn test_k_larger_than_corpus_is_rejected() {
    let pipeline = SkillPipeline::new(fixed_k(20)).unwrap();
    let result = pipeline.run(postings()).await;
    assert!(matches!(result, Err(SkillScopeError::Configuration(_))));
}

#[tokio::test]
async fn test_density_mode_all_noise() {
    let mut config = Config::default();
    config.clustering.mode = ClusteringModeKind::Density;
    config.clustering.min_cluster_size = 5;

    let pipeline = SkillPipeline::new(config).unwrap();
    let documents: Vec<Document> = ["Rust", "Kotlin", "Tableau", "Jenkins", "MongoDB"]
        .iter()
        .enumerate()
        .map(|(i, text)| Document::new(format!("n{}", i), *text))
        .collect();

    let run = pipeline.run(documents).await.unwrap();
    assert!(run
        .clusters
        .assignments
        .values()
        .all(|a| a.cluster_label == NOISE_LABEL));
    assert_eq!(run.clusters.cluster_count, 0);
    assert!(run.snapshot.profiles.is_empty());

    let report = pipeline.recommend(&UserProfile::new(["rust"], None)).unwrap();
    assert_eq!(report.outcome, RecommendationOutcome::NoData);
    assert!(report.recommendations.is_empty());
    assert_eq!(report.gap.gap_percentage, 0.0);
}

#[tokio::test]
async fn test_recommendations_exclude_known_skills() {
    let pipeline = SkillPipeline::new(fixed_k(3)).unwrap();
    pipeline.run(postings()).await.unwrap();

    let user = UserProfile::from_raw_skills(pipeline.catalog(), ["Python", "Docker"], None);
    let report = pipeline.recommend(&user).unwrap();

    assert!(!report.recommendations.is_empty());
    assert!(report
        .recommendations
        .iter()
        .all(|r| r.skill_name != "python" && r.skill_name != "docker"));
    assert!(report
        .recommendations
        .windows(2)
        .all(|w| w[0].priority >= w[1].priority));
    assert!((0.0..=100.0).contains(&report.gap.gap_percentage));

    let alignments = pipeline.align(&user);
    assert_eq!(alignments.len(), 3);
    assert!(alignments[0].alignment_percentage >= alignments[2].alignment_percentage);
}

#[tokio::test]
async fn test_unknown_target_cluster_is_rejected() {
    let pipeline = SkillPipeline::new(fixed_k(3)).unwrap();
    pipeline.run(postings()).await.unwrap();

    let user = UserProfile::new(["python"], Some(42));
    assert!(matches!(
        pipeline.recommend(&user),
        Err(SkillScopeError::Configuration(_))
    ));
}

#[tokio::test]
async fn test_empty_corpus_has_no_data() {
    let pipeline = SkillPipeline::new(fixed_k(3)).unwrap();
    let run = pipeline.run(Vec::new()).await.unwrap();
    assert!(run.clusters.assignments.is_empty());

    let report = pipeline.recommend(&UserProfile::default()).unwrap();
    assert_eq!(report.outcome, RecommendationOutcome::NoData);
}

#[tokio::test]
async fn test_batched_extraction_keeps_order() {
    let mut config = Config::default();
    config.extraction.batch_size = 3;
    let pipeline = SkillPipeline::new(config).unwrap();

    let mut documents = postings();
    documents.push(Document::new("blank", ""));
    let extracted = pipeline.extract_corpus(documents.clone()).await.unwrap();

    let expected: Vec<&str> = documents.iter().map(|d| d.id.as_str()).collect();
    let actual: Vec<&str> = extracted.iter().map(|d| d.document_id.as_str()).collect();
    assert_eq!(actual, expected);
    assert_eq!(extracted.last().unwrap().warnings[0].kind, WarningKind::EmptyText);
}

#[tokio::test]
async fn test_load_documents_from_directory() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(
        dir.path().join("batch.json"),
        r#"[{"id":"a","raw_text":"Rust and PostgreSQL"},{"id":"b","raw_text":"Kotlin","section_texts":{"requirements":"Spring Boot"}}]"#,
    )
    .unwrap();
    std::fs::write(
        dir.path().join("posting.txt"),
        "Data Engineer\nRequirements:\nSpark, Airflow\nDescription: nice office near the sea",
    )
    .unwrap();
    std::fs::write(dir.path().join("notes.xyz"), "ignored").unwrap();

    let documents = InputManager::new()
        .with_section_detection(true)
        .load_documents(dir.path())
        .await
        .unwrap();
    let ids: Vec<&str> = documents.iter().map(|d| d.id.as_str()).collect();
    assert_eq!(ids, vec!["a", "b", "posting"]);
    assert!(documents[2].section_texts.contains_key("requirements"));

    let pipeline = SkillPipeline::new(fixed_k(2)).unwrap();
    let run = pipeline.run(documents).await.unwrap();

    let posting = run.documents.iter().find(|d| d.document_id == "posting").unwrap();
    let spark = posting.skills.iter().find(|s| s.skill_name == "spark").unwrap();
    assert_eq!(spark.matched_section, "requirements");
    assert_eq!(posting.title.as_deref(), Some("Data Engineer"));

    let report = Report::Clusters(ClusterReport::from_run(&run));
    let json = ReportGenerator::new()
        .generate_report(&report, &skillscope::config::OutputFormat::Json)
        .unwrap();
    assert!(json.contains("\"report\": \"clusters\""));
}

#[tokio::test]
async fn test_missing_input_is_rejected() {
    let result = InputManager::new()
        .load_documents(std::path::Path::new("does/not/exist.json"))
        .await;
    assert!(matches!(result, Err(SkillScopeError::InvalidInput(_))));
}

#[tokio::test]
async fn test_pipeline_runs_on_spawned_task() {
    let pipeline = Arc::new(SkillPipeline::new(fixed_k(3)).unwrap());
    let worker = Arc::clone(&pipeline);
    let run = tokio::spawn(async move { worker.run(postings()).await })
        .await
        .unwrap()
        .unwrap();

    assert_eq!(run.clusters.assignments.len(), 10);
    assert_eq!(pipeline.snapshot().document_count, 10);
}
