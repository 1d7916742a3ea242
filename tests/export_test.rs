//! CSV export tests

mod common;

use std::fs;
use tcscrape::models::Article;
use tcscrape::parser::ArticleParser;
use tcscrape::storage::{export_csv, read_csv, CSV_HEADER};
use tempfile::TempDir;

use common::LISTING_THREE_CARDS;

fn tricky_article() -> Article {
    Article::new(
        "TechCrunch",
        r#"Startup says "hello, world""#,
        "https://techcrunch.com/2024/01/01/hello-world/",
        "Doe, Jane",
        "2024-01-01 08:00",
    )
}

#[test]
fn test_round_trip_preserves_fields() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("articles.csv");

    let parser = ArticleParser::new("https://techcrunch.com", "TechCrunch").unwrap();
    let mut articles = parser.parse(LISTING_THREE_CARDS);
    articles.push(tricky_article());

    let rows = export_csv(&articles, &path).unwrap();
    assert_eq!(rows, 4);

    let restored = read_csv(&path).unwrap();
    assert_eq!(restored, articles);
}

#[test]
fn test_header_matches_schema() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("articles.csv");

    export_csv(&[tricky_article()], &path).unwrap();

    let content = fs::read_to_string(&path).unwrap();
    let header = content.lines().next().unwrap();
    assert_eq!(header, CSV_HEADER.join(","));
    assert_eq!(
        header,
        "source,title,url,author,publish_time,hash,category,excerpt,scraped_at"
    );
}

#[test]
fn test_fields_with_delimiters_are_quoted() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("articles.csv");

    export_csv(&[tricky_article()], &path).unwrap();

    let content = fs::read_to_string(&path).unwrap();
    assert!(content.contains(r#""Startup says ""hello, world""""#));
    assert!(content.contains(r#""Doe, Jane""#));
}

#[test]
fn test_rows_follow_input_order() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("articles.csv");

    let articles: Vec<_> = ["c", "a", "b"]
        .iter()
        .map(|t| Article::new("TechCrunch", *t, "", "", ""))
        .collect();
    export_csv(&articles, &path).unwrap();

    let restored: Vec<_> = read_csv(&path)
        .unwrap()
        .into_iter()
        .map(|a| a.title)
        .collect();
    assert_eq!(restored, vec!["c", "a", "b"]);
}

#[test]
fn test_export_replaces_existing_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("articles.csv");
    fs::write(&path, "stale content\n").unwrap();

    export_csv(&[], &path).unwrap();

    let content = fs::read_to_string(&path).unwrap();
    assert!(!content.contains("stale"));
    assert!(read_csv(&path).unwrap().is_empty());
}

#[test]
fn test_export_to_unwritable_path_fails() {
    let dir = TempDir::new().unwrap();
    let blocker = dir.path().join("not-a-dir");
    fs::write(&blocker, "").unwrap();

    let result = export_csv(&[tricky_article()], blocker.join("articles.csv"));
    assert!(result.is_err());
}
