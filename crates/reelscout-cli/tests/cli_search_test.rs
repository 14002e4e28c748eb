#![allow(clippy::unwrap_used)]
#![allow(missing_docs)]

use std::path::Path;

use assert_cmd::cargo_bin_cmd;
use predicates::prelude::predicate;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn reelscout(dir: &Path) -> assert_cmd::Command {
    let mut cmd = cargo_bin_cmd!("reelscout");
    cmd.arg("--dir")
        .arg(dir)
        .env("RUST_LOG", "info")
        .env("NO_COLOR", "1")
        .env("TMDB_API_TOKEN", "test-token");
    cmd
}

/// Points the config in `dir` at the mock server.
fn write_config(dir: &Path, server: &MockServer) {
    let config = format!(
        "[tmdb]\nbase_url = \"{}/3/\"\nmin_interval_ms = 0\n",
        server.uri()
    );
    std::fs::write(dir.join("config.toml"), config).unwrap();
}

fn stdout_of(cmd: &mut assert_cmd::Command) -> String {
    let output = cmd.assert().success().get_output().stdout.clone();
    String::from_utf8(output).unwrap()
}

fn position(haystack: &str, needle: &str) -> usize {
    haystack.find(needle).unwrap()
}

#[test]
fn test_search_movies_help() {
    // Arrange & Act & Assert
    let mut cmd = cargo_bin_cmd!("reelscout");
    cmd.args(["search", "movies", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--sort-by"))
        .stdout(predicate::str::contains("--genre"));
}

#[test]
fn test_search_people_missing_query() {
    // Arrange & Act & Assert
    let mut cmd = cargo_bin_cmd!("reelscout");
    cmd.args(["search", "people"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--query"));
}

#[test]
fn test_search_movies_invalid_sort_key() {
    // Arrange
    let dir = tempfile::tempdir().unwrap();

    // Act & Assert
    reelscout(dir.path())
        .args(["search", "movies", "--query", "heat", "--sort-by", "age"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid movie sort key: age"));
}

#[test]
fn test_search_people_invalid_order() {
    // Arrange
    let dir = tempfile::tempdir().unwrap();

    // Act & Assert
    reelscout(dir.path())
        .args(["search", "people", "--query", "tom", "--order", "sideways"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid sort order"));
}

#[test]
fn test_search_requires_api_token() {
    // Arrange
    let dir = tempfile::tempdir().unwrap();

    // Act & Assert
    reelscout(dir.path())
        .env_remove("TMDB_API_TOKEN")
        .args(["search", "movies", "--query", "heat"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("TMDB_API_TOKEN"));
}

#[tokio::test]
async fn test_search_movies_filters_by_genre_and_sorts() {
    // Arrange
    let server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();
    write_config(dir.path(), &server);
    Mock::given(method("GET"))
        .and(path("/3/search/movie"))
        .and(query_param("query", "heat"))
        .and(query_param("page", "1"))
        .and(header("Authorization", "Bearer test-token"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(
            include_str!("../../../fixtures/tmdb/search_movie_heat.json"),
            "application/json",
        ))
        .expect(1)
        .mount(&server)
        .await;

    // Act
    let stdout = stdout_of(reelscout(dir.path()).args([
        "search", "movies", "--query", " heat ", "--genre", "80", "--sort-by", "title",
        "--order", "asc",
    ]));

    // Assert
    assert!(stdout.contains("Page 1/3 (52 results)"));
    assert!(stdout.contains("949\tHeat\t1995-12-15\t7.9"));
    assert!(stdout.contains("156022\tThe Heat"));
    assert!(!stdout.contains("Heat Wave"));
    assert!(!stdout.contains("10473"));
    assert!(position(&stdout, "949\t") < position(&stdout, "156022\t"));
    assert!(stdout.contains("Shown: 2 of 4 on this page"));
}

#[tokio::test]
async fn test_search_movies_empty_release_date_sorts_last() {
    // Arrange
    let server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();
    write_config(dir.path(), &server);
    Mock::given(method("GET"))
        .and(path("/3/search/movie"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(
            include_str!("../../../fixtures/tmdb/search_movie_heat.json"),
            "application/json",
        ))
        .mount(&server)
        .await;

    // Act
    let stdout = stdout_of(reelscout(dir.path()).args([
        "search",
        "movies",
        "--query",
        "heat",
        "--sort-by",
        "release_date",
        "--order",
        "desc",
    ]));

    // Assert
    assert!(position(&stdout, "156022\t") < position(&stdout, "949\t"));
    assert!(position(&stdout, "949\t") < position(&stdout, "10473\t"));
    assert!(position(&stdout, "10473\t") < position(&stdout, "888001\t"));
    assert!(stdout.contains("888001\tHeat Wave\t-"));
}

#[tokio::test]
async fn test_search_movies_title_sort_defaults_to_ascending() {
    // Arrange
    let server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();
    write_config(dir.path(), &server);
    Mock::given(method("GET"))
        .and(path("/3/search/movie"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(
            include_str!("../../../fixtures/tmdb/search_movie_heat.json"),
            "application/json",
        ))
        .mount(&server)
        .await;

    // Act
    let stdout = stdout_of(reelscout(dir.path()).args([
        "search", "movies", "--query", "heat", "--sort-by", "title",
    ]));

    // Assert
    assert!(position(&stdout, "949\t") < position(&stdout, "888001\t"));
    assert!(position(&stdout, "888001\t") < position(&stdout, "156022\t"));
}

#[tokio::test]
async fn test_search_movies_api_error() {
    // Arrange
    let server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();
    write_config(dir.path(), &server);
    Mock::given(method("GET"))
        .and(path("/3/search/movie"))
        .respond_with(ResponseTemplate::new(401).set_body_raw(
            r#"{"status_code":7,"status_message":"Invalid API key","success":false}"#,
            "application/json",
        ))
        .mount(&server)
        .await;

    // Act & Assert
    reelscout(dir.path())
        .args(["search", "movies", "--query", "heat"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to search movies"))
        .stderr(predicate::str::contains("Invalid API key"));
}

#[tokio::test]
async fn test_search_people_by_age_restricts_to_actors() {
    // Arrange
    let server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();
    write_config(dir.path(), &server);
    Mock::given(method("GET"))
        .and(path("/3/search/person"))
        .and(query_param("query", "tom"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(
            include_str!("../../../fixtures/tmdb/search_person_tom.json"),
            "application/json",
        ))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/3/person/31"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(
            include_str!("../../../fixtures/tmdb/person_details_31.json"),
            "application/json",
        ))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/3/person/500"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(
            r#"{"id":500,"name":"Tom Cruise","birthday":"1962-07-03"}"#,
            "application/json",
        ))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/3/person/2524"))
        .respond_with(ResponseTemplate::new(404).set_body_raw(
            r#"{"status_code":34,"status_message":"The resource you requested could not be found.","success":false}"#,
            "application/json",
        ))
        .expect(1)
        .mount(&server)
        .await;

    // Act
    let stdout = stdout_of(reelscout(dir.path()).args([
        "search", "people", "--query", "tom", "--sort-by", "age", "--order", "desc",
    ]));

    // Assert
    assert!(stdout.contains("Page 1/12 (231 results)"));
    assert!(position(&stdout, "31\tTom Hanks") < position(&stdout, "500\tTom Cruise"));
    assert!(position(&stdout, "500\tTom Cruise") < position(&stdout, "2524\tTom Hardy"));
    assert!(!stdout.contains("Tom Tykwer"));
    assert!(stdout.contains("Shown: 3 of 5 on this page"));
}

#[tokio::test]
async fn test_search_people_without_age_sort_skips_details() {
    // Arrange
    let server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();
    write_config(dir.path(), &server);
    Mock::given(method("GET"))
        .and(path("/3/search/person"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(
            include_str!("../../../fixtures/tmdb/search_person_tom.json"),
            "application/json",
        ))
        .mount(&server)
        .await;

    // Act
    let stdout = stdout_of(reelscout(dir.path()).args([
        "search",
        "people",
        "--query",
        "tom",
        "--sort-by",
        "movie_count",
    ]));

    // Assert
    assert!(position(&stdout, "2524\tTom Hardy") < position(&stdout, "31\tTom Hanks"));
    assert!(position(&stdout, "31\tTom Hanks") < position(&stdout, "500\tTom Cruise"));
    let requests = server.received_requests().await.unwrap();
    assert!(
        requests
            .iter()
            .all(|r| !r.url.path().starts_with("/3/person/"))
    );
}

#[tokio::test]
async fn test_person_details_and_credits() {
    // Arrange
    let server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();
    write_config(dir.path(), &server);
    Mock::given(method("GET"))
        .and(path("/3/person/31"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(
            include_str!("../../../fixtures/tmdb/person_details_31.json"),
            "application/json",
        ))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/3/person/31/movie_credits"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(
            include_str!("../../../fixtures/tmdb/person_movie_credits_31.json"),
            "application/json",
        ))
        .mount(&server)
        .await;

    // Act & Assert
    reelscout(dir.path())
        .args(["person", "--id", "31"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Name: Tom Hanks"))
        .stdout(predicate::str::contains("Birthday: 1956-07-09"))
        .stdout(predicate::str::contains("Forrest Gump"));
}

#[tokio::test]
async fn test_genres_listed() {
    // Arrange
    let server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();
    write_config(dir.path(), &server);
    Mock::given(method("GET"))
        .and(path("/3/genre/movie/list"))
        .and(query_param("language", "en-US"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(
            include_str!("../../../fixtures/tmdb/genre_movie_list.json"),
            "application/json",
        ))
        .mount(&server)
        .await;

    // Act & Assert
    reelscout(dir.path())
        .arg("genres")
        .assert()
        .success()
        .stdout(predicate::str::contains("80\tCrime"))
        .stdout(predicate::str::contains("28\tAction"));
}
