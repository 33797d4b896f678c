//! Integration tests for the extraction pipeline
//!
//! These tests use wiremock to serve result pages to the HTTP navigator and
//! run the full cycle end-to-end: open the listing URL, walk the pages,
//! extract records, and write the CSV file.

use job_listing_scraper::config::{validate, Backend, Config};
use job_listing_scraper::navigator::{HttpNavigator, Navigator};
use job_listing_scraper::output::{result_path, write_records};
use job_listing_scraper::{ListingRecord, Pipeline, RunRecorder, ScrapeError, Termination};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Creates a direct-URL, HTTP-backend configuration pointing at the mock server
fn create_test_config(base_url: &str, page_limit: u32) -> Config {
    let mut config = Config::default();
    config.run.page_limit = page_limit;
    config.run.direct_url = true;
    config.browser.backend = Backend::Http;
    config.browser.settle_delay_ms = 0;
    config.site.direct_url_template =
        format!("{}/list/kw{{keyword}}/?jobsearchType=14&searchType=18", base_url);
    config
}

fn listing(name: &str, salary: Option<&str>) -> String {
    let salary_row = salary
        .map(|s| format!("<tr><th>初年度年収</th><td>{}</td></tr>", s))
        .unwrap_or_default();
    format!(
        r#"<div class="cassetteRecruit">
            <h3 class="cassetteRecruit__name">{name}</h3>
            <p class="cassetteRecruit__copy">{name} is hiring</p>
            <span class="labelEmploymentStatus">正社員</span>
            <table><tr><th>勤務地</th><td>東京都</td></tr>{salary_row}</table>
        </div>"#
    )
}

/// A listing whose tagline is missing
fn listing_without_tagline(name: &str) -> String {
    format!(
        r#"<div class="cassetteRecruit">
            <h3 class="cassetteRecruit__name">{name}</h3>
            <span class="labelEmploymentStatus">契約社員</span>
            <table><tr><th>初年度年収</th><td>350万円</td></tr></table>
        </div>"#
    )
}

fn results_page(listings: &[String], next_href: Option<&str>) -> String {
    let next = next_href
        .map(|href| format!(r#"<a class="iconFont--arrowLeft" href="{}">次へ</a>"#, href))
        .unwrap_or_default();
    format!(
        "<html><head><title>求人一覧</title></head><body>{}{}</body></html>",
        listings.concat(),
        next
    )
}

async fn mount_page(server: &MockServer, page_path: &str, body: String) {
    Mock::given(method("GET"))
        .and(path(page_path))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(body)
                .insert_header("content-type", "text/html; charset=utf-8"),
        )
        .mount(server)
        .await;
}

/// Three result pages; the second one links back with an absolute path
async fn mount_three_pages(server: &MockServer) {
    mount_page(
        server,
        "/list/kwrust/",
        results_page(
            &[
                listing("株式会社アルファ", Some("400万円～600万円")),
                listing_without_tagline("Broken Inc."),
                listing("Beta LLC", None),
            ],
            Some("pg2/"),
        ),
    )
    .await;
    mount_page(
        server,
        "/list/kwrust/pg2/",
        results_page(&[listing("Gamma KK", Some("500万円"))], Some("/list/kwrust/pg3/")),
    )
    .await;
    mount_page(
        server,
        "/list/kwrust/pg3/",
        results_page(&[listing("Delta", None)], None),
    )
    .await;
}

async fn run_pipeline(
    config: Config,
    keyword: &str,
) -> (Result<job_listing_scraper::RunReport, ScrapeError>, RunRecorder) {
    validate(&config).expect("test config should be valid");
    let navigator = HttpNavigator::new(&config.browser).expect("Failed to build client");
    let mut pipeline = Pipeline::new(config, navigator).expect("Failed to build pipeline");
    let mut recorder = RunRecorder::new();

    let result = pipeline.run(keyword, &mut recorder).await;
    pipeline.navigator_mut().close().await.unwrap();
    (result, recorder)
}

fn names(records: &[ListingRecord]) -> Vec<&str> {
    records.iter().map(|r| r.company_name.as_str()).collect()
}

#[tokio::test]
async fn test_full_run_until_last_page() {
    let mock_server = MockServer::start().await;
    mount_three_pages(&mock_server).await;

    let config = create_test_config(&mock_server.uri(), 5);
    let (result, recorder) = run_pipeline(config, "rust").await;
    let report = result.expect("run should succeed");

    assert_eq!(report.termination, Termination::LastPage);
    assert_eq!(report.pages_visited, 3);
    assert_eq!(
        names(recorder.records()),
        vec!["株式会社アルファ", "Beta LLC", "Gamma KK", "Delta"]
    );

    let stats = recorder.stats();
    assert_eq!((stats.attempted, stats.succeeded, stats.failed), (5, 4, 1));
    assert!(stats.is_consistent());

    let first = &recorder.records()[0];
    assert_eq!(first.tagline, "株式会社アルファ is hiring");
    assert_eq!(first.employment_status, "正社員");
    assert_eq!(first.first_year_salary.as_deref(), Some("400万円～600万円"));
    assert_eq!(recorder.records()[1].first_year_salary, None);
}

#[tokio::test]
async fn test_page_limit_stops_with_next_link_present() {
    let mock_server = MockServer::start().await;
    mount_three_pages(&mock_server).await;

    let config = create_test_config(&mock_server.uri(), 1);
    let (result, recorder) = run_pipeline(config, "rust").await;
    let report = result.expect("run should succeed");

    assert_eq!(report.termination, Termination::PageLimit { limit: 1 });
    assert_eq!(names(recorder.records()), vec!["株式会社アルファ", "Beta LLC"]);
    let stats = recorder.stats();
    assert_eq!((stats.attempted, stats.succeeded, stats.failed), (3, 2, 1));

    // only the first page was requested
    let requests = mock_server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
}

#[tokio::test]
async fn test_failures_are_logged_with_name() {
    let mock_server = MockServer::start().await;
    mount_three_pages(&mock_server).await;

    let config = create_test_config(&mock_server.uri(), 1);
    let (_, recorder) = run_pipeline(config, "rust").await;

    let failure = recorder
        .lines()
        .iter()
        .find(|l| l.message.starts_with("[failure]"))
        .expect("failure should be logged");
    assert!(failure.message.contains("Broken Inc."));
    assert!(failure.to_string().starts_with("[log: "));
}

#[tokio::test]
async fn test_missing_page_is_fatal_but_keeps_records() {
    let mock_server = MockServer::start().await;
    mount_page(
        &mock_server,
        "/list/kwrust/",
        results_page(&[listing("Only One", None)], Some("/nowhere/")),
    )
    .await;

    let config = create_test_config(&mock_server.uri(), 5);
    let (result, recorder) = run_pipeline(config, "rust").await;

    assert!(matches!(result, Err(ScrapeError::Navigation(_))));
    assert_eq!(names(recorder.records()), vec!["Only One"]);
}

#[tokio::test]
async fn test_results_written_as_bom_csv() {
    let mock_server = MockServer::start().await;
    mount_three_pages(&mock_server).await;
    let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");

    let config = create_test_config(&mock_server.uri(), 5);
    let (result, recorder) = run_pipeline(config, "rust").await;
    result.expect("run should succeed");

    let csv_path = result_path(temp_dir.path(), "rust", "2024-01-02-03-04-05");
    assert!(csv_path.ends_with("exp_list_rust_2024-01-02-03-04-05.csv"));
    write_records(recorder.records(), &csv_path).expect("Failed to write CSV");

    let bytes = std::fs::read(&csv_path).unwrap();
    assert!(bytes.starts_with(b"\xEF\xBB\xBF"));

    let mut reader = csv::Reader::from_reader(&bytes[3..]);
    let headers = reader.headers().unwrap().clone();
    assert_eq!(
        headers.iter().collect::<Vec<_>>(),
        vec!["company_name", "tagline", "employment_status", "first_year_salary"]
    );

    let rows: Vec<csv::StringRecord> = reader.records().map(|r| r.unwrap()).collect();
    assert_eq!(rows.len(), 4);
    assert_eq!(&rows[0][0], "株式会社アルファ");
    assert_eq!(&rows[0][3], "400万円～600万円");
    assert_eq!(&rows[1][0], "Beta LLC");
    assert_eq!(&rows[1][3], "");
}

#[tokio::test]
async fn test_empty_run_writes_header_only() {
    let mock_server = MockServer::start().await;
    mount_page(&mock_server, "/list/kwnothing/", results_page(&[], None)).await;
    let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");

    let config = create_test_config(&mock_server.uri(), 5);
    let (result, recorder) = run_pipeline(config, "nothing").await;
    let report = result.expect("run should succeed");

    assert_eq!(report.termination, Termination::LastPage);
    assert_eq!(recorder.stats().attempted, 0);

    let csv_path = temp_dir.path().join("out.csv");
    write_records(recorder.records(), &csv_path).unwrap();
    let content = std::fs::read_to_string(&csv_path).unwrap();
    assert_eq!(
        content.trim_start_matches('\u{feff}').trim_end(),
        "company_name,tagline,employment_status,first_year_salary"
    );
}
