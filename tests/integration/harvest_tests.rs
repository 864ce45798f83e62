use bilingual_harvest::config::{Config, PairingMode};
use bilingual_harvest::crawler::{harvest, plan, HttpClient};
use bilingual_harvest::output::read_records;
use bilingual_harvest::{BilingualRecord, HarvestError};
use std::sync::Arc;
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const EN_TEXT: &str = "The Welsh Government has announced new funding for schools in Cardiff. \
    The money will be used to improve buildings and support teachers across the region.";
const CY_TEXT: &str = "Mae Llywodraeth Cymru wedi cyhoeddi cyllid newydd ar gyfer ysgolion yng \
    Nghaerdydd. Bydd yr arian yn cael ei ddefnyddio i wella adeiladau a chefnogi athrawon ar \
    draws y rhanbarth.";

/// Creates a fast test configuration pointing at the mock server
fn create_test_config(base_url: &str, output: &TempDir) -> Config {
    let mut config = Config::default();

    config.scraper.workers = 4;
    config.scraper.request_delay_ms = 0;
    config.scraper.max_retries = 1;
    config.scraper.backoff_base_ms = 1;
    config.scraper.backoff_max_ms = 5;
    config.scraper.timeout_secs = 5;

    config.sitemap.root_url = format!("{}/sitemap.xml", base_url);

    config.output.directory = output.path().to_string_lossy().into_owned();
    config.output.filename = "english_welsh_pairs.jsonl".to_string();

    config
}

fn page_html(text: &str) -> String {
    format!(
        r#"<html>
<head><title>Page</title></head>
<body>
    <header><a class="language-link" href="/cy/">Cymraeg</a></header>
    <nav><ul><li><a href="/">Home</a></li><li><a href="/news">News</a></li></ul></nav>
    <main><p>{}</p></main>
    <footer>Crown copyright</footer>
</body>
</html>"#,
        text
    )
}

fn urlset(base_url: &str, paths: &[&str]) -> String {
    let entries: String = paths
        .iter()
        .map(|p| format!("<url><loc>{}{}</loc></url>", base_url, p))
        .collect();
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">{}</urlset>"#,
        entries
    )
}

fn sitemap_index(base_url: &str, paths: &[&str]) -> String {
    let entries: String = paths
        .iter()
        .map(|p| format!("<sitemap><loc>{}{}</loc></sitemap>", base_url, p))
        .collect();
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<sitemapindex xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">{}</sitemapindex>"#,
        entries
    )
}

async fn mount(server: &MockServer, at: &str, status: u16, body: String) {
    Mock::given(method("GET"))
        .and(path(at))
        .respond_with(ResponseTemplate::new(status).set_body_string(body))
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_end_to_end_single_pair() {
    let server = MockServer::start().await;
    let base_url = server.uri();
    let output = TempDir::new().unwrap();

    mount(
        &server,
        "/sitemap.xml",
        200,
        sitemap_index(&base_url, &["/sitemap-pages.xml"]),
    )
    .await;
    mount(
        &server,
        "/sitemap-pages.xml",
        200,
        urlset(
            &base_url,
            &["/en/page-1", "/cy/page-1", "/en/english-only", "/about"],
        ),
    )
    .await;
    mount(&server, "/en/page-1", 200, page_html(EN_TEXT)).await;
    mount(&server, "/cy/page-1", 200, page_html(CY_TEXT)).await;

    let config = create_test_config(&base_url, &output);
    let stats = harvest(&config).await.unwrap();

    assert_eq!(stats.urls_discovered, 4);
    assert_eq!(stats.pairs_total, 1);
    assert_eq!(stats.accepted, 1);
    assert_eq!(stats.records_written, 1);

    let records = read_records(&config.output.path()).await.unwrap();
    assert_eq!(
        records,
        vec![BilingualRecord::new(
            EN_TEXT,
            CY_TEXT,
            format!("{}/en/page-1", base_url)
        )]
    );

    // Unpaired pages are never fetched
    let requests = server.received_requests().await.unwrap();
    assert!(requests
        .iter()
        .all(|r| r.url.path() != "/en/english-only" && r.url.path() != "/about"));
}

#[tokio::test]
async fn test_concurrent_run_writes_only_passing_pairs() {
    let server = MockServer::start().await;
    let base_url = server.uri();
    let output = TempDir::new().unwrap();

    let mut paths = Vec::new();
    let mut expected = 0;
    for n in 0..30 {
        let en_path = format!("/en/item-{}", n);
        let cy_path = format!("/cy/item-{}", n);

        match n % 3 {
            // Good pair
            0 => {
                mount(&server, &en_path, 200, page_html(EN_TEXT)).await;
                mount(&server, &cy_path, 200, page_html(CY_TEXT)).await;
                expected += 1;
            }
            // Welsh page missing
            1 => {
                mount(&server, &en_path, 200, page_html(EN_TEXT)).await;
                mount(&server, &cy_path, 404, String::new()).await;
            }
            // Welsh page left in English
            _ => {
                mount(&server, &en_path, 200, page_html(EN_TEXT)).await;
                mount(&server, &cy_path, 200, page_html(EN_TEXT)).await;
            }
        }

        paths.push(en_path);
        paths.push(cy_path);
    }

    let path_refs: Vec<&str> = paths.iter().map(String::as_str).collect();
    mount(&server, "/sitemap.xml", 200, urlset(&base_url, &path_refs)).await;

    let mut config = create_test_config(&base_url, &output);
    config.scraper.workers = 8;
    let stats = harvest(&config).await.unwrap();

    assert_eq!(stats.pairs_total, 30);
    assert_eq!(stats.accepted, expected);
    assert_eq!(stats.fetch_failed, 10);
    assert_eq!(stats.rejected_total(), 10);

    // Every line must parse on its own
    let content = std::fs::read_to_string(config.output.path()).unwrap();
    let lines: Vec<&str> = content.lines().collect();
    assert_eq!(lines.len() as u64, expected);
    for line in lines {
        let record: BilingualRecord = serde_json::from_str(line).unwrap();
        assert_eq!(record.en, EN_TEXT);
        assert_eq!(record.cy, CY_TEXT);
    }
}

#[tokio::test]
async fn test_unreachable_root_sitemap_is_fatal() {
    let server = MockServer::start().await;
    let output = TempDir::new().unwrap();

    mount(&server, "/sitemap.xml", 500, String::new()).await;

    let config = create_test_config(&server.uri(), &output);
    let result = harvest(&config).await;

    assert!(matches!(
        result,
        Err(HarvestError::HttpStatus { status: 500, .. })
    ));
    assert!(!config.output.path().exists());
}

#[tokio::test]
async fn test_failing_child_sitemap_is_skipped() {
    let server = MockServer::start().await;
    let base_url = server.uri();
    let output = TempDir::new().unwrap();

    mount(
        &server,
        "/sitemap.xml",
        200,
        sitemap_index(&base_url, &["/sitemap-broken.xml", "/sitemap-pages.xml"]),
    )
    .await;
    mount(&server, "/sitemap-broken.xml", 503, String::new()).await;
    mount(
        &server,
        "/sitemap-pages.xml",
        200,
        urlset(&base_url, &["/en/page-1", "/cy/page-1"]),
    )
    .await;
    mount(&server, "/en/page-1", 200, page_html(EN_TEXT)).await;
    mount(&server, "/cy/page-1", 200, page_html(CY_TEXT)).await;

    let config = create_test_config(&base_url, &output);
    let stats = harvest(&config).await.unwrap();

    assert_eq!(stats.accepted, 1);
}

#[tokio::test]
async fn test_language_link_mode() {
    let server = MockServer::start().await;
    let base_url = server.uri();
    let output = TempDir::new().unwrap();

    let english = format!(
        r#"<html><body>
            <header><a class="language-link" href="/newyddion/cyllid">Cymraeg</a></header>
            <main><p>{}</p></main>
        </body></html>"#,
        EN_TEXT
    );
    let welsh = format!(
        r#"<html><body>
            <header><a class="language-link" href="/news/funding">English</a></header>
            <main><p>{}</p></main>
        </body></html>"#,
        CY_TEXT
    );

    mount(
        &server,
        "/sitemap.xml",
        200,
        urlset(&base_url, &["/news/funding", "/newyddion/cyllid"]),
    )
    .await;
    mount(&server, "/news/funding", 200, english).await;
    mount(&server, "/newyddion/cyllid", 200, welsh).await;

    let mut config = create_test_config(&base_url, &output);
    config.pairing.mode = PairingMode::LanguageLink;

    let client = Arc::new(HttpClient::new(&config).unwrap());
    let planned = plan(&config, client).await.unwrap();
    assert_eq!(planned.pairs.len(), 1);
    assert_eq!(planned.pairs[0].welsh_url.path(), "/newyddion/cyllid");

    let stats = harvest(&config).await.unwrap();
    assert_eq!(stats.accepted, 1);

    let records = read_records(&config.output.path()).await.unwrap();
    assert_eq!(records[0].url, format!("{}/news/funding", base_url));
}

#[tokio::test]
async fn test_append_mode_keeps_previous_run() {
    let server = MockServer::start().await;
    let base_url = server.uri();
    let output = TempDir::new().unwrap();

    mount(
        &server,
        "/sitemap.xml",
        200,
        urlset(&base_url, &["/en/page-1", "/cy/page-1"]),
    )
    .await;
    mount(&server, "/en/page-1", 200, page_html(EN_TEXT)).await;
    mount(&server, "/cy/page-1", 200, page_html(CY_TEXT)).await;

    let mut config = create_test_config(&base_url, &output);
    harvest(&config).await.unwrap();
    harvest(&config).await.unwrap();
    assert_eq!(read_records(&config.output.path()).await.unwrap().len(), 1);

    config.output.append = true;
    harvest(&config).await.unwrap();
    assert_eq!(read_records(&config.output.path()).await.unwrap().len(), 2);
}
