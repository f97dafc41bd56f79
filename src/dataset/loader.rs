//! CSV fetch-and-parse.
//!
//! This module turns a local path or a remote URL into an ordered
//! sequence of [`HotelRecord`]s using the csv crate.

use crate::error::{DatasetError, Result};
use crate::models::HotelRecord;
use indicatif::{ProgressBar, ProgressStyle};
use std::fmt;
use std::path::PathBuf;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Columns every dataset must provide.
const REQUIRED_COLUMNS: [&str; 4] = ["Hotel", "Year", "Score", "Rooms"];

/// Categorical columns; absent ones degrade to the undefined bucket.
const CATEGORY_COLUMNS: [&str; 3] = ["Region", "Country", "Theme"];

/// Where the dataset lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataSource {
    Path(PathBuf),
    Url(String),
}

impl DataSource {
    /// Interpret a CLI/config value as either a URL or a filesystem path.
    pub fn parse(value: &str) -> Self {
        if value.starts_with("http://") || value.starts_with("https://") {
            DataSource::Url(value.to_string())
        } else {
            DataSource::Path(PathBuf::from(value))
        }
    }

    pub fn is_remote(&self) -> bool {
        matches!(self, DataSource::Url(_))
    }
}

impl fmt::Display for DataSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataSource::Path(p) => write!(f, "{}", p.display()),
            DataSource::Url(u) => write!(f, "{}", u),
        }
    }
}

/// Options for loading a dataset.
#[derive(Debug, Clone)]
pub struct LoadOptions {
    /// Timeout for remote fetches.
    pub timeout_seconds: u64,
    /// Whether to show a spinner during remote fetches.
    pub show_progress: bool,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            timeout_seconds: 30,
            show_progress: true,
        }
    }
}

/// Fetch and parse the dataset.
pub async fn load_records(source: &DataSource, options: &LoadOptions) -> Result<Vec<HotelRecord>> {
    info!("Loading dataset: {}", source);

    let bytes = match source {
        DataSource::Path(path) => tokio::fs::read(path)
            .await
            .map_err(|e| DatasetError::io(path, e))?,
        DataSource::Url(url) => fetch_remote(url, options).await?,
    };

    debug!("Read {} bytes", bytes.len());

    let records = parse_records(&bytes)?;
    info!("Loaded {} records", records.len());

    Ok(records)
}

/// Download a remote CSV body.
async fn fetch_remote(url: &str, options: &LoadOptions) -> Result<Vec<u8>> {
    let spinner = if options.show_progress {
        let pb = ProgressBar::new_spinner();
        pb.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.green} [{elapsed_precise}] {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        pb.set_message(format!("Fetching {}", url));
        pb.enable_steady_tick(Duration::from_millis(100));
        Some(pb)
    } else {
        None
    };

    let result = fetch_body(url, options.timeout_seconds).await;

    if let Some(pb) = spinner {
        pb.finish_and_clear();
    }

    result
}

async fn fetch_body(url: &str, timeout_seconds: u64) -> Result<Vec<u8>> {
    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(timeout_seconds))
        .build()
        .map_err(|e| DatasetError::http(url, &e, timeout_seconds))?;

    download(&client, url, timeout_seconds).await
}

async fn download(client: &reqwest::Client, url: &str, timeout_seconds: u64) -> Result<Vec<u8>> {
    let response = client
        .get(url)
        .send()
        .await
        .map_err(|e| DatasetError::http(url, &e, timeout_seconds))?;

    if !response.status().is_success() {
        return Err(DatasetError::Status {
            url: url.to_string(),
            status: response.status().as_u16(),
        });
    }

    let body = response
        .bytes()
        .await
        .map_err(|e| DatasetError::http(url, &e, timeout_seconds))?;

    Ok(body.to_vec())
}

/// Parse CSV bytes into records, preserving row order.
///
/// Field order in the header is free; field names are not.
pub fn parse_records(data: &[u8]) -> Result<Vec<HotelRecord>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(data);

    let headers = reader.headers()?.clone();
    let has_column = |name: &str| headers.iter().any(|h| h == name);

    for column in REQUIRED_COLUMNS {
        if !has_column(column) {
            return Err(DatasetError::MissingColumn { column });
        }
    }

    for column in CATEGORY_COLUMNS {
        if !has_column(column) {
            warn!(
                "Column '{}' not found; every record will be grouped as undefined",
                column
            );
        }
    }

    let mut records = Vec::new();
    for row in reader.deserialize::<HotelRecord>() {
        records.push(row.map_err(row_error)?);
    }

    Ok(records)
}

/// Turn a row-level csv error into a line-numbered parse error.
fn row_error(err: csv::Error) -> DatasetError {
    let parse = match err.kind() {
        csv::ErrorKind::Deserialize { pos, err: de } => {
            Some((pos.as_ref().map_or(0, |p| p.line()), de.to_string()))
        }
        _ => None,
    };

    match parse {
        Some((line, message)) => DatasetError::Parse { line, message },
        None => DatasetError::Csv(err),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    const SAMPLE: &str = include_str!("../../fixtures/hotels_sample.csv");

    /// Answer a single HTTP request on a loopback port with `status` and `body`.
    async fn serve_once(status: &'static str, body: &'static str) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut request = Vec::new();
            let mut buf = [0u8; 1024];
            while !request.windows(4).any(|w| w == b"\r\n\r\n") {
                let n = socket.read(&mut buf).await.unwrap();
                if n == 0 {
                    break;
                }
                request.extend_from_slice(&buf[..n]);
            }
            let response = format!(
                "HTTP/1.1 {}\r\nContent-Type: text/csv\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                status,
                body.len(),
                body
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            let _ = socket.shutdown().await;
        });

        format!("http://{}/100_hotels.csv", addr)
    }

    fn local_client() -> reqwest::Client {
        reqwest::Client::builder()
            .no_proxy()
            .timeout(Duration::from_secs(5))
            .build()
            .unwrap()
    }

    #[test]
    fn test_data_source_parse() {
        assert_eq!(
            DataSource::parse("https://example.com/100_hotels.csv"),
            DataSource::Url("https://example.com/100_hotels.csv".to_string())
        );
        assert_eq!(
            DataSource::parse("100_hotels.csv"),
            DataSource::Path(PathBuf::from("100_hotels.csv"))
        );
        assert!(DataSource::parse("http://localhost/h.csv").is_remote());
    }

    #[test]
    fn test_parse_sample_fixture() {
        let records = parse_records(SAMPLE.as_bytes()).unwrap();
        assert_eq!(records.len(), 8);
        assert_eq!(records[0].hotel, "Mahali Mzuri");
        assert_eq!(records[0].region.as_deref(), Some("Africa"));
        assert_eq!(records[1].year, 1834);
        assert_eq!(records[3].theme.as_deref(), Some("Contemporary"));
        assert_eq!(records[4].rooms, 121);
    }

    #[test]
    fn test_parse_any_column_order() {
        let csv = "Rooms,Score,Year,Theme,Country,Region,Hotel\n11,90.5,1999,Nature,Peru,Latin America,Inkaterra\n";
        let records = parse_records(csv.as_bytes()).unwrap();
        assert_eq!(records[0].hotel, "Inkaterra");
        assert_eq!(records[0].rooms, 11);
        assert_eq!(records[0].region.as_deref(), Some("Latin America"));
    }

    #[test]
    fn test_missing_category_column_is_undefined() {
        let csv = "Hotel,Country,Theme,Year,Score,Rooms\nA,B,C,2000,90,10\n";
        let records = parse_records(csv.as_bytes()).unwrap();
        assert_eq!(records[0].region, None);
    }

    #[test]
    fn test_empty_category_cell_is_undefined() {
        let csv = "Hotel,Region,Country,Theme,Year,Score,Rooms\nA,,B,C,2000,90,10\n";
        let records = parse_records(csv.as_bytes()).unwrap();
        assert_eq!(records[0].region, None);
        assert_eq!(records[0].country.as_deref(), Some("B"));
    }

    #[test]
    fn test_missing_required_column() {
        let csv = "Hotel,Region,Country,Theme,Score,Rooms\nA,B,C,D,90,10\n";
        let err = parse_records(csv.as_bytes()).unwrap_err();
        assert!(matches!(err, DatasetError::MissingColumn { column: "Year" }));
    }

    #[test]
    fn test_malformed_row_reports_line() {
        let csv = "Hotel,Region,Country,Theme,Year,Score,Rooms\nA,B,C,D,2000,90,10\nE,F,G,H,soon,80,5\n";
        let err = parse_records(csv.as_bytes()).unwrap_err();
        match err {
            DatasetError::Parse { line, .. } => assert_eq!(line, 3),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_header_only_is_empty() {
        let csv = "Hotel,Region,Country,Theme,Year,Score,Rooms\n";
        assert!(parse_records(csv.as_bytes()).unwrap().is_empty());
    }

    #[test]
    fn test_load_local_file() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(SAMPLE.as_bytes()).unwrap();

        let source = DataSource::Path(file.path().to_path_buf());
        let records = tokio_test::block_on(load_records(&source, &LoadOptions::default())).unwrap();
        assert_eq!(records.len(), 8);
    }

    #[test]
    fn test_load_missing_file() {
        let source = DataSource::parse("/definitely/not/here/100_hotels.csv");
        let err = tokio_test::block_on(load_records(&source, &LoadOptions::default())).unwrap_err();
        assert!(matches!(err, DatasetError::Io { .. }));
    }

    #[test]
    fn test_remote_not_found_is_status_error() {
        let err = tokio_test::block_on(async {
            let url = serve_once("404 Not Found", "").await;
            download(&local_client(), &url, 5).await
        })
        .unwrap_err();

        match err {
            DatasetError::Status { status, url } => {
                assert_eq!(status, 404);
                assert!(url.ends_with("/100_hotels.csv"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_remote_csv_body() {
        let body = tokio_test::block_on(async {
            let url = serve_once("200 OK", SAMPLE).await;
            download(&local_client(), &url, 5).await
        })
        .unwrap();

        let records = parse_records(&body).unwrap();
        assert_eq!(records.len(), 8);
        assert_eq!(records[7].hotel, "Jade Mountain");
    }

    #[test]
    fn test_remote_connection_refused_is_http_error() {
        let err = tokio_test::block_on(async {
            let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
            let url = format!("http://{}/100_hotels.csv", listener.local_addr().unwrap());
            drop(listener);
            download(&local_client(), &url, 5).await
        })
        .unwrap_err();

        assert!(matches!(err, DatasetError::Http { .. }));
    }
}
