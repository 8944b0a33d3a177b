// ==========================================
// 合同汇总报表 - 数据源
// ==========================================
// 职责: 拉取源表格文件（HTTP / 本地文件）
// 策略: 单次请求超时 + 有限次重试（线性退避），4xx 不重试
// ==========================================

use crate::config::FetchPolicy;
use crate::importer::error::{ImportError, ImportResult};
use crate::importer::file_parser::SourceFormat;
use crate::importer::importer_trait::{DataSource, SourcePayload};
use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use std::path::{Path, PathBuf};
use tracing::{debug, info, instrument, warn};

// ==========================================
// HttpDataSource
// ==========================================
pub struct HttpDataSource {
    url: String,
    client: reqwest::Client,
    policy: FetchPolicy,
}

impl HttpDataSource {
    pub fn new(url: impl Into<String>, policy: FetchPolicy) -> ImportResult<Self> {
        let url = url.into();
        reqwest::Url::parse(&url).map_err(|e| ImportError::Fetch {
            url: url.clone(),
            message: format!("invalid url: {e}"),
        })?;

        let client = reqwest::Client::builder().timeout(policy.timeout).build()?;

        Ok(Self {
            url,
            client,
            policy,
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// 读取响应体，超出上限立即失败
    async fn read_body_with_limit(&self, response: &mut reqwest::Response) -> ImportResult<Vec<u8>> {
        let limit_bytes = self.policy.max_body_bytes;
        if let Some(content_length) = response.content_length() {
            if content_length > limit_bytes as u64 {
                return Err(ImportError::BodyTooLarge {
                    limit_bytes,
                    received_bytes: usize::try_from(content_length).unwrap_or(usize::MAX),
                });
            }
        }

        let mut out: Vec<u8> = Vec::new();
        while let Some(chunk) = response.chunk().await? {
            if out.len().saturating_add(chunk.len()) > limit_bytes {
                return Err(ImportError::BodyTooLarge {
                    limit_bytes,
                    received_bytes: out.len().saturating_add(chunk.len()),
                });
            }
            out.extend_from_slice(&chunk);
        }
        Ok(out)
    }

    fn detect_format(&self, response: &reqwest::Response) -> ImportResult<SourceFormat> {
        SourceFormat::from_location(&self.url)
            .or_else(|| {
                response
                    .headers()
                    .get(CONTENT_TYPE)
                    .and_then(|v| v.to_str().ok())
                    .and_then(SourceFormat::from_content_type)
            })
            .ok_or_else(|| ImportError::UnsupportedFormat(self.url.clone()))
    }
}

#[async_trait]
impl DataSource for HttpDataSource {
    #[instrument(name = "http_source_fetch", skip(self), fields(url = %self.url))]
    async fn fetch(&self) -> ImportResult<SourcePayload> {
        let max_attempts = self.policy.max_attempts.max(1);
        let mut attempt = 0;
        loop {
            attempt += 1;
            debug!(attempt = attempt, "发起 HTTP 请求");

            let retry_reason = match self.client.get(&self.url).send().await {
                Ok(mut resp) if resp.status().is_success() => {
                    let format = self.detect_format(&resp)?;
                    let bytes = self.read_body_with_limit(&mut resp).await?;
                    info!(
                        attempt = attempt,
                        bytes = bytes.len(),
                        format = %format,
                        "远程文件拉取完成"
                    );
                    return Ok(SourcePayload {
                        origin: self.url.clone(),
                        format,
                        bytes,
                    });
                }
                Ok(resp) => {
                    let status = resp.status();
                    let err = ImportError::HttpStatus {
                        url: self.url.clone(),
                        status: status.as_u16(),
                    };
                    // 4xx 为确定性失败，不重试
                    if status.is_client_error() {
                        return Err(err);
                    }
                    err
                }
                Err(e) => ImportError::from(e),
            };

            if attempt >= max_attempts {
                warn!(attempt = attempt, error = %retry_reason, "远程文件拉取失败，已达重试上限");
                return Err(retry_reason);
            }

            warn!(attempt = attempt, error = %retry_reason, "远程文件拉取失败，准备重试");
            tokio::time::sleep(self.policy.retry_backoff * attempt).await;
        }
    }

    fn describe(&self) -> String {
        self.url.clone()
    }
}

// ==========================================
// FileDataSource
// ==========================================
pub struct FileDataSource {
    path: PathBuf,
}

impl FileDataSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl DataSource for FileDataSource {
    #[instrument(name = "file_source_fetch", skip(self), fields(path = %self.path.display()))]
    async fn fetch(&self) -> ImportResult<SourcePayload> {
        let origin = self.path.display().to_string();
        let format = self
            .path
            .extension()
            .and_then(|e| e.to_str())
            .and_then(SourceFormat::from_extension)
            .ok_or_else(|| ImportError::UnsupportedFormat(origin.clone()))?;

        let bytes = tokio::fs::read(&self.path).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                ImportError::FileNotFound(origin.clone())
            } else {
                ImportError::from(e)
            }
        })?;

        info!(bytes = bytes.len(), format = %format, "本地文件读取完成");
        Ok(SourcePayload {
            origin,
            format,
            bytes,
        })
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

/// 根据位置选择数据源
///
/// - `http://` / `https://` → HttpDataSource
/// - `file://` 前缀或其他 → 本地路径
pub fn from_location(location: &str, policy: FetchPolicy) -> ImportResult<Box<dyn DataSource>> {
    let location = location.trim();
    if location.starts_with("http://") || location.starts_with("https://") {
        return Ok(Box::new(HttpDataSource::new(location, policy)?));
    }
    let path = location.strip_prefix("file://").unwrap_or(location);
    Ok(Box::new(FileDataSource::new(path)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::time::Duration;
    use tempfile::Builder;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    fn policy(max_attempts: u32) -> FetchPolicy {
        FetchPolicy {
            timeout: Duration::from_secs(5),
            max_attempts,
            retry_backoff: Duration::from_millis(1),
            max_body_bytes: 1024,
        }
    }

    /// 依次响应 responses 中的每个 (状态行, 响应体)
    async fn serve(responses: Vec<(&'static str, Vec<u8>)>) -> (String, tokio::task::JoinHandle<()>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let handle = tokio::spawn(async move {
            for (status, body) in responses {
                let (mut socket, _) = listener.accept().await.unwrap();
                let mut buf = [0u8; 1024];
                let mut request = Vec::new();
                loop {
                    let n = socket.read(&mut buf).await.unwrap();
                    if n == 0 {
                        break;
                    }
                    request.extend_from_slice(&buf[..n]);
                    if request.windows(4).any(|w| w == b"\r\n\r\n") {
                        break;
                    }
                }
                let headers = format!(
                    "HTTP/1.1 {status}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
                    body.len()
                );
                let _ = socket.write_all(headers.as_bytes()).await;
                let _ = socket.write_all(&body).await;
            }
        });

        (format!("http://{addr}/contracts.csv"), handle)
    }

    #[tokio::test]
    async fn test_http_source_fetches_body() {
        let (url, handle) = serve(vec![("200 OK", b"Community\nMesa\n".to_vec())]).await;
        let source = HttpDataSource::new(url, policy(1)).unwrap();

        let payload = source.fetch().await.unwrap();
        assert_eq!(payload.format, SourceFormat::Csv);
        assert_eq!(payload.bytes, b"Community\nMesa\n");
        handle.await.unwrap();
    }

    #[tokio::test]
    async fn test_http_source_retries_server_errors() {
        let (url, handle) = serve(vec![
            ("503 Service Unavailable", Vec::new()),
            ("200 OK", b"Community\n".to_vec()),
        ])
        .await;
        let source = HttpDataSource::new(url, policy(2)).unwrap();

        let payload = source.fetch().await.unwrap();
        assert_eq!(payload.bytes, b"Community\n");
        handle.await.unwrap();
    }

    #[tokio::test]
    async fn test_http_source_does_not_retry_not_found() {
        let (url, handle) = serve(vec![("404 Not Found", Vec::new())]).await;
        let source = HttpDataSource::new(url, policy(3)).unwrap();

        let err = source.fetch().await.unwrap_err();
        assert!(matches!(err, ImportError::HttpStatus { status: 404, .. }));
        handle.await.unwrap();
    }

    #[tokio::test]
    async fn test_http_source_enforces_body_limit() {
        let (url, handle) = serve(vec![("200 OK", vec![b'x'; 2048])]).await;
        let source = HttpDataSource::new(url, policy(1)).unwrap();

        let err = source.fetch().await.unwrap_err();
        assert!(matches!(err, ImportError::BodyTooLarge { limit_bytes: 1024, .. }));
        handle.await.unwrap();
    }

    #[test]
    fn test_http_source_rejects_invalid_url() {
        assert!(HttpDataSource::new("not a url", policy(1)).is_err());
    }

    #[tokio::test]
    async fn test_file_source_reads_csv() {
        let mut temp_file = Builder::new().suffix(".csv").tempfile().unwrap();
        writeln!(temp_file, "Community,Series").unwrap();

        let source = FileDataSource::new(temp_file.path());
        let payload = source.fetch().await.unwrap();
        assert_eq!(payload.format, SourceFormat::Csv);
        assert!(payload.bytes.starts_with(b"Community"));
    }

    #[tokio::test]
    async fn test_file_source_not_found() {
        let source = FileDataSource::new("/definitely/missing/contracts.xlsx");
        let err = source.fetch().await.unwrap_err();
        assert!(matches!(err, ImportError::FileNotFound(_)));
    }

    #[test]
    fn test_from_location_picks_source() {
        let http = from_location("https://example.com/PulteContracts1.xlsx", policy(1)).unwrap();
        assert_eq!(http.describe(), "https://example.com/PulteContracts1.xlsx");

        let file = from_location("file:///tmp/contracts.csv", policy(1)).unwrap();
        assert_eq!(file.describe(), "/tmp/contracts.csv");
    }
}
