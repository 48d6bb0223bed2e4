//! Loading raw source bytes from disk or over HTTP.

mod basic;
mod client;

pub use basic::BasicClient;
pub use client::HttpClient;

use anyhow::{Context, Result};
use flate2::read::GzDecoder;
use std::io::Read;
use tracing::debug;

const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];

pub async fn fetch_bytes<C: HttpClient>(client: &C, url: &str) -> Result<Vec<u8>> {
    let req = reqwest::Request::new(reqwest::Method::GET, url.parse()?);

    let resp = client.execute(req).await?.error_for_status()?;
    Ok(resp.bytes().await?.to_vec())
}

/// Loads a source from a local path or an `http(s)` URL, inflating it if it
/// is gzip-compressed.
#[tracing::instrument(skip(client))]
pub async fn load_source<C: HttpClient>(client: &C, source: &str) -> Result<Vec<u8>> {
    let bytes = if source.starts_with("http://") || source.starts_with("https://") {
        fetch_bytes(client, source)
            .await
            .with_context(|| format!("failed to fetch '{source}'"))?
    } else {
        tokio::fs::read(source)
            .await
            .with_context(|| format!("failed to read '{source}'"))?
    };
    debug!(bytes = bytes.len(), "Source loaded");

    maybe_decompress(bytes).with_context(|| format!("failed to decompress '{source}'"))
}

/// Inflates gzip data; anything without the gzip magic passes through.
pub fn maybe_decompress(bytes: Vec<u8>) -> Result<Vec<u8>> {
    if !bytes.starts_with(&GZIP_MAGIC) {
        return Ok(bytes);
    }

    let mut decoder = GzDecoder::new(bytes.as_slice());
    let mut out = Vec::new();
    decoder.read_to_end(&mut out)?;
    debug!(compressed = bytes.len(), inflated = out.len(), "Inflated gzip source");
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::Compression;
    use flate2::write::GzEncoder;
    use std::io::Write;

    #[test]
    fn test_plain_bytes_pass_through() {
        let bytes = b"School ID,school_name\n".to_vec();
        assert_eq!(maybe_decompress(bytes.clone()).unwrap(), bytes);
    }

    #[test]
    fn test_gzip_bytes_are_inflated() {
        let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(b"a,b\n1,2\n").unwrap();
        let compressed = encoder.finish().unwrap();

        assert_eq!(maybe_decompress(compressed).unwrap(), b"a,b\n1,2\n");
    }

    #[test]
    fn test_truncated_gzip_fails() {
        assert!(maybe_decompress(vec![0x1f, 0x8b, 0x08]).is_err());
    }

    #[tokio::test]
    async fn test_load_source_reads_local_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"x,y\n").unwrap();

        let client = BasicClient::new();
        let bytes = load_source(&client, file.path().to_str().unwrap())
            .await
            .unwrap();
        assert_eq!(bytes, b"x,y\n");
    }

    #[tokio::test]
    async fn test_load_source_missing_file_fails() {
        let client = BasicClient::new();
        let err = load_source(&client, "/nonexistent/schools.csv")
            .await
            .unwrap_err();
        assert!(err.to_string().contains("/nonexistent/schools.csv"));
    }
}
