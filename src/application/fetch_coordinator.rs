use std::path::PathBuf;

use url::Url;

use crate::{
    api::{ClientError, ImageClient},
    domain::{FetchError, KnownFiles, SavedImage},
    utils::{error_chain, resolve_filename},
};

pub type FetchResult = Result<SavedImage, FetchError>;

/// Fetches URLs one at a time and stores image responses under `save_dir`.
pub struct FetchCoordinator {
    client: ImageClient,
    save_dir: PathBuf,
}

impl FetchCoordinator {
    pub fn new(client: ImageClient, save_dir: impl Into<PathBuf>) -> Self {
        Self {
            client,
            save_dir: save_dir.into(),
        }
    }

    /// Fetch one URL and write it to disk unless its name is already in `known`.
    ///
    /// On success the new name is added to `known`.
    pub async fn fetch_image(&self, url: &str, known: &mut KnownFiles) -> FetchResult {
        let parsed = Url::parse(url).map_err(|e| FetchError::Connection {
            url: url.to_string(),
            message: format!("invalid URL: {}", e),
        })?;

        let response = self
            .client
            .fetch(parsed)
            .await
            .map_err(|e| classify(url, e))?;

        if !response.is_image() {
            return Err(FetchError::NotAnImage {
                url: url.to_string(),
            });
        }

        let filename = resolve_filename(url, &response.body);
        if known.contains(&filename) {
            return Err(FetchError::Duplicate { filename });
        }

        let path = self.save_dir.join(&filename);
        tokio::fs::write(&path, &response.body)
            .await
            .map_err(|e| FetchError::Unexpected {
                url: url.to_string(),
                message: format!("failed to write {}: {}", path.display(), e),
            })?;

        known.insert(filename.clone());

        Ok(SavedImage {
            filename,
            path,
            bytes: response.body.len(),
        })
    }

    /// Run [`Self::fetch_image`] over every URL in order.
    ///
    /// `on_result` sees each outcome as soon as it is known; a failure never
    /// stops the loop.
    pub async fn fetch_all<F>(
        &self,
        urls: &[String],
        known: &mut KnownFiles,
        mut on_result: F,
    ) -> Vec<FetchResult>
    where
        F: FnMut(&FetchResult),
    {
        let mut results = Vec::with_capacity(urls.len());

        for url in urls {
            let result = self.fetch_image(url, known).await;
            match &result {
                Ok(saved) => tracing::info!(
                    %url,
                    filename = %saved.filename,
                    bytes = saved.bytes,
                    "saved image"
                ),
                Err(e) => tracing::warn!(%url, "{}", e),
            }
            on_result(&result);
            results.push(result);
        }

        let saved = results.iter().filter(|r| r.is_ok()).count();
        tracing::info!(
            total = results.len(),
            saved,
            not_saved = results.len() - saved,
            "fetch run finished"
        );

        results
    }
}

fn classify(url: &str, err: ClientError) -> FetchError {
    match err {
        ClientError::RequestError(e) => FetchError::Connection {
            url: url.to_string(),
            message: error_chain(&e),
        },
        ClientError::Status(status) => FetchError::HttpStatus {
            url: url.to_string(),
            status,
        },
        ClientError::MalformedHeader(message) => FetchError::Unexpected {
            url: url.to_string(),
            message,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::FetcherConfig;
    use std::path::Path;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::time::Duration;

    fn coordinator(dir: &Path) -> FetchCoordinator {
        let client = ImageClient::new(&FetcherConfig::default()).unwrap();
        FetchCoordinator::new(client, dir)
    }

    async fn image_mock(
        server: &mut mockito::ServerGuard,
        path: &str,
        body: &str,
    ) -> mockito::Mock {
        server
            .mock("GET", path)
            .with_status(200)
            .with_header("content-type", "image/png")
            .with_body(body)
            .create_async()
            .await
    }

    #[tokio::test]
    async fn test_saves_image_under_url_name() {
        let dir = tempfile::tempdir().unwrap();
        let mut server = mockito::Server::new_async().await;
        let _mock = image_mock(&mut server, "/a.png", "png-bytes").await;

        let mut known = KnownFiles::default();
        let saved = coordinator(dir.path())
            .fetch_image(&format!("{}/a.png", server.url()), &mut known)
            .await
            .unwrap();

        assert_eq!(saved.filename, "a.png");
        assert_eq!(saved.path, dir.path().join("a.png"));
        assert_eq!(saved.bytes, 9);
        assert_eq!(std::fs::read(&saved.path).unwrap(), b"png-bytes");
        assert!(known.contains("a.png"));
    }

    #[tokio::test]
    async fn test_skips_non_image() {
        let dir = tempfile::tempdir().unwrap();
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/page.png")
            .with_status(200)
            .with_header("content-type", "text/html")
            .with_body("<html></html>")
            .create_async()
            .await;

        let mut known = KnownFiles::default();
        let err = coordinator(dir.path())
            .fetch_image(&format!("{}/page.png", server.url()), &mut known)
            .await
            .unwrap_err();

        assert!(matches!(err, FetchError::NotAnImage { .. }));
        assert!(err.to_string().contains("(Not an image)"));
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
        assert_eq!(known.len(), 0);
    }

    #[tokio::test]
    async fn test_same_url_twice_keeps_first_body() {
        let dir = tempfile::tempdir().unwrap();
        let mut server = mockito::Server::new_async().await;
        let hits = Arc::new(AtomicUsize::new(0));
        let counter = hits.clone();
        let mock = server
            .mock("GET", "/a.png")
            .with_status(200)
            .with_header("content-type", "image/png")
            .with_body_from_request(move |_| {
                let n = counter.fetch_add(1, Ordering::SeqCst);
                format!("body-{}", n).into_bytes()
            })
            .expect(2)
            .create_async()
            .await;

        let url = format!("{}/a.png", server.url());
        let fetcher = coordinator(dir.path());
        let mut known = KnownFiles::default();

        assert!(fetcher.fetch_image(&url, &mut known).await.is_ok());
        let err = fetcher.fetch_image(&url, &mut known).await.unwrap_err();

        mock.assert_async().await;
        assert_eq!(err.to_string(), "Skipped duplicate: a.png");
        assert_eq!(hits.load(Ordering::SeqCst), 2);
        assert_eq!(std::fs::read(dir.path().join("a.png")).unwrap(), b"body-0");
    }

    #[tokio::test]
    async fn test_identical_bodies_without_name_collide() {
        let dir = tempfile::tempdir().unwrap();
        let mut server = mockito::Server::new_async().await;
        let _root = image_mock(&mut server, "/", "same").await;
        let _gallery = image_mock(&mut server, "/gallery/", "same").await;

        let fetcher = coordinator(dir.path());
        let mut known = KnownFiles::default();

        let saved = fetcher
            .fetch_image(&format!("{}/", server.url()), &mut known)
            .await
            .unwrap();
        let err = fetcher
            .fetch_image(&format!("{}/gallery/", server.url()), &mut known)
            .await
            .unwrap_err();

        assert!(saved.filename.starts_with("image_"));
        assert!(saved.filename.ends_with(".jpg"));
        assert!(matches!(&err, FetchError::Duplicate { filename } if *filename == saved.filename));
    }

    #[tokio::test]
    async fn test_different_bodies_without_name_both_saved() {
        let dir = tempfile::tempdir().unwrap();
        let mut server = mockito::Server::new_async().await;
        let _root = image_mock(&mut server, "/", "first").await;
        let _gallery = image_mock(&mut server, "/gallery/", "second").await;

        let fetcher = coordinator(dir.path());
        let mut known = KnownFiles::default();

        let a = fetcher
            .fetch_image(&format!("{}/", server.url()), &mut known)
            .await
            .unwrap();
        let b = fetcher
            .fetch_image(&format!("{}/gallery/", server.url()), &mut known)
            .await
            .unwrap();

        assert_ne!(a.filename, b.filename);
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 2);
    }

    #[tokio::test]
    async fn test_existing_file_is_duplicate() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("a.png"), b"old").unwrap();
        let mut server = mockito::Server::new_async().await;
        let _mock = image_mock(&mut server, "/a.png", "new").await;

        let mut known = KnownFiles::snapshot(dir.path()).await.unwrap();
        let err = coordinator(dir.path())
            .fetch_image(&format!("{}/a.png", server.url()), &mut known)
            .await
            .unwrap_err();

        assert!(matches!(err, FetchError::Duplicate { .. }));
        assert_eq!(std::fs::read(dir.path().join("a.png")).unwrap(), b"old");
    }

    #[tokio::test]
    async fn test_verbatim_name_matches_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("my cat.png"), b"old").unwrap();
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", mockito::Matcher::Any)
            .with_status(200)
            .with_header("content-type", "image/png")
            .with_body("new")
            .create_async()
            .await;

        let mut known = KnownFiles::snapshot(dir.path()).await.unwrap();
        let err = coordinator(dir.path())
            .fetch_image(&format!("{}/my cat.png", server.url()), &mut known)
            .await
            .unwrap_err();

        assert_eq!(err.to_string(), "Skipped duplicate: my cat.png");
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 1);
        assert_eq!(std::fs::read(dir.path().join("my cat.png")).unwrap(), b"old");
    }

    #[tokio::test]
    async fn test_error_status() {
        let dir = tempfile::tempdir().unwrap();
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/a.png")
            .with_status(500)
            .create_async()
            .await;

        let mut known = KnownFiles::default();
        let err = coordinator(dir.path())
            .fetch_image(&format!("{}/a.png", server.url()), &mut known)
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            FetchError::HttpStatus { status, .. } if status == reqwest::StatusCode::INTERNAL_SERVER_ERROR
        ));
        assert!(err.to_string().starts_with("Connection error for "));
        assert!(err.to_string().ends_with("/a.png: 500 Internal Server Error"));
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[tokio::test]
    async fn test_invalid_url_is_connection_error() {
        let dir = tempfile::tempdir().unwrap();
        let mut known = KnownFiles::default();
        let err = coordinator(dir.path())
            .fetch_image("not a url", &mut known)
            .await
            .unwrap_err();

        assert!(matches!(err, FetchError::Connection { .. }));
    }

    #[tokio::test]
    async fn test_write_failure_is_unexpected() {
        let dir = tempfile::tempdir().unwrap();
        let mut server = mockito::Server::new_async().await;
        let _mock = image_mock(&mut server, "/a.png", "png").await;

        let mut known = KnownFiles::default();
        let err = coordinator(&dir.path().join("missing"))
            .fetch_image(&format!("{}/a.png", server.url()), &mut known)
            .await
            .unwrap_err();

        assert!(matches!(err, FetchError::Unexpected { .. }));
        assert!(!known.contains("a.png"));
    }

    #[tokio::test]
    async fn test_timeout_does_not_stop_the_run() {
        // Accepts connections at the socket level but never answers.
        let silent = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let silent_url = format!("http://{}/slow.png", silent.local_addr().unwrap());

        let dir = tempfile::tempdir().unwrap();
        let mut server = mockito::Server::new_async().await;
        let _mock = image_mock(&mut server, "/a.png", "png").await;

        let config = FetcherConfig {
            timeout: Duration::from_millis(300),
            ..FetcherConfig::default()
        };
        let fetcher = FetchCoordinator::new(ImageClient::new(&config).unwrap(), dir.path());

        let urls = vec![silent_url, format!("{}/a.png", server.url())];
        let mut seen = 0;
        let mut known = KnownFiles::default();
        let results = fetcher.fetch_all(&urls, &mut known, |_| seen += 1).await;

        assert_eq!(seen, 2);
        assert!(matches!(results[0], Err(FetchError::Connection { .. })));
        assert_eq!(results[1].as_ref().unwrap().filename, "a.png");
        drop(silent);
    }
}
