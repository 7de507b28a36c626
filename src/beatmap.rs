use std::io;
use std::path::PathBuf;

use log::{error, info};
use reqwest::StatusCode;
use thiserror::Error;
use url::Url;

use crate::config::Config;

/// Keeps `.osu` files in a local directory, downloading them on first use.
#[derive(Clone, Debug)]
pub struct BeatmapResolver {
    client: reqwest::Client,
    beatmap_dir: PathBuf,
    endpoint: Url,
}

#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("Beatmap {map_id} is neither cached nor downloadable.")]
    NotFound { map_id: u32 },
    #[error("Failed to request beatmap: {0}")]
    Request(#[from] reqwest::Error),
    #[error("Server returned {status} for beatmap {map_id}.")]
    Status { map_id: u32, status: StatusCode },
    #[error("An I/O error occurred while storing the beatmap: {0}")]
    Io(#[from] io::Error),
    #[error("Cannot build a download url for beatmap {map_id}: {source}")]
    Url {
        map_id: u32,
        source: url::ParseError,
    },
}

impl BeatmapResolver {
    pub fn new(client: reqwest::Client, config: &Config) -> Self {
        Self {
            client,
            beatmap_dir: config.beatmap_dir(),
            endpoint: config.map_endpoint.clone(),
        }
    }

    pub fn path(&self, map_id: u32) -> PathBuf {
        self.beatmap_dir.join(format!("{map_id}.osu"))
    }

    pub fn url(&self, map_id: u32) -> Result<Url, ResolveError> {
        let mut endpoint = self.endpoint.clone();
        // Without a trailing slash `join` would replace the last segment.
        if !endpoint.path().ends_with('/') {
            endpoint.set_path(&format!("{}/", endpoint.path()));
        }
        endpoint
            .join(&map_id.to_string())
            .map_err(|source| ResolveError::Url { map_id, source })
    }

    /// Returns the local path of the beatmap, downloading it if it is not cached yet.
    pub async fn resolve(&self, map_id: u32) -> Result<PathBuf, ResolveError> {
        let path = self.path(map_id);
        if tokio::fs::try_exists(&path).await? || self.try_download(map_id).await {
            Ok(path)
        } else {
            Err(ResolveError::NotFound { map_id })
        }
    }

    /// Downloads the beatmap, overwriting any cached copy.
    ///
    /// Failures are logged rather than returned; nothing is written unless the
    /// server answered with a success status.
    pub async fn try_download(&self, map_id: u32) -> bool {
        match self.download(map_id).await {
            Ok(path) => {
                info!("Downloaded beatmap {map_id} to {path:?}.");
                true
            }
            Err(e) => {
                error!("Could not find map by id {map_id}: {e}");
                false
            }
        }
    }

    async fn download(&self, map_id: u32) -> Result<PathBuf, ResolveError> {
        let response = self.client.get(self.url(map_id)?).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(ResolveError::Status { map_id, status });
        }
        let content = response.bytes().await?;

        let path = self.path(map_id);
        tokio::fs::create_dir_all(&self.beatmap_dir).await?;
        tokio::fs::write(&path, &content).await?;
        Ok(path)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use std::sync::{
        atomic::{AtomicUsize, Ordering},
        Arc,
    };

    use tokio::{
        io::{AsyncReadExt, AsyncWriteExt},
        net::TcpListener,
    };
    use url::Url;

    use super::{BeatmapResolver, ResolveError};
    use crate::config::Config;

    /// Serves `status` and `body` to every connection, counting requests.
    pub(crate) async fn serve(status: &'static str, body: &'static str) -> (Url, Arc<AtomicUsize>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let hits = Arc::new(AtomicUsize::new(0));
        let counter = hits.clone();
        tokio::spawn(async move {
            loop {
                let Ok((mut socket, _)) = listener.accept().await else {
                    break;
                };
                counter.fetch_add(1, Ordering::SeqCst);
                let mut buf = [0; 4096];
                let _ = socket.read(&mut buf).await;
                let response = format!(
                    "HTTP/1.1 {status}\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{body}",
                    body.len()
                );
                let _ = socket.write_all(response.as_bytes()).await;
                let _ = socket.shutdown().await;
            }
        });
        let url = Url::parse(&format!("http://{addr}/osu/")).unwrap();
        (url, hits)
    }

    fn resolver(data_dir: &std::path::Path, endpoint: Url) -> BeatmapResolver {
        let config = Config::builder()
            .data_dir(data_dir)
            .map_endpoint(endpoint)
            .build();
        BeatmapResolver::new(local_client(), &config)
    }

    /// Client that talks to the test server directly, whatever proxy the environment sets.
    pub(crate) fn local_client() -> reqwest::Client {
        reqwest::Client::builder().no_proxy().build().unwrap()
    }

    #[test]
    fn test_path_and_url() {
        let resolver = resolver(
            std::path::Path::new(".data"),
            Url::parse("https://old.ppy.sh/osu").unwrap(),
        );
        assert_eq!(
            resolver.path(315),
            std::path::PathBuf::from(".data/osu/315.osu")
        );
        assert_eq!(resolver.url(315).unwrap().as_str(), "https://old.ppy.sh/osu/315");
    }

    #[tokio::test]
    async fn test_download() {
        let dir = tempfile::tempdir().unwrap();
        let (url, hits) = serve("200 OK", "osu file format v14\n").await;
        let resolver = resolver(dir.path(), url);

        let path = resolver.resolve(75).await.unwrap();
        assert_eq!(path, dir.path().join("osu/75.osu"));
        assert_eq!(
            fs_err::read_to_string(&path).unwrap(),
            "osu file format v14\n"
        );
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_cached_file_skips_network() {
        let dir = tempfile::tempdir().unwrap();
        let (url, hits) = serve("200 OK", "fresh").await;
        let resolver = resolver(dir.path(), url);
        fs_err::create_dir_all(dir.path().join("osu")).unwrap();
        fs_err::write(resolver.path(75), "cached").unwrap();

        let path = resolver.resolve(75).await.unwrap();
        assert_eq!(fs_err::read_to_string(path).unwrap(), "cached");
        assert_eq!(hits.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let (url, hits) = serve("404 Not Found", "").await;
        let resolver = resolver(dir.path(), url);

        assert!(!resolver.try_download(75).await);
        assert!(!resolver.path(75).exists());
        assert!(!dir.path().join("osu").exists());
        assert_eq!(hits.load(Ordering::SeqCst), 1);

        let err = resolver.resolve(75).await.unwrap_err();
        assert!(matches!(err, ResolveError::NotFound { map_id: 75 }));
    }

    #[tokio::test]
    async fn test_unreachable_host() {
        let dir = tempfile::tempdir().unwrap();
        // Bind then drop, so nothing listens on the port.
        let addr = TcpListener::bind("127.0.0.1:0")
            .await
            .unwrap()
            .local_addr()
            .unwrap();
        let url = Url::parse(&format!("http://{addr}/osu/")).unwrap();
        let resolver = resolver(dir.path(), url);
        assert!(!resolver.try_download(75).await);
        assert!(!resolver.path(75).exists());
    }
}
