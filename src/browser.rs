//browser.rs

use std::fs::{self, File};
use std::path::{Path, PathBuf};
use std::thread;
use std::time::Duration;

use log::{debug, info, warn};
use reqwest::blocking::{Client, Response};
use reqwest::header::{HeaderMap, HeaderValue, USER_AGENT};
use reqwest::{StatusCode, Url};
use scraper::{Html, Selector};

use crate::config::Config;
use crate::error::{NovelError, Result};

/// Turns a custom track text into an image on disk.
pub trait ImageRenderer {
    /// Render the tracks published as `name` and return the local image path.
    fn render(&self, name: &str, tracks: &str) -> Result<PathBuf>;
}

/// Write the custom track file into the web root.
pub fn publish_tracks(config: &Config, name: &str, tracks: &str) -> Result<PathBuf> {
    let outpath = config.web_root.join(name);
    fs::write(&outpath, tracks).map_err(|e| NovelError::io(&outpath, e))?;
    Ok(outpath)
}

/// Browser url that loads the published track file `name` in hard-copy mode.
pub fn browser_url(config: &Config, name: &str) -> String {
    format!(
        "{}?db={}&hgt.customText={}&hgt.psOutput=on",
        config.browser_endpoint,
        config.genome,
        config.public_file_url(name)
    )
}

/// `href` of the `offset`-th anchor counted from the end of the page.
///
/// Only anchor elements of the parsed document count; markup inside comments
/// or script bodies is not an anchor.
pub fn extract_hardcopy_link(html: &str, offset: usize) -> Result<String> {
    let selector = Selector::parse("a").map_err(|e| NovelError::Html(format!("{:?}", e)))?;
    let document = Html::parse_document(html);
    let anchors: Vec<_> = document.select(&selector).collect();

    let missing = || NovelError::MissingAnchor {
        offset,
        found: anchors.len(),
    };

    if offset == 0 || offset > anchors.len() {
        return Err(missing());
    }
    anchors[anchors.len() - offset]
        .value()
        .attr("href")
        .map(str::to_string)
        .ok_or_else(missing)
}

/// Talks to the genome browser and downloads the rendered image.
pub struct BrowserClient {
    client: Client,
    config: Config,
    outdir: PathBuf,
}

impl BrowserClient {
    pub fn new(config: &Config, outdir: &Path) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(
            USER_AGENT,
            HeaderValue::from_static(concat!("novel-sites/", env!("CARGO_PKG_VERSION"))),
        );

        let client = Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            config: config.clone(),
            outdir: outdir.to_path_buf(),
        })
    }

    /// GET with retries while the server answers 429.
    fn get_with_retry(&self, url: &str) -> Result<Response> {
        let mut attempts = 0;

        loop {
            let response = self.client.get(url).send()?;
            let status = response.status();

            if status.is_success() {
                return Ok(response);
            } else if status == StatusCode::TOO_MANY_REQUESTS {
                attempts += 1;
                if attempts >= self.config.max_attempts {
                    return Err(NovelError::HttpStatus {
                        url: url.to_string(),
                        status: status.as_u16(),
                    });
                }
                let wait_time = response
                    .headers()
                    .get("Retry-After")
                    .and_then(|v| v.to_str().ok())
                    .and_then(|v| v.parse::<u64>().ok())
                    .unwrap_or(1);
                warn!("Rate limited. Waiting {} seconds before retrying...", wait_time);
                thread::sleep(Duration::from_secs(wait_time));
            } else {
                return Err(NovelError::HttpStatus {
                    url: url.to_string(),
                    status: status.as_u16(),
                });
            }
        }
    }

    pub fn fetch_page(&self, url: &str) -> Result<String> {
        debug!("Requesting {}", url);
        Ok(self.get_with_retry(url)?.text()?)
    }

    /// Absolute url of a link found on the browser page.
    pub fn hardcopy_url(&self, href: &str) -> Result<String> {
        let base = Url::parse(&self.config.hardcopy_base)
            .map_err(|e| NovelError::Url(self.config.hardcopy_base.clone(), e.to_string()))?;
        base.join(href)
            .map(|url| url.to_string())
            .map_err(|e| NovelError::Url(href.to_string(), e.to_string()))
    }

    pub fn download(&self, url: &str, dest: &Path) -> Result<()> {
        debug!("Downloading {} to {}", url, dest.display());
        let mut response = self.get_with_retry(url)?;
        let mut file = File::create(dest).map_err(|e| NovelError::io(dest, e))?;
        response.copy_to(&mut file)?;
        Ok(())
    }
}

impl ImageRenderer for BrowserClient {
    fn render(&self, name: &str, tracks: &str) -> Result<PathBuf> {
        publish_tracks(&self.config, name, tracks)?;
        let url = browser_url(&self.config, name);
        let page = self.fetch_page(&url)?;
        let href = extract_hardcopy_link(&page, self.config.anchor_offset)?;
        let image_url = self.hardcopy_url(&href)?;
        let out = self.outdir.join(format!("{}.pdf", name));
        self.download(&image_url, &out)?;
        info!("Rendered {}", name);
        Ok(out)
    }
}

/// Publishes the track file but leaves the browser alone; the result is the
/// track file itself.
pub struct TrackWriter {
    config: Config,
}

impl TrackWriter {
    pub fn new(config: &Config) -> Self {
        Self { config: config.clone() }
    }
}

impl ImageRenderer for TrackWriter {
    fn render(&self, name: &str, tracks: &str) -> Result<PathBuf> {
        let path = publish_tracks(&self.config, name, tracks)?;
        debug!("Track file for {}: {}", name, browser_url(&self.config, name));
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_browser_url() {
        let config = Config {
            public_url: "http://host/tracks/".to_string(),
            ..Config::default()
        };
        assert_eq!(
            browser_url(&config, "S1_1000"),
            "http://genome.ucsc.edu/cgi-bin/hgTracks?db=hg19&hgt.customText=http://host/tracks/S1_1000&hgt.psOutput=on"
        );
    }

    #[test]
    fn test_hardcopy_url_resolves_relative_link() {
        let client = BrowserClient::new(&Config::default(), Path::new(".")).unwrap();
        assert_eq!(
            client.hardcopy_url("../trash/hgt/hgt_genome_1.pdf").unwrap(),
            "http://genome.ucsc.edu/trash/hgt/hgt_genome_1.pdf"
        );
        assert_eq!(
            client.hardcopy_url("http://other.org/a.pdf").unwrap(),
            "http://other.org/a.pdf"
        );
    }
}
