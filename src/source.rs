// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Retrieval of the raw UCD files.
//!
//! A source hands back the complete decoded text of one file, so callers can
//! iterate its lines as often as they like. Progress is reported through an
//! optional [`Progress`] observer, which parsing never sees.

use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};

use reqwest::blocking::Client;
use reqwest::header::ACCEPT_ENCODING;

use crate::apperr::{Error, Result};
use crate::helpers::{KIBI, MEBI, MetricFormatter};

pub const UCD_BASE_URL: &str = "https://www.unicode.org/Public";
pub const UNICODE_DATA: &str = "UnicodeData.txt";
pub const EAST_ASIAN_WIDTH: &str = "EastAsianWidth.txt";

const MIN_BLOCK_SIZE: u64 = KIBI;
const MAX_BLOCK_SIZE: u64 = MEBI;

/// The URL of `file` within the given UCD release, e.g. `14.0.0`.
pub fn ucd_url(version: &str, file: &str) -> String {
    format!("{UCD_BASE_URL}/{version}/ucd/{file}")
}

/// Reads in roughly 100 steps, but never in blocks smaller than 1 KiB or larger than 1 MiB.
pub fn recommend_block_size(total_size: u64) -> usize {
    total_size.div_ceil(100).clamp(MIN_BLOCK_SIZE, MAX_BLOCK_SIZE) as usize
}

/// Observes the bytes flowing in from a [`LineSource`].
pub trait Progress {
    fn start(&mut self, total: u64);
    fn advance(&mut self, bytes: u64);
    fn finish(&mut self);
}

/// Logs every 10% of progress.
pub struct LogProgress {
    label: String,
    total: u64,
    done: u64,
    reported: u64,
}

impl LogProgress {
    pub fn new(label: impl Into<String>) -> Self {
        Self { label: label.into(), total: 0, done: 0, reported: 0 }
    }

    fn percent(&self) -> u64 {
        if self.total == 0 { 100 } else { (self.done * 100 / self.total).min(100) }
    }
}

impl Progress for LogProgress {
    fn start(&mut self, total: u64) {
        self.total = total;
        self.done = 0;
        self.reported = 0;
        log::info!("{}: {}", self.label, MetricFormatter(total));
    }

    fn advance(&mut self, bytes: u64) {
        self.done += bytes;
        let step = self.percent() / 10 * 10;
        if step > self.reported && step < 100 {
            self.reported = step;
            log::info!("{}: {step}% ({})", self.label, MetricFormatter(self.done));
        }
    }

    fn finish(&mut self) {
        log::info!("{}: done ({})", self.label, MetricFormatter(self.done));
    }
}

pub trait LineSource {
    /// Where the lines come from, for diagnostics.
    fn describe(&self) -> String;

    /// Retrieves and decodes the whole file.
    fn fetch(&self, progress: Option<&mut dyn Progress>) -> Result<String>;
}

/// Downloads a file over HTTP(S).
pub struct HttpSource {
    client: Client,
    url: String,
}

impl HttpSource {
    pub fn new(client: Client, url: impl Into<String>) -> Self {
        Self { client, url: url.into() }
    }
}

impl LineSource for HttpSource {
    fn describe(&self) -> String {
        self.url.clone()
    }

    fn fetch(&self, mut progress: Option<&mut dyn Progress>) -> Result<String> {
        // The content length is only meaningful for an unencoded body.
        let mut response = self
            .client
            .get(&self.url)
            .header(ACCEPT_ENCODING, "identity")
            .send()?
            .error_for_status()?;

        let total = response
            .content_length()
            .ok_or_else(|| Error::retrieval(&self.url, "missing content length"))?;
        if let Some(p) = progress.as_mut() {
            p.start(total);
        }

        let mut body = Vec::with_capacity(total as usize);
        let mut block = vec![0; recommend_block_size(total)];
        loop {
            let n = response.read(&mut block).map_err(|err| Error::retrieval(&self.url, err))?;
            if n == 0 {
                break;
            }
            body.extend_from_slice(&block[..n]);
            if let Some(p) = progress.as_mut() {
                p.advance(n as u64);
            }
        }

        if let Some(p) = progress.as_mut() {
            p.finish();
        }
        decode(&self.url, body)
    }
}

/// Reads a file from a local copy of the UCD.
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self { path: path.as_ref().to_path_buf() }
    }
}

impl LineSource for FileSource {
    fn describe(&self) -> String {
        self.path.display().to_string()
    }

    fn fetch(&self, mut progress: Option<&mut dyn Progress>) -> Result<String> {
        let body = fs::read(&self.path).map_err(|err| Error::retrieval(self.describe(), err))?;
        if let Some(p) = progress.as_mut() {
            p.start(body.len() as u64);
            p.advance(body.len() as u64);
            p.finish();
        }
        decode(&self.describe(), body)
    }
}

fn decode(source: &str, body: Vec<u8>) -> Result<String> {
    String::from_utf8(body).map_err(|err| Error::retrieval(source, err))
}
