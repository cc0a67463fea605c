//! Collects the destinations that fell through to the final `MATCH` rule.
//!
//! Client logs are scanned for lines reporting a `match Match` hit; the
//! hosts and URLs on those lines are candidates for new routing rules.

use chrono::Local;
use log::{error, info, warn};
use lazy_static::lazy_static;
use regex::Regex;
use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::utils::file_write;

const MATCH_KEYWORD: &str = "match Match";
const LOG_EXTENSIONS: [&str; 3] = ["log", "txt", "out"];
const TRAILING_PUNCTUATION: &[char] = &['.', ',', ';', ':', '!', '?', ')'];

lazy_static! {
    static ref MATCH_PATTERN: Regex =
        Regex::new(r"(?i)^.*match Match\s+(.+?)(?:\s|$)").unwrap();
    static ref URL_PATTERN: Regex =
        Regex::new(r"(?i)(https?://[^\s]+)|([a-zA-Z0-9.-]+\.[a-zA-Z]{2,}(?:/[^\s]*)?)").unwrap();
}

/// Outcome of one analyzer run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AnalysisReport {
    /// Log files that were scanned
    pub files: usize,
    /// Unique URLs found across all files
    pub urls: usize,
}

pub struct MatchLogAnalyzer {
    log_dir: PathBuf,
    output_file: PathBuf,
    matched_urls: BTreeSet<String>,
}

fn is_log_file(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| LOG_EXTENSIONS.contains(&e.to_lowercase().as_str()))
        .unwrap_or(false)
}

/// Walk `dir` without following directory symlinks; unreadable entries are skipped
fn collect_files(dir: &Path, files: &mut Vec<PathBuf>) {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) => {
            warn!("Skipping directory {}: {}", dir.display(), e);
            return;
        }
    };

    for entry in entries {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                warn!("Skipping entry in {}: {}", dir.display(), e);
                continue;
            }
        };
        let file_type = match entry.file_type() {
            Ok(file_type) => file_type,
            Err(e) => {
                warn!("Skipping {}: {}", entry.path().display(), e);
                continue;
            }
        };

        let path = entry.path();
        if file_type.is_dir() {
            collect_files(&path, files);
        } else if (file_type.is_file() || (file_type.is_symlink() && path.is_file()))
            && is_log_file(&path)
        {
            files.push(path);
        }
    }
}

impl MatchLogAnalyzer {
    pub fn new(log_dir: impl Into<PathBuf>, output_file: impl Into<PathBuf>) -> Self {
        Self {
            log_dir: log_dir.into(),
            output_file: output_file.into(),
            matched_urls: BTreeSet::new(),
        }
    }

    /// Unique URLs collected so far, in sorted order
    pub fn matched_urls(&self) -> impl Iterator<Item = &str> {
        self.matched_urls.iter().map(String::as_str)
    }

    /// Every `.log`, `.txt` or `.out` file below the log directory
    pub fn find_log_files(&self) -> Vec<PathBuf> {
        let mut files = Vec::new();
        if !self.log_dir.is_dir() {
            error!("Log directory {} does not exist", self.log_dir.display());
            return files;
        }

        collect_files(&self.log_dir, &mut files);
        files.sort();
        for file in &files {
            info!("Found log file: {}", file.display());
        }
        files
    }

    /// URLs and hosts mentioned on a `match Match` line, in order of appearance
    pub fn extract_urls_from_line(line: &str) -> Vec<String> {
        let mut urls: Vec<String> = Vec::new();
        if !line.contains(MATCH_KEYWORD) {
            return urls;
        }

        let haystack = MATCH_PATTERN
            .captures(line)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str())
            .unwrap_or(line);

        for found in URL_PATTERN.find_iter(haystack) {
            let cleaned = found.as_str().trim().trim_end_matches(TRAILING_PUNCTUATION);
            if !cleaned.is_empty() && !urls.iter().any(|u| u == cleaned) {
                urls.push(cleaned.to_string());
            }
        }
        urls
    }

    /// Scan one file and return how many previously unseen URLs it added
    pub fn analyze_file(&mut self, path: &Path) -> usize {
        let bytes = match fs::read(path) {
            Ok(bytes) => bytes,
            Err(e) => {
                error!("Failed to read {}: {}", path.display(), e);
                return 0;
            }
        };

        info!("Analyzing {}", path.display());
        let content = String::from_utf8_lossy(&bytes);
        let mut added = 0;
        for (index, line) in content.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            for url in Self::extract_urls_from_line(line) {
                info!("  line {}: {}", index + 1, url);
                if self.matched_urls.insert(url) {
                    added += 1;
                }
            }
        }
        added
    }

    /// Render the report written by [`save_results`](Self::save_results)
    pub fn render_results(&self) -> String {
        let mut out = String::new();
        out.push_str("# Clash 内核 Match 规则匹配网址\n");
        out.push_str(&format!(
            "# 生成时间: {}\n",
            Local::now().format("%Y-%m-%d %H:%M:%S")
        ));
        out.push_str(&format!("# 总计匹配网址数: {}\n", self.matched_urls.len()));
        out.push_str(&format!("# {}\n\n", "=".repeat(60)));

        for (index, url) in self.matched_urls.iter().enumerate() {
            out.push_str(&format!("{}. {}\n", index + 1, url));
        }
        out
    }

    pub fn save_results(&self) -> Result<()> {
        file_write(&self.output_file, &self.render_results())?;
        info!(
            "Saved {} unique URLs to {}",
            self.matched_urls.len(),
            self.output_file.display()
        );
        Ok(())
    }

    /// Scan every log file and save the results if anything was found
    pub fn run(&mut self) -> Result<AnalysisReport> {
        info!("Log directory: {}", self.log_dir.display());
        info!("Output file: {}", self.output_file.display());

        let files = self.find_log_files();
        if files.is_empty() {
            warn!("No log files found");
            return Ok(AnalysisReport::default());
        }

        for file in &files {
            self.analyze_file(file);
        }

        let report = AnalysisReport {
            files: files.len(),
            urls: self.matched_urls.len(),
        };
        info!("Found {} unique URLs in {} files", report.urls, report.files);

        if self.matched_urls.is_empty() {
            warn!("No matching URLs found");
        } else {
            self.save_results()?;
        }
        Ok(report)
    }
}
