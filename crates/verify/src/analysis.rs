//! Heuristic content analysis: entropy, format detection, pattern scan.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

/// Bytes of a payload inspected by the text heuristic and pattern scan.
const SAMPLE_LEN: usize = 8 * 1024;

/// Minimum printable ratio for a payload to be considered text.
const TEXT_THRESHOLD: f64 = 0.9;

/// Magic-byte signatures checked in order; first match wins.
const MAGIC_SIGNATURES: &[(&[u8], &str)] = &[
    (b"\x89PNG\r\n\x1a\n", "image/png"),
    (b"\xff\xd8\xff", "image/jpeg"),
    (b"GIF87a", "image/gif"),
    (b"GIF89a", "image/gif"),
    (b"%PDF-", "application/pdf"),
    (b"PK\x03\x04", "application/zip"),
    (b"\x1f\x8b", "application/gzip"),
    (b"\0asm", "application/wasm"),
];

/// Heuristic analysis of a fetched payload.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ContentAnalysis {
    /// Payload size in bytes.
    pub size: u64,
    /// Shannon entropy over the byte histogram, in bits per byte (0..=8).
    pub entropy: f64,
    /// Whether the payload looks like text.
    pub is_text: bool,
    /// Whether the payload parses as JSON.
    pub is_json: bool,
    /// Sniffed MIME type, `application/octet-stream` when unknown.
    pub mime_type: String,
    /// Names of notable patterns found in textual content.
    pub patterns: Vec<String>,
}

/// Analyze a payload.
pub fn analyze(data: &[u8]) -> ContentAnalysis {
    let entropy = shannon_entropy(data);
    let is_text = looks_like_text(data);
    let is_json = is_text && serde_json::from_slice::<serde_json::Value>(data).is_ok();
    let mime_type = sniff_mime(data, is_text, is_json);
    let patterns = if is_text {
        scan_patterns(&String::from_utf8_lossy(
            &data[..data.len().min(SAMPLE_LEN)],
        ))
    } else {
        Vec::new()
    };

    ContentAnalysis {
        size: data.len() as u64,
        entropy,
        is_text,
        is_json,
        mime_type,
        patterns,
    }
}

/// Shannon entropy over the byte histogram.
fn shannon_entropy(data: &[u8]) -> f64 {
    if data.is_empty() {
        return 0.0;
    }
    let mut histogram = [0u64; 256];
    for &byte in data {
        histogram[byte as usize] += 1;
    }
    let len = data.len() as f64;
    histogram
        .iter()
        .filter(|&&count| count > 0)
        .map(|&count| {
            let p = count as f64 / len;
            -p * p.log2()
        })
        .sum()
}

fn looks_like_text(data: &[u8]) -> bool {
    if data.is_empty() {
        return false;
    }
    let sample = &data[..data.len().min(SAMPLE_LEN)];
    let printable = sample
        .iter()
        .filter(|&&b| b.is_ascii_graphic() || matches!(b, b' ' | b'\t' | b'\n' | b'\r'))
        .count();
    printable as f64 / sample.len() as f64 >= TEXT_THRESHOLD
}

fn sniff_mime(data: &[u8], is_text: bool, is_json: bool) -> String {
    for (magic, mime) in MAGIC_SIGNATURES {
        if data.starts_with(magic) {
            return (*mime).to_string();
        }
    }
    if is_json {
        "application/json".to_string()
    } else if is_text {
        "text/plain".to_string()
    } else {
        "application/octet-stream".to_string()
    }
}

fn pattern_set() -> &'static [(&'static str, Regex)] {
    static PATTERNS: OnceLock<Vec<(&'static str, Regex)>> = OnceLock::new();
    PATTERNS.get_or_init(|| {
        vec![
            ("url", Regex::new(r"https?://[^\s]+").expect("static regex")),
            (
                "email",
                Regex::new(r"[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}")
                    .expect("static regex"),
            ),
            (
                "content-address",
                Regex::new(r"Qm[1-9A-HJ-NP-Za-km-z]{44}").expect("static regex"),
            ),
            (
                "hex-blob",
                Regex::new(r"\b[0-9a-fA-F]{40,}\b").expect("static regex"),
            ),
        ]
    })
}

fn scan_patterns(text: &str) -> Vec<String> {
    pattern_set()
        .iter()
        .filter(|(_, regex)| regex.is_match(text))
        .map(|(name, _)| (*name).to_string())
        .collect()
}
