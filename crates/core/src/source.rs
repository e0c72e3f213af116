//! Decoding outline files of unknown encoding.
//!
//! Candidates are tried in a fixed order: UTF-8, GBK, GB2312, UTF-16. The
//! first one that decodes without errors wins.

use encoding_rs::{Encoding, GBK, UTF_16BE, UTF_16LE, UTF_8};

/// Encodings in probing order, by label.
const PROBE_ORDER: &[&str] = &["utf-8", "gbk", "gb2312", "utf-16"];

/// Text decoded from raw bytes, with the label of the encoding that worked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedSource {
    pub text: String,
    pub encoding: &'static str,
}

/// Decode `bytes` using the first encoding in [`PROBE_ORDER`] that accepts
/// them. Returns `None` if every candidate fails.
pub fn decode_source(bytes: &[u8]) -> Option<DecodedSource> {
    PROBE_ORDER.iter().find_map(|&label| {
        decode_as(bytes, label).map(|text| DecodedSource {
            text,
            encoding: label,
        })
    })
}

fn decode_as(bytes: &[u8], label: &str) -> Option<String> {
    match label {
        "utf-8" => {
            let bytes = bytes.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(bytes);
            decode_strict(UTF_8, bytes)
        }
        // GB2312 is a subset of GBK and shares its decoder.
        "gbk" | "gb2312" => {
            let encoding = Encoding::for_label(label.as_bytes()).unwrap_or(GBK);
            decode_strict(encoding, bytes)
        }
        "utf-16" => {
            if let Some(rest) = bytes.strip_prefix(b"\xFF\xFE") {
                decode_strict(UTF_16LE, rest)
            } else if let Some(rest) = bytes.strip_prefix(b"\xFE\xFF") {
                decode_strict(UTF_16BE, rest)
            } else {
                decode_strict(UTF_16LE, bytes)
            }
        }
        _ => None,
    }
}

fn decode_strict(encoding: &'static Encoding, bytes: &[u8]) -> Option<String> {
    encoding
        .decode_without_bom_handling_and_without_replacement(bytes)
        .map(|text| text.into_owned())
}
