use std::io::{Read, Write};

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use flate2::Compression;
use flate2::read::DeflateDecoder;
use flate2::write::DeflateEncoder;

use crate::model::Board;

use super::board_io::{BoardError, LoadedBoard, parse_board, serialize_board};

/// Upper bound on an inflated share document
const MAX_DOCUMENT_BYTES: u64 = 16 * 1024 * 1024;

#[derive(Debug, thiserror::Error)]
pub enum ShareError {
    #[error("share link has no data")]
    Empty,
    #[error("share link is not valid base64: {0}")]
    Base64(#[from] base64::DecodeError),
    #[error("share link data is corrupt: {0}")]
    Codec(#[source] std::io::Error),
    #[error("shared document is too large")]
    TooLarge,
    #[error(transparent)]
    Board(#[from] BoardError),
}

/// Encode a board as a URL-safe token: compact JSON, raw deflate, base64
/// without padding.
pub fn encode(board: &Board) -> Result<String, ShareError> {
    let json = serialize_board(board)?;
    let mut encoder = DeflateEncoder::new(Vec::new(), Compression::best());
    encoder
        .write_all(json.as_bytes())
        .map_err(ShareError::Codec)?;
    let compressed = encoder.finish().map_err(ShareError::Codec)?;
    Ok(URL_SAFE_NO_PAD.encode(compressed))
}

/// Decode a token, or a URL carrying one in its `data` parameter, and
/// validate the board inside it. Tokens that are not deflate data are
/// retried as LZ-string `compressToEncodedURIComponent` output, the format
/// of links made by the web version of the board.
pub fn decode(input: &str) -> Result<LoadedBoard, ShareError> {
    let token = extract_token(input).ok_or(ShareError::Empty)?;
    let err = match inflate(token).and_then(|json| Ok(parse_board(&json)?)) {
        Ok(loaded) => return Ok(loaded),
        Err(e) => e,
    };
    match decompress_lz_string(token).map(|json| parse_board(&json)) {
        Some(Ok(loaded)) => {
            tracing::debug!("share token decoded as LZ-string");
            Ok(loaded)
        }
        _ => Err(err),
    }
}

fn inflate(token: &str) -> Result<String, ShareError> {
    let compressed = URL_SAFE_NO_PAD.decode(token.trim_end_matches('='))?;

    let mut json = String::new();
    DeflateDecoder::new(compressed.as_slice())
        .take(MAX_DOCUMENT_BYTES + 1)
        .read_to_string(&mut json)
        .map_err(ShareError::Codec)?;
    if json.len() as u64 > MAX_DOCUMENT_BYTES {
        return Err(ShareError::TooLarge);
    }
    Ok(json)
}

fn decompress_lz_string(token: &str) -> Option<String> {
    let units = lz_str::decompress_from_encoded_uri_component(token)?;
    if units.is_empty() || units.len() as u64 > MAX_DOCUMENT_BYTES {
        return None;
    }
    String::from_utf16(&units).ok()
}

/// `{base}?data={token}`, joining with `&` when `base` already has a query
pub fn share_url(base: &str, token: &str) -> String {
    let sep = if base.contains('?') { '&' } else { '?' };
    format!("{}{}data={}", base, sep, token)
}

/// Pull the token out of user input: either the bare token or the value
/// of a `data=` query parameter.
pub fn extract_token(input: &str) -> Option<&str> {
    let input = input.trim();
    let token = match input.split_once('?') {
        Some((_, query)) => query
            .split('#')
            .next()
            .unwrap_or_default()
            .split('&')
            .find_map(|pair| pair.strip_prefix("data="))?,
        None => input.strip_prefix("data=").unwrap_or(input),
    };
    if token.is_empty() { None } else { Some(token) }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::defaults::default_board;
    use pretty_assertions::assert_eq;

    #[test]
    fn token_round_trip() {
        let board = default_board();
        let token = encode(&board).unwrap();
        assert!(
            token
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        );
        assert_eq!(decode(&token).unwrap().board, board);
    }

    #[test]
    fn decode_from_url() {
        let board = default_board();
        let token = encode(&board).unwrap();
        let url = share_url("https://stickerboard.app/", &token);
        assert_eq!(url, format!("https://stickerboard.app/?data={}", token));
        assert_eq!(decode(&url).unwrap().board, board);

        let with_query = share_url("https://host/page?v=2", &token);
        assert!(with_query.contains("?v=2&data="));
        assert_eq!(decode(&with_query).unwrap().board, board);
    }

    #[test]
    fn extract_token_forms() {
        assert_eq!(extract_token("abc"), Some("abc"));
        assert_eq!(extract_token(" data=abc \n"), Some("abc"));
        assert_eq!(extract_token("http://h/?x=1&data=abc#top"), Some("abc"));
        assert_eq!(extract_token("http://h/?x=1"), None);
        assert_eq!(extract_token(""), None);
    }

    #[test]
    fn garbage_is_rejected() {
        assert!(matches!(decode("!!!"), Err(ShareError::Base64(_))));
        assert!(matches!(decode(""), Err(ShareError::Empty)));
        // Valid base64, not deflate data
        let bogus = URL_SAFE_NO_PAD.encode([0xffu8; 16]);
        assert!(decode(&bogus).is_err());
    }

    #[test]
    fn lz_string_links_from_the_web_board_open() {
        let board = default_board();
        let json = serialize_board(&board).unwrap();
        let token = lz_str::compress_to_encoded_uri_component(json.as_str());
        let url = format!("https://stickerboard.app/?data={}", token);
        assert_eq!(decode(&url).unwrap().board, board);
    }

    #[test]
    fn decoded_board_is_repaired() {
        // Two stickers sharing an id survive with distinct ids
        let json = r#"[{"id":"l","name":"L","subLists":[{"id":"s","name":"S",
            "stickers":[{"id":"x","name":"A","price":1},{"id":"x","name":"B","price":2}]}]}]"#;
        let mut encoder = DeflateEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(json.as_bytes()).unwrap();
        let token = URL_SAFE_NO_PAD.encode(encoder.finish().unwrap());

        let loaded = decode(&token).unwrap();
        let stickers = &loaded.board.lists[0].sub_lists[0].stickers;
        assert_ne!(stickers[0].id, stickers[1].id);
        assert_eq!(loaded.repairs.len(), 1);
    }
}
