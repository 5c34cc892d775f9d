use chardetng::EncodingDetector;
use encoding_rs::{Encoding, UTF_8};
use engine_logging::engine_debug;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedHtml {
    pub html: String,
    pub encoding_label: String,
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum DecodeError {
    #[error("failed to decode page bytes as {encoding}")]
    DecodeFailure { encoding: String },
}

/// Decodes a page body to UTF-8: BOM, then the Content-Type charset, then plain
/// UTF-8, then a `chardetng` guess.
pub fn decode_html(bytes: &[u8], content_type: Option<&str>) -> Result<DecodedHtml, DecodeError> {
    if let Some((encoding, bom_len)) = Encoding::for_bom(bytes) {
        return decode_strict(&bytes[bom_len..], encoding);
    }

    if let Some(encoding) = content_type
        .and_then(charset_param)
        .and_then(|label| Encoding::for_label(label.as_bytes()))
    {
        match decode_strict(bytes, encoding) {
            Ok(decoded) => return Ok(decoded),
            Err(err) => engine_debug!("{}; falling back to detection", err),
        }
    }

    if let Ok(decoded) = decode_strict(bytes, UTF_8) {
        return Ok(decoded);
    }

    let mut detector = EncodingDetector::new();
    detector.feed(bytes, true);
    let guessed = detector.guess(None, true);
    decode_strict(bytes, guessed)
}

fn charset_param(content_type: &str) -> Option<String> {
    content_type.split(';').skip(1).find_map(|param| {
        let (key, value) = param.split_once('=')?;
        key.trim()
            .eq_ignore_ascii_case("charset")
            .then(|| value.trim().trim_matches(['"', '\'']).to_string())
    })
}

fn decode_strict(bytes: &[u8], encoding: &'static Encoding) -> Result<DecodedHtml, DecodeError> {
    let (text, had_errors) = encoding.decode_without_bom_handling(bytes);
    if had_errors {
        return Err(DecodeError::DecodeFailure {
            encoding: encoding.name().to_string(),
        });
    }
    Ok(DecodedHtml {
        html: text.into_owned(),
        encoding_label: encoding.name().to_string(),
    })
}
