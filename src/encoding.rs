use encoding_rs::Encoding;
use xhtmlchardet::detect;

use crate::error::Error;

/// Detect the encoding of the start of an input.
///
/// A byte order mark or XML declaration wins; `hint` is used when the data
/// gives no indication.
pub(crate) fn encoding(data: &[u8], hint: Option<String>) -> Option<&'static Encoding> {
    let mut cursor = std::io::Cursor::new(data);
    let charsets = detect(&mut cursor, hint).ok()?;
    // no encoding detected
    let label = if charsets.is_empty() {
        "UTF-8"
    } else {
        &charsets[0]
    };
    Encoding::for_label(label.as_bytes())
}

/// Resolve a caller supplied encoding label.
pub(crate) fn override_encoding(label: &str) -> Result<&'static Encoding, Error> {
    Encoding::for_label(label.trim().as_bytes())
        .ok_or_else(|| Error::UnknownEncoding(label.to_string()))
}

/// Pick the encoding for an input. A caller supplied label wins over
/// detection.
pub(crate) fn sniff(data: &[u8], label: Option<&str>) -> Result<&'static Encoding, Error> {
    if let Some(label) = label {
        return override_encoding(label);
    }
    Ok(encoding(data, None).unwrap_or(encoding_rs::UTF_8))
}

/// Decode a complete input to a string, stripping a byte order mark.
pub(crate) fn decode(data: &[u8], encoding: &'static Encoding) -> Result<String, Error> {
    let (decoded, _, had_errors) = encoding.decode(data);
    if had_errors {
        return Err(Error::Encoding(encoding.name().to_string()));
    }
    Ok(decoded.into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_utf8() {
        let data = b"<?xml version=\"1.0\" encoding=\"UTF-8\"?><a/>";
        let enc = encoding(data, None).unwrap();
        assert_eq!(enc.name(), "UTF-8");
    }

    #[test]
    fn test_utf8_without_declaration() {
        let data = b"<a/>";
        let enc = encoding(data, None).unwrap();
        assert_eq!(enc.name(), "UTF-8");
    }

    #[test]
    fn test_iso8859_1() {
        let data = b"<?xml version=\"1.0\" encoding=\"iso-8859-1\"?><a/>";
        let enc = encoding(data, None).unwrap();
        // windows-1252 is a superset of 8859-1
        assert_eq!(enc.name(), "windows-1252");
    }

    #[test]
    fn test_unknown_override() {
        assert!(matches!(
            sniff(b"<a/>", Some("no-such-encoding")),
            Err(Error::UnknownEncoding(label)) if label == "no-such-encoding"
        ));
    }

    #[test]
    fn test_override_wins() {
        let enc = sniff(b"<a>caf\xe9</a>", Some("latin1")).unwrap();
        assert_eq!(enc.name(), "windows-1252");
    }

    #[test]
    fn test_decode_latin1() {
        let data = b"<?xml version=\"1.0\" encoding=\"iso-8859-1\"?><a>caf\xe9</a>";
        let enc = sniff(data, None).unwrap();
        let decoded = decode(data, enc).unwrap();
        assert!(decoded.ends_with("<a>café</a>"));
    }

    #[test]
    fn test_decode_strips_bom() {
        let data = b"\xEF\xBB\xBF<a/>";
        assert_eq!(decode(data, encoding_rs::UTF_8).unwrap(), "<a/>");
    }
}
