//! `$DWGCODEPAGE` handling for drawings older than AC1021.
//!
//! From AC1021 on, text streams are UTF-8 whatever the code page says. Older
//! streams store strings in the code page named in the header; bytes that
//! are not valid UTF-8 are then decoded with the matching encoding.

use encoding_rs::Encoding;

/// First version whose text streams are always UTF-8
pub const UTF8_VERSION: &str = "AC1021";

/// Code page names, lowercase, and their encodings
fn code_pages() -> [(&'static [&'static str], &'static Encoding); 20] {
    [
        (&["ansi_936", "gb2312"], encoding_rs::GBK),
        (&["ansi_950", "big5"], encoding_rs::BIG5),
        (&["ansi_949", "korean", "johab"], encoding_rs::EUC_KR),
        (&["ansi_932"], encoding_rs::SHIFT_JIS),
        (&["ansi_874"], encoding_rs::WINDOWS_874),
        (&["ansi_1250", "dos852"], encoding_rs::WINDOWS_1250),
        (&["ansi_1251"], encoding_rs::WINDOWS_1251),
        (&["ansi_1253", "dos869"], encoding_rs::WINDOWS_1253),
        (&["ansi_1254", "dos857", "iso8859-9"], encoding_rs::WINDOWS_1254),
        (&["ansi_1255"], encoding_rs::WINDOWS_1255),
        (&["ansi_1256"], encoding_rs::WINDOWS_1256),
        (&["ansi_1257"], encoding_rs::WINDOWS_1257),
        (&["ansi_1258"], encoding_rs::WINDOWS_1258),
        (&["dos437", "dos855", "dos866"], encoding_rs::IBM866),
        (&["iso8859-2"], encoding_rs::ISO_8859_2),
        (&["iso8859-5"], encoding_rs::ISO_8859_5),
        (&["iso8859-7"], encoding_rs::ISO_8859_7),
        (&["iso8859-15"], encoding_rs::ISO_8859_15),
        (&["koi8-r"], encoding_rs::KOI8_R),
        (&["koi8-u"], encoding_rs::KOI8_U),
    ]
}

/// Encoding for a code page name.
///
/// `None` for UTF-8 and plain ASCII. Unknown names fall back to
/// Windows-1252, the usual code page of western drawings.
pub fn encoding_from_code_page(code_page: &str) -> Option<&'static Encoding> {
    let name = code_page.trim().to_ascii_lowercase().replace("iso_", "iso");
    if matches!(name.as_str(), "ascii" | "utf-8" | "utf8" | "unicode") {
        return None;
    }
    let found = code_pages()
        .into_iter()
        .find(|(names, _)| names.contains(&name.as_str()))
        .map(|(_, encoding)| encoding);
    Some(found.unwrap_or(encoding_rs::WINDOWS_1252))
}

/// Fallback encoding for a stream written by `version` with `code_page`
pub fn stream_encoding(version: &str, code_page: Option<&str>) -> Option<&'static Encoding> {
    // Version strings compare in release order ("AC1015" < "AC1021")
    if version.is_empty() || version.trim() >= UTF8_VERSION {
        return None;
    }
    code_page.and_then(encoding_from_code_page)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_case_insensitive() {
        assert_eq!(encoding_from_code_page("ansi_1251"), Some(encoding_rs::WINDOWS_1251));
        assert_eq!(encoding_from_code_page("ANSI_1251"), Some(encoding_rs::WINDOWS_1251));
    }

    #[test]
    fn test_utf8_and_ascii_need_no_fallback() {
        assert_eq!(encoding_from_code_page("ASCII"), None);
        assert_eq!(encoding_from_code_page("UTF-8"), None);
    }

    #[test]
    fn test_unknown_code_page_is_western() {
        assert_eq!(encoding_from_code_page("SOMETHING_UNKNOWN"), Some(encoding_rs::WINDOWS_1252));
        assert_eq!(encoding_from_code_page("ISO_8859-2"), Some(encoding_rs::ISO_8859_2));
    }

    #[test]
    fn test_stream_encoding_depends_on_version() {
        assert_eq!(stream_encoding("AC1024", Some("ANSI_936")), None);
        assert_eq!(stream_encoding("AC1015", Some("ANSI_936")), Some(encoding_rs::GBK));
        assert_eq!(stream_encoding("AC1015", None), None);
        assert_eq!(stream_encoding("", Some("ANSI_936")), None);
    }
}
