/// Picks a safe local filename for a download.
///
/// Uses the `filename=` parameter of `Content-Disposition` when present,
/// otherwise `fallback`. The result never contains path separators.
pub fn download_filename(content_disposition: Option<&str>, fallback: &str) -> String {
    let candidate = content_disposition
        .and_then(disposition_filename)
        .map(|name| sanitize(&name))
        .unwrap_or_default();
    if candidate.is_empty() {
        fallback.to_string()
    } else {
        candidate
    }
}

fn disposition_filename(header: &str) -> Option<String> {
    header.split(';').map(str::trim).find_map(|param| {
        let (key, value) = param.split_once('=')?;
        if !key.trim().eq_ignore_ascii_case("filename") {
            return None;
        }
        let value = value.trim().trim_matches('"');
        Some(value.to_string())
    })
}

fn sanitize(input: &str) -> String {
    // Keep only the last path component a server might send.
    let base = input.rsplit(['/', '\\']).next().unwrap_or(input);
    let cleaned: String = base
        .chars()
        .map(|c| if is_forbidden(c) { '_' } else { c })
        .collect();
    let mut cleaned = cleaned.trim_matches(&['_', ' ', '.'][..]).to_string();
    if cleaned.len() > 120 {
        let mut cut = 120;
        while !cleaned.is_char_boundary(cut) {
            cut -= 1;
        }
        cleaned.truncate(cut);
    }
    if is_reserved_windows_name(&cleaned) {
        cleaned.push('_');
    }
    cleaned
}

fn is_forbidden(c: char) -> bool {
    matches!(c,
        '\\' | '/' | ':' | '*' | '?' | '"' | '<' | '>' | '|' | '\0'..='\u{1F}'
    )
}

fn is_reserved_windows_name(name: &str) -> bool {
    const RESERVED: &[&str] = &[
        "CON", "PRN", "AUX", "NUL", "COM1", "COM2", "COM3", "COM4", "COM5", "COM6", "COM7", "COM8",
        "COM9", "LPT1", "LPT2", "LPT3", "LPT4", "LPT5", "LPT6", "LPT7", "LPT8", "LPT9",
    ];
    let stem = name.split('.').next().unwrap_or(name);
    RESERVED.iter().any(|r| r.eq_ignore_ascii_case(stem))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uses_disposition_filename() {
        assert_eq!(
            download_filename(Some("attachment; filename=sitemap.xml"), "x.bin"),
            "sitemap.xml"
        );
        assert_eq!(
            download_filename(Some("attachment; filename=\"urls 2.csv\""), "x.bin"),
            "urls 2.csv"
        );
    }

    #[test]
    fn falls_back_without_usable_name() {
        assert_eq!(download_filename(None, "sitemap.xml"), "sitemap.xml");
        assert_eq!(download_filename(Some("attachment"), "sitemap.xml"), "sitemap.xml");
        assert_eq!(
            download_filename(Some("attachment; filename=\"..\""), "sitemap.xml"),
            "sitemap.xml"
        );
    }

    #[test]
    fn strips_directories_and_reserved_names() {
        assert_eq!(
            download_filename(Some("attachment; filename=\"../../etc/passwd\""), "f"),
            "passwd"
        );
        assert_eq!(download_filename(Some("attachment; filename=CON.csv"), "f"), "CON.csv_");
        assert_eq!(download_filename(Some("attachment; filename=a:b.xml"), "f"), "a_b.xml");
    }
}
