/// Extensions the upload endpoint accepts. Matching is on the substring
/// after the last `.`, lowercased; there is no magic-byte sniffing.
pub const ALLOWED_EXTENSIONS: [&str; 4] = ["png", "jpg", "jpeg", "bmp"];

pub fn allowed_file(filename: &str) -> bool {
    filename
        .rsplit_once('.')
        .map(|(_, ext)| ALLOWED_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_allowed_extensions_case_insensitively() {
        for name in [
            "scan.png", "scan.jpg", "scan.jpeg", "scan.bmp", "SCAN.PNG", "scan.JpEg",
        ] {
            assert!(allowed_file(name), "{name} should be accepted");
        }
    }

    #[test]
    fn rejects_other_extensions() {
        for name in ["notes.txt", "scan.gif", "scan.tiff", "scan.png.exe"] {
            assert!(!allowed_file(name), "{name} should be rejected");
        }
    }

    #[test]
    fn rejects_names_without_an_extension() {
        assert!(!allowed_file("scan"));
        assert!(!allowed_file(""));
        assert!(!allowed_file("scan."));
    }

    #[test]
    fn only_the_last_extension_counts() {
        assert!(allowed_file("scan.backup.jpeg"));
        assert!(!allowed_file("scan.jpeg.backup"));
    }
}
