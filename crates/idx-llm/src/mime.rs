//! MIME type inference for uploaded documents

/// Fallback for unknown extensions
pub const OCTET_STREAM: &str = "application/octet-stream";

/// Guess a MIME type from a file name's extension
///
/// Covers the report formats the dashboard accepts, plus a few common
/// spreadsheet/text variants.
pub fn mime_type_for(filename: &str) -> &'static str {
    let extension = std::path::Path::new(filename)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase);

    match extension.as_deref() {
        Some("pdf") => "application/pdf",
        Some("txt") => "text/plain",
        Some("csv") => "text/csv",
        Some("md") => "text/markdown",
        Some("html" | "htm") => "text/html",
        Some("docx") => "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
        Some("xlsx") => "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
        _ => OCTET_STREAM,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_extensions() {
        assert_eq!(mime_type_for("laporan.pdf"), "application/pdf");
        assert_eq!(mime_type_for("LAPORAN.PDF"), "application/pdf");
        assert_eq!(mime_type_for("notes.txt"), "text/plain");
        assert!(mime_type_for("q3.docx").contains("wordprocessingml"));
    }

    #[test]
    fn test_unknown_extension() {
        assert_eq!(mime_type_for("archive.zip"), OCTET_STREAM);
        assert_eq!(mime_type_for("no_extension"), OCTET_STREAM);
    }
}
