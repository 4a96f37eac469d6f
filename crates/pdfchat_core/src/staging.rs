use std::path::{Path, PathBuf};

pub const PDF_MEDIA_TYPE: &str = "application/pdf";

/// A file chosen or dropped by the user and not yet uploaded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StagedFile {
    pub name: String,
    pub path: PathBuf,
    pub media_type: String,
}

impl StagedFile {
    /// Builds a handle from a local path, deriving the media type from the
    /// file extension.
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.to_string_lossy().into_owned());
        let media_type = media_type_for_path(&path).to_string();
        Self {
            name,
            path,
            media_type,
        }
    }

    pub fn is_pdf(&self) -> bool {
        let essence = self
            .media_type
            .split(';')
            .next()
            .unwrap_or(&self.media_type)
            .trim();
        essence.eq_ignore_ascii_case(PDF_MEDIA_TYPE)
    }
}

/// Keeps only the PDF items, preserving order. Everything else is dropped
/// without notice.
pub fn filter_pdfs(files: Vec<StagedFile>) -> Vec<StagedFile> {
    files.into_iter().filter(StagedFile::is_pdf).collect()
}

pub fn media_type_for_path(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase);
    match ext.as_deref() {
        Some("pdf") => PDF_MEDIA_TYPE,
        Some("txt") => "text/plain",
        Some("md") => "text/markdown",
        Some("htm" | "html") => "text/html",
        Some("json") => "application/json",
        Some("png") => "image/png",
        Some("jpg" | "jpeg") => "image/jpeg",
        _ => "application/octet-stream",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn media_type_follows_extension() {
        assert_eq!(media_type_for_path(Path::new("/tmp/Report.PDF")), PDF_MEDIA_TYPE);
        assert_eq!(media_type_for_path(Path::new("notes.txt")), "text/plain");
        assert_eq!(
            media_type_for_path(Path::new("no_extension")),
            "application/octet-stream"
        );
    }

    #[test]
    fn from_path_uses_file_name() {
        let staged = StagedFile::from_path("/home/me/papers/a.pdf");
        assert_eq!(staged.name, "a.pdf");
        assert!(staged.is_pdf());
    }

    #[test]
    fn media_type_parameters_are_ignored() {
        let staged = StagedFile {
            name: "a".into(),
            path: PathBuf::from("a"),
            media_type: "Application/PDF; charset=binary".into(),
        };
        assert!(staged.is_pdf());
    }
}
