//! # Upload handler: filesystem storage for uploaded note files
//!
//! [`UploadDir`] validates an incoming file by extension and writes it under a
//! single flat directory:
//!
//! ```text
//! <uploads>/
//! ├── 1718000000000.pdf
//! ├── 1718000000001.PNG      # same millisecond as above, bumped by one
//! └── 1718000004210.docx
//! ```
//!
//! Only the extension of the client-supplied filename survives. Files are opened
//! with `create_new`, and when a name is already taken the timestamp is bumped
//! until a free one is found, so two uploads never share a file.
//!
//! The value handed back to callers is a *reference* (`uploads/1718000000000.pdf`).
//! [`UploadDir::resolve`] only trusts the final path component of a reference, so
//! a tampered reference can't point outside the directory.

use std::collections::HashSet;
use std::io;
use std::path::{Path, PathBuf};

use chrono::Utc;
use tokio::io::AsyncWriteExt;

/// Extensions accepted by [`UploadDir::accept`], compared case-insensitively.
pub const ALLOWED_EXTENSIONS: [&str; 4] = ["pdf", "doc", "docx", "png"];

const MAX_NAME_ATTEMPTS: i64 = 1000;

#[derive(Debug, thiserror::Error)]
pub enum UploadError {
    #[error("File type not supported")]
    UnsupportedFileType(String),
    #[error("failed to store upload: {0}")]
    Io(#[from] io::Error),
}

/// A file written by [`UploadDir::accept`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StoredFile {
    /// Reference to persist in note metadata
    pub reference: String,
    /// Generated file name inside the uploads directory
    pub file_name: String,
}

/// Extension of the last path component including the leading dot, in its
/// original case. Client filenames may carry either separator.
pub fn extension(filename: &str) -> Option<String> {
    let base = filename.rsplit(['/', '\\']).next().unwrap_or(filename);
    Path::new(base)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| format!(".{ext}"))
}

/// Whether `filename` has one of the [`ALLOWED_EXTENSIONS`].
pub fn is_supported(filename: &str) -> bool {
    extension(filename)
        .map(|ext| {
            let ext = ext[1..].to_ascii_lowercase();
            ALLOWED_EXTENSIONS.contains(&ext.as_str())
        })
        .unwrap_or(false)
}

/// MIME type sent with a download.
pub fn content_type(file_name: &str) -> &'static str {
    let ext = extension(file_name)
        .map(|ext| ext[1..].to_ascii_lowercase())
        .unwrap_or_default();
    match ext.as_str() {
        "pdf" => "application/pdf",
        "doc" => "application/msword",
        "docx" => "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
        "png" => "image/png",
        _ => "application/octet-stream",
    }
}

/// Flat directory holding every uploaded file.
#[derive(Clone, Debug)]
pub struct UploadDir {
    dir: PathBuf,
    prefix: String,
}

impl UploadDir {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        let dir = dir.into();
        let prefix = dir
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("uploads")
            .to_string();
        Self { dir, prefix }
    }

    /// Create the directory if it is missing.
    pub async fn ensure_exists(&self) -> io::Result<()> {
        tokio::fs::create_dir_all(&self.dir).await
    }

    /// Validate `declared_filename` and write `bytes` under a fresh name.
    pub async fn accept(
        &self,
        declared_filename: &str,
        bytes: &[u8],
    ) -> Result<StoredFile, UploadError> {
        if !is_supported(declared_filename) {
            return Err(UploadError::UnsupportedFileType(
                declared_filename.to_string(),
            ));
        }
        let ext = extension(declared_filename).unwrap_or_default();

        let start = Utc::now().timestamp_millis();
        for bump in 0..MAX_NAME_ATTEMPTS {
            let file_name = format!("{}{}", start + bump, ext);
            let path = self.dir.join(&file_name);

            let mut file = match tokio::fs::OpenOptions::new()
                .write(true)
                .create_new(true)
                .open(&path)
                .await
            {
                Ok(file) => file,
                Err(e) if e.kind() == io::ErrorKind::AlreadyExists => continue,
                Err(e) => return Err(e.into()),
            };

            if let Err(e) = write_all(&mut file, bytes).await {
                drop(file);
                let _ = tokio::fs::remove_file(&path).await;
                return Err(e.into());
            }

            tracing::info!("Stored upload {} as {}", declared_filename, file_name);
            return Ok(StoredFile {
                reference: format!("{}/{}", self.prefix, file_name),
                file_name,
            });
        }

        Err(io::Error::new(
            io::ErrorKind::AlreadyExists,
            "no free upload file name",
        )
        .into())
    }

    /// Map a stored reference to its path inside the directory.
    pub fn resolve(&self, reference: &str) -> Option<PathBuf> {
        let name = Path::new(reference).file_name()?;
        Some(self.dir.join(name))
    }

    /// Read a stored file. `Ok(None)` when it no longer exists.
    pub async fn read(&self, reference: &str) -> io::Result<Option<Vec<u8>>> {
        let Some(path) = self.resolve(reference) else {
            return Ok(None);
        };
        match tokio::fs::read(path).await {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Delete a stored file. Missing files are not an error.
    pub async fn remove(&self, reference: &str) -> io::Result<()> {
        let Some(path) = self.resolve(reference) else {
            return Ok(());
        };
        match tokio::fs::remove_file(path).await {
            Err(e) if e.kind() != io::ErrorKind::NotFound => Err(e),
            _ => Ok(()),
        }
    }

    /// Delete every upload no reference points at. Only regular files with an
    /// allowed extension are considered, so dotfiles such as `.gitkeep` stay.
    /// Returns the number of files removed.
    pub async fn sweep_unreferenced(&self, references: &[String]) -> io::Result<usize> {
        let keep: HashSet<&str> = references
            .iter()
            .filter_map(|r| Path::new(r).file_name().and_then(|n| n.to_str()))
            .collect();

        let mut removed = 0;
        let mut entries = tokio::fs::read_dir(&self.dir).await?;
        while let Some(entry) = entries.next_entry().await? {
            if !entry.file_type().await?.is_file() {
                continue;
            }
            let name = entry.file_name();
            let Some(name) = name.to_str() else { continue };
            if name.starts_with('.') || !is_supported(name) || keep.contains(name) {
                continue;
            }
            tracing::warn!("Removing orphaned upload {}", name);
            tokio::fs::remove_file(entry.path()).await?;
            removed += 1;
        }
        Ok(removed)
    }
}

async fn write_all(file: &mut tokio::fs::File, bytes: &[u8]) -> io::Result<()> {
    file.write_all(bytes).await?;
    file.flush().await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extension_matches_last_component() {
        assert_eq!(extension("notes.pdf").as_deref(), Some(".pdf"));
        assert_eq!(extension("archive.tar.PNG").as_deref(), Some(".PNG"));
        assert_eq!(extension("C:\\docs\\week1.docx").as_deref(), Some(".docx"));
        assert_eq!(extension("README"), None);
        assert_eq!(extension(".bashrc"), None);
    }

    #[test]
    fn test_supported_extensions_case_insensitive() {
        assert!(is_supported("x.PNG"));
        assert!(is_supported("x.pdf"));
        assert!(is_supported("x.Doc"));
        assert!(is_supported("x.docx"));
        assert!(!is_supported("x.exe"));
        assert!(!is_supported("x.pdf.exe"));
        assert!(!is_supported("pdf"));
        assert!(!is_supported(""));
    }

    #[test]
    fn test_content_type() {
        assert_eq!(content_type("1.pdf"), "application/pdf");
        assert_eq!(content_type("1.PNG"), "image/png");
        assert_eq!(content_type("1"), "application/octet-stream");
    }

    #[tokio::test]
    async fn test_accept_writes_bytes_under_generated_name() {
        let tmp = tempfile::tempdir().unwrap();
        let uploads = UploadDir::new(tmp.path().join("uploads"));
        uploads.ensure_exists().await.unwrap();
        uploads.ensure_exists().await.unwrap();

        let stored = uploads.accept("My Notes.pdf", b"%PDF-1.4").await.unwrap();
        assert!(stored.file_name.ends_with(".pdf"));
        assert!(!stored.file_name.contains("My Notes"));
        assert_eq!(stored.reference, format!("uploads/{}", stored.file_name));
        assert_eq!(
            uploads.read(&stored.reference).await.unwrap().as_deref(),
            Some(&b"%PDF-1.4"[..])
        );
    }

    #[tokio::test]
    async fn test_accept_rejects_before_writing() {
        let tmp = tempfile::tempdir().unwrap();
        let uploads = UploadDir::new(tmp.path());

        let err = uploads.accept("virus.exe", b"MZ").await.unwrap_err();
        assert!(matches!(err, UploadError::UnsupportedFileType(_)));
        assert_eq!(std::fs::read_dir(tmp.path()).unwrap().count(), 0);
    }

    #[tokio::test]
    async fn test_same_millisecond_uploads_do_not_collide() {
        let tmp = tempfile::tempdir().unwrap();
        let uploads = UploadDir::new(tmp.path());

        let mut names = HashSet::new();
        for i in 0..20u8 {
            let stored = uploads.accept("a.png", &[i]).await.unwrap();
            assert!(names.insert(stored.file_name));
        }
        assert_eq!(std::fs::read_dir(tmp.path()).unwrap().count(), 20);
    }

    #[tokio::test]
    async fn test_resolve_ignores_directories_in_reference() {
        let uploads = UploadDir::new("/srv/uploads");
        assert_eq!(
            uploads.resolve("../../etc/passwd"),
            Some(PathBuf::from("/srv/uploads/passwd"))
        );
        assert_eq!(uploads.resolve(".."), None);
    }

    #[tokio::test]
    async fn test_read_and_remove_missing_file() {
        let tmp = tempfile::tempdir().unwrap();
        let uploads = UploadDir::new(tmp.path());

        assert_eq!(uploads.read("uploads/1.pdf").await.unwrap(), None);
        uploads.remove("uploads/1.pdf").await.unwrap();
    }

    #[tokio::test]
    async fn test_sweep_unreferenced() {
        let tmp = tempfile::tempdir().unwrap();
        let uploads = UploadDir::new(tmp.path());

        let kept = uploads.accept("kept.pdf", b"1").await.unwrap();
        let orphan = uploads.accept("orphan.pdf", b"2").await.unwrap();

        let removed = uploads
            .sweep_unreferenced(&[kept.reference.clone()])
            .await
            .unwrap();
        assert_eq!(removed, 1);
        assert!(uploads.read(&kept.reference).await.unwrap().is_some());
        assert!(uploads.read(&orphan.reference).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_sweep_leaves_dotfiles_and_foreign_files() {
        let tmp = tempfile::tempdir().unwrap();
        let uploads = UploadDir::new(tmp.path());
        std::fs::write(tmp.path().join(".gitkeep"), b"").unwrap();
        std::fs::write(tmp.path().join(".hidden.pdf"), b"").unwrap();
        std::fs::write(tmp.path().join("README"), b"keep me").unwrap();
        let orphan = uploads.accept("orphan.png", b"2").await.unwrap();

        let removed = uploads.sweep_unreferenced(&[]).await.unwrap();
        assert_eq!(removed, 1);
        assert!(uploads.read(&orphan.reference).await.unwrap().is_none());
        assert!(tmp.path().join(".gitkeep").exists());
        assert!(tmp.path().join(".hidden.pdf").exists());
        assert!(tmp.path().join("README").exists());
    }
}
