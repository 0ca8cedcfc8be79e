// src/documents/tests/store_tests.rs

use crate::documents::models::{DocumentFormat, DocumentKind, GeneratedDocument};
use crate::documents::store::{ArtifactStore, StoreError};

fn document(kind: DocumentKind, format: DocumentFormat, bytes: &[u8]) -> GeneratedDocument {
    GeneratedDocument {
        kind,
        format,
        filename: crate::documents::models::slot_filename(kind, format),
        bytes: bytes.to_vec(),
    }
}

#[tokio::test]
async fn test_store_writes_fixed_filename() {
    let dir = tempfile::tempdir().unwrap();
    let store = ArtifactStore::new(dir.path()).unwrap();

    let path = store
        .store(&document(
            DocumentKind::Resume,
            DocumentFormat::Docx,
            b"first",
        ))
        .await
        .unwrap();

    assert_eq!(path.file_name().unwrap(), "latest_resume.docx");
    assert_eq!(std::fs::read(&path).unwrap(), b"first");
}

#[tokio::test]
async fn test_overwrite_is_idempotent_last_writer_wins() {
    let dir = tempfile::tempdir().unwrap();
    let store = ArtifactStore::new(dir.path()).unwrap();

    store
        .store(&document(
            DocumentKind::CoverLetter,
            DocumentFormat::Pdf,
            b"first generation",
        ))
        .await
        .unwrap();
    let path = store
        .store(&document(
            DocumentKind::CoverLetter,
            DocumentFormat::Pdf,
            b"second generation",
        ))
        .await
        .unwrap();

    // Exactly one file in the slot, holding the second content; the temp
    // files from both writes are gone.
    assert_eq!(std::fs::read(&path).unwrap(), b"second generation");
    let entries: Vec<_> = std::fs::read_dir(store.root()).unwrap().collect();
    assert_eq!(entries.len(), 1);
}

#[tokio::test]
async fn test_slots_are_independent() {
    let dir = tempfile::tempdir().unwrap();
    let store = ArtifactStore::new(dir.path()).unwrap();

    store
        .store(&document(DocumentKind::Resume, DocumentFormat::Docx, b"a"))
        .await
        .unwrap();
    store
        .store(&document(DocumentKind::Resume, DocumentFormat::Pdf, b"b"))
        .await
        .unwrap();

    let entries: Vec<_> = std::fs::read_dir(store.root()).unwrap().collect();
    assert_eq!(entries.len(), 2);
}

#[tokio::test]
async fn test_resolve_attachment_finds_stored_artifact() {
    let dir = tempfile::tempdir().unwrap();
    let store = ArtifactStore::new(dir.path()).unwrap();

    store
        .store(&document(DocumentKind::Resume, DocumentFormat::Docx, b"x"))
        .await
        .unwrap();

    // Bare filename and the legacy "generated/" prefix both resolve.
    assert!(store.resolve_attachment("latest_resume.docx").is_ok());
    assert!(store
        .resolve_attachment("generated/latest_resume.docx")
        .is_ok());
}

#[tokio::test]
async fn test_resolve_attachment_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let store = ArtifactStore::new(dir.path()).unwrap();

    let result = store.resolve_attachment("latest_resume.docx");
    assert!(matches!(result, Err(StoreError::NotFound(_))));
}

#[tokio::test]
async fn test_resolve_attachment_rejects_traversal() {
    let dir = tempfile::tempdir().unwrap();
    let store = ArtifactStore::new(dir.path()).unwrap();

    let result = store.resolve_attachment("../outside.pdf");
    assert!(matches!(result, Err(StoreError::InvalidPath(_))));
}

#[tokio::test]
async fn test_resolve_attachment_rejects_absolute_path_outside_root() {
    let store_dir = tempfile::tempdir().unwrap();
    let outside_dir = tempfile::tempdir().unwrap();
    let store = ArtifactStore::new(store_dir.path()).unwrap();

    let outside_file = outside_dir.path().join("latest_resume.docx");
    std::fs::write(&outside_file, b"not ours").unwrap();

    let result = store.resolve_attachment(outside_file.to_str().unwrap());
    assert!(matches!(result, Err(StoreError::InvalidPath(_))));
}

#[tokio::test]
async fn test_resolve_attachment_rejects_nonexistent_path_outside_root() {
    let dir = tempfile::tempdir().unwrap();
    let store = ArtifactStore::new(dir.path()).unwrap();

    // The path is invalid, not merely missing: existence outside the
    // store root must not be probed at all.
    let result = store.resolve_attachment("/definitely/not/the/store/latest_resume.docx");
    assert!(matches!(result, Err(StoreError::InvalidPath(_))));
}

#[tokio::test]
async fn test_resolve_attachment_rejects_empty_path() {
    let dir = tempfile::tempdir().unwrap();
    let store = ArtifactStore::new(dir.path()).unwrap();

    let result = store.resolve_attachment("   ");
    assert!(matches!(result, Err(StoreError::InvalidPath(_))));
}
