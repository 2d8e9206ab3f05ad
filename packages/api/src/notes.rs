//! # Note store and the upload workflow
//!
//! [`NoteStore`] validates and persists note metadata through a
//! [`NoteRepository`]. [`upload_note`] ties it to the [`UploadDir`]:
//!
//! 1. validate the text fields (nothing touches disk if they are missing),
//! 2. write the file (rejects unsupported extensions before writing),
//! 3. insert the metadata; if that fails the file from step 2 is removed.
//!
//! A crash between steps 2 and 3 still leaves a file behind; [`sweep_orphans`]
//! removes such files at startup.

use std::sync::Arc;

use serde::Deserialize;
use store::{validate, NewNote, Note, NoteRepository, NoteWithOwner, UploadDir};
use uuid::Uuid;

use crate::error::AppError;

/// Text fields of the upload form.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct NoteDraft {
    pub branch: String,
    pub subject: String,
    pub description: String,
}

impl NoteDraft {
    /// Trimmed copy, or the first missing field.
    pub fn validated(&self) -> Result<NoteDraft, AppError> {
        Ok(NoteDraft {
            branch: validate::required("Branch", &self.branch)?,
            subject: validate::required("Subject", &self.subject)?,
            description: validate::required("Description", &self.description)?,
        })
    }
}

/// File part of an upload as received from the client.
#[derive(Debug, Clone)]
pub struct IncomingFile {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

#[derive(Clone)]
pub struct NoteStore {
    notes: Arc<dyn NoteRepository>,
}

impl NoteStore {
    pub fn new(notes: Arc<dyn NoteRepository>) -> Self {
        Self { notes }
    }

    /// Persist a note for a stored file.
    pub async fn create(
        &self,
        draft: &NoteDraft,
        file: &str,
        owner: Uuid,
    ) -> Result<Note, AppError> {
        let draft = draft.validated()?;
        let file = validate::required("File", file)?;
        let note = self
            .notes
            .insert_note(NewNote {
                branch: draft.branch,
                subject: draft.subject,
                description: draft.description,
                file,
                uploaded_by: owner,
            })
            .await?;
        Ok(note)
    }

    pub async fn list_by_owner(&self, owner: Uuid) -> Result<Vec<Note>, AppError> {
        Ok(self.notes.list_notes_by_owner(owner).await?)
    }

    pub async fn list_all(&self) -> Result<Vec<NoteWithOwner>, AppError> {
        Ok(self.notes.list_notes_with_owner().await?)
    }

    pub async fn get_by_id(&self, id: Uuid) -> Result<Option<Note>, AppError> {
        Ok(self.notes.find_note(id).await?)
    }
}

/// Store `file` and record it as a note owned by `owner`.
pub async fn upload_note(
    uploads: &UploadDir,
    notes: &NoteStore,
    owner: Uuid,
    draft: &NoteDraft,
    file: &IncomingFile,
) -> Result<Note, AppError> {
    let draft = draft.validated()?;
    let stored = uploads.accept(&file.file_name, &file.bytes).await?;

    match notes.create(&draft, &stored.reference, owner).await {
        Ok(note) => {
            tracing::info!(note_id = %note.id, "File uploaded: {}", stored.reference);
            Ok(note)
        }
        Err(err) => {
            tracing::error!("Error saving note: {}", err);
            if let Err(e) = uploads.remove(&stored.reference).await {
                tracing::error!("Failed to remove orphaned upload {}: {}", stored.reference, e);
            }
            Err(err)
        }
    }
}

/// Remove uploaded files that no note references. Returns how many were removed.
pub async fn sweep_orphans(uploads: &UploadDir, notes: &NoteStore) -> Result<usize, AppError> {
    let references = notes.notes.list_note_files().await?;
    Ok(uploads.sweep_unreferenced(&references).await?)
}
