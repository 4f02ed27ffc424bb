use std::path::PathBuf;

use thiserror::Error;

/// Extensions accepted in the recipients slot.
pub const RECIPIENT_EXTENSIONS: &[&str] = &["xlsx", "xls"];

/// Extensions accepted in the attachment slot.
pub const ATTACHMENT_EXTENSIONS: &[&str] = &["pdf", "jpg", "jpeg", "png", "gif", "doc", "docx", "txt"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileSlot {
    Recipients,
    Attachment,
}

/// Metadata for a user-selected input artifact. The core never reads the
/// file; the engine loads the bytes from `path` when the job starts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StagedFile {
    pub name: String,
    pub path: PathBuf,
    pub len: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StagingError {
    #[error("Recipients file must be Excel format (.xlsx or .xls)")]
    RecipientsNotExcel,
    #[error("Invalid attachment file format")]
    AttachmentNotAllowed,
}

/// Holds the 0-2 artifacts staged for the next job start.
///
/// Invariant: at most one file per slot; a successful `select` replaces the
/// slot's previous occupant atomically, a failed one leaves it untouched.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FileStaging {
    recipients: Option<StagedFile>,
    attachment: Option<StagedFile>,
}

impl FileStaging {
    pub fn select(&mut self, slot: FileSlot, file: StagedFile) -> Result<(), StagingError> {
        match slot {
            FileSlot::Recipients => {
                if !has_allowed_extension(&file.name, RECIPIENT_EXTENSIONS) {
                    return Err(StagingError::RecipientsNotExcel);
                }
                self.recipients = Some(file);
            }
            FileSlot::Attachment => {
                if !has_allowed_extension(&file.name, ATTACHMENT_EXTENSIONS) {
                    return Err(StagingError::AttachmentNotAllowed);
                }
                self.attachment = Some(file);
            }
        }
        Ok(())
    }

    pub fn remove(&mut self, slot: FileSlot) {
        match slot {
            FileSlot::Recipients => self.recipients = None,
            FileSlot::Attachment => self.attachment = None,
        }
    }

    pub fn clear(&mut self) {
        self.recipients = None;
        self.attachment = None;
    }

    pub fn recipients(&self) -> Option<&StagedFile> {
        self.recipients.as_ref()
    }

    pub fn attachment(&self) -> Option<&StagedFile> {
        self.attachment.as_ref()
    }
}

fn has_allowed_extension(name: &str, allowed: &[&str]) -> bool {
    let Some((_, ext)) = name.rsplit_once('.') else {
        return false;
    };
    allowed.iter().any(|a| a.eq_ignore_ascii_case(ext))
}
