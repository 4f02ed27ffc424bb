use std::path::PathBuf;

use courier_core::{FileSlot, FileStaging, StagedFile, StagingError};

fn file(name: &str) -> StagedFile {
    StagedFile {
        name: name.to_string(),
        path: PathBuf::from(format!("/data/{name}")),
        len: 1024,
    }
}

#[test]
fn recipients_slot_accepts_excel_only() {
    let mut staging = FileStaging::default();

    assert_eq!(staging.select(FileSlot::Recipients, file("contacts.xlsx")), Ok(()));
    assert_eq!(staging.select(FileSlot::Recipients, file("legacy.XLS")), Ok(()));
    assert_eq!(
        staging.select(FileSlot::Recipients, file("contacts.csv")),
        Err(StagingError::RecipientsNotExcel)
    );
    // The rejected file does not displace the prior selection.
    assert_eq!(staging.recipients().unwrap().name, "legacy.XLS");
}

#[test]
fn attachment_slot_accepts_documents_and_images() {
    let mut staging = FileStaging::default();

    for name in ["flyer.pdf", "photo.JPG", "scan.jpeg", "logo.png", "anim.gif", "letter.doc", "memo.docx", "notes.txt"] {
        assert_eq!(staging.select(FileSlot::Attachment, file(name)), Ok(()), "{name}");
    }
    assert_eq!(
        staging.select(FileSlot::Attachment, file("movie.mp4")),
        Err(StagingError::AttachmentNotAllowed)
    );
    assert_eq!(
        staging.select(FileSlot::Attachment, file("no_extension")),
        Err(StagingError::AttachmentNotAllowed)
    );
}

#[test]
fn selecting_replaces_the_slot_atomically() {
    let mut staging = FileStaging::default();
    staging.select(FileSlot::Recipients, file("first.xlsx")).unwrap();
    staging.select(FileSlot::Recipients, file("second.xlsx")).unwrap();

    assert_eq!(staging.recipients().unwrap().name, "second.xlsx");
    assert!(staging.attachment().is_none());
}

#[test]
fn remove_clears_a_single_slot() {
    let mut staging = FileStaging::default();
    staging.select(FileSlot::Recipients, file("contacts.xlsx")).unwrap();
    staging.select(FileSlot::Attachment, file("flyer.pdf")).unwrap();

    staging.remove(FileSlot::Attachment);

    assert!(staging.recipients().is_some());
    assert!(staging.attachment().is_none());

    // Removing an empty slot is harmless.
    staging.remove(FileSlot::Attachment);
    assert!(staging.attachment().is_none());
}

#[test]
fn clear_empties_both_slots() {
    let mut staging = FileStaging::default();
    staging.select(FileSlot::Recipients, file("contacts.xlsx")).unwrap();
    staging.select(FileSlot::Attachment, file("flyer.pdf")).unwrap();

    staging.clear();

    assert!(staging.recipients().is_none());
    assert!(staging.attachment().is_none());
}
