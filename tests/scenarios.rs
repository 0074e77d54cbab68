mod common;

use std::sync::Arc;

use common::{settings_ms, temp_store, RecordingHost};
use notepanel::message::UiMessage;
use notepanel::note::NoteField;
use notepanel::panel::{PanelHandle, Placement};
use notepanel::session::NoteSession;
use notepanel::store::{NoteStore, NOTES_FILE_NAME};

#[test]
fn test_groceries_survive_a_new_session() {
    let (dir, store) = temp_store();

    let mut session = NoteSession::new(store);
    let id = session.add_note();
    assert_eq!(id, 0);
    session.edit_note(0, NoteField::Title, "Groceries");
    session.edit_note(0, NoteField::Content, "Milk, eggs");
    session.request_save().unwrap();

    let mut reopened = NoteSession::new(NoteStore::with_root(dir.path()));
    assert!(reopened.request_load().unwrap());
    let notes = reopened.notes();
    assert_eq!(notes.len(), 1);
    assert_eq!(notes[0].id, 0);
    assert_eq!(notes[0].title, "Groceries");
    assert_eq!(notes[0].content, "Milk, eggs");
}

#[test]
fn test_clear_all_on_three_notes() {
    let (dir, store) = temp_store();
    let mut session = NoteSession::new(store);
    for _ in 0..3 {
        session.add_note();
    }
    session.request_save().unwrap();

    session.clear_all().unwrap();

    assert!(session.notes().is_empty());
    let on_disk = std::fs::read_to_string(dir.path().join(NOTES_FILE_NAME)).unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&on_disk).unwrap();
    assert_eq!(parsed, serde_json::json!([]));
}

#[test]
fn test_round_trip_preserves_order() {
    let (_dir, store) = temp_store();
    let mut session = NoteSession::new(store.clone());
    for i in 0..4 {
        let id = session.add_note();
        session.edit_note(id, NoteField::Title, &format!("note {}", i));
    }
    session.delete_note(2);
    session.request_save().unwrap();

    let loaded = store.read().unwrap().unwrap();
    assert_eq!(loaded, session.notes().to_vec());
    let ids: Vec<u64> = loaded.iter().map(|n| n.id).collect();
    assert_eq!(ids, vec![3, 1, 0]);
}

#[test]
fn test_reads_file_written_by_the_browser_panel() {
    let (dir, store) = temp_store();
    let raw = r#"[
  {
    "id": 4,
    "title": "Standup",
    "content": "ship it",
    "date": "2025-02-03T09:15:00.000Z"
  },
  {
    "id": 1,
    "title": "New Note",
    "content": "",
    "date": "2025-02-01T18:00:00.000Z"
  }
]"#;
    std::fs::write(dir.path().join(NOTES_FILE_NAME), raw).unwrap();

    let mut session = NoteSession::open(store).unwrap();
    assert_eq!(session.notes().len(), 2);
    assert_eq!(session.notes()[0].title, "Standup");
    assert_eq!(session.add_note(), 5);
}

#[tokio::test(start_paused = true)]
async fn test_groceries_through_the_panel() {
    let (dir, store) = temp_store();
    let host = Arc::new(RecordingHost::default());
    let (panel, _surface) = PanelHandle::open(store, &settings_ms(2000), Placement::Standalone, host.clone());

    panel.post(UiMessage::AddNote);
    panel.post(UiMessage::EditNote { id: 0, field: NoteField::Title, value: "Groceries".to_string() });
    panel.post(UiMessage::EditNote { id: 0, field: NoteField::Content, value: "Milk, eggs".to_string() });
    panel.save();
    panel.close().await.unwrap();

    let (second, _surface) =
        PanelHandle::open(NoteStore::with_root(dir.path()), &settings_ms(2000), Placement::Standalone, host);
    let session = second.close().await.unwrap();
    assert_eq!(session.notes().len(), 1);
    assert_eq!(session.notes()[0].title, "Groceries");
    assert_eq!(session.notes()[0].content, "Milk, eggs");
    assert_eq!(session.next_id(), 1);
}
