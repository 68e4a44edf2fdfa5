// Tests for the in-process tag display.
use worddb::model::{ListEntry, ListId, PageSnapshot, WordEntry, WordId};
use worddb::tags::{NO_TAGS_MESSAGE, TagBoard, TagSink};

fn page() -> PageSnapshot {
    serde_json::from_str(
        r#"{"lists": [
            {"listid": 1, "label": "latin", "description": "roots",
             "words": [{"wordid": 7, "word": "cat", "meaning": "feline", "origin": "latin"}]},
            {"listid": "2", "label": "empty"}
        ]}"#,
    )
    .unwrap()
}

fn entry(id: Option<i64>, list: i64, word: &str) -> WordEntry {
    WordEntry {
        wordid: id.map(WordId::from),
        listid: ListId::from(list),
        word: word.to_string(),
        meaning: String::new(),
        origin: String::new(),
    }
}

#[test]
fn test_seeded_from_page() {
    let board = TagBoard::from_page(page());
    let snap = board.snapshot();
    assert_eq!(snap.lists.len(), 2);
    assert_eq!(snap.words_of(&ListId::from(1)).len(), 1);
    assert_eq!(snap.no_tags_message(&ListId::from(1)), None);
    assert_eq!(snap.no_tags_message(&ListId::from(2)), Some(NO_TAGS_MESSAGE));

    let (list, word) = snap.find_word(&WordId::from(7)).unwrap();
    assert_eq!(list, &ListId::from(1));
    assert_eq!(word.meaning, "feline");
}

#[test]
fn test_word_add_update_remove() {
    let board = TagBoard::from_page(page());

    board.add_word_tag(&entry(Some(8), 2, "dog"));
    assert_eq!(board.snapshot().no_tags_message(&ListId::from(2)), None);

    let mut changed = entry(Some(8), 2, "dog");
    changed.meaning = "canine".to_string();
    board.update_word_tag(&changed);
    let snap = board.snapshot();
    assert_eq!(snap.words_of(&ListId::from(2))[0].meaning, "canine");
    assert_eq!(snap.words_of(&ListId::from(2)).len(), 1);

    board.remove_word_tag(&entry(Some(8), 2, "dog"));
    assert!(board.snapshot().words_of(&ListId::from(2)).is_empty());
}

#[test]
fn test_word_without_id_is_ignored() {
    let board = TagBoard::new();
    board.add_word_tag(&entry(None, 1, "ghost"));
    assert!(board.snapshot().words.is_empty());
}

#[test]
fn test_list_add_update_remove() {
    let board = TagBoard::from_page(page());

    board.add_list_tag(&ListEntry {
        listid: Some(ListId::from(3)),
        label: "greek".to_string(),
        description: String::new(),
    });
    let snap = board.snapshot();
    assert_eq!(snap.lists.len(), 3);
    assert_eq!(snap.no_tags_message(&ListId::from(3)), Some(NO_TAGS_MESSAGE));

    board.update_list_tag(&ListEntry {
        listid: Some(ListId::from(3)),
        label: "hellenic".to_string(),
        description: "renamed".to_string(),
    });
    assert_eq!(
        board.snapshot().list(&ListId::from(3)).unwrap().label,
        "hellenic"
    );

    // Removing a list drops its words too.
    board.remove_list_tag(&ListEntry {
        listid: Some(ListId::from(1)),
        label: String::new(),
        description: String::new(),
    });
    let snap = board.snapshot();
    assert!(snap.list(&ListId::from(1)).is_none());
    assert!(snap.find_word(&WordId::from(7)).is_none());
}
