// Tests for the add/edit overlay state machine and the lookup hint.
use worddb::field_info::{HintChange, LookupTemplate};
use worddb::model::{ListId, ListView, WordId, WordView};
use worddb::overlay::{Overlay, OverlayError, OverlayKind, OverlayState, OverlayTemplates, Target};

fn cat() -> WordView {
    WordView {
        id: WordId::from(7),
        word: "cat".to_string(),
        meaning: "feline".to_string(),
        origin: "latin".to_string(),
    }
}

#[test]
fn test_edit_word_populates_fields() {
    let mut overlay = Overlay::default();
    assert!(!overlay.backdrop_visible());

    overlay.open_edit_word(&cat()).unwrap();
    let session = overlay.session().expect("open");

    assert_eq!(session.kind, OverlayKind::EditWord);
    assert_eq!(session.value("word"), "cat");
    assert_eq!(session.value("meaning"), "feline");
    assert_eq!(session.value("origin"), "latin");
    assert_eq!(session.target, Some(Target::Word(WordId::from(7))));
    assert_eq!(session.focused().unwrap().spec.name, "word");
    // Meaning is filled, so no hint.
    assert!(session.hint.is_none());
    assert!(overlay.backdrop_visible());
}

#[test]
fn test_edit_word_without_meaning_shows_hint() {
    let mut overlay = Overlay::default();
    let mut word = cat();
    word.meaning.clear();
    overlay.open_edit_word(&word).unwrap();

    let hint = overlay.session().unwrap().hint.clone().expect("hint shown");
    assert_eq!(hint.word, "cat");
    assert_eq!(hint.link, "http://www.wordreference.com/enpt/cat");
    assert_eq!(hint.text(), "find meaning of 'cat' here (wordreference.com).");
}

#[test]
fn test_second_open_is_rejected() {
    let mut overlay = Overlay::default();
    overlay.open_add_word().unwrap();

    let err = overlay
        .open_edit_list(&ListView {
            id: ListId::from(1),
            label: "latin".to_string(),
            description: String::new(),
        })
        .unwrap_err();
    assert_eq!(err, OverlayError::AlreadyOpen(OverlayKind::AddWord));
    assert_eq!(overlay.session().unwrap().kind, OverlayKind::AddWord);
}

#[test]
fn test_close_hides_backdrop_and_is_idempotent() {
    let mut overlay = Overlay::default();
    overlay.open_add_list().unwrap();
    assert!(overlay.backdrop_visible());

    let closed = overlay.close().expect("was open");
    assert_eq!(closed.kind, OverlayKind::AddList);
    assert_eq!(overlay.state(), &OverlayState::Closed);
    assert!(!overlay.backdrop_visible());

    assert!(overlay.close().is_none());
    // A new form can be opened once the slot is free.
    overlay.open_add_word().unwrap();
}

#[test]
fn test_edit_list_populates_fields() {
    let mut overlay = Overlay::default();
    overlay
        .open_edit_list(&ListView {
            id: ListId::from("12"),
            label: "greek".to_string(),
            description: "roots".to_string(),
        })
        .unwrap();
    let session = overlay.session().unwrap();
    assert_eq!(session.title, "Edit list");
    assert_eq!(session.value("label"), "greek");
    assert_eq!(session.value("description"), "roots");
    assert_eq!(session.list_id(), Some(&ListId::from(12)));
    assert_eq!(session.word_id(), None);
}

#[test]
fn test_typing_drives_hint_lifecycle() {
    let mut overlay = Overlay::default();
    overlay.open_add_word().unwrap();

    assert_eq!(overlay.set_field("word", "do"), Some(HintChange::Shown));
    assert_eq!(overlay.set_field("word", "dog"), Some(HintChange::Updated));
    assert_eq!(
        overlay.session().unwrap().hint.as_ref().unwrap().word,
        "dog"
    );
    assert_eq!(overlay.set_field("word", "dog"), Some(HintChange::Unchanged));
    assert_eq!(overlay.set_field("word", "  "), Some(HintChange::Removed));
    assert!(overlay.session().unwrap().hint.is_none());
    assert_eq!(overlay.set_field("word", ""), Some(HintChange::Unchanged));

    // Other fields never touch the hint.
    assert_eq!(overlay.set_field("meaning", "x"), Some(HintChange::Unchanged));
    // Unknown field.
    assert_eq!(overlay.set_field("nope", "x"), None);
}

#[test]
fn test_list_forms_have_no_hint() {
    let mut overlay = Overlay::default();
    overlay.open_add_list().unwrap();
    assert_eq!(overlay.set_field("word", "cat"), None);
    assert_eq!(overlay.set_field("label", "cat"), Some(HintChange::Unchanged));
    assert!(overlay.session().unwrap().hint.is_none());
}

#[test]
fn test_set_field_when_closed() {
    let mut overlay = Overlay::default();
    assert_eq!(overlay.set_field("word", "cat"), None);
}

#[test]
fn test_custom_templates_and_lookup() {
    let mut templates = OverlayTemplates::default();
    templates.add_word.title = "Nouveau mot".to_string();
    templates.add_word.fields.retain(|f| f.name != "origin");
    templates.add_word.focus = "meaning".to_string();

    let mut overlay = Overlay::new(templates, LookupTemplate::new("https://dict.example/{word}?q=1"));
    overlay.open_add_word().unwrap();
    let session = overlay.session().unwrap();
    assert_eq!(session.title, "Nouveau mot");
    assert_eq!(session.fields.len(), 2);
    assert_eq!(session.focused().unwrap().spec.name, "meaning");
    // Fields missing from a template read as empty.
    assert_eq!(session.value("origin"), "");

    overlay.set_field("word", "ça va").unwrap();
    let hint = overlay.session().unwrap().hint.clone().unwrap();
    assert_eq!(hint.link, "https://dict.example/%C3%A7a%20va?q=1");
    assert_eq!(hint.host, "dict.example");
}

#[test]
fn test_focus_cycles() {
    let mut overlay = Overlay::default();
    overlay.open_add_word().unwrap();
    let session = overlay.session_mut().unwrap();
    session.focus_prev();
    assert_eq!(session.focused().unwrap().spec.name, "origin");
    session.focus_next();
    session.focus_next();
    assert_eq!(session.focused().unwrap().spec.name, "meaning");
}

#[test]
fn test_close_if_respects_predicate() {
    let mut overlay = Overlay::default();
    overlay.open_edit_word(&cat()).unwrap();
    assert!(overlay.close_if(|s| s.kind == OverlayKind::AddWord).is_none());
    assert!(overlay.is_open());
    assert!(overlay.close_if(|s| s.kind == OverlayKind::EditWord).is_some());
    assert!(!overlay.is_open());
}

#[test]
fn test_each_open_gets_a_new_generation() {
    let mut overlay = Overlay::default();
    overlay.open_add_list().unwrap();
    let first = overlay.session().unwrap().generation;
    overlay.close();

    overlay.open_add_list().unwrap();
    let second = overlay.session().unwrap().generation;
    assert_ne!(first, second);

    // Same kind, same (absent) target: only the generation tells them apart.
    assert!(overlay.close_if(|s| s.generation == first).is_none());
    assert!(overlay.is_open());
    assert!(overlay.close_if(|s| s.generation == second).is_some());
}
