use super::*;

#[test]
fn wraps_in_both_directions() {
    let mut lb = Lightbox::new(9);
    lb.open(8).unwrap();
    lb.next();
    assert_eq!(lb.selected(), Some(0));
    lb.previous();
    assert_eq!(lb.selected(), Some(8));
    lb.previous();
    assert_eq!(lb.selected(), Some(7));
}

#[test]
fn keys_only_act_while_open() {
    let mut lb = Lightbox::new(3);
    assert!(!lb.handle_key(Key::ArrowRight));
    assert_eq!(lb.selected(), None);

    lb.open(1).unwrap();
    assert!(lb.scroll_locked());
    assert!(lb.handle_key(Key::ArrowRight));
    assert_eq!(lb.selected(), Some(2));
    assert!(lb.handle_key(Key::ArrowLeft));
    assert_eq!(lb.selected(), Some(1));
    assert!(!lb.handle_key(Key::Other));
    assert!(lb.handle_key(Key::Escape));
    assert!(!lb.is_open());
    assert!(!lb.scroll_locked());
}

#[test]
fn navigation_while_closed_is_a_no_op() {
    let mut lb = Lightbox::new(3);
    lb.next();
    lb.previous();
    assert_eq!(lb.selected(), None);
}

#[test]
fn out_of_range_open_is_rejected() {
    let mut lb = Lightbox::new(2);
    assert!(lb.open(2).is_err());
    assert!(!lb.is_open());
}

#[test]
fn unknown_keys_deserialize_as_other() {
    let k: Key = serde_json::from_str("\"Enter\"").unwrap();
    assert_eq!(k, Key::Other);
    let k: Key = serde_json::from_str("\"ArrowLeft\"").unwrap();
    assert_eq!(k, Key::ArrowLeft);
}
