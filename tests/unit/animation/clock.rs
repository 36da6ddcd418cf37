use super::*;

#[test]
fn starts_with_nothing_revealed() {
    let c = AnimationClock::new();
    assert_eq!(c.stage(), None);
    assert_eq!(c.stage_index(), -1);
    assert!(!c.caption_visible());
    assert!(!c.is_revealed(0));
}

#[test]
fn reveal_only_moves_forward() {
    let mut c = AnimationClock::new();
    assert!(c.reveal(0));
    assert!(c.reveal(2));
    assert!(!c.reveal(1));
    assert!(!c.reveal(2));
    assert_eq!(c.stage(), Some(2));
    assert!(c.is_revealed(0));
    assert!(c.is_revealed(2));
    assert!(!c.is_revealed(3));
}

#[test]
fn caption_flag_is_sticky_until_reset() {
    let mut c = AnimationClock::new();
    assert!(c.show_caption());
    assert!(!c.show_caption());
    assert!(c.caption_visible());
    c.reveal(3);
    c.reset();
    assert_eq!(c, AnimationClock::new());
}
