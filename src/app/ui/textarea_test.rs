use super::*;

fn input(lines: &[&str]) -> tui_textarea::TextArea<'static> {
    tui_textarea::TextArea::new(lines.iter().map(|l| l.to_string()).collect())
}

#[test]
fn test_clear_if_holds_submitted_text() {
    let mut textarea = input(&["What is this?", "And that?"]);
    assert!(TextArea::default().clear_if_holds(&mut textarea, "What is this?\nAnd that?"));
    assert_eq!(textarea.lines(), [""]);
}

#[test]
fn test_clear_if_holds_keeps_newer_text() {
    let mut textarea = input(&["What is this? Also the date"]);
    assert!(!TextArea::default().clear_if_holds(&mut textarea, "What is this?"));
    assert_eq!(textarea.lines(), ["What is this? Also the date"]);
}
