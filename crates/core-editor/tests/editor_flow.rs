//! End-to-end controller behavior over a scripted console.

mod common;

use common::ScriptedConsole;
use core_buffer::TextBuffer;
use core_editor::{Editor, EditorOptions};
use core_terminal::KeyEvent;
use std::time::Duration;

fn editor_with(lines: &[&str]) -> Editor<ScriptedConsole> {
    let mut buffer = TextBuffer::new(3);
    buffer.load_lines(lines.iter().copied());
    Editor::new(ScriptedConsole::new(12, 60), buffer, EditorOptions::default()).unwrap()
}

fn drain_keys(editor: &mut Editor<ScriptedConsole>, count: usize) {
    for _ in 0..count {
        editor.process_keypress().unwrap();
    }
}

#[test]
fn typing_builds_a_document() {
    let mut editor = editor_with(&[]);
    editor.console_mut().type_str("hi");
    editor.console_mut().push_key(KeyEvent::Enter);
    editor.console_mut().type_str("there");
    drain_keys(&mut editor, 8);
    assert_eq!(editor.buffer().to_document_text(), "hi\nthere\n");
    assert!(editor.buffer().is_dirty());
    assert_eq!(editor.view().cursor_row, 1);
    assert_eq!(editor.view().cursor_col, 5);
}

#[test]
fn tab_is_inserted_literally_and_rendered_expanded() {
    let mut editor = editor_with(&[]);
    editor.console_mut().push_key(KeyEvent::Char('\t'));
    editor.console_mut().push_key(KeyEvent::Char('x'));
    drain_keys(&mut editor, 2);
    let row = editor.buffer().row(0).unwrap();
    assert_eq!(row.chars(), &['\t', 'x']);
    let rendered: String = row.render().iter().collect();
    assert_eq!(rendered, "   x");
}

#[test]
fn backspace_at_column_zero_joins_rows() {
    let mut editor = editor_with(&["ab", "cd"]);
    editor.view_mut().cursor_row = 1;
    editor.console_mut().push_key(KeyEvent::Backspace);
    drain_keys(&mut editor, 1);
    assert_eq!(editor.buffer().row_count(), 1);
    assert_eq!(editor.buffer().row(0).unwrap().text(), "abcd");
    assert_eq!(editor.view().cursor_row, 0);
    assert_eq!(editor.view().cursor_col, 2);
}

#[test]
fn delete_key_removes_the_character_under_the_cursor() {
    let mut editor = editor_with(&["abc"]);
    editor.console_mut().push_key(KeyEvent::Delete);
    drain_keys(&mut editor, 1);
    assert_eq!(editor.buffer().row(0).unwrap().text(), "bc");
    assert_eq!(editor.view().cursor_col, 0);
}

#[test]
fn typing_past_the_last_row_appends_a_row() {
    let mut editor = editor_with(&["ab"]);
    editor.console_mut().push_keys([
        KeyEvent::End,
        KeyEvent::ArrowRight,
        KeyEvent::Char('z'),
    ]);
    drain_keys(&mut editor, 3);
    assert_eq!(editor.buffer().to_document_text(), "ab\nz\n");
}

#[test]
fn quit_confirmation_counts_down_and_resets() {
    let mut editor = editor_with(&[]);
    editor.console_mut().push_key(KeyEvent::Char('x'));
    drain_keys(&mut editor, 1);
    assert!(editor.buffer().is_dirty());

    editor.console_mut().push_key(KeyEvent::Ctrl('q'));
    drain_keys(&mut editor, 1);
    assert!(!editor.is_closing());
    assert!(editor.message_text().unwrap().contains("2 more times"));

    editor.console_mut().push_key(KeyEvent::Ctrl('q'));
    drain_keys(&mut editor, 1);
    assert!(!editor.is_closing());
    assert!(editor.message_text().unwrap().contains("1 more times"));

    // Any other key re-arms the countdown.
    editor.console_mut().push_key(KeyEvent::ArrowRight);
    editor.console_mut().push_key(KeyEvent::Ctrl('q'));
    drain_keys(&mut editor, 2);
    assert!(!editor.is_closing());
    assert!(editor.message_text().unwrap().contains("2 more times"));

    editor.console_mut().push_keys([KeyEvent::Ctrl('q'), KeyEvent::Ctrl('q')]);
    drain_keys(&mut editor, 2);
    assert!(editor.is_closing());
}

#[test]
fn clean_buffer_quits_on_first_press() {
    let mut editor = editor_with(&["saved"]);
    editor.console_mut().push_key(KeyEvent::Ctrl('q'));
    drain_keys(&mut editor, 1);
    assert!(editor.is_closing());
    // The close path clears the screen and homes the cursor.
    assert!(editor.console().output_str().ends_with("\x1b[2J\x1b[H"));
}

#[test]
fn find_wraps_from_bottom_to_top() {
    let mut editor = editor_with(&["needle only here", "xxxx", "yyyy"]);
    editor.view_mut().cursor_row = 2;
    editor.console_mut().type_str("ne");
    editor.console_mut().push_key(KeyEvent::Enter);
    editor.find().unwrap();
    assert_eq!(editor.view().cursor_row, 0);
    assert_eq!(editor.view().cursor_col, 0);
}

#[test]
fn find_cancel_restores_cursor_and_scroll() {
    let mut editor = editor_with(&["needle", "xxxx", "yyyy"]);
    editor.view_mut().cursor_row = 2;
    editor.view_mut().cursor_col = 1;
    editor.console_mut().type_str("need");
    editor.console_mut().push_key(KeyEvent::Escape);
    editor.find().unwrap();
    assert_eq!(editor.view().cursor_row, 2);
    assert_eq!(editor.view().cursor_col, 1);
    // The match paint was restored along with the position.
    use core_syntax::Highlight;
    assert!(
        editor.buffer().row(0).unwrap().highlight()
            .iter()
            .all(|&h| h == Highlight::Normal)
    );
}

#[test]
fn find_arrows_step_between_matches_forward() {
    let mut editor = editor_with(&["alpha beta", "beta", "beta gamma"]);
    editor.console_mut().type_str("beta");
    editor.console_mut().push_keys([KeyEvent::ArrowRight, KeyEvent::Enter]);
    editor.find().unwrap();
    assert_eq!(editor.view().cursor_row, 1);
    assert_eq!(editor.view().cursor_col, 0);
}

#[test]
fn find_arrows_wrap_backward() {
    let mut editor = editor_with(&["alpha beta", "beta", "beta gamma"]);
    editor.console_mut().type_str("b");
    editor.console_mut().push_keys([KeyEvent::ArrowLeft, KeyEvent::Enter]);
    editor.find().unwrap();
    assert_eq!(editor.view().cursor_row, 2);
    assert_eq!(editor.view().cursor_col, 0);
}

#[test]
fn save_writes_document_and_resets_dirty() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("doc.txt");
    std::fs::write(&path, "abc\nxyz\n").unwrap();

    let mut editor = editor_with(&[]);
    editor.open(&path);
    assert_eq!(editor.buffer().row_count(), 2);
    assert!(!editor.buffer().is_dirty());

    editor.console_mut().push_keys([KeyEvent::Char('Z'), KeyEvent::Ctrl('s')]);
    drain_keys(&mut editor, 2);

    assert_eq!(std::fs::read_to_string(&path).unwrap(), "Zabc\nxyz\n");
    assert!(!editor.buffer().is_dirty());
    assert!(editor.message_text().unwrap().contains("9 bytes written to disk"));
}

#[test]
fn save_prompts_for_a_name_when_unnamed() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("fresh.c");

    let mut editor = editor_with(&["int x;"]);
    editor.console_mut().push_key(KeyEvent::Ctrl('s'));
    editor.console_mut().type_str(path.to_str().unwrap());
    editor.console_mut().push_key(KeyEvent::Enter);
    drain_keys(&mut editor, 1);

    assert_eq!(std::fs::read_to_string(&path).unwrap(), "int x;\n");
    // Save-as selects the highlighting profile for the new name.
    assert_eq!(editor.buffer().profile().map(|p| p.file_type), Some("c"));
}

#[test]
fn cancelled_save_keeps_unsaved_state() {
    let mut editor = editor_with(&["draft"]);
    editor.console_mut().push_key(KeyEvent::Char('!'));
    drain_keys(&mut editor, 1);
    let dirty = editor.buffer().dirty();

    editor.console_mut().push_keys([KeyEvent::Ctrl('s'), KeyEvent::Escape]);
    drain_keys(&mut editor, 1);
    assert_eq!(editor.message_text(), Some("Save aborted"));
    assert_eq!(editor.buffer().dirty(), dirty);
    assert!(editor.buffer().filename().is_none());
}

#[test]
fn open_failure_reports_and_leaves_buffer_empty() {
    let mut editor = editor_with(&[]);
    editor.open(std::path::Path::new("/no/such/file.txt"));
    assert_eq!(editor.buffer().row_count(), 0);
    assert!(editor.message_text().unwrap().starts_with("Can't open"));
}

#[test]
fn status_messages_expire_from_display() {
    let mut buffer = TextBuffer::new(3);
    buffer.load_lines(["x"]);
    let options = EditorOptions {
        message_timeout: Duration::from_secs(0),
        ..EditorOptions::default()
    };
    let mut editor = Editor::new(ScriptedConsole::new(12, 60), buffer, options).unwrap();
    editor.set_status_message("ephemeral");
    assert_eq!(editor.message_text(), None);
}

#[test]
fn refresh_writes_one_bracketed_frame() {
    let mut editor = editor_with(&["hello"]);
    editor.refresh_screen().unwrap();
    let out = editor.console().output_str();
    assert!(out.starts_with("\x1b[?25l\x1b[H"));
    assert!(out.ends_with("\x1b[?25h"));
    assert!(out.contains("hello"));
    assert!(out.contains("[No Name] - 1 lines"));
}
