//! Line buffer tests

use lipow_console::config::INPUT_CAPACITY;
use lipow_console::console::line_buffer::LineBuffer;

#[test]
fn test_line_buffer_push() {
    let mut buf: LineBuffer = LineBuffer::new();

    buf.push(b'h');
    buf.push(b'e');
    buf.push(b'l');
    buf.push(b'p');

    assert_eq!(buf.as_str(), "help");
}

#[test]
fn test_line_buffer_backspace() {
    let mut buf: LineBuffer = LineBuffer::new();

    buf.set("help");
    assert!(buf.backspace());
    assert!(buf.backspace());

    assert_eq!(buf.as_str(), "he");
    assert_eq!(buf.len(), 2);
}

#[test]
fn test_line_buffer_backspace_empty() {
    let mut buf: LineBuffer = LineBuffer::new();

    assert!(!buf.backspace()); // should not underflow
    assert_eq!(buf.as_str(), "");
}

#[test]
fn test_line_buffer_clear() {
    let mut buf: LineBuffer = LineBuffer::new();

    buf.set("stats");
    buf.clear();

    assert_eq!(buf.as_str(), "");
    assert!(buf.is_empty());
}

#[test]
fn test_line_buffer_set_from_str() {
    let mut buf: LineBuffer = LineBuffer::new();

    buf.set("echo-parameters a b");
    assert_eq!(buf.as_str(), "echo-parameters a b");
}

#[test]
fn test_line_buffer_copy_from() {
    let mut line: LineBuffer = LineBuffer::new();
    let mut last: LineBuffer = LineBuffer::new();

    line.set("version");
    last.copy_from(&line);
    line.clear();

    assert_eq!(last.as_str(), "version");
    assert!(line.is_empty());
}

#[test]
fn test_line_buffer_overflow() {
    let mut buf: LineBuffer = LineBuffer::new();

    // Push 60 characters (buffer is 50)
    let accepted = (0..60u8).filter(|i| buf.push(b'a' + (i % 26))).count();

    assert_eq!(accepted, INPUT_CAPACITY);
    assert_eq!(buf.len(), INPUT_CAPACITY);
    assert!(buf.is_full());
}

#[test]
fn test_line_buffer_backspace_after_full() {
    let mut buf = LineBuffer::<4>::new();

    for &c in b"abcd" {
        assert!(buf.push(c));
    }
    assert!(!buf.push(b'e'));

    buf.backspace();
    assert!(buf.push(b'z'));
    assert_eq!(buf.as_str(), "abcz");
}

#[test]
fn test_line_buffer_set_truncates() {
    let mut buf = LineBuffer::<3>::new();

    buf.set("stats");
    assert_eq!(buf.as_str(), "sta");
    assert_eq!(buf.capacity(), 3);
}
