//! Incremental parser for the text/event-stream line protocol.

/// One dispatched event frame
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SseFrame {
    /// Event name; "message" when the stream sent none
    pub event: String,
    /// Data payload; multi-line data joined with newlines
    pub data: String,
}

/// Stateful line-by-line parser.
///
/// Feed complete lines (without their terminator); a frame is dispatched
/// on each blank line that follows accumulated data. Comment lines and
/// fields this client does not use (`id`, `retry`) are skipped.
#[derive(Debug, Default)]
pub struct SseParser {
    event: Option<String>,
    data: Vec<String>,
}

impl SseParser {
    pub fn new() -> Self {
        Self::default()
    }

    /// Consume one line; returns a frame when the line completes one
    pub fn push_line(&mut self, line: &str) -> Option<SseFrame> {
        if line.is_empty() {
            return self.dispatch();
        }
        if line.starts_with(':') {
            return None; // comment / keep-alive
        }

        let (field, value) = match line.split_once(':') {
            Some((field, value)) => (field, value.strip_prefix(' ').unwrap_or(value)),
            None => (line, ""),
        };
        match field {
            "event" => self.event = Some(value.to_string()),
            "data" => self.data.push(value.to_string()),
            _ => {} // id, retry, unknown fields
        }
        None
    }

    fn dispatch(&mut self) -> Option<SseFrame> {
        if self.data.is_empty() {
            self.event = None;
            return None;
        }
        let frame = SseFrame {
            event: self.event.take().unwrap_or_else(|| "message".to_string()),
            data: self.data.join("\n"),
        };
        self.data.clear();
        Some(frame)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn feed(parser: &mut SseParser, lines: &[&str]) -> Vec<SseFrame> {
        lines
            .iter()
            .filter_map(|line| parser.push_line(line))
            .collect()
    }

    #[test]
    fn test_named_event_dispatches_on_blank_line() {
        let mut parser = SseParser::new();
        let frames = feed(
            &mut parser,
            &["event: verified", r#"data: {"type":"verified"}"#, ""],
        );
        assert_eq!(
            frames,
            vec![SseFrame {
                event: "verified".to_string(),
                data: r#"{"type":"verified"}"#.to_string(),
            }]
        );
    }

    #[test]
    fn test_multi_line_data_joins_with_newlines() {
        let mut parser = SseParser::new();
        let frames = feed(&mut parser, &["data: first", "data: second", ""]);
        assert_eq!(frames[0].data, "first\nsecond");
        assert_eq!(frames[0].event, "message");
    }

    #[test]
    fn test_comments_and_unused_fields_are_skipped() {
        let mut parser = SseParser::new();
        let frames = feed(
            &mut parser,
            &[": keep-alive", "id: 42", "retry: 3000", "data: x", ""],
        );
        assert_eq!(frames.len(), 1);
        assert_eq!(frames[0].data, "x");
    }

    #[test]
    fn test_blank_line_without_data_dispatches_nothing() {
        let mut parser = SseParser::new();
        assert!(feed(&mut parser, &["", "event: verified", ""]).is_empty());
        // The dangling event name does not leak into the next frame
        let frames = feed(&mut parser, &["data: y", ""]);
        assert_eq!(frames[0].event, "message");
    }

    #[test]
    fn test_value_space_handling() {
        let mut parser = SseParser::new();
        // "data:x" and "data: x" are equivalent; only one leading space
        // is stripped
        let frames = feed(&mut parser, &["data:x", "", "data:  padded", ""]);
        assert_eq!(frames[0].data, "x");
        assert_eq!(frames[1].data, " padded");
    }

    #[test]
    fn test_consecutive_events_keep_their_names() {
        let mut parser = SseParser::new();
        let frames = feed(
            &mut parser,
            &[
                "event: initiated",
                "data: a",
                "",
                "event: verified",
                "data: b",
                "",
            ],
        );
        assert_eq!(frames[0].event, "initiated");
        assert_eq!(frames[1].event, "verified");
    }
}
