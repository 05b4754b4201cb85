/// Lines scanned for the end of a multi-line declaration
const HEADER_SCAN_LINES: usize = 4;

pub(crate) fn char_len(text: &str) -> usize {
    text.chars().count()
}

/// Prefix of at most `max_chars` characters
pub(crate) fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((byte, _)) => &text[..byte],
        None => text,
    }
}

/// Declaration text of a definition: lines up to the opening brace or colon.
///
/// Falls back to the first non-blank line when no opener shows up early.
pub(crate) fn extract_header(content: &str, max_chars: usize) -> String {
    let lines: Vec<&str> = content
        .lines()
        .skip_while(|line| line.trim().is_empty())
        .take(HEADER_SCAN_LINES)
        .collect();

    let end = lines
        .iter()
        .position(|line| {
            let line = line.trim_end();
            line.ends_with('{') || line.ends_with(':')
        })
        .map_or(1, |i| i + 1)
        .min(lines.len());

    let header = lines[..end].join("\n");
    truncate_chars(&header, max_chars).to_string()
}

/// Pack lines greedily into parts of at most `max_chars` characters.
///
/// A single line longer than `max_chars` is cut into several parts.
pub(crate) fn split_lines(content: &str, max_chars: usize) -> Vec<String> {
    let max_chars = max_chars.max(1);
    let mut parts = Vec::new();
    let mut current = String::new();
    let mut current_len = 0usize;

    for line in content.lines() {
        let line_len = char_len(line);

        if line_len > max_chars {
            if current_len > 0 {
                parts.push(std::mem::take(&mut current));
                current_len = 0;
            }
            let mut rest = line;
            while !rest.is_empty() {
                let piece = truncate_chars(rest, max_chars);
                parts.push(piece.to_string());
                rest = &rest[piece.len()..];
            }
            continue;
        }

        let needed = if current_len == 0 { line_len } else { current_len + 1 + line_len };
        if needed > max_chars && current_len > 0 {
            parts.push(std::mem::take(&mut current));
            current_len = 0;
        }

        if current_len > 0 {
            current.push('\n');
            current_len += 1;
        }
        current.push_str(line);
        current_len += line_len;
    }

    if current_len > 0 {
        parts.push(current);
    }
    parts
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_header_keeps_class_declaration() {
        let content = "class MyClass {\n  constructor() {}\n\n  method1() { return 1; }\n}";
        assert_eq!(extract_header(content, 100), "class MyClass {");
    }

    #[test]
    fn test_header_spans_wrapped_parameters() {
        let content = "def build(\n    name,\n    size,\n):\n    return name * size\n";
        assert_eq!(
            extract_header(content, 100),
            "def build(\n    name,\n    size,\n):"
        );
    }

    #[test]
    fn test_header_without_opener_uses_first_line() {
        let content = "\n\nconst handler = async (req) =>\n  process(req);\n";
        assert_eq!(extract_header(content, 100), "const handler = async (req) =>");
    }

    #[test]
    fn test_header_is_capped() {
        let content = format!("function {}() {{\n}}", "x".repeat(300));
        assert_eq!(char_len(&extract_header(&content, 50)), 50);
    }

    #[test]
    fn test_split_packs_lines() {
        let parts = split_lines("aaaa\nbbbb\ncccc\ndddd\n", 9);
        assert_eq!(parts, vec!["aaaa\nbbbb", "cccc\ndddd"]);
    }

    #[test]
    fn test_split_cuts_long_lines_on_char_boundaries() {
        let content = format!("ok\n{}\nend", "é".repeat(25));
        let parts = split_lines(&content, 10);

        assert_eq!(parts[0], "ok");
        assert_eq!(parts[1], "é".repeat(10));
        assert_eq!(parts[3], "é".repeat(5));
        assert_eq!(parts[4], "end");
        assert!(parts.iter().all(|p| char_len(p) <= 10));
    }

    #[test]
    fn test_truncate_chars() {
        assert_eq!(truncate_chars("héllo", 2), "hé");
        assert_eq!(truncate_chars("hi", 10), "hi");
    }
}
