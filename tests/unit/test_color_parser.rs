//! Unit tests for the color run parser

use std::sync::Arc;

use subnet_client::ansi::{self, ColorTable};
use subnet_client::{parse, Color, ColorRunParser, TextRun};

fn color(code: &str) -> Color {
    ColorTable::standard().lookup(code).expect("known code")
}

#[cfg(test)]
mod color_parser_tests {
    use super::*;

    #[test]
    fn test_two_colored_runs() {
        assert_eq!(
            parse("\x1B[31mhello\x1B[32mworld"),
            vec![TextRun::new("hello", color("31")), TextRun::new("world", color("32"))]
        );
    }

    #[test]
    fn test_unknown_code_keeps_default_color() {
        assert_eq!(parse("\x1B[99mfoo"), vec![TextRun::new("foo", Color::WHITE)]);
    }

    #[test]
    fn test_trailing_escape_adds_no_run() {
        assert_eq!(parse("plain\x1B[34m"), vec![TextRun::new("plain", Color::WHITE)]);
    }

    #[test]
    fn test_empty_line() {
        assert!(parse("").is_empty());
        assert!(parse("\x1B[31m\x1B[32m").is_empty());
    }

    #[test]
    fn test_reset_code_is_not_special() {
        // `0` is not in the table, so the previous color stays in effect
        assert_eq!(
            parse("\x1B[33mwarn\x1B[0m after"),
            vec![TextRun::new("warn", color("33")), TextRun::new(" after", color("33"))]
        );
    }

    #[test]
    fn test_text_before_first_escape_is_default_color() {
        assert_eq!(
            parse("<nick> \x1B[94mhi"),
            vec![TextRun::new("<nick> ", Color::WHITE), TextRun::new("hi", color("94"))]
        );
    }

    #[test]
    fn test_consecutive_escapes_last_one_wins() {
        assert_eq!(parse("\x1B[31m\x1B[36mcyan"), vec![TextRun::new("cyan", color("36"))]);
    }

    #[test]
    fn test_malformed_escapes_are_literal_text() {
        for line in ["\x1B[31", "\x1B[m", "\x1B[123mx", "[31mx", "\x1B31mx"] {
            let runs = parse(line);
            assert_eq!(runs, vec![TextRun::new(line, Color::WHITE)], "input {:?}", line);
        }
    }

    #[test]
    fn test_color_does_not_carry_across_lines() {
        let parser = ColorRunParser::default();
        parser.parse("\x1B[31mred");
        assert_eq!(parser.parse("next"), vec![TextRun::new("next", Color::WHITE)]);
    }

    #[test]
    fn test_all_table_codes_are_recognized() {
        let table = ColorTable::standard();
        for code in (30..=37).chain(90..=97) {
            let runs = parse(&format!("\x1B[{}mx", code));
            assert_eq!(runs.len(), 1);
            assert_eq!(Some(runs[0].color), table.lookup(&code.to_string()));
        }
    }

    #[test]
    fn test_injected_table() {
        let table = Arc::new(ColorTable::standard());
        assert_eq!(table.len(), 16);
        let parser = ColorRunParser::new(Arc::clone(&table));
        assert_eq!(parser.table().default_color(), Color::WHITE);
        assert_eq!(parser.info_notice("[i]")[0].color, color("96"));
        assert_eq!(parser.error_notice("[e]")[0].color, color("91"));
    }

    #[test]
    fn test_strip_escapes() {
        assert_eq!(ansi::strip_escapes("\x1B[31mhello\x1B[0m world\x1B[9"), "hello world\x1B[9");
    }

    #[test]
    fn test_utf8_text_is_preserved() {
        assert_eq!(
            parse("\x1B[35mhéllo ✓"),
            vec![TextRun::new("héllo ✓", color("35"))]
        );
    }
}
