use std::io;
use termcolor::{Color, ColorSpec, WriteColor};

const GUTTER: usize = 2;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub text: String,
    pub matched: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Line {
    /// Present in both texts; tokens carry their own match marks.
    Both {
        expected: Vec<Token>,
        actual: Vec<Token>,
    },
    /// The expected text has more lines than the actual one.
    ExpectedOnly(String),
    /// The actual text has more lines than the expected one.
    ActualOnly(String),
}

/// Outcome of one comparison. `lines` stays empty when the texts agree,
/// so an accepted run produces no report at all.
#[derive(Debug)]
pub struct Comparison {
    equal: bool,
    left_label: String,
    right_label: String,
    pub lines: Vec<Line>,
}

/// Tokenized, line-oriented comparison of `expected` against `actual`,
/// tolerant of trailing whitespace. Tokens split on runs of whitespace
/// unless a dedicated separator is given.
pub fn diff(expected: &str, actual: &str, left_label: &str, right_label: &str) -> Comparison {
    diff_with(expected, actual, left_label, right_label, None)
}

pub fn diff_with(
    expected: &str,
    actual: &str,
    left_label: &str,
    right_label: &str,
    separator: Option<char>,
) -> Comparison {
    let equal_comparison = |left: &str, right: &str| Comparison {
        equal: true,
        left_label: left.to_string(),
        right_label: right.to_string(),
        lines: Vec::new(),
    };
    // Identical output is the common case; skip the positional pass.
    if expected == actual {
        return equal_comparison(left_label, right_label);
    }
    let expected_lines: Vec<&str> = expected.lines().collect();
    let actual_lines: Vec<&str> = actual.lines().collect();
    let mut lines = Vec::with_capacity(expected_lines.len().max(actual_lines.len()));
    let mut equal = true;
    for i in 0..expected_lines.len().max(actual_lines.len()) {
        match (expected_lines.get(i), actual_lines.get(i)) {
            (Some(e), Some(a)) => {
                let (expected, actual, differs) = diff_line(e.trim_end(), a.trim_end(), separator);
                equal &= !differs;
                lines.push(Line::Both { expected, actual });
            }
            (Some(e), None) => {
                equal = false;
                lines.push(Line::ExpectedOnly(e.trim_end().to_string()));
            }
            (None, Some(a)) => {
                equal = false;
                lines.push(Line::ActualOnly(a.trim_end().to_string()));
            }
            (None, None) => unreachable!(),
        }
    }
    if equal {
        return equal_comparison(left_label, right_label);
    }
    Comparison {
        equal: false,
        left_label: left_label.to_string(),
        right_label: right_label.to_string(),
        lines,
    }
}

fn tokenize(line: &str, separator: Option<char>) -> Vec<&str> {
    match separator {
        Some(c) => line.split(c).collect(),
        None => line.split_whitespace().collect(),
    }
}

/// Compare tokens pairwise by position; only the mismatched tokens get
/// marked, not the whole line. Trailing tokens on the longer side are
/// all extra.
fn diff_line(
    expected: &str,
    actual: &str,
    separator: Option<char>,
) -> (Vec<Token>, Vec<Token>, bool) {
    let expected_tokens = tokenize(expected, separator);
    let actual_tokens = tokenize(actual, separator);
    let mark = |own: &[&str], other: &[&str]| {
        own.iter()
            .enumerate()
            .map(|(i, text)| Token {
                text: text.to_string(),
                matched: other.get(i) == Some(text),
            })
            .collect::<Vec<_>>()
    };
    let expected_marked = mark(&expected_tokens, &actual_tokens);
    let actual_marked = mark(&actual_tokens, &expected_tokens);
    let differs = expected_marked.iter().any(|t| !t.matched)
        || actual_marked.iter().any(|t| !t.matched);
    (expected_marked, actual_marked, differs)
}

impl Comparison {
    pub fn is_equal(&self) -> bool {
        self.equal
    }

    fn plain(tokens: &[Token]) -> String {
        tokens
            .iter()
            .map(|t| t.text.as_str())
            .collect::<Vec<_>>()
            .join(" ")
    }

    fn left_width(&self) -> usize {
        self.lines
            .iter()
            .map(|line| match line {
                Line::Both { expected, .. } => Self::plain(expected).chars().count(),
                Line::ExpectedOnly(text) => text.chars().count(),
                Line::ActualOnly(_) => 0,
            })
            .chain(Some(self.left_label.chars().count()))
            .max()
            .unwrap_or(0)
    }

    /// Side-by-side report: mismatched expected tokens in one color,
    /// mismatched actual tokens in another. Nothing is written for an
    /// equal comparison.
    pub fn write_report<W: WriteColor>(&self, out: &mut W) -> io::Result<()> {
        if self.equal {
            return Ok(());
        }
        let width = self.left_width() + GUTTER;
        writeln!(
            out,
            "{:<width$}{}",
            self.left_label,
            self.right_label,
            width = width
        )?;
        for line in &self.lines {
            match line {
                Line::Both { expected, actual } => {
                    let printed = write_tokens(out, expected, Color::Red)?;
                    write!(out, "{:pad$}", "", pad = width - printed)?;
                    write_tokens(out, actual, Color::Yellow)?;
                    writeln!(out)?;
                }
                Line::ExpectedOnly(text) => {
                    out.set_color(ColorSpec::new().set_fg(Some(Color::Red)))?;
                    write!(out, "{}", text)?;
                    out.reset()?;
                    writeln!(out)?;
                }
                Line::ActualOnly(text) => {
                    write!(out, "{:pad$}", "", pad = width)?;
                    out.set_color(ColorSpec::new().set_fg(Some(Color::Yellow)))?;
                    write!(out, "{}", text)?;
                    out.reset()?;
                    writeln!(out)?;
                }
            }
        }
        Ok(())
    }
}

/// Returns how many display characters were written.
fn write_tokens<W: WriteColor>(out: &mut W, tokens: &[Token], color: Color) -> io::Result<usize> {
    let mut printed = 0;
    for (i, token) in tokens.iter().enumerate() {
        if i > 0 {
            write!(out, " ")?;
            printed += 1;
        }
        if !token.matched {
            out.set_color(ColorSpec::new().set_fg(Some(color)))?;
        }
        write!(out, "{}", token.text)?;
        if !token.matched {
            out.reset()?;
        }
        printed += token.text.chars().count();
    }
    Ok(printed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use termcolor::Buffer;

    fn render(comparison: &Comparison) -> String {
        let mut buffer = Buffer::no_color();
        comparison.write_report(&mut buffer).unwrap();
        String::from_utf8(buffer.into_inner()).unwrap()
    }

    #[test]
    fn identical_texts_are_equal_with_empty_report() {
        for text in ["", "1 2 3\n4 5\n", "line\n\nline\n"] {
            let comparison = diff(text, text, "expected", "actual");
            assert!(comparison.is_equal());
            assert!(comparison.lines.is_empty());
            assert_eq!(render(&comparison), "");
        }
    }

    #[test]
    fn trailing_spaces_do_not_matter() {
        let comparison = diff("3 4", "3 4  ", "expected", "actual");
        assert!(comparison.is_equal());
        assert!(comparison.lines.is_empty());
    }

    #[test]
    fn internal_spacing_still_tokenizes_equal() {
        assert!(diff("3  4", "3 4", "a", "b").is_equal());
    }

    #[test]
    fn extra_token_marks_only_itself() {
        let comparison = diff("1 2", "1 2 3", "expected", "actual");
        assert!(!comparison.is_equal());
        match &comparison.lines[0] {
            Line::Both { expected, actual } => {
                assert!(expected.iter().all(|t| t.matched));
                assert_eq!(
                    actual.iter().map(|t| t.matched).collect::<Vec<_>>(),
                    [true, true, false]
                );
                assert_eq!(actual[2].text, "3");
            }
            other => panic!("unexpected line {:?}", other),
        }
    }

    #[test]
    fn changed_token_marks_both_sides() {
        let comparison = diff("1 2 3", "1 7 3", "expected", "actual");
        assert!(!comparison.is_equal());
        match &comparison.lines[0] {
            Line::Both { expected, actual } => {
                assert!(!expected[1].matched);
                assert!(!actual[1].matched);
                assert!(expected[0].matched && expected[2].matched);
            }
            other => panic!("unexpected line {:?}", other),
        }
    }

    #[test]
    fn missing_line_belongs_to_the_longer_side() {
        let comparison = diff("a\nb\nc", "a\nb", "expected", "actual");
        assert!(!comparison.is_equal());
        assert_eq!(comparison.lines.len(), 3);
        assert_eq!(comparison.lines[2], Line::ExpectedOnly("c".to_string()));

        let comparison = diff("a", "a\nextra", "expected", "actual");
        assert_eq!(comparison.lines[1], Line::ActualOnly("extra".to_string()));
    }

    #[test]
    fn report_layout_pads_left_column() {
        let comparison = diff("10 20\n1", "10 21\n1", "expected", "yours");
        let report = render(&comparison);
        let mut lines = report.lines();
        assert_eq!(lines.next(), Some("expected  yours"));
        assert_eq!(lines.next(), Some("10 20     10 21"));
        assert_eq!(lines.next(), Some("1         1"));
    }

    #[test]
    fn explicit_separator_respects_empty_fields() {
        let comparison = diff_with("a,b", "a,,b", "expected", "actual", Some(','));
        assert!(!comparison.is_equal());
    }
}
