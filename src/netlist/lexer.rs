//! Line tokenizer for the netlist format.

/// A whitespace-delimited token.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    /// The token's text
    pub text: String,
    /// Line number (1-indexed)
    pub line: usize,
    /// Column number (1-indexed)
    pub column: usize,
}

/// Splits netlist input into lines of tokens, dropping comments and blank lines.
pub struct Lexer<'a> {
    lines: std::iter::Enumerate<std::str::Lines<'a>>,
}

impl<'a> Lexer<'a> {
    /// Create a new lexer for the given input.
    pub fn new(input: &'a str) -> Self {
        Self {
            lines: input.lines().enumerate(),
        }
    }

    fn tokenize(line: usize, text: &str) -> Vec<Token> {
        let content = match text.find(['#', ';']) {
            Some(pos) => &text[..pos],
            None => text,
        };

        let mut tokens = Vec::new();
        let mut start = None;
        for (pos, ch) in content.char_indices().chain(std::iter::once((content.len(), ' '))) {
            match (ch.is_whitespace(), start) {
                (false, None) => start = Some(pos),
                (true, Some(s)) => {
                    tokens.push(Token {
                        text: content[s..pos].to_string(),
                        line,
                        column: content[..s].chars().count() + 1,
                    });
                    start = None;
                }
                _ => {}
            }
        }
        tokens
    }
}

impl<'a> Iterator for Lexer<'a> {
    type Item = Vec<Token>;

    fn next(&mut self) -> Option<Self::Item> {
        for (idx, text) in self.lines.by_ref() {
            let tokens = Self::tokenize(idx + 1, text);
            if !tokens.is_empty() {
                return Some(tokens);
            }
        }
        None
    }
}

/// Decimal multiplier for an SI prefix character.
pub fn si_prefix(prefix: char) -> Option<f64> {
    let mult = match prefix {
        'y' => 1e-24,
        'z' => 1e-21,
        'a' => 1e-18,
        'f' => 1e-15,
        'p' => 1e-12,
        'n' => 1e-9,
        'u' | 'µ' => 1e-6,
        'm' => 1e-3,
        'c' => 1e-2,
        'd' => 1e-1,
        'k' => 1e3,
        'M' => 1e6,
        'G' => 1e9,
        'T' => 1e12,
        'P' => 1e15,
        'E' => 1e18,
        'Z' => 1e21,
        'Y' => 1e24,
        _ => return None,
    };
    Some(mult)
}

/// Parse a number string with an optional SI prefix suffix.
///
/// Returns `None` for unknown suffixes and non-finite values.
pub fn parse_value(text: &str) -> Option<f64> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }

    let value = match text.parse::<f64>() {
        Ok(v) => v,
        Err(_) => {
            let last = text.chars().last()?;
            let mult = si_prefix(last)?;
            let num_str = &text[..text.len() - last.len_utf8()];
            num_str.parse::<f64>().ok()? * mult
        }
    };

    value.is_finite().then_some(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx_eq(a: Option<f64>, b: Option<f64>) -> bool {
        match (a, b) {
            (Some(x), Some(y)) => (x - y).abs() < x.abs() * 1e-10 + 1e-30,
            (None, None) => true,
            _ => false,
        }
    }

    #[test]
    fn test_parse_value() {
        assert!(approx_eq(parse_value("10f"), Some(10e-15)));
        assert!(approx_eq(parse_value("300p"), Some(300e-12)));
        assert!(approx_eq(parse_value("4.7u"), Some(4.7e-6)));
        assert!(approx_eq(parse_value("2µ"), Some(2e-6)));
        assert!(approx_eq(parse_value("1M"), Some(1e6)));
        assert!(approx_eq(parse_value("5m"), Some(5e-3)));
        assert!(approx_eq(parse_value("3y"), Some(3e-24)));
        assert!(approx_eq(parse_value("3Y"), Some(3e24)));
        assert!(approx_eq(parse_value("2.2"), Some(2.2)));
        assert!(approx_eq(parse_value("1e-13"), Some(1e-13)));
    }

    #[test]
    fn test_parse_value_rejects_unknown_suffix() {
        assert_eq!(parse_value("10q"), None);
        assert_eq!(parse_value("10fF"), None);
        assert_eq!(parse_value("abc"), None);
        assert_eq!(parse_value("inf"), None);
        assert_eq!(parse_value(""), None);
    }

    #[test]
    fn test_lexer_skips_comments_and_blank_lines() {
        let input = "# header\n\nnand A B OUT G1 ; trailing\n   \ninv  OUT  Y I1\n";
        let lines: Vec<Vec<Token>> = Lexer::new(input).collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].len(), 5);
        assert_eq!(lines[0][0].line, 3);
        assert_eq!(lines[1][1].text, "OUT");
        assert_eq!(lines[1][1].column, 6);
    }
}
