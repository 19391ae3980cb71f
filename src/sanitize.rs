/// Sanitize one page of extracted text before line classification.
///
/// Strips control characters, keeps punctuation that carries clinical
/// meaning (units, ranges, comparators), normalizes unicode dashes to `-`
/// so range notation parses uniformly, trims each line and drops blanks.
pub fn sanitize_page_text(raw: &str) -> Vec<String> {
    raw.chars()
        .map(|c| match c {
            '\u{2013}' | '\u{2014}' | '\u{2212}' => '-',
            other => other,
        })
        .filter(|c| {
            c.is_alphanumeric()
                || c.is_whitespace()
                || matches!(
                    c,
                    '.' | ','
                        | ';'
                        | ':'
                        | '-'
                        | '/'
                        | '('
                        | ')'
                        | '['
                        | ']'
                        | '+'
                        | '='
                        | '%'
                        | '#'
                        | '&'
                        | '\''
                        | '<'
                        | '>'
                        | '*'
                        | '_'
                        | '^'
                        | '°'
                        | '²'
                        | '³'
                        | 'µ'
                        | '≤'
                        | '≥'
                )
        })
        .collect::<String>()
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .map(str::to_string)
        .collect()
}
