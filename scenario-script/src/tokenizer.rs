pub const DELIMITER: char = ';';

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Segment<'a> {
    pub line: usize,
    pub text: &'a str,
}

impl<'a> Segment<'a> {
    pub fn fields(&self) -> impl Iterator<Item = &'a str> + 'a {
        self.text.split(DELIMITER).map(str::trim)
    }

    pub fn head(&self) -> &'a str {
        self.fields().next().unwrap_or_default()
    }
}

/// Splits a script field into segments, dropping blank lines.
pub fn tokenize(script: &str) -> Vec<Segment<'_>> {
    script
        .split('\n')
        .enumerate()
        .filter_map(|(line, raw)| {
            let text = raw.trim();
            (!text.is_empty()).then_some(Segment { line, text })
        })
        .collect()
}

pub fn skip_separators(rest: &str) -> &str {
    rest.trim_start_matches(|c: char| c == DELIMITER || c.is_whitespace())
}
