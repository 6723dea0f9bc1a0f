//! Inline tags inside dialogue text.
//!
//! Supported tags: `[wa:N]` pauses, `[ruby=R]…[/ruby]`, `[RRGGBB]…[-]`,
//! `[b]…[/b]` and `[i]…[/i]`. `[USERNAME]` is replaced by the player name
//! and `#n` becomes a line break. Anything else in brackets is kept as text.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::unit::{Text, TextEffect};

static TAG: Lazy<Regex> = Lazy::new(|| Regex::new(r"\[([^\[\]\n]*)\]").unwrap());
static WAIT: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)^wa:(\d+)$").unwrap());
static COLOR: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[0-9A-Fa-f]{6}$").unwrap());
static USERNAME: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)\[username\]").unwrap());

#[derive(Default)]
struct Style {
    ruby: Option<String>,
    colors: Vec<String>,
    bold: bool,
    italic: bool,
}

impl Style {
    fn effects(&self) -> Vec<TextEffect> {
        let mut effects = Vec::new();
        if let Some(ruby) = &self.ruby {
            effects.push(TextEffect::Ruby(ruby.clone()));
        }
        if let Some(color) = self.colors.last() {
            effects.push(TextEffect::Color(color.clone()));
        }
        if self.bold {
            effects.push(TextEffect::Bold);
        }
        if self.italic {
            effects.push(TextEffect::Italic);
        }
        effects
    }
}

struct Builder {
    out: Vec<Text>,
    buf: String,
    wait: Option<u32>,
    parse_tags: bool,
    style: Style,
}

impl Builder {
    fn flush(&mut self) {
        if self.buf.is_empty() {
            return;
        }
        let effects = if self.parse_tags {
            self.style.effects()
        } else {
            Vec::new()
        };
        self.out.push(Text {
            content: std::mem::take(&mut self.buf),
            wait_time: self.wait.take(),
            effects,
        });
    }

    fn tag(&mut self, raw: &str, body: &str) {
        if let Some(caps) = WAIT.captures(body) {
            self.flush();
            self.wait = caps[1].parse().ok();
            return;
        }
        let lower = body.to_ascii_lowercase();
        match lower.as_str() {
            "/ruby" => {
                self.flush();
                self.style.ruby = None;
            }
            "-" => {
                self.flush();
                self.style.colors.pop();
            }
            "b" => {
                self.flush();
                self.style.bold = true;
            }
            "/b" => {
                self.flush();
                self.style.bold = false;
            }
            "i" => {
                self.flush();
                self.style.italic = true;
            }
            "/i" => {
                self.flush();
                self.style.italic = false;
            }
            _ if lower.starts_with("ruby=") => {
                self.flush();
                self.style.ruby = Some(body["ruby=".len()..].to_string());
            }
            _ if COLOR.is_match(body) => {
                self.flush();
                self.style.colors.push(format!("#{body}"));
            }
            _ => self.buf.push_str(raw),
        }
    }
}

/// Splits `raw` into styled text runs.
///
/// With `parse_tags` off, style tags are dropped and only pauses survive.
pub fn generate_text(raw: &str, parse_tags: bool, user_name: &str) -> Vec<Text> {
    let source = substitute(raw, user_name);
    let mut b = Builder {
        out: Vec::new(),
        buf: String::new(),
        wait: None,
        parse_tags,
        style: Style::default(),
    };

    let mut last = 0;
    for caps in TAG.captures_iter(&source) {
        let (Some(whole), Some(body)) = (caps.get(0), caps.get(1)) else {
            continue;
        };
        b.buf.push_str(&source[last..whole.start()]);
        b.tag(whole.as_str(), body.as_str());
        last = whole.end();
    }
    b.buf.push_str(&source[last..]);
    b.flush();
    b.out
}

/// The visible characters of `raw` with every known tag removed.
pub fn strip_tags(raw: &str, user_name: &str) -> String {
    generate_text(raw, false, user_name)
        .into_iter()
        .map(|t| t.content)
        .collect()
}

fn substitute(raw: &str, user_name: &str) -> String {
    let replaced = USERNAME.replace_all(raw, regex::NoExpand(user_name));
    replaced.replace("#n", "\n")
}
