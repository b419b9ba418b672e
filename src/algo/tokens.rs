//! Text tokenizer
//!
//! Splits a text run into words, whitespace runs, character entities and
//! single punctuation characters. Tokens borrow from the input, and
//! concatenating them in order gives back the input exactly.

// =============================================================================
// Token
// =============================================================================

/// Kind of a text token
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    /// Run of letters or run of digits, with internal joiners
    Word,
    /// Maximal run of whitespace
    Whitespace,
    /// One character that is not part of any other token
    Punctuation,
    /// `&name;`, `&#123;` or `&#x1F;`
    Entity,
}

/// Atomic unit of text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Token<'a> {
    pub kind: TokenKind,
    pub text: &'a str,
}

impl<'a> Token<'a> {
    #[inline]
    pub fn is_whitespace(&self) -> bool {
        self.kind == TokenKind::Whitespace
    }
}

// =============================================================================
// Tokenizer
// =============================================================================

/// Split `text` into tokens.
///
/// Total for any input; the empty string yields no tokens.
pub fn split_text(text: &str) -> Vec<Token<'_>> {
    let mut tokens = Vec::new();
    let mut rest = text;
    while let Some(first) = rest.chars().next() {
        let (kind, len) = scan(rest, first);
        tokens.push(Token {
            kind,
            text: &rest[..len],
        });
        rest = &rest[len..];
    }
    tokens
}

/// Non-whitespace tokens of `text`, as strings
pub fn words(text: &str) -> impl Iterator<Item = &str> {
    split_text(text)
        .into_iter()
        .filter(|t| !t.is_whitespace())
        .map(|t| t.text)
}

fn scan(s: &str, first: char) -> (TokenKind, usize) {
    if let Some(class) = WordClass::of(first) {
        return (TokenKind::Word, scan_word(s, class));
    }
    if first.is_whitespace() {
        let len = s.find(|c: char| !c.is_whitespace()).unwrap_or(s.len());
        return (TokenKind::Whitespace, len);
    }
    if first == '&' {
        if let Some(len) = entity_len(s) {
            return (TokenKind::Entity, len);
        }
    }
    (TokenKind::Punctuation, first.len_utf8())
}

/// Letters and digits never share a word.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum WordClass {
    Letter,
    Digit,
}

impl WordClass {
    fn of(c: char) -> Option<Self> {
        if c.is_alphabetic() {
            Some(WordClass::Letter)
        } else if c.is_numeric() {
            Some(WordClass::Digit)
        } else {
            None
        }
    }

    fn contains(self, c: char) -> bool {
        WordClass::of(c) == Some(self)
    }
}

#[inline]
fn is_joiner(c: char) -> bool {
    matches!(c, '\'' | '\u{2019}' | '-' | '/')
}

fn scan_word(s: &str, class: WordClass) -> usize {
    let mut end = 0;
    let mut chars = s.char_indices().peekable();
    while let Some((i, c)) = chars.next() {
        if class.contains(c) {
            end = i + c.len_utf8();
            continue;
        }
        // A joiner only binds when the word continues right after it
        let continues = is_joiner(c) && chars.peek().is_some_and(|&(_, next)| class.contains(next));
        if !continues {
            break;
        }
    }
    end
}

/// Byte length of the entity at the start of `s`, which begins with `&`
pub(crate) fn entity_len(s: &str) -> Option<usize> {
    let body = &s[1..];
    let name_len = match body.strip_prefix('#') {
        Some(num) => match num.strip_prefix(['x', 'X']) {
            Some(hex) => {
                let digits = hex.bytes().take_while(u8::is_ascii_hexdigit).count();
                (digits > 0).then_some(2 + digits)?
            }
            None => {
                let digits = num.bytes().take_while(u8::is_ascii_digit).count();
                (digits > 0).then_some(1 + digits)?
            }
        },
        None => {
            if !body.starts_with(|c: char| c.is_ascii_alphabetic()) {
                return None;
            }
            body.bytes().take_while(u8::is_ascii_alphanumeric).count()
        }
    };
    (body.as_bytes().get(name_len) == Some(&b';')).then_some(name_len + 2)
}
