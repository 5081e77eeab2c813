/// Read position within the source text.
///
/// `line` and `column` describe the next unread character and are what
/// token spans get stamped with. Columns count bytes, so a multi-byte
/// character inside a string literal advances the column by its UTF-8 width.
pub struct Cursor<'src> {
    source: &'src str,
    offset: u32,
    line: u32,
    column: u32,
}

impl<'src> Cursor<'src> {
    pub fn new(source: &'src str) -> Self {
        Self {
            source,
            offset: 0,
            line: 1,
            column: 1,
        }
    }

    #[inline]
    fn remaining(&self) -> &'src str {
        &self.source[self.offset as usize..]
    }

    #[inline]
    pub fn offset(&self) -> u32 {
        self.offset
    }

    /// 1-based.
    #[inline]
    pub fn line(&self) -> u32 {
        self.line
    }

    /// 1-based, in bytes.
    #[inline]
    pub fn column(&self) -> u32 {
        self.column
    }

    #[inline]
    pub fn is_eof(&self) -> bool {
        self.offset as usize >= self.source.len()
    }

    #[inline]
    pub fn peek(&self) -> Option<char> {
        self.remaining().chars().next()
    }

    /// Step over one character. A newline moves to column 1 of the next line.
    pub fn advance(&mut self) -> Option<char> {
        let ch = self.peek()?;
        let width = ch.len_utf8() as u32;
        self.offset += width;
        match ch {
            '\n' => {
                self.line += 1;
                self.column = 1;
            }
            _ => self.column += width,
        }
        Some(ch)
    }

    /// Step over `expected` if it is next.
    pub fn eat(&mut self, expected: char) -> bool {
        let matched = self.peek() == Some(expected);
        if matched {
            self.advance();
        }
        matched
    }

    /// Step over the longest run of characters accepted by `accept`.
    pub fn eat_while(&mut self, accept: impl Fn(char) -> bool) -> &'src str {
        let start = self.offset;
        while self.peek().is_some_and(&accept) {
            self.advance();
        }
        self.slice_from(start)
    }

    /// Source text from byte `start` up to the read position.
    #[inline]
    pub fn slice_from(&self, start: u32) -> &'src str {
        &self.source[start as usize..self.offset as usize]
    }
}

/// Identifiers start with an ASCII letter.
#[inline]
pub fn is_ident_start(c: char) -> bool {
    c.is_ascii_alphabetic()
}

/// After the first letter, identifiers may also contain digits. There is no `_`.
#[inline]
pub fn is_ident_continue(c: char) -> bool {
    c.is_ascii_alphanumeric()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn newline_resets_column() {
        let mut cursor = Cursor::new("fn\nx");
        cursor.advance();
        cursor.advance();
        assert_eq!((cursor.line(), cursor.column()), (1, 3));
        assert_eq!(cursor.advance(), Some('\n'));
        assert_eq!((cursor.line(), cursor.column(), cursor.offset()), (2, 1, 3));
    }

    #[test]
    fn multibyte_characters_advance_by_width() {
        let mut cursor = Cursor::new("\"é\"");
        cursor.advance();
        cursor.advance();
        assert_eq!(cursor.column(), 4);
        assert_eq!(cursor.slice_from(0), "\"é");
    }

    #[test]
    fn eat_while_stops_at_first_rejected() {
        let mut cursor = Cursor::new("count2 = 1");
        assert_eq!(cursor.eat_while(is_ident_continue), "count2");
        assert!(!cursor.eat('='));
        assert!(cursor.eat(' '));
        assert!(cursor.eat('='));
    }

    #[test]
    fn end_of_input() {
        let mut cursor = Cursor::new("x");
        assert_eq!(cursor.advance(), Some('x'));
        assert!(cursor.is_eof());
        assert_eq!(cursor.peek(), None);
        assert_eq!(cursor.advance(), None);
        assert_eq!(cursor.eat_while(|_| true), "");
    }

    #[test]
    fn identifiers_are_alphanumeric() {
        assert!(is_ident_start('q'));
        assert!(!is_ident_start('7'));
        assert!(!is_ident_start('_'));
        assert!(is_ident_continue('7'));
        assert!(!is_ident_continue('_'));
    }
}
