//! Parser parses numbers represented in scientific format.
//!
//! The accepted form is `[+-]digits[.digits][exponent]`, where the exponent is a decimal
//! integer preceded by `@` in any base, or by `e`/`E` in bases up to 10. `inf`, `nan`,
//! `@inf@` and `@nan@` are accepted in any letter case.

use core::str::Chars;

use crate::defs::{Error, Exponent, Sign};

/// Value of the digit character `c` in the base `b`.
pub(crate) fn digit_value(c: char, b: u32) -> Option<u8> {
    let v = if b <= 36 {
        c.to_digit(36)?
    } else {
        match c {
            '0'..='9' => c as u32 - '0' as u32,
            'A'..='Z' => c as u32 - 'A' as u32 + 10,
            'a'..='z' => c as u32 - 'a' as u32 + 36,
            _ => return None,
        }
    };
    if v < b {
        Some(v as u8)
    } else {
        None
    }
}

/// Result of parsing.
#[derive(Debug)]
pub struct ParserState<'a> {
    chars: Chars<'a>,
    cur_ch: Option<char>,
    sign: Sign,
    digits: Vec<u8>,
    e: i128,
    inf: bool,
    nan: bool,
}

impl<'a> ParserState<'a> {
    fn new(s: &'a str) -> Self {
        let mut chars = s.chars();
        let cur_ch = chars.next();
        ParserState {
            chars,
            cur_ch,
            sign: Sign::Pos,
            digits: Vec::new(),
            e: 0,
            inf: false,
            nan: false,
        }
    }

    fn next_char(&mut self) -> Option<char> {
        self.cur_ch = self.chars.next();
        self.cur_ch
    }

    fn cur_char(&self) -> Option<char> {
        self.cur_ch
    }

    // Consumes `word` ignoring the letter case.
    fn eat_word(&mut self, word: &str) -> bool {
        for w in word.chars() {
            match self.cur_char() {
                Some(c) if c.eq_ignore_ascii_case(&w) => {
                    self.next_char();
                }
                _ => return false,
            }
        }
        true
    }

    pub fn is_inf(&self) -> bool {
        self.inf
    }

    pub fn is_nan(&self) -> bool {
        self.nan
    }

    pub fn sign(&self) -> Sign {
        self.sign
    }

    /// Returns the sign, the digits, and the exponent `e`, such that the number is `±0.digits × base^e`.
    pub fn raw_parts(&self) -> (Sign, &[u8], i128) {
        (self.sign, &self.digits, self.e)
    }
}

/// Parses the string `s` with digits in the base `b`.
///
/// ## Errors
///
///  - InvalidArgument: the string is not a number in the base `b`.
///  - MemoryAllocation: failed to allocate memory for digits.
pub fn parse(s: &str, b: u32) -> Result<ParserState, Error> {
    let mut ps = ParserState::new(s.trim());

    match ps.cur_char() {
        Some('+') => {
            ps.next_char();
        }
        Some('-') => {
            ps.sign = Sign::Neg;
            ps.next_char();
        }
        _ => {}
    }

    let special = match ps.cur_char() {
        Some('@') => {
            ps.next_char();
            Some(true)
        }
        Some(c @ ('i' | 'I' | 'n' | 'N')) if digit_value(c, b).is_none() => Some(false),
        _ => None,
    };

    if let Some(at) = special {
        if ps.eat_word("inf") {
            ps.inf = true;
            ps.eat_word("inity");
        } else if ps.eat_word("nan") {
            ps.nan = true;
        } else {
            return Err(Error::InvalidArgument);
        }
        if at && !ps.eat_word("@") {
            return Err(Error::InvalidArgument);
        }
    } else {
        parse_num(&mut ps, b)?;
    }

    if ps.cur_char().is_some() {
        return Err(Error::InvalidArgument);
    }

    Ok(ps)
}

fn parse_num(ps: &mut ParserState, b: u32) -> Result<(), Error> {
    let int_len = parse_digits(ps, b)?;
    let mut frac_len = 0;
    if Some('.') == ps.cur_char() {
        ps.next_char();
        frac_len = parse_digits(ps, b)?;
    }
    if int_len + frac_len == 0 {
        return Err(Error::InvalidArgument);
    }

    match ps.cur_char() {
        Some('@') => {
            ps.next_char();
            parse_exp(ps)?;
        }
        Some('e' | 'E') if b <= 10 => {
            ps.next_char();
            parse_exp(ps)?;
        }
        _ => {}
    }

    ps.e = ps.e.saturating_add(int_len as i128);
    Ok(())
}

fn parse_digits(ps: &mut ParserState, b: u32) -> Result<usize, Error> {
    let mut len = 0;
    while let Some(d) = ps.cur_char().and_then(|c| digit_value(c, b)) {
        ps.digits.try_reserve(1)?;
        ps.digits.push(d);
        len += 1;
        ps.next_char();
    }
    Ok(len)
}

fn parse_exp(ps: &mut ParserState) -> Result<(), Error> {
    let mut neg = false;
    match ps.cur_char() {
        Some('+') => {
            ps.next_char();
        }
        Some('-') => {
            neg = true;
            ps.next_char();
        }
        _ => {}
    }

    let mut e: i128 = 0;
    let mut len = 0;
    while let Some(d) = ps.cur_char().and_then(|c| c.to_digit(10)) {
        // saturation keeps the value beyond the reach of any exponent range
        e = e.saturating_mul(10).saturating_add(d as i128).min(Exponent::MAX as i128);
        len += 1;
        ps.next_char();
    }
    if len == 0 {
        return Err(Error::InvalidArgument);
    }

    ps.e = if neg { -e } else { e };
    Ok(())
}
