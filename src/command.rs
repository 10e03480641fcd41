use std::str::SplitWhitespace;

use collections::{Record, record};
use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ParseError {
    /// Op code is not known by the driver, or longer than one character
    #[error("Invalid operation: {0}")]
    UnknownOp(String),

    #[error("Missing {field} for operation '{op}'")]
    MissingField { op: char, field: &'static str },

    #[error("Invalid {field}, expected an integer got: {value}")]
    InvalidInt { field: &'static str, value: String },

    #[error("Tag must be a single character, got: {0}")]
    InvalidTag(String),
}

/// A command of one of the REPL drivers, parsed from a single input line
pub trait Command: Sized {
    fn parse(op: char, fields: &mut Fields<'_>) -> Result<Self, ParseError>;

    /// `true` for the sentinel command ending the session
    fn is_finish(&self) -> bool;
}

#[derive(Debug, PartialEq, Eq)]
pub enum TableCommand {
    /// `i <subject> <key> <tag> <value>`
    Insert(Record),
    /// `r <key>`
    Remove(String),
    /// `l <key>`
    Lookup(String),
    /// `p`
    Print,
    /// `f`
    Finish,
}

#[derive(Debug, PartialEq, Eq)]
pub enum QueueCommand {
    /// `i <name> <subject> <tag> <number>`
    Enqueue(Record),
    /// `r`
    Dequeue,
    /// `l`
    Clear,
    /// `e`
    Peek,
    /// `f`
    Finish,
}

/// Cursor over the whitespace separated fields following the op code
#[derive(Debug)]
pub struct Fields<'a> {
    op: char,
    tokens: SplitWhitespace<'a>,
}

/// Parses one line, returning `None` for blank lines
pub fn parse_line<C: Command>(line: &str) -> Result<Option<C>, ParseError> {
    let mut tokens = line.split_whitespace();
    let Some(op_token) = tokens.next() else {
        return Ok(None);
    };

    let mut chars = op_token.chars();
    let op = match (chars.next(), chars.next()) {
        (Some(op), None) => op,
        _ => return Err(ParseError::UnknownOp(op_token.into())),
    };

    let mut fields = Fields { op, tokens };
    C::parse(op, &mut fields).map(Some)
}

impl<'a> Fields<'a> {
    pub fn next_str(&mut self, field: &'static str) -> Result<&'a str, ParseError> {
        self.tokens.next().ok_or(ParseError::MissingField { op: self.op, field })
    }

    pub fn next_tag(&mut self, field: &'static str) -> Result<char, ParseError> {
        let s = self.next_str(field)?;
        let mut chars = s.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => Ok(c),
            _ => Err(ParseError::InvalidTag(s.into())),
        }
    }

    pub fn next_int(&mut self, field: &'static str) -> Result<i64, ParseError> {
        let s = self.next_str(field)?;
        s.parse().map_err(|_| ParseError::InvalidInt {
            field,
            value: s.into(),
        })
    }
}

impl Command for TableCommand {
    fn parse(op: char, fields: &mut Fields<'_>) -> Result<Self, ParseError> {
        let cmd = match op {
            'i' => {
                let subject = fields.next_str("subject")?;
                let key = fields.next_str("key")?;
                let tag = fields.next_tag("tag")?;
                let value = fields.next_int("value")?;
                TableCommand::Insert(record!(subject, key, tag, value))
            }
            'r' => TableCommand::Remove(fields.next_str("key")?.into()),
            'l' => TableCommand::Lookup(fields.next_str("key")?.into()),
            'p' => TableCommand::Print,
            'f' => TableCommand::Finish,
            other => return Err(ParseError::UnknownOp(other.into())),
        };
        Ok(cmd)
    }

    fn is_finish(&self) -> bool {
        matches!(self, TableCommand::Finish)
    }
}

impl Command for QueueCommand {
    fn parse(op: char, fields: &mut Fields<'_>) -> Result<Self, ParseError> {
        let cmd = match op {
            'i' => {
                let name = fields.next_str("name")?;
                let subject = fields.next_str("subject")?;
                let tag = fields.next_tag("tag")?;
                let number = fields.next_int("process number")?;
                QueueCommand::Enqueue(record!(subject, name, tag, number))
            }
            'r' => QueueCommand::Dequeue,
            'l' => QueueCommand::Clear,
            'e' => QueueCommand::Peek,
            'f' => QueueCommand::Finish,
            other => return Err(ParseError::UnknownOp(other.into())),
        };
        Ok(cmd)
    }

    fn is_finish(&self) -> bool {
        matches!(self, QueueCommand::Finish)
    }
}

#[cfg(test)]
mod test {
    use collections::record;

    use super::{ParseError, QueueCommand, TableCommand, parse_line};

    #[test]
    fn table_commands() {
        assert_eq!(
            parse_line("i billing alice a 12"),
            Ok(Some(TableCommand::Insert(record!("billing", "alice", 'a', 12))))
        );
        assert_eq!(
            parse_line("r alice"),
            Ok(Some(TableCommand::Remove("alice".into())))
        );
        assert_eq!(
            parse_line("  l   alice  "),
            Ok(Some(TableCommand::Lookup("alice".into())))
        );
        assert_eq!(parse_line("p"), Ok(Some(TableCommand::Print)));
        assert_eq!(parse_line("f"), Ok(Some(TableCommand::Finish)));
        assert_eq!(parse_line::<TableCommand>("   "), Ok(None));
    }

    #[test]
    fn queue_commands() {
        assert_eq!(
            parse_line("i alice billing a -4"),
            Ok(Some(QueueCommand::Enqueue(record!("billing", "alice", 'a', -4))))
        );
        assert_eq!(parse_line("r"), Ok(Some(QueueCommand::Dequeue)));
        assert_eq!(parse_line("l"), Ok(Some(QueueCommand::Clear)));
        assert_eq!(parse_line("e"), Ok(Some(QueueCommand::Peek)));
        assert_eq!(parse_line("f"), Ok(Some(QueueCommand::Finish)));
    }

    #[test]
    fn unknown_op() {
        assert_eq!(
            parse_line::<TableCommand>("x alice"),
            Err(ParseError::UnknownOp("x".into()))
        );
        assert_eq!(
            parse_line::<TableCommand>("insert alice"),
            Err(ParseError::UnknownOp("insert".into()))
        );
        // `e` only exists for the queue
        assert!(parse_line::<TableCommand>("e").is_err());
    }

    #[test]
    fn bad_fields() {
        assert_eq!(
            parse_line::<TableCommand>("i billing alice"),
            Err(ParseError::MissingField { op: 'i', field: "tag" })
        );
        assert_eq!(
            parse_line::<TableCommand>("i billing alice ab 1"),
            Err(ParseError::InvalidTag("ab".into()))
        );
        assert_eq!(
            parse_line::<TableCommand>("i billing alice a twelve"),
            Err(ParseError::InvalidInt {
                field: "value",
                value: "twelve".into()
            })
        );
        assert_eq!(
            parse_line::<TableCommand>("r"),
            Err(ParseError::MissingField { op: 'r', field: "key" })
        );
    }
}
