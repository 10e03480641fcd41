use std::fmt;

/// The fixed record stored by both the probing table and the queue.
///
/// `key` identifies the record in a [`ProbingTable`](crate::ProbingTable),
/// the queue treats it as the interested party's name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Record {
    pub subject: String,
    pub key: String,
    pub tag: char,
    pub value: i64,
}

impl Record {
    pub fn new(subject: impl Into<String>, key: impl Into<String>, tag: char, value: i64) -> Self {
        Self {
            subject: subject.into(),
            key: key.into(),
            tag,
            value,
        }
    }
}

impl fmt::Display for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Name: {} Subject: {} Tag: {} Process: {}",
            self.key, self.subject, self.tag, self.value
        )
    }
}

#[cfg(test)]
mod test {
    use super::Record;

    #[test]
    fn macro_matches_new() {
        let r = crate::record!("billing", "alice", 'a', 7);
        assert_eq!(r, Record::new("billing", "alice", 'a', 7));
        assert_eq!(r, Record::new(String::from("billing"), "alice", 'a', 7));
    }

    #[test]
    fn display() {
        let r = Record::new("billing", "alice", 'a', -3);
        assert_eq!(
            r.to_string(),
            "Name: alice Subject: billing Tag: a Process: -3"
        );
    }
}
