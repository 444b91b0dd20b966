//! Streaming decoder for the environment-mutation protocol.
//!
//! A plugin writes NUL-terminated records to its channel while its hook
//! runs. Each record is `KEY=VALUE` (unset `KEY`, then set it to `VALUE`),
//! `KEY=` (unset only), or a bare `KEY` (unset only). There is no length
//! prefix; a record may span several read chunks, so the decoder keeps an
//! accumulation buffer of the unterminated tail.
//!
//! One decoder instance covers one plugin invocation. It is finite and not
//! restartable: the stream ends when the child closes its write end.

use tracing::warn;

/// One decoded environment mutation requested by a plugin.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnvMutation {
    /// Variable name. Never empty and never contains `=` or NUL.
    pub key: String,
    /// New value, or `None` to unset the variable.
    pub value: Option<String>,
}

/// Incremental decoder with an accumulation buffer for records split
/// across reads.
#[derive(Debug, Default)]
pub struct EnvDecoder {
    buf: Vec<u8>,
}

impl EnvDecoder {
    /// Creates an empty decoder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Feeds one read chunk and returns the mutations completed by it.
    ///
    /// Records with an empty key are discarded; the process environment
    /// cannot hold them.
    pub fn feed(&mut self, chunk: &[u8]) -> Vec<EnvMutation> {
        self.buf.extend_from_slice(chunk);

        let mut mutations = Vec::new();
        while let Some(pos) = self.buf.iter().position(|b| *b == 0) {
            let record: Vec<u8> = self.buf.drain(..=pos).collect();
            if let Some(mutation) = parse_record(&record[..record.len() - 1]) {
                mutations.push(mutation);
            }
        }
        mutations
    }

    /// Number of buffered bytes belonging to an unterminated record.
    pub fn pending(&self) -> usize {
        self.buf.len()
    }
}

fn parse_record(record: &[u8]) -> Option<EnvMutation> {
    if record.is_empty() {
        return None;
    }

    let (key, value) = match record.iter().position(|b| *b == b'=') {
        Some(sep) => {
            let value = &record[sep + 1..];
            let value =
                (!value.is_empty()).then(|| String::from_utf8_lossy(value).into_owned());
            (&record[..sep], value)
        }
        None => (record, None),
    };

    if key.is_empty() {
        warn!("Discarding environment record with empty key");
        return None;
    }

    Some(EnvMutation {
        key: String::from_utf8_lossy(key).into_owned(),
        value,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(key: &str, value: &str) -> EnvMutation {
        EnvMutation {
            key: key.to_string(),
            value: Some(value.to_string()),
        }
    }

    fn unset(key: &str) -> EnvMutation {
        EnvMutation {
            key: key.to_string(),
            value: None,
        }
    }

    #[test]
    fn test_single_record() {
        let mut decoder = EnvDecoder::new();
        assert_eq!(decoder.feed(b"FOO=bar\0"), vec![set("FOO", "bar")]);
        assert_eq!(decoder.pending(), 0);
    }

    #[test]
    fn test_record_split_across_chunks() {
        let mut decoder = EnvDecoder::new();
        assert_eq!(decoder.feed(b"LONG_KE"), vec![]);
        assert_eq!(decoder.pending(), 7);
        assert_eq!(decoder.feed(b"Y=split val"), vec![]);
        assert_eq!(decoder.feed(b"ue\0"), vec![set("LONG_KEY", "split value")]);
    }

    #[test]
    fn test_several_records_in_one_chunk() {
        let mut decoder = EnvDecoder::new();
        assert_eq!(
            decoder.feed(b"A=1\0B=2\0C=3\0"),
            vec![set("A", "1"), set("B", "2"), set("C", "3")]
        );
    }

    #[test]
    fn test_unset_forms() {
        let mut decoder = EnvDecoder::new();
        assert_eq!(decoder.feed(b"FOO=\0"), vec![unset("FOO")]);
        assert_eq!(decoder.feed(b"BAR\0"), vec![unset("BAR")]);
    }

    #[test]
    fn test_empty_key_discarded() {
        let mut decoder = EnvDecoder::new();
        assert_eq!(decoder.feed(b"=oops\0\0KEPT=yes\0"), vec![set("KEPT", "yes")]);
    }

    #[test]
    fn test_value_may_contain_equals() {
        let mut decoder = EnvDecoder::new();
        assert_eq!(
            decoder.feed(b"EQ=a=b=c\0"),
            vec![set("EQ", "a=b=c")]
        );
    }

    #[test]
    fn test_unterminated_tail_stays_pending() {
        let mut decoder = EnvDecoder::new();
        assert_eq!(decoder.feed(b"DONE=1\0PART=ia"), vec![set("DONE", "1")]);
        assert_eq!(decoder.pending(), 7);
    }
}
