//! Card presentations typed on standard input.
//!
//! Each line is one card: its UID in hex, optionally grouped with spaces,
//! colons or dashes (`04a1`, `04:A1:5B:22`). Unparseable lines are logged and
//! skipped.

use rollcall_hardware::mock::MockReaderHandle;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};
use tracing::{info, warn};

/// Parse one input line into UID bytes; `None` for a blank line.
pub fn parse_uid(line: &str) -> Result<Option<Vec<u8>>, hex::FromHexError> {
    let digits: String = line
        .chars()
        .filter(|c| !(c.is_whitespace() || matches!(c, ':' | '-')))
        .collect();

    if digits.is_empty() {
        return Ok(None);
    }
    hex::decode(digits).map(Some)
}

/// Feed lines from stdin into the reader until stdin closes.
///
/// The handle is kept after end of input so the reader stays connected.
pub fn spawn_feeder(mut handle: MockReaderHandle) {
    tokio::spawn(async move {
        feed(BufReader::new(tokio::io::stdin()), &mut handle).await;
        info!("Standard input closed, no more cards will be read");

        let _handle = handle;
        std::future::pending::<()>().await
    });
}

/// Present one card per parsed line of `input`, returning at end of input.
async fn feed<R>(input: R, handle: &mut MockReaderHandle)
where
    R: AsyncBufRead + Unpin,
{
    let mut lines = input.lines();

    loop {
        let line = match lines.next_line().await {
            Ok(Some(line)) => line,
            Ok(None) => break,
            Err(e) => {
                warn!(error = %e, "Reading stdin failed");
                break;
            }
        };

        match parse_uid(&line) {
            Ok(Some(uid)) => {
                if let Err(e) = handle.present_card(uid).await {
                    warn!(error = %e, "Card rejected");
                }
            }
            Ok(None) => {}
            Err(e) => warn!(input = %line.trim(), error = %e, "Not a hex UID"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rollcall_hardware::CardReader;
    use rollcall_hardware::mock::MockReader;
    use rstest::rstest;

    #[rstest]
    #[case("04a1", vec![0x04, 0xA1])]
    #[case("04A1", vec![0x04, 0xA1])]
    #[case("  b2 00 \n", vec![0xB2, 0x00])]
    #[case("04:5A:1B:22", vec![0x04, 0x5A, 0x1B, 0x22])]
    #[case("01-02-03-04-05-06-07", vec![1, 2, 3, 4, 5, 6, 7])]
    fn test_parse_uid(#[case] line: &str, #[case] expected: Vec<u8>) {
        assert_eq!(parse_uid(line).unwrap(), Some(expected));
    }

    #[test]
    fn test_blank_line() {
        assert_eq!(parse_uid("   ").unwrap(), None);
    }

    #[rstest]
    #[case("4a1")]
    #[case("zz")]
    fn test_invalid_line(#[case] line: &str) {
        assert!(parse_uid(line).is_err());
    }

    #[tokio::test]
    async fn test_feed_presents_each_valid_line() {
        let (mut reader, mut handle) = MockReader::new();
        let input: &[u8] = b"04a1\nzz\n\nb2:00\n00112233445566778899aa\n";

        feed(input, &mut handle).await;

        let first = reader.poll().await.unwrap().unwrap();
        assert_eq!(first.uid, vec![0x04, 0xA1]);
        let second = reader.poll().await.unwrap().unwrap();
        assert_eq!(second.uid, vec![0xB2, 0x00]);

        // Over-long UID rejected by the handle, nothing else queued
        assert!(reader.poll().await.unwrap().is_none());
    }
}
