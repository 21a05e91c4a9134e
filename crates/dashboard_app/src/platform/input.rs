use std::io::{self, BufRead};
use std::thread;

use tokio::sync::mpsc;

const LINE_BUFFER: usize = 16;

/// Reads lines on a plain OS thread and forwards them to the async side.
///
/// The read stays off the tokio blocking pool so runtime shutdown never waits
/// on a parked terminal read. The channel closes at end of input or after a
/// read error.
pub fn spawn_line_reader<R>(reader: R) -> mpsc::Receiver<io::Result<String>>
where
    R: BufRead + Send + 'static,
{
    let (tx, rx) = mpsc::channel(LINE_BUFFER);
    thread::spawn(move || {
        for line in reader.lines() {
            let failed = line.is_err();
            if tx.blocking_send(line).is_err() || failed {
                break;
            }
        }
    });
    rx
}

pub fn stdin_lines() -> mpsc::Receiver<io::Result<String>> {
    spawn_line_reader(io::BufReader::new(io::stdin()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[tokio::test]
    async fn forwards_lines_then_closes() {
        let mut rx = spawn_line_reader(Cursor::new("query cafes\nsearch\n"));

        assert_eq!(rx.recv().await.unwrap().unwrap(), "query cafes");
        assert_eq!(rx.recv().await.unwrap().unwrap(), "search");
        assert!(rx.recv().await.is_none());
    }

    #[cfg(unix)]
    #[test]
    fn runtime_shutdown_does_not_wait_for_a_parked_read() {
        let (_writer, reader) = std::os::unix::net::UnixStream::pair().unwrap();
        let runtime = tokio::runtime::Runtime::new().unwrap();
        let rx = runtime.block_on(async { spawn_line_reader(io::BufReader::new(reader)) });

        // The reader thread is still blocked in `read`; a read on the blocking
        // pool would make this drop hang.
        drop(rx);
        drop(runtime);
    }
}
