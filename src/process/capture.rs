//! Draining the output and error pipes of a running job.
//!
//! Each captured pipe gets a reader thread that forwards chunks over a
//! channel; the runner blocks on the channel, so waiting for data never
//! spins and the deadline is honoured through `recv_timeout`.

use std::io::{ErrorKind, PipeReader, Read};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::thread;
use std::time::Instant;

const CHUNK_SIZE: usize = 8192;

/// Which captured stream a chunk came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Stream {
    Output,
    Error,
}

enum Message {
    Data(Stream, Vec<u8>),
    Closed,
}

/// Result of one wait for pipe data.
pub(crate) enum Poll {
    Data(Stream, Vec<u8>),
    /// Every pipe reached end-of-file.
    Drained,
    /// The deadline passed before the pipes drained.
    TimedOut,
}

pub(crate) struct Capture {
    rx: Receiver<Message>,
    open: usize,
}

impl Capture {
    /// Start reading the given pipes. Either may be absent (redirected to a
    /// file, or merged into the other).
    pub(crate) fn start(stdout: Option<PipeReader>, stderr: Option<PipeReader>) -> Self {
        let (tx, rx) = mpsc::channel();
        let mut open = 0;

        for (stream, reader) in [(Stream::Output, stdout), (Stream::Error, stderr)] {
            if let Some(reader) = reader {
                open += 1;
                let tx = tx.clone();
                thread::spawn(move || read_pipe(stream, reader, tx));
            }
        }

        Self { rx, open }
    }

    /// Block until a chunk arrives, every pipe is drained, or `deadline`
    /// passes.
    pub(crate) fn wait_for_data(&mut self, deadline: Option<Instant>) -> Poll {
        while self.open > 0 {
            let message = match deadline {
                Some(deadline) => {
                    let now = Instant::now();
                    if now >= deadline {
                        return Poll::TimedOut;
                    }
                    match self.rx.recv_timeout(deadline - now) {
                        Ok(message) => message,
                        Err(RecvTimeoutError::Timeout) => return Poll::TimedOut,
                        Err(RecvTimeoutError::Disconnected) => return Poll::Drained,
                    }
                }
                None => match self.rx.recv() {
                    Ok(message) => message,
                    Err(_) => return Poll::Drained,
                },
            };

            match message {
                Message::Data(stream, chunk) => return Poll::Data(stream, chunk),
                Message::Closed => self.open -= 1,
            }
        }

        Poll::Drained
    }
}

fn read_pipe(stream: Stream, mut reader: PipeReader, tx: Sender<Message>) {
    let mut buf = vec![0u8; CHUNK_SIZE];
    loop {
        match reader.read(&mut buf) {
            Ok(0) => break,
            Ok(n) => {
                tracing::trace!(?stream, bytes = n, "captured chunk");
                if tx.send(Message::Data(stream, buf[..n].to_vec())).is_err() {
                    // The runner stopped listening (timeout).
                    return;
                }
            }
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(_) => break,
        }
    }
    let _ = tx.send(Message::Closed);
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::time::Duration;

    #[test]
    fn drains_both_pipes() {
        let (out_r, mut out_w) = std::io::pipe().unwrap();
        let (err_r, mut err_w) = std::io::pipe().unwrap();
        out_w.write_all(b"out").unwrap();
        err_w.write_all(b"err").unwrap();
        drop(out_w);
        drop(err_w);

        let mut capture = Capture::start(Some(out_r), Some(err_r));
        let mut out = Vec::new();
        let mut err = Vec::new();
        loop {
            match capture.wait_for_data(None) {
                Poll::Data(Stream::Output, chunk) => out.extend(chunk),
                Poll::Data(Stream::Error, chunk) => err.extend(chunk),
                Poll::Drained => break,
                Poll::TimedOut => panic!("no deadline was set"),
            }
        }
        assert_eq!(out, b"out");
        assert_eq!(err, b"err");
    }

    #[test]
    fn no_pipes_is_immediately_drained() {
        let mut capture = Capture::start(None, None);
        assert!(matches!(capture.wait_for_data(None), Poll::Drained));
    }

    #[test]
    fn open_pipe_times_out() {
        let (out_r, out_w) = std::io::pipe().unwrap();
        let mut capture = Capture::start(Some(out_r), None);
        let deadline = Instant::now() + Duration::from_millis(50);
        assert!(matches!(capture.wait_for_data(Some(deadline)), Poll::TimedOut));
        drop(out_w);
    }
}
