//! Blocking stdin reader feeding raw byte chunks to the async loop.

use std::io::{self, Read};

use tokio::sync::mpsc;

const INPUT_CHANNEL_CAPACITY: usize = 256; // bounded: no OOM
const READ_BUFFER_SIZE: usize = 4096;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputMsg {
    Bytes(Vec<u8>),
    Eof,
    Error(String),
}

/// Owns the receiving end of the reader thread's channel.
///
/// The reader is a plain OS thread rather than a tokio blocking task: a read
/// on stdin cannot be cancelled, and a blocking task would hold runtime
/// shutdown until the next keypress. The thread exits on EOF, on a read
/// error, or once the pump is dropped and its next send fails.
#[derive(Debug)]
pub struct InputPump {
    rx: mpsc::Receiver<InputMsg>,
}

impl InputPump {
    pub fn stdin() -> io::Result<Self> {
        Self::from_reader(io::stdin())
    }

    pub fn from_reader<R: Read + Send + 'static>(reader: R) -> io::Result<Self> {
        let (tx, rx) = mpsc::channel(INPUT_CHANNEL_CAPACITY);
        std::thread::Builder::new()
            .name("weft-input".to_owned())
            .spawn(move || read_loop(reader, &tx))?;
        Ok(Self { rx })
    }

    pub async fn recv(&mut self) -> Option<InputMsg> {
        self.rx.recv().await
    }
}

fn read_loop<R: Read>(mut reader: R, tx: &mpsc::Sender<InputMsg>) {
    let mut buf = [0u8; READ_BUFFER_SIZE];
    loop {
        match reader.read(&mut buf) {
            Ok(0) => {
                let _ = tx.blocking_send(InputMsg::Eof);
                break;
            }
            Ok(n) => {
                // Backpressure instead of dropping bytes mid-sequence.
                if tx.blocking_send(InputMsg::Bytes(buf[..n].to_vec())).is_err() {
                    break;
                }
            }
            Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
            Err(e) => {
                let _ = tx.blocking_send(InputMsg::Error(e.to_string()));
                break;
            }
        }
    }
    tracing::debug!("input reader stopped");
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::{InputMsg, InputPump};

    #[test]
    fn chunks_then_eof() {
        let mut pump = InputPump::from_reader(Cursor::new(b"abc".to_vec())).unwrap();
        let mut bytes = Vec::new();
        loop {
            match pump.rx.blocking_recv() {
                Some(InputMsg::Bytes(chunk)) => bytes.extend(chunk),
                Some(InputMsg::Eof) => break,
                other => panic!("unexpected {other:?}"),
            }
        }
        assert_eq!(bytes, b"abc");
        assert_eq!(pump.rx.blocking_recv(), None);
    }
}
