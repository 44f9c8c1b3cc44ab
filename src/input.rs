//! Keyboard input on a dedicated thread.
//!
//! The reader blocks on the raw byte source and publishes decoded keys into a
//! one-slot mailbox. The game loop polls that mailbox once per tick without
//! waiting; a key that was never picked up is replaced by the newer one.

use std::io::{self, ErrorKind, Read};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use crossbeam_channel::{bounded, Receiver, Sender, TrySendError};
use tracing::{trace, warn};

use crate::components::Dir;

const ESC: u8 = 0x1b;
const READ_BUF: usize = 100;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Key {
    Up,
    Down,
    Left,
    Right,
    Esc,
}

impl Key {
    pub fn dir(self) -> Option<Dir> {
        match self {
            Key::Up => Some(Dir::Up),
            Key::Down => Some(Dir::Down),
            Key::Left => Some(Dir::Left),
            Key::Right => Some(Dir::Right),
            Key::Esc => None,
        }
    }
}

/// Decodes one read from a raw-mode terminal.
///
/// A lone ESC byte quits, `ESC [ A..D` are the arrow keys, everything else
/// is ignored.
pub fn decode(bytes: &[u8]) -> Option<Key> {
    match bytes {
        [ESC] => Some(Key::Esc),
        [ESC, b'[', code, ..] => match *code {
            b'A' => Some(Key::Up),
            b'B' => Some(Key::Down),
            b'C' => Some(Key::Right),
            b'D' => Some(Key::Left),
            _ => None,
        },
        _ => None,
    }
}

pub struct InputStream {
    rx: Receiver<Key>,
    shutdown: Arc<AtomicBool>,
    handle: Option<JoinHandle<()>>,
}

impl InputStream {
    /// Starts the reader thread on `source`.
    ///
    /// A read error or end of input is published as `Key::Esc` and ends the
    /// thread, so a broken terminal turns into a quit rather than a hang.
    pub fn spawn<R>(source: R) -> io::Result<Self>
    where
        R: Read + Send + 'static,
    {
        let (tx, rx) = bounded(1);
        let shutdown = Arc::new(AtomicBool::new(false));

        let mailbox = Mailbox {
            tx,
            rx: rx.clone(),
        };
        let flag = Arc::clone(&shutdown);
        let handle = thread::Builder::new()
            .name("pacman-input".to_string())
            .spawn(move || read_loop(source, &mailbox, &flag))?;

        Ok(Self {
            rx,
            shutdown,
            handle: Some(handle),
        })
    }

    /// The most recent key, if one arrived since the last poll. Never blocks.
    pub fn poll(&self) -> Option<Key> {
        self.rx.try_recv().ok()
    }

    /// Asks the reader to stop after its current read returns. A read that
    /// blocks forever keeps the thread parked until the process exits.
    pub fn shutdown(&self) {
        self.shutdown.store(true, Ordering::Relaxed);
    }

    pub fn is_finished(&self) -> bool {
        self.handle.as_ref().map_or(true, JoinHandle::is_finished)
    }
}

impl Drop for InputStream {
    fn drop(&mut self) {
        self.shutdown();
    }
}

/// Sending side of the one-slot hand-off. Holds a receiver too, so it can
/// evict a stale key instead of waiting for the consumer.
struct Mailbox {
    tx: Sender<Key>,
    rx: Receiver<Key>,
}

impl Mailbox {
    fn publish(&self, key: Key) {
        let mut key = key;
        loop {
            match self.tx.try_send(key) {
                Ok(()) => return,
                Err(TrySendError::Full(k)) => {
                    let _ = self.rx.try_recv();
                    key = k;
                }
                Err(TrySendError::Disconnected(_)) => return,
            }
        }
    }
}

fn read_loop<R: Read>(mut source: R, mailbox: &Mailbox, shutdown: &AtomicBool) {
    let mut buf = [0u8; READ_BUF];
    while !shutdown.load(Ordering::Relaxed) {
        match source.read(&mut buf) {
            Ok(0) => {
                warn!("input closed, quitting");
                mailbox.publish(Key::Esc);
                return;
            }
            Ok(n) => {
                if shutdown.load(Ordering::Relaxed) {
                    return;
                }
                if let Some(key) = decode(&buf[..n]) {
                    trace!(?key, "key");
                    mailbox.publish(key);
                }
            }
            Err(e) if e.kind() == ErrorKind::Interrupted => {}
            Err(e) => {
                warn!("error reading input: {e}");
                mailbox.publish(Key::Esc);
                return;
            }
        }
    }
}
