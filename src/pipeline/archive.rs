//! Tar archives: a reader thread owns the container and hands each member's bytes to the
//! active job through a bounded chunk queue.
//!
//! Jobs read members through [`MemberStream`], a view that cannot release the container:
//! dropping it only disconnects the chunk queue, after which the reader thread skips the
//! rest of that member. The walker also holds a [`MemberFeed`] per member; dropping it
//! stops the feed even while a detached parser still owns the stream. The container
//! itself is dropped exactly once, when the reader thread finishes.

use crossbeam_channel::{Receiver, Sender, TryRecvError, bounded, select};
use log::debug;
use std::io::{self, Read};
use std::thread::{self, JoinHandle};

use crate::SourceDescriptor;
use crate::pipeline::resolver::resolve_member;
use crate::utils::config::ArchiveConsts;

type Chunk = io::Result<Vec<u8>>;

/// One recognized member, in container order.
pub struct ArchiveMember {
    /// Entry path inside the archive.
    pub name: String,
    pub descriptor: SourceDescriptor,
    pub stream: MemberStream,
    pub feed: MemberFeed,
}

/// Keeps the reader thread feeding one member. Drop it once the member's job has ended.
pub struct MemberFeed {
    _alive: Sender<()>,
}

/// Read-only view of one member's bytes.
pub struct MemberStream {
    chunks: Receiver<Chunk>,
    current: Vec<u8>,
    pos: usize,
    done: bool,
}

impl MemberStream {
    fn new(chunks: Receiver<Chunk>) -> Self {
        Self {
            chunks,
            current: Vec::new(),
            pos: 0,
            done: false,
        }
    }
}

impl Read for MemberStream {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        loop {
            if self.pos < self.current.len() {
                let n = buf.len().min(self.current.len() - self.pos);
                buf[..n].copy_from_slice(&self.current[self.pos..self.pos + n]);
                self.pos += n;
                return Ok(n);
            }
            if self.done || buf.is_empty() {
                return Ok(0);
            }
            match self.chunks.recv() {
                Ok(Ok(chunk)) => {
                    self.current = chunk;
                    self.pos = 0;
                }
                Ok(Err(e)) => {
                    self.done = true;
                    return Err(e);
                }
                // Reader thread finished this member.
                Err(_) => {
                    self.done = true;
                    return Ok(0);
                }
            }
        }
    }
}

/// Iterator over the recognized members of a tar stream.
///
/// Members whose name maps to no notation, and entries that are not regular files, are
/// skipped without a diagnostic. A byte-level archive error is yielded once as `Err`,
/// after which iteration ends.
pub struct ArchiveMembers {
    member_rx: Receiver<io::Result<ArchiveMember>>,
    handle: Option<JoinHandle<()>>,
}

impl ArchiveMembers {
    /// Start reading `reader` (already decompressed) as a tar archive. `format` overrides
    /// member notations as in [`resolve_member`].
    pub fn open(reader: Box<dyn Read + Send>, format: Option<String>) -> Self {
        // Rendezvous: the next member is only read once the previous job asked for it.
        let (member_tx, member_rx) = bounded(0);
        let handle = thread::spawn(move || read_members(reader, member_tx, format));
        Self {
            member_rx,
            handle: Some(handle),
        }
    }
}

impl Iterator for ArchiveMembers {
    type Item = io::Result<ArchiveMember>;

    fn next(&mut self) -> Option<Self::Item> {
        match self.member_rx.recv() {
            Ok(member) => Some(member),
            Err(_) => {
                if let Some(h) = self.handle.take() {
                    let _ = h.join();
                }
                None
            }
        }
    }
}

fn read_members(
    reader: Box<dyn Read + Send>,
    member_tx: Sender<io::Result<ArchiveMember>>,
    format: Option<String>,
) {
    let mut archive = tar::Archive::new(reader);
    let entries = match archive.entries() {
        Ok(entries) => entries,
        Err(e) => {
            let _ = member_tx.send(Err(e));
            return;
        }
    };
    for entry in entries {
        let mut entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                let _ = member_tx.send(Err(e));
                return;
            }
        };
        if !entry.header().entry_type().is_file() {
            continue;
        }
        let name = match entry.path() {
            Ok(path) => path.to_string_lossy().into_owned(),
            Err(e) => {
                let _ = member_tx.send(Err(e));
                return;
            }
        };
        let descriptor = resolve_member(&name, format.as_deref());
        if descriptor.notation.is_none() {
            debug!("archive member {name}: no known notation, skipped");
            continue;
        }

        let (chunk_tx, chunk_rx) = bounded(ArchiveConsts::CHUNK_QUEUE);
        // Never carries a message; disconnects when the walker drops the member's feed.
        let (alive_tx, alive_rx) = bounded::<()>(0);
        let member = ArchiveMember {
            name,
            descriptor,
            stream: MemberStream::new(chunk_rx),
            feed: MemberFeed { _alive: alive_tx },
        };
        if member_tx.send(Ok(member)).is_err() {
            // Walker abandoned the archive.
            return;
        }
        pump_member(&mut entry, &chunk_tx, &alive_rx);
    }
}

/// Copy one member's bytes into the chunk queue until it ends, the job drops its view,
/// or the walker drops the member's feed.
fn pump_member(entry: &mut impl Read, chunk_tx: &Sender<Chunk>, alive: &Receiver<()>) {
    loop {
        if let Err(TryRecvError::Disconnected) = alive.try_recv() {
            return;
        }
        let mut buf = vec![0_u8; ArchiveConsts::CHUNK_SIZE];
        match entry.read(&mut buf) {
            Ok(0) => return,
            Ok(n) => {
                buf.truncate(n);
                if !offer(chunk_tx, alive, Ok(buf)) {
                    return;
                }
            }
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => {
                offer(chunk_tx, alive, Err(e));
                return;
            }
        }
    }
}

/// Queue one chunk, giving up if either side of the member goes away first.
fn offer(chunk_tx: &Sender<Chunk>, alive: &Receiver<()>, chunk: Chunk) -> bool {
    select! {
        send(chunk_tx, chunk) -> sent => sent.is_ok(),
        recv(alive) -> _ => false,
    }
}
