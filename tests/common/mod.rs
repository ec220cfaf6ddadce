// Scripted test doubles shared by the integration tests.
#![allow(dead_code)]

use dmxp_slotlog::Core::os::{Fcntl, Unistd};
use dmxp_slotlog::Log::Structs::LogRecord;
use dmxp_slotlog::Log::MessageBuilder;
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::io;
use std::os::fd::RawFd;
use std::sync::Arc;

/// What the mocked `write(2)` does on one call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteResponse {
    /// Accept the whole chunk.
    All,
    /// Accept at most this many bytes.
    Accept(usize),
    /// Fail with this errno.
    Fail(i32),
}

#[derive(Debug)]
struct UnistdScript {
    responses: VecDeque<WriteResponse>,
    fallback: WriteResponse,
    calls: Vec<(RawFd, Vec<u8>)>,
    written: Vec<u8>,
}

/// `Unistd` whose `write` follows a script and records every call.
#[derive(Debug, Clone)]
pub struct ScriptedUnistd {
    inner: Arc<Mutex<UnistdScript>>,
}

impl ScriptedUnistd {
    /// Accepts everything unless told otherwise.
    pub fn new() -> Self {
        Self::with_fallback(WriteResponse::All)
    }

    pub fn with_fallback(fallback: WriteResponse) -> Self {
        Self {
            inner: Arc::new(Mutex::new(UnistdScript {
                responses: VecDeque::new(),
                fallback,
                calls: Vec::new(),
                written: Vec::new(),
            })),
        }
    }

    pub fn push_response(&self, response: WriteResponse) {
        self.inner.lock().responses.push_back(response);
    }

    pub fn set_fallback(&self, response: WriteResponse) {
        self.inner.lock().fallback = response;
    }

    /// Bytes offered to `write` on every call, in order.
    pub fn calls(&self) -> Vec<(RawFd, Vec<u8>)> {
        self.inner.lock().calls.clone()
    }

    pub fn call_count(&self) -> usize {
        self.inner.lock().calls.len()
    }

    /// Concatenation of every byte the mock accepted.
    pub fn written(&self) -> Vec<u8> {
        self.inner.lock().written.clone()
    }
}

impl Unistd for ScriptedUnistd {
    fn write(&self, fd: RawFd, buf: &[u8]) -> io::Result<usize> {
        let mut script = self.inner.lock();
        script.calls.push((fd, buf.to_vec()));
        let response = script.responses.pop_front().unwrap_or(script.fallback);
        match response {
            WriteResponse::All => {
                script.written.extend_from_slice(buf);
                Ok(buf.len())
            }
            WriteResponse::Accept(n) => {
                let n = n.min(buf.len());
                script.written.extend_from_slice(&buf[..n]);
                Ok(n)
            }
            WriteResponse::Fail(errno) => Err(io::Error::from_raw_os_error(errno)),
        }
    }
}

#[derive(Debug, Default)]
struct FcntlLog {
    status_flags: Option<libc::c_int>,
    descriptor_flags: Option<libc::c_int>,
    set_status: Vec<libc::c_int>,
    set_descriptor: Vec<libc::c_int>,
}

/// `Fcntl` that reports fixed flags (or fails the query) and records updates.
#[derive(Debug, Clone, Default)]
pub struct RecordingFcntl {
    inner: Arc<Mutex<FcntlLog>>,
}

impl RecordingFcntl {
    pub fn new(status_flags: libc::c_int, descriptor_flags: libc::c_int) -> Self {
        let fcntl = Self::default();
        {
            let mut log = fcntl.inner.lock();
            log.status_flags = Some(status_flags);
            log.descriptor_flags = Some(descriptor_flags);
        }
        fcntl
    }

    /// Every flag query fails with `EBADF`.
    pub fn failing() -> Self {
        Self::default()
    }

    pub fn set_status_calls(&self) -> Vec<libc::c_int> {
        self.inner.lock().set_status.clone()
    }

    pub fn set_descriptor_calls(&self) -> Vec<libc::c_int> {
        self.inner.lock().set_descriptor.clone()
    }
}

impl Fcntl for RecordingFcntl {
    fn get_status_flags(&self, _fd: RawFd) -> io::Result<libc::c_int> {
        self.inner
            .lock()
            .status_flags
            .ok_or_else(|| io::Error::from_raw_os_error(libc::EBADF))
    }

    fn set_status_flags(&self, _fd: RawFd, flags: libc::c_int) -> io::Result<()> {
        self.inner.lock().set_status.push(flags);
        Ok(())
    }

    fn get_descriptor_flags(&self, _fd: RawFd) -> io::Result<libc::c_int> {
        self.inner
            .lock()
            .descriptor_flags
            .ok_or_else(|| io::Error::from_raw_os_error(libc::EBADF))
    }

    fn set_descriptor_flags(&self, _fd: RawFd, flags: libc::c_int) -> io::Result<()> {
        self.inner.lock().set_descriptor.push(flags);
        Ok(())
    }
}

#[derive(Debug, Default)]
struct BuilderScript {
    spans: VecDeque<Option<Vec<u8>>>,
    get_next_span_calls: usize,
    /// `num_of_args` of every record the builder was primed with.
    primed_with: Vec<u8>,
}

/// `MessageBuilder` returning scripted spans; `None` once the script runs dry.
#[derive(Debug, Clone, Default)]
pub struct ScriptedMessageBuilder {
    inner: Arc<Mutex<BuilderScript>>,
}

impl ScriptedMessageBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_span(&self, span: &[u8]) {
        self.inner.lock().spans.push_back(Some(span.to_vec()));
    }

    pub fn push_depleted(&self) {
        self.inner.lock().spans.push_back(None);
    }

    pub fn get_next_span_calls(&self) -> usize {
        self.inner.lock().get_next_span_calls
    }

    pub fn set_next_message_calls(&self) -> usize {
        self.inner.lock().primed_with.len()
    }

    pub fn primed_with(&self) -> Vec<u8> {
        self.inner.lock().primed_with.clone()
    }

    /// Boxed handle for the drainer; `self` keeps observing the shared script.
    pub fn boxed(&self) -> Box<dyn MessageBuilder> {
        Box::new(ScriptedBuilderHandle {
            script: Arc::clone(&self.inner),
            current: Vec::new(),
        })
    }
}

struct ScriptedBuilderHandle {
    script: Arc<Mutex<BuilderScript>>,
    current: Vec<u8>,
}

impl MessageBuilder for ScriptedBuilderHandle {
    fn set_next_message(&mut self, record: &LogRecord) {
        self.script
            .lock()
            .primed_with
            .push(record.get_log_entry().num_of_args);
    }

    fn get_next_span(&mut self) -> Option<&[u8]> {
        let next = {
            let mut script = self.script.lock();
            script.get_next_span_calls += 1;
            script.spans.pop_front().flatten()
        };
        match next {
            Some(span) => {
                self.current = span;
                Some(self.current.as_slice())
            }
            None => None,
        }
    }
}

/// Unique scratch directory under the system temp dir.
pub fn scratch_dir(tag: &str) -> std::path::PathBuf {
    let dir = std::env::temp_dir().join(format!(
        "dmxp_slotlog_{}_{}_{}",
        tag,
        std::process::id(),
        fastrand::u64(..)
    ));
    std::fs::create_dir_all(&dir).expect("create scratch dir");
    dir
}
