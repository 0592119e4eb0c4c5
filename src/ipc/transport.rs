//! Request/response transport over the Soundpad pipe
//!
//! One exchange at a time: write the command text, read one byte, then read
//! however many bytes the peer reports as queued. Soundpad only makes the
//! byte count observable after the first byte has been consumed.

use std::io::{self, Read, Write};
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

use crate::common::{Error, Result};

use super::pipe::{Connector, Pipe, PipeConnector};
use super::protocol::Reply;

/// Default pacing tick between two exchanges
pub const DEFAULT_PACING_TICK: Duration = Duration::from_millis(1);

/// Serialized request/response channel to Soundpad
///
/// The connection is opened on first use and dropped after any I/O failure,
/// so the next request reconnects. There are no read or write timeouts: a
/// peer that stops answering blocks the caller.
pub struct Transport<C: Connector = PipeConnector> {
    connector: C,
    pacing_tick: Duration,
    state: Mutex<State<C::Pipe>>,
}

struct State<P> {
    pipe: Option<P>,
    /// Completion time of the last successful exchange
    last_exchange: Option<Instant>,
}

impl Transport<PipeConnector> {
    /// Transport to the default Soundpad pipe
    pub fn new() -> Self {
        Self::with_connector(PipeConnector::default())
    }
}

impl Default for Transport<PipeConnector> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: Connector> Transport<C> {
    pub fn with_connector(connector: C) -> Self {
        Self {
            connector,
            pacing_tick: DEFAULT_PACING_TICK,
            state: Mutex::new(State {
                pipe: None,
                last_exchange: None,
            }),
        }
    }

    /// Override the pacing tick
    pub fn with_pacing_tick(mut self, tick: Duration) -> Self {
        self.pacing_tick = tick;
        self
    }

    pub fn connector(&self) -> &C {
        &self.connector
    }

    pub fn pacing_tick(&self) -> Duration {
        self.pacing_tick
    }

    /// Whether a connection is currently open
    pub fn is_connected(&self) -> bool {
        self.lock().pipe.is_some()
    }

    /// Open the connection if it is not open yet
    pub fn ensure_connected(&self) -> Result<()> {
        let mut state = self.lock();
        self.connect_if_needed(&mut state).map(|_| ())
    }

    /// Send a command and return the raw response text
    ///
    /// Any failure drops the connection before the error is returned.
    pub fn send_request(&self, command: &str) -> Result<String> {
        let mut state = self.lock();

        let result = self.exchange(&mut state, command);
        match &result {
            Ok(response) => {
                state.last_exchange = Some(Instant::now());
                tracing::trace!(command, response = %response, "Exchange complete");
            }
            Err(e) => {
                if state.pipe.take().is_some() {
                    tracing::debug!(command, error = %e, "Exchange failed, connection dropped");
                } else {
                    tracing::debug!(command, error = %e, "Exchange failed");
                }
            }
        }
        result
    }

    /// Like [`send_request`](Self::send_request), but every failure becomes
    /// an empty response
    pub fn send_request_or_empty(&self, command: &str) -> String {
        self.send_request(command).unwrap_or_default()
    }

    /// Send a command and classify the response
    pub fn request(&self, command: &str) -> Result<Reply> {
        self.send_request(command).map(|r| Reply::classify(&r))
    }

    /// Close the connection if open
    pub fn close(&self) {
        if self.lock().pipe.take().is_some() {
            tracing::debug!(endpoint = %self.connector.endpoint(), "Connection closed");
        }
    }

    fn lock(&self) -> MutexGuard<'_, State<C::Pipe>> {
        // State is only mutated between complete steps, so a panic in
        // another caller leaves it usable
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn connect_if_needed<'s>(&self, state: &'s mut State<C::Pipe>) -> Result<&'s mut C::Pipe> {
        let pipe = match state.pipe.take() {
            Some(pipe) => pipe,
            None => {
                let endpoint = self.connector.endpoint();
                let pipe = self
                    .connector
                    .connect()
                    .map_err(|e| Error::connect_failed(&endpoint, e))?;
                tracing::debug!(endpoint = %endpoint, "Connected to Soundpad");
                pipe
            }
        };
        Ok(state.pipe.insert(pipe))
    }

    fn exchange(&self, state: &mut State<C::Pipe>, command: &str) -> Result<String> {
        let last_exchange = state.last_exchange;
        let pipe = self.connect_if_needed(state)?;

        if needs_pause(last_exchange, Instant::now(), self.pacing_tick) {
            // Two writes inside the same tick can break the peer's framing
            std::thread::sleep(self.pacing_tick);
        }

        write_request(pipe, command).map_err(Error::Transport)?;
        let bytes = read_response(pipe).map_err(Error::Transport)?;

        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }
}

/// Whether an exchange starting at `now` lands in the same tick as the last one
pub fn needs_pause(last_exchange: Option<Instant>, now: Instant, tick: Duration) -> bool {
    match last_exchange {
        Some(last) => now.saturating_duration_since(last) < tick,
        None => false,
    }
}

/// Write the full command text
pub fn write_request<P: Pipe + ?Sized>(pipe: &mut P, command: &str) -> io::Result<()> {
    pipe.write_all(command.as_bytes())?;
    pipe.flush()
}

/// Read one response: a single byte, then everything the peer has queued
pub fn read_response<P: Pipe + ?Sized>(pipe: &mut P) -> io::Result<Vec<u8>> {
    let mut first = [0u8; 1];
    pipe.read_exact(&mut first)?;

    let remaining = pipe.available()?;
    let mut bytes = vec![0u8; remaining + 1];
    bytes[0] = first[0];
    pipe.read_exact(&mut bytes[1..])?;

    Ok(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    /// Pipe that answers every write with a fixed response
    struct ScriptedPipe {
        response: &'static str,
        inbox: VecDeque<u8>,
        fail_write: bool,
    }

    impl Pipe for ScriptedPipe {
        fn available(&mut self) -> io::Result<usize> {
            Ok(self.inbox.len())
        }
    }

    impl Read for ScriptedPipe {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            let n = buf.len().min(self.inbox.len());
            for (slot, byte) in buf.iter_mut().zip(self.inbox.drain(..n)) {
                *slot = byte;
            }
            Ok(n)
        }
    }

    impl Write for ScriptedPipe {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            if self.fail_write {
                return Err(io::ErrorKind::BrokenPipe.into());
            }
            self.inbox.extend(self.response.as_bytes());
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    struct ScriptedConnector {
        response: &'static str,
        connects: Arc<AtomicUsize>,
        fail_first_write: bool,
        refuse: bool,
    }

    impl ScriptedConnector {
        fn new(response: &'static str) -> Self {
            Self {
                response,
                connects: Arc::new(AtomicUsize::new(0)),
                fail_first_write: false,
                refuse: false,
            }
        }
    }

    impl Connector for ScriptedConnector {
        type Pipe = ScriptedPipe;

        fn connect(&self) -> io::Result<ScriptedPipe> {
            if self.refuse {
                return Err(io::ErrorKind::NotFound.into());
            }
            let n = self.connects.fetch_add(1, Ordering::SeqCst);
            Ok(ScriptedPipe {
                response: self.response,
                inbox: VecDeque::new(),
                fail_write: self.fail_first_write && n == 0,
            })
        }

        fn endpoint(&self) -> String {
            "scripted".to_string()
        }
    }

    #[test]
    fn test_connects_lazily_and_reuses_connection() {
        let connector = ScriptedConnector::new("R-200");
        let connects = connector.connects.clone();
        let transport = Transport::with_connector(connector);

        assert!(!transport.is_connected());
        assert_eq!(transport.send_request("IsAlive()").unwrap(), "R-200");
        assert_eq!(transport.send_request("IsAlive()").unwrap(), "R-200");
        assert!(transport.is_connected());
        assert_eq!(connects.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_failure_drops_connection_and_next_call_reconnects() {
        let mut connector = ScriptedConnector::new("R-200");
        connector.fail_first_write = true;
        let connects = connector.connects.clone();
        let transport = Transport::with_connector(connector);

        let err = transport.send_request("IsAlive()").unwrap_err();
        assert!(matches!(err, Error::Transport(_)));
        assert!(!transport.is_connected());

        assert_eq!(transport.send_request("IsAlive()").unwrap(), "R-200");
        assert_eq!(connects.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_non_raising_variant_collapses_to_empty() {
        let mut connector = ScriptedConnector::new("R-200");
        connector.refuse = true;
        let transport = Transport::with_connector(connector);

        assert_eq!(transport.send_request_or_empty("IsAlive()"), "");
        assert!(matches!(
            transport.send_request("IsAlive()"),
            Err(Error::PeerNotRunning { .. })
        ));
        assert!(transport.request("IsAlive()").is_err());
    }

    #[test]
    fn test_close_is_idempotent() {
        let transport = Transport::with_connector(ScriptedConnector::new("R-200"));
        transport.ensure_connected().unwrap();
        assert!(transport.is_connected());
        transport.close();
        transport.close();
        assert!(!transport.is_connected());
    }

    #[test]
    fn test_single_byte_response() {
        let transport = Transport::with_connector(ScriptedConnector::new("7"));
        assert_eq!(transport.send_request("GetVolume()").unwrap(), "7");
    }

    #[test]
    fn test_back_to_back_requests_are_paced() {
        let tick = Duration::from_millis(25);
        let transport =
            Transport::with_connector(ScriptedConnector::new("R-200")).with_pacing_tick(tick);

        transport.send_request("IsAlive()").unwrap();
        let started = Instant::now();
        transport.send_request("IsAlive()").unwrap();
        assert!(started.elapsed() >= tick);
    }

    #[test]
    fn test_needs_pause() {
        let tick = Duration::from_millis(1);
        let last = Instant::now();
        assert!(!needs_pause(None, last, tick));
        assert!(needs_pause(Some(last), last, tick));
        assert!(!needs_pause(Some(last), last + tick, tick));
        assert!(!needs_pause(Some(last), last + Duration::from_millis(5), tick));
    }
}
