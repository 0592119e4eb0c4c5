//! Duplex pipe endpoints
//!
//! Windows: Soundpad's named pipe, opened through the interprocess crate.
//! Unix: an interprocess local socket (domain socket) speaking the same
//! protocol.
//!
//! The response framing needs to know how many bytes the peer has already
//! queued, so every endpoint exposes `available()` next to Read/Write.

use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};

use crate::common::paths;

/// An open duplex byte stream to the peer
pub trait Pipe: Read + Write + Send {
    /// Number of bytes that can currently be read without blocking
    fn available(&mut self) -> io::Result<usize>;
}

/// Opens pipes to a fixed endpoint
pub trait Connector: Send + Sync {
    type Pipe: Pipe;

    /// Open a fresh connection to the endpoint
    fn connect(&self) -> io::Result<Self::Pipe>;

    /// Human readable endpoint, used in errors and logs
    fn endpoint(&self) -> String;
}

/// Connector for the platform's local pipe endpoint
#[derive(Debug, Clone)]
pub struct PipeConnector {
    path: PathBuf,
}

impl PipeConnector {
    /// Connector for a pipe name (or full endpoint path)
    pub fn new(pipe_name: &str) -> Self {
        Self {
            path: paths::endpoint(pipe_name),
        }
    }

    /// The resolved endpoint path
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Default for PipeConnector {
    fn default() -> Self {
        Self::new(paths::PIPE_NAME)
    }
}

impl Connector for PipeConnector {
    type Pipe = platform::PlatformPipe;

    fn connect(&self) -> io::Result<Self::Pipe> {
        platform::connect(&self.path)
    }

    fn endpoint(&self) -> String {
        self.path.display().to_string()
    }
}

#[cfg(windows)]
pub mod platform {
    use std::io::{self, Read, Write};
    use std::os::windows::io::{AsHandle, AsRawHandle};
    use std::path::Path;

    use interprocess::os::windows::named_pipe::{pipe_mode, DuplexPipeStream};
    use windows_sys::Win32::System::Pipes::PeekNamedPipe;

    use super::Pipe;

    /// Client end of a byte-mode named pipe
    pub struct PlatformPipe {
        stream: DuplexPipeStream<pipe_mode::Bytes>,
    }

    pub fn connect(path: &Path) -> io::Result<PlatformPipe> {
        let path = path.to_string_lossy();
        let stream = DuplexPipeStream::<pipe_mode::Bytes>::connect_by_path(path.as_ref())?;
        Ok(PlatformPipe { stream })
    }

    impl Pipe for PlatformPipe {
        fn available(&mut self) -> io::Result<usize> {
            let handle = self.stream.as_handle().as_raw_handle();
            let mut total: u32 = 0;

            // SAFETY: the handle stays open for the lifetime of `self.stream`
            // and PeekNamedPipe accepts null for every buffer it does not fill.
            let ok = unsafe {
                PeekNamedPipe(
                    handle as _,
                    std::ptr::null_mut(),
                    0,
                    std::ptr::null_mut(),
                    &mut total,
                    std::ptr::null_mut(),
                )
            };
            if ok == 0 {
                return Err(io::Error::last_os_error());
            }
            Ok(total as usize)
        }
    }

    impl Read for PlatformPipe {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            self.stream.read(buf)
        }
    }

    impl Write for PlatformPipe {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.stream.write(buf)
        }

        fn flush(&mut self) -> io::Result<()> {
            self.stream.flush()
        }
    }
}

#[cfg(unix)]
pub mod platform {
    use std::io::{self, Read, Write};
    use std::os::fd::{AsFd, AsRawFd};
    use std::path::Path;

    use interprocess::local_socket::{prelude::*, GenericFilePath, Stream};

    use super::Pipe;

    /// Client end of a Unix domain socket
    pub struct PlatformPipe {
        stream: Stream,
    }

    pub fn connect(path: &Path) -> io::Result<PlatformPipe> {
        let name = path.to_fs_name::<GenericFilePath>()?;
        let stream = Stream::connect(name)?;
        Ok(PlatformPipe { stream })
    }

    impl Pipe for PlatformPipe {
        fn available(&mut self) -> io::Result<usize> {
            #[allow(unreachable_patterns)]
            let fd = match &self.stream {
                Stream::UdSocket(socket) => socket.as_fd().as_raw_fd(),
                _ => return Err(io::ErrorKind::Unsupported.into()),
            };
            let mut count: libc::c_int = 0;

            // SAFETY: FIONREAD writes a single c_int through the pointer.
            let rc = unsafe { libc::ioctl(fd, libc::FIONREAD, &mut count as *mut libc::c_int) };
            if rc < 0 {
                return Err(io::Error::last_os_error());
            }
            Ok(count.max(0) as usize)
        }
    }

    impl Read for PlatformPipe {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            self.stream.read(buf)
        }
    }

    impl Write for PlatformPipe {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.stream.write(buf)
        }

        fn flush(&mut self) -> io::Result<()> {
            self.stream.flush()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_connector_targets_soundpad_pipe() {
        let connector = PipeConnector::default();
        assert!(connector.endpoint().ends_with(paths::PIPE_NAME));
    }

    #[cfg(unix)]
    #[test]
    fn test_available_counts_queued_bytes() {
        use std::os::unix::net::UnixListener;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pipe.sock");
        let listener = UnixListener::bind(&path).unwrap();

        let connector = PipeConnector::new(path.to_str().unwrap());
        let mut pipe = connector.connect().unwrap();
        let (mut server, _) = listener.accept().unwrap();

        server.write_all(b"R-200").unwrap();

        let mut first = [0u8; 1];
        pipe.read_exact(&mut first).unwrap();
        assert_eq!(&first, b"R");
        assert_eq!(pipe.available().unwrap(), 4);
    }

    #[cfg(unix)]
    #[test]
    fn test_connect_to_missing_endpoint_fails() {
        let dir = tempfile::tempdir().unwrap();
        let connector = PipeConnector::new(dir.path().join("absent").to_str().unwrap());
        let err = connector.connect().err().unwrap();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
    }
}
