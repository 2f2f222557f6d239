//! Test utilities for catalogue sources.
//!
//! [`CannedHttpServer`] answers exactly one HTTP request on a loopback port
//! with a fixed status and body, so [`super::HttpCatalogSource`] can be
//! exercised without network access.

use std::io::{self, BufRead, BufReader, Write};
use std::net::{TcpListener, TcpStream};
use std::thread::{self, JoinHandle};
use std::time::Duration;

const LOOPBACK: &str = "127.0.0.1:0";

/// How the server treats the single request it accepts.
#[derive(Debug, Clone)]
enum Reply {
    Respond { status: u16, body: String },
    Stall(Duration),
}

/// One-shot HTTP server bound to `127.0.0.1` on an ephemeral port.
///
/// # Example
///
/// ```
/// use breedbook_core::{CatalogSource, Limit};
/// use breedbook_data::catalog::HttpCatalogSource;
/// use breedbook_data::catalog::test_support::CannedHttpServer;
///
/// let server = CannedHttpServer::respond(200, r#"{"data": []}"#)?;
/// let source = HttpCatalogSource::new(server.base_url())?;
/// assert!(source.fetch_page(Limit::new(3))?.data.is_empty());
/// assert!(server.into_request()?.starts_with("GET /breeds?limit=3 "));
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug)]
pub struct CannedHttpServer {
    base_url: String,
    handle: Option<JoinHandle<io::Result<String>>>,
}

impl CannedHttpServer {
    /// Answer the next request with `status` and a JSON `body`.
    ///
    /// # Errors
    ///
    /// Returns an error if no loopback port can be bound.
    pub fn respond(status: u16, body: impl Into<String>) -> io::Result<Self> {
        Self::spawn(Reply::Respond {
            status,
            body: body.into(),
        })
    }

    /// Read the next request and then hold the connection open for `delay`
    /// without answering.
    ///
    /// # Errors
    ///
    /// Returns an error if no loopback port can be bound.
    pub fn stall(delay: Duration) -> io::Result<Self> {
        Self::spawn(Reply::Stall(delay))
    }

    /// Base URL of a loopback port with nothing listening on it.
    ///
    /// # Errors
    ///
    /// Returns an error if no loopback port can be bound.
    pub fn unused_base_url() -> io::Result<String> {
        let port = TcpListener::bind(LOOPBACK)?.local_addr()?.port();
        Ok(format!("http://127.0.0.1:{port}"))
    }

    /// Base URL clients should target.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Wait for the request to be served and return its request line.
    ///
    /// Returns an empty line when no request arrived.
    ///
    /// # Errors
    ///
    /// Returns an error if the reply could not be written or the server
    /// thread panicked.
    pub fn into_request(mut self) -> io::Result<String> {
        match self.handle.take() {
            Some(handle) => handle
                .join()
                .map_err(|_| io::Error::other("canned server thread panicked"))?,
            None => Ok(String::new()),
        }
    }

    fn spawn(reply: Reply) -> io::Result<Self> {
        let listener = TcpListener::bind(LOOPBACK)?;
        let port = listener.local_addr()?.port();
        let handle = thread::spawn(move || match listener.accept() {
            Ok((stream, _)) => serve(stream, &reply),
            Err(_) => Ok(String::new()),
        });
        Ok(Self {
            base_url: format!("http://127.0.0.1:{port}"),
            handle: Some(handle),
        })
    }
}

fn serve(stream: TcpStream, reply: &Reply) -> io::Result<String> {
    let mut reader = BufReader::new(stream);
    let mut request_line = String::new();
    reader.read_line(&mut request_line)?;
    let mut header = String::new();
    while reader.read_line(&mut header)? > 2 {
        header.clear();
    }

    let mut stream = reader.into_inner();
    match reply {
        Reply::Respond { status, body } => {
            let response = format!(
                "HTTP/1.1 {status} Canned\r\ncontent-type: application/json\r\n\
                 content-length: {}\r\nconnection: close\r\n\r\n{body}",
                body.len()
            );
            stream.write_all(response.as_bytes())?;
            stream.flush()?;
        }
        Reply::Stall(delay) => thread::sleep(*delay),
    }
    Ok(request_line)
}
