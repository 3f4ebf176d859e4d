//! A one-thread HTTP stub for crawler tests. Routes match on a
//! substring of the request target; anything else gets an empty page.

use std::{
    io::{BufRead, BufReader, Write},
    net::{SocketAddr, TcpListener, TcpStream},
    thread,
};

pub(crate) struct StubServer {
    addr: SocketAddr,
}

impl StubServer {
    pub(crate) fn serve(routes: Vec<(String, String)>) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").expect("bind stub server");
        let addr = listener.local_addr().unwrap();
        thread::spawn(move || {
            for stream in listener.incoming() {
                match stream {
                    Ok(stream) => handle(stream, &routes),
                    Err(_) => break,
                }
            }
        });
        StubServer { addr }
    }

    pub(crate) fn url(&self) -> String {
        format!("http://{}", self.addr)
    }
}

fn handle(stream: TcpStream, routes: &[(String, String)]) {
    let mut reader = BufReader::new(stream);
    let mut request_line = String::new();
    if reader.read_line(&mut request_line).is_err() {
        return;
    }
    // Drain headers so the client does not see a reset mid-request.
    loop {
        let mut line = String::new();
        match reader.read_line(&mut line) {
            Ok(_) if line.trim().is_empty() => break,
            Ok(0) | Err(_) => return,
            Ok(_) => {}
        }
    }
    let target = request_line.split_whitespace().nth(1).unwrap_or("/");
    let body = routes
        .iter()
        .find(|(pattern, _)| target.contains(pattern.as_str()))
        .map(|(_, body)| body.as_str())
        .unwrap_or("<html></html>");
    let mut stream = reader.into_inner();
    let _ = write!(
        stream,
        "HTTP/1.1 200 OK\r\nContent-Type: text/html\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
        body.len(),
        body
    );
}
