//! Stub HTTP server for wire-level driver tests.
//!
//! Accepts one request per connection, records what the driver sent and
//! replays a canned response from a queue. Responses default to an rpc
//! success with a null result when the queue is empty.

#![allow(dead_code)]

use std::collections::{HashMap, VecDeque};
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use serde_json::Value;
use surreal_client::protocol::{codec, RpcError, RpcOutcome, RpcRequest, RpcResponse};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use url::Url;

pub struct StubServer {
    addr: SocketAddr,
    state: Arc<StubState>,
}

#[derive(Default)]
struct StubState {
    requests: Mutex<Vec<RecordedRequest>>,
    responses: Mutex<VecDeque<Canned>>,
}

#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: String,
    pub path: String,
    /// Header names lowercased.
    pub headers: HashMap<String, String>,
    pub body: Vec<u8>,
    /// The body decoded as an rpc envelope, when it is one.
    pub rpc: Option<RpcRequest>,
}

impl RecordedRequest {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(&name.to_ascii_lowercase()).map(String::as_str)
    }

    pub fn envelope(&self) -> &RpcRequest {
        self.rpc.as_ref().expect("request body was not an rpc envelope")
    }
}

pub enum Canned {
    /// 200 with a CBOR `{id, result}` envelope echoing the request id.
    Result(Value),
    /// 200 with a CBOR `{id, error}` envelope echoing the request id.
    Error { code: i64, message: String },
    /// Verbatim response.
    Raw {
        status: u16,
        reason: &'static str,
        content_type: &'static str,
        body: Vec<u8>,
    },
}

impl StubServer {
    pub async fn spawn() -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let state = Arc::new(StubState::default());

        let accept_state = state.clone();
        tokio::spawn(async move {
            loop {
                let Ok((stream, _)) = listener.accept().await else {
                    break;
                };
                let state = accept_state.clone();
                tokio::spawn(handle(stream, state));
            }
        });

        StubServer { addr, state }
    }

    pub fn rpc_url(&self) -> Url {
        Url::parse(&format!("http://{}/rpc", self.addr)).unwrap()
    }

    pub fn url(&self, path: &str) -> Url {
        Url::parse(&format!("http://{}{}", self.addr, path)).unwrap()
    }

    pub fn push(&self, canned: Canned) {
        self.state.responses.lock().unwrap().push_back(canned);
    }

    pub fn push_result(&self, value: Value) {
        self.push(Canned::Result(value));
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.state.requests.lock().unwrap().clone()
    }

    pub fn last_request(&self) -> RecordedRequest {
        self.requests().pop().expect("no requests recorded")
    }
}

async fn handle(mut stream: TcpStream, state: Arc<StubState>) {
    let mut buf = Vec::new();
    let mut tmp = [0u8; 4096];

    let head_end = loop {
        match stream.read(&mut tmp).await {
            Ok(0) | Err(_) => return,
            Ok(n) => buf.extend_from_slice(&tmp[..n]),
        }
        if let Some(pos) = find(&buf, b"\r\n\r\n") {
            break pos + 4;
        }
        if buf.len() > 64 * 1024 {
            return;
        }
    };

    let head = String::from_utf8_lossy(&buf[..head_end]).into_owned();
    let mut lines = head.split("\r\n");
    let request_line = lines.next().unwrap_or("");
    let mut parts = request_line.split_whitespace();
    let method = parts.next().unwrap_or("").to_string();
    let path = parts.next().unwrap_or("").to_string();

    let mut headers = HashMap::new();
    for line in lines {
        if let Some((name, value)) = line.split_once(':') {
            headers.insert(name.trim().to_ascii_lowercase(), value.trim().to_string());
        }
    }

    let content_length = headers
        .get("content-length")
        .and_then(|v| v.parse::<usize>().ok())
        .unwrap_or(0);
    let mut body = buf[head_end..].to_vec();
    while body.len() < content_length {
        match stream.read(&mut tmp).await {
            Ok(0) | Err(_) => break,
            Ok(n) => body.extend_from_slice(&tmp[..n]),
        }
    }

    let rpc: Option<RpcRequest> = codec::decode(&body).ok();
    let request_id = rpc.as_ref().map(|r| r.id);
    state.requests.lock().unwrap().push(RecordedRequest {
        method,
        path,
        headers,
        body,
        rpc,
    });

    let canned = state
        .responses
        .lock()
        .unwrap()
        .pop_front()
        .unwrap_or(Canned::Result(Value::Null));

    let (status, reason, content_type, payload) = match canned {
        Canned::Result(value) => {
            let envelope = RpcResponse {
                id: request_id,
                outcome: RpcOutcome::Result(value),
            };
            (200, "OK", "application/cbor", codec::encode(&envelope).unwrap())
        }
        Canned::Error { code, message } => {
            let envelope = RpcResponse {
                id: request_id,
                outcome: RpcOutcome::Error(RpcError { code, message }),
            };
            (200, "OK", "application/cbor", codec::encode(&envelope).unwrap())
        }
        Canned::Raw {
            status,
            reason,
            content_type,
            body,
        } => (status, reason, content_type, body),
    };

    let head = format!(
        "HTTP/1.1 {} {}\r\nContent-Type: {}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
        status,
        reason,
        content_type,
        payload.len()
    );
    if stream.write_all(head.as_bytes()).await.is_err() {
        return;
    }
    let _ = stream.write_all(&payload).await;
    let _ = stream.shutdown().await;
}

fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack
        .windows(needle.len())
        .position(|window| window == needle)
}
