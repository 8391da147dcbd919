#![allow(dead_code)]

use std::{
    cell::RefCell,
    collections::{HashMap, VecDeque},
    io::{self, Cursor, Read, Write},
    net::{TcpListener, TcpStream},
    sync::{Arc, Mutex},
    thread,
};

use sweeper_driver::prelude::*;

/// In-process server answering from a script, and remembering every call.
#[derive(Default)]
pub struct ScriptedServer {
    info: String,
    ids: RefCell<VecDeque<String>>,
    replies: RefCell<VecDeque<String>>,
    calls: RefCell<Vec<String>>,
}

impl ScriptedServer {
    pub fn new(info: &str, ids: &[&str], replies: &[&str]) -> Self {
        ScriptedServer {
            info: info.to_string(),
            ids: RefCell::new(ids.iter().map(|s| s.to_string()).collect()),
            replies: RefCell::new(replies.iter().map(|s| s.to_string()).collect()),
            calls: RefCell::default(),
        }
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.borrow().clone()
    }
}

impl GameServer for ScriptedServer {
    fn address(&self) -> &str {
        "scripted"
    }

    fn fetch_info(&self) -> Result<String, DriverError> {
        self.calls.borrow_mut().push("info".to_string());
        Ok(self.info.clone())
    }

    fn create_game(&self, player: &PlayerIdentity) -> Result<String, DriverError> {
        self.calls
            .borrow_mut()
            .push(format!("new {} {}", player.name, player.version));
        Ok(self.ids.borrow_mut().pop_front().expect("no id scripted"))
    }

    fn reveal_cell(&self, session: &GameSession, target: Move) -> Result<String, DriverError> {
        self.calls
            .borrow_mut()
            .push(format!("open {} {target}", session.id()));
        Ok(self.replies.borrow_mut().pop_front().expect("no reply scripted"))
    }
}

/// Output sink readable after the channel that owned it is gone.
#[derive(Clone, Default)]
pub struct SharedSink(Arc<Mutex<Vec<u8>>>);

impl SharedSink {
    pub fn lines(&self) -> Vec<String> {
        String::from_utf8(self.0.lock().unwrap().clone())
            .unwrap()
            .lines()
            .map(str::to_string)
            .collect()
    }
}

impl Write for SharedSink {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Hands out one scripted player input per game and keeps what each game printed.
pub struct ScriptedPlayers {
    inputs: VecDeque<String>,
    pub outputs: Vec<SharedSink>,
}

impl ScriptedPlayers {
    pub fn new(inputs: &[&str]) -> Self {
        ScriptedPlayers {
            inputs: inputs.iter().map(|s| s.to_string()).collect(),
            outputs: vec![],
        }
    }
}

impl ChannelSource for ScriptedPlayers {
    fn open_channel(&mut self, _config: &Configuration) -> Result<Channel, DriverError> {
        let input = self.inputs.pop_front().expect("no player input scripted");
        let sink = SharedSink::default();
        self.outputs.push(sink.clone());
        Ok(Channel::from_parts(Cursor::new(input), sink))
    }
}

/// A request as seen by [`spawn_http_server`].
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: String,
    pub path: String,
    pub form: HashMap<String, String>,
}

/// Minimal HTTP/1.1 server on loopback, one request per connection.
///
/// Returns the `host:port` to connect to and the log of received requests.
pub fn spawn_http_server<F>(respond: F) -> (String, Arc<Mutex<Vec<RecordedRequest>>>)
where
    F: Fn(&RecordedRequest) -> String + Send + 'static,
{
    spawn_raw_http_server(move |request| respond(request).into_bytes())
}

/// Same as [`spawn_http_server`], the body is sent byte for byte.
pub fn spawn_raw_http_server<F>(respond: F) -> (String, Arc<Mutex<Vec<RecordedRequest>>>)
where
    F: Fn(&RecordedRequest) -> Vec<u8> + Send + 'static,
{
    let listener = TcpListener::bind("127.0.0.1:0").expect("could not bind test server");
    let address = listener.local_addr().unwrap().to_string();
    let log = Arc::new(Mutex::new(Vec::new()));
    let server_log = log.clone();

    thread::spawn(move || {
        for stream in listener.incoming() {
            let Ok(mut stream) = stream else {
                continue;
            };
            let Some(request) = read_request(&mut stream) else {
                continue;
            };
            let body = respond(&request);
            server_log.lock().unwrap().push(request);
            let head = format!(
                "HTTP/1.1 200 OK\r\nContent-Type: text/plain\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
                body.len()
            );
            let _ = stream.write_all(head.as_bytes());
            let _ = stream.write_all(&body);
            let _ = stream.flush();
        }
    });

    (address, log)
}

fn read_request(stream: &mut TcpStream) -> Option<RecordedRequest> {
    let mut data = Vec::new();
    let mut buf = [0; 4096];
    let header_end = loop {
        let n = stream.read(&mut buf).ok()?;
        if n == 0 {
            return None;
        }
        data.extend_from_slice(&buf[..n]);
        if let Some(pos) = data.windows(4).position(|w| w == b"\r\n\r\n") {
            break pos + 4;
        }
    };

    let head = String::from_utf8_lossy(&data[..header_end]).to_string();
    let mut lines = head.lines();
    let mut request_line = lines.next()?.split_whitespace();
    let method = request_line.next()?.to_string();
    let path = request_line.next()?.to_string();
    let content_length = lines
        .filter_map(|line| line.split_once(':'))
        .find(|(name, _)| name.trim().eq_ignore_ascii_case("content-length"))
        .and_then(|(_, value)| value.trim().parse::<usize>().ok())
        .unwrap_or(0);

    while data.len() < header_end + content_length {
        let n = stream.read(&mut buf).ok()?;
        if n == 0 {
            break;
        }
        data.extend_from_slice(&buf[..n]);
    }

    let body = String::from_utf8_lossy(&data[header_end..]).to_string();
    let form = body
        .split('&')
        .filter_map(|pair| pair.split_once('='))
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();

    Some(RecordedRequest { method, path, form })
}

/// Agent command running a shell script.
pub fn sh_agent(script: &str) -> AgentCommand {
    AgentCommand::new("sh", vec!["-c".to_string(), script.to_string()])
}
