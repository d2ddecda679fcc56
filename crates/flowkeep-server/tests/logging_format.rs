// SPDX-License-Identifier: Apache-2.0

use std::io;
use std::sync::{Arc, Mutex};

use flowkeep_core::SequentialIdGenerator;
use flowkeep_fontcheck::{
    FontCharCache, FontValidator, FsCharLists, MissingFilePolicy, SUPPORTED_LIST_FILE,
};
use flowkeep_server::{build_router, AppState, ServerConfig};
use flowkeep_store::{MemorySheetBackend, SheetsGateway};
use serde_json::Value;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tracing::Level;
use tracing_subscriber::fmt::MakeWriter;

/// Collects every formatted log line written by the subscriber.
#[derive(Clone, Default)]
struct LogSink(Arc<Mutex<Vec<u8>>>);

impl LogSink {
    fn lines(&self) -> Vec<Value> {
        let bytes = self.0.lock().expect("log sink").clone();
        String::from_utf8(bytes)
            .expect("utf8 logs")
            .lines()
            .filter(|l| !l.trim().is_empty())
            .map(|l| serde_json::from_str(l).expect("json log line"))
            .collect()
    }
}

impl io::Write for LogSink {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0
            .lock()
            .map_err(|_| io::Error::new(io::ErrorKind::Other, "log sink poisoned"))?
            .extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for LogSink {
    type Writer = LogSink;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}

fn message(line: &Value) -> Option<&str> {
    line.pointer("/fields/message").and_then(Value::as_str)
}

// Current-thread runtime: the thread-local subscriber also covers the spawned server task.
#[tokio::test]
async fn validate_font_logs_inside_the_request_span() {
    let sink = LogSink::default();
    let subscriber = tracing_subscriber::fmt()
        .json()
        .with_writer(sink.clone())
        .with_max_level(Level::INFO)
        .finish();
    let _guard = tracing::subscriber::set_default(subscriber);

    let dir = tempfile::tempdir().expect("tempdir");
    std::fs::write(dir.path().join(SUPPORTED_LIST_FILE), "abc").expect("supported list");
    let lists = FsCharLists::in_dir(dir.path(), MissingFilePolicy::Fallback);
    let gateway = SheetsGateway::new(
        Arc::new(MemorySheetBackend::new()),
        Arc::new(SequentialIdGenerator::new("id")),
        None,
    );
    let validator = FontValidator::new(Arc::new(FontCharCache::new(Arc::new(lists))));
    let state = AppState::new(Arc::new(gateway), validator, ServerConfig::default());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind listener");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move {
        axum::serve(listener, build_router(state))
            .await
            .expect("serve");
    });

    let body = r#"{"text":"a好"}"#;
    let request = format!(
        "POST /api/validate-font HTTP/1.1\r\nHost: {addr}\r\nConnection: close\r\n\
         x-request-id: trace-7f3a\r\nContent-Type: application/json\r\n\
         Content-Length: {}\r\n\r\n{body}",
        body.len()
    );
    let mut stream = tokio::net::TcpStream::connect(addr).await.expect("connect");
    stream.write_all(request.as_bytes()).await.expect("send");
    let mut raw = Vec::new();
    stream.read_to_end(&mut raw).await.expect("read reply");
    let reply = String::from_utf8(raw).expect("utf8 reply");
    assert!(reply.starts_with("HTTP/1.1 200"), "{reply}");
    assert!(reply.to_ascii_lowercase().contains("x-request-id: trace-7f3a"));

    let lines = sink.lines();
    let validated = lines
        .iter()
        .find(|l| message(l) == Some("font validated"))
        .expect("font validated event");
    assert_eq!(validated["level"], "INFO");
    assert_eq!(validated["fields"]["supported"], false);
    assert_eq!(validated["fields"]["unsupported"], 1);
    assert_eq!(validated["span"]["name"], "http.request");
    assert_eq!(validated["span"]["request_id"], "trace-7f3a");
    assert_eq!(validated["span"]["method"], "POST");
    assert_eq!(validated["span"]["route"], "/api/validate-font");

    let completed = lines
        .iter()
        .find(|l| message(l) == Some("request completed"))
        .expect("request completed event");
    assert_eq!(completed["fields"]["status"], 200);
    assert_eq!(completed["span"]["request_id"], "trace-7f3a");
}
