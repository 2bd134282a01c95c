#![allow(dead_code)]
use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream, UdpSocket};
use tokio::task::JoinHandle;

/// How the mock nameserver answers.
#[derive(Debug, Clone, Copy, Default)]
pub struct MockBehavior {
    /// RCODE placed in every reply.
    pub rcode: u8,
    /// Set TC on UDP replies and leave out the answer.
    pub truncate_udp: bool,
    /// Flip the transaction ID in every reply.
    pub mismatch_id: bool,
    /// Never answer over UDP.
    pub drop_udp: bool,
}

#[derive(Debug, Default)]
pub struct ServerStats {
    pub udp_queries: AtomicUsize,
    pub tcp_queries: AtomicUsize,
    pub last_query: Mutex<Vec<u8>>,
}

impl ServerStats {
    pub fn udp(&self) -> usize {
        self.udp_queries.load(Ordering::SeqCst)
    }

    pub fn tcp(&self) -> usize {
        self.tcp_queries.load(Ordering::SeqCst)
    }

    pub fn last_query(&self) -> Vec<u8> {
        self.last_query.lock().unwrap().clone()
    }
}

/// Loopback nameserver answering UDP and TCP on the same port.
pub struct MockDnsServer {
    addr: SocketAddr,
    stats: Arc<ServerStats>,
    tasks: Vec<JoinHandle<()>>,
}

impl MockDnsServer {
    pub async fn start(behavior: MockBehavior) -> Result<Self, std::io::Error> {
        let (socket, listener) = bind_pair().await?;
        let addr = socket.local_addr()?;
        let stats = Arc::new(ServerStats::default());

        let udp_stats = Arc::clone(&stats);
        let udp_task = tokio::spawn(async move {
            let mut buf = vec![0u8; 4096];
            loop {
                let Ok((len, peer)) = socket.recv_from(&mut buf).await else {
                    continue;
                };
                udp_stats.udp_queries.fetch_add(1, Ordering::SeqCst);
                *udp_stats.last_query.lock().unwrap() = buf[..len].to_vec();
                if behavior.drop_udp {
                    continue;
                }
                let response = build_mock_response(&buf[..len], behavior, true);
                let _ = socket.send_to(&response, peer).await;
            }
        });

        let tcp_stats = Arc::clone(&stats);
        let tcp_task = tokio::spawn(async move {
            loop {
                let Ok((stream, _)) = listener.accept().await else {
                    continue;
                };
                let stats = Arc::clone(&tcp_stats);
                tokio::spawn(serve_tcp(stream, behavior, stats));
            }
        });

        Ok(Self {
            addr,
            stats,
            tasks: vec![udp_task, tcp_task],
        })
    }

    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    pub fn stats(&self) -> &ServerStats {
        &self.stats
    }
}

impl Drop for MockDnsServer {
    fn drop(&mut self) {
        for task in &self.tasks {
            task.abort();
        }
    }
}

/// Binds UDP on an ephemeral port, then TCP on the same one.
async fn bind_pair() -> Result<(UdpSocket, TcpListener), std::io::Error> {
    let mut last_error = None;
    for _ in 0..20 {
        let socket = UdpSocket::bind("127.0.0.1:0").await?;
        match TcpListener::bind(socket.local_addr()?).await {
            Ok(listener) => return Ok((socket, listener)),
            Err(e) => last_error = Some(e),
        }
    }
    Err(last_error.unwrap_or_else(|| std::io::Error::other("no free port pair")))
}

async fn serve_tcp(mut stream: TcpStream, behavior: MockBehavior, stats: Arc<ServerStats>) {
    loop {
        let mut len_buf = [0u8; 2];
        if stream.read_exact(&mut len_buf).await.is_err() {
            return;
        }
        let mut query = vec![0u8; u16::from_be_bytes(len_buf) as usize];
        if stream.read_exact(&mut query).await.is_err() {
            return;
        }
        stats.tcp_queries.fetch_add(1, Ordering::SeqCst);
        *stats.last_query.lock().unwrap() = query.clone();

        let response = build_mock_response(&query, behavior, false);
        let mut framed = (response.len() as u16).to_be_bytes().to_vec();
        framed.extend_from_slice(&response);
        if stream.write_all(&framed).await.is_err() {
            return;
        }
    }
}

/// End of the first question, or the whole message if it cannot be walked.
fn question_end(query: &[u8]) -> usize {
    let mut pos = 12;
    while pos < query.len() {
        let label_len = query[pos] as usize;
        if label_len == 0 {
            return (pos + 1 + 4).min(query.len());
        }
        pos += 1 + label_len;
    }
    query.len()
}

pub fn build_mock_response(query: &[u8], behavior: MockBehavior, over_udp: bool) -> Vec<u8> {
    if query.len() < 12 {
        return vec![];
    }

    let truncated = over_udp && behavior.truncate_udp;
    let with_answer = behavior.rcode == 0 && !truncated;

    let mut id = [query[0], query[1]];
    if behavior.mismatch_id {
        id = [!id[0], !id[1]];
    }

    let mut response = Vec::with_capacity(512);
    response.extend_from_slice(&id);

    // QR=1, RD copied, TC on demand
    response.push(0x80 | (query[2] & 0x01) | if truncated { 0x02 } else { 0x00 });
    // RA=1, RCODE
    response.push(0x80 | (behavior.rcode & 0x0f));

    response.extend_from_slice(&query[4..6]);
    response.extend_from_slice(&[0x00, if with_answer { 0x01 } else { 0x00 }]);
    response.extend_from_slice(&[0x00, 0x00]);
    response.extend_from_slice(&[0x00, 0x00]);

    response.extend_from_slice(&query[12..question_end(query)]);

    if with_answer {
        response.extend_from_slice(&[
            0xc0, 0x0c, // Name pointer to question
            0x00, 0x01, // Type A
            0x00, 0x01, // Class IN
            0x00, 0x00, 0x00, 0x3c, // TTL: 60 seconds
            0x00, 0x04, // Data length: 4 bytes
            192, 0, 2, 1, // IP: 192.0.2.1
        ]);
    }

    response
}
