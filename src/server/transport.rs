use async_trait::async_trait;
use tracing::debug;
use zeromq::{RepSocket, Socket, SocketRecv, SocketSend, ZmqError, ZmqMessage};

/// Binds request/reply endpoints.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn bind(&self, endpoint: &str) -> Result<Box<dyn ReplyEndpoint>, ZmqError>;
}

/// A bound endpoint on which every received request is answered before the next one is received.
#[async_trait]
pub trait ReplyEndpoint: Send {
    /// The bound address, with the port resolved.
    fn endpoint(&self) -> &str;

    /// Waits for the next request and returns its frames concatenated, byte for byte.
    async fn recv(&mut self) -> Result<Vec<u8>, ZmqError>;

    async fn send(&mut self, reply: &str) -> Result<(), ZmqError>;

    /// Releases the bound address so it can be bound again.
    async fn close(&mut self);
}

/// ZeroMQ REP sockets, wire-compatible with REQ senders.
#[derive(Debug, Default)]
pub struct ZmqTransport;

#[async_trait]
impl Transport for ZmqTransport {
    async fn bind(&self, endpoint: &str) -> Result<Box<dyn ReplyEndpoint>, ZmqError> {
        let mut socket = RepSocket::new();
        let bound = socket.bind(endpoint).await?;

        Ok(Box::new(ZmqEndpoint {
            socket,
            endpoint: bound.to_string(),
        }))
    }
}

struct ZmqEndpoint {
    socket: RepSocket,
    endpoint: String,
}

#[async_trait]
impl ReplyEndpoint for ZmqEndpoint {
    fn endpoint(&self) -> &str {
        &self.endpoint
    }

    async fn recv(&mut self) -> Result<Vec<u8>, ZmqError> {
        let message = self.socket.recv().await?;
        Ok(message.into_vec().concat())
    }

    async fn send(&mut self, reply: &str) -> Result<(), ZmqError> {
        self.socket.send(ZmqMessage::from(reply)).await
    }

    async fn close(&mut self) {
        for e in self.socket.unbind_all().await {
            debug!("Error while closing '{}': {}", self.endpoint, e);
        }
    }
}
