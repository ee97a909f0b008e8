use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::TcpStream;

use crate::client::ClientError;

use super::protocol;

/// One open connection, already past the handshake.
#[derive(Debug)]
pub(crate) struct Connection {
    stream: BufReader<TcpStream>,
}

impl Connection {
    pub(crate) async fn open(
        host: &str,
        port: u16,
        client_name: &str,
        queue: &str,
    ) -> Result<Self, ClientError> {
        let stream = TcpStream::connect((host, port))
            .await
            .map_err(|e| ClientError::Connect {
                address: format!("{host}:{port}"),
                message: e.to_string(),
            })?;
        stream.set_nodelay(true)?;
        let mut conn = Self {
            stream: BufReader::new(stream),
        };
        conn.send_lines(&protocol::handshake(client_name, queue))
            .await?;
        Ok(conn)
    }

    async fn send_lines(&mut self, lines: &[String]) -> Result<(), ClientError> {
        let mut buf = String::new();
        for line in lines {
            buf.push_str(line);
            buf.push('\n');
        }
        let writer = self.stream.get_mut();
        writer.write_all(buf.as_bytes()).await?;
        writer.flush().await?;
        Ok(())
    }

    async fn read_reply(&mut self) -> Result<protocol::Reply, ClientError> {
        let mut line = String::new();
        let n = self.stream.read_line(&mut line).await?;
        if n == 0 {
            return Err(ClientError::Transport(
                "connection closed by server".to_string(),
            ));
        }
        protocol::parse_reply(&line)
    }

    /// Send a request of one or more lines and wait for its single reply.
    pub(crate) async fn request(
        &mut self,
        lines: &[String],
    ) -> Result<protocol::Reply, ClientError> {
        self.send_lines(lines).await?;
        self.read_reply().await
    }
}
