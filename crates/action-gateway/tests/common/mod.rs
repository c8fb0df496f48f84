//! WebSocket test client speaking the gateway frame protocol

#![allow(dead_code)]

use anyhow::{Result, anyhow};
use async_net::TcpStream;
use async_tungstenite::{WebSocketStream, client_async};
use futures::{SinkExt, StreamExt};
use serde_json::Value;
use std::net::SocketAddr;
use std::time::Duration;
use tungstenite::Message;

use action_gateway::Frame;

/// Raw WebSocket client for driving a gateway in tests
pub struct TestSocket {
    ws: WebSocketStream<TcpStream>,
}

impl TestSocket {
    /// Connect to a gateway listening on `addr`.
    pub async fn connect(addr: SocketAddr) -> Result<Self> {
        let url = format!("ws://{}", addr);
        let stream = TcpStream::connect(addr).await?;
        let (ws, _) = client_async(&url, stream).await?;
        Ok(Self { ws })
    }

    /// Local address of the underlying TCP stream, as the gateway sees it.
    pub fn local_addr(&self) -> Result<SocketAddr> {
        Ok(self.ws.get_ref().local_addr()?)
    }

    /// Send an `event` frame.
    pub async fn send_event(
        &mut self,
        namespace: &str,
        event: &str,
        params: Vec<Value>,
        ack: Option<u64>,
    ) -> Result<()> {
        self.send_frame(&Frame::Event {
            namespace: namespace.to_string(),
            event: event.to_string(),
            params,
            ack,
        })
        .await
    }

    /// Send any frame.
    pub async fn send_frame(&mut self, frame: &Frame) -> Result<()> {
        let json = serde_json::to_string(frame)?;
        self.ws.send(Message::Text(json.into())).await?;
        Ok(())
    }

    /// Send a raw text payload, bypassing frame serialization.
    pub async fn send_raw(&mut self, text: &str) -> Result<()> {
        self.ws.send(Message::Text(text.to_string().into())).await?;
        Ok(())
    }

    /// Receive the next frame, giving up after two seconds.
    pub async fn recv(&mut self) -> Result<Frame> {
        let inbound = async {
            loop {
                match self.ws.next().await {
                    Some(Ok(Message::Text(text))) => return Ok(serde_json::from_str(&text)?),
                    Some(Ok(_)) => continue,
                    Some(Err(e)) => return Err(e.into()),
                    None => return Err(anyhow!("Connection closed")),
                }
            }
        };
        let deadline = async {
            smol::Timer::after(Duration::from_secs(2)).await;
            Err(anyhow!("Timed out waiting for a frame"))
        };
        smol::future::race(inbound, deadline).await
    }

    /// Succeed only if no frame arrives within `window`.
    pub async fn expect_silence(&mut self, window: Duration) -> Result<()> {
        let inbound = async {
            match self.ws.next().await {
                Some(Ok(Message::Text(text))) => Err(anyhow!("Unexpected frame: {}", text)),
                Some(Ok(_)) => Ok(()),
                Some(Err(e)) => Err(e.into()),
                None => Err(anyhow!("Connection closed")),
            }
        };
        let deadline = async {
            smol::Timer::after(window).await;
            Ok(())
        };
        smol::future::race(inbound, deadline).await
    }

    /// Close the connection.
    pub async fn close(mut self) -> Result<()> {
        self.ws.close(None).await?;
        Ok(())
    }
}
