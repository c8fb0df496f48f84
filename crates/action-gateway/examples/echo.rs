//! Minimal gateway demo with an echo and a broadcast action
//!
//! Run with: cargo run --example echo
//!
//! Connect with any WebSocket client (for example `websocat
//! ws://127.0.0.1:9464`) and send frames such as:
//!
//!   {"type":"event","event":"echo","params":["hello"],"ack":1}
//!   {"type":"event","namespace":"/chat","event":"send_message","params":["alice","hi"],"ack":2}

use action_core::prelude::*;
use action_gateway::{Gateway, GatewayConfig};
use anyhow::Result;
use tracing::info;

fn main() -> Result<()> {
    smol::block_on(async { run_gateway().await })
}

async fn run_gateway() -> Result<()> {
    tracing_subscriber::fmt().with_target(false).init();

    let mut registry = ActionRegistry::new();

    // Echoes the single string argument back through the acknowledgment.
    registry.register(
        Action::builder("echo")
            .input(TupleSchema::new(vec![ElementRule::string()]))
            .output(TupleSchema::new(vec![ElementRule::string()]))
            .handler(|context| async move { Ok(context.input) }),
    )?;

    // Broadcasts a chat message to every connection and confirms receipt to
    // the sender.
    registry.register(
        Action::builder("send_message")
            .namespace("/chat")
            .input(TupleSchema::new(vec![
                ElementRule::string(),
                ElementRule::string(),
            ]))
            .output(TupleSchema::new(vec![ElementRule::boolean()]))
            .handler(|context| async move {
                context.all.emit("message", context.input.clone()).await;
                Ok(vec![json!(true)])
            }),
    )?;

    let gateway = Gateway::bind(&GatewayConfig::default(), registry).await?;
    info!("Press Ctrl+C to stop the gateway");

    loop {
        let handler = gateway.accept().await?;
        smol::spawn(handler.handle()).detach();
    }
}
