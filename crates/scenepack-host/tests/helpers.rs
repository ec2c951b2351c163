//! Shared test utilities for scenepack-host integration tests.

#![allow(dead_code)]

use std::time::Duration;

use scenepack_config::ServiceConfig;
use scenepack_host::{CommandDispatcher, MemoryChannel, MemoryHost};
use serde_json::{Value, json};
use tokio::task::JoinHandle;

/// Default config with the ready delay removed.
pub fn test_config() -> ServiceConfig {
    let mut config = ServiceConfig::default();
    config.ready_delay_ms = 0;
    config
}

/// A Rolldown-backed dispatcher serving a fresh in-memory channel.
pub fn spawn_service() -> (MemoryHost, JoinHandle<CommandDispatcher>) {
    let (mut channel, host) = MemoryChannel::pair();
    let mut dispatcher = CommandDispatcher::from_config(&test_config()).expect("valid config");
    let handle = tokio::spawn(async move {
        dispatcher.run(&mut channel).await.expect("channel stays open");
        dispatcher
    });
    (host, handle)
}

/// Send one message and wait for its reply.
pub async fn request(host: &mut MemoryHost, message: Value) -> Value {
    host.to_service
        .send(message.to_string())
        .expect("service is running");
    next_message(host).await
}

pub async fn next_message(host: &mut MemoryHost) -> Value {
    let raw = tokio::time::timeout(Duration::from_secs(30), host.from_service.recv())
        .await
        .expect("reply within timeout")
        .expect("service still connected");
    serde_json::from_str(&raw).expect("replies are JSON")
}

pub fn scene_build(code: &str) -> Value {
    json!({
        "cmd": "build",
        "framework": "threejs",
        "entry": "/index.js",
        "files": { "/index.js": code }
    })
}
