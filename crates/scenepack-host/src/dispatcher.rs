//! Routes protocol commands to the build orchestrator.

use std::sync::Arc;
use std::time::Duration;

use serde_json::Value;

use scenepack_bundler::{
    BuildOrchestrator, CompilerEngine, OrchestratorOptions, RolldownEngine, VendorMap,
};
use scenepack_config::ServiceConfig;

use crate::channel::HostChannel;
use crate::error::{ProtocolError, Result};
use crate::protocol::{Command, Reply};

/// Owns the worker's orchestrator (and with it the cache and stats) and
/// answers one command at a time.
pub struct CommandDispatcher {
    orchestrator: BuildOrchestrator,
    ready_delay: Duration,
}

impl CommandDispatcher {
    pub fn new(orchestrator: BuildOrchestrator, ready_delay: Duration) -> Self {
        Self {
            orchestrator,
            ready_delay,
        }
    }

    /// A dispatcher compiling with Rolldown, configured from `config`.
    pub fn from_config(config: &ServiceConfig) -> Result<Self> {
        Self::with_engine(config, Arc::new(RolldownEngine::new()))
    }

    pub fn with_engine(config: &ServiceConfig, engine: Arc<dyn CompilerEngine>) -> Result<Self> {
        let vendor = VendorMap::new(config.vendor.iter().map(|(k, v)| (k.as_str(), v.as_str())))?;
        let options = OrchestratorOptions {
            global_name: config.global_name.clone(),
            cache_ttl: config.cache.ttl(),
            cache_capacity: config.cache.capacity,
        };
        Ok(Self::new(
            BuildOrchestrator::new(engine, vendor, options),
            config.ready_delay(),
        ))
    }

    /// Handle a raw message payload.
    pub async fn dispatch(&mut self, payload: &str) -> Reply {
        match Command::parse(payload) {
            Ok(command) => self.execute(command).await,
            Err(err) => self.reject(err),
        }
    }

    /// Handle a message the host has already parsed.
    pub async fn dispatch_value(&mut self, payload: Value) -> Reply {
        match Command::from_value(payload) {
            Ok(command) => self.execute(command).await,
            Err(err) => self.reject(err),
        }
    }

    pub async fn execute(&mut self, command: Command) -> Reply {
        tracing::debug!(cmd = command.name(), "dispatching command");
        match command {
            Command::Build(request) => Reply::Build(Box::new(self.orchestrator.build(request).await)),
            Command::ClearCache => Reply::cache_cleared(self.orchestrator.clear_cache()),
            Command::Stats => Reply::stats(self.orchestrator.stats()),
            Command::Ping => Reply::pong(chrono::Utc::now().timestamp_millis()),
        }
    }

    fn reject(&self, err: ProtocolError) -> Reply {
        tracing::warn!(error = %err, "rejected command");
        Reply::from(err)
    }

    pub fn ready_announcement(&self) -> Reply {
        Reply::ready()
    }

    pub fn orchestrator(&self) -> &BuildOrchestrator {
        &self.orchestrator
    }

    /// Serve `channel` until the host hangs up: announce readiness after the
    /// configured delay, then reply to each message in arrival order.
    ///
    /// Only a failing channel ends the loop with an error.
    pub async fn run<C: HostChannel>(&mut self, channel: &mut C) -> std::result::Result<(), ProtocolError> {
        tokio::time::sleep(self.ready_delay).await;
        channel.send(&self.ready_announcement().to_json()).await?;
        tracing::info!(
            engine = self.orchestrator.engine_name(),
            vendors = self.orchestrator.vendor().len(),
            "ready"
        );

        while let Some(payload) = channel.recv().await? {
            let reply = self.dispatch(&payload).await;
            channel.send(&reply.to_json()).await?;
        }

        tracing::info!("host closed the channel, shutting down");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::channel::MemoryChannel;
    use async_trait::async_trait;
    use scenepack_bundler::{CompileJob, CompileOutput};
    use serde_json::json;

    struct EchoEngine;

    #[async_trait]
    impl CompilerEngine for EchoEngine {
        fn name(&self) -> &'static str {
            "echo"
        }

        async fn compile(&self, job: CompileJob) -> anyhow::Result<CompileOutput> {
            Ok(CompileOutput {
                code: job.files.read(&job.entry).map(str::to_string),
                ..Default::default()
            })
        }
    }

    fn dispatcher() -> CommandDispatcher {
        let mut config = ServiceConfig::default();
        config.ready_delay_ms = 0;
        CommandDispatcher::with_engine(&config, Arc::new(EchoEngine)).unwrap()
    }

    fn build_payload() -> String {
        json!({
            "cmd": "build",
            "framework": "threejs",
            "entry": "/index.js",
            "files": { "/index.js": "console.log(1)" }
        })
        .to_string()
    }

    fn to_value(reply: &Reply) -> Value {
        serde_json::from_str(&reply.to_json()).unwrap()
    }

    #[tokio::test]
    async fn builds_and_reports_stats() {
        let mut dispatcher = dispatcher();

        let first = to_value(&dispatcher.dispatch(&build_payload()).await);
        assert_eq!(first["status"], "ok");
        assert_eq!(first["bundleCode"], "console.log(1)");
        assert_eq!(first["fromCache"], false);

        let second = to_value(&dispatcher.dispatch(&build_payload()).await);
        assert_eq!(second["fromCache"], true);

        let stats = to_value(&dispatcher.dispatch(r#"{"cmd":"stats"}"#).await);
        assert_eq!(stats["status"], "ok");
        assert_eq!(stats["stats"]["totalBuilds"], 2);
        assert_eq!(stats["stats"]["cacheHits"], 1);
        assert_eq!(stats["stats"]["cacheSize"], 1);
    }

    #[tokio::test]
    async fn clear_cache_forces_recompilation() {
        let mut dispatcher = dispatcher();
        dispatcher.dispatch(&build_payload()).await;

        let cleared = to_value(&dispatcher.dispatch(r#"{"cmd":"clear-cache"}"#).await);
        assert_eq!(cleared["message"], "Build cache cleared");
        assert_eq!(cleared["cleared"], 1);

        let rebuilt = to_value(&dispatcher.dispatch(&build_payload()).await);
        assert_eq!(rebuilt["fromCache"], false);
    }

    #[tokio::test]
    async fn bad_messages_get_error_replies() {
        let mut dispatcher = dispatcher();

        let reply = dispatcher.dispatch("{oops").await;
        assert!(reply.is_error());
        assert!(to_value(&reply)["message"].as_str().unwrap().starts_with("Malformed command"));

        let reply = to_value(&dispatcher.dispatch_value(json!({"cmd": "explode"})).await);
        assert_eq!(reply, json!({"status": "error", "message": "Unknown command: explode"}));

        // Still serving afterwards.
        let pong = to_value(&dispatcher.dispatch(r#"{"cmd":"ping"}"#).await);
        assert_eq!(pong["message"], "pong");
        assert!(pong["timestamp"].as_i64().unwrap() > 0);
    }

    #[tokio::test]
    async fn run_announces_ready_then_replies_in_order() {
        let mut dispatcher = dispatcher();
        let (mut channel, mut host) = MemoryChannel::pair();

        host.to_service.send(r#"{"cmd":"ping"}"#.into()).unwrap();
        host.to_service.send("garbage".into()).unwrap();
        host.to_service.send(build_payload()).unwrap();
        drop(host.to_service);

        dispatcher.run(&mut channel).await.unwrap();
        drop(channel);

        let mut replies = Vec::new();
        while let Some(message) = host.from_service.recv().await {
            replies.push(serde_json::from_str::<Value>(&message).unwrap());
        }

        assert_eq!(replies.len(), 4);
        assert_eq!(replies[0]["event"], "ready");
        assert_eq!(replies[1]["message"], "pong");
        assert_eq!(replies[2]["status"], "error");
        assert_eq!(replies[3]["bundleCode"], "console.log(1)");
    }

    #[tokio::test(start_paused = true)]
    async fn ready_waits_for_the_configured_delay() {
        let mut config = ServiceConfig::default();
        config.ready_delay_ms = 250;
        let mut dispatcher = CommandDispatcher::with_engine(&config, Arc::new(EchoEngine)).unwrap();
        let (mut channel, mut host) = MemoryChannel::pair();

        let started = tokio::time::Instant::now();
        let service = tokio::spawn(async move { dispatcher.run(&mut channel).await });

        let ready = host.from_service.recv().await.unwrap();
        assert!(ready.contains("\"event\":\"ready\""));
        assert!(started.elapsed() >= Duration::from_millis(250));

        drop(host);
        service.await.unwrap().unwrap();
    }
}
