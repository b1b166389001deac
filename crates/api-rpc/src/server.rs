//! JSON-RPC Server
//!
//! Implements the JSON-RPC 2.0 server over TCP on localhost.

use crate::handler::RpcHandler;
use crate::types::{
    CreateCounterParams, CreateServiceParams, IssueTokenParams, NextPersonParams,
    RegisterUserParams, UpdateLocationParams,
};
use jsonrpsee::server::{Server, ServerHandle};
use jsonrpsee::RpcModule;
use spotqueue_core::application::{QueueEngine, RegistryService};
use std::sync::Arc;
use tracing::info;

const DEFAULT_RPC_HOST: &str = "127.0.0.1";
const DEFAULT_RPC_PORT: u16 = 9530;

/// RPC Server Configuration
pub struct RpcServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for RpcServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_RPC_HOST.to_string(),
            port: DEFAULT_RPC_PORT,
        }
    }
}

/// RPC Server
pub struct RpcServer {
    config: RpcServerConfig,
    handler: Arc<RpcHandler>,
}

impl RpcServer {
    pub fn new(
        config: RpcServerConfig,
        engine: Arc<QueueEngine>,
        registry: Arc<RegistryService>,
    ) -> Self {
        Self {
            config,
            handler: Arc::new(RpcHandler::new(engine, registry)),
        }
    }

    /// Start the JSON-RPC server
    ///
    /// Security: Only binds to 127.0.0.1 (no external access)
    pub async fn start(self) -> Result<ServerHandle, String> {
        let addr = format!("{}:{}", self.config.host, self.config.port);

        info!(
            host = %self.config.host,
            port = %self.config.port,
            "Starting JSON-RPC server on TCP (localhost only)"
        );

        let server = Server::builder()
            .build(&addr)
            .await
            .map_err(|e| format!("Failed to build server on {}: {}", addr, e))?;

        let mut module = RpcModule::new(());

        // Queue methods
        let handler = self.handler.clone();
        module
            .register_async_method("queue.issueToken.v1", move |params, _, _| {
                let handler = handler.clone();
                async move {
                    let req: IssueTokenParams = params.parse()?;
                    handler.issue_token(req).await
                }
            })
            .map_err(|e| e.to_string())?;

        let handler = self.handler.clone();
        module
            .register_async_method("queue.updateLocation.v1", move |params, _, _| {
                let handler = handler.clone();
                async move {
                    let req: UpdateLocationParams = params.parse()?;
                    handler.update_location(req).await
                }
            })
            .map_err(|e| e.to_string())?;

        let handler = self.handler.clone();
        module
            .register_async_method("counter.nextPerson.v1", move |params, _, _| {
                let handler = handler.clone();
                async move {
                    let req: NextPersonParams = params.parse()?;
                    handler.next_person(req).await
                }
            })
            .map_err(|e| e.to_string())?;

        // Registry methods
        let handler = self.handler.clone();
        module
            .register_async_method("user.register.v1", move |params, _, _| {
                let handler = handler.clone();
                async move {
                    let req: RegisterUserParams = params.parse()?;
                    handler.register_user(req).await
                }
            })
            .map_err(|e| e.to_string())?;

        let handler = self.handler.clone();
        module
            .register_async_method("user.list.v1", move |_params, _, _| {
                let handler = handler.clone();
                async move { handler.list_users().await }
            })
            .map_err(|e| e.to_string())?;

        let handler = self.handler.clone();
        module
            .register_async_method("service.create.v1", move |params, _, _| {
                let handler = handler.clone();
                async move {
                    let req: CreateServiceParams = params.parse()?;
                    handler.create_service(req).await
                }
            })
            .map_err(|e| e.to_string())?;

        let handler = self.handler.clone();
        module
            .register_async_method("service.list.v1", move |_params, _, _| {
                let handler = handler.clone();
                async move { handler.list_services().await }
            })
            .map_err(|e| e.to_string())?;

        let handler = self.handler.clone();
        module
            .register_async_method("counter.create.v1", move |params, _, _| {
                let handler = handler.clone();
                async move {
                    let req: CreateCounterParams = params.parse()?;
                    handler.create_counter(req).await
                }
            })
            .map_err(|e| e.to_string())?;

        let handler = self.handler.clone();
        module
            .register_async_method("counter.list.v1", move |_params, _, _| {
                let handler = handler.clone();
                async move { handler.list_counters().await }
            })
            .map_err(|e| e.to_string())?;

        info!("JSON-RPC server started successfully");

        let handle = server.start(module);
        Ok(handle)
    }
}
