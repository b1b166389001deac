//! RPC Method Handlers
//!
//! Bridges JSON-RPC methods to the queue engine and registry service.

use crate::error::to_rpc_error;
use crate::types::{
    CounterResult, CreateCounterParams, CreateServiceParams, IssueTokenParams, NextPersonParams,
    NextPersonResult, RegisterUserParams, ServiceResult, TokenResult, UpdateLocationParams,
    UserResult,
};
use jsonrpsee::types::ErrorObjectOwned;
use spotqueue_core::application::registry::{
    CreateCounterRequest, CreateServiceRequest, RegisterUserRequest,
};
use spotqueue_core::application::{
    IssueTokenRequest, QueueEngine, RegistryService, UpdateLocationRequest,
};
use std::sync::Arc;

/// RPC Handler with injected services
pub struct RpcHandler {
    engine: Arc<QueueEngine>,
    registry: Arc<RegistryService>,
}

impl RpcHandler {
    pub fn new(engine: Arc<QueueEngine>, registry: Arc<RegistryService>) -> Self {
        Self { engine, registry }
    }

    /// queue.issueToken.v1
    pub async fn issue_token(
        &self,
        params: IssueTokenParams,
    ) -> Result<TokenResult, ErrorObjectOwned> {
        let token = self
            .engine
            .issue_token(IssueTokenRequest {
                email: params.email,
                service_name: params.service_name,
                latitude: params.latitude,
                longitude: params.longitude,
            })
            .await
            .map_err(to_rpc_error)?;

        Ok(TokenResult::from_token(
            token,
            "Token generated successfully",
        ))
    }

    /// queue.updateLocation.v1
    pub async fn update_location(
        &self,
        params: UpdateLocationParams,
    ) -> Result<TokenResult, ErrorObjectOwned> {
        let token = self
            .engine
            .update_location(UpdateLocationRequest {
                user_id: params.user_id,
                latitude: params.latitude,
                longitude: params.longitude,
            })
            .await
            .map_err(to_rpc_error)?;

        Ok(TokenResult::from_token(token, "ETA updated successfully"))
    }

    /// counter.nextPerson.v1
    pub async fn next_person(
        &self,
        params: NextPersonParams,
    ) -> Result<NextPersonResult, ErrorObjectOwned> {
        let outcome = self
            .engine
            .complete_and_advance(params.user_id)
            .await
            .map_err(to_rpc_error)?;

        Ok(NextPersonResult {
            serving: outcome.serving,
            message: outcome.message,
        })
    }

    /// user.register.v1
    pub async fn register_user(
        &self,
        params: RegisterUserParams,
    ) -> Result<UserResult, ErrorObjectOwned> {
        let user = self
            .registry
            .register_user(RegisterUserRequest {
                name: params.name,
                email: params.email,
            })
            .await
            .map_err(to_rpc_error)?;

        Ok(user.into())
    }

    /// service.create.v1
    pub async fn create_service(
        &self,
        params: CreateServiceParams,
    ) -> Result<ServiceResult, ErrorObjectOwned> {
        let service = self
            .registry
            .create_service(CreateServiceRequest {
                service_name: params.service_name,
                service_entry_time: params.service_entry_time,
                service_end_time: params.service_end_time,
                number_of_counters: params.number_of_counters,
            })
            .await
            .map_err(to_rpc_error)?;

        Ok(service.into())
    }

    /// counter.create.v1
    pub async fn create_counter(
        &self,
        params: CreateCounterParams,
    ) -> Result<CounterResult, ErrorObjectOwned> {
        let counter = self
            .registry
            .create_counter(CreateCounterRequest {
                counter_number: params.counter_number,
                service_name: params.service_name,
            })
            .await
            .map_err(to_rpc_error)?;

        Ok(counter.into())
    }

    /// user.list.v1
    pub async fn list_users(&self) -> Result<Vec<UserResult>, ErrorObjectOwned> {
        let users = self.registry.list_users().await.map_err(to_rpc_error)?;
        Ok(users.into_iter().map(Into::into).collect())
    }

    /// service.list.v1
    pub async fn list_services(&self) -> Result<Vec<ServiceResult>, ErrorObjectOwned> {
        let services = self.registry.list_services().await.map_err(to_rpc_error)?;
        Ok(services.into_iter().map(Into::into).collect())
    }

    /// counter.list.v1
    pub async fn list_counters(&self) -> Result<Vec<CounterResult>, ErrorObjectOwned> {
        let counters = self.registry.list_counters().await.map_err(to_rpc_error)?;
        Ok(counters.into_iter().map(Into::into).collect())
    }
}
