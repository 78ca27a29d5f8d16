// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Device client: one identity, one state store, both channels.
//!
//! [`DeviceClient`] owns the store and hands it by reference to the push
//! channel and to every pull-path update. Pull snapshots and optimistic HTTP
//! advances go through the store's monotonic guard; push events do not.

use std::sync::Arc;

use qt_core::{DeviceIdentity, PullOutcome, QueueSnapshot, StateStore};
use tracing::{info, warn};

use crate::config::{Config, FALLBACK_ESTABLISHMENT};
use crate::error::{Error, Result};
use crate::pull::PullClient;
use crate::push::{ConnectionState, PushChannel, Transport, WebSocketTransport};

/// Picks the establishment to follow.
///
/// A configured id wins. Otherwise the first establishment the service lists
/// is adopted, and when that fails or is empty, [`FALLBACK_ESTABLISHMENT`].
pub async fn discover_establishment(pull: &PullClient, configured: Option<&str>) -> String {
    if let Some(id) = configured {
        return id.to_string();
    }
    match pull.establishments().await {
        Ok(list) => match list.into_iter().next() {
            Some(first) => {
                info!(establishment_id = %first.id, name = %first.name, "found establishment");
                first.id
            }
            None => {
                warn!("service lists no establishments, using {FALLBACK_ESTABLISHMENT}");
                FALLBACK_ESTABLISHMENT.to_string()
            }
        },
        Err(e) => {
            warn!(error = %e, "establishment discovery failed, using {FALLBACK_ESTABLISHMENT}");
            FALLBACK_ESTABLISHMENT.to_string()
        }
    }
}

/// Snapshot of the device's connection details.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionInfo {
    pub device_name: String,
    pub device_id: String,
    pub establishment_id: String,
    pub api_url: String,
    pub push_url: String,
    pub push_state: ConnectionState,
    pub connected: bool,
    pub current_serving: u64,
}

/// A queue device talking to one establishment.
pub struct DeviceClient<T: Transport + 'static = WebSocketTransport> {
    identity: Arc<DeviceIdentity>,
    device_type: String,
    store: Arc<StateStore>,
    pull: PullClient,
    push: PushChannel<T>,
}

impl DeviceClient<WebSocketTransport> {
    /// Builds a device that connects over WebSocket.
    pub fn new(config: &Config, identity: DeviceIdentity) -> Result<Self> {
        Self::with_connector(config, identity, WebSocketTransport::new)
    }
}

impl<T: Transport + 'static> DeviceClient<T> {
    /// Builds a device with a custom push transport factory.
    pub fn with_connector<F>(config: &Config, identity: DeviceIdentity, connector: F) -> Result<Self>
    where
        F: Fn() -> T + Send + Sync + 'static,
    {
        let pull = PullClient::new(&config.pull_config())?;
        let identity = Arc::new(identity);
        let store = Arc::new(StateStore::new(identity.establishment_id()));
        let push = PushChannel::with_connector(
            config.push_config(),
            Arc::clone(&identity),
            Arc::clone(&store),
            connector,
        );
        Ok(DeviceClient {
            identity,
            device_type: config.device_type.clone(),
            store,
            pull,
            push,
        })
    }

    pub fn identity(&self) -> &DeviceIdentity {
        &self.identity
    }

    pub fn store(&self) -> &Arc<StateStore> {
        &self.store
    }

    pub fn pull(&self) -> &PullClient {
        &self.pull
    }

    pub fn push(&self) -> &PushChannel<T> {
        &self.push
    }

    /// Fetches the queue and offers it to the store.
    ///
    /// Returns the fetched snapshot and whether the store took it.
    pub async fn refresh_queue(&self) -> Result<(QueueSnapshot, PullOutcome)> {
        let snapshot = self.pull.queue(self.identity.establishment_id()).await?;
        let outcome = self.store.apply_pull_snapshot(snapshot.clone());
        if let PullOutcome::Stale { stored, offered } = outcome {
            info!(stored, offered, "ignored stale queue snapshot");
        }
        Ok((snapshot, outcome))
    }

    /// Registers this device with the service.
    pub async fn register(&self) -> Result<()> {
        self.pull
            .register_device(&self.identity, &self.device_type)
            .await
            .map_err(Error::Registration)?;
        info!(device_id = self.identity.device_id(), "device registered");
        Ok(())
    }

    /// The number an advance without an explicit target moves to.
    pub fn next_serving_number(&self) -> u64 {
        self.store.current_serving().saturating_add(1)
    }

    /// Advances the queue over HTTP.
    ///
    /// On success the store is updated at once, through the monotonic guard;
    /// a later push event still wins.
    pub async fn advance_http(&self, target: Option<u64>) -> Result<(u64, PullOutcome)> {
        let target = target.unwrap_or_else(|| self.next_serving_number());
        self.pull
            .advance_queue(self.identity.establishment_id(), target)
            .await?;
        let outcome = self.store.apply_optimistic_advance(target);
        info!(new_serving_number = target, ?outcome, "queue advanced via pull");
        Ok((target, outcome))
    }

    /// Asks the service to advance over the push channel.
    ///
    /// The store changes only when the service's event arrives.
    pub async fn advance_push(&self, target: Option<u64>) -> Result<u64> {
        let target = target.unwrap_or_else(|| self.next_serving_number());
        self.push.advance_queue(target).await?;
        info!(new_serving_number = target, "queue advance requested via push");
        Ok(target)
    }

    pub async fn connect(&self) -> Result<()> {
        self.push.connect().await?;
        Ok(())
    }

    pub async fn close(&self) {
        self.push.close().await;
    }

    pub fn info(&self) -> ConnectionInfo {
        let view = self.store.view();
        ConnectionInfo {
            device_name: self.identity.device_name().to_string(),
            device_id: self.identity.device_id().to_string(),
            establishment_id: self.identity.establishment_id().to_string(),
            api_url: self.pull.base_url().to_string(),
            push_url: self.push.config().url.clone(),
            push_state: self.push.state(),
            connected: view.connected,
            current_serving: view.snapshot.current_serving,
        }
    }
}

#[cfg(test)]
#[path = "device_tests.rs"]
mod tests;
