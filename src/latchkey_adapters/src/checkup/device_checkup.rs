use std::sync::Arc;

use async_trait::async_trait;
use latchkey_core::{CheckupError, CheckupFactory, CheckupTask, DeviceId, EngineContext, Identity};
use tokio::sync::watch;

/// Builds [`DeviceCheckup`]s for this device.
#[derive(Debug, Clone)]
pub struct DeviceCheckupFactory {
    device_id: DeviceId,
}

impl DeviceCheckupFactory {
    pub fn new(device_id: DeviceId) -> Self {
        Self { device_id }
    }
}

impl CheckupFactory for DeviceCheckupFactory {
    fn name(&self) -> &'static str {
        "DeviceCheckup"
    }

    fn create(&self, identity: Option<&Identity>) -> Arc<dyn CheckupTask> {
        Arc::new(DeviceCheckup::new(self.device_id, identity.cloned()))
    }
}

/// Verifies that the logged-in identity holds an active key for this device.
pub struct DeviceCheckup {
    device_id: DeviceId,
    identity: Option<Identity>,
    cancelled: watch::Sender<bool>,
}

impl DeviceCheckup {
    pub fn new(device_id: DeviceId, identity: Option<Identity>) -> Self {
        Self {
            device_id,
            identity,
            cancelled: watch::Sender::new(false),
        }
    }

    async fn verify(&self, ctx: &EngineContext) -> Result<(), CheckupError> {
        let Some(identity) = &self.identity else {
            return Err(CheckupError::NotProvisioned("unknown user".to_string()));
        };
        match identity.active_key_for(&self.device_id) {
            Some(key) => {
                ctx.debug(&format!("device key {} is active", key.kid));
                Ok(())
            }
            None => Err(CheckupError::NotProvisioned(
                identity.username().to_string(),
            )),
        }
    }
}

#[async_trait]
impl CheckupTask for DeviceCheckup {
    async fn login_checkup(&self, ctx: &EngineContext) -> Result<(), CheckupError> {
        let mut cancelled = self.cancelled.subscribe();
        tokio::select! {
            biased;
            _ = cancelled.wait_for(|c| *c) => Err(CheckupError::Cancelled),
            result = self.verify(ctx) => result,
        }
    }

    async fn cancel(&self) -> Result<(), CheckupError> {
        tracing::debug!(device_id = %self.device_id, "cancelling device checkup");
        self.cancelled.send_replace(true);
        Ok(())
    }
}
