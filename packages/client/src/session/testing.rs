//! Test doubles for the session layer.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::domain::{ChannelError, MessageChannel, Subscription, SubscriptionSender};

/// Observable side effect of the session, in call order
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum ChannelCall {
    Connect,
    Subscribe(String),
    Publish(String, String),
    Disconnect,
    FetchHistory(String),
}

/// Shared view on a [`FakeChannel`] that stays with the test
#[derive(Debug, Clone, Default)]
pub(crate) struct FakeHandle {
    calls: Arc<Mutex<Vec<ChannelCall>>>,
    inbound: Arc<Mutex<Option<SubscriptionSender>>>,
}

impl FakeHandle {
    pub(crate) fn record(&self, call: ChannelCall) {
        self.calls.lock().unwrap().push(call);
    }

    pub(crate) fn snapshot(&self) -> Vec<ChannelCall> {
        self.calls.lock().unwrap().clone()
    }

    /// Published `(destination, body as JSON)` pairs
    pub(crate) fn published(&self) -> Vec<(String, serde_json::Value)> {
        self.snapshot()
            .into_iter()
            .filter_map(|call| match call {
                ChannelCall::Publish(destination, body) => {
                    Some((destination, serde_json::from_str(&body).unwrap()))
                }
                _ => None,
            })
            .collect()
    }

    /// Deliver a frame body to the active subscription
    pub(crate) fn push_frame(&self, body: &str) {
        let inbound = self.inbound.lock().unwrap();
        inbound
            .as_ref()
            .expect("no active subscription")
            .send(Ok(body.to_string()))
            .unwrap();
    }

    /// Report a transport failure on the active subscription
    pub(crate) fn fail_transport(&self, error: ChannelError) {
        let inbound = self.inbound.lock().unwrap();
        inbound
            .as_ref()
            .expect("no active subscription")
            .send(Err(error))
            .unwrap();
    }

    /// Drop the transport side of the subscription
    pub(crate) fn close(&self) {
        self.inbound.lock().unwrap().take();
    }
}

/// In-memory [`MessageChannel`] recording every call
#[derive(Debug, Default)]
pub(crate) struct FakeChannel {
    handle: FakeHandle,
    pub(crate) fail_connect: bool,
    pub(crate) hang_connect: bool,
    pub(crate) fail_subscribe: bool,
    pub(crate) fail_publish: bool,
}

impl FakeChannel {
    pub(crate) fn new() -> (Self, FakeHandle) {
        let channel = Self::default();
        let handle = channel.handle.clone();
        (channel, handle)
    }
}

#[async_trait]
impl MessageChannel for FakeChannel {
    async fn connect(&mut self) -> Result<(), ChannelError> {
        self.handle.record(ChannelCall::Connect);
        if self.hang_connect {
            std::future::pending::<()>().await;
        }
        if self.fail_connect {
            return Err(ChannelError::Connect("connection refused".to_string()));
        }
        Ok(())
    }

    async fn subscribe(&mut self, destination: &str) -> Result<Subscription, ChannelError> {
        if self.fail_subscribe {
            return Err(ChannelError::Send("subscribe rejected".to_string()));
        }
        self.handle
            .record(ChannelCall::Subscribe(destination.to_string()));
        let (subscription, sender) = Subscription::channel("sub-0", destination);
        *self.handle.inbound.lock().unwrap() = Some(sender);
        Ok(subscription)
    }

    async fn publish(&mut self, destination: &str, body: String) -> Result<(), ChannelError> {
        if self.fail_publish {
            return Err(ChannelError::Send("broken pipe".to_string()));
        }
        self.handle
            .record(ChannelCall::Publish(destination.to_string(), body));
        Ok(())
    }

    async fn disconnect(&mut self) -> Result<(), ChannelError> {
        self.handle.record(ChannelCall::Disconnect);
        self.handle.inbound.lock().unwrap().take();
        Ok(())
    }
}
