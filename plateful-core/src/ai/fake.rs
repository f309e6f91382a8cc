//! Fake vision client for testing.
//!
//! Returns a canned response (or error) without network access, and counts
//! calls so tests can assert that no request was attempted.

use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;

use super::{ImageSource, VisionClient, VisionError};

enum Behavior {
    Respond(serde_json::Value),
    Fail(String),
}

pub struct FakeVisionClient {
    behavior: Behavior,
    calls: AtomicUsize,
}

impl FakeVisionClient {
    /// A client that always returns the given structured response.
    pub fn with_response(response: serde_json::Value) -> Self {
        Self {
            behavior: Behavior::Respond(response),
            calls: AtomicUsize::new(0),
        }
    }

    /// A client whose every call fails with an upstream error.
    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            behavior: Behavior::Fail(message.into()),
            calls: AtomicUsize::new(0),
        }
    }

    /// Number of extraction calls made so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl VisionClient for FakeVisionClient {
    async fn extract(&self, _image: &ImageSource) -> Result<serde_json::Value, VisionError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.behavior {
            Behavior::Respond(value) => Ok(value.clone()),
            Behavior::Fail(message) => Err(VisionError::Upstream(message.clone())),
        }
    }

    fn model_name(&self) -> &str {
        "fake"
    }
}
