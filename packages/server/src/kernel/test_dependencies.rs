// TestDependencies - mock implementations for testing
//
// Provides mock services that can be injected into ServerDeps for tests.

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use super::{BaseAI, DocumentInput, ExtractionThrottle, ServerDeps, ThrottlePolicy};
use crate::config::AdvisoryFolders;
use crate::domains::advisory::models::{
    AccountHolders, Discretion, ExtractedRecord, FeeType, SignatureStatus, WrapStatus,
};
use crate::domains::advisory::{ExtractionCache, MemoryExtractionCache};

// =============================================================================
// Mock AI
// =============================================================================

/// Arguments captured from a structured-generation call
#[derive(Debug, Clone)]
pub struct MockAICall {
    pub system_prompt: String,
    pub user_prompt: String,
    /// Attached document filenames, in order
    pub documents: Vec<String>,
}

#[derive(Debug, Clone)]
enum MockReply {
    Json(String),
    Empty,
    Fail(String),
}

pub struct MockAI {
    replies: Arc<Mutex<VecDeque<MockReply>>>,
    default_reply: Option<MockReply>,
    delay: Option<Duration>,
    calls: Arc<Mutex<Vec<MockAICall>>>,
}

impl Default for MockAI {
    fn default() -> Self {
        Self::new()
    }
}

impl MockAI {
    pub fn new() -> Self {
        Self {
            replies: Arc::new(Mutex::new(VecDeque::new())),
            default_reply: None,
            delay: None,
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Queue a raw JSON response
    pub fn with_response(self, json: impl Into<String>) -> Self {
        self.replies.lock().unwrap().push_back(MockReply::Json(json.into()));
        self
    }

    /// Queue a record response (will be serialized)
    pub fn with_record(self, record: &ExtractedRecord) -> Self {
        let json = serde_json::to_string(record).expect("Failed to serialize mock record");
        self.with_response(json)
    }

    /// Queue a response with no content
    pub fn with_empty_response(self) -> Self {
        self.replies.lock().unwrap().push_back(MockReply::Empty);
        self
    }

    /// Queue a failed call
    pub fn with_failure(self, message: impl Into<String>) -> Self {
        self.replies
            .lock()
            .unwrap()
            .push_back(MockReply::Fail(message.into()));
        self
    }

    /// Answer with this record once the queue is drained
    pub fn with_default_record(mut self, record: &ExtractedRecord) -> Self {
        let json = serde_json::to_string(record).expect("Failed to serialize mock record");
        self.default_reply = Some(MockReply::Json(json));
        self
    }

    /// Sleep before answering each call
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Get all calls made to the AI
    pub fn calls(&self) -> Vec<MockAICall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn last_call(&self) -> Option<MockAICall> {
        self.calls.lock().unwrap().last().cloned()
    }

    /// Get the number of times the AI was called
    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

#[async_trait]
impl BaseAI for MockAI {
    async fn generate_structured(
        &self,
        system_prompt: &str,
        user_prompt: &str,
        documents: &[DocumentInput],
        _schema: serde_json::Value,
    ) -> Result<Option<String>> {
        self.calls.lock().unwrap().push(MockAICall {
            system_prompt: system_prompt.to_string(),
            user_prompt: user_prompt.to_string(),
            documents: documents.iter().map(|d| d.filename.clone()).collect(),
        });

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        let reply = self
            .replies
            .lock()
            .unwrap()
            .pop_front()
            .or_else(|| self.default_reply.clone());

        match reply {
            Some(MockReply::Json(json)) => Ok(Some(json)),
            Some(MockReply::Empty) => Ok(None),
            Some(MockReply::Fail(message)) => Err(anyhow!(message)),
            None => Err(anyhow!("MockAI has no response queued")),
        }
    }
}

// =============================================================================
// Fixtures
// =============================================================================

/// A fully completed, in-good-order record for an account with `holders` holders.
pub fn sample_record(holders: u8) -> ExtractedRecord {
    let joint = holders == 2;
    let second = |value: &str| joint.then(|| value.to_string());

    ExtractedRecord {
        discretionary: Discretion::Discretionary,
        wrap: WrapStatus::Wrap,
        advisor_name: "Linda Moore".to_string(),
        rep_code: "PQR".to_string(),
        client_name: if joint {
            "James Garcia & Maria Garcia".to_string()
        } else {
            "James Garcia".to_string()
        },
        effective_date: "03/01/2025".to_string(),
        account_holders: AccountHolders::Count(holders),
        adv_received_date: "02/27/2025".to_string(),
        client_signed_p11: SignatureStatus::Yes,
        client_name_p11: "James Garcia".to_string(),
        client_date_p11: "03/01/2025".to_string(),
        client2_signed_p11: joint.then_some(SignatureStatus::Yes),
        client2_name_p11: second("Maria Garcia"),
        client2_date_p11: second("03/01/2025"),
        advisor_signed_p11: SignatureStatus::Yes,
        advisor_name_p11: "Linda Moore".to_string(),
        advisor_date_p11: "03/01/2025".to_string(),
        account_number: "QRT482913".to_string(),
        fee_type: FeeType::Flat,
        fee_amount: "1.25%".to_string(),
        client_signed_p14: SignatureStatus::Yes,
        client_name_p14: "James Garcia".to_string(),
        client_date_p14: "03/01/2025".to_string(),
        client2_signed_p14: joint.then_some(SignatureStatus::Yes),
        client2_name_p14: second("Maria Garcia"),
        client2_date_p14: second("03/01/2025"),
        advisor_signed_p14: SignatureStatus::Yes,
        advisor_name_p14: "Linda Moore".to_string(),
        advisor_date_p14: "03/01/2025".to_string(),
    }
}

// =============================================================================
// TestDependencies
// =============================================================================

pub struct TestDependencies {
    pub ai: Arc<MockAI>,
    pub cache: Arc<MemoryExtractionCache>,
    pub throttle: ThrottlePolicy,
}

impl Default for TestDependencies {
    fn default() -> Self {
        Self::new()
    }
}

impl TestDependencies {
    pub fn new() -> Self {
        Self {
            ai: Arc::new(MockAI::new()),
            cache: Arc::new(MemoryExtractionCache::new()),
            throttle: ThrottlePolicy::unthrottled(),
        }
    }

    /// Set a mock AI
    pub fn mock_ai(mut self, ai: MockAI) -> Self {
        self.ai = Arc::new(ai);
        self
    }

    /// Pace extraction calls with a real policy
    pub fn throttle(mut self, policy: ThrottlePolicy) -> Self {
        self.throttle = policy;
        self
    }

    /// Convert into ServerDeps rooted at `folders`
    pub fn into_server_deps(self, folders: AdvisoryFolders) -> ServerDeps {
        let cache: Arc<dyn ExtractionCache> = self.cache;
        ServerDeps::new(self.ai, cache, ExtractionThrottle::new(self.throttle), folders)
    }
}
