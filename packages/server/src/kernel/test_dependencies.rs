// TestDependencies - mock implementations for testing
//
// Provides recording mocks that can be injected into ServerDeps for tests.

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};

use anyhow::{bail, Result};
use async_trait::async_trait;

use super::{
    BaseAI, BaseCrm, BaseNotifier, BasePagePublisher, BaseRunLog, CompletionRequest, ServerDeps,
};
use crate::common::{ServiceError, ServiceResult};
use crate::domains::landing_pages::activities::derive_locations::{
    LOCATION_SYSTEM_PROMPT, TOP_UP_SYSTEM_PROMPT,
};
use crate::domains::landing_pages::activities::generate_content::CONTENT_SYSTEM_PROMPT;
use crate::domains::landing_pages::models::{Contact, Deal, PageRow, PageRun, PipelineSettings};

// =============================================================================
// Mock CRM
// =============================================================================

pub struct MockCrm {
    deals: Mutex<HashMap<String, Deal>>,
    contacts: Mutex<HashMap<String, Contact>>,
    deal_contacts: Mutex<HashMap<String, String>>,
    deal_reads: Mutex<Vec<String>>,
    contact_reads: Mutex<Vec<String>>,
}

impl MockCrm {
    pub fn new() -> Self {
        Self {
            deals: Mutex::new(HashMap::new()),
            contacts: Mutex::new(HashMap::new()),
            deal_contacts: Mutex::new(HashMap::new()),
            deal_reads: Mutex::new(Vec::new()),
            contact_reads: Mutex::new(Vec::new()),
        }
    }

    pub fn with_deal(self, deal: Deal) -> Self {
        self.deals.lock().unwrap().insert(deal.id.clone(), deal);
        self
    }

    pub fn with_contact(self, contact: Contact) -> Self {
        self.contacts
            .lock()
            .unwrap()
            .insert(contact.id.clone(), contact);
        self
    }

    /// Associate a contact with a deal
    pub fn with_deal_contact(self, deal_id: &str, contact_id: &str) -> Self {
        self.deal_contacts
            .lock()
            .unwrap()
            .insert(deal_id.to_string(), contact_id.to_string());
        self
    }

    /// Deal ids that were fetched, in order
    pub fn deal_reads(&self) -> Vec<String> {
        self.deal_reads.lock().unwrap().clone()
    }

    /// Contact ids that were fetched, in order
    pub fn contact_reads(&self) -> Vec<String> {
        self.contact_reads.lock().unwrap().clone()
    }
}

impl Default for MockCrm {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BaseCrm for MockCrm {
    async fn get_deal(&self, deal_id: &str) -> ServiceResult<Deal> {
        self.deal_reads.lock().unwrap().push(deal_id.to_string());
        self.deals
            .lock()
            .unwrap()
            .get(deal_id)
            .cloned()
            .ok_or_else(|| ServiceError::NotFound {
                resource: "deal",
                id: deal_id.to_string(),
            })
    }

    async fn get_contact(&self, contact_id: &str) -> ServiceResult<Contact> {
        self.contact_reads
            .lock()
            .unwrap()
            .push(contact_id.to_string());
        self.contacts
            .lock()
            .unwrap()
            .get(contact_id)
            .cloned()
            .ok_or_else(|| ServiceError::NotFound {
                resource: "contact",
                id: contact_id.to_string(),
            })
    }

    async fn find_deal_contact(&self, deal_id: &str) -> ServiceResult<Option<String>> {
        Ok(self.deal_contacts.lock().unwrap().get(deal_id).cloned())
    }
}

// =============================================================================
// Mock AI (chat completion)
// =============================================================================

type Responder = dyn Fn(&CompletionRequest) -> ServiceResult<String> + Send + Sync;

pub struct MockAI {
    responses: Mutex<VecDeque<String>>,
    responder: Option<Arc<Responder>>,
    calls: Mutex<Vec<CompletionRequest>>,
}

impl MockAI {
    pub fn new() -> Self {
        Self {
            responses: Mutex::new(VecDeque::new()),
            responder: None,
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Add a text response to the queue
    pub fn with_response(self, response: &str) -> Self {
        self.responses
            .lock()
            .unwrap()
            .push_back(response.to_string());
        self
    }

    /// Answer every request the queue doesn't cover with `responder`
    pub fn with_responder<F>(mut self, responder: F) -> Self
    where
        F: Fn(&CompletionRequest) -> ServiceResult<String> + Send + Sync + 'static,
    {
        self.responder = Some(Arc::new(responder));
        self
    }

    /// Default answers: 120 distinct towns for a location list, no extra towns
    /// for a top-up, and a valid paragraph for anything else.
    pub fn default_response(request: &CompletionRequest) -> ServiceResult<String> {
        if request.system == LOCATION_SYSTEM_PROMPT {
            let towns: Vec<String> = (1..=120).map(|i| format!("Town {}, CO", i)).collect();
            Ok(serde_json::to_string(&towns).unwrap())
        } else if request.system == TOP_UP_SYSTEM_PROMPT {
            Ok("[]".to_string())
        } else {
            Ok("Local homeowners rely on experienced professionals for dependable results. \
                Every project is handled with care and attention to detail."
                .to_string())
        }
    }

    /// All requests, in order
    pub fn calls(&self) -> Vec<CompletionRequest> {
        self.calls.lock().unwrap().clone()
    }

    /// Requests made for page copy
    pub fn content_calls(&self) -> Vec<CompletionRequest> {
        self.calls()
            .into_iter()
            .filter(|c| c.system == CONTENT_SYSTEM_PROMPT)
            .collect()
    }

    /// Requests made for location lists (including top-ups)
    pub fn location_calls(&self) -> Vec<CompletionRequest> {
        self.calls()
            .into_iter()
            .filter(|c| c.system == LOCATION_SYSTEM_PROMPT || c.system == TOP_UP_SYSTEM_PROMPT)
            .collect()
    }
}

impl Default for MockAI {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BaseAI for MockAI {
    async fn complete(&self, request: CompletionRequest) -> ServiceResult<String> {
        self.calls.lock().unwrap().push(request.clone());

        if let Some(response) = self.responses.lock().unwrap().pop_front() {
            return Ok(response);
        }
        match &self.responder {
            Some(responder) => responder(&request),
            None => Self::default_response(&request),
        }
    }
}

// =============================================================================
// Mock Page Publisher
// =============================================================================

/// Arguments captured from a create_rows call
#[derive(Debug, Clone)]
pub struct RowCall {
    pub site_code: String,
    pub collection: String,
    pub rows: Vec<PageRow>,
}

pub struct MockPagePublisher {
    fail: bool,
    row_calls: Mutex<Vec<RowCall>>,
    publish_calls: Mutex<Vec<String>>,
}

impl MockPagePublisher {
    pub fn new() -> Self {
        Self {
            fail: false,
            row_calls: Mutex::new(Vec::new()),
            publish_calls: Mutex::new(Vec::new()),
        }
    }

    /// Reject every create_rows call
    pub fn failing(mut self) -> Self {
        self.fail = true;
        self
    }

    pub fn row_calls(&self) -> Vec<RowCall> {
        self.row_calls.lock().unwrap().clone()
    }

    pub fn publish_calls(&self) -> Vec<String> {
        self.publish_calls.lock().unwrap().clone()
    }
}

impl Default for MockPagePublisher {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BasePagePublisher for MockPagePublisher {
    async fn create_rows(
        &self,
        site_code: &str,
        collection: &str,
        rows: &[PageRow],
    ) -> ServiceResult<()> {
        self.row_calls.lock().unwrap().push(RowCall {
            site_code: site_code.to_string(),
            collection: collection.to_string(),
            rows: rows.to_vec(),
        });

        if self.fail {
            return Err(ServiceError::Upstream {
                service: "Duda",
                status: Some(400),
                message: "collection rejected rows".to_string(),
            });
        }
        Ok(())
    }

    async fn publish_site(&self, site_code: &str) -> ServiceResult<()> {
        self.publish_calls
            .lock()
            .unwrap()
            .push(site_code.to_string());
        Ok(())
    }
}

// =============================================================================
// Mock Run Log / Notifier
// =============================================================================

#[derive(Default)]
pub struct MockRunLog {
    fail: bool,
    runs: Mutex<Vec<PageRun>>,
}

impl MockRunLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn runs(&self) -> Vec<PageRun> {
        self.runs.lock().unwrap().clone()
    }
}

#[async_trait]
impl BaseRunLog for MockRunLog {
    async fn record(&self, run: &PageRun) -> Result<()> {
        if self.fail {
            bail!("run log unavailable");
        }
        self.runs.lock().unwrap().push(run.clone());
        Ok(())
    }
}

#[derive(Default)]
pub struct MockNotifier {
    fail: bool,
    sent: Mutex<Vec<(String, String)>>,
}

impl MockNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    /// (subject, body) pairs that were sent
    pub fn sent(&self) -> Vec<(String, String)> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl BaseNotifier for MockNotifier {
    async fn notify(&self, subject: &str, body: &str) -> Result<()> {
        if self.fail {
            bail!("smtp unavailable");
        }
        self.sent
            .lock()
            .unwrap()
            .push((subject.to_string(), body.to_string()));
        Ok(())
    }
}

// =============================================================================
// TestDependencies
// =============================================================================

/// Mocks for every ServerDeps seam. Keep a clone to inspect recorded calls
/// after handing the deps to the code under test.
#[derive(Clone)]
pub struct TestDependencies {
    pub crm: Arc<MockCrm>,
    pub ai: Arc<MockAI>,
    pub publisher: Arc<MockPagePublisher>,
    pub run_log: Arc<MockRunLog>,
    pub notifier: Arc<MockNotifier>,
}

impl TestDependencies {
    pub fn new() -> Self {
        Self {
            crm: Arc::new(MockCrm::new()),
            ai: Arc::new(MockAI::new()),
            publisher: Arc::new(MockPagePublisher::new()),
            run_log: Arc::new(MockRunLog::new()),
            notifier: Arc::new(MockNotifier::new()),
        }
    }

    pub fn with_crm(mut self, crm: MockCrm) -> Self {
        self.crm = Arc::new(crm);
        self
    }

    pub fn with_ai(mut self, ai: MockAI) -> Self {
        self.ai = Arc::new(ai);
        self
    }

    pub fn with_publisher(mut self, publisher: MockPagePublisher) -> Self {
        self.publisher = Arc::new(publisher);
        self
    }

    /// Run log and notifier both fail on every call
    pub fn with_failing_side_outputs(mut self) -> Self {
        self.run_log = Arc::new(MockRunLog::failing());
        self.notifier = Arc::new(MockNotifier::failing());
        self
    }

    pub fn into_deps(self, settings: PipelineSettings) -> ServerDeps {
        ServerDeps::new(
            self.crm,
            self.ai,
            self.publisher,
            self.run_log,
            self.notifier,
            settings,
        )
    }
}

impl Default for TestDependencies {
    fn default() -> Self {
        Self::new()
    }
}
