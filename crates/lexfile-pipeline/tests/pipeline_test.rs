//! End-to-end pipeline tests against the injected seams: temp-dir local
//! storage, an in-memory document store, a scripted chat transport, and the
//! in-memory session store.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use anyhow::Result;
use async_trait::async_trait;
use chrono::Utc;
use lexfile_analysis::{AnalysisClient, ChatRequest, ChatTransport};
use lexfile_core::{AnalysisConfig, AppError, DocumentRecord, NewDocument};
use lexfile_db::DocumentStore;
use lexfile_pipeline::{DocumentPipeline, UploadEvent};
use lexfile_session::{FollowupSessions, InMemorySessionStore, SessionState};
use lexfile_storage::{LocalStorage, Storage};
use uuid::Uuid;

const NARRATIVE: &str = "1. Document Type: Contract\n2. Summary: Test.\n3. Key Parties: Acme.\n\
                         4. Important Dates: None.\n5. Legal Issues: None.\n6. Action Items: None.\n\
                         7. Risk Assessment: Low.";

struct ScriptedTransport {
    calls: AtomicUsize,
    result: Box<dyn Fn(&ChatRequest) -> Result<String> + Send + Sync>,
}

impl ScriptedTransport {
    fn returning(
        result: impl Fn(&ChatRequest) -> Result<String> + Send + Sync + 'static,
    ) -> Arc<Self> {
        Arc::new(Self {
            calls: AtomicUsize::new(0),
            result: Box::new(result),
        })
    }

    fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ChatTransport for ScriptedTransport {
    async fn complete(&self, request: &ChatRequest) -> Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        (self.result)(request)
    }
}

#[derive(Default)]
struct InMemoryDocumentStore {
    rows: Mutex<Vec<DocumentRecord>>,
    fail: AtomicBool,
}

impl InMemoryDocumentStore {
    fn saved(&self) -> Vec<DocumentRecord> {
        self.rows.lock().unwrap().clone()
    }
}

#[async_trait]
impl DocumentStore for InMemoryDocumentStore {
    async fn save(&self, document: NewDocument) -> Result<DocumentRecord, AppError> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(AppError::Internal("connection pool closed".to_string()));
        }
        let record = DocumentRecord {
            id: Uuid::new_v4(),
            filename: document.filename,
            storage_key: document.storage_key,
            content_type: document.content_type,
            file_size: document.file_size,
            analysis: document.analysis,
            uploaded_by: document.uploaded_by,
            created_at: Utc::now(),
        };
        self.rows.lock().unwrap().push(record.clone());
        Ok(record)
    }
}

struct TestHarness {
    pipeline: DocumentPipeline,
    documents: Arc<InMemoryDocumentStore>,
    sessions: Arc<FollowupSessions>,
    transport: Arc<ScriptedTransport>,
    storage: Arc<dyn Storage>,
    _dir: tempfile::TempDir,
}

async fn harness(transport: Arc<ScriptedTransport>) -> TestHarness {
    let dir = tempfile::TempDir::new().unwrap();
    let storage: Arc<dyn Storage> = Arc::new(
        LocalStorage::new(dir.path(), "http://localhost:4000/files".to_string())
            .await
            .unwrap(),
    );
    let documents = Arc::new(InMemoryDocumentStore::default());
    let config = AnalysisConfig {
        api_key: Some("sk-test".to_string()),
        ..AnalysisConfig::default()
    };
    let client = Arc::new(AnalysisClient::new(config, transport.clone()));
    let sessions = Arc::new(FollowupSessions::new(
        Arc::new(InMemorySessionStore::new()),
        client.clone(),
    ));

    let pipeline = DocumentPipeline::new(
        storage.clone(),
        documents.clone(),
        client,
        sessions.clone(),
    );

    TestHarness {
        pipeline,
        documents,
        sessions,
        transport,
        storage,
        _dir: dir,
    }
}

fn upload(filename: &str, content_type: &str, data: &[u8]) -> UploadEvent {
    UploadEvent {
        uploader_id: Some(100),
        filename: filename.to_string(),
        content_type: content_type.to_string(),
        data: data.to_vec(),
    }
}

/// Five pages, no text content anywhere.
fn blank_pdf(page_count: usize) -> Vec<u8> {
    use lopdf::content::Content;
    use lopdf::{dictionary, Document, Object, Stream};

    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let mut kids: Vec<Object> = Vec::new();
    for _ in 0..page_count {
        let content = Content { operations: vec![] };
        let content_id = doc.add_object(Stream::new(
            dictionary! {},
            content.encode().unwrap(),
        ));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
        });
        kids.push(page_id.into());
    }

    let pages = dictionary! {
        "Type" => "Pages",
        "Kids" => kids,
        "Count" => page_count as i64,
        "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
    };
    doc.objects.insert(pages_id, Object::Dictionary(pages));

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut bytes = Vec::new();
    doc.save_to(&mut bytes).unwrap();
    bytes
}

#[tokio::test]
async fn test_scenario_a_text_upload_full_flow() {
    let transport = ScriptedTransport::returning(|req| {
        assert!(req.user_prompt.contains("Hello world"));
        assert!(req.user_prompt.contains("contract.txt"));
        Ok(NARRATIVE.to_string())
    });
    let h = harness(transport).await;

    let outcome = h
        .pipeline
        .process_upload(upload("contract.txt", "text/plain", b"Hello world"))
        .await
        .unwrap();

    // Record saved with the narrative.
    let saved = h.documents.saved();
    assert_eq!(saved.len(), 1);
    assert_eq!(saved[0].filename, "contract.txt");
    assert_eq!(saved[0].analysis, NARRATIVE);
    assert_eq!(saved[0].uploaded_by, Some(100));
    assert_eq!(saved[0].file_size, b"Hello world".len() as i64);

    // Bytes durably stored under the returned key.
    let stored = h.storage.download(&saved[0].storage_key).await.unwrap();
    assert_eq!(stored, b"Hello world");

    // Session open, follow-up offered.
    assert!(outcome.followup_offered);
    assert_eq!(h.sessions.state(100).await, Some(SessionState::Open));
    assert!(outcome.message.contains(NARRATIVE));
    assert!(outcome.record.is_some());
}

#[tokio::test]
async fn test_scenario_b_blank_pdf_still_analyzed_and_saved() {
    let transport = ScriptedTransport::returning(|_| Ok(NARRATIVE.to_string()));
    let h = harness(transport).await;

    let outcome = h
        .pipeline
        .process_upload(upload("scan.pdf", "application/pdf", &blank_pdf(5)))
        .await
        .unwrap();

    // Empty extraction is soft: analysis is still attempted.
    assert_eq!(h.transport.call_count(), 1);

    // The record exists regardless, and the user learns about the page count.
    let saved = h.documents.saved();
    assert_eq!(saved.len(), 1);
    assert!(outcome.message.contains("5 pages"));
    assert!(outcome.message.contains("scanned"));
    assert!(outcome.followup_offered);
}

#[tokio::test]
async fn test_unreadable_file_skips_analysis_but_is_recorded() {
    let transport = ScriptedTransport::returning(|_| Ok(NARRATIVE.to_string()));
    let h = harness(transport).await;

    let outcome = h
        .pipeline
        .process_upload(upload("setup.exe", "application/octet-stream", b"MZ\x90"))
        .await
        .unwrap();

    // No analysis call for an unreadable file.
    assert_eq!(h.transport.call_count(), 0);

    // The could-not-read message, with the format list, never conflated with
    // an analysis failure.
    assert!(outcome.message.contains("could not be read"));
    assert!(outcome.message.contains("Unsupported file type: exe"));
    assert!(outcome.message.contains("PDF, DOCX, TXT, MD, JSON, XLSX"));
    assert!(!outcome.message.contains("AI Analysis Unavailable"));

    // Audit row still written, carrying the extraction error text.
    let saved = h.documents.saved();
    assert_eq!(saved.len(), 1);
    assert!(saved[0].analysis.contains("Unsupported file type"));

    // No follow-up for a document with no readable text.
    assert!(!outcome.followup_offered);
    assert_eq!(h.sessions.state(100).await, None);
}

#[tokio::test]
async fn test_analysis_failure_is_nonfatal_and_recorded() {
    let transport = ScriptedTransport::returning(|_| Err(anyhow::anyhow!("gateway timeout")));
    let h = harness(transport).await;

    let outcome = h
        .pipeline
        .process_upload(upload("brief.txt", "text/plain", b"Argument section one"))
        .await
        .unwrap();

    // Saved-but-not-summarized: marker present, file recorded, session open.
    assert!(outcome.message.contains("AI Analysis Unavailable"));
    assert!(outcome.message.contains("gateway timeout"));
    assert!(!outcome.message.contains("could not be read"));

    let saved = h.documents.saved();
    assert_eq!(saved.len(), 1);
    assert!(saved[0].analysis.contains("AI Analysis Unavailable"));
    assert!(outcome.followup_offered);
}

#[tokio::test]
async fn test_scenario_d_second_upload_replaces_context() {
    let transport = ScriptedTransport::returning(|req| {
        if req.user_prompt.contains("User Question:") {
            // Follow-up must see only the new document's text.
            assert!(req.user_prompt.contains("zoning variance request"));
            assert!(!req.user_prompt.contains("first document body"));
            Ok("It concerns the zoning variance.".to_string())
        } else {
            Ok(NARRATIVE.to_string())
        }
    });
    let h = harness(transport).await;

    h.pipeline
        .process_upload(upload("first.txt", "text/plain", b"first document body"))
        .await
        .unwrap();
    h.sessions.request_followup(100).await.unwrap();

    // Second upload while the first session is mid-question.
    h.pipeline
        .process_upload(upload(
            "second.txt",
            "text/plain",
            b"zoning variance request",
        ))
        .await
        .unwrap();

    // The in-progress state was discarded with the old context.
    assert_eq!(h.sessions.state(100).await, Some(SessionState::Open));

    h.sessions.request_followup(100).await.unwrap();
    let reply = h
        .sessions
        .try_answer(100, "what is this about?")
        .await
        .unwrap();
    assert!(reply.text.contains("zoning variance"));
}

#[tokio::test]
async fn test_persistence_failure_reported_but_bytes_kept() {
    let transport = ScriptedTransport::returning(|_| Ok(NARRATIVE.to_string()));
    let h = harness(transport).await;
    h.documents.fail.store(true, Ordering::SeqCst);

    let outcome = h
        .pipeline
        .process_upload(upload("notes.txt", "text/plain", b"meeting notes"))
        .await
        .unwrap();

    assert!(outcome.record.is_none());
    assert!(outcome.message.contains("Error saving document analysis"));
    // The narrative is still shown and the session still opens.
    assert!(outcome.message.contains(NARRATIVE));
    assert!(outcome.followup_offered);
}

#[tokio::test]
async fn test_anonymous_uploader_recorded_without_followup() {
    let transport = ScriptedTransport::returning(|_| Ok(NARRATIVE.to_string()));
    let h = harness(transport).await;

    let mut event = upload("memo.md", "text/markdown", b"# Memo\n\nBody text.");
    event.uploader_id = None;

    let outcome = h.pipeline.process_upload(event).await.unwrap();

    let saved = h.documents.saved();
    assert_eq!(saved.len(), 1);
    assert_eq!(saved[0].uploaded_by, None);
    assert!(!outcome.followup_offered);
}
