use serde_json::{json, Value};
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;
use tempfile::TempDir;
use wiremock::MockServer;

use claimdesk::config::BackendConfig;
use claimdesk::{Backend, HttpBackend};

#[allow(dead_code)]
pub fn temp_config_file(contents: &str) -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().expect("failed to create tempdir");
    let config_path = temp_dir.path().join("claimdesk.yaml");
    fs::write(&config_path, contents).expect("failed to write config file");
    (temp_dir, config_path)
}

/// HTTP backend pointed at a mock server
#[allow(dead_code)]
pub fn backend_for(server: &MockServer) -> Arc<dyn Backend> {
    let config = BackendConfig {
        base_url: server.uri(),
        ..Default::default()
    };
    Arc::new(HttpBackend::new(&config).expect("failed to build http backend"))
}

#[allow(dead_code)]
pub fn stats_body(total_queries: u64) -> Value {
    json!({
        "total_documents": 3,
        "total_queries": total_queries,
        "total_sessions": 2,
        "system_status": "operational"
    })
}

#[allow(dead_code)]
pub fn documents_body() -> Value {
    json!([
        {
            "id": "a1b2",
            "name": "policy.pdf",
            "processed": true,
            "type": "pdf",
            "upload_date": "2026-03-01T09:30:00.123456"
        },
        { "id": "c3d4", "name": "riders.docx", "processed": false }
    ])
}

#[allow(dead_code)]
pub fn approval_body() -> Value {
    json!({
        "decision": "approved",
        "amount": 50000,
        "justification": "Knee surgery is covered after the 90-day waiting period",
        "confidence_score": 0.92,
        "referenced_clauses": [
            {
                "document": "policy.pdf",
                "relevance_score": 0.88,
                "content": "Surgical treatment of the knee is covered after 90 days...",
                "chunk_index": 12
            }
        ],
        "processing_time": 1.4,
        "query": "46-year-old male, knee surgery in Pune, 3-month-old insurance policy",
        "session_id": "whatever-the-server-echoes"
    })
}
