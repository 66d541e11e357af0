//! Shared fixtures for integration tests
#![allow(dead_code)] // not every test binary uses every helper

use std::sync::Arc;
use std::time::Duration;

use serde_json::json;

use preclear::model::ClassificationRef;
use preclear::{
    AgentConfig, DocumentKind, DocumentStore, InMemoryStore, MockAgentClient, NewDocument,
    NewProposal, Proposal, ProposalJob,
};

pub fn agent_config() -> AgentConfig {
    AgentConfig {
        base_url: "http://agent.test".to_string(),
        api_key: "test-key".to_string(),
        timeout: Duration::from_secs(5),
        model_provider: "google".to_string(),
        model_name: "gemini-2.0-flash".to_string(),
    }
}

/// Creates a proposal with a job over the given document kinds.
pub async fn seed_job(
    store: &InMemoryStore,
    kinds: &[DocumentKind],
) -> (Proposal, ProposalJob) {
    let proposal = store
        .create_proposal(NewProposal {
            owner_id: "user-1".to_string(),
            category: ClassificationRef {
                id: 1,
                label: "Belanja Data".to_string(),
            },
            sub_category: ClassificationRef {
                id: 2,
                label: "BMA".to_string(),
            },
            note: None,
        })
        .await
        .expect("create proposal");

    let documents = kinds
        .iter()
        .enumerate()
        .map(|(i, kind)| NewDocument::from_bytes(*kind, format!("doc-{i}.pdf"), b"%PDF-1.4"))
        .collect();

    let job = store
        .create_job_with_documents(proposal.id, documents)
        .await
        .expect("create job");

    (proposal, job)
}

pub fn new_store() -> Arc<InMemoryStore> {
    Arc::new(InMemoryStore::new())
}

pub fn push_summary_ok(mock: &MockAgentClient) {
    mock.push_ok(json!({"data": "ringkasan dokumen"}));
}

pub fn push_verification_ok(mock: &MockAgentClient) {
    mock.push_ok(json!({"result": {"data": "hasil verifikasi kelengkapan"}}));
}

pub fn push_map_priority_ok(mock: &MockAgentClient, score: i64) {
    mock.push_ok(json!({"result": {"skor": score, "alasan": "selaras dengan agenda"}}));
}

pub fn push_extraction_ok(mock: &MockAgentClient) {
    mock.push_ok(json!({"data": [
        {"key": "Rincian Output", "value": "Data dan Peta SDH"},
        {"key": "Direktorat", "value": "Direktorat IPSDH"},
        {"key": "Total Biaya", "value": "1.234.567,89"},
        {"key": "Tanggal Pengajuan", "value": "2025-09-27"}
    ]}));
}

pub fn push_overlap_ok(mock: &MockAgentClient) {
    mock.push_ok(json!({"result": [{
        "direktorat": "Direktorat Lain",
        "skor": 35,
        "total_biaya": "950.000.000",
        "alasan": "kesamaan penggunaan citra satelit",
        "rincian_output": "Pemantauan SDH"
    }]}));
}

pub fn push_synthesis_ok(mock: &MockAgentClient) {
    mock.push_ok(json!({"data": "## Ringkasan Kajian\n\nisi ringkasan"}));
}

pub fn push_letter_ok(mock: &MockAgentClient) {
    mock.push_ok(json!({"data": "## Berita Acara Hasil Evaluasi\n\nisi surat"}));
}

/// Queues the full happy-path response script for a job with `doc_count`
/// documents: stage 1 per document, then one response per remaining call.
pub fn push_full_success(mock: &MockAgentClient, doc_count: usize) {
    for _ in 0..doc_count {
        push_summary_ok(mock);
    }
    push_verification_ok(mock);
    for score in [85, 70, 60] {
        push_map_priority_ok(mock, score);
    }
    push_extraction_ok(mock);
    push_overlap_ok(mock);
    push_synthesis_ok(mock);
    push_letter_ok(mock);
}
