//! Glue between the contract handlers and the pure certificate composer:
//! fetches the source PDF and per-signer signature images, then hands the
//! bytes to `countersign_core::certificate`.
//!
//! Per-signer image fetch failures degrade to a missing image (that signer's
//! overlay block is omitted); a missing or unreachable *source document* is
//! an error, since there is nothing to certify.

use countersign_core::certificate::{
    self, CertificateError, ContractSummary, GeneratedCertificate, SignerInfo,
};
use countersign_db::models::contract::{Contract, Signatory};

use crate::error::{AppError, AppResult};
use crate::state::AppState;
use crate::storage;

/// Produce the signed-PDF certificate for a contract.
pub async fn generate_signed_pdf(
    state: &AppState,
    contract: &Contract,
    signatories: &[Signatory],
) -> AppResult<GeneratedCertificate> {
    let file_url = contract
        .file_url
        .as_deref()
        .ok_or_else(|| AppError::BadRequest("Contract has no source file".into()))?;

    let source = fetch_bytes(state, file_url).await.map_err(|err| {
        tracing::error!(error = %err, contract_id = contract.id, "Failed to fetch source PDF");
        AppError::BadRequest("Contract source file could not be read".into())
    })?;

    let mut signers = Vec::with_capacity(signatories.len());
    for signatory in signatories {
        let image = match (signatory.signed, signatory.signature_url.as_deref()) {
            (true, Some(url)) => match fetch_bytes(state, url).await {
                Ok(bytes) => Some(bytes),
                Err(err) => {
                    // Partial-embedding policy: the document is still
                    // produced with this signer's overlay omitted.
                    tracing::warn!(
                        error = %err,
                        signatory_id = signatory.id,
                        "Failed to fetch signature image; omitting overlay",
                    );
                    None
                }
            },
            _ => None,
        };
        signers.push(SignerInfo {
            name: signatory.name.clone(),
            email: signatory.email.clone(),
            signed: signatory.signed,
            signed_at: signatory.signed_at,
            ip_address: signatory.ip_address.clone(),
            user_agent: signatory.user_agent.clone(),
            signature_image: image,
        });
    }

    let summary = ContractSummary {
        title: contract.title.clone(),
        reference: contract_reference(contract.id),
        created_at: contract.created_at,
        sent_at: contract.sent_at,
        signed_at: contract.signed_at,
    };

    let result = certificate::generate(&source, &summary, &signers).map_err(|err| match err {
        CertificateError::EmptySource | CertificateError::NoPages => {
            AppError::BadRequest("Contract source file is not a usable PDF".into())
        }
        CertificateError::Pdf(e) => AppError::InternalError(format!("PDF assembly failed: {e}")),
    })?;

    if !result.skipped_images.is_empty() {
        tracing::warn!(
            contract_id = contract.id,
            skipped = ?result.skipped_images,
            "Certificate generated with omitted signature overlays",
        );
    }

    Ok(result)
}

/// Printed reference for a contract, e.g. `CS-000042`.
pub fn contract_reference(id: countersign_core::types::DbId) -> String {
    format!("CS-{id:06}")
}

/// Fetch a blob by URL. URLs under this server's own `/files/` tree are read
/// straight from disk; everything else goes through the HTTP client.
async fn fetch_bytes(state: &AppState, url: &str) -> Result<Vec<u8>, String> {
    if let Some((user_id, name)) = storage::local_candidate(&state.config, url) {
        let path = storage::resolve_path(&state.config, user_id, &name)
            .ok_or_else(|| format!("unusable local path in {url}"))?;
        return tokio::fs::read(&path)
            .await
            .map_err(|e| format!("local read {}: {e}", path.display()));
    }

    let response = state
        .http
        .get(url)
        .send()
        .await
        .map_err(|e| format!("GET {url}: {e}"))?
        .error_for_status()
        .map_err(|e| format!("GET {url}: {e}"))?;
    let bytes = response
        .bytes()
        .await
        .map_err(|e| format!("GET {url}: {e}"))?;
    Ok(bytes.to_vec())
}
