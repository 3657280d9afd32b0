//! Repository-level tests for the guarded status transitions and plan
//! counters. These are the writes that close the double-accept /
//! double-increment races, so they get direct coverage in addition to the
//! HTTP-level tests in the api crate.

use countersign_core::lifecycle::ProposalStatus;
use countersign_core::plan::UsageCounter;
use countersign_db::models::contract::{CreateContract, CreateSignatory};
use countersign_db::models::proposal::CreateProposal;
use countersign_db::models::template::{CreateTemplate, CreateTemplateImage};
use countersign_db::models::user::CreateUser;
use countersign_db::repositories::{
    ContractRepo, ProposalRepo, SignatoryRepo, TemplateRepo, UserRepo,
};
use sqlx::PgPool;

async fn create_user(pool: &PgPool, email: &str) -> countersign_db::models::user::User {
    let input = CreateUser {
        email: email.to_string(),
        password_hash: "$argon2id$placeholder".to_string(),
        full_name: "Test User".to_string(),
    };
    UserRepo::create(pool, &input)
        .await
        .expect("user creation should succeed")
}

fn draft_proposal(title: &str) -> CreateProposal {
    CreateProposal {
        title: title.to_string(),
        client_id: None,
        template_id: None,
        content: None,
        amount_cents: Some(150_000),
        currency: None,
        valid_until: None,
    }
}

#[sqlx::test]
async fn accept_wins_only_once(pool: PgPool) {
    let user = create_user(&pool, "races@test.com").await;
    let proposal = ProposalRepo::create(&pool, user.id, &draft_proposal("Site redesign"))
        .await
        .expect("create should succeed");

    let sent = ProposalRepo::mark_sent(&pool, user.id, proposal.id, "tok_accept_once")
        .await
        .expect("query should succeed")
        .expect("draft must be sendable");
    assert_eq!(sent.status, "sent");

    let first = ProposalRepo::respond(&pool, proposal.id, ProposalStatus::Accepted)
        .await
        .expect("query should succeed");
    assert_eq!(first.expect("first accept must win").status, "accepted");

    // Re-entrant accept: the CAS guard must reject it.
    let second = ProposalRepo::respond(&pool, proposal.id, ProposalStatus::Accepted)
        .await
        .expect("query should succeed");
    assert!(second.is_none(), "second accept must lose the guard");

    // Declining an accepted proposal must also fail.
    let decline = ProposalRepo::respond(&pool, proposal.id, ProposalStatus::Declined)
        .await
        .expect("query should succeed");
    assert!(decline.is_none());
}

#[sqlx::test]
async fn draft_cannot_be_accepted(pool: PgPool) {
    let user = create_user(&pool, "draft@test.com").await;
    let proposal = ProposalRepo::create(&pool, user.id, &draft_proposal("Retainer"))
        .await
        .expect("create should succeed");

    let response = ProposalRepo::respond(&pool, proposal.id, ProposalStatus::Accepted)
        .await
        .expect("query should succeed");
    assert!(response.is_none(), "drafts have no recipient to accept them");
}

#[sqlx::test]
async fn send_is_not_repeatable(pool: PgPool) {
    let user = create_user(&pool, "resend@test.com").await;
    let proposal = ProposalRepo::create(&pool, user.id, &draft_proposal("Audit"))
        .await
        .expect("create should succeed");

    ProposalRepo::mark_sent(&pool, user.id, proposal.id, "tok_first")
        .await
        .expect("query should succeed")
        .expect("first send must win");

    let again = ProposalRepo::mark_sent(&pool, user.id, proposal.id, "tok_second")
        .await
        .expect("query should succeed");
    assert!(again.is_none(), "sent proposals cannot be re-sent");
}

#[sqlx::test]
async fn view_tracking_moves_sent_to_viewed_once(pool: PgPool) {
    let user = create_user(&pool, "views@test.com").await;
    let proposal = ProposalRepo::create(&pool, user.id, &draft_proposal("Branding"))
        .await
        .expect("create should succeed");
    ProposalRepo::mark_sent(&pool, user.id, proposal.id, "tok_views")
        .await
        .expect("query should succeed")
        .expect("send must win");

    let first = ProposalRepo::record_view(&pool, proposal.id)
        .await
        .expect("query should succeed")
        .expect("awaiting proposals are viewable");
    assert_eq!(first.status, "viewed");
    assert_eq!(first.view_count, 1);
    let viewed_at = first.viewed_at.expect("first view stamps viewed_at");

    let second = ProposalRepo::record_view(&pool, proposal.id)
        .await
        .expect("query should succeed")
        .expect("still viewable");
    assert_eq!(second.status, "viewed");
    assert_eq!(second.view_count, 2);
    assert_eq!(second.viewed_at, Some(viewed_at), "viewed_at is set once");
}

#[sqlx::test]
async fn contract_signs_only_when_all_signatories_signed(pool: PgPool) {
    let user = create_user(&pool, "contracts@test.com").await;
    let contract = ContractRepo::create(
        &pool,
        user.id,
        &CreateContract {
            title: "Master services agreement".to_string(),
            client_id: None,
            file_url: Some("http://localhost:3000/files/1/source.pdf".to_string()),
        },
    )
    .await
    .expect("create should succeed");

    let signatory = |name: &str| CreateSignatory {
        name: name.to_string(),
        email: format!("{}@test.com", name.to_lowercase()),
        position: None,
    };
    let first = SignatoryRepo::add(&pool, contract.id, &signatory("Ada"), "tok_sig_a")
        .await
        .expect("add should succeed");
    let second = SignatoryRepo::add(&pool, contract.id, &signatory("Grace"), "tok_sig_b")
        .await
        .expect("add should succeed");

    ContractRepo::mark_sent(&pool, user.id, contract.id)
        .await
        .expect("query should succeed")
        .expect("draft must be sendable");

    // One of two signatures: contract must stay 'sent'.
    SignatoryRepo::sign(&pool, first.id, "http://files/sig_a.png", None, None)
        .await
        .expect("query should succeed")
        .expect("unsigned signatory must be signable");
    let early = ContractRepo::mark_signed_if_complete(&pool, contract.id)
        .await
        .expect("query should succeed");
    assert!(early.is_none(), "one pending signatory blocks completion");

    // Double-sign by the same signatory must lose the guard.
    let resign = SignatoryRepo::sign(&pool, first.id, "http://files/sig_a2.png", None, None)
        .await
        .expect("query should succeed");
    assert!(resign.is_none());

    // Final signature completes the contract.
    SignatoryRepo::sign(&pool, second.id, "http://files/sig_b.png", None, None)
        .await
        .expect("query should succeed")
        .expect("unsigned signatory must be signable");
    let done = ContractRepo::mark_signed_if_complete(&pool, contract.id)
        .await
        .expect("query should succeed")
        .expect("all signed, contract must complete");
    assert_eq!(done.status, "signed");
    assert!(done.signed_at.is_some());
}

#[sqlx::test]
async fn usage_counter_stops_at_limit(pool: PgPool) {
    let user = create_user(&pool, "limits@test.com").await;

    assert!(
        UserRepo::try_increment_usage(&pool, user.id, UsageCounter::Boards, 2)
            .await
            .expect("query should succeed")
    );
    assert!(
        UserRepo::try_increment_usage(&pool, user.id, UsageCounter::Boards, 2)
            .await
            .expect("query should succeed")
    );
    // Third create under a ceiling of 2 must be refused.
    assert!(
        !UserRepo::try_increment_usage(&pool, user.id, UsageCounter::Boards, 2)
            .await
            .expect("query should succeed")
    );

    UserRepo::decrement_usage(&pool, user.id, UsageCounter::Boards)
        .await
        .expect("query should succeed");
    assert!(
        UserRepo::try_increment_usage(&pool, user.id, UsageCounter::Boards, 2)
            .await
            .expect("query should succeed"),
        "freed capacity must be reusable"
    );
}

#[sqlx::test]
async fn deleting_template_removes_image_rows(pool: PgPool) {
    let user = create_user(&pool, "cascade@test.com").await;
    let template = TemplateRepo::create(
        &pool,
        user.id,
        &CreateTemplate {
            name: "Pitch deck".to_string(),
            description: None,
            content: None,
        },
    )
    .await
    .expect("create should succeed");

    for i in 0..3 {
        TemplateRepo::add_image(
            &pool,
            user.id,
            template.id,
            &CreateTemplateImage {
                url: format!("http://files/img_{i}.png"),
                position: Some(i),
            },
        )
        .await
        .expect("query should succeed")
        .expect("owner must be able to attach images");
    }
    assert_eq!(
        TemplateRepo::count_images(&pool, template.id)
            .await
            .expect("query should succeed"),
        3
    );

    assert!(TemplateRepo::delete(&pool, user.id, template.id)
        .await
        .expect("query should succeed"));
    assert_eq!(
        TemplateRepo::count_images(&pool, template.id)
            .await
            .expect("query should succeed"),
        0,
        "image rows must go with the template"
    );
}

#[sqlx::test]
async fn ownership_scoping_hides_foreign_rows(pool: PgPool) {
    let owner = create_user(&pool, "owner@test.com").await;
    let other = create_user(&pool, "other@test.com").await;

    let proposal = ProposalRepo::create(&pool, owner.id, &draft_proposal("Confidential"))
        .await
        .expect("create should succeed");

    let stolen = ProposalRepo::find_by_id(&pool, other.id, proposal.id)
        .await
        .expect("query should succeed");
    assert!(stolen.is_none(), "foreign rows must read as missing");

    let deleted = ProposalRepo::delete(&pool, other.id, proposal.id)
        .await
        .expect("query should succeed");
    assert!(!deleted, "foreign rows must not be deletable");
}
