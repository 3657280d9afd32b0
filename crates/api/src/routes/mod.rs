pub mod activity;
pub mod ads;
pub mod auth;
pub mod board;
pub mod client;
pub mod contract;
pub mod health;
pub mod project;
pub mod proposal;
pub mod share;
pub mod storage;
pub mod template;
pub mod transaction;
pub mod user;
pub mod webhook;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /auth/register                                   register (public)
/// /auth/login                                      login (public)
/// /auth/refresh                                    refresh (public)
/// /auth/logout                                     logout (requires auth)
/// /auth/me                                         current user (requires auth)
///
/// /users/me                                        get, update profile
/// /users/me/usage                                  plan ceilings + counters
///
/// /templates                                       list, create
/// /templates/{id}                                  get, update, delete
/// /templates/{id}/images                           list, add
/// /templates/{id}/images/{image_id}                remove
///
/// /proposals                                       list, create
/// /proposals/{id}                                  get, update, delete
/// /proposals/{id}/send                             issue share link (POST)
///
/// /contracts                                       list, create
/// /contracts/{id}                                  get, update, delete
/// /contracts/{id}/send                             open for signing (POST)
/// /contracts/{id}/signatories                      add (POST)
/// /contracts/{id}/signatories/{signatory_id}       remove (DELETE)
/// /contracts/{id}/certificate                      signed-PDF download (GET)
///
/// /share/proposals/{token}                         public proposal view
/// /share/proposals/{token}/accept                  accept (POST)
/// /share/proposals/{token}/decline                 decline (POST)
/// /share/contracts/{token}                         public signing page
/// /share/contracts/{token}/sign                    sign (POST)
///
/// /clients                                         list, create
/// /clients/{id}                                    get, update, delete
///
/// /projects                                        list, create
/// /projects/{id}                                   get, update, delete
/// /projects/{project_id}/tasks                     list, create
/// /projects/{project_id}/tasks/{id}                update, delete
///
/// /transactions                                    list, create (?from=&to=)
/// /transactions/summary                            totals (?from=&to=)
/// /transactions/{id}                               update, delete
///
/// /boards                                          list, create
/// /boards/{id}                                     get (full view), update, delete
/// /boards/{board_id}/lists                         add (POST)
/// /boards/{board_id}/lists/{id}                    update, delete
/// /boards/{board_id}/lists/{list_id}/cards         add (POST)
/// /cards/{id}                                      update, delete
/// /cards/{id}/move                                 move (POST)
///
/// /integrations/ads/connect                        OAuth redirect URL (GET)
/// /integrations/ads/callback                       OAuth callback (public)
/// /integrations/ads/status                         connection status (GET)
/// /integrations/ads                                disconnect (DELETE)
/// /integrations/ads/snapshots                      list (?from=&to=)
/// /integrations/ads/snapshots/refresh              pull from provider (POST)
///
/// /activity                                        feed (?limit=&offset=)
///
/// /storage/upload                                  multipart upload (POST)
///
/// /webhooks/payments                               payment webhook stub (POST)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        // Authentication (register, login, refresh, logout, me).
        .nest("/auth", auth::router())
        // Profile and plan usage.
        .nest("/users/me", user::router())
        // Document templates and their image attachments.
        .nest("/templates", template::router())
        // Proposals (owner surface).
        .nest("/proposals", proposal::router())
        // Contracts, signatories, certificate download (owner surface).
        .nest("/contracts", contract::router())
        // Public share links: proposal view/accept/decline, contract signing.
        .nest("/share", share::router())
        // CRM clients.
        .nest("/clients", client::router())
        // Projects (also nests tasks).
        .nest("/projects", project::router())
        // Finance ledger.
        .nest("/transactions", transaction::router())
        // Kanban boards (also nests lists and cards).
        .nest("/boards", board::router())
        // Card-addressed Kanban operations (update, delete, move).
        .nest("/cards", board::card_router())
        // Ads provider OAuth + metric snapshots.
        .nest("/integrations/ads", ads::router())
        // Per-user activity feed.
        .nest("/activity", activity::router())
        // Blob uploads.
        .nest("/storage", storage::router())
        // Inbound payment-provider webhooks.
        .nest("/webhooks", webhook::router())
}
