//! Integration tests for the view-session repository lifecycle.

mod common;

use chrono::{Duration, Utc};
use noteguard_db::models::view_session::CreateViewSession;
use noteguard_db::repositories::ViewSessionRepo;
use sqlx::PgPool;

fn session_input(note_id: i64, user_id: i64, token_hash: &str) -> CreateViewSession {
    CreateViewSession {
        note_id,
        user_id,
        token_hash: token_hash.to_string(),
        watermark_seed: "seed".to_string(),
        client_ip: Some("203.0.113.1".to_string()),
        client_user_agent: Some("test-agent".to_string()),
        expires_at: Utc::now() + Duration::minutes(30),
    }
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn created_session_is_live_and_countable(pool: PgPool) {
    let user_id = common::insert_user(&pool, "Ada", "ada@example.com").await;
    let note_id = common::insert_note(&pool, "Algebra", None).await;

    let session = ViewSessionRepo::create(&pool, &session_input(note_id, user_id, "hash-a"))
        .await
        .unwrap();
    assert!(session.revoked_at.is_none());

    let live = ViewSessionRepo::find_live_for_user(&pool, note_id, user_id)
        .await
        .unwrap();
    assert_eq!(live.len(), 1);
    assert_eq!(live[0].id, session.id);

    let count = ViewSessionRepo::count_live_for_user(&pool, note_id, user_id)
        .await
        .unwrap();
    assert_eq!(count, 1);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn expired_session_is_not_live(pool: PgPool) {
    let user_id = common::insert_user(&pool, "Ada", "ada@example.com").await;
    let note_id = common::insert_note(&pool, "Algebra", None).await;

    let mut input = session_input(note_id, user_id, "hash-a");
    input.expires_at = Utc::now() - Duration::minutes(1);
    ViewSessionRepo::create(&pool, &input).await.unwrap();

    let count = ViewSessionRepo::count_live_for_user(&pool, note_id, user_id)
        .await
        .unwrap();
    assert_eq!(count, 0);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn revoke_is_idempotent(pool: PgPool) {
    let user_id = common::insert_user(&pool, "Ada", "ada@example.com").await;
    let note_id = common::insert_note(&pool, "Algebra", None).await;

    let session = ViewSessionRepo::create(&pool, &session_input(note_id, user_id, "hash-a"))
        .await
        .unwrap();

    let revoked = ViewSessionRepo::revoke(&pool, session.id).await.unwrap();
    assert!(revoked.is_some());
    assert!(revoked.unwrap().revoked_at.is_some());

    // Second revoke matches no unrevoked row and reports None, not an error.
    let again = ViewSessionRepo::revoke(&pool, session.id).await.unwrap();
    assert!(again.is_none());

    // The row still exists: sessions are marked, never deleted.
    let stored = ViewSessionRepo::find_by_id(&pool, session.id)
        .await
        .unwrap()
        .unwrap();
    assert!(stored.revoked_at.is_some());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn revoke_all_for_user_only_touches_that_pair(pool: PgPool) {
    let ada = common::insert_user(&pool, "Ada", "ada@example.com").await;
    let bob = common::insert_user(&pool, "Bob", "bob@example.com").await;
    let note_id = common::insert_note(&pool, "Algebra", None).await;

    ViewSessionRepo::create(&pool, &session_input(note_id, ada, "hash-a"))
        .await
        .unwrap();
    ViewSessionRepo::create(&pool, &session_input(note_id, ada, "hash-b"))
        .await
        .unwrap();
    ViewSessionRepo::create(&pool, &session_input(note_id, bob, "hash-c"))
        .await
        .unwrap();

    let revoked = ViewSessionRepo::revoke_all_for_user(&pool, note_id, ada)
        .await
        .unwrap();
    assert_eq!(revoked, 2);

    assert_eq!(
        ViewSessionRepo::count_live_for_user(&pool, note_id, ada)
            .await
            .unwrap(),
        0
    );
    assert_eq!(
        ViewSessionRepo::count_live_for_user(&pool, note_id, bob)
            .await
            .unwrap(),
        1
    );
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn revoke_all_for_note_covers_every_user(pool: PgPool) {
    let ada = common::insert_user(&pool, "Ada", "ada@example.com").await;
    let bob = common::insert_user(&pool, "Bob", "bob@example.com").await;
    let note_id = common::insert_note(&pool, "Algebra", None).await;

    ViewSessionRepo::create(&pool, &session_input(note_id, ada, "hash-a"))
        .await
        .unwrap();
    ViewSessionRepo::create(&pool, &session_input(note_id, bob, "hash-b"))
        .await
        .unwrap();

    let revoked = ViewSessionRepo::revoke_all_for_note(&pool, note_id)
        .await
        .unwrap();
    assert_eq!(revoked, 2);
    assert_eq!(
        ViewSessionRepo::count_live_for_note(&pool, note_id, None)
            .await
            .unwrap(),
        0
    );
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn touch_last_seen_advances_timestamp(pool: PgPool) {
    let user_id = common::insert_user(&pool, "Ada", "ada@example.com").await;
    let note_id = common::insert_note(&pool, "Algebra", None).await;

    let session = ViewSessionRepo::create(&pool, &session_input(note_id, user_id, "hash-a"))
        .await
        .unwrap();

    ViewSessionRepo::touch_last_seen(&pool, session.id)
        .await
        .unwrap();

    let stored = ViewSessionRepo::find_by_id(&pool, session.id)
        .await
        .unwrap()
        .unwrap();
    assert!(stored.last_seen_at >= session.last_seen_at);
}
