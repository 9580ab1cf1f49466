mod common;

use common::{test_data, TestContext};
use roster_auth::db::UserStore;
use roster_auth::utils::token::TokenKind;

#[tokio::test]
async fn remember_issues_a_token_and_forget_revokes_it() {
    let ctx = TestContext::new();
    let registration = ctx
        .accounts
        .register(test_data::sample_candidate())
        .await
        .unwrap();
    let user_id = registration.user.id;

    let token = ctx.accounts.remember(user_id).await.expect("remember");
    let remembered = ctx
        .accounts
        .store()
        .find_by_id(user_id)
        .await
        .unwrap()
        .unwrap();
    assert!(ctx.accounts.authenticate(&remembered, TokenKind::Remember, &token));
    assert!(!ctx.accounts.authenticate(&remembered, TokenKind::Remember, "forged"));

    ctx.accounts.forget(user_id).await.expect("forget");
    let forgotten = ctx
        .accounts
        .store()
        .find_by_id(user_id)
        .await
        .unwrap()
        .unwrap();
    assert!(forgotten.remember_digest.is_none());
    assert!(!ctx.accounts.authenticate(&forgotten, TokenKind::Remember, &token));
}

#[tokio::test]
async fn authenticate_is_false_when_no_digest_is_set() {
    let ctx = TestContext::new();
    let registration = ctx
        .accounts
        .register(test_data::sample_candidate())
        .await
        .unwrap();
    let user = &registration.user;

    // never remembered, never requested a reset: plain false, no error
    assert!(!ctx.accounts.authenticate(user, TokenKind::Remember, "anything"));
    assert!(!ctx.accounts.authenticate(user, TokenKind::Reset, "anything"));
}

#[tokio::test]
async fn a_new_remember_token_replaces_the_previous_one() {
    let ctx = TestContext::new();
    let registration = ctx
        .accounts
        .register(test_data::sample_candidate())
        .await
        .unwrap();
    let user_id = registration.user.id;

    let first = ctx.accounts.remember(user_id).await.unwrap();
    let second = ctx.accounts.remember(user_id).await.unwrap();

    let user = ctx
        .accounts
        .store()
        .find_by_id(user_id)
        .await
        .unwrap()
        .unwrap();
    assert!(!ctx.accounts.authenticate(&user, TokenKind::Remember, &first));
    assert!(ctx.accounts.authenticate(&user, TokenKind::Remember, &second));
}
