//! Session store invalidation and notification behaviour

mod support;

use std::sync::Arc;

use loginkit_core::{AuthorizationFailureSink, SessionListener};
use loginkit_domain::constants::{ACCESS_TOKEN_KEY, REFRESH_TOKEN_KEY, TOKEN_EXPIRE_DATE_KEY};
use loginkit_domain::{AuthorizationFailure, SessionError, TokenState};
use support::{Harness, MockTokenExchange, RecordingListener};

#[test]
fn test_login_persists_all_three_keys() {
    let harness = Harness::new(MockTokenExchange::new());
    harness.login_expiring_in("A", Some("R"), 60);

    assert!(harness.service.is_logged_in());
    assert_eq!(
        harness.repository.present_keys(),
        vec![ACCESS_TOKEN_KEY, REFRESH_TOKEN_KEY, TOKEN_EXPIRE_DATE_KEY]
    );
    assert_eq!(harness.repository.value(ACCESS_TOKEN_KEY).as_deref(), Some("A"));
}

#[test]
fn test_invalidate_clears_triple_together() {
    let harness = Harness::new(MockTokenExchange::new());
    harness.login_expiring_in("A", Some("R"), 60);

    assert!(harness.store.invalidate(Some(SessionError::ExpiredToken)));

    assert!(harness.store.session().is_none());
    assert!(harness.store.access_token().is_none());
    assert!(harness.store.refresh_token().is_none());
    assert!(harness.store.expires_at().is_none());
    assert!(harness.repository.present_keys().is_empty());
    assert_eq!(harness.listener.events(), vec![Some(SessionError::ExpiredToken)]);
}

#[test]
fn test_invalidate_when_logged_out_is_silent() {
    let harness = Harness::new(MockTokenExchange::new());

    assert!(!harness.store.invalidate(Some(SessionError::InvalidToken)));
    assert!(!harness.service.logout());
    assert_eq!(harness.listener.count(), 0);
}

#[test]
fn test_logout_notifies_without_reason() {
    let harness = Harness::new(MockTokenExchange::new());
    harness.login_expiring_in("A", None, 60);

    assert!(harness.service.logout());
    assert!(!harness.service.logout());
    assert_eq!(harness.listener.events(), vec![None]);
}

#[test]
fn test_login_overwrites_previous_session() {
    let harness = Harness::new(MockTokenExchange::new());
    harness.login_expiring_in("A", Some("R"), 60);
    harness.service.login("B", None, None);

    assert_eq!(harness.store.access_token().as_deref(), Some("B"));
    assert!(harness.store.refresh_token().is_none());
    assert_eq!(harness.repository.present_keys(), vec![ACCESS_TOKEN_KEY]);
    assert_eq!(harness.service.token_state(), TokenState::Expired);
}

#[test]
fn test_last_listener_registration_wins() {
    let harness = Harness::new(MockTokenExchange::new());
    let replacement = Arc::new(RecordingListener::default());
    let handle: Arc<dyn SessionListener> = replacement.clone();
    harness.service.set_listener(&handle);

    harness.login_expiring_in("A", None, 60);
    harness.service.logout();

    assert_eq!(harness.listener.count(), 0);
    assert_eq!(replacement.events(), vec![None]);
}

#[tokio::test]
async fn test_invalid_token_report_logs_out() {
    let harness = Harness::new(MockTokenExchange::new());
    harness.login_expiring_in("A", Some("R"), 3600);

    harness.service.report_authorization_failure(AuthorizationFailure::InvalidToken);

    assert!(!harness.service.is_logged_in());
    assert_eq!(harness.listener.events(), vec![Some(SessionError::InvalidToken)]);

    let result = harness.service.get_access_token().await;
    assert_eq!(result, Err(SessionError::AccessTokenNotFound));
    // Already logged out, so the failed fetch does not notify again.
    assert_eq!(harness.listener.count(), 1);
    assert_eq!(harness.exchange.calls(), 0);
}

#[test]
fn test_other_authorization_failure_has_no_reason() {
    let harness = Harness::new(MockTokenExchange::new());
    harness.login_expiring_in("A", Some("R"), 3600);

    harness.store.report_authorization_failure(AuthorizationFailure::Other);

    assert!(!harness.service.is_logged_in());
    assert_eq!(harness.listener.events(), vec![None]);
}

#[test]
fn test_listener_may_read_store_during_notification() {
    struct Probe {
        store: Arc<loginkit_core::SessionStore>,
        saw_logged_in: parking_lot::Mutex<Option<bool>>,
    }

    impl SessionListener for Probe {
        fn session_invalidated(&self, _reason: Option<SessionError>) {
            *self.saw_logged_in.lock() = Some(self.store.is_logged_in());
        }
    }

    let harness = Harness::new(MockTokenExchange::new());
    let probe = Arc::new(Probe {
        store: harness.store.clone(),
        saw_logged_in: parking_lot::Mutex::new(None),
    });
    let handle: Arc<dyn SessionListener> = probe.clone();
    harness.store.set_listener(&handle);

    harness.login_expiring_in("A", None, 60);
    harness.store.logout();

    assert_eq!(*probe.saw_logged_in.lock(), Some(false));
}
