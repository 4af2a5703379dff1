// src/application/views/login.rs
use crate::application::router::Route;
use crate::application::scope::{ScopeHandle, ViewScope};
use crate::application::views::{LoginForm, ViewError, ViewStatus};
use crate::application::{AuthApi, SessionStore};
use tracing::{info, instrument};

pub struct LoginView<A: AuthApi> {
    api: A,
    session: SessionStore,
    scope: ViewScope,
    pub form: LoginForm,
    status: ViewStatus,
}

impl<A: AuthApi> LoginView<A> {
    pub fn new(api: A, session: SessionStore) -> Self {
        Self {
            api,
            session,
            scope: ViewScope::new(),
            form: LoginForm::default(),
            status: ViewStatus::Idle,
        }
    }

    pub fn status(&self) -> &ViewStatus {
        &self.status
    }

    pub fn scope(&self) -> ScopeHandle {
        self.scope.handle()
    }

    /// Log in and store the session token. Returns where to navigate next.
    #[instrument(level = "debug", skip(self))]
    pub async fn submit(&mut self) -> Result<Route, ViewError> {
        let credentials = self.form.validate().map_err(|e| self.status.fail(e))?;

        let previous = self.status.begin();
        let response = self
            .scope
            .run(self.api.login(&credentials))
            .await
            .map_err(|e| self.status.settle(previous, e))?;

        self.session
            .login(&response.token)
            .map_err(|e| self.status.fail(e))?;
        self.form.password.clear();
        self.status = ViewStatus::Ready;
        info!("Logged in");
        Ok(Route::Home)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ErrorKind;
    use crate::infrastructure::MemoryStore;
    use crate::util::testing::MockApi;
    use std::sync::Arc;

    fn session() -> SessionStore {
        SessionStore::new(Arc::new(MemoryStore::new()))
    }

    #[tokio::test]
    async fn given_valid_credentials_when_submitting_then_stores_token_and_goes_home() {
        // Arrange
        let session = session();
        let api = MockApi::builder()
            .with_account("ada@example.com", "secret", "tok-1")
            .build();
        let mut view = LoginView::new(api, session.clone());
        view.form.email = "ada@example.com".to_string();
        view.form.password = "secret".to_string();

        // Act
        let next = view.submit().await.expect("Login should succeed");

        // Assert
        assert_eq!(next, Route::Home);
        assert_eq!(session.token().as_deref(), Some("tok-1"));
        assert!(view.form.password.is_empty());
    }

    #[tokio::test]
    async fn given_wrong_password_when_submitting_then_stays_logged_out() {
        // Arrange
        let session = session();
        let api = MockApi::builder()
            .with_account("ada@example.com", "secret", "tok-1")
            .build();
        let mut view = LoginView::new(api, session.clone());
        view.form.email = "ada@example.com".to_string();
        view.form.password = "nope".to_string();

        // Act
        let err = view.submit().await.expect_err("Login should fail");

        // Assert
        assert_eq!(err.kind, ErrorKind::Unauthorized);
        assert!(!session.is_authenticated());
    }

    #[tokio::test]
    async fn given_closed_scope_when_submitting_then_stays_logged_out_and_idle() {
        // Arrange
        let session = session();
        let api = MockApi::builder()
            .with_account("ada@example.com", "secret", "tok-1")
            .build();
        let mut view = LoginView::new(api, session.clone());
        view.form.email = "ada@example.com".to_string();
        view.form.password = "secret".to_string();
        view.scope().close();

        // Act
        let err = view.submit().await.expect_err("Login should be cancelled");

        // Assert
        assert_eq!(err.kind, ErrorKind::Cancelled);
        assert_eq!(view.status(), &ViewStatus::Idle);
        assert!(!session.is_authenticated());
    }

    #[tokio::test]
    async fn given_empty_form_when_submitting_then_no_request_is_sent() {
        // Arrange
        let api = MockApi::builder().build();
        let mut view = LoginView::new(api.clone(), session());

        // Act
        let err = view.submit().await.expect_err("Validation should fail");

        // Assert
        assert_eq!(err.kind, ErrorKind::Validation);
        assert!(api.calls().is_empty());
    }
}
