// src/application/views/signup.rs
use crate::application::router::Route;
use crate::application::scope::{ScopeHandle, ViewScope};
use crate::application::views::{SignupForm, ViewError, ViewStatus};
use crate::application::AuthApi;
use crate::domain::User;
use tracing::{info, instrument};

pub struct SignupView<A: AuthApi> {
    api: A,
    scope: ViewScope,
    pub form: SignupForm,
    created: Option<User>,
    status: ViewStatus,
}

impl<A: AuthApi> SignupView<A> {
    pub fn new(api: A) -> Self {
        Self {
            api,
            scope: ViewScope::new(),
            form: SignupForm::default(),
            created: None,
            status: ViewStatus::Idle,
        }
    }

    pub fn status(&self) -> &ViewStatus {
        &self.status
    }

    pub fn created(&self) -> Option<&User> {
        self.created.as_ref()
    }

    pub fn scope(&self) -> ScopeHandle {
        self.scope.handle()
    }

    /// Register the account. On success the user is sent to the login view.
    #[instrument(level = "debug", skip(self), fields(username = %self.form.username))]
    pub async fn submit(&mut self) -> Result<Route, ViewError> {
        let request = self.form.validate().map_err(|e| self.status.fail(e))?;

        let previous = self.status.begin();
        let user = self
            .scope
            .run(self.api.signup(&request))
            .await
            .map_err(|e| self.status.settle(previous, e))?;

        info!(user_id = %user.id, "Account created");
        self.created = Some(user);
        self.form.password.clear();
        self.status = ViewStatus::Ready;
        Ok(Route::Login)
    }
}
