// src/lib.rs
pub mod application;
pub mod cli;
pub mod config;
pub mod constants;
pub mod domain;
pub mod infrastructure;
pub mod ports;
pub mod util;

use std::future::Future;
use std::sync::Arc;

use anyhow::{anyhow, bail, Context, Result};
use application::views::{HomeView, LoginView, NoteEditorView, SignupView, ViewError};
use application::{
    AuthApi, Navigation, Navigator, NotesApi, Route, RouteGuard, ScopeHandle, SessionStore,
    ViewScope,
};
use config::Config;
use infrastructure::{FileStore, HttpClient};
use ports::TextPresenter;
use tracing::{debug, info, warn};

use crate::cli::args::{Args, Command};

pub async fn run(args: Args) -> Result<()> {
    debug!(command = args.command.name(), "Starting notekeeper");

    // Initialize configuration
    let mut config = Config::discover(args.config.as_deref())?;
    if let Some(url) = &args.api_url {
        debug!(%url, "Using API URL from command line");
        config.api.base_url = url.clone();
    }
    let session_path = match &args.session_file {
        Some(path) => path.clone(),
        None => config.session_path()?,
    };
    debug!(?session_path, "Using session file");

    // Initialize infrastructure
    let session = SessionStore::new(Arc::new(FileStore::new(session_path)));
    let client = HttpClient::new(&config.api.base_url, session.clone())
        .with_context(|| format!("Invalid API URL {}", config.api.base_url))?;

    let app = App::new(session, client);
    app.execute(args.command).await
}

/// Wires the views to the CLI and renders their state.
struct App {
    session: SessionStore,
    client: HttpClient,
    navigator: Navigator,
    presenter: TextPresenter,
}

impl App {
    fn new(session: SessionStore, client: HttpClient) -> Self {
        let navigator = Navigator::new(RouteGuard::new(session.clone()));
        Self {
            session,
            client,
            navigator,
            presenter: TextPresenter::new(),
        }
    }

    async fn execute(&self, command: Command) -> Result<()> {
        if let Some(route) = command.route() {
            self.enter(route)?;
        }

        match command {
            Command::Login { email, password } => self.login(email, password).await,
            Command::Signup {
                username,
                email,
                password,
            } => self.signup(username, email, password).await,
            Command::Logout => {
                self.session.logout().context("Failed to remove session token")?;
                println!("Logged out.");
                Ok(())
            }
            Command::Status => {
                if self.session.is_authenticated() {
                    println!("Logged in.");
                } else {
                    println!("Not logged in.");
                }
                Ok(())
            }
            Command::Whoami => {
                let claims = self
                    .client
                    .verify_token()
                    .await
                    .map_err(|e| self.view_error(ViewError::from(e)))?;
                println!("user: {}\nrole: {:?}", claims.user_id, claims.role);
                Ok(())
            }
            Command::List { json } => {
                let view = self.home().await?;
                if json {
                    println!("{}", serde_json::to_string_pretty(view.notes())?);
                } else {
                    print!("{}", self.presenter.render_list(view.notes()));
                }
                Ok(())
            }
            Command::Show { id, json } => {
                let scope = ViewScope::new();
                let note = interruptible(scope.handle(), scope.run(self.client.get_note(&id)))
                    .await
                    .map_err(|e| self.view_error(ViewError::from(e)))?;
                if json {
                    println!("{}", serde_json::to_string_pretty(&note)?);
                } else {
                    print!("{}", self.presenter.render_note(&note));
                }
                Ok(())
            }
            Command::Delete { id } => {
                let mut view = self.home().await?;
                interruptible(view.scope(), view.delete(&id))
                    .await
                    .map_err(|e| self.view_error(e))?;
                println!("Deleted note {id} ({} remaining).", view.notes().len());
                Ok(())
            }
            Command::New { title, content } => {
                let mut editor = self.editor(&Route::NewNote).await?;
                editor.form.title = title;
                editor.form.content = content;
                self.save(editor).await
            }
            Command::Edit { id, title, content } => {
                if title.is_none() && content.is_none() {
                    bail!("Nothing to update: pass --title and/or --content");
                }
                let mut editor = self.editor(&Route::EditNote(id)).await?;
                if let Some(title) = title {
                    editor.form.title = title;
                }
                if let Some(content) = content {
                    editor.form.content = content;
                }
                self.save(editor).await
            }
            Command::Open { path } => self.open(&path).await,
        }
    }

    /// Run the guard for `route`; a redirect ends the command.
    fn enter(&self, route: Route) -> Result<Route> {
        match self.navigator.enter(route) {
            Navigation::Enter(route) => Ok(route),
            Navigation::Redirect { from, to } => {
                bail!("Not logged in: {from} requires a session (redirected to {to}); run `notekeeper login`")
            }
            Navigation::NotFound(path) => bail!("No such route: {path}"),
        }
    }

    async fn open(&self, path: &str) -> Result<()> {
        match self.navigator.navigate(path) {
            Navigation::Enter(Route::Home) => {
                let view = self.home().await?;
                print!("{}", self.presenter.render_list(view.notes()));
            }
            Navigation::Enter(route @ (Route::NewNote | Route::EditNote(_))) => {
                let editor = self.editor(&route).await?;
                println!("{route}");
                print!("{}", self.presenter.render_form(&editor.form));
            }
            Navigation::Enter(route) => {
                println!("{route}: use `notekeeper {}`", route.path().trim_start_matches('/'));
            }
            Navigation::Redirect { from, to } => {
                println!("{from} requires login; redirected to {to}");
            }
            Navigation::NotFound(path) => bail!("No such route: {path}"),
        }
        Ok(())
    }

    async fn login(&self, email: String, password: String) -> Result<()> {
        let mut view = LoginView::new(self.client.clone(), self.session.clone());
        view.form.email = email;
        view.form.password = password;
        let next = interruptible(view.scope(), view.submit())
            .await
            .map_err(|e| self.view_error(e))?;
        info!(%next, "Login complete");
        println!("Logged in.");
        Ok(())
    }

    async fn signup(&self, username: String, email: String, password: String) -> Result<()> {
        let mut view = SignupView::new(self.client.clone());
        view.form.username = username;
        view.form.email = email;
        view.form.password = password;
        interruptible(view.scope(), view.submit())
            .await
            .map_err(|e| self.view_error(e))?;
        let name = view.created().map(|u| u.username.as_str()).unwrap_or_default();
        println!("Account {name} created. Log in with `notekeeper login`.");
        Ok(())
    }

    async fn home(&self) -> Result<HomeView<HttpClient>> {
        let mut view = HomeView::new(self.client.clone());
        interruptible(view.scope(), view.mount())
            .await
            .map_err(|e| self.view_error(e))?;
        Ok(view)
    }

    async fn editor(&self, route: &Route) -> Result<NoteEditorView<HttpClient>> {
        let mut editor = NoteEditorView::for_route(self.client.clone(), route)
            .ok_or_else(|| anyhow!("{route} has no editor"))?;
        interruptible(editor.scope(), editor.mount())
            .await
            .map_err(|e| self.view_error(e))?;
        Ok(editor)
    }

    async fn save<A: NotesApi>(&self, mut editor: NoteEditorView<A>) -> Result<()> {
        interruptible(editor.scope(), editor.submit())
            .await
            .map_err(|e| self.view_error(e))?;
        if let Some(note) = editor.saved() {
            println!("Saved note {}.", note.id);
        }
        Ok(())
    }

    fn view_error(&self, err: ViewError) -> anyhow::Error {
        anyhow!(self.presenter.render_error(&err))
    }
}

/// Drive `op` to completion, closing `scope` if Ctrl-C arrives first.
async fn interruptible<T>(scope: ScopeHandle, op: impl Future<Output = T>) -> T {
    let watcher = tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Interrupted, cancelling request");
            scope.close();
        }
    });
    let output = op.await;
    watcher.abort();
    output
}
