//! Builders wiring repositories and adapters into the HTTP state.

use std::sync::Arc;

use actix_web::web;
use mockable::{Clock, DefaultClock};
use tracing::{info, warn};

use taskboard::domain::ports::{
    BoardRepository, CardRepository, GitHubIdentityProvider, Mailer, TaskRepository,
    UserRepository, VerificationCodeRepository,
};
use taskboard::domain::{
    BoardService, CardOrderingService, EmailAuthService, GitHubAuthService, TaskOrderingService,
    UserProfileService,
};
use taskboard::inbound::http::state::{HttpState, HttpStatePorts};
use taskboard::outbound::github::GitHubHttpClient;
use taskboard::outbound::mail::TracingMailer;
use taskboard::outbound::memory::InMemoryStore;
use taskboard::outbound::persistence::{
    DbPool, DieselBoardRepository, DieselCardRepository, DieselTaskRepository,
    DieselUserRepository, DieselVerificationCodeRepository,
};

use super::ServerConfig;
use super::config::AppSettings;

/// Driven adapters one deployment runs against.
pub(super) struct Repositories<B, C, T, U, V> {
    pub boards: Arc<B>,
    pub cards: Arc<C>,
    pub tasks: Arc<T>,
    pub users: Arc<U>,
    pub codes: Arc<V>,
}

impl Repositories<
    InMemoryStore,
    InMemoryStore,
    InMemoryStore,
    InMemoryStore,
    InMemoryStore,
>
{
    fn in_memory() -> Self {
        let store = Arc::new(InMemoryStore::new());
        Self {
            boards: store.clone(),
            cards: store.clone(),
            tasks: store.clone(),
            users: store.clone(),
            codes: store,
        }
    }
}

impl Repositories<
    DieselBoardRepository,
    DieselCardRepository,
    DieselTaskRepository,
    DieselUserRepository,
    DieselVerificationCodeRepository,
>
{
    fn diesel(pool: &DbPool) -> Self {
        Self {
            boards: Arc::new(DieselBoardRepository::new(pool.clone())),
            cards: Arc::new(DieselCardRepository::new(pool.clone())),
            tasks: Arc::new(DieselTaskRepository::new(pool.clone())),
            users: Arc::new(DieselUserRepository::new(pool.clone())),
            codes: Arc::new(DieselVerificationCodeRepository::new(pool.clone())),
        }
    }
}

/// Build every driving port over one set of repositories.
pub(super) fn build_ports<B, C, T, U, V, M, P>(
    repos: Repositories<B, C, T, U, V>,
    mailer: Arc<M>,
    github: Arc<P>,
    settings: &AppSettings,
    clock: Arc<dyn Clock>,
) -> HttpStatePorts
where
    B: BoardRepository + 'static,
    C: CardRepository + 'static,
    T: TaskRepository + 'static,
    U: UserRepository + 'static,
    V: VerificationCodeRepository + 'static,
    M: Mailer + 'static,
    P: GitHubIdentityProvider + 'static,
{
    let Repositories {
        boards,
        cards,
        tasks,
        users,
        codes,
    } = repos;

    let board_service = Arc::new(BoardService::new(boards.clone(), users.clone(), clock.clone()));
    let card_service = Arc::new(CardOrderingService::new(
        boards.clone(),
        cards.clone(),
        clock.clone(),
    ));
    let task_service = Arc::new(TaskOrderingService::new(boards, cards, tasks, clock.clone()));

    HttpStatePorts {
        email_auth: Arc::new(
            EmailAuthService::new(users.clone(), codes.clone(), mailer, clock.clone())
                .with_code_ttl(settings.code_ttl()),
        ),
        github_auth: Arc::new(
            GitHubAuthService::new(github, users.clone(), codes, clock)
                .with_exchange_ttl(settings.exchange_ttl()),
        ),
        profile: Arc::new(UserProfileService::new(users)),
        boards: board_service.clone(),
        boards_query: board_service,
        cards: card_service.clone(),
        cards_query: card_service,
        tasks: task_service.clone(),
        tasks_query: task_service,
    }
}

/// Build the shared HTTP state, choosing Diesel repositories when a pool is
/// configured and the in-memory store otherwise.
///
/// # Errors
///
/// Returns an error when the GitHub HTTP client cannot be constructed.
pub(super) fn build_http_state(config: &ServerConfig) -> std::io::Result<web::Data<HttpState>> {
    let settings = &config.settings;
    if !settings.github_configured() {
        warn!("GitHub OAuth credentials missing; GitHub sign-in will fail");
    }
    let github = Arc::new(
        GitHubHttpClient::new(settings.github(), settings.http_timeout())
            .map_err(|error| std::io::Error::other(format!("build GitHub client: {error}")))?,
    );
    let mailer = Arc::new(TracingMailer);
    let clock: Arc<dyn Clock> = Arc::new(DefaultClock);

    let ports = match &config.db_pool {
        Some(pool) => {
            info!("using PostgreSQL repositories");
            build_ports(Repositories::diesel(pool), mailer, github, settings, clock)
        }
        None => {
            warn!("no database configured; board data lives in memory only");
            build_ports(Repositories::in_memory(), mailer, github, settings, clock)
        }
    };
    Ok(web::Data::new(HttpState::new(ports, settings.frontend_url())))
}
