use std::future::Future;
use std::sync::Arc;

use gatehouse_api::{
    ApiServer, JsonSuccessHandler, LoginFilterLayer, LoginRequestAdapter, ProblemFailureHandler,
    RequestAttributeStore,
};
use gatehouse_auth::{PasswordAuthenticator, UserAccount};
use gatehouse_config::{AppConfig, UserSeed};
use gatehouse_telemetry::{LoggingConfig, Metrics, build_sha, log_format_from_str};
use tracing::{error, info, warn};

use crate::error::{AppError, AppResult};

/// Configuration and accounts needed to start the server.
pub struct BootstrapDependencies {
    config: AppConfig,
    accounts: Vec<UserAccount>,
}

impl BootstrapDependencies {
    /// Load configuration from `GATEHOUSE_*` variables and the optional users file.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration or the users file is invalid.
    pub fn from_env() -> AppResult<Self> {
        let config =
            gatehouse_config::load_from_env().map_err(|err| AppError::config("config.load", err))?;
        let seeds = match config.users_file.as_deref() {
            Some(path) => gatehouse_config::load_users_file(path)
                .map_err(|err| AppError::config("config.users_file", err))?,
            None => Vec::new(),
        };
        Ok(Self::new(config, seeds.into_iter().map(account_from_seed)))
    }

    /// Construct dependencies from already-loaded parts.
    #[must_use]
    pub fn new(config: AppConfig, accounts: impl IntoIterator<Item = UserAccount>) -> Self {
        Self {
            config,
            accounts: accounts.into_iter().collect(),
        }
    }
}

/// Bootstraps Gatehouse from the environment and serves until Ctrl-C.
///
/// # Errors
///
/// Returns an error if bootstrap fails or the server stops unexpectedly.
pub async fn run_app() -> AppResult<()> {
    let dependencies = BootstrapDependencies::from_env()?;
    run_app_with(dependencies, shutdown_signal()).await
}

/// Run the application with explicit dependencies until `shutdown` resolves.
///
/// # Errors
///
/// Returns an error if logging, wiring, or the server fails.
pub async fn run_app_with<F>(dependencies: BootstrapDependencies, shutdown: F) -> AppResult<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let logging = &dependencies.config.logging;
    gatehouse_telemetry::init_logging(&LoggingConfig {
        level: &logging.level,
        format: log_format_from_str(logging.format.as_deref()),
        build_sha: build_sha(),
    })
    .map_err(|err| AppError::telemetry("telemetry.init", err))?;

    info!(
        bind_addr = %dependencies.config.bind_addr,
        login_path = %dependencies.config.login.path,
        "gatehouse bootstrap starting"
    );
    let telemetry = Metrics::new().map_err(|err| AppError::telemetry("metrics.init", err))?;
    let bind_addr = dependencies.config.bind_addr;
    let server = build_server(&dependencies.config, dependencies.accounts, telemetry)?;
    server
        .serve(bind_addr, shutdown)
        .await
        .map_err(|err| AppError::api_server("api.serve", err))?;
    info!("gatehouse shutdown complete");
    Ok(())
}

/// Wire the password directory, login adapter and router described by `config`.
///
/// # Errors
///
/// Returns an error if the directory or adapter cannot be built.
pub fn build_server(
    config: &AppConfig,
    accounts: Vec<UserAccount>,
    telemetry: Metrics,
) -> AppResult<ApiServer> {
    if accounts.is_empty() {
        warn!("no user accounts configured; every login will be rejected");
    }
    let directory = PasswordAuthenticator::new(accounts)
        .map_err(|err| AppError::password("directory.build", err))?;
    info!(accounts = directory.len(), "password directory ready");

    let login = &config.login;
    let adapter = LoginRequestAdapter::new(
        login.path.clone(),
        Arc::new(directory),
        Arc::new(JsonSuccessHandler),
        Arc::new(ProblemFailureHandler),
        Arc::new(RequestAttributeStore::new(
            login.username_parameter.clone(),
            login.password_parameter.clone(),
        )),
    )
    .map_err(|err| AppError::adapter("adapter.build", err))?
    .with_post_only(login.post_only);

    let layer = LoginFilterLayer::new(Arc::new(adapter), login.max_body_bytes);
    Ok(ApiServer::new(layer, telemetry))
}

fn account_from_seed(seed: UserSeed) -> UserAccount {
    UserAccount {
        username: seed.username,
        password_hash: seed.password_hash,
        authorities: seed.authorities,
        enabled: seed.enabled,
        locked: seed.locked,
    }
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        error!(error = %err, "failed to listen for shutdown signal");
    }
}
