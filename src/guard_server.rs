use std::{
    net::SocketAddr,
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc, Mutex,
    },
};

use axum::{
    http::{header::COOKIE, Method},
    middleware,
    routing::get,
    Extension, Router,
};
use tokio::{net::TcpListener, sync::Notify, task::JoinHandle};
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    trace::TraceLayer,
};
use tracing::{error, info};

use crate::{
    config::Config,
    error::{Error, GuardServerBuildError, InternalError, StartupError},
    middleware::route_guard,
    routes::{
        pages::{dashboard_route, index_route, login_route},
        public::public_config_route,
    },
};

pub use crate::routes::public::PUBLIC_CONFIG_PATH;

pub struct Signals {
    pub stop: Arc<AtomicBool>,
    pub stop_notify: Arc<Notify>,
}

impl Signals {
    pub fn stop(&self) {
        self.stop.store(true, Ordering::SeqCst);
        self.stop_notify.notify_waiters();
    }

    pub fn is_stopped(&self) -> bool {
        self.stop.load(Ordering::SeqCst)
    }

    /// Resolves once `stop` has been called, including before this was polled.
    pub async fn stopped(&self) {
        let notified = self.stop_notify.notified();
        tokio::pin!(notified);
        //register for notify_waiters before reading the flag so neither is missed
        notified.as_mut().enable();
        if self.is_stopped() {
            return;
        }
        notified.await;
    }
}

/// Page routes plus the public runtime config, with the guard in front of
/// every request.
pub fn router(config: Arc<Config>) -> Router {
    let guard = config.get_guard();
    let mut app = Router::new()
        .route(guard.get_login_path(), get(login_route))
        .route(guard.get_dashboard_path(), get(dashboard_route))
        .route(PUBLIC_CONFIG_PATH, get(public_config_route));
    if guard.get_login_path() != "/" && guard.get_dashboard_path() != "/" {
        app = app.route("/", get(index_route));
    }
    let mut app = app
        .layer(middleware::from_fn_with_state(config.to_owned(), route_guard))
        .layer(TraceLayer::new_for_http())
        .layer(Extension(config.to_owned()));

    if let Some(allowed_origin) = config.get_allowed_origin() {
        let cors = CorsLayer::new()
            .allow_methods([Method::GET])
            .allow_headers(vec![COOKIE])
            .allow_origin(AllowOrigin::exact(allowed_origin.to_owned()))
            .allow_credentials(true);
        app = app.layer(cors);
    }
    app
}

async fn start_server(guard_server: Arc<GuardServer>, listener: TcpListener, app: Router) {
    info!("Route guard listening on {}", guard_server.local_addr);
    let signal_server = guard_server.to_owned();
    let result = axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(async move { signal_server.signals.stopped().await })
    .await;
    match result {
        Ok(()) => info!("Route guard stopped"),
        Err(err) => error!("{}", Error::from(StartupError::Serve(err))),
    }
}

#[derive(Default)]
pub struct Builder {
    //required
    config: Option<Config>,

    //optional
    stop: Option<Arc<AtomicBool>>,
    stop_notify: Option<Arc<Notify>>,
}

impl Builder {
    pub fn config(mut self, config: Config) -> Self {
        self.config = Some(config);
        self
    }

    pub fn stop(mut self, stop: Arc<AtomicBool>) -> Self {
        self.stop = Some(stop);
        self
    }

    pub fn stop_notify(mut self, stop_notify: Arc<Notify>) -> Self {
        self.stop_notify = Some(stop_notify);
        self
    }

    pub async fn start_server(self) -> Result<Arc<GuardServer>, Error> {
        let config = Arc::new(self.config.ok_or(InternalError::GuardServerBuild(
            GuardServerBuildError::MissingProperties("Config".to_owned()),
        ))?);
        let app = router(config.to_owned());

        let listener = TcpListener::bind(config.get_bind_address())
            .await
            .map_err(StartupError::Bind)?;
        let local_addr = listener.local_addr().map_err(StartupError::Bind)?;
        let signals = Signals {
            stop: self.stop.unwrap_or(Arc::new(AtomicBool::new(false))),
            stop_notify: self.stop_notify.unwrap_or(Arc::new(Notify::new())),
        };

        let guard_server: Arc<GuardServer> = Arc::new(GuardServer {
            config,
            signals,
            local_addr,
            handle: Mutex::new(None),
        });

        let guard_server_ = guard_server.to_owned();
        let handle = tokio::spawn(async move { start_server(guard_server_, listener, app).await });
        if let Ok(mut slot) = guard_server.handle.lock() {
            *slot = Some(handle);
        }

        Ok(guard_server)
    }
}

pub struct GuardServer {
    pub config: Arc<Config>,
    pub signals: Signals,
    local_addr: SocketAddr,
    handle: Mutex<Option<JoinHandle<()>>>,
}

impl GuardServer {
    pub fn builder() -> Builder {
        Builder::default()
    }

    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// Waits for the server task to finish after a stop. Only the first
    /// caller waits, later calls return immediately.
    pub async fn wait(&self) {
        let handle = self.handle.lock().ok().and_then(|mut slot| slot.take());
        if let Some(handle) = handle {
            if let Err(err) = handle.await {
                error!("Route guard task failed: {}", err);
            }
        }
    }
}
