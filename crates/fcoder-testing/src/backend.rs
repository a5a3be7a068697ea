use bytes::Bytes;
use http_body_util::{BodyExt, Full};
use hyper::service::service_fn;
use hyper::{Request, Response, StatusCode};
use hyper_util::rt::{TokioExecutor, TokioIo};
use serde_json::Value;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use thiserror::Error;
use tokio::net::TcpListener;
use tokio::sync::oneshot;

use crate::matcher::RequestMatcher;
use crate::response::{Expectation, MockResponse, Times};

/// Path of the login endpoint, relative to the server origin.
pub const LOGIN_PATH: &str = "/api/v1/auth/login";
/// Path of the full member registration endpoint.
pub const SIGNUP_PATH: &str = "/api/v1/accounts/members/register/full";

type GenericError = Box<dyn std::error::Error + Send + Sync>;

#[derive(Debug, Error)]
pub enum BackendError {
    #[error("failed to bind mock backend: {0}")]
    Bind(#[from] std::io::Error),

    /// One or more expectations received the wrong number of calls.
    #[error("unmet expectations:\n{}", .0.join("\n"))]
    Unmet(Vec<String>),
}

/// A request the backend received.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: http::Method,
    pub path: String,
    pub headers: http::HeaderMap,
    pub body: Bytes,
    /// Whether an expectation answered it.
    pub matched: bool,
}

impl RecordedRequest {
    pub fn json(&self) -> Option<Value> {
        serde_json::from_slice(&self.body).ok()
    }
}

#[derive(Default)]
struct BackendState {
    expectations: Vec<Expectation>,
    requests: Vec<RecordedRequest>,
}

type SharedState = Arc<Mutex<BackendState>>;

fn lock(state: &SharedState) -> MutexGuard<'_, BackendState> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Stand-in for the FCoder REST API, listening on `127.0.0.1` at an
/// ephemeral port. Dropping it stops the accept loop.
pub struct MockBackend {
    addr: SocketAddr,
    state: SharedState,
    shutdown_tx: Option<oneshot::Sender<()>>,
}

impl MockBackend {
    pub async fn start() -> Result<Self, BackendError> {
        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        let state = SharedState::default();
        let (shutdown_tx, mut shutdown_rx) = oneshot::channel();

        let accept_state = Arc::clone(&state);
        tokio::spawn(async move {
            loop {
                tokio::select! {
                    accepted = listener.accept() => match accepted {
                        Ok((stream, _)) => {
                            let state = Arc::clone(&accept_state);
                            tokio::spawn(serve(TokioIo::new(stream), state));
                        }
                        Err(err) => tracing::warn!(error = %err, "mock backend accept failed"),
                    },
                    _ = &mut shutdown_rx => break,
                }
            }
        });

        tracing::debug!(%addr, "mock backend listening");
        Ok(Self {
            addr,
            state,
            shutdown_tx: Some(shutdown_tx),
        })
    }

    /// Origin to use as the client's API endpoint, e.g. `http://127.0.0.1:41234`.
    pub fn endpoint(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    /// Answer requests matching `matcher`. Later expectations win over
    /// earlier ones when both match.
    pub fn expect(&self, matcher: RequestMatcher) -> ExpectationBuilder {
        ExpectationBuilder {
            state: Arc::clone(&self.state),
            expectation: Some(Expectation::new(matcher)),
        }
    }

    /// `POST /api/v1/auth/login`.
    pub fn expect_login(&self) -> ExpectationBuilder {
        self.expect(RequestMatcher::post(LOGIN_PATH))
    }

    /// `POST /api/v1/accounts/members/register/full`.
    pub fn expect_signup(&self) -> ExpectationBuilder {
        self.expect(RequestMatcher::post(SIGNUP_PATH))
    }

    /// Every request received so far, in arrival order.
    pub fn requests(&self) -> Vec<RecordedRequest> {
        lock(&self.state).requests.clone()
    }

    pub fn unmatched_requests(&self) -> Vec<RecordedRequest> {
        lock(&self.state)
            .requests
            .iter()
            .filter(|r| !r.matched)
            .cloned()
            .collect()
    }

    /// Check call counts against every expectation.
    pub fn verify(&self) -> Result<(), BackendError> {
        let state = lock(&self.state);
        let unmet: Vec<String> = state
            .expectations
            .iter()
            .filter(|exp| !exp.times.admits(exp.calls))
            .map(|exp| {
                format!(
                    "{:?} {:?}: expected {:?}, got {} call(s)",
                    exp.matcher.method, exp.matcher.path, exp.times, exp.calls
                )
            })
            .collect();

        if unmet.is_empty() {
            Ok(())
        } else {
            Err(BackendError::Unmet(unmet))
        }
    }

    /// Panicking form of [`verify`](Self::verify) for tests.
    pub fn assert_verified(&self) {
        if let Err(err) = self.verify() {
            panic!("{err}");
        }
    }
}

impl Drop for MockBackend {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}

/// Configures an expectation; it is registered when the builder drops.
pub struct ExpectationBuilder {
    state: SharedState,
    expectation: Option<Expectation>,
}

impl ExpectationBuilder {
    fn update(mut self, f: impl FnOnce(&mut Expectation)) -> Self {
        if let Some(exp) = self.expectation.as_mut() {
            f(exp);
        }
        self
    }

    pub fn respond_with(self, response: MockResponse) -> Self {
        self.update(|exp| exp.response = response)
    }

    pub fn times(self, n: usize) -> Self {
        self.update(|exp| exp.times = Times::Exactly(n))
    }

    pub fn once(self) -> Self {
        self.times(1)
    }

    pub fn at_least_once(self) -> Self {
        self.update(|exp| exp.times = Times::AtLeast(1))
    }

    pub fn any_number(self) -> Self {
        self.update(|exp| exp.times = Times::Any)
    }

    pub fn never(self) -> Self {
        self.times(0)
    }
}

impl Drop for ExpectationBuilder {
    fn drop(&mut self) {
        if let Some(exp) = self.expectation.take() {
            lock(&self.state).expectations.push(exp);
        }
    }
}

async fn serve(io: TokioIo<tokio::net::TcpStream>, state: SharedState) {
    let service = service_fn(move |req| handle_request(req, Arc::clone(&state)));
    if let Err(err) = hyper_util::server::conn::auto::Builder::new(TokioExecutor::new())
        .serve_connection(io, service)
        .await
    {
        tracing::debug!(error = %err, "mock backend connection closed with error");
    }
}

async fn handle_request(
    req: Request<hyper::body::Incoming>,
    state: SharedState,
) -> Result<Response<Full<Bytes>>, GenericError> {
    let (parts, body) = req.into_parts();
    let body = body.collect().await?.to_bytes();
    let path = parts.uri.path().to_string();

    let answer = {
        let mut guard = lock(&state);
        let answer = guard
            .expectations
            .iter_mut()
            .rev()
            .find(|exp| exp.matcher.matches(&parts.method, &path, &parts.headers, &body))
            .map(|exp| {
                exp.calls += 1;
                exp.response.clone()
            });

        guard.requests.push(RecordedRequest {
            method: parts.method.clone(),
            path: path.clone(),
            headers: parts.headers.clone(),
            body: body.clone(),
            matched: answer.is_some(),
        });
        answer
    };

    let Some(answer) = answer else {
        tracing::debug!(method = %parts.method, path = %path, "mock backend: no expectation matched");
        return Ok(Response::builder()
            .status(StatusCode::NOT_FOUND)
            .body(Full::new(Bytes::from_static(b"No expectation matched")))?);
    };

    if let Some(delay) = answer.delay {
        tokio::time::sleep(delay).await;
    }

    let mut response = Response::builder().status(answer.status);
    for (name, value) in &answer.headers {
        response = response.header(name, value);
    }
    Ok(response.body(Full::new(answer.body))?)
}
