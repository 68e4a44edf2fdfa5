// File: ./src/client/middleware.rs
//! Tower middleware for the headers every API request carries.
use http::{HeaderValue, Request};
use std::task::{Context, Poll};
use tower_layer::Layer;
use tower_service::Service;

/// Per-request CSRF token, attached as a request extension by the client.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CsrfToken(pub String);

#[derive(Clone, Debug)]
pub struct UserAgentLayer {
    pub user_agent: String,
}

impl UserAgentLayer {
    pub fn new(user_agent: String) -> Self {
        Self { user_agent }
    }
}

impl<S> Layer<S> for UserAgentLayer {
    type Service = UserAgentService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        UserAgentService {
            inner,
            user_agent: self.user_agent.clone(),
        }
    }
}

#[derive(Clone, Debug)]
pub struct UserAgentService<S> {
    inner: S,
    user_agent: String,
}

impl<S, ReqBody> Service<Request<ReqBody>> for UserAgentService<S>
where
    S: Service<Request<ReqBody>>,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = S::Future;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, mut req: Request<ReqBody>) -> Self::Future {
        if let Ok(val) = HeaderValue::from_str(&self.user_agent) {
            req.headers_mut().insert(http::header::USER_AGENT, val);
        }
        self.inner.call(req)
    }
}

/// Mirrors the form's CSRF token into the `X-CSRFToken` header and the
/// `csrftoken` cookie; the server's CSRF check compares both.
#[derive(Clone, Debug, Default)]
pub struct CsrfLayer;

impl<S> Layer<S> for CsrfLayer {
    type Service = CsrfService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        CsrfService { inner }
    }
}

#[derive(Clone, Debug)]
pub struct CsrfService<S> {
    inner: S,
}

impl<S, ReqBody> Service<Request<ReqBody>> for CsrfService<S>
where
    S: Service<Request<ReqBody>>,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = S::Future;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, mut req: Request<ReqBody>) -> Self::Future {
        let token = req
            .extensions()
            .get::<CsrfToken>()
            .map(|t| t.0.clone())
            .filter(|t| !t.is_empty());

        if let Some(token) = token {
            if let Ok(val) = HeaderValue::from_str(&token) {
                req.headers_mut().insert("x-csrftoken", val);
            }
            if let Ok(val) = HeaderValue::from_str(&format!("csrftoken={}", token)) {
                req.headers_mut().append(http::header::COOKIE, val);
            }
        }
        self.inner.call(req)
    }
}
