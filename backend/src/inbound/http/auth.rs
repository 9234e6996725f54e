//! Token authentication extractors.
//!
//! Clients present `Authorization: Token <key>`. [`AuthenticatedUser`]
//! requires a valid token; [`MaybeUser`] admits anonymous requests but still
//! rejects a token that is present and invalid.

use actix_web::http::header::{AUTHORIZATION, HeaderMap};
use actix_web::{FromRequest, HttpRequest, dev::Payload, web};
use futures_util::future::LocalBoxFuture;

use crate::domain::{AuthToken, Error, UserId};
use crate::inbound::http::state::HttpState;

const SCHEME: &str = "Token";

/// Extract the raw token from the `Authorization` header.
///
/// Returns `Ok(None)` when the header is absent or uses another scheme.
fn presented_token(headers: &HeaderMap) -> Result<Option<AuthToken>, Error> {
    let Some(value) = headers.get(AUTHORIZATION) else {
        return Ok(None);
    };
    let raw = value
        .to_str()
        .map_err(|_| Error::unauthorized("authorization header is not valid ASCII"))?;
    let mut parts = raw.split_whitespace();
    match (parts.next(), parts.next(), parts.next()) {
        (Some(scheme), Some(key), None) if scheme.eq_ignore_ascii_case(SCHEME) => {
            Ok(Some(AuthToken::from_presented(key)))
        }
        (Some(scheme), _, _) if scheme.eq_ignore_ascii_case(SCHEME) => Err(Error::unauthorized(
            "invalid token header; expected `Token <key>`",
        )),
        _ => Ok(None),
    }
}

async fn resolve(state: Option<web::Data<HttpState>>, token: AuthToken) -> Result<UserId, Error> {
    let state = state.ok_or_else(|| Error::internal("HTTP state is not configured"))?;
    state.login.authenticate(token).await
}

/// Authenticated caller; the request is rejected with 401 otherwise.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthenticatedUser(pub UserId);

impl AuthenticatedUser {
    pub fn id(self) -> UserId {
        self.0
    }
}

impl FromRequest for AuthenticatedUser {
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let token = presented_token(req.headers());
        let state = req.app_data::<web::Data<HttpState>>().cloned();
        Box::pin(async move {
            let token = token?.ok_or_else(|| {
                Error::unauthorized("authentication credentials were not provided")
            })?;
            resolve(state, token).await.map(Self)
        })
    }
}

/// Caller identity when a token is presented, `None` for anonymous requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MaybeUser(pub Option<UserId>);

impl MaybeUser {
    pub fn id(self) -> Option<UserId> {
        self.0
    }
}

impl FromRequest for MaybeUser {
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let token = presented_token(req.headers());
        let state = req.app_data::<web::Data<HttpState>>().cloned();
        Box::pin(async move {
            match token? {
                Some(token) => resolve(state, token).await.map(|id| Self(Some(id))),
                None => Ok(Self(None)),
            }
        })
    }
}
