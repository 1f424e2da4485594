//! Auth middleware.

use std::sync::Arc;

use salvo::{http::header::AUTHORIZATION, prelude::*};
use tracing::error;

use auvea_app::auth::AuthServiceError;

use crate::{errors::ApiError, extensions::*, state::State};

/// Resolve the bearer token, when one is presented, into the request's user.
///
/// Requests without an `Authorization` header continue anonymously; a header that does
/// not carry a valid bearer token is rejected.
#[salvo::handler]
pub(crate) async fn handler(
    req: &mut Request,
    depot: &mut Depot,
    res: &mut Response,
    ctrl: &mut FlowCtrl,
) {
    if req.headers().get(AUTHORIZATION).is_none() {
        ctrl.call_next(req, depot, res).await;

        return;
    }

    let Some(token) = extract_bearer_token(req) else {
        reject(res, ctrl, ApiError::unauthorized());

        return;
    };

    let state = match depot.obtain_or_500::<Arc<State>>() {
        Ok(state) => state,
        Err(error) => {
            reject(res, ctrl, error);

            return;
        }
    };

    let user = match state.app.auth.authenticate_bearer(token).await {
        Ok(user) => user,
        Err(AuthServiceError::NotFound) => {
            reject(res, ctrl, ApiError::unauthorized());

            return;
        }
        Err(AuthServiceError::Sql(source)) => {
            error!("failed to validate api token: {source}");

            reject(res, ctrl, ApiError::internal());

            return;
        }
    };

    depot.insert_user_uuid(user);

    ctrl.call_next(req, depot, res).await;
}

/// Reject requests that did not authenticate a user.
#[salvo::handler]
pub(crate) async fn require_user(depot: &mut Depot, res: &mut Response, ctrl: &mut FlowCtrl) {
    if let Err(error) = depot.user_uuid_or_401() {
        reject(res, ctrl, error);
    }
}

fn reject(res: &mut Response, ctrl: &mut FlowCtrl, error: ApiError) {
    res.render(error);
    ctrl.skip_rest();
}

fn extract_bearer_token(req: &Request) -> Option<&str> {
    let value = req.headers().get(AUTHORIZATION)?.to_str().ok()?;
    let mut parts = value.splitn(2, ' ');

    let scheme = parts.next()?;
    let token = parts.next()?.trim();

    if !scheme.eq_ignore_ascii_case("bearer") || token.is_empty() {
        return None;
    }

    Some(token)
}
