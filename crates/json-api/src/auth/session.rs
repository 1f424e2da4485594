//! Guest session middleware.

use salvo::prelude::*;
use tracing::debug;

use auvea_app::domain::carts::data::SessionToken;

use crate::extensions::*;

/// Header carrying the client-generated guest session token.
pub(crate) const SESSION_HEADER: &str = "x-session-id";

/// Record a well-formed `X-Session-ID` in the depot.
///
/// Malformed tokens are ignored, so the request proceeds as if none was sent.
#[salvo::handler]
pub(crate) async fn handler(
    req: &mut Request,
    depot: &mut Depot,
    res: &mut Response,
    ctrl: &mut FlowCtrl,
) {
    if let Some(raw) = req.header::<String>(SESSION_HEADER) {
        match SessionToken::parse(&raw) {
            Ok(session) => depot.insert_session_token(session),
            Err(error) => debug!("ignoring session header: {error}"),
        }
    }

    ctrl.call_next(req, depot, res).await;
}
