use salvo::Depot;

use crate::config::{OwnerSource, get_owner_source_from_depot};
use crate::error::{AppError, AppResult};
use kalends_core::model::OwnerId;

/// Depot key of the authenticated owner id.
pub const OWNER_ID_KEY: &str = "owner_id";

/// ## Summary
/// Authentication middleware that resolves the requesting owner and stores
/// it in the depot.
///
/// In `single_user` mode every request acts as the configured owner. In
/// `proxy` mode the gateway in front of the server has already verified the
/// caller and passes the owner id in a header.
///
/// ## Errors
/// Responds 401 if the header is missing or not an owner id, and 500 if the
/// owner source is missing from the depot.
pub struct AuthMiddleware;

#[salvo::async_trait]
impl salvo::Handler for AuthMiddleware {
    #[tracing::instrument(skip(self, req, depot, res, ctrl), fields(
        method = %req.method(),
        path = %req.uri().path()
    ))]
    async fn handle(
        &self,
        req: &mut salvo::Request,
        depot: &mut Depot,
        res: &mut salvo::Response,
        ctrl: &mut salvo::FlowCtrl,
    ) {
        tracing::trace!("Authenticating request");

        let owner = get_owner_source_from_depot(depot).and_then(|source| resolve_owner(req, &source));
        match owner {
            Ok(owner_id) => {
                tracing::debug!(owner_id, "Owner authenticated");
                depot.insert(OWNER_ID_KEY, owner_id);
            }
            Err(e) => {
                e.render_into(res);
                ctrl.skip_rest();
            }
        }
    }
}

fn resolve_owner(req: &salvo::Request, source: &OwnerSource) -> AppResult<OwnerId> {
    match source {
        OwnerSource::Fixed(owner_id) => Ok(*owner_id),
        OwnerSource::Header(header) => {
            let value = req
                .header::<String>(header.as_str())
                .ok_or_else(|| AppError::Unauthorized(format!("missing {header} header")))?;
            value
                .trim()
                .parse::<OwnerId>()
                .map_err(|_err| AppError::Unauthorized(format!("invalid {header} header")))
        }
    }
}

/// ## Summary
/// Retrieves the authenticated owner id from the depot.
///
/// ## Errors
/// Returns `Unauthorized` if the middleware did not run or rejected the
/// request.
pub fn get_owner_from_depot(depot: &Depot) -> AppResult<OwnerId> {
    depot
        .get::<OwnerId>(OWNER_ID_KEY)
        .copied()
        .map_err(|_err| AppError::Unauthorized("no authenticated owner".to_string()))
}
