use salvo::async_trait;

use crate::error::AppResult;
use kalends_core::error::CoreError;
use kalends_service::calendar::CalendarService;

/// Makes the calendar engine, and through it the event store, available to
/// handlers.
pub struct CalendarHandler {
    pub service: CalendarService,
}

#[async_trait]
impl salvo::Handler for CalendarHandler {
    #[tracing::instrument(skip(self, _req, depot, _res, _ctrl))]
    async fn handle(
        &self,
        _req: &mut salvo::Request,
        depot: &mut salvo::Depot,
        _res: &mut salvo::Response,
        _ctrl: &mut salvo::FlowCtrl,
    ) {
        depot.inject(self.service.clone());
    }
}

/// ## Summary
/// Retrieves the calendar service from the depot.
///
/// ## Errors
/// Returns an error if the service is not found in the depot.
pub fn get_calendar_from_depot(depot: &salvo::Depot) -> AppResult<&CalendarService> {
    depot
        .obtain::<CalendarService>()
        .map_err(|_err| CoreError::InvariantViolation("Calendar service not found in depot").into())
}
