/// Route component constants shared across crates
pub const API_ROUTE_COMPONENT: &str = "api";
pub const API_ROUTE_PREFIX: &str = const_str::concat!("/", API_ROUTE_COMPONENT);

pub const APP_ROUTE_COMPONENT: &str = "app";
pub const APP_ROUTE_PREFIX: &str = const_str::concat!(API_ROUTE_PREFIX, "/", APP_ROUTE_COMPONENT);

pub const EVENTS_ROUTE_COMPONENT: &str = "events";
pub const EVENTS_ROUTE_PREFIX: &str =
    const_str::concat!(API_ROUTE_PREFIX, "/", EVENTS_ROUTE_COMPONENT);

/// Zone used when neither the owner profile nor the configuration names one.
pub const FALLBACK_TIMEZONE: &str = "Europe/Moscow";

/// Header carrying the owner id when authentication is delegated to a proxy.
pub const DEFAULT_OWNER_HEADER: &str = "x-owner-id";

/// Local days, today included, searched for an owner's upcoming occurrences.
pub const UPCOMING_DAYS: u32 = 7;

/// Most upcoming occurrences returned at once.
pub const UPCOMING_LIMIT: usize = 20;
