mod api;
mod endpoint;
mod fetcher;
mod navigation;
mod transport;

pub use {
    api::{BackendApi, SeriesError},
    endpoint::{EndpointResolver, Endpoints},
    fetcher::{ApiResponse, FetchFailure, FetchOptions, ResilientFetcher, ServedBy},
    navigation::{LaunchContext, LoginNavigator, NavigationContext},
    transport::{HttpMethod, HttpRequest, HttpResponse, HttpTransport, ReqwestTransport, TransportError},
};
