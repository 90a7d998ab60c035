/// Network adapters for external API calls
mod http_gateway;

pub use http_gateway::{HttpInfrastructureGateway, DEFAULT_HTTP_TIMEOUT};
