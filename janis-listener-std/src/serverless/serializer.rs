//! Response serializer seam.

use super::invocation::PlatformResponse;

/// Turns a [`PlatformResponse`] into whatever the platform runtime expects.
pub trait ResponseSerializer: Send + Sync {
    /// The value returned to the platform.
    type Output: Send;

    /// Serialize a response.
    fn send(&self, response: PlatformResponse) -> Self::Output;
}

/// The default serializer: hands the response to the runtime unchanged.
///
/// The runtime serializes it as
/// `{ "statusCode", "body", "headers"?, "cookies"? }`.
#[derive(Debug, Clone, Copy, Default)]
pub struct ApiResponse;

impl ResponseSerializer for ApiResponse {
    type Output = PlatformResponse;

    fn send(&self, response: PlatformResponse) -> Self::Output {
        response
    }
}

impl<F, Out> ResponseSerializer for F
where
    F: Fn(PlatformResponse) -> Out + Send + Sync,
    Out: Send,
{
    type Output = Out;

    fn send(&self, response: PlatformResponse) -> Self::Output {
        (self)(response)
    }
}
