//! Response compression layer.

use tower_http::compression::CompressionLayer;

/// Gzip for JSON responses.
pub fn build_compression_layer() -> CompressionLayer {
    CompressionLayer::new().gzip(true)
}
