//! Host network status codes.
//!
//! Callback-completed socket hosts report connect results as integer status
//! codes: `0` for success and negative values for failures. This module maps
//! the codes a socket host can produce to their symbolic names so failures
//! read well in logs and error messages.

use std::borrow::Cow;

/// Status code reported by a host on success.
pub const OK: i32 = 0;

/// The peer actively refused the connection.
pub const CONNECTION_REFUSED: i32 = -102;

/// The host name could not be resolved.
pub const NAME_NOT_RESOLVED: i32 = -105;

/// The host has no network connectivity.
pub const INTERNET_DISCONNECTED: i32 = -106;

/// Returns the symbolic name of a known status code.
#[must_use]
pub const fn name(code: i32) -> Option<&'static str> {
    match code {
        0 => Some("OK"),
        -1 => Some("IO_PENDING"),
        -2 => Some("FAILED"),
        -3 => Some("ABORTED"),
        -4 => Some("INVALID_ARGUMENT"),
        -5 => Some("INVALID_HANDLE"),
        -6 => Some("FILE_NOT_FOUND"),
        -7 => Some("TIMED_OUT"),
        -8 => Some("FILE_TOO_BIG"),
        -9 => Some("UNEXPECTED"),
        -10 => Some("ACCESS_DENIED"),
        -11 => Some("NOT_IMPLEMENTED"),
        -12 => Some("INSUFFICIENT_RESOURCES"),
        -13 => Some("OUT_OF_MEMORY"),
        -14 => Some("UPLOAD_FILE_CHANGED"),
        -15 => Some("SOCKET_NOT_CONNECTED"),
        -16 => Some("FILE_EXISTS"),
        -17 => Some("FILE_PATH_TOO_LONG"),
        -18 => Some("FILE_NO_SPACE"),
        -19 => Some("FILE_VIRUS_INFECTED"),
        -20 => Some("BLOCKED_BY_CLIENT"),
        -100 => Some("CONNECTION_CLOSED"),
        -101 => Some("CONNECTION_RESET"),
        -102 => Some("CONNECTION_REFUSED"),
        -103 => Some("CONNECTION_ABORTED"),
        -104 => Some("CONNECTION_FAILED"),
        -105 => Some("NAME_NOT_RESOLVED"),
        -106 => Some("INTERNET_DISCONNECTED"),
        -107 => Some("SSL_PROTOCOL_ERROR"),
        -108 => Some("ADDRESS_INVALID"),
        -109 => Some("ADDRESS_UNREACHABLE"),
        -110 => Some("SSL_CLIENT_AUTH_CERT_NEEDED"),
        -111 => Some("TUNNEL_CONNECTION_FAILED"),
        -112 => Some("NO_SSL_VERSIONS_ENABLED"),
        -113 => Some("SSL_VERSION_OR_CIPHER_MISMATCH"),
        -114 => Some("SSL_RENEGOTIATION_REQUESTED"),
        -115 => Some("PROXY_AUTH_UNSUPPORTED"),
        -116 => Some("CERT_ERROR_IN_SSL_RENEGOTIATION"),
        -117 => Some("BAD_SSL_CLIENT_AUTH_CERT"),
        -118 => Some("CONNECTION_TIMED_OUT"),
        -119 => Some("HOST_RESOLVER_QUEUE_TOO_LARGE"),
        -120 => Some("SOCKS_CONNECTION_FAILED"),
        -121 => Some("SOCKS_CONNECTION_HOST_UNREACHABLE"),
        -122 => Some("NPN_NEGOTIATION_FAILED"),
        -123 => Some("SSL_NO_RENEGOTIATION"),
        -124 => Some("WINSOCK_UNEXPECTED_WRITTEN_BYTES"),
        -125 => Some("SSL_DECOMPRESSION_FAILURE_ALERT"),
        -126 => Some("SSL_BAD_RECORD_MAC_ALERT"),
        -127 => Some("PROXY_AUTH_REQUESTED"),
        -128 => Some("SSL_UNSAFE_NEGOTIATION"),
        -129 => Some("SSL_WEAK_SERVER_EPHEMERAL_DH_KEY"),
        -130 => Some("PROXY_CONNECTION_FAILED"),
        -131 => Some("MANDATORY_PROXY_CONFIGURATION_FAILED"),
        -132 => Some("ESET_ANTI_VIRUS_SSL_INTERCEPTION"),
        -133 => Some("PRECONNECT_MAX_SOCKET_LIMIT"),
        -134 => Some("SSL_CLIENT_AUTH_PRIVATE_KEY_ACCESS_DENIED"),
        -135 => Some("SSL_CLIENT_AUTH_CERT_NO_PRIVATE_KEY"),
        -136 => Some("PROXY_CERTIFICATE_INVALID"),
        -137 => Some("NAME_RESOLUTION_FAILED"),
        -138 => Some("NETWORK_ACCESS_DENIED"),
        -139 => Some("TEMPORARILY_THROTTLED"),
        -140 => Some("HTTPS_PROXY_TUNNEL_RESPONSE"),
        -141 => Some("SSL_CLIENT_AUTH_SIGNATURE_FAILED"),
        -142 => Some("MSG_TOO_BIG"),
        -144 => Some("LIMIT_VIOLATION"),
        -145 => Some("WS_PROTOCOL_ERROR"),
        -146 => Some("PROTOCOL_SWITCHED"),
        -147 => Some("ADDRESS_IN_USE"),
        -148 => Some("SSL_HANDSHAKE_NOT_COMPLETED"),
        -149 => Some("SSL_BAD_PEER_PUBLIC_KEY"),
        -150 => Some("SSL_PINNED_KEY_NOT_IN_CERT_CHAIN"),
        -151 => Some("CLIENT_AUTH_CERT_TYPE_UNSUPPORTED"),
        -152 => Some("ORIGIN_BOUND_CERT_GENERATION_TYPE_MISMATCH"),
        -800 => Some("DNS_MALFORMED_RESPONSE"),
        -801 => Some("DNS_SERVER_REQUIRES_TCP"),
        -802 => Some("DNS_SERVER_FAILED"),
        -803 => Some("DNS_TIMED_OUT"),
        -804 => Some("DNS_CACHE_MISS"),
        _ => None,
    }
}

/// Describes a status code, falling back to a generic message for codes
/// outside the table.
#[must_use]
pub fn describe(code: i32) -> Cow<'static, str> {
    match name(code) {
        Some(name) => Cow::Borrowed(name),
        None => Cow::Owned(format!("Unknown network error #{code}")),
    }
}

/// Returns true if the status signals success.
#[inline]
#[must_use]
pub const fn is_ok(code: i32) -> bool {
    code == OK
}
