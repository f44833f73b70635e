//! TLS setup for PostgreSQL connections.

use rustls::ClientConfig;
use tokio_postgres_rustls::MakeRustlsConnect;
use tracing::info;

/// Build a rustls connector that verifies the server certificate and host
/// name against the bundled webpki root store.
pub fn verified_connector() -> MakeRustlsConnect {
    let mut root_store = rustls::RootCertStore::empty();
    root_store.extend(webpki_roots::TLS_SERVER_ROOTS.iter().cloned());

    info!("ssl_mode=verify-full: certificate verification enabled");
    let config = ClientConfig::builder()
        .with_root_certificates(root_store)
        .with_no_client_auth();

    MakeRustlsConnect::new(config)
}
