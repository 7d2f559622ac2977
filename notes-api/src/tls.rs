//! TLS for PostgreSQL connections.
//!
//! Whether TLS is attempted or required is decided by `sslmode` in
//! `DATABASE_URL` (`prefer` when unset). `NOTES_DB_SSL` picks how the
//! server certificate is checked once TLS is negotiated.

use std::sync::Arc;

use rustls::client::danger::{HandshakeSignatureValid, ServerCertVerified, ServerCertVerifier};
use rustls::crypto::{verify_tls12_signature, verify_tls13_signature, CryptoProvider};
use rustls::pki_types::{CertificateDer, ServerName, UnixTime};
use rustls::{ClientConfig, DigitallySignedStruct, RootCertStore, SignatureScheme};
use tokio_postgres_rustls::MakeRustlsConnect;

use crate::config::ConfigError;

/// Certificate handling for database connections.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DbSslMode {
    /// Plain TCP only.
    Disable,
    /// Encrypt, but accept any server certificate.
    #[default]
    NoVerify,
    /// Encrypt and verify against the Mozilla root set.
    Verify,
}

impl DbSslMode {
    pub(crate) fn parse(raw: &str) -> Result<Self, ConfigError> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "disable" | "off" | "false" => Ok(Self::Disable),
            "no-verify" | "insecure" | "require" => Ok(Self::NoVerify),
            "verify" | "verify-full" => Ok(Self::Verify),
            other => Err(ConfigError::InvalidValue {
                field: "NOTES_DB_SSL",
                value: other.to_string(),
                reason: "expected 'disable', 'no-verify' or 'verify'".to_string(),
            }),
        }
    }
}

/// Build the rustls connector for `mode`, or `None` when TLS is disabled.
pub(crate) fn make_connector(mode: DbSslMode) -> Result<Option<MakeRustlsConnect>, rustls::Error> {
    if mode == DbSslMode::Disable {
        return Ok(None);
    }

    let provider = Arc::new(rustls::crypto::ring::default_provider());
    let builder = ClientConfig::builder_with_provider(provider.clone())
        .with_safe_default_protocol_versions()?;

    let config = if mode == DbSslMode::Verify {
        let roots = RootCertStore {
            roots: webpki_roots::TLS_SERVER_ROOTS.to_vec(),
        };
        builder.with_root_certificates(roots).with_no_client_auth()
    } else {
        builder
            .dangerous()
            .with_custom_certificate_verifier(Arc::new(AcceptAnyServerCert(provider)))
            .with_no_client_auth()
    };

    Ok(Some(MakeRustlsConnect::new(config)))
}

/// Skips chain and hostname checks. Handshake signatures are still verified.
#[derive(Debug)]
struct AcceptAnyServerCert(Arc<CryptoProvider>);

impl ServerCertVerifier for AcceptAnyServerCert {
    fn verify_server_cert(
        &self,
        _end_entity: &CertificateDer<'_>,
        _intermediates: &[CertificateDer<'_>],
        _server_name: &ServerName<'_>,
        _ocsp_response: &[u8],
        _now: UnixTime,
    ) -> Result<ServerCertVerified, rustls::Error> {
        Ok(ServerCertVerified::assertion())
    }

    fn verify_tls12_signature(
        &self,
        message: &[u8],
        cert: &CertificateDer<'_>,
        dss: &DigitallySignedStruct,
    ) -> Result<HandshakeSignatureValid, rustls::Error> {
        verify_tls12_signature(message, cert, dss, &self.0.signature_verification_algorithms)
    }

    fn verify_tls13_signature(
        &self,
        message: &[u8],
        cert: &CertificateDer<'_>,
        dss: &DigitallySignedStruct,
    ) -> Result<HandshakeSignatureValid, rustls::Error> {
        verify_tls13_signature(message, cert, dss, &self.0.signature_verification_algorithms)
    }

    fn supported_verify_schemes(&self) -> Vec<SignatureScheme> {
        self.0.signature_verification_algorithms.supported_schemes()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ssl_mode_parse() {
        assert_eq!(DbSslMode::parse("disable"), Ok(DbSslMode::Disable));
        assert_eq!(DbSslMode::parse(" No-Verify "), Ok(DbSslMode::NoVerify));
        assert_eq!(DbSslMode::parse("verify-full"), Ok(DbSslMode::Verify));
        assert!(matches!(
            DbSslMode::parse("sometimes"),
            Err(ConfigError::InvalidValue {
                field: "NOTES_DB_SSL",
                ..
            })
        ));
    }

    #[test]
    fn test_connector_per_mode() -> Result<(), rustls::Error> {
        assert!(make_connector(DbSslMode::Disable)?.is_none());
        assert!(make_connector(DbSslMode::NoVerify)?.is_some());
        assert!(make_connector(DbSslMode::Verify)?.is_some());
        Ok(())
    }

    #[test]
    fn test_default_mode_encrypts_without_verifying() {
        assert_eq!(DbSslMode::default(), DbSslMode::NoVerify);
    }
}
