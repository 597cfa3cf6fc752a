use reqwest::ClientBuilder;
use url::Url;

/// Accepts every certificate chain presented by the server, whatever its
/// issuer, validity period or signature.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AcceptAnyCertificate;

/// Accepts every hostname, whether or not the certificate names it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AcceptAnyHostname;

impl AcceptAnyCertificate {
    pub fn apply(self, builder: ClientBuilder) -> ClientBuilder {
        builder.danger_accept_invalid_certs(true)
    }
}

impl AcceptAnyHostname {
    pub fn apply(self, builder: ClientBuilder) -> ClientBuilder {
        builder.danger_accept_invalid_hostnames(true)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TlsPolicy {
    #[default]
    Verify,
    TrustAll(AcceptAnyCertificate, AcceptAnyHostname),
}

impl TlsPolicy {
    pub const TRUST_ALL: TlsPolicy = TlsPolicy::TrustAll(AcceptAnyCertificate, AcceptAnyHostname);

    pub fn for_target(url: &Url, trust_all_certificates: bool) -> Self {
        if trust_all_certificates && url.scheme().eq_ignore_ascii_case("https") {
            Self::TRUST_ALL
        } else {
            Self::Verify
        }
    }

    pub fn is_permissive(&self) -> bool {
        matches!(self, Self::TrustAll(..))
    }

    pub fn apply(self, builder: ClientBuilder) -> ClientBuilder {
        match self {
            Self::Verify => builder,
            Self::TrustAll(certificates, hostnames) => hostnames.apply(certificates.apply(builder)),
        }
    }
}
