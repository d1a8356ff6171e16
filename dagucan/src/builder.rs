use dagucan_did::{Did, Principal};
use dagucan_key::{Signature, Signer};

use crate::{
    default::DEFAULT_LIFETIME, jwt, time, Capability, Claims, Expiration, Fact, Link, Origin, Ucan,
    UcanConfig, UcanError, UcanResult, VERSION,
};

//--------------------------------------------------------------------------------------------------
// Types
//--------------------------------------------------------------------------------------------------

/// A builder for issuing UCAN tokens.
///
/// The issuer and audience must be set before a token can be issued:
///
/// ```ignore
/// let ucan = Ucan::builder()
///     .issuer(&alice)
///     .audience(&bob)
///     .capabilities([Capability::new("mailto:alice@example.com", "msg/send")?])
///     .issue()
///     .await?;
/// ```
pub struct UcanBuilder<I = (), A = ()> {
    issuer: I,
    audience: A,
    capabilities: Vec<Capability>,
    expiration: Option<Expiration>,
    lifetime: u64,
    version: String,
    not_before: Option<i64>,
    nonce: Option<String>,
    facts: Vec<Fact>,
    proofs: Vec<Link>,
}

//--------------------------------------------------------------------------------------------------
// Methods
//--------------------------------------------------------------------------------------------------

impl<I, A> UcanBuilder<I, A> {
    /// Sets the issuer, which signs the token.
    pub fn issuer<S>(self, issuer: &S) -> UcanBuilder<&S, A>
    where
        S: Signer + Principal,
    {
        UcanBuilder {
            issuer,
            audience: self.audience,
            capabilities: self.capabilities,
            expiration: self.expiration,
            lifetime: self.lifetime,
            version: self.version,
            not_before: self.not_before,
            nonce: self.nonce,
            facts: self.facts,
            proofs: self.proofs,
        }
    }

    /// Sets the audience the token is delegated to.
    pub fn audience(self, audience: impl Principal) -> UcanBuilder<I, String> {
        UcanBuilder {
            issuer: self.issuer,
            audience: audience.did(),
            capabilities: self.capabilities,
            expiration: self.expiration,
            lifetime: self.lifetime,
            version: self.version,
            not_before: self.not_before,
            nonce: self.nonce,
            facts: self.facts,
            proofs: self.proofs,
        }
    }

    /// Sets the capabilities granted by the token.
    pub fn capabilities(mut self, capabilities: impl IntoIterator<Item = Capability>) -> Self {
        self.capabilities = capabilities.into_iter().collect();
        self
    }

    /// Sets when the token expires. Defaults to the configured lifetime from now.
    pub fn expiration(mut self, expiration: impl Into<Expiration>) -> Self {
        self.expiration = Some(expiration.into());
        self
    }

    /// Sets the number of seconds from issuance until the token expires.
    pub fn lifetime(mut self, lifetime: u64) -> Self {
        self.lifetime = lifetime;
        self
    }

    /// Applies the lifetime and version of a configuration.
    pub fn config(mut self, config: &UcanConfig) -> Self {
        self.lifetime = config.lifetime;
        self.version.clone_from(&config.version);
        self
    }

    /// Sets the time before which the token is not valid.
    pub fn not_before(mut self, not_before: i64) -> Self {
        self.not_before = Some(not_before);
        self
    }

    /// Sets a nonce to make the token unique.
    pub fn nonce(mut self, nonce: impl Into<String>) -> Self {
        self.nonce = Some(nonce.into());
        self
    }

    /// Sets the facts asserted by the issuer.
    pub fn facts(mut self, facts: impl IntoIterator<Item = Fact>) -> Self {
        self.facts = facts.into_iter().collect();
        self
    }

    /// Sets links to the tokens delegating the capabilities to the issuer.
    pub fn proofs(mut self, proofs: impl IntoIterator<Item = Link>) -> Self {
        self.proofs = proofs.into_iter().collect();
        self
    }
}

impl<'a, S> UcanBuilder<&'a S, String>
where
    S: Signer + Principal,
{
    /// Signs the claims with the issuer and returns the CBOR-native token.
    pub async fn issue(self) -> UcanResult<Ucan> {
        let issuer_did = self.issuer.did();
        let issuer = Did::parse(&issuer_did).map_err(|source| UcanError::InvalidIssuer {
            did: issuer_did,
            source,
        })?;

        let audience = Did::parse(&self.audience).map_err(|source| UcanError::InvalidAudience {
            did: self.audience.clone(),
            source,
        })?;

        for capability in self.capabilities.iter() {
            capability.validate()?;
        }

        let expiration = match self.expiration {
            Some(expiration) => expiration,
            None => {
                let lifetime = i64::try_from(self.lifetime).map_err(|_| {
                    UcanError::InvalidConfig(format!("lifetime {} is out of range", self.lifetime))
                })?;
                Expiration::Finite(time::now().saturating_add(lifetime))
            }
        };

        let claims = Claims {
            version: self.version,
            issuer,
            audience,
            capabilities: self.capabilities,
            expiration,
            not_before: self.not_before,
            nonce: self.nonce,
            facts: self.facts,
            proofs: self.proofs,
        };

        let algorithm = self.issuer.signature_algorithm();
        let payload = jwt::format_payload(&claims, &algorithm);
        let raw = self.issuer.sign(payload.as_bytes()).await?;

        tracing::debug!(
            issuer = %claims.issuer,
            audience = %claims.audience,
            %algorithm,
            expiration = %claims.expiration,
            "issued ucan"
        );

        Ok(Ucan {
            claims,
            signature: Signature::new(algorithm, raw),
            origin: Origin::Cbor,
        })
    }
}

//--------------------------------------------------------------------------------------------------
// Trait Implementations
//--------------------------------------------------------------------------------------------------

impl Default for UcanBuilder {
    fn default() -> Self {
        UcanBuilder {
            issuer: (),
            audience: (),
            capabilities: Vec::new(),
            expiration: None,
            lifetime: DEFAULT_LIFETIME,
            version: VERSION.to_string(),
            not_before: None,
            nonce: None,
            facts: Vec::new(),
            proofs: Vec::new(),
        }
    }
}

//--------------------------------------------------------------------------------------------------
// Tests
//--------------------------------------------------------------------------------------------------
