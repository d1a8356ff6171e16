//--------------------------------------------------------------------------------------------------
// Types
//--------------------------------------------------------------------------------------------------

/// A key pair with a public and private key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AsymmetricKey<P, S> {
    pub(crate) public: P,
    pub(crate) private: S,
}

/// A public key.
pub type PubKey<P> = AsymmetricKey<P, ()>;

//--------------------------------------------------------------------------------------------------
// Methods
//--------------------------------------------------------------------------------------------------

impl<P, S> AsymmetricKey<P, S>
where
    P: Clone,
{
    /// Returns the public half of the key.
    pub fn public_key(&self) -> PubKey<P> {
        AsymmetricKey {
            public: self.public.clone(),
            private: (),
        }
    }
}
