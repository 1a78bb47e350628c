use std::fmt;

use super::{Descriptor, ParamKind, SenderKind};

/// Structural identity of one command overload
///
/// Two descriptors collide only when the name, the sender constraint and the
/// full parameter sequence are all equal. Compared by value.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SignatureKey {
    name: String,
    sender: SenderKind,
    params: Vec<ParamKind>,
}

impl SignatureKey {
    pub fn new(name: impl Into<String>, sender: SenderKind, params: Vec<ParamKind>) -> Self {
        Self {
            name: name.into(),
            sender,
            params,
        }
    }

    pub fn of(descriptor: &Descriptor) -> Self {
        Self::new(descriptor.name.clone(), descriptor.sender, descriptor.params.clone())
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn sender(&self) -> SenderKind {
        self.sender
    }

    pub fn params(&self) -> &[ParamKind] {
        &self.params
    }
}

impl fmt::Display for SignatureKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let params: Vec<&str> = self.params.iter().map(|p| p.as_str()).collect();
        write!(f, "{}[{}]({})", self.name, self.sender.as_str(), params.join(", "))
    }
}
