use crate::{Address, AddressVersion};

/// An ordered run of addresses of a single version, produced by one
/// [`crate::BatchGenerator`] call.
///
/// Order is call order. It carries no meaning downstream but is stable for a
/// given seeded source.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Batch {
    version: AddressVersion,
    addresses: Vec<Address>,
}

impl Batch {
    pub(crate) const fn new(version: AddressVersion, addresses: Vec<Address>) -> Self {
        Self { version, addresses }
    }

    #[must_use]
    pub const fn version(&self) -> AddressVersion {
        self.version
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.addresses.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.addresses.is_empty()
    }

    #[must_use]
    pub fn addresses(&self) -> &[Address] {
        &self.addresses
    }

    pub fn iter(&self) -> core::slice::Iter<'_, Address> {
        self.addresses.iter()
    }

    #[must_use]
    pub fn into_addresses(self) -> Vec<Address> {
        self.addresses
    }
}

impl IntoIterator for Batch {
    type Item = Address;
    type IntoIter = std::vec::IntoIter<Address>;

    fn into_iter(self) -> Self::IntoIter {
        self.addresses.into_iter()
    }
}

impl<'a> IntoIterator for &'a Batch {
    type Item = &'a Address;
    type IntoIter = core::slice::Iter<'a, Address>;

    fn into_iter(self) -> Self::IntoIter {
        self.addresses.iter()
    }
}
