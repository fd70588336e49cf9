//! Delivery address book.
//!
//! Page-level CRUD over validated addresses. Identity is a monotonic
//! [`AddressId`] assigned at creation and never reused after deletion.
//! Validation failures leave the collection untouched.

use marigold_core::address::{Address, AddressDraft, AddressError};
use marigold_core::AddressId;
use thiserror::Error;

use crate::geocode::{GeocodeClient, GeocodeError, PositionError, PositionProvider};

/// Errors that can occur when mutating the address book.
#[derive(Debug, Error)]
pub enum AddressBookError {
    /// The referenced address does not exist.
    #[error("address {0} not found")]
    NotFound(AddressId),

    /// The submitted form failed validation.
    #[error(transparent)]
    Invalid(#[from] AddressError),
}

/// Errors that can occur when prefilling a draft from the device position.
#[derive(Debug, Error)]
pub enum PrefillError {
    /// Geolocation failed (permission denied or unsupported).
    #[error(transparent)]
    Position(#[from] PositionError),

    /// Reverse geocoding failed.
    #[error(transparent)]
    Geocode(#[from] GeocodeError),
}

/// A customer's saved delivery addresses.
#[derive(Debug)]
pub struct AddressBook {
    entries: Vec<Address>,
    next_id: u64,
}

impl Default for AddressBook {
    fn default() -> Self {
        Self::new()
    }
}

impl AddressBook {
    /// Create an empty address book.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
            next_id: 1,
        }
    }

    /// The saved addresses, in insertion order.
    #[must_use]
    pub fn list(&self) -> &[Address] {
        &self.entries
    }

    /// Look up an address by id.
    #[must_use]
    pub fn get(&self, id: AddressId) -> Option<&Address> {
        self.entries.iter().find(|address| address.id == id)
    }

    /// Validate and save a new address.
    ///
    /// # Errors
    ///
    /// Returns [`AddressBookError::Invalid`] and leaves the collection
    /// unchanged if the draft fails validation.
    pub fn add(&mut self, draft: &AddressDraft) -> Result<Address, AddressBookError> {
        let validated = draft.validate()?;

        let id = AddressId::new(self.next_id);
        self.next_id += 1;

        let address = validated.with_id(id);
        self.entries.push(address.clone());
        Ok(address)
    }

    /// Validate and replace an existing address, keeping its identity.
    ///
    /// # Errors
    ///
    /// Returns [`AddressBookError::NotFound`] if `id` is absent, or
    /// [`AddressBookError::Invalid`] on a bad draft; the collection is
    /// unchanged in both cases.
    pub fn update(
        &mut self,
        id: AddressId,
        draft: &AddressDraft,
    ) -> Result<Address, AddressBookError> {
        let validated = draft.validate()?;

        let entry = self
            .entries
            .iter_mut()
            .find(|address| address.id == id)
            .ok_or(AddressBookError::NotFound(id))?;

        *entry = validated.with_id(id);
        Ok(entry.clone())
    }

    /// Remove an address.
    ///
    /// Returns `true` if the address existed. Its id is never reused.
    pub fn remove(&mut self, id: AddressId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|address| address.id != id);
        self.entries.len() != before
    }
}

/// Build a prefilled address draft from the device's current position.
///
/// Street, pincode, city and state come from the reverse geocoder; name and
/// phone are left blank for the user to fill in.
///
/// # Errors
///
/// Returns [`PrefillError::Position`] if geolocation is denied or
/// unsupported (surfaced to the user, not fatal), or
/// [`PrefillError::Geocode`] if the lookup fails.
pub async fn draft_from_position(
    provider: &impl PositionProvider,
    geocoder: &GeocodeClient,
) -> Result<AddressDraft, PrefillError> {
    let position = provider.current_position().await?;
    let postal = geocoder.reverse(position.latitude, position.longitude).await?;
    Ok(postal.into_draft())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use secrecy::SecretString;
    use url::Url;

    use crate::config::GeocodeConfig;
    use crate::geocode::GeoPosition;

    use super::*;

    fn valid_draft(name: &str) -> AddressDraft {
        AddressDraft {
            name: name.to_owned(),
            phone: "9876543210".to_owned(),
            pincode: "560001".to_owned(),
            address: "12 MG Road".to_owned(),
            city: "Bengaluru".to_owned(),
            state: "Karnataka".to_owned(),
        }
    }

    #[test]
    fn test_add_assigns_monotonic_ids() {
        let mut book = AddressBook::new();
        let first = book.add(&valid_draft("A")).unwrap().id;
        let second = book.add(&valid_draft("B")).unwrap().id;
        assert!(second > first);
    }

    #[test]
    fn test_invalid_draft_leaves_book_unchanged() {
        let mut book = AddressBook::new();
        book.add(&valid_draft("A")).unwrap();

        let mut bad = valid_draft("B");
        bad.phone = "123".to_owned();
        assert!(matches!(
            book.add(&bad),
            Err(AddressBookError::Invalid(_))
        ));
        assert_eq!(book.list().len(), 1);
    }

    #[test]
    fn test_ids_not_reused_after_deletion() {
        let mut book = AddressBook::new();
        let first = book.add(&valid_draft("A")).unwrap().id;
        assert!(book.remove(first));

        let second = book.add(&valid_draft("B")).unwrap().id;
        assert_ne!(first, second);
        assert!(second > first);
    }

    #[test]
    fn test_remove_missing_returns_false() {
        let mut book = AddressBook::new();
        assert!(!book.remove(AddressId::new(42)));
    }

    #[test]
    fn test_update_keeps_identity() {
        let mut book = AddressBook::new();
        let id = book.add(&valid_draft("A")).unwrap().id;

        let updated = book.update(id, &valid_draft("Renamed")).unwrap();
        assert_eq!(updated.id, id);
        assert_eq!(updated.name, "Renamed");
    }

    #[test]
    fn test_update_missing_address() {
        let mut book = AddressBook::new();
        assert!(matches!(
            book.update(AddressId::new(9), &valid_draft("A")),
            Err(AddressBookError::NotFound(_))
        ));
    }

    struct FixedPosition(GeoPosition);

    impl PositionProvider for FixedPosition {
        async fn current_position(&self) -> Result<GeoPosition, PositionError> {
            Ok(self.0)
        }
    }

    struct DeniedPosition;

    impl PositionProvider for DeniedPosition {
        async fn current_position(&self) -> Result<GeoPosition, PositionError> {
            Err(PositionError::PermissionDenied)
        }
    }

    fn geocoder_for(server: &mockito::ServerGuard) -> GeocodeClient {
        GeocodeClient::new(&GeocodeConfig {
            base_url: Url::parse(&server.url()).unwrap(),
            api_key: SecretString::from("test-key".to_string()),
        })
    }

    #[tokio::test]
    async fn test_draft_from_position() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/json")
            .match_query(mockito::Matcher::Any)
            .with_status(200)
            .with_body(
                r#"{"results":[{"formatted":"12 MG Road, Bengaluru",
                    "components":{"postcode":"560001","city":"Bengaluru","state":"Karnataka"}}]}"#,
            )
            .create_async()
            .await;

        let provider = FixedPosition(GeoPosition {
            latitude: 12.97,
            longitude: 77.59,
        });

        let draft = draft_from_position(&provider, &geocoder_for(&server))
            .await
            .unwrap();

        assert_eq!(draft.pincode, "560001");
        assert_eq!(draft.city, "Bengaluru");
        assert!(draft.name.is_empty());
        assert!(draft.phone.is_empty());
    }

    #[tokio::test]
    async fn test_permission_denied_surfaces() {
        let server = mockito::Server::new_async().await;
        let err = draft_from_position(&DeniedPosition, &geocoder_for(&server))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            PrefillError::Position(PositionError::PermissionDenied)
        ));
    }
}
