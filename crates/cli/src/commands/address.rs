//! Address form helper commands.

use marigold_client::address_book::draft_from_position;
use marigold_client::geocode::{GeoPosition, PositionError, PositionProvider};
use marigold_client::{ClientConfig, GeocodeClient};
use marigold_core::address::AddressDraft;

use super::CommandError;

/// Validate an address form and report the outcome.
pub fn validate(
    name: &str,
    phone: &str,
    pincode: &str,
    address: &str,
    city: &str,
    state: &str,
) -> Result<(), CommandError> {
    let draft = AddressDraft {
        name: name.to_owned(),
        phone: phone.to_owned(),
        pincode: pincode.to_owned(),
        address: address.to_owned(),
        city: city.to_owned(),
        state: state.to_owned(),
    };

    let validated = draft.validate()?;

    tracing::info!("Address is valid:");
    tracing::info!("  {}", validated.name);
    tracing::info!("  {}", validated.address);
    tracing::info!(
        "  {}, {} {}",
        validated.city,
        validated.state,
        validated.pincode
    );
    tracing::info!("  Phone: {}", validated.phone);
    Ok(())
}

/// Command-line stand-in for the device geolocation capability.
struct CoordinateArgs(GeoPosition);

impl PositionProvider for CoordinateArgs {
    async fn current_position(&self) -> Result<GeoPosition, PositionError> {
        Ok(self.0)
    }
}

/// Prefill an address draft from GPS coordinates.
pub async fn prefill(lat: f64, lon: f64) -> Result<(), CommandError> {
    let config = ClientConfig::from_env()?;
    let geocode = config.geocode.ok_or(CommandError::GeocodeUnavailable)?;

    let provider = CoordinateArgs(GeoPosition {
        latitude: lat,
        longitude: lon,
    });
    let geocoder = GeocodeClient::new(&geocode);

    let draft = draft_from_position(&provider, &geocoder).await?;

    tracing::info!("Prefilled draft (name and phone left for the user):");
    tracing::info!("  Address: {}", draft.address);
    tracing::info!("  City: {}", draft.city);
    tracing::info!("  State: {}", draft.state);
    tracing::info!("  Pincode: {}", draft.pincode);
    Ok(())
}
