//! Account balances: owned mosaics with their display divisibility.

use serde::Serialize;

use crate::display::format_quantity;
use crate::nis::api::NisApi;
use crate::nis::error::{AssetLookupError, RemoteError};
use crate::types::{AssetId, MAX_DIVISIBILITY, XEM_DIVISIBILITY};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Balance {
    pub asset: AssetId,
    /// Quantity in the asset's smallest unit.
    pub quantity: u64,
    pub divisibility: u32,
}

impl Balance {
    pub fn display_quantity(&self) -> String {
        format_quantity(self.quantity, self.divisibility)
    }
}

/// Decimal places of `asset`, looked up in its namespace's definitions.
pub async fn resolve_divisibility<C: NisApi>(
    client: &C,
    asset: &AssetId,
) -> Result<u32, AssetLookupError> {
    if asset.is_xem() {
        return Ok(XEM_DIVISIBILITY);
    }

    let defs = client
        .fetch_mosaic_definitions(&asset.namespace)
        .await
        .map_err(|source| AssetLookupError::Remote {
            asset: asset.clone(),
            source,
        })?;

    let divisibility = defs
        .into_iter()
        .find(|d| d.asset == *asset)
        .map(|d| d.divisibility.unwrap_or(0))
        .ok_or_else(|| AssetLookupError::NotFound(asset.clone()))?;

    if divisibility > MAX_DIVISIBILITY {
        return Err(AssetLookupError::Invalid {
            asset: asset.clone(),
            divisibility,
        });
    }

    Ok(divisibility)
}

/// Same as [`resolve_divisibility`] but falls back to 0 decimals.
pub async fn divisibility_or_raw<C: NisApi>(client: &C, asset: &AssetId) -> u32 {
    match resolve_divisibility(client, asset).await {
        Ok(d) => d,
        Err(e) => {
            log::warn!("[BALANCES] {}, showing raw quantity", e);
            0
        }
    }
}

/// Balances of every mosaic `address` owns, or only of `filter`.
///
/// Only the owned-mosaics request can fail the call; divisibility lookups
/// degrade to raw quantities.
pub async fn fetch_balances<C: NisApi>(
    client: &C,
    address: &str,
    filter: Option<&AssetId>,
) -> Result<Vec<Balance>, RemoteError> {
    let owned = client.fetch_owned_mosaics(address).await?;
    log::debug!("[BALANCES] {} owns {} mosaics", address, owned.len());

    let mut balances = Vec::new();
    for mosaic in owned {
        if filter.is_some_and(|f| *f != mosaic.asset) {
            continue;
        }

        let divisibility = divisibility_or_raw(client, &mosaic.asset).await;
        balances.push(Balance {
            asset: mosaic.asset,
            quantity: mosaic.quantity,
            divisibility,
        });
    }

    Ok(balances)
}
