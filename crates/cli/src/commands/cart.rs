//! Cart commands against a file-backed cart record.
//!
//! # Usage
//!
//! ```bash
//! pc-cli add --id sku-1 --title "Rivatti chair" --price 400.00
//! pc-cli increment sku-1
//! pc-cli summary
//! pc-cli show
//! ```
//!
//! # Environment Variables
//!
//! - `CART_STORAGE_DIR` - Directory holding the cart record
//! - `CART_STORAGE_KEY` - Key of the cart record
//! - `CART_CURRENCY` - Display currency for `summary`

use pocket_cart::{
    CartConfig, CartStore, CartSummary, CurrencyFormatter, FileStorage, Hydration,
    KeyValueStorage, StorageError,
};
use pocket_cart_core::{CartCommand, LineItemError, NewLineItem, ProductId};
use rust_decimal::Decimal;
use thiserror::Error;

/// Errors that can occur during cart commands.
#[derive(Debug, Error)]
pub enum CliError {
    /// The price is not a decimal number.
    #[error("Invalid price: {0}")]
    InvalidPrice(String),

    /// The product could not be built.
    #[error("Invalid product: {0}")]
    InvalidProduct(#[from] LineItemError),

    /// The stored record exists but could not be read.
    #[error("Cannot read cart record {0}; refusing to continue")]
    Unreadable(String),

    /// Reading or writing the record failed.
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// The cart could not be rendered.
    #[error("Failed to render cart: {0}")]
    Render(#[from] serde_json::Error),
}

/// Open the configured cart and hydrate it.
///
/// # Errors
///
/// Returns [`CliError::Unreadable`] if the record could not be read, so no
/// command writes over it.
async fn open(config: &CartConfig) -> Result<CartStore<FileStorage>, CliError> {
    let storage = FileStorage::new(&config.storage_dir);
    let store = CartStore::new(storage, config.storage_key.clone());
    match store.hydrate().await {
        Hydration::Discarded => tracing::warn!(
            dir = %config.storage_dir.display(),
            "Stored cart was unreadable; starting from an empty cart"
        ),
        Hydration::ReadFailed => {
            return Err(CliError::Unreadable(config.storage_key.clone()));
        }
        _ => {}
    }
    Ok(store)
}

/// Apply one command and make sure it reached storage.
///
/// # Errors
///
/// Returns an error if the record could not be read or written.
pub async fn apply(config: &CartConfig, command: CartCommand) -> Result<String, CliError> {
    let store = open(config).await?;
    store.dispatch(command).await;
    if store.has_unsaved_changes() {
        store.flush().await?;
    }
    Ok(render_summary(config, &store))
}

/// Build an add command from CLI arguments.
///
/// # Errors
///
/// Returns an error if the id is empty or the price is not a non-negative decimal.
pub fn add_command(
    id: &str,
    title: &str,
    image_url: &str,
    price: &str,
) -> Result<CartCommand, CliError> {
    let unit_price: Decimal = price
        .trim()
        .parse()
        .map_err(|_| CliError::InvalidPrice(price.to_owned()))?;
    let item = NewLineItem::new(ProductId::parse(id)?, title, image_url, unit_price)?;
    Ok(CartCommand::Add(item))
}

/// Parse a product id argument.
///
/// # Errors
///
/// Returns an error if the id is empty.
pub fn product_id(id: &str) -> Result<ProductId, CliError> {
    Ok(ProductId::parse(id)?)
}

/// Render the stored cart as pretty JSON.
///
/// # Errors
///
/// Returns an error if the record cannot be read or the cart cannot be
/// serialized.
pub async fn show(config: &CartConfig) -> Result<String, CliError> {
    let store = open(config).await?;
    Ok(serde_json::to_string_pretty(&*store.products())?)
}

/// Render the floating cart summary for the stored cart.
///
/// # Errors
///
/// Returns an error if the record cannot be read.
pub async fn summary(config: &CartConfig) -> Result<String, CliError> {
    let store = open(config).await?;
    Ok(render_summary(config, &store))
}

/// Delete the stored cart record.
///
/// # Errors
///
/// Returns an error if the record could not be removed.
pub async fn clear(config: &CartConfig) -> Result<(), CliError> {
    let storage = FileStorage::new(&config.storage_dir);
    storage.remove_item(&config.storage_key).await?;
    tracing::info!(key = %config.storage_key, "Cart cleared");
    Ok(())
}

fn render_summary(config: &CartConfig, store: &CartStore<FileStorage>) -> String {
    let summary = CartSummary::from_cart(
        &store.products(),
        &CurrencyFormatter::new(config.currency),
    );
    format!("{} - {}", summary.item_label(), summary.formatted_total)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pocket_cart_core::CurrencyCode;

    use super::*;

    fn config(dir: &tempfile::TempDir) -> CartConfig {
        CartConfig {
            storage_dir: dir.path().to_path_buf(),
            ..CartConfig::default()
        }
    }

    #[tokio::test]
    async fn test_add_increment_decrement() {
        let dir = tempfile::tempdir().unwrap();
        let config = config(&dir);

        let out = apply(&config, add_command("A", "Chair", "", "10").unwrap())
            .await
            .unwrap();
        assert_eq!(out, "1 item - $10.00");

        let out = apply(&config, CartCommand::Increment(product_id("A").unwrap()))
            .await
            .unwrap();
        assert_eq!(out, "2 items - $20.00");

        apply(&config, CartCommand::Decrement(product_id("A").unwrap()))
            .await
            .unwrap();
        let out = apply(&config, CartCommand::Decrement(product_id("A").unwrap()))
            .await
            .unwrap();
        assert_eq!(out, "0 items - $0.00");
        assert_eq!(show(&config).await.unwrap(), "[]");
    }

    #[tokio::test]
    async fn test_summary_uses_configured_currency() {
        let dir = tempfile::tempdir().unwrap();
        let config = CartConfig {
            currency: CurrencyCode::BRL,
            ..config(&dir)
        };

        apply(&config, add_command("A", "Chair", "", "1234.5").unwrap())
            .await
            .unwrap();
        assert_eq!(summary(&config).await.unwrap(), "1 item - R$ 1.234,50");
    }

    #[tokio::test]
    async fn test_clear_removes_record() {
        let dir = tempfile::tempdir().unwrap();
        let config = config(&dir);

        apply(&config, add_command("A", "Chair", "", "3").unwrap())
            .await
            .unwrap();
        clear(&config).await.unwrap();
        assert_eq!(summary(&config).await.unwrap(), "0 items - $0.00");
    }

    #[tokio::test]
    async fn test_unreadable_record_is_not_overwritten() {
        let dir = tempfile::tempdir().unwrap();
        let config = config(&dir);
        let record = dir.path().join(format!("{}.json", config.storage_key));
        std::fs::create_dir(&record).unwrap();

        let result = apply(&config, add_command("A", "Chair", "", "3").unwrap()).await;
        assert!(matches!(result, Err(CliError::Unreadable(_))));
        assert!(matches!(summary(&config).await, Err(CliError::Unreadable(_))));
        assert!(record.is_dir());
    }

    #[test]
    fn test_add_command_validation() {
        assert!(matches!(
            add_command("A", "t", "", "ten"),
            Err(CliError::InvalidPrice(_))
        ));
        assert!(matches!(
            add_command("A", "t", "", "-1"),
            Err(CliError::InvalidProduct(LineItemError::NegativePrice(_)))
        ));
        assert!(matches!(
            add_command("", "t", "", "1"),
            Err(CliError::InvalidProduct(LineItemError::EmptyId))
        ));
    }
}
