//! # Product Catalog
//!
//! CRUD over products plus the sole guarded mutation point for stock.
//!
//! ## Trust Boundary
//! `adjust_stock` does not re-validate: checkout and the cart have
//! already proven the quantities fit (and refund/void only add stock
//! back). The catalog's own guarded entry point is `set_stock`, the
//! manual override, which requires a reason and a non-negative level.

use chrono::{DateTime, Utc};

use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::types::{Product, ProductCategory};
use crate::validation;

/// Input for creating or replacing a product.
#[derive(Debug, Clone)]
pub struct NewProduct {
    pub name: String,
    pub category: ProductCategory,
    pub price: Money,
    pub stock: i64,
    pub image: Option<String>,
    pub barcode: Option<String>,
}

/// The list of sellable products.
#[derive(Debug, Clone, Default)]
pub struct ProductCatalog {
    products: Vec<Product>,
}

impl ProductCatalog {
    pub fn new() -> Self {
        ProductCatalog::default()
    }

    /// Restores the catalog from persisted/imported data.
    pub fn replace_all(&mut self, products: Vec<Product>) {
        self.products = products;
    }

    /// Creates a product with the given (pre-minted) id.
    ///
    /// Rejects empty names, negative prices or stock, and oversized
    /// images.
    pub fn create(&mut self, new: NewProduct, id: i64, now: DateTime<Utc>) -> CoreResult<&Product> {
        Self::validate(&new)?;

        self.products.push(Product {
            id,
            name: new.name.trim().to_string(),
            category: new.category,
            price: new.price,
            stock: new.stock,
            image: new.image,
            barcode: new.barcode.as_deref().and_then(validation::normalize_optional),
            created_at: now,
            updated_at: now,
        });

        // Just pushed, so last() is always present
        Ok(self.products.last().ok_or(CoreError::ProductNotFound(id))?)
    }

    /// Full replace of a product's fields by id. The id and creation
    /// timestamp are immutable.
    pub fn update(&mut self, id: i64, fields: NewProduct, now: DateTime<Utc>) -> CoreResult<()> {
        Self::validate(&fields)?;

        let product = self
            .products
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or(CoreError::ProductNotFound(id))?;

        product.name = fields.name.trim().to_string();
        product.category = fields.category;
        product.price = fields.price;
        product.stock = fields.stock;
        product.image = fields.image;
        product.barcode = fields.barcode.as_deref().and_then(validation::normalize_optional);
        product.updated_at = now;
        Ok(())
    }

    /// Unconditional removal. Historical transaction items are
    /// snapshots, so deleting a product never touches past records.
    pub fn delete(&mut self, id: i64) -> CoreResult<()> {
        let before = self.products.len();
        self.products.retain(|p| p.id != id);

        if self.products.len() == before {
            Err(CoreError::ProductNotFound(id))
        } else {
            Ok(())
        }
    }

    /// Adds `delta` to a product's stock (negative for checkout
    /// decrements, positive for refund/void restores).
    ///
    /// Callers pre-validate quantities; a missing product is a no-op so
    /// refunds of since-deleted products still go through.
    pub fn adjust_stock(&mut self, id: i64, delta: i64) {
        if let Some(product) = self.products.iter_mut().find(|p| p.id == id) {
            product.stock += delta;
        }
    }

    /// Direct stock override (admin/kasir), requiring a non-blank reason
    /// and a non-negative level.
    pub fn set_stock(&mut self, id: i64, new_stock: i64, reason: &str) -> CoreResult<()> {
        validation::validate_reason(reason)?;
        validation::validate_stock(new_stock)?;

        let product = self
            .products
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or(CoreError::ProductNotFound(id))?;

        product.stock = new_stock;
        product.updated_at = Utc::now();
        Ok(())
    }

    // -------------------------------------------------------------------------
    // Queries
    // -------------------------------------------------------------------------

    pub fn get(&self, id: i64) -> Option<&Product> {
        self.products.iter().find(|p| p.id == id)
    }

    /// Barcode lookup for scanner-driven add-to-cart.
    pub fn find_by_barcode(&self, barcode: &str) -> Option<&Product> {
        self.products
            .iter()
            .find(|p| p.barcode.as_deref() == Some(barcode))
    }

    pub fn all(&self) -> &[Product] {
        &self.products
    }

    /// Products at or below the given stock threshold, for restock
    /// screens.
    pub fn low_stock(&self, threshold: i64) -> Vec<&Product> {
        self.products.iter().filter(|p| p.stock <= threshold).collect()
    }

    fn validate(new: &NewProduct) -> CoreResult<()> {
        validation::validate_product_name(&new.name)?;
        validation::validate_price(new.price)?;
        validation::validate_stock(new.stock)?;
        validation::validate_image(new.image.as_deref())?;
        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
