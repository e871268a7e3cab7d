use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use shopfront_core::{DomainError, DomainResult, Entity, ProductId, UserId};

/// Optional pricing metadata.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PricingMetadata {
    pub base_price: Option<u64>, // Price in smallest currency unit (e.g., cents)
    pub currency: Option<String>, // ISO currency code (e.g., "USD", "EUR")
}

impl PricingMetadata {
    fn validate(&self) -> DomainResult<()> {
        match &self.currency {
            Some(c) if c.len() != 3 || !c.chars().all(|ch| ch.is_ascii_uppercase()) => Err(
                DomainError::validation(format!("currency '{c}' is not a 3-letter ISO code")),
            ),
            _ => Ok(()),
        }
    }
}

/// Command: CreateProduct.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateProduct {
    pub product_id: ProductId,
    pub owner_id: Option<UserId>,
    pub name: String,
    pub description: Option<String>,
    pub pricing: Option<PricingMetadata>,
    pub occurred_at: DateTime<Utc>,
}

/// Command: UpdateProduct. `None` fields are left unchanged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateProduct {
    pub name: Option<String>,
    pub description: Option<String>,
    pub pricing: Option<PricingMetadata>,
    pub occurred_at: DateTime<Utc>,
}

impl UpdateProduct {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.description.is_none() && self.pricing.is_none()
    }
}

/// A catalog product.
///
/// # Invariants
/// - `name` is trimmed and non-empty.
/// - `pricing.currency`, when set, is a 3-letter uppercase code.
/// - `updated_at >= created_at`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Product {
    id: ProductId,
    owner_id: Option<UserId>,
    name: String,
    description: Option<String>,
    pricing: PricingMetadata,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

fn normalize_name(name: &str) -> DomainResult<String> {
    let name = name.trim();
    if name.is_empty() {
        return Err(DomainError::validation("name cannot be empty"));
    }
    Ok(name.to_string())
}

impl Product {
    pub fn create(cmd: CreateProduct) -> DomainResult<Self> {
        let name = normalize_name(&cmd.name)?;
        let pricing = cmd.pricing.unwrap_or_default();
        pricing.validate()?;

        Ok(Self {
            id: cmd.product_id,
            owner_id: cmd.owner_id,
            name,
            description: cmd.description,
            pricing,
            created_at: cmd.occurred_at,
            updated_at: cmd.occurred_at,
        })
    }

    /// Apply a partial update. Either every field applies or none does.
    pub fn update(&mut self, cmd: UpdateProduct) -> DomainResult<()> {
        if cmd.is_empty() {
            return Ok(());
        }
        if cmd.occurred_at < self.created_at {
            return Err(DomainError::invariant("update predates product creation"));
        }

        let name = cmd.name.as_deref().map(normalize_name).transpose()?;
        if let Some(pricing) = &cmd.pricing {
            pricing.validate()?;
        }

        if let Some(name) = name {
            self.name = name;
        }
        if let Some(description) = cmd.description {
            self.description = Some(description);
        }
        if let Some(pricing) = cmd.pricing {
            self.pricing = pricing;
        }
        self.updated_at = cmd.occurred_at;
        Ok(())
    }

    pub fn id_typed(&self) -> ProductId {
        self.id
    }

    pub fn owner_id(&self) -> Option<UserId> {
        self.owner_id
    }

    pub fn is_owned_by(&self, user_id: UserId) -> bool {
        self.owner_id == Some(user_id)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn pricing(&self) -> &PricingMetadata {
        &self.pricing
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }
}

impl Entity for Product {
    type Id = ProductId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn create_cmd(name: &str) -> CreateProduct {
        CreateProduct {
            product_id: ProductId::new(),
            owner_id: None,
            name: name.to_string(),
            description: None,
            pricing: None,
            occurred_at: Utc::now(),
        }
    }

    fn update_cmd(at: DateTime<Utc>) -> UpdateProduct {
        UpdateProduct {
            name: None,
            description: None,
            pricing: None,
            occurred_at: at,
        }
    }

    #[test]
    fn create_trims_name_and_defaults_pricing() {
        let product = Product::create(create_cmd("  Widget ")).unwrap();
        assert_eq!(product.name(), "Widget");
        assert_eq!(product.pricing(), &PricingMetadata::default());
        assert_eq!(product.created_at(), product.updated_at());
    }

    #[test]
    fn create_rejects_blank_name() {
        let err = Product::create(create_cmd("   ")).unwrap_err();
        assert_eq!(err, DomainError::validation("name cannot be empty"));
    }

    #[test]
    fn create_rejects_bad_currency() {
        let mut cmd = create_cmd("Widget");
        cmd.pricing = Some(PricingMetadata {
            base_price: Some(100),
            currency: Some("usd".to_string()),
        });
        assert!(matches!(Product::create(cmd), Err(DomainError::Validation(_))));
    }

    #[test]
    fn ownership_is_recorded() {
        let owner = UserId::new();
        let mut cmd = create_cmd("Widget");
        cmd.owner_id = Some(owner);
        let product = Product::create(cmd).unwrap();
        assert!(product.is_owned_by(owner));
        assert!(!product.is_owned_by(UserId::new()));
    }

    #[test]
    fn update_applies_present_fields_only() {
        let mut product = Product::create(create_cmd("Widget")).unwrap();
        let later = product.created_at() + Duration::seconds(5);

        let mut cmd = update_cmd(later);
        cmd.description = Some("A fine widget".to_string());
        product.update(cmd).unwrap();

        assert_eq!(product.name(), "Widget");
        assert_eq!(product.description(), Some("A fine widget"));
        assert_eq!(product.updated_at(), later);
    }

    #[test]
    fn empty_update_is_a_noop() {
        let mut product = Product::create(create_cmd("Widget")).unwrap();
        let before = product.clone();
        product
            .update(update_cmd(product.created_at() + Duration::seconds(1)))
            .unwrap();
        assert_eq!(product, before);
    }

    #[test]
    fn failed_update_leaves_product_untouched() {
        let mut product = Product::create(create_cmd("Widget")).unwrap();
        let before = product.clone();

        let mut cmd = update_cmd(product.created_at() + Duration::seconds(1));
        cmd.name = Some("Gadget".to_string());
        cmd.pricing = Some(PricingMetadata {
            base_price: None,
            currency: Some("EURO".to_string()),
        });
        assert!(product.update(cmd).is_err());
        assert_eq!(product, before);
    }

    #[test]
    fn update_before_creation_is_rejected() {
        let mut product = Product::create(create_cmd("Widget")).unwrap();
        let mut cmd = update_cmd(product.created_at() - Duration::seconds(1));
        cmd.name = Some("Gadget".to_string());
        assert!(matches!(product.update(cmd), Err(DomainError::InvariantViolation(_))));
    }

    mod proptest_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            /// Property: any name with visible characters survives creation, trimmed.
            #[test]
            fn create_keeps_trimmed_name(name in "[ ]{0,3}[A-Za-z0-9][A-Za-z0-9 ]{0,40}") {
                let product = Product::create(create_cmd(&name)).unwrap();
                prop_assert_eq!(product.name(), name.trim());
            }
        }
    }
}
