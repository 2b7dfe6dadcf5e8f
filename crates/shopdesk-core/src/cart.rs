// ── Storefront cart ──
//
// "Add to cart" from the product detail screen: validate the line,
// bump the session's cart count right away, then post the line. A
// rejected post takes the bump back out.

use std::sync::Arc;

use tracing::{info, warn};

use shopdesk_api::{Method, Transport};

use crate::model::{CartLine, EntityId};
use crate::schema::{FieldErrors, FieldSpec, FormValues, Rule, Schema, Validator};
use crate::session::SessionStore;

const CART_ENDPOINT: &str = "carts";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CartOutcome {
    /// Posted; carries the cart count afterwards.
    Added { cart_count: u32 },
    Invalid(FieldErrors),
    Failed(String),
}

pub struct Cart {
    transport: Arc<dyn Transport>,
    session: Arc<SessionStore>,
    schema: Schema,
}

impl Cart {
    pub fn new(transport: Arc<dyn Transport>, session: Arc<SessionStore>) -> Self {
        Self {
            transport,
            session,
            schema: Self::schema(),
        }
    }

    /// The product detail form.
    pub fn schema() -> Schema {
        Schema::new()
            .field(FieldSpec::new("userId", "User").required())
            .field(FieldSpec::new("productId", "Product").required())
            .field(
                FieldSpec::new("price", "Price")
                    .required()
                    .rule(Rule::NonNegativeNumber),
            )
            .field(
                FieldSpec::new("amount", "Amount")
                    .required()
                    .rule(Rule::PositiveInteger)
                    .default_value("1"),
            )
    }

    /// Form values for a product, filled with the signed-in user.
    pub fn form_for(&self, product_id: &EntityId, price: f64) -> FormValues {
        let mut values = self.schema.defaults();
        if let Some(user) = self.session.snapshot().user_id {
            values.insert("userId".into(), user.to_string());
        }
        values.insert("productId".into(), product_id.to_string());
        values.insert("price".into(), price.to_string());
        values
    }

    /// Validate and post a cart line from raw form values.
    pub async fn add(&self, values: &FormValues) -> CartOutcome {
        let errors = self.schema.validate(values);
        if !errors.is_empty() {
            return CartOutcome::Invalid(errors);
        }
        match line_from(values) {
            Some(line) => self.add_line(line).await,
            None => {
                let mut errors = FieldErrors::new();
                errors.insert("amount".into(), "Amount is too large".into());
                CartOutcome::Invalid(errors)
            }
        }
    }

    /// Post an already-typed cart line.
    pub async fn add_line(&self, line: CartLine) -> CartOutcome {
        if line.amount == 0 {
            let mut errors = FieldErrors::new();
            errors.insert("amount".into(), "Amount must be a positive integer".into());
            return CartOutcome::Invalid(errors);
        }
        if !line.price.is_finite() || line.price < 0.0 {
            let mut errors = FieldErrors::new();
            errors.insert("price".into(), "Price must be a number of at least 0".into());
            return CartOutcome::Invalid(errors);
        }

        let body = match serde_json::to_value(&line) {
            Ok(body) => body,
            Err(e) => return CartOutcome::Failed(e.to_string()),
        };

        let optimistic = self.session.add_to_cart(line.amount);
        match self
            .transport
            .request(CART_ENDPOINT, Method::Post, Some(body))
            .await
        {
            Ok(_) => {
                info!(product = %line.product_id, amount = line.amount, "added to cart");
                CartOutcome::Added {
                    cart_count: optimistic,
                }
            }
            Err(e) => {
                let reverted = self.session.remove_from_cart(line.amount);
                warn!(product = %line.product_id, error = %e, cart_count = reverted, "cart post failed, count reverted");
                CartOutcome::Failed(
                    e.server_message()
                        .map_or_else(|| "Could not add to cart".to_owned(), str::to_owned),
                )
            }
        }
    }
}

fn line_from(values: &FormValues) -> Option<CartLine> {
    let get = |key: &str| values.get(key).map(|v| v.trim());
    Some(CartLine {
        user_id: EntityId::from(get("userId")?),
        product_id: EntityId::from(get("productId")?),
        price: get("price")?.parse().ok()?,
        amount: get("amount")?.parse().ok()?,
    })
}
