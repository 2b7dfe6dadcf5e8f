//! Cart subcommand handlers.

use std::sync::Arc;

use shopdesk_core::{Cart, CartOutcome, EntityId};

use super::{Context, session, util};
use crate::cli::{CartArgs, CartCommand};
use crate::error::CliError;
use crate::output;

pub async fn handle(args: CartArgs, ctx: &Context) -> Result<(), CliError> {
    match args.command {
        CartCommand::Add {
            product,
            price,
            amount,
        } => {
            let store = Arc::new(session::open_session(ctx)?);
            if store.snapshot().user_id.is_none() {
                return Err(CliError::Validation {
                    field: "user".into(),
                    reason: "no signed-in user; run `shopdesk session login <user-id>` first".into(),
                });
            }

            let cart = Cart::new(ctx.client.build_transport()?, Arc::clone(&store));
            let mut values = cart.form_for(&EntityId::from(product.as_str()), price);
            values.insert("amount".into(), amount);

            match cart.add(&values).await {
                CartOutcome::Added { cart_count } => {
                    output::print_notice(
                        &format!("Added to cart ({cart_count} items)"),
                        ctx.quiet,
                        ctx.color,
                    );
                    Ok(())
                }
                CartOutcome::Invalid(errors) => Err(CliError::InvalidFields {
                    resource: "cart line".into(),
                    details: util::format_field_errors(&errors),
                }),
                CartOutcome::Failed(message) => Err(CliError::Rejected { message }),
            }
        }
    }
}
